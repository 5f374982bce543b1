//! Solar position models
//!
//! Two interchangeable strategies compute the sun's altitude above the
//! horizon for a location and UTC instant:
//!
//! - [`FastPosition`]: sinusoidal declination and a three-term equation of
//!   time. Cheap, accurate to roughly a degree.
//! - [`HighAccuracyPosition`]: the NOAA formulation of Meeus' low-precision
//!   solar coordinates in Julian centuries, followed by an atmospheric
//!   refraction correction.
//!
//! Everything that depends only on the instant lives in [`SolarGeometry`],
//! so a grid evaluation computes it once and reuses it for every cell.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use std::f64::consts::PI;
use std::fmt;
use std::str::FromStr;
use sunshine_core::{Error, Result};

use super::time::{day_of_year, julian_century, utc_minutes};

/// Which solar position model to use
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum AccuracyMode {
    /// Approximate declination and equation of time
    #[default]
    Fast,
    /// Meeus/NOAA model with refraction
    HighAccuracy,
}

impl AccuracyMode {
    /// The strategy implementing this mode
    pub fn strategy(self) -> &'static dyn SolarPositionStrategy {
        match self {
            AccuracyMode::Fast => &FastPosition,
            AccuracyMode::HighAccuracy => &HighAccuracyPosition,
        }
    }

    /// Canonical lowercase name
    pub fn as_str(self) -> &'static str {
        match self {
            AccuracyMode::Fast => "fast",
            AccuracyMode::HighAccuracy => "high-accuracy",
        }
    }
}

impl fmt::Display for AccuracyMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for AccuracyMode {
    type Err = Error;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().replace('_', "-").as_str() {
            "fast" => Ok(AccuracyMode::Fast),
            "high-accuracy" | "high" | "accurate" => Ok(AccuracyMode::HighAccuracy),
            _ => Err(Error::InvalidParameter {
                name: "mode",
                value: s.to_string(),
                reason: "expected 'fast' or 'high-accuracy'".into(),
            }),
        }
    }
}

/// Instant-dependent solar quantities shared by every cell
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct SolarGeometry {
    /// Solar declination, radians
    pub declination: f64,
    /// Equation of time, minutes
    pub equation_of_time: f64,
    /// Minutes since UTC midnight
    pub utc_minutes: f64,
}

impl SolarGeometry {
    /// Hour angle in degrees at the given longitude; 0 at local solar noon
    pub fn hour_angle(&self, lon: f64) -> f64 {
        let true_solar_minutes = self.utc_minutes + self.equation_of_time + 4.0 * lon;
        true_solar_minutes / 4.0 - 180.0
    }

    /// Geometric altitude (no refraction) in degrees
    pub fn geometric_altitude(&self, lat: f64, lon: f64) -> f64 {
        let phi = lat.to_radians();
        let h = self.hour_angle(lon).to_radians();
        let sin_alt = phi.sin() * self.declination.sin()
            + phi.cos() * self.declination.cos() * h.cos();
        sin_alt.clamp(-1.0, 1.0).asin().to_degrees()
    }
}

/// A solar position model
pub trait SolarPositionStrategy: Send + Sync {
    /// Short identifier for logs
    fn name(&self) -> &'static str;

    /// Declination, equation of time and clock time for an instant
    fn geometry(&self, timestamp: &DateTime<Utc>) -> SolarGeometry;

    /// Adjust a geometric altitude (degrees); identity by default
    fn correct_altitude(&self, altitude: f64) -> f64 {
        altitude
    }

    /// Altitude in degrees for a location, reusing precomputed geometry
    fn altitude_with(&self, geometry: &SolarGeometry, lat: f64, lon: f64) -> Result<f64> {
        check_coordinates(lat, lon)?;
        let altitude = self.correct_altitude(geometry.geometric_altitude(lat, lon));
        if !altitude.is_finite() {
            return Err(Error::NonFinite {
                quantity: "altitude",
                value: altitude,
            });
        }
        Ok(altitude)
    }

    /// Altitude in degrees for a location and instant
    fn altitude(&self, lat: f64, lon: f64, timestamp: &DateTime<Utc>) -> Result<f64> {
        self.altitude_with(&self.geometry(timestamp), lat, lon)
    }
}

/// Reject non-finite or out-of-range coordinates
pub fn check_coordinates(lat: f64, lon: f64) -> Result<()> {
    for (name, value, limit) in [("latitude", lat, 90.0), ("longitude", lon, 180.0)] {
        if !value.is_finite() {
            return Err(Error::NonFinite {
                quantity: name,
                value,
            });
        }
        if value.abs() > limit {
            return Err(Error::InvalidParameter {
                name,
                value: value.to_string(),
                reason: format!("must be within [-{}, {}]", limit, limit),
            });
        }
    }
    Ok(())
}

/// Sinusoidal approximation
#[derive(Debug, Clone, Copy, Default)]
pub struct FastPosition;

impl FastPosition {
    /// Declination in degrees for a day of the year
    pub fn declination(day: u32) -> f64 {
        23.45 * (2.0 * PI / 365.0 * (day as f64 - 81.0)).sin()
    }

    /// Equation of time in minutes for a day of the year
    pub fn equation_of_time(day: u32) -> f64 {
        let b = 2.0 * PI / 364.0 * (day as f64 - 81.0);
        9.87 * (2.0 * b).sin() - 7.53 * b.cos() - 1.5 * b.sin()
    }
}

impl SolarPositionStrategy for FastPosition {
    fn name(&self) -> &'static str {
        "fast"
    }

    fn geometry(&self, timestamp: &DateTime<Utc>) -> SolarGeometry {
        let day = day_of_year(timestamp);
        SolarGeometry {
            declination: Self::declination(day).to_radians(),
            equation_of_time: Self::equation_of_time(day),
            utc_minutes: utc_minutes(timestamp),
        }
    }
}

/// NOAA / Meeus model with refraction
#[derive(Debug, Clone, Copy, Default)]
pub struct HighAccuracyPosition;

impl HighAccuracyPosition {
    /// Geometric mean longitude of the sun, degrees in [0, 360)
    fn mean_longitude(t: f64) -> f64 {
        (280.46646 + t * (36000.76983 + t * 0.0003032)).rem_euclid(360.0)
    }

    /// Geometric mean anomaly of the sun, degrees
    fn mean_anomaly(t: f64) -> f64 {
        357.52911 + t * (35999.05029 - t * 0.0001537)
    }

    fn orbit_eccentricity(t: f64) -> f64 {
        0.016708634 - t * (0.000042037 + t * 0.0000001267)
    }

    /// Equation of center, degrees
    fn equation_of_center(t: f64) -> f64 {
        let m = Self::mean_anomaly(t).to_radians();
        m.sin() * (1.914602 - t * (0.004817 + 0.000014 * t))
            + (2.0 * m).sin() * (0.019993 - 0.000101 * t)
            + (3.0 * m).sin() * 0.000289
    }

    /// Apparent longitude, degrees
    fn apparent_longitude(t: f64) -> f64 {
        let true_lon = Self::mean_longitude(t) + Self::equation_of_center(t);
        let omega = (125.04 - 1934.136 * t).to_radians();
        true_lon - 0.00569 - 0.00478 * omega.sin()
    }

    /// Obliquity of the ecliptic corrected for nutation, degrees
    fn obliquity(t: f64) -> f64 {
        let seconds = 21.448 - t * (46.815 + t * (0.00059 - t * 0.001813));
        let mean = 23.0 + (26.0 + seconds / 60.0) / 60.0;
        let omega = (125.04 - 1934.136 * t).to_radians();
        mean + 0.00256 * omega.cos()
    }

    /// Declination in radians at `t` Julian centuries since J2000.0
    pub fn declination(t: f64) -> f64 {
        let epsilon = Self::obliquity(t).to_radians();
        let lambda = Self::apparent_longitude(t).to_radians();
        (epsilon.sin() * lambda.sin()).asin()
    }

    /// Equation of time in minutes at `t` Julian centuries since J2000.0
    pub fn equation_of_time(t: f64) -> f64 {
        let epsilon = Self::obliquity(t).to_radians();
        let l0 = Self::mean_longitude(t).to_radians();
        let e = Self::orbit_eccentricity(t);
        let m = Self::mean_anomaly(t).to_radians();
        let y = (epsilon / 2.0).tan().powi(2);

        let eq = y * (2.0 * l0).sin() - 2.0 * e * m.sin()
            + 4.0 * e * y * m.sin() * (2.0 * l0).cos()
            - 0.5 * y * y * (4.0 * l0).sin()
            - 1.25 * e * e * (2.0 * m).sin();
        4.0 * eq.to_degrees()
    }

    /// Atmospheric refraction in degrees for a geometric altitude in degrees
    pub fn refraction(altitude: f64) -> f64 {
        if altitude > 85.0 {
            return 0.0;
        }
        let t = altitude.to_radians().tan();
        let arcsec = if altitude > 5.0 {
            58.1 / t - 0.07 / t.powi(3) + 0.000086 / t.powi(5)
        } else if altitude > -0.575 {
            1735.0
                + altitude * (-518.2 + altitude * (103.4 + altitude * (-12.79 + altitude * 0.711)))
        } else {
            -20.772 / t
        };
        arcsec / 3600.0
    }
}

impl SolarPositionStrategy for HighAccuracyPosition {
    fn name(&self) -> &'static str {
        "high-accuracy"
    }

    fn geometry(&self, timestamp: &DateTime<Utc>) -> SolarGeometry {
        let t = julian_century(timestamp);
        SolarGeometry {
            declination: Self::declination(t),
            equation_of_time: Self::equation_of_time(t),
            utc_minutes: utc_minutes(timestamp),
        }
    }

    fn correct_altitude(&self, altitude: f64) -> f64 {
        altitude + Self::refraction(altitude)
    }
}

/// Solar altitude in degrees for a location and instant
pub fn altitude(lat: f64, lon: f64, timestamp: &DateTime<Utc>, mode: AccuracyMode) -> Result<f64> {
    mode.strategy().altitude(lat, lon, timestamp)
}
