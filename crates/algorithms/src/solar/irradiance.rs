//! Clear-sky direct beam irradiance
//!
//! ASHRAE-style exponential attenuation: the apparent extraterrestrial flux
//! `A` and the optical depth `k` vary sinusoidally over the year, and the
//! beam is `A * exp(-k * m)` with air mass `m = 1 / sin(altitude)`.

use chrono::{DateTime, Utc};
use std::f64::consts::PI;
use sunshine_core::{Error, Result};

use super::time::day_of_year;

/// Apparent extraterrestrial flux `A` in W/m² for a day of the year
pub fn apparent_extraterrestrial_flux(day: u32) -> f64 {
    1160.0 + 75.0 * (2.0 * PI / 365.0 * (day as f64 - 275.0)).sin()
}

/// Optical depth `k` for a day of the year
pub fn optical_depth(day: u32) -> f64 {
    0.174 + 0.035 * (2.0 * PI / 365.0 * (day as f64 - 100.0)).sin()
}

/// Relative air mass for an altitude in degrees above the horizon
pub fn air_mass(altitude: f64) -> f64 {
    1.0 / altitude.to_radians().sin()
}

/// Day-dependent attenuation coefficients
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DirectBeamModel {
    /// Apparent extraterrestrial flux, W/m²
    pub flux: f64,
    /// Optical depth
    pub optical_depth: f64,
}

impl DirectBeamModel {
    /// Coefficients for the day of the year of `timestamp`
    pub fn for_timestamp(timestamp: &DateTime<Utc>) -> Self {
        let day = day_of_year(timestamp);
        Self {
            flux: apparent_extraterrestrial_flux(day),
            optical_depth: optical_depth(day),
        }
    }

    /// Direct irradiance in W/m² for a solar altitude in degrees.
    ///
    /// Zero when the sun is at or below the horizon.
    pub fn irradiance(&self, altitude: f64) -> Result<f64> {
        if altitude.is_nan() {
            return Err(Error::NonFinite {
                quantity: "altitude",
                value: altitude,
            });
        }
        if altitude <= 0.0 {
            return Ok(0.0);
        }
        let value = self.flux * (-self.optical_depth * air_mass(altitude)).exp();
        if !value.is_finite() {
            return Err(Error::NonFinite {
                quantity: "irradiance",
                value,
            });
        }
        Ok(value)
    }
}

/// Direct irradiance in W/m² at `timestamp` for a solar altitude in degrees
pub fn direct_irradiance(timestamp: &DateTime<Utc>, altitude: f64) -> Result<f64> {
    DirectBeamModel::for_timestamp(timestamp).irradiance(altitude)
}

#[cfg(test)]
mod tests {
    use super::*;
    use approx::assert_relative_eq;
    use chrono::TimeZone;

    fn solstice() -> DateTime<Utc> {
        Utc.with_ymd_and_hms(2020, 6, 21, 12, 0, 0).unwrap()
    }

    #[test]
    fn test_zero_at_or_below_horizon() {
        let ts = solstice();
        assert_eq!(direct_irradiance(&ts, 0.0).unwrap(), 0.0);
        assert_eq!(direct_irradiance(&ts, -0.01).unwrap(), 0.0);
        assert_eq!(direct_irradiance(&ts, -90.0).unwrap(), 0.0);
    }

    #[test]
    fn test_nan_altitude_is_an_error() {
        assert!(matches!(
            direct_irradiance(&solstice(), f64::NAN),
            Err(Error::NonFinite { quantity: "altitude", .. })
        ));
    }

    #[test]
    fn test_monotonic_in_altitude() {
        let model = DirectBeamModel::for_timestamp(&solstice());
        let mut previous = 0.0;
        for tenth in 1..=900 {
            let value = model.irradiance(tenth as f64 / 10.0).unwrap();
            assert!(value > previous);
            previous = value;
        }
    }

    #[test]
    fn test_zenith_on_solstice() {
        // day 173: A ~ 1088, k ~ 0.2056
        let value = direct_irradiance(&solstice(), 90.0).unwrap();
        assert!(value > 870.0 && value < 900.0, "{}", value);
        assert!(value < apparent_extraterrestrial_flux(173));
    }

    #[test]
    fn test_coefficients() {
        assert_relative_eq!(apparent_extraterrestrial_flux(275), 1160.0, epsilon = 1e-9);
        assert_relative_eq!(optical_depth(100), 0.174, epsilon = 1e-12);
        assert_relative_eq!(air_mass(90.0), 1.0, epsilon = 1e-12);
        assert_relative_eq!(air_mass(30.0), 2.0, epsilon = 1e-12);
    }
}
