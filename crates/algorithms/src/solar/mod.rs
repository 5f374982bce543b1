//! Global direct solar irradiance
//!
//! - **time**: timestamp parsing and calendar quantities
//! - **grid**: the 0.5° lon/lat grid
//! - **position**: fast and high-accuracy solar altitude
//! - **irradiance**: clear-sky direct beam model
//! - **evaluator**: per-cell evaluation into a georeferenced raster
//! - **generate**: evaluate and write a GeoTIFF in one call

mod evaluator;
mod generate;
mod grid;
mod irradiance;
mod position;
mod time;

pub use evaluator::{evaluate, evaluate_altitude, evaluate_with, EvaluatorParams, IrradianceEvaluator};
pub use generate::{generate_raster, generate_raster_with, GenerationSummary};
pub use grid::{build_grid, CellGrid, GridSpec};
pub use irradiance::{
    air_mass, apparent_extraterrestrial_flux, direct_irradiance, optical_depth, DirectBeamModel,
};
pub use position::{
    altitude, check_coordinates, AccuracyMode, FastPosition, HighAccuracyPosition, SolarGeometry,
    SolarPositionStrategy,
};
pub use time::{day_of_year, julian_century, julian_day, parse_timestamp, utc_minutes};
