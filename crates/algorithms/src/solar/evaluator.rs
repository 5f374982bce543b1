//! Grid evaluation of direct irradiance
//!
//! Rows are processed independently through [`ParallelStrategy::par_map`]
//! and reassembled in order, so the result does not depend on the
//! processing mode or thread count. If any cell fails, the error of the
//! first failing cell in row-major order is returned.

use chrono::{DateTime, Utc};
use ndarray::Array2;
use std::time::Instant;
use sunshine_core::{Algorithm, Error, Raster, Result, CRS};
use sunshine_parallel::{ParallelStrategy, ProcessingMode};
use tracing::{debug, info};

use super::grid::CellGrid;
use super::irradiance::DirectBeamModel;
use super::position::{AccuracyMode, SolarGeometry, SolarPositionStrategy};

/// Parameters for an irradiance evaluation
#[derive(Debug, Clone)]
pub struct EvaluatorParams {
    /// Instant to evaluate
    pub timestamp: DateTime<Utc>,
    /// Solar position model
    pub mode: AccuracyMode,
    /// Row scheduling
    pub processing: ProcessingMode,
}

impl EvaluatorParams {
    /// Parameters for an instant with the default mode and processing
    pub fn at(timestamp: DateTime<Utc>) -> Self {
        Self {
            timestamp,
            ..Default::default()
        }
    }
}

impl Default for EvaluatorParams {
    fn default() -> Self {
        Self {
            timestamp: Utc::now(),
            mode: AccuracyMode::default(),
            processing: ProcessingMode::default(),
        }
    }
}

/// Direct irradiance over a cell grid
#[derive(Debug, Clone, Default)]
pub struct IrradianceEvaluator;

impl Algorithm for IrradianceEvaluator {
    type Input = CellGrid;
    type Output = Raster<f32>;
    type Params = EvaluatorParams;
    type Error = Error;

    fn name(&self) -> &'static str {
        "DirectIrradiance"
    }

    fn description(&self) -> &'static str {
        "Clear-sky direct solar irradiance (W/m²) on a lon/lat grid"
    }

    fn execute(&self, input: Self::Input, params: Self::Params) -> Result<Self::Output> {
        evaluate_with(&input, &params)
    }
}

/// Direct irradiance (W/m²) for every cell, using the default processing mode
pub fn evaluate(grid: &CellGrid, timestamp: &DateTime<Utc>, mode: AccuracyMode) -> Result<Raster<f32>> {
    evaluate_with(
        grid,
        &EvaluatorParams {
            timestamp: *timestamp,
            mode,
            processing: ProcessingMode::default(),
        },
    )
}

/// Direct irradiance (W/m²) for every cell.
///
/// The output carries the grid's GeoTransform and WGS84.
pub fn evaluate_with(grid: &CellGrid, params: &EvaluatorParams) -> Result<Raster<f32>> {
    let strategy = params.mode.strategy();
    let geometry = strategy.geometry(&params.timestamp);
    let beam = DirectBeamModel::for_timestamp(&params.timestamp);

    debug!(
        "{} geometry at {}: declination {:.4}°, equation of time {:.3} min; A = {:.2}, k = {:.4}",
        strategy.name(),
        params.timestamp,
        geometry.declination.to_degrees(),
        geometry.equation_of_time,
        beam.flux,
        beam.optical_depth
    );

    let start = Instant::now();
    let data = map_cells(grid, params.processing, |lat, lon| {
        let alt = strategy.altitude_with(&geometry, lat, lon)?;
        Ok(beam.irradiance(alt)? as f32)
    })?;
    info!(
        "Evaluated {}x{} cells ({}) in {:.2?}",
        grid.shape().0,
        grid.shape().1,
        strategy.name(),
        start.elapsed()
    );

    Ok(georeference(grid, data))
}

/// Solar altitude (degrees) for every cell
pub fn evaluate_altitude(grid: &CellGrid, params: &EvaluatorParams) -> Result<Raster<f64>> {
    let strategy = params.mode.strategy();
    let geometry: SolarGeometry = strategy.geometry(&params.timestamp);
    let data = map_cells(grid, params.processing, |lat, lon| {
        strategy.altitude_with(&geometry, lat, lon)
    })?;
    Ok(georeference(grid, data))
}

fn georeference<T: sunshine_core::RasterElement>(grid: &CellGrid, data: Array2<T>) -> Raster<T> {
    Raster::georeferenced(data, grid.spec().geotransform(), CRS::wgs84())
}

/// Apply `f(lat, lon)` to every cell, row by row.
fn map_cells<T, F>(grid: &CellGrid, processing: ProcessingMode, f: F) -> Result<Array2<T>>
where
    T: Copy + Default + Send,
    F: Fn(f64, f64) -> Result<T> + Sync + Send,
{
    let (rows, cols) = grid.shape();
    let lat = grid.lat();
    let lon = grid.lon();

    let row_results: Vec<Result<Vec<T>>> = processing.par_map(0..rows, |row| {
        let mut out = Vec::with_capacity(cols);
        for col in 0..cols {
            let value = f(lat[[row, col]], lon[[row, col]]).map_err(|e| Error::Computation {
                row,
                col,
                reason: e.to_string(),
            })?;
            out.push(value);
        }
        Ok(out)
    })?;

    // sequential collect keeps the first failure in row-major order
    let row_data = row_results.into_iter().collect::<Result<Vec<_>>>()?;

    let mut data = Array2::<T>::default((rows, cols));
    for (row, values) in row_data.into_iter().enumerate() {
        for (col, value) in values.into_iter().enumerate() {
            data[[row, col]] = value;
        }
    }
    Ok(data)
}
