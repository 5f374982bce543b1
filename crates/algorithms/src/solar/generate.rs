//! One-call global raster generation

use chrono::{DateTime, SecondsFormat, Utc};
use serde::Serialize;
use std::path::Path;
use sunshine_core::io::{write_geotiff, GeoTiffOptions};
use sunshine_core::Result;
use tracing::info;

use super::evaluator::{evaluate_with, EvaluatorParams};
use super::grid::GridSpec;
use super::position::AccuracyMode;

/// What a generation run produced
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct GenerationSummary {
    pub rows: usize,
    pub cols: usize,
    /// Cells with irradiance above zero
    pub daylit_cells: usize,
    /// Largest value in W/m²
    pub peak_irradiance: f32,
    pub mode: AccuracyMode,
}

/// Evaluate the global 0.5° grid at `timestamp` and write it to `path`.
///
/// An existing file at `path` is overwritten. On failure no file is left.
pub fn generate_raster<P: AsRef<Path>>(
    timestamp: &DateTime<Utc>,
    mode: AccuracyMode,
    path: P,
) -> Result<GenerationSummary> {
    let params = EvaluatorParams {
        mode,
        ..EvaluatorParams::at(*timestamp)
    };
    generate_raster_with(&params, path, None)
}

/// [`generate_raster`] with explicit processing and write options
pub fn generate_raster_with<P: AsRef<Path>>(
    params: &EvaluatorParams,
    path: P,
    options: Option<GeoTiffOptions>,
) -> Result<GenerationSummary> {
    let path = path.as_ref();
    let grid = GridSpec::global().build();
    let raster = evaluate_with(&grid, params)?;

    let mut options = options.unwrap_or_default();
    if options.description.is_none() {
        options.description = Some(format!(
            "Direct irradiance (W/m2) at {}",
            params.timestamp.to_rfc3339_opts(SecondsFormat::Secs, true)
        ));
    }
    write_geotiff(&raster, path, Some(options))?;

    let (rows, cols) = raster.shape();
    let summary = GenerationSummary {
        rows,
        cols,
        daylit_cells: raster.data().iter().filter(|v| **v > 0.0).count(),
        peak_irradiance: raster.data().iter().copied().fold(0.0_f32, f32::max),
        mode: params.mode,
    };
    info!(
        "Wrote {} ({}x{}, {} daylit cells, peak {:.1} W/m²)",
        path.display(),
        cols,
        rows,
        summary.daylit_cells,
        summary.peak_irradiance
    );
    Ok(summary)
}
