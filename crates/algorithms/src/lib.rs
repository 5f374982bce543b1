//! # Sunshine Algorithms
//!
//! Solar position and clear-sky irradiance over a global grid.
//!
//! ```no_run
//! use sunshine_algorithms::solar::{generate_raster, parse_timestamp, AccuracyMode};
//!
//! let ts = parse_timestamp("202006211200")?;
//! let summary = generate_raster(&ts, AccuracyMode::Fast, "output.tif")?;
//! println!("{} daylit cells", summary.daylit_cells);
//! # Ok::<(), sunshine_core::Error>(())
//! ```

pub mod solar;

/// Prelude for convenient imports
pub mod prelude {
    pub use crate::solar::{
        altitude, build_grid, direct_irradiance, evaluate, evaluate_with, generate_raster,
        parse_timestamp, AccuracyMode, CellGrid, EvaluatorParams, GridSpec, IrradianceEvaluator,
    };
    pub use sunshine_core::prelude::*;
    pub use sunshine_parallel::ProcessingMode;
}
