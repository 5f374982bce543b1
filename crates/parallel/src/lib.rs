//! # Sunshine Parallel
//!
//! Processing strategies for per-row raster evaluation.
//!
//! Rows are mapped sequentially, on rayon's global pool, or on a dedicated
//! pool with a fixed number of threads. Without the `parallel` feature every
//! mode runs sequentially.

pub mod strategy;

pub use strategy::{num_cpus, ParallelStrategy, ProcessingMode};
