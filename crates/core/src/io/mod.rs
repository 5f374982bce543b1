//! I/O operations for reading and writing georeferenced rasters

mod geokeys;
mod native;

pub use native::{read_geotiff, write_geotiff, GeoTiffOptions};

// Buffer-based I/O (no filesystem dependency)
pub use native::{read_geotiff_from_buffer, write_geotiff_to_buffer};
