//! Global sampling grid
//!
//! A half-degree lon/lat lattice covering the globe. Row 0 is the
//! southernmost row, matching a GeoTransform with origin (-180, -90) and a
//! positive pixel height.

use ndarray::Array2;
use serde::{Deserialize, Serialize};
use sunshine_core::GeoTransform;

/// Geometry of a regular lon/lat grid
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct GridSpec {
    /// Longitude of the western edge, degrees
    pub origin_lon: f64,
    /// Latitude of the southern edge, degrees
    pub origin_lat: f64,
    /// Cell size in degrees (both axes)
    pub step: f64,
    /// Number of latitude rows
    pub rows: usize,
    /// Number of longitude columns
    pub cols: usize,
}

impl GridSpec {
    /// The 0.5° global grid: 360 rows x 720 columns
    pub const fn global() -> Self {
        Self {
            origin_lon: -180.0,
            origin_lat: -90.0,
            step: 0.5,
            rows: 360,
            cols: 720,
        }
    }

    /// Shape as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        (self.rows, self.cols)
    }

    /// GeoTransform whose pixel centers are exactly this grid's cell centers
    pub fn geotransform(&self) -> GeoTransform {
        GeoTransform::new(self.origin_lon, self.origin_lat, self.step, self.step)
    }

    /// (lon, lat) of the center of cell (row, col)
    pub fn cell_center(&self, row: usize, col: usize) -> (f64, f64) {
        self.geotransform().pixel_to_geo(col, row)
    }

    /// Materialize the coordinate arrays
    pub fn build(&self) -> CellGrid {
        let lon = Array2::from_shape_fn(self.shape(), |(row, col)| self.cell_center(row, col).0);
        let lat = Array2::from_shape_fn(self.shape(), |(row, col)| self.cell_center(row, col).1);
        CellGrid {
            spec: *self,
            lon,
            lat,
        }
    }
}

impl Default for GridSpec {
    fn default() -> Self {
        Self::global()
    }
}

/// Longitude and latitude of every cell center
#[derive(Debug, Clone)]
pub struct CellGrid {
    spec: GridSpec,
    lon: Array2<f64>,
    lat: Array2<f64>,
}

impl CellGrid {
    /// The geometry this grid was built from
    pub fn spec(&self) -> &GridSpec {
        &self.spec
    }

    /// Shape as (rows, cols)
    pub fn shape(&self) -> (usize, usize) {
        self.lon.dim()
    }

    /// Longitude array, increasing with column
    pub fn lon(&self) -> &Array2<f64> {
        &self.lon
    }

    /// Latitude array, increasing with row
    pub fn lat(&self) -> &Array2<f64> {
        &self.lat
    }

    /// Split into `(lon_grid, lat_grid)`
    pub fn into_arrays(self) -> (Array2<f64>, Array2<f64>) {
        (self.lon, self.lat)
    }
}

/// Build the global 0.5° grid as `(lon_grid, lat_grid)`, each 360x720
pub fn build_grid() -> (Array2<f64>, Array2<f64>) {
    GridSpec::global().build().into_arrays()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_global_shape_and_extent() {
        let (lon, lat) = build_grid();
        assert_eq!(lon.dim(), (360, 720));
        assert_eq!(lat.dim(), (360, 720));

        assert_eq!(lon[[0, 0]], -179.75);
        assert_eq!(lon[[0, 719]], 179.75);
        assert_eq!(lat[[0, 0]], -89.75);
        assert_eq!(lat[[359, 0]], 89.75);
    }

    #[test]
    fn test_axes_are_monotonic() {
        let (lon, lat) = build_grid();
        for col in 1..720 {
            assert_eq!(lon[[17, col]] - lon[[17, col - 1]], 0.5);
            assert_eq!(lat[[17, col]], lat[[17, 0]]);
        }
        for row in 1..360 {
            assert_eq!(lat[[row, 3]] - lat[[row - 1, 3]], 0.5);
            assert_eq!(lon[[row, 3]], lon[[0, 3]]);
        }
    }

    #[test]
    fn test_geotransform_matches_cells() {
        let spec = GridSpec::global();
        assert_eq!(spec.geotransform().to_gdal(), [-180.0, 0.5, 0.0, -90.0, 0.0, 0.5]);

        let grid = spec.build();
        for &(row, col) in &[(0, 0), (359, 719), (180, 360), (113, 542)] {
            let (x, y) = spec.geotransform().pixel_to_geo(col, row);
            assert_eq!(x, grid.lon()[[row, col]]);
            assert_eq!(y, grid.lat()[[row, col]]);
        }
    }
}
