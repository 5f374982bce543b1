//! Raster element trait for generic cell values

use num_traits::{Float, NumCast};
use std::fmt::Debug;

/// On-disk sample type of a raster band
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum PixelType {
    /// IEEE 754 single precision
    Float32,
    /// IEEE 754 double precision
    Float64,
}

impl PixelType {
    /// Bits per sample
    pub fn bits(self) -> u16 {
        match self {
            PixelType::Float32 => 32,
            PixelType::Float64 => 64,
        }
    }
}

/// Trait for types that can be stored in a raster cell.
///
/// Irradiance and coordinate rasters are always floating point, so only
/// `f32` and `f64` implement it. The pixel type decides the sample format
/// written by the GeoTIFF encoder.
pub trait RasterElement:
    Float + Copy + Clone + Debug + PartialOrd + PartialEq + NumCast + Send + Sync + 'static
{
    /// Sample type used when this element is written to disk
    const PIXEL_TYPE: PixelType;

    /// Default no-data value for this type
    fn default_nodata() -> Self {
        Self::nan()
    }

    /// Check if this value represents no-data
    fn is_nodata(&self, nodata: Option<Self>) -> bool {
        if self.is_nan() {
            return true;
        }
        match nodata {
            Some(nd) => {
                let tolerance = <Self as NumCast>::from(100.0_f64).unwrap_or_else(Self::one);
                (*self - nd).abs() < Self::epsilon() * tolerance
            }
            None => false,
        }
    }
}

impl RasterElement for f32 {
    const PIXEL_TYPE: PixelType = PixelType::Float32;
}

impl RasterElement for f64 {
    const PIXEL_TYPE: PixelType = PixelType::Float64;
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_nodata_detection() {
        assert!(f32::NAN.is_nodata(None));
        assert!((-9999.0f64).is_nodata(Some(-9999.0)));
        assert!(!0.0f32.is_nodata(Some(-9999.0)));
        assert!(!0.0f64.is_nodata(None));
    }

    #[test]
    fn test_pixel_type() {
        assert_eq!(<f32 as RasterElement>::PIXEL_TYPE.bits(), 32);
        assert_eq!(<f64 as RasterElement>::PIXEL_TYPE.bits(), 64);
    }
}
