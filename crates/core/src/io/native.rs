//! Native GeoTIFF reading/writing (without GDAL dependency)
//!
//! Uses the `tiff` crate for TIFF I/O and writes the GeoTIFF georeferencing
//! tags itself: ModelPixelScale + ModelTiepoint for north-up rasters,
//! ModelTransformation otherwise, and a GeoKeyDirectory for EPSG-coded CRSs.

use crate::error::{Error, Result};
use crate::io::geokeys::{crs_from_geokeys, geokey_directory, tags};
use crate::raster::{GeoTransform, PixelType, Raster, RasterElement};
use std::fs::File;
use std::io::{BufWriter, Cursor, Read, Seek, Write};
use std::path::Path;
use tiff::decoder::{Decoder, DecodingResult};
use tiff::encoder::colortype::{Gray32Float, Gray64Float};
use tiff::encoder::{DirectoryEncoder, TiffEncoder, TiffKind};
use tiff::tags::Tag;
use tracing::debug;

/// Options for writing GeoTIFF files
#[derive(Debug, Clone)]
pub struct GeoTiffOptions {
    /// Free-text ImageDescription tag
    pub description: Option<String>,
    /// `fsync` the file before reporting success
    pub sync: bool,
}

impl Default for GeoTiffOptions {
    fn default() -> Self {
        Self {
            description: None,
            sync: true,
        }
    }
}

/// TIFF tag for a GeoTIFF/GDAL tag id.
///
/// The decoder stores known ids under their named variants, so lookups must
/// go through the same mapping; `Tag::Unknown(id)` never matches them.
fn geo_tag(id: u16) -> Tag {
    Tag::from_u16_exhaustive(id)
}

/// Read a GeoTIFF file into a Raster
///
/// Recovers pixel data, the GeoTransform (from either tag form), the CRS
/// (from EPSG GeoKeys) and the GDAL nodata value.
pub fn read_geotiff<T, P>(path: P) -> Result<Raster<T>>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let file = File::open(path.as_ref())?;
    decode_geotiff(file)
}

/// Read a GeoTIFF from an in-memory buffer into a Raster
pub fn read_geotiff_from_buffer<T>(data: &[u8]) -> Result<Raster<T>>
where
    T: RasterElement,
{
    decode_geotiff(Cursor::new(data))
}

/// Internal: decode a GeoTIFF from any `Read + Seek` source
fn decode_geotiff<T, R>(reader: R) -> Result<Raster<T>>
where
    T: RasterElement,
    R: Read + Seek,
{
    let mut decoder = Decoder::new(reader)?;

    let (width, height) = decoder.dimensions()?;
    let rows = height as usize;
    let cols = width as usize;

    let data: Vec<T> = match decoder.read_image()? {
        DecodingResult::F32(buf) => buf
            .iter()
            .map(|&v| num_traits::cast(v).unwrap_or_else(T::default_nodata))
            .collect(),
        DecodingResult::F64(buf) => buf
            .iter()
            .map(|&v| num_traits::cast(v).unwrap_or_else(T::default_nodata))
            .collect(),
        _ => {
            return Err(Error::UnsupportedDataType(
                "only 32/64-bit float TIFFs are supported".to_string(),
            ))
        }
    };

    let mut raster = Raster::from_vec(data, rows, cols)?;

    if let Some(transform) = read_geotransform(&mut decoder) {
        raster.set_transform(transform);
    }

    if let Ok(directory) = decoder.get_tag_u16_vec(geo_tag(tags::GEO_KEY_DIRECTORY)) {
        raster.set_crs(crs_from_geokeys(&directory));
    }

    if let Ok(nodata) = decoder.get_tag_ascii_string(geo_tag(tags::GDAL_NODATA)) {
        let parsed = nodata.trim_end_matches('\0').trim().parse::<f64>().ok();
        raster.set_nodata(parsed.and_then(num_traits::cast));
    }

    Ok(raster)
}

/// Attempt to read GeoTransform from TIFF tags
fn read_geotransform<R: Read + Seek>(decoder: &mut Decoder<R>) -> Option<GeoTransform> {
    let scale = decoder
        .get_tag_f64_vec(geo_tag(tags::MODEL_PIXEL_SCALE))
        .ok();
    let tiepoint = decoder
        .get_tag_f64_vec(geo_tag(tags::MODEL_TIEPOINT))
        .ok();

    if let (Some(scale), Some(tiepoint)) = (scale, tiepoint) {
        if scale.len() >= 2 && tiepoint.len() >= 6 {
            // tiepoint: [I, J, K, X, Y, Z], scale: [ScaleX, ScaleY, ScaleZ]
            let origin_x = tiepoint[3] - tiepoint[0] * scale[0];
            let origin_y = tiepoint[4] + tiepoint[1] * scale[1];
            return Some(GeoTransform::new(origin_x, origin_y, scale[0], -scale[1]));
        }
    }

    let matrix = decoder
        .get_tag_f64_vec(geo_tag(tags::MODEL_TRANSFORMATION))
        .ok()?;
    GeoTransform::from_model_transformation(&matrix)
}

/// Write a Raster to a GeoTIFF file
///
/// The file is created (or truncated), encoded, flushed and, unless
/// `options.sync` is false, synced to disk before returning. If anything
/// fails after the file was created, the partial file is removed.
pub fn write_geotiff<T, P>(raster: &Raster<T>, path: P, options: Option<GeoTiffOptions>) -> Result<()>
where
    T: RasterElement,
    P: AsRef<Path>,
{
    let path = path.as_ref();
    let options = options.unwrap_or_default();
    validate_shape(raster)?;

    let file = File::create(path)?;
    let mut writer = BufWriter::new(file);

    let written = encode_geotiff(raster, &mut writer, &options)
        .and_then(|()| writer.flush().map_err(Error::from))
        .and_then(|()| {
            if options.sync {
                writer.get_ref().sync_all()?;
            }
            Ok(())
        });

    if let Err(e) = written {
        drop(writer);
        if let Err(cleanup) = std::fs::remove_file(path) {
            debug!("Could not remove partial file {}: {}", path.display(), cleanup);
        }
        return Err(e);
    }

    debug!(
        "Wrote {}x{} {}-bit float raster to {}",
        raster.cols(),
        raster.rows(),
        T::PIXEL_TYPE.bits(),
        path.display()
    );
    Ok(())
}

/// Write a Raster to an in-memory GeoTIFF buffer
pub fn write_geotiff_to_buffer<T>(raster: &Raster<T>, options: Option<GeoTiffOptions>) -> Result<Vec<u8>>
where
    T: RasterElement,
{
    validate_shape(raster)?;
    let mut buf = Vec::new();
    encode_geotiff(raster, Cursor::new(&mut buf), &options.unwrap_or_default())?;
    Ok(buf)
}

/// A raster must be non-empty and fit TIFF's 32-bit dimensions
fn validate_shape<T: RasterElement>(raster: &Raster<T>) -> Result<()> {
    let (rows, cols) = raster.shape();
    if rows == 0 || cols == 0 || u32::try_from(rows).is_err() || u32::try_from(cols).is_err() {
        return Err(Error::InvalidDimensions {
            width: cols,
            height: rows,
        });
    }
    Ok(())
}

/// Internal: encode a Raster as GeoTIFF into any `Write + Seek` sink
fn encode_geotiff<T, W>(raster: &Raster<T>, writer: W, options: &GeoTiffOptions) -> Result<()>
where
    T: RasterElement,
    W: Write + Seek,
{
    let mut encoder = TiffEncoder::new(writer)?;
    let (rows, cols) = raster.shape();
    let (width, height) = (cols as u32, rows as u32);

    match T::PIXEL_TYPE {
        PixelType::Float32 => {
            let data: Vec<f32> = raster
                .data()
                .iter()
                .map(|&v| num_traits::cast(v).unwrap_or(f32::NAN))
                .collect();
            let mut image = encoder.new_image::<Gray32Float>(width, height)?;
            write_geo_tags(image.encoder(), raster, options)?;
            image.write_data(&data)?;
        }
        PixelType::Float64 => {
            let data: Vec<f64> = raster
                .data()
                .iter()
                .map(|&v| num_traits::cast(v).unwrap_or(f64::NAN))
                .collect();
            let mut image = encoder.new_image::<Gray64Float>(width, height)?;
            write_geo_tags(image.encoder(), raster, options)?;
            image.write_data(&data)?;
        }
    }

    Ok(())
}

/// Write georeferencing and descriptive tags into the image directory
fn write_geo_tags<W, K, T>(
    dir: &mut DirectoryEncoder<'_, W, K>,
    raster: &Raster<T>,
    options: &GeoTiffOptions,
) -> Result<()>
where
    W: Write + Seek,
    K: TiffKind,
    T: RasterElement,
{
    let gt = raster.transform();

    if gt.is_north_up() {
        let scale = [gt.pixel_width, -gt.pixel_height, 0.0];
        dir.write_tag(geo_tag(tags::MODEL_PIXEL_SCALE), &scale[..])?;

        let tiepoint = [0.0, 0.0, 0.0, gt.origin_x, gt.origin_y, 0.0];
        dir.write_tag(geo_tag(tags::MODEL_TIEPOINT), &tiepoint[..])?;
    } else {
        // GDAL does the same for rotated or south-up rasters
        let matrix = gt.to_model_transformation();
        dir.write_tag(geo_tag(tags::MODEL_TRANSFORMATION), &matrix[..])?;
    }

    let geokeys = geokey_directory(raster.crs())?;
    dir.write_tag(geo_tag(tags::GEO_KEY_DIRECTORY), geokeys.as_slice())?;

    if let Some(nodata) = raster.nodata().and_then(|v| v.to_f64()) {
        dir.write_tag(geo_tag(tags::GDAL_NODATA), nodata.to_string().as_str())?;
    }

    if let Some(description) = &options.description {
        dir.write_tag(geo_tag(tags::IMAGE_DESCRIPTION), description.as_str())?;
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::crs::CRS;
    use approx::assert_relative_eq;

    fn sample_raster() -> Raster<f32> {
        let mut raster = Raster::from_vec(vec![0.0, 1.5, 250.0, 1000.25], 2, 2).unwrap();
        raster.set_transform(GeoTransform::new(-180.0, -90.0, 0.5, 0.5));
        raster.set_crs(Some(CRS::wgs84()));
        raster
    }

    #[test]
    fn test_buffer_roundtrip_south_up() {
        let raster = sample_raster();
        let bytes = write_geotiff_to_buffer(&raster, None).unwrap();
        let loaded: Raster<f32> = read_geotiff_from_buffer(&bytes).unwrap();

        assert_eq!(loaded.shape(), (2, 2));
        assert_eq!(loaded.get(1, 1).unwrap(), 1000.25);
        assert_eq!(loaded.transform().to_gdal(), [-180.0, 0.5, 0.0, -90.0, 0.0, 0.5]);
        assert_eq!(loaded.crs().and_then(|c| c.epsg()), Some(4326));
    }

    #[test]
    fn test_buffer_roundtrip_north_up_f64() {
        let mut raster: Raster<f64> = Raster::filled(3, 4, 7.0);
        raster.set_transform(GeoTransform::new(500_000.0, 4_000_000.0, 30.0, -30.0));
        raster.set_crs(Some(CRS::from_epsg(32719)));
        raster.set_nodata(Some(-9999.0));

        let bytes = write_geotiff_to_buffer(&raster, None).unwrap();
        let loaded: Raster<f64> = read_geotiff_from_buffer(&bytes).unwrap();

        assert_eq!(loaded.shape(), (3, 4));
        assert!(loaded.transform().approx_eq(raster.transform(), 1e-9));
        assert_eq!(loaded.crs(), Some(&CRS::from_epsg(32719)));
        assert_relative_eq!(loaded.nodata().unwrap(), -9999.0);
    }

    #[test]
    fn test_georeferencing_tags_are_found_by_decoder() {
        let mut raster = sample_raster();
        raster.set_nodata(Some(-9999.0));

        let bytes = write_geotiff_to_buffer(&raster, None).unwrap();
        let mut decoder = Decoder::new(Cursor::new(&bytes[..])).unwrap();

        let matrix = decoder
            .get_tag_f64_vec(geo_tag(tags::MODEL_TRANSFORMATION))
            .unwrap();
        assert_eq!(&matrix[..8], &[0.5, 0.0, 0.0, -180.0, 0.0, 0.5, 0.0, -90.0]);
        let keys = decoder.get_tag_u16_vec(geo_tag(tags::GEO_KEY_DIRECTORY)).unwrap();
        assert_eq!(crs_from_geokeys(&keys), Some(CRS::wgs84()));

        let loaded: Raster<f32> = read_geotiff_from_buffer(&bytes).unwrap();
        assert_eq!(loaded.nodata(), Some(-9999.0));
        assert_eq!(loaded.crs(), Some(&CRS::wgs84()));
    }

    #[test]
    fn test_empty_raster_rejected() {
        let raster: Raster<f32> = Raster::new(0, 5);
        assert!(matches!(
            write_geotiff_to_buffer(&raster, None),
            Err(Error::InvalidDimensions { width: 5, height: 0 })
        ));
    }
}
