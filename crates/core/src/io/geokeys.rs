//! GeoTIFF tag ids and GeoKeyDirectory encoding/decoding.
//!
//! Only the keys needed to round-trip an EPSG-coded CRS are handled:
//! model type, raster type, geographic/projected CS type and angular units.

use crate::crs::CRS;
use crate::error::{Error, Result};

/// TIFF tag ids used for georeferencing
pub(crate) mod tags {
    pub const IMAGE_DESCRIPTION: u16 = 270;
    pub const MODEL_PIXEL_SCALE: u16 = 33550;
    pub const MODEL_TIEPOINT: u16 = 33922;
    pub const MODEL_TRANSFORMATION: u16 = 34264;
    pub const GEO_KEY_DIRECTORY: u16 = 34735;
    pub const GDAL_NODATA: u16 = 42113;
}

const GT_MODEL_TYPE: u16 = 1024;
const GT_RASTER_TYPE: u16 = 1025;
const GEOGRAPHIC_TYPE: u16 = 2048;
const GEOG_ANGULAR_UNITS: u16 = 2054;
const PROJECTED_CS_TYPE: u16 = 3072;

const MODEL_TYPE_PROJECTED: u16 = 1;
const MODEL_TYPE_GEOGRAPHIC: u16 = 2;
const RASTER_PIXEL_IS_AREA: u16 = 1;
const ANGULAR_UNIT_DEGREE: u16 = 9102;
const USER_DEFINED: u16 = 32767;

/// Build the GeoKeyDirectory (tag 34735) for a raster.
///
/// Layout: `[version=1, revision=1, minor=0, key_count]` followed by one
/// `[key_id, tag_location=0, count=1, value]` quadruple per key, sorted by id.
pub(crate) fn geokey_directory(crs: Option<&CRS>) -> Result<Vec<u16>> {
    let mut keys: Vec<[u16; 4]> = Vec::with_capacity(4);

    match crs {
        Some(crs) => {
            let code = crs.epsg().ok_or_else(|| Error::InvalidParameter {
                name: "crs",
                value: crs.identifier(),
                reason: "only EPSG-coded systems can be written as GeoKeys".into(),
            })?;
            let code = u16::try_from(code).map_err(|_| Error::InvalidParameter {
                name: "crs",
                value: code.to_string(),
                reason: "EPSG code does not fit a GeoKey SHORT".into(),
            })?;

            if crs.is_geographic() {
                keys.push([GT_MODEL_TYPE, 0, 1, MODEL_TYPE_GEOGRAPHIC]);
                keys.push([GT_RASTER_TYPE, 0, 1, RASTER_PIXEL_IS_AREA]);
                keys.push([GEOGRAPHIC_TYPE, 0, 1, code]);
                keys.push([GEOG_ANGULAR_UNITS, 0, 1, ANGULAR_UNIT_DEGREE]);
            } else {
                keys.push([GT_MODEL_TYPE, 0, 1, MODEL_TYPE_PROJECTED]);
                keys.push([GT_RASTER_TYPE, 0, 1, RASTER_PIXEL_IS_AREA]);
                keys.push([PROJECTED_CS_TYPE, 0, 1, code]);
            }
        }
        None => keys.push([GT_RASTER_TYPE, 0, 1, RASTER_PIXEL_IS_AREA]),
    }

    let mut directory = vec![1, 1, 0, keys.len() as u16];
    directory.extend(keys.iter().flatten());
    Ok(directory)
}

/// Recover an EPSG-coded CRS from a GeoKeyDirectory.
///
/// Returns `None` for user-defined systems, keys stored in other tags,
/// or a malformed directory.
pub(crate) fn crs_from_geokeys(directory: &[u16]) -> Option<CRS> {
    if directory.len() < 4 {
        return None;
    }
    let num_keys = directory[3] as usize;

    for i in 0..num_keys {
        let base = 4 + i * 4;
        let entry = directory.get(base..base + 4)?;
        let (key_id, location, value) = (entry[0], entry[1], entry[3]);

        // Values living in GeoDoubleParams/GeoAsciiParams are never EPSG codes
        if location != 0 || value == 0 || value == USER_DEFINED {
            continue;
        }

        match key_id {
            PROJECTED_CS_TYPE | GEOGRAPHIC_TYPE => return Some(CRS::from_epsg(u32::from(value))),
            _ => {}
        }
    }

    None
}
