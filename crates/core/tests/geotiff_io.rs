//! File-level GeoTIFF tests: georeferencing survives a write/read cycle,
//! existing files are overwritten and failed writes leave nothing behind.

use sunshine_core::io::{read_geotiff, write_geotiff, GeoTiffOptions};
use sunshine_core::{ErrorKind, GeoTransform, Raster, CRS};

fn global_stub() -> Raster<f32> {
    let mut raster = Raster::from_vec(vec![0.0, 12.5, 800.0, 1043.75], 2, 2).unwrap();
    raster.set_transform(GeoTransform::from_gdal([-180.0, 0.5, 0.0, -90.0, 0.0, 0.5]));
    raster.set_crs(Some(CRS::wgs84()));
    raster
}

#[test]
fn stub_raster_keeps_shape_transform_and_crs() {
    let raster = global_stub();
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("stub.tif");

    write_geotiff(&raster, &path, None).expect("write failed");
    let loaded: Raster<f32> = read_geotiff(&path).expect("re-read failed");

    assert_eq!(loaded.shape(), (2, 2));
    assert_eq!(
        loaded.transform().to_gdal(),
        [-180.0, 0.5, 0.0, -90.0, 0.0, 0.5]
    );
    assert_eq!(loaded.crs().and_then(|c| c.epsg()), Some(4326));
    for row in 0..2 {
        for col in 0..2 {
            assert_eq!(loaded.get(row, col).unwrap(), raster.get(row, col).unwrap());
        }
    }
}

#[test]
fn existing_file_is_overwritten() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("out.tif");
    std::fs::write(&path, b"not a tiff at all").unwrap();

    let options = GeoTiffOptions {
        description: Some("direct irradiance (W/m2)".into()),
        ..Default::default()
    };
    write_geotiff(&global_stub(), &path, Some(options)).unwrap();

    let loaded: Raster<f32> = read_geotiff(&path).unwrap();
    assert_eq!(loaded.get(1, 0).unwrap(), 800.0);
}

#[test]
fn missing_parent_directory_is_an_io_error() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("does-not-exist").join("out.tif");

    let err = write_geotiff(&global_stub(), &path, None).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Io);
    assert!(!path.exists(), "no partial file may be left behind");
}

#[test]
fn empty_raster_is_rejected_before_touching_disk() {
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("empty.tif");
    let raster: Raster<f32> = Raster::new(0, 0);

    let err = write_geotiff(&raster, &path, None).unwrap_err();

    assert_eq!(err.kind(), ErrorKind::Input);
    assert!(!path.exists());
}

#[test]
fn nodata_and_crs_survive_a_file_round_trip() {
    let mut raster = global_stub();
    raster.set_nodata(Some(-9999.0));
    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("nodata.tif");

    write_geotiff(&raster, &path, None).unwrap();
    let loaded: Raster<f32> = read_geotiff(&path).unwrap();

    assert_eq!(loaded.transform(), raster.transform());
    assert_eq!(loaded.crs(), Some(&CRS::wgs84()));
    assert_eq!(loaded.nodata(), Some(-9999.0));
    assert!(loaded.is_nodata(-9999.0));
}
