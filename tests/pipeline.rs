use std::path::{Path, PathBuf};

use gdal::raster::Buffer;
use gdal::spatial_ref::SpatialRef;
use gdal::{Dataset, DriverManager, Metadata};

use penguin_cie::{
    Error, OutputOptions, PipelineConfig, detect_colonies, detect_colonies_to_path, detect_file,
    load_bands,
};

const WIDTH: usize = 3;
const HEIGHT: usize = 2;
const GEOTRANSFORM: [f64; 6] = [-2_400_000.0, 10.0, 0.0, 1_500_000.0, 0.0, -10.0];

/// Per-pixel reflectance as (B1, B2, B3, B4, B8, B12), row-major.
fn scene_pixels() -> Vec<[f32; 6]> {
    vec![
        // colony: survives masking, above the boundary
        [0.1, 0.3, 0.4, 0.8, 0.1, 0.2],
        // bright ice: survives masking, below the boundary
        [0.3, 0.5, 0.4, 0.5, 0.6, 0.1],
        // overbright
        [0.3, 0.5, 0.4, 1.2, 0.6, 0.1],
        // exposed rock (ERI = 0.333)
        [0.1, 0.3, 0.4, 0.8, 0.4, 0.2],
        // shadow
        [0.1, 0.2, 0.4, 0.8, 0.1, 0.2],
        // empty
        [0.0; 6],
    ]
}

/// Write a GeoTIFF whose bands are stored out of order, with an extra band.
fn write_scene(path: &Path, descriptions: &[&str]) -> String {
    let order = ["B12", "B1", "B8", "EXTRA", "B4", "B3", "B2"];
    let source_index = |name: &str| match name {
        "B1" => Some(0),
        "B2" => Some(1),
        "B3" => Some(2),
        "B4" => Some(3),
        "B8" => Some(4),
        "B12" => Some(5),
        _ => None,
    };
    let pixels = scene_pixels();
    let driver = DriverManager::get_driver_by_name("GTiff").unwrap();
    let mut ds = driver
        .create_with_band_type::<f32, _>(path, WIDTH, HEIGHT, order.len())
        .unwrap();
    ds.set_geo_transform(&GEOTRANSFORM).unwrap();
    let wkt = SpatialRef::from_epsg(3031).unwrap().to_wkt().unwrap();
    ds.set_projection(&wkt).unwrap();

    for (i, name) in order.iter().enumerate() {
        let values: Vec<f32> = match source_index(*name) {
            Some(b) => pixels.iter().map(|px| px[b]).collect(),
            None => vec![9.0; WIDTH * HEIGHT],
        };
        let mut band = ds.rasterband(i + 1).unwrap();
        let description = descriptions.get(i).copied().unwrap_or(*name);
        band.set_description(description).unwrap();
        let mut buf = Buffer::new((WIDTH, HEIGHT), values);
        band.write((0, 0), (WIDTH, HEIGHT), &mut buf).unwrap();
    }
    drop(ds);
    Dataset::open(path).unwrap().projection()
}

fn config_for(input: PathBuf, output_dir: PathBuf) -> PipelineConfig {
    PipelineConfig::new(input, output_dir)
}

#[test]
fn loader_stacks_bands_by_description() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scene.tif");
    write_scene(&input, &[]);

    let cfg = PipelineConfig::default();
    let image = load_bands(&input, &cfg.required_bands).unwrap();
    assert_eq!(image.data.dim(), (HEIGHT, WIDTH, 6));
    assert_eq!(image.spatial_ref.geotransform, GEOTRANSFORM);
    // stack order follows the configured list, not the file's band order
    assert!((image.data[[0, 0, 3]] - 0.8).abs() < 1e-6);
    assert!((image.data[[0, 1, 4]] - 0.6).abs() < 1e-6);
    assert_eq!(image.spatial_ref.epsg().as_deref(), Some("EPSG:3031"));
}

#[test]
fn missing_band_aborts_before_processing() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("scene.tif");
    // B8 is stored under a lowercase description
    write_scene(&input, &["B12", "B1", "b8"]);

    let out = dir.path().join("out");
    let err = detect_colonies(&config_for(input, out.clone())).unwrap_err();
    match err {
        Error::MissingBand { band, available } => {
            assert_eq!(band, "B8");
            assert!(available.contains("b8"));
        }
        other => panic!("unexpected error: {other}"),
    }
    assert!(!out.exists());
}

#[test]
fn missing_input_is_reported() {
    let dir = tempfile::tempdir().unwrap();
    let err = detect_colonies(&config_for(
        dir.path().join("absent.tif"),
        dir.path().join("out"),
    ))
    .unwrap_err();
    assert!(matches!(err, Error::InputNotFound { .. }));
}

#[test]
fn mask_raster_keeps_georeferencing_and_binary_values() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Astrid20201018.tif");
    let input_projection = write_scene(&input, &[]);
    let output_dir = dir.path().join("output");

    let options = OutputOptions {
        display: false,
        preview_path: Some(dir.path().join("preview.jpg")),
        summary: true,
    };
    let summary =
        detect_colonies_to_path(&config_for(input, output_dir.clone()), &options).unwrap();

    let expected = output_dir.join("Astrid20201018_NIRRB_output.tif");
    assert_eq!(summary.output_path, expected);
    assert_eq!(summary.colony_pixels, 1);
    assert_eq!(summary.masking.overbright, 1);
    assert_eq!(summary.masking.exposed_rock, 1);
    // the empty pixel is rejected as shadow too
    assert_eq!(summary.masking.shadow, 2);
    assert_eq!(summary.masking.surviving(), 2);
    assert!(output_dir.join("Astrid20201018_NIRRB_output.json").exists());
    assert!(dir.path().join("preview.jpg").exists());

    let ds = Dataset::open(&expected).unwrap();
    assert_eq!(ds.raster_size(), (WIDTH, HEIGHT));
    assert_eq!(ds.raster_count() as usize, 1);
    assert_eq!(ds.geo_transform().unwrap(), GEOTRANSFORM);
    let in_srs = SpatialRef::from_wkt(&input_projection).unwrap();
    let out_srs = SpatialRef::from_wkt(&ds.projection()).unwrap();
    assert!(in_srs == out_srs);
    assert_eq!(
        ds.metadata_item("CLASSIFIER", "").as_deref(),
        Some("NIR-R-B CIE chromaticity")
    );

    let band = ds.rasterband(1).unwrap();
    let buf = band
        .read_as::<u8>((0, 0), (WIDTH, HEIGHT), (WIDTH, HEIGHT), None)
        .unwrap();
    assert_eq!(buf.data(), &[255, 0, 0, 0, 0, 0]);
}

#[test]
fn detect_file_creates_output_directory() {
    let dir = tempfile::tempdir().unwrap();
    let input = dir.path().join("Halley.tif");
    write_scene(&input, &[]);
    let output_dir = dir.path().join("nested").join("output");

    let summary = detect_file(&input, &output_dir).unwrap();
    assert!(summary.output_path.exists());
    assert!(summary.output_path.starts_with(&output_dir));
    assert!(!output_dir.join("Halley_NIRRB_output.json").exists());
}
