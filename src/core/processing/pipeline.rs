use std::path::PathBuf;

use serde::{Deserialize, Serialize};
use tracing::info;

use crate::core::params::PipelineConfig;
use crate::core::processing::chromaticity::{DecisionBoundary, classify};
use crate::core::processing::composite::{DetectionFigure, true_color_composite};
use crate::core::processing::masking::{MaskingReport, apply_masking_rules};
use crate::error::Result;
use crate::io::load_bands;
use crate::io::writers::metadata::{embed_mask_metadata, write_summary_sidecar};
use crate::io::writers::tiff::write_mask_geotiff;
use crate::types::{ColonyMask, RasterImage, SpatialReference};

/// Description given to the single band of the mask raster.
pub const MASK_BAND_DESCRIPTION: &str = "colony_mask";

/// Outcome of one detection run
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct DetectionSummary {
    pub input_path: PathBuf,
    pub output_path: PathBuf,
    pub width: usize,
    pub height: usize,
    pub masking: MaskingReport,
    pub colony_pixels: usize,
    pub colony_fraction: f64,
    pub spatial_ref: SpatialReference,
    pub processed_at: String,
}

/// In-memory result of the classification stages
#[derive(Debug, Clone)]
pub struct Detection {
    pub mask: ColonyMask,
    pub masking: MaskingReport,
    pub figure: DetectionFigure,
    pub spatial_ref: SpatialReference,
}

/// Preprocessor and classifier over a loaded image.
///
/// The true-color figure is captured before masking; `image` is left masked.
pub fn detect(image: &mut RasterImage) -> Result<Detection> {
    let original_rgb = true_color_composite(image)?;
    let masking = apply_masking_rules(image)?;
    let mask = classify(image, DecisionBoundary::COLONY)?;
    let figure = DetectionFigure::new(&original_rgb, &mask)?;
    Ok(Detection {
        mask,
        masking,
        figure,
        spatial_ref: image.spatial_ref.clone(),
    })
}

/// Load, mask and classify the configured input without writing anything.
pub fn run_detection(config: &PipelineConfig) -> Result<Detection> {
    config.validate()?;
    let mut image = load_bands(&config.input_path, &config.required_bands)?;
    detect(&mut image)
}

/// Write the mask GeoTIFF (values 0/255) with the input's georeferencing.
///
/// Creates the output directory when missing. The dataset is closed before returning.
pub fn persist_mask(config: &PipelineConfig, detection: &Detection) -> Result<DetectionSummary> {
    std::fs::create_dir_all(&config.output_dir)?;
    let output_path = config.output_path();
    let (rows, cols) = detection.mask.dim();
    let colony_pixels = detection.mask.colony_pixels();
    let summary = DetectionSummary {
        input_path: config.input_path.clone(),
        output_path: output_path.clone(),
        width: cols,
        height: rows,
        masking: detection.masking,
        colony_pixels,
        colony_fraction: if rows * cols > 0 {
            colony_pixels as f64 / (rows * cols) as f64
        } else {
            0.0
        },
        spatial_ref: detection.spatial_ref.clone(),
        processed_at: chrono::Utc::now().to_rfc3339(),
    };

    let mut ds = write_mask_geotiff(
        &output_path,
        cols,
        rows,
        &detection.mask.to_u8_scaled(),
        &detection.spatial_ref,
        MASK_BAND_DESCRIPTION,
    )?;
    embed_mask_metadata(&mut ds, config, &summary)?;
    drop(ds);
    info!("Mask GeoTIFF written: {:?} ({}x{})", output_path, cols, rows);
    Ok(summary)
}

/// Persist the mask and, when requested, its JSON summary next to it.
pub fn persist_outputs(
    config: &PipelineConfig,
    detection: &Detection,
    with_summary: bool,
) -> Result<DetectionSummary> {
    let summary = persist_mask(config, detection)?;
    if with_summary {
        write_summary_sidecar(&config.summary_path(), &summary)?;
    }
    Ok(summary)
}
