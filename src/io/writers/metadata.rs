use gdal::{Dataset, Metadata};
use std::collections::BTreeMap;
use std::path::Path;
use tracing::info;

use crate::core::params::PipelineConfig;
use crate::core::processing::pipeline::DetectionSummary;
use crate::error::Result;
use crate::io::GdalError;

/// Name recorded in the CLASSIFIER tag of every mask raster.
pub const CLASSIFIER_NAME: &str = "NIR-R-B CIE chromaticity";

/// Collect the provenance tags written into the mask GeoTIFF
pub fn extract_metadata_fields(
    config: &PipelineConfig,
    summary: &DetectionSummary,
) -> BTreeMap<String, String> {
    let mut metadata = BTreeMap::new();

    let source = config
        .input_path
        .file_name()
        .map(|n| n.to_string_lossy().into_owned())
        .unwrap_or_default();
    metadata.insert("SOURCE_FILE".to_string(), source);
    metadata.insert("CLASSIFIER".to_string(), CLASSIFIER_NAME.to_string());
    metadata.insert(
        "REQUIRED_BANDS".to_string(),
        config.required_bands.join(","),
    );
    metadata.insert(
        "COLONY_PIXELS".to_string(),
        summary.colony_pixels.to_string(),
    );
    metadata.insert(
        "MASKED_PIXELS".to_string(),
        summary.masking.rejected().to_string(),
    );
    metadata.insert(
        "PROCESSING_TIME".to_string(),
        summary.processed_at.clone(),
    );
    if let Some(epsg) = summary.spatial_ref.epsg() {
        metadata.insert("CRS".to_string(), epsg);
    }

    metadata
}

/// Embed provenance metadata into the mask dataset (default domain)
pub fn embed_mask_metadata(
    ds: &mut Dataset,
    config: &PipelineConfig,
    summary: &DetectionSummary,
) -> std::result::Result<(), GdalError> {
    for (key, value) in extract_metadata_fields(config, summary) {
        ds.set_metadata_item(&key, &value, "")?;
    }
    Ok(())
}

/// Write the run summary as pretty JSON
pub fn write_summary_sidecar(sidecar_path: &Path, summary: &DetectionSummary) -> Result<()> {
    let json_string = serde_json::to_string_pretty(summary)?;
    std::fs::write(sidecar_path, json_string)?;
    info!("Created detection summary sidecar: {:?}", sidecar_path);
    Ok(())
}
