//! High-level, ergonomic library API: run the full detection on a raster and
//! write the mask, or stop after classification and keep everything in memory.
//! Prefer these entrypoints over the stage modules when embedding the detector.
use std::path::Path;

use tracing::{info, warn};

use crate::core::params::PipelineConfig;
use crate::core::processing::pipeline::{
    Detection, DetectionSummary, persist_outputs, run_detection,
};
use crate::error::Result;
use crate::io::writers::jpeg::write_figure_jpeg;

/// Output-stage switches that do not change the classification
#[derive(Debug, Clone, Default)]
pub struct OutputOptions {
    /// Show the interactive two-panel window (requires the `gui` feature)
    pub display: bool,
    /// Also write the two-panel figure as a JPEG quicklook
    pub preview_path: Option<std::path::PathBuf>,
    /// Also write `<basename>_NIRRB_output.json` next to the mask
    pub summary: bool,
}

/// Load, mask and classify a raster, keeping the result in memory (no disk writes).
pub fn detect_colonies(config: &PipelineConfig) -> Result<Detection> {
    run_detection(config)
}

/// Run the four stages end to end and write the mask GeoTIFF.
///
/// Visualization runs before persistence; the display call blocks until its
/// window is closed. A display failure is logged and the mask is still written.
pub fn detect_colonies_to_path(
    config: &PipelineConfig,
    options: &OutputOptions,
) -> Result<DetectionSummary> {
    let detection = run_detection(config)?;
    deliver_outputs(config, &detection, options, display)
}

fn deliver_outputs<D>(
    config: &PipelineConfig,
    detection: &Detection,
    options: &OutputOptions,
    show: D,
) -> Result<DetectionSummary>
where
    D: FnOnce(&Detection) -> Result<()>,
{
    if let Some(preview) = &options.preview_path {
        write_figure_jpeg(preview, &detection.figure)?;
        info!("Quicklook written: {:?}", preview);
    }
    if options.display
        && let Err(e) = show(detection)
    {
        warn!("Display unavailable, continuing without it: {}", e);
    }

    persist_outputs(config, detection, options.summary)
}

/// Detect colonies in `input` and write the mask under `output_dir` with default bands.
pub fn detect_file(input: &Path, output_dir: &Path) -> Result<DetectionSummary> {
    let config = PipelineConfig::new(input, output_dir);
    detect_colonies_to_path(&config, &OutputOptions::default())
}

#[cfg(feature = "gui")]
fn display(detection: &Detection) -> Result<()> {
    crate::gui::show_detection(detection.figure.clone())
}

#[cfg(not(feature = "gui"))]
fn display(_detection: &Detection) -> Result<()> {
    tracing::warn!("Built without the `gui` feature; skipping the interactive display");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::processing::pipeline::detect;
    use crate::error::Error;
    use crate::types::{DEFAULT_REQUIRED_BANDS, RasterImage, SpatialReference};
    use ndarray::Array3;

    fn detection() -> Detection {
        let mut data = Array3::<f64>::zeros((2, 2, 6));
        for (b, v) in [0.1, 0.3, 0.4, 0.8, 0.1, 0.2].into_iter().enumerate() {
            data[[0, 0, b]] = v;
        }
        let mut image = RasterImage::new(
            data,
            DEFAULT_REQUIRED_BANDS.iter().map(|s| s.to_string()).collect(),
            SpatialReference::new([100.0, 10.0, 0.0, 200.0, 0.0, -10.0], ""),
        )
        .unwrap();
        detect(&mut image).unwrap()
    }

    #[test]
    fn mask_is_written_when_display_fails() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::new(dir.path().join("scene.tif"), dir.path().join("output"));
        let options = OutputOptions {
            display: true,
            ..Default::default()
        };
        let summary = deliver_outputs(&config, &detection(), &options, |_| {
            Err(Error::Display("no display server".into()))
        })
        .unwrap();
        assert!(summary.output_path.exists());
        assert_eq!(summary.colony_pixels, 1);
    }

    #[test]
    fn display_is_skipped_when_disabled() {
        let dir = tempfile::tempdir().unwrap();
        let config = PipelineConfig::new(dir.path().join("scene.tif"), dir.path().join("output"));
        let summary = deliver_outputs(&config, &detection(), &OutputOptions::default(), |_| {
            panic!("display must not be called")
        })
        .unwrap();
        assert!(summary.output_path.exists());
    }
}
