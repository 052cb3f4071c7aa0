use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::path::{Path, PathBuf};

use crate::error::{Error, Result};
use crate::types::{
    BAND_BLUE, BAND_GREEN, BAND_NIR, BAND_RED, BAND_SWIR, DEFAULT_REQUIRED_BANDS,
};

/// Input raster used when no path is given.
pub const DEFAULT_INPUT_PATH: &str = "data_image/Astrid20201018.tif";
/// Directory the mask raster is written to when none is given.
pub const DEFAULT_OUTPUT_DIR: &str = "output";
/// Appended to the input basename to name the outputs.
pub const OUTPUT_SUFFIX: &str = "_NIRRB_output";

/// Pipeline configuration suitable for JSON config files
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct PipelineConfig {
    pub input_path: PathBuf,
    pub output_dir: PathBuf,
    /// Band descriptions to load, in stack order
    pub required_bands: Vec<String>,
}

impl Default for PipelineConfig {
    fn default() -> Self {
        Self {
            input_path: PathBuf::from(DEFAULT_INPUT_PATH),
            output_dir: PathBuf::from(DEFAULT_OUTPUT_DIR),
            required_bands: DEFAULT_REQUIRED_BANDS.iter().map(|b| b.to_string()).collect(),
        }
    }
}

impl PipelineConfig {
    pub fn new(input_path: impl Into<PathBuf>, output_dir: impl Into<PathBuf>) -> Self {
        Self {
            input_path: input_path.into(),
            output_dir: output_dir.into(),
            ..Self::default()
        }
    }

    /// Load a configuration from a JSON file; absent fields take their defaults.
    pub fn from_json_file(path: &Path) -> Result<Self> {
        let json = std::fs::read_to_string(path)?;
        let config: PipelineConfig = serde_json::from_str(&json)?;
        Ok(config)
    }

    /// Check that the band list is usable by the masking rules and classifier.
    pub fn validate(&self) -> Result<()> {
        if self.required_bands.is_empty() {
            return Err(Error::InvalidConfig {
                reason: "required_bands is empty".to_string(),
            });
        }
        let mut seen = HashSet::new();
        for band in &self.required_bands {
            if !seen.insert(band.as_str()) {
                return Err(Error::InvalidConfig {
                    reason: format!("band {} listed more than once", band),
                });
            }
        }
        for needed in [BAND_BLUE, BAND_GREEN, BAND_RED, BAND_NIR, BAND_SWIR] {
            if !seen.contains(needed) {
                return Err(Error::InvalidConfig {
                    reason: format!("required_bands must include {}", needed),
                });
            }
        }
        if self.input_path.file_stem().is_none() {
            return Err(Error::InvalidConfig {
                reason: format!("input path {:?} has no file name", self.input_path),
            });
        }
        Ok(())
    }

    /// Input file name without its extension.
    pub fn base_name(&self) -> String {
        self.input_path
            .file_stem()
            .map(|s| s.to_string_lossy().into_owned())
            .unwrap_or_default()
    }

    /// `<output_dir>/<input_basename>_NIRRB_output.tif`
    pub fn output_path(&self) -> PathBuf {
        self.output_dir
            .join(format!("{}{}.tif", self.base_name(), OUTPUT_SUFFIX))
    }

    /// `<output_dir>/<input_basename>_NIRRB_output.json`
    pub fn summary_path(&self) -> PathBuf {
        self.output_path().with_extension("json")
    }
}
