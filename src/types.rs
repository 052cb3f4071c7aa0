//! Shared types used across the detector.
//! Includes the band-stacked `RasterImage`, its `SpatialReference`, the binary
//! `ColonyMask`, and the band names the classifier depends on.
use ndarray::{Array2, Array3, ArrayView2, Axis};
use serde::{Deserialize, Serialize};

use crate::error::{Error, Result};

/// Band descriptions the default input product carries, in stack order.
pub const DEFAULT_REQUIRED_BANDS: [&str; 6] = ["B1", "B2", "B3", "B4", "B8", "B12"];

/// Bands the masking rules, classifier and true-color composite read.
pub const BAND_BLUE: &str = "B2";
pub const BAND_GREEN: &str = "B3";
pub const BAND_RED: &str = "B4";
pub const BAND_NIR: &str = "B8";
pub const BAND_SWIR: &str = "B12";

/// Affine geotransform and projection, carried unmodified from input to output.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SpatialReference {
    /// GDAL geotransform ([origin_x, pixel_width, rot_x, origin_y, rot_y, pixel_height])
    pub geotransform: [f64; 6],
    /// Projection as stored in the file (usually WKT); empty when absent
    pub projection: String,
}

impl SpatialReference {
    /// GDAL's default transform for rasters without georeferencing
    pub const IDENTITY_TRANSFORM: [f64; 6] = [0.0, 1.0, 0.0, 0.0, 0.0, 1.0];

    pub fn new(geotransform: [f64; 6], projection: impl Into<String>) -> Self {
        Self {
            geotransform,
            projection: projection.into(),
        }
    }

    pub fn is_identity(&self) -> bool {
        self.geotransform == Self::IDENTITY_TRANSFORM
    }

    /// EPSG code from the projection's last AUTHORITY tag, e.g. "EPSG:3031".
    pub fn epsg(&self) -> Option<String> {
        if self.projection.starts_with("EPSG:") {
            return Some(self.projection.clone());
        }
        parse_epsg(&self.projection)
    }
}

// Helper to extract EPSG code from WKT authority tag
fn parse_epsg(wkt: &str) -> Option<String> {
    const KEYS: [&str; 2] = ["AUTHORITY[\"EPSG\",\"", "ID[\"EPSG\","];
    KEYS.iter().find_map(|key| {
        let idx = wkt.rfind(key)?;
        let start = idx + key.len();
        let code: String = wkt[start..]
            .chars()
            .take_while(|c| c.is_ascii_digit())
            .collect();
        if code.is_empty() {
            None
        } else {
            Some(format!("EPSG:{}", code))
        }
    })
}

/// Reflectance stack of shape (height, width, bands) with the band name of each layer.
#[derive(Debug, Clone)]
pub struct RasterImage {
    pub data: Array3<f64>,
    pub band_names: Vec<String>,
    pub spatial_ref: SpatialReference,
}

impl RasterImage {
    pub fn new(
        data: Array3<f64>,
        band_names: Vec<String>,
        spatial_ref: SpatialReference,
    ) -> Result<Self> {
        if data.len_of(Axis(2)) != band_names.len() {
            return Err(Error::InvalidConfig {
                reason: format!(
                    "image has {} bands but {} band names were given",
                    data.len_of(Axis(2)),
                    band_names.len()
                ),
            });
        }
        Ok(Self {
            data,
            band_names,
            spatial_ref,
        })
    }

    pub fn height(&self) -> usize {
        self.data.len_of(Axis(0))
    }

    pub fn width(&self) -> usize {
        self.data.len_of(Axis(1))
    }

    /// Position of `name` in the band stack.
    pub fn band_index(&self, name: &str) -> Result<usize> {
        self.band_names
            .iter()
            .position(|b| b == name)
            .ok_or_else(|| Error::MissingBand {
                band: name.to_string(),
                available: self.band_names.join(","),
            })
    }

    pub fn band(&self, name: &str) -> Result<ArrayView2<'_, f64>> {
        let idx = self.band_index(name)?;
        Ok(self.data.index_axis(Axis(2), idx))
    }

    /// Owned (height, width, 3) copy of the named bands, in the given order.
    pub fn composite(&self, names: [&str; 3]) -> Result<Array3<f64>> {
        let idx = [
            self.band_index(names[0])?,
            self.band_index(names[1])?,
            self.band_index(names[2])?,
        ];
        Ok(self.data.select(Axis(2), &idx))
    }
}

/// Binary colony mask: 1 for colony, 0 otherwise.
#[derive(Debug, Clone, PartialEq)]
pub struct ColonyMask(pub Array2<u8>);

impl ColonyMask {
    pub fn dim(&self) -> (usize, usize) {
        self.0.dim()
    }

    pub fn colony_pixels(&self) -> usize {
        self.0.iter().filter(|&&v| v != 0).count()
    }

    /// Mask values scaled to {0, 255} in row-major order, ready for an 8-bit raster.
    pub fn to_u8_scaled(&self) -> Vec<u8> {
        self.0.iter().map(|&v| if v != 0 { 255 } else { 0 }).collect()
    }
}
