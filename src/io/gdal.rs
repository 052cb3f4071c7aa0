use gdal::{Dataset, Metadata, errors::GdalError as GdalCrateError};
use ndarray::{Array2, Array3, Axis, stack};
use std::path::Path;
use thiserror::Error;
use tracing::{debug, info, warn};

use crate::error::{Error, Result};
use crate::types::{RasterImage, SpatialReference};

/// Errors encountered when using the GDAL reader and writers
#[derive(Debug, Error)]
pub enum GdalError {
    #[error("GDAL error: {0}")]
    Gdal(#[from] GdalCrateError),
    #[error("Unsupported format: {0}")]
    UnsupportedFormat(String),
    #[error("Dimension mismatch: expected {0}x{1}, got {2}x{3}")]
    DimensionMismatch(usize, usize, usize, usize),
}

/// Metadata extracted from a GDAL-supported dataset
#[derive(Debug, Clone)]
pub struct GdalMetadata {
    /// Width (pixels) of the raster
    pub size_x: usize,
    /// Height (lines) of the raster
    pub size_y: usize,
    /// Number of raster bands
    pub bands: usize,
    /// Per-band description strings, index 0 is band 1
    pub band_descriptions: Vec<String>,
    /// Geotransform and projection of the dataset
    pub spatial_ref: SpatialReference,
}

/// Reader for multi-band reflectance rasters via GDAL
pub struct GdalRasterReader {
    pub dataset: Dataset,
    pub metadata: GdalMetadata,
}

impl GdalRasterReader {
    /// Open a GDAL-supported dataset read-only (e.g., GeoTIFF)
    pub fn open<P: AsRef<Path>>(path: P) -> std::result::Result<Self, GdalError> {
        let dataset = Dataset::open(path.as_ref())?;
        let (size_x, size_y) = dataset.raster_size();
        let bands = dataset.raster_count() as usize;
        if bands == 0 {
            return Err(GdalError::UnsupportedFormat("No raster bands found".into()));
        }
        let geotransform = match dataset.geo_transform() {
            Ok(gt) => gt,
            Err(_) => SpatialReference::IDENTITY_TRANSFORM,
        };
        let projection = dataset.projection();

        let mut band_descriptions = Vec::with_capacity(bands);
        for idx in 1..=bands {
            let band = dataset.rasterband(idx)?;
            band_descriptions.push(band.description().unwrap_or_default());
        }
        debug!("Band descriptions: {:?}", band_descriptions);

        Ok(GdalRasterReader {
            dataset,
            metadata: GdalMetadata {
                size_x: size_x as usize,
                size_y: size_y as usize,
                bands,
                band_descriptions,
                spatial_ref: SpatialReference::new(geotransform, projection),
            },
        })
    }

    /// 1-based index of the first band whose description equals `name` exactly
    pub fn band_index_by_name(&self, name: &str) -> Option<usize> {
        self.metadata
            .band_descriptions
            .iter()
            .position(|d| d == name)
            .map(|i| i + 1)
    }

    /// Read a single band (1-based index) as an f64 ndarray of shape (height, width)
    ///
    /// Values are widened from the storage type, so the masking thresholds are
    /// compared in f64. For float32 rasters an ERI within about 1e-8 of a rock
    /// range bound can fall on the other side compared with float32 arithmetic.
    pub fn read_band(&self, index: usize) -> std::result::Result<Array2<f64>, GdalError> {
        if index == 0 || index > self.metadata.bands {
            return Err(GdalError::UnsupportedFormat(format!(
                "Band index {} out of range",
                index
            )));
        }
        let band = self.dataset.rasterband(index)?;
        let window = (self.metadata.size_x, self.metadata.size_y);
        let buf = band.read_as::<f64>((0, 0), window, window, None)?;
        let data_vec = buf.data().to_vec();
        let len = data_vec.len();
        Array2::from_shape_vec((self.metadata.size_y, self.metadata.size_x), data_vec).map_err(
            |_| {
                GdalError::DimensionMismatch(
                    self.metadata.size_x,
                    self.metadata.size_y,
                    len,
                    1,
                )
            },
        )
    }

    /// Read the named bands, in order, into a (height, width, bands) stack
    pub fn read_named_bands(&self, required: &[String]) -> Result<Array3<f64>> {
        let mut layers = Vec::with_capacity(required.len());
        for name in required {
            let index = self
                .band_index_by_name(name)
                .ok_or_else(|| Error::MissingBand {
                    band: name.clone(),
                    available: self.metadata.band_descriptions.join(","),
                })?;
            debug!("Reading band {} from raster band {}", name, index);
            layers.push(self.read_band(index)?);
        }
        let views: Vec<_> = layers.iter().map(|l| l.view()).collect();
        stack(Axis(2), &views).map_err(|e| Error::Processing(format!("band stack: {}", e)))
    }
}

/// Load the required bands and spatial reference of a raster.
///
/// Every name in `required` must match a band description exactly (case-sensitive);
/// the dataset is closed before this returns.
pub fn load_bands(path: &Path, required: &[String]) -> Result<RasterImage> {
    if !path.exists() {
        return Err(Error::InputNotFound {
            path: path.to_path_buf(),
        });
    }
    info!("Opening raster: {:?}", path);
    let (data, spatial_ref) = {
        let reader = GdalRasterReader::open(path)?;
        info!(
            "Raster size: {}x{} with {} bands",
            reader.metadata.size_x, reader.metadata.size_y, reader.metadata.bands
        );
        let data = reader.read_named_bands(required)?;
        (data, reader.metadata.spatial_ref.clone())
    };
    if spatial_ref.is_identity() {
        warn!("Raster has no geotransform; output will not be georeferenced");
    }
    if let Some(epsg) = spatial_ref.epsg() {
        info!("Spatial reference: {}", epsg);
    }
    RasterImage::new(data, required.to_vec(), spatial_ref)
}
