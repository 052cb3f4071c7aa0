//! I/O layer for reading band-described rasters through GDAL and writing
//! the classification outputs: the mask GeoTIFF, its metadata, the JSON
//! summary sidecar and the JPEG quicklook.
pub mod gdal;
pub use self::gdal::{GdalError, GdalMetadata, GdalRasterReader, load_bands};

pub mod writers;
