//! Output writers: GeoTIFF mask, metadata tags and sidecars, JPEG quicklooks.
pub mod jpeg;
pub mod metadata;
pub mod tiff;
