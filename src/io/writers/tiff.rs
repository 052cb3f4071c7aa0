use gdal::raster::{Buffer, ColorInterpretation};
use gdal::{Dataset, DriverManager, Metadata};
use std::path::Path;

use crate::io::GdalError;
use crate::types::SpatialReference;

/// Create a single-band U8 GeoTIFF and fill it with `data` (row-major, `cols * rows`).
pub fn write_tiff_u8(
    output: &Path,
    cols: usize,
    rows: usize,
    data: &[u8],
) -> Result<Dataset, GdalError> {
    if data.len() != cols * rows {
        return Err(GdalError::DimensionMismatch(cols, rows, data.len(), 1));
    }
    let driver = DriverManager::get_driver_by_name("GTiff")?;
    let ds = driver.create_with_band_type::<u8, _>(output, cols, rows, 1)?;
    let mut buf = Buffer::new((cols, rows), data.to_vec());
    let mut band = ds.rasterband(1)?;
    band.set_color_interpretation(ColorInterpretation::GrayIndex)?;
    band.write((0, 0), (cols, rows), &mut buf)?;
    Ok(ds)
}

/// Write a single-band U8 mask GeoTIFF carrying the input's geotransform and projection.
///
/// The transform is written even when it is the identity so the output matches the input
/// exactly; the projection is skipped only when the input had none.
pub fn write_mask_geotiff(
    output: &Path,
    cols: usize,
    rows: usize,
    data: &[u8],
    spatial_ref: &SpatialReference,
    band_description: &str,
) -> Result<Dataset, GdalError> {
    let mut ds = write_tiff_u8(output, cols, rows, data)?;
    ds.set_geo_transform(&spatial_ref.geotransform)?;
    if !spatial_ref.projection.is_empty() {
        ds.set_projection(&spatial_ref.projection)?;
    }
    {
        let mut band = ds.rasterband(1)?;
        band.set_description(band_description)?;
    }
    Ok(ds)
}
