use jpeg_encoder::{ColorType, Encoder};
use std::fs::File;
use std::io::BufWriter;
use std::path::Path;

use crate::core::processing::composite::DetectionFigure;
use crate::error::{Error, Result};

pub fn write_rgb_jpeg(output: &Path, cols: usize, rows: usize, rgb_data: &[u8]) -> Result<()> {
    let (width, height) = match (u16::try_from(cols), u16::try_from(rows)) {
        (Ok(w), Ok(h)) => (w, h),
        _ => {
            return Err(Error::Preview(format!(
                "{}x{} exceeds the JPEG size limit of 65535",
                cols, rows
            )));
        }
    };
    let file = File::create(output)?;
    let mut writer = BufWriter::new(file);
    let encoder = Encoder::new(&mut writer, 100);
    encoder
        .encode(rgb_data, width, height, ColorType::Rgb)
        .map_err(|e| Error::Preview(e.to_string()))?;
    Ok(())
}

/// Write the two-panel figure (original | mask) as a JPEG quicklook.
pub fn write_figure_jpeg(output: &Path, figure: &DetectionFigure) -> Result<()> {
    if let Some(parent) = output.parent()
        && !parent.as_os_str().is_empty()
    {
        std::fs::create_dir_all(parent)?;
    }
    let (cols, rows, rgb) = figure.side_by_side_rgb();
    write_rgb_jpeg(output, cols, rows, &rgb)
}
