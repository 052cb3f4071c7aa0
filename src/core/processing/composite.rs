use ndarray::{Array3, Axis};
use tracing::{debug, warn};

use crate::error::{Error, Result};
use crate::types::{BAND_BLUE, BAND_GREEN, BAND_RED, ColonyMask, RasterImage};

/// Channel order of the true-color composite: (red, green, blue).
pub const TRUE_COLOR_BANDS: [&str; 3] = [BAND_RED, BAND_GREEN, BAND_BLUE];

/// Percentile used as the white point of the display stretch.
pub const DISPLAY_PERCENTILE: f64 = 98.0;

/// Linear-interpolated percentile (0..=100) of the finite values, as numpy computes it.
///
/// Returns `None` when there are no finite values.
pub fn percentile(values: impl IntoIterator<Item = f64>, p: f64) -> Option<f64> {
    let mut finite: Vec<f64> = values.into_iter().filter(|v| v.is_finite()).collect();
    if finite.is_empty() {
        return None;
    }
    finite.sort_by(|a, b| a.total_cmp(b));
    let rank = (p.clamp(0.0, 100.0) / 100.0) * (finite.len() - 1) as f64;
    let lo = rank.floor() as usize;
    let hi = rank.ceil() as usize;
    let frac = rank - lo as f64;
    Some(finite[lo] + (finite[hi] - finite[lo]) * frac)
}

/// Copy the B4-B3-B2 composite of the unmasked image for display.
pub fn true_color_composite(image: &RasterImage) -> Result<Array3<f64>> {
    image.composite(TRUE_COLOR_BANDS)
}

/// Divide by the 98th percentile of all values and clip to [0, 1].
///
/// A non-positive or undefined percentile leaves the values unscaled before clipping.
pub fn stretch_for_display(composite: &Array3<f64>) -> Array3<f64> {
    let white = percentile(composite.iter().copied(), DISPLAY_PERCENTILE);
    debug!("Display stretch p{} = {:?}", DISPLAY_PERCENTILE, white);
    let scale = match white {
        Some(w) if w > 0.0 => w,
        _ => {
            warn!("Display percentile is not positive; showing unscaled reflectance");
            1.0
        }
    };
    composite.mapv(|v| {
        let s = v / scale;
        if s.is_nan() { 0.0 } else { s.clamp(0.0, 1.0) }
    })
}

/// Interleaved 8-bit RGB from a (height, width, 3) array in [0, 1].
pub fn to_rgb8(stretched: &Array3<f64>) -> Vec<u8> {
    stretched
        .iter()
        .map(|&v| (v.clamp(0.0, 1.0) * 255.0).round() as u8)
        .collect()
}

/// Interleaved 8-bit RGB rendering of the binary mask (black/white).
pub fn mask_to_rgb8(mask: &ColonyMask) -> Vec<u8> {
    let mut rgb = Vec::with_capacity(mask.0.len() * 3);
    for &v in mask.0.iter() {
        let g = if v != 0 { 255 } else { 0 };
        rgb.extend_from_slice(&[g, g, g]);
    }
    rgb
}

/// Two-panel figure: stretched true-color image on the left, colony mask on the right.
#[derive(Debug, Clone)]
pub struct DetectionFigure {
    pub width: usize,
    pub height: usize,
    /// Interleaved RGB of the original image
    pub original_rgb: Vec<u8>,
    /// Interleaved RGB (grayscale) of the mask
    pub mask_rgb: Vec<u8>,
}

impl DetectionFigure {
    pub const LEFT_TITLE: &'static str = "Original image";
    pub const RIGHT_TITLE: &'static str = "emperor penguin colony";
    /// Gap between the panels in the flattened quicklook
    pub const GUTTER: usize = 8;

    pub fn new(original: &Array3<f64>, mask: &ColonyMask) -> Result<Self> {
        let (height, width) = (original.len_of(Axis(0)), original.len_of(Axis(1)));
        if mask.dim() != (height, width) {
            return Err(Error::Processing(format!(
                "mask {:?} does not match image {}x{}",
                mask.dim(),
                height,
                width
            )));
        }
        let stretched = stretch_for_display(original);
        Ok(Self {
            width,
            height,
            original_rgb: to_rgb8(&stretched),
            mask_rgb: mask_to_rgb8(mask),
        })
    }

    /// Both panels side by side on a white background, as one interleaved RGB buffer.
    pub fn side_by_side_rgb(&self) -> (usize, usize, Vec<u8>) {
        let cols = self.width * 2 + Self::GUTTER;
        let rows = self.height;
        let mut out = vec![255u8; cols * rows * 3];
        let row_bytes = self.width * 3;
        for row in 0..rows {
            let src = row * row_bytes;
            let left = row * cols * 3;
            let right = left + (self.width + Self::GUTTER) * 3;
            out[left..left + row_bytes].copy_from_slice(&self.original_rgb[src..src + row_bytes]);
            out[right..right + row_bytes].copy_from_slice(&self.mask_rgb[src..src + row_bytes]);
        }
        (cols, rows, out)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use ndarray::{Array2, Array3, arr2};

    #[test]
    fn percentile_interpolates_like_numpy() {
        let v = (1..=10).map(|i| i as f64);
        // numpy.percentile(range(1, 11), 98) == 9.82
        assert!((percentile(v, 98.0).unwrap() - 9.82).abs() < 1e-12);
        assert_eq!(percentile([5.0], 98.0), Some(5.0));
        assert_eq!(percentile([f64::NAN], 50.0), None);
        assert_eq!(percentile([1.0, f64::NAN, 3.0], 50.0), Some(2.0));
    }

    #[test]
    fn stretch_clips_to_unit_range() {
        let mut c = Array3::<f64>::zeros((1, 50, 3));
        for (i, v) in c.iter_mut().enumerate() {
            *v = i as f64 / 100.0;
        }
        let s = stretch_for_display(&c);
        assert!(s.iter().all(|&v| (0.0..=1.0).contains(&v)));
        assert_eq!(s[[0, 49, 2]], 1.0);
        assert_eq!(s[[0, 0, 0]], 0.0);
    }

    #[test]
    fn all_zero_composite_stays_black() {
        let c = Array3::<f64>::zeros((2, 2, 3));
        let s = stretch_for_display(&c);
        assert!(s.iter().all(|&v| v == 0.0));
    }

    #[test]
    fn figure_places_panels_side_by_side() {
        let original = Array3::<f64>::from_elem((2, 2, 3), 0.5);
        let mask = ColonyMask(arr2(&[[1u8, 0], [0, 1]]));
        let fig = DetectionFigure::new(&original, &mask).unwrap();
        assert_eq!(fig.original_rgb.len(), 12);
        assert_eq!(&fig.mask_rgb[..6], &[255, 255, 255, 0, 0, 0]);

        let (cols, rows, rgb) = fig.side_by_side_rgb();
        assert_eq!((cols, rows), (4 + DetectionFigure::GUTTER, 2));
        // right panel starts after the left panel and the gutter
        let start = (2 + DetectionFigure::GUTTER) * 3;
        assert_eq!(&rgb[start..start + 3], &[255, 255, 255]);
        assert_eq!(&rgb[start + 3..start + 6], &[0, 0, 0]);
    }

    #[test]
    fn figure_rejects_mismatched_mask() {
        let original = Array3::<f64>::zeros((2, 3, 3));
        let mask = ColonyMask(Array2::zeros((3, 2)));
        assert!(DetectionFigure::new(&original, &mask).is_err());
    }
}
