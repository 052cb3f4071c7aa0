use ndarray::{Array2, ArrayView1, Axis, Zip};
use serde::{Deserialize, Serialize};
use tracing::{debug, info};

use crate::error::Result;
use crate::types::{BAND_BLUE, BAND_NIR, BAND_RED, BAND_SWIR, RasterImage};

/// B4 reflectance above this is treated as saturated.
pub const OVERBRIGHT_THRESHOLD: f64 = 1.0;
/// Inclusive ERI range identifying exposed rock.
pub const ERI_ROCK_MIN: f64 = -0.196;
pub const ERI_ROCK_MAX: f64 = 0.679;
/// B2 reflectance below this is treated as shadow.
pub const SHADOW_THRESHOLD: f64 = 0.25;

/// Pixels newly rejected by each rule, in application order.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct MaskingReport {
    pub total_pixels: usize,
    pub overbright: usize,
    pub exposed_rock: usize,
    pub shadow: usize,
}

impl MaskingReport {
    pub fn rejected(&self) -> usize {
        self.overbright + self.exposed_rock + self.shadow
    }

    pub fn surviving(&self) -> usize {
        self.total_pixels - self.rejected()
    }
}

/// Exposed Rock Index `(B8 - B12) / (B8 + B12)`.
///
/// Returns `None` when the denominator is exactly zero; such pixels are never
/// rejected by the rock rule.
#[inline]
pub fn exposed_rock_index(b8: f64, b12: f64) -> Option<f64> {
    let denominator = b8 + b12;
    if denominator == 0.0 {
        None
    } else {
        Some((b8 - b12) / denominator)
    }
}

#[inline]
pub fn is_overbright(b4: f64) -> bool {
    b4 > OVERBRIGHT_THRESHOLD
}

#[inline]
pub fn eri_in_rock_range(eri: f64) -> bool {
    (ERI_ROCK_MIN..=ERI_ROCK_MAX).contains(&eri)
}

#[inline]
pub fn is_exposed_rock(b8: f64, b12: f64) -> bool {
    exposed_rock_index(b8, b12).is_some_and(eri_in_rock_range)
}

#[inline]
pub fn is_shadow(b2: f64) -> bool {
    b2 < SHADOW_THRESHOLD
}

/// Zero every band of the pixels where `reject` holds, reading the current
/// (possibly already masked) image. Returns how many pixels this rule rejected
/// first; `rejected` marks pixels claimed by an earlier rule.
fn reject_pixels<F>(image: &mut RasterImage, rejected: &mut Array2<bool>, reject: F) -> usize
where
    F: Fn(ArrayView1<'_, f64>) -> bool,
{
    let mut newly = 0usize;
    Zip::from(image.data.lanes_mut(Axis(2)))
        .and(rejected)
        .for_each(|mut pixel, done| {
            if reject(pixel.view()) {
                if !*done {
                    *done = true;
                    newly += 1;
                }
                pixel.fill(0.0);
            }
        });
    newly
}

/// Apply the overbright, exposed-rock and shadow rules in sequence, in place.
///
/// Each rule sees the zeroing done by the rules before it. Rejected pixels have
/// all of their bands set to 0.
pub fn apply_masking_rules(image: &mut RasterImage) -> Result<MaskingReport> {
    let red = image.band_index(BAND_RED)?;
    let nir = image.band_index(BAND_NIR)?;
    let swir = image.band_index(BAND_SWIR)?;
    let blue = image.band_index(BAND_BLUE)?;

    let total_pixels = image.height() * image.width();
    let mut rejected = Array2::<bool>::from_elem((image.height(), image.width()), false);
    let overbright = reject_pixels(image, &mut rejected, |px| is_overbright(px[red]));
    debug!("Overbright rule rejected {} pixels", overbright);

    let exposed_rock = reject_pixels(image, &mut rejected, |px| is_exposed_rock(px[nir], px[swir]));
    debug!("Exposed-rock rule rejected {} pixels", exposed_rock);

    let shadow = reject_pixels(image, &mut rejected, |px| is_shadow(px[blue]));
    debug!("Shadow rule rejected {} pixels", shadow);

    let report = MaskingReport {
        total_pixels,
        overbright,
        exposed_rock,
        shadow,
    };
    info!(
        "Masking complete: {} of {} pixels survive (overbright={}, rock={}, shadow={})",
        report.surviving(),
        total_pixels,
        overbright,
        exposed_rock,
        shadow
    );
    Ok(report)
}

/// True when every band of the pixel at (row, col) is zero.
#[cfg(test)]
pub(crate) fn is_masked(image: &RasterImage, row: usize, col: usize) -> bool {
    image
        .data
        .index_axis(Axis(0), row)
        .index_axis(Axis(0), col)
        .iter()
        .all(|&v| v == 0.0)
}
