use ndarray::{Array2, Zip};
use tracing::info;

use crate::error::Result;
use crate::types::{BAND_BLUE, BAND_NIR, BAND_RED, ColonyMask, RasterImage};

/// Linear tristimulus transform applied to the (B8, B4, B2) composite.
pub const TRISTIMULUS_MATRIX: [[f64; 3]; 3] = [
    [2.7689, 1.7517, 1.1302],
    [1.0000, 4.5907, 0.0601],
    [0.0000, 0.0565, 5.5943],
];

/// Added to X+Y+Z before normalizing.
pub const CHROMATICITY_EPSILON: f64 = 1e-6;

/// Channel order of the composite fed to the classifier: (r, g, b).
pub const CLASSIFIER_BANDS: [&str; 3] = [BAND_NIR, BAND_RED, BAND_BLUE];

/// Straight line `y = slope * x + intercept` in chromaticity space.
///
/// Points strictly above the line are colony.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DecisionBoundary {
    pub slope: f64,
    pub intercept: f64,
}

impl DecisionBoundary {
    /// Left boundary of the emperor penguin colony region
    pub const COLONY: DecisionBoundary = DecisionBoundary {
        slope: -0.2622,
        intercept: 0.4321,
    };

    #[inline]
    pub fn y_at(&self, x: f64) -> f64 {
        self.slope * x + self.intercept
    }

    #[inline]
    pub fn is_colony(&self, x: f64, y: f64) -> bool {
        y > self.y_at(x)
    }
}

/// Tristimulus (X, Y, Z) of one composite pixel.
#[inline]
pub fn tristimulus(r: f64, g: f64, b: f64) -> [f64; 3] {
    let m = &TRISTIMULUS_MATRIX;
    [
        m[0][0] * r + m[0][1] * g + m[0][2] * b,
        m[1][0] * r + m[1][1] * g + m[1][2] * b,
        m[2][0] * r + m[2][1] * g + m[2][2] * b,
    ]
}

/// Chromaticity coordinates (x, y) of one composite pixel.
#[inline]
pub fn chromaticity(r: f64, g: f64, b: f64) -> (f64, f64) {
    let [x, y, z] = tristimulus(r, g, b);
    let sum = x + y + z + CHROMATICITY_EPSILON;
    (x / sum, y / sum)
}

/// Classify every pixel of the (already masked) image against `boundary`.
pub fn classify(image: &RasterImage, boundary: DecisionBoundary) -> Result<ColonyMask> {
    let r = image.band(CLASSIFIER_BANDS[0])?;
    let g = image.band(CLASSIFIER_BANDS[1])?;
    let b = image.band(CLASSIFIER_BANDS[2])?;

    let mut mask = Array2::<u8>::zeros(r.dim());
    Zip::from(&mut mask)
        .and(&r)
        .and(&g)
        .and(&b)
        .for_each(|m, &r, &g, &b| {
            let (x, y) = chromaticity(r, g, b);
            *m = boundary.is_colony(x, y) as u8;
        });

    let mask = ColonyMask(mask);
    info!(
        "Classification complete: {} colony pixels of {}",
        mask.colony_pixels(),
        mask.0.len()
    );
    Ok(mask)
}
