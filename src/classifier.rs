//! Background color classification.
//!
//! Design tools export logos on white, light grey, or grey checkerboard
//! canvases. All of these are near-achromatic and light, so a pixel counts as
//! background when its channels are close to each other *and* its red channel
//! is bright. Saturated colors and dark grey outlines are both rejected.

use image::Rgba;

/// Default maximum (exclusive) pairwise channel difference.
pub const DEFAULT_TOLERANCE: u8 = 30;

/// Default minimum (exclusive) red channel value.
pub const DEFAULT_MIN_BRIGHTNESS: u8 = 150;

/// Decides whether a pixel looks like canvas background.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Classifier {
    tolerance: u8,
    min_brightness: u8,
}

impl Default for Classifier {
    fn default() -> Self {
        Self::new(DEFAULT_TOLERANCE, DEFAULT_MIN_BRIGHTNESS)
    }
}

impl Classifier {
    /// Create a classifier with explicit thresholds.
    #[must_use]
    pub const fn new(tolerance: u8, min_brightness: u8) -> Self {
        Self {
            tolerance,
            min_brightness,
        }
    }

    /// Channel difference tolerance.
    #[must_use]
    pub const fn tolerance(&self) -> u8 {
        self.tolerance
    }

    /// Brightness threshold applied to the red channel.
    #[must_use]
    pub const fn min_brightness(&self) -> u8 {
        self.min_brightness
    }

    /// Returns `true` if the pixel is approximately grey and light.
    ///
    /// All three pairwise differences `|r-g|`, `|g-b|`, `|r-b|` must be
    /// strictly below the tolerance, and `r` must be strictly above the
    /// brightness threshold. Alpha is ignored.
    #[must_use]
    #[inline]
    pub fn is_background(&self, pixel: &Rgba<u8>) -> bool {
        let [r, g, b, _] = pixel.0;
        let achromatic = r.abs_diff(g) < self.tolerance
            && g.abs_diff(b) < self.tolerance
            && r.abs_diff(b) < self.tolerance;
        achromatic && r > self.min_brightness
    }
}
