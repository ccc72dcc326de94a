//! Transparency inspection for verifying cleaned assets.

use std::path::Path;

use image::{ColorType, ImageFormat, ImageReader, RgbaImage};

use crate::error::{Error, Result};

/// Summary of an image's alpha channel.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransparencyReport {
    /// Container format, if it could be guessed.
    pub format: Option<ImageFormat>,
    /// Color type of the decoded source.
    pub color_type: ColorType,
    /// `(min, max)` alpha values, or `None` when there is no alpha channel.
    pub alpha_extrema: Option<(u8, u8)>,
}

impl TransparencyReport {
    /// Whether the source carries an alpha channel at all.
    #[must_use]
    pub fn has_alpha_channel(&self) -> bool {
        self.color_type.has_alpha()
    }

    /// Whether at least one pixel is not fully opaque.
    #[must_use]
    pub fn has_transparency(&self) -> bool {
        matches!(self.alpha_extrema, Some((min, _)) if min < u8::MAX)
    }
}

/// Minimum and maximum alpha over all pixels. `None` for an empty image.
#[must_use]
pub fn alpha_extrema(image: &RgbaImage) -> Option<(u8, u8)> {
    image.pixels().fold(None, |acc, px| {
        let a = px[3];
        Some(match acc {
            None => (a, a),
            Some((lo, hi)) => (lo.min(a), hi.max(a)),
        })
    })
}

/// Decode `path` and report on its transparency.
///
/// # Errors
///
/// Returns [`Error::Decode`] if the file cannot be opened or decoded.
pub fn inspect_file(path: &Path) -> Result<TransparencyReport> {
    let decode_err = |source| Error::Decode {
        path: path.to_path_buf(),
        source,
    };

    let reader = ImageReader::open(path)
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?
        .with_guessed_format()
        .map_err(|e| decode_err(image::ImageError::IoError(e)))?;
    let format = reader.format();
    let img = reader.decode().map_err(decode_err)?;

    let color_type = img.color();
    let alpha_extrema = if color_type.has_alpha() {
        alpha_extrema(&img.to_rgba8())
    } else {
        None
    };

    Ok(TransparencyReport {
        format,
        color_type,
        alpha_extrema,
    })
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    #[test]
    fn extrema_of_opaque_image() {
        let img = RgbaImage::from_pixel(3, 3, Rgba([10, 20, 30, 255]));
        assert_eq!(alpha_extrema(&img), Some((255, 255)));
    }

    #[test]
    fn extrema_with_mixed_alpha() {
        let mut img = RgbaImage::from_pixel(4, 2, Rgba([10, 20, 30, 200]));
        img.put_pixel(0, 0, Rgba([0, 0, 0, 0]));
        img.put_pixel(3, 1, Rgba([1, 1, 1, 250]));
        assert_eq!(alpha_extrema(&img), Some((0, 250)));
    }

    #[test]
    fn extrema_of_empty_image() {
        assert_eq!(alpha_extrema(&RgbaImage::new(0, 0)), None);
    }

    #[test]
    fn report_transparency_flags() {
        let opaque = TransparencyReport {
            format: Some(ImageFormat::Png),
            color_type: ColorType::Rgba8,
            alpha_extrema: Some((255, 255)),
        };
        assert!(opaque.has_alpha_channel());
        assert!(!opaque.has_transparency());

        let cleaned = TransparencyReport {
            alpha_extrema: Some((0, 255)),
            ..opaque.clone()
        };
        assert!(cleaned.has_transparency());

        let rgb = TransparencyReport {
            format: Some(ImageFormat::Jpeg),
            color_type: ColorType::Rgb8,
            alpha_extrema: None,
        };
        assert!(!rgb.has_alpha_channel());
        assert!(!rgb.has_transparency());
    }

    #[test]
    fn inspect_missing_file_is_decode_error() {
        let err = inspect_file(Path::new("definitely/not/here.png")).unwrap_err();
        assert!(matches!(err, Error::Decode { .. }));
    }
}
