//! File-level background removal: load, flood, save.

use std::collections::{HashMap, HashSet};
use std::ffi::OsStr;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

use image::{ImageFormat, RgbaImage};

use crate::classifier::{Classifier, DEFAULT_MIN_BRIGHTNESS, DEFAULT_TOLERANCE};
use crate::error::{Error, Result};
use crate::flood::{self, RemovalStats};

/// Options controlling background removal.
#[derive(Debug, Clone)]
pub struct RemovalOptions {
    /// Maximum (exclusive) pairwise channel difference for a background pixel.
    pub tolerance: u8,
    /// Red channel must exceed this for a pixel to count as background.
    pub min_brightness: u8,
    /// Enable verbose logging.
    pub verbose: bool,
    /// Suppress non-error output.
    pub quiet: bool,
}

impl Default for RemovalOptions {
    fn default() -> Self {
        Self {
            tolerance: DEFAULT_TOLERANCE,
            min_brightness: DEFAULT_MIN_BRIGHTNESS,
            verbose: false,
            quiet: false,
        }
    }
}

impl RemovalOptions {
    /// Build the pixel classifier these options describe.
    #[must_use]
    pub fn classifier(&self) -> Classifier {
        Classifier::new(self.tolerance, self.min_brightness)
    }
}

/// Result of processing a single image file.
#[derive(Debug)]
pub struct ProcessResult {
    /// Path of the input file.
    pub path: PathBuf,
    /// Path the cleaned PNG was (or would have been) written to.
    pub output: PathBuf,
    /// Whether processing succeeded.
    pub success: bool,
    /// Flood fill counters, present once the image decoded.
    pub stats: Option<RemovalStats>,
    /// Human-readable status message.
    pub message: String,
}

impl ProcessResult {
    /// Succeeded, but no corner looked like background so nothing was erased.
    #[must_use]
    pub fn unchanged(&self) -> bool {
        self.success && self.stats.is_some_and(|s| s.erased == 0)
    }
}

/// Corner-seeded background remover.
///
/// Cheap to construct; holds only the classifier thresholds. A single
/// instance can be shared across threads for batch work.
#[derive(Debug, Clone, Default)]
pub struct BackgroundRemover {
    classifier: Classifier,
}

impl BackgroundRemover {
    /// Create a remover from options.
    #[must_use]
    pub fn new(opts: &RemovalOptions) -> Self {
        Self {
            classifier: opts.classifier(),
        }
    }

    /// The classifier in use.
    #[must_use]
    pub fn classifier(&self) -> &Classifier {
        &self.classifier
    }

    /// Erase corner-connected background from an image in place.
    pub fn remove(&self, image: &mut RgbaImage) -> RemovalStats {
        flood::remove_background(image, &self.classifier)
    }

    /// Load `input`, erase its background, and write a PNG to `output`.
    ///
    /// Nothing is written if decoding fails, and a failed encode leaves no
    /// partial file at `output`.
    ///
    /// # Errors
    ///
    /// Returns [`Error::Decode`] for unreadable input, [`Error::Io`] if the
    /// output directory cannot be created, or [`Error::Encode`] when the PNG
    /// cannot be written.
    pub fn remove_file(&self, input: &Path, output: &Path) -> Result<RemovalStats> {
        let mut img = image::open(input)
            .map_err(|source| Error::Decode {
                path: input.to_path_buf(),
                source,
            })?
            .to_rgba8();

        let stats = self.remove(&mut img);

        if let Some(parent) = output.parent() {
            if !parent.as_os_str().is_empty() && !parent.exists() {
                std::fs::create_dir_all(parent)?;
            }
        }
        save_png(&img, output)?;

        Ok(stats)
    }

    /// Process a single image file, folding any error into the result.
    #[must_use]
    pub fn process_file(&self, input: &Path, output: &Path) -> ProcessResult {
        let mut result = ProcessResult {
            path: input.to_path_buf(),
            output: output.to_path_buf(),
            success: false,
            stats: None,
            message: String::new(),
        };

        match self.remove_file(input, output) {
            Ok(stats) => {
                result.success = true;
                result.stats = Some(stats);
                result.message = if stats.seeds == 0 {
                    "No background-like corner found, saved unchanged".to_string()
                } else {
                    format!(
                        "Erased {} pixels from {} corner seeds ({} classified)",
                        stats.erased, stats.seeds, stats.visited
                    )
                };
            }
            Err(e) => {
                result.message = e.to_string();
            }
        }

        result
    }

    /// Process all supported images in a directory.
    ///
    /// Each image is written to `output_dir` as `<stem>.png`, or
    /// `<stem>.<ext>.png` when several inputs share a stem. Images are
    /// processed in parallel when the `cli` feature is enabled (via rayon);
    /// each individual flood fill stays single-threaded.
    #[must_use]
    pub fn process_directory(&self, input_dir: &Path, output_dir: &Path) -> Vec<ProcessResult> {
        let failure = |path: &Path, message: String| ProcessResult {
            path: path.to_path_buf(),
            output: output_dir.to_path_buf(),
            success: false,
            stats: None,
            message,
        };

        let mut inputs: Vec<PathBuf> = match std::fs::read_dir(input_dir) {
            Ok(rd) => rd
                .filter_map(std::result::Result::ok)
                .filter(|e| e.file_type().map(|ft| ft.is_file()).unwrap_or(false))
                .map(|e| e.path())
                .filter(|p| is_supported_image(p))
                .collect(),
            Err(e) => {
                return vec![failure(input_dir, format!("Failed to read directory: {e}"))];
            }
        };
        inputs.sort();

        if !output_dir.exists() {
            if let Err(e) = std::fs::create_dir_all(output_dir) {
                return vec![failure(
                    output_dir,
                    format!("Failed to create output directory: {e}"),
                )];
            }
        }

        let jobs: Vec<(PathBuf, Option<PathBuf>)> = inputs
            .iter()
            .cloned()
            .zip(batch_output_paths(&inputs, output_dir))
            .collect();

        let process = |(input, output): &(PathBuf, Option<PathBuf>)| match output {
            Some(output) => self.process_file(input, output),
            None => failure(
                input,
                "Output name collides with another input, not written".to_string(),
            ),
        };

        #[cfg(feature = "cli")]
        {
            use rayon::prelude::*;
            jobs.par_iter().map(process).collect()
        }

        #[cfg(not(feature = "cli"))]
        {
            jobs.iter().map(process).collect()
        }
    }
}

/// Assign each batch input a PNG path inside `output_dir`.
///
/// Inputs normally map to `<stem>.png`. Inputs sharing a stem keep their
/// extension (`logo.bmp` becomes `logo.bmp.png`). Any path still claimed by an
/// earlier input maps to `None`.
fn batch_output_paths(inputs: &[PathBuf], output_dir: &Path) -> Vec<Option<PathBuf>> {
    let mut stem_counts: HashMap<&OsStr, usize> = HashMap::new();
    for input in inputs {
        *stem_counts
            .entry(input.file_stem().unwrap_or_default())
            .or_default() += 1;
    }

    let mut claimed = HashSet::new();
    inputs
        .iter()
        .map(|input| {
            let stem = input.file_stem().unwrap_or_default();
            let name = if stem_counts[stem] > 1 {
                input.file_name().unwrap_or_default().to_string_lossy()
            } else {
                stem.to_string_lossy()
            };
            let output = output_dir.join(format!("{name}.png"));
            claimed.insert(output.clone()).then_some(output)
        })
        .collect()
}

/// Check if a file has a supported image extension.
#[must_use]
pub fn is_supported_image(path: &Path) -> bool {
    match path.extension().and_then(|e| e.to_str()) {
        Some(ext) => matches!(
            ext.to_lowercase().as_str(),
            "png" | "jpg" | "jpeg" | "webp" | "bmp" | "gif" | "tif" | "tiff"
        ),
        None => false,
    }
}

/// Encode an RGBA image as PNG at `path`.
///
/// The PNG is written to a temporary file in the destination directory and
/// renamed into place, so `path` is either fully written or untouched.
///
/// # Errors
///
/// Returns [`Error::Encode`] naming `path` if PNG encoding fails or the
/// temporary file cannot be created, flushed, or renamed.
pub fn save_png(img: &RgbaImage, path: &Path) -> Result<()> {
    let encode_err = |source| Error::Encode {
        path: path.to_path_buf(),
        source,
    };
    let io_err = |e: std::io::Error| encode_err(image::ImageError::IoError(e));

    let dir = match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    };

    let mut tmp = tempfile::Builder::new()
        .prefix(".flood-bg-")
        .suffix(".png.tmp")
        .tempfile_in(dir)
        .map_err(io_err)?;

    {
        let mut writer = BufWriter::new(tmp.as_file_mut());
        img.write_to(&mut writer, ImageFormat::Png)
            .map_err(encode_err)?;
        writer.flush().map_err(io_err)?;
    }

    tmp.persist(path).map_err(|e| io_err(e.error))?;
    Ok(())
}

/// Generate a default output path from an input path.
///
/// Example: `"logo.jpg"` becomes `"logo_transparent.png"`.
#[must_use]
pub fn default_output_path(input: &Path) -> PathBuf {
    let stem = input.file_stem().unwrap_or_default().to_string_lossy();
    let parent = input.parent().unwrap_or(Path::new("."));
    parent.join(format!("{stem}_transparent.png"))
}

#[cfg(test)]
mod tests {
    use image::Rgba;

    use super::*;

    #[test]
    fn default_options_match_classifier_defaults() {
        let opts = RemovalOptions::default();
        assert_eq!(opts.classifier(), Classifier::default());
        assert_eq!(opts.tolerance, 30);
        assert_eq!(opts.min_brightness, 150);
    }

    #[test]
    fn remover_uses_configured_thresholds() {
        let opts = RemovalOptions {
            tolerance: 40,
            ..RemovalOptions::default()
        };
        let remover = BackgroundRemover::new(&opts);
        let mut img = RgbaImage::from_pixel(3, 3, Rgba([180, 150, 150, 255]));

        let stats = remover.remove(&mut img);
        assert_eq!(stats.erased, 9);

        let strict = BackgroundRemover::new(&RemovalOptions {
            tolerance: 20,
            ..RemovalOptions::default()
        });
        let mut img = RgbaImage::from_pixel(3, 3, Rgba([180, 150, 150, 255]));
        assert_eq!(strict.remove(&mut img).erased, 0);
    }

    #[test]
    fn remover_exposes_configured_classifier() {
        let remover = BackgroundRemover::new(&RemovalOptions {
            tolerance: 12,
            min_brightness: 200,
            ..RemovalOptions::default()
        });
        assert_eq!(remover.classifier().tolerance(), 12);
        assert_eq!(remover.classifier().min_brightness(), 200);
    }

    #[test]
    fn batch_outputs_keep_extension_for_shared_stems() {
        let inputs = [
            PathBuf::from("in/badge.png"),
            PathBuf::from("in/logo.bmp"),
            PathBuf::from("in/logo.png"),
        ];
        let outputs = batch_output_paths(&inputs, Path::new("out"));
        assert_eq!(
            outputs,
            vec![
                Some(PathBuf::from("out/badge.png")),
                Some(PathBuf::from("out/logo.bmp.png")),
                Some(PathBuf::from("out/logo.png.png")),
            ]
        );
    }

    #[test]
    fn batch_outputs_reject_names_already_claimed() {
        // `logo.bmp` and `logo.png` share a stem, so `logo.bmp` maps to
        // `logo.bmp.png`, which `logo.bmp.png` (stem `logo.bmp`) claimed first.
        let inputs = [
            PathBuf::from("in/logo.bmp.png"),
            PathBuf::from("in/logo.bmp"),
            PathBuf::from("in/logo.png"),
        ];
        let outputs = batch_output_paths(&inputs, Path::new("out"));
        assert_eq!(outputs[0], Some(PathBuf::from("out/logo.bmp.png")));
        assert_eq!(outputs[1], None);
        assert_eq!(outputs[2], Some(PathBuf::from("out/logo.png.png")));
    }

    #[test]
    fn save_png_failure_names_requested_path() {
        let dir = tempfile::TempDir::new().unwrap();
        let output = dir.path().join("gone").join("logo.png");

        let err = save_png(&RgbaImage::from_pixel(2, 2, Rgba([9, 9, 9, 255])), &output)
            .unwrap_err();

        assert!(matches!(err, Error::Encode { ref path, .. } if *path == output));
        let msg = err.to_string();
        assert!(msg.contains("logo.png"), "{msg}");
        assert!(!msg.contains(".flood-bg-"), "{msg}");
    }

    #[test]
    fn default_output_path_appends_transparent_suffix() {
        let p = default_output_path(Path::new("/tmp/logo.jpg"));
        assert_eq!(p, PathBuf::from("/tmp/logo_transparent.png"));

        let p = default_output_path(Path::new("logo_new.png"));
        assert_eq!(
            p.file_name().unwrap().to_str().unwrap(),
            "logo_new_transparent.png"
        );
    }

    #[test]
    fn is_supported_image_accepts_common_formats() {
        assert!(is_supported_image(Path::new("logo.png")));
        assert!(is_supported_image(Path::new("logo.PNG")));
        assert!(is_supported_image(Path::new("logo.jpeg")));
        assert!(is_supported_image(Path::new("logo.webp")));
        assert!(is_supported_image(Path::new("logo.tiff")));
    }

    #[test]
    fn is_supported_image_rejects_unsupported_formats() {
        assert!(!is_supported_image(Path::new("logo.svg")));
        assert!(!is_supported_image(Path::new("notes.txt")));
        assert!(!is_supported_image(Path::new("logo")));
    }

    #[test]
    fn unchanged_reflects_zero_erasure() {
        let result = ProcessResult {
            path: PathBuf::from("a.png"),
            output: PathBuf::from("b.png"),
            success: true,
            stats: Some(RemovalStats::default()),
            message: String::new(),
        };
        assert!(result.unchanged());

        let failed = ProcessResult {
            success: false,
            stats: None,
            ..result
        };
        assert!(!failed.unchanged());
    }
}
