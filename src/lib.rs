//! Strip light, near-uniform backgrounds from logo images.
//!
//! Design tools often export logos on a white, light grey, or grey
//! checkerboard canvas. This crate finds that canvas by looking at the four
//! image corners and flood-fills it to full transparency, stopping at the
//! first pixel that is colored or dark.
//!
//! # Quick Start
//!
//! ```no_run
//! use flood_bg_removal::{BackgroundRemover, RemovalOptions};
//!
//! let remover = BackgroundRemover::new(&RemovalOptions::default());
//! let mut img = image::open("logo.png").unwrap().to_rgba8();
//! let stats = remover.remove(&mut img);
//! println!("erased {} pixels", stats.erased);
//! img.save("logo_transparent.png").unwrap();
//! ```
//!
//! # Connectivity
//!
//! Only background reachable from a corner through other background pixels
//! (4-connected) is erased. Light areas enclosed by the logo, such as the
//! counter of an "O", keep their color.
//!
//! ```
//! use flood_bg_removal::{Classifier, remove_background};
//! use image::{Rgba, RgbaImage};
//!
//! let mut img = RgbaImage::from_pixel(4, 4, Rgba([230, 230, 230, 255]));
//! let stats = remove_background(&mut img, &Classifier::default());
//! assert_eq!(stats.erased, 16);
//! assert!(img.pixels().all(|p| p[3] == 0));
//! ```

#![deny(missing_docs)]

pub mod classifier;
mod engine;
pub mod error;
pub mod flood;
pub mod inspect;

pub use classifier::Classifier;
pub use engine::{
    default_output_path, is_supported_image, save_png, BackgroundRemover, ProcessResult,
    RemovalOptions,
};
pub use error::{Error, Result};
pub use flood::{remove_background, RemovalStats};
pub use inspect::{inspect_file, TransparencyReport};
