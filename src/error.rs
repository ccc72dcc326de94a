//! Error types for the flood-bg-removal crate.

use std::path::PathBuf;

/// Errors that can occur while loading, cleaning, or saving an image.
#[derive(Debug, thiserror::Error)]
pub enum Error {
    /// The input file is missing, unreadable, or not a decodable image.
    #[error("failed to decode {}: {source}", path.display())]
    Decode {
        /// Path of the input image.
        path: PathBuf,
        /// Underlying decoder error.
        source: image::ImageError,
    },

    /// The cleaned image could not be encoded to its destination.
    #[error("failed to encode {}: {source}", path.display())]
    Encode {
        /// Path of the output image.
        path: PathBuf,
        /// Underlying encoder error.
        source: image::ImageError,
    },

    /// An I/O error occurred while reading or writing files.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

/// A specialized `Result` type for this crate.
pub type Result<T> = std::result::Result<T, Error>;

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn error_display_messages() {
        let io_err = Error::Io(std::io::Error::new(std::io::ErrorKind::NotFound, "gone"));
        assert!(io_err.to_string().contains("gone"));

        let decode = Error::Decode {
            path: PathBuf::from("missing/logo.png"),
            source: image::ImageError::IoError(std::io::Error::new(
                std::io::ErrorKind::NotFound,
                "no such file",
            )),
        };
        let msg = decode.to_string();
        assert!(msg.contains("logo.png"));
        assert!(msg.contains("no such file"));
    }
}
