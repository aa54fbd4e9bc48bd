#![deny(missing_docs)]
#![doc = env!("CARGO_PKG_DESCRIPTION")]

/// Error types for I/O operations.
///
/// Defines [`error::IoError`] variants for file access, encoding/decoding
/// failures and format-specific errors.
pub mod error;

/// High-level image reading and writing functions.
///
/// See [`functional::read_image_any`] and [`functional::write_image_any`].
pub mod functional;

/// JPEG image encoding.
pub mod jpeg;

/// PNG image encoding and decoding.
///
/// Read and write 8-bit PNG images in grayscale, grayscale-alpha, RGB and RGBA.
pub mod png;

/// Atomic file persistence.
mod persist;

pub use crate::error::{IoError, IoErrorKind};
pub use crate::functional::{read_image_any, write_image_any, GenericImage};
