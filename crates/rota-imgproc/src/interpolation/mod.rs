//! Pixel interpolation methods for image transformations.
//!
//! The kernels in this module evaluate a source image at a fractional
//! coordinate `(u, v)` and return one `f32` value per channel. Neighbor
//! coordinates are clamped to the image border (clamp-to-edge), so a kernel
//! never reads outside the buffer; deciding whether a coordinate should be
//! sampled at all is left to the caller.
//!
//! # Interpolation Modes
//!
//! - **Bilinear**: weighted average of the four surrounding lattice pixels
//! - **Nearest**: value of the closest lattice pixel

mod bilinear;
pub(crate) mod interpolate;
mod nearest;

pub use interpolate::{interpolate_pixel, InterpolationMode};
