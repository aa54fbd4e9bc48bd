//! Geometric image transformations using affine warps.
//!
//! This module provides:
//!
//! - [`warp_affine`]: resample an image through a destination-to-source matrix
//! - [`rotate`]: rotate an image about its center onto a grown or fixed canvas
//! - helpers to build and invert the matrices involved
//!
//! # Examples
//!
//! Rotating an image by 45 degrees onto a canvas that fits the whole result:
//!
//! ```
//! use rota_image::Image;
//! use rota_imgproc::interpolation::InterpolationMode;
//! use rota_imgproc::warp::{rotate, CanvasPolicy, RotationSpec};
//!
//! let image = Image::<u8, 3>::from_size_val([128, 128].into(), 255).unwrap();
//! let rotated = rotate(
//!     &image,
//!     RotationSpec::from_degrees(45.0),
//!     CanvasPolicy::GrowToFit,
//!     InterpolationMode::Bilinear,
//! ).unwrap();
//!
//! assert_eq!(rotated.width(), 182);
//! ```

mod affine;
mod rotation;

pub use affine::{
    get_rotation_matrix2d, invert_affine_transform, warp_affine, warp_affine_with, AffineMatrix,
};
pub use rotation::{
    get_rotation_matrix_to_canvas, rotate, rotate_with, rotated_canvas_size, CanvasPolicy,
    RotationSpec,
};
