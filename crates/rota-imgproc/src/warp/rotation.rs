use std::{fmt, str::FromStr};

use rota_image::{Image, ImageError, ImageSize};

use super::affine::{warp_affine_with, AffineMatrix};
use crate::interpolation::InterpolationMode;
use crate::parallel::ExecutionStrategy;

/// Distance to an integer under which a canvas extent is treated as exact.
///
/// `cos(pi / 2)` is not exactly zero in floating point, which would otherwise
/// grow the canvas by one pixel at multiples of 90 degrees.
const CANVAS_SNAP_EPSILON: f64 = 1e-6;

/// How the output canvas of a rotation is sized.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CanvasPolicy {
    /// Grow the canvas to the bounding box of the rotated source.
    #[default]
    GrowToFit,
    /// Keep the source size and clip what falls outside.
    FixedSource,
}

impl FromStr for CanvasPolicy {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "grow" | "grow-to-fit" => Ok(Self::GrowToFit),
            "fixed" | "fixed-source" => Ok(Self::FixedSource),
            _ => Err(format!(
                "unsupported canvas policy: {s}, expected one of: grow, fixed"
            )),
        }
    }
}

impl fmt::Display for CanvasPolicy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::GrowToFit => write!(f, "grow-to-fit"),
            Self::FixedSource => write!(f, "fixed-source"),
        }
    }
}

/// A rotation angle.
///
/// Positive angles turn the image content clockwise on screen, where the y
/// axis points down.
#[derive(Debug, Clone, Copy, PartialEq, Default)]
pub struct RotationSpec {
    /// The angle in radians.
    pub radians: f64,
}

impl RotationSpec {
    /// A rotation by `radians`.
    pub fn from_radians(radians: f64) -> Self {
        Self { radians }
    }

    /// A rotation by `degrees`.
    pub fn from_degrees(degrees: f64) -> Self {
        Self {
            radians: degrees.to_radians(),
        }
    }

    /// The angle in degrees.
    pub fn degrees(&self) -> f64 {
        self.radians.to_degrees()
    }

    /// The destination canvas for a source of the given size.
    pub fn canvas_size(&self, src_size: ImageSize, policy: CanvasPolicy) -> ImageSize {
        match policy {
            CanvasPolicy::GrowToFit => rotated_canvas_size(src_size, self.radians),
            CanvasPolicy::FixedSource => src_size,
        }
    }

    /// The destination-to-source matrix for the given source and canvas.
    pub fn matrix(&self, src_size: ImageSize, dst_size: ImageSize) -> AffineMatrix {
        get_rotation_matrix_to_canvas(src_size, dst_size, self.radians)
    }
}

/// Sine and cosine with values within rounding noise of -1, 0 or 1 made exact.
///
/// Keeps quarter turns free of the sub-ulp offsets that would otherwise push
/// border pixels just outside the source.
fn snapped_sin_cos(radians: f64) -> (f64, f64) {
    let snap = |value: f64| {
        let rounded = value.round();
        if (value - rounded).abs() < f64::EPSILON * 8.0 {
            rounded
        } else {
            value
        }
    };
    let (sin, cos) = radians.sin_cos();
    (snap(sin), snap(cos))
}

fn ceil_snapped(value: f64) -> usize {
    let rounded = value.round();
    if (value - rounded).abs() < CANVAS_SNAP_EPSILON {
        rounded as usize
    } else {
        value.ceil() as usize
    }
}

/// Computes the smallest canvas that contains the rotated source.
///
/// ```text
/// new_width  = ceil(width * |cos| + height * |sin|)
/// new_height = ceil(width * |sin| + height * |cos|)
/// ```
///
/// # Arguments
///
/// * `size` - The size of the source image.
/// * `radians` - The rotation angle.
///
/// # Example
///
/// ```
/// use rota_imgproc::warp::rotated_canvas_size;
///
/// let size = rotated_canvas_size([640, 480].into(), std::f64::consts::FRAC_PI_2);
/// assert_eq!((size.width, size.height), (480, 640));
/// ```
pub fn rotated_canvas_size(size: ImageSize, radians: f64) -> ImageSize {
    let (sin, cos) = snapped_sin_cos(radians);
    let (sin, cos) = (sin.abs(), cos.abs());
    let (width, height) = (size.width as f64, size.height as f64);

    ImageSize {
        width: ceil_snapped(width * cos + height * sin),
        height: ceil_snapped(width * sin + height * cos),
    }
}

/// Builds the matrix mapping a destination canvas pixel back to the source.
///
/// The rotation is taken about the source center and re-expressed about the
/// destination center, so the destination center always maps onto the source
/// center:
///
/// ```text
/// | cos  -sin  tx |    tx = cx - (ncx * cos - ncy * sin)
/// | sin   cos  ty |    ty = cy - (ncx * sin + ncy * cos)
/// ```
///
/// with `(cx, cy)` and `(ncx, ncy)` the source and destination centers.
///
/// # Arguments
///
/// * `src_size` - The size of the source image.
/// * `dst_size` - The size of the destination canvas.
/// * `radians` - The rotation angle.
pub fn get_rotation_matrix_to_canvas(
    src_size: ImageSize,
    dst_size: ImageSize,
    radians: f64,
) -> AffineMatrix {
    let (sin, cos) = snapped_sin_cos(radians);

    let (cx, cy) = (src_size.width as f64 / 2.0, src_size.height as f64 / 2.0);
    let (ncx, ncy) = (dst_size.width as f64 / 2.0, dst_size.height as f64 / 2.0);

    let tx = cx - (ncx * cos - ncy * sin);
    let ty = cy - (ncx * sin + ncy * cos);

    AffineMatrix::from_rows([
        [cos as f32, -sin as f32, tx as f32],
        [sin as f32, cos as f32, ty as f32],
    ])
}

/// Rotates an image.
///
/// The destination is allocated according to `policy`; uncovered pixels are
/// black.
///
/// # Arguments
///
/// * `src` - The input image.
/// * `rotation` - The rotation angle.
/// * `policy` - How the output canvas is sized.
/// * `interpolation` - The interpolation mode to use.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImage`] if the source has a zero dimension.
///
/// # Example
///
/// ```
/// use rota_image::Image;
/// use rota_imgproc::interpolation::InterpolationMode;
/// use rota_imgproc::warp::{rotate, CanvasPolicy, RotationSpec};
///
/// let src = Image::<u8, 3>::from_size_val([64, 32].into(), 200).unwrap();
///
/// let dst = rotate(
///     &src,
///     RotationSpec::from_degrees(90.0),
///     CanvasPolicy::GrowToFit,
///     InterpolationMode::Bilinear,
/// ).unwrap();
///
/// assert_eq!((dst.width(), dst.height()), (32, 64));
/// ```
pub fn rotate<const C: usize>(
    src: &Image<u8, C>,
    rotation: RotationSpec,
    policy: CanvasPolicy,
    interpolation: InterpolationMode,
) -> Result<Image<u8, C>, ImageError> {
    rotate_with(
        src,
        rotation,
        policy,
        interpolation,
        ExecutionStrategy::default(),
        [0; C],
    )
}

/// Rotates an image with explicit execution strategy and fill color.
///
/// See [`rotate`].
pub fn rotate_with<const C: usize>(
    src: &Image<u8, C>,
    rotation: RotationSpec,
    policy: CanvasPolicy,
    interpolation: InterpolationMode,
    strategy: ExecutionStrategy,
    fill: [u8; C],
) -> Result<Image<u8, C>, ImageError> {
    src.validate()?;

    let dst_size = rotation.canvas_size(src.size(), policy);
    let m = rotation.matrix(src.size(), dst_size);

    log::debug!(
        "rotating {} by {:.3} deg ({policy}) onto {}, matrix {:?}",
        src.size(),
        rotation.degrees(),
        dst_size,
        m.rows()
    );

    let mut dst = Image::from_size_val(dst_size, 0u8)?;
    warp_affine_with(src, &mut dst, &m, interpolation, strategy, fill)?;

    Ok(dst)
}
