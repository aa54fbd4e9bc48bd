use std::f32::consts::PI;

use rota_image::{Image, ImageError};

use crate::interpolation::{interpolate_pixel, InterpolationMode};
use crate::parallel::{self, ExecutionStrategy};

/// Number of adjacent destination columns mapped together.
///
/// The batch is a plain loop over fixed-size `f32` arrays; it gives the
/// compiler a straight-line kernel to auto-vectorize, with no explicit SIMD.
const LANES: usize = 8;

/// A 2x3 affine matrix `[[m00, m01, m02], [m10, m11, m12]]`.
///
/// When used with [`warp_affine`] the matrix maps a destination pixel `(x, y)`
/// to the source coordinate
///
/// ```text
/// src_x = m00 * x + m01 * y + m02
/// src_y = m10 * x + m11 * y + m12
/// ```
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct AffineMatrix([f32; 6]);

impl AffineMatrix {
    /// Create a matrix from its coefficients in row-major order.
    pub const fn new(m: [f32; 6]) -> Self {
        Self(m)
    }

    /// Create a matrix from its two rows.
    pub const fn from_rows(rows: [[f32; 3]; 2]) -> Self {
        let [[m00, m01, m02], [m10, m11, m12]] = rows;
        Self([m00, m01, m02, m10, m11, m12])
    }

    /// The identity transform.
    pub const fn identity() -> Self {
        Self([1.0, 0.0, 0.0, 0.0, 1.0, 0.0])
    }

    /// The coefficients in row-major order.
    pub fn as_array(&self) -> &[f32; 6] {
        &self.0
    }

    /// The two rows of the matrix.
    pub fn rows(&self) -> [[f32; 3]; 2] {
        let [m00, m01, m02, m10, m11, m12] = self.0;
        [[m00, m01, m02], [m10, m11, m12]]
    }

    /// Applies the transformation to a point.
    pub fn transform_point(&self, x: f32, y: f32) -> (f32, f32) {
        let m = &self.0;
        let u = m[0] * x + m[1] * y + m[2];
        let v = m[3] * x + m[4] * y + m[5];
        (u, v)
    }

    /// The inverse transformation, see [`invert_affine_transform`].
    pub fn inverse(&self) -> Self {
        Self(invert_affine_transform(&self.0))
    }
}

impl Default for AffineMatrix {
    fn default() -> Self {
        Self::identity()
    }
}

impl From<[f32; 6]> for AffineMatrix {
    fn from(m: [f32; 6]) -> Self {
        Self(m)
    }
}

impl From<AffineMatrix> for [f32; 6] {
    fn from(m: AffineMatrix) -> Self {
        m.0
    }
}

/// Inverts a 2x3 affine transformation matrix.
///
/// A singular matrix inverts to all zeros.
///
/// Arguments:
///
/// * `m` - The 2x3 affine transformation matrix.
///
/// Returns:
///
/// The inverted 2x3 affine transformation matrix.
pub fn invert_affine_transform(m: &[f32; 6]) -> [f32; 6] {
    let (a, b, c, d, e, f) = (m[0], m[1], m[2], m[3], m[4], m[5]);

    // follow OpenCV: check for determinant == 0
    let determinant = a * e - b * d;
    let inv_determinant = if determinant != 0.0 {
        1.0 / determinant
    } else {
        0.0
    };

    let new_a = e * inv_determinant;
    let new_b = -b * inv_determinant;
    let new_d = -d * inv_determinant;
    let new_e = a * inv_determinant;
    let new_c = -(new_a * c + new_b * f);
    let new_f = -(new_d * c + new_e * f);

    [new_a, new_b, new_c, new_d, new_e, new_f]
}

/// Returns a 2x3 forward rotation matrix around a center point.
///
/// The rotation matrix is defined as:
///
/// | alpha  beta  tx |
/// | -beta  alpha ty |
///
/// where:
///
/// alpha = scale * cos(angle)
/// beta = scale * sin(angle)
/// tx = (1 - alpha) * center.x - beta * center.y
/// ty = beta * center.x + (1 - alpha) * center.y
///
/// The matrix maps source to destination; pass its [`AffineMatrix::inverse`]
/// to [`warp_affine`].
///
/// # Arguments
///
/// * `center` - The center point of the rotation.
/// * `angle` - The angle of rotation in degrees.
/// * `scale` - The scale factor.
///
/// # Example
///
/// ```
/// use rota_imgproc::warp::get_rotation_matrix2d;
///
/// let rotation_matrix = get_rotation_matrix2d((0.0, 0.0), 90.0, 1.0);
/// let (x, y) = rotation_matrix.transform_point(1.0, 0.0);
/// assert!(x.abs() < 1e-6 && (y + 1.0).abs() < 1e-6);
/// ```
pub fn get_rotation_matrix2d(center: (f32, f32), angle: f32, scale: f32) -> AffineMatrix {
    let angle = angle * PI / 180.0f32;
    let alpha = scale * angle.cos();
    let beta = scale * angle.sin();

    let tx = (1.0 - alpha) * center.0 - beta * center.1;
    let ty = beta * center.0 + (1.0 - alpha) * center.1;

    AffineMatrix([alpha, beta, tx, -beta, alpha, ty])
}

/// Round and saturate an interpolated value into an 8-bit sample.
#[inline]
pub(crate) fn saturate_u8(value: f32) -> u8 {
    value.round().clamp(0.0, 255.0) as u8
}

/// Applies an affine transformation to an image.
///
/// Every destination pixel is mapped to the source through `m`, sampled with
/// the given interpolation and written as `clamp(round(value), 0, 255)`.
/// Pixels whose mapped coordinate falls outside `[0, width) x [0, height)` of
/// the source are set to black.
///
/// # Arguments
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image; its size defines the output canvas.
/// * `m` - The 2x3 matrix mapping destination to source coordinates.
/// * `interpolation` - The interpolation mode to use.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImage`] if either image has a zero dimension.
///
/// # Example
///
/// ```
/// use rota_image::{Image, ImageSize};
/// use rota_imgproc::interpolation::InterpolationMode;
/// use rota_imgproc::warp::{warp_affine, AffineMatrix};
///
/// let src = Image::<u8, 3>::from_size_val(
///     ImageSize {
///         width: 4,
///         height: 5,
///     },
///     1,
/// ).unwrap();
///
/// let mut dst = Image::<u8, 3>::from_size_val(src.size(), 0).unwrap();
///
/// warp_affine(&src, &mut dst, &AffineMatrix::identity(), InterpolationMode::Bilinear).unwrap();
///
/// assert_eq!(dst.as_slice(), src.as_slice());
/// ```
pub fn warp_affine<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    m: &AffineMatrix,
    interpolation: InterpolationMode,
) -> Result<(), ImageError> {
    warp_affine_with(
        src,
        dst,
        m,
        interpolation,
        ExecutionStrategy::default(),
        [0; C],
    )
}

/// Applies an affine transformation to an image with explicit execution
/// strategy and fill color.
///
/// Rows of the destination are distributed according to `strategy`; inside a
/// row the source coordinates are computed for batches of adjacent columns at
/// a time. The source is only read and each worker owns its destination rows.
///
/// # Arguments
///
/// * `src` - The input image with shape (height, width, channels).
/// * `dst` - The output image; its size defines the output canvas.
/// * `m` - The 2x3 matrix mapping destination to source coordinates.
/// * `interpolation` - The interpolation mode to use.
/// * `strategy` - How destination rows are scheduled.
/// * `fill` - The color written where the source is not covered.
///
/// # Errors
///
/// Returns [`ImageError::InvalidImage`] if either image has a zero dimension,
/// or [`ImageError::Parallel`] if the thread pool cannot be set up.
pub fn warp_affine_with<const C: usize>(
    src: &Image<u8, C>,
    dst: &mut Image<u8, C>,
    m: &AffineMatrix,
    interpolation: InterpolationMode,
    strategy: ExecutionStrategy,
    fill: [u8; C],
) -> Result<(), ImageError> {
    src.validate()?;
    dst.validate()?;

    let (src_cols, src_rows) = (src.cols() as f32, src.rows() as f32);
    let dst_cols = dst.cols();
    let [m00, m01, m02, m10, m11, m12] = *m.as_array();

    parallel::par_iter_rows_indexed(dst.as_slice_mut(), dst_cols * C, strategy, |y, dst_row| {
        let y = y as f32;

        for (batch, dst_batch) in dst_row.chunks_mut(LANES * C).enumerate() {
            // map a whole batch of columns before sampling any of them
            let x_start = batch * LANES;
            let mut map_x = [0.0f32; LANES];
            let mut map_y = [0.0f32; LANES];
            for (i, (u, v)) in map_x.iter_mut().zip(map_y.iter_mut()).enumerate() {
                let x = (x_start + i) as f32;
                *u = m00 * x + m01 * y + m02;
                *v = m10 * x + m11 * y + m12;
            }

            for (dst_pixel, (&u, &v)) in dst_batch
                .chunks_exact_mut(C)
                .zip(map_x.iter().zip(map_y.iter()))
            {
                // check if the position is within the bounds of the src image
                if u >= 0.0 && u < src_cols && v >= 0.0 && v < src_rows {
                    let value = interpolate_pixel(src, u, v, interpolation);
                    dst_pixel
                        .iter_mut()
                        .zip(value)
                        .for_each(|(pixel, value)| *pixel = saturate_u8(value));
                } else {
                    dst_pixel.copy_from_slice(&fill);
                }
            }
        }
    })?;

    Ok(())
}

#[cfg(test)]
mod tests {
    use approx::assert_relative_eq;
    use rand::Rng;
    use rota_image::{Image, ImageError, ImageSize};

    use super::{AffineMatrix, InterpolationMode};
    use crate::parallel::ExecutionStrategy;

    fn random_image<const C: usize>(size: ImageSize) -> Result<Image<u8, C>, ImageError> {
        let mut rng = rand::rng();
        let data = (0..size.width * size.height * C)
            .map(|_| rng.random::<u8>())
            .collect();
        Image::new(size, data)
    }

    #[test]
    fn warp_affine_smoke_ch3() -> Result<(), ImageError> {
        let image = Image::<_, 3>::new(
            ImageSize {
                width: 4,
                height: 5,
            },
            vec![0u8; 4 * 5 * 3],
        )?;

        let new_size = ImageSize {
            width: 2,
            height: 3,
        };

        let mut image_transformed = Image::<_, 3>::from_size_val(new_size, 0u8)?;

        super::warp_affine(
            &image,
            &mut image_transformed,
            &AffineMatrix::identity(),
            InterpolationMode::Bilinear,
        )?;

        assert_eq!(image_transformed.num_channels(), 3);
        assert_eq!(image_transformed.size().width, 2);
        assert_eq!(image_transformed.size().height, 3);

        Ok(())
    }

    #[test]
    fn warp_affine_correctness_identity() -> Result<(), ImageError> {
        // wider than one batch so that partial batches are exercised too
        let image = random_image::<3>([19, 7].into())?;

        for interpolation in [InterpolationMode::Bilinear, InterpolationMode::Nearest] {
            let mut image_transformed = Image::<_, 3>::from_size_val(image.size(), 0u8)?;
            super::warp_affine(
                &image,
                &mut image_transformed,
                &AffineMatrix::identity(),
                interpolation,
            )?;
            assert_eq!(image_transformed, image);
        }

        Ok(())
    }

    #[test]
    fn warp_affine_correctness_rot90() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new(
            ImageSize {
                width: 2,
                height: 2,
            },
            vec![0u8, 1, 2, 3],
        )?;

        let mut image_transformed = Image::<_, 1>::from_size_val(image.size(), 0u8)?;

        let m = AffineMatrix::from_rows([[0.0, -1.0, 1.0], [1.0, 0.0, 0.0]]);
        super::warp_affine(
            &image,
            &mut image_transformed,
            &m,
            InterpolationMode::Bilinear,
        )?;

        assert_eq!(image_transformed.as_slice(), &[1u8, 3, 0, 2]);

        Ok(())
    }

    #[test]
    fn warp_affine_half_pixel_shift() -> Result<(), ImageError> {
        let image = Image::<_, 1>::new([3, 1].into(), vec![0u8, 100, 201])?;
        let mut dst = Image::<_, 1>::from_size_val(image.size(), 7u8)?;

        let m = AffineMatrix::new([1.0, 0.0, 0.5, 0.0, 1.0, 0.0]);
        super::warp_affine(&image, &mut dst, &m, InterpolationMode::Bilinear)?;

        // 2.5 still lies inside the source, its right neighbor is clamped
        assert_eq!(dst.as_slice(), &[50u8, 151, 201]);

        let m = AffineMatrix::new([1.0, 0.0, -0.5, 0.0, 1.0, 0.0]);
        super::warp_affine(&image, &mut dst, &m, InterpolationMode::Bilinear)?;

        // -0.5 falls outside the source
        assert_eq!(dst.as_slice(), &[0u8, 50, 151]);

        Ok(())
    }

    #[test]
    fn warp_affine_out_of_bounds_fill() -> Result<(), ImageError> {
        let image = Image::<_, 3>::from_size_val([5, 4].into(), 255u8)?;
        let mut dst = Image::<_, 3>::from_size_val([5, 4].into(), 1u8)?;

        let m = AffineMatrix::new([1.0, 0.0, -100.0, 0.0, 1.0, 0.0]);
        super::warp_affine(&image, &mut dst, &m, InterpolationMode::Bilinear)?;
        assert!(dst.as_slice().iter().all(|&v| v == 0));

        super::warp_affine_with(
            &image,
            &mut dst,
            &m,
            InterpolationMode::Nearest,
            ExecutionStrategy::Serial,
            [10, 20, 30],
        )?;
        for pixel in dst.as_slice().chunks_exact(3) {
            assert_eq!(pixel, &[10, 20, 30]);
        }

        Ok(())
    }

    #[test]
    fn warp_affine_nan_matrix_is_filled() -> Result<(), ImageError> {
        let image = Image::<_, 1>::from_size_val([3, 3].into(), 9u8)?;
        let mut dst = Image::<_, 1>::from_size_val([3, 3].into(), 1u8)?;

        let m = AffineMatrix::new([f32::NAN, 0.0, 0.0, 0.0, 1.0, 0.0]);
        super::warp_affine(&image, &mut dst, &m, InterpolationMode::Bilinear)?;
        assert!(dst.as_slice().iter().all(|&v| v == 0));

        Ok(())
    }

    #[test]
    fn warp_affine_strategies_agree() -> Result<(), ImageError> {
        let image = random_image::<3>([37, 23].into())?;
        let m = super::get_rotation_matrix2d((18.5, 11.5), 33.0, 1.0).inverse();

        let mut outputs = Vec::new();
        for strategy in [
            ExecutionStrategy::Serial,
            ExecutionStrategy::ParallelRows,
            ExecutionStrategy::Fixed(3),
        ] {
            let mut dst = Image::<_, 3>::from_size_val([41, 29].into(), 0u8)?;
            super::warp_affine_with(
                &image,
                &mut dst,
                &m,
                InterpolationMode::Bilinear,
                strategy,
                [0; 3],
            )?;
            outputs.push(dst);
        }

        assert_eq!(outputs[0], outputs[1]);
        assert_eq!(outputs[0], outputs[2]);

        Ok(())
    }

    #[test]
    fn warp_affine_invalid_image() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([0, 3].into(), vec![])?;
        let mut dst = Image::<_, 1>::from_size_val([2, 2].into(), 0u8)?;

        let res = super::warp_affine(
            &image,
            &mut dst,
            &AffineMatrix::identity(),
            InterpolationMode::Bilinear,
        );
        assert_eq!(res, Err(ImageError::InvalidImage(0, 3, 1)));

        let res = super::warp_affine_with(
            &dst.clone(),
            &mut dst,
            &AffineMatrix::identity(),
            InterpolationMode::Bilinear,
            ExecutionStrategy::Fixed(0),
            [0],
        );
        assert!(matches!(res, Err(ImageError::Parallel(_))));

        Ok(())
    }

    #[test]
    fn saturate_u8_rounds_and_clamps() {
        assert_eq!(super::saturate_u8(-3.0), 0);
        assert_eq!(super::saturate_u8(0.49), 0);
        assert_eq!(super::saturate_u8(254.5), 255);
        assert_eq!(super::saturate_u8(300.0), 255);
        assert_eq!(super::saturate_u8(127.6), 128);
    }

    #[test]
    fn invert_affine_roundtrip() {
        let m = super::get_rotation_matrix2d((3.0, 4.0), 30.0, 2.0);
        let m_inv = m.inverse();

        let (u, v) = m.transform_point(5.0, -2.0);
        let (x, y) = m_inv.transform_point(u, v);
        assert_relative_eq!(x, 5.0, epsilon = 1e-4);
        assert_relative_eq!(y, -2.0, epsilon = 1e-4);

        let singular = AffineMatrix::new([1.0, 2.0, 3.0, 2.0, 4.0, 5.0]);
        assert_eq!(singular.inverse().as_array(), &[0.0; 6]);
    }

    #[test]
    fn rotation_matrix2d_about_origin() {
        let m = super::get_rotation_matrix2d((0.0, 0.0), 90.0, 1.0);
        let expected = [0.0, 1.0, 0.0, -1.0, 0.0, 0.0];
        for (a, b) in m.as_array().iter().zip(expected.iter()) {
            assert_relative_eq!(*a, *b, epsilon = 1e-6);
        }
        assert_eq!(
            AffineMatrix::from_rows(m.rows()),
            m,
            "rows must round trip"
        );
    }
}
