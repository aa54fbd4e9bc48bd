use rota_image::Image;

/// Kernel for nearest neighbor interpolation
///
/// # Arguments
///
/// * `image` - The input image container.
/// * `u` - The x coordinate of the pixel to interpolate.
/// * `v` - The y coordinate of the pixel to interpolate.
///
/// # Returns
///
/// The interpolated pixel values.
pub(crate) fn nearest_neighbor_interpolation<const C: usize>(
    image: &Image<u8, C>,
    u: f32,
    v: f32,
) -> [f32; C] {
    let (rows, cols) = (image.rows() as i64, image.cols() as i64);

    let iu = (u.round() as i64).clamp(0, cols - 1) as usize;
    let iv = (v.round() as i64).clamp(0, rows - 1) as usize;

    let base = (iv * cols as usize + iu) * C;
    let src = &image.as_slice()[base..base + C];

    let mut pixel = [0.0; C];
    for (value, &sample) in pixel.iter_mut().zip(src) {
        *value = sample as f32;
    }

    pixel
}

#[cfg(test)]
mod tests {
    use rota_image::{Image, ImageError};

    #[test]
    fn nearest_rounds_and_clamps() -> Result<(), ImageError> {
        let image = Image::<u8, 1>::new([2, 2].into(), vec![0, 10, 20, 30])?;

        assert_eq!(super::nearest_neighbor_interpolation(&image, 0.4, 0.6), [20.0]);
        assert_eq!(super::nearest_neighbor_interpolation(&image, 0.6, 0.4), [10.0]);
        assert_eq!(super::nearest_neighbor_interpolation(&image, 5.0, -3.0), [10.0]);

        Ok(())
    }
}
