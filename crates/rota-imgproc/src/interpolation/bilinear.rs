use rota_image::Image;

/// Kernel for bilinear interpolation
///
/// The four lattice neighbors `(x0, y0)`, `(x1, y0)`, `(x0, y1)`, `(x1, y1)`
/// with `x0 = floor(u)`, `x1 = x0 + 1` (same for `y`) are clamped to the image
/// independently before sampling.
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
pub(crate) fn bilinear_interpolation<const C: usize>(
    image: &Image<u8, C>,
    u: f32,
    v: f32,
) -> [f32; C] {
    let (rows, cols) = (image.rows() as i64, image.cols() as i64);

    let floor_u = u.floor();
    let floor_v = v.floor();

    let frac_u = u - floor_u;
    let frac_v = v - floor_v;

    let iu = floor_u as i64;
    let iv = floor_v as i64;

    let iu0 = iu.clamp(0, cols - 1) as usize;
    let iv0 = iv.clamp(0, rows - 1) as usize;
    let iu1 = iu.saturating_add(1).clamp(0, cols - 1) as usize;
    let iv1 = iv.saturating_add(1).clamp(0, rows - 1) as usize;

    let frac_uu = 1.0 - frac_u;
    let frac_vv = 1.0 - frac_v;

    let w00 = frac_uu * frac_vv;
    let w01 = frac_u * frac_vv;
    let w10 = frac_uu * frac_v;
    let w11 = frac_u * frac_v;

    let cols = cols as usize;
    let base00 = (iv0 * cols + iu0) * C;
    let base01 = (iv0 * cols + iu1) * C;
    let base10 = (iv1 * cols + iu0) * C;
    let base11 = (iv1 * cols + iu1) * C;

    let data = image.as_slice();

    let p00 = &data[base00..base00 + C];
    let p01 = &data[base01..base01 + C];
    let p10 = &data[base10..base10 + C];
    let p11 = &data[base11..base11 + C];

    let mut pixel = [0.0; C];
    for (k, value) in pixel.iter_mut().enumerate() {
        *value = p00[k] as f32 * w00
            + p01[k] as f32 * w01
            + p10[k] as f32 * w10
            + p11[k] as f32 * w11;
    }

    pixel
}
