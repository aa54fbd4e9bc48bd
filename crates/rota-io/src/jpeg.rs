use std::path::Path;

use image::{codecs::jpeg::JpegEncoder, ExtendedColorType};
use rota_image::{Image, ImageSize};

use crate::{error::IoError, persist::write_file_atomic};

/// Default quality used when encoding JPEG images.
pub const DEFAULT_JPEG_QUALITY: u8 = 95;

/// Writes the given JPEG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// * `file_path` - The path to the JPEG image.
/// * `image` - The image containing the JPEG image data.
/// * `quality` - The encoding quality in the range 1 to 100.
pub fn write_image_jpeg_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
    quality: u8,
) -> Result<(), IoError> {
    write_jpeg_impl(
        file_path,
        image.as_slice(),
        image.size(),
        ExtendedColorType::Rgb8,
        quality,
    )
}

/// Writes the given JPEG _(grayscale)_ data to the given file path.
///
/// # Arguments
///
/// * `file_path` - The path to the JPEG image.
/// * `image` - The image containing the JPEG image data.
/// * `quality` - The encoding quality in the range 1 to 100.
pub fn write_image_jpeg_gray8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
    quality: u8,
) -> Result<(), IoError> {
    write_jpeg_impl(
        file_path,
        image.as_slice(),
        image.size(),
        ExtendedColorType::L8,
        quality,
    )
}

fn write_jpeg_impl(
    file_path: impl AsRef<Path>,
    image_data: &[u8],
    image_size: ImageSize,
    color_type: ExtendedColorType,
    quality: u8,
) -> Result<(), IoError> {
    let mut bytes = Vec::new();
    JpegEncoder::new_with_quality(&mut bytes, quality.clamp(1, 100))
        .encode(
            image_data,
            image_size.width as u32,
            image_size.height as u32,
            color_type,
        )
        .map_err(IoError::ImageEncodeError)?;

    write_file_atomic(file_path.as_ref(), &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::functional::{read_image_any, GenericImage};

    #[test]
    fn write_jpeg_rgb8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("flat.jpg");

        let image = Image::<u8, 3>::from_size_val([32, 16].into(), 128)?;
        write_image_jpeg_rgb8(&file_path, &image, DEFAULT_JPEG_QUALITY)?;

        let GenericImage::Rgb8(image_back) = read_image_any(&file_path)? else {
            panic!("expected an rgb8 image");
        };
        assert_eq!(image_back.size(), image.size());

        // a flat image survives lossy compression almost unchanged
        for (a, b) in image_back.as_slice().iter().zip(image.as_slice()) {
            assert!(a.abs_diff(*b) <= 2, "{a} vs {b}");
        }

        Ok(())
    }

    #[test]
    fn write_jpeg_gray8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("flat.jpeg");

        let image = Image::<u8, 1>::from_size_val([8, 8].into(), 200)?;
        write_image_jpeg_gray8(&file_path, &image, 90)?;

        let image_back = read_image_any(&file_path)?;
        assert!(matches!(image_back, GenericImage::L8(_)));
        assert_eq!(image_back.size(), image.size());

        Ok(())
    }
}
