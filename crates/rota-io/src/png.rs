use std::{fs::File, io::BufReader, path::Path};

use png::{BitDepth, ColorType, Decoder, Encoder};
use rota_image::{Image, ImageSize};

use crate::{error::IoError, persist::write_file_atomic};

/// Read a PNG image with a single channel (mono8).
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A grayscale image with a single channel (mono8).
pub fn read_image_png_mono8(file_path: impl AsRef<Path>) -> Result<Image<u8, 1>, IoError> {
    let (buf, size) = read_png_impl(file_path, ColorType::Grayscale)?;
    Ok(Image::new(size.into(), buf)?)
}

/// Read a PNG image with three channels (rgb8).
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A RGB image with three channels (rgb8).
pub fn read_image_png_rgb8(file_path: impl AsRef<Path>) -> Result<Image<u8, 3>, IoError> {
    let (buf, size) = read_png_impl(file_path, ColorType::Rgb)?;
    Ok(Image::new(size.into(), buf)?)
}

/// Read a PNG image with four channels (rgba8).
///
/// # Arguments
///
/// * `file_path` - The path to the PNG file.
///
/// # Returns
///
/// A RGBA image with four channels (rgba8).
pub fn read_image_png_rgba8(file_path: impl AsRef<Path>) -> Result<Image<u8, 4>, IoError> {
    let (buf, size) = read_png_impl(file_path, ColorType::Rgba)?;
    Ok(Image::new(size.into(), buf)?)
}

// utility function to read the png file
fn read_png_impl(
    file_path: impl AsRef<Path>,
    expected: ColorType,
) -> Result<(Vec<u8>, [usize; 2]), IoError> {
    // verify the file exists
    let file_path = file_path.as_ref();
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    // verify the file extension
    let is_png = file_path
        .extension()
        .is_some_and(|ext| ext.eq_ignore_ascii_case("png"));
    if !is_png {
        return Err(IoError::InvalidFileExtension(file_path.to_path_buf()));
    }

    let file = File::open(file_path).map_err(IoError::ReadFileError)?;
    let mut reader = Decoder::new(BufReader::new(file))
        .read_info()
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    let mut buf = vec![0; reader.output_buffer_size()];
    let info = reader
        .next_frame(&mut buf)
        .map_err(|e| IoError::PngDecodeError(e.to_string()))?;

    if info.color_type != expected || info.bit_depth != BitDepth::Eight {
        return Err(IoError::PngDecodeError(format!(
            "expected 8-bit {:?}, found {:?}-bit {:?}",
            expected, info.bit_depth, info.color_type
        )));
    }

    buf.truncate(info.buffer_size());

    Ok((buf, [info.width as usize, info.height as usize]))
}

/// Writes the given PNG _(rgb8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the PNG image data.
pub fn write_image_png_rgb8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 3>,
) -> Result<(), IoError> {
    write_png_impl(file_path, image.as_slice(), image.size(), ColorType::Rgb)
}

/// Writes the given PNG _(rgba8)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the PNG image data.
pub fn write_image_png_rgba8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 4>,
) -> Result<(), IoError> {
    write_png_impl(file_path, image.as_slice(), image.size(), ColorType::Rgba)
}

/// Writes the given PNG _(grayscale 8-bit)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the PNG image data.
pub fn write_image_png_gray8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 1>,
) -> Result<(), IoError> {
    write_png_impl(
        file_path,
        image.as_slice(),
        image.size(),
        ColorType::Grayscale,
    )
}

/// Writes the given PNG _(grayscale with alpha, 8-bit)_ data to the given file path.
///
/// # Arguments
///
/// - `file_path` - The path to the PNG image.
/// - `image` - The image containing the PNG image data.
pub fn write_image_png_gray_alpha8(
    file_path: impl AsRef<Path>,
    image: &Image<u8, 2>,
) -> Result<(), IoError> {
    write_png_impl(
        file_path,
        image.as_slice(),
        image.size(),
        ColorType::GrayscaleAlpha,
    )
}

fn write_png_impl(
    file_path: impl AsRef<Path>,
    image_data: &[u8],
    image_size: ImageSize,
    color_type: ColorType,
) -> Result<(), IoError> {
    // encode in memory so a failure never leaves a partial file behind
    let mut bytes = Vec::new();
    {
        let mut encoder = Encoder::new(
            &mut bytes,
            image_size.width as u32,
            image_size.height as u32,
        );
        encoder.set_color(color_type);
        encoder.set_depth(BitDepth::Eight);

        let mut writer = encoder
            .write_header()
            .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
        writer
            .write_image_data(image_data)
            .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
        writer
            .finish()
            .map_err(|e| IoError::PngEncodingError(e.to_string()))?;
    }

    write_file_atomic(file_path.as_ref(), &bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::{IoError, IoErrorKind};

    #[test]
    fn read_write_png_rgb8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gradient-rgb8.png");

        let data = (0..5 * 3 * 3).map(|v| (v * 5) as u8).collect();
        let image = Image::<u8, 3>::new([5, 3].into(), data)?;
        write_image_png_rgb8(&file_path, &image)?;

        assert!(file_path.exists(), "File does not exist: {:?}", file_path);

        let image_back = read_image_png_rgb8(&file_path)?;
        assert_eq!(image_back, image);

        Ok(())
    }

    #[test]
    fn read_write_png_mono8_rgba8() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;

        let gray = Image::<u8, 1>::new([3, 2].into(), vec![0, 50, 100, 150, 200, 250])?;
        let gray_path = tmp_dir.path().join("gray.png");
        write_image_png_gray8(&gray_path, &gray)?;
        assert_eq!(read_image_png_mono8(&gray_path)?, gray);

        let rgba = Image::<u8, 4>::from_size_val([2, 2].into(), 77)?;
        let rgba_path = tmp_dir.path().join("rgba.PNG");
        write_image_png_rgba8(&rgba_path, &rgba)?;
        assert_eq!(read_image_png_rgba8(&rgba_path)?, rgba);

        Ok(())
    }

    #[test]
    fn read_png_wrong_layout() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("gray.png");

        let gray = Image::<u8, 1>::from_size_val([4, 4].into(), 3)?;
        write_image_png_gray8(&file_path, &gray)?;

        let res = read_image_png_rgb8(&file_path);
        assert!(matches!(res, Err(IoError::PngDecodeError(_))));

        Ok(())
    }

    #[test]
    fn read_png_missing_and_invalid() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;

        let missing = read_image_png_rgb8(tmp_dir.path().join("missing.png"));
        let err = missing.err().ok_or(IoError::UnsupportedImageFormat)?;
        assert!(matches!(err, IoError::FileDoesNotExist(_)));
        assert_eq!(err.kind(), IoErrorKind::Decode);

        let corrupt_path = tmp_dir.path().join("corrupt.png");
        std::fs::write(&corrupt_path, b"definitely not a png")?;
        let res = read_image_png_rgb8(&corrupt_path);
        assert!(matches!(res, Err(IoError::PngDecodeError(_))));

        let txt_path = tmp_dir.path().join("image.txt");
        std::fs::write(&txt_path, b"")?;
        let res = read_image_png_rgb8(&txt_path);
        assert!(matches!(res, Err(IoError::InvalidFileExtension(_))));

        Ok(())
    }

    #[test]
    fn write_png_wrong_buffer_leaves_no_file() -> Result<(), IoError> {
        let tmp_dir = tempfile::tempdir()?;
        let file_path = tmp_dir.path().join("broken.png");

        // the buffer is too short for the declared size
        let res = write_png_impl(
            &file_path,
            &[0u8; 5],
            [4, 4].into(),
            ColorType::Grayscale,
        );
        let err = res.err().ok_or(IoError::UnsupportedImageFormat)?;
        assert_eq!(err.kind(), IoErrorKind::Write);
        assert!(!file_path.exists());

        Ok(())
    }
}
