use std::path::Path;

use rota_image::{Image, ImageSize};

use crate::{
    error::IoError,
    jpeg::{write_image_jpeg_gray8, write_image_jpeg_rgb8, DEFAULT_JPEG_QUALITY},
    png::{
        write_image_png_gray8, write_image_png_gray_alpha8, write_image_png_rgb8,
        write_image_png_rgba8,
    },
};

/// A decoded 8-bit image with any of the supported channel layouts.
#[derive(Debug, Clone, PartialEq)]
pub enum GenericImage {
    /// 8-bit grayscale image
    L8(Image<u8, 1>),
    /// 8-bit grayscale image with alpha channel
    La8(Image<u8, 2>),
    /// 8-bit RGB image
    Rgb8(Image<u8, 3>),
    /// 8-bit RGB image with alpha channel
    Rgba8(Image<u8, 4>),
}

impl GenericImage {
    /// The size of the image in pixels.
    pub fn size(&self) -> ImageSize {
        match self {
            GenericImage::L8(img) => img.size(),
            GenericImage::La8(img) => img.size(),
            GenericImage::Rgb8(img) => img.size(),
            GenericImage::Rgba8(img) => img.size(),
        }
    }

    /// The number of interleaved channels per pixel.
    pub fn num_channels(&self) -> usize {
        match self {
            GenericImage::L8(_) => 1,
            GenericImage::La8(_) => 2,
            GenericImage::Rgb8(_) => 3,
            GenericImage::Rgba8(_) => 4,
        }
    }
}

/// Reads an image from the given file path.
///
/// The format is guessed from the file content, so any format enabled in the
/// image crate works. Images with 16-bit or floating point samples are
/// converted to 8 bits per channel, keeping their channel layout.
///
/// # Arguments
///
/// * `file_path` - The path to a valid image file.
///
/// # Returns
///
/// An image containing the image data.
///
/// # Errors
///
/// Fails with [`IoError::FileDoesNotExist`] for a missing path and with
/// [`IoError::ImageDecodeError`] when the content cannot be decoded.
pub fn read_image_any(file_path: impl AsRef<Path>) -> Result<GenericImage, IoError> {
    let file_path = file_path.as_ref();

    // verify the file exists
    if !file_path.exists() {
        return Err(IoError::FileDoesNotExist(file_path.to_path_buf()));
    }

    let bytes = std::fs::read(file_path).map_err(IoError::ReadFileError)?;

    let img = image::ImageReader::new(std::io::Cursor::new(bytes))
        .with_guessed_format()
        .map_err(IoError::ReadFileError)?
        .decode()?;

    let size = ImageSize {
        width: img.width() as usize,
        height: img.height() as usize,
    };

    log::debug!(
        "decoded {} as {:?} with size {}",
        file_path.display(),
        img.color(),
        size
    );

    let image = match img.color() {
        image::ColorType::L8 | image::ColorType::L16 => {
            GenericImage::L8(Image::new(size, img.into_luma8().into_raw())?)
        }
        image::ColorType::La8 | image::ColorType::La16 => {
            GenericImage::La8(Image::new(size, img.into_luma_alpha8().into_raw())?)
        }
        image::ColorType::Rgb8 | image::ColorType::Rgb16 | image::ColorType::Rgb32F => {
            GenericImage::Rgb8(Image::new(size, img.into_rgb8().into_raw())?)
        }
        image::ColorType::Rgba8 | image::ColorType::Rgba16 | image::ColorType::Rgba32F => {
            GenericImage::Rgba8(Image::new(size, img.into_rgba8().into_raw())?)
        }
        _ => return Err(IoError::UnsupportedImageFormat),
    };

    Ok(image)
}

/// Writes an image to the given file path.
///
/// The encoder is picked from the file extension: `png` stores every channel
/// layout, `jpg` and `jpeg` store grayscale and RGB images only. The file is
/// written atomically, so a failed write leaves no partial output behind.
///
/// # Arguments
///
/// * `file_path` - The destination path.
/// * `image` - The image to encode.
pub fn write_image_any(file_path: impl AsRef<Path>, image: &GenericImage) -> Result<(), IoError> {
    let file_path = file_path.as_ref();

    let extension = file_path
        .extension()
        .and_then(|ext| ext.to_str())
        .map(|ext| ext.to_ascii_lowercase())
        .ok_or_else(|| IoError::InvalidFileExtension(file_path.to_path_buf()))?;

    match (extension.as_str(), image) {
        ("png", GenericImage::L8(img)) => write_image_png_gray8(file_path, img),
        ("png", GenericImage::La8(img)) => write_image_png_gray_alpha8(file_path, img),
        ("png", GenericImage::Rgb8(img)) => write_image_png_rgb8(file_path, img),
        ("png", GenericImage::Rgba8(img)) => write_image_png_rgba8(file_path, img),
        ("jpg" | "jpeg", GenericImage::L8(img)) => {
            write_image_jpeg_gray8(file_path, img, DEFAULT_JPEG_QUALITY)
        }
        ("jpg" | "jpeg", GenericImage::Rgb8(img)) => {
            write_image_jpeg_rgb8(file_path, img, DEFAULT_JPEG_QUALITY)
        }
        ("jpg" | "jpeg", other) => Err(IoError::UnsupportedChannels(
            file_path.to_path_buf(),
            other.num_channels(),
        )),
        _ => Err(IoError::InvalidFileExtension(file_path.to_path_buf())),
    }
}
