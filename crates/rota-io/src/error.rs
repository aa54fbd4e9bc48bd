/// An error type for the io module.
#[derive(thiserror::Error, Debug)]
pub enum IoError {
    /// Error when the file does not exist.
    #[error("File does not exist: {0}")]
    FileDoesNotExist(std::path::PathBuf),

    /// Invalid file extension.
    #[error("File does not have a valid extension: {0}")]
    InvalidFileExtension(std::path::PathBuf),

    /// Error to open the file.
    #[error("Failed to manipulate the file. {0}")]
    FileError(#[from] std::io::Error),

    /// The input file could not be read.
    #[error("Failed to read the file. {0}")]
    ReadFileError(std::io::Error),

    /// The output file could not be created or written.
    #[error("Failed to write the file. {0}")]
    WriteFileError(std::io::Error),

    /// Error to create the image.
    #[error("Failed to create image. {0}")]
    ImageCreationError(#[from] rota_image::ImageError),

    /// Error to decode the image.
    #[error("Failed to decode the image. {0}")]
    ImageDecodeError(#[from] image::ImageError),

    /// Error to encode the image.
    #[error("Failed to encode the image. {0}")]
    ImageEncodeError(image::ImageError),

    /// The decoded pixel layout is not supported.
    #[error("Unsupported image format")]
    UnsupportedImageFormat,

    /// The output format cannot store this number of channels.
    #[error("Cannot write {1} channels to {0}")]
    UnsupportedChannels(std::path::PathBuf, usize),

    /// Error to encode the PNG image.
    #[error("Failed to encode the png image. {0}")]
    PngEncodingError(String),

    /// Error to decode the PNG image.
    #[error("Failed to decode the png image. {0}")]
    PngDecodeError(String),

    /// The encoded file could not be moved into place.
    #[error("Failed to persist the file. {0}")]
    PersistError(#[from] tempfile::PersistError),
}

/// Coarse classification of an [`IoError`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IoErrorKind {
    /// The input could not be read or decoded.
    Decode,
    /// The output could not be encoded or written.
    Write,
    /// Any other failure.
    Other,
}

impl IoError {
    /// Whether the error happened while loading or while saving an image.
    pub fn kind(&self) -> IoErrorKind {
        match self {
            IoError::FileDoesNotExist(_)
            | IoError::ReadFileError(_)
            | IoError::ImageDecodeError(_)
            | IoError::PngDecodeError(_)
            | IoError::UnsupportedImageFormat => IoErrorKind::Decode,
            IoError::InvalidFileExtension(_)
            | IoError::WriteFileError(_)
            | IoError::ImageEncodeError(_)
            | IoError::UnsupportedChannels(..)
            | IoError::PngEncodingError(_)
            | IoError::PersistError(_) => IoErrorKind::Write,
            IoError::FileError(_) | IoError::ImageCreationError(_) => IoErrorKind::Other,
        }
    }
}
