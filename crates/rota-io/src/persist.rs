use std::{fs, io::Write, path::Path};

use tempfile::Builder;

use crate::error::IoError;

/// Mode requested for new files, before the process umask applies.
#[cfg(unix)]
const NEW_FILE_MODE: u32 = 0o666;

/// Write `bytes` to `file_path` so that the file either holds the complete
/// content or is left untouched.
///
/// The data goes to a temporary file in the destination directory first and
/// is renamed over `file_path` once fully flushed. A new file gets the same
/// permissions as one made by [`std::fs::write`]; an existing file keeps its
/// own.
pub(crate) fn write_file_atomic(file_path: &Path, bytes: &[u8]) -> Result<(), IoError> {
    let dir = match file_path.parent() {
        Some(parent) if !parent.as_os_str().is_empty() => parent,
        _ => Path::new("."),
    };

    let mut builder = Builder::new();
    #[cfg(unix)]
    {
        use std::os::unix::fs::PermissionsExt;
        builder.permissions(fs::Permissions::from_mode(NEW_FILE_MODE));
    }

    let mut tmp = builder
        .tempfile_in(dir)
        .map_err(IoError::WriteFileError)?;

    if let Ok(metadata) = fs::metadata(file_path) {
        tmp.as_file()
            .set_permissions(metadata.permissions())
            .map_err(IoError::WriteFileError)?;
    }

    tmp.write_all(bytes).map_err(IoError::WriteFileError)?;
    tmp.as_file().sync_all().map_err(IoError::WriteFileError)?;
    tmp.persist(file_path)?;

    log::debug!("wrote {} bytes to {}", bytes.len(), file_path.display());

    Ok(())
}
