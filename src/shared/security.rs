use crate::shared::Result;
use std::fs;
use std::io;
use std::path::Path;

/// Maximum size accepted for inventory, policy and catalog files (16 MB)
pub const MAX_FILE_SIZE: u64 = 16 * 1024 * 1024;

/// Validates that a path exists and is a regular file (not a directory or symlink)
///
/// # Errors
/// Returns an error if:
/// - The path doesn't exist
/// - The path is a symbolic link
/// - The path is not a regular file
pub fn validate_regular_file(path: &Path, file_description: &str) -> Result<u64> {
    let metadata = fs::symlink_metadata(path).map_err(|e| {
        anyhow::anyhow!(
            "Failed to read {} metadata: {}",
            file_description,
            e
        )
    })?;

    if metadata.is_symlink() {
        anyhow::bail!(
            "Security: {} is a symbolic link. For security reasons, symbolic links are not allowed.",
            path.display()
        );
    }

    if !metadata.is_file() {
        anyhow::bail!("{} is not a regular file", path.display());
    }

    Ok(metadata.len())
}

/// Validates file size is within acceptable limits
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size > max_size {
        anyhow::bail!(
            "Security: {} is too large ({} bytes). Maximum allowed size is {} bytes.",
            path.display(),
            file_size,
            max_size
        );
    }
    Ok(())
}

/// Removes a leftover helper socket file.
///
/// Missing files are fine. Regular files and directories are left alone so a
/// misconfigured address can never delete data.
pub fn remove_stale_socket(path: &Path) -> Result<bool> {
    let metadata = match fs::symlink_metadata(path) {
        Ok(metadata) => metadata,
        Err(e) if e.kind() == io::ErrorKind::NotFound => return Ok(false),
        Err(e) => anyhow::bail!("Failed to inspect {}: {}", path.display(), e),
    };

    if metadata.is_file() || metadata.is_dir() {
        anyhow::bail!(
            "Refusing to remove {}: it is not a socket",
            path.display()
        );
    }

    fs::remove_file(path)
        .map_err(|e| anyhow::anyhow!("Failed to remove {}: {}", path.display(), e))?;
    Ok(true)
}
