use crate::shared::Result;
use anyhow::{bail, Context};
use std::fs;
use std::path::Path;

/// Upper bound for a cache entry (64 MB); nothing this tool writes comes close
pub const MAX_CACHE_FILE_SIZE: u64 = 64 * 1024 * 1024;

/// Maximum length of a single cache path component (account id, region, provider)
const MAX_PATH_COMPONENT_LENGTH: usize = 128;

/// Rejects `path` if it is a symbolic link
///
/// Uses `symlink_metadata()`, so the link itself is inspected rather than its target.
/// `operation` names what was about to happen ("read", "write") in the error.
///
/// # Errors
/// Returns an error if the path is a symbolic link or has no readable metadata
pub fn validate_not_symlink(path: &Path, operation: &str) -> Result<()> {
    let metadata = fs::symlink_metadata(path)
        .with_context(|| format!("Cannot {} {}: metadata unavailable", operation, path.display()))?;

    if metadata.file_type().is_symlink() {
        bail!(
            "Security: refusing to {} {} because it is a symbolic link",
            operation,
            path.display()
        );
    }
    Ok(())
}

/// Checks that `path` is a plain file and returns its length in bytes
///
/// # Errors
/// Returns an error for symbolic links, directories and other non-file entries
pub fn validate_regular_file(path: &Path, file_description: &str) -> Result<u64> {
    let metadata = fs::symlink_metadata(path)
        .with_context(|| format!("Cannot inspect {} at {}", file_description, path.display()))?;
    let file_type = metadata.file_type();

    if file_type.is_symlink() {
        bail!(
            "Security: {} at {} is a symbolic link and will not be followed",
            file_description,
            path.display()
        );
    }
    if !file_type.is_file() {
        bail!("{} at {} is not a regular file", file_description, path.display());
    }
    Ok(metadata.len())
}

/// Rejects files larger than `max_size` before they are read into memory
pub fn validate_file_size(file_size: u64, path: &Path, max_size: u64) -> Result<()> {
    if file_size <= max_size {
        return Ok(());
    }
    bail!(
        "Security: {} is too large ({} bytes, limit {} bytes)",
        path.display(),
        file_size,
        max_size
    )
}

/// Validates a value that becomes a single directory name under the cache root
///
/// # Security
/// Account ids and regions come from user input or a remote identity service.
/// They must not be able to address anything outside the cache directory.
///
/// # Errors
/// Returns an error if the component is empty, too long, `.`/`..`,
/// or contains characters other than alphanumerics, `-`, `_` and `.`
pub fn validate_path_component(value: &str, description: &str) -> Result<()> {
    if value.is_empty() {
        bail!("{} must not be empty", description);
    }

    if value.len() > MAX_PATH_COMPONENT_LENGTH {
        bail!(
            "{} is too long ({} bytes). Maximum allowed: {} bytes",
            description,
            value.len(),
            MAX_PATH_COMPONENT_LENGTH
        );
    }

    if value == "." || value == ".." {
        bail!("Security: {} '{}' is not a valid name", description, value);
    }

    if !value
        .chars()
        .all(|c| c.is_ascii_alphanumeric() || c == '-' || c == '_' || c == '.')
    {
        bail!(
            "Security: {} '{}' contains invalid characters. Only alphanumeric, hyphens, underscores and dots are allowed.",
            description,
            value
        );
    }

    Ok(())
}
