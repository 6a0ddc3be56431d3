//! Output-path policy for in-place encryption and decryption.

use std::ffi::OsString;
use std::path::{Path, PathBuf};

use crate::errors::{Result, VaultError};

/// Appended to an output name that would otherwise overwrite its input.
const COLLISION_SUFFIX: &str = ".out";

/// Replace the extension of `path`'s file name with `suffix`.
///
/// The extension starts at the last `.` of the file name, except that a
/// leading dot (as in `.bashrc`) does not start one.  The directory prefix
/// is kept as-is.
///
/// ```
/// use std::path::Path;
/// use filevault::walk::paths::derive_path;
///
/// assert_eq!(derive_path(Path::new("dir/file.txt"), ".enc").unwrap(), Path::new("dir/file.enc"));
/// assert_eq!(derive_path(Path::new(".bashrc"), ".enc").unwrap(), Path::new(".bashrc.enc"));
/// ```
pub fn derive_path(path: &Path, suffix: &str) -> Result<PathBuf> {
    let stem = path
        .file_stem()
        .ok_or_else(|| VaultError::InvalidPath(path.to_path_buf()))?;

    let mut name = OsString::with_capacity(stem.len() + suffix.len());
    name.push(stem);
    name.push(suffix);
    Ok(path.with_file_name(name))
}

/// Make sure `output` does not point at `input`.
///
/// A colliding output gets `.out` appended to its file name.
pub fn disambiguate(input: &Path, output: PathBuf) -> PathBuf {
    if output != input {
        return output;
    }

    let mut name = output.file_name().unwrap_or_default().to_os_string();
    name.push(COLLISION_SUFFIX);
    output.with_file_name(name)
}

/// Does the file name of `path` end with `suffix`?
pub fn has_suffix(path: &Path, suffix: &str) -> bool {
    path.file_name()
        .map(|name| name.as_encoded_bytes().ends_with(suffix.as_bytes()))
        .unwrap_or(false)
}
