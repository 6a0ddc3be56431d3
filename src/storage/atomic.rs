//! Durable, atomic file replacement.
//!
//! An `AtomicFile` writes into a uniquely named temp file in the same
//! directory as its target, so the final rename stays on one filesystem.
//! Until `commit` renames it into place, the target path is untouched:
//! readers see either the old file (or nothing) or the complete new one.

use std::fs::{self, File};
use std::io::{self, Write};
use std::path::{Path, PathBuf};

use tempfile::NamedTempFile;

use crate::errors::Result;

/// Leading part of every temp file name.
const TEMP_PREFIX: &str = ".filevault.";

/// A pending replacement of `target`.
///
/// Dropping it without calling `commit` deletes the temp file.
pub struct AtomicFile {
    target: PathBuf,
    temp: NamedTempFile,
}

impl AtomicFile {
    /// Create the temp file next to `target`, readable by the owner only.
    pub fn create(target: &Path) -> Result<Self> {
        // The temp name must not grow with the target's name (NAME_MAX).
        let temp = tempfile::Builder::new()
            .prefix(TEMP_PREFIX)
            .suffix(".tmp")
            .tempfile_in(parent_dir(target))?;
        restrict_permissions(temp.path())?;

        Ok(Self {
            target: target.to_path_buf(),
            temp,
        })
    }

    /// The path this file will replace on commit.
    pub fn target(&self) -> &Path {
        &self.target
    }

    /// Flush to stable storage and rename over the target.
    pub fn commit(mut self) -> Result<()> {
        self.temp.flush()?;
        self.temp.as_file().sync_all()?;

        let file = self.temp.persist(&self.target).map_err(|e| e.error)?;
        drop(file);

        // The rename has happened; nothing below may fail the commit.
        if let Err(e) = sync_dir(parent_dir(&self.target)) {
            tracing::warn!(
                "could not sync directory of {}: {e}",
                self.target.display()
            );
        }
        if let Err(e) = restrict_permissions(&self.target) {
            tracing::warn!(
                "could not restrict permissions on {}: {e}",
                self.target.display()
            );
        }

        tracing::debug!("committed {}", self.target.display());
        Ok(())
    }
}

impl Write for AtomicFile {
    fn write(&mut self, buf: &[u8]) -> io::Result<usize> {
        self.temp.write(buf)
    }

    fn flush(&mut self) -> io::Result<()> {
        self.temp.flush()
    }
}

/// Atomically replace `path` with `bytes`.
pub fn atomic_write(path: &Path, bytes: &[u8]) -> Result<()> {
    let mut file = AtomicFile::create(path)?;
    file.write_all(bytes)?;
    file.commit()
}

fn parent_dir(path: &Path) -> &Path {
    match path.parent() {
        Some(p) if !p.as_os_str().is_empty() => p,
        _ => Path::new("."),
    }
}

#[cfg(unix)]
fn restrict_permissions(path: &Path) -> io::Result<()> {
    use std::os::unix::fs::PermissionsExt;
    fs::set_permissions(path, fs::Permissions::from_mode(0o600))
}

#[cfg(not(unix))]
fn restrict_permissions(_path: &Path) -> io::Result<()> {
    Ok(())
}

#[cfg(unix)]
fn sync_dir(dir: &Path) -> io::Result<()> {
    File::open(dir)?.sync_all()
}

#[cfg(not(unix))]
fn sync_dir(_dir: &Path) -> io::Result<()> {
    Ok(())
}
