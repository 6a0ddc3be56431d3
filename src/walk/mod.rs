//! Recursive encrypt / decrypt over files and directory trees.
//!
//! `apply` walks a path without following symlinks.  Regular files are
//! transformed (unless they are the credential file or already carry the
//! operation's output suffix), directories are recursed into in name
//! order, and everything else is skipped.  The first failure aborts the
//! whole walk; files handled before it stay handled, and the returned
//! `WalkReport` says exactly which ones those were.

pub mod paths;

use std::fs;
use std::path::{Path, PathBuf};

use crate::crypto::{legacy, stream, KdfParams};
use crate::errors::{Result, VaultError};
use crate::format::{sniff_file, ContainerFormat};

/// Suffix given to files produced by `Operation::Encrypt`.
pub const ENCRYPTED_SUFFIX: &str = ".enc";

/// Default suffix given to files produced by `Operation::Decrypt`.
pub const DEFAULT_DECRYPTED_SUFFIX: &str = ".dec";

/// Default name of the credential file, never touched by a walk.
pub const CREDENTIALS_FILE: &str = "user.pass";

// ---------------------------------------------------------------------------
// Operation
// ---------------------------------------------------------------------------

/// What to do to each regular file.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Operation {
    /// Stream-encrypt into `<stem>.enc`.
    Encrypt,
    /// Decrypt (legacy or streaming, by magic) into `<stem><suffix>`.
    Decrypt { suffix: String },
}

impl Operation {
    /// A decrypt operation; an empty or missing suffix means `.dec`.
    pub fn decrypt(suffix: Option<&str>) -> Self {
        let suffix = match suffix {
            Some(s) if !s.is_empty() => s.to_string(),
            _ => DEFAULT_DECRYPTED_SUFFIX.to_string(),
        };
        Operation::Decrypt { suffix }
    }

    /// Suffix of the files this operation produces.
    pub fn output_suffix(&self) -> &str {
        match self {
            Operation::Encrypt => ENCRYPTED_SUFFIX,
            Operation::Decrypt { suffix } => suffix,
        }
    }

    /// Files that already look like this operation's output are left alone.
    pub fn already_done(&self, path: &Path) -> bool {
        paths::has_suffix(path, self.output_suffix())
    }

    /// Short verb for messages.
    pub fn verb(&self) -> &'static str {
        match self {
            Operation::Encrypt => "encrypt",
            Operation::Decrypt { .. } => "decrypt",
        }
    }

    /// Transform one regular file into `output`.
    fn run(&self, input: &Path, output: &Path, password: &[u8], options: &WalkOptions) -> Result<()> {
        match self {
            Operation::Encrypt => {
                stream::encrypt_file(input, output, password, &options.kdf)?;
            }
            Operation::Decrypt { .. } => match sniff_file(input)? {
                ContainerFormat::Legacy => legacy::decrypt_file(input, output, password)?,
                ContainerFormat::Stream | ContainerFormat::Unknown => {
                    stream::decrypt_file(input, output, password)?;
                }
            },
        }
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Options and report
// ---------------------------------------------------------------------------

/// Per-run configuration, fixed before the walk starts.
#[derive(Debug, Clone)]
pub struct WalkOptions {
    /// Remove each source file after its output has been committed.
    pub delete_on_success: bool,
    /// File name that is never encrypted or decrypted.
    pub credentials_name: String,
    /// Cost used for new stream encryptions.
    pub kdf: KdfParams,
}

impl Default for WalkOptions {
    fn default() -> Self {
        Self {
            delete_on_success: false,
            credentials_name: CREDENTIALS_FILE.to_string(),
            kdf: KdfParams::default(),
        }
    }
}

/// A file that was transformed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Processed {
    pub input: PathBuf,
    pub output: PathBuf,
    /// `output` already existed and was overwritten.
    pub replaced: bool,
    /// Whether the input was deleted afterwards.
    pub source_removed: bool,
}

/// Why a path was left alone.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SkipReason {
    /// The reserved credential file.
    Credentials,
    /// Name already ends with the operation's output suffix.
    AlreadyDone,
    /// Symlink, device, FIFO or socket.
    NotRegular,
}

/// Outcome of one `apply` call.
#[derive(Debug, Default)]
pub struct WalkReport {
    /// Transformed files, in the order they were handled.
    pub processed: Vec<Processed>,
    /// Paths left alone.
    pub skipped: Vec<(PathBuf, SkipReason)>,
    /// The path and error that aborted the walk, if any.
    pub failure: Option<(PathBuf, VaultError)>,
}

impl WalkReport {
    pub fn is_success(&self) -> bool {
        self.failure.is_none()
    }

    /// Outputs that overwrote a file which was already there.
    pub fn replaced_outputs(&self) -> impl Iterator<Item = &Path> {
        self.processed
            .iter()
            .filter(|p| p.replaced)
            .map(|p| p.output.as_path())
    }

    /// Files whose source should have been deleted but was not.
    pub fn retained_sources(&self) -> impl Iterator<Item = &Path> {
        self.processed
            .iter()
            .filter(|p| !p.source_removed)
            .map(|p| p.input.as_path())
    }

    /// `Err` with the aborting error, or the report itself.
    pub fn into_result(mut self) -> Result<Self> {
        match self.failure.take() {
            Some((_, error)) => Err(error),
            None => Ok(self),
        }
    }
}

// ---------------------------------------------------------------------------
// Walk
// ---------------------------------------------------------------------------

/// Apply `op` to `root` and, if it is a directory, to everything below it.
///
/// Never returns early with an error: the failure (if any) is recorded in
/// the report together with everything that was done before it.
pub fn apply(op: &Operation, root: &Path, password: &[u8], options: &WalkOptions) -> WalkReport {
    let mut walker = Walker {
        op,
        password,
        options,
        report: WalkReport::default(),
    };

    if let Err((path, error)) = walker.visit(root) {
        tracing::debug!("{} aborted at {}: {error}", op.verb(), path.display());
        walker.report.failure = Some((path, error));
    }
    walker.report
}

struct Walker<'a> {
    op: &'a Operation,
    password: &'a [u8],
    options: &'a WalkOptions,
    report: WalkReport,
}

type VisitResult = std::result::Result<(), (PathBuf, VaultError)>;

impl Walker<'_> {
    fn visit(&mut self, path: &Path) -> VisitResult {
        let meta = fs::symlink_metadata(path).map_err(|source| traversal(path, source))?;
        let file_type = meta.file_type();

        if file_type.is_file() {
            self.visit_file(path)
        } else if file_type.is_dir() {
            self.visit_dir(path)
        } else {
            tracing::debug!("skipping non-regular file {}", path.display());
            self.skip(path, SkipReason::NotRegular);
            Ok(())
        }
    }

    fn visit_dir(&mut self, dir: &Path) -> VisitResult {
        // List everything up front so outputs and temp files created while
        // processing are never visited.
        let mut children = Vec::new();
        for entry in fs::read_dir(dir).map_err(|source| traversal(dir, source))? {
            let entry = entry.map_err(|source| traversal(dir, source))?;
            children.push(entry.path());
        }
        children.sort();

        for child in children {
            self.visit(&child)?;
        }
        Ok(())
    }

    fn visit_file(&mut self, path: &Path) -> VisitResult {
        let is_credentials = path
            .file_name()
            .is_some_and(|name| name == self.options.credentials_name.as_str());
        if is_credentials {
            self.skip(path, SkipReason::Credentials);
            return Ok(());
        }
        if self.op.already_done(path) {
            self.skip(path, SkipReason::AlreadyDone);
            return Ok(());
        }

        let output = paths::derive_path(path, self.op.output_suffix())
            .map(|out| paths::disambiguate(path, out))
            .map_err(|e| (path.to_path_buf(), e))?;

        let replaced = fs::symlink_metadata(&output).is_ok();
        if replaced {
            let earlier = self.report.processed.iter().find(|p| p.output == output);
            match earlier {
                Some(p) => tracing::warn!(
                    "{} replaces the output of {} written earlier in this run",
                    path.display(),
                    p.input.display()
                ),
                None => tracing::warn!("replacing existing file {}", output.display()),
            }
        }

        self.op
            .run(path, &output, self.password, self.options)
            .map_err(|e| (path.to_path_buf(), e))?;

        let source_removed = self.options.delete_on_success && remove_source(path);
        self.report.processed.push(Processed {
            input: path.to_path_buf(),
            output,
            replaced,
            source_removed,
        });
        Ok(())
    }

    fn skip(&mut self, path: &Path, reason: SkipReason) {
        self.report.skipped.push((path.to_path_buf(), reason));
    }
}

/// Delete a source file after success.  Failure is logged, not fatal.
fn remove_source(path: &Path) -> bool {
    match fs::remove_file(path) {
        Ok(()) => true,
        Err(e) => {
            tracing::warn!("could not delete original file {}: {e}", path.display());
            false
        }
    }
}

fn traversal(path: &Path, source: std::io::Error) -> (PathBuf, VaultError) {
    (
        path.to_path_buf(),
        VaultError::Traversal {
            path: path.to_path_buf(),
            source,
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn empty_decrypt_suffix_falls_back_to_default() {
        assert_eq!(Operation::decrypt(None).output_suffix(), ".dec");
        assert_eq!(Operation::decrypt(Some("")).output_suffix(), ".dec");
        assert_eq!(Operation::decrypt(Some(".txt")).output_suffix(), ".txt");
    }

    #[test]
    fn already_done_follows_the_operation() {
        let enc = Path::new("d/photo.enc");
        let dec = Path::new("d/photo.dec");
        assert!(Operation::Encrypt.already_done(enc));
        assert!(!Operation::Encrypt.already_done(dec));
        assert!(Operation::decrypt(None).already_done(dec));
        assert!(!Operation::decrypt(None).already_done(enc));
    }

    #[test]
    fn into_result_surfaces_the_failure() {
        let report = WalkReport {
            failure: Some((PathBuf::from("x"), VaultError::DecryptionFailed)),
            ..WalkReport::default()
        };
        assert!(!report.is_success());
        assert!(matches!(
            report.into_result(),
            Err(VaultError::DecryptionFailed)
        ));
    }

    #[test]
    fn missing_root_is_a_traversal_error() {
        let dir = tempfile::TempDir::new().unwrap();
        let report = apply(
            &Operation::Encrypt,
            &dir.path().join("nope"),
            b"pw",
            &WalkOptions::default(),
        );
        assert!(matches!(
            report.failure,
            Some((_, VaultError::Traversal { .. }))
        ));
        assert!(report.processed.is_empty());
    }
}
