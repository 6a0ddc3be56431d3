//! `filevault decrypt`: decrypt a file or directory tree.

use std::path::Path;

use crate::config::Settings;
use crate::errors::Result;
use crate::walk::Operation;

/// Execute the `decrypt` command.
///
/// The suffix comes from the command line, then `.filevault.toml`.
pub fn execute(path: Option<&Path>, suffix: Option<&str>, rm: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    let suffix = suffix.unwrap_or(&settings.decrypt_suffix);
    let op = Operation::decrypt(Some(suffix));
    super::run_operation(&op, &settings, &cwd, path, rm)
}
