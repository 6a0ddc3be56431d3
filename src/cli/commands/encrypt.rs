//! `filevault encrypt`: encrypt a file or directory tree.

use std::path::Path;

use crate::config::Settings;
use crate::errors::Result;
use crate::walk::Operation;

/// Execute the `encrypt` command.
pub fn execute(path: Option<&Path>, rm: bool) -> Result<()> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    super::run_operation(&Operation::Encrypt, &settings, &cwd, path, rm)
}
