//! One module per subcommand.

pub mod decrypt;
pub mod encrypt;
pub mod init_user;

use std::path::{Path, PathBuf};

use crate::auth::CredentialStore;
use crate::cli::{output, prompt_password};
use crate::config::Settings;
use crate::errors::{Result, VaultError};
use crate::walk::{self, Operation};

/// Shared body of `encrypt` and `decrypt`: log in, walk `path`, report.
fn run_operation(
    op: &Operation,
    settings: &Settings,
    cwd: &Path,
    path: Option<&Path>,
    rm: bool,
) -> Result<()> {
    // 1. An input path is required before we ask for anything.
    let path: PathBuf = path.ok_or(VaultError::NoInput)?.to_path_buf();
    let options = settings.walk_options(rm)?;

    // 2. Log in against the stored credential.
    let store = CredentialStore::new(settings.credentials_path(cwd));
    if !store.exists() {
        output::tip("Run `filevault init-user` first.");
        return Err(VaultError::NotInitialized(store.path().to_path_buf()));
    }
    let password = prompt_password()?;
    store.login(password.as_bytes())?;
    output::success("Login successful");

    // 3. Process the tree.
    output::info(&format!("Processing {} ({})", path.display(), op.verb()));
    let report = walk::apply(op, &path, password.as_bytes(), &options);
    output::print_walk_summary(&report, options.delete_on_success);

    if let Some((failed, _)) = &report.failure {
        output::error(&format!("Stopped at {}", failed.display()));
    }
    let count = report.processed.len();
    report.into_result()?;

    output::success(&format!("{} {count} file(s)", done_verb(op)));
    Ok(())
}

fn done_verb(op: &Operation) -> &'static str {
    match op {
        Operation::Encrypt => "Encrypted",
        Operation::Decrypt { .. } => "Decrypted",
    }
}
