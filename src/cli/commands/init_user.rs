//! `filevault init-user`: create the local user.

use crate::auth::CredentialStore;
use crate::cli::{output, prompt_new_password};
use crate::config::Settings;
use crate::errors::Result;

/// Execute the `init-user` command.
pub fn execute() -> Result<()> {
    let cwd = std::env::current_dir()?;
    let settings = Settings::load(&cwd)?;
    let store = CredentialStore::new(settings.credentials_path(&cwd));

    if store.exists() {
        output::info(&format!(
            "User already initialized ({})",
            store.path().display()
        ));
        return Ok(());
    }

    let password = prompt_new_password()?;
    store.create(password.as_bytes(), &settings.kdf_params()?)?;

    output::success(&format!("User created at {}", store.path().display()));
    output::tip("Run `filevault encrypt <path>` to protect files.");
    Ok(())
}
