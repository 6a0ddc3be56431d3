//! CLI module: argument parsing, password prompts and the subcommands.

pub mod commands;
pub mod output;

use std::path::PathBuf;

use clap::Parser;

use zeroize::Zeroizing;

use crate::errors::{Result, VaultError};

/// Minimum password length to prevent trivially weak passwords.
const MIN_PASSWORD_LEN: usize = 8;

/// Environment variable that supplies the password non-interactively.
pub const PASSWORD_ENV: &str = "FILEVAULT_PASSWORD";

/// Generic failure (init-user, configuration).
pub const EXIT_FAILURE: i32 = 1;
/// No input path given; clap also uses 2 for usage errors.
pub const EXIT_NO_INPUT: i32 = 2;
/// Missing user or wrong password.
pub const EXIT_LOGIN_FAILED: i32 = 3;
/// Encryption or decryption failed.
pub const EXIT_OPERATION_FAILED: i32 = 4;

/// filevault CLI: password-protected file encryption.
#[derive(Parser)]
#[command(
    name = "filevault",
    about = "Password-protected file and directory encryption",
    version
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// All available subcommands.
#[derive(clap::Subcommand)]
pub enum Commands {
    /// Create the local user (stores a password hash)
    InitUser,

    /// Encrypt a file or every file under a directory (writes <name>.enc)
    Encrypt {
        /// File or directory to encrypt
        path: Option<PathBuf>,

        /// Delete each original after it was encrypted successfully
        #[arg(long = "rm", alias = "delete")]
        rm: bool,
    },

    /// Decrypt a file or every file under a directory (writes <name><suffix>)
    Decrypt {
        /// File or directory to decrypt
        path: Option<PathBuf>,

        /// Suffix for decrypted files (default: .dec)
        suffix: Option<String>,

        /// Delete each encrypted file after it was decrypted successfully
        #[arg(long = "rm", alias = "delete")]
        rm: bool,
    },
}

/// Map a command failure to the process exit code.
pub fn exit_code(command: &Commands, err: &VaultError) -> i32 {
    if matches!(command, Commands::InitUser) {
        return EXIT_FAILURE;
    }
    match err {
        VaultError::NoInput => EXIT_NO_INPUT,
        VaultError::NotInitialized(_) | VaultError::LoginFailed | VaultError::CredentialError(_) => {
            EXIT_LOGIN_FAILED
        }
        VaultError::ConfigError(_) | VaultError::CommandFailed(_) => EXIT_FAILURE,
        _ => EXIT_OPERATION_FAILED,
    }
}

// ---------------------------------------------------------------------------
// Shared helpers used by multiple commands
// ---------------------------------------------------------------------------

/// Get the password, trying in order:
/// 1. `FILEVAULT_PASSWORD` env var (scripts, CI)
/// 2. Interactive hidden prompt
///
/// Returns `Zeroizing<String>` so the password is wiped from memory on drop.
pub fn prompt_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        return Ok(pw);
    }

    let pw = dialoguer::Password::new()
        .with_prompt("Enter password")
        .interact()
        .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?;
    Ok(Zeroizing::new(pw))
}

/// Prompt for a new password with confirmation (used by `init-user`).
///
/// Also respects `FILEVAULT_PASSWORD` for scripted usage.
/// Enforces a minimum password length.
pub fn prompt_new_password() -> Result<Zeroizing<String>> {
    if let Some(pw) = password_from_env() {
        if pw.len() < MIN_PASSWORD_LEN {
            return Err(VaultError::CommandFailed(format!(
                "password must be at least {MIN_PASSWORD_LEN} characters"
            )));
        }
        return Ok(pw);
    }

    loop {
        let password = Zeroizing::new(
            dialoguer::Password::new()
                .with_prompt("Create password")
                .with_confirmation("Confirm password", "Passwords do not match, try again")
                .interact()
                .map_err(|e| VaultError::CommandFailed(format!("password prompt: {e}")))?,
        );

        if password.len() < MIN_PASSWORD_LEN {
            output::warning(&format!(
                "Password must be at least {MIN_PASSWORD_LEN} characters. Try again."
            ));
            continue;
        }

        return Ok(password);
    }
}

fn password_from_env() -> Option<Zeroizing<String>> {
    match std::env::var(PASSWORD_ENV) {
        Ok(pw) if !pw.is_empty() => Some(Zeroizing::new(pw)),
        _ => None,
    }
}
