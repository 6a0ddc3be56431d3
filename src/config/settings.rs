use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};

use crate::crypto::kdf::KdfParams;
use crate::errors::{Result, VaultError};
use crate::walk::{WalkOptions, CREDENTIALS_FILE, DEFAULT_DECRYPTED_SUFFIX};

/// Project-level configuration, loaded from `.filevault.toml`.
///
/// Every field has a sensible default so filevault works out-of-the-box
/// without any config file at all.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Settings {
    /// Name of the credential file (relative to the working directory).
    /// Files with this name are never encrypted or decrypted.
    #[serde(default = "default_credentials_file")]
    pub credentials_file: String,

    /// Suffix for decrypted output when none is given on the command line.
    #[serde(default = "default_decrypt_suffix")]
    pub decrypt_suffix: String,

    /// Delete source files after a successful operation even without `--rm`.
    #[serde(default)]
    pub delete_on_success: bool,

    /// Argon2 memory cost in KiB for new encryptions (default: 256 MB).
    #[serde(default = "default_argon2_memory_kib")]
    pub argon2_memory_kib: u32,

    /// Argon2 iteration count for new encryptions (default: 3).
    #[serde(default = "default_argon2_iterations")]
    pub argon2_iterations: u32,
}

// ── Serde default helpers ────────────────────────────────────────────

fn default_credentials_file() -> String {
    CREDENTIALS_FILE.to_string()
}

fn default_decrypt_suffix() -> String {
    DEFAULT_DECRYPTED_SUFFIX.to_string()
}

fn default_argon2_memory_kib() -> u32 {
    KdfParams::MODERATE.memory_kib
}

fn default_argon2_iterations() -> u32 {
    KdfParams::MODERATE.iterations
}

// ── Implementation ───────────────────────────────────────────────────

impl Default for Settings {
    fn default() -> Self {
        Self {
            credentials_file: default_credentials_file(),
            decrypt_suffix: default_decrypt_suffix(),
            delete_on_success: false,
            argon2_memory_kib: default_argon2_memory_kib(),
            argon2_iterations: default_argon2_iterations(),
        }
    }
}

impl Settings {
    /// Name of the config file we look for in the working directory.
    pub const FILE_NAME: &'static str = ".filevault.toml";

    /// Load settings from `<dir>/.filevault.toml`.
    ///
    /// If the file does not exist, sensible defaults are returned.
    /// If the file exists but cannot be parsed, an error is returned.
    pub fn load(dir: &Path) -> Result<Self> {
        let config_path = dir.join(Self::FILE_NAME);

        if !config_path.exists() {
            return Ok(Self::default());
        }

        let contents = std::fs::read_to_string(&config_path)?;

        let settings: Settings = toml::from_str(&contents).map_err(|e| {
            VaultError::ConfigError(format!("Failed to parse {}: {e}", config_path.display()))
        })?;

        Ok(settings)
    }

    /// Full path of the credential file.
    pub fn credentials_path(&self, dir: &Path) -> PathBuf {
        dir.join(&self.credentials_file)
    }

    /// Convert the Argon2 settings into validated KDF params.
    pub fn kdf_params(&self) -> Result<KdfParams> {
        let params = KdfParams {
            memory_kib: self.argon2_memory_kib,
            iterations: self.argon2_iterations,
        };
        params
            .validate()
            .map_err(|e| VaultError::ConfigError(format!("{}: {e}", Self::FILE_NAME)))?;
        Ok(params)
    }

    /// Walk options for one run; `force_delete` is the `--rm` flag.
    pub fn walk_options(&self, force_delete: bool) -> Result<WalkOptions> {
        let credentials_name = Path::new(&self.credentials_file)
            .file_name()
            .map(|n| n.to_string_lossy().into_owned())
            .ok_or_else(|| {
                VaultError::ConfigError(format!(
                    "credentials_file '{}' has no file name",
                    self.credentials_file
                ))
            })?;

        Ok(WalkOptions {
            delete_on_success: self.delete_on_success || force_delete,
            credentials_name,
            kdf: self.kdf_params()?,
        })
    }
}

// ── Tests ────────────────────────────────────────────────────────────
