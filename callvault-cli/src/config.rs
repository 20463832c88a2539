//! Operator configuration.
//!
//! Loaded once at startup from a TOML file. Every field has a default, so
//! the tool runs without a configuration file.

use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use callvault_secure::consts::DEFAULT_PLAINTEXT_EXTENSION;
use serde::{Deserialize, Serialize};

/// Environment variable naming the configuration file.
pub const CONFIG_ENV: &str = "CALLVAULT_CONFIG";

/// Configuration file used when `CALLVAULT_CONFIG` is unset.
pub const DEFAULT_CONFIG_PATH: &str = "callvault.toml";

/// Complete configuration.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct CallvaultConfig {
    pub keys: KeySettings,
    pub storage: StorageSettings,
    pub logging: LoggingSettings,
}

/// Key locations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct KeySettings {
    /// PEM private key, PKCS#8 or PKCS#1.
    pub private_key_path: PathBuf,
    /// PEM public key, used by `seal`.
    pub public_key_path: PathBuf,
}

impl Default for KeySettings {
    fn default() -> Self {
        Self {
            private_key_path: PathBuf::from("keys/private_key.pem"),
            public_key_path: PathBuf::from("keys/public_key.pem"),
        }
    }
}

/// Where envelopes live and where plaintext is written.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct StorageSettings {
    pub encrypted_dir: PathBuf,
    pub decrypted_dir: PathBuf,
    /// Extension given to decrypted recordings.
    pub output_extension: String,
}

impl Default for StorageSettings {
    fn default() -> Self {
        Self {
            encrypted_dir: PathBuf::from("storage/encrypted"),
            decrypted_dir: PathBuf::from("storage/decrypted"),
            output_extension: DEFAULT_PLAINTEXT_EXTENSION.into(),
        }
    }
}

/// Logging settings. `RUST_LOG` takes precedence over `level`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct LoggingSettings {
    /// trace, debug, info, warn or error.
    pub level: String,
    /// `text` or `json`.
    pub format: String,
}

impl Default for LoggingSettings {
    fn default() -> Self {
        Self {
            level: "info".into(),
            format: "text".into(),
        }
    }
}

impl CallvaultConfig {
    /// Load from `path`. A missing file yields the defaults; a malformed one is an error.
    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        if !path.exists() {
            return Ok(Self::default());
        }
        let text = fs::read_to_string(path)
            .with_context(|| format!("reading config {}", path.display()))?;
        Self::from_toml_str(&text).with_context(|| format!("parsing config {}", path.display()))
    }

    pub fn from_toml_str(text: &str) -> Result<Self> {
        Ok(toml::from_str(text)?)
    }

    /// Where `decrypt` writes a recording when no output path is given.
    #[must_use]
    pub fn default_output_for(&self, input: &Path) -> PathBuf {
        let mut name = input.file_stem().unwrap_or(input.as_os_str()).to_os_string();
        name.push(".");
        name.push(&self.storage.output_extension);
        self.storage.decrypted_dir.join(name)
    }
}
