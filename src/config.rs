//! Configuration management
//!
//! Handles loading of the JSON configuration file and resolution of API
//! credentials from the environment, the encrypted vault or the plain
//! secrets file.

use serde::{Deserialize, Serialize};
use serde_json::json;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::debug;

use crate::bittrex::{ClientConfig, Credentials, TradingOptions, API_BASE_URL};
use crate::common::{Backoff, RetryPolicy, CONNECT_RETRIES, CONNECT_WAIT};
use crate::error::{Error, Result};
use crate::storage;
use crate::vault::Vault;

/// Main configuration structure
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Plain `{"bittrex": {"Key", "Secret"}}` document
    pub secrets_path: PathBuf,
    /// Encrypted credential pair, preferred over the plain file when present
    pub vault_path: PathBuf,
    pub base_url: String,
    /// Per-attempt HTTP timeout
    pub timeout_secs: u64,
    pub retry: RetryConfig,
    pub options: TradingOptions,
}

impl Default for Config {
    fn default() -> Self {
        Config {
            secrets_path: PathBuf::from("database/secrets.json"),
            vault_path: PathBuf::from("database/vault.json"),
            base_url: API_BASE_URL.to_string(),
            timeout_secs: 30,
            retry: RetryConfig::default(),
            options: TradingOptions::default(),
        }
    }
}

/// Retry section of the configuration file
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct RetryConfig {
    pub max_attempts: u32,
    pub base_delay_ms: u64,
    pub backoff: Backoff,
    pub jitter: bool,
}

impl Default for RetryConfig {
    fn default() -> Self {
        RetryConfig {
            max_attempts: CONNECT_RETRIES,
            base_delay_ms: CONNECT_WAIT.as_millis() as u64,
            backoff: Backoff::Fixed,
            jitter: false,
        }
    }
}

impl From<&RetryConfig> for RetryPolicy {
    fn from(config: &RetryConfig) -> Self {
        RetryPolicy::default()
            .with_max_attempts(config.max_attempts)
            .with_base_delay(Duration::from_millis(config.base_delay_ms))
            .with_backoff(config.backoff)
            .with_jitter(config.jitter)
    }
}

impl Config {
    /// Load configuration from JSON file; absent fields take defaults
    pub fn from_file(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path)?;
        let config: Config = serde_json::from_str(&contents).map_err(|e| {
            Error::Configuration(format!("failed to parse {}: {}", path.display(), e))
        })?;

        if config.timeout_secs == 0 {
            return Err(Error::Configuration(
                "timeout_secs must be greater than zero".to_string(),
            ));
        }

        Ok(config)
    }

    /// Load from `path` when given, otherwise use defaults
    pub fn load(path: Option<&Path>) -> Result<Self> {
        match path {
            Some(path) => Self::from_file(path),
            None => Ok(Self::default()),
        }
    }

    pub fn client_config(&self) -> ClientConfig {
        ClientConfig::default()
            .with_base_url(self.base_url.clone())
            .with_timeout(Duration::from_secs(self.timeout_secs))
            .with_retry_policy(RetryPolicy::from(&self.retry))
            .with_options(self.options.clone())
    }

    /// Resolve credentials. `BITTREX_API_KEY`/`BITTREX_API_SECRET` win when
    /// both are set; otherwise see [`Self::credentials_from_files`].
    pub fn credentials(&self, vault_password: Option<&str>) -> Result<Credentials> {
        if std::env::var_os("BITTREX_API_KEY").is_some()
            && std::env::var_os("BITTREX_API_SECRET").is_some()
        {
            debug!("Using credentials from environment");
            return Credentials::from_env();
        }
        self.credentials_from_files(vault_password)
    }

    /// Open the vault when it exists, else read the plain secrets file
    /// (creating an empty template if it is missing). An existing vault
    /// without a password is an error.
    pub fn credentials_from_files(&self, vault_password: Option<&str>) -> Result<Credentials> {
        if self.vault_path.exists() {
            let password = vault_password.ok_or_else(|| {
                Error::Configuration(format!(
                    "{} exists but no vault password was given \
                     (set BITTREX_VAULT_PASSWORD or pass --vault-password)",
                    self.vault_path.display()
                ))
            })?;
            debug!("Using credentials from {}", self.vault_path.display());
            return Vault::load(&self.vault_path)?.open(password);
        }

        debug!("Using credentials from {}", self.secrets_path.display());
        let secrets = storage::read_json(&self.secrets_path, secrets_template())?;
        Credentials::from_secrets(&secrets)
    }
}

/// Empty secrets document written when none exists
pub fn secrets_template() -> serde_json::Value {
    json!({"bittrex": {"Key": null, "Secret": null}})
}
