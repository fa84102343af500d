//! Credential storage commands

use anyhow::{Context, Result};
use bittrex_client::bittrex::Credentials;
use bittrex_client::vault::Vault;
use bittrex_client::{storage, Config};
use tracing::info;

use super::mask;

/// Write the pair to the plain secrets file
pub fn store(config: &Config, key: String, secret: String) -> Result<()> {
    let credentials = Credentials::new(key, secret)?;
    storage::write_json(&config.secrets_path, &credentials.to_secrets())
        .with_context(|| format!("Failed to write {}", config.secrets_path.display()))?;

    info!(
        "Stored API key {} in {}",
        mask(credentials.api_key()),
        config.secrets_path.display()
    );
    Ok(())
}

/// Seal the pair into the vault
pub fn encrypt(
    config: &Config,
    key: String,
    secret: String,
    vault_password: Option<&str>,
) -> Result<()> {
    let password = require_password(vault_password)?;
    let credentials = Credentials::new(key, secret)?;

    Vault::seal(&credentials, password)?
        .save(&config.vault_path)
        .with_context(|| format!("Failed to write {}", config.vault_path.display()))?;

    info!(
        "Encrypted API key {} into {}",
        mask(credentials.api_key()),
        config.vault_path.display()
    );
    Ok(())
}

/// Open the vault and report the key it holds
pub fn verify(config: &Config, vault_password: Option<&str>) -> Result<()> {
    let password = require_password(vault_password)?;
    let credentials = Vault::load(&config.vault_path)?
        .open(password)
        .context("Vault did not open")?;

    info!("Vault OK, API key {}", mask(credentials.api_key()));
    Ok(())
}

fn require_password(vault_password: Option<&str>) -> Result<&str> {
    vault_password
        .filter(|p| !p.is_empty())
        .context("A vault password is required: set BITTREX_VAULT_PASSWORD or pass --vault-password")
}
