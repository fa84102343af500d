//! Query commands: call one endpoint and print its result as JSON

use anyhow::{Context, Result};
use bittrex_client::{BittrexClient, Config};
use serde_json::Value;
use tracing::{debug, info};

use super::mask;

/// Run an unsigned endpoint
pub fn public<F>(config: &Config, call: F) -> Result<()>
where
    F: FnOnce(&BittrexClient) -> bittrex_client::Result<Value>,
{
    let client = BittrexClient::public(config.client_config())?;
    debug!("Using API root {}", client.base_url());
    let result = call(&client)?;
    print(&result)
}

/// Run a signed endpoint with credentials resolved from the configuration
pub fn signed<F>(config: &Config, vault_password: Option<&str>, call: F) -> Result<()>
where
    F: FnOnce(&BittrexClient) -> bittrex_client::Result<Value>,
{
    let credentials = config
        .credentials(vault_password)
        .context("Failed to load Bittrex credentials")?;
    info!("Using API key {}", mask(credentials.api_key()));

    let client = BittrexClient::with_config(credentials, config.client_config())?;
    let result = call(&client)?;
    print(&result)
}

fn print(value: &Value) -> Result<()> {
    println!("{}", serde_json::to_string_pretty(value)?);
    Ok(())
}
