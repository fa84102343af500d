//! Subcommand implementations

pub mod query;
pub mod secrets;

/// Show only the first characters of an API key
pub fn mask(key: &str) -> String {
    let shown: String = key.chars().take(4).collect();
    format!("{}...", shown)
}
