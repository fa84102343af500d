//! JSON file helpers
//!
//! Used for the secrets file and the credential vault. Files are written with
//! four-space indentation.

use serde::de::DeserializeOwned;
use serde::Serialize;
use serde_json::ser::PrettyFormatter;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{info, warn};

use crate::error::Result;

/// Create the parent directory of `path` if it does not exist
pub fn ensure_parent_dir(path: impl AsRef<Path>) -> Result<()> {
    let path = path.as_ref();
    if let Some(parent) = path.parent() {
        if !parent.as_os_str().is_empty() && !parent.exists() {
            fs::create_dir_all(parent)?;
            info!("Created directory {}", parent.display());
        }
    }
    Ok(())
}

/// Read a JSON document, creating it with `default` when the file is missing
/// or does not parse. Other I/O failures are returned.
pub fn read_json<T>(path: impl AsRef<Path>, default: T) -> Result<T>
where
    T: Serialize + DeserializeOwned,
{
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    match fs::read_to_string(path) {
        Ok(contents) => match serde_json::from_str(&contents) {
            Ok(value) => return Ok(value),
            Err(e) => warn!(
                "{} is not valid JSON ({}), replacing with defaults",
                path.display(),
                e
            ),
        },
        Err(e) if e.kind() == ErrorKind::NotFound => {
            info!("{} not found, creating with defaults", path.display());
        }
        Err(e) => return Err(e.into()),
    }

    write_json(path, &default)?;
    Ok(default)
}

/// Overwrite `path` with `value` as indented JSON
pub fn write_json<T>(path: impl AsRef<Path>, value: &T) -> Result<()>
where
    T: Serialize + ?Sized,
{
    let path = path.as_ref();
    ensure_parent_dir(path)?;

    let mut buffer = Vec::new();
    let mut serializer =
        serde_json::Serializer::with_formatter(&mut buffer, PrettyFormatter::with_indent(b"    "));
    value.serialize(&mut serializer)?;

    fs::write(path, buffer)?;
    Ok(())
}
