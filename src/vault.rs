//! Password-protected credential vault
//!
//! The API key and secret are sealed with AES-256-GCM. The key is derived
//! from a password with Argon2id over a random per-vault salt, and every
//! sealed field gets its own random 96-bit nonce stored next to the
//! ciphertext. The field name is bound as associated data so sealed values
//! cannot be swapped between fields.

use aes_gcm::{
    aead::{Aead, KeyInit, Payload},
    Aes256Gcm, Nonce,
};
use argon2::{Algorithm, Argon2, Params, Version};
use base64::{engine::general_purpose::STANDARD as BASE64, Engine as _};
use rand::rngs::OsRng;
use rand::RngCore;
use serde::{Deserialize, Serialize};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::info;

use crate::bittrex::Credentials;
use crate::error::{Error, Result};
use crate::storage;

const VAULT_VERSION: u8 = 1;
const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// One encrypted value
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
struct Sealed {
    nonce: String,
    ciphertext: String,
}

/// Encrypted credential pair as stored on disk
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Vault {
    version: u8,
    salt: String,
    key: Sealed,
    secret: Sealed,
}

impl Vault {
    /// Encrypt `credentials` under `password`
    pub fn seal(credentials: &Credentials, password: &str) -> Result<Self> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);

        let cipher = cipher_for(password, &salt)?;

        Ok(Self {
            version: VAULT_VERSION,
            salt: BASE64.encode(salt),
            key: encrypt(&cipher, "key", credentials.api_key())?,
            secret: encrypt(&cipher, "secret", credentials.api_secret())?,
        })
    }

    /// Decrypt the credential pair
    pub fn open(&self, password: &str) -> Result<Credentials> {
        if self.version != VAULT_VERSION {
            return Err(Error::Vault(format!(
                "unsupported vault version {}",
                self.version
            )));
        }

        let salt = decode("salt", &self.salt)?;
        let cipher = cipher_for(password, &salt)?;

        let api_key = decrypt(&cipher, "key", &self.key)?;
        let api_secret = decrypt(&cipher, "secret", &self.secret)?;
        Credentials::new(api_key, api_secret)
    }

    pub fn save(&self, path: impl AsRef<Path>) -> Result<()> {
        storage::write_json(path.as_ref(), self)?;
        info!("Vault written to {}", path.as_ref().display());
        Ok(())
    }

    pub fn load(path: impl AsRef<Path>) -> Result<Self> {
        let path = path.as_ref();
        let contents = fs::read_to_string(path).map_err(|e| match e.kind() {
            ErrorKind::NotFound => Error::Vault(format!("no vault at {}", path.display())),
            _ => Error::Io(e),
        })?;
        Ok(serde_json::from_str(&contents)?)
    }
}

fn cipher_for(password: &str, salt: &[u8]) -> Result<Aes256Gcm> {
    if password.is_empty() {
        return Err(Error::Vault("password must not be empty".to_string()));
    }

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, Params::default());
    let mut key = [0u8; KEY_LEN];
    argon2
        .hash_password_into(password.as_bytes(), salt, &mut key)
        .map_err(|e| Error::Vault(format!("key derivation failed: {}", e)))?;

    Aes256Gcm::new_from_slice(&key)
        .map_err(|e| Error::Vault(format!("failed to create cipher: {}", e)))
}

fn encrypt(cipher: &Aes256Gcm, field: &str, plaintext: &str) -> Result<Sealed> {
    let mut nonce_bytes = [0u8; NONCE_LEN];
    OsRng.fill_bytes(&mut nonce_bytes);

    let ciphertext = cipher.encrypt(
        Nonce::from_slice(&nonce_bytes),
        Payload {
            msg: plaintext.as_bytes(),
            aad: field.as_bytes(),
        },
    )?;

    Ok(Sealed {
        nonce: BASE64.encode(nonce_bytes),
        ciphertext: BASE64.encode(ciphertext),
    })
}

fn decrypt(cipher: &Aes256Gcm, field: &str, sealed: &Sealed) -> Result<String> {
    let nonce_bytes = decode("nonce", &sealed.nonce)?;
    if nonce_bytes.len() != NONCE_LEN {
        return Err(Error::Vault(format!("{} nonce has wrong length", field)));
    }
    let ciphertext = decode("ciphertext", &sealed.ciphertext)?;

    let plaintext = cipher
        .decrypt(
            Nonce::from_slice(&nonce_bytes),
            Payload {
                msg: &ciphertext,
                aad: field.as_bytes(),
            },
        )
        .map_err(|_| {
            Error::Vault(format!(
                "cannot decrypt {}: wrong password or corrupted vault",
                field
            ))
        })?;

    String::from_utf8(plaintext).map_err(|e| Error::Vault(format!("invalid UTF-8: {}", e)))
}

fn decode(what: &str, encoded: &str) -> Result<Vec<u8>> {
    BASE64
        .decode(encoded)
        .map_err(|e| Error::Vault(format!("invalid {}: {}", what, e)))
}
