// Copyright (c) 2026 100monkeys.ai
// SPDX-License-Identifier: AGPL-3.0

//! # Secret Codec
//!
//! Symmetric encryption of credential strings for at-rest storage.
//!
//! Wire format: `base64(nonce[12] ‖ ciphertext ‖ tag[16])`, AES-256-GCM,
//! a fresh random nonce per call. The key must be exactly 32 bytes; any
//! other length is rejected before any cryptographic work.

use aes_gcm::aead::{Aead, AeadCore, KeyInit, OsRng};
use aes_gcm::{Aes256Gcm, Nonce};
use base64::{engine::general_purpose::STANDARD, Engine as _};
use std::fmt;
use thiserror::Error;

use crate::domain::repository::RepositoryError;

pub const KEY_LEN: usize = 32;
pub const NONCE_LEN: usize = 12;
pub const TAG_LEN: usize = 16;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum CryptoError {
    #[error("encryption key must be {KEY_LEN} bytes, got {0}")]
    InvalidKeyLength(usize),

    #[error("ciphertext is {0} bytes, shorter than nonce plus tag")]
    Truncated(usize),

    #[error("ciphertext is not valid base64: {0}")]
    Encoding(String),

    #[error("ciphertext failed authentication")]
    Authentication,

    #[error("encryption failed")]
    Encryption,

    #[error("decrypted secret is not valid UTF-8")]
    Utf8,
}

impl From<CryptoError> for RepositoryError {
    fn from(err: CryptoError) -> Self {
        RepositoryError::Encryption(err.to_string())
    }
}

fn cipher_for(key: &[u8]) -> Result<Aes256Gcm, CryptoError> {
    if key.len() != KEY_LEN {
        return Err(CryptoError::InvalidKeyLength(key.len()));
    }
    Aes256Gcm::new_from_slice(key).map_err(|_| CryptoError::InvalidKeyLength(key.len()))
}

/// Encrypt `plaintext` under `key`.
pub fn encrypt(plaintext: &str, key: &[u8]) -> Result<String, CryptoError> {
    let cipher = cipher_for(key)?;
    let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
    let sealed = cipher
        .encrypt(&nonce, plaintext.as_bytes())
        .map_err(|_| CryptoError::Encryption)?;

    let mut blob = Vec::with_capacity(NONCE_LEN + sealed.len());
    blob.extend_from_slice(nonce.as_slice());
    blob.extend_from_slice(&sealed);
    Ok(STANDARD.encode(blob))
}

/// Decrypt a blob produced by [`encrypt`].
pub fn decrypt(blob: &str, key: &[u8]) -> Result<String, CryptoError> {
    let cipher = cipher_for(key)?;
    let data = STANDARD
        .decode(blob.trim())
        .map_err(|e| CryptoError::Encoding(e.to_string()))?;
    if data.len() < NONCE_LEN + TAG_LEN {
        return Err(CryptoError::Truncated(data.len()));
    }

    let (nonce, sealed) = data.split_at(NONCE_LEN);
    let plain = cipher
        .decrypt(Nonce::from_slice(nonce), sealed)
        .map_err(|_| CryptoError::Authentication)?;
    String::from_utf8(plain).map_err(|_| CryptoError::Utf8)
}

/// A validated key, shared by every repository that stores credentials.
#[derive(Clone)]
pub struct SecretCodec {
    key: [u8; KEY_LEN],
}

impl SecretCodec {
    pub fn new(key: &[u8]) -> Result<Self, CryptoError> {
        let key: [u8; KEY_LEN] = key
            .try_into()
            .map_err(|_| CryptoError::InvalidKeyLength(key.len()))?;
        Ok(Self { key })
    }

    /// Key material as provisioned in configuration: base64 of 32 bytes.
    pub fn from_base64(encoded: &str) -> Result<Self, CryptoError> {
        let key = STANDARD
            .decode(encoded.trim())
            .map_err(|e| CryptoError::Encoding(e.to_string()))?;
        Self::new(&key)
    }

    pub fn encrypt(&self, plaintext: &str) -> Result<String, CryptoError> {
        encrypt(plaintext, &self.key)
    }

    pub fn decrypt(&self, blob: &str) -> Result<String, CryptoError> {
        decrypt(blob, &self.key)
    }
}

impl fmt::Debug for SecretCodec {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("SecretCodec").field("key", &"<redacted>").finish()
    }
}
