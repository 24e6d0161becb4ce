//! At-rest encryption for the primary backend using Argon2id and AES-256-GCM.

use aes_gcm::{
    aead::{Aead, AeadCore, KeyInit, OsRng},
    Aes256Gcm, Key, Nonce,
};
use argon2::{password_hash::rand_core::RngCore, Argon2, Params, Version};
use base64::{engine::general_purpose::STANDARD, Engine};
use thiserror::Error;
use zeroize::{Zeroize, ZeroizeOnDrop};

/// Errors that can occur during cryptographic operations.
#[derive(Error, Debug)]
pub enum CryptoError {
    #[error("Encryption failed")]
    EncryptionFailed,
    #[error("Decryption failed")]
    DecryptionFailed,
    #[error("Invalid base64 encoding")]
    InvalidBase64,
    #[error("Key derivation failed")]
    KeyDerivationFailed,
}

const SALT_LEN: usize = 16;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;

/// Encrypts and decrypts backend values under a master password.
///
/// Each value is sealed independently with a fresh salt and nonce, and the
/// whole envelope (salt || nonce || ciphertext) travels as one base64
/// string so the backend contract stays a plain string store.
pub struct StoreCrypto {
    argon2_time_cost: u32,
    argon2_memory_cost: u32,
    argon2_parallelism: u32,
}

impl Default for StoreCrypto {
    fn default() -> Self {
        Self {
            argon2_time_cost: 2,
            argon2_memory_cost: 65536, // 64 MB
            argon2_parallelism: 1,
        }
    }
}

impl StoreCrypto {
    pub fn new() -> Self {
        Self::default()
    }

    /// Derive an AES-256 key from the master password.
    /// The key zeroes itself on drop.
    fn derive_key(&self, password: &str, salt: &[u8]) -> Result<DerivedKey, CryptoError> {
        let params = Params::new(
            self.argon2_memory_cost,
            self.argon2_time_cost,
            self.argon2_parallelism,
            Some(KEY_LEN),
        )
        .map_err(|_| CryptoError::KeyDerivationFailed)?;

        let argon2 = Argon2::new(argon2::Algorithm::Argon2id, Version::V0x13, params);

        let mut output = vec![0u8; KEY_LEN];
        argon2
            .hash_password_into(password.as_bytes(), salt, &mut output)
            .map_err(|_| CryptoError::KeyDerivationFailed)?;

        Ok(DerivedKey(output))
    }

    /// Seal a plaintext value, returning a base64 envelope.
    pub fn seal(&self, plaintext: &str, password: &str) -> Result<String, CryptoError> {
        let mut salt = [0u8; SALT_LEN];
        OsRng.fill_bytes(&mut salt);

        let key = self.derive_key(password, &salt)?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);

        let ciphertext = cipher
            .encrypt(&nonce, plaintext.as_bytes())
            .map_err(|_| CryptoError::EncryptionFailed)?;

        let mut envelope = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
        envelope.extend_from_slice(&salt);
        envelope.extend_from_slice(&nonce);
        envelope.extend_from_slice(&ciphertext);

        Ok(STANDARD.encode(&envelope))
    }

    /// Open a base64 envelope produced by [`StoreCrypto::seal`].
    pub fn open(&self, envelope_b64: &str, password: &str) -> Result<String, CryptoError> {
        let envelope = STANDARD
            .decode(envelope_b64)
            .map_err(|_| CryptoError::InvalidBase64)?;

        if envelope.len() < SALT_LEN + NONCE_LEN {
            return Err(CryptoError::DecryptionFailed);
        }

        let (salt, rest) = envelope.split_at(SALT_LEN);
        let (nonce_bytes, ciphertext) = rest.split_at(NONCE_LEN);
        let nonce = Nonce::from_slice(nonce_bytes);

        let key = self.derive_key(password, salt)?;
        let cipher = Aes256Gcm::new(Key::<Aes256Gcm>::from_slice(key.as_bytes()));

        let plaintext_bytes = cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| CryptoError::DecryptionFailed)?;

        String::from_utf8(plaintext_bytes).map_err(|_| CryptoError::DecryptionFailed)
    }
}

/// A derived key that automatically zeroes itself on drop.
#[derive(Zeroize, ZeroizeOnDrop)]
struct DerivedKey(Vec<u8>);

impl DerivedKey {
    fn as_bytes(&self) -> &[u8] {
        &self.0
    }
}
