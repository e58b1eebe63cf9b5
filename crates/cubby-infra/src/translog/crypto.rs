//! AES-256-GCM encryption for transcript rows at rest.
//!
//! Encrypted format: `nonce (12 bytes) || ciphertext`.
//!
//! SECURITY: Error types never contain plaintext or key material.

use aes_gcm::aead::{Aead, KeyInit, OsRng};
use aes_gcm::{AeadCore, Aes256Gcm, Nonce};
use secrecy::{ExposeSecret, SecretString};

use cubby_types::error::LogError;

/// Nonce size for AES-256-GCM (96 bits / 12 bytes).
const NONCE_SIZE: usize = 12;

/// AES-256-GCM encryption for transcript rows.
///
/// Each encryption call generates a random 12-byte nonce, prepended to
/// the ciphertext, so re-encrypting the same turn never produces the
/// same bytes.
pub struct LogCrypto {
    cipher: Aes256Gcm,
}

impl LogCrypto {
    /// Create a LogCrypto from a raw 32-byte key.
    pub fn new(key: &[u8; 32]) -> Self {
        Self {
            cipher: Aes256Gcm::new(key.into()),
        }
    }

    /// Create a LogCrypto from a 64-char hex key (the `CUBBY_LOG_KEY`
    /// env format).
    pub fn from_hex_key(hex_key: &SecretString) -> Result<Self, LogError> {
        let bytes = hex_decode(hex_key.expose_secret()).map_err(LogError::InvalidKey)?;
        if bytes.len() != 32 {
            return Err(LogError::InvalidKey(format!(
                "expected 32 bytes, got {}",
                bytes.len()
            )));
        }
        let mut key = [0u8; 32];
        key.copy_from_slice(&bytes);
        Ok(Self::new(&key))
    }

    /// Generate a fresh random key.
    ///
    /// Used when no key is configured: the log stays encrypted on disk
    /// but becomes unreadable after restart, which is an acceptable
    /// default for a transcript that expires in days anyway.
    pub fn ephemeral() -> Self {
        use aes_gcm::aead::rand_core::RngCore;
        let mut key = [0u8; 32];
        OsRng.fill_bytes(&mut key);
        Self::new(&key)
    }

    /// Encrypt plaintext. Returns `nonce (12 bytes) || ciphertext`.
    pub fn encrypt(&self, plaintext: &[u8]) -> Result<Vec<u8>, LogError> {
        let nonce = Aes256Gcm::generate_nonce(&mut OsRng);
        let ciphertext = self
            .cipher
            .encrypt(&nonce, plaintext)
            .map_err(|_| LogError::EncryptionFailed)?;

        let mut result = Vec::with_capacity(NONCE_SIZE + ciphertext.len());
        result.extend_from_slice(&nonce);
        result.extend_from_slice(&ciphertext);
        Ok(result)
    }

    /// Decrypt data produced by [`encrypt`](Self::encrypt).
    pub fn decrypt(&self, data: &[u8]) -> Result<Vec<u8>, LogError> {
        if data.len() < NONCE_SIZE {
            return Err(LogError::CiphertextTooShort);
        }

        let (nonce_bytes, ciphertext) = data.split_at(NONCE_SIZE);
        let nonce = Nonce::from_slice(nonce_bytes);

        self.cipher
            .decrypt(nonce, ciphertext)
            .map_err(|_| LogError::DecryptionFailed)
    }
}

/// Hex-decode a string to bytes.
fn hex_decode(s: &str) -> Result<Vec<u8>, String> {
    if s.len() % 2 != 0 {
        return Err("odd length hex string".to_string());
    }
    (0..s.len())
        .step_by(2)
        .map(|i| {
            u8::from_str_radix(&s[i..i + 2], 16)
                .map_err(|e| format!("invalid hex at position {i}: {e}"))
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    fn test_key() -> [u8; 32] {
        let mut key = [0u8; 32];
        for (i, byte) in key.iter_mut().enumerate() {
            *byte = i as u8;
        }
        key
    }

    #[test]
    fn test_encrypt_decrypt_roundtrip() {
        let crypto = LogCrypto::new(&test_key());
        let plaintext = b"my kid asked about volcanoes";

        let encrypted = crypto.encrypt(plaintext).unwrap();
        let decrypted = crypto.decrypt(&encrypted).unwrap();

        assert_eq!(decrypted, plaintext);
    }

    #[test]
    fn test_random_nonce_produces_different_ciphertexts() {
        let crypto = LogCrypto::new(&test_key());
        let encrypted1 = crypto.encrypt(b"same turn").unwrap();
        let encrypted2 = crypto.encrypt(b"same turn").unwrap();
        assert_ne!(encrypted1, encrypted2);
    }

    #[test]
    fn test_decrypt_with_wrong_key_fails() {
        let crypto1 = LogCrypto::new(&test_key());
        let mut wrong_key = test_key();
        wrong_key[0] = 0xFF;
        let crypto2 = LogCrypto::new(&wrong_key);

        let encrypted = crypto1.encrypt(b"turn data").unwrap();
        let result = crypto2.decrypt(&encrypted);
        assert!(matches!(result.unwrap_err(), LogError::DecryptionFailed));
    }

    #[test]
    fn test_ciphertext_too_short() {
        let crypto = LogCrypto::new(&test_key());
        let result = crypto.decrypt(&[0u8; 5]);
        assert!(matches!(result.unwrap_err(), LogError::CiphertextTooShort));
    }

    #[test]
    fn test_from_hex_key() {
        let hex: String = test_key().iter().map(|b| format!("{b:02x}")).collect();
        let crypto = LogCrypto::from_hex_key(&SecretString::from(hex)).unwrap();
        let reference = LogCrypto::new(&test_key());

        let encrypted = crypto.encrypt(b"hello").unwrap();
        assert_eq!(reference.decrypt(&encrypted).unwrap(), b"hello");
    }

    #[test]
    fn test_from_hex_key_rejects_bad_input() {
        assert!(LogCrypto::from_hex_key(&SecretString::from("abc")).is_err());
        assert!(LogCrypto::from_hex_key(&SecretString::from("zz".repeat(32))).is_err());
        assert!(LogCrypto::from_hex_key(&SecretString::from("ab".repeat(16))).is_err());
    }

    #[test]
    fn test_ephemeral_keys_are_independent() {
        let crypto1 = LogCrypto::ephemeral();
        let crypto2 = LogCrypto::ephemeral();
        let encrypted = crypto1.encrypt(b"kid stuff").unwrap();
        assert!(crypto2.decrypt(&encrypted).is_err());
    }
}
