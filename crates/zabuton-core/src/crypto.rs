//! passphrase encryption for wallet secrets
//! Argon2id key derivation + ChaCha20Poly1305

use argon2::{Algorithm, Argon2, Params, Version};
use chacha20poly1305::aead::{Aead, OsRng};
use chacha20poly1305::{AeadCore, ChaCha20Poly1305, Key, KeyInit, Nonce};
use ed25519_dalek::SigningKey;
use hkdf::Hkdf;
use rand_core::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::{Error, Result};

const SALT_LEN: usize = 32;
const NONCE_LEN: usize = 12;
const KEY_LEN: usize = 32;
const TAG_LEN: usize = 16;

/// derive encryption key from passphrase using Argon2id
fn derive_key(salt: &[u8; SALT_LEN], passphrase: &str) -> Result<Zeroizing<[u8; KEY_LEN]>> {
    let params = Params::new(
        2 * 1024, // 2MB memory
        1,        // 1 iteration
        4,        // 4 parallelism
        Some(KEY_LEN),
    )
    .map_err(|e| Error::EncryptionFailed(e.to_string()))?;

    let argon2 = Argon2::new(Algorithm::Argon2id, Version::V0x13, params);

    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    argon2
        .hash_password_into(passphrase.as_bytes(), salt, &mut key[..])
        .map_err(|_| Error::KeyDerivationFailed)?;
    Ok(key)
}

/// encrypt data with passphrase
/// format: [SALT (32)][NONCE (12)][CIPHERTEXT + TAG]
pub fn encrypt(passphrase: &str, data: &[u8]) -> Result<Vec<u8>> {
    let mut salt = [0u8; SALT_LEN];
    OsRng.fill_bytes(&mut salt);

    let key = derive_key(&salt, passphrase)?;
    let nonce = ChaCha20Poly1305::generate_nonce(&mut OsRng);

    let cipher = ChaCha20Poly1305::new(Key::from_slice(&key[..]));
    let ciphertext = cipher
        .encrypt(&nonce, data)
        .map_err(|e| Error::EncryptionFailed(e.to_string()))?;

    let mut result = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    result.extend_from_slice(&salt);
    result.extend_from_slice(&nonce);
    result.extend_from_slice(&ciphertext);

    Ok(result)
}

/// decrypt data with passphrase, a failed tag check means a wrong passphrase
pub fn decrypt(passphrase: &str, encrypted: &[u8]) -> Result<Zeroizing<Vec<u8>>> {
    if encrypted.len() < SALT_LEN + NONCE_LEN + TAG_LEN {
        return Err(Error::EncryptionFailed("encrypted data too short".into()));
    }

    let mut salt = [0u8; SALT_LEN];
    salt.copy_from_slice(&encrypted[..SALT_LEN]);
    let nonce = &encrypted[SALT_LEN..SALT_LEN + NONCE_LEN];
    let ciphertext = &encrypted[SALT_LEN + NONCE_LEN..];

    let key = derive_key(&salt, passphrase)?;

    let cipher = ChaCha20Poly1305::new(Key::from_slice(&key[..]));
    let plaintext = cipher
        .decrypt(Nonce::from_slice(nonce), ciphertext)
        .map_err(|_| Error::InvalidPassphrase)?;

    Ok(Zeroizing::new(plaintext))
}

/// derive the ed25519 key for an address index from the 64-byte bip39 seed
pub fn derive_signing_key(seed: &[u8], index: u32) -> Result<SigningKey> {
    let hk = Hkdf::<Sha256>::new(Some(b"zabuton:address:v1"), seed);
    let mut signing_bytes = Zeroizing::new([0u8; 32]);
    hk.expand(&index.to_be_bytes(), &mut signing_bytes[..])
        .map_err(|_| Error::KeyDerivationFailed)?;

    Ok(SigningKey::from_bytes(&signing_bytes))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_encrypt_decrypt() {
        let data = b"sensitive wallet data";

        let encrypted = encrypt("test_password_123", data).unwrap();
        let decrypted = decrypt("test_password_123", &encrypted).unwrap();

        assert_eq!(data.as_slice(), decrypted.as_slice());
    }

    #[test]
    fn test_wrong_password() {
        let encrypted = encrypt("correct_password", b"sensitive data").unwrap();

        assert!(matches!(
            decrypt("wrong_password", &encrypted),
            Err(Error::InvalidPassphrase)
        ));
    }

    #[test]
    fn test_truncated_ciphertext() {
        let result = decrypt("pw", &[0u8; 20]);
        assert!(matches!(result, Err(Error::EncryptionFailed(_))));
    }

    #[test]
    fn test_key_derivation_is_per_index() {
        let seed = [7u8; 64];
        let a = derive_signing_key(&seed, 0).unwrap();
        let b = derive_signing_key(&seed, 0).unwrap();
        let c = derive_signing_key(&seed, 1).unwrap();

        assert_eq!(a.verifying_key(), b.verifying_key());
        assert_ne!(a.verifying_key(), c.verifying_key());
    }
}
