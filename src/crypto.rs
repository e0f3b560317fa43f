//! # 加密模块
//!
//! 基于密码的认证加密：PBKDF2-HMAC-SHA256 派生 256 位密钥，
//! 再用 AES-256-GCM 加密。输出的数据块自带 salt 和 nonce：
//!
//! ```text
//! [16 bytes] salt
//! [12 bytes] nonce
//! [N bytes ] ciphertext || tag (16 bytes)
//! ```

use aes_gcm::aead::generic_array::GenericArray;
use aes_gcm::aead::{Aead, KeyInit};
use aes_gcm::Aes256Gcm;
use pbkdf2::pbkdf2_hmac;
use rand::RngCore;
use sha2::Sha256;
use zeroize::Zeroizing;

use crate::constants::{KEY_LEN, NONCE_LEN, PBKDF2_ITERATIONS, SALT_LEN};
use crate::error::{Result, StegoError};

/// 由密码和 salt 派生 32 字节密钥。
///
/// 密码按 UTF-8 字节参与运算；同一组 (password, salt) 总是得到同一个密钥。
pub fn derive_key(password: &[u8], salt: &[u8; SALT_LEN]) -> Zeroizing<[u8; KEY_LEN]> {
    let mut key = Zeroizing::new([0u8; KEY_LEN]);
    pbkdf2_hmac::<Sha256>(password, salt, PBKDF2_ITERATIONS, &mut *key);
    key
}

/// 用密码加密明文，返回 `salt || nonce || ciphertext || tag`。
///
/// 每次调用都会生成新的随机 salt 和 nonce。
///
/// # Errors
///
/// 仅当明文超过 AES-GCM 的长度上限时返回 [`StegoError::InvalidInput`]。
pub fn encrypt(plaintext: &[u8], password: &str) -> Result<Vec<u8>> {
    let mut rng = rand::rng();
    let mut salt = [0u8; SALT_LEN];
    let mut nonce = [0u8; NONCE_LEN];
    rng.fill_bytes(&mut salt);
    rng.fill_bytes(&mut nonce);

    let key = derive_key(password.as_bytes(), &salt);
    let cipher = Aes256Gcm::new(GenericArray::from_slice(key.as_slice()));
    let ciphertext = cipher
        .encrypt(GenericArray::from_slice(&nonce), plaintext)
        .map_err(|_| StegoError::InvalidInput("plaintext is too long for AES-GCM".to_string()))?;

    let mut blob = Vec::with_capacity(SALT_LEN + NONCE_LEN + ciphertext.len());
    blob.extend_from_slice(&salt);
    blob.extend_from_slice(&nonce);
    blob.extend_from_slice(&ciphertext);
    Ok(blob)
}

/// 用密码解密 [`encrypt`] 产生的数据块。
///
/// # Errors
///
/// * 数据块短于 salt + nonce 前缀时返回 [`StegoError::InvalidInput`]。
/// * 密码错误或数据被篡改时返回 [`StegoError::Authentication`]，两者无法区分。
pub fn decrypt(blob: &[u8], password: &str) -> Result<Vec<u8>> {
    let (salt, rest) = blob.split_first_chunk::<SALT_LEN>().ok_or_else(malformed_blob)?;
    let (nonce, ciphertext) = rest.split_first_chunk::<NONCE_LEN>().ok_or_else(malformed_blob)?;

    let key = derive_key(password.as_bytes(), salt);
    let cipher = Aes256Gcm::new(GenericArray::from_slice(key.as_slice()));
    cipher
        .decrypt(GenericArray::from_slice(nonce), ciphertext)
        .map_err(|_| StegoError::Authentication)
}

fn malformed_blob() -> StegoError {
    StegoError::InvalidInput(format!(
        "encrypted data is shorter than the {}-byte salt and nonce prefix",
        SALT_LEN + NONCE_LEN
    ))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn derive_key_is_deterministic_per_salt() {
        let salt = [7u8; SALT_LEN];
        let a = derive_key(b"secret", &salt);
        let b = derive_key(b"secret", &salt);
        let c = derive_key(b"secret", &[8u8; SALT_LEN]);
        assert_eq!(*a, *b);
        assert_ne!(*a, *c);
    }
}
