use lsb_vault::{
    StegoError,
    constants::{ENCRYPTION_OVERHEAD, NONCE_LEN, SALT_LEN},
    crypto::{decrypt, encrypt},
};

#[test]
fn encrypt_then_decrypt_restores_plaintext() {
    let messages: [&[u8]; 4] = [b"", b"x", "多字节的消息".as_bytes(), &[0u8; 1024]];
    for message in messages {
        let blob = encrypt(message, "pw").unwrap();
        assert_eq!(blob.len(), message.len() + ENCRYPTION_OVERHEAD);
        assert_eq!(decrypt(&blob, "pw").unwrap(), message);
    }
}

#[test]
fn each_encryption_uses_fresh_salt_and_nonce() {
    let a = encrypt(b"same", "pw").unwrap();
    let b = encrypt(b"same", "pw").unwrap();
    assert_ne!(a[..SALT_LEN], b[..SALT_LEN]);
    assert_ne!(a[SALT_LEN..SALT_LEN + NONCE_LEN], b[SALT_LEN..SALT_LEN + NONCE_LEN]);
    assert_ne!(a, b);
}

#[test]
fn wrong_password_fails_authentication() {
    let blob = encrypt(b"attack at dawn", "secret").unwrap();
    assert_eq!(decrypt(&blob, "Secret"), Err(StegoError::Authentication));
}

#[test]
fn tampered_blob_fails_authentication() {
    let blob = encrypt(b"payload bytes", "secret").unwrap();
    let body = SALT_LEN + NONCE_LEN;

    for index in [0, SALT_LEN, body, body + 5, blob.len() - 1] {
        let mut tampered = blob.clone();
        tampered[index] ^= 0x01;
        assert_eq!(
            decrypt(&tampered, "secret"),
            Err(StegoError::Authentication),
            "flip at byte {index} went unnoticed"
        );
    }
}

#[test]
fn truncated_blob_is_rejected() {
    assert!(matches!(
        decrypt(&[0u8; SALT_LEN + NONCE_LEN - 1], "secret"),
        Err(StegoError::InvalidInput(_))
    ));
    // Prefix present but no room for a tag.
    assert_eq!(
        decrypt(&[0u8; SALT_LEN + NONCE_LEN + 4], "secret"),
        Err(StegoError::Authentication)
    );
}
