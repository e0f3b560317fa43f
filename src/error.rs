//! # 错误类型模块
//!
//! 隐写编解码与加解密过程中所有可能的失败都归入 [`StegoError`]。

use thiserror::Error;

/// 库内所有操作的错误类型。
#[derive(Error, Debug, Clone, PartialEq, Eq)]
pub enum StegoError {
    /// 载体放不下头部，或放大后仍放不下数据。
    #[error("Not enough space in the image: {0}")]
    Capacity(String),

    /// 头部不可读、bpc 越界，或图像被裁剪导致数据不完整。
    #[error("Malformed stego image: {0}")]
    Format(String),

    /// AEAD 认证失败。刻意不区分密码错误和数据损坏。
    #[error("Decryption failed. Incorrect password or corrupted data.")]
    Authentication,

    /// 加密数据块结构不合法，或明文超出 AES-GCM 上限。
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    /// 消息封装 (JSON + zlib) 损坏。
    #[error("Payload framing error: {0}")]
    Payload(String),
}

/// 本库操作的结果类型。
pub type Result<T> = std::result::Result<T, StegoError>;
