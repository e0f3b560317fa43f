//! # lsb_vault 库
//!
//! 本库包含带密码保护的 LSB 隐写工具的核心逻辑：
//! 认证加密、自适应位深的隐写编解码，以及命令行处理。

// 声明库包含的所有模块。

pub mod capacity;
pub mod cli;
pub mod constants;
pub mod crypto;
pub mod error;
pub mod handler;
pub mod payload;
pub mod pipeline;
pub mod steganography;

pub use error::{Result, StegoError};
