//! # 加密隐写流水线
//!
//! 将加密与隐写串联：`conceal` 先加密再嵌入，`reveal` 先提取再解密。

use image::RgbImage;

use crate::crypto::{decrypt, encrypt};
use crate::error::Result;
use crate::steganography::{decode, encode};

/// 用密码加密 `plaintext` 并嵌入 `carrier`，返回隐写图像。
pub fn conceal(carrier: &RgbImage, plaintext: &[u8], password: &str) -> Result<RgbImage> {
    let blob = encrypt(plaintext, password)?;
    encode(carrier, &blob)
}

/// 从隐写图像中取出数据块并用密码解密。
pub fn reveal(stego: &RgbImage, password: &str) -> Result<Vec<u8>> {
    let blob = decode(stego)?;
    decrypt(&blob, password)
}
