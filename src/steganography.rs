//! # 隐写核心模块
//!
//! 在 RGB 像素的低位中写入和读出 `Header || 数据块`。
//!
//! 像素按行优先 (x 变化最快) 访问，每个像素依次使用 R、G、B 三个通道。
//! 头部固定以每通道 1 bit 写入前 14 个像素；数据从第 15 个像素开始，
//! 以头部声明的 bpc 写入，每个通道从 bit 0 开始向高位填充。
//! 所有字节都按 MSB 优先展开为比特。

use image::RgbImage;
use log::debug;

use crate::capacity::resolve_bit_depth;
use crate::constants::{
    CHANNELS, HEADER_BITS, HEADER_BYTES, HEADER_PIXELS, MAX_BITS_PER_CHANNEL, MIN_BITS_PER_CHANNEL,
};
use crate::error::{Result, StegoError};

/// 头部之后第一个数据通道在原始缓冲区中的下标。
const PAYLOAD_OFFSET: usize = HEADER_PIXELS as usize * CHANNELS;

/// 嵌入在图像开头的 5 字节头部。
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Header {
    /// 数据部分使用的每通道位数。
    pub bits_per_channel: u8,
    /// 头部之后数据块的字节数。
    pub payload_len: u32,
}

impl Header {
    /// 按 `[bpc, 长度 (大端序 4 字节)]` 布局序列化。
    pub fn to_bytes(&self) -> [u8; HEADER_BYTES] {
        let mut bytes = [0u8; HEADER_BYTES];
        bytes[0] = self.bits_per_channel;
        bytes[1..].copy_from_slice(&self.payload_len.to_be_bytes());
        bytes
    }

    /// 解析头部字节，只接受编码端会产生的 bpc (1..=4)。
    pub fn from_bytes(bytes: &[u8; HEADER_BYTES]) -> Result<Self> {
        let bits_per_channel = bytes[0];
        if !(MIN_BITS_PER_CHANNEL..=MAX_BITS_PER_CHANNEL).contains(&bits_per_channel) {
            return Err(StegoError::Format(format!(
                "header declares {bits_per_channel} bits per channel, expected {MIN_BITS_PER_CHANNEL}-{MAX_BITS_PER_CHANNEL}"
            )));
        }
        let payload_len = u32::from_be_bytes([bytes[1], bytes[2], bytes[3], bytes[4]]);
        Ok(Self {
            bits_per_channel,
            payload_len,
        })
    }
}

/// 将字节展开为比特序列，每个字节 MSB 优先。
pub fn bits_of(bytes: &[u8]) -> Vec<u8> {
    bytes
        .iter()
        .flat_map(|&byte| (0..8).rev().map(move |i| (byte >> i) & 1))
        .collect()
}

/// 将比特序列按 8 位一组、MSB 优先收拢为字节。末尾不足 8 位的部分低位补 0。
pub fn bytes_of(bits: &[u8]) -> Vec<u8> {
    bits.chunks(8)
        .map(|chunk| {
            let byte = chunk.iter().fold(0u8, |acc, &bit| (acc << 1) | (bit & 1));
            byte << (8 - chunk.len())
        })
        .collect()
}

/// 把 `bits` 依次写入 `channels`，每个通道写 `bpc` 位，从 bit 0 开始。
/// 通道的其余位保持不变。
fn write_channels(channels: &mut [u8], bits: &[u8], bpc: u8) {
    for (channel, chunk) in channels.iter_mut().zip(bits.chunks(usize::from(bpc))) {
        *channel = chunk
            .iter()
            .enumerate()
            .fold(*channel, |value, (pos, &bit)| (value & !(1u8 << pos)) | (bit << pos));
    }
}

/// 从 `channels` 中读出 `count` 个比特，每个通道读 `bpc` 位，从 bit 0 开始。
fn read_channels(channels: &[u8], bpc: u8, count: usize) -> Vec<u8> {
    channels
        .iter()
        .flat_map(|&value| (0..bpc).map(move |pos| (value >> pos) & 1))
        .take(count)
        .collect()
}

/// 从 `PAYLOAD_OFFSET` 开始、以 `bpc` 密度可容纳的比特数。
fn payload_capacity_bits(image: &RgbImage, bpc: u8) -> u64 {
    let channels = image.as_raw().len().saturating_sub(PAYLOAD_OFFSET) as u64;
    channels * u64::from(bpc)
}

fn ensure_header_fits(image: &RgbImage, error: fn(String) -> StegoError) -> Result<()> {
    let (width, height) = image.dimensions();
    let pixels = u64::from(width) * u64::from(height);
    if pixels < HEADER_PIXELS {
        return Err(error(format!(
            "a {width}x{height} image has {pixels} pixels, the header needs {HEADER_PIXELS}"
        )));
    }
    Ok(())
}

/// 将数据块嵌入载体，返回新的隐写图像。原载体不会被修改。
///
/// 载体容量不足时会按 [`resolve_bit_depth`] 的规则放大，
/// 因此结果尺寸可能大于原载体。
///
/// # Errors
///
/// * 载体放不下头部，或数据块超过 `u32::MAX` 字节时返回 [`StegoError::Capacity`]。
/// * 放大后仍放不下全部数据时返回 [`StegoError::Capacity`]，不会截断数据。
pub fn encode(carrier: &RgbImage, blob: &[u8]) -> Result<RgbImage> {
    ensure_header_fits(carrier, StegoError::Capacity)?;

    let payload_len = u32::try_from(blob.len()).map_err(|_| {
        StegoError::Capacity(format!(
            "{} bytes exceed the 4-byte length field of the header",
            blob.len()
        ))
    })?;
    let payload_bits = bits_of(blob);

    let (mut stego, bits_per_channel) =
        resolve_bit_depth(carrier.clone(), payload_bits.len() as u64)?;

    let capacity_bits = payload_capacity_bits(&stego, bits_per_channel);
    if (payload_bits.len() as u64) > capacity_bits {
        let (width, height) = stego.dimensions();
        return Err(StegoError::Capacity(format!(
            "{} payload bits do not fit a {width}x{height} image, which holds {capacity_bits} bits at {bits_per_channel} bpc",
            payload_bits.len()
        )));
    }

    let header = Header {
        bits_per_channel,
        payload_len,
    };
    debug!("Embedding header {header:?}");

    let channels: &mut [u8] = &mut stego;
    let (header_channels, payload_channels) = channels.split_at_mut(PAYLOAD_OFFSET);
    write_channels(header_channels, &bits_of(&header.to_bytes()), 1);
    write_channels(payload_channels, &payload_bits, bits_per_channel);

    Ok(stego)
}

/// 读取并校验隐写图像开头的头部。
///
/// # Errors
///
/// 图像少于头部所需像素或 bpc 越界时返回 [`StegoError::Format`]。
pub fn read_header(stego: &RgbImage) -> Result<Header> {
    ensure_header_fits(stego, StegoError::Format)?;

    let bits = read_channels(stego.as_raw(), 1, HEADER_BITS);
    let bytes: [u8; HEADER_BYTES] = bytes_of(&bits)
        .try_into()
        .map_err(|_| StegoError::Format("header is truncated".to_string()))?;
    let header = Header::from_bytes(&bytes)?;
    debug!("Read header {header:?}");
    Ok(header)
}

/// 从隐写图像中取出数据块。
///
/// # Errors
///
/// 头部不可读、bpc 越界，或图像像素不足以提供头部声明的长度时
/// 返回 [`StegoError::Format`]。
pub fn decode(stego: &RgbImage) -> Result<Vec<u8>> {
    let header = read_header(stego)?;

    let needed_bits = u64::from(header.payload_len) * 8;
    let capacity_bits = payload_capacity_bits(stego, header.bits_per_channel);
    if needed_bits > capacity_bits {
        return Err(StegoError::Format(format!(
            "header declares {} bytes but only {capacity_bits} bits remain; the image may be cropped or corrupted",
            header.payload_len
        )));
    }

    let bits = read_channels(
        &stego.as_raw()[PAYLOAD_OFFSET..],
        header.bits_per_channel,
        needed_bits as usize,
    );
    if (bits.len() as u64) < needed_bits {
        return Err(StegoError::Format(
            "incomplete data; the image may be cropped or corrupted".to_string(),
        ));
    }

    Ok(bytes_of(&bits))
}
