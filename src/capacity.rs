//! # 容量与位深模块
//!
//! 计算载体能容纳的最大数据量，并为给定数据选出最低的每通道位数 (bpc)。
//! 当 4 bpc 仍不够时，按原比例放大载体后重新选择。

use image::RgbImage;
use image::imageops::{self, FilterType};
use log::{debug, warn};

use crate::constants::{
    CHANNELS, ENCRYPTION_OVERHEAD, HEADER_PIXELS, MAX_BITS_PER_CHANNEL, MAX_BITS_PER_PIXEL,
    MIN_BITS_PER_CHANNEL, RESIZE_MARGIN,
};
use crate::error::{Result, StegoError};

/// 返回 `width x height` 的载体在最大密度下能容纳的数据字节数。
///
/// 头部占用的像素不计入；载体连头部都放不下时返回 0。
pub fn estimate(width: u32, height: u32) -> u64 {
    let total = u64::from(width) * u64::from(height);
    match total.checked_sub(HEADER_PIXELS) {
        Some(remaining) if remaining > 0 => remaining * MAX_BITS_PER_PIXEL / 8,
        _ => 0,
    }
}

/// 扣除加密开销 (salt + nonce + tag) 后，载体不放大即可隐藏的明文字节数。
pub fn plaintext_capacity(width: u32, height: u32) -> u64 {
    estimate(width, height).saturating_sub(ENCRYPTION_OVERHEAD as u64)
}

/// 头部之后可用于数据的像素数。
///
/// # Errors
///
/// 像素总数不超过头部所需像素时返回 [`StegoError::Capacity`]。
pub fn available_pixels(width: u32, height: u32) -> Result<u64> {
    let total = u64::from(width) * u64::from(height);
    match total.checked_sub(HEADER_PIXELS) {
        Some(available) if available > 0 => Ok(available),
        _ => Err(StegoError::Capacity(format!(
            "a {width}x{height} image has {total} pixels, the header alone needs {HEADER_PIXELS}"
        ))),
    }
}

/// 找出能放下 `payload_bits` 的最低 bpc (1..=4)，都放不下时返回 `None`。
pub fn lowest_bit_depth(available_pixels: u64, payload_bits: u64) -> Option<u8> {
    (MIN_BITS_PER_CHANNEL..=MAX_BITS_PER_CHANNEL)
        .find(|&bpc| available_pixels * u64::from(bpc) * CHANNELS as u64 >= payload_bits)
}

/// 计算放下 `payload_bits` 所需的新尺寸，保持宽高比并预留 10% 余量。
///
/// 各步一律向上取整，因此 `w * h >= h * h * ratio >= needed_pixels`，
/// 新尺寸在 4 bpc 下一定放得下数据。结果的每一维都不会小于原尺寸。
pub fn resized_dimensions(width: u32, height: u32, payload_bits: u64) -> (u32, u32) {
    let needed_pixels = payload_bits.div_ceil(MAX_BITS_PER_PIXEL) + HEADER_PIXELS;
    let ratio = f64::from(width) / f64::from(height);

    let new_height = (needed_pixels as f64 / ratio).sqrt().ceil();
    let new_width = (new_height * ratio).ceil();

    let new_width = (new_width * RESIZE_MARGIN).ceil() as u32;
    let new_height = (new_height * RESIZE_MARGIN).ceil() as u32;

    (new_width.max(width), new_height.max(height))
}

/// 为载体和数据位数确定最终的载体与 bpc。
///
/// 优先使用原载体上最低的足够 bpc；否则放大一次 (Lanczos3 重采样) 后再选。
/// 放大后的尺寸总能在 4 bpc 下放下数据，找不到更低的 bpc 时即取 4。
///
/// # Errors
///
/// 载体连头部都放不下时返回 [`StegoError::Capacity`]。
pub fn resolve_bit_depth(carrier: RgbImage, payload_bits: u64) -> Result<(RgbImage, u8)> {
    let (width, height) = carrier.dimensions();
    let available = available_pixels(width, height)?;

    if let Some(bpc) = lowest_bit_depth(available, payload_bits) {
        debug!("{payload_bits} payload bits fit {width}x{height} at {bpc} bpc");
        return Ok((carrier, bpc));
    }

    let (new_width, new_height) = resized_dimensions(width, height, payload_bits);
    warn!(
        "Payload of {payload_bits} bits exceeds {width}x{height} capacity, resizing carrier to {new_width}x{new_height}"
    );
    let resized = imageops::resize(&carrier, new_width, new_height, FilterType::Lanczos3);

    let bpc = available_pixels(new_width, new_height)
        .ok()
        .and_then(|available| lowest_bit_depth(available, payload_bits))
        .unwrap_or(MAX_BITS_PER_CHANNEL);
    debug!("{payload_bits} payload bits use {bpc} bpc on the resized carrier");

    Ok((resized, bpc))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn estimate_is_zero_without_room_after_header() {
        assert_eq!(estimate(3, 3), 0);
        assert_eq!(estimate(14, 1), 0);
        assert_eq!(estimate(15, 1), 1);
    }

    #[test]
    fn resized_dimensions_never_shrink() {
        let (w, h) = resized_dimensions(500, 10, 10_000);
        assert!(w >= 500);
        assert!(h >= 10);
    }

    #[test]
    fn resized_dimensions_hold_payload_on_thin_carriers() {
        let cases = [(15, 1, 352), (1000, 2, 30_232), (2, 1000, 30_232), (3, 5, 400)];
        for (width, height, bits) in cases {
            let (w, h) = resized_dimensions(width, height, bits);
            let available = available_pixels(w, h).unwrap();
            assert!(
                lowest_bit_depth(available, bits).is_some(),
                "{width}x{height} resized to {w}x{h} cannot hold {bits} bits"
            );
        }
    }
}
