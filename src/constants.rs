/// 嵌入头部的位数：1 字节 bpc + 4 字节长度。
pub const HEADER_BITS: usize = 40;

/// 嵌入头部的字节数。
pub const HEADER_BYTES: usize = HEADER_BITS / 8;

/// 每个像素参与隐写的颜色通道数 (R, G, B)。
pub const CHANNELS: usize = 3;

/// 头部始终以每通道 1 bit 写入，因此需要 ceil(40 / 3) = 14 个像素。
pub const HEADER_PIXELS: u64 = HEADER_BITS.div_ceil(CHANNELS) as u64;

/// 编码端允许的最小与最大每通道位数。
pub const MIN_BITS_PER_CHANNEL: u8 = 1;
pub const MAX_BITS_PER_CHANNEL: u8 = 4;

/// 最大密度下每个像素可承载的位数 (4 bits * 3 通道)。
pub const MAX_BITS_PER_PIXEL: u64 = MAX_BITS_PER_CHANNEL as u64 * CHANNELS as u64;

/// 自动放大载体时额外预留的比例。
pub const RESIZE_MARGIN: f64 = 1.1;

/// PBKDF2-HMAC-SHA256 的迭代次数。
pub const PBKDF2_ITERATIONS: u32 = 100_000;

pub const SALT_LEN: usize = 16;
pub const NONCE_LEN: usize = 12;
pub const KEY_LEN: usize = 32;
pub const TAG_LEN: usize = 16;

/// 加密后相对明文增加的固定字节数 (salt + nonce + tag)。
pub const ENCRYPTION_OVERHEAD: usize = SALT_LEN + NONCE_LEN + TAG_LEN;

/// 结果图像允许使用的无损格式扩展名。
pub const LOSSLESS_EXTENSIONS: &[&str] = &["png", "bmp", "tif", "tiff", "webp", "qoi"];

/// 从环境变量读取密码时使用的变量名。
pub const PASSWORD_ENV: &str = "LSB_VAULT_PASSWORD";
