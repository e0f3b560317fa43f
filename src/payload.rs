//! # 消息封装模块
//!
//! 加密之前，逻辑消息 (文本或带文件名的文件) 先序列化为 JSON，再用 zlib 压缩：
//!
//! ```text
//! {"type":"text","content":"..."}
//! {"type":"file","filename":"report.pdf","content":"<base64>"}
//! ```

use std::io::{Read, Write};
use std::path::Path;

use flate2::Compression;
use flate2::read::ZlibDecoder;
use flate2::write::ZlibEncoder;
use serde::{Deserialize, Serialize};

use crate::error::{Result, StegoError};

/// 隐藏在图像中的逻辑消息。
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "lowercase")]
pub enum Message {
    Text {
        content: String,
    },
    File {
        filename: String,
        #[serde(with = "base64_content")]
        content: Vec<u8>,
    },
}

impl Message {
    pub fn text(content: impl Into<String>) -> Self {
        Self::Text {
            content: content.into(),
        }
    }

    /// 构造文件消息，文件名只保留最后一个路径分量。
    pub fn file(filename: &str, content: Vec<u8>) -> Self {
        Self::File {
            filename: sanitize_filename(filename),
            content,
        }
    }
}

/// 去掉目录部分，防止恢复时写到预期目录之外。
pub fn sanitize_filename(filename: &str) -> String {
    Path::new(filename)
        .file_name()
        .and_then(|name| name.to_str())
        .map(|name| name.trim_start_matches('.'))
        .filter(|name| !name.is_empty())
        .unwrap_or("file")
        .to_string()
}

/// 序列化并压缩消息。
pub fn pack(message: &Message) -> Result<Vec<u8>> {
    let json = serde_json::to_vec(message).map_err(|e| StegoError::Payload(e.to_string()))?;

    let mut encoder = ZlibEncoder::new(Vec::new(), Compression::default());
    encoder
        .write_all(&json)
        .map_err(|e| StegoError::Payload(e.to_string()))?;
    encoder
        .finish()
        .map_err(|e| StegoError::Payload(e.to_string()))
}

/// 解压并反序列化消息。文件名会再次清理。
pub fn unpack(bytes: &[u8]) -> Result<Message> {
    let mut json = Vec::new();
    ZlibDecoder::new(bytes)
        .read_to_end(&mut json)
        .map_err(|e| StegoError::Payload(format!("decompression failed: {e}")))?;

    let message = serde_json::from_slice(&json)
        .map_err(|e| StegoError::Payload(format!("invalid message format: {e}")))?;

    Ok(match message {
        Message::File { filename, content } => Message::file(&filename, content),
        text => text,
    })
}

mod base64_content {
    use base64::Engine;
    use base64::engine::general_purpose::STANDARD;
    use serde::{Deserialize, Deserializer, Serializer};

    pub fn serialize<S: Serializer>(bytes: &[u8], serializer: S) -> Result<S::Ok, S::Error> {
        serializer.serialize_str(&STANDARD.encode(bytes))
    }

    pub fn deserialize<'de, D: Deserializer<'de>>(deserializer: D) -> Result<Vec<u8>, D::Error> {
        let encoded = String::deserialize(deserializer)?;
        STANDARD
            .decode(encoded)
            .map_err(serde::de::Error::custom)
    }
}
