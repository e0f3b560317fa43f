//! # 命令处理逻辑模块
//!
//! 包含处理 `hide`、`recover` 和 `capacity` 子命令的高级业务逻辑。
//! 本模块负责协调文件 I/O、调用加密与隐写核心函数以及向用户报告结果。

use crate::capacity::{estimate, plaintext_capacity};
use crate::cli::{CapacityArgs, HideArgs, RecoverArgs};
use crate::constants::LOSSLESS_EXTENSIONS;
use crate::payload::{self, Message};
use crate::pipeline::{conceal, reveal};
use anyhow::{Context, Result};
use colored::Colorize;
use image::{DynamicImage, ImageDecoder, ImageReader, RgbImage};
use log::info;
use std::fs;
use std::path::{Path, PathBuf};

/// 读取图像，按 EXIF 方向信息校正后转换为 RGB8 (丢弃 alpha 通道)。
///
/// 隐藏、恢复和容量计算都经过同一套规范化，保证像素访问顺序一致。
///
/// # Errors
///
/// 文件无法打开、格式无法识别或解码失败时返回错误。
pub fn load_carrier(path: &Path) -> Result<RgbImage> {
    let read_error = || {
        format!(
            "Unable to read image file: {}",
            path.to_string_lossy().red().bold()
        )
    };

    let mut decoder = ImageReader::open(path)
        .with_context(read_error)?
        .with_guessed_format()
        .with_context(read_error)?
        .into_decoder()
        .with_context(read_error)?;
    let orientation = decoder.orientation().with_context(read_error)?;
    let mut image = DynamicImage::from_decoder(decoder).with_context(read_error)?;
    image.apply_orientation(orientation);

    info!(
        "Loaded {} ({}x{})",
        path.display(),
        image.width(),
        image.height()
    );
    Ok(image.to_rgb8())
}

/// 输出文件已存在且未指定 `--force` 时拒绝继续。
fn ensure_writable(path: &Path, force: bool) -> Result<()> {
    anyhow::ensure!(
        force || !path.exists(),
        "Output file already exists: {}\nUse --force to overwrite it.",
        path.to_string_lossy().red().bold()
    );
    Ok(())
}

/// 与 `image` 位于同一目录、文件名加上前缀的路径。
fn sibling_path(image: &Path, file_name: &str) -> PathBuf {
    image
        .parent()
        .map_or_else(|| PathBuf::from(file_name), |dir| dir.join(file_name))
}

fn default_hide_dest(image: &Path) -> PathBuf {
    let stem = image
        .file_stem()
        .map_or_else(|| "image".into(), |stem| stem.to_string_lossy());
    sibling_path(image, &format!("doctored_{stem}.png"))
}

fn ensure_lossless(dest: &Path) -> Result<()> {
    let extension = dest
        .extension()
        .map(|ext| ext.to_string_lossy().to_ascii_lowercase())
        .unwrap_or_default();
    anyhow::ensure!(
        LOSSLESS_EXTENSIONS.contains(&extension.as_str()),
        "Output image must use a lossless format ({}): {}",
        LOSSLESS_EXTENSIONS.join(", "),
        dest.to_string_lossy().red().bold()
    );
    Ok(())
}

fn ensure_password(password: &str) -> Result<()> {
    anyhow::ensure!(!password.is_empty(), "Password must not be empty.");
    Ok(())
}

/// 根据 `--text` / `--file` 构造要隐藏的消息，两者必须恰好提供一个。
fn message_from_args(args: &HideArgs) -> Result<Message> {
    match (&args.text, &args.file) {
        (Some(text), None) => Ok(Message::text(text.as_str())),
        (None, Some(file)) => {
            let content = fs::read(file).with_context(|| {
                format!(
                    "Unable to read file: {}",
                    file.to_string_lossy().red().bold()
                )
            })?;
            let name = file
                .file_name()
                .map(|name| name.to_string_lossy().into_owned())
                .unwrap_or_default();
            Ok(Message::file(&name, content))
        }
        _ => anyhow::bail!("Provide exactly one of --text or --file."),
    }
}

/// 处理 'Hide' 命令的执行逻辑。
///
/// 负责读取载体图像和要隐藏的内容、封装并加密消息、嵌入图像，
/// 最后将结果写入目标图像文件。载体不够大时会自动放大。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与密码的 `HideArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 密码为空，或没有恰好提供一个 `--text` / `--file`。
/// * 无法读取输入的图像或文件。
/// * 目标文件已存在且未指定 `--force`，或目标格式不是无损格式。
/// * 图像连头部都放不下。
/// * 无法写入到目标图像文件。
pub fn handle_hide(args: HideArgs) -> Result<()> {
    ensure_password(&args.password)?;

    let dest = args
        .dest
        .clone()
        .unwrap_or_else(|| default_hide_dest(&args.image));
    ensure_lossless(&dest)?;
    ensure_writable(&dest, args.force)?;

    let message = message_from_args(&args)?;
    let packed = payload::pack(&message).context("Failed to serialize the message.")?;
    info!("Packed message into {} bytes", packed.len());

    let carrier = load_carrier(&args.image)?;
    let (width, height) = carrier.dimensions();

    let stego = conceal(&carrier, &packed, &args.password).with_context(|| {
        format!(
            "Failed to hide the message in {}.",
            args.image.to_string_lossy().red().bold()
        )
    })?;

    if stego.dimensions() != (width, height) {
        println!(
            "The image was too small and has been enlarged from {}x{} to {}x{}.",
            width,
            height,
            stego.width().to_string().yellow().bold(),
            stego.height().to_string().yellow().bold()
        );
    }

    stego.save(&dest).with_context(|| {
        format!(
            "Unable to write to target image file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The message has been successfully hidden and saved: {}",
        dest.to_string_lossy().green().bold()
    );

    Ok(())
}

/// 处理 'Recover' 命令的执行逻辑。
///
/// 负责读取经过隐写的图像、提取并解密数据块、还原消息，
/// 最后打印文本或将内容写入目标文件。
///
/// # Arguments
///
/// * `args` - 包含输入/输出路径与密码的 `RecoverArgs` 结构体。
///
/// # Errors
///
/// 如果发生以下任一情况，将返回错误：
/// * 无法读取输入的图像文件。
/// * 图像中没有可识别的隐写数据或数据已损坏。
/// * 密码错误。
/// * 目标文件已存在且未指定 `--force`，或无法写入。
pub fn handle_recover(args: RecoverArgs) -> Result<()> {
    ensure_password(&args.password)?;

    let stego = load_carrier(&args.image)?;

    let packed = reveal(&stego, &args.password).with_context(|| {
        format!(
            "Failed to recover the message from '{}'.",
            args.image.to_string_lossy().red().bold()
        )
    })?;
    let message = payload::unpack(&packed).context("The recovered data is not a valid message.")?;

    let (dest, content) = match message {
        Message::Text { content } => match args.dest {
            Some(dest) => (dest, content.into_bytes()),
            None => {
                println!("{content}");
                return Ok(());
            }
        },
        Message::File { filename, content } => {
            let dest = args.dest.unwrap_or_else(|| {
                sibling_path(&args.image, &format!("recovered_{filename}"))
            });
            (dest, content)
        }
    };

    ensure_writable(&dest, args.force)?;
    fs::write(&dest, content).with_context(|| {
        format!(
            "Unable to write to target file: {}",
            dest.to_string_lossy().red().bold()
        )
    })?;

    println!(
        "The message has been successfully recovered and saved: {}",
        dest.to_string_lossy().green().bold()
    );
    Ok(())
}

/// 处理 'Capacity' 命令的执行逻辑。
///
/// 打印图像尺寸、最大密度下的原始容量，以及扣除加密开销后可隐藏的明文字节数。
///
/// # Errors
///
/// 无法读取输入的图像文件时返回错误。
pub fn handle_capacity(args: CapacityArgs) -> Result<()> {
    let carrier = load_carrier(&args.image)?;
    let (width, height) = carrier.dimensions();
    let capacity = estimate(width, height);
    let plaintext = plaintext_capacity(width, height);

    println!(
        "{}x{} image: {} bytes of hidden data, about {} bytes of compressed message after encryption.",
        width,
        height,
        capacity.to_string().green().bold(),
        plaintext.to_string().green().bold()
    );
    Ok(())
}
