//! # 命令行接口模块
//!
//! 使用 `clap` 定义了程序的命令行结构，包括子命令和参数。
//! 所有用户通过命令行与程序交互的入口点都在此模块中定义。

use clap::{ArgAction, ArgGroup, Parser};
use std::path::PathBuf;

use crate::constants::PASSWORD_ENV;

/// 一款基于 LSB (最低有效位) 隐写术的命令行工具，先用密码加密消息，再将其隐藏在无损格式图像中。
#[derive(Parser, Debug)]
#[command(
    version,
    about,
    long_about = "一款基于 LSB (最低有效位) 隐写术的命令行工具。消息先经 PBKDF2 + AES-256-GCM 加密，再以自适应位深隐藏在图像像素中；载体不够大时会自动放大。"
)]
pub struct Cli {
    /// 日志详细程度：-v 为 info，-vv 为 debug。RUST_LOG 优先。
    #[arg(short, long, action = ArgAction::Count, global = true)]
    pub verbose: u8,

    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令：hide (隐藏)、recover (恢复) 和 capacity (容量)。
#[derive(Parser, Debug)]
pub enum Commands {
    /// 加密文本或文件，并隐藏到图像中。
    Hide(HideArgs),

    /// 从经过隐写的图像中恢复并解密隐藏的消息。
    Recover(RecoverArgs),

    /// 显示图像最多能隐藏多少字节。
    Capacity(CapacityArgs),
}

/// 'hide' 命令所需的参数。
#[derive(Parser, Debug)]
#[command(group(ArgGroup::new("secret").required(true).args(["text", "file"])))]
pub struct HideArgs {
    /// 用于隐写的载体图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 要隐藏的文本内容。
    #[arg(short, long)]
    pub text: Option<String>,

    /// 要隐藏的文件路径。
    #[arg(short, long)]
    pub file: Option<PathBuf>,

    /// 加密密码。
    #[arg(short, long, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: String,

    /// 结果图像的输出路径，必须是无损格式。默认为 `doctored_<原文件名>.png`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 覆盖已存在的输出文件。
    #[arg(long)]
    pub force: bool,
}

/// 'recover' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct RecoverArgs {
    /// 已隐藏消息的图像路径。
    #[arg(short, long)]
    pub image: PathBuf,

    /// 解密密码。
    #[arg(short, long, env = PASSWORD_ENV, hide_env_values = true)]
    pub password: String,

    /// 恢复内容的输出路径。文本消息省略时直接打印，文件消息省略时写到 `recovered_<文件名>`。
    #[arg(short, long)]
    pub dest: Option<PathBuf>,

    /// 覆盖已存在的输出文件。
    #[arg(long)]
    pub force: bool,
}

/// 'capacity' 命令所需的参数。
#[derive(Parser, Debug)]
pub struct CapacityArgs {
    /// 要检查的载体图像路径。
    #[arg(short, long)]
    pub image: PathBuf,
}
