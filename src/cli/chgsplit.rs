//! # chgsplit 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/chgsplit.rs`

use clap::Args;
use std::path::PathBuf;

/// chgsplit 子命令参数
#[derive(Args, Debug)]
pub struct ChgsplitArgs {
    /// CHGCAR-format file (CHGCAR, PARCHG, LOCPOT, ...)
    #[arg(default_value = "CHGCAR")]
    pub input: PathBuf,

    /// Write the finite-difference derivative instead of the average
    #[arg(short, long, default_value_t = false)]
    pub derivative: bool,

    /// Output directory (default: next to the input)
    #[arg(short, long)]
    pub output_dir: Option<PathBuf>,

    /// Also write all three profiles to one CSV file
    #[arg(long)]
    pub csv: Option<PathBuf>,

    /// Plot the profiles (.png or .svg)
    #[arg(long)]
    pub plot: Option<PathBuf>,

    /// Plot width in pixels
    #[arg(long, default_value_t = 900)]
    pub width: u32,

    /// Plot height in pixels
    #[arg(long, default_value_t = 1200)]
    pub height: u32,
}
