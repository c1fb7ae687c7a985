//! # nupdown 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/nupdown.rs`

use clap::Args;
use std::path::PathBuf;

/// nupdown 子命令参数
#[derive(Args, Debug)]
pub struct NupdownArgs {
    /// First NUPDOWN value, or the center when END is omitted
    #[arg(allow_negative_numbers = true)]
    pub start: i64,

    /// Last NUPDOWN value (inclusive)
    #[arg(allow_negative_numbers = true)]
    pub end: Option<i64>,

    /// Half width of the scan when END is omitted
    #[arg(short, long, default_value_t = 4)]
    pub radius: u32,

    /// Converged calculation to copy inputs from
    #[arg(short, long, default_value = ".")]
    pub folder: PathBuf,

    /// Keep the SYSTEM tag unchanged
    #[arg(short = 's', long, default_value_t = false)]
    pub keep_system: bool,

    /// Also copy WAVECAR and CHGCAR when present
    #[arg(short, long, default_value_t = false)]
    pub wavecar: bool,

    /// Directory holding the `nupdown/` folder
    #[arg(short = 'o', long, default_value = ".")]
    pub root: PathBuf,
}
