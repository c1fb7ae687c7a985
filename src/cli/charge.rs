//! # charge 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/charge.rs`

use clap::Args;
use std::path::PathBuf;

/// charge 子命令参数
#[derive(Args, Debug)]
pub struct ChargeArgs {
    /// First charge state of the scan
    #[arg(allow_negative_numbers = true)]
    pub start: i64,

    /// Last charge state of the scan (inclusive)
    #[arg(allow_negative_numbers = true)]
    pub end: i64,

    /// Converged calculation to copy inputs from
    #[arg(short, long, default_value = ".")]
    pub folder: PathBuf,

    /// Reference charge added to the electron count
    #[arg(short, long, default_value_t = 0.0, allow_negative_numbers = true)]
    pub charge: f64,

    /// Keep the SYSTEM tag unchanged
    #[arg(short = 's', long, default_value_t = false)]
    pub keep_system: bool,

    /// Also copy WAVECAR and CHGCAR when present
    #[arg(short, long, default_value_t = false)]
    pub wavecar: bool,

    /// Directory the run directories are created in
    #[arg(short = 'o', long, default_value = ".")]
    pub root: PathBuf,
}
