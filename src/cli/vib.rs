//! # vib 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/vib.rs`

use clap::Args;
use std::path::PathBuf;

/// vib 子命令参数
#[derive(Args, Debug)]
pub struct VibArgs {
    /// Atoms to displace (0-based), all atoms when omitted
    #[arg(short, long, value_delimiter = ',')]
    pub indices: Vec<usize>,

    /// Displacement step in Å
    #[arg(short, long, default_value_t = 0.01)]
    pub delta: f64,

    /// Displacements per direction (2 or 4)
    #[arg(short, long, default_value_t = 2)]
    pub nfree: usize,

    /// Prefix of the displacement directories
    #[arg(long, default_value = "vib")]
    pub name: String,

    /// Calculation to copy inputs (and WAVECAR/CHG/CHGCAR) from
    #[arg(short, long, default_value = ".")]
    pub folder: PathBuf,

    /// Directory the displacement directories are created in
    #[arg(short = 'o', long, default_value = ".")]
    pub root: PathBuf,
}
