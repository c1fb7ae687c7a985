//! # dimer 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/dimer.rs`

use clap::Args;
use std::path::PathBuf;

/// dimer 子命令参数
#[derive(Args, Debug)]
pub struct DimerArgs {
    /// Finished dimer calculation directory
    #[arg(default_value = ".")]
    pub folder: PathBuf,

    /// VTST scripts directory containing dimmins.pl
    #[arg(long, env = "VTST_DIR")]
    pub vtst_dir: Option<PathBuf>,

    /// Skip running dimmins.pl and only edit existing mins/ folders
    #[arg(long, default_value_t = false)]
    pub no_script: bool,
}
