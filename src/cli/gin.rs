//! # gin 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/gin.rs`

use clap::Args;
use std::path::PathBuf;

/// gin 子命令参数
#[derive(Args, Debug)]
pub struct GinArgs {
    /// Structure to convert
    #[arg(default_value = "POSCAR")]
    pub structure: PathBuf,

    /// GULP keyword line (include "scell" for a surface cell)
    #[arg(short, long, default_value = "conp gradients")]
    pub keywords: String,

    /// Elements that get a shell, comma separated
    #[arg(long, value_delimiter = ',')]
    pub shel: Vec<String>,

    /// Force-field library file
    #[arg(short, long)]
    pub library: Option<String>,

    /// Extra option line appended after the library (repeatable)
    #[arg(long = "option")]
    pub options: Vec<String>,

    /// Write the structure as a non-periodic cluster
    #[arg(long, default_value_t = false)]
    pub cluster: bool,

    /// Output file
    #[arg(short, long, default_value = "gulp.gin")]
    pub output: PathBuf,
}
