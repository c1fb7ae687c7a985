//! # seed 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/seed.rs`

use clap::Args;
use std::path::PathBuf;

/// seed 子命令参数
#[derive(Args, Debug)]
pub struct SeedArgs {
    /// Calculation directory holding INCAR and POSCAR/CONTCAR
    #[arg(default_value = ".")]
    pub folder: PathBuf,

    /// Write MAGMOM only, leave LDAU tags alone
    #[arg(long, default_value_t = false)]
    pub no_ldau: bool,

    /// Print the resulting INCAR instead of writing it
    #[arg(long, default_value_t = false)]
    pub dry_run: bool,
}
