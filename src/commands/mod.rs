//! # 命令执行模块
//!
//! 实现各子命令的业务逻辑。
//!
//! ## 依赖关系
//! - 被 `main.rs` 调用
//! - 使用 `cli/`, `parsers/`, `models/`, `scan/`, `field/`, `constraints/`, `utils/`
//! - 子模块: charge, nupdown, chgsplit, constrain, seed, dimer, submit, vib, gin

pub mod charge;
pub mod chgsplit;
pub mod constrain;
pub mod dimer;
pub mod gin;
pub mod nupdown;
pub mod seed;
pub mod submit;
pub mod vib;

use crate::cli::Commands;
use crate::error::Result;

/// 执行命令
pub fn run(cmd: Commands) -> Result<()> {
    match cmd {
        Commands::Charge(args) => charge::execute(args),
        Commands::Nupdown(args) => nupdown::execute(args),
        Commands::Chgsplit(args) => chgsplit::execute(args),
        Commands::Constrain(args) => constrain::execute(args),
        Commands::Seed(args) => seed::execute(args),
        Commands::Dimer(args) => dimer::execute(args),
        Commands::Submit(args) => submit::execute(args),
        Commands::Vib(args) => vib::execute(args),
        Commands::Gin(args) => gin::execute(args),
    }
}
