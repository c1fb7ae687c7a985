//! # CLI 模块
//!
//! 使用 `clap` 定义命令行参数和子命令。
//!
//! ## 命令结构
//! - `charge`: 电荷态扫描目录
//! - `nupdown`: 自旋态 (NUPDOWN) 扫描目录
//! - `chgsplit`: CHGCAR 轴向平面平均
//! - `constrain`: 对结构施加平面约束
//! - `seed`: 按元素写入 MAGMOM / LDAU 参数
//! - `dimer`: dimer 计算后准备两个极小点弛豫
//! - `submit`: 生成并提交 sbatch 脚本
//! - `vib`: 振动计算的有限位移目录
//! - `gin`: 结构转 GULP 输入文件
//!
//! ## 依赖关系
//! - 被 `main.rs` 使用
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

use clap::{Parser, Subcommand};

/// nebtools - VASP NEB/dimer 工作流工具箱
#[derive(Parser)]
#[command(name = "nebtools")]
#[command(version)]
#[command(about = "Workflow helpers for VASP NEB, dimer and charge/spin-state calculations", long_about = None)]
#[command(propagate_version = true)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Commands,
}

/// 可用的子命令
#[derive(Subcommand)]
pub enum Commands {
    /// Generate one run directory per charge state
    Charge(charge::ChargeArgs),

    /// Generate one run directory per NUPDOWN value
    Nupdown(nupdown::NupdownArgs),

    /// Split a CHGCAR into per-axis planar averages
    Chgsplit(chgsplit::ChgsplitArgs),

    /// Apply a plane constraint to a structure
    Constrain(constrain::ConstrainArgs),

    /// Seed MAGMOM and LDAU tags from per-species defaults
    Seed(seed::SeedArgs),

    /// Prepare the two minimum relaxations after a dimer run
    Dimer(dimer::DimerArgs),

    /// Write (and optionally submit) sbatch scripts for run directories
    Submit(submit::SubmitArgs),

    /// Generate one run directory per finite displacement for vibrations
    Vib(vib::VibArgs),

    /// Convert a structure into a GULP .gin input file
    Gin(gin::GinArgs),
}
