//! # constrain 子命令 CLI 定义
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/constrain.rs`

use crate::constraints::midpoint::{DEFAULT_AXIS, DEFAULT_WINDOW};
use crate::constraints::three_point::DEFAULT_SPRING;

use clap::{Args, ValueEnum};
use std::path::PathBuf;

/// 平面约束策略
#[derive(Debug, Clone, Copy, ValueEnum, PartialEq, Eq)]
pub enum PolicyKind {
    /// Plane through three atoms
    InPlane,
    /// Parallel to the three-atom plane at the initial distance
    Locked,
    /// Perpendicular bisector of two atoms
    Midpoint,
    /// Bisector that also contains the alignment axis
    AlignedMidpoint,
    /// Bisector of two atoms of a reference structure
    SurfaceMidpoint,
    /// Reverse the normal force on the three-atom plane
    Invert,
    /// Spring toward the three-atom plane
    Hookean,
}

impl PolicyKind {
    /// 需要的参考原子数
    pub fn reference_count(self) -> usize {
        match self {
            PolicyKind::Midpoint | PolicyKind::AlignedMidpoint | PolicyKind::SurfaceMidpoint => 2,
            _ => 3,
        }
    }
}

/// constrain 子命令参数
#[derive(Args, Debug)]
pub struct ConstrainArgs {
    /// Constraint policy
    #[arg(short, long, value_enum)]
    pub policy: PolicyKind,

    /// Index of the diffusing atom (0-based)
    #[arg(short, long)]
    pub atom: usize,

    /// Reference atom indices, comma-separated (0-based)
    #[arg(long, value_delimiter = ',', required = true)]
    pub plane: Vec<usize>,

    /// Current structure
    #[arg(short, long, default_value = "POSCAR")]
    pub input: PathBuf,

    /// Proposed structure (default: the current structure)
    #[arg(long)]
    pub proposed: Option<PathBuf>,

    /// Reference structure for the surface-midpoint policy
    #[arg(long)]
    pub reference: Option<PathBuf>,

    /// Alignment axis for the aligned-midpoint policy
    #[arg(
        long,
        value_delimiter = ',',
        default_values_t = DEFAULT_AXIS,
        allow_negative_numbers = true
    )]
    pub axis: Vec<f64>,

    /// Number of reuses of the cached aligned plane
    #[arg(long, default_value_t = DEFAULT_WINDOW)]
    pub window: usize,

    /// Spring constant for the hookean policy
    #[arg(long, default_value_t = DEFAULT_SPRING)]
    pub spring: f64,

    /// OUTCAR whose last force block is adjusted and reported
    #[arg(long)]
    pub outcar: Option<PathBuf>,

    /// Force threshold (eV/Å) for the convergence check, needs --outcar
    #[arg(long)]
    pub fmax: Option<f64>,

    /// Output structure
    #[arg(short, long, default_value = "POSCAR.constrained")]
    pub output: PathBuf,
}
