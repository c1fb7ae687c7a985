//! # 平面约束模块
//!
//! 把扩散原子约束在一个几何平面上，供外部优化器每步调用一次。
//!
//! ## 子模块
//! - `geometry`: 平面方程、投影和力分解
//! - `three_point`: 三原子平面（自由、锁定距离、反转力、弹簧）
//! - `midpoint`: 两原子中垂面（普通、对齐方向、静态参考结构）
//! - `convergence`: 外部弛豫循环的收敛判据
//!
//! ## 依赖关系
//! - 被 `commands/constrain.rs` 使用
//! - 使用 `models/structure.rs` 的 Vec3 和 Poscar

pub mod convergence;
pub mod geometry;
pub mod midpoint;
pub mod three_point;

pub use convergence::Convergence;
pub use midpoint::{AlignedMidpointPlane, MidpointPlane, SurfaceMidpointPlane};
pub use three_point::{HookeanPlane, InPlane, InvertPlane, LockedPlane};

use crate::error::{NebError, Result};
use crate::models::{Lattice, Vec3};

/// 优化器每步调用的约束接口
///
/// `cell` 是当前晶胞，参考原子取离扩散原子最近的周期像。
/// `current` 是本步开始时的坐标，`proposed`/`forces` 原地修改。
/// 只有扩散原子的条目会被改动。
pub trait PlaneConstraint {
    /// 策略名称，用于输出
    fn name(&self) -> &'static str;

    /// 涉及的原子序号（扩散原子在前）
    fn indices(&self) -> Vec<usize>;

    fn adjust_positions(&mut self, cell: &Lattice, current: &[Vec3], proposed: &mut [Vec3]);

    fn adjust_forces(&mut self, cell: &Lattice, current: &[Vec3], forces: &mut [Vec3]);
}

/// 扩散原子不能作为参考原子，参考原子之间也不能重复
pub(crate) fn check_distinct(diffusing: usize, refs: &[usize]) -> Result<()> {
    if refs.contains(&diffusing) {
        return Err(NebError::InvalidArgument(format!(
            "diffusing atom {} cannot also be a reference atom",
            diffusing
        )));
    }
    for (k, a) in refs.iter().enumerate() {
        if refs[k + 1..].contains(a) {
            return Err(NebError::InvalidArgument(format!(
                "reference atom {} given more than once",
                a
            )));
        }
    }
    Ok(())
}

/// 启动时选定的约束策略
#[derive(Debug, Clone)]
pub enum ConstraintPolicy {
    InPlane(InPlane),
    Locked(LockedPlane),
    Midpoint(MidpointPlane),
    AlignedMidpoint(AlignedMidpointPlane),
    SurfaceMidpoint(SurfaceMidpointPlane),
    Invert(InvertPlane),
    Hookean(HookeanPlane),
}

impl ConstraintPolicy {
    fn inner(&self) -> &dyn PlaneConstraint {
        match self {
            ConstraintPolicy::InPlane(c) => c,
            ConstraintPolicy::Locked(c) => c,
            ConstraintPolicy::Midpoint(c) => c,
            ConstraintPolicy::AlignedMidpoint(c) => c,
            ConstraintPolicy::SurfaceMidpoint(c) => c,
            ConstraintPolicy::Invert(c) => c,
            ConstraintPolicy::Hookean(c) => c,
        }
    }

    fn inner_mut(&mut self) -> &mut dyn PlaneConstraint {
        match self {
            ConstraintPolicy::InPlane(c) => c,
            ConstraintPolicy::Locked(c) => c,
            ConstraintPolicy::Midpoint(c) => c,
            ConstraintPolicy::AlignedMidpoint(c) => c,
            ConstraintPolicy::SurfaceMidpoint(c) => c,
            ConstraintPolicy::Invert(c) => c,
            ConstraintPolicy::Hookean(c) => c,
        }
    }

    /// 检查所有原子序号都小于结构中的原子数
    pub fn validate(&self, num_atoms: usize) -> Result<()> {
        match self.indices().into_iter().find(|&i| i >= num_atoms) {
            Some(i) => Err(NebError::InvalidArgument(format!(
                "atom index {} out of range for a structure with {} atoms",
                i, num_atoms
            ))),
            None => Ok(()),
        }
    }
}

impl PlaneConstraint for ConstraintPolicy {
    fn name(&self) -> &'static str {
        self.inner().name()
    }

    fn indices(&self) -> Vec<usize> {
        self.inner().indices()
    }

    fn adjust_positions(&mut self, cell: &Lattice, current: &[Vec3], proposed: &mut [Vec3]) {
        self.inner_mut().adjust_positions(cell, current, proposed)
    }

    fn adjust_forces(&mut self, cell: &Lattice, current: &[Vec3], forces: &mut [Vec3]) {
        self.inner_mut().adjust_forces(cell, current, forces)
    }
}
