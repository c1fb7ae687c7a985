//! # 三原子平面约束
//!
//! 平面由三个参考原子确定，每一步重新计算。参考原子先换到离扩散原子
//! 最近的周期像上。
//!
//! - `InPlane`: 扩散原子投影到平面上，去掉法向力
//! - `LockedPlane`: 同上，但保持第一次调用时与平面的距离
//! - `InvertPlane`: 不动坐标，翻转法向力
//! - `HookeanPlane`: 不动坐标，法向力换成指向平面的弹簧力
//!
//! ## 依赖关系
//! - 被 `constraints/mod.rs` 的 `ConstraintPolicy` 包装
//! - 使用 `constraints/geometry.rs`

use super::geometry::{add, nearest_image, reflect_normal, remove_normal, scale, Plane};
use super::{check_distinct, PlaneConstraint};
use crate::error::Result;
use crate::models::{Lattice, Vec3};

/// 弹簧常数默认值 (eV/Å²)
pub const DEFAULT_SPRING: f64 = 1.0;

/// 扩散原子和三个参考原子
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ThreeAtomRefs {
    pub diffusing: usize,
    pub plane: [usize; 3],
}

impl ThreeAtomRefs {
    pub fn new(diffusing: usize, plane: [usize; 3]) -> Result<Self> {
        check_distinct(diffusing, &plane)?;
        Ok(ThreeAtomRefs { diffusing, plane })
    }

    /// 用离扩散原子最近的参考原子像建平面
    fn plane_of(&self, cell: &Lattice, positions: &[Vec3]) -> Plane {
        let anchor = positions[self.diffusing];
        let [a, b, c] = self.plane.map(|k| nearest_image(cell, anchor, positions[k]));
        Plane::through_points(a, b, c)
    }

    fn indices(&self) -> Vec<usize> {
        let mut v = vec![self.diffusing];
        v.extend_from_slice(&self.plane);
        v
    }
}

// ─────────────────────────────────────────────────────────────
// InPlane
// ─────────────────────────────────────────────────────────────

/// 把扩散原子限制在三原子平面内
#[derive(Debug, Clone)]
pub struct InPlane {
    refs: ThreeAtomRefs,
}

impl InPlane {
    pub fn new(diffusing: usize, plane: [usize; 3]) -> Result<Self> {
        Ok(InPlane {
            refs: ThreeAtomRefs::new(diffusing, plane)?,
        })
    }
}

impl PlaneConstraint for InPlane {
    fn name(&self) -> &'static str {
        "in-plane"
    }

    fn indices(&self) -> Vec<usize> {
        self.refs.indices()
    }

    fn adjust_positions(&mut self, cell: &Lattice, _current: &[Vec3], proposed: &mut [Vec3]) {
        let plane = self.refs.plane_of(cell, proposed);
        let i = self.refs.diffusing;
        proposed[i] = plane.project(proposed[i]);
    }

    fn adjust_forces(&mut self, cell: &Lattice, current: &[Vec3], forces: &mut [Vec3]) {
        let n = self.refs.plane_of(cell, current).unit_normal();
        let i = self.refs.diffusing;
        forces[i] = remove_normal(forces[i], n);
    }
}

// ─────────────────────────────────────────────────────────────
// LockedPlane
// ─────────────────────────────────────────────────────────────

/// 保持在与三原子平面平行、距离固定的平面上
///
/// 距离在第一次 `adjust_positions` 时由当前坐标确定，之后不再改变。
#[derive(Debug, Clone)]
pub struct LockedPlane {
    refs: ThreeAtomRefs,
    distance: Option<f64>,
}

impl LockedPlane {
    pub fn new(diffusing: usize, plane: [usize; 3]) -> Result<Self> {
        Ok(LockedPlane {
            refs: ThreeAtomRefs::new(diffusing, plane)?,
            distance: None,
        })
    }

    /// 已锁定的距离，尚未调用时为 None
    pub fn locked_distance(&self) -> Option<f64> {
        self.distance
    }
}

impl PlaneConstraint for LockedPlane {
    fn name(&self) -> &'static str {
        "locked-plane"
    }

    fn indices(&self) -> Vec<usize> {
        self.refs.indices()
    }

    fn adjust_positions(&mut self, cell: &Lattice, current: &[Vec3], proposed: &mut [Vec3]) {
        let plane = self.refs.plane_of(cell, proposed);
        let i = self.refs.diffusing;
        let distance = *self
            .distance
            .get_or_insert_with(|| plane.offset(nearest_image(cell, proposed[i], current[i])));
        proposed[i] = plane.project_with_offset(proposed[i], distance);
    }

    fn adjust_forces(&mut self, cell: &Lattice, current: &[Vec3], forces: &mut [Vec3]) {
        let n = self.refs.plane_of(cell, current).unit_normal();
        let i = self.refs.diffusing;
        forces[i] = remove_normal(forces[i], n);
    }
}

// ─────────────────────────────────────────────────────────────
// InvertPlane
// ─────────────────────────────────────────────────────────────

/// 翻转法向力，把原子推过势垒
#[derive(Debug, Clone)]
pub struct InvertPlane {
    refs: ThreeAtomRefs,
}

impl InvertPlane {
    pub fn new(diffusing: usize, plane: [usize; 3]) -> Result<Self> {
        Ok(InvertPlane {
            refs: ThreeAtomRefs::new(diffusing, plane)?,
        })
    }
}

impl PlaneConstraint for InvertPlane {
    fn name(&self) -> &'static str {
        "invert"
    }

    fn indices(&self) -> Vec<usize> {
        self.refs.indices()
    }

    fn adjust_positions(&mut self, _cell: &Lattice, _current: &[Vec3], _proposed: &mut [Vec3]) {}

    fn adjust_forces(&mut self, cell: &Lattice, current: &[Vec3], forces: &mut [Vec3]) {
        let n = self.refs.plane_of(cell, current).unit_normal();
        let i = self.refs.diffusing;
        forces[i] = reflect_normal(forces[i], n);
    }
}

// ─────────────────────────────────────────────────────────────
// HookeanPlane
// ─────────────────────────────────────────────────────────────

/// 法向力替换为 `-k s n̂`，s 为到平面的有符号距离
#[derive(Debug, Clone)]
pub struct HookeanPlane {
    refs: ThreeAtomRefs,
    spring: f64,
}

impl HookeanPlane {
    pub fn new(diffusing: usize, plane: [usize; 3], spring: f64) -> Result<Self> {
        Ok(HookeanPlane {
            refs: ThreeAtomRefs::new(diffusing, plane)?,
            spring,
        })
    }
}

impl PlaneConstraint for HookeanPlane {
    fn name(&self) -> &'static str {
        "hookean"
    }

    fn indices(&self) -> Vec<usize> {
        self.refs.indices()
    }

    fn adjust_positions(&mut self, _cell: &Lattice, _current: &[Vec3], _proposed: &mut [Vec3]) {}

    fn adjust_forces(&mut self, cell: &Lattice, current: &[Vec3], forces: &mut [Vec3]) {
        let plane = self.refs.plane_of(cell, current);
        let n = plane.unit_normal();
        let i = self.refs.diffusing;
        let restoring = scale(n, -self.spring * plane.signed_distance(current[i]));
        forces[i] = add(remove_normal(forces[i], n), restoring);
    }
}
