//! # 中垂面约束
//!
//! 平面为两个参考点连线的中垂面，扩散原子的建议坐标被投影到该面上，
//! 力的法向分量被去掉。两个参考点都取离扩散原子当前位置最近的周期像，
//! 建议坐标也先换到当前位置附近再投影。
//!
//! - `MidpointPlane`: 参考点取自当前坐标
//! - `AlignedMidpointPlane`: 平面额外包含对齐方向，方程缓存 `window` 次
//! - `SurfaceMidpointPlane`: 参考点取自静态参考结构
//!
//! ## 依赖关系
//! - 被 `constraints/mod.rs` 的 `ConstraintPolicy` 包装
//! - 使用 `constraints/geometry.rs`
//! - 使用 `parsers/poscar.rs` 读取参考结构

use super::geometry::{nearest_image, remove_normal, Plane};
use super::{check_distinct, PlaneConstraint};
use crate::error::{NebError, Result};
use crate::models::{Lattice, Poscar, Vec3};
use crate::parsers::poscar::parse_poscar_file;

use std::path::Path;

/// 对齐方向默认值
pub const DEFAULT_AXIS: Vec3 = [0.0, 0.0, 1.0];
/// 平面方程重复使用的次数默认值
pub const DEFAULT_WINDOW: usize = 50;

/// 以 anchor 为中心取参考点对的最近像
fn pair_near(cell: &Lattice, anchor: Vec3, p1: Vec3, p2: Vec3) -> (Vec3, Vec3) {
    (
        nearest_image(cell, anchor, p1),
        nearest_image(cell, anchor, p2),
    )
}

/// 把建议坐标换到当前坐标附近后投影到平面上
fn project_near(cell: &Lattice, plane: &Plane, current: Vec3, proposed: Vec3) -> Vec3 {
    plane.project(nearest_image(cell, current, proposed))
}

// ─────────────────────────────────────────────────────────────
// MidpointPlane
// ─────────────────────────────────────────────────────────────

#[derive(Debug, Clone)]
pub struct MidpointPlane {
    diffusing: usize,
    pair: [usize; 2],
}

impl MidpointPlane {
    pub fn new(diffusing: usize, pair: [usize; 2]) -> Result<Self> {
        check_distinct(diffusing, &pair)?;
        Ok(MidpointPlane { diffusing, pair })
    }

    fn plane_of(&self, cell: &Lattice, positions: &[Vec3]) -> Plane {
        let (p1, p2) = pair_near(
            cell,
            positions[self.diffusing],
            positions[self.pair[0]],
            positions[self.pair[1]],
        );
        Plane::bisector(p1, p2)
    }
}

impl PlaneConstraint for MidpointPlane {
    fn name(&self) -> &'static str {
        "midpoint"
    }

    fn indices(&self) -> Vec<usize> {
        vec![self.diffusing, self.pair[0], self.pair[1]]
    }

    fn adjust_positions(&mut self, cell: &Lattice, current: &[Vec3], proposed: &mut [Vec3]) {
        let i = self.diffusing;
        let plane = self.plane_of(cell, current);
        proposed[i] = project_near(cell, &plane, current[i], proposed[i]);
    }

    fn adjust_forces(&mut self, cell: &Lattice, current: &[Vec3], forces: &mut [Vec3]) {
        let n = self.plane_of(cell, current).unit_normal();
        forces[self.diffusing] = remove_normal(forces[self.diffusing], n);
    }
}

// ─────────────────────────────────────────────────────────────
// AlignedMidpointPlane
// ─────────────────────────────────────────────────────────────

/// 包含对齐方向的中垂面
///
/// 第一次调用总是计算平面；之后的 `window` 次调用（位置和力都计入）
/// 复用缓存的方程，再下一次重新计算。
#[derive(Debug, Clone)]
pub struct AlignedMidpointPlane {
    diffusing: usize,
    pair: [usize; 2],
    axis: Vec3,
    window: usize,
    cache: Option<Plane>,
    age: usize,
}

impl AlignedMidpointPlane {
    pub fn new(diffusing: usize, pair: [usize; 2], axis: Vec3, window: usize) -> Result<Self> {
        check_distinct(diffusing, &pair)?;
        if axis.iter().all(|x| *x == 0.0) {
            return Err(NebError::InvalidArgument(
                "alignment axis must be a nonzero vector".into(),
            ));
        }
        Ok(AlignedMidpointPlane {
            diffusing,
            pair,
            axis,
            window,
            cache: None,
            age: 0,
        })
    }

    /// 当前缓存的平面
    pub fn cached_plane(&self) -> Option<Plane> {
        self.cache
    }

    fn plane(&mut self, cell: &Lattice, positions: &[Vec3]) -> Plane {
        match self.cache {
            Some(plane) if self.age < self.window => {
                self.age += 1;
                plane
            }
            _ => {
                let (p1, p2) = pair_near(
                    cell,
                    positions[self.diffusing],
                    positions[self.pair[0]],
                    positions[self.pair[1]],
                );
                let plane = Plane::aligned_bisector(p1, p2, self.axis);
                self.cache = Some(plane);
                self.age = 0;
                plane
            }
        }
    }
}

impl PlaneConstraint for AlignedMidpointPlane {
    fn name(&self) -> &'static str {
        "aligned-midpoint"
    }

    fn indices(&self) -> Vec<usize> {
        vec![self.diffusing, self.pair[0], self.pair[1]]
    }

    fn adjust_positions(&mut self, cell: &Lattice, current: &[Vec3], proposed: &mut [Vec3]) {
        let i = self.diffusing;
        let plane = self.plane(cell, current);
        proposed[i] = project_near(cell, &plane, current[i], proposed[i]);
    }

    fn adjust_forces(&mut self, cell: &Lattice, current: &[Vec3], forces: &mut [Vec3]) {
        let n = self.plane(cell, current).unit_normal();
        forces[self.diffusing] = remove_normal(forces[self.diffusing], n);
    }
}

// ─────────────────────────────────────────────────────────────
// SurfaceMidpointPlane
// ─────────────────────────────────────────────────────────────

/// 参考点来自静态结构文件的中垂面
///
/// 参考点坐标在构造时读入，每次调用时取离扩散原子最近的像再建平面。
#[derive(Debug, Clone)]
pub struct SurfaceMidpointPlane {
    diffusing: usize,
    points: [Vec3; 2],
    last: Option<Plane>,
}

impl SurfaceMidpointPlane {
    /// `pair` 是参考结构中的原子序号
    pub fn new(diffusing: usize, pair: [usize; 2], reference: &Poscar) -> Result<Self> {
        if pair[0] == pair[1] {
            return Err(NebError::InvalidArgument(format!(
                "reference atoms must differ, got {} twice",
                pair[0]
            )));
        }
        let n = reference.num_atoms();
        if let Some(bad) = pair.iter().find(|&&i| i >= n) {
            return Err(NebError::InvalidArgument(format!(
                "reference atom {} out of range (reference structure has {} atoms)",
                bad, n
            )));
        }
        Ok(SurfaceMidpointPlane {
            diffusing,
            points: [reference.positions[pair[0]], reference.positions[pair[1]]],
            last: None,
        })
    }

    pub fn from_file(diffusing: usize, pair: [usize; 2], path: &Path) -> Result<Self> {
        let reference = parse_poscar_file(path)?;
        Self::new(diffusing, pair, &reference)
    }

    /// 最近一次调用使用的平面
    pub fn last_plane(&self) -> Option<Plane> {
        self.last
    }

    fn plane(&mut self, cell: &Lattice, anchor: Vec3) -> Plane {
        let (p1, p2) = pair_near(cell, anchor, self.points[0], self.points[1]);
        let plane = Plane::bisector(p1, p2);
        self.last = Some(plane);
        plane
    }
}

impl PlaneConstraint for SurfaceMidpointPlane {
    fn name(&self) -> &'static str {
        "surface-midpoint"
    }

    fn indices(&self) -> Vec<usize> {
        vec![self.diffusing]
    }

    fn adjust_positions(&mut self, cell: &Lattice, current: &[Vec3], proposed: &mut [Vec3]) {
        let i = self.diffusing;
        let plane = self.plane(cell, current[i]);
        proposed[i] = project_near(cell, &plane, current[i], proposed[i]);
    }

    fn adjust_forces(&mut self, cell: &Lattice, current: &[Vec3], forces: &mut [Vec3]) {
        let i = self.diffusing;
        let n = self.plane(cell, current[i]).unit_normal();
        forces[i] = remove_normal(forces[i], n);
    }
}
