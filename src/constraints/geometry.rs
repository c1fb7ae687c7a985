//! # 平面几何
//!
//! 平面方程写作 `n · x = d`，n 不要求是单位向量。
//! 点到平面的投影：`k = (n·p - d) / |n|²`，`p' = p - k n`。
//!
//! 退化几何（三点共线、两点重合）得到零法向量，后续除法产生 NaN，
//! 这里不做拦截。
//!
//! 参考原子在建平面之前先用 `nearest_image` 换到离扩散原子最近的
//! 周期像上，跨越晶胞边界的参考原子对才能给出正确的平面。

use crate::models::{Lattice, Vec3};

#[inline]
pub fn add(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] + b[0], a[1] + b[1], a[2] + b[2]]
}

#[inline]
pub fn sub(a: Vec3, b: Vec3) -> Vec3 {
    [a[0] - b[0], a[1] - b[1], a[2] - b[2]]
}

#[inline]
pub fn scale(a: Vec3, s: f64) -> Vec3 {
    [a[0] * s, a[1] * s, a[2] * s]
}

#[inline]
pub fn dot(a: Vec3, b: Vec3) -> f64 {
    a[0] * b[0] + a[1] * b[1] + a[2] * b[2]
}

#[inline]
pub fn cross(a: Vec3, b: Vec3) -> Vec3 {
    [
        a[1] * b[2] - a[2] * b[1],
        a[2] * b[0] - a[0] * b[2],
        a[0] * b[1] - a[1] * b[0],
    ]
}

#[inline]
pub fn norm(a: Vec3) -> f64 {
    dot(a, a).sqrt()
}

/// p 离 anchor 最近的周期像
///
/// 分数坐标差取整后减掉整数个晶格矢量，结果与 anchor 的分数坐标差
/// 落在 [-0.5, 0.5]。奇异晶格下原样返回。
pub fn nearest_image(cell: &Lattice, anchor: Vec3, p: Vec3) -> Vec3 {
    if cell.volume().abs() < 1e-10 {
        return p;
    }
    let frac = cell.to_fractional(sub(p, anchor));
    let shift = [frac[0].round(), frac[1].round(), frac[2].round()];
    sub(p, cell.to_cartesian(shift))
}

/// 平面 `normal · x = d`
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Plane {
    pub normal: Vec3,
    pub d: f64,
}

impl Plane {
    /// 过三点的平面，法向量归一化
    pub fn through_points(p1: Vec3, p2: Vec3, p3: Vec3) -> Self {
        let c = cross(sub(p2, p1), sub(p3, p1));
        let normal = scale(c, 1.0 / norm(c));
        Plane {
            normal,
            d: dot(normal, p1),
        }
    }

    /// 两点的中垂面：法向量 p1 - p2（不归一化），过中点
    pub fn bisector(p1: Vec3, p2: Vec3) -> Self {
        let normal = sub(p1, p2);
        let midpoint = scale(add(p1, p2), 0.5);
        Plane {
            normal,
            d: dot(normal, midpoint),
        }
    }

    /// 包含对齐方向 `axis` 的中垂面
    ///
    /// 法向量 `u × ((b × u) / |u|) / |u|`，即键向量 b 垂直于 u 的分量。
    pub fn aligned_bisector(p1: Vec3, p2: Vec3, axis: Vec3) -> Self {
        let bond = sub(p1, p2);
        let u_len = norm(axis);
        let normal = scale(cross(axis, scale(cross(bond, axis), 1.0 / u_len)), 1.0 / u_len);
        let midpoint = scale(add(p1, p2), 0.5);
        Plane {
            normal,
            d: dot(normal, midpoint),
        }
    }

    /// 单位法向量
    pub fn unit_normal(&self) -> Vec3 {
        scale(self.normal, 1.0 / norm(self.normal))
    }

    /// 投影系数 k = (n·p - d) / |n|²
    pub fn offset(&self, p: Vec3) -> f64 {
        (dot(self.normal, p) - self.d) / dot(self.normal, self.normal)
    }

    /// 有符号距离 (Å)
    pub fn signed_distance(&self, p: Vec3) -> f64 {
        (dot(self.normal, p) - self.d) / norm(self.normal)
    }

    /// 沿法向移动 p，使其落在与本平面相距 `shift`（以 k 计）的平行面上
    pub fn project_with_offset(&self, p: Vec3, shift: f64) -> Vec3 {
        let k = self.offset(p) - shift;
        sub(p, scale(self.normal, k))
    }

    /// p 在平面上的最近点
    pub fn project(&self, p: Vec3) -> Vec3 {
        self.project_with_offset(p, 0.0)
    }
}

/// 去掉力在单位法向 n 上的分量
pub fn remove_normal(force: Vec3, unit_normal: Vec3) -> Vec3 {
    sub(force, scale(unit_normal, dot(unit_normal, force)))
}

/// 翻转力在单位法向 n 上的分量
pub fn reflect_normal(force: Vec3, unit_normal: Vec3) -> Vec3 {
    sub(force, scale(unit_normal, 2.0 * dot(unit_normal, force)))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_plane_through_points_contains_them() {
        let (a, b, c) = ([1.0, 0.0, 0.5], [0.0, 2.0, 1.0], [-1.0, 0.3, 2.0]);
        let plane = Plane::through_points(a, b, c);
        for p in [a, b, c] {
            assert!(plane.offset(p).abs() < 1e-12);
        }
        assert!((norm(plane.normal) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_bisector_is_equidistant() {
        let (a, b) = ([0.0, 0.0, 0.0], [2.0, 2.0, 0.0]);
        let plane = Plane::bisector(a, b);
        assert!((plane.signed_distance(a) + plane.signed_distance(b)).abs() < 1e-12);
        assert!(plane.offset([1.0, 1.0, 5.0]).abs() < 1e-12);
    }

    #[test]
    fn test_aligned_bisector_contains_axis() {
        let axis = [0.0, 0.0, 2.0];
        let plane = Plane::aligned_bisector([1.0, 0.0, 3.0], [-1.0, 0.0, 0.0], axis);
        assert!(dot(plane.normal, axis).abs() < 1e-12);
        // 键向量 (2, 0, 3) 去掉 z 分量
        assert!((plane.normal[0] - 2.0).abs() < 1e-12);
        assert!(plane.normal[2].abs() < 1e-12);
    }

    #[test]
    fn test_projection_lands_on_plane() {
        let plane = Plane::bisector([0.0, 0.0, 0.0], [0.0, 0.0, 3.0]);
        let p = plane.project([0.3, -0.7, 4.2]);
        assert!(plane.offset(p).abs() < 1e-12);
        assert!((p[0] - 0.3).abs() < 1e-12);
        assert!((p[2] - 1.5).abs() < 1e-12);
    }

    #[test]
    fn test_reflect_keeps_tangential() {
        let n = [0.0, 0.0, 1.0];
        assert_eq!(reflect_normal([1.0, 2.0, 3.0], n), [1.0, 2.0, -3.0]);
        assert_eq!(remove_normal([1.0, 2.0, 3.0], n), [1.0, 2.0, 0.0]);
    }

    #[test]
    fn test_nearest_image_crosses_boundary() {
        let cell = Lattice::from_vectors([[10.0, 0.0, 0.0], [0.0, 10.0, 0.0], [0.0, 0.0, 10.0]]);
        let anchor = [0.5, 5.0, 5.0];
        assert_eq!(nearest_image(&cell, anchor, [9.0, 5.0, 5.0]), [-1.0, 5.0, 5.0]);
        assert_eq!(nearest_image(&cell, anchor, [1.0, 5.0, 5.0]), [1.0, 5.0, 5.0]);

        // 斜晶胞：沿 b 平移一个晶格矢量
        let hex = Lattice::from_vectors([[4.0, 0.0, 0.0], [2.0, 3.0, 0.0], [0.0, 0.0, 6.0]]);
        let p = nearest_image(&hex, [0.0; 3], [2.2, 2.9, 0.1]);
        assert!((p[0] - 0.2).abs() < 1e-12);
        assert!((p[1] + 0.1).abs() < 1e-12);
        assert!((p[2] - 0.1).abs() < 1e-12);
    }

    #[test]
    fn test_collinear_points_give_nan() {
        let plane = Plane::through_points([0.0; 3], [1.0, 0.0, 0.0], [2.0, 0.0, 0.0]);
        assert!(plane.normal.iter().all(|x| x.is_nan()));
    }
}
