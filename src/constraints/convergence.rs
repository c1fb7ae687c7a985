//! # 弛豫收敛判据
//!
//! 外部优化器每步调用一次。满足以下任一条件即视为收敛：
//! - 与上一步的能量差小于 `fmax / 1e6`（优化停滞）
//! - 最大原子受力的平方小于 `fmax²`；dimer 计算还要求曲率为负
//!
//! 第一次调用没有上一步能量，只看受力。
//!
//! ## 依赖关系
//! - 被 `commands/constrain.rs` 使用

use super::geometry::dot;
use crate::models::Vec3;

/// 能量判据相对于 fmax 的缩放
const ENERGY_SCALE: f64 = 1.0e6;

/// 带上一步能量记忆的收敛判据
#[derive(Debug, Clone)]
pub struct Convergence {
    fmax: f64,
    previous_energy: Option<f64>,
}

impl Convergence {
    /// fmax 单位 eV/Å
    pub fn new(fmax: f64) -> Self {
        Convergence {
            fmax,
            previous_energy: None,
        }
    }

    /// 已知上一步能量时（例如从 OUTCAR 恢复）预先填入
    pub fn with_previous_energy(mut self, energy: f64) -> Self {
        self.previous_energy = Some(energy);
        self
    }

    pub fn fmax(&self) -> f64 {
        self.fmax
    }

    /// 判断本步是否收敛，并记录本步能量
    ///
    /// `curvature` 只在 dimer 计算中给出。
    pub fn is_converged(&mut self, energy: f64, forces: &[Vec3], curvature: Option<f64>) -> bool {
        let stalled = self
            .previous_energy
            .map(|e| (e - energy).abs() < self.fmax / ENERGY_SCALE)
            .unwrap_or(false);
        self.previous_energy = Some(energy);
        if stalled {
            return true;
        }

        max_force_squared(forces) < self.fmax * self.fmax && curvature.map_or(true, |c| c < 0.0)
    }
}

/// 所有原子受力模长平方的最大值
pub fn max_force_squared(forces: &[Vec3]) -> f64 {
    forces.iter().map(|f| dot(*f, *f)).fold(0.0, f64::max)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_force_criterion() {
        let mut c = Convergence::new(0.05);
        assert!(!c.is_converged(-10.0, &[[0.0, 0.04, 0.04]], None));
        assert!(c.is_converged(-10.5, &[[0.0, 0.03, 0.03], [0.01, 0.0, 0.0]], None));
    }

    #[test]
    fn test_energy_stall_stops_before_forces() {
        let mut c = Convergence::new(0.05);
        let large = [[1.0, 0.0, 0.0]];
        // 第一次没有上一步能量
        assert!(!c.is_converged(-20.0, &large, None));
        assert!(!c.is_converged(-20.001, &large, None));
        // 变化 1e-8 < 0.05 / 1e6
        assert!(c.is_converged(-20.00100001, &large, None));
    }

    #[test]
    fn test_dimer_needs_negative_curvature() {
        let small = [[0.01, 0.0, 0.0]];
        let mut c = Convergence::new(0.05);
        assert!(!c.is_converged(-5.0, &small, Some(0.3)));
        assert!(c.is_converged(-4.0, &small, Some(-1.2)));
    }

    #[test]
    fn test_previous_energy_from_history() {
        let mut c = Convergence::new(0.01).with_previous_energy(-7.0);
        assert!(c.is_converged(-7.0, &[[5.0, 0.0, 0.0]], None));
    }

    #[test]
    fn test_max_force_squared() {
        assert_eq!(max_force_squared(&[]), 0.0);
        assert_eq!(max_force_squared(&[[3.0, 4.0, 0.0], [1.0, 0.0, 0.0]]), 25.0);
    }
}
