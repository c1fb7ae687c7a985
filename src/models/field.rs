//! # 电荷密度网格模型
//!
//! CHGCAR 的总密度块：一个周期性晶胞上的三维标量场。
//! 数据按文件顺序存放（x 变化最快）。
//!
//! ## 依赖关系
//! - 被 `parsers/chgcar.rs` 构造
//! - 被 `field/` 约化

use super::structure::Poscar;

/// 三维电荷密度
#[derive(Debug, Clone)]
pub struct ChargeDensity {
    /// 文件头部的结构
    pub structure: Poscar,
    /// 网格点数 (nx, ny, nz)
    pub grid: [usize; 3],
    /// 原始密度值 (rho * V)，长度 nx*ny*nz
    pub data: Vec<f64>,
}

impl ChargeDensity {
    pub fn new(structure: Poscar, grid: [usize; 3], data: Vec<f64>) -> Self {
        ChargeDensity {
            structure,
            grid,
            data,
        }
    }

    /// (i, j, k) 处的值
    #[inline]
    pub fn value(&self, i: usize, j: usize, k: usize) -> f64 {
        let [nx, ny, _] = self.grid;
        self.data[i + nx * (j + ny * k)]
    }

    /// 沿轴 `axis` 的网格间距 |a_v| / n_v
    pub fn spacing(&self, axis: usize) -> f64 {
        self.structure.lattice.lengths()[axis] / self.grid[axis] as f64
    }
}
