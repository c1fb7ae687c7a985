//! # 体数据沿轴约化
//!
//! ## 算法
//! - 平面平均：对另外两个方向求和，再除以这两个方向的网格点数
//! - 导数模式：五点中心差分
//!   `f'(x) = (-f[x+2] + 8 f[x+1] - 8 f[x-1] + f[x-2]) / (12 h)`
//!   下标按周期边界回绕（-1 即最后一个点）
//!
//! 对 h 接近零的情况不做保护。
//!
//! ## 依赖关系
//! - 被 `commands/chgsplit.rs` 调用
//! - 使用 `models/field.rs`

use crate::models::ChargeDensity;

/// 五点差分系数，对应偏移 [+2, +1, -1, -2]
pub const STENCIL: [(isize, f64); 4] = [(2, -1.0), (1, 8.0), (-1, -8.0), (-2, 1.0)];

/// 沿某一轴的一维剖面
#[derive(Debug, Clone)]
pub struct AxisProfile {
    /// 晶格轴 0/1/2
    pub axis: usize,
    /// 网格间距 (Å)
    pub spacing: f64,
    /// 每个网格点的值
    pub values: Vec<f64>,
}

impl AxisProfile {
    /// 网格坐标 (Å)
    pub fn coordinates(&self) -> Vec<f64> {
        (0..self.values.len())
            .map(|i| i as f64 * self.spacing)
            .collect()
    }

    pub fn min(&self) -> f64 {
        self.values.iter().copied().fold(f64::INFINITY, f64::min)
    }

    pub fn max(&self) -> f64 {
        self.values.iter().copied().fold(f64::NEG_INFINITY, f64::max)
    }
}

/// 沿轴 `axis` 的平面平均
pub fn planar_average(field: &ChargeDensity, axis: usize) -> Vec<f64> {
    let [nx, ny, nz] = field.grid;
    let n = field.grid[axis];
    let mut sums = vec![0.0; n];

    for k in 0..nz {
        for j in 0..ny {
            for i in 0..nx {
                let idx = match axis {
                    0 => i,
                    1 => j,
                    _ => k,
                };
                sums[idx] += field.value(i, j, k);
            }
        }
    }

    let others = (field.grid[(axis + 1) % 3] * field.grid[(axis + 2) % 3]) as f64;
    sums.iter().map(|s| s / others).collect()
}

/// 周期边界的五点中心差分
pub fn periodic_derivative(values: &[f64], spacing: f64) -> Vec<f64> {
    let n = values.len() as isize;
    (0..n)
        .map(|x| {
            let sum: f64 = STENCIL
                .iter()
                .map(|(offset, coef)| coef * values[(x + offset).rem_euclid(n) as usize])
                .sum();
            sum / 12.0 / spacing
        })
        .collect()
}

/// 生成三个轴的剖面
pub fn axis_profiles(field: &ChargeDensity, derivative: bool) -> Vec<AxisProfile> {
    (0..3)
        .map(|axis| {
            let spacing = field.spacing(axis);
            let average = planar_average(field, axis);
            let values = if derivative {
                periodic_derivative(&average, spacing)
            } else {
                average
            };
            AxisProfile {
                axis,
                spacing,
                values,
            }
        })
        .collect()
}
