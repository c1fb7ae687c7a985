//! # 晶体结构数据模型
//!
//! POSCAR/CONTCAR 的内存表示。坐标统一存为笛卡尔坐标，
//! 平面约束直接在笛卡尔空间中计算，写出时再转回分数坐标。
//!
//! ## 依赖关系
//! - 被 `parsers/poscar.rs`, `parsers/chgcar.rs` 使用
//! - 被 `constraints/`, `commands/` 使用

use serde::{Deserialize, Serialize};

/// 三维向量
pub type Vec3 = [f64; 3];

/// 晶格参数表示
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lattice {
    /// 晶格向量矩阵 (3x3)，行向量表示 a, b, c
    /// [[a1, a2, a3], [b1, b2, b3], [c1, c2, c3]]
    pub matrix: [[f64; 3]; 3],
}

impl Lattice {
    /// 从晶格向量矩阵创建
    pub fn from_vectors(matrix: [[f64; 3]; 3]) -> Self {
        Lattice { matrix }
    }

    /// 三个晶格向量的长度 (a, b, c)
    pub fn lengths(&self) -> Vec3 {
        let len = |v: &[f64; 3]| (v[0] * v[0] + v[1] * v[1] + v[2] * v[2]).sqrt();
        [
            len(&self.matrix[0]),
            len(&self.matrix[1]),
            len(&self.matrix[2]),
        ]
    }

    /// 晶格夹角 (alpha, beta, gamma)，单位度
    ///
    /// alpha 为 b 与 c 的夹角，beta 为 a 与 c，gamma 为 a 与 b。
    pub fn angles(&self) -> Vec3 {
        let [a, b, c] = self.matrix;
        let angle = |u: [f64; 3], v: [f64; 3]| {
            let dot = u[0] * v[0] + u[1] * v[1] + u[2] * v[2];
            let norm = |w: [f64; 3]| (w[0] * w[0] + w[1] * w[1] + w[2] * w[2]).sqrt();
            (dot / (norm(u) * norm(v))).clamp(-1.0, 1.0).acos().to_degrees()
        };
        [angle(b, c), angle(a, c), angle(a, b)]
    }

    /// 计算晶格体积
    pub fn volume(&self) -> f64 {
        let a = self.matrix[0];
        let b = self.matrix[1];
        let c = self.matrix[2];

        // 行列式计算
        a[0] * (b[1] * c[2] - b[2] * c[1]) - a[1] * (b[0] * c[2] - b[2] * c[0])
            + a[2] * (b[0] * c[1] - b[1] * c[0])
    }

    /// 分数坐标转笛卡尔坐标
    pub fn to_cartesian(&self, frac: Vec3) -> Vec3 {
        let m = self.matrix;
        [
            frac[0] * m[0][0] + frac[1] * m[1][0] + frac[2] * m[2][0],
            frac[0] * m[0][1] + frac[1] * m[1][1] + frac[2] * m[2][1],
            frac[0] * m[0][2] + frac[1] * m[1][2] + frac[2] * m[2][2],
        ]
    }

    /// 笛卡尔坐标转分数坐标
    ///
    /// 奇异晶格原样返回输入。
    pub fn to_fractional(&self, cart: Vec3) -> Vec3 {
        let m = self.matrix;
        let det = self.volume();

        if det.abs() < 1e-10 {
            return cart;
        }

        let inv = [
            [
                (m[1][1] * m[2][2] - m[1][2] * m[2][1]) / det,
                (m[0][2] * m[2][1] - m[0][1] * m[2][2]) / det,
                (m[0][1] * m[1][2] - m[0][2] * m[1][1]) / det,
            ],
            [
                (m[1][2] * m[2][0] - m[1][0] * m[2][2]) / det,
                (m[0][0] * m[2][2] - m[0][2] * m[2][0]) / det,
                (m[0][2] * m[1][0] - m[0][0] * m[1][2]) / det,
            ],
            [
                (m[1][0] * m[2][1] - m[1][1] * m[2][0]) / det,
                (m[0][1] * m[2][0] - m[0][0] * m[2][1]) / det,
                (m[0][0] * m[1][1] - m[0][1] * m[1][0]) / det,
            ],
        ];

        // frac = cart * M^-1 (行向量约定)
        [
            cart[0] * inv[0][0] + cart[1] * inv[1][0] + cart[2] * inv[2][0],
            cart[0] * inv[0][1] + cart[1] * inv[1][1] + cart[2] * inv[2][1],
            cart[0] * inv[0][2] + cart[1] * inv[1][2] + cart[2] * inv[2][2],
        ]
    }
}

/// 选择性动力学标记 (T/F)
pub type SelectiveFlags = [bool; 3];

/// POSCAR 结构
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Poscar {
    /// 注释行
    pub comment: String,

    /// 晶格（已乘缩放因子）
    pub lattice: Lattice,

    /// 元素符号，按文件顺序
    pub species: Vec<String>,

    /// 每种元素的原子数
    pub counts: Vec<usize>,

    /// 笛卡尔坐标 (Å)
    pub positions: Vec<Vec3>,

    /// 选择性动力学标记，没有 `Selective dynamics` 行时为 None
    pub selective: Option<Vec<SelectiveFlags>>,
}

impl Poscar {
    pub fn new(
        comment: impl Into<String>,
        lattice: Lattice,
        species: Vec<String>,
        counts: Vec<usize>,
        positions: Vec<Vec3>,
    ) -> Self {
        Poscar {
            comment: comment.into(),
            lattice,
            species,
            counts,
            positions,
            selective: None,
        }
    }

    /// 原子总数
    pub fn num_atoms(&self) -> usize {
        self.positions.len()
    }

    /// 每个原子的元素符号
    pub fn symbols(&self) -> Vec<&str> {
        self.species
            .iter()
            .zip(self.counts.iter())
            .flat_map(|(s, &n)| std::iter::repeat(s.as_str()).take(n))
            .collect()
    }

    /// 分数坐标
    pub fn fractional_positions(&self) -> Vec<Vec3> {
        self.positions
            .iter()
            .map(|&p| self.lattice.to_fractional(p))
            .collect()
    }
}
