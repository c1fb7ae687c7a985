//! # 有限位移目录生成器
//!
//! 为振动频率计算准备输入：对选中的每个原子、每个笛卡尔方向，
//! 分别沿正负方向移动 `delta`（nfree = 4 时再加 ±2·delta），每个
//! 位移一个目录。目录名为 `<name>.<原子序号><x|y|z><符号>`，符号里
//! `+` 写作 `p`，`-` 写作 `m`，例如 `vib.0xm`、`vib.12zpp`。另有
//! 未位移的 `<name>.eq` 目录。
//!
//! 每个目录写入位移后的 POSCAR 和基础输入的 INCAR/KPOINTS/POTCAR，
//! 存在的 WAVECAR/CHG/CHGCAR 一并复制。已存在的目录跳过。
//!
//! ## 依赖关系
//! - 被 `commands/vib.rs` 使用
//! - 使用 `scan/generator.rs` 的目录写出逻辑

use super::generator::{write_rundir, ScanReport};
use crate::error::{NebError, Result};
use crate::models::VaspInputs;

use std::path::PathBuf;

/// 默认位移 (Å)
pub const DEFAULT_DELTA: f64 = 0.01;

/// 默认目录名前缀
pub const DEFAULT_NAME: &str = "vib";

const AXES: [char; 3] = ['x', 'y', 'z'];

/// 单个有限位移
#[derive(Debug, Clone, PartialEq)]
pub struct Displacement {
    /// 目录名（不含前缀）
    pub label: String,
    /// 0 起的原子序号
    pub atom: usize,
    /// 0, 1, 2 对应 x, y, z
    pub axis: usize,
    /// 位移量 (Å)，带符号
    pub step: f64,
}

/// `+`/`-` 序列写成目录名中的 `p`/`m`
pub fn sign_label(sign: f64, count: usize) -> String {
    let c = if sign < 0.0 { 'm' } else { 'p' };
    std::iter::repeat(c).take(count).collect()
}

/// 位移配置
pub struct DisplacementPlan<'a> {
    /// 基础输入集合（POSCAR 为平衡结构）
    pub inputs: &'a VaspInputs,
    /// 生成目录的父目录
    pub root: PathBuf,
    /// 要位移的原子，空表示全部
    pub indices: Vec<usize>,
    /// 位移量 (Å)
    pub delta: f64,
    /// 每个方向的位移数，2 或 4
    pub nfree: usize,
    /// 目录名前缀
    pub name: String,
    /// 需要一并复制的辅助文件（不存在时忽略）
    pub carry: Vec<PathBuf>,
}

impl<'a> DisplacementPlan<'a> {
    pub fn new(inputs: &'a VaspInputs, root: impl Into<PathBuf>) -> Self {
        DisplacementPlan {
            inputs,
            root: root.into(),
            indices: Vec::new(),
            delta: DEFAULT_DELTA,
            nfree: 2,
            name: DEFAULT_NAME.to_string(),
            carry: Vec::new(),
        }
    }

    pub fn with_indices(mut self, indices: Vec<usize>) -> Self {
        self.indices = indices;
        self
    }

    pub fn with_delta(mut self, delta: f64) -> Self {
        self.delta = delta;
        self
    }

    pub fn with_nfree(mut self, nfree: usize) -> Self {
        self.nfree = nfree;
        self
    }

    pub fn with_name(mut self, name: impl Into<String>) -> Self {
        self.name = name.into();
        self
    }

    pub fn with_carry(mut self, files: Vec<PathBuf>) -> Self {
        self.carry = files;
        self
    }

    fn validate(&self) -> Result<()> {
        if self.nfree != 2 && self.nfree != 4 {
            return Err(NebError::InvalidArgument(format!(
                "nfree must be 2 or 4, got {}",
                self.nfree
            )));
        }
        if !self.delta.is_finite() || self.delta <= 0.0 {
            return Err(NebError::InvalidArgument(format!(
                "Displacement must be positive, got {}",
                self.delta
            )));
        }
        let natoms = self.inputs.poscar.num_atoms();
        if let Some(&bad) = self.indices.iter().find(|&&i| i >= natoms) {
            return Err(NebError::InvalidArgument(format!(
                "Atom index {} out of range ({} atoms)",
                bad, natoms
            )));
        }
        Ok(())
    }

    /// 所有位移，按原子、方向、负号在前的顺序
    pub fn displacements(&self) -> Vec<Displacement> {
        let atoms: Vec<usize> = if self.indices.is_empty() {
            (0..self.inputs.poscar.num_atoms()).collect()
        } else {
            self.indices.clone()
        };

        let mut out = Vec::new();
        for &atom in &atoms {
            for (axis, name) in AXES.iter().enumerate() {
                for sign in [-1.0, 1.0] {
                    for n in 1..=self.nfree / 2 {
                        out.push(Displacement {
                            label: format!("{}{}{}", atom, name, sign_label(sign, n)),
                            atom,
                            axis,
                            step: sign * n as f64 * self.delta,
                        });
                    }
                }
            }
        }
        out
    }

    /// 生成平衡目录和全部位移目录
    pub fn run(&self) -> Result<ScanReport<String>> {
        self.validate()?;
        let mut report = ScanReport::default();

        let eq = format!("{}.eq", self.name);
        let outcome = write_rundir(&self.root.join(&eq), self.inputs, &self.carry)?;
        report.merge(eq, outcome);

        for d in self.displacements() {
            let mut inputs = self.inputs.clone();
            inputs.poscar.positions[d.atom][d.axis] += d.step;
            inputs.poscar.comment =
                format!("{} {}", self.inputs.poscar.comment.trim(), d.label);

            let label = format!("{}.{}", self.name, d.label);
            let outcome = write_rundir(&self.root.join(&label), &inputs, &self.carry)?;
            report.merge(label, outcome);
        }

        Ok(report)
    }
}
