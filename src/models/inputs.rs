//! # VASP 输入文件集合
//!
//! 一次已收敛计算的四个输入文件。KPOINTS 和 POTCAR 不做解析，
//! 按原文复制。
//!
//! ## 依赖关系
//! - 由 `parsers/inputs.rs` 读取和写出
//! - 被 `scan/` 使用

use super::incar::Incar;
use super::structure::Poscar;

/// INCAR + POSCAR + KPOINTS + POTCAR
#[derive(Debug, Clone)]
pub struct VaspInputs {
    pub incar: Incar,
    pub poscar: Poscar,
    pub kpoints: String,
    pub potcar: String,
}
