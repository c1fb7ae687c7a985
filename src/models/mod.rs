//! # 数据模型模块
//!
//! 定义结构、INCAR 参数、输入文件集合和电荷密度网格。
//!
//! ## 依赖关系
//! - 被 `parsers/` 和 `commands/` 使用
//! - 子模块: structure, incar, field, inputs

pub mod field;
pub mod incar;
pub mod inputs;
pub mod structure;

pub use field::ChargeDensity;
pub use incar::Incar;
pub use inputs::VaspInputs;
pub use structure::{Lattice, Poscar, Vec3};
