//! # 解析器模块
//!
//! VASP 文本格式的读写，以及 GULP 输入文件的写出。
//!
//! ## 依赖关系
//! - 被 `commands/`, `scan/`, `constraints/` 使用
//! - 使用 `models/` 数据模型
//! - 子模块: poscar, incar, outcar, chgcar, inputs, gulp

pub mod chgcar;
pub mod gulp;
pub mod incar;
pub mod inputs;
pub mod outcar;
pub mod poscar;
