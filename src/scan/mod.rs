//! # 目录扫描模块
//!
//! 电荷态和自旋态扫描共用的目录生成逻辑，以及振动计算的有限位移目录。
//!
//! ## 依赖关系
//! - 被 `commands/charge.rs`, `commands/nupdown.rs`, `commands/vib.rs` 使用
//! - 子模块: naming, generator, displacement

pub mod displacement;
pub mod generator;
pub mod naming;

pub use displacement::DisplacementPlan;
pub use generator::{ScanPlan, ScanRange};
pub use naming::parse_dir_label;
