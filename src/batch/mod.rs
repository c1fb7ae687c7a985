//! # 批量处理模块
//!
//! 收集需要批量处理的运行目录。
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 使用
//! - 子模块: collector

pub mod collector;

pub use collector::RunDirCollector;
