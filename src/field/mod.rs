//! # 体数据约化模块
//!
//! 把 CHGCAR 这样的三维标量场约化为三个一维剖面。
//!
//! ## 子模块
//! - `reduce`: 平面平均与周期差分
//! - `export`: TXT/CSV 导出
//! - `plot`: 剖面图
//!
//! ## 依赖关系
//! - 被 `commands/chgsplit.rs` 使用
//! - 使用 `models/field.rs`

pub mod export;
pub mod plot;
pub mod reduce;

pub use reduce::{axis_profiles, AxisProfile};
