//! # 通用工具
//!
//! - `output`: 带颜色前缀的终端消息
//! - `progress`: 批量提交时的进度条和解析时的旋转指示
//! - `slurm`: 生成 sbatch 作业脚本
//!
//! ## 依赖关系
//! - 被 `commands/` 下各子命令使用

pub mod output;
pub mod progress;
pub mod slurm;
