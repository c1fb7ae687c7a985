//! # nebtools - VASP NEB/dimer 工作流工具箱
//!
//! 把零散的 VASP 辅助脚本整合为单一可执行文件。
//!
//! ## 子命令
//! - `charge`    - 电荷态扫描目录
//! - `nupdown`   - 自旋态扫描目录
//! - `chgsplit`  - CHGCAR 轴向平面平均 / 导数
//! - `constrain` - 扩散原子的平面约束
//! - `seed`      - MAGMOM / DFT+U 默认值
//! - `dimer`     - dimer 之后的极小点弛豫
//! - `submit`    - 生成并提交 sbatch 脚本
//! - `vib`       - 振动计算的有限位移目录
//! - `gin`       - GULP 输入文件
//!
//! ## 依赖关系
//! ```text
//! main.rs
//!   ├── cli/          (命令行参数定义)
//!   ├── commands/     (命令执行逻辑)
//!   │     ├── scan/        (扫描目录生成)
//!   │     ├── field/       (体数据约化)
//!   │     ├── constraints/ (平面约束策略)
//!   │     ├── batch/       (运行目录收集)
//!   │     ├── parsers/     (VASP 文件读写)
//!   │     └── models/      (数据模型)
//!   ├── config.rs     (静态元素表与 INCAR 分组)
//!   ├── utils/        (输出、进度条、Slurm)
//!   └── error.rs      (错误处理)
//! ```

mod batch;
mod cli;
mod commands;
mod config;
mod constraints;
mod error;
mod field;
mod models;
mod parsers;
mod scan;
mod utils;

use clap::Parser;
use cli::Cli;

fn main() {
    #[cfg(windows)]
    colored::control::set_virtual_terminal(true).ok();

    let cli = Cli::parse();

    if let Err(e) = commands::run(cli.command) {
        utils::output::print_error(&format!("{}", e));
        std::process::exit(1);
    }
}
