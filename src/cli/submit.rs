//! # submit 子命令 CLI 定义
//!
//! 为运行目录生成 sbatch 脚本，可选提交到 Slurm
//!
//! ## 依赖关系
//! - 被 `cli/mod.rs` 使用
//! - 参数传递给 `commands/submit.rs`

use clap::Args;
use std::path::PathBuf;

/// submit 子命令参数
#[derive(Args, Debug)]
pub struct SubmitArgs {
    /// Root directory holding run directories (directories with an INCAR)
    #[arg(default_value = ".")]
    pub root: PathBuf,

    /// Glob on run directory names, comma-separated (e.g. 'n*,0')
    #[arg(short, long, default_value = "")]
    pub pattern: String,

    /// Search subdirectories recursively
    #[arg(short, long, default_value_t = false)]
    pub recursive: bool,

    // ─────────────────────────────────────────────────────────────
    // Slurm options
    // ─────────────────────────────────────────────────────────────
    /// Job name (default: run directory name)
    #[arg(short = 'J', long)]
    pub job_name: Option<String>,

    /// Time limit (e.g., '24:00:00')
    #[arg(long, default_value = "24:00:00")]
    pub time: String,

    /// Number of nodes
    #[arg(short = 'N', long, default_value_t = 1)]
    pub nodes: u32,

    /// MPI tasks per node
    #[arg(long, default_value_t = 12)]
    pub ntasks_per_node: u32,

    /// Log file prefix
    #[arg(long, default_value = "vasp")]
    pub logname: String,

    /// Quality of service
    #[arg(long, default_value = "normal")]
    pub qos: String,

    /// Module list (comma-separated)
    #[arg(long, default_value = "")]
    pub modules: String,

    /// VASP executable
    #[arg(long, env = "NEBTOOLS_VASP_EXEC", default_value = "vasp_std")]
    pub vasp_exec: String,

    // ─────────────────────────────────────────────────────────────
    // Execution control
    // ─────────────────────────────────────────────────────────────
    /// Replace existing submit.sbatch files
    #[arg(long, default_value_t = false)]
    pub overwrite: bool,

    /// Submit jobs with sbatch after writing the scripts
    #[arg(long, default_value_t = false)]
    pub submit: bool,
}
