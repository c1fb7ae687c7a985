//! # submit 命令实现
//!
//! 为运行目录写 sbatch 脚本，可选地逐个提交。
//!
//! ## 功能
//! - 收集包含 INCAR 的运行目录（glob 过滤，可递归）
//! - 生成 `submit.sbatch`，已有脚本默认不覆盖
//! - `--submit` 时调用 sbatch，否则只生成
//!
//! ## 依赖关系
//! - 使用 `cli/submit.rs` 定义的参数
//! - 使用 `batch/collector.rs`, `utils/slurm.rs`, `utils/output.rs`, `utils/progress.rs`

use crate::batch::RunDirCollector;
use crate::cli::submit::SubmitArgs;
use crate::error::{NebError, Result};
use crate::utils::slurm::{generate_sbatch_script, SlurmConfig};
use crate::utils::{output, progress};

use std::fs;
use std::path::{Path, PathBuf};
use std::process::Command;

/// 脚本文件名
pub const SCRIPT_NAME: &str = "submit.sbatch";

/// 执行 submit 命令
pub fn execute(args: SubmitArgs) -> Result<()> {
    output::print_header("Batch Job Submission");

    let dirs = RunDirCollector::new(&args.root)
        .with_pattern(&args.pattern)?
        .recursive(args.recursive)
        .collect()?;

    if dirs.is_empty() {
        output::print_warning(&format!(
            "No run directories (with INCAR) found under {}",
            args.root.display()
        ));
        return Ok(());
    }
    output::print_info(&format!("Found {} run directories", dirs.len()));

    let modules: Vec<String> = args
        .modules
        .split(',')
        .map(|s| s.trim().to_string())
        .filter(|s| !s.is_empty())
        .collect();

    let mut written = 0;
    let mut submitted = 0;
    let mut messages = Vec::new();
    let pb = progress::create_progress_bar(dirs.len() as u64, "Writing scripts");

    for dir in &dirs {
        let config = SlurmConfig {
            job_name: args.job_name.clone().unwrap_or_else(|| job_name_for(dir)),
            time_limit: args.time.clone(),
            nodes: args.nodes,
            ntasks_per_node: args.ntasks_per_node,
            logname: args.logname.clone(),
            qos: args.qos.clone(),
            modules: modules.clone(),
        };

        match write_script(dir, &config, &args.vasp_exec, args.overwrite)? {
            Some(_) => written += 1,
            None => messages.push(format!("Script exists:  {}", dir.display())),
        }
        pb.inc(1);
    }
    pb.finish_and_clear();

    for msg in &messages {
        output::print_skip(msg);
    }

    for dir in &dirs {
        if !args.submit {
            output::print_dry(&format!("{}", dir.join(SCRIPT_NAME).display()));
            continue;
        }
        match sbatch(dir) {
            Ok(stdout) => {
                output::print_success(&format!("Submitted: {} - {}", dir.display(), stdout));
                submitted += 1;
            }
            Err(e) => output::print_error(&format!("{}", e)),
        }
    }

    output::print_separator();
    output::print_done(&format!(
        "{} directories, {} scripts written, {} jobs submitted",
        dirs.len(),
        written,
        submitted
    ));

    Ok(())
}

/// 默认作业名：目录名
fn job_name_for(dir: &Path) -> String {
    dir.file_name()
        .and_then(|n| n.to_str())
        .filter(|n| !n.is_empty() && *n != ".")
        .unwrap_or("neb")
        .to_string()
}

/// 写出脚本，已存在且不覆盖时返回 None
pub fn write_script(
    dir: &Path,
    config: &SlurmConfig,
    vasp_exec: &str,
    overwrite: bool,
) -> Result<Option<PathBuf>> {
    let path = dir.join(SCRIPT_NAME);
    if path.exists() && !overwrite {
        return Ok(None);
    }

    let content = generate_sbatch_script(config, dir, &config.mpirun_line(vasp_exec));
    fs::write(&path, content).map_err(|e| NebError::write(&path, e))?;
    Ok(Some(path))
}

/// 在运行目录中调用 sbatch，返回其标准输出
fn sbatch(dir: &Path) -> Result<String> {
    let out = Command::new("sbatch")
        .arg(SCRIPT_NAME)
        .current_dir(dir)
        .output()
        .map_err(|e| NebError::CommandFailed {
            command: format!("sbatch in {}", dir.display()),
            stderr: e.to_string(),
        })?;

    if !out.status.success() {
        return Err(NebError::CommandFailed {
            command: format!("sbatch in {}", dir.display()),
            stderr: String::from_utf8_lossy(&out.stderr).trim().to_string(),
        });
    }
    Ok(String::from_utf8_lossy(&out.stdout).trim().to_string())
}
