//! # Slurm 脚本生成工具
//!
//! 生成 NEB/VASP 运行目录使用的 sbatch 脚本。
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 使用
//! - 无外部模块依赖

use std::path::Path;

/// Slurm 作业配置
#[derive(Debug, Clone)]
pub struct SlurmConfig {
    pub job_name: String,
    /// 墙钟时间，如 `24:00:00`
    pub time_limit: String,
    pub nodes: u32,
    pub ntasks_per_node: u32,
    /// 日志文件前缀，生成 `<logname>-%j.out/.err`
    pub logname: String,
    pub qos: String,
    pub modules: Vec<String>,
}

impl Default for SlurmConfig {
    fn default() -> Self {
        SlurmConfig {
            job_name: "neb".to_string(),
            time_limit: "24:00:00".to_string(),
            nodes: 1,
            ntasks_per_node: 12,
            logname: "vasp".to_string(),
            qos: "normal".to_string(),
            modules: vec![],
        }
    }
}

impl SlurmConfig {
    /// MPI 进程总数
    pub fn total_tasks(&self) -> u32 {
        self.nodes * self.ntasks_per_node
    }

    /// `mpirun -np N <exe>`
    pub fn mpirun_line(&self, vasp_exec: &str) -> String {
        format!("mpirun -np {} {}", self.total_tasks(), vasp_exec)
    }
}

/// 生成 sbatch 脚本内容
pub fn generate_sbatch_script(config: &SlurmConfig, workdir: &Path, exec_cmd: &str) -> String {
    let module_loads = config
        .modules
        .iter()
        .map(|m| format!("module load {}", m))
        .collect::<Vec<_>>()
        .join("\n");

    format!(
        r#"#!/bin/bash
#SBATCH -J {}
#SBATCH --time={}
#SBATCH -N {}
#SBATCH --ntasks-per-node {}
#SBATCH -o {}-%j.out
#SBATCH -e {}-%j.err
#SBATCH --qos={}

{}

cd "{}"
echo "Running: {}"
{}
"#,
        config.job_name,
        config.time_limit,
        config.nodes,
        config.ntasks_per_node,
        config.logname,
        config.logname,
        config.qos,
        module_loads,
        workdir.display(),
        exec_cmd,
        exec_cmd,
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_script_header() {
        let config = SlurmConfig {
            job_name: "neb-01".into(),
            nodes: 2,
            modules: vec!["intel/2020".into(), "openmpi/4.1".into()],
            ..SlurmConfig::default()
        };
        let exec = config.mpirun_line("vasp_std");
        assert_eq!(exec, "mpirun -np 24 vasp_std");

        let script = generate_sbatch_script(&config, Path::new("/scratch/neb"), &exec);
        assert!(script.starts_with("#!/bin/bash\n#SBATCH -J neb-01\n"));
        assert!(script.contains("#SBATCH --time=24:00:00"));
        assert!(script.contains("#SBATCH -N 2"));
        assert!(script.contains("#SBATCH --ntasks-per-node 12"));
        assert!(script.contains("#SBATCH -o vasp-%j.out"));
        assert!(script.contains("#SBATCH --qos=normal"));
        assert!(script.contains("module load intel/2020\nmodule load openmpi/4.1"));
        assert!(script.contains("cd \"/scratch/neb\""));
        assert!(script.trim_end().ends_with("mpirun -np 24 vasp_std"));
    }
}
