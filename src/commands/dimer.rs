//! # dimer 命令实现
//!
//! dimer 计算结束后，用 VTST 的 `dimmins.pl` 沿鞍点两侧生成
//! `mins/min1`、`mins/min2`，再把两个目录改成普通的极小点弛豫。
//!
//! ## 依赖关系
//! - 使用 `cli/dimer.rs` 定义的参数
//! - 使用 `parsers/incar.rs`, `utils/output.rs`
//! - 通过 `std::process::Command` 调用 `dimmins.pl`

use crate::cli::dimer::DimerArgs;
use crate::error::{NebError, Result};
use crate::models::Incar;
use crate::parsers::incar;
use crate::utils::output;

use std::fs;
use std::io::ErrorKind;
use std::path::{Path, PathBuf};
use std::process::Command;

/// 两个极小点子目录
pub const MIN_DIRS: [&str; 2] = ["min1", "min2"];

const DIMMINS: &str = "dimmins.pl";

/// 执行 dimer 命令
pub fn execute(args: DimerArgs) -> Result<()> {
    output::print_header("Dimer Minima");

    if !args.folder.is_dir() {
        return Err(NebError::DirectoryNotFound {
            path: args.folder.display().to_string(),
        });
    }

    if !args.no_script {
        run_dimmins(&args.folder, args.vtst_dir.as_deref())?;
    }

    let wavecar = args.folder.join("WAVECAR");
    let mut prepared = 0;
    for name in MIN_DIRS {
        let dir = args.folder.join("mins").join(name);
        if !dir.is_dir() {
            output::print_warning(&format!("Missing {}, skipping", dir.display()));
            continue;
        }
        prepare_min_dir(&dir, &wavecar)?;
        output::print_success(&format!("Prepared {}", dir.display()));
        prepared += 1;
    }

    output::print_separator();
    output::print_done(&format!("{} of {} minima prepared", prepared, MIN_DIRS.len()));
    Ok(())
}

/// 在计算目录中运行 dimmins.pl
fn run_dimmins(folder: &Path, vtst_dir: Option<&Path>) -> Result<()> {
    let script: PathBuf = match vtst_dir {
        Some(dir) => dir.join(DIMMINS),
        None => PathBuf::from(DIMMINS),
    };
    output::print_info(&format!("Running {}", script.display()));

    let out = Command::new(&script)
        .current_dir(folder)
        .output()
        .map_err(|e| match e.kind() {
            ErrorKind::NotFound => NebError::CommandNotFound {
                command: script.display().to_string(),
            },
            _ => NebError::CommandFailed {
                command: script.display().to_string(),
                stderr: e.to_string(),
            },
        })?;

    if !out.status.success() {
        return Err(NebError::CommandFailed {
            command: script.display().to_string(),
            stderr: String::from_utf8_lossy(&out.stderr).to_string(),
        });
    }
    Ok(())
}

/// 复制 WAVECAR 并把 INCAR 改为极小点弛豫
pub fn prepare_min_dir(dir: &Path, wavecar: &Path) -> Result<()> {
    if wavecar.is_file() {
        let dest = dir.join("WAVECAR");
        fs::copy(wavecar, &dest).map_err(|e| NebError::write(&dest, e))?;
    } else {
        output::print_warning(&format!("No WAVECAR at {}", wavecar.display()));
    }

    let incar_path = dir.join("INCAR");
    let mut params = incar::parse_incar_file(&incar_path)?;
    relax_settings(&mut params);
    incar::write_incar_file(&params, &incar_path)
}

/// 极小点弛豫的 INCAR 改动
pub fn relax_settings(params: &mut Incar) {
    params.set("EDIFF", "1E-05");
    params.set("EDIFFG", "-0.05");
    params.remove("ICHAIN");
    params.set_int("IOPT", 7);
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_relax_settings() {
        let mut params = Incar::new();
        params.set("ICHAIN", "2");
        params.set("IOPT", "2");
        params.set("EDIFF", "1E-07");
        relax_settings(&mut params);

        assert_eq!(params.get_float("EDIFF"), Some(1e-5));
        assert_eq!(params.get_float("EDIFFG"), Some(-5e-2));
        assert_eq!(params.get_int("IOPT"), Some(7));
        assert!(!params.contains("ICHAIN"));
    }

    #[test]
    fn test_prepares_existing_minima_only() {
        let tmp = tempfile::tempdir().unwrap();
        let min1 = tmp.path().join("mins").join("min1");
        fs::create_dir_all(&min1).unwrap();
        fs::write(min1.join("INCAR"), "ICHAIN = 2\nIBRION = 3\n").unwrap();
        fs::write(tmp.path().join("WAVECAR"), [7u8; 8]).unwrap();

        execute(DimerArgs {
            folder: tmp.path().to_path_buf(),
            vtst_dir: None,
            no_script: true,
        })
        .unwrap();

        let params = incar::parse_incar_file(&min1.join("INCAR")).unwrap();
        assert_eq!(params.get_int("IOPT"), Some(7));
        assert_eq!(params.get_int("IBRION"), Some(3));
        assert!(!params.contains("ICHAIN"));
        assert_eq!(fs::read(min1.join("WAVECAR")).unwrap(), vec![7u8; 8]);
        assert!(!tmp.path().join("mins").join("min2").exists());
    }

    #[test]
    fn test_missing_script_reported() {
        let tmp = tempfile::tempdir().unwrap();
        let result = run_dimmins(tmp.path(), Some(&tmp.path().join("no-vtst")));
        assert!(matches!(result, Err(NebError::CommandNotFound { .. })));
    }
}
