//! # nupdown 命令实现
//!
//! 为一组 NUPDOWN 值生成运行目录，放在根目录的 `nupdown/` 下。
//!
//! ## 依赖关系
//! - 使用 `cli/nupdown.rs` 定义的参数
//! - 使用 `scan/`, `parsers/inputs.rs`

use crate::cli::nupdown::NupdownArgs;
use crate::error::{NebError, Result};
use crate::parsers::inputs;
use crate::scan::{ScanPlan, ScanRange};
use crate::utils::output;

use std::fs;

/// 所有自旋态目录的父目录名
pub const NUPDOWN_DIR: &str = "nupdown";

/// 执行 nupdown 命令
pub fn execute(args: NupdownArgs) -> Result<()> {
    output::print_header("Spin State Scan");

    let base = inputs::load_inputs(&args.folder)?;
    let range = match args.end {
        Some(end) => ScanRange::ordered(args.start, end),
        None => ScanRange::around(args.start, args.radius),
    };
    output::print_info(&format!(
        "NUPDOWN from {} to {} ({} runs)",
        range.start,
        range.end,
        range.len()
    ));

    if base.incar.get_int("ISPIN") != Some(2) {
        output::print_warning("ISPIN is not 2 in the base INCAR, NUPDOWN has no effect");
    }

    let root = args.root.join(NUPDOWN_DIR);
    fs::create_dir_all(&root).map_err(|e| NebError::write(&root, e))?;

    let base_system = base.incar.get("SYSTEM").unwrap_or("").to_string();
    let carry = if args.wavecar {
        vec![args.folder.join("WAVECAR"), args.folder.join("CHGCAR")]
    } else {
        Vec::new()
    };

    let report = ScanPlan::new(&base, &root, range)
        .with_carry(carry)
        .run(|value, _label, incar| {
            incar.set_int("NUPDOWN", value);
            if !args.keep_system {
                incar.set("SYSTEM", spin_system(&base_system, value));
            }
        })?;

    output::print_separator();
    output::print_done(&format!(
        "{} of {} directories created, {} skipped",
        report.created.len(),
        report.total(),
        report.skipped.len()
    ));

    Ok(())
}

/// SYSTEM 标签前加上 `abs(i)`
pub fn spin_system(base: &str, value: i64) -> String {
    let spin = value.unsigned_abs().to_string();
    if base.trim().is_empty() {
        spin
    } else {
        format!("{} {}", spin, base.trim())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::incar::parse_incar_file;
    use std::path::Path;

    #[test]
    fn test_spin_system() {
        assert_eq!(spin_system("Fe3O4 bulk", -2), "2 Fe3O4 bulk");
        assert_eq!(spin_system("", 3), "3");
    }

    fn seed_calculation(dir: &Path) {
        fs::write(dir.join("INCAR"), "SYSTEM = magnetite\nISPIN = 2\n").unwrap();
        fs::write(
            dir.join("POSCAR"),
            "Fe\n1.0\n2.87 0 0\n0 2.87 0\n0 0 2.87\nFe\n1\nDirect\n0 0 0\n",
        )
        .unwrap();
        fs::write(dir.join("KPOINTS"), "auto\n0\nGamma\n8 8 8\n").unwrap();
        fs::write(dir.join("POTCAR"), "PAW_PBE Fe 06Sep2000\n").unwrap();
        fs::write(dir.join("WAVECAR"), [0u8, 1, 2, 3]).unwrap();
    }

    #[test]
    fn test_radius_scan_under_nupdown() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        seed_calculation(src.path());

        execute(NupdownArgs {
            start: 0,
            end: None,
            radius: 1,
            folder: src.path().to_path_buf(),
            keep_system: false,
            wavecar: true,
            root: out.path().to_path_buf(),
        })
        .unwrap();

        let base = out.path().join(NUPDOWN_DIR);
        for (label, value) in [("n1", -1), ("0", 0), ("1", 1)] {
            let dir = base.join(label);
            let incar = parse_incar_file(&dir.join("INCAR")).unwrap();
            assert_eq!(incar.get_int("NUPDOWN"), Some(value));
            assert_eq!(fs::read(dir.join("WAVECAR")).unwrap(), vec![0u8, 1, 2, 3]);
            // CHGCAR 不存在时不复制
            assert!(!dir.join("CHGCAR").exists());
        }
        let incar = parse_incar_file(&base.join("n1").join("INCAR")).unwrap();
        assert_eq!(incar.get("SYSTEM"), Some("1 magnetite"));
    }

    #[test]
    fn test_reversed_bounds_keep_system() {
        let src = tempfile::tempdir().unwrap();
        let out = tempfile::tempdir().unwrap();
        seed_calculation(src.path());

        execute(NupdownArgs {
            start: 4,
            end: Some(3),
            radius: 4,
            folder: src.path().to_path_buf(),
            keep_system: true,
            wavecar: false,
            root: out.path().to_path_buf(),
        })
        .unwrap();

        let base = out.path().join(NUPDOWN_DIR);
        assert!(base.join("3").is_dir());
        assert!(base.join("4").is_dir());
        assert!(!base.join("3").join("WAVECAR").exists());
        let incar = parse_incar_file(&base.join("4").join("INCAR")).unwrap();
        assert_eq!(incar.get("SYSTEM"), Some("magnetite"));
    }
}
