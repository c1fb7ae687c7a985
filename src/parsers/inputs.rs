//! # VASP 输入集合读写
//!
//! 从一个计算目录读取 INCAR/POSCAR/KPOINTS/POTCAR，写到另一个目录。
//! 存在且非空的 CONTCAR 优先于 POSCAR。VASP 4 格式的结构没有元素行，
//! 元素名从 POTCAR 的 TITEL 行补上，写出的 POSCAR 才有正确的元素行。
//!
//! ## 依赖关系
//! - 被 `scan/`, `commands/charge.rs`, `commands/nupdown.rs` 使用
//! - 使用 `parsers/incar.rs`, `parsers/poscar.rs`

use super::{incar, poscar};
use crate::error::{NebError, Result};
use crate::models::VaspInputs;
use crate::utils::output;
use std::fs;
use std::path::{Path, PathBuf};

/// 选择结构文件：非空 CONTCAR 优先，否则 POSCAR
pub fn structure_source(dir: &Path) -> PathBuf {
    let contcar = dir.join("CONTCAR");
    match fs::metadata(&contcar) {
        Ok(meta) if meta.is_file() && meta.len() > 0 => contcar,
        _ => dir.join("POSCAR"),
    }
}

/// 读取必须存在的文本文件
fn read_required(path: &Path) -> Result<String> {
    if !path.exists() {
        return Err(NebError::FileNotFound {
            path: path.display().to_string(),
        });
    }
    fs::read_to_string(path).map_err(|e| NebError::read(path, e))
}

/// 读取输入集合
pub fn load_inputs(dir: &Path) -> Result<VaspInputs> {
    if !dir.is_dir() {
        return Err(NebError::DirectoryNotFound {
            path: dir.display().to_string(),
        });
    }

    let structure_path = structure_source(dir);
    let mut poscar = poscar::parse_poscar_content(
        &read_required(&structure_path)?,
        &structure_path.display().to_string(),
    )?;

    let incar_path = dir.join("INCAR");
    let incar = incar::parse_incar_content(
        &read_required(&incar_path)?,
        &incar_path.display().to_string(),
    )?;

    let potcar = read_required(&dir.join("POTCAR"))?;
    if poscar::has_placeholder_species(&poscar) {
        let symbols = potcar_symbols(&potcar);
        if symbols.len() == poscar.species.len() {
            poscar.species = symbols;
        } else {
            output::print_warning(&format!(
                "{} has no element line and POTCAR lists {} elements for {} species",
                structure_path.display(),
                symbols.len(),
                poscar.species.len()
            ));
        }
    }

    Ok(VaspInputs {
        incar,
        poscar,
        kpoints: read_required(&dir.join("KPOINTS"))?,
        potcar,
    })
}

/// POTCAR 中各元素的符号，按文件顺序
///
/// 每段赝势有一行 `TITEL  = PAW_PBE Fe_pv 06Sep2000`；没有 TITEL 行时
/// 退回第一行。`Fe_pv`、`H.75` 这样的后缀被去掉。
pub fn potcar_symbols(potcar: &str) -> Vec<String> {
    let element = |label: &str| -> Option<String> {
        let symbol = label.split_whitespace().nth(1)?;
        symbol.split(['_', '.']).next().map(str::to_string)
    };

    let titles: Vec<String> = potcar
        .lines()
        .filter_map(|l| l.trim_start().strip_prefix("TITEL"))
        .filter_map(|rest| element(rest.trim_start().trim_start_matches('=')))
        .collect();
    if !titles.is_empty() {
        return titles;
    }
    potcar.lines().next().and_then(element).into_iter().collect()
}

/// 写出输入集合，任何一个文件写失败都直接返回错误
pub fn write_inputs(inputs: &VaspInputs, dir: &Path) -> Result<()> {
    incar::write_incar_file(&inputs.incar, &dir.join("INCAR"))?;
    write_text(&dir.join("KPOINTS"), &inputs.kpoints)?;
    poscar::write_poscar_file(&inputs.poscar, &dir.join("POSCAR"))?;
    write_text(&dir.join("POTCAR"), &inputs.potcar)?;
    Ok(())
}

fn write_text(path: &Path, content: &str) -> Result<()> {
    fs::write(path, content).map_err(|e| NebError::write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    const POSCAR: &str = "H2\n1.0\n5 0 0\n0 5 0\n0 0 5\nH\n2\nDirect\n0 0 0\n0.1 0 0\n";

    fn seed_dir(dir: &Path) {
        fs::write(dir.join("POSCAR"), POSCAR).unwrap();
        fs::write(dir.join("INCAR"), "SYSTEM = h2 0\nENCUT = 400\n").unwrap();
        fs::write(dir.join("KPOINTS"), "Gamma\n0\nG\n1 1 1\n").unwrap();
        fs::write(dir.join("POTCAR"), "PAW_PBE H 15Jun2001\n").unwrap();
    }

    #[test]
    fn test_contcar_preferred_when_nonempty() {
        let tmp = tempfile::tempdir().unwrap();
        seed_dir(tmp.path());
        assert_eq!(structure_source(tmp.path()), tmp.path().join("POSCAR"));

        fs::write(tmp.path().join("CONTCAR"), "").unwrap();
        assert_eq!(structure_source(tmp.path()), tmp.path().join("POSCAR"));

        fs::write(tmp.path().join("CONTCAR"), POSCAR.replace("H2", "relaxed")).unwrap();
        assert_eq!(structure_source(tmp.path()), tmp.path().join("CONTCAR"));
        let inputs = load_inputs(tmp.path()).unwrap();
        assert_eq!(inputs.poscar.comment, "relaxed");
    }

    #[test]
    fn test_potcar_symbols() {
        let potcar = "  PAW_PBE Fe_pv 06Sep2000\n 10.0\n   TITEL  = PAW_PBE Fe_pv 06Sep2000\n\
 End of Dataset\n  PAW_PBE O 08Apr2002\n   TITEL  = PAW_PBE O 08Apr2002\n End of Dataset\n";
        assert_eq!(potcar_symbols(potcar), vec!["Fe", "O"]);
        assert_eq!(potcar_symbols("PAW_PBE H.75 15Jun2001\n"), vec!["H"]);
        assert!(potcar_symbols("").is_empty());
    }

    #[test]
    fn test_vasp4_species_taken_from_potcar() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        seed_dir(src.path());
        fs::write(
            src.path().join("POSCAR"),
            "old\n1.0\n4 0 0\n0 4 0\n0 0 4\n1 1\nDirect\n0 0 0\n0.5 0.5 0.5\n",
        )
        .unwrap();
        fs::write(
            src.path().join("POTCAR"),
            "   TITEL  = PAW_PBE Ni_pv 06Sep2000\n   TITEL  = PAW_PBE O 08Apr2002\n",
        )
        .unwrap();

        let inputs = load_inputs(src.path()).unwrap();
        assert_eq!(inputs.poscar.species, vec!["Ni", "O"]);

        write_inputs(&inputs, dst.path()).unwrap();
        let written = poscar::parse_poscar_file(&dst.path().join("POSCAR")).unwrap();
        assert_eq!(written.species, vec!["Ni", "O"]);
    }

    #[test]
    fn test_missing_potcar_fails_fast() {
        let tmp = tempfile::tempdir().unwrap();
        seed_dir(tmp.path());
        fs::remove_file(tmp.path().join("POTCAR")).unwrap();
        assert!(matches!(
            load_inputs(tmp.path()),
            Err(NebError::FileNotFound { .. })
        ));
    }

    #[test]
    fn test_write_carries_kpoints_and_potcar_verbatim() {
        let src = tempfile::tempdir().unwrap();
        let dst = tempfile::tempdir().unwrap();
        seed_dir(src.path());

        let inputs = load_inputs(src.path()).unwrap();
        write_inputs(&inputs, dst.path()).unwrap();

        assert_eq!(
            fs::read_to_string(dst.path().join("KPOINTS")).unwrap(),
            "Gamma\n0\nG\n1 1 1\n"
        );
        assert_eq!(
            fs::read_to_string(dst.path().join("POTCAR")).unwrap(),
            "PAW_PBE H 15Jun2001\n"
        );
        let incar = incar::parse_incar_file(&dst.path().join("INCAR")).unwrap();
        assert_eq!(incar.get("SYSTEM"), Some("h2 0"));
    }
}
