//! # seed 命令实现
//!
//! 按 POSCAR 中的元素顺序，从静态表写入 MAGMOM 和 DFT+U 参数，
//! 然后按分组格式重写 INCAR。
//!
//! ## 依赖关系
//! - 使用 `cli/seed.rs` 定义的参数
//! - 使用 `config.rs` 的元素默认值
//! - 使用 `parsers/incar.rs`, `parsers/poscar.rs`, `parsers/inputs.rs`

use crate::cli::seed::SeedArgs;
use crate::config::{species_default, SpeciesTag};
use crate::error::{NebError, Result};
use crate::models::{Incar, Poscar};
use crate::parsers::{incar, inputs, poscar};
use crate::utils::output;

/// 执行 seed 命令
pub fn execute(args: SeedArgs) -> Result<()> {
    output::print_header("Species Defaults");

    let incar_path = args.folder.join("INCAR");
    if !incar_path.is_file() {
        return Err(NebError::FileNotFound {
            path: incar_path.display().to_string(),
        });
    }
    let structure_path = inputs::structure_source(&args.folder);
    let structure = poscar::parse_poscar_file(&structure_path)?;
    let mut params = incar::parse_incar_file(&incar_path)?;

    output::print_info(&format!(
        "Species from {}: {}",
        structure_path.display(),
        structure.species.join(" ")
    ));

    apply_species_defaults(&mut params, &structure, !args.no_ldau);

    if args.dry_run {
        println!("{}", incar::to_incar_string(&params));
        return Ok(());
    }

    incar::write_incar_file(&params, &incar_path)?;
    output::print_written(&incar_path);
    Ok(())
}

/// 写入 MAGMOM；`with_ldau` 时再写入 LDAUL/LDAUU/LDAUJ/LDAU
///
/// 没有任何元素带非零 U 时不写 DFT+U 标签。返回是否写了 DFT+U。
pub fn apply_species_defaults(params: &mut Incar, structure: &Poscar, with_ldau: bool) -> bool {
    let magmom: Vec<String> = structure
        .species
        .iter()
        .zip(structure.counts.iter())
        .map(|(el, n)| format!("{}*{}", n, species_default(SpeciesTag::Magmom, el)))
        .collect();
    params.set(SpeciesTag::Magmom.name(), magmom.join(" "));

    if !with_ldau {
        return false;
    }

    let per_species = |tag: SpeciesTag| -> Vec<f64> {
        structure
            .species
            .iter()
            .map(|el| species_default(tag, el))
            .collect()
    };
    let ldauu = per_species(SpeciesTag::Ldauu);
    if ldauu.iter().all(|u| *u == 0.0) {
        output::print_info("No species with a Hubbard U, LDAU tags left unchanged");
        return false;
    }
    let ldaul = per_species(SpeciesTag::Ldaul);

    params.set_bool("LDAU", true);
    params.set(SpeciesTag::Ldaul.name(), join_values(&ldaul));
    params.set(SpeciesTag::Ldauu.name(), join_values(&ldauu));
    params.set("LDAUJ", join_values(&vec![0.0; ldauu.len()]));
    true
}

fn join_values(values: &[f64]) -> String {
    values
        .iter()
        .map(|v| v.to_string())
        .collect::<Vec<_>>()
        .join(" ")
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::models::Lattice;
    use std::fs;

    fn structure(species: &[&str], counts: &[usize]) -> Poscar {
        let n: usize = counts.iter().sum();
        Poscar::new(
            "test",
            Lattice::from_vectors([[5.0, 0.0, 0.0], [0.0, 5.0, 0.0], [0.0, 0.0, 5.0]]),
            species.iter().map(|s| s.to_string()).collect(),
            counts.to_vec(),
            vec![[0.0; 3]; n],
        )
    }

    #[test]
    fn test_fe_oxide() {
        let mut params = Incar::new();
        assert!(apply_species_defaults(&mut params, &structure(&["Fe", "O"], &[2, 3]), true));

        assert_eq!(params.get("MAGMOM"), Some("2*4 3*0"));
        assert_eq!(params.get("LDAUL"), Some("2 -1"));
        assert_eq!(params.get("LDAUU"), Some("4.09 0"));
        assert_eq!(params.get("LDAUJ"), Some("0 0"));
        assert_eq!(params.get("LDAU"), Some(".TRUE."));
    }

    #[test]
    fn test_no_u_species() {
        let mut params = Incar::new();
        assert!(!apply_species_defaults(&mut params, &structure(&["Zn", "O"], &[1, 1]), true));
        assert_eq!(params.get("MAGMOM"), Some("1*0 1*0"));
        assert!(!params.contains("LDAU"));
    }

    #[test]
    fn test_no_ldau_flag() {
        let mut params = Incar::new();
        apply_species_defaults(&mut params, &structure(&["Ni"], &[4]), false);
        assert_eq!(params.get("MAGMOM"), Some("4*2"));
        assert!(!params.contains("LDAUU"));
    }

    #[test]
    fn test_rewrites_incar_grouped() {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("INCAR"), "ENCUT = 520\nISPIN = 2\n").unwrap();
        fs::write(
            tmp.path().join("POSCAR"),
            "CoO\n1.0\n4.2 0 0\n0 4.2 0\n0 0 4.2\nCo O\n1 1\nDirect\n0 0 0\n0.5 0.5 0.5\n",
        )
        .unwrap();

        execute(SeedArgs {
            folder: tmp.path().to_path_buf(),
            no_ldau: false,
            dry_run: false,
        })
        .unwrap();

        let params = incar::parse_incar_file(&tmp.path().join("INCAR")).unwrap();
        assert_eq!(params.get("MAGMOM"), Some("1*3 1*0"));
        assert_eq!(params.get("LDAUU"), Some("4.26 0"));
        assert_eq!(params.get_int("ENCUT"), Some(520));
    }
}
