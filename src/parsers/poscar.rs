//! # POSCAR / CONTCAR 读写
//!
//! 读入时支持 VASP 4（无元素行）和 VASP 5 格式、负缩放因子（表示体积）、
//! 选择性动力学以及 Direct/Cartesian 坐标。内部统一保存为笛卡尔坐标。
//! 写出时总是 VASP 5 + Direct 坐标，保留注释、元素顺序和 T/F 标记。
//!
//! 文件头依次为：注释、缩放因子、三行晶格、元素行（可选）、原子数、
//! `Selective dynamics`（可选）、坐标类型，之后每行一个原子。
//!
//! ## 依赖关系
//! - 被 `parsers/inputs.rs`, `parsers/chgcar.rs`, `constraints/midpoint.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{NebError, Result};
use crate::models::{Lattice, Poscar};
use std::fs;
use std::path::Path;

/// 解析 POSCAR/CONTCAR 文件
pub fn parse_poscar_file(path: &Path) -> Result<Poscar> {
    let content = fs::read_to_string(path).map_err(|e| NebError::read(path, e))?;
    let lines: Vec<&str> = content.lines().collect();
    parse_poscar_lines(&lines, &path.display().to_string()).map(|(poscar, _)| poscar)
}

/// 从字符串内容解析 POSCAR 格式
pub fn parse_poscar_content(content: &str, source: &str) -> Result<Poscar> {
    let lines: Vec<&str> = content.lines().collect();
    parse_poscar_lines(&lines, source).map(|(poscar, _)| poscar)
}

/// 从行切片解析 POSCAR 块，返回结构以及块之后的下一行下标
///
/// CHGCAR 的文件头也是这个格式，所以单独暴露出来。
pub fn parse_poscar_lines(lines: &[&str], source: &str) -> Result<(Poscar, usize)> {
    let err = |reason: String| NebError::ParseError {
        format: "poscar".to_string(),
        path: source.to_string(),
        reason,
    };

    if lines.len() < 8 {
        return Err(err("File too short".to_string()));
    }

    let comment = lines[0].trim().to_string();

    // 缩放因子，负值表示目标体积
    let scale: f64 = lines[1]
        .split_whitespace()
        .next()
        .and_then(|s| s.parse().ok())
        .ok_or_else(|| err(format!("Invalid scaling factor '{}'", lines[1].trim())))?;

    let mut matrix = [[0.0; 3]; 3];
    for i in 0..3 {
        let parts: Vec<f64> = lines[2 + i]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        if parts.len() < 3 {
            return Err(err(format!("Invalid lattice vector at line {}", 3 + i)));
        }
        matrix[i] = [parts[0], parts[1], parts[2]];
    }

    // 负缩放因子表示目标体积
    let scale = if scale < 0.0 {
        let raw_volume = Lattice::from_vectors(matrix).volume().abs();
        (-scale / raw_volume).cbrt()
    } else {
        scale
    };
    for row in matrix.iter_mut() {
        for x in row.iter_mut() {
            *x *= scale;
        }
    }
    let lattice = Lattice::from_vectors(matrix);

    // 第 6 行若是数字则为 VASP 4 格式
    let line5_parts: Vec<&str> = lines[5].split_whitespace().collect();
    if line5_parts.is_empty() {
        return Err(err("Missing species/count line".to_string()));
    }
    let (species, counts, mut line_idx) = if line5_parts[0].parse::<usize>().is_ok() {
        // 没有元素行，用 X1, X2 占位
        let counts: Vec<usize> = line5_parts.iter().filter_map(|s| s.parse().ok()).collect();
        let species = placeholder_species(counts.len());
        (species, counts, 6)
    } else {
        let species: Vec<String> = line5_parts
            .iter()
            // POTCAR 风格的 "Fe_pv" 或 "Fe/abc" 只保留元素名
            .map(|s| s.split(['_', '/']).next().unwrap_or(s).to_string())
            .collect();
        let counts: Vec<usize> = lines[6]
            .split_whitespace()
            .filter_map(|s| s.parse().ok())
            .collect();
        (species, counts, 7)
    };

    if species.len() != counts.len() {
        return Err(err(format!(
            "{} species but {} counts",
            species.len(),
            counts.len()
        )));
    }

    // 可选的 Selective dynamics 行，只看首字母
    let selective_dynamics = lines
        .get(line_idx)
        .map(|l| l.trim().to_lowercase().starts_with('s'))
        .unwrap_or(false);
    if selective_dynamics {
        line_idx += 1;
    }

    // C/K 为笛卡尔坐标，其余按分数坐标处理
    let coord_type = lines
        .get(line_idx)
        .ok_or_else(|| err("Missing coordinate type line".to_string()))?
        .trim()
        .to_lowercase();
    let is_cartesian = coord_type.starts_with('c') || coord_type.starts_with('k');
    line_idx += 1;

    let total: usize = counts.iter().sum();
    let mut positions = Vec::with_capacity(total);
    let mut flags = Vec::with_capacity(if selective_dynamics { total } else { 0 });

    for n in 0..total {
        let line = lines
            .get(line_idx)
            .ok_or_else(|| err(format!("Expected {} atoms, found {}", total, n)))?;
        let parts: Vec<&str> = line.split_whitespace().collect();
        let xyz: Vec<f64> = parts
            .iter()
            .take(3)
            .filter_map(|s| s.parse().ok())
            .collect();
        if xyz.len() < 3 {
            return Err(err(format!("Invalid position at line {}", line_idx + 1)));
        }

        let position = if is_cartesian {
            [xyz[0] * scale, xyz[1] * scale, xyz[2] * scale]
        } else {
            lattice.to_cartesian([xyz[0], xyz[1], xyz[2]])
        };
        positions.push(position);

        if selective_dynamics {
            let flag = |i: usize| {
                parts
                    .get(3 + i)
                    .map(|s| !s.to_uppercase().starts_with('F'))
                    .unwrap_or(true)
            };
            flags.push([flag(0), flag(1), flag(2)]);
        }
        line_idx += 1;
    }

    let mut poscar = Poscar::new(comment, lattice, species, counts, positions);
    if selective_dynamics {
        poscar.selective = Some(flags);
    }

    Ok((poscar, line_idx))
}

/// VASP 4 文件没有元素行时使用的占位名 X1, X2, ...
pub fn placeholder_species(n: usize) -> Vec<String> {
    (1..=n).map(|i| format!("X{}", i)).collect()
}

/// 元素名是否全是占位名
pub fn has_placeholder_species(poscar: &Poscar) -> bool {
    poscar.species == placeholder_species(poscar.species.len())
}

/// 将结构转换为 POSCAR 格式字符串（Direct 坐标）
pub fn to_poscar_string(poscar: &Poscar) -> String {
    let mut result = String::new();

    result.push_str(&format!("{}\n", poscar.comment));

    result.push_str("1.0\n");

    for row in &poscar.lattice.matrix {
        result.push_str(&format!(
            "  {:16.10}  {:16.10}  {:16.10}\n",
            row[0], row[1], row[2]
        ));
    }

    result.push_str(&format!("   {}\n", poscar.species.join("   ")));
    let counts: Vec<String> = poscar.counts.iter().map(|c| c.to_string()).collect();
    result.push_str(&format!("   {}\n", counts.join("   ")));

    if poscar.selective.is_some() {
        result.push_str("Selective dynamics\n");
    }
    result.push_str("Direct\n");

    let tf = |b: bool| if b { "T" } else { "F" };
    for (i, frac) in poscar.fractional_positions().iter().enumerate() {
        result.push_str(&format!(
            "  {:16.10}  {:16.10}  {:16.10}",
            frac[0], frac[1], frac[2]
        ));
        if let Some(flags) = poscar.selective.as_ref().and_then(|f| f.get(i)) {
            result.push_str(&format!(" {} {} {}", tf(flags[0]), tf(flags[1]), tf(flags[2])));
        }
        result.push('\n');
    }

    result
}

/// 写出 POSCAR 文件
pub fn write_poscar_file(poscar: &Poscar, path: &Path) -> Result<()> {
    fs::write(path, to_poscar_string(poscar)).map_err(|e| NebError::write(path, e))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_parse_rocksalt_vasp5() {
        let content = "MgO rocksalt\n1.0\n4.21 0 0\n0 4.21 0\n0 0 4.21\nMg O\n2 2\nDirect\n\
0 0 0\n0.5 0.5 0\n0.5 0 0\n0 0.5 0\n";
        let poscar = parse_poscar_content(content, "MgO").unwrap();
        assert_eq!(poscar.comment, "MgO rocksalt");
        assert_eq!(poscar.counts, vec![2, 2]);
        assert_eq!(poscar.species, vec!["Mg", "O"]);

        // (0.5, 0.5, 0) -> (2.105, 2.105, 0) Å
        assert!((poscar.positions[1][0] - 2.105).abs() < 1e-10);
        assert!((poscar.positions[3][1] - 2.105).abs() < 1e-10);
        assert_eq!(poscar.positions[2][1], 0.0);
    }

    #[test]
    fn test_cartesian_coordinates_are_scaled() {
        let content = "H2 in a box\n1.5\n4 0 0\n0 4 0\n0 0 4\nH\n2\nCartesian\n\
1.0 1.0 1.0\n1.0 1.0 1.5\n";
        let poscar = parse_poscar_content(content, "H2").unwrap();
        let [a, _, c] = poscar.lattice.lengths();
        assert!((a - 6.0).abs() < 1e-10);
        assert!((c - 6.0).abs() < 1e-10);
        assert!((poscar.positions[1][2] - 2.25).abs() < 1e-10);
    }

    #[test]
    fn test_negative_scale_is_volume() {
        let content = "volume\n-27.0\n1 0 0\n0 1 0\n0 0 1\nAr\n1\nDirect\n0.5 0.5 0.5\n";
        let poscar = parse_poscar_content(content, "Ar").unwrap();
        assert!((poscar.lattice.volume().abs() - 27.0).abs() < 1e-8);
        assert!((poscar.positions[0][0] - 1.5).abs() < 1e-10);
    }

    #[test]
    fn test_species_line_missing_gives_placeholders() {
        let content = "no element names\n1.0\n5 0 0\n0 5 0\n0 0 5\n2 1\nD\n\
0 0 0\n0.25 0.25 0.25\n0.5 0 0\n";
        let poscar = parse_poscar_content(content, "vasp4").unwrap();
        assert_eq!(poscar.species, vec!["X1", "X2"]);
        assert!(has_placeholder_species(&poscar));
        assert_eq!(poscar.counts, vec![2, 1]);
        assert_eq!(poscar.num_atoms(), 3);
    }

    #[test]
    fn test_slab_with_fixed_layer_round_trip() {
        let content = "Pt(111) slab + O\n1.0\n2.77 0 0\n1.385 2.399 0\n0 0 18.0\n\
Pt_pv O\n2 1\nsel\nDirect\n\
0 0 0.10 F F F\n0.333 0.333 0.22 T T T\n0.667 0.667 0.33 F F T\n";
        let poscar = parse_poscar_content(content, "slab").unwrap();
        assert_eq!(poscar.species, vec!["Pt", "O"]);
        let flags = poscar.selective.as_ref().unwrap();
        assert_eq!(flags[0], [false; 3]);
        assert_eq!(flags[2], [false, false, true]);

        let text = to_poscar_string(&poscar);
        assert!(text.contains("Selective dynamics"));
        let again = parse_poscar_content(&text, "slab").unwrap();
        assert_eq!(again.selective, poscar.selective);
        for (a, b) in again.positions.iter().zip(&poscar.positions) {
            for k in 0..3 {
                assert!((a[k] - b[k]).abs() < 1e-8);
            }
        }
    }

    #[test]
    fn test_truncated_atoms_is_error() {
        let content = "x\n1.0\n1 0 0\n0 1 0\n0 0 1\nH\n3\nDirect\n0 0 0\n";
        assert!(parse_poscar_content(content, "x").is_err());
    }
}
