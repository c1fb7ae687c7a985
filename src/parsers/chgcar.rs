//! # VASP CHGCAR 解析器
//!
//! 只读取总密度块；之后的 augmentation 占据数和自旋密度块被忽略。
//!
//! ## CHGCAR 格式说明
//! ```text
//! <POSCAR block>
//!                         # blank line
//!    NGX NGY NGZ
//!  v1 v2 v3 v4 v5         # NGX*NGY*NGZ values, x fastest
//!  ...
//! augmentation occupancies ...
//! ```
//!
//! ## 依赖关系
//! - 被 `commands/chgsplit.rs` 使用
//! - 使用 `parsers/poscar.rs` 解析文件头

use super::poscar::parse_poscar_lines;
use crate::error::{NebError, Result};
use crate::models::ChargeDensity;
use std::fs;
use std::path::Path;

/// 解析 CHGCAR/LOCPOT 风格的体数据文件
pub fn parse_chgcar_file(path: &Path) -> Result<ChargeDensity> {
    let content = fs::read_to_string(path).map_err(|e| NebError::read(path, e))?;
    parse_chgcar_content(&content, &path.display().to_string())
}

/// 从字符串内容解析
pub fn parse_chgcar_content(content: &str, source: &str) -> Result<ChargeDensity> {
    let err = |reason: String| NebError::ParseError {
        format: "chgcar".to_string(),
        path: source.to_string(),
        reason,
    };

    let lines: Vec<&str> = content.lines().collect();
    let (structure, mut idx) = parse_poscar_lines(&lines, source)?;

    // 跳过结构块后的空行
    while idx < lines.len() && lines[idx].trim().is_empty() {
        idx += 1;
    }

    let dims: Vec<usize> = lines
        .get(idx)
        .ok_or_else(|| err("Missing grid dimension line".to_string()))?
        .split_whitespace()
        .filter_map(|s| s.parse().ok())
        .collect();
    if dims.len() != 3 || dims.iter().any(|&n| n == 0) {
        return Err(err(format!("Invalid grid dimensions at line {}", idx + 1)));
    }
    let grid = [dims[0], dims[1], dims[2]];
    let total = grid[0] * grid[1] * grid[2];
    idx += 1;

    let mut data = Vec::with_capacity(total);
    'outer: for line in &lines[idx..] {
        for token in line.split_whitespace() {
            if data.len() == total {
                break 'outer;
            }
            let value: f64 = token
                .parse()
                .map_err(|_| err(format!("Invalid density value '{}'", token)))?;
            data.push(value);
        }
        if data.len() == total {
            break;
        }
    }

    if data.len() != total {
        return Err(err(format!(
            "Expected {} grid values, found {}",
            total,
            data.len()
        )));
    }

    Ok(ChargeDensity::new(structure, grid, data))
}

#[cfg(test)]
mod tests {
    use super::*;

    fn sample_chgcar() -> String {
        let mut s = String::from(
            "test\n1.0\n4.0 0.0 0.0\n0.0 2.0 0.0\n0.0 0.0 3.0\nH\n1\nDirect\n0.0 0.0 0.0\n\n   4   2   3\n",
        );
        // value = i + 10 j + 100 k
        let mut values = Vec::new();
        for k in 0..3 {
            for j in 0..2 {
                for i in 0..4 {
                    values.push(format!("{}", i + 10 * j + 100 * k));
                }
            }
        }
        for chunk in values.chunks(5) {
            s.push_str(&format!(" {}\n", chunk.join(" ")));
        }
        s.push_str("augmentation occupancies   1  15\n 0.1 0.2\n");
        s
    }

    #[test]
    fn test_parse_grid_and_order() {
        let chg = parse_chgcar_content(&sample_chgcar(), "CHGCAR").unwrap();
        assert_eq!(chg.grid, [4, 2, 3]);
        assert_eq!(chg.data.len(), 24);
        assert_eq!(chg.value(3, 1, 2), 213.0);
        assert_eq!(chg.value(0, 1, 0), 10.0);
        assert!((chg.spacing(0) - 1.0).abs() < 1e-12);
    }

    #[test]
    fn test_truncated_data_is_error() {
        let text = "t\n1.0\n1 0 0\n0 1 0\n0 0 1\nH\n1\nDirect\n0 0 0\n\n 2 2 2\n 1 2 3\n";
        assert!(parse_chgcar_content(text, "CHGCAR").is_err());
    }
}
