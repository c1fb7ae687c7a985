//! # VASP OUTCAR 解析器
//!
//! 从 OUTCAR 中提取电子数、每个离子步的能量、是否正常结束以及最后一步的原子受力。
//!
//! ## 依赖关系
//! - 被 `commands/charge.rs`（NELECT）和 `commands/constrain.rs`（受力、能量）使用

use crate::error::{NebError, Result};
use crate::models::Vec3;
use regex::Regex;
use std::fs::File;
use std::io::{BufRead, BufReader};
use std::path::Path;

/// OUTCAR 摘要
#[derive(Debug, Clone, Default)]
pub struct OutcarSummary {
    /// 总电子数
    pub nelect: Option<f64>,
    /// 原子数
    pub num_atoms: Option<usize>,
    /// 每个离子步的 TOTEN (eV)
    pub energies: Vec<f64>,
    /// 计算是否正常结束
    pub is_finished: bool,
    /// 最后一个 TOTAL-FORCE 块 (position, force)
    pub last_forces: Vec<(Vec3, Vec3)>,
}

/// 解析 VASP OUTCAR 文件
pub fn parse_outcar(path: &Path) -> Result<OutcarSummary> {
    let file = File::open(path).map_err(|e| NebError::read(path, e))?;
    let reader = BufReader::new(file);

    let nelect_re = Regex::new(r"NELECT\s*=\s*([-+0-9.Ee]+)")
        .map_err(|e| NebError::Other(e.to_string()))?;
    // 两个空格的 "free  energy" 只出现在离子步末尾
    let toten_re = Regex::new(
        r"free  energy   TOTEN  =\s*([-+]?[0-9]+\.?[0-9]*(?:[eE][-+]?[0-9]+)?) eV",
    )
    .map_err(|e| NebError::Other(e.to_string()))?;

    let mut summary = OutcarSummary::default();
    let mut in_forces = false;
    let mut dashes_seen = 0;
    let mut block: Vec<(Vec3, Vec3)> = Vec::new();

    for line in reader.lines() {
        let line = line.map_err(|e| NebError::read(path, e))?;

        if in_forces {
            if line.trim_start().starts_with("---") {
                dashes_seen += 1;
                if dashes_seen == 2 {
                    in_forces = false;
                    summary.last_forces = std::mem::take(&mut block);
                }
                continue;
            }
            let values: Vec<f64> = line
                .split_whitespace()
                .filter_map(|s| s.parse().ok())
                .collect();
            if values.len() >= 6 {
                block.push((
                    [values[0], values[1], values[2]],
                    [values[3], values[4], values[5]],
                ));
            }
            continue;
        }

        if line.contains("TOTAL-FORCE") {
            in_forces = true;
            dashes_seen = 0;
            block.clear();
            continue;
        }

        if let Some(caps) = toten_re.captures(&line) {
            if let Ok(e) = caps[1].parse() {
                summary.energies.push(e);
            }
            continue;
        }

        // "   NELECT =      50.0000    total number of electrons"
        if summary.nelect.is_none() {
            if let Some(caps) = nelect_re.captures(&line) {
                summary.nelect = caps[1].parse().ok();
            }
        }

        // "   number of dos      NEDOS =    301   number of ions     NIONS =      8"
        if line.contains("NIONS =") {
            if let Some(val) = extract_last_number(&line) {
                summary.num_atoms = Some(val as usize);
            }
        }

        if line.contains("General timing and accounting informations for this job") {
            summary.is_finished = true;
        }
    }

    Ok(summary)
}

/// 只读取电子数，缺失时报错
pub fn read_nelect(path: &Path) -> Result<f64> {
    parse_outcar(path)?.nelect.ok_or_else(|| NebError::MissingTag {
        tag: "NELECT".to_string(),
        path: path.display().to_string(),
    })
}

/// 提取字符串中最后一个数字
fn extract_last_number(s: &str) -> Option<f64> {
    s.split_whitespace()
        .filter_map(|w| w.parse::<f64>().ok())
        .last()
}
