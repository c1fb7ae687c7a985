//! # VASP INCAR 解析器
//!
//! 解析 `TAG = value` 行，写出时按 `config::INCAR_LAYOUT` 分组。
//!
//! ## 语法
//! - `#` 或 `!` 之后为注释
//! - 一行内可用 `;` 分隔多个赋值
//! - 标签不区分大小写，统一存为大写
//!
//! ## 依赖关系
//! - 被 `parsers/inputs.rs`, `commands/seed.rs`, `commands/dimer.rs` 使用
//! - 使用 `models/incar.rs`, `config.rs`

use crate::config::{self, INCAR_LAYOUT, OTHER_GROUP};
use crate::error::{NebError, Result};
use crate::models::Incar;
use std::fs;
use std::path::Path;

/// 解析 INCAR 文件
pub fn parse_incar_file(path: &Path) -> Result<Incar> {
    let content = fs::read_to_string(path).map_err(|e| NebError::read(path, e))?;
    parse_incar_content(&content, &path.display().to_string())
}

/// 从字符串内容解析 INCAR
pub fn parse_incar_content(content: &str, source: &str) -> Result<Incar> {
    let mut incar = Incar::new();

    for (lineno, line) in content.lines().enumerate() {
        let line = match line.find(['#', '!']) {
            Some(pos) => &line[..pos],
            None => line,
        };

        for assignment in line.split(';') {
            let assignment = assignment.trim();
            if assignment.is_empty() {
                continue;
            }
            let (tag, value) = assignment.split_once('=').ok_or_else(|| NebError::ParseError {
                format: "incar".to_string(),
                path: source.to_string(),
                reason: format!("Line {}: expected 'TAG = value'", lineno + 1),
            })?;
            let tag = tag.trim();
            if tag.is_empty() {
                return Err(NebError::ParseError {
                    format: "incar".to_string(),
                    path: source.to_string(),
                    reason: format!("Line {}: empty tag", lineno + 1),
                });
            }
            incar.set(tag, value.trim());
        }
    }

    Ok(incar)
}

/// 将 INCAR 转换为分组格式字符串
pub fn to_incar_string(incar: &Incar) -> String {
    let mut sections: Vec<(&str, Vec<(&str, &str)>)> = Vec::new();

    for (group, tags) in INCAR_LAYOUT {
        if *group == "SETUP" {
            push_section(&mut sections, OTHER_GROUP, other_entries(incar));
        }
        let entries: Vec<(&str, &str)> = tags
            .iter()
            .filter_map(|t| incar.get(t).map(|v| (*t, v)))
            .collect();
        push_section(&mut sections, group, entries);
    }

    sections
        .iter()
        .map(|(group, entries)| {
            let mut block = format!("# {}\n", group);
            for (tag, value) in entries {
                block.push_str(&format!("{} = {}\n", tag, value));
            }
            block
        })
        .collect::<Vec<_>>()
        .join("\n")
}

fn push_section<'a>(
    sections: &mut Vec<(&'a str, Vec<(&'a str, &'a str)>)>,
    group: &'a str,
    entries: Vec<(&'a str, &'a str)>,
) {
    if !entries.is_empty() {
        sections.push((group, entries));
    }
}

/// 不在任何分组中的标签，保持原顺序
fn other_entries(incar: &Incar) -> Vec<(&str, &str)> {
    incar
        .iter()
        .filter(|(tag, _)| config::group_of(tag).is_none())
        .collect()
}

/// 写出 INCAR 文件
pub fn write_incar_file(incar: &Incar, path: &Path) -> Result<()> {
    fs::write(path, to_incar_string(incar)).map_err(|e| NebError::write(path, e))
}
