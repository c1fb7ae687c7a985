//! # INCAR 参数模型
//!
//! 保持插入顺序的 `TAG = value` 表。值以原始字符串保存，
//! 需要时再按整数/浮点解析。
//!
//! ## 依赖关系
//! - 被 `parsers/incar.rs` 解析/写出
//! - 被 `scan/`, `commands/seed.rs`, `commands/dimer.rs` 修改

use serde::{Deserialize, Serialize};

/// INCAR 参数集合
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct Incar {
    entries: Vec<(String, String)>,
}

impl Incar {
    pub fn new() -> Self {
        Self::default()
    }

    /// 设置原始字符串值（标签统一转大写）
    pub fn set(&mut self, tag: &str, value: impl Into<String>) {
        let tag = tag.trim().to_uppercase();
        let value = value.into();
        match self.entries.iter_mut().find(|(t, _)| *t == tag) {
            Some(entry) => entry.1 = value,
            None => self.entries.push((tag, value)),
        }
    }

    pub fn set_int(&mut self, tag: &str, value: i64) {
        self.set(tag, value.to_string());
    }

    /// 浮点值总是带小数点写出，VASP 才会按实数读取
    pub fn set_float(&mut self, tag: &str, value: f64) {
        self.set(tag, format_float(value));
    }

    pub fn set_bool(&mut self, tag: &str, value: bool) {
        self.set(tag, if value { ".TRUE." } else { ".FALSE." });
    }

    pub fn get(&self, tag: &str) -> Option<&str> {
        let tag = tag.to_uppercase();
        self.entries
            .iter()
            .find(|(t, _)| *t == tag)
            .map(|(_, v)| v.as_str())
    }

    pub fn get_int(&self, tag: &str) -> Option<i64> {
        self.get(tag)?.split_whitespace().next()?.parse().ok()
    }

    pub fn get_float(&self, tag: &str) -> Option<f64> {
        let raw = self.get(tag)?.split_whitespace().next()?;
        // Fortran 风格指数 1.0D-5
        raw.replace(['d', 'D'], "e").parse().ok()
    }

    pub fn contains(&self, tag: &str) -> bool {
        self.get(tag).is_some()
    }

    /// 删除标签，返回旧值
    pub fn remove(&mut self, tag: &str) -> Option<String> {
        let tag = tag.to_uppercase();
        let idx = self.entries.iter().position(|(t, _)| *t == tag)?;
        Some(self.entries.remove(idx).1)
    }

    pub fn iter(&self) -> impl Iterator<Item = (&str, &str)> {
        self.entries.iter().map(|(t, v)| (t.as_str(), v.as_str()))
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}

/// 格式化浮点数，整数值保留一位小数
pub fn format_float(value: f64) -> String {
    if value.fract() == 0.0 && value.abs() < 1e15 {
        format!("{:.1}", value)
    } else {
        format!("{}", value)
    }
}
