//! # 扫描目录命名
//!
//! 目录名就是整数的十进制表示，负号换成 `n`（`-2` -> `n2`），
//! 避免目录名以 `-` 开头被命令行当成选项。

use crate::error::{NebError, Result};

/// 负号的替代字符
pub const SIGN_CHAR: char = 'n';

/// 整数 -> 目录名
pub fn dir_label(value: i64) -> String {
    value.to_string().replace('-', &SIGN_CHAR.to_string())
}

/// 目录名 -> 整数，`dir_label` 的逆
pub fn parse_dir_label(label: &str) -> Result<i64> {
    let text = match label.strip_prefix(SIGN_CHAR) {
        Some(rest) => format!("-{}", rest),
        None => label.to_string(),
    };
    text.parse()
        .map_err(|_| NebError::InvalidArgument(format!("'{}' is not a scan directory label", label)))
}
