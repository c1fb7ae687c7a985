//! # 终端输出工具
//!
//! 统一的带前缀彩色输出，所有子命令共用。
//!
//! ## 依赖关系
//! - 被所有 `commands/` 模块和 `scan/generator.rs` 使用
//! - 使用 `colored` crate

use colored::Colorize;
use std::path::Path;

pub fn print_success(msg: &str) {
    println!("{} {}", "[OK]".green().bold(), msg);
}

/// 错误输出到 stderr
pub fn print_error(msg: &str) {
    eprintln!("{} {}", "[ERR]".red().bold(), msg);
}

pub fn print_warning(msg: &str) {
    println!("{} {}", "[WARN]".yellow().bold(), msg);
}

pub fn print_info(msg: &str) {
    println!("{} {}", "[*]".blue().bold(), msg);
}

/// 已存在而跳过的条目
pub fn print_skip(msg: &str) {
    println!("{} {}", "[SKIP]".dimmed(), msg);
}

pub fn print_done(msg: &str) {
    println!("{} {}", "[DONE]".green().bold(), msg);
}

/// 只生成不执行的条目
pub fn print_dry(msg: &str) {
    println!("{} {}", "[DRY]".cyan().bold(), msg);
}

/// 打印写出的文件
pub fn print_written(path: &Path) {
    println!(
        "{} {} {}",
        "[OK]".green().bold(),
        "->".cyan(),
        path.display()
    );
}

pub fn print_header(title: &str) {
    let line = "─".repeat(60);
    println!("\n{}", line.dimmed());
    println!("  {}", title.bold());
    println!("{}\n", line.dimmed());
}

pub fn print_separator() {
    println!("{}", "─".repeat(60).dimmed());
}
