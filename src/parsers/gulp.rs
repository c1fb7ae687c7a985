//! # GULP 输入文件写出
//!
//! 从结构生成 `.gin` 文件，用于在 VASP 之前用力场做预弛豫。
//!
//! 布局：关键字行、标题块、晶胞与坐标、`library` 行、附加选项。
//! 晶胞有三种写法：
//! - 周期体系写 `cell`（a b c & / alpha beta gamma）加分数坐标 `frac`
//! - 关键字含 `scell` 时写表面晶胞 `scell`（a b gamma）加笛卡尔坐标
//! - 非周期体系只写 `cart`
//!
//! `shells` 中的元素在 core 行之后再写一行同坐标的 shel。GULP 不接受
//! 超过 80 字符的行，写出前检查。
//!
//! ## 依赖关系
//! - 被 `commands/gin.rs` 使用
//! - 使用 `models/structure.rs`

use crate::error::{NebError, Result};
use crate::models::{Poscar, Vec3};
use std::fs;
use std::path::Path;

/// GULP 单行长度上限
pub const MAX_LINE_LENGTH: usize = 80;

/// 默认关键字
pub const DEFAULT_KEYWORDS: &str = "conp gradients";

/// `.gin` 文件参数
#[derive(Debug, Clone)]
pub struct GulpInput {
    /// 第一行关键字，如 `opti conp`
    pub keywords: String,
    /// 需要 shell 的元素
    pub shells: Vec<String>,
    /// 力场库文件
    pub library: Option<String>,
    /// 追加在末尾的选项行
    pub options: Vec<String>,
    /// false 时按团簇写笛卡尔坐标
    pub periodic: bool,
}

impl GulpInput {
    pub fn new(keywords: impl Into<String>) -> Self {
        GulpInput {
            keywords: keywords.into(),
            shells: Vec::new(),
            library: None,
            options: Vec::new(),
            periodic: true,
        }
    }

    fn surface_cell(&self) -> bool {
        self.keywords.split_whitespace().any(|k| k == "scell")
    }
}

impl Default for GulpInput {
    fn default() -> Self {
        GulpInput::new(DEFAULT_KEYWORDS)
    }
}

fn num(v: f64) -> String {
    // 避免写出 -0.000000
    let v = if v.abs() < 5e-7 { 0.0 } else { v };
    format!("{:.6}", v)
}

/// 将结构转换为 `.gin` 文本
pub fn to_gin_string(poscar: &Poscar, input: &GulpInput) -> Result<String> {
    let mut s = String::new();
    s.push_str(input.keywords.trim());
    s.push_str("\ntitle\nASE calculation\nend\n\n");

    let [a, b, c] = poscar.lattice.lengths();
    let [alpha, beta, gamma] = poscar.lattice.angles();

    let coords: Vec<Vec3> = if input.periodic && !input.surface_cell() {
        s.push_str(&format!("cell\n{} {} {} &\n", num(a), num(b), num(c)));
        s.push_str(&format!(" {} {} {}\n", num(alpha), num(beta), num(gamma)));
        s.push_str("frac\n");
        poscar.fractional_positions()
    } else if input.periodic {
        s.push_str(&format!("scell\n{} {} {}\n", num(a), num(b), num(gamma)));
        s.push_str("cart\n");
        poscar.positions.clone()
    } else {
        s.push_str("cart\n");
        poscar.positions.clone()
    };

    for (xyz, symbol) in coords.iter().zip(poscar.symbols()) {
        let tail = format!("{}  {}  {}", num(xyz[0]), num(xyz[1]), num(xyz[2]));
        s.push_str(&format!(" {:2} core {}\n", symbol, tail));
        if input.shells.iter().any(|sh| sh == symbol) {
            s.push_str(&format!(" {:2} shel {}\n", symbol, tail));
        }
    }

    if let Some(lib) = &input.library {
        s.push_str(&format!("\nlibrary {}\n", lib));
    }
    for opt in &input.options {
        s.push_str(opt);
        s.push('\n');
    }

    if let Some((n, line)) = s
        .lines()
        .enumerate()
        .find(|(_, l)| l.chars().count() > MAX_LINE_LENGTH)
    {
        return Err(NebError::InvalidArgument(format!(
            "GULP input line {} is longer than {} characters: {}",
            n + 1,
            MAX_LINE_LENGTH,
            line
        )));
    }

    Ok(s)
}

/// 写出 `.gin` 文件
pub fn write_gin_file(poscar: &Poscar, input: &GulpInput, path: &Path) -> Result<()> {
    let content = to_gin_string(poscar, input)?;
    fs::write(path, content).map_err(|e| NebError::write(path, e))
}
