//! # charge 命令实现
//!
//! 以一个收敛的计算为基础，为区间内每个电荷态生成一个运行目录。
//!
//! ## 功能
//! - 从 OUTCAR 读取基准电子数（缺失时退回 INCAR 的 NELECT）
//! - 每个目录写入 `NELECT = base - i + charge`
//! - 按规则改写 SYSTEM 标签
//! - 已存在的目录跳过
//!
//! ## 依赖关系
//! - 使用 `cli/charge.rs` 定义的参数
//! - 使用 `scan/`, `parsers/inputs.rs`, `parsers/outcar.rs`

use crate::cli::charge::ChargeArgs;
use crate::error::{NebError, Result};
use crate::models::Incar;
use crate::parsers::{inputs, outcar};
use crate::scan::{ScanPlan, ScanRange};
use crate::utils::output;

use std::collections::HashMap;
use std::path::Path;
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct ChargeRow {
    #[tabled(rename = "Charge")]
    value: i64,
    #[tabled(rename = "Directory")]
    directory: String,
    #[tabled(rename = "NELECT")]
    nelect: String,
    #[tabled(rename = "Status")]
    status: &'static str,
}

/// 执行 charge 命令
pub fn execute(args: ChargeArgs) -> Result<()> {
    output::print_header("Charge State Scan");

    let base = inputs::load_inputs(&args.folder)?;
    let base_nelect = base_electron_count(&args.folder, &base.incar)?;
    output::print_info(&format!(
        "Base electron count {} (reference charge {})",
        base_nelect, args.charge
    ));

    let range = ScanRange::new(args.start, args.end);
    if range.is_empty() {
        output::print_warning(&format!(
            "Start {} is above end {}, no charge states to generate",
            args.start, args.end
        ));
    }
    let base_system = base.incar.get("SYSTEM").unwrap_or("").to_string();
    let carry = if args.wavecar {
        vec![args.folder.join("WAVECAR"), args.folder.join("CHGCAR")]
    } else {
        Vec::new()
    };

    let mut nelects = HashMap::new();
    let report = ScanPlan::new(&base, &args.root, range)
        .with_carry(carry)
        .run(|value, label, incar| {
            let nelect = charged_nelect(base_nelect, value, args.charge);
            nelects.insert(value, nelect);
            incar.set_float("NELECT", nelect);
            if !args.keep_system {
                incar.set("SYSTEM", charge_system(&base_system, label));
            }
        })?;

    let mut rows: Vec<ChargeRow> = report
        .created
        .iter()
        .map(|(v, dir)| (v, dir, "created"))
        .chain(report.skipped.iter().map(|(v, dir)| (v, dir, "exists")))
        .map(|(v, dir, status)| ChargeRow {
            value: *v,
            directory: dir.display().to_string(),
            nelect: nelects
                .get(v)
                .map(|n| format!("{}", n))
                .unwrap_or_else(|| "-".to_string()),
            status,
        })
        .collect();
    rows.sort_by_key(|r| r.value);

    println!("\n{}", Table::new(&rows));
    output::print_separator();
    output::print_done(&format!(
        "{} of {} directories created, {} skipped",
        report.created.len(),
        report.total(),
        report.skipped.len()
    ));

    Ok(())
}

/// 基准电子数：OUTCAR 优先，没有 OUTCAR 时用 INCAR 的 NELECT
fn base_electron_count(folder: &Path, incar: &Incar) -> Result<f64> {
    let outcar_path = folder.join("OUTCAR");
    if outcar_path.is_file() {
        return outcar::read_nelect(&outcar_path);
    }

    output::print_warning(&format!(
        "No OUTCAR in {}, using NELECT from INCAR",
        folder.display()
    ));
    incar.get_float("NELECT").ok_or_else(|| NebError::MissingTag {
        tag: "NELECT".to_string(),
        path: folder.join("INCAR").display().to_string(),
    })
}

/// 电荷态 i 的电子数
pub fn charged_nelect(base: f64, value: i64, charge: f64) -> f64 {
    base - value as f64 + charge
}

/// SYSTEM 标签：最后一个词为 `0` 时替换为目录标签，否则追加
pub fn charge_system(base: &str, label: &str) -> String {
    let mut words: Vec<&str> = base.split_whitespace().collect();
    match words.last_mut() {
        Some(last) if *last == "0" => *last = label,
        _ => words.push(label),
    }
    words.join(" ")
}
