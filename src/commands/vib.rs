//! # vib 命令实现
//!
//! 为有限位移振动计算生成目录，辅助文件 WAVECAR/CHG/CHGCAR 存在时
//! 一并复制。
//!
//! ## 依赖关系
//! - 使用 `cli/vib.rs` 定义的参数
//! - 使用 `scan/displacement.rs`, `parsers/inputs.rs`

use crate::cli::vib::VibArgs;
use crate::error::Result;
use crate::parsers::inputs;
use crate::scan::DisplacementPlan;
use crate::utils::output;

/// 执行 vib 命令
pub fn execute(args: VibArgs) -> Result<()> {
    output::print_header("Finite Displacements");

    let base = inputs::load_inputs(&args.folder)?;
    let natoms = if args.indices.is_empty() {
        base.poscar.num_atoms()
    } else {
        args.indices.len()
    };
    output::print_info(&format!(
        "{} atoms, delta = {} Å, nfree = {}",
        natoms, args.delta, args.nfree
    ));

    let carry = ["WAVECAR", "CHG", "CHGCAR"]
        .iter()
        .map(|f| args.folder.join(f))
        .collect();

    let report = DisplacementPlan::new(&base, &args.root)
        .with_indices(args.indices.clone())
        .with_delta(args.delta)
        .with_nfree(args.nfree)
        .with_name(args.name.clone())
        .with_carry(carry)
        .run()?;

    output::print_separator();
    output::print_done(&format!(
        "{} of {} directories created, {} skipped",
        report.created.len(),
        report.total(),
        report.skipped.len()
    ));

    Ok(())
}
