//! # chgsplit 命令实现
//!
//! 把 CHGCAR 风格的体数据约化为三个轴向平面平均（或其导数）。
//!
//! ## 功能
//! - 每个轴写一个 TXT 文件，每行一个值
//! - 可选 CSV 长表和剖面图
//! - 终端打印汇总表
//!
//! ## 依赖关系
//! - 使用 `cli/chgsplit.rs` 定义的参数
//! - 使用 `parsers/chgcar.rs`, `field/`
//! - 使用 `utils/output.rs`, `utils/progress.rs`

use crate::cli::chgsplit::ChgsplitArgs;
use crate::error::{NebError, Result};
use crate::field::{self, export, plot, AxisProfile};
use crate::parsers::chgcar;
use crate::utils::{output, progress};

use std::fs;
use std::path::{Path, PathBuf};
use tabled::{Table, Tabled};

#[derive(Tabled)]
struct ProfileRow {
    #[tabled(rename = "Axis")]
    axis: usize,
    #[tabled(rename = "Points")]
    points: usize,
    #[tabled(rename = "Spacing (Å)")]
    spacing: String,
    #[tabled(rename = "Min")]
    min: String,
    #[tabled(rename = "Max")]
    max: String,
}

/// 执行 chgsplit 命令
pub fn execute(args: ChgsplitArgs) -> Result<()> {
    output::print_header("CHGCAR Axis Profiles");

    if !args.input.is_file() {
        return Err(NebError::FileNotFound {
            path: args.input.display().to_string(),
        });
    }

    let spinner = progress::create_spinner(&format!("Reading {}", args.input.display()));
    let parsed = chgcar::parse_chgcar_file(&args.input);
    spinner.finish_and_clear();
    let density = parsed?;

    let [nx, ny, nz] = density.grid;
    output::print_info(&format!(
        "Grid {} x {} x {} ({} atoms)",
        nx,
        ny,
        nz,
        density.structure.num_atoms()
    ));

    let profiles = field::axis_profiles(&density, args.derivative);

    let out_dir = output_dir(&args.input, args.output_dir.as_deref())?;
    let basename = export::output_basename(&args.input, args.derivative);
    for path in export::write_axis_files(&profiles, &out_dir, &basename)? {
        output::print_written(&path);
    }

    if let Some(ref csv_path) = args.csv {
        export::to_csv(&profiles, csv_path)?;
        output::print_success(&format!("Profiles saved to '{}'", csv_path.display()));
    }

    if let Some(ref plot_path) = args.plot {
        let (title, y_label) = if args.derivative {
            ("Planar average derivative", "d⟨ρ⟩/dx")
        } else {
            ("Planar average", "⟨ρ⟩")
        };
        plot::generate_profile_plot(&profiles, plot_path, title, y_label, args.width, args.height)?;
        output::print_success(&format!("Plot saved to '{}'", plot_path.display()));
    }

    println!("\n{}", Table::new(summary_rows(&profiles)));
    output::print_done(&format!("Wrote {} axis profiles", profiles.len()));

    Ok(())
}

/// 输出目录：指定时创建，否则为输入文件所在目录
fn output_dir(input: &Path, requested: Option<&Path>) -> Result<PathBuf> {
    match requested {
        Some(dir) => {
            fs::create_dir_all(dir).map_err(|e| NebError::write(dir, e))?;
            Ok(dir.to_path_buf())
        }
        None => Ok(input
            .parent()
            .filter(|p| !p.as_os_str().is_empty())
            .map(Path::to_path_buf)
            .unwrap_or_else(|| PathBuf::from("."))),
    }
}

fn summary_rows(profiles: &[AxisProfile]) -> Vec<ProfileRow> {
    profiles
        .iter()
        .map(|p| ProfileRow {
            axis: p.axis,
            points: p.values.len(),
            spacing: format!("{:.4}", p.spacing),
            min: format!("{:.6e}", p.min()),
            max: format!("{:.6e}", p.max()),
        })
        .collect()
}
