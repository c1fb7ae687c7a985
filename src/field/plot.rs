//! # 轴剖面图
//!
//! 使用 `plotters` 把三个轴的剖面画成上下排列的三个子图。
//! 输出格式由扩展名决定（.svg 为矢量图，其余为 PNG）。
//!
//! ## 依赖关系
//! - 被 `commands/chgsplit.rs` 调用
//! - 使用 `field/reduce.rs` 的 AxisProfile

use super::reduce::AxisProfile;
use crate::error::{NebError, Result};

use plotters::prelude::*;
use std::path::Path;

const AXIS_NAMES: [&str; 3] = ["a", "b", "c"];
const COLORS: [RGBColor; 3] = [
    RGBColor(0, 102, 204),
    RGBColor(204, 51, 0),
    RGBColor(0, 153, 76),
];

/// 生成剖面图
pub fn generate_profile_plot(
    profiles: &[AxisProfile],
    output_path: &Path,
    title: &str,
    y_label: &str,
    width: u32,
    height: u32,
) -> Result<()> {
    let use_svg = output_path
        .extension()
        .and_then(|e| e.to_str())
        .map(|e| e.eq_ignore_ascii_case("svg"))
        .unwrap_or(false);

    if use_svg {
        let root = SVGBackend::new(output_path, (width, height)).into_drawing_area();
        draw_profiles(&root, profiles, title, y_label)?;
        root.present()
            .map_err(|e| NebError::Other(e.to_string()))?;
    } else {
        let root = BitMapBackend::new(output_path, (width, height)).into_drawing_area();
        draw_profiles(&root, profiles, title, y_label)?;
        root.present()
            .map_err(|e| NebError::Other(e.to_string()))?;
    }
    Ok(())
}

/// 绘图核心逻辑
fn draw_profiles<DB: DrawingBackend>(
    root: &DrawingArea<DB, plotters::coord::Shift>,
    profiles: &[AxisProfile],
    title: &str,
    y_label: &str,
) -> Result<()>
where
    DB::ErrorType: 'static,
{
    root.fill(&WHITE)
        .map_err(|e| NebError::Other(format!("{:?}", e)))?;

    let root = root
        .titled(title, ("sans-serif", 26))
        .map_err(|e| NebError::Other(format!("{:?}", e)))?;
    let panels = root.split_evenly((profiles.len().max(1), 1));

    for (panel, profile) in panels.iter().zip(profiles.iter()) {
        let coords = profile.coordinates();
        let x_max = coords.last().copied().unwrap_or(0.0) + profile.spacing;
        let (mut y_min, mut y_max) = (profile.min(), profile.max());
        if !(y_min.is_finite() && y_max.is_finite()) {
            continue;
        }
        if (y_max - y_min).abs() < f64::EPSILON {
            y_min -= 1.0;
            y_max += 1.0;
        }
        let pad = 0.05 * (y_max - y_min);

        let mut chart = ChartBuilder::on(panel)
            .margin(15)
            .x_label_area_size(40)
            .y_label_area_size(70)
            .build_cartesian_2d(0.0..x_max, (y_min - pad)..(y_max + pad))
            .map_err(|e| NebError::Other(format!("{:?}", e)))?;

        chart
            .configure_mesh()
            .x_desc(format!("Position along {} (Å)", AXIS_NAMES[profile.axis % 3]))
            .y_desc(y_label)
            .x_label_style(("sans-serif", 14))
            .y_label_style(("sans-serif", 14))
            .axis_desc_style(("sans-serif", 16))
            .draw()
            .map_err(|e| NebError::Other(format!("{:?}", e)))?;

        chart
            .draw_series(LineSeries::new(
                coords.iter().copied().zip(profile.values.iter().copied()),
                COLORS[profile.axis % 3].stroke_width(2),
            ))
            .map_err(|e| NebError::Other(format!("{:?}", e)))?;
    }

    Ok(())
}
