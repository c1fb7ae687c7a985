//! # 轴剖面导出
//!
//! ## 支持格式
//! - TXT: 每个轴一个文件，每行一个值，按网格顺序
//! - CSV: 三个轴合并的长表 (axis, index, coordinate, value)
//!
//! ## 依赖关系
//! - 被 `commands/chgsplit.rs` 调用
//! - 使用 `field/reduce.rs` 的 AxisProfile
//! - 使用 `csv` + `serde` 写入 CSV 文件

use super::reduce::AxisProfile;
use crate::error::{NebError, Result};

use serde::Serialize;
use std::fs::File;
use std::io::{BufWriter, Write};
use std::path::{Path, PathBuf};

/// 输出文件名前缀：输入文件名转小写，导数模式追加 `.d`
pub fn output_basename(input: &Path, derivative: bool) -> String {
    let name = input
        .file_name()
        .and_then(|n| n.to_str())
        .unwrap_or("chgcar")
        .to_lowercase();
    if derivative {
        format!("{}.d", name)
    } else {
        name
    }
}

/// 某个轴的输出路径 `<basename>.<axis>.txt`
pub fn axis_file_path(dir: &Path, basename: &str, axis: usize) -> PathBuf {
    dir.join(format!("{}.{}.txt", basename, axis))
}

/// 写出每个轴的 TXT 文件，返回写出的路径
pub fn write_axis_files(
    profiles: &[AxisProfile],
    dir: &Path,
    basename: &str,
) -> Result<Vec<PathBuf>> {
    let mut written = Vec::with_capacity(profiles.len());

    for profile in profiles {
        let path = axis_file_path(dir, basename, profile.axis);
        let file = File::create(&path).map_err(|e| NebError::write(&path, e))?;
        let mut writer = BufWriter::new(file);
        for value in &profile.values {
            writeln!(writer, "{}", value).map_err(|e| NebError::write(&path, e))?;
        }
        writer.flush().map_err(|e| NebError::write(&path, e))?;
        written.push(path);
    }

    Ok(written)
}

#[derive(Debug, Serialize)]
struct ProfileRecord {
    axis: usize,
    index: usize,
    coordinate: f64,
    value: f64,
}

/// 导出为 CSV 长表
pub fn to_csv(profiles: &[AxisProfile], output_path: &Path) -> Result<()> {
    let mut wtr = csv::Writer::from_path(output_path)?;

    for profile in profiles {
        for (index, (coordinate, value)) in profile
            .coordinates()
            .into_iter()
            .zip(profile.values.iter().copied())
            .enumerate()
        {
            wtr.serialize(ProfileRecord {
                axis: profile.axis,
                index,
                coordinate,
                value,
            })?;
        }
    }

    wtr.flush().map_err(|e| NebError::write(output_path, e))?;

    Ok(())
}
