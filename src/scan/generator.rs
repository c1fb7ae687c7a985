//! # 扫描目录生成器
//!
//! 对一个整数区间逐个生成计算目录。每个目录是基础输入集合的完整
//! 副本，只有回调改动的 INCAR 标签不同。已存在的目录直接跳过并
//! 报告，从不覆盖，所以中断后可以原样重跑。
//!
//! 检查与创建之间没有原子性保证，多个进程同时写同一根目录时
//! 仍可能冲突。
//!
//! ## 依赖关系
//! - 被 `commands/charge.rs`, `commands/nupdown.rs` 使用
//! - 目录写出逻辑与 `scan/displacement.rs` 共用
//! - 使用 `parsers/inputs.rs`, `utils/output.rs`

use super::naming::dir_label;
use crate::error::{NebError, Result};
use crate::models::{Incar, VaspInputs};
use crate::parsers::inputs::write_inputs;
use crate::utils::output;

use std::fs;
use std::path::{Path, PathBuf};

/// 闭区间 [start, end]，start > end 时为空
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ScanRange {
    pub start: i64,
    pub end: i64,
}

impl ScanRange {
    pub fn new(start: i64, end: i64) -> Self {
        ScanRange { start, end }
    }

    /// 两个端点按大小排序后的区间
    pub fn ordered(a: i64, b: i64) -> Self {
        ScanRange::new(a.min(b), a.max(b))
    }

    /// 以 center 为中心、半径 radius 的区间
    pub fn around(center: i64, radius: u32) -> Self {
        let r = radius as i64;
        ScanRange::new(center - r, center + r)
    }

    pub fn len(&self) -> usize {
        if self.is_empty() {
            0
        } else {
            (self.end - self.start + 1) as usize
        }
    }

    pub fn is_empty(&self) -> bool {
        self.start > self.end
    }

    pub fn values(&self) -> impl Iterator<Item = i64> {
        self.start..=self.end
    }
}

/// 单个目录的处理结果
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum ScanOutcome {
    Created(PathBuf),
    Skipped(PathBuf),
}

/// 扫描汇总，按扫描值（或位移标签）记录每个目录
#[derive(Debug, Default)]
pub struct ScanReport<K = i64> {
    pub created: Vec<(K, PathBuf)>,
    pub skipped: Vec<(K, PathBuf)>,
}

impl<K> ScanReport<K> {
    pub fn merge(&mut self, key: K, outcome: ScanOutcome) {
        match outcome {
            ScanOutcome::Created(dir) => self.created.push((key, dir)),
            ScanOutcome::Skipped(dir) => self.skipped.push((key, dir)),
        }
    }

    pub fn total(&self) -> usize {
        self.created.len() + self.skipped.len()
    }
}

/// 扫描配置
pub struct ScanPlan<'a> {
    /// 基础输入集合
    pub inputs: &'a VaspInputs,
    /// 生成目录的父目录
    pub root: PathBuf,
    /// 扫描区间
    pub range: ScanRange,
    /// 需要一并复制的辅助文件（不存在时忽略），如 WAVECAR/CHGCAR
    pub carry: Vec<PathBuf>,
}

impl<'a> ScanPlan<'a> {
    pub fn new(inputs: &'a VaspInputs, root: impl Into<PathBuf>, range: ScanRange) -> Self {
        ScanPlan {
            inputs,
            root: root.into(),
            range,
            carry: Vec::new(),
        }
    }

    pub fn with_carry(mut self, files: Vec<PathBuf>) -> Self {
        self.carry = files;
        self
    }

    /// 执行扫描
    ///
    /// `edit(value, label, incar)` 在写出前修改该目录的 INCAR 副本。
    /// 任何写入失败都立即中止整个扫描。
    pub fn run<F>(&self, mut edit: F) -> Result<ScanReport>
    where
        F: FnMut(i64, &str, &mut Incar),
    {
        let mut report = ScanReport::default();

        for value in self.range.values() {
            let label = dir_label(value);
            let outcome = self.generate_one(value, &label, &mut edit)?;
            report.merge(value, outcome);
        }

        Ok(report)
    }

    fn generate_one<F>(&self, value: i64, label: &str, edit: &mut F) -> Result<ScanOutcome>
    where
        F: FnMut(i64, &str, &mut Incar),
    {
        let mut inputs = self.inputs.clone();
        edit(value, label, &mut inputs.incar);
        write_rundir(&self.root.join(label), &inputs, &self.carry)
    }
}

/// 写出一个运行目录；目录已存在时跳过
pub(super) fn write_rundir(
    rundir: &Path,
    inputs: &VaspInputs,
    carry: &[PathBuf],
) -> Result<ScanOutcome> {
    if rundir.exists() {
        output::print_skip(&format!("Folder exists:  {}", rundir.display()));
        return Ok(ScanOutcome::Skipped(rundir.to_path_buf()));
    }

    output::print_info(&format!("Setting up run in {}", rundir.display()));
    fs::create_dir_all(rundir).map_err(|e| NebError::write(rundir, e))?;
    write_inputs(inputs, rundir)?;

    for src in carry {
        copy_if_present(src, rundir)?;
    }

    Ok(ScanOutcome::Created(rundir.to_path_buf()))
}

/// 源文件存在时复制到目标目录
fn copy_if_present(src: &Path, dest_dir: &Path) -> Result<bool> {
    if !src.is_file() {
        return Ok(false);
    }
    let name = src
        .file_name()
        .ok_or_else(|| NebError::InvalidArgument(format!("Not a file: {}", src.display())))?;
    let dest = dest_dir.join(name);
    fs::copy(src, &dest).map_err(|e| NebError::write(&dest, e))?;
    Ok(true)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::parsers::incar::parse_incar_file;
    use crate::parsers::poscar::parse_poscar_content;

    fn base_inputs() -> VaspInputs {
        let mut incar = Incar::new();
        incar.set("SYSTEM", "slab 0");
        incar.set("ENCUT", "400");
        VaspInputs {
            incar,
            poscar: parse_poscar_content(
                "H\n1.0\n3 0 0\n0 3 0\n0 0 3\nH\n1\nDirect\n0 0 0\n",
                "POSCAR",
            )
            .unwrap(),
            kpoints: "Gamma\n0\nG\n1 1 1\n".to_string(),
            potcar: "PAW_PBE H\n".to_string(),
        }
    }

    #[test]
    fn test_range_counts() {
        let r = ScanRange::new(-2, 3);
        assert_eq!(r.len(), 6);
        assert_eq!(ScanRange::ordered(3, -2), r);
        assert_eq!(ScanRange::around(2, 4), ScanRange::new(-2, 6));
    }

    #[test]
    fn test_reversed_range_is_empty() {
        let r = ScanRange::new(2, -1);
        assert!(r.is_empty());
        assert_eq!(r.len(), 0);
        assert_eq!(r.values().count(), 0);

        let tmp = tempfile::tempdir().unwrap();
        let inputs = base_inputs();
        let report = ScanPlan::new(&inputs, tmp.path(), r)
            .run(|_, _, _| {})
            .unwrap();
        assert_eq!(report.total(), 0);
        assert_eq!(fs::read_dir(tmp.path()).unwrap().count(), 0);
    }

    #[test]
    fn test_creates_one_dir_per_value() {
        let tmp = tempfile::tempdir().unwrap();
        let inputs = base_inputs();
        let plan = ScanPlan::new(&inputs, tmp.path(), ScanRange::new(-2, 2));

        let report = plan
            .run(|v, _, incar| incar.set_int("NUPDOWN", v))
            .unwrap();

        assert_eq!(report.created.len(), 5);
        assert!(report.skipped.is_empty());
        for label in ["n2", "n1", "0", "1", "2"] {
            let dir = tmp.path().join(label);
            for f in ["INCAR", "KPOINTS", "POSCAR", "POTCAR"] {
                assert!(dir.join(f).is_file(), "{}/{} missing", label, f);
            }
        }
        let incar = parse_incar_file(&tmp.path().join("n2").join("INCAR")).unwrap();
        assert_eq!(incar.get_int("NUPDOWN"), Some(-2));
        assert_eq!(incar.get_int("ENCUT"), Some(400));
    }

    #[test]
    fn test_existing_dirs_are_not_touched() {
        let tmp = tempfile::tempdir().unwrap();
        let inputs = base_inputs();
        let existing = tmp.path().join("1");
        fs::create_dir(&existing).unwrap();
        fs::write(existing.join("INCAR"), "SYSTEM = old\n").unwrap();

        let plan = ScanPlan::new(&inputs, tmp.path(), ScanRange::new(0, 2));
        let report = plan.run(|_, _, incar| incar.set("SYSTEM", "new")).unwrap();

        assert_eq!(report.created.len(), 2);
        assert_eq!(report.skipped, vec![(1, existing.clone())]);
        assert_eq!(
            fs::read_to_string(existing.join("INCAR")).unwrap(),
            "SYSTEM = old\n"
        );
    }

    #[test]
    fn test_rerun_is_idempotent() {
        let tmp = tempfile::tempdir().unwrap();
        let inputs = base_inputs();
        let plan = ScanPlan::new(&inputs, tmp.path(), ScanRange::new(0, 1));

        plan.run(|v, _, incar| incar.set_int("NUPDOWN", v)).unwrap();
        let before = fs::read_to_string(tmp.path().join("0").join("INCAR")).unwrap();

        let report = plan.run(|_, _, incar| incar.set_int("NUPDOWN", 99)).unwrap();
        assert_eq!(report.skipped.len(), 2);
        assert_eq!(
            fs::read_to_string(tmp.path().join("0").join("INCAR")).unwrap(),
            before
        );
    }

    #[test]
    fn test_carry_copies_present_files_only() {
        let tmp = tempfile::tempdir().unwrap();
        let src = tempfile::tempdir().unwrap();
        fs::write(src.path().join("WAVECAR"), [0u8, 1, 2, 3]).unwrap();

        let inputs = base_inputs();
        let plan = ScanPlan::new(&inputs, tmp.path(), ScanRange::new(0, 0)).with_carry(vec![
            src.path().join("WAVECAR"),
            src.path().join("CHGCAR"),
        ]);
        plan.run(|_, _, _| {}).unwrap();

        let dir = tmp.path().join("0");
        assert_eq!(fs::read(dir.join("WAVECAR")).unwrap(), vec![0u8, 1, 2, 3]);
        assert!(!dir.join("CHGCAR").exists());
    }
}
