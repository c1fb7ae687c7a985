//! # 运行目录收集器
//!
//! 在根目录下查找包含 INCAR 的目录，按目录名做 glob 过滤。
//!
//! ## 依赖关系
//! - 被 `commands/submit.rs` 调用
//! - 使用 `walkdir` 遍历目录，`glob::Pattern` 匹配目录名

use crate::error::{NebError, Result};
use crate::scan::parse_dir_label;

use std::path::{Path, PathBuf};
use walkdir::WalkDir;

/// 运行目录收集器
pub struct RunDirCollector {
    root: PathBuf,
    patterns: Vec<glob::Pattern>,
    recursive: bool,
}

impl RunDirCollector {
    pub fn new(root: impl Into<PathBuf>) -> Self {
        RunDirCollector {
            root: root.into(),
            patterns: Vec::new(),
            recursive: false,
        }
    }

    /// 目录名过滤（逗号分隔多个模式，空表示全部）
    pub fn with_pattern(mut self, pattern: &str) -> Result<Self> {
        self.patterns = pattern
            .split(',')
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(|p| {
                glob::Pattern::new(p).map_err(|e| {
                    NebError::InvalidArgument(format!("Invalid pattern '{}': {}", p, e))
                })
            })
            .collect::<Result<Vec<_>>>()?;
        Ok(self)
    }

    pub fn recursive(mut self, recursive: bool) -> Self {
        self.recursive = recursive;
        self
    }

    /// 收集运行目录
    ///
    /// 非递归时检查根目录本身和它的直接子目录。同一父目录下的扫描
    /// 目录按数值排序（n2, n1, 0, 1, ...），其余按名称。
    pub fn collect(&self) -> Result<Vec<PathBuf>> {
        if !self.root.is_dir() {
            return Err(NebError::DirectoryNotFound {
                path: self.root.display().to_string(),
            });
        }

        let walker = if self.recursive {
            WalkDir::new(&self.root)
        } else {
            WalkDir::new(&self.root).max_depth(1)
        };

        let mut dirs: Vec<PathBuf> = walker
            .into_iter()
            .filter_map(|e| e.ok())
            .filter(|e| e.file_type().is_dir())
            .filter(|e| e.path().join("INCAR").is_file())
            .filter(|e| self.matches(e.path()))
            .map(|e| e.path().to_path_buf())
            .collect();

        dirs.sort_by_cached_key(|d| sort_key(d));
        Ok(dirs)
    }

    fn matches(&self, dir: &Path) -> bool {
        if self.patterns.is_empty() {
            return true;
        }
        let name = match dir.file_name().and_then(|n| n.to_str()) {
            Some(name) => name,
            None => return false,
        };
        self.patterns.iter().any(|p| p.matches(name))
    }
}

fn sort_key(dir: &Path) -> (PathBuf, Option<i64>, String) {
    let name = dir
        .file_name()
        .map(|n| n.to_string_lossy().to_string())
        .unwrap_or_default();
    let parent = dir.parent().map(Path::to_path_buf).unwrap_or_default();
    (parent, parse_dir_label(&name).ok(), name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    fn make_run(root: &Path, rel: &str) {
        let dir = root.join(rel);
        fs::create_dir_all(&dir).unwrap();
        fs::write(dir.join("INCAR"), "ENCUT = 400\n").unwrap();
    }

    #[test]
    fn test_collect_flat_and_recursive() {
        let tmp = tempfile::tempdir().unwrap();
        make_run(tmp.path(), "n1");
        make_run(tmp.path(), "0");
        make_run(tmp.path(), "nupdown/2");
        fs::create_dir_all(tmp.path().join("empty")).unwrap();

        let flat = RunDirCollector::new(tmp.path()).collect().unwrap();
        assert_eq!(flat, vec![tmp.path().join("n1"), tmp.path().join("0")]);

        let deep = RunDirCollector::new(tmp.path())
            .recursive(true)
            .collect()
            .unwrap();
        assert_eq!(deep.len(), 3);
        assert!(deep.contains(&tmp.path().join("nupdown/2")));
    }

    #[test]
    fn test_collect_with_pattern() {
        let tmp = tempfile::tempdir().unwrap();
        make_run(tmp.path(), "n1");
        make_run(tmp.path(), "n2");
        make_run(tmp.path(), "1");

        let dirs = RunDirCollector::new(tmp.path())
            .with_pattern("n*")
            .unwrap()
            .collect()
            .unwrap();
        assert_eq!(dirs.len(), 2);

        assert!(RunDirCollector::new(tmp.path()).with_pattern("[").is_err());
    }

    #[test]
    fn test_scan_labels_sorted_numerically() {
        let tmp = tempfile::tempdir().unwrap();
        for name in ["1", "n2", "10", "n1", "0", "setup"] {
            make_run(tmp.path(), name);
        }
        let names: Vec<String> = RunDirCollector::new(tmp.path())
            .collect()
            .unwrap()
            .iter()
            .map(|d| d.file_name().unwrap().to_string_lossy().to_string())
            .collect();
        assert_eq!(names, vec!["setup", "n2", "n1", "0", "1", "10"]);
    }

    #[test]
    fn test_missing_root() {
        let tmp = tempfile::tempdir().unwrap();
        let result = RunDirCollector::new(tmp.path().join("nope")).collect();
        assert!(matches!(result, Err(NebError::DirectoryNotFound { .. })));
    }
}
