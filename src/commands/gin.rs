//! # gin 命令实现
//!
//! 把 POSCAR/CONTCAR 转成 GULP 的 `.gin` 输入。
//!
//! ## 依赖关系
//! - 使用 `cli/gin.rs` 定义的参数
//! - 使用 `parsers/gulp.rs`, `parsers/poscar.rs`

use crate::cli::gin::GinArgs;
use crate::error::Result;
use crate::parsers::gulp::{self, GulpInput};
use crate::parsers::poscar;
use crate::utils::output;

/// 执行 gin 命令
pub fn execute(args: GinArgs) -> Result<()> {
    let structure = poscar::parse_poscar_file(&args.structure)?;

    let input = GulpInput {
        keywords: args.keywords,
        shells: args.shel,
        library: args.library,
        options: args.options,
        periodic: !args.cluster,
    };
    gulp::write_gin_file(&structure, &input, &args.output)?;
    output::print_written(&args.output);

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;

    #[test]
    fn test_writes_gin_from_poscar() {
        let tmp = tempfile::tempdir().unwrap();
        let structure = tmp.path().join("POSCAR");
        fs::write(
            &structure,
            "CaF2\n5.46\n1 0 0\n0 1 0\n0 0 1\nCa F\n1 2\nDirect\n0 0 0\n0.25 0.25 0.25\n0.75 0.75 0.75\n",
        )
        .unwrap();
        let out = tmp.path().join("caf2.gin");

        execute(GinArgs {
            structure,
            keywords: "opti conp".to_string(),
            shel: vec!["F".to_string()],
            library: Some("catlow.lib".to_string()),
            options: Vec::new(),
            cluster: false,
            output: out.clone(),
        })
        .unwrap();

        let gin = fs::read_to_string(&out).unwrap();
        assert_eq!(gin.matches(" F  shel").count(), 2);
        assert_eq!(gin.matches(" Ca core").count(), 1);
        assert!(gin.contains("cell\n5.460000 5.460000 5.460000 &\n"));
        assert!(gin.ends_with("library catlow.lib\n"));
    }

    #[test]
    fn test_missing_structure_fails() {
        let tmp = tempfile::tempdir().unwrap();
        let result = execute(GinArgs {
            structure: tmp.path().join("POSCAR"),
            keywords: "opti".to_string(),
            shel: Vec::new(),
            library: None,
            options: Vec::new(),
            cluster: false,
            output: tmp.path().join("out.gin"),
        });
        assert!(result.is_err());
        assert!(!tmp.path().join("out.gin").exists());
    }
}
