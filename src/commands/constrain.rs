//! # constrain 命令实现
//!
//! 对一个结构执行一次约束步：把建议坐标中扩散原子的位置调整到
//! 约束平面上，可选地对 OUTCAR 中最后一步的受力做同样的调整，
//! 并用调整后的受力和离子步能量判断弛豫是否收敛。
//!
//! ## 依赖关系
//! - 使用 `cli/constrain.rs` 定义的参数
//! - 使用 `constraints/`, `parsers/poscar.rs`, `parsers/outcar.rs`

use crate::cli::constrain::{ConstrainArgs, PolicyKind};
use crate::constraints::{
    AlignedMidpointPlane, ConstraintPolicy, Convergence, HookeanPlane, InPlane, InvertPlane,
    LockedPlane, MidpointPlane, PlaneConstraint, SurfaceMidpointPlane,
};
use crate::error::{NebError, Result};
use crate::models::{Poscar, Vec3};
use crate::parsers::{outcar, poscar};
use crate::utils::output;

use tabled::{Table, Tabled};

#[derive(Tabled)]
struct VectorRow {
    #[tabled(rename = "")]
    label: &'static str,
    #[tabled(rename = "x")]
    x: String,
    #[tabled(rename = "y")]
    y: String,
    #[tabled(rename = "z")]
    z: String,
}

impl VectorRow {
    fn new(label: &'static str, v: Vec3) -> Self {
        VectorRow {
            label,
            x: format!("{:.6}", v[0]),
            y: format!("{:.6}", v[1]),
            z: format!("{:.6}", v[2]),
        }
    }
}

/// 一次约束步的结果
#[derive(Debug)]
pub struct ConstrainedStep {
    /// 调整后的结构
    pub structure: Poscar,
    /// 调整后的受力，没有 OUTCAR 时为 None
    pub forces: Option<Vec<Vec3>>,
    /// 收敛判断，需要 OUTCAR 和 `--fmax`
    pub converged: Option<bool>,
}

/// 执行 constrain 命令
pub fn execute(args: ConstrainArgs) -> Result<()> {
    output::print_header("Plane Constraint");

    let step = constrain_step(&args)?;
    if let Some(converged) = step.converged {
        if converged {
            output::print_success("Relaxation converged");
        } else {
            output::print_info("Relaxation not converged yet");
        }
    }

    poscar::write_poscar_file(&step.structure, &args.output)?;
    output::print_written(&args.output);

    Ok(())
}

/// 读入结构并执行一次约束步，不写文件
pub fn constrain_step(args: &ConstrainArgs) -> Result<ConstrainedStep> {
    let current = poscar::parse_poscar_file(&args.input)?;
    let proposed = match args.proposed {
        Some(ref path) => poscar::parse_poscar_file(path)?,
        None => current.clone(),
    };
    if proposed.num_atoms() != current.num_atoms() {
        return Err(NebError::InvalidArgument(format!(
            "proposed structure has {} atoms, current has {}",
            proposed.num_atoms(),
            current.num_atoms()
        )));
    }

    let mut policy = build_policy(&args)?;
    policy.validate(current.num_atoms())?;
    output::print_info(&format!(
        "Policy {} on atom {} ({}), references {:?}",
        policy.name(),
        args.atom,
        current.symbols()[args.atom],
        &args.plane
    ));

    let cell = &current.lattice;
    let mut positions = proposed.positions.clone();
    policy.adjust_positions(cell, &current.positions, &mut positions);
    ensure_finite(&positions, "adjusted positions")?;

    report_plane_state(&policy);

    let mut adjusted = proposed.clone();
    let before = adjusted.positions[args.atom];
    adjusted.positions = positions;
    let after = adjusted.positions[args.atom];

    println!(
        "\n{}",
        Table::new(vec![
            VectorRow::new("proposed (Å)", before),
            VectorRow::new("adjusted (Å)", after),
        ])
    );

    let mut step = ConstrainedStep {
        structure: adjusted,
        forces: None,
        converged: None,
    };

    if let Some(ref outcar_path) = args.outcar {
        let summary = outcar::parse_outcar(outcar_path)?;
        if !summary.is_finished {
            output::print_warning(&format!(
                "{} has no final timing block, using the last complete force block",
                outcar_path.display()
            ));
        }
        if summary.last_forces.len() != current.num_atoms() {
            return Err(NebError::ParseError {
                format: "outcar".to_string(),
                path: outcar_path.display().to_string(),
                reason: format!(
                    "last force block has {} atoms (NIONS = {}), structure has {}",
                    summary.last_forces.len(),
                    summary
                        .num_atoms
                        .map(|n| n.to_string())
                        .unwrap_or_else(|| "?".to_string()),
                    current.num_atoms()
                ),
            });
        }
        let mut forces: Vec<Vec3> = summary.last_forces.iter().map(|(_, f)| *f).collect();
        let raw = forces[args.atom];
        policy.adjust_forces(cell, &current.positions, &mut forces);
        ensure_finite(&forces, "adjusted forces")?;

        println!(
            "\n{}",
            Table::new(vec![
                VectorRow::new("force (eV/Å)", raw),
                VectorRow::new("adjusted (eV/Å)", forces[args.atom]),
            ])
        );

        if let Some(fmax) = args.fmax {
            let mut check = Convergence::new(fmax);
            let n = summary.energies.len();
            if n >= 2 {
                check = check.with_previous_energy(summary.energies[n - 2]);
            }
            let energy = summary.energies.last().copied().unwrap_or(0.0);
            output::print_info(&format!(
                "Convergence check with fmax {} eV/Å over {} ionic steps",
                check.fmax(),
                n
            ));
            step.converged = Some(check.is_converged(energy, &forces, None));
        }
        step.forces = Some(forces);
    } else if args.fmax.is_some() {
        output::print_warning("--fmax needs --outcar, convergence not checked");
    }

    Ok(step)
}

/// 由命令行参数构造约束策略
pub fn build_policy(args: &ConstrainArgs) -> Result<ConstraintPolicy> {
    let needed = args.policy.reference_count();
    if args.plane.len() != needed {
        return Err(NebError::InvalidArgument(format!(
            "--plane needs {} atom indices for this policy, got {}",
            needed,
            args.plane.len()
        )));
    }

    let atom = args.atom;
    let p = &args.plane;

    let policy = match args.policy {
        PolicyKind::InPlane => ConstraintPolicy::InPlane(InPlane::new(atom, [p[0], p[1], p[2]])?),
        PolicyKind::Locked => {
            ConstraintPolicy::Locked(LockedPlane::new(atom, [p[0], p[1], p[2]])?)
        }
        PolicyKind::Invert => {
            ConstraintPolicy::Invert(InvertPlane::new(atom, [p[0], p[1], p[2]])?)
        }
        PolicyKind::Hookean => ConstraintPolicy::Hookean(HookeanPlane::new(
            atom,
            [p[0], p[1], p[2]],
            args.spring,
        )?),
        PolicyKind::Midpoint => ConstraintPolicy::Midpoint(MidpointPlane::new(atom, [p[0], p[1]])?),
        PolicyKind::AlignedMidpoint => {
            if args.axis.len() != 3 {
                return Err(NebError::InvalidArgument(format!(
                    "--axis needs 3 components, got {}",
                    args.axis.len()
                )));
            }
            ConstraintPolicy::AlignedMidpoint(AlignedMidpointPlane::new(
                atom,
                [p[0], p[1]],
                [args.axis[0], args.axis[1], args.axis[2]],
                args.window,
            )?)
        }
        PolicyKind::SurfaceMidpoint => {
            let reference = args.reference.as_ref().ok_or_else(|| {
                NebError::InvalidArgument("surface-midpoint requires --reference".to_string())
            })?;
            ConstraintPolicy::SurfaceMidpoint(SurfaceMidpointPlane::from_file(
                atom,
                [p[0], p[1]],
                reference,
            )?)
        }
    };

    Ok(policy)
}

/// 打印策略内部保存的平面状态
fn report_plane_state(policy: &ConstraintPolicy) {
    let plane = match policy {
        ConstraintPolicy::Locked(c) => {
            if let Some(d) = c.locked_distance() {
                output::print_info(&format!("Locked plane offset {:.6}", d));
            }
            return;
        }
        ConstraintPolicy::AlignedMidpoint(c) => c.cached_plane(),
        ConstraintPolicy::SurfaceMidpoint(c) => c.last_plane(),
        _ => None,
    };
    if let Some(plane) = plane {
        let n = plane.unit_normal();
        output::print_info(&format!(
            "Plane normal ({:.4}, {:.4}, {:.4})",
            n[0], n[1], n[2]
        ));
    }
}

/// 退化几何产生的 NaN/inf 不写入文件
fn ensure_finite(values: &[Vec3], what: &str) -> Result<()> {
    match values
        .iter()
        .position(|v| v.iter().any(|x| !x.is_finite()))
    {
        Some(i) => Err(NebError::DegenerateGeometry(format!(
            "{} contain non-finite values at atom {} (collinear or coincident reference atoms?)",
            what, i
        ))),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::fs;
    use std::path::{Path, PathBuf};

    const POSCAR: &str = "\
adsorbate
1.0
10.0 0.0 0.0
0.0 10.0 0.0
0.0 0.0 10.0
Cu O
3 1
Selective dynamics
Direct
0.0 0.0 0.1 F F F
0.2 0.0 0.1 F F F
0.0 0.2 0.1 F F F
0.05 0.04 0.18 T T T
";

    fn args(dir: &Path, policy: PolicyKind, plane: Vec<usize>) -> ConstrainArgs {
        ConstrainArgs {
            policy,
            atom: 3,
            plane,
            input: dir.join("POSCAR"),
            proposed: None,
            reference: None,
            axis: vec![0.0, 0.0, 1.0],
            window: 50,
            spring: 1.0,
            outcar: None,
            fmax: None,
            output: dir.join("POSCAR.out"),
        }
    }

    fn setup() -> (tempfile::TempDir, PathBuf) {
        let tmp = tempfile::tempdir().unwrap();
        fs::write(tmp.path().join("POSCAR"), POSCAR).unwrap();
        let path = tmp.path().to_path_buf();
        (tmp, path)
    }

    #[test]
    fn test_in_plane_writes_projected_structure() {
        let (_tmp, dir) = setup();
        execute(args(&dir, PolicyKind::InPlane, vec![0, 1, 2])).unwrap();

        let out = poscar::parse_poscar_file(&dir.join("POSCAR.out")).unwrap();
        assert!((out.positions[3][2] - 1.0).abs() < 1e-8);
        assert!((out.positions[3][0] - 0.5).abs() < 1e-8);
        // 其他原子和选择性动力学标记保持不变
        assert!((out.positions[1][0] - 2.0).abs() < 1e-8);
        assert_eq!(out.selective.as_ref().unwrap()[3], [true, true, true]);
        assert_eq!(out.species, vec!["Cu", "O"]);
    }

    #[test]
    fn test_plane_count_must_match_policy() {
        let (_tmp, dir) = setup();
        assert!(build_policy(&args(&dir, PolicyKind::Midpoint, vec![0, 1, 2])).is_err());
        assert!(build_policy(&args(&dir, PolicyKind::InPlane, vec![0, 1])).is_err());
        assert!(build_policy(&args(&dir, PolicyKind::SurfaceMidpoint, vec![0, 1])).is_err());
    }

    #[test]
    fn test_out_of_range_atom() {
        let (_tmp, dir) = setup();
        let result = execute(args(&dir, PolicyKind::InPlane, vec![0, 1, 7]));
        assert!(matches!(result, Err(NebError::InvalidArgument(_))));
    }

    #[test]
    fn test_degenerate_geometry_not_written() {
        let tmp = tempfile::tempdir().unwrap();
        let collinear = POSCAR.replace("0.0 0.2 0.1 F F F", "0.4 0.0 0.1 F F F");
        fs::write(tmp.path().join("POSCAR"), collinear).unwrap();

        let result = execute(args(tmp.path(), PolicyKind::InPlane, vec![0, 1, 2]));
        assert!(matches!(result, Err(NebError::DegenerateGeometry(_))));
        assert!(!tmp.path().join("POSCAR.out").exists());
    }

    const OUTCAR: &str = "\
 POSITION                                       TOTAL-FORCE (eV/Angst)
 -----------------------------------------------------------------------------------
      0.00000      0.00000      1.00000         0.000000      0.000000      0.000000
      2.00000      0.00000      1.00000         0.000000      0.000000      0.000000
      0.00000      2.00000      1.00000         0.000000      0.000000      0.000000
      0.50000      0.40000      1.80000         0.100000      0.200000      3.000000
 -----------------------------------------------------------------------------------
";

    #[test]
    fn test_hookean_with_outcar_forces() {
        let (_tmp, dir) = setup();
        fs::write(dir.join("OUTCAR"), OUTCAR).unwrap();
        let mut a = args(&dir, PolicyKind::Hookean, vec![0, 1, 2]);
        a.outcar = Some(dir.join("OUTCAR"));
        a.spring = 2.0;
        a.fmax = Some(0.05);

        let step = constrain_step(&a).unwrap();

        // 坐标不变
        assert!((step.structure.positions[3][2] - 1.8).abs() < 1e-8);
        // 平面 z = 1，原子在上方 0.8 Å：法向分量换成 -2.0 * 0.8
        let forces = step.forces.unwrap();
        assert!((forces[3][0] - 0.1).abs() < 1e-8);
        assert!((forces[3][1] - 0.2).abs() < 1e-8);
        assert!((forces[3][2] + 1.6).abs() < 1e-8);
        assert_eq!(forces[0], [0.0; 3]);
        assert_eq!(step.converged, Some(false));
    }

    #[test]
    fn test_in_plane_forces_and_energy_stall_converges() {
        let (_tmp, dir) = setup();
        let outcar = format!(
            "{}  free  energy   TOTEN  =       -30.00000000 eV\n{}  free  energy   TOTEN  =       -30.00000001 eV\n",
            OUTCAR, OUTCAR
        );
        fs::write(dir.join("OUTCAR"), outcar).unwrap();
        let mut a = args(&dir, PolicyKind::InPlane, vec![0, 1, 2]);
        a.outcar = Some(dir.join("OUTCAR"));
        a.fmax = Some(0.05);

        let step = constrain_step(&a).unwrap();
        let forces = step.forces.unwrap();
        assert!(forces[3][2].abs() < 1e-12);
        // 受力仍大于 fmax，但能量变化 1e-8 < 0.05 / 1e6
        assert_eq!(step.converged, Some(true));
    }

    #[test]
    fn test_boundary_pair_uses_nearest_images() {
        let tmp = tempfile::tempdir().unwrap();
        let poscar = "\
boundary
1.0
10.0 0.0 0.0
0.0 10.0 0.0
0.0 0.0 10.0
Cu O
2 1
Direct
0.1 0.5 0.5
0.9 0.5 0.5
0.05 0.5 0.5
";
        fs::write(tmp.path().join("POSCAR"), poscar).unwrap();
        let mut a = args(tmp.path(), PolicyKind::Midpoint, vec![0, 1]);
        a.atom = 2;

        execute(a).unwrap();
        let out = poscar::parse_poscar_file(&tmp.path().join("POSCAR.out")).unwrap();
        // x = 0 或其周期像 x = 10，都离原位置 0.5 Å
        let x = out.positions[2][0].rem_euclid(10.0);
        assert!(x < 1e-8 || (10.0 - x) < 1e-8);
    }
}
