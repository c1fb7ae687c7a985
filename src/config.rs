//! # 静态配置表
//!
//! 按元素给出 MAGMOM / LDAUL / LDAUU 默认值，以及写 INCAR 时的
//! 分组顺序。分组只影响输出排版。
//!
//! ## 依赖关系
//! - 被 `parsers/incar.rs`（分组写出）和 `commands/seed.rs`（默认值）使用

/// 按元素查表的 INCAR 标签
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SpeciesTag {
    Ldaul,
    Ldauu,
    Magmom,
}

impl SpeciesTag {
    pub fn name(&self) -> &'static str {
        match self {
            SpeciesTag::Ldaul => "LDAUL",
            SpeciesTag::Ldauu => "LDAUU",
            SpeciesTag::Magmom => "MAGMOM",
        }
    }
}

const LDAUL: &[(&str, f64)] = &[
    ("Fe", 2.0),
    ("Co", 2.0),
    ("Ni", 2.0),
    ("Cu", 2.0),
    ("Mn", 2.0),
    ("Ti", 2.0),
    ("Cr", 2.0),
    ("V", 2.0),
    ("Sc", 2.0),
    ("Zn", 2.0),
    ("Ru", 2.0),
];

const LDAUU: &[(&str, f64)] = &[
    ("Fe", 4.09),
    ("Co", 4.26),
    ("Ni", 2.277),
    ("Cu", 5.0),
    ("Mn", 1.844),
    ("Ti", 3.5),
    ("Cr", 3.24),
    ("V", 2.5),
    ("Sc", 3.0),
    ("Zn", 0.0),
    ("Ru", 3.0),
];

const MAGMOM: &[(&str, f64)] = &[
    ("Sc", 1.0),
    ("Ti", 2.0),
    ("V", 3.0),
    ("Cr", 4.0),
    ("Mn", 5.0),
    ("Fe", 4.0),
    ("Co", 3.0),
    ("Ni", 2.0),
    ("Cu", 1.0),
    ("Zn", 0.0),
    ("Ru", 0.0),
];

/// 查询元素默认值，表中没有的元素返回 `default`
pub fn species_default(tag: SpeciesTag, element: &str) -> f64 {
    let (table, default) = match tag {
        SpeciesTag::Ldaul => (LDAUL, -1.0),
        SpeciesTag::Ldauu => (LDAUU, 0.0),
        SpeciesTag::Magmom => (MAGMOM, 0.0),
    };
    table
        .iter()
        .find(|(el, _)| *el == element)
        .map(|(_, v)| *v)
        .unwrap_or(default)
}

/// INCAR 分组布局：(组名, 标签列表)，按输出顺序排列
pub const INCAR_LAYOUT: &[(&str, &[&str])] = &[
    ("SYSTEM", &["SYSTEM"]),
    (
        "ALGORITHM - GENERAL",
        &[
            "NPAR", "NSIM", "NCORE", "KPAR", "LREAL", "IDIPOL", "LDIPOL", "LPLANE",
        ],
    ),
    (
        "ALGORITHM - ELECTRONIC",
        &[
            "GGA", "METAGGA", "ALGO", "IALGO", "PREC", "ENCUT", "NELMIN", "NELM", "NELMDL",
            "EDIFF", "NELECT", "WEIMIN", "ADDGRID",
        ],
    ),
    (
        "ELECTRONIC STRUCTURE",
        &["ISPIN", "MAGMOM", "NUPDOWN", "NBANDS", "ISMEAR", "SIGMA"],
    ),
    (
        "DFT+U",
        &[
            "LDAU", "LDAUTYPE", "LDAUL", "LDAUU", "LDAUJ", "LMAXMIX", "LDAUPRINT",
        ],
    ),
    ("HSE", &["LHFCALC", "HFSCREEN", "PRECFOCK", "AEXX", "NKRED"]),
    (
        "ALGORITHM - IONIC",
        &["IBRION", "NSW", "POTIM", "EDIFFG", "ISIF", "ISYM"],
    ),
    ("INPUT", &["ISTART", "ICHARG", "KSPACING"]),
    (
        "OUTPUT",
        &[
            "NWRITE", "LORBIT", "LAECHG", "LWAVE", "LCHARG", "LVTOT", "LOPTICS", "LVHAR", "LPEAD",
        ],
    ),
    ("NEB", &["IMAGES", "SPRING"]),
    ("VTST", &["ICHAIN", "IOPT", "LCLIMB", "LNEBCELL"]),
    // 必须放在最后
    (
        "SETUP",
        &[
            "REQUIRE",
            "AUTO_TIME",
            "AUTO_NODES",
            "AUTO_MEM",
            "AUTO_GAMMA",
            "AUTO_CORES",
            "AUTO_QUEUE",
            "STAGE_NUMBER",
            "STAGE_NAME",
            "STAGE_FILE",
        ],
    ),
];

/// 不属于任何分组的标签归入此组，位于 SETUP 之前
pub const OTHER_GROUP: &str = "OTHER";

/// 标签所在的分组名
pub fn group_of(tag: &str) -> Option<&'static str> {
    INCAR_LAYOUT
        .iter()
        .find(|(_, tags)| tags.contains(&tag))
        .map(|(name, _)| *name)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_species_defaults() {
        assert_eq!(species_default(SpeciesTag::Ldauu, "Fe"), 4.09);
        assert_eq!(species_default(SpeciesTag::Ldaul, "Ni"), 2.0);
        assert_eq!(species_default(SpeciesTag::Magmom, "Mn"), 5.0);
    }

    #[test]
    fn test_species_fallback() {
        assert_eq!(species_default(SpeciesTag::Ldaul, "O"), -1.0);
        assert_eq!(species_default(SpeciesTag::Ldauu, "O"), 0.0);
        assert_eq!(species_default(SpeciesTag::Magmom, "H"), 0.0);
    }

    #[test]
    fn test_setup_group_is_last() {
        assert_eq!(INCAR_LAYOUT.last().map(|(n, _)| *n), Some("SETUP"));
        assert_eq!(group_of("NELECT"), Some("ALGORITHM - ELECTRONIC"));
        assert_eq!(group_of("FOO"), None);
    }
}
