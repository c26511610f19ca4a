// Tue Jan 16 2026 - Alex

//! Reference hierarchy recovered from a decompiler dump:
//!
//! `MtObject` (vtable) -> `cSetInfo` -> `cSetInfoCoord` (aligned 8) ->
//! `cSetInfoOm` -> `cSetInfoOmBreakTarget` (aligned 8), with `MyDTI`
//! descriptor records on `cSetInfo` and `cSetInfoOmBreakTarget`.

use crate::config::LayoutConfig;
use crate::structure::{ClassDecl, ClassGraph, LayoutError, TypeCatalog};
use std::sync::Arc;

pub const SAMPLE_ROOT: &str = "MtObject";
pub const SAMPLE_LEAF: &str = "cSetInfoOmBreakTarget";

pub fn sample_catalog(pointer_size: u64) -> Result<TypeCatalog, LayoutError> {
    let mut catalog = TypeCatalog::with_primitives(pointer_size)?;
    catalog.register("MtString", pointer_size, pointer_size)?;
    catalog.register_composite("MtFloat3", &[("x", "f32"), ("y", "f32"), ("z", "f32")], None)?;
    Ok(catalog)
}

pub fn sample_decls() -> Vec<ClassDecl> {
    vec![
        ClassDecl::new("MtObject").with_vtable(),
        ClassDecl::new("cSetInfo")
            .with_base("MtObject")
            .with_descriptor("MyDTI", Some("MtDTI")),
        ClassDecl::new("cSetInfoCoord")
            .with_base("cSetInfo")
            .aligned(8)
            .fields([
                ("mName", "MtString"),
                ("mPosition", "MtFloat3"),
                ("mAngle", "MtFloat3"),
                ("mScale", "MtFloat3"),
                ("mUnitID", "s32"),
                ("mAreaHitNo", "s32"),
                ("mVersion", "u32"),
                ("mTblIndex", "s32"),
            ]),
        ClassDecl::new("cSetInfoOm").with_base("cSetInfoCoord").fields([
            ("mDisableEffect", "bool"),
            ("mDisableOnlyEffect", "bool"),
            ("mOpenFlag", "bool"),
            ("mEnableSyncLight", "bool"),
            ("mEnableZone", "bool"),
            ("mInitMtnNo", "u32"),
            ("mAreaMasterNo", "u32"),
            ("mAreaReleaseNo", "u16"),
            ("mAreaReleaseON", "bool"),
            ("mAreaReleaseOFF", "bool"),
            ("mWarpPointId", "u32"),
            ("mKeyNo", "u32"),
            ("mIsBreakLink", "bool"),
            ("mIsBreakQuest", "bool"),
            ("mBreakKind", "u16"),
            ("mBreakGroup", "u16"),
            ("mBreakID", "u16"),
            ("mQuestFlag", "u32"),
            ("mIsNoSbc", "bool"),
            ("mIsMyQuest", "bool"),
        ]),
        ClassDecl::new("cSetInfoOmBreakTarget")
            .with_base("cSetInfoOm")
            .aligned(8)
            .field("mBreakHitNum", "u32")
            .with_descriptor("MyDTI", Some("MtDTI")),
    ]
}

pub fn sample_graph(config: &LayoutConfig) -> Result<ClassGraph, LayoutError> {
    let catalog = sample_catalog(config.pointer_size)?;
    let mut graph = ClassGraph::new(Arc::new(catalog));
    for decl in sample_decls() {
        graph.add_class(decl)?;
    }
    Ok(graph)
}
