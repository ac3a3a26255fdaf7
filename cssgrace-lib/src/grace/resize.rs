use super::insert::{derived_before, insert_decl};
use crate::tree::{Declaration, NodeId, Stylesheet};

/// `resize` only works on boxes whose `overflow` is not `visible`.
/// Adds `overflow: auto` when the rule does not set `overflow` itself.
pub fn resize_mixin(sheet: &mut Stylesheet, decl: NodeId) {
    let Some(parent) = sheet.parent(decl) else {
        return;
    };
    let resizable = sheet
        .decl(decl)
        .map(|d| d.prop == "resize" && d.value != "none")
        .unwrap_or(false);
    if !resizable {
        return;
    }

    let has_overflow = sheet
        .decls(parent)
        .into_iter()
        .any(|id| sheet.decl(id).map(|d| d.prop == "overflow").unwrap_or(false));
    if has_overflow {
        return;
    }

    let before = derived_before(sheet, decl);
    log::debug!("adding `overflow: auto` for `resize`");
    insert_decl(sheet, decl, Declaration::with_before("overflow", "auto", before));
}
