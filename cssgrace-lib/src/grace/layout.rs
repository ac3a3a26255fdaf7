//! Removal of declarations made pointless by positioning or floating.

use crate::tree::{NodeId, Stylesheet};

fn is_out_of_flow(sheet: &Stylesheet, id: NodeId) -> bool {
    sheet
        .decl(id)
        .map(|decl| decl.prop == "position" && (decl.value == "absolute" || decl.value == "fixed"))
        .unwrap_or(false)
}

/// `position: absolute|fixed` and `float: <not none>` already make the box a
/// block, so a sibling `display: block` or `display: inline-block` is dropped.
pub fn remove_display(sheet: &mut Stylesheet, decl: NodeId) {
    let Some(parent) = sheet.parent(decl) else {
        return;
    };
    let floated = sheet
        .decl(decl)
        .map(|d| d.prop == "float" && d.value != "none")
        .unwrap_or(false);
    if !floated && !is_out_of_flow(sheet, decl) {
        return;
    }

    for neighbor in sheet.each(parent) {
        let redundant = sheet
            .decl(neighbor)
            .map(|d| d.is("display", "block") || d.is("display", "inline-block"))
            .unwrap_or(false);
        if redundant {
            log::debug!(
                "removing redundant `{}` implied by `{}`",
                sheet.decl(neighbor).map(|d| d.to_string()).unwrap_or_default(),
                sheet.decl(decl).map(|d| d.to_string()).unwrap_or_default()
            );
            sheet.remove(neighbor);
        }
    }
}

/// `position: absolute|fixed` overrides floating, so sibling `float`
/// declarations other than `float: none` are dropped.
pub fn remove_float(sheet: &mut Stylesheet, decl: NodeId) {
    let Some(parent) = sheet.parent(decl) else {
        return;
    };
    if !is_out_of_flow(sheet, decl) {
        return;
    }

    for neighbor in sheet.each(parent) {
        let floated = sheet
            .decl(neighbor)
            .map(|d| d.prop == "float" && d.value != "none")
            .unwrap_or(false);
        if floated {
            log::debug!("removing `float` overridden by absolute positioning");
            sheet.remove(neighbor);
        }
    }
}
