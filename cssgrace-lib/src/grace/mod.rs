//! The rewrite rules and the order they run in.
//!
//! Every rule takes the tree and one node id and mutates the tree in place. Rules
//! never fail: when a node does not match, nothing happens. Walks run over a
//! snapshot of ids taken when the walk starts; ids detached along the way are
//! skipped, and nodes inserted along the way are not visited by that walk.

pub mod ie_hacks;
pub mod insert;
pub mod layout;
pub mod resize;
pub mod selector;

pub use insert::insert_decl;

use crate::tree::{NodeId, Stylesheet};

/// Apply every rule to one style rule.
pub fn process_rule(sheet: &mut Stylesheet, rule: NodeId) {
    if sheet.rule(rule).is_none() {
        return;
    }
    log::trace!(
        "processing `{}`",
        sheet.rule(rule).map(|r| r.selector.as_str()).unwrap_or_default()
    );

    selector::remove_colons(sheet, rule);

    for decl in sheet.rule_decls(rule) {
        if !sheet.is_attached(decl) {
            continue;
        }
        layout::remove_display(sheet, decl);
        ie_hacks::inline_block_hack(sheet, decl);
        ie_hacks::opacity_hack(sheet, decl);
        ie_hacks::rgba_hack(sheet, decl);
        resize::resize_mixin(sheet, decl);
    }

    // Second pass sees the final declaration list, including hack output.
    for decl in sheet.rule_decls(rule) {
        if !sheet.is_attached(decl) {
            continue;
        }
        layout::remove_float(sheet, decl);
        layout::remove_display(sheet, decl);
    }
}
