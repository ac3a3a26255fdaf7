use crate::tree::{NodeId, Stylesheet};
use once_cell::sync::Lazy;
use regex::Regex;

static PSEUDO_ELEMENT_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(r"(?i)::(before|after|first-line|first-letter)").expect("valid regex")
});

/// Old browsers only understand the single-colon spelling of the CSS2 pseudo-elements.
/// When the selector uses one of them, every `::` in it becomes `:`.
pub fn remove_colons(sheet: &mut Stylesheet, rule: NodeId) {
    let Some(rule) = sheet.rule_mut(rule) else {
        return;
    };
    if PSEUDO_ELEMENT_RE.is_match(&rule.selector) {
        let selector = rule.selector.replace("::", ":");
        log::debug!("rewriting selector `{}` to `{}`", rule.selector, selector);
        rule.selector = selector;
    }
}
