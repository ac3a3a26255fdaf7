//! Turns a [`Stylesheet`] back into text.
//!
//! Recorded raws are written back as they are. Nodes created by the rewrite rules
//! usually lack some of them, so the missing pieces are copied from whatever the
//! rest of the stylesheet does (first match wins), then from fixed defaults.

use crate::options::Options;
use crate::tree::{NodeId, NodeKind, Stylesheet};

/// Formatting used for nodes that carry no raws of their own.
#[derive(Debug, Clone, PartialEq, Eq)]
struct RawDefaults {
    decl_before: String,
    decl_between: String,
    rule_before: String,
    rule_between: String,
    rule_after: String,
    semicolon: bool,
}

impl RawDefaults {
    fn infer(sheet: &Stylesheet) -> Self {
        let root = sheet.root();
        let mut decl_before = None;
        let mut decl_between = None;
        let mut rule_before = None;
        let mut rule_between = None;
        let mut rule_after = None;
        let mut semicolon = None;

        let mut stack: Vec<NodeId> = sheet.children(root).iter().rev().copied().collect();
        while let Some(id) = stack.pop() {
            let first_in_root = sheet.parent(id) == Some(root) && sheet.index(id) == Some(0);
            match sheet.kind(id) {
                NodeKind::Decl(decl) => {
                    decl_before = decl_before.or_else(|| decl.raws.before.clone());
                    decl_between = decl_between.or_else(|| decl.raws.between.clone());
                }
                NodeKind::Rule(rule) => {
                    if !first_in_root {
                        rule_before = rule_before.or_else(|| rule.raws.before.clone());
                    }
                    rule_between = rule_between.or_else(|| rule.raws.between.clone());
                    if !sheet.children(id).is_empty() {
                        rule_after = rule_after.or_else(|| rule.raws.after.clone());
                        if !sheet.decls(id).is_empty() {
                            semicolon = semicolon.or(rule.raws.semicolon);
                        }
                    }
                }
                NodeKind::AtRule(at_rule) => {
                    if !first_in_root {
                        rule_before = rule_before.or_else(|| at_rule.raws.before.clone());
                    }
                }
                NodeKind::Root(_) | NodeKind::Comment(_) => {}
            }
            stack.extend(sheet.children(id).iter().rev().copied());
        }

        RawDefaults {
            decl_before: decl_before.unwrap_or_else(|| "\n  ".to_string()),
            decl_between: decl_between.unwrap_or_else(|| ": ".to_string()),
            rule_before: rule_before.unwrap_or_else(|| "\n".to_string()),
            rule_between: rule_between.unwrap_or_else(|| " ".to_string()),
            rule_after: rule_after.unwrap_or_else(|| "\n".to_string()),
            semicolon: semicolon.unwrap_or(false),
        }
    }
}

struct Printer<'a> {
    sheet: &'a Stylesheet,
    defaults: RawDefaults,
    out: String,
}

/// Serialize the whole stylesheet.
pub fn to_css(sheet: &Stylesheet, options: &Options) -> String {
    log::trace!("printing {}", options.display_name());
    let mut printer = Printer {
        sheet,
        defaults: RawDefaults::infer(sheet),
        out: String::new(),
    };
    let root = sheet.root();
    printer.body(root);
    if let NodeKind::Root(raws) = sheet.kind(root) {
        if let Some(after) = &raws.after {
            printer.out.push_str(after);
        }
    }
    printer.out
}

impl<'a> Printer<'a> {
    fn body(&mut self, parent: NodeId) {
        let sheet = self.sheet;
        let children = sheet.children(parent);
        let last = children
            .iter()
            .rposition(|&child| !sheet.kind(child).is_comment());
        let semicolon = self.container_semicolon(parent);

        for (i, &child) in children.iter().enumerate() {
            let before = self.before(parent, i, child);
            self.out.push_str(&before);
            self.node(child, Some(i) != last || semicolon);
        }
    }

    fn container_semicolon(&self, id: NodeId) -> bool {
        let recorded = match self.sheet.kind(id) {
            NodeKind::Root(raws) => raws.semicolon,
            NodeKind::Rule(rule) => rule.raws.semicolon,
            NodeKind::AtRule(at_rule) => at_rule.raws.semicolon,
            NodeKind::Decl(_) | NodeKind::Comment(_) => None,
        };
        recorded.unwrap_or(self.defaults.semicolon)
    }

    fn before(&self, parent: NodeId, index: usize, child: NodeId) -> String {
        let kind = self.sheet.kind(child);
        if let Some(before) = kind.before() {
            return before.to_string();
        }
        let at_root = parent == self.sheet.root();
        if at_root && index == 0 {
            return String::new();
        }
        match kind {
            NodeKind::Rule(_) | NodeKind::AtRule(_) | NodeKind::Comment(_) if at_root => {
                self.defaults.rule_before.clone()
            }
            _ => self.defaults.decl_before.clone(),
        }
    }

    fn node(&mut self, id: NodeId, semicolon: bool) {
        let sheet = self.sheet;
        match sheet.kind(id) {
            NodeKind::Root(_) => self.body(id),
            NodeKind::Decl(decl) => {
                self.out.push_str(&decl.prop);
                self.out.push_str(
                    decl.raws
                        .between
                        .as_deref()
                        .unwrap_or(&self.defaults.decl_between),
                );
                let value = match &decl.raws.value {
                    Some(raw) if raw.value == decl.value => raw.raw.as_str(),
                    _ => decl.value.as_str(),
                };
                self.out.push_str(value);
                if decl.important {
                    self.out
                        .push_str(decl.raws.important.as_deref().unwrap_or(" !important"));
                }
                if semicolon {
                    self.out.push(';');
                }
            }
            NodeKind::Comment(comment) => {
                self.out.push_str("/*");
                self.out.push_str(comment.raws.left.as_deref().unwrap_or(" "));
                self.out.push_str(&comment.text);
                self.out.push_str(comment.raws.right.as_deref().unwrap_or(" "));
                self.out.push_str("*/");
            }
            NodeKind::Rule(rule) => {
                self.out.push_str(&rule.selector);
                self.block(
                    id,
                    rule.raws.between.as_deref(),
                    rule.raws.after.as_deref(),
                );
            }
            NodeKind::AtRule(at_rule) => {
                self.out.push('@');
                self.out.push_str(&at_rule.name);
                if !at_rule.params.is_empty() {
                    self.out
                        .push_str(at_rule.after_name.as_deref().unwrap_or(" "));
                    self.out.push_str(&at_rule.params);
                } else if let Some(after_name) = &at_rule.after_name {
                    self.out.push_str(after_name);
                }
                if at_rule.has_block {
                    self.block(
                        id,
                        at_rule.raws.between.as_deref(),
                        at_rule.raws.after.as_deref(),
                    );
                } else {
                    self.out
                        .push_str(at_rule.raws.between.as_deref().unwrap_or(""));
                    if semicolon {
                        self.out.push(';');
                    }
                }
            }
        }
    }

    fn block(&mut self, id: NodeId, between: Option<&str>, after: Option<&str>) {
        let between = between.unwrap_or(&self.defaults.rule_between).to_string();
        self.out.push_str(&between);
        self.out.push('{');
        self.body(id);
        let after = match after {
            Some(after) => after.to_string(),
            None if self.sheet.children(id).is_empty() => String::new(),
            None => self.defaults.rule_after.clone(),
        };
        self.out.push_str(&after);
        self.out.push('}');
    }
}
