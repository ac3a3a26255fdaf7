use crate::tree::{Declaration, NodeId, Stylesheet};

/// Insert `decl` right after `anchor`.
///
/// A comment that follows `anchor` on the same line (its leading whitespace has
/// no `\n`) stays glued to `anchor`, so the new declaration goes after the
/// comment instead. Returns the new node, or `None` if `anchor` is detached.
pub fn insert_decl(sheet: &mut Stylesheet, anchor: NodeId, decl: Declaration) -> Option<NodeId> {
    if !sheet.is_attached(anchor) {
        log::debug!("skipping insert of `{}` after a detached node", decl);
        return None;
    }

    let target = match sheet.next(anchor) {
        Some(next) if is_same_line_comment(sheet, next) => next,
        _ => anchor,
    };
    let id = sheet.create(decl);
    sheet.insert_after(target, id);
    Some(id)
}

fn is_same_line_comment(sheet: &Stylesheet, id: NodeId) -> bool {
    sheet
        .comment(id)
        .map(|comment| !comment.raws.before.as_deref().unwrap_or("").contains('\n'))
        .unwrap_or(false)
}

/// The `before` raw a declaration derived from `trigger` should get: the
/// trigger's own, with repeated line breaks squeezed into one.
pub fn derived_before(sheet: &Stylesheet, trigger: NodeId) -> Option<String> {
    sheet
        .decl(trigger)
        .and_then(|decl| decl.raws.before.as_deref())
        .map(collapse_blank_lines)
}

/// Replace every run of identical line breaks (and the whitespace between them)
/// with a single line break, so blank lines in front of the trigger are not copied.
pub fn collapse_blank_lines(raw: &str) -> String {
    let mut out = String::with_capacity(raw.len());
    let mut rest = raw;

    while let Some(ch) = rest.chars().next() {
        let Some(line_break) = line_break_at(rest) else {
            out.push(ch);
            rest = &rest[ch.len_utf8()..];
            continue;
        };
        out.push_str(line_break);
        let tail = &rest[line_break.len()..];
        let run = &tail[..tail.len() - tail.trim_start().len()];
        rest = match run.rfind(line_break) {
            Some(at) => &tail[at + line_break.len()..],
            None => tail,
        };
    }
    out
}

fn line_break_at(text: &str) -> Option<&'static str> {
    if text.starts_with("\r\n") {
        Some("\r\n")
    } else if text.starts_with('\n') {
        Some("\n")
    } else if text.starts_with('\r') {
        Some("\r")
    } else {
        None
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::tree::{Comment, Rule};

    #[test]
    fn collapses_blank_lines() {
        assert_eq!(collapse_blank_lines("\n\n  "), "\n  ");
        assert_eq!(collapse_blank_lines("\n  \n    "), "\n    ");
        assert_eq!(collapse_blank_lines("\r\n\r\n\t"), "\r\n\t");
        assert_eq!(collapse_blank_lines("\n  "), "\n  ");
        assert_eq!(collapse_blank_lines(" "), " ");
        assert_eq!(collapse_blank_lines(""), "");
    }

    fn setup(after_anchor: Option<&str>) -> (Stylesheet, NodeId, NodeId) {
        let mut sheet = Stylesheet::new();
        let root = sheet.root();
        let rule = sheet.create(Rule::new("a"));
        sheet.append(root, rule);
        let anchor = sheet.create(Declaration::new("resize", "both"));
        sheet.append(rule, anchor);
        if let Some(before) = after_anchor {
            let mut comment = Comment::new("note");
            comment.raws.before = Some(before.to_string());
            let comment = sheet.create(comment);
            sheet.append(rule, comment);
        }
        let tail = sheet.create(Declaration::new("color", "red"));
        sheet.append(rule, tail);
        (sheet, rule, anchor)
    }

    fn layout(sheet: &Stylesheet, rule: NodeId) -> Vec<String> {
        sheet
            .children(rule)
            .iter()
            .map(|&id| match sheet.decl(id) {
                Some(decl) => decl.prop.clone(),
                None => "comment".to_string(),
            })
            .collect()
    }

    #[test]
    fn inserts_right_after_anchor() {
        let (mut sheet, rule, anchor) = setup(None);
        insert_decl(&mut sheet, anchor, Declaration::new("overflow", "auto"));
        assert_eq!(layout(&sheet, rule), ["resize", "overflow", "color"]);
    }

    #[test]
    fn same_line_comment_stays_with_anchor() {
        let (mut sheet, rule, anchor) = setup(Some(" "));
        insert_decl(&mut sheet, anchor, Declaration::new("overflow", "auto"));
        assert_eq!(layout(&sheet, rule), ["resize", "comment", "overflow", "color"]);
    }

    #[test]
    fn own_line_comment_is_not_skipped() {
        let (mut sheet, rule, anchor) = setup(Some("\n  "));
        insert_decl(&mut sheet, anchor, Declaration::new("overflow", "auto"));
        assert_eq!(layout(&sheet, rule), ["resize", "overflow", "comment", "color"]);
    }

    #[test]
    fn detached_anchor_is_a_no_op() {
        let (mut sheet, rule, anchor) = setup(None);
        sheet.remove(anchor);
        assert_eq!(
            insert_decl(&mut sheet, anchor, Declaration::new("overflow", "auto")),
            None
        );
        assert_eq!(layout(&sheet, rule), ["color"]);
    }
}
