//! Formatting-preserving stylesheet parser.
//!
//! It uses the `cssparser` tokenizer and builds the tree defined in
//! `crate::tree`. Every block is read as a list of items: an item runs up to a
//! `;`, a `{` or the end of the block. Items that open a block become rules or
//! at-rules, the rest become declarations or statement at-rules. Whitespace is
//! kept in the node raws so the printer can write the text back unchanged.

use crate::error::{Error, Result};
use crate::options::Options;
use crate::tree::{
    AtRule, BlockRaws, Comment, Declaration, NodeId, NodeKind, RawValue, Rule, Stylesheet,
};
use cssparser::{ParseError, ParseErrorKind, Parser, ParserInput, SourceLocation, SourcePosition, Token};
use once_cell::sync::Lazy;
use regex::Regex;
use std::ops::Range;

static IMPORTANT_RE: Lazy<Regex> =
    Lazy::new(|| Regex::new(r"(?i)\s*!\s*important\s*$").expect("valid regex"));

type ItemResult<'i> = std::result::Result<(), ParseError<'i, String>>;

/// Parse stylesheet text into a mutable tree.
pub fn parse(css: &str, options: &Options) -> Result<Stylesheet> {
    let mut sheet = Stylesheet::new();
    let root = sheet.root();

    let mut input = ParserInput::new(css);
    let mut parser = Parser::new(&mut input);
    parse_block(&mut parser, &mut sheet, root).map_err(|err| syntax_error(err, options))?;

    log::trace!(
        "parsed {} into {} rules",
        options.display_name(),
        sheet.walk_rules(root).len()
    );
    Ok(sheet)
}

fn syntax_error(err: ParseError<'_, String>, options: &Options) -> Error {
    let message = match err.kind {
        ParseErrorKind::Custom(message) => message,
        ParseErrorKind::Basic(basic) => format!("{:?}", basic),
    };
    Error::Syntax {
        message,
        line: err.location.line + 1,
        column: err.location.column,
        filename: options.filename.clone(),
    }
}

fn custom_error<'i>(message: &str, location: SourceLocation) -> ParseError<'i, String> {
    ParseError {
        kind: ParseErrorKind::Custom(message.to_string()),
        location,
    }
}

/// Read the items of one block (or of the whole stylesheet) into `parent`.
fn parse_block<'i, 't>(
    parser: &mut Parser<'i, 't>,
    sheet: &mut Stylesheet,
    parent: NodeId,
) -> ItemResult<'i> {
    let mut before_start = parser.position();

    loop {
        let state = parser.state();
        let token_start = parser.position();
        let location = parser.current_source_location();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => break,
        };

        match token {
            Token::WhiteSpace(_) => {}
            // Stray semicolons between items carry nothing worth keeping.
            Token::Semicolon => before_start = parser.position(),
            Token::CloseCurlyBracket => return Err(custom_error("Unexpected }", location)),
            Token::Comment(text) => {
                let before = parser.slice(before_start..token_start).to_string();
                let comment = sheet.create(comment_node(text, before));
                sheet.append(parent, comment);
                before_start = parser.position();
            }
            _ => {
                parser.reset(&state);
                let before = parser.slice(before_start..token_start).to_string();
                parse_item(parser, sheet, parent, before)?;
                before_start = parser.position();
            }
        }
    }

    let after = parser.slice_from(before_start).to_string();
    match sheet.kind_mut(parent) {
        NodeKind::Root(raws) => raws.after = Some(after),
        NodeKind::Rule(rule) => rule.raws.after = Some(after),
        NodeKind::AtRule(at_rule) => at_rule.raws.after = Some(after),
        NodeKind::Decl(_) | NodeKind::Comment(_) => {}
    }
    Ok(())
}

fn comment_node(text: &str, before: String) -> Comment {
    let trimmed = text.trim();
    let mut comment = Comment::new(trimmed);
    if trimmed.is_empty() {
        comment.raws.left = Some(text.to_string());
        comment.raws.right = Some(String::new());
    } else {
        let left_len = text.len() - text.trim_start().len();
        let right_len = text.len() - text.trim_end().len();
        comment.raws.left = Some(text[..left_len].to_string());
        comment.raws.right = Some(text[text.len() - right_len..].to_string());
    }
    comment.raws.before = Some(before);
    comment
}

/// How an item ended.
enum Terminator {
    Semicolon,
    EndOfBlock,
}

/// Read one rule, at-rule or declaration starting at the current position.
fn parse_item<'i, 't>(
    parser: &mut Parser<'i, 't>,
    sheet: &mut Stylesheet,
    parent: NodeId,
    before: String,
) -> ItemResult<'i> {
    let item_start = parser.position();
    let item_location = parser.current_source_location();
    let mut significant_end = item_start;
    let mut end_state = parser.state();
    let mut at_keyword: Option<(String, SourcePosition)> = None;
    let mut colon: Option<SourcePosition> = None;
    let mut comments: Vec<Range<usize>> = Vec::new();

    loop {
        let token_start = parser.position();
        let location = parser.current_source_location();
        let token = match parser.next_including_whitespace_and_comments() {
            Ok(token) => token.clone(),
            Err(_) => {
                // Trailing whitespace belongs to the enclosing block.
                parser.reset(&end_state);
                let item = Item {
                    start: item_start,
                    end: significant_end,
                    terminator_start: significant_end,
                    location: item_location,
                    at_keyword,
                    colon,
                    comments,
                    before,
                };
                return finish_statement(parser, sheet, parent, item, Terminator::EndOfBlock);
            }
        };

        match token {
            Token::WhiteSpace(_) => continue,
            Token::AtKeyword(name) if token_start == item_start => {
                at_keyword = Some((name.as_ref().to_string(), parser.position()));
            }
            Token::Colon if colon.is_none() => colon = Some(token_start),
            Token::Comment(_) => {
                comments.push(token_start.byte_index()..parser.position().byte_index());
            }
            Token::Function(_) | Token::ParenthesisBlock | Token::SquareBracketBlock => {
                skip_block(parser)?;
            }
            Token::CloseCurlyBracket => return Err(custom_error("Unexpected }", location)),
            Token::Semicolon => {
                let item = Item {
                    start: item_start,
                    end: significant_end,
                    terminator_start: token_start,
                    location: item_location,
                    at_keyword,
                    colon,
                    comments,
                    before,
                };
                return finish_statement(parser, sheet, parent, item, Terminator::Semicolon);
            }
            Token::CurlyBracketBlock => {
                let prelude = parser.slice(item_start..significant_end);
                let between = parser.slice(significant_end..token_start).to_string();
                let raws = BlockRaws {
                    before: Some(before),
                    between: Some(between),
                    after: None,
                    semicolon: Some(false),
                };
                let node: NodeKind = match at_keyword {
                    Some((name, name_end)) => {
                        let mut at_rule = at_rule_node(parser, name, name_end, significant_end, true);
                        at_rule.raws = raws;
                        at_rule.into()
                    }
                    None => Rule {
                        selector: prelude.to_string(),
                        raws,
                    }
                    .into(),
                };
                let block = sheet.create(node);
                sheet.append(parent, block);

                let mut content_end = None;
                parser.parse_nested_block(|nested| {
                    let parsed = parse_block(nested, sheet, block);
                    content_end = Some(nested.position());
                    parsed
                })?;
                // An unclosed block runs to the end of input, possibly right after
                // the `}` of an inner block.
                let closed = content_end
                    .map(|end| parser.slice(end..parser.position()) == "}")
                    .unwrap_or(false);
                if !closed {
                    return Err(custom_error("Unclosed block", item_location));
                }
                return Ok(());
            }
            _ => {}
        }
        significant_end = parser.position();
        end_state = parser.state();
    }
}

/// Consume the rest of a `(`, `[` or function block so that the parser position
/// lands after its closing delimiter.
fn skip_block<'i, 't>(parser: &mut Parser<'i, 't>) -> ItemResult<'i> {
    parser.parse_nested_block(|nested| {
        while nested.next_including_whitespace_and_comments().is_ok() {}
        Ok(())
    })
}

/// Positions collected while scanning an item that did not open a block.
struct Item {
    start: SourcePosition,
    /// End of the last non-whitespace token.
    end: SourcePosition,
    terminator_start: SourcePosition,
    location: SourceLocation,
    at_keyword: Option<(String, SourcePosition)>,
    colon: Option<SourcePosition>,
    /// Byte ranges of the comments between tokens of the item.
    comments: Vec<Range<usize>>,
    before: String,
}

fn finish_statement<'i, 't>(
    parser: &mut Parser<'i, 't>,
    sheet: &mut Stylesheet,
    parent: NodeId,
    item: Item,
    terminator: Terminator,
) -> ItemResult<'i> {
    let node: NodeKind = if let Some((name, name_end)) = item.at_keyword {
        let mut at_rule = at_rule_node(parser, name, name_end, item.end, false);
        at_rule.raws.before = Some(item.before);
        at_rule.raws.between = Some(parser.slice(item.end..item.terminator_start).to_string());
        at_rule.into()
    } else if let Some(colon) = item.colon {
        // Whitespace before `;` is part of the declaration text.
        let offset = item.start.byte_index();
        let raw = parser.slice(item.start..item.terminator_start);
        let comments: Vec<Range<usize>> = item
            .comments
            .iter()
            .map(|range| range.start - offset..range.end - offset)
            .collect();
        declaration_node(raw, colon.byte_index() - offset, &comments, item.before).into()
    } else {
        return Err(custom_error("Unknown word", item.location));
    };

    let id = sheet.create(node);
    sheet.append(parent, id);

    let semicolon = matches!(terminator, Terminator::Semicolon);
    match sheet.kind_mut(parent) {
        NodeKind::Root(raws) => raws.semicolon = Some(semicolon),
        NodeKind::Rule(rule) => rule.raws.semicolon = Some(semicolon),
        NodeKind::AtRule(at_rule) => at_rule.raws.semicolon = Some(semicolon),
        NodeKind::Decl(_) | NodeKind::Comment(_) => {}
    }
    Ok(())
}

fn at_rule_node(
    parser: &Parser<'_, '_>,
    name: String,
    name_end: SourcePosition,
    params_end: SourcePosition,
    has_block: bool,
) -> AtRule {
    let raw_params = if params_end.byte_index() > name_end.byte_index() {
        parser.slice(name_end..params_end)
    } else {
        ""
    };
    let params = raw_params.trim_start();
    let mut at_rule = AtRule::new(name, params, has_block);
    at_rule.after_name = Some(raw_params[..raw_params.len() - params.len()].to_string());
    at_rule
}

/// Split `prop : value !important` text. `colon_at` is the byte offset of the
/// first top-level colon inside `raw`, `comments` the byte ranges of comments.
fn declaration_node(
    raw: &str,
    colon_at: usize,
    comments: &[Range<usize>],
    before: String,
) -> Declaration {
    let prop = raw[..colon_at].trim_end();
    let after_colon = &raw[colon_at + 1..];
    let value_start = raw.len() - after_colon.trim_start().len();

    let mut decl = Declaration::new(prop, "");
    decl.raws.before = Some(before);
    decl.raws.between = Some(raw[prop.len()..value_start].to_string());

    let mut value_end = raw.len();
    if let Some(found) = IMPORTANT_RE.find(&raw[value_start..]) {
        decl.important = true;
        decl.raws.important = Some(found.as_str().to_string());
        value_end = value_start + found.start();
    }

    let written = &raw[value_start..value_end];
    let mut clean = String::with_capacity(written.len());
    let mut at = value_start;
    for comment in comments
        .iter()
        .filter(|c| c.start >= value_start && c.end <= value_end)
    {
        clean.push_str(&raw[at..comment.start]);
        at = comment.end;
    }
    clean.push_str(&raw[at..value_end]);

    decl.value = clean.trim().to_string();
    if decl.value != written {
        decl.raws.value = Some(RawValue {
            value: decl.value.clone(),
            raw: written.to_string(),
        });
    }
    decl
}
