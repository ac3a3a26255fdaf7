//! Hacks for old Internet Explorer: opacity, rgba backgrounds and inline-block.

use super::insert::{derived_before, insert_decl};
use crate::tree::{Declaration, NodeId, Rule, Stylesheet};
use once_cell::sync::Lazy;
use regex::{Captures, Regex};

static RGBA_RE: Lazy<Regex> = Lazy::new(|| {
    Regex::new(
        r"(?i)rgba\(\s*(?P<r>[0-9]{1,3})\s*,\s*(?P<g>[0-9]{1,3})\s*,\s*(?P<b>[0-9]{1,3})\s*,\s*(?P<a>[0-9.]+\s*)",
    )
    .expect("valid regex")
});

/// `filter: alpha(opacity=N)` next to every `opacity`.
pub fn opacity_hack(sheet: &mut Stylesheet, decl: NodeId) {
    let Some(value) = sheet
        .decl(decl)
        .filter(|d| d.prop == "opacity")
        .map(|d| d.value.clone())
    else {
        return;
    };

    let amount = js_round(to_number(&value) * 100.0);
    let filter = format!("alpha(opacity={})", format_number(amount));
    log::debug!("adding `filter: {}` for `opacity: {}`", filter, value);

    let before = derived_before(sheet, decl);
    insert_decl(sheet, decl, Declaration::with_before("filter", filter, before));
}

/// Channels of the first `rgba(...)` found in a value.
#[derive(Debug, Clone, PartialEq)]
struct Rgba {
    red: u32,
    green: u32,
    blue: u32,
    alpha: f64,
}

impl Rgba {
    fn find(value: &str) -> Option<Self> {
        RGBA_RE.captures(value).map(|caps: Captures<'_>| {
            let channel = |name: &str| caps[name].parse::<u32>().unwrap_or(0);
            Rgba {
                red: channel("r"),
                green: channel("g"),
                blue: channel("b"),
                alpha: to_number(&caps["a"]),
            }
        })
    }

    /// `#AARRGGBB`, as the Microsoft gradient filter expects it.
    fn to_argb(&self) -> String {
        let alpha = js_round(self.alpha * 255.0);
        let alpha = if alpha.is_finite() {
            pad(format!("{:x}", alpha as i64))
        } else {
            format_number(alpha)
        };
        format!(
            "#{}{}{}{}",
            alpha,
            pad(format!("{:x}", self.red)),
            pad(format!("{:x}", self.green)),
            pad(format!("{:x}", self.blue))
        )
    }
}

/// Semi-transparent backgrounds become a gradient filter for old IE. IE9 knows both
/// rgba and filters, so a `:root` rule placed right after the original switches
/// the filter off again for browsers that understand `:root`.
pub fn rgba_hack(sheet: &mut Stylesheet, decl: NodeId) {
    let Some(parent) = sheet.parent(decl) else {
        return;
    };
    let Some(rgba) = sheet
        .decl(decl)
        .filter(|d| d.prop == "background" || d.prop == "background-color")
        .and_then(|d| Rgba::find(&d.value))
    else {
        return;
    };

    let argb = rgba.to_argb();
    let filter = format!(
        "progid:DXImageTransform.Microsoft.gradient(startColorstr='{0}', endColorstr='{0}')",
        argb
    );
    log::debug!("adding gradient filter {} for {:?}", argb, rgba);
    let before = derived_before(sheet, decl);
    insert_decl(sheet, decl, Declaration::with_before("filter", filter, before));

    let Some(selector) = sheet.rule(parent).map(|rule| rule.selector.clone()) else {
        log::debug!("rgba background outside a style rule, no :root override");
        return;
    };
    let root_rule = sheet.create(Rule::new(format!(":root {}", selector)));
    sheet.insert_after(parent, root_rule);
    let reset = sheet.create(Declaration::new("filter", r"none\9"));
    sheet.append(root_rule, reset);
}

/// IE6/7 only give `inline-block` to elements with layout:
/// `*zoom: 1` and `*display: inline` follow the trigger, in that order.
pub fn inline_block_hack(sheet: &mut Stylesheet, decl: NodeId) {
    let inline_block = sheet
        .decl(decl)
        .map(|d| d.is("display", "inline-block"))
        .unwrap_or(false);
    if !inline_block {
        return;
    }

    let before = derived_before(sheet, decl);
    log::debug!("adding hasLayout hack for `display: inline-block`");
    let Some(zoom) = insert_decl(
        sheet,
        decl,
        Declaration::with_before("*zoom", "1", before.clone()),
    ) else {
        return;
    };
    insert_decl(
        sheet,
        zoom,
        Declaration::with_before("*display", "inline", before),
    );
}

/// Loose string to number conversion: surrounding whitespace is ignored, an empty
/// string is zero, anything unparsable is NaN.
fn to_number(raw: &str) -> f64 {
    let text = raw.trim();
    if text.is_empty() {
        return 0.0;
    }
    let unsigned = text
        .strip_prefix(|c: char| c == '+' || c == '-')
        .unwrap_or(text);
    if unsigned == "Infinity" {
        return if text.starts_with('-') {
            f64::NEG_INFINITY
        } else {
            f64::INFINITY
        };
    }
    // Rust would also accept "inf" and "nan".
    if unsigned.starts_with(|c: char| c.is_ascii_alphabetic()) {
        return f64::NAN;
    }
    text.parse::<f64>().unwrap_or(f64::NAN)
}

/// Round half up, towards positive infinity.
fn js_round(value: f64) -> f64 {
    (value + 0.5).floor()
}

/// Print a rounded number the way a browser would: plain digits below `1e21`,
/// exponent notation from there on.
fn format_number(value: f64) -> String {
    if value.is_nan() {
        return "NaN".to_string();
    } else if value == f64::INFINITY {
        return "Infinity".to_string();
    } else if value == f64::NEG_INFINITY {
        return "-Infinity".to_string();
    } else if value == 0.0 {
        return "0".to_string();
    }

    let sign = if value < 0.0 { "-" } else { "" };
    let scientific = format!("{:e}", value.abs());
    let Some((mantissa, exponent)) = scientific.split_once('e') else {
        return value.to_string();
    };
    let exponent: i32 = exponent.parse().unwrap_or(0);
    if exponent >= 21 {
        return format!("{}{}e+{}", sign, mantissa, exponent);
    }

    let digits: String = mantissa.chars().filter(|c| *c != '.').collect();
    if exponent < 0 || digits.len() > exponent as usize + 1 {
        return value.to_string();
    }
    format!("{}{:0<width$}", sign, digits, width = exponent as usize + 1)
}

/// Left-pad a one-digit hex channel with `0`.
fn pad(hex: String) -> String {
    if hex.len() == 1 {
        format!("0{}", hex)
    } else {
        hex
    }
}
