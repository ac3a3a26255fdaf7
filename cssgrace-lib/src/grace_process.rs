use crate::error::Result;
use crate::grace;
use crate::options::Options;
use crate::parser;
use crate::printer;
use crate::tree::Stylesheet;

pub mod css_grace {
    use super::*;

    /// Run every rewrite rule over every style rule in the stylesheet, including
    /// rules inside at-rules. Rules created along the way (the `:root`
    /// overrides) are not processed again.
    pub fn process_tree(sheet: &mut Stylesheet) {
        let rules = sheet.walk_rules(sheet.root());
        log::trace!("processing {} rules", rules.len());
        for rule in rules {
            if sheet.is_attached(rule) {
                grace::process_rule(sheet, rule);
            }
        }
    }

    /// Parse `css`, process it and print it back.
    pub fn transform(css: &str, options: &Options) -> Result<String> {
        let mut sheet = parser::parse(css, options)?;
        process_tree(&mut sheet);
        let output = printer::to_css(&sheet, options);
        log::info!(
            "processed {} ({} -> {} bytes)",
            options.display_name(),
            css.len(),
            output.len()
        );
        Ok(output)
    }
}

#[cfg(test)]
mod tests {
    use super::css_grace::*;
    use super::*;
    use pretty_assertions::assert_eq;

    #[test]
    fn processes_rules_inside_media_queries() {
        let css = "@media print {\n  .x {\n    opacity: 0.5;\n  }\n}\n";
        let output = transform(css, &Options::default()).unwrap();
        assert_eq!(
            output,
            "@media print {\n  .x {\n    opacity: 0.5;\n    filter: alpha(opacity=50);\n  }\n}\n"
        );
    }

    #[test]
    fn syntax_errors_surface() {
        assert!(transform("a { b }", &Options::default()).is_err());
    }

    #[test]
    fn process_tree_on_a_hand_built_sheet() {
        use crate::tree::{Declaration, Rule};

        let mut sheet = Stylesheet::new();
        let root = sheet.root();
        let rule = sheet.create(Rule::new("a::after"));
        sheet.append(root, rule);
        let decl = sheet.create(Declaration::new("display", "inline-block"));
        sheet.append(rule, decl);

        process_tree(&mut sheet);

        assert_eq!(
            printer::to_css(&sheet, &Options::default()),
            "a:after {\n  display: inline-block;\n  *zoom: 1;\n  *display: inline\n}"
        );
    }
}
