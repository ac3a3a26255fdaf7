use cssgrace_lib::{parser, printer, process_tree, transform, Options};

#[cfg(test)]
pub mod tests {
    use super::*;
    use pretty_assertions::assert_eq;

    fn grace(css: &str) -> String {
        let _ = env_logger::builder().is_test(true).try_init();
        match transform(css, &Options::default()) {
            Ok(output) => output,
            Err(err) => panic!("transform failed: {}", err),
        }
    }

    #[test]
    fn test_display_removed_by_position() {
        let css = ".a {\n  position: absolute;\n  display: block;\n}\n";
        assert_eq!(grace(css), ".a {\n  position: absolute;\n}\n");

        let css = ".a {\n  display: block;\n  position: absolute;\n}\n";
        assert_eq!(grace(css), ".a {\n  position: absolute;\n}\n");
    }

    #[test]
    fn test_float_removed_by_fixed_position() {
        let css = ".a {\n  position: fixed;\n  float: left;\n}\n";
        assert_eq!(grace(css), ".a {\n  position: fixed;\n}\n");
    }

    #[test]
    fn test_float_without_position_is_kept() {
        let css = ".a {\n  float: left;\n  display: block;\n}\n";
        assert_eq!(grace(css), ".a {\n  float: left;\n}\n");
    }

    #[test]
    fn test_pseudo_element_colons() {
        assert_eq!(grace("a::before { content: ''; }"), "a:before { content: ''; }");
        assert_eq!(grace("a:hover { color: red; }"), "a:hover { color: red; }");
    }

    #[test]
    fn test_resize_injection() {
        let css = "textarea {\n  resize: both;\n}";
        assert_eq!(grace(css), "textarea {\n  resize: both;\n  overflow: auto;\n}");

        let css = "textarea {\n  resize: both;\n  overflow: hidden;\n}";
        assert_eq!(grace(css), css);
    }

    #[test]
    fn test_opacity_hack() {
        let css = ".a {\n  opacity: 0.5;\n}";
        assert_eq!(grace(css), ".a {\n  opacity: 0.5;\n  filter: alpha(opacity=50);\n}");
    }

    #[test]
    fn test_rgba_hack() {
        let css = ".a {\n  background: rgba(255, 0, 0, 0.5);\n}\n";
        let expected = r".a {
  background: rgba(255, 0, 0, 0.5);
  filter: progid:DXImageTransform.Microsoft.gradient(startColorstr='#80ff0000', endColorstr='#80ff0000');
}
:root .a {
  filter: none\9;
}
";
        assert_eq!(grace(css), expected);
    }

    #[test]
    fn test_rgba_override_sits_right_after_its_rule() {
        let css = ".a {\n  background-color: rgba(0, 0, 0, 0.5);\n}\n\n.b {\n  color: red;\n}\n";
        let output = grace(css);
        let a = output.find(".a {").unwrap();
        let root = output.find(":root .a").unwrap();
        let b = output.find(".b {").unwrap();
        assert!(a < root && root < b, "unexpected order in {}", output);
    }

    #[test]
    fn test_inline_block_hack() {
        let css = ".x {\n  display: inline-block;\n}";
        assert_eq!(
            grace(css),
            ".x {\n  display: inline-block;\n  *zoom: 1;\n  *display: inline;\n}"
        );
    }

    #[test]
    fn test_insertion_after_same_line_comment() {
        let css = ".a {\n  resize: both; /* note */\n  color: red;\n}";
        assert_eq!(
            grace(css),
            ".a {\n  resize: both; /* note */\n  overflow: auto;\n  color: red;\n}"
        );
    }

    #[test]
    fn test_blank_lines_are_not_copied() {
        let css = ".a {\n  color: red;\n\n\n  opacity: 1;\n}";
        assert_eq!(
            grace(css),
            ".a {\n  color: red;\n\n\n  opacity: 1;\n  filter: alpha(opacity=100);\n}"
        );
    }

    #[test]
    fn test_malformed_values_degrade_silently() {
        let css = ".a { opacity: x; background: rgba(1, 2); }";
        assert_eq!(
            grace(css),
            ".a { opacity: x; filter: alpha(opacity=NaN); background: rgba(1, 2); }"
        );
    }

    #[test]
    fn test_important_values_still_match() {
        let css = ".a { position: absolute !important; display: block; }";
        assert_eq!(grace(css), ".a { position: absolute !important; }");
    }

    #[test]
    fn test_value_comments_do_not_hide_triggers() {
        let css = ".a { position: absolute /* x */; display: block; }";
        assert_eq!(grace(css), ".a { position: absolute /* x */; }");
    }

    #[test]
    fn test_whitespace_before_semicolon_is_kept() {
        let css = ".a { margin : 0 ; }";
        assert_eq!(grace(css), css);
    }

    #[test]
    fn test_at_rules_nested_in_a_rule() {
        let css = ".a { @media print { opacity: 0.5; } }";
        assert_eq!(
            grace(css),
            ".a { @media print { opacity: 0.5; filter: alpha(opacity=50); } }"
        );
    }

    #[test]
    fn test_nested_rules_are_processed_once() {
        let css = ".a { .b { opacity: 0.5; } }";
        assert_eq!(
            grace(css),
            ".a { .b { opacity: 0.5; filter: alpha(opacity=50); } }"
        );
    }

    #[test]
    fn test_unclosed_outer_block_is_an_error() {
        let err = transform("@media print{a{b:c}", &Options::default()).unwrap_err();
        assert!(err.to_string().contains("Unclosed block"), "{}", err);
    }

    #[test]
    fn test_second_run_duplicates_hacks() {
        let once = grace(".a { opacity: 0.5; }");
        let twice = grace(&once);
        assert_eq!(
            twice,
            ".a { opacity: 0.5; filter: alpha(opacity=50); filter: alpha(opacity=50); }"
        );
    }

    #[test]
    fn test_untouched_stylesheet_round_trips() {
        let css = "/* reset */\n@charset \"utf-8\";\n\nbody {\n  margin: 0;\n}\n\n@media (max-width: 600px) {\n  .nav > li { color: #333 }\n}\n";
        assert_eq!(grace(css), css);
    }

    #[test]
    fn test_process_tree_in_place() {
        let options = Options::with_filename("inline.css");
        let mut sheet = parser::parse(".a { display: inline-block; float: right; }", &options).unwrap();
        process_tree(&mut sheet);
        assert_eq!(
            printer::to_css(&sheet, &options),
            ".a { *zoom: 1; *display: inline; float: right; }"
        );
    }
}
