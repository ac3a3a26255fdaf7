/// Settings shared by the parser and the printer.
///
/// The rewrite rules never look at these; they only travel alongside the tree.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Options {
    /// Name of the stylesheet, used in syntax errors and log lines.
    pub filename: Option<String>,
}

impl Options {
    pub fn with_filename(filename: impl Into<String>) -> Self {
        Options {
            filename: Some(filename.into()),
        }
    }

    pub(crate) fn display_name(&self) -> &str {
        self.filename.as_deref().unwrap_or("<input css>")
    }
}
