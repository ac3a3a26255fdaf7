use std::path::PathBuf;
use thiserror::Error;

pub type Result<T> = std::result::Result<T, Error>;

/// Errors raised at the edges of the engine. The rewrite rules themselves never fail.
#[derive(Debug, Error)]
pub enum Error {
    /// The stylesheet text could not be turned into a tree.
    #[error("{}:{line}:{column}: {message}", .filename.as_deref().unwrap_or("<input css>"))]
    Syntax {
        message: String,
        /// 1-based line.
        line: u32,
        /// 1-based column.
        column: u32,
        filename: Option<String>,
    },

    #[error("failed to access {}: {source}", .path.display())]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

impl Error {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Error::Io {
            path: path.into(),
            source,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn syntax_error_names_the_file() {
        let err = Error::Syntax {
            message: "Unknown word".to_string(),
            line: 3,
            column: 5,
            filename: Some("main.css".to_string()),
        };
        assert_eq!(err.to_string(), "main.css:3:5: Unknown word");
    }

    #[test]
    fn syntax_error_without_filename() {
        let err = Error::Syntax {
            message: "Unclosed block".to_string(),
            line: 1,
            column: 1,
            filename: None,
        };
        assert_eq!(err.to_string(), "<input css>:1:1: Unclosed block");
    }
}
