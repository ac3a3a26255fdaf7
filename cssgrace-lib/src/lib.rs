//! CSS compatibility post-processor.
//!
//! Rewrites a stylesheet so it behaves in old Internet Explorer and drops
//! declarations that other declarations already imply:
//!
//! ```
//! use cssgrace_lib::{transform, Options};
//!
//! let css = transform(".x { opacity: 0.5; }", &Options::default()).unwrap();
//! assert_eq!(css, ".x { opacity: 0.5; filter: alpha(opacity=50); }");
//! ```

pub mod error;
pub mod grace;
pub mod grace_process;
pub mod options;
pub mod parser;
pub mod printer;
pub mod tree;

pub use error::{Error, Result};
pub use grace_process::css_grace::{process_tree, transform};
pub use options::Options;
pub use tree::{NodeId, Stylesheet};
