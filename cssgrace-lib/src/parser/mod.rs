pub mod css;

pub use css::parse;
