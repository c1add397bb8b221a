//! htree: compile markup templates into reusable instruction streams.
//!
//! A template arrives as its static segments plus the dynamic values that fill
//! the holes between them. Work is split in two phases:
//! - the parser scans the static segments once and emits a `Block`, an
//!   instruction stream that does not depend on any dynamic value;
//! - the tree builder interprets a `Block` with one set of dynamic values and
//!   produces `Node`s (or whatever an `ElementFactory` makes).
//!
//! Because the `Block` only depends on the static segments, callers can keep it
//! (or a `Template`, which wraps it) and build it again for every new set of
//! values.
//!
//! ```
//! use htree::{Child, Tag, Template};
//!
//! # fn main() -> htree::Result<()> {
//! let template = Template::new(&["<div class=\"a ", "\">", "</div>"]);
//! let built = template.build(&["b", "hello"])?;
//! let div = built.as_node().expect("one root element");
//! assert_eq!(div.tag, Tag::Name("div".into()));
//! assert!(div.attribute("class").is_some());
//! assert_eq!(div.children, vec![Child::Dynamic("hello")]);
//! # Ok(())
//! # }
//! ```

mod builder;
mod factory;
mod ir;
mod parser;
mod template;
mod trim;
mod types;

pub use builder::*;
pub use factory::*;
pub use ir::*;
pub use parser::*;
pub use template::*;
pub use trim::trim_line_breaks;
pub use types::*;

/// Unified error type for htree operations
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum HtreeError {
    #[error("Missing field: record refers to field {index}, only {available} values supplied")]
    MissingField { index: usize, available: usize },
    #[error("Spread properties record has no dynamic value")]
    LiteralSpread,
    #[error("Attribute '{0}' appended before it was set")]
    UnopenedAttribute(String),
    #[error("Arity mismatch: template has {expected} holes, got {found} dynamic values")]
    ArityMismatch { expected: usize, found: usize },
}

pub type Result<T, E = HtreeError> = std::result::Result<T, E>;
