//! # postdown
//!
//! Rule-based conversion of element trees to Markdown.
//!
//! This is a Rust take on [turndown](https://github.com/mixmark-io/turndown):
//! an ordered set of `(filter, replacement)` rules rewrites a tree, depth first,
//! into Markdown text. Two things differ from a plain converter:
//!
//! - **Traversal context**: every conversion is handed a `&mut C`. Replacement
//!   functions may read and write it (to capture metadata as a side effect),
//!   filters may not. The context is owned by the caller, so repeated or
//!   parallel conversions never share state.
//! - **Fallible replacements**: a replacement that fails contributes no text
//!   and is reported as a [`RuleWarning`]; the rest of the tree still converts.
//!
//! Custom rules take precedence over the built-in CommonMark rules, and a
//! custom rule added later takes precedence over one added earlier.
//!
//! ## Example
//!
//! ```rust
//! use postdown::{Filter, Node, Rule, TurndownService};
//!
//! let mut service: TurndownService<Option<String>> = TurndownService::new();
//! service.add_rule(
//!     "capture title",
//!     Rule::with_context(Filter::tag("h1"), |node, _, _, title: &mut Option<String>| {
//!         title.get_or_insert_with(|| node.text_content());
//!         Ok(String::new())
//!     }),
//! );
//!
//! let article = Node::element("article")
//!     .with_child(Node::element("h1").with_text("Hello"))
//!     .with_child(Node::element("p").with_text("World"));
//!
//! let mut title = None;
//! let markdown = service.turndown(&article, &mut title).unwrap();
//! assert_eq!(markdown, "World");
//! assert_eq!(title.as_deref(), Some("Hello"));
//! ```

#[cfg(feature = "html")]
pub mod html;
pub mod node;
mod rules;
mod service;
mod utilities;

#[cfg(feature = "html")]
pub use html::{parse_document_scoped, parse_html};
pub use node::{Node, NodeKind, NodeRef};
pub use rules::{Filter, PredicateFn, ReplacementFn, Rule, Rules};
pub use service::{
    CodeBlockStyle, HeadingStyle, LinkStyle, Rendered, RuleWarning, TurndownOptions,
    TurndownService,
};
pub use utilities::*;

/// Error type for turndown operations
#[derive(Debug, thiserror::Error)]
pub enum TurndownError {
    #[error("Conversion error: {0}")]
    ConversionError(String),

    #[error("Invalid input: {0}")]
    InvalidInput(String),
}

pub type Result<T> = std::result::Result<T, TurndownError>;
