//! # postdown-medium
//!
//! Converts a Medium article into a blog post: Markdown body, frontmatter
//! metadata, and a queue of images to download.
//!
//! The conversion is a single walk over the article tree. Rules registered on
//! a [`postdown::TurndownService`] render the body and, as a side effect,
//! capture the title (first `h1`), author (first link), publish date and
//! cover image (first picture figure) into an [`ExtractionState`]. Figures
//! queue [`ImageTask`]s rather than fetching anything; the caller resolves
//! them afterwards.
//!
//! ```rust
//! use postdown::Node;
//! use postdown_medium::{convert, ConvertConfig};
//!
//! let article = Node::element("article")
//!     .with_child(Node::element("h1").with_text("Nx 18"))
//!     .with_child(
//!         Node::element_with_attrs("span", vec![("data-testid", "storyPublishDate")])
//!             .with_text("Jan 5, 2024"),
//!     )
//!     .with_child(Node::element("p").with_text("Hello"));
//!
//! let source = "https://blog.nrwl.io/nx-18-d8108ee11d46";
//! let conversion = convert(&article, &ConvertConfig::new(source)).unwrap();
//! let document = conversion.assemble(source).unwrap();
//! assert_eq!(document.filename(), "2024-01-05-nx-18.md");
//! assert!(document.render().ends_with("---\nHello"));
//! ```

mod assemble;
pub mod classify;
pub mod config;
mod convert;
pub mod rules;
pub mod srcset;
mod state;

pub use assemble::{asset_path, assemble, slug_from_url, ConvertedDocument, Frontmatter};
pub use config::{canonical_source, ConvertConfig};
pub use convert::{convert, ArticleConverter, Conversion};
pub use state::{ArticleContext, ExtractionState, ImageQueue, ImageTask, ImageVariant};

use postdown::TurndownError;

/// Error type for article conversion and assembly
#[derive(Debug, thiserror::Error)]
pub enum ArticleError {
    #[error("no publish date captured for {source_url}")]
    MissingPublishDate { source_url: String },

    #[error("cannot derive a slug from {0:?}")]
    InvalidSourceUrl(String),

    #[error(transparent)]
    Engine(#[from] TurndownError),
}
