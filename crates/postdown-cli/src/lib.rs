//! Fetches Medium articles and writes them out as blog posts.
//!
//! [`Harvester`] drives one source at a time: fetch the page, convert the
//! `article` with [`postdown_medium`], download the queued images into
//! `<out>/blog/images/<date>/`, then write `<out>/blog/<date>-<slug>.md`.

mod driver;
mod fetch;
pub mod logging;
mod persist;
mod resolve;
mod settings;

pub use driver::{Harvester, HarvestSummary, SourceReport};
pub use fetch::{FailureKind, FetchError, FetchOutput, FetchSettings, Fetcher, ReqwestFetcher};
pub use persist::{ensure_output_dir, AtomicFileWriter, PersistError};
pub use resolve::{resolve_images, ImageOutcome, ImageResolutionError};
pub use settings::{HarvestSettings, BLOG_DIR, CHALLENGE_MARKER};

use postdown_medium::ArticleError;
use thiserror::Error;

/// Why a source produced no document
#[derive(Debug, Error)]
pub enum HarvestError {
    #[error("fetch failed: {0}")]
    Fetch(#[from] FetchError),

    #[error("{source_url} is rate limited, try again later")]
    SourceUnavailable { source_url: String },

    #[error(transparent)]
    Article(#[from] ArticleError),

    #[error("cannot write document: {0}")]
    Persist(#[from] PersistError),
}
