//! Conversion settings.
//!
//! The blog deployment fixes most knobs at compile time; only the source URL
//! and the image CDN base vary per conversion.

use postdown::{CodeBlockStyle, HeadingStyle, LinkStyle, TurndownOptions};

/// Root of the published image tree; each article gets `<root>/<yyyy-MM-dd>/`.
pub const IMAGE_ROOT: &str = "/blog/images";

/// Tags applied to every converted article.
pub const TAGS: &[&str] = &["nx", "release"];

/// Origin that site-relative links are resolved against.
pub const MEDIUM_ORIGIN: &str = "https://medium.com";

/// Default Medium image CDN base.
pub const IMAGE_CDN: &str = "https://miro.medium.com/v2";

/// Transcoding path segment for the cover thumbnail.
pub const COVER_RESIZE: &str = "resize:fit:1200";

/// Selector for the article container the walk is scoped to.
pub const ARTICLE_SELECTOR: &str = "article";

/// `data-testid` carried by the publish-date span.
pub const PUBLISH_DATE_TESTID: &str = "storyPublishDate";

/// Publish date as displayed, e.g. `Jan 5, 2024`.
pub const PUBLISH_DATE_FORMAT: &str = "%b %d, %Y";

/// Suffix of the blurred placeholder images Medium inlines before lazy loading.
pub const TRACKING_PIXEL_SUFFIX: &str = "?q=20";

/// Substrings that mark a code block as a shell session.
pub const SHELL_TOKENS: &[&str] = &["npx", "yarn", "pnpm"];

#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertConfig {
    /// Canonical article URL (query and fragment stripped)
    pub source_url: String,
    /// Base URL image tasks are fetched from
    pub image_cdn: String,
}

impl ConvertConfig {
    pub fn new(source_url: &str) -> Self {
        Self {
            source_url: canonical_source(source_url).to_string(),
            image_cdn: IMAGE_CDN.to_string(),
        }
    }

    pub fn with_image_cdn(mut self, image_cdn: &str) -> Self {
        self.image_cdn = image_cdn.trim_end_matches('/').to_string();
        self
    }
}

/// Strip query string and fragment from an article URL
pub fn canonical_source(url: &str) -> &str {
    let end = url.find(['?', '#']).unwrap_or(url.len());
    &url[..end]
}

/// Engine options for article conversion: ATX headings, inlined links,
/// fenced code.
pub fn article_options() -> TurndownOptions {
    TurndownOptions {
        heading_style: HeadingStyle::Atx,
        link_style: LinkStyle::Inlined,
        code_block_style: CodeBlockStyle::Fenced,
        ..TurndownOptions::default()
    }
}
