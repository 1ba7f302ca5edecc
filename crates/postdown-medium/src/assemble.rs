//! Document assembly: frontmatter, slug and output naming.

use std::fmt;

use chrono::NaiveDate;
use url::Url;

use crate::config::{canonical_source, IMAGE_ROOT, TAGS};
use crate::state::ExtractionState;
use crate::ArticleError;

/// Directory placeholder for body images rendered before the publish date
/// was seen; replaced once the date is final.
const PENDING_DATE_DIR: &str = "{publish-date}";

const DATE_DIR_FORMAT: &str = "%Y-%m-%d";

/// Site path of an article image
pub fn asset_path(publish_date: Option<NaiveDate>, file: &str) -> String {
    match publish_date {
        Some(date) => format!("{IMAGE_ROOT}/{}/{file}", date.format(DATE_DIR_FORMAT)),
        None => format!("{IMAGE_ROOT}/{PENDING_DATE_DIR}/{file}"),
    }
}

/// Slug from the final path segment of an article URL, without Medium's
/// trailing content hash: `.../my-post-d8108ee11d46` -> `my-post`.
pub fn slug_from_url(source_url: &str) -> Result<String, ArticleError> {
    let invalid = || ArticleError::InvalidSourceUrl(source_url.to_string());

    let url = Url::parse(canonical_source(source_url)).map_err(|_| invalid())?;
    let segment = url
        .path_segments()
        .and_then(|segments| segments.filter(|s| !s.is_empty()).last())
        .ok_or_else(invalid)?;

    let parts: Vec<&str> = segment.split('-').collect();
    let slug = parts[..parts.len() - 1].join("-");
    if slug.is_empty() {
        return Err(invalid());
    }
    Ok(slug)
}

/// Metadata header of a converted article.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frontmatter {
    pub title: String,
    pub slug: String,
    pub authors: Vec<String>,
    /// Site path of the cover thumbnail
    pub cover_image: Option<String>,
    pub tags: Vec<String>,
}

/// YAML single-quoted scalar
fn quoted(value: &str) -> String {
    format!("'{}'", value.replace('\'', "''"))
}

impl fmt::Display for Frontmatter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let authors: Vec<String> = self.authors.iter().map(|a| quoted(a)).collect();
        writeln!(f, "---")?;
        writeln!(f, "title: {}", quoted(&self.title))?;
        writeln!(f, "slug: {}", quoted(&self.slug))?;
        writeln!(f, "authors: [{}]", authors.join(", "))?;
        writeln!(f, "cover_image: {}", quoted(self.cover_image.as_deref().unwrap_or_default()))?;
        writeln!(f, "tags: [{}]", self.tags.join(", "))?;
        write!(f, "---")
    }
}

/// A finished article, ready to be written out.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConvertedDocument {
    pub publish_date: NaiveDate,
    pub frontmatter: Frontmatter,
    pub body: String,
}

impl ConvertedDocument {
    /// `<yyyy-MM-dd>-<slug>.md`
    pub fn filename(&self) -> String {
        format!("{}-{}.md", self.asset_dir(), self.frontmatter.slug)
    }

    /// Date-named directory holding the article's images
    pub fn asset_dir(&self) -> String {
        self.publish_date.format(DATE_DIR_FORMAT).to_string()
    }

    /// Frontmatter and body joined by a single newline
    pub fn render(&self) -> String {
        format!("{}\n{}", self.frontmatter, self.body)
    }
}

/// Combine extraction results and the converted body into a document.
///
/// Fails when no publish date was captured: the date names both the output
/// file and the image directory, so there is nothing safe to fall back to.
pub fn assemble(
    state: &ExtractionState,
    body: &str,
    source_url: &str,
) -> Result<ConvertedDocument, ArticleError> {
    let publish_date = state
        .publish_date()
        .ok_or_else(|| ArticleError::MissingPublishDate {
            source_url: canonical_source(source_url).to_string(),
        })?;
    let slug = slug_from_url(source_url)?;

    let pending = format!("{IMAGE_ROOT}/{PENDING_DATE_DIR}/");
    let resolved = format!("{IMAGE_ROOT}/{}/", publish_date.format(DATE_DIR_FORMAT));
    let body = body.replace(&pending, &resolved);

    let frontmatter = Frontmatter {
        title: state.title().unwrap_or_default().to_string(),
        slug,
        authors: vec![state.author().unwrap_or_default().to_string()],
        cover_image: state
            .cover_image()
            .map(|file| asset_path(Some(publish_date), file)),
        tags: TAGS.iter().map(|tag| tag.to_string()).collect(),
    };

    Ok(ConvertedDocument {
        publish_date,
        frontmatter,
        body,
    })
}
