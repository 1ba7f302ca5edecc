//! Article conversion: one walk over the article tree with fresh state.

use log::{debug, info, warn};
use postdown::{parse_document_scoped, Node, RuleWarning, TurndownService};

use crate::assemble::{assemble, ConvertedDocument};
use crate::config::{article_options, ConvertConfig, ARTICLE_SELECTOR};
use crate::rules::medium_rules;
use crate::state::{ArticleContext, ExtractionState, ImageTask};
use crate::ArticleError;

/// Output of a single article walk.
///
/// `body` may reference image files that only exist once `image_tasks` have
/// been resolved.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Conversion {
    pub body: String,
    pub state: ExtractionState,
    pub image_tasks: Vec<ImageTask>,
    pub warnings: Vec<RuleWarning>,
}

impl Conversion {
    /// Assemble the final document for the article this was converted from
    pub fn assemble(&self, source_url: &str) -> Result<ConvertedDocument, ArticleError> {
        assemble(&self.state, &self.body, source_url)
    }
}

/// Converter preconfigured with the article rules for one source.
pub struct ArticleConverter {
    service: TurndownService<ArticleContext>,
    config: ConvertConfig,
}

impl ArticleConverter {
    pub fn new(config: ConvertConfig) -> Self {
        let mut service = TurndownService::with_options(article_options());
        service.use_plugin(medium_rules(&config));
        Self { service, config }
    }

    pub fn config(&self) -> &ConvertConfig {
        &self.config
    }

    /// Walk an article tree. State and image queue start empty on every call.
    pub fn convert(&self, root: &Node) -> Result<Conversion, ArticleError> {
        let mut context = ArticleContext::default();
        let rendered = self.service.convert(root, &mut context)?;

        info!(
            "converted {}: {} chars, {} image tasks, {} warnings",
            self.config.source_url,
            rendered.markdown.len(),
            context.images.len(),
            rendered.warnings.len()
        );
        debug!("extracted {:?}", context.state);

        Ok(Conversion {
            body: rendered.markdown,
            state: context.state,
            image_tasks: context.images.into_tasks(),
            warnings: rendered.warnings,
        })
    }

    /// Parse a fetched page and convert its `article` element.
    ///
    /// A page without an article converts to an empty body; assembly will
    /// then reject it for lack of a publish date.
    pub fn convert_document(&self, html: &str) -> Result<Conversion, ArticleError> {
        let root = match parse_document_scoped(html, ARTICLE_SELECTOR)? {
            Some(root) => root,
            None => {
                warn!("no <{ARTICLE_SELECTOR}> in {}", self.config.source_url);
                Node::element(ARTICLE_SELECTOR)
            }
        };
        self.convert(&root)
    }
}

/// Convert an article tree with the given configuration
pub fn convert(root: &Node, config: &ConvertConfig) -> Result<Conversion, ArticleError> {
    ArticleConverter::new(config.clone()).convert(root)
}

#[cfg(test)]
mod tests {
    use super::*;

    const SOURCE: &str = "https://blog.nrwl.io/nx-release-abc123";

    fn article(title: &str) -> Node {
        Node::element("article")
            .with_child(Node::element("h1").with_text(title))
            .with_child(Node::element("p").with_text("Body"))
    }

    #[test]
    fn repeated_conversions_do_not_share_state() {
        let converter = ArticleConverter::new(ConvertConfig::new(SOURCE));
        let first = converter.convert(&article("First")).unwrap();
        let second = converter.convert(&article("Second")).unwrap();
        assert_eq!(first.state.title(), Some("First"));
        assert_eq!(second.state.title(), Some("Second"));
        assert_eq!(second.body, "Body");
    }

    #[test]
    fn document_is_scoped_to_article() {
        let html = "<html><body><h1>Site header</h1>\
                    <article><h1>Post</h1><p>Body</p></article>\
                    <footer><p>Footer</p></footer></body></html>";
        let conversion = convert_document(html);
        assert_eq!(conversion.state.title(), Some("Post"));
        assert_eq!(conversion.body, "Body");
    }

    #[test]
    fn page_without_article_has_empty_body() {
        let conversion = convert_document("<html><body><p>Just a page</p></body></html>");
        assert_eq!(conversion.body, "");
        assert!(conversion.assemble(SOURCE).is_err());
    }

    fn convert_document(html: &str) -> Conversion {
        ArticleConverter::new(ConvertConfig::new(SOURCE))
            .convert_document(html)
            .unwrap()
    }
}
