//! HTML parsing support.
//!
//! Parses HTML strings with `scraper` and copies the result into the owned
//! [`Node`] tree the converter walks.

use scraper::{ElementRef, Html, Node as ScraperNode, Selector};

use crate::node::Node;
use crate::{Result, TurndownError};

/// Parse an HTML fragment into a Node tree rooted at a synthetic `html` element.
///
/// # Example
///
/// ```rust
/// use postdown::{parse_html, TurndownService};
///
/// let node = parse_html("<h2>Hello <em>World</em></h2>");
///
/// let service = TurndownService::new();
/// let markdown = service.turndown(&node, &mut ()).unwrap();
/// assert!(markdown.contains("Hello _World_"));
/// ```
pub fn parse_html(html: &str) -> Node {
    let document = Html::parse_fragment(html);
    scraper_to_node(document.root_element())
}

/// Parse a full HTML document and return the first element matching `selector`.
///
/// Returns `Ok(None)` when nothing matches, and an error for an invalid selector.
pub fn parse_document_scoped(html: &str, selector: &str) -> Result<Option<Node>> {
    let selector = Selector::parse(selector)
        .map_err(|err| TurndownError::InvalidInput(format!("selector {selector:?}: {err}")))?;
    let document = Html::parse_document(html);
    Ok(document.select(&selector).next().map(scraper_to_node))
}

/// Convert a scraper ElementRef to our Node structure
fn scraper_to_node(element: ElementRef) -> Node {
    let tag = element.value().name();
    let attrs: Vec<(&str, &str)> = element.value().attrs().collect();
    let mut node = Node::element_with_attrs(tag, attrs);

    for child in element.children() {
        match child.value() {
            ScraperNode::Text(text) => {
                node.add_child(Node::text(&text.text));
            }
            ScraperNode::Element(_) => {
                if let Some(child_element) = ElementRef::wrap(child) {
                    node.add_child(scraper_to_node(child_element));
                }
            }
            _ => {}
        }
    }

    node
}
