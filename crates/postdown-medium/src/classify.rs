//! Node classifiers.
//!
//! Every function here is a pure predicate over a node and, where relevant,
//! the engine options. None of them depend on traversal order or on what has
//! been extracted so far; that logic lives in the rule replacements.

use postdown::{LinkStyle, Node, NodeRef, TurndownOptions};

use crate::config::{PUBLISH_DATE_TESTID, SHELL_TOKENS, TRACKING_PIXEL_SUFFIX};

/// Hyperlink with a non-blank target, rendered inline
pub fn is_resolvable_link(tag: &str, node: &NodeRef, options: &TurndownOptions) -> bool {
    tag == "a"
        && options.link_style == LinkStyle::Inlined
        && node.attr("href").is_some_and(|href| !href.trim().is_empty())
}

/// Blurred placeholder image that Medium swaps out client side
pub fn is_tracking_pixel(tag: &str, node: &NodeRef) -> bool {
    tag == "img"
        && node
            .attr("src")
            .is_some_and(|src| src.ends_with(TRACKING_PIXEL_SUFFIX))
}

/// Medium marks up section headings as `h1`
pub fn is_section_heading(tag: &str) -> bool {
    tag == "h1"
}

/// ...and subsections as `h2`
pub fn is_subsection_heading(tag: &str) -> bool {
    tag == "h2"
}

pub fn is_code_block(tag: &str) -> bool {
    tag == "pre"
}

pub fn is_figure(tag: &str) -> bool {
    tag == "figure"
}

/// "Follow" call-to-action link next to the byline
pub fn is_follow_link(tag: &str, node: &NodeRef) -> bool {
    tag == "a" && node.text_content().contains("Follow")
}

/// Byline separators and the "Published in <publication>" label
pub fn is_byline_separator(tag: &str, node: &NodeRef) -> bool {
    if tag != "span" {
        return false;
    }
    let text = node.text_content();
    let text = text.trim();
    text == "--" || text == "·" || text.contains("Published in")
}

pub fn is_interactive_button(tag: &str) -> bool {
    tag == "button"
}

/// Identified by its test id, not by its visible text
pub fn is_publish_date_marker(tag: &str, node: &NodeRef) -> bool {
    tag == "span" && node.data("testid") == Some(PUBLISH_DATE_TESTID)
}

/// Fence language for a code block's text
pub fn code_language(code: &str) -> Option<&'static str> {
    if code.trim_start().starts_with('{') {
        return Some("json");
    }
    SHELL_TOKENS
        .iter()
        .any(|token| code.contains(token))
        .then_some("shell")
}

/// What a `figure` element holds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FigureKind<'a> {
    /// A responsive picture with a usable `source[srcset]`
    Image {
        srcset: &'a str,
        caption: Option<String>,
    },
    /// No picture at all: an embed (gist, tweet, iframe) to be handled by hand
    Embed,
    /// A picture without sources, which is how video posters show up
    Video,
}

pub fn classify_figure(figure: &Node) -> FigureKind<'_> {
    let Some(picture) = figure.find_descendant("picture") else {
        return FigureKind::Embed;
    };

    let srcset = picture
        .element_children()
        .filter(|child| child.tag_name() == "source")
        .find_map(|source| source.attr("srcset"))
        .filter(|srcset| !srcset.trim().is_empty());

    match srcset {
        Some(srcset) => FigureKind::Image {
            srcset,
            caption: figure
                .find_descendant("figcaption")
                .map(|caption| postdown::collapse_whitespace(&caption.text_content()).trim().to_string())
                .filter(|caption| !caption.is_empty()),
        },
        None => FigureKind::Video,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn options() -> TurndownOptions {
        crate::config::article_options()
    }

    fn span(text: &str) -> Node {
        Node::element("span").with_text(text)
    }

    fn picture_figure(srcset: &str, caption: Option<&str>) -> Node {
        let picture = Node::element("picture")
            .with_child(Node::element_with_attrs("source", vec![("srcset", srcset)]))
            .with_child(Node::element_with_attrs("img", vec![("src", "fallback.png")]));
        let mut figure = Node::element("figure")
            .with_child(Node::element("div").with_child(Node::element("div").with_child(picture)));
        if let Some(caption) = caption {
            figure.add_child(Node::element("figcaption").with_text(caption));
        }
        figure
    }

    #[test]
    fn resolvable_links_need_a_target() {
        let link = Node::element_with_attrs("a", vec![("href", "/@nrwl")]);
        let empty = Node::element_with_attrs("a", vec![("href", "  ")]);
        let anchor = Node::element("a");
        assert!(is_resolvable_link("a", &NodeRef::new(&link), &options()));
        assert!(!is_resolvable_link("a", &NodeRef::new(&empty), &options()));
        assert!(!is_resolvable_link("a", &NodeRef::new(&anchor), &options()));
    }

    #[test]
    fn tracking_pixels_are_detected_by_suffix() {
        let pixel = Node::element_with_attrs("img", vec![("src", "https://miro.medium.com/1*a.png?q=20")]);
        let real = Node::element_with_attrs("img", vec![("src", "https://miro.medium.com/1*a.png")]);
        assert!(is_tracking_pixel("img", &NodeRef::new(&pixel)));
        assert!(!is_tracking_pixel("img", &NodeRef::new(&real)));
    }

    #[test]
    fn byline_chrome() {
        for text in ["--", "·", "Published in Nx Devtools"] {
            let node = span(text);
            assert!(is_byline_separator("span", &NodeRef::new(&node)), "{text}");
        }
        let prose = span("Nx is published in npm");
        assert!(!is_byline_separator("span", &NodeRef::new(&prose)));

        let follow = Node::element_with_attrs("a", vec![("href", "/m/signin")]).with_text("Follow");
        assert!(is_follow_link("a", &NodeRef::new(&follow)));
    }

    #[test]
    fn publish_date_marker_uses_test_id() {
        let marker = Node::element_with_attrs("span", vec![("data-testid", "storyPublishDate")])
            .with_text("Jan 5, 2024");
        let lookalike = span("Jan 5, 2024");
        assert!(is_publish_date_marker("span", &NodeRef::new(&marker)));
        assert!(!is_publish_date_marker("span", &NodeRef::new(&lookalike)));
    }

    #[test]
    fn code_language_detection() {
        assert_eq!(code_language("npx create-nx-workspace@latest"), Some("shell"));
        assert_eq!(code_language("yarn add -D @nx/playwright"), Some("shell"));
        assert_eq!(code_language("  {\n  \"npx\": true\n}"), Some("json"));
        assert_eq!(code_language("const npxValue = 1;"), Some("shell"));
        assert_eq!(code_language("const a = b * c;"), None);
        assert_eq!(code_language("export default {}"), None);
    }

    #[test]
    fn shell_tokens_match_inside_words() {
        for code in ["pnpx create-nx-workspace", "npx-cli init", "yarnpkg add nx"] {
            assert_eq!(code_language(code), Some("shell"), "{code}");
        }
    }

    #[test]
    fn figure_with_picture_is_an_image() {
        let figure = picture_figure("https://cdn/1*a.png 640w", Some(" The  graph "));
        assert_eq!(
            classify_figure(&figure),
            FigureKind::Image {
                srcset: "https://cdn/1*a.png 640w",
                caption: Some("The graph".to_string()),
            }
        );
    }

    #[test]
    fn figure_without_picture_is_an_embed() {
        let figure = Node::element("figure").with_child(Node::element("iframe"));
        assert_eq!(classify_figure(&figure), FigureKind::Embed);
    }

    #[test]
    fn picture_without_source_is_a_video() {
        let figure = Node::element("figure")
            .with_child(Node::element("picture").with_child(Node::element("img")));
        assert_eq!(classify_figure(&figure), FigureKind::Video);
    }
}
