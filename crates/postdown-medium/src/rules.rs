//! Rules for Medium article markup.
//!
//! Registration order matters: the engine consults custom rules newest first,
//! so rules registered further down override earlier ones whose filter also
//! matches. For example "follow link" shadows "medium inline link", which
//! keeps the "Follow" button from being taken for the author.

use chrono::NaiveDate;
use log::{debug, warn};
use postdown::{
    collapse_whitespace, escape_markdown, Filter, NodeRef, Rule, TurndownError, TurndownService,
};

use crate::assemble::asset_path;
use crate::classify::{self, FigureKind};
use crate::config::{ConvertConfig, MEDIUM_ORIGIN, PUBLISH_DATE_FORMAT};
use crate::srcset::ImageSource;
use crate::state::{ArticleContext, ImageTask};

pub const INLINE_LINK: &str = "medium inline link";
pub const HIDDEN_IMAGES: &str = "hidden images";
pub const CODE_BLOCKS: &str = "code blocks";
pub const SECTION_HEADERS: &str = "section headers";
pub const SUBSECTION_HEADERS: &str = "subsection headers";
pub const SOURCE_SETS: &str = "source sets";
pub const FOLLOW_LINK: &str = "follow link";
pub const PUBLISHED_IN: &str = "published in";
pub const PUBLISH_DATE: &str = "date";

/// Plugin installing the article rules on a service
pub fn medium_rules(config: &ConvertConfig) -> impl FnOnce(&mut TurndownService<ArticleContext>) {
    let config = config.clone();
    move |service: &mut TurndownService<ArticleContext>| {
        service
            .add_rule(INLINE_LINK, inline_link_rule())
            .add_rule(HIDDEN_IMAGES, hidden_images_rule())
            .add_rule(CODE_BLOCKS, code_block_rule())
            .add_rule(SECTION_HEADERS, section_header_rule())
            .add_rule(SUBSECTION_HEADERS, subsection_header_rule())
            .add_rule(SOURCE_SETS, source_set_rule(config))
            .add_rule(FOLLOW_LINK, suppress(classify::is_follow_link))
            .add_rule(PUBLISHED_IN, suppress(classify::is_byline_separator))
            .add_rule(PUBLISH_DATE, publish_date_rule())
            .remove(Filter::predicate(|tag, _, _| classify::is_interactive_button(tag)));
    }
}

/// Rule that drops matching nodes
fn suppress(filter: fn(&str, &NodeRef) -> bool) -> Rule<ArticleContext> {
    Rule::new(
        Filter::predicate(move |tag, node, _| filter(tag, node)),
        |_, _, _| String::new(),
    )
}

/// Links render inline; the first one encountered is the author byline and
/// is consumed instead.
fn inline_link_rule() -> Rule<ArticleContext> {
    Rule::with_context(
        Filter::predicate(classify::is_resolvable_link),
        |node, content, _, context: &mut ArticleContext| {
            if context.state.author().is_none() {
                let author = collapse_whitespace(&node.text_content());
                if context.state.set_author(&author) {
                    debug!("captured author {:?}", author.trim());
                }
                return Ok(String::new());
            }

            let href = node.attr("href").unwrap_or_default().trim();
            let href = if href.starts_with('/') {
                format!("{MEDIUM_ORIGIN}{href}")
            } else {
                href.to_string()
            };
            let title = node
                .attr("title")
                .filter(|title| !title.is_empty())
                .map(|title| format!(" \"{title}\""))
                .unwrap_or_default();

            Ok(format!("[{content}]({href}{title})"))
        },
    )
}

fn hidden_images_rule() -> Rule<ArticleContext> {
    Rule::new(
        Filter::predicate(|tag, node, _| classify::is_tracking_pixel(tag, node)),
        |_, _, _| String::new(),
    )
}

fn code_block_rule() -> Rule<ArticleContext> {
    Rule::new(
        Filter::predicate(|tag, _, _| classify::is_code_block(tag)),
        |node, _, options| {
            let code = node.code_text();
            let code = code.trim_matches('\n');
            let language = classify::code_language(code).unwrap_or_default();
            let fence = &options.fence;
            format!("\n\n{fence}{language}\n{code}\n{fence}\n\n")
        },
    )
}

/// The first section heading is the article title; later ones drop a level.
fn section_header_rule() -> Rule<ArticleContext> {
    Rule::with_context(
        Filter::predicate(|tag, _, _| classify::is_section_heading(tag)),
        |node, content, _, context: &mut ArticleContext| {
            if context.state.title().is_none() {
                context.state.set_title(&collapse_whitespace(&node.text_content()));
                return Ok(String::new());
            }
            Ok(format!("\n## {}\n", content.trim()))
        },
    )
}

fn subsection_header_rule() -> Rule<ArticleContext> {
    Rule::new(
        Filter::predicate(|tag, _, _| classify::is_subsection_heading(tag)),
        |_, content, _| format!("\n### {}\n", content.trim()),
    )
}

/// Figures become image tasks. The first usable image is diverted to the
/// cover slot and queued in both variants; later ones are queued as
/// originals and referenced from the body.
fn source_set_rule(config: ConvertConfig) -> Rule<ArticleContext> {
    Rule::with_context(
        Filter::predicate(|tag, _, _| classify::is_figure(tag)),
        move |node, _, _, context: &mut ArticleContext| {
            let (srcset, caption) = match classify::classify_figure(node.node) {
                FigureKind::Image { srcset, caption } => (srcset, caption),
                FigureKind::Embed => {
                    warn!("figure without picture in {}, needs manual follow-up", config.source_url);
                    return Ok(format!("\n\n>>> GO CHECK FOR GIST FROM {}\n\n", config.source_url));
                }
                FigureKind::Video => {
                    warn!("video figure in {}, needs manual follow-up", config.source_url);
                    return Ok(format!("\n\n>>> GO GET VIDEO FROM {}\n\n", config.source_url));
                }
            };

            let Some(source) = ImageSource::from_srcset(srcset) else {
                warn!("no usable image in srcset {srcset:?} in {}", config.source_url);
                return Ok(format!(
                    "\n\n>>> GO CHECK FOR IMAGE FROM {}\n\n",
                    config.source_url
                ));
            };

            let original = ImageTask::original(&config, &source);
            let file = original.local_filename.clone();
            context.images.push(original);

            if context.state.cover_image().is_none() {
                let cover = ImageTask::cover(&config, &source);
                context.state.set_cover_image(&cover.local_filename);
                context.images.push(cover);
                return Ok(String::new());
            }

            let path = asset_path(context.state.publish_date(), &file);
            let caption = caption.map(|caption| escape_markdown(&caption)).unwrap_or_default();
            let mut output = format!("\n\n![{caption}]({path})\n");
            if !caption.is_empty() {
                output.push_str(&format!("_{caption}_\n"));
            }
            output.push('\n');
            Ok(output)
        },
    )
}

fn publish_date_rule() -> Rule<ArticleContext> {
    Rule::with_context(
        Filter::predicate(|tag, node, _| classify::is_publish_date_marker(tag, node)),
        |node, _, _, context: &mut ArticleContext| {
            let text = collapse_whitespace(&node.text_content());
            let text = text.trim();
            let date = NaiveDate::parse_from_str(text, PUBLISH_DATE_FORMAT).map_err(|err| {
                TurndownError::ConversionError(format!("unparseable publish date {text:?}: {err}"))
            })?;
            context.state.set_publish_date(date);
            Ok(String::new())
        },
    )
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::article_options;
    use crate::state::ImageVariant;
    use postdown::Node;
    use pretty_assertions::assert_eq;

    const SOURCE: &str = "https://blog.nrwl.io/introducing-playwright-support-for-nx-d8108ee11d46";

    fn service() -> TurndownService<ArticleContext> {
        let mut service = TurndownService::with_options(article_options());
        service.use_plugin(medium_rules(&ConvertConfig::new(SOURCE)));
        service
    }

    fn render(node: &Node) -> (String, ArticleContext) {
        let mut context = ArticleContext::default();
        let markdown = service().turndown(node, &mut context).unwrap();
        (markdown, context)
    }

    fn link(href: &str, text: &str) -> Node {
        Node::element_with_attrs("a", vec![("href", href)]).with_text(text)
    }

    fn image_figure(id: &str, caption: Option<&str>) -> Node {
        let srcset = format!("https://miro.medium.com/v2/resize:fit:1400/format:webp/{id} 1400w");
        let picture = Node::element("picture")
            .with_child(Node::element_with_attrs("source", vec![("srcset", srcset.as_str())]));
        let mut figure = Node::element("figure")
            .with_child(Node::element("div").with_child(Node::element("div").with_child(picture)));
        if let Some(caption) = caption {
            figure.add_child(Node::element("figcaption").with_text(caption));
        }
        figure
    }

    #[test]
    fn registration_order_sets_precedence() {
        let service = service();
        let names: Vec<_> = service.rules().custom_keys().collect();
        assert_eq!(
            names,
            [
                PUBLISH_DATE,
                PUBLISHED_IN,
                FOLLOW_LINK,
                SOURCE_SETS,
                SUBSECTION_HEADERS,
                SECTION_HEADERS,
                CODE_BLOCKS,
                HIDDEN_IMAGES,
                INLINE_LINK,
            ]
        );
    }

    #[test]
    fn first_link_becomes_author_and_later_links_render() {
        let body = Node::element("div")
            .with_child(link("/@nx-team", "Nx Team"))
            .with_child(Node::element("p").with_text("See ").with_child(link("/nrwl/docs", "docs")));
        let (markdown, context) = render(&body);
        assert_eq!(markdown, "See [docs](https://medium.com/nrwl/docs)");
        assert_eq!(context.state.author(), Some("Nx Team"));
    }

    #[test]
    fn follow_link_is_not_taken_for_author() {
        let body = Node::element("div")
            .with_child(link("/m/signin?follow", "Follow"))
            .with_child(link("/@nx-team", "Nx Team"));
        let (markdown, context) = render(&body);
        assert_eq!(markdown, "");
        assert_eq!(context.state.author(), Some("Nx Team"));
    }

    #[test]
    fn blank_avatar_link_does_not_claim_author() {
        let avatar = Node::element_with_attrs("a", vec![("href", "/@nx-team")])
            .with_child(Node::element_with_attrs("img", vec![("src", "avatar.png"), ("alt", "")]));
        let body = Node::element("div")
            .with_child(avatar)
            .with_child(link("/@nx-team", "Nx Team"));
        let (_, context) = render(&body);
        assert_eq!(context.state.author(), Some("Nx Team"));
    }

    #[test]
    fn absolute_links_keep_title() {
        let mut titled = link("https://nx.dev", "Nx");
        titled.set_attr("title", "Nx docs");
        let body = Node::element("div").with_child(link("/@a", "A")).with_child(titled);
        let (markdown, _) = render(&body);
        assert_eq!(markdown, "[Nx](https://nx.dev \"Nx docs\")");
    }

    #[test]
    fn first_h1_is_title_and_later_ones_are_sections() {
        let body = Node::element("div")
            .with_child(Node::element("h1").with_text("Introducing Playwright"))
            .with_child(Node::element("p").with_text("Intro"))
            .with_child(Node::element("h1").with_text("Getting started"))
            .with_child(Node::element("h2").with_text("Install"));
        let (markdown, context) = render(&body);
        assert_eq!(markdown, "Intro\n\n## Getting started\n\n### Install");
        assert_eq!(context.state.title(), Some("Introducing Playwright"));
    }

    #[test]
    fn tracking_pixels_vanish() {
        let body = Node::element("p").with_text("a").with_child(Node::element_with_attrs(
            "img",
            vec![("src", "https://miro.medium.com/v2/1*x.png?q=20")],
        ));
        let (markdown, _) = render(&body);
        assert_eq!(markdown, "a");
    }

    #[test]
    fn code_blocks_get_a_language() {
        let shell = Node::element("pre").with_child(
            Node::element("span")
                .with_text("npx create-nx-workspace")
                .with_child(Node::element("br"))
                .with_text("cd my_workspace"),
        );
        let json = Node::element("pre").with_text("{\n  \"name\": \"app\"\n}");
        let plain = Node::element("pre").with_text("const a = b * c;");

        assert_eq!(render(&shell).0, "```shell\nnpx create-nx-workspace\ncd my_workspace\n```");
        assert_eq!(render(&json).0, "```json\n{\n  \"name\": \"app\"\n}\n```");
        assert_eq!(render(&plain).0, "```\nconst a = b * c;\n```");
    }

    #[test]
    fn chrome_is_suppressed() {
        let body = Node::element("div")
            .with_child(link("/@a", "A"))
            .with_child(Node::element("span").with_text("·"))
            .with_child(Node::element("span").with_text("Published in Nx Devtools"))
            .with_child(Node::element("button").with_child(link("/share", "Share")))
            .with_child(Node::element("p").with_text("Body"));
        let (markdown, _) = render(&body);
        assert_eq!(markdown, "Body");
    }

    #[test]
    fn publish_date_is_captured_silently() {
        let marker = Node::element_with_attrs("span", vec![("data-testid", "storyPublishDate")])
            .with_text("Jan 5, 2024");
        let (markdown, context) = render(&Node::element("div").with_child(marker));
        assert_eq!(markdown, "");
        assert_eq!(context.state.publish_date(), NaiveDate::from_ymd_opt(2024, 1, 5));
    }

    #[test]
    fn bad_publish_date_degrades_with_warning() {
        let marker = Node::element_with_attrs("span", vec![("data-testid", "storyPublishDate")])
            .with_text("5 days ago");
        let body = Node::element("div")
            .with_child(marker)
            .with_child(Node::element("p").with_text("Body"));
        let mut context = ArticleContext::default();
        let rendered = service().convert(&body, &mut context).unwrap();
        assert_eq!(rendered.markdown, "Body");
        assert_eq!(rendered.warnings.len(), 1);
        assert_eq!(rendered.warnings[0].rule, PUBLISH_DATE);
        assert_eq!(context.state.publish_date(), None);
    }

    #[test]
    fn first_figure_is_the_cover() {
        let date = Node::element_with_attrs("span", vec![("data-testid", "storyPublishDate")])
            .with_text("Jan 5, 2024");
        let body = Node::element("div")
            .with_child(date)
            .with_child(image_figure("1*cover.png", None))
            .with_child(image_figure("0*graph.jpeg", Some("The project graph")));
        let (markdown, context) = render(&body);

        assert_eq!(
            markdown,
            "![The project graph](/blog/images/2024-01-05/graph.avif)\n_The project graph_"
        );
        assert_eq!(context.state.cover_image(), Some("cover.png"));

        let tasks: Vec<_> = context
            .images
            .tasks()
            .iter()
            .map(|task| (task.local_filename.as_str(), task.variant))
            .collect();
        assert_eq!(
            tasks,
            [
                ("cover.avif", ImageVariant::Original),
                ("cover.png", ImageVariant::Cover),
                ("graph.avif", ImageVariant::Original),
            ]
        );
    }

    #[test]
    fn figure_without_picture_is_a_marker() {
        let gist = Node::element("figure").with_child(Node::element("iframe"));
        let (markdown, context) = render(&gist);
        assert_eq!(markdown, format!(">>> GO CHECK FOR GIST FROM {SOURCE}"));
        assert!(context.images.is_empty());
    }

    #[test]
    fn unusable_srcset_is_an_image_marker() {
        let picture = Node::element("picture").with_child(Node::element_with_attrs(
            "source",
            vec![("srcset", "https://miro.medium.com/v2/ 640w")],
        ));
        let body = Node::element("div")
            .with_child(Node::element("p").with_text("Before"))
            .with_child(Node::element("figure").with_child(picture));
        let mut context = ArticleContext::default();
        let rendered = service().convert(&body, &mut context).unwrap();
        assert_eq!(
            rendered.markdown,
            format!("Before\n\n>>> GO CHECK FOR IMAGE FROM {SOURCE}")
        );
        assert!(rendered.warnings.is_empty());
        assert!(context.images.is_empty());
        assert_eq!(context.state.cover_image(), None);
    }

    #[test]
    fn captions_are_escaped() {
        let body = Node::element("div")
            .with_child(image_figure("1*cover.png", None))
            .with_child(image_figure("1*graph.png", Some("The [nx] project_graph")));
        let (markdown, _) = render(&body);
        assert_eq!(
            markdown,
            "![The \\[nx\\] project\\_graph](/blog/images/{publish-date}/graph.avif)\n\
             _The \\[nx\\] project\\_graph_"
        );
    }

    #[test]
    fn picture_without_source_is_a_video_marker() {
        let video = Node::element("figure")
            .with_child(Node::element("picture").with_child(Node::element("img")));
        let (markdown, context) = render(&video);
        assert_eq!(markdown, format!(">>> GO GET VIDEO FROM {SOURCE}"));
        assert!(context.images.is_empty());
    }
}
