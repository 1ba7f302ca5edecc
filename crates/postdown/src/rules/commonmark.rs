//! CommonMark rules for HTML to Markdown conversion.
//!
//! These are the generic fallbacks. None of them touch the traversal context.

use super::{Filter, Rule};
use crate::service::{CodeBlockStyle, HeadingStyle, LinkStyle};
use crate::utilities::{clean_attribute, repeat};

/// Create all CommonMark rules, in the order they are consulted
pub fn commonmark_rules<C: 'static>() -> Vec<(&'static str, Rule<C>)> {
    vec![
        ("paragraph", paragraph_rule()),
        ("line break", line_break_rule()),
        ("heading", heading_rule()),
        ("blockquote", blockquote_rule()),
        ("list", list_rule()),
        ("list item", list_item_rule()),
        ("indented code block", indented_code_block_rule()),
        ("fenced code block", fenced_code_block_rule()),
        ("horizontal rule", horizontal_rule()),
        ("inline link", inline_link_rule()),
        ("emphasis", emphasis_rule()),
        ("strong", strong_rule()),
        ("code", code_rule()),
        ("image", image_rule()),
    ]
}

fn paragraph_rule<C: 'static>() -> Rule<C> {
    Rule::for_tag("p", |_, content, _| format!("\n\n{}\n\n", content.trim()))
}

fn line_break_rule<C: 'static>() -> Rule<C> {
    Rule::for_tag("br", |_, _, _| "  \n".to_string())
}

fn heading_rule<C: 'static>() -> Rule<C> {
    Rule::for_tags(&["h1", "h2", "h3", "h4", "h5", "h6"], |node, content, options| {
        let level: usize = node.tag_name()[1..].parse().unwrap_or(1);

        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }

        match options.heading_style {
            HeadingStyle::Setext if level <= 2 => {
                let underline = if level == 1 { "=" } else { "-" };
                format!(
                    "\n\n{}\n{}\n\n",
                    content,
                    repeat(underline, content.chars().count())
                )
            }
            _ => format!("\n\n{} {}\n\n", repeat("#", level), content),
        }
    })
}

fn blockquote_rule<C: 'static>() -> Rule<C> {
    Rule::for_tag("blockquote", |_, content, _| {
        let content = content.trim();
        if content.is_empty() {
            return String::new();
        }
        let quoted: Vec<String> = content.lines().map(|line| format!("> {line}")).collect();
        format!("\n\n{}\n\n", quoted.join("\n"))
    })
}

fn list_rule<C: 'static>() -> Rule<C> {
    Rule::for_tags(&["ul", "ol"], |node, content, _| {
        let content = content.trim_end();

        if node.parent_tag() == Some("li") {
            format!("\n{content}")
        } else {
            format!("\n\n{content}\n\n")
        }
    })
}

fn list_item_rule<C: 'static>() -> Rule<C> {
    Rule::for_tag("li", |node, content, options| {
        let content = content
            .trim()
            .replace("\n\n\n", "\n\n")
            .replace('\n', "\n    ");

        let prefix = if node.parent_tag() == Some("ol") {
            format!("{}.  ", node.index() + 1)
        } else {
            format!("{}   ", options.bullet_list_marker)
        };

        format!("{prefix}{content}\n")
    })
}

fn indented_code_block_rule<C: 'static>() -> Rule<C> {
    Rule::new(
        Filter::predicate(|tag, node, options| {
            tag == "pre"
                && node.element_children().any(|c| c.tag_name() == "code")
                && options.code_block_style == CodeBlockStyle::Indented
        }),
        |node, _, _| {
            let code = node.code_text();
            let indented: Vec<String> = code.lines().map(|line| format!("    {line}")).collect();
            format!("\n\n{}\n\n", indented.join("\n"))
        },
    )
}

fn fenced_code_block_rule<C: 'static>() -> Rule<C> {
    Rule::new(
        Filter::predicate(|tag, node, options| {
            tag == "pre"
                && node.element_children().any(|c| c.tag_name() == "code")
                && options.code_block_style == CodeBlockStyle::Fenced
        }),
        |node, _, options| {
            let Some(code_node) = node.element_children().find(|c| c.tag_name() == "code") else {
                return String::new();
            };

            let language = code_node
                .attr("class")
                .unwrap_or_default()
                .split_whitespace()
                .find_map(|c| c.strip_prefix("language-"))
                .unwrap_or_default();

            let fence = &options.fence;
            format!(
                "\n\n{fence}{language}\n{}\n{fence}\n\n",
                code_node.code_text().trim_end()
            )
        },
    )
}

fn horizontal_rule<C: 'static>() -> Rule<C> {
    Rule::for_tag("hr", |_, _, options| format!("\n\n{}\n\n", options.hr))
}

fn inline_link_rule<C: 'static>() -> Rule<C> {
    Rule::new(
        Filter::predicate(|tag, node, options| {
            tag == "a" && node.has_attr("href") && options.link_style == LinkStyle::Inlined
        }),
        |node, content, _| {
            let href = clean_attribute(node.attr("href"));
            let title = node.attr("title");

            if href.is_empty() && title.is_none() {
                return content.to_string();
            }

            let title_part = title.map(|t| format!(" \"{t}\"")).unwrap_or_default();
            format!("[{content}]({href}{title_part})")
        },
    )
}

fn emphasis_rule<C: 'static>() -> Rule<C> {
    Rule::for_tags(&["em", "i"], |_, content, options| {
        if content.trim().is_empty() {
            return String::new();
        }
        let delimiter = options.em_delimiter;
        format!("{delimiter}{content}{delimiter}")
    })
}

fn strong_rule<C: 'static>() -> Rule<C> {
    Rule::for_tags(&["strong", "b"], |_, content, options| {
        if content.trim().is_empty() {
            return String::new();
        }
        let delimiter = &options.strong_delimiter;
        format!("{delimiter}{content}{delimiter}")
    })
}

fn code_rule<C: 'static>() -> Rule<C> {
    Rule::new(
        // <code> directly inside <pre> belongs to the code block rules
        Filter::predicate(|tag, node, _| tag == "code" && node.parent_tag() != Some("pre")),
        |node, _, _| {
            let content = node.text_content();
            if content.is_empty() {
                return String::new();
            }

            let max_run = content
                .chars()
                .fold((0, 0), |(max, current), c| {
                    if c == '`' {
                        (max.max(current + 1), current + 1)
                    } else {
                        (max, 0)
                    }
                })
                .0;

            let backticks = "`".repeat(max_run + 1);
            if max_run > 0 && (content.starts_with('`') || content.ends_with('`')) {
                format!("{backticks} {content} {backticks}")
            } else {
                format!("{backticks}{content}{backticks}")
            }
        },
    )
}

fn image_rule<C: 'static>() -> Rule<C> {
    Rule::for_tag("img", |node, _, _| {
        let alt = clean_attribute(node.attr("alt"));
        let src = clean_attribute(node.attr("src"));
        if src.is_empty() {
            return String::new();
        }

        let title_part = node
            .attr("title")
            .map(|t| format!(" \"{t}\""))
            .unwrap_or_default();
        format!("![{alt}]({src}{title_part})")
    })
}
