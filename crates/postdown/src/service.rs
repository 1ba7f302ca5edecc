//! TurndownService - the main entry point for tree to Markdown conversion.

use log::warn;

use crate::node::{Node, NodeKind, NodeRef};
use crate::rules::{Filter, Rule, Rules};
use crate::utilities::{collapse_whitespace, escape_markdown};
use crate::Result;

/// Heading style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum HeadingStyle {
    /// Use setext-style headings (underlined with = or -)
    #[default]
    Setext,
    /// Use ATX-style headings (prefixed with #)
    Atx,
}

/// Code block style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum CodeBlockStyle {
    /// Use indented code blocks (4 spaces)
    #[default]
    Indented,
    /// Use fenced code blocks (```)
    Fenced,
}

/// Link style options
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LinkStyle {
    /// Use inline links [text](url)
    #[default]
    Inlined,
    /// Leave links to custom rules; the built-in inline rule does not apply
    Referenced,
}

/// Options for TurndownService
#[derive(Debug, Clone)]
pub struct TurndownOptions {
    pub heading_style: HeadingStyle,

    /// Horizontal rule string
    pub hr: String,

    pub bullet_list_marker: char,

    pub code_block_style: CodeBlockStyle,

    /// Fence string for fenced code blocks
    pub fence: String,

    pub em_delimiter: char,

    pub strong_delimiter: String,

    pub link_style: LinkStyle,
}

impl Default for TurndownOptions {
    fn default() -> Self {
        Self {
            heading_style: HeadingStyle::Setext,
            hr: "* * *".to_string(),
            bullet_list_marker: '*',
            code_block_style: CodeBlockStyle::Indented,
            fence: "```".to_string(),
            em_delimiter: '_',
            strong_delimiter: "**".to_string(),
            link_style: LinkStyle::Inlined,
        }
    }
}

/// A node whose replacement failed; it contributed no output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RuleWarning {
    pub rule: String,
    pub tag: String,
    pub message: String,
}

/// Result of a conversion: the Markdown text plus any degraded nodes.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Rendered {
    pub markdown: String,
    pub warnings: Vec<RuleWarning>,
}

/// The main service for converting element trees to Markdown.
///
/// `C` is the traversal context handed to stateful rules. A fresh context
/// is supplied by the caller for every conversion.
pub struct TurndownService<C = ()> {
    options: TurndownOptions,
    rules: Rules<C>,
}

/// Per-conversion walk state
struct Walk<'c, C> {
    context: &'c mut C,
    warnings: Vec<RuleWarning>,
}

impl<C: 'static> TurndownService<C> {
    /// Create a new TurndownService with default options
    pub fn new() -> Self {
        Self::with_options(TurndownOptions::default())
    }

    /// Create a TurndownService with custom options
    pub fn with_options(options: TurndownOptions) -> Self {
        Self {
            options,
            rules: Rules::new(),
        }
    }

    /// Add a custom rule; it takes precedence over every rule added before it
    pub fn add_rule(&mut self, key: &str, rule: Rule<C>) -> &mut Self {
        self.rules.add(key, rule);
        self
    }

    /// Remove elements matching the filter, subtree included
    pub fn remove(&mut self, filter: Filter) -> &mut Self {
        self.rules.remove(filter);
        self
    }

    /// Apply a plugin
    pub fn use_plugin<F>(&mut self, plugin: F) -> &mut Self
    where
        F: FnOnce(&mut Self),
    {
        plugin(self);
        self
    }

    pub fn options(&self) -> &TurndownOptions {
        &self.options
    }

    pub fn options_mut(&mut self) -> &mut TurndownOptions {
        &mut self.options
    }

    pub fn rules(&self) -> &Rules<C> {
        &self.rules
    }

    /// Convert a tree to Markdown, reporting nodes whose rule failed
    pub fn convert(&self, node: &Node, context: &mut C) -> Result<Rendered> {
        let mut walk = Walk {
            context,
            warnings: Vec::new(),
        };

        let output = match node.kind {
            NodeKind::Element => self.process_node(&NodeRef::new(node), &mut walk, false),
            NodeKind::Text => self.process_text(node, false),
        };

        Ok(Rendered {
            markdown: post_process(&output),
            warnings: walk.warnings,
        })
    }

    /// Convert a tree to Markdown
    pub fn turndown(&self, node: &Node, context: &mut C) -> Result<String> {
        self.convert(node, context).map(|rendered| rendered.markdown)
    }

    /// Parse an HTML fragment and convert it to Markdown
    #[cfg(feature = "html")]
    pub fn turndown_html(&self, html: &str, context: &mut C) -> Result<String> {
        self.turndown(&crate::html::parse_html(html), context)
    }

    fn process_children(&self, node: &Node, walk: &mut Walk<C>, in_code: bool) -> String {
        let mut result = String::new();
        let mut index = 0;

        for child in node.children() {
            match child.kind {
                NodeKind::Text => result.push_str(&self.process_text(child, in_code)),
                NodeKind::Element => {
                    let child_ref = NodeRef::with_parent(child, node.tag_name(), index);
                    index += 1;
                    result.push_str(&self.process_node(&child_ref, walk, in_code));
                }
            }
        }

        result
    }

    fn process_text(&self, node: &Node, in_code: bool) -> String {
        let text = node.value.as_deref().unwrap_or_default();
        if in_code {
            text.to_string()
        } else {
            escape_markdown(&collapse_whitespace(text))
        }
    }

    /// Render one element: children first, then the winning rule's
    /// replacement over the rendered children.
    fn process_node(&self, node: &NodeRef, walk: &mut Walk<C>, in_code: bool) -> String {
        let rule = self.rules.for_node(node, &self.options);

        if rule.is_none() && self.rules.should_remove(node, &self.options) {
            return String::new();
        }

        let tag = node.tag_name();
        let in_code = in_code || tag == "pre" || tag == "code";
        let content = self.process_children(node.node, walk, in_code);

        let Some((name, rule)) = rule else {
            return content;
        };

        match rule.replace(node, &content, &self.options, walk.context) {
            Ok(output) => output,
            Err(err) => {
                warn!("rule {name:?} failed on <{tag}>: {err}");
                walk.warnings.push(RuleWarning {
                    rule: name.to_string(),
                    tag: tag.to_string(),
                    message: err.to_string(),
                });
                String::new()
            }
        }
    }
}

impl<C: 'static> Default for TurndownService<C> {
    fn default() -> Self {
        Self::new()
    }
}

/// Trim surrounding newlines and collapse runs of blank lines
fn post_process(output: &str) -> String {
    let result = output.trim_matches('\n');

    let mut newline_count = 0;
    let mut processed = String::with_capacity(result.len());

    for c in result.chars() {
        if c == '\n' {
            newline_count += 1;
            if newline_count <= 2 {
                processed.push(c);
            }
        } else {
            newline_count = 0;
            processed.push(c);
        }
    }

    processed
}
