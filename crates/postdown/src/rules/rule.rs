//! Rule and Filter types for HTML conversion.

use crate::node::NodeRef;
use crate::service::TurndownOptions;
use crate::Result;

/// Replacement function: receives the node, its already-rendered children and
/// the traversal context.
pub type ReplacementFn<C> =
    Box<dyn Fn(&NodeRef, &str, &TurndownOptions, &mut C) -> Result<String> + Send + Sync>;

/// Filter predicate. Filters see no traversal context and must not have side effects.
pub type PredicateFn = Box<dyn Fn(&str, &NodeRef, &TurndownOptions) -> bool + Send + Sync>;

/// A filter determines which elements a rule applies to
pub enum Filter {
    /// Match a single tag name
    TagName(String),
    /// Match any of multiple tag names
    TagNames(Vec<String>),
    /// Match using a predicate function
    Predicate(PredicateFn),
}

impl Filter {
    /// Create a filter for a single tag
    pub fn tag(name: &str) -> Self {
        Filter::TagName(name.to_lowercase())
    }

    /// Create a filter for multiple tags
    pub fn tags(names: &[&str]) -> Self {
        Filter::TagNames(names.iter().map(|s| s.to_lowercase()).collect())
    }

    /// Create a filter with a predicate
    pub fn predicate<F>(f: F) -> Self
    where
        F: Fn(&str, &NodeRef, &TurndownOptions) -> bool + Send + Sync + 'static,
    {
        Filter::Predicate(Box::new(f))
    }

    /// Check if this filter matches a node
    pub fn matches(&self, tag: &str, node: &NodeRef, options: &TurndownOptions) -> bool {
        match self {
            Filter::TagName(t) => tag == t,
            Filter::TagNames(tags) => tags.iter().any(|t| t == tag),
            Filter::Predicate(f) => f(tag, node, options),
        }
    }
}

/// A rule defines how to convert a matched element to Markdown
pub struct Rule<C = ()> {
    pub filter: Filter,
    pub replacement: ReplacementFn<C>,
}

impl<C: 'static> Rule<C> {
    /// Create a rule with a stateless, infallible replacement
    pub fn new<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &TurndownOptions) -> String + Send + Sync + 'static,
    {
        Self {
            filter,
            replacement: Box::new(move |node, content, options, _| {
                Ok(replacement(node, content, options))
            }),
        }
    }

    /// Create a rule whose replacement reads or writes the traversal context
    /// and may fail. A failure degrades to empty output for the node.
    pub fn with_context<F>(filter: Filter, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &TurndownOptions, &mut C) -> Result<String> + Send + Sync + 'static,
    {
        Self {
            filter,
            replacement: Box::new(replacement),
        }
    }

    /// Create a rule that matches a single tag
    pub fn for_tag<F>(tag: &str, replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &TurndownOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tag(tag), replacement)
    }

    /// Create a rule that matches multiple tags
    pub fn for_tags<F>(tags: &[&str], replacement: F) -> Self
    where
        F: Fn(&NodeRef, &str, &TurndownOptions) -> String + Send + Sync + 'static,
    {
        Self::new(Filter::tags(tags), replacement)
    }

    /// Apply this rule's replacement
    pub fn replace(
        &self,
        node: &NodeRef,
        content: &str,
        options: &TurndownOptions,
        context: &mut C,
    ) -> Result<String> {
        (self.replacement)(node, content, options, context)
    }
}
