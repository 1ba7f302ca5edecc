//! Rule system for HTML to Markdown conversion.
//!
//! Precedence is fixed: custom rules are consulted newest first, so a rule
//! added later overrides any earlier rule whose filter also matches. Built-in
//! CommonMark rules are the fallback and are consulted in their fixed order.
//! Remove filters apply only to nodes no rule claims.

mod commonmark;
mod rule;

pub use commonmark::commonmark_rules;
pub use rule::{Filter, PredicateFn, ReplacementFn, Rule};

use indexmap::IndexMap;

use crate::node::NodeRef;
use crate::service::TurndownOptions;

/// Collection of rules for conversion
pub struct Rules<C = ()> {
    /// Custom rules in registration order (checked last-to-first)
    custom_rules: IndexMap<String, Rule<C>>,
    /// Remove rules (remove entirely, including the subtree)
    remove_rules: Vec<Filter>,
    /// Built-in CommonMark rules
    commonmark_rules: Vec<(&'static str, Rule<C>)>,
}

impl<C: 'static> Rules<C> {
    /// Create a new Rules instance with CommonMark rules
    pub fn new() -> Self {
        Self {
            custom_rules: IndexMap::new(),
            remove_rules: Vec::new(),
            commonmark_rules: commonmark_rules(),
        }
    }

    /// Add a custom rule. Re-adding an existing key replaces that rule and
    /// gives it the highest priority.
    pub fn add(&mut self, key: &str, rule: Rule<C>) {
        self.custom_rules.shift_remove(key);
        self.custom_rules.insert(key.to_string(), rule);
    }

    /// Add a remove filter
    pub fn remove(&mut self, filter: Filter) {
        self.remove_rules.push(filter);
    }

    /// Names of the custom rules, highest priority first
    pub fn custom_keys(&self) -> impl Iterator<Item = &str> {
        self.custom_rules.keys().rev().map(String::as_str)
    }

    /// Find the rule for a node, returning its name with it
    pub fn for_node<'a>(
        &'a self,
        node: &NodeRef,
        options: &TurndownOptions,
    ) -> Option<(&'a str, &'a Rule<C>)> {
        let tag = node.tag_name();

        let custom = self
            .custom_rules
            .iter()
            .rev()
            .map(|(key, rule)| (key.as_str(), rule));
        let builtin = self.commonmark_rules.iter().map(|(key, rule)| (*key, rule));

        custom
            .chain(builtin)
            .find(|(_, rule)| rule.filter.matches(tag, node, options))
    }

    /// Check if a node should be removed. Only meaningful for nodes that no
    /// rule matches.
    pub fn should_remove(&self, node: &NodeRef, options: &TurndownOptions) -> bool {
        let tag = node.tag_name();
        self.remove_rules
            .iter()
            .any(|filter| filter.matches(tag, node, options))
    }
}

impl<C: 'static> Default for Rules<C> {
    fn default() -> Self {
        Self::new()
    }
}
