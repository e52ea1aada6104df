//! Ordered regex substitution rules and the pure planning stage.
//!
//! Rules apply sequentially: each rule sees the output of the rule before it.
//! Every rule replaces all non-overlapping matches. Applying the same rule set
//! twice converges only when no rule's replacement re-matches its own pattern;
//! that is a property of the rules, not of this engine.

use regex::Regex;
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum RuleError {
    #[error("rule pattern must be non-empty")]
    EmptyPattern,
    #[error("invalid rule pattern '{pattern}': {reason}")]
    InvalidPattern { pattern: String, reason: String },
}

/// A compiled `(pattern, replacement)` pair.
///
/// The replacement is a `regex` template: `$1`, `${1}` or `${name}` expand to
/// capture groups, `$$` is a literal dollar sign.
#[derive(Debug, Clone)]
pub struct RewriteRule {
    pattern: Regex,
    replacement: String,
}

impl RewriteRule {
    pub fn new(pattern: &str, replacement: &str) -> Result<Self, RuleError> {
        if pattern.is_empty() {
            return Err(RuleError::EmptyPattern);
        }
        let compiled = Regex::new(pattern).map_err(|err| RuleError::InvalidPattern {
            pattern: pattern.to_string(),
            reason: err.to_string(),
        })?;
        Ok(Self {
            pattern: compiled,
            replacement: replacement.to_string(),
        })
    }

    pub fn pattern(&self) -> &str {
        self.pattern.as_str()
    }

    pub fn replacement(&self) -> &str {
        &self.replacement
    }

    /// Replace every match in `text`, returning the new text and match count.
    pub fn apply(&self, text: &str) -> (String, usize) {
        let matches = self.pattern.find_iter(text).count();
        if matches == 0 {
            return (text.to_string(), 0);
        }
        let replaced = self
            .pattern
            .replace_all(text, self.replacement.as_str())
            .into_owned();
        (replaced, matches)
    }
}

/// Rules in application order.
#[derive(Debug, Clone, Default)]
pub struct RuleSet {
    rules: Vec<RewriteRule>,
}

impl RuleSet {
    pub fn new(rules: Vec<RewriteRule>) -> Self {
        Self { rules }
    }

    /// Compile `(pattern, replacement)` pairs, failing on the first bad pattern.
    pub fn compile<'a, I>(pairs: I) -> Result<Self, RuleError>
    where
        I: IntoIterator<Item = (&'a str, &'a str)>,
    {
        let rules = pairs
            .into_iter()
            .map(|(pattern, replacement)| RewriteRule::new(pattern, replacement))
            .collect::<Result<Vec<_>, _>>()?;
        Ok(Self { rules })
    }

    pub fn rules(&self) -> &[RewriteRule] {
        &self.rules
    }

    pub fn len(&self) -> usize {
        self.rules.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rules.is_empty()
    }
}

/// Outcome of running a rule set over one text, before anything is written.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ContentPlan {
    /// Rewritten content, present only when it differs from the original.
    pub new_content: Option<String>,
    /// Match count per rule, in rule order.
    pub rule_matches: Vec<usize>,
}

impl ContentPlan {
    pub fn changed(&self) -> bool {
        self.new_content.is_some()
    }

    pub fn total_matches(&self) -> usize {
        self.rule_matches.iter().sum()
    }
}

/// Apply each rule once, in order, and compare the result to `original`.
///
/// A rule can match and still leave the text unchanged (for example when the
/// replacement equals the match); such content is reported as unchanged.
pub fn plan_content(original: &str, rules: &RuleSet) -> ContentPlan {
    let mut current = original.to_string();
    let mut rule_matches = Vec::with_capacity(rules.len());
    for rule in rules.rules() {
        let (next, matches) = rule.apply(&current);
        rule_matches.push(matches);
        current = next;
    }
    let new_content = (current != original).then_some(current);
    ContentPlan {
        new_content,
        rule_matches,
    }
}

/// The three import-suffix rules the `fix-imports` command ships with.
pub fn default_rule_pairs() -> Vec<(String, String)> {
    vec![
        (
            r#"@radix-ui/([^"'\s@]+)@[\d.]+"#.to_string(),
            "@radix-ui/${1}".to_string(),
        ),
        (
            r"class-variance-authority@[\d.]+".to_string(),
            "class-variance-authority".to_string(),
        ),
        (r"lucide-react@[\d.]+".to_string(), "lucide-react".to_string()),
    ]
}

#[cfg(test)]
mod tests {
    use super::*;

    fn default_rules() -> RuleSet {
        let pairs = default_rule_pairs();
        RuleSet::compile(pairs.iter().map(|(p, r)| (p.as_str(), r.as_str()))).expect("compile")
    }

    #[test]
    fn strips_radix_version_suffix() {
        let rules = default_rules();
        let plan = plan_content(r#"import x from "@radix-ui/react-slot@1.0.2""#, &rules);
        assert_eq!(
            plan.new_content.as_deref(),
            Some(r#"import x from "@radix-ui/react-slot""#)
        );
        assert_eq!(plan.rule_matches, vec![1, 0, 0]);
    }

    #[test]
    fn reapplying_rules_to_output_is_a_no_op() {
        let rules = default_rules();
        let first = plan_content(r#"import x from "@radix-ui/react-slot@1.0.2""#, &rules);
        let output = first.new_content.expect("changed");
        let second = plan_content(&output, &rules);
        assert!(!second.changed());
        assert_eq!(second.total_matches(), 0);
    }

    #[test]
    fn replaces_every_occurrence_of_every_rule() {
        let rules = default_rules();
        let input = concat!(
            "import { Slot } from '@radix-ui/react-slot@1.2.3';\n",
            "import * as Dialog from \"@radix-ui/react-dialog@1.1.6\";\n",
            "import { cva } from \"class-variance-authority@0.7.1\";\n",
            "import { X } from \"lucide-react@0.487.0\";\n",
            "import { Y } from \"lucide-react@0.487.0\";\n",
        );
        let plan = plan_content(input, &rules);
        assert_eq!(plan.rule_matches, vec![2, 1, 2]);
        assert_eq!(
            plan.new_content.as_deref(),
            Some(concat!(
                "import { Slot } from '@radix-ui/react-slot';\n",
                "import * as Dialog from \"@radix-ui/react-dialog\";\n",
                "import { cva } from \"class-variance-authority\";\n",
                "import { X } from \"lucide-react\";\n",
                "import { Y } from \"lucide-react\";\n",
            ))
        );
    }

    #[test]
    fn content_without_matches_is_unchanged() {
        let rules = default_rules();
        let plan = plan_content("import React from \"react\";\n", &rules);
        assert!(!plan.changed());
        assert_eq!(plan.rule_matches, vec![0, 0, 0]);
    }

    #[test]
    fn later_rules_see_earlier_output() {
        let rules = RuleSet::compile([("a", "b"), ("b", "c")]).expect("compile");
        let plan = plan_content("a", &rules);
        assert_eq!(plan.new_content.as_deref(), Some("c"));
    }

    #[test]
    fn match_with_identical_replacement_is_unchanged() {
        let rules = RuleSet::compile([("(foo)", "$1")]).expect("compile");
        let plan = plan_content("foo", &rules);
        assert!(!plan.changed());
        assert_eq!(plan.rule_matches, vec![1]);
    }

    #[test]
    fn empty_rule_set_never_changes_content() {
        let plan = plan_content("anything", &RuleSet::default());
        assert!(!plan.changed());
        assert!(plan.rule_matches.is_empty());
    }

    #[test]
    fn invalid_pattern_is_rejected() {
        let err = RewriteRule::new("(unclosed", "x").expect_err("invalid");
        assert!(matches!(err, RuleError::InvalidPattern { .. }));
        assert_eq!(
            RewriteRule::new("", "x").expect_err("empty"),
            RuleError::EmptyPattern
        );
    }
}
