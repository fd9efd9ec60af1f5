//! Parsed rule types.

use super::ResponseSet;

/// A rule matched by strict equality (and, as a last resort, by containment).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ExactRule {
    /// Pattern text as written in the rule file.
    pub pattern: String,
    pub responses: ResponseSet,
    /// 1-based line number the rule came from.
    pub line: usize,
}

impl ExactRule {
    pub fn matches_exactly(&self, prompt: &str) -> bool {
        self.pattern == prompt
    }

    pub fn matches_partially(&self, prompt: &str) -> bool {
        prompt.contains(self.pattern.as_str())
    }
}

/// `&`-joined terms that must all occur in the prompt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct OrGroup {
    /// Terms as written; surrounding whitespace is ignored when matching.
    terms: Vec<String>,
}

impl OrGroup {
    /// Split one `#`-separated piece of a pattern on `&`.
    pub fn from_pattern_text(text: &str) -> Self {
        Self {
            terms: text.split('&').map(str::to_string).collect(),
        }
    }

    pub fn terms(&self) -> &[String] {
        &self.terms
    }

    /// Whether every term, trimmed, is a substring of `prompt`.
    pub fn is_satisfied_by(&self, prompt: &str) -> bool {
        self.terms.iter().all(|term| prompt.contains(term.trim()))
    }
}

/// A rule whose pattern contains `#` (alternatives) or `&` (conjunction).
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ConditionalRule {
    pub groups: Vec<OrGroup>,
    pub responses: ResponseSet,
    pub line: usize,
}

impl ConditionalRule {
    /// Split a pattern on `#` into groups, each split on `&` into terms.
    pub fn from_pattern_text(pattern: &str, responses: ResponseSet, line: usize) -> Self {
        Self {
            groups: pattern.split('#').map(OrGroup::from_pattern_text).collect(),
            responses,
            line,
        }
    }

    /// Whether any group is satisfied by `prompt`.
    pub fn matches(&self, prompt: &str) -> bool {
        self.groups.iter().any(|group| group.is_satisfied_by(prompt))
    }
}

/// Everything derived from one full parse of the rule text.
///
/// Never mutated once published; reloads replace it wholesale.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct RuleSet {
    exact: Vec<ExactRule>,
    conditional: Vec<ConditionalRule>,
    generation: u64,
}

impl RuleSet {
    pub fn new(exact: Vec<ExactRule>, conditional: Vec<ConditionalRule>) -> Self {
        Self {
            exact,
            conditional,
            generation: 0,
        }
    }

    /// Stamp the publish generation. Only the reload coordinator calls this,
    /// before the set becomes visible to readers.
    pub(crate) fn with_generation(mut self, generation: u64) -> Self {
        self.generation = generation;
        self
    }

    /// Exact rules in file order.
    pub fn exact(&self) -> &[ExactRule] {
        &self.exact
    }

    /// Conditional rules in file order.
    pub fn conditional(&self) -> &[ConditionalRule] {
        &self.conditional
    }

    /// Publish counter: 1 for the initial load, incremented per reload.
    /// 0 for sets that were never published.
    pub fn generation(&self) -> u64 {
        self.generation
    }

    pub fn len(&self) -> usize {
        self.exact.len() + self.conditional.len()
    }

    pub fn is_empty(&self) -> bool {
        self.len() == 0
    }
}
