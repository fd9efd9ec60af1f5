//! Three-tier match resolution.
//!
//! Tiers are tried in fixed order and the first hit wins:
//!
//! 1. [`Tier::Exact`]: an exact rule whose pattern equals the prompt.
//! 2. [`Tier::Conditional`]: the first conditional rule with any satisfied
//!    group. Later conditional rules are not consulted once one matches.
//! 3. [`Tier::Partial`]: an exact rule whose pattern occurs in the prompt.
//!
//! Within a tier, file order decides. Which rule matches is deterministic;
//! only the response picked from its [`ResponseSet`] is random.

use std::fmt;

use crate::chooser::ResponseChooser;
use crate::rules::{ResponseSet, RuleSet};

/// Resolution phase that produced a match.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Tier {
    Exact,
    Conditional,
    Partial,
}

impl Tier {
    pub fn as_str(&self) -> &'static str {
        match self {
            Tier::Exact => "exact",
            Tier::Conditional => "conditional",
            Tier::Partial => "partial",
        }
    }
}

impl fmt::Display for Tier {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A resolved rule: the tier it matched in, its line and its responses.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Match {
    pub tier: Tier,
    /// 1-based line of the matching rule.
    pub line: usize,
    pub responses: ResponseSet,
}

/// Find the rule that answers `prompt`, if any.
pub fn resolve(prompt: &str, rules: &RuleSet) -> Option<Match> {
    if let Some(rule) = rules.exact().iter().find(|r| r.matches_exactly(prompt)) {
        return Some(Match {
            tier: Tier::Exact,
            line: rule.line,
            responses: rule.responses.clone(),
        });
    }

    if let Some(rule) = rules.conditional().iter().find(|r| r.matches(prompt)) {
        return Some(Match {
            tier: Tier::Conditional,
            line: rule.line,
            responses: rule.responses.clone(),
        });
    }

    rules
        .exact()
        .iter()
        .find(|r| r.matches_partially(prompt))
        .map(|rule| Match {
            tier: Tier::Partial,
            line: rule.line,
            responses: rule.responses.clone(),
        })
}

/// Resolve and pick a response in one step, without any caching.
pub fn respond(prompt: &str, rules: &RuleSet, chooser: &dyn ResponseChooser) -> Option<String> {
    resolve(prompt, rules).map(|m| m.responses.choose(chooser).to_string())
}
