//! Rule representation and the rule-file parser.
//!
//! A rule file holds one rule per line:
//!
//! ```text
//! $# greetings
//! hello/Hi there#Hey!
//! weather&today/It's sunny today.
//! cat#dog/Nice pet!
//! ```
//!
//! The left-hand side of `/` is the pattern, the right-hand side is the list
//! of candidate responses separated by `#`. Patterns without `#` or `&` are
//! [`ExactRule`]s; everything else is a [`ConditionalRule`] made of
//! `#`-separated [`OrGroup`]s of `&`-separated terms.
//!
//! Parsing yields an immutable [`RuleSet`]; the reload path builds a new
//! one on every change instead of editing the active set.

mod parser;
mod response;
mod rule;

pub use parser::{COMMENT_MARKER, ParsedRules, parse};
pub use response::ResponseSet;
pub use rule::{ConditionalRule, ExactRule, OrGroup, RuleSet};
