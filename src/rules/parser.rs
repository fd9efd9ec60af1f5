//! Rule-file parser.
//!
//! Lines without `/` are not rules and are skipped silently. Malformed rule
//! lines are skipped and collected in [`ParsedRules::errors`] so the caller
//! can report them. A single bad line never fails the whole parse.

use super::{ConditionalRule, ExactRule, ResponseSet, RuleSet};
use crate::error::{FormatError, FormatErrorKind};

/// Lines starting with this marker are comments.
pub const COMMENT_MARKER: &str = "$#";

/// Result of parsing one rule text: the accepted rules plus quarantined lines.
#[derive(Debug, Clone, Default)]
pub struct ParsedRules {
    pub rule_set: RuleSet,
    pub errors: Vec<FormatError>,
}

/// Parse raw rule text into a [`RuleSet`].
///
/// Each line is trimmed before it is inspected. Exact and conditional rules
/// keep their file order.
pub fn parse(raw: &str) -> ParsedRules {
    let mut exact = Vec::new();
    let mut conditional = Vec::new();
    let mut errors = Vec::new();

    for (index, line) in raw.lines().enumerate() {
        let line_no = index + 1;
        let line = line.trim();

        if line.starts_with(COMMENT_MARKER) || !line.contains('/') {
            continue;
        }

        let mut parts = line.split('/');
        let (Some(pattern), Some(response_text), None) = (parts.next(), parts.next(), parts.next())
        else {
            errors.push(FormatError {
                line: line_no,
                content: line.to_string(),
                kind: FormatErrorKind::ExtraSeparator,
            });
            continue;
        };

        let Some(responses) = ResponseSet::from_rule_text(response_text) else {
            errors.push(FormatError {
                line: line_no,
                content: line.to_string(),
                kind: FormatErrorKind::EmptyResponses,
            });
            continue;
        };

        if is_exact_pattern(pattern) {
            exact.push(ExactRule {
                pattern: pattern.to_string(),
                responses,
                line: line_no,
            });
        } else {
            conditional.push(ConditionalRule::from_pattern_text(
                pattern, responses, line_no,
            ));
        }
    }

    ParsedRules {
        rule_set: RuleSet::new(exact, conditional),
        errors,
    }
}

fn is_exact_pattern(pattern: &str) -> bool {
    !pattern.contains(['#', '&'])
}
