//! botcreator error types

use std::fmt;

/// botcreator error types
#[derive(Debug, thiserror::Error)]
pub enum BotError {
    // Rule source errors
    /// The rule source could not be read (missing file, permissions, encoding).
    ///
    /// Fatal while building a [`Bot`](crate::Bot); on reload the previously
    /// active rules stay in effect.
    #[error("failed to read rules from {origin}: {source}")]
    Io {
        origin: String,
        #[source]
        source: std::io::Error,
    },

    // Configuration errors
    #[error("configuration error: {0}")]
    Configuration(String),
}

impl BotError {
    /// Wrap an I/O error with the name of the source it came from.
    pub fn io(origin: impl Into<String>, source: std::io::Error) -> Self {
        BotError::Io {
            origin: origin.into(),
            source,
        }
    }

    /// Whether a later retry (e.g. the next reload) may succeed.
    pub fn is_transient(&self) -> bool {
        matches!(self, BotError::Io { .. })
    }
}

/// Result type alias for botcreator operations
pub type Result<T> = std::result::Result<T, BotError>;

/// What was wrong with a quarantined rule line.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FormatErrorKind {
    /// More than one `/` on the line.
    ExtraSeparator,
    /// Nothing after the `/`, so the rule has no responses.
    EmptyResponses,
}

impl fmt::Display for FormatErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            FormatErrorKind::ExtraSeparator => f.write_str("more than one '/' separator"),
            FormatErrorKind::EmptyResponses => f.write_str("no responses after '/'"),
        }
    }
}

/// A rule line the parser skipped.
///
/// Never returned as an `Err`: the parser collects these next to the rules it
/// did accept so the caller can report them.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("line {line}: {kind}: {content:?}")]
pub struct FormatError {
    /// 1-based line number in the raw rule text.
    pub line: usize,
    /// The line as it appeared in the rule text (trimmed).
    pub content: String,
    pub kind: FormatErrorKind,
}
