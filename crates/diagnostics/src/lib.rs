//! Diagnostics for the CSS value syntax toolchain.
//!
//! Provides [`Diagnostic`], [`Severity`] and [`Span`] types used to report
//! failures from the grammar resolver and the syntax tables. Diagnostic codes
//! are defined in the [`codes`] module.

#![warn(missing_docs)]

/// Diagnostic ID constants.
pub mod codes;

use serde::{Deserialize, Serialize};
use std::borrow::Cow;
use std::collections::BTreeMap;

/// Severity level for a diagnostic message.
///
/// Every resolver and tables failure is fatal, so errors are the only level.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
#[non_exhaustive]
pub enum Severity {
    /// Hard error: the grammar or tables could not be used.
    Error,
}

/// Byte span in the source grammar.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq)]
pub struct Span {
    /// Byte offset of the first character (0-based).
    pub start: usize,
    /// Byte offset one past the last character.
    pub end: usize,
}

impl Span {
    /// Create a span covering `[start, end)`.
    ///
    /// Panics if `end < start`.
    pub fn new(start: usize, end: usize) -> Self {
        assert!(end >= start, "Span end ({end}) < start ({start})");
        Self { start, end }
    }

    /// Create a zero-width span at the given position.
    pub fn empty(pos: usize) -> Self {
        Self {
            start: pos,
            end: pos,
        }
    }

    /// Create a span starting at `start` and covering `len` bytes.
    pub fn at(start: usize, len: usize) -> Self {
        Self {
            start,
            end: start + len,
        }
    }

    /// Number of bytes covered.
    pub fn len(&self) -> usize {
        self.end - self.start
    }

    /// Whether the span covers no bytes.
    pub fn is_empty(&self) -> bool {
        self.start == self.end
    }
}

/// A diagnostic message produced by the resolver or the tables loader.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Diagnostic {
    /// Unique diagnostic code (e.g., `"CSS1001"`).
    pub id: Cow<'static, str>,
    /// Severity level.
    pub severity: Severity,
    /// Human-readable diagnostic message.
    pub message: String,
    /// Optional byte span in the source grammar that this diagnostic relates to.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub span: Option<Span>,
    /// Machine-readable context for tooling (`"fragment"`, `"name"`, ...).
    ///
    /// Uses `BTreeMap` for deterministic key ordering in serialized output.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub context: Option<BTreeMap<String, String>>,
}

impl Diagnostic {
    /// An error diagnostic for `id`, optionally pointing into the grammar.
    pub fn error(
        id: impl Into<Cow<'static, str>>,
        message: impl Into<String>,
        span: Option<Span>,
    ) -> Self {
        Self {
            id: id.into(),
            severity: Severity::Error,
            message: message.into(),
            span,
            context: None,
        }
    }

    /// Attach machine-readable context metadata (builder pattern).
    pub fn with_context(mut self, ctx: BTreeMap<String, String>) -> Self {
        self.context = Some(ctx);
        self
    }

    /// Returns the human-readable explanation for this diagnostic's code, if available.
    pub fn explain(&self) -> Option<&'static str> {
        explain(&self.id)
    }
}

impl std::fmt::Display for Severity {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Severity::Error => write!(f, "error"),
        }
    }
}

impl std::fmt::Display for Diagnostic {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}[{}]: {}", self.severity, self.id, self.message)
    }
}

/// Returns the human-readable explanation for a diagnostic code, if known.
pub fn explain(id: &str) -> Option<&'static str> {
    match id {
        codes::MALFORMED_BRACKETS => Some(
            "A `[` group is never closed, or a bracketed term does not end with `]`. \
             Groups must be balanced: `[ a | b ]`.",
        ),
        codes::MALFORMED_DATA_TYPE => Some(
            "A `<` data-type reference is never closed, or does not end with `>`. \
             References look like `<length>` or `<'margin-top'>`.",
        ),
        codes::MALFORMED_DATA_TYPE_NAME => Some(
            "A quoted data-type name opens with `'` but does not close with `'` \
             before the `>`: write `<'name'>`.",
        ),
        codes::MALFORMED_STRING => Some(
            "A quoted string literal is missing its closing `'`.",
        ),
        codes::MALFORMED_METHOD => Some(
            "A function-like term has an opening `(` but does not end with `)`, \
             e.g. `steps(<integer>)`.",
        ),
        codes::MALFORMED_RANGE => Some(
            "A repetition range must be one of `{m}`, `{m,}`, `{,n}` or `{m,n}` with \
             decimal bounds and `m <= n`.",
        ),
        codes::EMPTY_TERM => Some(
            "A combinator (`|`, `||` or `&&`) is missing an operand on one side, \
             or the grammar is empty.",
        ),
        codes::EXPANSION_FAILED => Some(
            "Recursive expansion looked up the grammar of a referenced data type \
             and that grammar failed to resolve. The note names the inner failure.",
        ),
        codes::UNKNOWN_NAME => Some(
            "The requested property or data-type name has no entry in the syntax tables.",
        ),
        codes::INVALID_TABLES => Some(
            "The syntax tables file could not be read or is not valid tables JSON.",
        ),
        _ => None,
    }
}
