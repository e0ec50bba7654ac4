use std::collections::BTreeMap;

use super::diag::{Diagnostic, Span, codes};
use super::tables::TableKind;

/// Failure to resolve a grammar string.
///
/// Resolution is fail-fast: the first malformation aborts the whole call.
/// Spans are byte ranges in the grammar passed to the top-level call.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[non_exhaustive]
pub enum ResolveError {
    /// A `[` group is unterminated or the term does not end with `]`.
    #[error("malformed brackets: {fragment}")]
    MalformedBrackets {
        /// Offending fragment.
        fragment: String,
        /// Location of the fragment.
        span: Span,
    },
    /// A `<` reference is unterminated or does not end with `>`.
    #[error("malformed data type: {fragment}")]
    MalformedDataType {
        /// Offending fragment.
        fragment: String,
        /// Location of the fragment.
        span: Span,
    },
    /// A `<'name'>` reference is missing its closing quote.
    #[error("malformed data type name: {fragment}")]
    MalformedDataTypeName {
        /// Offending fragment.
        fragment: String,
        /// Location of the fragment.
        span: Span,
    },
    /// A quoted string is missing its closing quote.
    #[error("malformed string: {fragment}")]
    MalformedString {
        /// Offending fragment.
        fragment: String,
        /// Location of the fragment.
        span: Span,
    },
    /// A function-like term does not end with `)`.
    #[error("malformed method: {fragment}")]
    MalformedMethod {
        /// Offending fragment.
        fragment: String,
        /// Location of the fragment.
        span: Span,
    },
    /// A `{...}` repetition range is unterminated or invalid.
    #[error("malformed range: {fragment}")]
    MalformedRange {
        /// Offending fragment.
        fragment: String,
        /// Location of the fragment.
        span: Span,
    },
    /// A combinator operand (or the whole grammar) is empty.
    #[error("empty term")]
    EmptyTerm {
        /// Position of the missing operand.
        span: Span,
    },
    /// The grammar of a referenced data type failed to resolve.
    #[error("failed to expand {reference}: {source}")]
    Expansion {
        /// The reference as written (`<name>` or `<'name'>`).
        reference: String,
        /// Location of the reference.
        span: Span,
        /// Failure inside the referenced grammar; its span points into that
        /// grammar, not into the top-level input.
        #[source]
        source: Box<ResolveError>,
    },
    /// A name looked up by the convenience entry points is not in the tables.
    #[error("unknown {table} entry '{name}'")]
    UnknownName {
        /// The requested name.
        name: String,
        /// The table that was searched.
        table: TableKind,
    },
}

impl ResolveError {
    /// Stable diagnostic code for this error.
    pub fn code(&self) -> &'static str {
        match self {
            ResolveError::MalformedBrackets { .. } => codes::MALFORMED_BRACKETS,
            ResolveError::MalformedDataType { .. } => codes::MALFORMED_DATA_TYPE,
            ResolveError::MalformedDataTypeName { .. } => codes::MALFORMED_DATA_TYPE_NAME,
            ResolveError::MalformedString { .. } => codes::MALFORMED_STRING,
            ResolveError::MalformedMethod { .. } => codes::MALFORMED_METHOD,
            ResolveError::MalformedRange { .. } => codes::MALFORMED_RANGE,
            ResolveError::EmptyTerm { .. } => codes::EMPTY_TERM,
            ResolveError::Expansion { .. } => codes::EXPANSION_FAILED,
            ResolveError::UnknownName { .. } => codes::UNKNOWN_NAME,
        }
    }

    /// Location in the top-level grammar, if the error has one.
    pub fn span(&self) -> Option<Span> {
        match self {
            ResolveError::MalformedBrackets { span, .. }
            | ResolveError::MalformedDataType { span, .. }
            | ResolveError::MalformedDataTypeName { span, .. }
            | ResolveError::MalformedString { span, .. }
            | ResolveError::MalformedMethod { span, .. }
            | ResolveError::MalformedRange { span, .. }
            | ResolveError::EmptyTerm { span }
            | ResolveError::Expansion { span, .. } => Some(*span),
            ResolveError::UnknownName { .. } => None,
        }
    }

    /// The innermost error of an expansion chain.
    pub fn root_cause(&self) -> &ResolveError {
        match self {
            ResolveError::Expansion { source, .. } => source.root_cause(),
            other => other,
        }
    }

    /// Convert into an error [`Diagnostic`] with machine-readable context.
    pub fn to_diagnostic(&self) -> Diagnostic {
        let mut ctx = BTreeMap::new();
        match self {
            ResolveError::MalformedBrackets { fragment, .. }
            | ResolveError::MalformedDataType { fragment, .. }
            | ResolveError::MalformedDataTypeName { fragment, .. }
            | ResolveError::MalformedString { fragment, .. }
            | ResolveError::MalformedMethod { fragment, .. }
            | ResolveError::MalformedRange { fragment, .. } => {
                ctx.insert("fragment".to_string(), fragment.clone());
            }
            ResolveError::EmptyTerm { .. } => {}
            ResolveError::Expansion { reference, .. } => {
                let cause = self.root_cause();
                ctx.insert("reference".to_string(), reference.clone());
                ctx.insert("cause".to_string(), cause.code().to_string());
                ctx.insert("detail".to_string(), cause.to_string());
            }
            ResolveError::UnknownName { name, table } => {
                ctx.insert("name".to_string(), name.clone());
                ctx.insert("table".to_string(), table.to_string());
            }
        }
        let diag = Diagnostic::error(self.code(), self.to_string(), self.span());
        if ctx.is_empty() {
            diag
        } else {
            diag.with_context(ctx)
        }
    }
}

/// An opening delimiter with no matching closer, found while masking.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Unclosed {
    /// The opening delimiter.
    pub(crate) delimiter: char,
    /// Byte offset of the opener within the masked text.
    pub(crate) at: usize,
}

impl Unclosed {
    /// Classify by delimiter. `offset` places `text` in the top-level grammar.
    ///
    /// A lone quote opening a `<'…>` reference is a malformed data-type name
    /// rather than a malformed string.
    pub(crate) fn into_error(self, text: &str, offset: usize) -> ResolveError {
        if self.delimiter == '\''
            && let Some(start) = self.at.checked_sub(1)
            && text.as_bytes()[start] == b'<'
            && let Some(close) = text[self.at..].find('>')
        {
            let end = self.at + close + 1;
            return ResolveError::MalformedDataTypeName {
                fragment: text[start..end].to_string(),
                span: Span::new(offset + start, offset + end),
            };
        }
        let fragment = text[self.at..].to_string();
        let span = Span::new(offset + self.at, offset + text.len());
        match self.delimiter {
            '<' => ResolveError::MalformedDataType { fragment, span },
            '\'' => ResolveError::MalformedString { fragment, span },
            '(' => ResolveError::MalformedMethod { fragment, span },
            '{' => ResolveError::MalformedRange { fragment, span },
            _ => ResolveError::MalformedBrackets { fragment, span },
        }
    }
}
