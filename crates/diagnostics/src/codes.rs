//! Diagnostic ID constants.
//!
//! `CSS1xxx` codes come from resolving a grammar string, `CSS2xxx` codes from
//! the name→grammar tables. Use these instead of string literals to get
//! compile-time typo detection.

/// A `[` group is unterminated or does not end with `]`.
pub const MALFORMED_BRACKETS: &str = "CSS1001";

/// A `<` data-type reference is unterminated or does not end with `>`.
pub const MALFORMED_DATA_TYPE: &str = "CSS1002";

/// A quoted data-type name (`<'name'>`) is missing its closing quote.
pub const MALFORMED_DATA_TYPE_NAME: &str = "CSS1003";

/// A quoted string literal is missing its closing quote.
pub const MALFORMED_STRING: &str = "CSS1004";

/// A function-like term does not end with `)`.
pub const MALFORMED_METHOD: &str = "CSS1005";

/// A `{m,n}` repetition range is unterminated or has invalid bounds.
pub const MALFORMED_RANGE: &str = "CSS1006";

/// A combinator has no operand on one of its sides.
pub const EMPTY_TERM: &str = "CSS1007";

/// The grammar of a referenced data type failed to resolve.
pub const EXPANSION_FAILED: &str = "CSS1008";

/// A property or data-type name is not present in the tables.
pub const UNKNOWN_NAME: &str = "CSS2001";

/// Syntax tables could not be loaded.
pub const INVALID_TABLES: &str = "CSS2002";

/// Every code defined in this module, in numeric order.
pub const ALL: &[&str] = &[
    MALFORMED_BRACKETS,
    MALFORMED_DATA_TYPE,
    MALFORMED_DATA_TYPE_NAME,
    MALFORMED_STRING,
    MALFORMED_METHOD,
    MALFORMED_RANGE,
    EMPTY_TERM,
    EXPANSION_FAILED,
    UNKNOWN_NAME,
    INVALID_TABLES,
];
