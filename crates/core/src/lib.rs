//! CSS value-definition syntax core library.
//!
//! Resolves grammar strings such as `[ <length> | auto ]{1,4}` into a typed
//! tree of combinators, multipliers and atomic terms, optionally expanding
//! data-type references against [`SyntaxTables`]. The main entry points are
//! [`resolve_str`] and [`resolve_with_tables`] for resolution, and
//! [`emit_grammar`] for normalized output.

#![warn(missing_docs)]

/// CSS value grammar: masking, resolution, tree types, emitter and related
/// utilities.
pub mod grammar;

// ── Convenience re-exports ──────────────────────────────────────────────────
// Flat imports for the most common entry points. The full module paths
// remain available for less common types.

// Resolver
pub use grammar::resolver::{resolve_data_type, resolve_property, resolve_str, resolve_with_tables};

// Tree
pub use grammar::ast::{Combinator, LiteralSymbol, Multiplier, Range, Term, TermKind};

// Errors
pub use grammar::error::ResolveError;

// Emitter and tree printer
pub use grammar::emit::emit_grammar;
pub use grammar::tree::{TreeConfig, render_tree};

// Diagnostics (re-exported from the diagnostics crate)
pub use grammar::diag::{Diagnostic, Severity, Span, codes};

// Tables
pub use grammar::tables::{SyntaxTables, TableKind};

// Serialization helpers
pub use grammar::dump::to_pretty_json;
