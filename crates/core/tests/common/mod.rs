//! Shared test helpers for `css_syntax_core` integration tests.

#![allow(unreachable_pub)]

use std::sync::LazyLock;

use css_syntax_core::grammar::ast::{Multiplier, Term};
use css_syntax_core::{ResolveError, SyntaxTables, resolve_str, resolve_with_tables};

/// Tables loaded once per test binary via LazyLock.
pub static TABLES: LazyLock<SyntaxTables> = LazyLock::new(|| {
    let path = std::path::Path::new(env!("CARGO_MANIFEST_DIR"))
        .join("../syntax-tables/data/syntax_tables.json");
    let json = std::fs::read_to_string(&path)
        .unwrap_or_else(|e| panic!("failed to read {}: {}", path.display(), e));
    SyntaxTables::from_json(&json)
        .unwrap_or_else(|e| panic!("failed to parse {}: {}", path.display(), e))
});

// ─── Resolution helpers ──────────────────────────────────────────────────────

/// Resolve without tables, panicking with the grammar on failure.
#[allow(dead_code)]
pub fn resolve(grammar: &str) -> Term {
    resolve_str(grammar).unwrap_or_else(|e| panic!("failed to resolve {grammar:?}: {e}"))
}

/// Resolve against the bundled test tables.
#[allow(dead_code)]
pub fn resolve_recursive(grammar: &str) -> Term {
    resolve_with_tables(grammar, Some(&*TABLES))
        .unwrap_or_else(|e| panic!("failed to resolve {grammar:?}: {e}"))
}

/// Resolve and return the error, panicking if resolution succeeds.
#[allow(dead_code)]
pub fn resolve_err(grammar: &str) -> ResolveError {
    match resolve_str(grammar) {
        Ok(term) => panic!("expected {grammar:?} to fail, got {term:?}"),
        Err(e) => e,
    }
}

/// Source text of every leaf, in order.
#[allow(dead_code)]
pub fn leaf_sources(term: &Term) -> Vec<String> {
    term.leaves()
        .iter()
        .map(|t| t.source().to_string())
        .collect()
}

// ─── Term builders ───────────────────────────────────────────────────────────

#[allow(dead_code)]
pub fn keyword(source: &str) -> Term {
    Term::Keyword {
        source: source.into(),
        multiplier: None,
    }
}

#[allow(dead_code)]
pub fn data_type(name: &str) -> Term {
    Term::DataType {
        source: format!("<{name}>"),
        name: name.into(),
        non_terminal: false,
        multiplier: None,
    }
}

#[allow(dead_code)]
pub fn brackets(source: &str, content: Term, multiplier: Option<Multiplier>) -> Term {
    Term::Brackets {
        source: source.into(),
        content: Box::new(content),
        multiplier,
    }
}
