use std::collections::HashSet;

use super::{
    ast::Term,
    atomic::{Shape, classify, strip_multiplier},
    combinator::select,
    diag::Span,
    error::ResolveError,
    mask::mask_predicate,
    split::split,
    tables::{SyntaxTables, TableKind},
};

// ─── Public API ─────────────────────────────────────────────────────────────

/// Resolve a grammar string without expanding data-type references.
pub fn resolve_str(grammar: &str) -> Result<Term, ResolveError> {
    resolve_with_tables(grammar, None)
}

/// Resolve a grammar string, expanding `<name>` and `<'name'>` references
/// against `tables` when they are given.
///
/// Each referenced name is expanded at most once per call; later references
/// to the same name stay [`Term::DataType`] leaves.
pub fn resolve_with_tables(
    grammar: &str,
    tables: Option<&SyntaxTables>,
) -> Result<Term, ResolveError> {
    Resolver::new(tables).resolve(grammar)
}

/// Look up a property grammar by name and resolve it.
///
/// With `recursive` the property itself counts as visited, so a
/// self-reference stays a leaf.
pub fn resolve_property(
    name: &str,
    tables: &SyntaxTables,
    recursive: bool,
) -> Result<Term, ResolveError> {
    resolve_named(TableKind::Properties, name, tables, recursive)
}

/// Look up a data-type grammar by name and resolve it.
pub fn resolve_data_type(
    name: &str,
    tables: &SyntaxTables,
    recursive: bool,
) -> Result<Term, ResolveError> {
    resolve_named(TableKind::Syntaxes, name, tables, recursive)
}

fn resolve_named(
    kind: TableKind,
    name: &str,
    tables: &SyntaxTables,
    recursive: bool,
) -> Result<Term, ResolveError> {
    let grammar = tables
        .lookup(kind, name)
        .ok_or_else(|| ResolveError::UnknownName {
            name: name.to_string(),
            table: kind,
        })?;
    if recursive {
        Resolver::new(Some(tables))
            .visiting(kind, name)
            .resolve(grammar)
    } else {
        Resolver::new(None).resolve(grammar)
    }
}

// ─── Resolver Implementation ───────────────────────────────────────────────

/// State of one top-level resolution. Consumed by [`Resolver::resolve`].
struct Resolver<'a> {
    tables: Option<&'a SyntaxTables>,
    /// References already expanded during this call.
    visited: HashSet<(TableKind, String)>,
}

impl<'a> Resolver<'a> {
    fn new(tables: Option<&'a SyntaxTables>) -> Self {
        Self {
            tables,
            visited: HashSet::new(),
        }
    }

    fn visiting(mut self, kind: TableKind, name: &str) -> Self {
        self.visited.insert((kind, name.to_string()));
        self
    }

    fn resolve(mut self, grammar: &str) -> Result<Term, ResolveError> {
        self.fragment(grammar, 0)
    }

    /// Resolve `text`, which starts at byte `offset` of the grammar being
    /// resolved at this level.
    fn fragment(&mut self, text: &str, offset: usize) -> Result<Term, ResolveError> {
        let rest = text.trim_start();
        let offset = offset + (text.len() - rest.len());
        let predicate = rest.trim_end();
        if predicate.is_empty() {
            return Err(ResolveError::EmptyTerm {
                span: Span::empty(offset),
            });
        }

        let masked = mask_predicate(predicate, offset)?;
        if let Some((combinator, points)) = select(&masked) {
            let pieces = split(predicate, &points, combinator);
            if pieces.len() > 1 {
                tracing::trace!(
                    predicate,
                    %combinator,
                    operands = pieces.len(),
                    "split on combinator"
                );
                let children = pieces
                    .iter()
                    .map(|piece| self.fragment(piece.text, offset + piece.offset))
                    .collect::<Result<Vec<_>, _>>()?;
                return Ok(Term::Composed {
                    source: predicate.to_string(),
                    combinator,
                    children,
                });
            }
        }

        self.atomic(predicate, offset)
    }

    fn atomic(&mut self, predicate: &str, offset: usize) -> Result<Term, ResolveError> {
        let (value, multiplier) = strip_multiplier(predicate, offset)?;
        let source = value.to_string();
        let mut term = match classify(value, offset)? {
            Shape::Brackets {
                interior,
                interior_offset,
            } => Term::Brackets {
                source,
                content: Box::new(self.fragment(interior, interior_offset)?),
                multiplier: None,
            },
            Shape::DataType { name, non_terminal } => {
                self.data_type(source, name, non_terminal, Span::at(offset, value.len()))?
            }
            Shape::String { value } => Term::String {
                source,
                value: value.to_string(),
                multiplier: None,
            },
            Shape::Method {
                name,
                params,
                params_offset,
            } => {
                let params = if params.trim().is_empty() {
                    None
                } else {
                    Some(Box::new(self.fragment(params, params_offset)?))
                };
                Term::Method {
                    source,
                    name: name.to_string(),
                    params,
                    multiplier: None,
                }
            }
            Shape::Literal(symbol) => Term::Literal {
                source,
                symbol,
                multiplier: None,
            },
            Shape::Keyword => Term::Keyword {
                source,
                multiplier: None,
            },
        };
        term.set_multiplier(multiplier);
        Ok(term)
    }

    /// A data-type reference, expanded into [`Term::Brackets`] when the
    /// tables know it and it has not been expanded yet.
    fn data_type(
        &mut self,
        source: String,
        name: &str,
        non_terminal: bool,
        span: Span,
    ) -> Result<Term, ResolveError> {
        let Some(tables) = self.tables else {
            return Ok(Self::reference(source, name, non_terminal));
        };
        let kind = TableKind::for_reference(non_terminal);
        let Some(grammar) = tables.lookup(kind, name) else {
            tracing::debug!(%kind, name, "no table entry, keeping reference");
            return Ok(Self::reference(source, name, non_terminal));
        };
        if !self.visited.insert((kind, name.to_string())) {
            tracing::debug!(%kind, name, "already expanded, keeping reference");
            return Ok(Self::reference(source, name, non_terminal));
        }

        tracing::debug!(%kind, name, grammar, "expanding reference");
        let content = self
            .fragment(grammar, 0)
            .map_err(|err| ResolveError::Expansion {
                reference: source.clone(),
                span,
                source: Box::new(err),
            })?;
        Ok(Term::Brackets {
            source,
            content: Box::new(content),
            multiplier: None,
        })
    }

    fn reference(source: String, name: &str, non_terminal: bool) -> Term {
        Term::DataType {
            source,
            name: name.to_string(),
            non_terminal,
            multiplier: None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::grammar::ast::{Combinator, Multiplier};

    #[test]
    fn plain_keyword() {
        let term = resolve_str("  auto  ").unwrap();
        assert_eq!(
            term,
            Term::Keyword {
                source: "auto".into(),
                multiplier: None
            }
        );
    }

    #[test]
    fn keyword_with_suffix_keeps_stripped_source() {
        let term = resolve_str("thick+").unwrap();
        assert_eq!(term.source(), "thick");
        assert_eq!(term.multiplier(), Some(&Multiplier::OneOrMore));
    }

    #[test]
    fn empty_grammar_is_an_error() {
        let err = resolve_str("   ").unwrap_err();
        assert_eq!(err, ResolveError::EmptyTerm {
            span: Span::empty(3)
        });
    }

    #[test]
    fn empty_operand_reports_its_position() {
        let err = resolve_str("a |  | b").unwrap_err();
        assert_eq!(err, ResolveError::EmptyTerm {
            span: Span::empty(5)
        });
    }

    #[test]
    fn nested_error_span_is_absolute() {
        let err = resolve_str("a | [ b <c ]").unwrap_err();
        match err {
            ResolveError::MalformedDataType { fragment, span } => {
                assert_eq!(fragment, "<c");
                assert_eq!(span, Span::new(8, 10));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn empty_method_params_are_none() {
        let term = resolve_str("env()").unwrap();
        match term {
            Term::Method { name, params, .. } => {
                assert_eq!(name, "env");
                assert!(params.is_none());
            }
            other => panic!("expected method, got {other:?}"),
        }
    }

    #[test]
    fn composed_source_is_trimmed_predicate() {
        let term = resolve_str(" a  b ").unwrap();
        match term {
            Term::Composed {
                source,
                combinator,
                children,
            } => {
                assert_eq!(source, "a  b");
                assert_eq!(combinator, Combinator::Juxtaposition);
                assert_eq!(children.len(), 2);
            }
            other => panic!("expected composition, got {other:?}"),
        }
    }

    #[test]
    fn references_stay_leaves_without_tables() {
        let tables = SyntaxTables::from_pairs([("width", "<length>")], [("length", "<number>px")]);
        let plain = resolve_str("<length>").unwrap();
        assert_eq!(plain.kind(), crate::grammar::ast::TermKind::DataType);
        let expanded = resolve_with_tables("<length>", Some(&tables)).unwrap();
        assert_eq!(expanded.kind(), crate::grammar::ast::TermKind::Brackets);
    }

    #[test]
    fn self_reference_expands_once() {
        let tables = SyntaxTables::from_pairs(
            [("width", "<list>")],
            [("list", "<item> [ , <list> ]?"), ("item", "x")],
        );
        let term = resolve_with_tables("<list>", Some(&tables)).unwrap();
        let leaves: Vec<_> = term.leaves().iter().map(|t| t.source().to_string()).collect();
        assert_eq!(leaves, vec!["x", ",", "<list>"]);
    }

    #[test]
    fn unknown_name_names_its_table() {
        let tables = SyntaxTables::from_pairs([("width", "auto")], [("x", "y")]);
        let err = resolve_property("height", &tables, false).unwrap_err();
        assert_eq!(err, ResolveError::UnknownName {
            name: "height".into(),
            table: TableKind::Properties
        });
        assert!(resolve_property("width", &tables, true).is_ok());
    }
}
