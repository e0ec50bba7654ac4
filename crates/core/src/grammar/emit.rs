//! Grammar emitter: turns a resolved [`Term`] back into normalized grammar
//! text.
//!
//! Operands are joined by the combinator separator with single spaces,
//! groups are written as `[ … ]`, method parameters are written flush
//! against the parentheses and multipliers are re-attached to their term.
//! Expanded references are emitted as the group they expanded into.

use super::ast::Term;

/// Emit normalized grammar text for `term`.
///
/// Re-resolving the output yields a tree that emits the same text.
pub fn emit_grammar(term: &Term) -> String {
    let mut out = String::new();
    emit_term(&mut out, term);
    out
}

fn emit_term(out: &mut String, term: &Term) {
    match term {
        Term::Composed {
            combinator,
            children,
            ..
        } => {
            for (i, child) in children.iter().enumerate() {
                if i > 0 {
                    out.push_str(combinator.separator());
                }
                emit_term(out, child);
            }
        }
        Term::Keyword { source, .. } => out.push_str(source),
        Term::Literal { symbol, .. } => out.push_str(symbol.as_str()),
        Term::String { value, .. } => {
            out.push('\'');
            out.push_str(value);
            out.push('\'');
        }
        Term::DataType {
            name, non_terminal, ..
        } => {
            out.push('<');
            if *non_terminal {
                out.push('\'');
                out.push_str(name);
                out.push('\'');
            } else {
                out.push_str(name);
            }
            out.push('>');
        }
        Term::Method { name, params, .. } => {
            out.push_str(name);
            out.push('(');
            if let Some(params) = params {
                emit_term(out, params);
            }
            out.push(')');
        }
        Term::Brackets { content, .. } => {
            out.push_str("[ ");
            emit_term(out, content);
            out.push_str(" ]");
        }
    }
    if let Some(multiplier) = term.multiplier() {
        out.push_str(&multiplier.to_string());
    }
}
