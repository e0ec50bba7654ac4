//! Indented, human-readable rendering of a resolved [`Term`].

use super::ast::Term;

/// Configuration for [`render_tree`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct TreeConfig {
    /// Spaces added per nesting level.
    pub indent: usize,
}

impl Default for TreeConfig {
    fn default() -> Self {
        Self { indent: 2 }
    }
}

/// Render `term` one node per line, children indented below their parent.
///
/// ```text
/// composed |
///   keyword step-start
///   method steps
///     data-type <integer>
/// ```
pub fn render_tree(term: &Term, config: &TreeConfig) -> String {
    let mut out = String::new();
    render_node(&mut out, term, 0, config);
    out
}

fn render_node(out: &mut String, term: &Term, depth: usize, config: &TreeConfig) {
    out.push_str(&" ".repeat(depth * config.indent));
    out.push_str(term.kind().label());
    match term {
        Term::Composed { combinator, .. } => {
            out.push(' ');
            out.push_str(&combinator.to_string());
        }
        Term::Method { name, .. } => {
            out.push(' ');
            out.push_str(name);
        }
        Term::Brackets { .. } => {}
        other => {
            out.push(' ');
            out.push_str(other.source());
        }
    }
    if let Some(multiplier) = term.multiplier() {
        out.push_str(" (");
        out.push_str(&multiplier.to_string());
        out.push(')');
    }
    out.push('\n');
    for sub in term.subterms() {
        render_node(out, sub, depth + 1, config);
    }
}
