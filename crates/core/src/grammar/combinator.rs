//! Combinator selection over a masked predicate.

use super::ast::Combinator;

/// Bytes that make a neighbouring `|` or `&` part of another operator.
const OPERATOR_BYTES: [u8; 2] = [b'|', b'&'];

/// The loosest combinator present at the top level of `masked`, with the
/// byte offsets of its occurrences (sorted, unique).
///
/// Returns `None` when the predicate is atomic.
pub(crate) fn select(masked: &[u8]) -> Option<(Combinator, Vec<usize>)> {
    Combinator::PRECEDENCE.into_iter().find_map(|combinator| {
        let points = occurrences(masked, combinator);
        (!points.is_empty()).then_some((combinator, points))
    })
}

/// Offsets at which `combinator` splits `masked`.
pub(crate) fn occurrences(masked: &[u8], combinator: Combinator) -> Vec<usize> {
    match combinator {
        Combinator::ExactlyOne => operator_offsets(masked, b"|"),
        Combinator::AtLeastOne => operator_offsets(masked, b"||"),
        Combinator::AllAnyOrder => operator_offsets(masked, b"&&"),
        Combinator::Juxtaposition => juxtaposition_offsets(masked),
    }
}

/// Non-overlapping occurrences of `op` whose neighbours are not operator
/// bytes, so `|` never matches inside `||` and `&&` never inside `&&&`.
fn operator_offsets(masked: &[u8], op: &[u8]) -> Vec<usize> {
    let is_operator = |idx: Option<usize>| {
        idx.and_then(|i| masked.get(i))
            .is_some_and(|b| OPERATOR_BYTES.contains(b))
    };
    let mut points = Vec::new();
    let mut i = 0usize;
    while i + op.len() <= masked.len() {
        if &masked[i..i + op.len()] == op
            && !is_operator(i.checked_sub(1))
            && !is_operator(Some(i + op.len()))
        {
            points.push(i);
            i += op.len();
        } else {
            i += 1;
        }
    }
    points
}

/// Juxtaposition cut points: whitespace, `[`, `<` or `,` past the first
/// byte, plus the byte after every `,` (a comma is a token of its own).
fn juxtaposition_offsets(masked: &[u8]) -> Vec<usize> {
    let mut points = Vec::new();
    for (i, &b) in masked.iter().enumerate() {
        if i > 0 && (b.is_ascii_whitespace() || matches!(b, b'[' | b'<' | b',')) {
            points.push(i);
        }
        if b == b',' && i + 1 < masked.len() {
            points.push(i + 1);
        }
    }
    points.dedup();
    points
}
