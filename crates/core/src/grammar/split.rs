//! Cutting a predicate into sibling operands.

use super::ast::Combinator;

/// One operand of a composition: trimmed text and its byte offset in the
/// predicate that was split.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) struct Piece<'a> {
    pub(crate) text: &'a str,
    pub(crate) offset: usize,
}

/// Cut `predicate` at `points` (computed on its masked copy).
///
/// `|`, `||` and `&&` skip their own width and keep empty operands, which
/// then fail to resolve. Juxtaposition skips a whitespace cut byte, keeps any
/// other cut byte as the start of the next operand, and drops empties.
pub(crate) fn split<'a>(
    predicate: &'a str,
    points: &[usize],
    combinator: Combinator,
) -> Vec<Piece<'a>> {
    let bytes = predicate.as_bytes();
    let mut pieces = Vec::with_capacity(points.len() + 1);
    let mut start = 0usize;
    for &point in points {
        pieces.push(piece(predicate, start, point));
        start = point + advance(combinator, bytes[point]);
    }
    pieces.push(piece(predicate, start, predicate.len()));

    if combinator == Combinator::Juxtaposition {
        pieces.retain(|p| !p.text.is_empty());
    }
    pieces
}

fn advance(combinator: Combinator, cut: u8) -> usize {
    match combinator {
        Combinator::ExactlyOne => 1,
        Combinator::AtLeastOne | Combinator::AllAnyOrder => 2,
        Combinator::Juxtaposition => usize::from(cut.is_ascii_whitespace()),
    }
}

fn piece(predicate: &str, start: usize, end: usize) -> Piece<'_> {
    let start = start.min(end);
    let raw = &predicate[start..end];
    let text = raw.trim_start();
    let offset = start + (raw.len() - text.len());
    Piece {
        text: text.trim_end(),
        offset,
    }
}
