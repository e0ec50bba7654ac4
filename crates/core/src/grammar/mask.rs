//! Delimiter masking.
//!
//! Before a predicate is scanned for combinators, the interior of every
//! top-level delimited span is overwritten with [`MASK_FILLER`] so that an
//! operator nested inside `[...]`, `(...)`, `<...>`, `{...}` or `'...'` is never
//! mistaken for a top-level split point. Offsets are preserved byte for byte.
//!
//! # Byte-level scanning
//!
//! All delimiters are ASCII. UTF-8 continuation bytes are in 0x80–0xBF and
//! never compare equal to an ASCII delimiter, and the interior of a span
//! always consists of whole code points, so replacing it with ASCII filler
//! keeps the buffer valid UTF-8.

use super::error::{ResolveError, Unclosed};

/// Byte written over masked interiors.
pub const MASK_FILLER: u8 = b'_';

/// Delimiter pairs masked before combinator scanning, in application order.
///
/// Quotes go first so a bracket inside a string literal (`'['`) is hidden
/// from the bracket pass; braces go last so the comma of a `{m,n}` range
/// never reads as juxtaposition.
pub const MASK_PAIRS: [(u8, u8); 5] = [
    (b'\'', b'\''),
    (b'[', b']'),
    (b'(', b')'),
    (b'<', b'>'),
    (b'{', b'}'),
];

/// Mask the interior of every top-level `open`…`close` span of `text`.
///
/// Nested pairs are matched with a depth counter; when `open == close` the
/// pair toggles. Unmatched closers are left untouched. Fails if an opener has
/// no matching closer.
pub fn mask(text: &str, open: char, close: char) -> Result<String, ResolveError> {
    let (Ok(open), Ok(close)) = (u8::try_from(open), u8::try_from(close)) else {
        return Ok(text.to_owned());
    };
    let mut buf = text.as_bytes().to_vec();
    mask_pair(&mut buf, open, close).map_err(|unclosed| unclosed.into_error(text, 0))?;
    Ok(String::from_utf8_lossy(&buf).into_owned())
}

/// Apply every pass of [`MASK_PAIRS`] to `text`, in order, on one buffer.
///
/// `offset` is the position of `text` in the grammar being resolved and is
/// only used to place error spans.
pub(crate) fn mask_predicate(text: &str, offset: usize) -> Result<Vec<u8>, ResolveError> {
    let mut buf = text.as_bytes().to_vec();
    for (open, close) in MASK_PAIRS {
        mask_pair(&mut buf, open, close).map_err(|unclosed| unclosed.into_error(text, offset))?;
    }
    Ok(buf)
}

/// One masking pass over `buf`. Returns the unclosed opener on failure.
fn mask_pair(buf: &mut [u8], open: u8, close: u8) -> Result<(), Unclosed> {
    let mut i = 0usize;
    while i < buf.len() {
        if buf[i] != open {
            i += 1;
            continue;
        }
        let end = find_close(buf, i, open, close).ok_or(Unclosed {
            delimiter: open as char,
            at: i,
        })?;
        buf[i + 1..end].fill(MASK_FILLER);
        i = end + 1;
    }
    Ok(())
}

/// Index of the closer matching the opener at `start`.
fn find_close(buf: &[u8], start: usize, open: u8, close: u8) -> Option<usize> {
    if open == close {
        return buf[start + 1..]
            .iter()
            .position(|&b| b == close)
            .map(|p| start + 1 + p);
    }
    let mut depth = 1usize;
    for (j, &b) in buf.iter().enumerate().skip(start + 1) {
        if b == open {
            depth += 1;
        } else if b == close {
            depth -= 1;
            if depth == 0 {
                return Some(j);
            }
        }
    }
    None
}
