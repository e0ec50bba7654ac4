//! Multiplier parsing and leaf classification for atomic predicates.

use super::ast::{LiteralSymbol, Multiplier, Range};
use super::diag::Span;
use super::error::ResolveError;

/// Shape of an atomic value, before any nested content is resolved.
///
/// Nested text is returned untrimmed together with its byte offset so the
/// resolver can recurse with accurate spans.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Shape<'a> {
    Brackets {
        interior: &'a str,
        interior_offset: usize,
    },
    DataType {
        name: &'a str,
        non_terminal: bool,
    },
    String {
        value: &'a str,
    },
    Method {
        name: &'a str,
        params: &'a str,
        params_offset: usize,
    },
    Literal(LiteralSymbol),
    Keyword,
}

/// Split a trailing multiplier off a trimmed predicate.
///
/// At most one suffix is consumed. The returned value is trimmed again and
/// starts at the same offset as `predicate`.
pub(crate) fn strip_multiplier(
    predicate: &str,
    offset: usize,
) -> Result<(&str, Option<Multiplier>), ResolveError> {
    if predicate.ends_with('}') {
        let (value, range) = strip_range(predicate, offset)?;
        return Ok((value, Some(Multiplier::Range(range))));
    }
    if let Some(last) = predicate.chars().next_back()
        && let Some(multiplier) = Multiplier::from_suffix(last)
    {
        let value = predicate[..predicate.len() - 1].trim_end();
        if !value.is_empty() {
            return Ok((value, Some(multiplier)));
        }
    }
    Ok((predicate, None))
}

/// Parse a trailing `{m}`, `{m,}`, `{,n}` or `{m,n}`.
fn strip_range(predicate: &str, offset: usize) -> Result<(&str, Range), ResolveError> {
    let malformed = |from: usize| ResolveError::MalformedRange {
        fragment: predicate[from..].to_string(),
        span: Span::new(offset + from, offset + predicate.len()),
    };
    let open = predicate.rfind('{').ok_or_else(|| malformed(0))?;
    let value = predicate[..open].trim_end();
    if value.is_empty() {
        return Err(malformed(open));
    }
    let inner = &predicate[open + 1..predicate.len() - 1];
    let range = parse_range(inner).ok_or_else(|| malformed(open))?;
    Ok((value, range))
}

/// Parse the interior of a range. At least one bound must be present and a
/// single bound without a comma means "exactly".
pub(crate) fn parse_range(inner: &str) -> Option<Range> {
    let bound = |text: &str| -> Option<Option<u32>> {
        if text.is_empty() {
            Some(None)
        } else if text.bytes().all(|b| b.is_ascii_digit()) {
            text.parse().ok().map(Some)
        } else {
            None
        }
    };
    let range = match inner.split_once(',') {
        Some((min, max)) => Range::new(bound(min.trim())?, bound(max.trim())?),
        None => {
            let exact = bound(inner.trim())??;
            Range::new(Some(exact), Some(exact))
        }
    };
    match (range.min, range.max) {
        (None, None) => None,
        (Some(min), Some(max)) if min > max => None,
        _ => Some(range),
    }
}

/// Classify a multiplier-free atomic value. First match wins: brackets, data
/// type, string, method, literal symbol, keyword.
pub(crate) fn classify(value: &str, offset: usize) -> Result<Shape<'_>, ResolveError> {
    let span = Span::at(offset, value.len());
    let fragment = || value.to_string();
    let enclosed = |open: char, close: char| {
        value.len() >= 2 && value.starts_with(open) && value.ends_with(close)
    };
    let inner = || &value[1..value.len() - 1];

    if value.starts_with('[') {
        if !enclosed('[', ']') {
            return Err(ResolveError::MalformedBrackets {
                fragment: fragment(),
                span,
            });
        }
        return Ok(Shape::Brackets {
            interior: inner(),
            interior_offset: offset + 1,
        });
    }

    if value.starts_with('<') {
        if !enclosed('<', '>') {
            return Err(ResolveError::MalformedDataType {
                fragment: fragment(),
                span,
            });
        }
        let name = inner();
        if name.starts_with('\'') {
            if name.len() < 2 || !name.ends_with('\'') {
                return Err(ResolveError::MalformedDataTypeName {
                    fragment: fragment(),
                    span,
                });
            }
            return Ok(Shape::DataType {
                name: &name[1..name.len() - 1],
                non_terminal: true,
            });
        }
        return Ok(Shape::DataType {
            name,
            non_terminal: false,
        });
    }

    if value.starts_with('\'') {
        if !enclosed('\'', '\'') {
            return Err(ResolveError::MalformedString {
                fragment: fragment(),
                span,
            });
        }
        return Ok(Shape::String { value: inner() });
    }

    if let Some(paren) = value.find('(') {
        if !value.ends_with(')') {
            return Err(ResolveError::MalformedMethod {
                fragment: fragment(),
                span,
            });
        }
        return Ok(Shape::Method {
            name: &value[..paren],
            params: &value[paren + 1..value.len() - 1],
            params_offset: offset + paren + 1,
        });
    }

    if let Some(symbol) = LiteralSymbol::from_source(value) {
        return Ok(Shape::Literal(symbol));
    }

    Ok(Shape::Keyword)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn single_char_suffixes() {
        for (text, m) in [
            ("a*", Multiplier::ZeroOrMore),
            ("a+", Multiplier::OneOrMore),
            ("a?", Multiplier::Optional),
            ("<a>#", Multiplier::Array),
            ("[ a ]!", Multiplier::Required),
        ] {
            let (value, multiplier) = strip_multiplier(text, 0).unwrap();
            assert_eq!(value, &text[..text.len() - 1]);
            assert_eq!(multiplier, Some(m), "{text}");
        }
    }

    #[test]
    fn only_one_suffix_is_consumed() {
        let (value, multiplier) = strip_multiplier("a+?", 0).unwrap();
        assert_eq!(value, "a+");
        assert_eq!(multiplier, Some(Multiplier::Optional));
    }

    #[test]
    fn bare_suffix_char_is_not_a_multiplier() {
        assert_eq!(strip_multiplier("*", 0).unwrap(), ("*", None));
    }

    #[test]
    fn range_forms() {
        assert_eq!(parse_range("1,4"), Some(Range::new(Some(1), Some(4))));
        assert_eq!(parse_range("2,"), Some(Range::new(Some(2), None)));
        assert_eq!(parse_range(",3"), Some(Range::new(None, Some(3))));
        assert_eq!(parse_range("3"), Some(Range::new(Some(3), Some(3))));
        assert_eq!(parse_range(","), None);
        assert_eq!(parse_range(""), None);
        assert_eq!(parse_range("a,2"), None);
        assert_eq!(parse_range("4,1"), None);
        assert_eq!(parse_range("99999999999"), None);
    }

    #[test]
    fn range_suffix_is_stripped() {
        let (value, multiplier) = strip_multiplier("[ a | b ] {1,4}", 0).unwrap();
        assert_eq!(value, "[ a | b ]");
        assert_eq!(
            multiplier,
            Some(Multiplier::Range(Range::new(Some(1), Some(4))))
        );
    }

    #[test]
    fn invalid_range_is_an_error() {
        let err = strip_multiplier("<length>{x}", 10).unwrap_err();
        match err {
            ResolveError::MalformedRange { fragment, span } => {
                assert_eq!(fragment, "{x}");
                assert_eq!(span, Span::new(18, 21));
            }
            other => panic!("unexpected error {other:?}"),
        }
    }

    #[test]
    fn classify_shapes() {
        assert_eq!(
            classify("<'margin-top'>", 0).unwrap(),
            Shape::DataType {
                name: "margin-top",
                non_terminal: true
            }
        );
        assert_eq!(
            classify("<length>", 0).unwrap(),
            Shape::DataType {
                name: "length",
                non_terminal: false
            }
        );
        assert_eq!(classify("'['", 0).unwrap(), Shape::String { value: "[" });
        assert_eq!(
            classify("/", 0).unwrap(),
            Shape::Literal(LiteralSymbol::Slash)
        );
        assert_eq!(classify("auto", 0).unwrap(), Shape::Keyword);
        assert_eq!(
            classify("fit-content( <x> )", 4).unwrap(),
            Shape::Method {
                name: "fit-content",
                params: " <x> ",
                params_offset: 16
            }
        );
        assert_eq!(
            classify("[ a ]", 2).unwrap(),
            Shape::Brackets {
                interior: " a ",
                interior_offset: 3
            }
        );
    }

    #[test]
    fn classify_errors() {
        assert!(matches!(
            classify("[ a ] b", 0),
            Err(ResolveError::MalformedBrackets { .. })
        ));
        assert!(matches!(
            classify("<length", 0),
            Err(ResolveError::MalformedDataType { .. })
        ));
        assert!(matches!(
            classify("<'length>", 0),
            Err(ResolveError::MalformedDataTypeName { .. })
        ));
        assert!(matches!(
            classify("'abc", 0),
            Err(ResolveError::MalformedString { .. })
        ));
        assert!(matches!(
            classify("rgb( a ) x", 0),
            Err(ResolveError::MalformedMethod { .. })
        ));
    }
}
