mod common;

use common::{brackets, data_type, keyword, leaf_sources, resolve, resolve_err};
use css_syntax_core::grammar::ast::{Combinator, LiteralSymbol, Multiplier, Range, Term, TermKind};
use css_syntax_core::grammar::mask::{MASK_PAIRS, mask};
use css_syntax_core::{ResolveError, Span, codes};

fn composed(source: &str, combinator: Combinator, children: Vec<Term>) -> Term {
    Term::Composed {
        source: source.into(),
        combinator,
        children,
    }
}

// ── Worked examples ─────────────────────────────────────────────────────

#[test]
fn step_timing_function() {
    let term = resolve("step-start | step-end | steps(<integer>[, [ start | end ] ]?)");

    let inner_group = brackets(
        "[ start | end ]",
        composed(
            "start | end",
            Combinator::ExactlyOne,
            vec![keyword("start"), keyword("end")],
        ),
        None,
    );
    let optional_group = brackets(
        "[, [ start | end ] ]",
        composed(
            ", [ start | end ]",
            Combinator::Juxtaposition,
            vec![
                Term::Literal {
                    source: ",".into(),
                    symbol: LiteralSymbol::Comma,
                    multiplier: None,
                },
                inner_group,
            ],
        ),
        Some(Multiplier::Optional),
    );
    let steps = Term::Method {
        source: "steps(<integer>[, [ start | end ] ]?)".into(),
        name: "steps".into(),
        params: Some(Box::new(composed(
            "<integer>[, [ start | end ] ]?",
            Combinator::Juxtaposition,
            vec![data_type("integer"), optional_group],
        ))),
        multiplier: None,
    };
    let expected = composed(
        "step-start | step-end | steps(<integer>[, [ start | end ] ]?)",
        Combinator::ExactlyOne,
        vec![keyword("step-start"), keyword("step-end"), steps],
    );
    assert_eq!(term, expected);
}

#[test]
fn bracket_group_with_range() {
    let term = resolve("[ <length> | <percentage> | auto ]{1,4}");
    let expected = brackets(
        "[ <length> | <percentage> | auto ]",
        composed(
            "<length> | <percentage> | auto",
            Combinator::ExactlyOne,
            vec![data_type("length"), data_type("percentage"), keyword("auto")],
        ),
        Some(Multiplier::Range(Range::new(Some(1), Some(4)))),
    );
    assert_eq!(term, expected);
}

#[test]
fn unterminated_bracket_fails() {
    let err = resolve_err("[ <length>");
    assert!(matches!(err, ResolveError::MalformedBrackets { .. }), "{err}");
    assert_eq!(err.code(), codes::MALFORMED_BRACKETS);
    assert_eq!(err.span(), Some(Span::new(0, 10)));
}

// ── Combinator precedence ───────────────────────────────────────────────

#[test]
fn single_bar_is_split_before_double_ampersand() {
    let term = resolve("a && b | c");
    let Term::Composed {
        combinator,
        children,
        ..
    } = &term
    else {
        panic!("expected composition, got {term:?}");
    };
    assert_eq!(*combinator, Combinator::ExactlyOne);
    assert_eq!(children[1], keyword("c"));
    match &children[0] {
        Term::Composed { combinator, .. } => assert_eq!(*combinator, Combinator::AllAnyOrder),
        other => panic!("expected && child, got {other:?}"),
    }
}

#[test]
fn precedence_ladder() {
    let term = resolve("a b && c || d | e");
    let kinds: Vec<Combinator> = {
        let mut out = Vec::new();
        let mut node = &term;
        while let Term::Composed {
            combinator,
            children,
            ..
        } = node
        {
            out.push(*combinator);
            node = &children[0];
        }
        out
    };
    assert_eq!(
        kinds,
        vec![
            Combinator::ExactlyOne,
            Combinator::AtLeastOne,
            Combinator::AllAnyOrder,
            Combinator::Juxtaposition,
        ]
    );
}

#[test]
fn nested_operators_stay_inside_their_group() {
    let term = resolve("[ a | b ] c");
    match term {
        Term::Composed { combinator, .. } => assert_eq!(combinator, Combinator::Juxtaposition),
        other => panic!("expected juxtaposition, got {other:?}"),
    }
}

#[test]
fn commas_split_without_whitespace() {
    let term = resolve("a,b");
    assert_eq!(leaf_sources(&term), vec!["a", ",", "b"]);
}

// ── Atomic shapes ───────────────────────────────────────────────────────

#[test]
fn unrecognized_atom_is_a_keyword() {
    let term = resolve("  fit-content  ");
    assert_eq!(term, keyword("fit-content"));

    let term = resolve("dense?");
    assert_eq!(term.kind(), TermKind::Keyword);
    assert_eq!(term.source(), "dense");
    assert_eq!(term.multiplier(), Some(&Multiplier::Optional));
}

#[test]
fn quoted_name_is_non_terminal() {
    let term = resolve("<'grid-template-rows'>");
    match term {
        Term::DataType {
            name, non_terminal, ..
        } => {
            assert_eq!(name, "grid-template-rows");
            assert!(non_terminal);
        }
        other => panic!("expected data type, got {other:?}"),
    }
}

#[test]
fn string_literals_hide_brackets() {
    let term = resolve("'[' <custom-ident>* ']'");
    let leaves = term.leaves();
    assert_eq!(leaves.len(), 3);
    assert_eq!(leaves[0].kind(), TermKind::String);
    assert_eq!(leaves[1].multiplier(), Some(&Multiplier::ZeroOrMore));
    match leaves[2] {
        Term::String { value, .. } => assert_eq!(value, "]"),
        other => panic!("expected string, got {other:?}"),
    }
}

#[test]
fn data_type_with_inline_bounds() {
    let term = resolve("<integer [1,∞]>");
    match term {
        Term::DataType { name, .. } => assert_eq!(name, "integer [1,∞]"),
        other => panic!("expected data type, got {other:?}"),
    }
}

#[test]
fn array_and_exact_range() {
    let term = resolve("<shadow>#");
    assert_eq!(term.multiplier(), Some(&Multiplier::Array));
    let term = resolve("<number>{3}");
    assert_eq!(
        term.multiplier(),
        Some(&Multiplier::Range(Range::new(Some(3), Some(3))))
    );
}

// ── Errors ──────────────────────────────────────────────────────────────

#[test]
fn error_classes() {
    let cases: &[(&str, &str)] = &[
        ("a | <length", codes::MALFORMED_DATA_TYPE),
        ("<'a'b>", codes::MALFORMED_DATA_TYPE_NAME),
        ("<'length>", codes::MALFORMED_DATA_TYPE_NAME),
        ("a <'length", codes::MALFORMED_STRING),
        ("a 'b", codes::MALFORMED_STRING),
        ("steps(<integer>", codes::MALFORMED_METHOD),
        ("a{1,", codes::MALFORMED_RANGE),
        ("a{3,1}", codes::MALFORMED_RANGE),
        ("a{x}", codes::MALFORMED_RANGE),
        ("a | | b", codes::EMPTY_TERM),
        ("[ ]", codes::EMPTY_TERM),
        ("", codes::EMPTY_TERM),
    ];
    for (grammar, code) in cases {
        let err = resolve_err(grammar);
        assert_eq!(err.code(), *code, "{grammar:?}: {err}");
    }
}

#[test]
fn unclosed_quote_in_reference_is_a_data_type_name_error() {
    let err = resolve_err("auto | <'length> b");
    assert_eq!(
        err,
        ResolveError::MalformedDataTypeName {
            fragment: "<'length>".to_string(),
            span: Span::new(7, 16),
        }
    );
}

#[test]
fn detached_range_is_malformed() {
    let err = resolve_err("[ a ] {1,4}");
    assert_eq!(
        err,
        ResolveError::MalformedRange {
            fragment: "{1,4}".to_string(),
            span: Span::new(6, 11),
        }
    );
}

#[test]
fn error_converts_to_diagnostic() {
    let err = resolve_err("auto | fit-content(<length>");
    let diag = err.to_diagnostic();
    assert_eq!(&*diag.id, codes::MALFORMED_METHOD);
    assert_eq!(diag.span, Some(Span::new(18, 27)));
    let ctx = diag.context.expect("fragment context");
    assert_eq!(ctx.get("fragment").map(String::as_str), Some("(<length>"));
}

// ── Masking ─────────────────────────────────────────────────────────────

#[test]
fn masking_is_idempotent_for_every_pair() {
    let grammar = "steps(<integer>[, [ start | end ] ]?) | 'x' y{1,2}";
    for (open, close) in MASK_PAIRS {
        let (open, close) = (char::from(open), char::from(close));
        let once = mask(grammar, open, close).unwrap();
        let twice = mask(&once, open, close).unwrap();
        assert_eq!(once, twice, "pair {open}{close}");
        assert_eq!(once.len(), grammar.len());
    }
}
