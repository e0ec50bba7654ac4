use serde::{Deserialize, Serialize};

/// A node of a resolved grammar tree.
///
/// Every variant keeps the source fragment it was resolved from. Atomic
/// variants (everything except [`Term::Composed`]) carry an optional
/// [`Multiplier`]; their `source` excludes the multiplier suffix.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(tag = "type", rename_all = "kebab-case")]
#[non_exhaustive]
pub enum Term {
    /// Two or more sibling terms joined by one combinator.
    Composed {
        /// Trimmed source of the whole composition.
        source: String,
        /// The combinator joining `children`.
        combinator: Combinator,
        /// Operands in source order (at least two).
        children: Vec<Term>,
    },
    /// A bare identifier matched literally (e.g. `auto`).
    Keyword {
        /// Source text, which is also the keyword itself.
        source: String,
        /// Repetition suffix, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        multiplier: Option<Multiplier>,
    },
    /// A fixed punctuation symbol (`/` or `,`).
    Literal {
        /// Source text.
        source: String,
        /// The symbol.
        symbol: LiteralSymbol,
        /// Repetition suffix, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        multiplier: Option<Multiplier>,
    },
    /// A quoted literal string (e.g. `'['`).
    String {
        /// Source text including quotes.
        source: String,
        /// Content with the quotes stripped.
        value: String,
        /// Repetition suffix, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        multiplier: Option<Multiplier>,
    },
    /// A reference to another grammar: `<name>` or `<'name'>`.
    DataType {
        /// Source text including angle brackets.
        source: String,
        /// Referenced name without brackets or quotes.
        name: String,
        /// `true` for the quoted form, which names a property grammar rather
        /// than a basic data type.
        non_terminal: bool,
        /// Repetition suffix, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        multiplier: Option<Multiplier>,
    },
    /// A function-like term (e.g. `steps(<integer>)`).
    Method {
        /// Source text including the parameter list.
        source: String,
        /// Function name (text before the first `(`).
        name: String,
        /// Resolved parameter grammar; `None` for `name()`.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        params: Option<Box<Term>>,
        /// Repetition suffix, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        multiplier: Option<Multiplier>,
    },
    /// A `[ ... ]` group, or the wrapper around an expanded data type.
    Brackets {
        /// Source text of the group (or of the expanded reference).
        source: String,
        /// Resolved interior.
        content: Box<Term>,
        /// Repetition suffix, if any.
        #[serde(default, skip_serializing_if = "Option::is_none")]
        multiplier: Option<Multiplier>,
    },
}

/// Fieldless discriminant of a [`Term`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum TermKind {
    /// [`Term::Composed`].
    Composed,
    /// [`Term::Keyword`].
    Keyword,
    /// [`Term::Literal`].
    Literal,
    /// [`Term::String`].
    String,
    /// [`Term::DataType`].
    DataType,
    /// [`Term::Method`].
    Method,
    /// [`Term::Brackets`].
    Brackets,
}

impl TermKind {
    /// Lowercase label used by the tree printer and in JSON (`"data-type"`, ...).
    pub fn label(self) -> &'static str {
        match self {
            TermKind::Composed => "composed",
            TermKind::Keyword => "keyword",
            TermKind::Literal => "literal",
            TermKind::String => "string",
            TermKind::DataType => "data-type",
            TermKind::Method => "method",
            TermKind::Brackets => "brackets",
        }
    }
}

impl std::fmt::Display for TermKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl Term {
    /// The variant tag.
    pub fn kind(&self) -> TermKind {
        match self {
            Term::Composed { .. } => TermKind::Composed,
            Term::Keyword { .. } => TermKind::Keyword,
            Term::Literal { .. } => TermKind::Literal,
            Term::String { .. } => TermKind::String,
            Term::DataType { .. } => TermKind::DataType,
            Term::Method { .. } => TermKind::Method,
            Term::Brackets { .. } => TermKind::Brackets,
        }
    }

    /// The source fragment this term was resolved from.
    pub fn source(&self) -> &str {
        match self {
            Term::Composed { source, .. }
            | Term::Keyword { source, .. }
            | Term::Literal { source, .. }
            | Term::String { source, .. }
            | Term::DataType { source, .. }
            | Term::Method { source, .. }
            | Term::Brackets { source, .. } => source,
        }
    }

    /// The multiplier of an atomic term. Always `None` for composed terms.
    pub fn multiplier(&self) -> Option<&Multiplier> {
        match self {
            Term::Composed { .. } => None,
            Term::Keyword { multiplier, .. }
            | Term::Literal { multiplier, .. }
            | Term::String { multiplier, .. }
            | Term::DataType { multiplier, .. }
            | Term::Method { multiplier, .. }
            | Term::Brackets { multiplier, .. } => multiplier.as_ref(),
        }
    }

    /// Whether this is a leaf-shaped (non-composed) term.
    pub fn is_atomic(&self) -> bool {
        !matches!(self, Term::Composed { .. })
    }

    /// Replace the multiplier of an atomic term. No-op on composed terms.
    pub(crate) fn set_multiplier(&mut self, value: Option<Multiplier>) {
        match self {
            Term::Composed { .. } => {}
            Term::Keyword { multiplier, .. }
            | Term::Literal { multiplier, .. }
            | Term::String { multiplier, .. }
            | Term::DataType { multiplier, .. }
            | Term::Method { multiplier, .. }
            | Term::Brackets { multiplier, .. } => *multiplier = value,
        }
    }

    /// Direct sub-terms in source order: children, method params or bracket
    /// content.
    pub fn subterms(&self) -> Vec<&Term> {
        match self {
            Term::Composed { children, .. } => children.iter().collect(),
            Term::Method {
                params: Some(params),
                ..
            } => vec![params.as_ref()],
            Term::Brackets { content, .. } => vec![content.as_ref()],
            _ => Vec::new(),
        }
    }

    /// Leaf terms (no sub-terms) in depth-first source order.
    pub fn leaves(&self) -> Vec<&Term> {
        let mut out = Vec::new();
        collect_leaves(self, &mut out);
        out
    }
}

fn collect_leaves<'t>(term: &'t Term, out: &mut Vec<&'t Term>) {
    let subterms = term.subterms();
    if subterms.is_empty() {
        out.push(term);
    } else {
        for sub in subterms {
            collect_leaves(sub, out);
        }
    }
}

/// Operator joining sibling terms, loosest binding first.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Combinator {
    /// `a | b`: exactly one of the operands.
    ExactlyOne,
    /// `a || b`: at least one of the operands, in any order.
    AtLeastOne,
    /// `a && b`: all operands, in any order.
    AllAnyOrder,
    /// `a b`: all operands, in the written order.
    Juxtaposition,
}

impl Combinator {
    /// Classes in the order the resolver tries them.
    pub const PRECEDENCE: [Combinator; 4] = [
        Combinator::ExactlyOne,
        Combinator::AtLeastOne,
        Combinator::AllAnyOrder,
        Combinator::Juxtaposition,
    ];

    /// Operator text (`" "` for juxtaposition).
    pub fn symbol(self) -> &'static str {
        match self {
            Combinator::ExactlyOne => "|",
            Combinator::AtLeastOne => "||",
            Combinator::AllAnyOrder => "&&",
            Combinator::Juxtaposition => " ",
        }
    }

    /// Separator used when emitting grammar text.
    pub fn separator(self) -> &'static str {
        match self {
            Combinator::ExactlyOne => " | ",
            Combinator::AtLeastOne => " || ",
            Combinator::AllAnyOrder => " && ",
            Combinator::Juxtaposition => " ",
        }
    }
}

impl std::fmt::Display for Combinator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Combinator::Juxtaposition => f.write_str("juxtaposition"),
            other => f.write_str(other.symbol()),
        }
    }
}

/// Fixed punctuation symbols recognized as [`Term::Literal`].
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum LiteralSymbol {
    /// `/`
    Slash,
    /// `,`
    Comma,
}

impl LiteralSymbol {
    /// Match an exact source fragment.
    pub fn from_source(text: &str) -> Option<Self> {
        match text {
            "/" => Some(LiteralSymbol::Slash),
            "," => Some(LiteralSymbol::Comma),
            _ => None,
        }
    }

    /// The symbol text.
    pub fn as_str(self) -> &'static str {
        match self {
            LiteralSymbol::Slash => "/",
            LiteralSymbol::Comma => ",",
        }
    }
}

/// Repetition suffix of an atomic term.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "kebab-case")]
pub enum Multiplier {
    /// `*`
    ZeroOrMore,
    /// `+`
    OneOrMore,
    /// `?`
    Optional,
    /// `#`: one or more, comma separated.
    Array,
    /// `!`: the group must produce at least one value.
    Required,
    /// `{m,n}` and its open-ended forms.
    Range(Range),
}

impl Multiplier {
    /// Match a single-character suffix.
    pub fn from_suffix(c: char) -> Option<Self> {
        match c {
            '*' => Some(Multiplier::ZeroOrMore),
            '+' => Some(Multiplier::OneOrMore),
            '?' => Some(Multiplier::Optional),
            '#' => Some(Multiplier::Array),
            '!' => Some(Multiplier::Required),
            _ => None,
        }
    }
}

impl std::fmt::Display for Multiplier {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            Multiplier::ZeroOrMore => f.write_str("*"),
            Multiplier::OneOrMore => f.write_str("+"),
            Multiplier::Optional => f.write_str("?"),
            Multiplier::Array => f.write_str("#"),
            Multiplier::Required => f.write_str("!"),
            Multiplier::Range(range) => write!(f, "{range}"),
        }
    }
}

/// Bounds of a [`Multiplier::Range`]; a missing bound is open.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct Range {
    /// Minimum repetitions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub min: Option<u32>,
    /// Maximum repetitions.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub max: Option<u32>,
}

impl Range {
    /// Range with both bounds.
    pub fn new(min: Option<u32>, max: Option<u32>) -> Self {
        Self { min, max }
    }
}

impl std::fmt::Display for Range {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match (self.min, self.max) {
            (Some(min), Some(max)) if min == max => write!(f, "{{{min}}}"),
            (Some(min), Some(max)) => write!(f, "{{{min},{max}}}"),
            (Some(min), None) => write!(f, "{{{min},}}"),
            (None, Some(max)) => write!(f, "{{,{max}}}"),
            (None, None) => f.write_str("{,}"),
        }
    }
}
