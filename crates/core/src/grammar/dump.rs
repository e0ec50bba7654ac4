use super::ast::Term;

/// Serialize a resolved term to a pretty-printed JSON string.
pub fn to_pretty_json(term: &Term) -> String {
    serde_json::to_string_pretty(term).expect("Term serialization cannot fail")
}
