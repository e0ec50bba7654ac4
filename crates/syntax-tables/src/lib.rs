//! CSS syntax tables.
//!
//! Two name→grammar maps consumed by the resolver when expanding data-type
//! references: `properties` holds the value grammar of each CSS property
//! (referenced as `<'name'>`), `syntaxes` holds the grammar of each basic
//! data type (referenced as `<name>`). The tables are deserialized from the
//! JSON file shipped with this crate, or built from raw `mdn-data` files.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::sync::LazyLock;

/// Current format version for the syntax table JSON schema.
pub const TABLE_FORMAT_VERSION: &str = "0.1.0";

/// Tables shipped with the crate.
const BUNDLED_JSON: &str = include_str!("../data/syntax_tables.json");

static BUNDLED: LazyLock<SyntaxTables> = LazyLock::new(|| {
    SyntaxTables::from_json(BUNDLED_JSON).expect("bundled syntax tables are valid")
});

/// Failure to load syntax tables.
#[derive(Debug, thiserror::Error)]
#[non_exhaustive]
pub enum TablesError {
    /// The input is not valid tables JSON.
    #[error("invalid syntax tables JSON: {0}")]
    Json(#[from] serde_json::Error),
    /// The tables were written by an incompatible format version.
    #[error("unsupported table format version {found} (expected {expected})")]
    FormatVersion {
        /// Version found in the file.
        found: String,
        /// Version this crate reads.
        expected: &'static str,
    },
}

/// Which of the two tables a name is looked up in.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TableKind {
    /// Property value grammars, referenced as `<'name'>`.
    Properties,
    /// Basic data-type grammars, referenced as `<name>`.
    Syntaxes,
}

impl TableKind {
    /// Table holding the grammar for a data-type reference.
    ///
    /// Quoted (`non_terminal`) references name a property.
    pub fn for_reference(non_terminal: bool) -> Self {
        if non_terminal {
            TableKind::Properties
        } else {
            TableKind::Syntaxes
        }
    }
}

impl std::fmt::Display for TableKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        match self {
            TableKind::Properties => write!(f, "properties"),
            TableKind::Syntaxes => write!(f, "syntaxes"),
        }
    }
}

/// A single table entry.
///
/// Mirrors the shape of an `mdn-data` record; fields other than `syntax`
/// are ignored on input.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxEntry {
    /// Grammar string in the value definition syntax.
    pub syntax: String,
}

impl SyntaxEntry {
    /// Create an entry for the given grammar.
    pub fn new(syntax: impl Into<String>) -> Self {
        Self {
            syntax: syntax.into(),
        }
    }
}

/// Name→grammar tables for properties and data types.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct SyntaxTables {
    /// Table format version for compatibility checks.
    #[serde(default = "default_format_version")]
    pub format_version: String,
    /// Property name → value grammar.
    #[serde(default)]
    pub properties: BTreeMap<String, SyntaxEntry>,
    /// Data-type name (without angle brackets) → grammar.
    #[serde(default)]
    pub syntaxes: BTreeMap<String, SyntaxEntry>,
}

fn default_format_version() -> String {
    TABLE_FORMAT_VERSION.to_string()
}

fn entries<'a>(
    pairs: impl IntoIterator<Item = (&'a str, &'a str)>,
) -> BTreeMap<String, SyntaxEntry> {
    pairs
        .into_iter()
        .map(|(name, syntax)| (name.to_string(), SyntaxEntry::new(syntax)))
        .collect()
}

impl SyntaxTables {
    /// Create tables from the two maps.
    pub fn new(
        properties: BTreeMap<String, SyntaxEntry>,
        syntaxes: BTreeMap<String, SyntaxEntry>,
    ) -> Self {
        Self {
            format_version: default_format_version(),
            properties,
            syntaxes,
        }
    }

    /// Build tables from `(name, grammar)` pairs.
    pub fn from_pairs<'a>(
        properties: impl IntoIterator<Item = (&'a str, &'a str)>,
        syntaxes: impl IntoIterator<Item = (&'a str, &'a str)>,
    ) -> Self {
        Self::new(entries(properties), entries(syntaxes))
    }

    /// The tables bundled with this crate.
    pub fn bundled() -> &'static SyntaxTables {
        &BUNDLED
    }

    /// Parse tables from their JSON representation.
    pub fn from_json(json: &str) -> Result<Self, TablesError> {
        let tables: SyntaxTables = serde_json::from_str(json)?;
        if tables.format_version != TABLE_FORMAT_VERSION {
            return Err(TablesError::FormatVersion {
                found: tables.format_version,
                expected: TABLE_FORMAT_VERSION,
            });
        }
        tracing::debug!(
            properties = tables.properties.len(),
            syntaxes = tables.syntaxes.len(),
            "loaded syntax tables"
        );
        Ok(tables)
    }

    /// Build tables from raw `mdn-data` files (`css/properties.json` and
    /// `css/syntaxes.json`).
    ///
    /// Both files are objects keyed by name whose records carry a `syntax`
    /// string; every other field is dropped.
    pub fn from_mdn_json(properties_json: &str, syntaxes_json: &str) -> Result<Self, TablesError> {
        let properties: BTreeMap<String, SyntaxEntry> = serde_json::from_str(properties_json)?;
        let syntaxes: BTreeMap<String, SyntaxEntry> = serde_json::from_str(syntaxes_json)?;
        tracing::debug!(
            properties = properties.len(),
            syntaxes = syntaxes.len(),
            "imported mdn-data tables"
        );
        Ok(Self::new(properties, syntaxes))
    }

    /// Serialize the tables as pretty-printed JSON.
    pub fn to_pretty_json(&self) -> String {
        serde_json::to_string_pretty(self).expect("SyntaxTables serialization cannot fail")
    }

    /// Grammar of a property, if known.
    pub fn property(&self, name: &str) -> Option<&str> {
        self.properties.get(name).map(|e| e.syntax.as_str())
    }

    /// Grammar of a basic data type, if known.
    pub fn syntax(&self, name: &str) -> Option<&str> {
        self.syntaxes.get(name).map(|e| e.syntax.as_str())
    }

    /// Grammar of `name` in the given table.
    pub fn lookup(&self, kind: TableKind, name: &str) -> Option<&str> {
        match kind {
            TableKind::Properties => self.property(name),
            TableKind::Syntaxes => self.syntax(name),
        }
    }

    /// Sorted names in the given table.
    pub fn names(&self, kind: TableKind) -> impl Iterator<Item = &str> {
        let map = match kind {
            TableKind::Properties => &self.properties,
            TableKind::Syntaxes => &self.syntaxes,
        };
        map.keys().map(String::as_str)
    }

    /// Total number of entries across both tables.
    pub fn len(&self) -> usize {
        self.properties.len() + self.syntaxes.len()
    }

    /// Whether both tables are empty.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty() && self.syntaxes.is_empty()
    }
}
