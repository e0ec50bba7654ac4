pub use css_syntax_tables::{SyntaxEntry, SyntaxTables, TABLE_FORMAT_VERSION, TableKind, TablesError};
