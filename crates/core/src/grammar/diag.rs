pub use css_syntax_diagnostics::{Diagnostic, Severity, Span, codes, explain};
