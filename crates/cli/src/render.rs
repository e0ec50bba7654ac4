//! Diagnostic rendering for the command line.
//!
//! Resolution errors carry byte spans into the grammar that was resolved, so
//! in pretty mode they are drawn with ariadne underneath that grammar. JSON
//! mode writes the diagnostics array to stdout unchanged.

use std::collections::BTreeMap;
use std::io::{self, IsTerminal};

use ariadne::{Color, Config, Fmt, Label, Report, ReportKind, Source};
use css_syntax_diagnostics::Diagnostic;

// ── Output format ───────────────────────────────────────────────────────

/// Output format for command results and diagnostics.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub(crate) enum Format {
    /// Human-readable tree and ariadne diagnostics.
    Pretty,
    /// Machine-readable JSON.
    Json,
}

impl Format {
    /// Use the explicit choice, else pretty for a TTY and JSON for pipes.
    pub(crate) fn resolve_or_detect(explicit: Option<&str>) -> Self {
        match explicit {
            Some("json") => Format::Json,
            Some("pretty") => Format::Pretty,
            _ => {
                if io::stdout().is_terminal() {
                    Format::Pretty
                } else {
                    Format::Json
                }
            }
        }
    }
}

// ── Pretty rendering ────────────────────────────────────────────────────

/// Render diagnostics against `source` to stderr.
///
/// `name` labels the source in the report header: `<grammar>` for inline
/// grammars, the property or data-type name for lookups.
pub(crate) fn render_diagnostics_pretty(source: &str, name: &str, diagnostics: &[Diagnostic]) {
    if diagnostics.is_empty() {
        return;
    }

    let config = Config::default().with_compact(false);
    let mut cache = (name, Source::from(source));

    for diag in diagnostics {
        let Some(span) = &diag.span else {
            eprintln!("{}[{}]: {}", diag.severity, diag.id, diag.message);
            if let Some(ctx) = &diag.context {
                eprintln!("  = note: {}", context_note(ctx));
            }
            if let Some(explanation) = diag.explain() {
                eprintln!("  = help: {explanation}");
            }
            continue;
        };

        // An empty span (missing operand) still gets a one-column caret.
        let start = span.start.min(source.len());
        let end = span.end.min(source.len()).max(start);
        let end = if end == start && end < source.len() {
            end + 1
        } else {
            end
        };

        let mut builder = Report::build(ReportKind::Error, (name, start..end))
            .with_code(diag.id.as_ref())
            .with_message(&diag.message)
            .with_config(config)
            .with_label(
                Label::new((name, start..end))
                    .with_message(label_message(diag))
                    .with_color(Color::Red),
            );

        if let Some(ctx) = &diag.context
            && ctx.len() > 1
        {
            builder = builder.with_note(context_note(ctx));
        }
        if let Some(explanation) = diag.explain() {
            builder = builder.with_help(explanation);
        }

        builder.finish().eprint(&mut cache).ok();
    }
}

/// Label under the span: the offending fragment when known, else the message.
fn label_message(diag: &Diagnostic) -> String {
    let ctx = diag.context.as_ref();
    if let Some(fragment) = ctx.and_then(|c| c.get("fragment")) {
        format!("in `{fragment}`")
    } else if let Some(detail) = ctx.and_then(|c| c.get("detail")) {
        format!("while expanding: {detail}")
    } else {
        diag.message.clone()
    }
}

fn context_note(ctx: &BTreeMap<String, String>) -> String {
    ctx.iter()
        .map(|(k, v)| format!("{k}={v}"))
        .collect::<Vec<_>>()
        .join(", ")
}

// ── JSON rendering ──────────────────────────────────────────────────────

/// Render diagnostics as a JSON array to stdout.
pub(crate) fn render_diagnostics_json(diagnostics: &[Diagnostic]) {
    let json =
        serde_json::to_string_pretty(diagnostics).expect("Diagnostic serialization cannot fail");
    println!("{json}");
}

// ── Unified entry point ─────────────────────────────────────────────────

/// Render diagnostics in the given format.
///
/// - `Pretty` → ariadne output to stderr.
/// - `Json`   → JSON array to stdout.
pub(crate) fn render_diagnostics(
    source: &str,
    name: &str,
    diagnostics: &[Diagnostic],
    format: Format,
) {
    match format {
        Format::Pretty => render_diagnostics_pretty(source, name, diagnostics),
        Format::Json => render_diagnostics_json(diagnostics),
    }
}

// ── Summary line ────────────────────────────────────────────────────────

/// Print a coloured count line, e.g. `1 error`.
pub(crate) fn print_summary(diagnostics: &[Diagnostic]) {
    let errors = diagnostics.len();
    if errors == 0 {
        return;
    }
    let s = if errors == 1 { "" } else { "s" };
    eprintln!("{}", format!("{errors} error{s}").fg(Color::Red));
}
