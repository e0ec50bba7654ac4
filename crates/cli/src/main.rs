mod render;

use std::fs;
use std::process;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser, Subcommand, ValueEnum};
use css_syntax_core::grammar::tables::{SyntaxTables, TableKind, TablesError};
use css_syntax_core::{
    ResolveError, Term, TreeConfig, emit_grammar, render_tree, resolve_data_type,
    resolve_property, resolve_with_tables,
};
use css_syntax_diagnostics::{self as diag, Diagnostic, codes};
use tracing_subscriber::EnvFilter;

use crate::render::{Format, print_summary, render_diagnostics};

// ── CLI definition ──────────────────────────────────────────────────────

#[derive(Parser, Debug)]
#[command(
    name = "css-syntax",
    version,
    about = "Resolve CSS value-definition syntax into typed grammar trees"
)]
struct Cli {
    /// Output mode: "pretty" for human-readable terminal output, "json" for
    /// machine-readable JSON. Defaults to "pretty" when stdout is a TTY,
    /// "json" otherwise.
    #[arg(long, global = true, value_parser = ["pretty", "json"])]
    output: Option<String>,

    /// Increase log verbosity (-v info, -vv debug, -vvv trace). `RUST_LOG`
    /// takes precedence when set.
    #[arg(short, long, global = true, action = ArgAction::Count)]
    verbose: u8,

    #[command(subcommand)]
    cmd: Cmd,
}

#[derive(Subcommand, Debug)]
enum Cmd {
    // ── Resolution ──────────────────────────────────────────────────
    /// Resolve a grammar string and print its tree.
    Resolve {
        grammar: String,
        /// Expand data-type references against the syntax tables.
        #[arg(long)]
        recursive: bool,
        /// Path to syntax tables JSON. When omitted, the bundled tables are
        /// used.
        #[arg(long)]
        tables: Option<String>,
        /// Print normalized grammar text instead of the tree.
        #[arg(long)]
        emit: bool,
    },

    /// Resolve the grammar of a CSS property.
    Property {
        name: String,
        /// Expand data-type references (see `resolve --help`).
        #[arg(long)]
        recursive: bool,
        /// Path to syntax tables JSON (see `resolve --help`).
        #[arg(long)]
        tables: Option<String>,
    },

    /// Resolve the grammar of a basic data type (name without `<>`).
    DataType {
        name: String,
        /// Expand data-type references (see `resolve --help`).
        #[arg(long)]
        recursive: bool,
        /// Path to syntax tables JSON (see `resolve --help`).
        #[arg(long)]
        tables: Option<String>,
    },

    // ── Tables ──────────────────────────────────────────────────────
    /// List the names in one of the syntax tables.
    List {
        #[arg(value_enum)]
        table: TableArg,
        /// Path to syntax tables JSON (see `resolve --help`).
        #[arg(long)]
        tables: Option<String>,
    },

    /// Build syntax tables JSON from raw mdn-data files.
    Import {
        /// Path to mdn-data `css/properties.json`.
        #[arg(long)]
        properties: String,
        /// Path to mdn-data `css/syntaxes.json`.
        #[arg(long)]
        syntaxes: String,
        /// Write the tables to this file instead of stdout.
        #[arg(long)]
        out: Option<String>,
    },

    // ── Reference / informational ───────────────────────────────────
    /// Explain a diagnostic ID (e.g. CSS1001).
    Explain { id: String },
}

/// Table selector for the `list` command.
#[derive(Debug, Clone, Copy, ValueEnum)]
enum TableArg {
    /// Property grammars (`<'name'>`).
    Properties,
    /// Basic data-type grammars (`<name>`).
    Syntaxes,
}

impl From<TableArg> for TableKind {
    fn from(t: TableArg) -> Self {
        match t {
            TableArg::Properties => TableKind::Properties,
            TableArg::Syntaxes => TableKind::Syntaxes,
        }
    }
}

// ── Main ────────────────────────────────────────────────────────────────

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);
    let format = Format::resolve_or_detect(cli.output.as_deref());

    if let Err(err) = run(cli.cmd, format) {
        match format {
            Format::Json => {
                let out = serde_json::json!({
                    "success": false,
                    "error": "command_failed",
                    "message": format!("{err:#}"),
                });
                println!(
                    "{}",
                    serde_json::to_string_pretty(&out).expect("error JSON serialization cannot fail")
                );
            }
            Format::Pretty => eprintln!("error: {err:#}"),
        }
        process::exit(1);
    }
}

fn run(cmd: Cmd, format: Format) -> Result<()> {
    match cmd {
        Cmd::Resolve {
            grammar,
            recursive,
            tables,
            emit,
        } => cmd_resolve(&grammar, recursive, tables.as_deref(), emit, format),
        Cmd::Property {
            name,
            recursive,
            tables,
        } => cmd_lookup(
            TableKind::Properties,
            &name,
            recursive,
            tables.as_deref(),
            format,
        ),
        Cmd::DataType {
            name,
            recursive,
            tables,
        } => cmd_lookup(
            TableKind::Syntaxes,
            &name,
            recursive,
            tables.as_deref(),
            format,
        ),
        Cmd::List { table, tables } => cmd_list(table.into(), tables.as_deref(), format),
        Cmd::Import {
            properties,
            syntaxes,
            out,
        } => cmd_import(&properties, &syntaxes, out.as_deref(), format),
        Cmd::Explain { id } => cmd_explain(&id, format),
    }
}

/// Install a stderr subscriber. `RUST_LOG` wins over `-v`.
fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "info",
        2 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new(level));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(std::io::stderr)
        .with_target(false)
        .init();
}

// ── Commands ────────────────────────────────────────────────────────────

fn cmd_resolve(
    grammar: &str,
    recursive: bool,
    tables_path: Option<&str>,
    emit: bool,
    format: Format,
) -> Result<()> {
    let loaded = if recursive {
        Some(load_tables(tables_path, format)?)
    } else {
        None
    };
    let tables = loaded.as_ref().map(|t| t.get());
    tracing::info!(grammar, recursive, "resolving grammar");

    let term = match resolve_with_tables(grammar, tables) {
        Ok(term) => term,
        Err(err) => fail(grammar, "<grammar>", &err, format),
    };

    match format {
        Format::Json => {
            let out = if emit {
                serde_json::json!({ "grammar": grammar, "emitted": emit_grammar(&term) })
            } else {
                serde_json::json!({ "grammar": grammar, "term": term })
            };
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            if emit {
                println!("{}", emit_grammar(&term));
            } else {
                print_tree(&term);
            }
        }
    }
    Ok(())
}

fn cmd_lookup(
    kind: TableKind,
    name: &str,
    recursive: bool,
    tables_path: Option<&str>,
    format: Format,
) -> Result<()> {
    let loaded = load_tables(tables_path, format)?;
    let tables = loaded.get();
    tracing::info!(%kind, name, recursive, "resolving named grammar");

    let result = match kind {
        TableKind::Properties => resolve_property(name, tables, recursive),
        TableKind::Syntaxes => resolve_data_type(name, tables, recursive),
    };
    let grammar = tables.lookup(kind, name).unwrap_or(name);
    let term = match result {
        Ok(term) => term,
        Err(err) => fail(grammar, name, &err, format),
    };

    match format {
        Format::Json => {
            let out = serde_json::json!({
                "name": name,
                "table": kind,
                "grammar": grammar,
                "term": term,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            eprintln!("{name}: {grammar}");
            print_tree(&term);
        }
    }
    Ok(())
}

fn cmd_list(kind: TableKind, tables_path: Option<&str>, format: Format) -> Result<()> {
    let loaded = load_tables(tables_path, format)?;
    let names: Vec<&str> = loaded.get().names(kind).collect();

    match format {
        Format::Json => {
            let out = serde_json::json!({ "table": kind, "names": names });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            for name in &names {
                println!("{name}");
            }
            eprintln!("{} {kind}", names.len());
        }
    }
    Ok(())
}

fn cmd_import(
    properties_path: &str,
    syntaxes_path: &str,
    out_path: Option<&str>,
    format: Format,
) -> Result<()> {
    let properties = fs::read_to_string(properties_path)
        .with_context(|| format!("failed to read properties file '{properties_path}'"))?;
    let syntaxes = fs::read_to_string(syntaxes_path)
        .with_context(|| format!("failed to read syntaxes file '{syntaxes_path}'"))?;
    let tables = match SyntaxTables::from_mdn_json(&properties, &syntaxes) {
        Ok(tables) => tables,
        Err(err) => fail_tables(properties_path, &err, format),
    };
    let json = tables.to_pretty_json();

    match out_path {
        Some(path) => {
            fs::write(path, format!("{json}\n"))
                .with_context(|| format!("failed to write tables file '{path}'"))?;
            match format {
                Format::Json => {
                    let out = serde_json::json!({
                        "status": "imported",
                        "file": path,
                        "properties": tables.properties.len(),
                        "syntaxes": tables.syntaxes.len(),
                    });
                    println!("{}", serde_json::to_string_pretty(&out)?);
                }
                Format::Pretty => eprintln!(
                    "imported {} properties and {} syntaxes: {path}",
                    tables.properties.len(),
                    tables.syntaxes.len()
                ),
            }
        }
        None => println!("{json}"),
    }
    Ok(())
}

fn cmd_explain(id: &str, format: Format) -> Result<()> {
    match format {
        Format::Json => {
            let text = diag::explain(id);
            let out = serde_json::json!({
                "id": id,
                "explanation": text,
            });
            println!("{}", serde_json::to_string_pretty(&out)?);
        }
        Format::Pretty => {
            if let Some(text) = diag::explain(id) {
                use ariadne::Fmt;
                println!("{}: {}", id.fg(ariadne::Color::Cyan), text);
            } else {
                println!("{}: (no explanation available)", id);
            }
        }
    }
    Ok(())
}

// ── Helpers ─────────────────────────────────────────────────────────────

/// Tables chosen for a command: an explicit file or the bundled copy.
enum LoadedTables {
    File(SyntaxTables),
    Bundled,
}

impl LoadedTables {
    fn get(&self) -> &SyntaxTables {
        match self {
            LoadedTables::File(tables) => tables,
            LoadedTables::Bundled => SyntaxTables::bundled(),
        }
    }
}

/// Load tables from `--tables` when given, otherwise use the bundled ones.
///
/// A file that cannot be read is a command failure; a file that is not valid
/// tables JSON is reported as a diagnostic.
fn load_tables(explicit_path: Option<&str>, format: Format) -> Result<LoadedTables> {
    let Some(path) = explicit_path else {
        return Ok(LoadedTables::Bundled);
    };
    let json = fs::read_to_string(path)
        .with_context(|| format!("failed to read tables file '{path}'"))?;
    match SyntaxTables::from_json(&json) {
        Ok(tables) => {
            tracing::debug!(path, entries = tables.len(), "loaded tables file");
            Ok(LoadedTables::File(tables))
        }
        Err(err) => fail_tables(path, &err, format),
    }
}

fn print_tree(term: &Term) {
    print!("{}", render_tree(term, &TreeConfig::default()));
}

/// Render a resolution error against `source` and exit with code 1.
fn fail(source: &str, filename: &str, err: &ResolveError, format: Format) -> ! {
    let diagnostics = [err.to_diagnostic()];
    render_diagnostics(source, filename, &diagnostics, format);
    if format == Format::Pretty {
        print_summary(&diagnostics);
    }
    process::exit(1);
}

/// Render an invalid-tables diagnostic for `path` and exit with code 1.
fn fail_tables(path: &str, err: &TablesError, format: Format) -> ! {
    let diagnostics = [Diagnostic::error(
        codes::INVALID_TABLES,
        format!("invalid syntax tables: {err}"),
        None,
    )
    .with_context(std::collections::BTreeMap::from([(
        "path".to_string(),
        path.to_string(),
    )]))];
    render_diagnostics("", path, &diagnostics, format);
    if format == Format::Pretty {
        print_summary(&diagnostics);
    }
    process::exit(1);
}
