//! # Commentary Compiler CLI (`commentaries`)
//!
//! Compiles a commentary tree into one output format per run.
//!
//! ## Usage
//!
//! ```bash
//! commentaries [--config compile.toml] [--root DIR] <command> [-o OUT]
//! ```
//!
//! ## Commands
//!
//! | Command | Output | Default path |
//! |---------|--------|--------------|
//! | `commentaries json` | JSON array of rows | `data.json` |
//! | `commentaries csv` | CSV with header | `data.csv` |
//! | `commentaries sqlite` | SQLite database | `data.sqlite` |
//! | `commentaries osis` | OSIS XML commentary | `data.xml` |
//! | `commentaries dryrun` | nothing; reports problems | |
//!
//! ## Examples
//!
//! ```bash
//! # Check the whole tree without writing anything
//! commentaries --root ./commentaries dryrun
//!
//! # Build the database used by the app
//! commentaries --root ./commentaries sqlite -o build/commentaries.sqlite
//!
//! # OSIS for SWORD module tooling
//! commentaries --config compile.toml osis -o build/commentaries.xml
//! ```

use anyhow::Result;
use clap::{Args, Parser, Subcommand};
use std::path::PathBuf;

use commentary_compiler::config::{self, Config};
use commentary_compiler::emit::{self, OutputKind};
use commentary_compiler::logging;
use commentary_compiler::pipeline::{self, CompileOptions};

/// Compiles a tree of TOML Bible commentaries into SQLite, JSON, CSV or OSIS.
#[derive(Parser)]
#[command(name = "commentaries", version, about)]
struct Cli {
    /// Optional configuration file (TOML). Built-in defaults apply without it.
    #[arg(long, global = true)]
    config: Option<PathBuf>,

    /// Root of the commentary tree. Overrides `input.root` from the config.
    #[arg(long, global = true)]
    root: Option<PathBuf>,

    /// Only log warnings and errors.
    #[arg(long, short, global = true)]
    quiet: bool,

    #[command(subcommand)]
    command: Commands,
}

#[derive(Subcommand)]
enum Commands {
    /// Write all records as a JSON array.
    Json(OutArgs),
    /// Write all records as CSV.
    Csv(OutArgs),
    /// Write the `father_meta` and `commentary` tables to a SQLite database.
    Sqlite(OutArgs),
    /// Write an OSIS commentary document.
    Osis(OutArgs),
    /// Run the whole pipeline, report every problem, write nothing.
    #[command(alias = "dry-run")]
    Dryrun,
}

#[derive(Args)]
struct OutArgs {
    /// Output path (defaults depend on the format).
    #[arg(short, long)]
    out: Option<PathBuf>,
}

impl Commands {
    fn resolve(self) -> (OutputKind, Option<PathBuf>) {
        match self {
            Commands::Json(a) => (OutputKind::Json, a.out),
            Commands::Csv(a) => (OutputKind::Csv, a.out),
            Commands::Sqlite(a) => (OutputKind::Sqlite, a.out),
            Commands::Osis(a) => (OutputKind::Osis, a.out),
            Commands::Dryrun => (OutputKind::DryRun, None),
        }
    }
}

#[tokio::main]
async fn main() -> Result<()> {
    let cli = Cli::parse();
    logging::init(if cli.quiet { "warn" } else { "info" });

    let mut cfg = match &cli.config {
        Some(path) => config::load_config(path)?,
        None => Config::default(),
    };
    if let Some(root) = cli.root {
        cfg.input.root = root;
    }

    let (kind, out) = cli.command.resolve();
    let options = CompileOptions {
        keep_going: kind == OutputKind::DryRun,
    };

    let compilation = pipeline::compile(&cfg, options)?;

    println!("compile {}", kind.name());
    println!("  authors: {}", compilation.authors.len());
    println!("  documents: {}", compilation.documents_read);
    println!("  records: {}", compilation.records.len());
    println!("  skipped documents: {}", compilation.skipped.len());

    if kind == OutputKind::DryRun {
        println!("  errors: {}", compilation.failed.len());
        println!("dryrun finished");
        return Ok(());
    }

    let out = out
        .or_else(|| kind.default_path().map(PathBuf::from))
        .unwrap_or_else(|| PathBuf::from("data.out"));
    let summary = emit::emit(kind, &compilation, &cfg, &out).await?;

    println!("  records written: {}", summary.records_written);
    if summary.records_dropped > 0 {
        println!("  records dropped: {}", summary.records_dropped);
    }
    println!("  output: {}", out.display());
    println!("ok");

    Ok(())
}
