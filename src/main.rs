//! # Folio CLI
//!
//! Usage:
//!   folio input.json -o pages.json
//!   echo '{ ... }' | folio --lines
//!   folio --example > paper.json

use std::fs::{self, File};
use std::io::{self, BufWriter, Read, Write};
use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::{ArgAction, Parser};
use tracing_subscriber::EnvFilter;

use folio::layout::JsonLinesSink;
use folio::model::DocumentInput;

/// Flow a JSON document into multi-template pages.
#[derive(Debug, Clone, Parser)]
#[command(name = "folio", version, about)]
struct Cli {
    /// Document to lay out. Reads stdin when omitted.
    input: Option<PathBuf>,

    /// Where to write the laid out pages. Writes stdout when omitted.
    #[arg(short, long, value_name = "FILE")]
    output: Option<PathBuf>,

    /// Print the bundled example document and exit.
    #[arg(long)]
    example: bool,

    /// Stream one JSON object per page instead of a single array.
    #[arg(long)]
    lines: bool,

    /// Log pagination decisions to stderr (-v debug, -vv trace).
    #[arg(short, long, action = ArgAction::Count)]
    verbose: u8,
}

fn main() {
    let cli = Cli::parse();
    init_tracing(cli.verbose);

    if cli.example {
        print!("{}", folio::EXAMPLE_DOCUMENT);
        return;
    }

    match run(&cli) {
        Ok(pages) => {
            let target = cli
                .output
                .as_ref()
                .map_or_else(|| "stdout".to_string(), |p| p.display().to_string());
            eprintln!("✓ Laid out {pages} pages to {target}");
        }
        Err(e) => {
            eprintln!("✗ Failed to lay out document: {e:#}");
            std::process::exit(1);
        }
    }
}

fn init_tracing(verbose: u8) {
    let level = match verbose {
        0 => "warn",
        1 => "debug",
        _ => "trace",
    };
    let filter = EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| EnvFilter::new(format!("{}={level}", env!("CARGO_PKG_NAME"))));
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();
}

fn run(cli: &Cli) -> Result<usize> {
    let source = match &cli.input {
        Some(path) => fs::read_to_string(path)
            .with_context(|| format!("failed to read {}", path.display()))?,
        None => {
            let mut buf = String::new();
            io::stdin()
                .read_to_string(&mut buf)
                .context("failed to read stdin")?;
            buf
        }
    };
    let input: DocumentInput =
        serde_json::from_str(&source).context("failed to parse document")?;

    let writer: Box<dyn Write> = match &cli.output {
        Some(path) => Box::new(
            File::create(path).with_context(|| format!("failed to create {}", path.display()))?,
        ),
        None => Box::new(io::stdout().lock()),
    };
    let mut writer = BufWriter::new(writer);

    let pages = if cli.lines {
        let mut sink = JsonLinesSink::new(&mut writer);
        folio::layout_into(&input, &mut sink)?
    } else {
        let pages = folio::layout(&input)?;
        serde_json::to_writer_pretty(&mut writer, &pages).context("failed to write pages")?;
        writeln!(writer)?;
        pages.len()
    };
    writer.flush().context("failed to flush output")?;
    Ok(pages)
}
