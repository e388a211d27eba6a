//! anvil-normalize: Rewrite backend `_id` keys to frontend `id` keys
//!
//! Usage:
//!   # Normalize a single response body
//!   anvil-normalize response.json
//!
//!   # Read from stdin, treat the body as a paginated envelope
//!   curl -s $API/suppliers | anvil-normalize --page
//!
//!   # Process NDJSON exports line by line, compact output
//!   anvil-normalize --ndjson suppliers.jsonl
//!
//!   # Turn frontend records back into backend form
//!   anvil-normalize --reverse form_state.json

// Use MiMalloc allocator for better performance (recommended by simd-json)
#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anvil::{logging, Config, Normalizer};
use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use std::fs::File;
use std::io::{stdin, BufReader, Read, Write};
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "anvil-normalize")]
#[command(about = "Normalize backend identifiers in JSON API responses", long_about = None)]
struct Args {
    /// Input file (use stdin if omitted)
    #[arg(value_name = "FILE")]
    input: Option<PathBuf>,

    /// Process newline-delimited JSON (one record per line)
    #[arg(long, conflicts_with_all = ["list", "page"])]
    ndjson: bool,

    /// Treat the input as a list; non-arrays produce `[]`
    #[arg(long, conflicts_with = "page")]
    list: bool,

    /// Treat the input as a paginated envelope
    #[arg(long)]
    page: bool,

    /// Map frontend keys back to backend keys
    #[arg(long)]
    reverse: bool,

    /// Compact output (no pretty-printing)
    #[arg(long)]
    compact: bool,

    /// Configuration file (defaults to config.toml next to the binary)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Override the backend identifier key
    #[arg(long)]
    backend_key: Option<String>,

    /// Override the frontend identifier key
    #[arg(long)]
    frontend_key: Option<String>,

    /// Verbose logging on stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::initialize(args.verbose)?;

    let config = Config::load(args.config.as_deref())?;
    let mut normalize = config.normalize;
    if let Some(key) = args.backend_key {
        normalize.backend_key = key;
    }
    if let Some(key) = args.frontend_key {
        normalize.frontend_key = key;
    }
    if args.reverse {
        normalize = normalize.reversed();
    }
    tracing::debug!(
        backend_key = %normalize.backend_key,
        frontend_key = %normalize.frontend_key,
        "Normalizer configured"
    );
    let normalizer = Normalizer::new(normalize);

    let reader: Box<dyn Read> = if let Some(file_path) = &args.input {
        Box::new(File::open(file_path).with_context(|| format!("Failed to open {}", file_path.display()))?)
    } else {
        Box::new(stdin())
    };

    let stdout = std::io::stdout();
    let mut out = stdout.lock();

    if args.ndjson {
        let count = anvil::normalize_ndjson(BufReader::new(reader), &mut out, &normalizer)?;
        if count == 0 {
            tracing::warn!("No JSON records found in input");
        }
        out.flush()?;
        return Ok(());
    }

    let value = read_document(reader)?;
    let output = if args.page {
        let page = normalizer.normalize_page(&value);
        tracing::debug!(items = page.items.len(), total = page.total(), "Normalized page");
        page.into_value(normalizer.config())
    } else if args.list {
        Value::Array(normalizer.normalize_list(&value))
    } else {
        normalizer.normalize(&value)
    };

    if args.compact {
        serde_json::to_writer(&mut out, &output)?;
    } else {
        serde_json::to_writer_pretty(&mut out, &output)?;
    }
    writeln!(out)?;
    out.flush()?;

    Ok(())
}

/// Parse one JSON document using SIMD-accelerated parsing when possible
fn read_document(reader: Box<dyn Read>) -> Result<Value> {
    let mut content = Vec::new();
    BufReader::new(reader)
        .read_to_end(&mut content)
        .context("Failed to read input")?;

    if content.iter().all(u8::is_ascii_whitespace) {
        anyhow::bail!("No JSON document found in input");
    }

    // simd-json parses in place, so keep the original bytes for the fallback
    let mut scratch = content.clone();
    match simd_json::serde::from_slice::<Value>(&mut scratch) {
        Ok(value) => Ok(value),
        Err(simd_err) => {
            tracing::debug!("SIMD parse failed ({}), retrying with serde_json", simd_err);
            serde_json::from_slice(&content).context("Failed to parse JSON input")
        }
    }
}
