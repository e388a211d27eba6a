//! anvil-fetch: GET a backend resource and print it normalized
//!
//! Usage:
//!   # Single record
//!   anvil-fetch /suppliers/65f1c0
//!
//!   # Second page of customers, 50 per page
//!   ANVIL_TOKEN=... anvil-fetch /customers --page 2 --page-size 50
//!
//!   # Plain collection endpoint
//!   anvil-fetch /categories --list --base-url http://erp.internal/api

#[global_allocator]
static GLOBAL: mimalloc::MiMalloc = mimalloc::MiMalloc;

use anvil::{client, logging, Config, Error, TokenStore};
use anyhow::{Context, Result};
use clap::Parser;
use serde_json::Value;
use std::path::PathBuf;

#[derive(Parser, Debug)]
#[command(name = "anvil-fetch")]
#[command(about = "Fetch a backend resource and print it normalized", long_about = None)]
struct Args {
    /// Resource path relative to the API base URL
    #[arg(value_name = "PATH")]
    path: String,

    /// Fetch this page of a paginated collection (1-based)
    #[arg(long, conflicts_with = "list")]
    page: Option<u64>,

    /// Page size used with --page
    #[arg(long, default_value_t = 20)]
    page_size: u64,

    /// The endpoint returns a plain array
    #[arg(long)]
    list: bool,

    /// Bearer token for the session
    #[arg(long, env = "ANVIL_TOKEN", hide_env_values = true)]
    token: Option<String>,

    /// Override the configured API base URL
    #[arg(long)]
    base_url: Option<String>,

    /// Configuration file (defaults to config.toml next to the binary)
    #[arg(long, value_name = "PATH")]
    config: Option<PathBuf>,

    /// Compact output (no pretty-printing)
    #[arg(long)]
    compact: bool,

    /// Verbose logging on stderr
    #[arg(long, short = 'v')]
    verbose: bool,
}

fn main() -> Result<()> {
    let args = Args::parse();
    logging::initialize(args.verbose)?;

    let mut config = Config::load(args.config.as_deref())?;
    if let Some(base_url) = args.base_url {
        config.api.base_url = base_url;
    }

    let tokens = TokenStore::new();
    if let Some(token) = args.token {
        tokens.set(token);
    }

    let api = client::from_config(&config, tokens, || {
        eprintln!("Session expired: log in again and retry with a fresh token");
    })
    .context("Failed to build API client")?;

    let result = if let Some(page) = args.page {
        api.get_page(&args.path, page, args.page_size)
            .map(|page| page.into_value(api.normalizer().config()))
    } else if args.list {
        api.get_list(&args.path, &[]).map(Value::Array)
    } else {
        api.get(&args.path)
    };

    let output = match result {
        Ok(value) => value,
        Err(Error::Unauthorized) => anyhow::bail!("Request to {} was rejected (401)", args.path),
        Err(e) => return Err(e).with_context(|| format!("Request to {} failed", args.path)),
    };

    let rendered = if args.compact {
        serde_json::to_string(&output)?
    } else {
        serde_json::to_string_pretty(&output)?
    };
    println!("{}", rendered);

    Ok(())
}
