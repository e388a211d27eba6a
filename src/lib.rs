//! # Anvil - API Response Normalization Toolkit
//!
//! Data-layer utilities for an ERP frontend: reconcile backend identifiers
//! with frontend ones, map order forms to API payloads, and talk to the
//! backend through an explicitly constructed client.
//!
//! ## Modules
//!
//! - **normalize**: Rewrite `_id` to `id` throughout arbitrary JSON
//! - **mappers**: Purchasing and sales form state <-> API payloads
//! - **client**: HTTP client with middleware (bearer auth, logout on 401)
//! - **config**: TOML configuration for the client and normalizer
//!
//! ## Quick Start
//!
//! ```rust
//! use anvil::normalize::{normalize, normalize_page};
//! use serde_json::json;
//!
//! let supplier = json!({
//!     "_id": "s1",
//!     "emails": [{"_id": "e1", "address": "a@b.com"}]
//! });
//! assert_eq!(
//!     normalize(&supplier),
//!     json!({"id": "s1", "emails": [{"id": "e1", "address": "a@b.com"}]})
//! );
//!
//! let page = normalize_page(&json!({"items": [{"_id": "a"}], "total_count": 1}));
//! assert_eq!(page.items, vec![json!({"id": "a"})]);
//! assert_eq!(page.total(), 1);
//! ```

use anyhow::Context;
use serde_json::Value;
use std::io::{BufRead, Write};

pub mod client;
pub mod config;
pub mod error;
pub mod logging;
pub mod mappers;
pub mod normalize;

// Re-export commonly used types for convenience
pub use client::{ApiClient, TokenStore};
pub use config::Config;
pub use error::{Error, Result};
pub use normalize::{normalize, normalize_list, normalize_page, NormalizeConfig, Normalizer, Page};

/// Normalize a newline-delimited JSON stream, one record per line
///
/// Blank lines are skipped. Returns the number of records written.
pub fn normalize_ndjson<R: BufRead, W: Write>(
    reader: R,
    writer: &mut W,
    normalizer: &Normalizer,
) -> anyhow::Result<usize> {
    let mut count = 0;

    for (line_no, line) in reader.lines().enumerate() {
        let line = line.context("Failed to read line")?;
        let line = line.trim();
        if line.is_empty() {
            continue;
        }

        let value: Value = serde_json::from_str(line)
            .with_context(|| format!("Failed to parse JSON on line {}", line_no + 1))?;

        serde_json::to_writer(&mut *writer, &normalizer.normalize(&value))
            .context("Failed to write record")?;
        writeln!(writer).context("Failed to write record")?;
        count += 1;
    }

    Ok(count)
}
