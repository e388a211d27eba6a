//! Identifier normalization - rewrite backend `_id` keys to frontend `id` keys
//!
//! Backend records carry their primary key under `_id`; tables and lookups
//! on the frontend key rows by `id`. This module walks arbitrary JSON and
//! produces a fresh copy where every mapping, at any depth, uses the
//! frontend key.
//!
//! ## Traversal
//!
//! The walk uses an explicit worklist rather than call-stack recursion, so
//! deeply nested input cannot exhaust the stack.

pub mod types;
pub mod normalizer;
pub mod page;

pub use types::NormalizeConfig;
pub use normalizer::Normalizer;
pub use page::Page;

use serde_json::Value;
use once_cell::sync::Lazy;

static DEFAULT_NORMALIZER: Lazy<Normalizer> = Lazy::new(|| Normalizer::new(NormalizeConfig::default()));

/// Normalize a value with the default `_id` -> `id` convention
pub fn normalize(value: &Value) -> Value {
    DEFAULT_NORMALIZER.normalize(value)
}

/// Normalize every element of a sequence; non-sequences yield an empty list
pub fn normalize_list(value: &Value) -> Vec<Value> {
    DEFAULT_NORMALIZER.normalize_list(value)
}

/// Normalize a paginated `{items, total_count}` envelope
pub fn normalize_page(envelope: &Value) -> Page {
    DEFAULT_NORMALIZER.normalize_page(envelope)
}
