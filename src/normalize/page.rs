use serde::de::DeserializeOwned;
use serde_json::{Map, Value};

use crate::normalize::types::NormalizeConfig;

/// One page of records plus the total record count across all pages
#[derive(Debug, Clone, PartialEq)]
pub struct Page {
    /// Normalized records of this page
    pub items: Vec<Value>,

    /// Total count exactly as the backend reported it
    pub total_count: Value,

    /// Remaining envelope fields, normalized like the records
    pub extra: Map<String, Value>,
}

impl Page {
    /// The canonical empty envelope returned for malformed responses
    pub fn empty() -> Self {
        Page {
            items: Vec::new(),
            total_count: Value::from(0u64),
            extra: Map::new(),
        }
    }

    /// Total count as an integer; non-numeric counts read as zero
    pub fn total(&self) -> u64 {
        match &self.total_count {
            Value::Number(n) => n
                .as_u64()
                .or_else(|| n.as_f64().filter(|f| *f >= 0.0).map(|f| f as u64))
                .unwrap_or(0),
            Value::String(s) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    pub fn is_empty(&self) -> bool {
        self.items.is_empty()
    }

    /// Deserialize the records into a concrete row type
    pub fn decode_items<T: DeserializeOwned>(&self) -> crate::Result<Vec<T>> {
        self.items
            .iter()
            .map(|item| T::deserialize(item).map_err(crate::Error::from))
            .collect()
    }

    /// Rebuild the envelope as JSON using the configured field names
    pub fn into_value(self, config: &NormalizeConfig) -> Value {
        let mut envelope = self.extra;
        envelope.insert(config.items_field.clone(), Value::Array(self.items));
        envelope.insert(config.total_count_field.clone(), self.total_count);
        Value::Object(envelope)
    }
}

impl Default for Page {
    fn default() -> Self {
        Page::empty()
    }
}
