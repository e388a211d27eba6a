use crate::normalize::page::Page;
use crate::normalize::types::NormalizeConfig;
use serde_json::{Map, Value};

/// Rewrites backend identifier keys to frontend identifier keys
#[derive(Debug, Clone, Default)]
pub struct Normalizer {
    config: NormalizeConfig,
}

/// A container being rebuilt while its children are still in flight
enum Frame<'a> {
    Array {
        source: std::slice::Iter<'a, Value>,
        built: Vec<Value>,
    },
    Object {
        source: serde_json::map::Iter<'a>,
        built: Map<String, Value>,
        pending_key: Option<&'a str>,
        has_backend_key: bool,
    },
}

impl<'a> Frame<'a> {
    fn array(items: &'a [Value]) -> Self {
        Frame::Array {
            source: items.iter(),
            built: Vec::with_capacity(items.len()),
        }
    }

    fn object(map: &'a Map<String, Value>, config: &NormalizeConfig) -> Self {
        Frame::Object {
            source: map.iter(),
            built: Map::new(),
            pending_key: None,
            // Identical keys mean a plain copy, never a collision
            has_backend_key: config.backend_key != config.frontend_key
                && map.contains_key(&config.backend_key),
        }
    }

    /// Next child value to descend into, if any remain
    fn next_child(&mut self, config: &NormalizeConfig) -> Option<&'a Value> {
        match self {
            Frame::Array { source, .. } => source.next(),
            Frame::Object {
                source,
                pending_key,
                has_backend_key,
                ..
            } => {
                for (key, value) in source.by_ref() {
                    // The backend key wins a collision regardless of iteration order
                    if *has_backend_key && *key == config.frontend_key {
                        continue;
                    }
                    *pending_key = Some(key.as_str());
                    return Some(value);
                }
                None
            }
        }
    }

    /// Store a finished child under its (possibly renamed) slot
    fn accept(&mut self, value: Value, config: &NormalizeConfig) {
        match self {
            Frame::Array { built, .. } => built.push(value),
            Frame::Object {
                built, pending_key, ..
            } => {
                if let Some(key) = pending_key.take() {
                    let key = if key == config.backend_key {
                        config.frontend_key.clone()
                    } else {
                        key.to_string()
                    };
                    built.insert(key, value);
                }
            }
        }
    }

    fn finish(self) -> Value {
        match self {
            Frame::Array { built, .. } => Value::Array(built),
            Frame::Object { built, .. } => Value::Object(built),
        }
    }
}

impl Normalizer {
    pub fn new(config: NormalizeConfig) -> Self {
        Normalizer { config }
    }

    pub fn config(&self) -> &NormalizeConfig {
        &self.config
    }

    /// Build a deep copy of `value` with every backend key renamed
    ///
    /// Total over JSON: primitives come back as-is, sequences keep their
    /// order and length, and the input is never touched.
    pub fn normalize(&self, value: &Value) -> Value {
        let mut stack: Vec<Frame<'_>> = Vec::new();
        let mut current = value;

        loop {
            let mut finished = match current {
                Value::Array(items) => {
                    stack.push(Frame::array(items));
                    None
                }
                Value::Object(map) => {
                    stack.push(Frame::object(map, &self.config));
                    None
                }
                scalar => Some(scalar.clone()),
            };

            loop {
                let Some(frame) = stack.last_mut() else {
                    // Only the root is left
                    return finished.unwrap_or(Value::Null);
                };

                if let Some(done) = finished.take() {
                    frame.accept(done, &self.config);
                }

                if let Some(child) = frame.next_child(&self.config) {
                    current = child;
                    break;
                }

                finished = stack.pop().map(Frame::finish);
            }
        }
    }

    /// Normalize each element of a sequence; anything else yields an empty list
    pub fn normalize_list(&self, value: &Value) -> Vec<Value> {
        match value {
            Value::Array(items) => items.iter().map(|item| self.normalize(item)).collect(),
            _ => Vec::new(),
        }
    }

    /// Normalize a paginated envelope
    ///
    /// A missing envelope or records field falls back to the empty page
    /// instead of failing; a missing count on an otherwise valid envelope
    /// reads as zero. Any other envelope fields are normalized like the
    /// records and kept on the page.
    pub fn normalize_page(&self, envelope: &Value) -> Page {
        let Some(fields) = envelope.as_object() else {
            return Page::empty();
        };

        if !matches!(fields.get(&self.config.items_field), Some(Value::Array(_))) {
            return Page::empty();
        }

        let Value::Object(mut extra) = self.normalize(envelope) else {
            return Page::empty();
        };

        let items = match extra.remove(&self.config.items_field) {
            Some(Value::Array(items)) => items,
            _ => Vec::new(),
        };
        extra.remove(&self.config.total_count_field);

        let total_count = fields
            .get(&self.config.total_count_field)
            .cloned()
            .unwrap_or_else(|| Value::from(0u64));

        Page {
            items,
            total_count,
            extra,
        }
    }
}
