use serde::{Deserialize, Serialize};

/// Configuration for identifier normalization
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct NormalizeConfig {
    /// Key the backend uses for a record's primary key
    pub backend_key: String,

    /// Key frontend components expect on every record
    pub frontend_key: String,

    /// Envelope field holding the records of one page
    pub items_field: String,

    /// Envelope field holding the total record count across pages
    pub total_count_field: String,
}

impl NormalizeConfig {
    /// Swap the identifier keys, turning frontend records back into backend form
    pub fn reversed(&self) -> Self {
        NormalizeConfig {
            backend_key: self.frontend_key.clone(),
            frontend_key: self.backend_key.clone(),
            ..self.clone()
        }
    }
}

impl Default for NormalizeConfig {
    fn default() -> Self {
        NormalizeConfig {
            backend_key: String::from("_id"),
            frontend_key: String::from("id"),
            items_field: String::from("items"),
            total_count_field: String::from("total_count"),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_reversed_swaps_only_keys() {
        let config = NormalizeConfig::default().reversed();

        assert_eq!(config.backend_key, "id");
        assert_eq!(config.frontend_key, "_id");
        assert_eq!(config.items_field, "items");
        assert_eq!(config.total_count_field, "total_count");
    }
}
