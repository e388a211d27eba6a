use serde::{Deserialize, Serialize};
use serde_json::Value;

/// One editable row of an order form
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct LineRow {
    pub product_id: Option<String>,
    pub quantity: f64,
    pub unit_price: f64,
}

/// Aggregates over the filled rows of a form
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub struct Totals {
    pub quantity: f64,
    pub amount: f64,
}

impl LineRow {
    pub fn new(product_id: impl Into<String>, quantity: f64, unit_price: f64) -> Self {
        LineRow {
            product_id: Some(product_id.into()),
            quantity,
            unit_price,
        }
    }

    /// A row reaches the API only once it names a product and a positive quantity
    pub fn is_filled(&self) -> bool {
        let has_product = self
            .product_id
            .as_deref()
            .is_some_and(|id| !id.trim().is_empty());
        has_product && self.quantity.is_finite() && self.quantity > 0.0
    }

    pub fn line_total(&self) -> f64 {
        round_money(self.quantity * self.unit_price)
    }

    /// Read a row from a normalized API line
    ///
    /// `product` may be a populated reference or a bare id; `price_field`
    /// names the per-unit amount (`unit_cost` for purchases, `unit_price`
    /// for sales).
    pub fn from_api(line: &Value, price_field: &str) -> Self {
        LineRow {
            product_id: reference_id(line.get("product")),
            quantity: number_field(line, "quantity"),
            unit_price: number_field(line, price_field),
        }
    }
}

/// Rows that should be sent to the API, in form order
pub fn filled_rows(rows: &[LineRow]) -> Vec<&LineRow> {
    rows.iter().filter(|row| row.is_filled()).collect()
}

/// Header totals over filled rows
///
/// The amount is the sum of the already rounded line totals, so it always
/// matches the items sent alongside it. Quantities keep 3 decimals (weights
/// and lengths are fractional), amounts keep 2.
pub fn totals(rows: &[LineRow]) -> Totals {
    let (quantity, amount) = rows
        .iter()
        .filter(|row| row.is_filled())
        .fold((0.0, 0.0), |(qty, amt), row| {
            (qty + row.quantity, amt + row.line_total())
        });

    Totals {
        quantity: round_quantity(quantity),
        amount: round_money(amount),
    }
}

pub fn round_money(amount: f64) -> f64 {
    (amount * 100.0).round() / 100.0
}

pub fn round_quantity(quantity: f64) -> f64 {
    (quantity * 1000.0).round() / 1000.0
}

/// Id of a reference that may be populated (`{"id": ..}`) or a bare id
pub(crate) fn reference_id(value: Option<&Value>) -> Option<String> {
    match value? {
        Value::String(id) if !id.is_empty() => Some(id.clone()),
        Value::Number(n) => Some(n.to_string()),
        Value::Object(fields) => reference_id(fields.get("id")),
        _ => None,
    }
}

/// Numeric field that may arrive as a number or a numeric string
pub(crate) fn number_field(value: &Value, field: &str) -> f64 {
    match value.get(field) {
        Some(Value::Number(n)) => n.as_f64().unwrap_or(0.0),
        Some(Value::String(s)) => s.trim().parse().unwrap_or(0.0),
        _ => 0.0,
    }
}
