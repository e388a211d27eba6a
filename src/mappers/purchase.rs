use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::mappers::dates::{parse_api_date, to_api_date};
use crate::mappers::lines::{self, reference_id, LineRow};

/// Purchase order as edited on screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct PurchaseOrderForm {
    /// Set once the order exists on the backend
    pub id: Option<String>,
    pub supplier_id: Option<String>,
    pub order_date: Option<NaiveDate>,
    pub expected_date: Option<NaiveDate>,
    pub status: Option<String>,
    pub notes: String,
    pub lines: Vec<LineRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseItemPayload {
    pub product: String,
    pub quantity: f64,
    pub unit_cost: f64,
    pub total_cost: f64,
}

/// Body sent to the purchase order endpoints
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct PurchaseOrderPayload {
    pub supplier: String,
    pub order_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub expected_date: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<PurchaseItemPayload>,
    pub total_quantity: f64,
    pub total_cost: f64,
}

/// Build the API payload from form state
///
/// Unfilled rows are dropped before totals are computed.
pub fn to_payload(form: &PurchaseOrderForm) -> Result<PurchaseOrderPayload> {
    let supplier = form
        .supplier_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(Error::MissingField("supplier"))?;
    let order_date = form.order_date.ok_or(Error::MissingField("order_date"))?;

    let items: Vec<PurchaseItemPayload> = lines::filled_rows(&form.lines)
        .into_iter()
        .map(|row| PurchaseItemPayload {
            product: row.product_id.clone().unwrap_or_default(),
            quantity: row.quantity,
            unit_cost: row.unit_price,
            total_cost: row.line_total(),
        })
        .collect();

    if items.is_empty() {
        return Err(Error::EmptyOrder);
    }

    let totals = lines::totals(&form.lines);
    let notes = form.notes.trim();

    Ok(PurchaseOrderPayload {
        supplier: supplier.to_string(),
        order_date: to_api_date(order_date),
        expected_date: form.expected_date.map(to_api_date),
        status: form.status.clone(),
        notes: (!notes.is_empty()).then(|| notes.to_string()),
        items,
        total_quantity: totals.quantity,
        total_cost: totals.amount,
    })
}

/// Read a normalized API purchase order into form state
pub fn from_api(order: &Value) -> PurchaseOrderForm {
    let lines = order
        .get("items")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(|line| LineRow::from_api(line, "unit_cost")).collect())
        .unwrap_or_default();

    PurchaseOrderForm {
        id: reference_id(order.get("id")),
        supplier_id: reference_id(order.get("supplier")),
        order_date: order.get("order_date").and_then(parse_api_date),
        expected_date: order.get("expected_date").and_then(parse_api_date),
        status: order.get("status").and_then(Value::as_str).map(str::to_string),
        notes: order
            .get("notes")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        lines,
    }
}
