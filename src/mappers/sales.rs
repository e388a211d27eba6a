use chrono::NaiveDate;
use serde::Serialize;
use serde_json::Value;

use crate::error::{Error, Result};
use crate::mappers::dates::{parse_api_date, to_api_date};
use crate::mappers::lines::{self, number_field, reference_id, round_money, LineRow};

/// Sales order as edited on screen
#[derive(Debug, Clone, Default, PartialEq)]
pub struct SalesOrderForm {
    pub id: Option<String>,
    pub customer_id: Option<String>,
    pub order_date: Option<NaiveDate>,
    /// Order-level discount in percent
    pub discount: f64,
    pub status: Option<String>,
    pub notes: String,
    pub lines: Vec<LineRow>,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesItemPayload {
    pub product: String,
    pub quantity: f64,
    pub unit_price: f64,
    pub total_price: f64,
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SalesOrderPayload {
    pub customer: String,
    pub order_date: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    pub items: Vec<SalesItemPayload>,
    pub total_quantity: f64,
    pub subtotal: f64,
    pub discount: f64,
    pub discount_amount: f64,
    pub total: f64,
}

pub fn to_payload(form: &SalesOrderForm) -> Result<SalesOrderPayload> {
    let customer = form
        .customer_id
        .as_deref()
        .map(str::trim)
        .filter(|id| !id.is_empty())
        .ok_or(Error::MissingField("customer"))?;
    let order_date = form.order_date.ok_or(Error::MissingField("order_date"))?;

    let items: Vec<SalesItemPayload> = lines::filled_rows(&form.lines)
        .into_iter()
        .map(|row| SalesItemPayload {
            product: row.product_id.clone().unwrap_or_default(),
            quantity: row.quantity,
            unit_price: row.unit_price,
            total_price: row.line_total(),
        })
        .collect();

    if items.is_empty() {
        return Err(Error::EmptyOrder);
    }

    let totals = lines::totals(&form.lines);
    let discount = clamp_discount(form.discount);
    let discount_amount = round_money(totals.amount * discount / 100.0);
    let notes = form.notes.trim();

    Ok(SalesOrderPayload {
        customer: customer.to_string(),
        order_date: to_api_date(order_date),
        status: form.status.clone(),
        notes: (!notes.is_empty()).then(|| notes.to_string()),
        items,
        total_quantity: totals.quantity,
        subtotal: totals.amount,
        discount,
        discount_amount,
        total: round_money(totals.amount - discount_amount),
    })
}

/// Read a normalized API sales order into form state
pub fn from_api(order: &Value) -> SalesOrderForm {
    let lines = order
        .get("items")
        .and_then(Value::as_array)
        .map(|items| items.iter().map(|line| LineRow::from_api(line, "unit_price")).collect())
        .unwrap_or_default();

    SalesOrderForm {
        id: reference_id(order.get("id")),
        customer_id: reference_id(order.get("customer")),
        order_date: order.get("order_date").and_then(parse_api_date),
        discount: clamp_discount(number_field(order, "discount")),
        status: order.get("status").and_then(Value::as_str).map(str::to_string),
        notes: order
            .get("notes")
            .and_then(Value::as_str)
            .unwrap_or_default()
            .to_string(),
        lines,
    }
}

fn clamp_discount(discount: f64) -> f64 {
    if discount.is_finite() {
        discount.clamp(0.0, 100.0)
    } else {
        0.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::normalize::normalize;
    use serde_json::json;

    fn form() -> SalesOrderForm {
        SalesOrderForm {
            customer_id: Some("c9".to_string()),
            order_date: NaiveDate::from_ymd_opt(2024, 11, 30),
            discount: 10.0,
            lines: vec![
                LineRow::new("p1", 2.0, 50.0),
                LineRow { product_id: Some("p2".to_string()), quantity: 0.0, unit_price: 99.0 },
                LineRow::new("p3", 1.0, 20.0),
            ],
            ..SalesOrderForm::default()
        }
    }

    #[test]
    fn test_payload_applies_discount() {
        let payload = to_payload(&form()).unwrap();

        assert_eq!(payload.customer, "c9");
        assert_eq!(payload.order_date, "2024-11-30");
        assert_eq!(payload.items.len(), 2);
        assert_eq!(payload.total_quantity, 3.0);
        assert_eq!(payload.subtotal, 120.0);
        assert_eq!(payload.discount_amount, 12.0);
        assert_eq!(payload.total, 108.0);
    }

    #[test]
    fn test_subtotal_matches_items() {
        let mut form = form();
        form.discount = 0.0;
        form.lines = vec![
            LineRow::new("p1", 1.0, 0.005),
            LineRow::new("p2", 1.0, 0.005),
            LineRow::new("p3", 1.0, 0.005),
        ];

        let payload = to_payload(&form).unwrap();
        let items_sum: f64 = payload.items.iter().map(|item| item.total_price).sum();

        assert_eq!(payload.subtotal, round_money(items_sum));
        assert_eq!(payload.total, 0.03);
    }

    #[test]
    fn test_discount_is_clamped() {
        let mut over = form();
        over.discount = 150.0;
        assert_eq!(to_payload(&over).unwrap().total, 0.0);

        let mut under = form();
        under.discount = -5.0;
        assert_eq!(to_payload(&under).unwrap().total, 120.0);
    }

    #[test]
    fn test_missing_customer() {
        let mut form = form();
        form.customer_id = None;

        assert!(matches!(to_payload(&form), Err(Error::MissingField("customer"))));
    }

    #[test]
    fn test_no_filled_rows() {
        let mut form = form();
        form.lines.clear();

        assert!(matches!(to_payload(&form), Err(Error::EmptyOrder)));
    }

    #[test]
    fn test_from_api() {
        let api = json!({
            "_id": "so1",
            "customer": "c9",
            "order_date": "2024-11-30",
            "discount": "12.5",
            "notes": "deliver before noon",
            "items": [
                {"_id": "l1", "product": {"_id": "p1", "sku": "X"}, "quantity": 2, "unit_price": 50}
            ]
        });

        let form = from_api(&normalize(&api));

        assert_eq!(form.id.as_deref(), Some("so1"));
        assert_eq!(form.customer_id.as_deref(), Some("c9"));
        assert_eq!(form.order_date, NaiveDate::from_ymd_opt(2024, 11, 30));
        assert_eq!(form.discount, 12.5);
        assert_eq!(form.notes, "deliver before noon");
        assert_eq!(form.lines, vec![LineRow::new("p1", 2.0, 50.0)]);
    }
}
