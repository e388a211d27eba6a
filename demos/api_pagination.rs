/// Example: Normalizing paginated API responses
/// This simulates paging through a supplier list and preparing a purchase
/// order from the normalized records
use anvil::mappers::{purchase, LineRow};
use anvil::normalize_page;
use chrono::NaiveDate;
use serde_json::json;

fn main() -> anyhow::Result<()> {
    println!("=== Processing Paginated API Responses ===\n");

    // Simulate 2 pages of supplier responses plus a broken one
    let page1 = json!({
        "items": [
            {
                "_id": "65f1a0",
                "name": "Acme Fasteners",
                "contacts": [
                    {"_id": "c-100", "email": "sales@acme.test"},
                    {"_id": "c-101", "email": "billing@acme.test"}
                ]
            },
            {"_id": "65f1a1", "name": "Northwind Metals", "contacts": []}
        ],
        "total_count": 3
    });

    let page2 = json!({
        "items": [
            {"_id": "65f1a2", "name": "Globex Tools", "contacts": [{"_id": "c-300", "email": "hi@globex.test"}]}
        ],
        "total_count": 3
    });

    let broken = json!({"detail": "upstream timeout"});

    let mut suppliers = Vec::new();
    for (i, envelope) in [page1, page2, broken].iter().enumerate() {
        let page = normalize_page(envelope);
        println!("Page {}: {} records (total reported: {})", i + 1, page.items.len(), page.total());
        suppliers.extend(page.items);
    }

    println!("\nNormalized suppliers:");
    for supplier in &suppliers {
        println!("  {}", serde_json::to_string(supplier)?);
    }

    // Build a purchase order against the first supplier
    let form = purchase::PurchaseOrderForm {
        supplier_id: suppliers[0]["id"].as_str().map(str::to_string),
        order_date: NaiveDate::from_ymd_opt(2024, 5, 2),
        lines: vec![
            LineRow::new("bolt-m6", 500.0, 0.04),
            LineRow::default(), // empty grid row, dropped
            LineRow::new("nut-m6", 500.0, 0.02),
        ],
        ..Default::default()
    };

    let payload = purchase::to_payload(&form)?;
    println!("\nPurchase order payload:");
    println!("{}", serde_json::to_string_pretty(&payload)?);

    Ok(())
}
