//! Domain mappers between form state and API payloads
//!
//! Purchasing and sales screens edit orders as a header plus a grid of
//! line rows. Before saving, only filled rows are kept, totals are
//! aggregated and dates are formatted for the API; on load, normalized API
//! JSON is read back into form state with defaults for anything missing.

pub mod dates;
pub mod lines;
pub mod purchase;
pub mod sales;

pub use lines::{filled_rows, totals, LineRow, Totals};
pub use purchase::{PurchaseOrderForm, PurchaseOrderPayload};
pub use sales::{SalesOrderForm, SalesOrderPayload};
