//! Persisted layout of the invoice history blob.
//!
//! Current layout is a versioned envelope:
//!
//! ```json
//! { "version": 1, "invoices": [ { "id": "...", "savedAt": "...", "invoiceNumber": "...", ... } ] }
//! ```
//!
//! A bare JSON array is the layout written by the earlier browser build
//! (flat `fromCompany`/`toCompany` fields, `items[].price`, `taxRate`); it is
//! read as version 0 and upgraded in memory.

use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use serde_json::Value;
use thiserror::Error;

use super::entities::{
  DEFAULT_PAYMENT_DAYS, Invoice, LineItem, Party, SavedInvoice, default_quantity,
};
use super::value_objects::Logo;

pub const HISTORY_FORMAT_VERSION: u32 = 1;

#[derive(Debug, Error)]
pub enum HistoryFormatError {
  #[error("History blob is not valid JSON: {0}")]
  Malformed(#[from] serde_json::Error),

  #[error("Unsupported history format version {0}")]
  UnsupportedVersion(u64),

  #[error("History blob has an unexpected shape")]
  UnexpectedShape,
}

#[derive(Debug, Serialize)]
struct HistoryDocumentRef<'a> {
  version: u32,
  invoices: &'a [SavedInvoice],
}

#[derive(Debug, Deserialize)]
struct HistoryDocument {
  invoices: Vec<SavedInvoice>,
}

pub fn encode_history(invoices: &[SavedInvoice]) -> Result<String, serde_json::Error> {
  serde_json::to_string(&HistoryDocumentRef {
    version: HISTORY_FORMAT_VERSION,
    invoices,
  })
}

pub fn decode_history(raw: &str) -> Result<Vec<SavedInvoice>, HistoryFormatError> {
  let value: Value = serde_json::from_str(raw)?;

  if value.is_array() {
    let legacy: Vec<LegacySavedInvoice> = serde_json::from_value(value)?;
    return Ok(legacy.into_iter().map(SavedInvoice::from).collect());
  }

  let version = value
    .get("version")
    .and_then(Value::as_u64)
    .ok_or(HistoryFormatError::UnexpectedShape)?;
  if version != u64::from(HISTORY_FORMAT_VERSION) {
    return Err(HistoryFormatError::UnsupportedVersion(version));
  }

  let document: HistoryDocument = serde_json::from_value(value)?;
  Ok(document.invoices)
}

// Version 0 records, as stored by the browser build
#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
struct LegacySavedInvoice {
  id: String,
  saved_at: DateTime<Utc>,
  #[serde(default)]
  invoice_number: String,
  #[serde(default)]
  invoice_date: String,
  #[serde(default)]
  due_date: String,
  #[serde(default)]
  from_company: String,
  #[serde(default)]
  from_email: String,
  #[serde(default)]
  from_address: String,
  #[serde(default)]
  to_company: String,
  #[serde(default)]
  to_email: String,
  #[serde(default)]
  to_address: String,
  #[serde(default)]
  items: Vec<LegacyItem>,
  #[serde(default)]
  tax_rate: Decimal,
  #[serde(default)]
  notes: String,
  #[serde(default)]
  logo: Option<String>,
}

#[derive(Debug, Deserialize)]
struct LegacyItem {
  id: String,
  #[serde(default)]
  description: String,
  #[serde(default = "default_quantity")]
  quantity: Decimal,
  #[serde(default)]
  price: Decimal,
}

fn parse_legacy_date(value: &str) -> Option<NaiveDate> {
  let value = value.trim();
  NaiveDate::parse_from_str(value, "%Y-%m-%d")
    .ok()
    .or_else(|| {
      DateTime::parse_from_rfc3339(value)
        .ok()
        .map(|dt| dt.date_naive())
    })
}

impl From<LegacySavedInvoice> for SavedInvoice {
  fn from(legacy: LegacySavedInvoice) -> Self {
    let invoice_date =
      parse_legacy_date(&legacy.invoice_date).unwrap_or_else(|| legacy.saved_at.date_naive());
    let due_date = parse_legacy_date(&legacy.due_date)
      .unwrap_or_else(|| invoice_date + chrono::Duration::days(DEFAULT_PAYMENT_DAYS));

    let invoice = Invoice {
      invoice_number: legacy.invoice_number,
      invoice_date,
      due_date,
      issuer: Party::new(legacy.from_company, legacy.from_email, legacy.from_address),
      recipient: Party::new(legacy.to_company, legacy.to_email, legacy.to_address),
      line_items: legacy
        .items
        .into_iter()
        .map(|item| LineItem::new(item.id, item.description, item.quantity, item.price))
        .collect(),
      tax_rate_percent: legacy.tax_rate,
      notes: legacy.notes,
      // Legacy logos were never validated; drop anything that isn't an image data URI
      logo: legacy
        .logo
        .and_then(|logo| Logo::parse(&logo, usize::MAX).ok()),
    };

    SavedInvoice::new(legacy.id, legacy.saved_at, invoice)
  }
}
