use chrono::{DateTime, Duration, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;

use super::errors::InvoiceError;
use super::value_objects::{Logo, default_invoice_number};

/// Days between invoice date and due date on a fresh draft.
pub const DEFAULT_PAYMENT_DAYS: i64 = 30;

// Line Item - one billable row; the amount is always derived
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct LineItem {
  pub id: String,
  #[serde(default)]
  pub description: String,
  #[serde(default = "default_quantity")]
  pub quantity: Decimal,
  #[serde(default)]
  pub unit_price: Decimal,
}

pub(super) fn default_quantity() -> Decimal {
  Decimal::ONE
}

impl LineItem {
  pub fn new(
    id: impl Into<String>,
    description: impl Into<String>,
    quantity: Decimal,
    unit_price: Decimal,
  ) -> Self {
    Self {
      id: id.into(),
      description: description.into(),
      quantity,
      unit_price,
    }
  }

  /// Empty row as the editor adds it: quantity 1, price 0.
  pub fn blank(id: impl Into<String>) -> Self {
    Self::new(id, "", Decimal::ONE, Decimal::ZERO)
  }

  pub fn amount(&self) -> Decimal {
    self.quantity * self.unit_price
  }
}

// Party - issuer or recipient block
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Party {
  #[serde(default)]
  pub company_name: String,
  #[serde(default)]
  pub email: String,
  #[serde(default)]
  pub address: String,
}

impl Party {
  pub fn new(
    company_name: impl Into<String>,
    email: impl Into<String>,
    address: impl Into<String>,
  ) -> Self {
    Self {
      company_name: company_name.into(),
      email: email.into(),
      address: address.into(),
    }
  }
}

// Invoice - the editable document
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Invoice {
  pub invoice_number: String,
  pub invoice_date: NaiveDate,
  pub due_date: NaiveDate,
  #[serde(default)]
  pub issuer: Party,
  #[serde(default)]
  pub recipient: Party,
  #[serde(default)]
  pub line_items: Vec<LineItem>,
  #[serde(default)]
  pub tax_rate_percent: Decimal,
  #[serde(default)]
  pub notes: String,
  #[serde(default, skip_serializing_if = "Option::is_none")]
  pub logo: Option<Logo>,
}

impl Invoice {
  /// Fresh draft: time-derived number, due in 30 days, one blank row, no tax.
  pub fn new_draft(today: NaiveDate, now: DateTime<Utc>) -> Self {
    Self {
      invoice_number: default_invoice_number(now),
      invoice_date: today,
      due_date: today + Duration::days(DEFAULT_PAYMENT_DAYS),
      issuer: Party::default(),
      recipient: Party::default(),
      line_items: vec![LineItem::blank("1")],
      tax_rate_percent: Decimal::ZERO,
      notes: String::new(),
      logo: None,
    }
  }

  pub fn totals(&self) -> InvoiceTotals {
    InvoiceTotals::calculate(&self.line_items, self.tax_rate_percent)
  }

  pub fn line_item(&self, id: &str) -> Option<&LineItem> {
    self.line_items.iter().find(|item| item.id == id)
  }

  pub fn has_unique_line_item_ids(&self) -> bool {
    let mut seen = HashSet::new();
    self.line_items.iter().all(|item| seen.insert(item.id.as_str()))
  }

  /// Id for a new row, derived from `seed` and bumped until unused.
  pub fn next_line_item_id(&self, seed: i64) -> String {
    let mut candidate = seed;
    while self.line_item(&candidate.to_string()).is_some() {
      candidate += 1;
    }
    candidate.to_string()
  }

  pub fn add_line_item(&mut self, item: LineItem) -> Result<(), InvoiceError> {
    if self.line_item(&item.id).is_some() {
      return Err(InvoiceError::DuplicateLineItemId(item.id));
    }
    self.line_items.push(item);
    Ok(())
  }

  pub fn update_line_item(
    &mut self,
    id: &str,
    description: String,
    quantity: Decimal,
    unit_price: Decimal,
  ) -> Result<&LineItem, InvoiceError> {
    let item = self
      .line_items
      .iter_mut()
      .find(|item| item.id == id)
      .ok_or_else(|| InvoiceError::LineItemNotFound(id.to_string()))?;

    item.description = description;
    item.quantity = quantity;
    item.unit_price = unit_price;
    Ok(item)
  }

  /// Removes a row; the last remaining row cannot be removed.
  pub fn remove_line_item(&mut self, id: &str) -> Result<LineItem, InvoiceError> {
    let index = self
      .line_items
      .iter()
      .position(|item| item.id == id)
      .ok_or_else(|| InvoiceError::LineItemNotFound(id.to_string()))?;

    if self.line_items.len() == 1 {
      return Err(InvoiceError::LastLineItem);
    }

    Ok(self.line_items.remove(index))
  }
}

// Saved Invoice - immutable snapshot kept in history
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SavedInvoice {
  pub id: String,
  pub saved_at: DateTime<Utc>,
  #[serde(flatten)]
  pub invoice: Invoice,
}

impl SavedInvoice {
  pub fn new(id: String, saved_at: DateTime<Utc>, invoice: Invoice) -> Self {
    Self {
      id,
      saved_at,
      invoice,
    }
  }

  pub fn totals(&self) -> InvoiceTotals {
    self.invoice.totals()
  }
}

// Invoice Totals - Calculated, not persisted
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotals {
  pub subtotal: Decimal,
  pub tax_amount: Decimal,
  pub total: Decimal,
}

impl InvoiceTotals {
  /// The one totals computation shared by preview, history and PDF.
  /// No rounding happens here.
  pub fn calculate(line_items: &[LineItem], tax_rate_percent: Decimal) -> Self {
    let subtotal = line_items
      .iter()
      .fold(Decimal::ZERO, |acc, item| acc + item.amount());
    let tax_amount = subtotal * tax_rate_percent / Decimal::ONE_HUNDRED;
    let total = subtotal + tax_amount;

    Self {
      subtotal,
      tax_amount,
      total,
    }
  }
}
