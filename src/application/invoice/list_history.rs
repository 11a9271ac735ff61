use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

use crate::domain::invoice::{InvoiceHistoryService, SavedInvoice, format_amount};

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct HistoryListItemDto {
  pub id: String,
  pub invoice_number: String,
  pub recipient_company_name: String,
  pub invoice_date: NaiveDate,
  pub due_date: NaiveDate,
  pub saved_at: DateTime<Utc>,
  pub line_item_count: usize,
  pub total: Decimal,
  pub total_formatted: String,
}

impl From<&SavedInvoice> for HistoryListItemDto {
  fn from(saved: &SavedInvoice) -> Self {
    let totals = saved.totals();
    Self {
      id: saved.id.clone(),
      invoice_number: saved.invoice.invoice_number.clone(),
      recipient_company_name: saved.invoice.recipient.company_name.clone(),
      invoice_date: saved.invoice.invoice_date,
      due_date: saved.invoice.due_date,
      saved_at: saved.saved_at,
      line_item_count: saved.invoice.line_items.len(),
      total: totals.total,
      total_formatted: format_amount(totals.total),
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct ListHistoryResponse {
  pub invoices: Vec<HistoryListItemDto>,
  pub total_count: usize,
}

pub struct ListHistoryUseCase {
  history: Arc<InvoiceHistoryService>,
}

impl ListHistoryUseCase {
  pub fn new(history: Arc<InvoiceHistoryService>) -> Self {
    Self { history }
  }

  /// Newest first, with totals recomputed from each snapshot.
  pub async fn execute(&self) -> ListHistoryResponse {
    let invoices: Vec<HistoryListItemDto> = self
      .history
      .list()
      .await
      .iter()
      .map(HistoryListItemDto::from)
      .collect();

    ListHistoryResponse {
      total_count: invoices.len(),
      invoices,
    }
  }
}
