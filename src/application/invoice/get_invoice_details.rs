use chrono::{DateTime, NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Serialize;
use std::sync::Arc;

use super::draft::InvoiceDraft;
use crate::domain::invoice::{
  Invoice, InvoiceError, InvoiceHistoryService, InvoiceTotals, LineItem, Party, format_amount,
};

/// Which invoice to render.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum InvoiceSource {
  Draft,
  Saved(String),
}

#[derive(Debug)]
pub struct GetInvoiceDetailsCommand {
  pub source: InvoiceSource,
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceLineItemDto {
  pub id: String,
  pub description: String,
  pub quantity: Decimal,
  pub unit_price: Decimal,
  pub unit_price_formatted: String,
  pub amount: Decimal,
  pub amount_formatted: String,
}

impl From<&LineItem> for InvoiceLineItemDto {
  fn from(item: &LineItem) -> Self {
    let amount = item.amount();
    Self {
      id: item.id.clone(),
      description: item.description.clone(),
      quantity: item.quantity.normalize(),
      unit_price: item.unit_price,
      unit_price_formatted: format_amount(item.unit_price),
      amount,
      amount_formatted: format_amount(amount),
    }
  }
}

#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceTotalsDto {
  pub subtotal: Decimal,
  pub tax_amount: Decimal,
  pub total: Decimal,
  pub subtotal_formatted: String,
  pub tax_amount_formatted: String,
  pub total_formatted: String,
}

impl From<InvoiceTotals> for InvoiceTotalsDto {
  fn from(totals: InvoiceTotals) -> Self {
    Self {
      subtotal: totals.subtotal,
      tax_amount: totals.tax_amount,
      total: totals.total,
      subtotal_formatted: format_amount(totals.subtotal),
      tax_amount_formatted: format_amount(totals.tax_amount),
      total_formatted: format_amount(totals.total),
    }
  }
}

/// Everything the invoice document needs, figures already derived.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct InvoiceDetailsResponse {
  pub saved_invoice_id: Option<String>,
  pub saved_at: Option<DateTime<Utc>>,
  pub invoice_number: String,
  pub invoice_date: NaiveDate,
  pub due_date: NaiveDate,
  pub issuer: Party,
  pub recipient: Party,
  pub logo: Option<String>,
  pub notes: String,
  pub tax_rate_percent: Decimal,
  pub line_items: Vec<InvoiceLineItemDto>,
  pub totals: InvoiceTotalsDto,
}

impl InvoiceDetailsResponse {
  fn from_invoice(invoice: Invoice, saved: Option<(String, DateTime<Utc>)>) -> Self {
    let totals = invoice.totals();
    let (saved_invoice_id, saved_at) = match saved {
      Some((id, at)) => (Some(id), Some(at)),
      None => (None, None),
    };

    Self {
      saved_invoice_id,
      saved_at,
      line_items: invoice.line_items.iter().map(InvoiceLineItemDto::from).collect(),
      totals: totals.into(),
      invoice_number: invoice.invoice_number,
      invoice_date: invoice.invoice_date,
      due_date: invoice.due_date,
      issuer: invoice.issuer,
      recipient: invoice.recipient,
      logo: invoice.logo.map(|logo| logo.into_inner()),
      notes: invoice.notes,
      tax_rate_percent: invoice.tax_rate_percent.normalize(),
    }
  }

  /// Download name for the rendered PDF: `<invoice number>.pdf`.
  pub fn pdf_file_name(&self) -> String {
    let stem: String = self
      .invoice_number
      .trim()
      .chars()
      .map(|c| match c {
        '/' | '\\' | ':' | '*' | '?' | '"' | '<' | '>' | '|' => '-',
        c if c.is_control() => '-',
        c => c,
      })
      .collect();

    if stem.is_empty() {
      "invoice.pdf".to_string()
    } else {
      format!("{}.pdf", stem)
    }
  }
}

pub struct GetInvoiceDetailsUseCase {
  draft: Arc<InvoiceDraft>,
  history: Arc<InvoiceHistoryService>,
}

impl GetInvoiceDetailsUseCase {
  pub fn new(draft: Arc<InvoiceDraft>, history: Arc<InvoiceHistoryService>) -> Self {
    Self { draft, history }
  }

  pub async fn execute(
    &self,
    command: GetInvoiceDetailsCommand,
  ) -> Result<InvoiceDetailsResponse, InvoiceError> {
    match command.source {
      InvoiceSource::Draft => {
        let invoice = self.draft.current().await;
        Ok(InvoiceDetailsResponse::from_invoice(invoice, None))
      }
      InvoiceSource::Saved(id) => {
        let saved = self.history.get(&id).await?;
        Ok(InvoiceDetailsResponse::from_invoice(
          saved.invoice,
          Some((saved.id, saved.saved_at)),
        ))
      }
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::domain::invoice::{DEFAULT_HISTORY_KEY, DEFAULT_LOGO_MAX_BYTES};
  use crate::infrastructure::persistence::InMemoryLocalStorage;
  use rust_decimal_macros::dec;

  fn sample() -> Invoice {
    let now = Utc::now();
    let mut invoice = Invoice::new_draft(now.date_naive(), now);
    invoice.invoice_number = "INV-482913".to_string();
    invoice.issuer = Party::new("Acme", "billing@acme.test", "1 Main St");
    invoice.recipient = Party::new("Globex", "ap@globex.test", "2 Side St");
    invoice.line_items = vec![
      LineItem::new("1", "Design", dec!(2), dec!(50.00)),
      LineItem::new("2", "Hosting", dec!(1), dec!(25.00)),
    ];
    invoice.tax_rate_percent = dec!(10);
    invoice
  }

  async fn use_case(invoice: Invoice) -> (Arc<InvoiceHistoryService>, GetInvoiceDetailsUseCase) {
    let storage = Arc::new(InMemoryLocalStorage::new());
    let history = Arc::new(InvoiceHistoryService::load(storage, DEFAULT_HISTORY_KEY).await);
    let draft = Arc::new(InvoiceDraft::with_invoice(invoice, DEFAULT_LOGO_MAX_BYTES));
    let use_case = GetInvoiceDetailsUseCase::new(draft, history.clone());
    (history, use_case)
  }

  #[tokio::test]
  async fn test_draft_details_include_derived_figures() {
    let (_, use_case) = use_case(sample()).await;
    let details = use_case
      .execute(GetInvoiceDetailsCommand {
        source: InvoiceSource::Draft,
      })
      .await
      .unwrap();

    assert!(details.saved_invoice_id.is_none());
    assert_eq!(details.line_items[0].amount, dec!(100.00));
    assert_eq!(details.line_items[1].amount_formatted, "25.00");
    assert_eq!(details.totals.subtotal_formatted, "125.00");
    assert_eq!(details.totals.tax_amount_formatted, "12.50");
    assert_eq!(details.totals.total_formatted, "137.50");
    assert_eq!(details.pdf_file_name(), "INV-482913.pdf");
  }

  #[tokio::test]
  async fn test_saved_details_match_history_totals() {
    let (history, use_case) = use_case(sample()).await;
    let saved = history.save(sample()).await.unwrap();

    let details = use_case
      .execute(GetInvoiceDetailsCommand {
        source: InvoiceSource::Saved(saved.id.clone()),
      })
      .await
      .unwrap();
    assert_eq!(details.saved_invoice_id.as_deref(), Some(saved.id.as_str()));
    assert_eq!(details.totals.total, saved.totals().total);

    let missing = use_case
      .execute(GetInvoiceDetailsCommand {
        source: InvoiceSource::Saved("inv_nope".to_string()),
      })
      .await;
    assert!(matches!(missing, Err(InvoiceError::SavedInvoiceNotFound(_))));
  }

  #[test]
  fn test_pdf_file_name_is_sanitized() {
    let mut details = InvoiceDetailsResponse::from_invoice(sample(), None);
    details.invoice_number = "2026/03 \"A\"".to_string();
    assert_eq!(details.pdf_file_name(), "2026-03 -A-.pdf");
    details.invoice_number = "  ".to_string();
    assert_eq!(details.pdf_file_name(), "invoice.pdf");
  }
}
