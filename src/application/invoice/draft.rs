use chrono::{NaiveDate, Utc};
use rust_decimal::Decimal;
use serde::Deserialize;
use tokio::sync::RwLock;

use crate::domain::invoice::{Invoice, InvoiceError, LineItem, Logo, Party};

/// Partial edit of the invoice header; `None` leaves a field unchanged.
#[derive(Debug, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDetailsCommand {
  pub invoice_number: Option<String>,
  pub invoice_date: Option<NaiveDate>,
  pub due_date: Option<NaiveDate>,
  pub issuer: Option<Party>,
  pub recipient: Option<Party>,
  pub tax_rate_percent: Option<Decimal>,
  pub notes: Option<String>,
}

#[derive(Debug, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct UpdateLineItemCommand {
  pub description: String,
  pub quantity: Decimal,
  pub unit_price: Decimal,
}

/// The invoice currently being edited.
///
/// Every operation replaces the draft as a whole under the write lock and
/// hands back a copy of the result; callers never hold a reference into it.
pub struct InvoiceDraft {
  invoice: RwLock<Invoice>,
  logo_max_bytes: usize,
}

impl InvoiceDraft {
  pub fn new(logo_max_bytes: usize) -> Self {
    Self::with_invoice(Self::fresh(), logo_max_bytes)
  }

  pub fn with_invoice(invoice: Invoice, logo_max_bytes: usize) -> Self {
    Self {
      invoice: RwLock::new(invoice),
      logo_max_bytes,
    }
  }

  fn fresh() -> Invoice {
    let now = Utc::now();
    Invoice::new_draft(now.date_naive(), now)
  }

  pub async fn current(&self) -> Invoice {
    self.invoice.read().await.clone()
  }

  pub async fn replace(&self, invoice: Invoice) -> Result<Invoice, InvoiceError> {
    if !invoice.has_unique_line_item_ids() {
      return Err(InvoiceError::Validation(vec![
        "Line item ids must be unique".to_string(),
      ]));
    }
    if invoice.line_items.is_empty() {
      return Err(InvoiceError::LastLineItem);
    }
    if let Some(logo) = &invoice.logo {
      Logo::parse(logo.value(), self.logo_max_bytes)?;
    }

    let mut current = self.invoice.write().await;
    *current = invoice;
    Ok(current.clone())
  }

  pub async fn update_details(&self, command: UpdateDetailsCommand) -> Invoice {
    let mut current = self.invoice.write().await;
    let mut next = current.clone();

    if let Some(number) = command.invoice_number {
      next.invoice_number = number;
    }
    if let Some(date) = command.invoice_date {
      next.invoice_date = date;
    }
    if let Some(date) = command.due_date {
      next.due_date = date;
    }
    if let Some(issuer) = command.issuer {
      next.issuer = issuer;
    }
    if let Some(recipient) = command.recipient {
      next.recipient = recipient;
    }
    if let Some(rate) = command.tax_rate_percent {
      next.tax_rate_percent = rate;
    }
    if let Some(notes) = command.notes {
      next.notes = notes;
    }

    *current = next;
    current.clone()
  }

  /// Appends a blank row keyed by the current epoch milliseconds.
  pub async fn add_line_item(&self) -> Result<LineItem, InvoiceError> {
    let mut current = self.invoice.write().await;
    let id = current.next_line_item_id(Utc::now().timestamp_millis());
    let item = LineItem::blank(id);
    current.add_line_item(item.clone())?;
    tracing::debug!("Added line item {} to draft", item.id);
    Ok(item)
  }

  pub async fn update_line_item(
    &self,
    id: &str,
    command: UpdateLineItemCommand,
  ) -> Result<LineItem, InvoiceError> {
    let mut current = self.invoice.write().await;
    let item = current.update_line_item(
      id,
      command.description,
      command.quantity,
      command.unit_price,
    )?;
    Ok(item.clone())
  }

  pub async fn remove_line_item(&self, id: &str) -> Result<Invoice, InvoiceError> {
    let mut current = self.invoice.write().await;
    current.remove_line_item(id)?;
    Ok(current.clone())
  }

  pub async fn set_logo(&self, data_uri: &str) -> Result<Invoice, InvoiceError> {
    let logo = Logo::parse(data_uri, self.logo_max_bytes)?;
    let mut current = self.invoice.write().await;
    tracing::debug!("Draft logo set ({})", logo.mime_type());
    current.logo = Some(logo);
    Ok(current.clone())
  }

  pub async fn remove_logo(&self) -> Invoice {
    let mut current = self.invoice.write().await;
    current.logo = None;
    current.clone()
  }

  pub async fn reset(&self) -> Invoice {
    let mut current = self.invoice.write().await;
    *current = Self::fresh();
    tracing::info!("Draft reset to {}", current.invoice_number);
    current.clone()
  }
}
