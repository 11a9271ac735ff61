use serde::Deserialize;
use std::sync::Arc;

use super::draft::InvoiceDraft;
use crate::domain::invoice::{Invoice, InvoiceError, InvoiceHistoryService};

#[derive(Debug, Deserialize)]
pub struct LoadSavedInvoiceCommand {
  pub saved_invoice_id: String,
}

pub struct LoadSavedInvoiceUseCase {
  draft: Arc<InvoiceDraft>,
  history: Arc<InvoiceHistoryService>,
}

impl LoadSavedInvoiceUseCase {
  pub fn new(draft: Arc<InvoiceDraft>, history: Arc<InvoiceHistoryService>) -> Self {
    Self { draft, history }
  }

  /// Copies a saved invoice into the draft. Saving afterwards creates a new
  /// history entry; the loaded one is never updated in place.
  pub async fn execute(&self, command: LoadSavedInvoiceCommand) -> Result<Invoice, InvoiceError> {
    let saved = self.history.get(&command.saved_invoice_id).await?;
    let invoice = self.draft.replace(saved.invoice).await?;

    tracing::info!(
      "Loaded saved invoice {} ({}) into the draft",
      invoice.invoice_number,
      command.saved_invoice_id
    );
    Ok(invoice)
  }
}
