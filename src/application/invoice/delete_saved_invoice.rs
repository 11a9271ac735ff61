use serde::Deserialize;
use std::sync::Arc;

use crate::domain::invoice::{InvoiceError, InvoiceHistoryService};

#[derive(Debug, Deserialize)]
pub struct DeleteSavedInvoiceCommand {
  pub saved_invoice_id: String,
}

pub struct DeleteSavedInvoiceUseCase {
  history: Arc<InvoiceHistoryService>,
}

impl DeleteSavedInvoiceUseCase {
  pub fn new(history: Arc<InvoiceHistoryService>) -> Self {
    Self { history }
  }

  /// Returns whether an entry was removed. Unknown ids are not an error.
  pub async fn execute(&self, command: DeleteSavedInvoiceCommand) -> Result<bool, InvoiceError> {
    self.history.delete(&command.saved_invoice_id).await
  }
}
