use std::sync::Arc;

use crate::domain::invoice::{InvoiceError, InvoiceHistoryService};

pub struct ClearHistoryUseCase {
  history: Arc<InvoiceHistoryService>,
}

impl ClearHistoryUseCase {
  pub fn new(history: Arc<InvoiceHistoryService>) -> Self {
    Self { history }
  }

  pub async fn execute(&self) -> Result<(), InvoiceError> {
    self.history.clear().await
  }
}
