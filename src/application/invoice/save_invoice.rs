use std::sync::Arc;

use super::draft::InvoiceDraft;
use crate::domain::invoice::{InvoiceError, InvoiceHistoryService, SavedInvoice, validate_for_save};

pub struct SaveInvoiceUseCase {
  draft: Arc<InvoiceDraft>,
  history: Arc<InvoiceHistoryService>,
}

impl SaveInvoiceUseCase {
  pub fn new(draft: Arc<InvoiceDraft>, history: Arc<InvoiceHistoryService>) -> Self {
    Self { draft, history }
  }

  /// Validates the current draft and stores a snapshot of it as a new
  /// history entry. The draft itself stays as it is.
  pub async fn execute(&self) -> Result<SavedInvoice, InvoiceError> {
    let invoice = self.draft.current().await;

    if let Err(e) = validate_for_save(&invoice) {
      tracing::debug!("Draft {} rejected by save gate: {}", invoice.invoice_number, e);
      return Err(e);
    }

    self.history.save(invoice).await
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::invoice::draft::{UpdateDetailsCommand, UpdateLineItemCommand};
  use crate::domain::invoice::{DEFAULT_HISTORY_KEY, DEFAULT_LOGO_MAX_BYTES, Party};
  use crate::infrastructure::persistence::InMemoryLocalStorage;
  use rust_decimal_macros::dec;

  async fn setup() -> (Arc<InvoiceDraft>, Arc<InvoiceHistoryService>, SaveInvoiceUseCase) {
    let storage = Arc::new(InMemoryLocalStorage::new());
    let history = Arc::new(InvoiceHistoryService::load(storage, DEFAULT_HISTORY_KEY).await);
    let draft = Arc::new(InvoiceDraft::new(DEFAULT_LOGO_MAX_BYTES));
    let use_case = SaveInvoiceUseCase::new(draft.clone(), history.clone());
    (draft, history, use_case)
  }

  async fn fill(draft: &InvoiceDraft) {
    draft
      .update_details(UpdateDetailsCommand {
        issuer: Some(Party::new("Acme", "", "")),
        recipient: Some(Party::new("Globex", "", "")),
        tax_rate_percent: Some(dec!(10)),
        ..Default::default()
      })
      .await;
    draft
      .update_line_item(
        "1",
        UpdateLineItemCommand {
          description: "Design".to_string(),
          quantity: dec!(2),
          unit_price: dec!(50),
        },
      )
      .await
      .unwrap();
  }

  #[tokio::test]
  async fn test_saves_valid_draft() {
    let (draft, history, use_case) = setup().await;
    fill(&draft).await;

    let saved = use_case.execute().await.unwrap();
    assert!(saved.id.starts_with("inv_"));
    assert_eq!(saved.totals().total, dec!(110));
    assert_eq!(history.list().await, vec![saved]);
  }

  #[tokio::test]
  async fn test_rejected_draft_leaves_history_untouched() {
    let (draft, history, use_case) = setup().await;
    fill(&draft).await;
    draft
      .update_details(UpdateDetailsCommand {
        issuer: Some(Party::default()),
        ..Default::default()
      })
      .await;

    assert!(matches!(
      use_case.execute().await,
      Err(InvoiceError::Validation(_))
    ));
    assert!(history.list().await.is_empty());
  }

  #[tokio::test]
  async fn test_saving_twice_creates_two_entries() {
    let (draft, history, use_case) = setup().await;
    fill(&draft).await;

    let first = use_case.execute().await.unwrap();
    let second = use_case.execute().await.unwrap();
    assert_ne!(first.id, second.id);
    assert_eq!(history.list().await.len(), 2);
  }
}
