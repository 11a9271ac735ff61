use chrono::{DateTime, Utc};
use rand::Rng;
use std::sync::Arc;
use tokio::sync::Mutex;

use super::entities::{Invoice, SavedInvoice};
use super::errors::InvoiceError;
use super::history_format::{decode_history, encode_history};
use super::ports::LocalStorage;
use super::value_objects::{CompanyName, LineItemDescription, UnitPrice};

/// Storage key of the history blob.
pub const DEFAULT_HISTORY_KEY: &str = "invoice_history";

const ID_SUFFIX_ALPHABET: &[u8] = b"0123456789abcdefghijklmnopqrstuvwxyz";
const ID_SUFFIX_LEN: usize = 9;

/// `inv_<epoch millis>_<9 random base36 chars>`
pub fn generate_saved_invoice_id(now: DateTime<Utc>) -> String {
  let mut rng = rand::thread_rng();
  let suffix: String = (0..ID_SUFFIX_LEN)
    .map(|_| ID_SUFFIX_ALPHABET[rng.gen_range(0..ID_SUFFIX_ALPHABET.len())] as char)
    .collect();
  format!("inv_{}_{}", now.timestamp_millis(), suffix)
}

/// Checks the fields an invoice needs before it may enter the history.
///
/// All problems are reported at once so the form can show them together.
pub fn validate_for_save(invoice: &Invoice) -> Result<(), InvoiceError> {
  let mut problems = Vec::new();

  if let Err(e) = CompanyName::new(&invoice.issuer.company_name, "Issuer") {
    problems.push(e.message().to_string());
  }
  if let Err(e) = CompanyName::new(&invoice.recipient.company_name, "Recipient") {
    problems.push(e.message().to_string());
  }

  if invoice.line_items.is_empty() {
    problems.push("At least one line item is required".to_string());
  }
  if !invoice.has_unique_line_item_ids() {
    problems.push("Line item ids must be unique".to_string());
  }

  for (position, item) in invoice.line_items.iter().enumerate() {
    if let Err(e) = LineItemDescription::new(&item.description) {
      problems.push(format!("Line item {}: {}", position + 1, e.message()));
    }
    if let Err(e) = UnitPrice::new(item.unit_price) {
      problems.push(format!("Line item {}: {}", position + 1, e.message()));
    }
  }

  if problems.is_empty() {
    Ok(())
  } else {
    Err(InvoiceError::Validation(problems))
  }
}

/// Saved invoices, newest first, mirrored to a single blob in local storage.
///
/// Every mutation is read-modify-persist under one lock. When the write
/// fails the in-memory change is undone and the storage error is returned,
/// so memory and storage never disagree after a call completes.
pub struct InvoiceHistoryService {
  storage: Arc<dyn LocalStorage>,
  storage_key: String,
  entries: Mutex<Vec<SavedInvoice>>,
}

impl InvoiceHistoryService {
  /// Reads the persisted history. Missing, unreadable or corrupt blobs give
  /// an empty history; the problem is logged, not raised.
  pub async fn load(storage: Arc<dyn LocalStorage>, storage_key: impl Into<String>) -> Self {
    let storage_key = storage_key.into();
    let entries = Self::read_entries(storage.as_ref(), &storage_key).await;

    Self {
      storage,
      storage_key,
      entries: Mutex::new(entries),
    }
  }

  async fn read_entries(storage: &dyn LocalStorage, key: &str) -> Vec<SavedInvoice> {
    let raw = match storage.get_item(key).await {
      Ok(Some(raw)) => raw,
      Ok(None) => {
        tracing::debug!("No invoice history stored under '{}'", key);
        return Vec::new();
      }
      Err(e) => {
        tracing::error!("Failed to read invoice history '{}': {}", key, e);
        return Vec::new();
      }
    };

    match decode_history(&raw) {
      Ok(entries) => {
        tracing::info!("Loaded {} saved invoices from '{}'", entries.len(), key);
        entries
      }
      Err(e) => {
        tracing::warn!(
          "Invoice history under '{}' is corrupt, starting with an empty history: {}",
          key,
          e
        );
        Vec::new()
      }
    }
  }

  async fn persist(&self, entries: &[SavedInvoice]) -> Result<(), InvoiceError> {
    let blob = encode_history(entries)?;
    self.storage.set_item(&self.storage_key, &blob).await?;
    Ok(())
  }

  pub async fn list(&self) -> Vec<SavedInvoice> {
    self.entries.lock().await.clone()
  }

  pub async fn get(&self, id: &str) -> Result<SavedInvoice, InvoiceError> {
    self
      .entries
      .lock()
      .await
      .iter()
      .find(|entry| entry.id == id)
      .cloned()
      .ok_or_else(|| InvoiceError::SavedInvoiceNotFound(id.to_string()))
  }

  /// Snapshots `invoice` with a fresh id and timestamp and puts it first.
  /// The store does not validate; callers run [`validate_for_save`].
  pub async fn save(&self, invoice: Invoice) -> Result<SavedInvoice, InvoiceError> {
    let mut entries = self.entries.lock().await;

    let now = Utc::now();
    let mut id = generate_saved_invoice_id(now);
    while entries.iter().any(|entry| entry.id == id) {
      id = generate_saved_invoice_id(now);
    }

    let saved = SavedInvoice::new(id, now, invoice);
    entries.insert(0, saved.clone());

    if let Err(e) = self.persist(&entries).await {
      entries.remove(0);
      tracing::error!("Failed to persist saved invoice {}: {}", saved.id, e);
      return Err(e);
    }

    tracing::info!(
      "Saved invoice {} ({}) to history",
      saved.invoice.invoice_number,
      saved.id
    );
    Ok(saved)
  }

  /// Removes the entry with `id`. Returns `false` without touching storage
  /// when no such entry exists.
  pub async fn delete(&self, id: &str) -> Result<bool, InvoiceError> {
    let mut entries = self.entries.lock().await;

    let Some(position) = entries.iter().position(|entry| entry.id == id) else {
      tracing::debug!("Delete of unknown saved invoice {} ignored", id);
      return Ok(false);
    };

    let removed = entries.remove(position);
    if let Err(e) = self.persist(&entries).await {
      entries.insert(position, removed);
      tracing::error!("Failed to persist deletion of {}: {}", id, e);
      return Err(e);
    }

    tracing::info!("Deleted saved invoice {}", id);
    Ok(true)
  }

  /// Empties the history and drops its blob from storage; a later load
  /// sees an absent key and starts empty.
  pub async fn clear(&self) -> Result<(), InvoiceError> {
    let mut entries = self.entries.lock().await;

    if let Err(e) = self.storage.remove_item(&self.storage_key).await {
      tracing::error!("Failed to remove history blob '{}': {}", self.storage_key, e);
      return Err(e.into());
    }
    let previous = std::mem::take(&mut *entries);

    tracing::info!("Cleared {} saved invoices", previous.len());
    Ok(())
  }
}
