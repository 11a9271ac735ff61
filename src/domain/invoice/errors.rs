use super::value_objects::ValueObjectError;
use thiserror::Error;

/// Failures of the local storage port.
#[derive(Debug, Error)]
pub enum StorageError {
  #[error("Storage I/O error: {0}")]
  Io(#[from] std::io::Error),

  #[error("Storage unavailable: {0}")]
  Unavailable(String),
}

#[derive(Debug, Error)]
pub enum InvoiceError {
  #[error("Validation failed: {}", .0.join("; "))]
  Validation(Vec<String>),

  #[error("Invalid value: {0}")]
  ValueObject(#[from] ValueObjectError),

  #[error("Saved invoice not found: {0}")]
  SavedInvoiceNotFound(String),

  #[error("Line item not found: {0}")]
  LineItemNotFound(String),

  #[error("Line item id '{0}' already exists on this invoice")]
  DuplicateLineItemId(String),

  #[error("An invoice must keep at least one line item")]
  LastLineItem,

  #[error("Invoice was not saved durably: {0}")]
  Storage(#[from] StorageError),

  #[error("Serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  #[error("PDF generation failed: {0}")]
  PdfGenerationFailed(String),

  #[error("Internal error: {0}")]
  Internal(String),
}
