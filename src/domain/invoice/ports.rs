use async_trait::async_trait;

use super::errors::{InvoiceError, StorageError};

/// Durable string key/value storage local to this installation.
///
/// Writes must be durable when the call returns; a failed write must leave
/// the previous value readable.
#[async_trait]
pub trait LocalStorage: Send + Sync {
  async fn get_item(&self, key: &str) -> Result<Option<String>, StorageError>;
  async fn set_item(&self, key: &str, value: &str) -> Result<(), StorageError>;
  async fn remove_item(&self, key: &str) -> Result<(), StorageError>;
}

/// Turns a rendered invoice document into PDF bytes.
///
/// Implementations return either the complete document or an error, never a
/// partial result.
#[async_trait]
pub trait PdfGenerator: Send + Sync {
  async fn generate_pdf(&self, html: &str) -> Result<Vec<u8>, InvoiceError>;
}
