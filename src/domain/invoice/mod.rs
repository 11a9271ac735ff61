pub mod entities;
pub mod errors;
pub mod history_format;
pub mod ports;
pub mod services;
pub mod value_objects;

pub use entities::{Invoice, InvoiceTotals, LineItem, Party, SavedInvoice};
pub use errors::{InvoiceError, StorageError};
pub use history_format::{HistoryFormatError, decode_history, encode_history};
pub use ports::{LocalStorage, PdfGenerator};
pub use services::{DEFAULT_HISTORY_KEY, InvoiceHistoryService, validate_for_save};
pub use value_objects::{
  CompanyName, DEFAULT_LOGO_MAX_BYTES, LineItemDescription, Logo, UnitPrice, ValueObjectError,
  format_amount,
};
