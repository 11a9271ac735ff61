pub mod clear_history;
pub mod delete_saved_invoice;
pub mod draft;
pub mod generate_invoice_pdf;
pub mod get_invoice_details;
pub mod list_history;
pub mod load_saved_invoice;
pub mod save_invoice;

pub use clear_history::ClearHistoryUseCase;
pub use delete_saved_invoice::{DeleteSavedInvoiceCommand, DeleteSavedInvoiceUseCase};
pub use draft::{InvoiceDraft, UpdateDetailsCommand, UpdateLineItemCommand};
pub use generate_invoice_pdf::{
  GenerateInvoicePdfCommand, GenerateInvoicePdfUseCase, GeneratedPdf, InvoiceDocumentRenderer,
};
pub use get_invoice_details::{
  GetInvoiceDetailsCommand, GetInvoiceDetailsUseCase, InvoiceDetailsResponse, InvoiceLineItemDto,
  InvoiceSource, InvoiceTotalsDto,
};
pub use list_history::{HistoryListItemDto, ListHistoryResponse, ListHistoryUseCase};
pub use load_saved_invoice::{LoadSavedInvoiceCommand, LoadSavedInvoiceUseCase};
pub use save_invoice::SaveInvoiceUseCase;
