pub mod dtos;
pub mod errors;
pub mod handlers;
pub mod middleware;
pub mod routes;
pub mod templates;

// Re-export commonly used types
pub use dtos::{DraftResponse, ErrorResponse, SuccessResponse};
pub use errors::ApiError;
pub use middleware::{RequestId, RequestIdExt, RequestIdMiddleware};
pub use routes::{InvoiceRouteDependencies, configure_invoice_routes};
pub use templates::TemplateEngine;
