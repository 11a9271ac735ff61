use actix_web::{HttpResponse, web};
use std::sync::Arc;

use crate::adapters::http::dtos::{DraftResponse, SuccessResponse};
use crate::adapters::http::errors::ApiError;
use crate::application::invoice::{
  ClearHistoryUseCase, DeleteSavedInvoiceCommand, DeleteSavedInvoiceUseCase,
  ListHistoryUseCase, LoadSavedInvoiceCommand, LoadSavedInvoiceUseCase, SaveInvoiceUseCase,
};

// POST /api/history - save the draft as a new entry
pub async fn save_invoice_handler(
  use_case: web::Data<Arc<SaveInvoiceUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let saved = use_case.execute().await?;
  Ok(HttpResponse::Created().json(saved))
}

// GET /api/history
pub async fn list_history_handler(use_case: web::Data<Arc<ListHistoryUseCase>>) -> HttpResponse {
  HttpResponse::Ok().json(use_case.execute().await)
}

// POST /api/history/{saved_invoice_id}/load
pub async fn load_saved_invoice_handler(
  use_case: web::Data<Arc<LoadSavedInvoiceUseCase>>,
  path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
  let invoice = use_case
    .execute(LoadSavedInvoiceCommand {
      saved_invoice_id: path.into_inner(),
    })
    .await?;
  Ok(HttpResponse::Ok().json(DraftResponse::from(invoice)))
}

// DELETE /api/history/{saved_invoice_id} - unknown ids are not an error
pub async fn delete_saved_invoice_handler(
  use_case: web::Data<Arc<DeleteSavedInvoiceUseCase>>,
  path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
  use_case
    .execute(DeleteSavedInvoiceCommand {
      saved_invoice_id: path.into_inner(),
    })
    .await?;
  Ok(HttpResponse::NoContent().finish())
}

// DELETE /api/history
pub async fn clear_history_handler(
  use_case: web::Data<Arc<ClearHistoryUseCase>>,
) -> Result<HttpResponse, ApiError> {
  use_case.execute().await?;
  Ok(HttpResponse::Ok().json(SuccessResponse {
    message: "Invoice history cleared".to_string(),
  }))
}
