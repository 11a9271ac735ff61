use actix_web::{HttpResponse, web};
use std::sync::Arc;
use validator::Validate;

use crate::adapters::http::dtos::{
  DraftResponse, LineItemRequest, LogoRequest, UpdateDetailsRequest,
};
use crate::adapters::http::errors::ApiError;
use crate::application::invoice::InvoiceDraft;
use crate::domain::invoice::Invoice;

// GET /api/draft
pub async fn get_draft_handler(draft: web::Data<Arc<InvoiceDraft>>) -> HttpResponse {
  HttpResponse::Ok().json(DraftResponse::from(draft.current().await))
}

// PUT /api/draft - replace the whole draft
pub async fn replace_draft_handler(
  draft: web::Data<Arc<InvoiceDraft>>,
  request: web::Json<Invoice>,
) -> Result<HttpResponse, ApiError> {
  let invoice = draft.replace(request.into_inner()).await?;
  Ok(HttpResponse::Ok().json(DraftResponse::from(invoice)))
}

// PATCH /api/draft/details
pub async fn update_details_handler(
  draft: web::Data<Arc<InvoiceDraft>>,
  request: web::Json<UpdateDetailsRequest>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let invoice = draft.update_details(request.into_inner().into()).await;
  Ok(HttpResponse::Ok().json(DraftResponse::from(invoice)))
}

// POST /api/draft/items - append a blank row
pub async fn add_line_item_handler(
  draft: web::Data<Arc<InvoiceDraft>>,
) -> Result<HttpResponse, ApiError> {
  draft.add_line_item().await?;
  Ok(HttpResponse::Created().json(DraftResponse::from(draft.current().await)))
}

// PUT /api/draft/items/{item_id}
pub async fn update_line_item_handler(
  draft: web::Data<Arc<InvoiceDraft>>,
  path: web::Path<String>,
  request: web::Json<LineItemRequest>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  draft
    .update_line_item(&path.into_inner(), request.into_inner().into())
    .await?;
  Ok(HttpResponse::Ok().json(DraftResponse::from(draft.current().await)))
}

// DELETE /api/draft/items/{item_id}
pub async fn remove_line_item_handler(
  draft: web::Data<Arc<InvoiceDraft>>,
  path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
  let invoice = draft.remove_line_item(&path.into_inner()).await?;
  Ok(HttpResponse::Ok().json(DraftResponse::from(invoice)))
}

// PUT /api/draft/logo
pub async fn set_logo_handler(
  draft: web::Data<Arc<InvoiceDraft>>,
  request: web::Json<LogoRequest>,
) -> Result<HttpResponse, ApiError> {
  request.validate()?;

  let invoice = draft.set_logo(&request.data_uri).await?;
  Ok(HttpResponse::Ok().json(DraftResponse::from(invoice)))
}

// DELETE /api/draft/logo
pub async fn remove_logo_handler(draft: web::Data<Arc<InvoiceDraft>>) -> HttpResponse {
  HttpResponse::Ok().json(DraftResponse::from(draft.remove_logo().await))
}

// POST /api/draft/reset
pub async fn reset_draft_handler(draft: web::Data<Arc<InvoiceDraft>>) -> HttpResponse {
  HttpResponse::Ok().json(DraftResponse::from(draft.reset().await))
}
