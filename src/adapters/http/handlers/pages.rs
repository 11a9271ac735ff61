use actix_web::{
  HttpResponse,
  http::header::{ContentDisposition, DispositionParam, DispositionType},
  web,
};
use std::sync::Arc;

use crate::adapters::http::errors::ApiError;
use crate::adapters::http::templates::TemplateEngine;
use crate::application::invoice::{
  GenerateInvoicePdfCommand, GenerateInvoicePdfUseCase, GeneratedPdf, GetInvoiceDetailsCommand,
  GetInvoiceDetailsUseCase, InvoiceDetailsResponse, InvoiceDocumentRenderer, InvoiceDraft,
  InvoiceSource, ListHistoryUseCase,
};

fn render(
  templates: &TemplateEngine,
  template: &str,
  context: &tera::Context,
) -> Result<HttpResponse, ApiError> {
  let html = templates
    .render(template, context)
    .map_err(|e| ApiError::Internal(format!("Template error: {}", e)))?;

  Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}

fn document_response(
  templates: &TemplateEngine,
  details: &InvoiceDetailsResponse,
) -> Result<HttpResponse, ApiError> {
  let html = templates.render_document(details)?;
  Ok(HttpResponse::Ok().content_type("text/html; charset=utf-8").body(html))
}

fn pdf_response(pdf: GeneratedPdf) -> HttpResponse {
  HttpResponse::Ok()
    .content_type("application/pdf")
    .insert_header(ContentDisposition {
      disposition: DispositionType::Attachment,
      parameters: vec![DispositionParam::Filename(pdf.file_name)],
    })
    .body(pdf.bytes)
}

// GET / - editor with live preview
pub async fn editor_page(
  templates: web::Data<TemplateEngine>,
  draft: web::Data<Arc<InvoiceDraft>>,
  details_use_case: web::Data<Arc<GetInvoiceDetailsUseCase>>,
  list_use_case: web::Data<Arc<ListHistoryUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let form = draft.current().await;
  let details = details_use_case
    .execute(GetInvoiceDetailsCommand {
      source: InvoiceSource::Draft,
    })
    .await?;
  let history = list_use_case.execute().await;

  let mut context = tera::Context::new();
  context.insert("form", &form);
  context.insert("invoice", &details);
  context.insert("history_count", &history.total_count);

  render(&templates, "pages/editor.html.tera", &context)
}

// GET /preview - printable document for the draft
pub async fn draft_preview_page(
  templates: web::Data<TemplateEngine>,
  details_use_case: web::Data<Arc<GetInvoiceDetailsUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let details = details_use_case
    .execute(GetInvoiceDetailsCommand {
      source: InvoiceSource::Draft,
    })
    .await?;

  document_response(&templates, &details)
}

// GET /draft.pdf
pub async fn draft_pdf_handler(
  use_case: web::Data<Arc<GenerateInvoicePdfUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let pdf = use_case
    .execute(GenerateInvoicePdfCommand {
      source: InvoiceSource::Draft,
    })
    .await?;
  Ok(pdf_response(pdf))
}

// GET /history
pub async fn history_page(
  templates: web::Data<TemplateEngine>,
  list_use_case: web::Data<Arc<ListHistoryUseCase>>,
) -> Result<HttpResponse, ApiError> {
  let history = list_use_case.execute().await;

  let mut context = tera::Context::new();
  context.insert("invoices", &history.invoices);
  context.insert("total_count", &history.total_count);

  render(&templates, "pages/history.html.tera", &context)
}

// GET /history/{saved_invoice_id}
pub async fn saved_invoice_page(
  templates: web::Data<TemplateEngine>,
  details_use_case: web::Data<Arc<GetInvoiceDetailsUseCase>>,
  path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
  let details = details_use_case
    .execute(GetInvoiceDetailsCommand {
      source: InvoiceSource::Saved(path.into_inner()),
    })
    .await?;

  document_response(&templates, &details)
}

// GET /history/{saved_invoice_id}/pdf
pub async fn saved_invoice_pdf_handler(
  use_case: web::Data<Arc<GenerateInvoicePdfUseCase>>,
  path: web::Path<String>,
) -> Result<HttpResponse, ApiError> {
  let pdf = use_case
    .execute(GenerateInvoicePdfCommand {
      source: InvoiceSource::Saved(path.into_inner()),
    })
    .await?;
  Ok(pdf_response(pdf))
}
