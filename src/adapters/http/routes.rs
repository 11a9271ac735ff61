use actix_web::web;
use std::sync::Arc;

use crate::application::invoice::{
  ClearHistoryUseCase, DeleteSavedInvoiceUseCase, GenerateInvoicePdfUseCase,
  GetInvoiceDetailsUseCase, InvoiceDraft, ListHistoryUseCase, LoadSavedInvoiceUseCase,
  SaveInvoiceUseCase,
};

use super::errors::ApiError;
use super::handlers::{draft, history, pages};
use super::templates::TemplateEngine;

// Room for a base64 logo of the maximum size plus the rest of the invoice
const JSON_BODY_LIMIT: usize = 4 * 1024 * 1024;

/// Everything the invoice routes need, built once in `main`
#[derive(Clone)]
pub struct InvoiceRouteDependencies {
  pub templates: TemplateEngine,
  pub draft: Arc<InvoiceDraft>,
  pub save_use_case: Arc<SaveInvoiceUseCase>,
  pub list_use_case: Arc<ListHistoryUseCase>,
  pub details_use_case: Arc<GetInvoiceDetailsUseCase>,
  pub load_use_case: Arc<LoadSavedInvoiceUseCase>,
  pub delete_use_case: Arc<DeleteSavedInvoiceUseCase>,
  pub clear_use_case: Arc<ClearHistoryUseCase>,
  pub pdf_use_case: Arc<GenerateInvoicePdfUseCase>,
}

/// Configure invoice routes
///
/// # Routes
///
/// Pages:
/// - GET / - Editor with live preview
/// - GET /preview - Printable document for the draft
/// - GET /draft.pdf - PDF of the draft
/// - GET /history - Saved invoices
/// - GET /history/{id} - Printable document for a saved invoice
/// - GET /history/{id}/pdf - PDF of a saved invoice
///
/// JSON API under /api:
/// - GET, PUT /draft
/// - PATCH /draft/details
/// - POST /draft/items
/// - PUT, DELETE /draft/items/{item_id}
/// - PUT, DELETE /draft/logo
/// - POST /draft/reset
/// - GET, POST, DELETE /history
/// - DELETE /history/{id}
/// - POST /history/{id}/load
pub fn configure_invoice_routes(cfg: &mut web::ServiceConfig, deps: InvoiceRouteDependencies) {
  let json_config = web::JsonConfig::default()
    .limit(JSON_BODY_LIMIT)
    .error_handler(|err, _req| {
      ApiError::validation(format!("Invalid request body: {}", err)).into()
    });

  cfg
    .app_data(json_config)
    .app_data(web::Data::new(deps.templates))
    .app_data(web::Data::new(deps.draft))
    .app_data(web::Data::new(deps.save_use_case))
    .app_data(web::Data::new(deps.list_use_case))
    .app_data(web::Data::new(deps.details_use_case))
    .app_data(web::Data::new(deps.load_use_case))
    .app_data(web::Data::new(deps.delete_use_case))
    .app_data(web::Data::new(deps.clear_use_case))
    .app_data(web::Data::new(deps.pdf_use_case));

  cfg
    .route("/", web::get().to(pages::editor_page))
    .route("/preview", web::get().to(pages::draft_preview_page))
    .route("/draft.pdf", web::get().to(pages::draft_pdf_handler))
    .route("/history", web::get().to(pages::history_page))
    .route("/history/{saved_invoice_id}", web::get().to(pages::saved_invoice_page))
    .route(
      "/history/{saved_invoice_id}/pdf",
      web::get().to(pages::saved_invoice_pdf_handler),
    );

  cfg.service(
    web::scope("/api")
      .service(
        web::resource("/draft")
          .route(web::get().to(draft::get_draft_handler))
          .route(web::put().to(draft::replace_draft_handler)),
      )
      .route("/draft/details", web::patch().to(draft::update_details_handler))
      .route("/draft/items", web::post().to(draft::add_line_item_handler))
      .service(
        web::resource("/draft/items/{item_id}")
          .route(web::put().to(draft::update_line_item_handler))
          .route(web::delete().to(draft::remove_line_item_handler)),
      )
      .service(
        web::resource("/draft/logo")
          .route(web::put().to(draft::set_logo_handler))
          .route(web::delete().to(draft::remove_logo_handler)),
      )
      .route("/draft/reset", web::post().to(draft::reset_draft_handler))
      .service(
        web::resource("/history")
          .route(web::get().to(history::list_history_handler))
          .route(web::post().to(history::save_invoice_handler))
          .route(web::delete().to(history::clear_history_handler)),
      )
      .route(
        "/history/{saved_invoice_id}",
        web::delete().to(history::delete_saved_invoice_handler),
      )
      .route(
        "/history/{saved_invoice_id}/load",
        web::post().to(history::load_saved_invoice_handler),
      ),
  );
}
