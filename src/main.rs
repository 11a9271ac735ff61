use actix_files as fs;
use actix_web::{App, HttpServer, middleware::Logger, web};
use std::sync::Arc;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt};

use invoicer::{
  adapters::http::{
    InvoiceRouteDependencies, RequestIdMiddleware, TemplateEngine, configure_invoice_routes,
  },
  application::invoice::{
    ClearHistoryUseCase, DeleteSavedInvoiceUseCase, GenerateInvoicePdfUseCase,
    GetInvoiceDetailsUseCase, InvoiceDraft, ListHistoryUseCase, LoadSavedInvoiceUseCase,
    SaveInvoiceUseCase,
  },
  domain::invoice::{InvoiceHistoryService, LocalStorage, PdfGenerator},
  infrastructure::{
    config::{Config, StorageBackend},
    pdf::WkHtmlToPdfGenerator,
    persistence::{FileLocalStorage, InMemoryLocalStorage},
  },
};

#[actix_web::main]
async fn main() -> std::io::Result<()> {
  // Initialize environment variables from .env file
  dotenvy::dotenv().ok();

  // Initialize tracing subscriber for logging
  tracing_subscriber::registry()
    .with(
      tracing_subscriber::EnvFilter::try_from_default_env()
        .unwrap_or_else(|_| "invoicer=debug,actix_web=info".into()),
    )
    .with(tracing_subscriber::fmt::layer())
    .init();

  tracing::info!("Starting invoicer");

  let config = Config::load().map_err(|e| {
    tracing::error!("Failed to load configuration: {}", e);
    std::io::Error::other(format!("Configuration error: {}", e))
  })?;
  tracing::info!("Configuration loaded successfully");

  let storage: Arc<dyn LocalStorage> = match config.storage.backend {
    StorageBackend::File => Arc::new(
      FileLocalStorage::new(&config.storage.data_dir)
        .await
        .map_err(|e| {
          tracing::error!(
            "Cannot open storage directory {}: {}",
            config.storage.data_dir.display(),
            e
          );
          std::io::Error::other(format!("Storage error: {}", e))
        })?,
    ),
    StorageBackend::Memory => {
      tracing::warn!("Using in-memory storage; saved invoices are lost on exit");
      Arc::new(InMemoryLocalStorage::new())
    }
  };

  let history = Arc::new(
    InvoiceHistoryService::load(storage, config.storage.history_key.clone()).await,
  );
  let draft = Arc::new(InvoiceDraft::new(config.logo.max_bytes));

  let templates = TemplateEngine::new().map_err(|e| {
    tracing::error!("Failed to load templates: {}", e);
    std::io::Error::other(format!("Template error: {}", e))
  })?;

  let pdf_generator: Arc<dyn PdfGenerator> = Arc::new(WkHtmlToPdfGenerator::new(
    config.pdf.wkhtmltopdf_path.clone(),
    config.pdf.page_size.clone(),
  ));

  let details_use_case = Arc::new(GetInvoiceDetailsUseCase::new(
    draft.clone(),
    history.clone(),
  ));

  let deps = InvoiceRouteDependencies {
    templates: templates.clone(),
    draft: draft.clone(),
    save_use_case: Arc::new(SaveInvoiceUseCase::new(draft.clone(), history.clone())),
    list_use_case: Arc::new(ListHistoryUseCase::new(history.clone())),
    details_use_case: details_use_case.clone(),
    load_use_case: Arc::new(LoadSavedInvoiceUseCase::new(draft, history.clone())),
    delete_use_case: Arc::new(DeleteSavedInvoiceUseCase::new(history.clone())),
    clear_use_case: Arc::new(ClearHistoryUseCase::new(history)),
    pdf_use_case: Arc::new(GenerateInvoicePdfUseCase::new(
      details_use_case,
      Arc::new(templates),
      pdf_generator,
    )),
  };

  let (server_host, server_port) = config.bind_address();

  tracing::info!("Starting HTTP server on {}:{}", server_host, server_port);

  HttpServer::new(move || {
    let deps = deps.clone();
    App::new()
      // Add request ID middleware
      .wrap(RequestIdMiddleware::new())
      // Add logging middleware
      .wrap(Logger::default())
      .configure(move |cfg| configure_invoice_routes(cfg, deps))
      // Static files
      .service(fs::Files::new("/static", "./static"))
      // Health check endpoint
      .route("/health", web::get().to(health_check))
  })
  .bind((server_host.as_str(), server_port))?
  .run()
  .await
}

/// Health check endpoint
async fn health_check() -> &'static str {
  "OK"
}
