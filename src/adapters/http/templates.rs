use std::sync::Arc;
use tera::Tera;

use crate::application::invoice::{InvoiceDetailsResponse, InvoiceDocumentRenderer};
use crate::domain::invoice::InvoiceError;

pub const DEFAULT_TEMPLATE_GLOB: &str = "templates/**/*.html.tera";

/// Printable invoice shared by the preview page and the PDF export.
pub const INVOICE_DOCUMENT_TEMPLATE: &str = "pages/invoice_document.html.tera";

/// Template engine wrapper for rendering HTML templates
#[derive(Clone)]
pub struct TemplateEngine {
  tera: Arc<Tera>,
}

impl TemplateEngine {
  /// Loads templates from `templates/` relative to the working directory
  pub fn new() -> Result<Self, tera::Error> {
    Self::from_glob(DEFAULT_TEMPLATE_GLOB)
  }

  pub fn from_glob(glob: &str) -> Result<Self, tera::Error> {
    let mut tera = Tera::new(glob)?;
    tera.autoescape_on(vec!["html.tera", ".html"]);

    Ok(Self {
      tera: Arc::new(tera),
    })
  }

  /// Render a template with the given context
  pub fn render(&self, template: &str, context: &tera::Context) -> Result<String, tera::Error> {
    self.tera.render(template, context)
  }
}

impl InvoiceDocumentRenderer for TemplateEngine {
  fn render_document(&self, details: &InvoiceDetailsResponse) -> Result<String, InvoiceError> {
    let mut context = tera::Context::new();
    context.insert("invoice", details);

    self
      .render(INVOICE_DOCUMENT_TEMPLATE, &context)
      .map_err(|e| InvoiceError::Internal(format!("Template error: {}", e)))
  }
}

#[cfg(test)]
pub(crate) fn test_engine() -> TemplateEngine {
  TemplateEngine::from_glob(concat!(
    env!("CARGO_MANIFEST_DIR"),
    "/templates/**/*.html.tera"
  ))
  .expect("templates should parse")
}
