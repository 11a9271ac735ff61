use std::sync::Arc;

use super::get_invoice_details::{
  GetInvoiceDetailsCommand, GetInvoiceDetailsUseCase, InvoiceDetailsResponse, InvoiceSource,
};
use crate::domain::invoice::{InvoiceError, PdfGenerator};

/// Produces the printable HTML document for an invoice.
pub trait InvoiceDocumentRenderer: Send + Sync {
  fn render_document(&self, details: &InvoiceDetailsResponse) -> Result<String, InvoiceError>;
}

#[derive(Debug)]
pub struct GenerateInvoicePdfCommand {
  pub source: InvoiceSource,
}

#[derive(Debug)]
pub struct GeneratedPdf {
  pub file_name: String,
  pub bytes: Vec<u8>,
}

pub struct GenerateInvoicePdfUseCase {
  details: Arc<GetInvoiceDetailsUseCase>,
  renderer: Arc<dyn InvoiceDocumentRenderer>,
  pdf_generator: Arc<dyn PdfGenerator>,
}

impl GenerateInvoicePdfUseCase {
  pub fn new(
    details: Arc<GetInvoiceDetailsUseCase>,
    renderer: Arc<dyn InvoiceDocumentRenderer>,
    pdf_generator: Arc<dyn PdfGenerator>,
  ) -> Self {
    Self {
      details,
      renderer,
      pdf_generator,
    }
  }

  /// Renders the same document the preview shows and converts it to PDF.
  pub async fn execute(
    &self,
    command: GenerateInvoicePdfCommand,
  ) -> Result<GeneratedPdf, InvoiceError> {
    let details = self
      .details
      .execute(GetInvoiceDetailsCommand {
        source: command.source,
      })
      .await?;

    let html = self.renderer.render_document(&details)?;
    let bytes = self.pdf_generator.generate_pdf(&html).await.map_err(|e| {
      tracing::error!("PDF export of {} failed: {}", details.invoice_number, e);
      e
    })?;

    tracing::info!(
      "Exported {} ({} bytes)",
      details.invoice_number,
      bytes.len()
    );

    Ok(GeneratedPdf {
      file_name: details.pdf_file_name(),
      bytes,
    })
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::application::invoice::draft::InvoiceDraft;
  use crate::domain::invoice::{DEFAULT_HISTORY_KEY, DEFAULT_LOGO_MAX_BYTES, InvoiceHistoryService};
  use crate::infrastructure::persistence::InMemoryLocalStorage;
  use async_trait::async_trait;

  struct TotalsRenderer;

  impl InvoiceDocumentRenderer for TotalsRenderer {
    fn render_document(&self, details: &InvoiceDetailsResponse) -> Result<String, InvoiceError> {
      Ok(format!(
        "<h1>{}</h1><p>{}</p>",
        details.invoice_number, details.totals.total_formatted
      ))
    }
  }

  struct EchoPdf;

  #[async_trait]
  impl PdfGenerator for EchoPdf {
    async fn generate_pdf(&self, html: &str) -> Result<Vec<u8>, InvoiceError> {
      Ok(format!("%PDF-{}", html).into_bytes())
    }
  }

  struct BrokenPdf;

  #[async_trait]
  impl PdfGenerator for BrokenPdf {
    async fn generate_pdf(&self, _html: &str) -> Result<Vec<u8>, InvoiceError> {
      Err(InvoiceError::PdfGenerationFailed("renderer crashed".to_string()))
    }
  }

  async fn details() -> (Arc<InvoiceDraft>, Arc<GetInvoiceDetailsUseCase>) {
    let storage = Arc::new(InMemoryLocalStorage::new());
    let history = Arc::new(InvoiceHistoryService::load(storage, DEFAULT_HISTORY_KEY).await);
    let draft = Arc::new(InvoiceDraft::new(DEFAULT_LOGO_MAX_BYTES));
    let details = Arc::new(GetInvoiceDetailsUseCase::new(draft.clone(), history));
    (draft, details)
  }

  #[tokio::test]
  async fn test_pdf_is_built_from_rendered_document() {
    let (draft, details) = details().await;
    let number = draft.current().await.invoice_number;

    let use_case =
      GenerateInvoicePdfUseCase::new(details, Arc::new(TotalsRenderer), Arc::new(EchoPdf));
    let pdf = use_case
      .execute(GenerateInvoicePdfCommand {
        source: InvoiceSource::Draft,
      })
      .await
      .unwrap();

    assert_eq!(pdf.file_name, format!("{}.pdf", number));
    assert_eq!(
      String::from_utf8(pdf.bytes).unwrap(),
      format!("%PDF-<h1>{}</h1><p>0.00</p>", number)
    );
  }

  #[tokio::test]
  async fn test_generator_failure_is_reported() {
    let (_, details) = details().await;
    let use_case =
      GenerateInvoicePdfUseCase::new(details, Arc::new(TotalsRenderer), Arc::new(BrokenPdf));
    let result = use_case
      .execute(GenerateInvoicePdfCommand {
        source: InvoiceSource::Draft,
      })
      .await;
    assert!(matches!(result, Err(InvoiceError::PdfGenerationFailed(_))));
  }
}
