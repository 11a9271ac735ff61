use async_trait::async_trait;
use std::process::Stdio;
use tokio::io::AsyncWriteExt;
use tokio::process::Command;

use crate::domain::invoice::errors::InvoiceError;
use crate::domain::invoice::ports::PdfGenerator;

const PDF_MAGIC: &[u8] = b"%PDF-";

/// Renders HTML to PDF by piping it through `wkhtmltopdf - -`.
///
/// Nothing touches the filesystem: the document goes in on stdin and the PDF
/// comes back on stdout, so a failed run leaves no partial file behind.
pub struct WkHtmlToPdfGenerator {
  wkhtmltopdf_path: String,
  page_size: String,
}

impl WkHtmlToPdfGenerator {
  pub fn new(wkhtmltopdf_path: Option<String>, page_size: impl Into<String>) -> Self {
    let wkhtmltopdf_path = wkhtmltopdf_path.unwrap_or_else(|| "wkhtmltopdf".to_string());

    Self {
      wkhtmltopdf_path,
      page_size: page_size.into(),
    }
  }

  async fn verify_wkhtmltopdf_installed(&self) -> Result<(), InvoiceError> {
    let output = Command::new(&self.wkhtmltopdf_path)
      .arg("--version")
      .output()
      .await
      .map_err(|e| {
        InvoiceError::PdfGenerationFailed(format!(
          "wkhtmltopdf not found: {}. Please install wkhtmltopdf.",
          e
        ))
      })?;

    if !output.status.success() {
      return Err(InvoiceError::PdfGenerationFailed(
        "wkhtmltopdf is not working correctly".to_string(),
      ));
    }

    Ok(())
  }
}

#[async_trait]
impl PdfGenerator for WkHtmlToPdfGenerator {
  async fn generate_pdf(&self, html: &str) -> Result<Vec<u8>, InvoiceError> {
    self.verify_wkhtmltopdf_installed().await?;

    tracing::info!(
      "Generating {} PDF from {} bytes of HTML",
      self.page_size,
      html.len()
    );

    let mut child = Command::new(&self.wkhtmltopdf_path)
      .args([
        "--page-size",
        &self.page_size,
        "--margin-top",
        "10mm",
        "--margin-bottom",
        "10mm",
        "--margin-left",
        "10mm",
        "--margin-right",
        "10mm",
        "--encoding",
        "utf-8",
        "--quiet",
        "-",
        "-",
      ])
      .stdin(Stdio::piped())
      .stdout(Stdio::piped())
      .stderr(Stdio::piped())
      .kill_on_drop(true)
      .spawn()
      .map_err(|e| {
        InvoiceError::PdfGenerationFailed(format!("wkhtmltopdf execution failed: {}", e))
      })?;

    let mut stdin = child.stdin.take().ok_or_else(|| {
      InvoiceError::PdfGenerationFailed("wkhtmltopdf stdin unavailable".to_string())
    })?;

    // Feed stdin while stdout drains, otherwise a large document can deadlock on full pipes
    let document = html.as_bytes().to_vec();
    let writer = tokio::spawn(async move {
      stdin.write_all(&document).await?;
      stdin.shutdown().await
    });

    let output = child.wait_with_output().await.map_err(|e| {
      InvoiceError::PdfGenerationFailed(format!("wkhtmltopdf execution failed: {}", e))
    })?;

    match writer.await {
      Ok(Ok(())) => {}
      Ok(Err(e)) => {
        return Err(InvoiceError::PdfGenerationFailed(format!(
          "Failed to send HTML to wkhtmltopdf: {}",
          e
        )));
      }
      Err(e) => return Err(InvoiceError::Internal(e.to_string())),
    }

    if !output.status.success() {
      let stderr = String::from_utf8_lossy(&output.stderr);
      return Err(InvoiceError::PdfGenerationFailed(format!(
        "wkhtmltopdf failed: {}",
        stderr.trim()
      )));
    }

    if !output.stdout.starts_with(PDF_MAGIC) {
      return Err(InvoiceError::PdfGenerationFailed(
        "wkhtmltopdf did not produce a PDF document".to_string(),
      ));
    }

    tracing::debug!("Generated PDF of {} bytes", output.stdout.len());
    Ok(output.stdout)
  }
}
