use actix_web::{
  HttpResponse,
  error::ResponseError,
  http::{StatusCode, header::ContentType},
};
use serde::Serialize;
use std::fmt;

use crate::domain::invoice::InvoiceError;

use super::dtos::ErrorResponse;

/// API error type that maps domain errors to HTTP responses
#[derive(Debug, Serialize)]
#[serde(tag = "type", content = "details")]
pub enum ApiError {
  /// Invalid input; every problem is listed (400 Bad Request)
  Validation(Vec<String>),

  /// Unknown saved invoice or line item (404 Not Found)
  NotFound(String),

  /// Request conflicts with the current draft (409 Conflict)
  Conflict(String),

  /// Change was not written to local storage (503 Service Unavailable)
  Storage(String),

  /// PDF renderer failed; nothing was produced (500)
  PdfGeneration(String),

  /// Internal server error (500 Internal Server Error)
  Internal(String),
}

impl ApiError {
  pub fn validation(message: impl Into<String>) -> Self {
    ApiError::Validation(vec![message.into()])
  }
}

impl fmt::Display for ApiError {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    match self {
      ApiError::Validation(messages) => write!(f, "Validation error: {}", messages.join("; ")),
      ApiError::NotFound(msg) => write!(f, "Not found: {}", msg),
      ApiError::Conflict(msg) => write!(f, "Conflict: {}", msg),
      ApiError::Storage(msg) => write!(f, "Storage error: {}", msg),
      ApiError::PdfGeneration(msg) => write!(f, "PDF generation error: {}", msg),
      ApiError::Internal(msg) => write!(f, "Internal error: {}", msg),
    }
  }
}

impl ResponseError for ApiError {
  fn status_code(&self) -> StatusCode {
    match self {
      ApiError::Validation(_) => StatusCode::BAD_REQUEST,
      ApiError::NotFound(_) => StatusCode::NOT_FOUND,
      ApiError::Conflict(_) => StatusCode::CONFLICT,
      ApiError::Storage(_) => StatusCode::SERVICE_UNAVAILABLE,
      ApiError::PdfGeneration(_) | ApiError::Internal(_) => StatusCode::INTERNAL_SERVER_ERROR,
    }
  }

  fn error_response(&self) -> HttpResponse {
    let status = self.status_code();
    let (error_type, message, details) = match self {
      ApiError::Validation(messages) => (
        "validation_error",
        messages.join("; "),
        Some(serde_json::json!(messages)),
      ),
      ApiError::NotFound(msg) => ("not_found", msg.clone(), None),
      ApiError::Conflict(msg) => ("conflict", msg.clone(), None),
      ApiError::Storage(msg) => {
        tracing::error!("Storage error: {}", msg);
        (
          "storage_error",
          "The change could not be saved to local storage".to_string(),
          None,
        )
      }
      ApiError::PdfGeneration(msg) => {
        tracing::error!("PDF generation error: {}", msg);
        (
          "pdf_generation_failed",
          "The PDF could not be generated".to_string(),
          None,
        )
      }
      ApiError::Internal(msg) => {
        // Don't expose internal error details
        tracing::error!("Internal error: {}", msg);
        (
          "internal_error",
          "An internal server error occurred".to_string(),
          None,
        )
      }
    };

    let error_response = ErrorResponse {
      error: error_type.to_string(),
      message,
      details,
    };

    HttpResponse::build(status)
      .content_type(ContentType::json())
      .json(error_response)
  }
}

/// Convert InvoiceError to ApiError
impl From<InvoiceError> for ApiError {
  fn from(error: InvoiceError) -> Self {
    match error {
      InvoiceError::Validation(messages) => ApiError::Validation(messages),
      InvoiceError::ValueObject(err) => ApiError::validation(err.message()),
      InvoiceError::SavedInvoiceNotFound(id) => {
        ApiError::NotFound(format!("Saved invoice '{}' not found", id))
      }
      InvoiceError::LineItemNotFound(id) => {
        ApiError::NotFound(format!("Line item '{}' not found", id))
      }
      err @ (InvoiceError::DuplicateLineItemId(_) | InvoiceError::LastLineItem) => {
        ApiError::Conflict(err.to_string())
      }
      InvoiceError::Storage(err) => ApiError::Storage(err.to_string()),
      InvoiceError::PdfGenerationFailed(msg) => ApiError::PdfGeneration(msg),
      err @ (InvoiceError::Serialization(_) | InvoiceError::Internal(_)) => {
        ApiError::Internal(err.to_string())
      }
    }
  }
}

/// Convert validation errors from validator crate
impl From<validator::ValidationErrors> for ApiError {
  fn from(errors: validator::ValidationErrors) -> Self {
    let mut messages = Vec::new();
    collect_messages(&errors, "", &mut messages);
    messages.sort();
    ApiError::Validation(messages)
  }
}

fn collect_messages(errors: &validator::ValidationErrors, prefix: &str, out: &mut Vec<String>) {
  use validator::ValidationErrorsKind;

  for (field, kind) in errors.errors() {
    let path = if prefix.is_empty() {
      field.to_string()
    } else {
      format!("{}.{}", prefix, field)
    };
    match kind {
      ValidationErrorsKind::Field(field_errors) => {
        out.extend(field_errors.iter().map(|error| {
          error
            .message
            .as_ref()
            .map(|m| m.to_string())
            .unwrap_or_else(|| format!("Invalid field: {}", path))
        }));
      }
      ValidationErrorsKind::Struct(nested) => collect_messages(nested, &path, out),
      ValidationErrorsKind::List(items) => {
        for (index, nested) in items {
          collect_messages(nested, &format!("{}[{}]", path, index), out);
        }
      }
    }
  }
}
