use chrono::NaiveDate;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use validator::{Validate, ValidateEmail, ValidationError};

use crate::application::invoice::{InvoiceTotalsDto, UpdateDetailsCommand, UpdateLineItemCommand};
use crate::domain::invoice::{Invoice, Party};

fn non_negative(value: &Decimal) -> Result<(), ValidationError> {
  if value.is_sign_negative() && !value.is_zero() {
    return Err(ValidationError::new("non_negative"));
  }
  Ok(())
}

fn optional_email(value: &str) -> Result<(), ValidationError> {
  let value = value.trim();
  if value.is_empty() {
    return Ok(());
  }
  if !value.validate_email() {
    return Err(ValidationError::new("email").with_message("Invalid email format".into()));
  }
  Ok(())
}

/// Issuer or recipient block as submitted by the form
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct PartyRequest {
  #[serde(default)]
  #[validate(length(max = 255, message = "Company name cannot exceed 255 characters"))]
  pub company_name: String,

  #[serde(default)]
  #[validate(custom(function = "optional_email"))]
  pub email: String,

  #[serde(default)]
  #[validate(length(max = 1000, message = "Address cannot exceed 1000 characters"))]
  pub address: String,
}

impl From<PartyRequest> for Party {
  fn from(request: PartyRequest) -> Self {
    Party::new(request.company_name, request.email, request.address)
  }
}

/// Partial update of the draft header; omitted fields keep their value
#[derive(Debug, Clone, Default, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct UpdateDetailsRequest {
  #[validate(length(max = 64, message = "Invoice number cannot exceed 64 characters"))]
  pub invoice_number: Option<String>,

  pub invoice_date: Option<NaiveDate>,

  pub due_date: Option<NaiveDate>,

  #[validate(nested)]
  pub issuer: Option<PartyRequest>,

  #[validate(nested)]
  pub recipient: Option<PartyRequest>,

  #[validate(custom(function = "non_negative", message = "Tax rate cannot be negative"))]
  pub tax_rate_percent: Option<Decimal>,

  #[validate(length(max = 5000, message = "Notes cannot exceed 5000 characters"))]
  pub notes: Option<String>,
}

impl From<UpdateDetailsRequest> for UpdateDetailsCommand {
  fn from(request: UpdateDetailsRequest) -> Self {
    UpdateDetailsCommand {
      invoice_number: request.invoice_number,
      invoice_date: request.invoice_date,
      due_date: request.due_date,
      issuer: request.issuer.map(Party::from),
      recipient: request.recipient.map(Party::from),
      tax_rate_percent: request.tax_rate_percent,
      notes: request.notes,
    }
  }
}

/// Full replacement of one line item's editable fields
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LineItemRequest {
  #[serde(default)]
  #[validate(length(max = 500, message = "Description cannot exceed 500 characters"))]
  pub description: String,

  #[validate(custom(function = "non_negative", message = "Quantity cannot be negative"))]
  pub quantity: Decimal,

  #[validate(custom(function = "non_negative", message = "Unit price cannot be negative"))]
  pub unit_price: Decimal,
}

impl From<LineItemRequest> for UpdateLineItemCommand {
  fn from(request: LineItemRequest) -> Self {
    UpdateLineItemCommand {
      description: request.description,
      quantity: request.quantity,
      unit_price: request.unit_price,
    }
  }
}

/// Logo upload as a `data:image/...;base64,` URI
#[derive(Debug, Clone, Deserialize, Validate)]
#[serde(rename_all = "camelCase")]
pub struct LogoRequest {
  #[validate(length(min = 1, message = "Logo is required"))]
  pub data_uri: String,
}

/// Draft plus its derived figures, returned after every edit
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct DraftResponse {
  pub invoice: Invoice,
  pub totals: InvoiceTotalsDto,
}

impl From<Invoice> for DraftResponse {
  fn from(invoice: Invoice) -> Self {
    Self {
      totals: invoice.totals().into(),
      invoice,
    }
  }
}

/// Simple success message response
#[derive(Debug, Clone, Serialize)]
pub struct SuccessResponse {
  pub message: String,
}

/// Standard error response
#[derive(Debug, Clone, Serialize)]
pub struct ErrorResponse {
  /// Error type/code
  pub error: String,

  /// Human-readable error message
  pub message: String,

  /// Optional detailed error information
  #[serde(skip_serializing_if = "Option::is_none")]
  pub details: Option<serde_json::Value>,
}

#[cfg(test)]
mod tests {
  use super::*;
  use rust_decimal_macros::dec;

  #[test]
  fn test_line_item_request_validation() {
    let valid = LineItemRequest {
      description: "Design".to_string(),
      quantity: dec!(2),
      unit_price: dec!(0),
    };
    assert!(valid.validate().is_ok());

    let invalid = LineItemRequest {
      description: "x".repeat(501),
      quantity: dec!(-1),
      unit_price: dec!(-0.01),
    };
    let errors = invalid.validate().unwrap_err();
    let fields = errors.field_errors();
    assert!(fields.contains_key("description"));
    assert!(fields.contains_key("quantity"));
    assert!(fields.contains_key("unit_price"));
  }

  fn party(email: &str) -> PartyRequest {
    PartyRequest {
      company_name: "Acme".to_string(),
      email: email.to_string(),
      address: String::new(),
    }
  }

  #[test]
  fn test_party_request_email_validation() {
    assert!(party("").validate().is_ok());
    assert!(party("   ").validate().is_ok());
    assert!(party("billing@acme.test").validate().is_ok());

    for email in ["a@@b.c", "x@y.", "a@.b", "no-at-sign", "a b@acme.test"] {
      let errors = party(email).validate().unwrap_err();
      assert!(
        errors.field_errors().contains_key("email"),
        "{} should be rejected",
        email
      );
    }
  }

  #[test]
  fn test_details_request_accepts_numbers_and_strings() {
    let request: UpdateDetailsRequest = serde_json::from_str(
      r#"{"taxRatePercent": 7.5, "issuer": {"companyName": "Acme", "email": ""}, "invoiceDate": "2026-01-31"}"#,
    )
    .unwrap();
    assert!(request.validate().is_ok());
    assert_eq!(request.tax_rate_percent, Some(dec!(7.5)));

    let command = UpdateDetailsCommand::from(request);
    assert_eq!(command.issuer.unwrap().company_name, "Acme");
    assert!(command.recipient.is_none());

    let request: UpdateDetailsRequest =
      serde_json::from_str(r#"{"taxRatePercent": "12.25"}"#).unwrap();
    assert_eq!(request.tax_rate_percent, Some(dec!(12.25)));
  }

  #[test]
  fn test_details_request_rejects_bad_nested_email_and_negative_tax() {
    let request = UpdateDetailsRequest {
      recipient: Some(PartyRequest {
        company_name: "Globex".to_string(),
        email: "not-an-email".to_string(),
        address: String::new(),
      }),
      tax_rate_percent: Some(dec!(-5)),
      ..Default::default()
    };
    assert!(request.validate().is_err());
  }

  #[test]
  fn test_draft_response_carries_totals() {
    let now = chrono::Utc::now();
    let mut invoice = Invoice::new_draft(now.date_naive(), now);
    invoice.line_items[0].unit_price = dec!(19.999);
    let response = DraftResponse::from(invoice);
    assert_eq!(response.totals.total_formatted, "20.00");
  }
}
