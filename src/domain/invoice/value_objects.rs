use base64::{Engine as _, engine::general_purpose};
use chrono::{DateTime, Utc};
use rust_decimal::{Decimal, RoundingStrategy};
use serde::{Deserialize, Serialize};
use std::fmt;

/// Upper bound for a decoded logo image, matching the upload form limit.
pub const DEFAULT_LOGO_MAX_BYTES: usize = 2 * 1024 * 1024;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ValueObjectError {
  #[error("Invalid company name: {0}")]
  InvalidCompanyName(String),
  #[error("Invalid line item description: {0}")]
  InvalidDescription(String),
  #[error("Invalid unit price: {0}")]
  InvalidUnitPrice(String),
  #[error("Invalid logo: {0}")]
  InvalidLogo(String),
}

impl ValueObjectError {
  /// Message without the error-kind prefix, for user-facing lists.
  pub fn message(&self) -> &str {
    match self {
      ValueObjectError::InvalidCompanyName(msg)
      | ValueObjectError::InvalidDescription(msg)
      | ValueObjectError::InvalidUnitPrice(msg)
      | ValueObjectError::InvalidLogo(msg) => msg,
    }
  }
}

// Company Name - required on both parties before an invoice can be saved
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CompanyName(String);

impl CompanyName {
  pub fn new(value: &str, role: &str) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidCompanyName(format!(
        "{} company name is required",
        role
      )));
    }
    if trimmed.chars().count() > 255 {
      return Err(ValueObjectError::InvalidCompanyName(format!(
        "{} company name cannot exceed 255 characters",
        role
      )));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }
}

// Line Item Description
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LineItemDescription(String);

impl LineItemDescription {
  pub fn new(value: &str) -> Result<Self, ValueObjectError> {
    let trimmed = value.trim();
    if trimmed.is_empty() {
      return Err(ValueObjectError::InvalidDescription(
        "Description cannot be empty".to_string(),
      ));
    }
    if trimmed.chars().count() > 500 {
      return Err(ValueObjectError::InvalidDescription(
        "Description cannot exceed 500 characters".to_string(),
      ));
    }
    Ok(Self(trimmed.to_string()))
  }

  pub fn value(&self) -> &str {
    &self.0
  }
}

// Unit Price - strictly positive for a saveable line item
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct UnitPrice(Decimal);

impl UnitPrice {
  pub fn new(value: Decimal) -> Result<Self, ValueObjectError> {
    if value <= Decimal::ZERO {
      return Err(ValueObjectError::InvalidUnitPrice(
        "Unit price must be greater than zero".to_string(),
      ));
    }
    Ok(Self(value))
  }

  pub fn value(&self) -> Decimal {
    self.0
  }
}

/// Logo image carried inline as a `data:image/...;base64,` URI.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Logo(String);

impl Logo {
  pub fn parse(value: &str, max_bytes: usize) -> Result<Self, ValueObjectError> {
    let value = value.trim();
    let rest = value.strip_prefix("data:").ok_or_else(|| {
      ValueObjectError::InvalidLogo("Logo must be a data URI".to_string())
    })?;
    let (header, payload) = rest.split_once(',').ok_or_else(|| {
      ValueObjectError::InvalidLogo("Logo data URI has no payload".to_string())
    })?;
    let mime = header.strip_suffix(";base64").ok_or_else(|| {
      ValueObjectError::InvalidLogo("Logo data URI must be base64 encoded".to_string())
    })?;
    if !mime.starts_with("image/") {
      return Err(ValueObjectError::InvalidLogo(
        "Please upload an image file".to_string(),
      ));
    }

    let decoded = general_purpose::STANDARD
      .decode(payload)
      .map_err(|e| ValueObjectError::InvalidLogo(format!("Invalid base64 payload: {}", e)))?;
    if decoded.is_empty() {
      return Err(ValueObjectError::InvalidLogo("Image is empty".to_string()));
    }
    if decoded.len() > max_bytes {
      return Err(ValueObjectError::InvalidLogo(format!(
        "Image must be less than {} bytes",
        max_bytes
      )));
    }

    Ok(Self(value.to_string()))
  }

  pub fn mime_type(&self) -> &str {
    self
      .0
      .strip_prefix("data:")
      .and_then(|rest| rest.split(';').next())
      .unwrap_or_default()
  }

  pub fn value(&self) -> &str {
    &self.0
  }

  pub fn into_inner(self) -> String {
    self.0
  }
}

impl fmt::Display for Logo {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}", self.0)
  }
}

/// Default invoice number: `INV-` followed by the last six digits of the
/// epoch milliseconds.
pub fn default_invoice_number(now: DateTime<Utc>) -> String {
  let millis = now.timestamp_millis().to_string();
  let start = millis.len().saturating_sub(6);
  format!("INV-{}", &millis[start..])
}

/// Display rounding for amounts. Only presentation calls this; totals stay
/// unrounded everywhere else.
pub fn format_amount(amount: Decimal) -> String {
  let rounded = amount.round_dp_with_strategy(2, RoundingStrategy::MidpointAwayFromZero);
  format!("{:.2}", rounded)
}

#[cfg(test)]
mod tests {
  use super::*;
  use chrono::TimeZone;
  use rust_decimal_macros::dec;

  // 1x1 transparent PNG
  const PNG_PIXEL: &str = "iVBORw0KGgoAAAANSUhEUgAAAAEAAAABCAQAAAC1HAwCAAAAC0lEQVR42mNkYAAAAAYAAjCB0C8AAAAASUVORK5CYII=";

  #[test]
  fn test_company_name() {
    assert_eq!(CompanyName::new("  Acme  ", "Issuer").unwrap().value(), "Acme");
    let err = CompanyName::new("   ", "Recipient").unwrap_err();
    assert_eq!(
      err,
      ValueObjectError::InvalidCompanyName("Recipient company name is required".to_string())
    );
  }

  #[test]
  fn test_company_name_limit_counts_characters() {
    assert!(CompanyName::new(&"株".repeat(255), "Issuer").is_ok());
    assert!(CompanyName::new(&"株".repeat(256), "Issuer").is_err());
  }

  #[test]
  fn test_line_item_description() {
    assert!(LineItemDescription::new("Consulting").is_ok());
    assert!(LineItemDescription::new("").is_err());
    assert!(LineItemDescription::new(&"x".repeat(501)).is_err());
    assert!(LineItemDescription::new(&"é".repeat(500)).is_ok());
  }

  #[test]
  fn test_unit_price() {
    assert!(UnitPrice::new(dec!(0.01)).is_ok());
    assert!(UnitPrice::new(dec!(0)).is_err());
    assert!(UnitPrice::new(dec!(-5)).is_err());
  }

  #[test]
  fn test_logo_accepts_image_data_uri() {
    let uri = format!("data:image/png;base64,{}", PNG_PIXEL);
    let logo = Logo::parse(&uri, DEFAULT_LOGO_MAX_BYTES).unwrap();
    assert_eq!(logo.mime_type(), "image/png");
    assert_eq!(logo.value(), uri);
  }

  #[test]
  fn test_logo_rejects_non_images_and_oversized_payloads() {
    assert!(Logo::parse("https://example.com/logo.png", DEFAULT_LOGO_MAX_BYTES).is_err());
    assert!(Logo::parse("data:text/plain;base64,aGVsbG8=", DEFAULT_LOGO_MAX_BYTES).is_err());
    assert!(Logo::parse("data:image/png,rawbytes", DEFAULT_LOGO_MAX_BYTES).is_err());
    assert!(Logo::parse("data:image/png;base64,%%%", DEFAULT_LOGO_MAX_BYTES).is_err());

    let uri = format!("data:image/png;base64,{}", PNG_PIXEL);
    assert!(Logo::parse(&uri, 10).is_err());
  }

  #[test]
  fn test_default_invoice_number() {
    let now = Utc.timestamp_millis_opt(1_760_000_123_456).unwrap();
    assert_eq!(default_invoice_number(now), "INV-123456");
  }

  #[test]
  fn test_format_amount() {
    assert_eq!(format_amount(dec!(137.5)), "137.50");
    assert_eq!(format_amount(dec!(12.345)), "12.35");
    assert_eq!(format_amount(dec!(0)), "0.00");
    assert_eq!(format_amount(dec!(-2.005)), "-2.01");
  }
}
