//! Field-by-field input validation.
//!
//! Request forms arrive with every field optional and every date as text.
//! Converting a form into its typed input collects *all* problems into a
//! [`ValidationErrors`] before any write is attempted.

use std::collections::BTreeMap;

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Wire and storage format for calendar dates.
pub const DATE_FORMAT: &str = "%Y-%m-%d";

/// Messages keyed by the offending field name.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize, Error)]
#[error("validation failed: {}", self.summary())]
pub struct ValidationErrors {
  #[serde(flatten)]
  fields: BTreeMap<String, Vec<String>>,
}

impl ValidationErrors {
  pub fn new() -> Self { Self::default() }

  pub fn add(&mut self, field: &str, message: impl Into<String>) {
    self
      .fields
      .entry(field.to_owned())
      .or_default()
      .push(message.into());
  }

  pub fn is_empty(&self) -> bool { self.fields.is_empty() }

  pub fn get(&self, field: &str) -> Option<&[String]> {
    self.fields.get(field).map(Vec::as_slice)
  }

  pub fn fields(&self) -> impl Iterator<Item = &str> {
    self.fields.keys().map(String::as_str)
  }

  /// `Ok(())` when nothing was recorded.
  pub fn finish(self) -> Result<(), Self> {
    if self.is_empty() { Ok(()) } else { Err(self) }
  }

  fn summary(&self) -> String {
    self
      .fields
      .iter()
      .map(|(field, msgs)| format!("{field}: {}", msgs.join(", ")))
      .collect::<Vec<_>>()
      .join("; ")
  }

  // ── Field helpers ─────────────────────────────────────────────────────

  /// Trimmed, non-blank text or an "is required" error.
  pub fn required(&mut self, field: &str, value: Option<String>) -> Option<String> {
    let value = clean(value);
    if value.is_none() {
      self.add(field, "is required");
    }
    value
  }

  /// A present id or an "is required" error.
  pub fn required_id(&mut self, field: &str, value: Option<i64>) -> Option<i64> {
    if value.is_none() {
      self.add(field, "is required");
    }
    value
  }

  pub fn required_date(
    &mut self,
    field: &str,
    value: Option<String>,
  ) -> Option<NaiveDate> {
    match clean(value) {
      Some(raw) => self.parse_date(field, &raw),
      None => {
        self.add(field, "is required");
        None
      }
    }
  }

  pub fn optional_date(
    &mut self,
    field: &str,
    value: Option<String>,
  ) -> Option<NaiveDate> {
    clean(value).and_then(|raw| self.parse_date(field, &raw))
  }

  fn parse_date(&mut self, field: &str, raw: &str) -> Option<NaiveDate> {
    match NaiveDate::parse_from_str(raw, DATE_FORMAT) {
      Ok(d) => Some(d),
      Err(_) => {
        self.add(field, "must be a date in YYYY-MM-DD format");
        None
      }
    }
  }
}

/// Trim surrounding whitespace; blank becomes `None`.
pub fn clean(value: Option<String>) -> Option<String> {
  value
    .map(|v| v.trim().to_owned())
    .filter(|v| !v.is_empty())
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn blank_text_counts_as_missing() {
    let mut errors = ValidationErrors::new();
    assert_eq!(errors.required("name", Some("   ".into())), None);
    assert_eq!(errors.get("name"), Some(&["is required".to_string()][..]));
  }

  #[test]
  fn bad_date_is_reported_against_its_field() {
    let mut errors = ValidationErrors::new();
    assert_eq!(errors.optional_date("birth_date", Some("10/03/2024".into())), None);
    assert_eq!(errors.optional_date("other_date", None), None);
    let fields: Vec<_> = errors.fields().collect();
    assert_eq!(fields, ["birth_date"]);
  }

  #[test]
  fn serialises_as_flat_map() {
    let mut errors = ValidationErrors::new();
    errors.add("sponsor", "is required");
    let json = serde_json::to_value(&errors).unwrap();
    assert_eq!(json, serde_json::json!({ "sponsor": ["is required"] }));
  }
}
