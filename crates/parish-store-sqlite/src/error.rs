//! Error type for `parish-store-sqlite`.

use parish_core::{Classify, ErrorClass, ValidationErrors};
use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] parish_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("sqlite error: {0}")]
  Sqlite(#[from] rusqlite::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// Column text that does not name a known enum value.
  #[error("unknown {column} value: {value:?}")]
  UnknownValue { column: &'static str, value: String },

  #[error(transparent)]
  Validation(#[from] ValidationErrors),

  #[error("member not found: {0}")]
  MemberNotFound(i64),

  #[error("baptism record not found: {0}")]
  BaptismRecordNotFound(i64),

  #[error("marriage record not found: {0}")]
  MarriageRecordNotFound(i64),

  /// A placeholder marriage record was requested for an unmarried member.
  #[error("member {0} is not recorded as married")]
  NotMarried(i64),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

impl Classify for Error {
  fn class(&self) -> ErrorClass {
    match self {
      Self::Core(e) => e.class(),
      Self::Validation(_) => ErrorClass::Invalid,
      Self::MemberNotFound(_)
      | Self::BaptismRecordNotFound(_)
      | Self::MarriageRecordNotFound(_) => ErrorClass::NotFound,
      Self::NotMarried(_) => ErrorClass::Conflict,
      Self::Database(_)
      | Self::Sqlite(_)
      | Self::DateParse(_)
      | Self::UnknownValue { .. } => ErrorClass::Internal,
    }
  }

  fn validation(&self) -> Option<&ValidationErrors> {
    match self {
      Self::Validation(v) => Some(v),
      Self::Core(e) => e.validation(),
      _ => None,
    }
  }
}
