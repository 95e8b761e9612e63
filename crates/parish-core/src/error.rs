//! Error types for `parish-core`.

use thiserror::Error;

use crate::validate::ValidationErrors;

#[derive(Debug, Error)]
pub enum Error {
  #[error("member not found: {0}")]
  MemberNotFound(i64),

  #[error("member {0} is not recorded as married")]
  NotMarried(i64),

  #[error("unknown detailed record type: {0:?}")]
  UnknownDetailType(String),

  #[error("invalid record number: {0:?}")]
  InvalidRecordNumber(String),

  #[error(transparent)]
  Validation(#[from] ValidationErrors),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;

// ─── Classification ──────────────────────────────────────────────────────────

/// Coarse category of a failure, used by transport layers to pick a status
/// code without knowing which backend produced the error.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ErrorClass {
  /// Malformed or missing input, rejected before any write.
  Invalid,
  /// A referenced member or record does not exist.
  NotFound,
  /// The request is well-formed but conflicts with current state.
  Conflict,
  /// Anything else; the write (if any) was rolled back.
  Internal,
}

/// Implemented by every store error type.
pub trait Classify {
  fn class(&self) -> ErrorClass;

  /// Field-level detail when [`ErrorClass::Invalid`].
  fn validation(&self) -> Option<&ValidationErrors> { None }
}

impl Classify for Error {
  fn class(&self) -> ErrorClass {
    match self {
      Self::MemberNotFound(_) => ErrorClass::NotFound,
      Self::NotMarried(_) => ErrorClass::Conflict,
      Self::InvalidRecordNumber(_) | Self::Validation(_) => ErrorClass::Invalid,
      Self::UnknownDetailType(_) | Self::Serialization(_) => ErrorClass::Internal,
    }
  }

  fn validation(&self) -> Option<&ValidationErrors> {
    match self {
      Self::Validation(v) => Some(v),
      _ => None,
    }
  }
}
