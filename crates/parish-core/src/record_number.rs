//! Human-readable register numbers for detail records.
//!
//! Format: `{PREFIX}-{YEAR}-{SEQ:05}`, e.g. `BAP-2024-00012`. The sequence
//! restarts every year and is per record kind. Stores compute the next
//! number from the numbers already present inside the write transaction.

use std::{fmt, str::FromStr};

use serde::{Deserialize, Serialize};

use crate::Error;

#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum RecordKind {
  Baptism,
  Marriage,
}

impl RecordKind {
  pub fn prefix(self) -> &'static str {
    match self {
      Self::Baptism => "BAP",
      Self::Marriage => "MAR",
    }
  }

  fn from_prefix(prefix: &str) -> Option<Self> {
    match prefix {
      "BAP" => Some(Self::Baptism),
      "MAR" => Some(Self::Marriage),
      _ => None,
    }
  }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RecordNumber {
  pub kind:     RecordKind,
  pub year:     i32,
  pub sequence: u32,
}

impl RecordNumber {
  /// SQL `LIKE` pattern matching every number of `kind` issued in `year`.
  pub fn like_pattern(kind: RecordKind, year: i32) -> String {
    format!("{}-{year:04}-%", kind.prefix())
  }

  /// The number following the highest one of `kind`/`year` in `existing`.
  ///
  /// Strings that are not in the scheme, or belong to another kind or year,
  /// are ignored, as is a sequence already at `u32::MAX`; an empty register
  /// yields sequence 1.
  pub fn next_after<'a>(
    kind: RecordKind,
    year: i32,
    existing: impl IntoIterator<Item = &'a str>,
  ) -> Self {
    let highest = existing
      .into_iter()
      .filter_map(|s| s.parse::<RecordNumber>().ok())
      .filter(|n| n.kind == kind && n.year == year)
      .map(|n| n.sequence)
      .filter(|&seq| seq < u32::MAX)
      .max()
      .unwrap_or(0);

    Self { kind, year, sequence: highest + 1 }
  }
}

impl fmt::Display for RecordNumber {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    write!(f, "{}-{:04}-{:05}", self.kind.prefix(), self.year, self.sequence)
  }
}

impl FromStr for RecordNumber {
  type Err = Error;

  fn from_str(s: &str) -> Result<Self, Self::Err> {
    let invalid = || Error::InvalidRecordNumber(s.to_owned());

    let mut parts = s.splitn(3, '-');
    let (Some(prefix), Some(year), Some(seq)) = (parts.next(), parts.next(), parts.next())
    else {
      return Err(invalid());
    };

    let kind = RecordKind::from_prefix(prefix).ok_or_else(invalid)?;
    if year.len() != 4 || seq.is_empty() || !seq.bytes().all(|b| b.is_ascii_digit()) {
      return Err(invalid());
    }
    let year = year.parse().map_err(|_| invalid())?;
    let sequence = seq.parse().map_err(|_| invalid())?;

    Ok(Self { kind, year, sequence })
  }
}
