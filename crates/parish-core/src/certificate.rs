//! Certificates issued from the registers.
//!
//! A certificate is a read model: the register record plus issue metadata
//! and a verification code a third party can check against the parish.

use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use sha2::{Digest, Sha256};

use crate::{
  baptism::BaptismRecord, marriage::MarriageRecord, member::Member, validate::DATE_FORMAT,
};

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaptismCertificate {
  pub parish_name:       String,
  pub issued_on:         NaiveDate,
  pub member_name:       String,
  pub record:            BaptismRecord,
  pub verification_code: String,
}

impl BaptismCertificate {
  pub fn issue(
    parish_name: &str,
    member: &Member,
    record: BaptismRecord,
    issued_on: NaiveDate,
  ) -> Self {
    let member_name = member.full_name();
    let verification_code = verification_code(
      &record.record_number,
      record.details.baptism_date,
      &[&member_name],
    );
    Self {
      parish_name: parish_name.to_owned(),
      issued_on,
      member_name,
      record,
      verification_code,
    }
  }
}

#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct MarriageCertificate {
  pub parish_name:       String,
  pub issued_on:         NaiveDate,
  pub record:            MarriageRecord,
  pub verification_code: String,
}

impl MarriageCertificate {
  pub fn issue(parish_name: &str, record: MarriageRecord, issued_on: NaiveDate) -> Self {
    let verification_code = verification_code(
      &record.record_number,
      record.details.marriage_date,
      &[
        record.details.husband_name.as_deref().unwrap_or_default(),
        record.details.wife_name.as_deref().unwrap_or_default(),
      ],
    );
    Self {
      parish_name: parish_name.to_owned(),
      issued_on,
      record,
      verification_code,
    }
  }
}

/// Lowercase hex SHA-256 over the record number, the event date and the
/// party names, NUL-separated. Independent of the issue date.
pub fn verification_code(record_number: &str, date: NaiveDate, parties: &[&str]) -> String {
  let mut hasher = Sha256::new();
  hasher.update(record_number.as_bytes());
  hasher.update([0u8]);
  hasher.update(date.format(DATE_FORMAT).to_string().as_bytes());
  for party in parties {
    hasher.update([0u8]);
    hasher.update(party.as_bytes());
  }
  hex::encode(hasher.finalize())
}
