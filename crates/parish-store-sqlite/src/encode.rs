//! Encoding and decoding helpers between Rust domain types and the plain-text
//! representations stored in SQLite columns.
//!
//! Timestamps are stored as RFC 3339 strings, calendar dates as `YYYY-MM-DD`.
//! Enums are stored as their snake_case names. Rows are first read into
//! `Raw*` structs of plain strings, then decoded.

use std::str::FromStr;

use chrono::{DateTime, NaiveDate, Utc};
use parish_core::{
  baptism::{BaptismDetails, BaptismRecord},
  marriage::{MarriageDetails, MarriageParticulars, MarriageRecord},
  member::Member,
  sacrament::{DetailedRecord, Sacrament},
  validate::DATE_FORMAT,
};
use rusqlite::Row;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── NaiveDate ───────────────────────────────────────────────────────────────

pub fn encode_date(d: NaiveDate) -> String { d.format(DATE_FORMAT).to_string() }

pub fn encode_opt_date(d: Option<NaiveDate>) -> Option<String> { d.map(encode_date) }

pub fn decode_date(s: &str) -> Result<NaiveDate> {
  NaiveDate::parse_from_str(s, DATE_FORMAT)
    .map_err(|e| Error::DateParse(format!("{s:?}: {e}")))
}

fn decode_opt_date(s: Option<String>) -> Result<Option<NaiveDate>> {
  s.as_deref().map(decode_date).transpose()
}

// ─── Enums ───────────────────────────────────────────────────────────────────

fn decode_enum<T: FromStr>(column: &'static str, s: &str) -> Result<T> {
  T::from_str(s).map_err(|_| Error::UnknownValue { column, value: s.to_owned() })
}

// ─── Members ─────────────────────────────────────────────────────────────────

pub const MEMBER_COLUMNS: &str = "member_id, first_name, middle_name, last_name,
  date_of_birth, gender, tribe, clan, phone, email, residence,
  membership_status, matrimony_status, baptism_date, confirmation_date,
  created_at, updated_at";

/// Raw strings read directly from a `members` row.
pub struct RawMember {
  pub member_id:         i64,
  pub first_name:        String,
  pub middle_name:       Option<String>,
  pub last_name:         String,
  pub date_of_birth:     Option<String>,
  pub gender:            Option<String>,
  pub tribe:             Option<String>,
  pub clan:              Option<String>,
  pub phone:             Option<String>,
  pub email:             Option<String>,
  pub residence:         Option<String>,
  pub membership_status: String,
  pub matrimony_status:  String,
  pub baptism_date:      Option<String>,
  pub confirmation_date: Option<String>,
  pub created_at:        String,
  pub updated_at:        String,
}

impl RawMember {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      member_id:         row.get("member_id")?,
      first_name:        row.get("first_name")?,
      middle_name:       row.get("middle_name")?,
      last_name:         row.get("last_name")?,
      date_of_birth:     row.get("date_of_birth")?,
      gender:            row.get("gender")?,
      tribe:             row.get("tribe")?,
      clan:              row.get("clan")?,
      phone:             row.get("phone")?,
      email:             row.get("email")?,
      residence:         row.get("residence")?,
      membership_status: row.get("membership_status")?,
      matrimony_status:  row.get("matrimony_status")?,
      baptism_date:      row.get("baptism_date")?,
      confirmation_date: row.get("confirmation_date")?,
      created_at:        row.get("created_at")?,
      updated_at:        row.get("updated_at")?,
    })
  }

  pub fn into_member(self) -> Result<Member> {
    Ok(Member {
      member_id:         self.member_id,
      first_name:        self.first_name,
      middle_name:       self.middle_name,
      last_name:         self.last_name,
      date_of_birth:     decode_opt_date(self.date_of_birth)?,
      gender:            self
        .gender
        .as_deref()
        .map(|g| decode_enum("gender", g))
        .transpose()?,
      tribe:             self.tribe,
      clan:              self.clan,
      phone:             self.phone,
      email:             self.email,
      residence:         self.residence,
      membership_status: decode_enum("membership_status", &self.membership_status)?,
      matrimony_status:  decode_enum("matrimony_status", &self.matrimony_status)?,
      baptism_date:      decode_opt_date(self.baptism_date)?,
      confirmation_date: decode_opt_date(self.confirmation_date)?,
      created_at:        decode_dt(&self.created_at)?,
      updated_at:        decode_dt(&self.updated_at)?,
    })
  }
}

// ─── Sacraments ──────────────────────────────────────────────────────────────

pub const SACRAMENT_COLUMNS: &str = "sacrament_id, member_id, sacrament_type,
  sacrament_date, location, celebrant, witness_1, witness_2,
  certificate_number, book_number, page_number, notes,
  detailed_record_type, detailed_record_id, recorded_by, created_at";

/// Raw strings read directly from a `sacraments` row.
pub struct RawSacrament {
  pub sacrament_id:         i64,
  pub member_id:            Option<i64>,
  pub sacrament_type:       String,
  pub sacrament_date:       String,
  pub location:             Option<String>,
  pub celebrant:            Option<String>,
  pub witness_1:            Option<String>,
  pub witness_2:            Option<String>,
  pub certificate_number:   Option<String>,
  pub book_number:          Option<String>,
  pub page_number:          Option<String>,
  pub notes:                Option<String>,
  pub detailed_record_type: Option<String>,
  pub detailed_record_id:   Option<i64>,
  pub recorded_by:          Option<i64>,
  pub created_at:           String,
}

impl RawSacrament {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      sacrament_id:         row.get("sacrament_id")?,
      member_id:            row.get("member_id")?,
      sacrament_type:       row.get("sacrament_type")?,
      sacrament_date:       row.get("sacrament_date")?,
      location:             row.get("location")?,
      celebrant:            row.get("celebrant")?,
      witness_1:            row.get("witness_1")?,
      witness_2:            row.get("witness_2")?,
      certificate_number:   row.get("certificate_number")?,
      book_number:          row.get("book_number")?,
      page_number:          row.get("page_number")?,
      notes:                row.get("notes")?,
      detailed_record_type: row.get("detailed_record_type")?,
      detailed_record_id:   row.get("detailed_record_id")?,
      recorded_by:          row.get("recorded_by")?,
      created_at:           row.get("created_at")?,
    })
  }

  pub fn into_sacrament(self) -> Result<Sacrament> {
    let detailed_record = DetailedRecord::from_parts(
      self.detailed_record_type.as_deref(),
      self.detailed_record_id,
    )?;

    Ok(Sacrament {
      sacrament_id: self.sacrament_id,
      member_id: self.member_id,
      sacrament_type: decode_enum("sacrament_type", &self.sacrament_type)?,
      sacrament_date: decode_date(&self.sacrament_date)?,
      location: self.location,
      celebrant: self.celebrant,
      witness_1: self.witness_1,
      witness_2: self.witness_2,
      certificate_number: self.certificate_number,
      book_number: self.book_number,
      page_number: self.page_number,
      notes: self.notes,
      detailed_record,
      recorded_by: self.recorded_by,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

// ─── Baptism records ─────────────────────────────────────────────────────────

pub const BAPTISM_COLUMNS: &str = "record_id, record_number, member_id,
  father_name, mother_name, tribe, birth_village, county, birth_date,
  residence, baptism_location, baptism_date, baptized_by, sponsor,
  certificate_number, book_number, page_number, notes,
  eucharist_location, eucharist_date, confirmation_location,
  confirmation_date, confirmation_register_number, confirmation_number,
  marriage_spouse, marriage_location, marriage_date,
  baptism_sacrament_id, eucharist_sacrament_id, confirmation_sacrament_id,
  marriage_sacrament_id, recorded_by, created_at, updated_at";

/// Raw strings read directly from a `baptism_records` row.
pub struct RawBaptism {
  pub record_id:                    i64,
  pub record_number:                String,
  pub member_id:                    i64,
  pub father_name:                  String,
  pub mother_name:                  String,
  pub tribe:                        String,
  pub birth_village:                String,
  pub county:                       String,
  pub birth_date:                   String,
  pub residence:                    String,
  pub baptism_location:             String,
  pub baptism_date:                 String,
  pub baptized_by:                  String,
  pub sponsor:                      String,
  pub certificate_number:           Option<String>,
  pub book_number:                  Option<String>,
  pub page_number:                  Option<String>,
  pub notes:                        Option<String>,
  pub eucharist_location:           Option<String>,
  pub eucharist_date:               Option<String>,
  pub confirmation_location:        Option<String>,
  pub confirmation_date:            Option<String>,
  pub confirmation_register_number: Option<String>,
  pub confirmation_number:          Option<String>,
  pub marriage_spouse:              Option<String>,
  pub marriage_location:            Option<String>,
  pub marriage_date:                Option<String>,
  pub baptism_sacrament_id:         i64,
  pub eucharist_sacrament_id:       Option<i64>,
  pub confirmation_sacrament_id:    Option<i64>,
  pub marriage_sacrament_id:        Option<i64>,
  pub recorded_by:                  Option<i64>,
  pub created_at:                   String,
  pub updated_at:                   String,
}

impl RawBaptism {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      record_id:                    row.get("record_id")?,
      record_number:                row.get("record_number")?,
      member_id:                    row.get("member_id")?,
      father_name:                  row.get("father_name")?,
      mother_name:                  row.get("mother_name")?,
      tribe:                        row.get("tribe")?,
      birth_village:                row.get("birth_village")?,
      county:                       row.get("county")?,
      birth_date:                   row.get("birth_date")?,
      residence:                    row.get("residence")?,
      baptism_location:             row.get("baptism_location")?,
      baptism_date:                 row.get("baptism_date")?,
      baptized_by:                  row.get("baptized_by")?,
      sponsor:                      row.get("sponsor")?,
      certificate_number:           row.get("certificate_number")?,
      book_number:                  row.get("book_number")?,
      page_number:                  row.get("page_number")?,
      notes:                        row.get("notes")?,
      eucharist_location:           row.get("eucharist_location")?,
      eucharist_date:               row.get("eucharist_date")?,
      confirmation_location:        row.get("confirmation_location")?,
      confirmation_date:            row.get("confirmation_date")?,
      confirmation_register_number: row.get("confirmation_register_number")?,
      confirmation_number:          row.get("confirmation_number")?,
      marriage_spouse:              row.get("marriage_spouse")?,
      marriage_location:            row.get("marriage_location")?,
      marriage_date:                row.get("marriage_date")?,
      baptism_sacrament_id:         row.get("baptism_sacrament_id")?,
      eucharist_sacrament_id:       row.get("eucharist_sacrament_id")?,
      confirmation_sacrament_id:    row.get("confirmation_sacrament_id")?,
      marriage_sacrament_id:        row.get("marriage_sacrament_id")?,
      recorded_by:                  row.get("recorded_by")?,
      created_at:                   row.get("created_at")?,
      updated_at:                   row.get("updated_at")?,
    })
  }

  pub fn into_record(self) -> Result<BaptismRecord> {
    let details = BaptismDetails {
      member_id:                    self.member_id,
      father_name:                  self.father_name,
      mother_name:                  self.mother_name,
      tribe:                        self.tribe,
      birth_village:                self.birth_village,
      county:                       self.county,
      birth_date:                   decode_date(&self.birth_date)?,
      residence:                    self.residence,
      baptism_location:             self.baptism_location,
      baptism_date:                 decode_date(&self.baptism_date)?,
      baptized_by:                  self.baptized_by,
      sponsor:                      self.sponsor,
      certificate_number:           self.certificate_number,
      book_number:                  self.book_number,
      page_number:                  self.page_number,
      notes:                        self.notes,
      eucharist_location:           self.eucharist_location,
      eucharist_date:               decode_opt_date(self.eucharist_date)?,
      confirmation_location:        self.confirmation_location,
      confirmation_date:            decode_opt_date(self.confirmation_date)?,
      confirmation_register_number: self.confirmation_register_number,
      confirmation_number:          self.confirmation_number,
      marriage_spouse:              self.marriage_spouse,
      marriage_location:            self.marriage_location,
      marriage_date:                decode_opt_date(self.marriage_date)?,
    };

    Ok(BaptismRecord {
      record_id: self.record_id,
      record_number: self.record_number,
      details,
      baptism_sacrament_id: self.baptism_sacrament_id,
      eucharist_sacrament_id: self.eucharist_sacrament_id,
      confirmation_sacrament_id: self.confirmation_sacrament_id,
      marriage_sacrament_id: self.marriage_sacrament_id,
      recorded_by: self.recorded_by,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}

// ─── Marriage records ────────────────────────────────────────────────────────

/// Columns of `marriage_records` outside the particulars block.
pub const MARRIAGE_HEAD_COLUMNS: [&str; 11] = [
  "husband_id",
  "wife_id",
  "husband_name",
  "wife_name",
  "marriage_date",
  "marriage_church",
  "district",
  "province",
  "presence_of",
  "delegated_by",
  "delegation_date",
];

/// Every selected `marriage_records` column, comma-separated.
pub fn marriage_columns() -> String {
  ["record_id", "record_number"]
    .into_iter()
    .chain(MARRIAGE_HEAD_COLUMNS)
    .chain(MarriageParticulars::COLUMNS)
    .chain(["sacrament_id", "parish_priest_id", "created_at", "updated_at"])
    .collect::<Vec<_>>()
    .join(", ")
}

/// Raw strings read directly from a `marriage_records` row.
pub struct RawMarriage {
  pub record_id:        i64,
  pub record_number:    String,
  pub husband_id:       Option<i64>,
  pub wife_id:          Option<i64>,
  pub husband_name:     Option<String>,
  pub wife_name:        Option<String>,
  pub marriage_date:    String,
  pub marriage_church:  String,
  pub district:         Option<String>,
  pub province:         Option<String>,
  pub presence_of:      String,
  pub delegated_by:     Option<String>,
  pub delegation_date:  Option<String>,
  pub particulars:      MarriageParticulars,
  pub sacrament_id:     Option<i64>,
  pub parish_priest_id: Option<i64>,
  pub created_at:       String,
  pub updated_at:       String,
}

impl RawMarriage {
  pub fn from_row(row: &Row<'_>) -> rusqlite::Result<Self> {
    let mut particulars = MarriageParticulars::default();
    for (column, slot) in MarriageParticulars::COLUMNS
      .into_iter()
      .zip(particulars.values_mut())
    {
      *slot = row.get(column)?;
    }

    Ok(Self {
      record_id: row.get("record_id")?,
      record_number: row.get("record_number")?,
      husband_id: row.get("husband_id")?,
      wife_id: row.get("wife_id")?,
      husband_name: row.get("husband_name")?,
      wife_name: row.get("wife_name")?,
      marriage_date: row.get("marriage_date")?,
      marriage_church: row.get("marriage_church")?,
      district: row.get("district")?,
      province: row.get("province")?,
      presence_of: row.get("presence_of")?,
      delegated_by: row.get("delegated_by")?,
      delegation_date: row.get("delegation_date")?,
      particulars,
      sacrament_id: row.get("sacrament_id")?,
      parish_priest_id: row.get("parish_priest_id")?,
      created_at: row.get("created_at")?,
      updated_at: row.get("updated_at")?,
    })
  }

  pub fn into_record(self) -> Result<MarriageRecord> {
    let details = MarriageDetails {
      husband_id:      self.husband_id,
      wife_id:         self.wife_id,
      husband_name:    self.husband_name,
      wife_name:       self.wife_name,
      marriage_date:   decode_date(&self.marriage_date)?,
      marriage_church: self.marriage_church,
      district:        self.district,
      province:        self.province,
      presence_of:     self.presence_of,
      delegated_by:    self.delegated_by,
      delegation_date: decode_opt_date(self.delegation_date)?,
      particulars:     self.particulars,
    };

    Ok(MarriageRecord {
      record_id: self.record_id,
      record_number: self.record_number,
      details,
      sacrament_id: self.sacrament_id,
      parish_priest_id: self.parish_priest_id,
      created_at: decode_dt(&self.created_at)?,
      updated_at: decode_dt(&self.updated_at)?,
    })
  }
}
