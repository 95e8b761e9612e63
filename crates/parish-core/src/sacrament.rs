//! Sacrament facts: one row per sacrament a person received.
//!
//! A [`Sacrament`] is the generic register entry. Baptisms and marriages
//! additionally own a detailed book record; the link from the fact to that
//! record is the [`DetailedRecord`] tagged union.

use std::{collections::BTreeSet, str::FromStr as _};

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString, VariantNames};

use crate::{
  Error, Result,
  validate::{ValidationErrors, clean},
};

// ─── Type discriminant ───────────────────────────────────────────────────────

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  PartialOrd,
  Ord,
  Hash,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
  VariantNames,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum SacramentType {
  Baptism,
  Eucharist,
  FirstCommunion,
  Confirmation,
  /// Older registers call this "matrimony"; both spellings are accepted.
  #[serde(alias = "matrimony")]
  #[strum(to_string = "marriage", serialize = "matrimony")]
  Marriage,
  HolyOrders,
  AnointingOfSick,
}

// ─── Detail pointer ──────────────────────────────────────────────────────────

/// The detailed book record a sacrament fact points at, if any.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "type", content = "id", rename_all = "snake_case")]
pub enum DetailedRecord {
  BaptismRecord(i64),
  MarriageRecord(i64),
}

impl DetailedRecord {
  /// Value stored in the `detailed_record_type` column.
  pub fn type_name(&self) -> &'static str {
    match self {
      Self::BaptismRecord(_) => "baptism_record",
      Self::MarriageRecord(_) => "marriage_record",
    }
  }

  pub fn id(&self) -> i64 {
    match self {
      Self::BaptismRecord(id) | Self::MarriageRecord(id) => *id,
    }
  }

  /// Rebuild from the two nullable columns.
  pub fn from_parts(type_name: Option<&str>, id: Option<i64>) -> Result<Option<Self>> {
    match (type_name, id) {
      (Some("baptism_record"), Some(id)) => Ok(Some(Self::BaptismRecord(id))),
      (Some("marriage_record"), Some(id)) => Ok(Some(Self::MarriageRecord(id))),
      (None, None) => Ok(None),
      (Some(other), _) => Err(Error::UnknownDetailType(other.to_owned())),
      (None, Some(id)) => Err(Error::UnknownDetailType(format!("<none> for id {id}"))),
    }
  }
}

// ─── Sacrament ───────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Sacrament {
  pub sacrament_id:       i64,
  /// Absent only for marriages where neither spouse is a registered member.
  pub member_id:          Option<i64>,
  pub sacrament_type:     SacramentType,
  pub sacrament_date:     NaiveDate,
  pub location:           Option<String>,
  /// Minister, priest or officiant.
  pub celebrant:          Option<String>,
  /// Godparent, sponsor or first witness.
  pub witness_1:          Option<String>,
  pub witness_2:          Option<String>,
  pub certificate_number: Option<String>,
  pub book_number:        Option<String>,
  pub page_number:        Option<String>,
  pub notes:              Option<String>,
  pub detailed_record:    Option<DetailedRecord>,
  /// The user who registered the sacrament.
  pub recorded_by:        Option<i64>,
  pub created_at:         DateTime<Utc>,
}

/// Values for a new sacrament row. `created_at`, the id and the detail
/// pointer are assigned by the store.
#[derive(Debug, Clone, PartialEq)]
pub struct NewSacrament {
  pub member_id:          Option<i64>,
  pub sacrament_type:     SacramentType,
  pub sacrament_date:     NaiveDate,
  pub location:           Option<String>,
  pub celebrant:          Option<String>,
  pub witness_1:          Option<String>,
  pub witness_2:          Option<String>,
  pub certificate_number: Option<String>,
  pub book_number:        Option<String>,
  pub page_number:        Option<String>,
  pub notes:              Option<String>,
}

impl NewSacrament {
  /// Convenience constructor with all optional fields empty.
  pub fn new(
    member_id: Option<i64>,
    sacrament_type: SacramentType,
    sacrament_date: NaiveDate,
  ) -> Self {
    Self {
      member_id,
      sacrament_type,
      sacrament_date,
      location: None,
      celebrant: None,
      witness_1: None,
      witness_2: None,
      certificate_number: None,
      book_number: None,
      page_number: None,
      notes: None,
    }
  }
}

/// Raw request body for registering a standalone sacrament.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct SacramentForm {
  pub member_id:          Option<i64>,
  pub sacrament_type:     Option<String>,
  pub sacrament_date:     Option<String>,
  pub location:           Option<String>,
  pub celebrant:          Option<String>,
  pub witness_1:          Option<String>,
  pub witness_2:          Option<String>,
  pub certificate_number: Option<String>,
  pub book_number:        Option<String>,
  pub page_number:        Option<String>,
  pub notes:              Option<String>,
}

impl TryFrom<SacramentForm> for NewSacrament {
  type Error = ValidationErrors;

  fn try_from(form: SacramentForm) -> Result<Self, ValidationErrors> {
    let mut errors = ValidationErrors::new();

    let member_id = errors.required_id("member_id", form.member_id);
    let sacrament_type = match clean(form.sacrament_type) {
      Some(raw) => match SacramentType::from_str(&raw) {
        Ok(t) => Some(t),
        Err(_) => {
          errors.add(
            "sacrament_type",
            format!("must be one of: {}", SacramentType::VARIANTS.join(", ")),
          );
          None
        }
      },
      None => {
        errors.add("sacrament_type", "is required");
        None
      }
    };
    let sacrament_date = errors.required_date("sacrament_date", form.sacrament_date);

    let (Some(member_id), Some(sacrament_type), Some(sacrament_date)) =
      (member_id, sacrament_type, sacrament_date)
    else {
      return Err(errors);
    };

    Ok(Self {
      member_id: Some(member_id),
      sacrament_type,
      sacrament_date,
      location: clean(form.location),
      celebrant: clean(form.celebrant),
      witness_1: clean(form.witness_1),
      witness_2: clean(form.witness_2),
      certificate_number: clean(form.certificate_number),
      book_number: clean(form.book_number),
      page_number: clean(form.page_number),
      notes: clean(form.notes),
    })
  }
}

// ─── Derived summary ─────────────────────────────────────────────────────────

/// Sacrament summary computed from the sacrament rows themselves, never
/// from the denormalised member columns.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct SacramentSummary {
  pub member_id:         i64,
  pub baptism_date:      Option<NaiveDate>,
  /// Earliest eucharist or first communion.
  pub eucharist_date:    Option<NaiveDate>,
  pub confirmation_date: Option<NaiveDate>,
  pub marriage_date:     Option<NaiveDate>,
  pub received:          Vec<SacramentType>,
}

impl SacramentSummary {
  pub fn from_sacraments(member_id: i64, sacraments: &[Sacrament]) -> Self {
    let earliest = |types: &[SacramentType]| {
      sacraments
        .iter()
        .filter(|s| types.contains(&s.sacrament_type))
        .map(|s| s.sacrament_date)
        .min()
    };

    let received: BTreeSet<SacramentType> =
      sacraments.iter().map(|s| s.sacrament_type).collect();

    Self {
      member_id,
      baptism_date: earliest(&[SacramentType::Baptism]),
      eucharist_date: earliest(&[
        SacramentType::Eucharist,
        SacramentType::FirstCommunion,
      ]),
      confirmation_date: earliest(&[SacramentType::Confirmation]),
      marriage_date: earliest(&[SacramentType::Marriage]),
      received: received.into_iter().collect(),
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  fn date(s: &str) -> NaiveDate { NaiveDate::parse_from_str(s, "%Y-%m-%d").unwrap() }

  fn sacrament(id: i64, t: SacramentType, d: &str) -> Sacrament {
    Sacrament {
      sacrament_id:       id,
      member_id:          Some(1),
      sacrament_type:     t,
      sacrament_date:     date(d),
      location:           None,
      celebrant:          None,
      witness_1:          None,
      witness_2:          None,
      certificate_number: None,
      book_number:        None,
      page_number:        None,
      notes:              None,
      detailed_record:    None,
      recorded_by:        None,
      created_at:         Utc::now(),
    }
  }

  #[test]
  fn matrimony_is_an_alias_for_marriage() {
    assert_eq!(SacramentType::from_str("matrimony").unwrap(), SacramentType::Marriage);
    assert_eq!(SacramentType::Marriage.as_ref(), "marriage");
    let parsed: SacramentType = serde_json::from_str("\"matrimony\"").unwrap();
    assert_eq!(parsed, SacramentType::Marriage);
    assert_eq!(SacramentType::AnointingOfSick.as_ref(), "anointing_of_sick");
  }

  #[test]
  fn detail_pointer_columns_must_agree() {
    assert_eq!(
      DetailedRecord::from_parts(Some("marriage_record"), Some(4)).unwrap(),
      Some(DetailedRecord::MarriageRecord(4))
    );
    assert_eq!(DetailedRecord::from_parts(None, None).unwrap(), None);
    assert!(DetailedRecord::from_parts(Some("baptism_record"), None).is_err());
    assert!(DetailedRecord::from_parts(Some("family"), Some(1)).is_err());
  }

  #[test]
  fn form_reports_every_bad_field() {
    let errors = NewSacrament::try_from(SacramentForm {
      sacrament_type: Some("sainthood".into()),
      sacrament_date: Some("yesterday".into()),
      ..Default::default()
    })
    .unwrap_err();
    let fields: Vec<_> = errors.fields().collect();
    assert_eq!(fields, ["member_id", "sacrament_date", "sacrament_type"]);
  }

  #[test]
  fn summary_takes_earliest_dates_and_distinct_types() {
    let rows = vec![
      sacrament(1, SacramentType::Baptism, "2001-02-03"),
      sacrament(2, SacramentType::FirstCommunion, "2010-05-01"),
      sacrament(3, SacramentType::Eucharist, "2009-05-01"),
      sacrament(4, SacramentType::Baptism, "2005-01-01"),
    ];
    let summary = SacramentSummary::from_sacraments(1, &rows);
    assert_eq!(summary.baptism_date, Some(date("2001-02-03")));
    assert_eq!(summary.eucharist_date, Some(date("2009-05-01")));
    assert_eq!(summary.confirmation_date, None);
    assert_eq!(
      summary.received,
      vec![
        SacramentType::Baptism,
        SacramentType::Eucharist,
        SacramentType::FirstCommunion
      ]
    );
  }
}
