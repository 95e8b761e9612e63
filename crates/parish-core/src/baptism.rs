//! The baptism register.
//!
//! One [`BaptismRecord`] per baptism. Besides the baptism itself the record
//! can carry later sacraments the same person received (eucharist,
//! confirmation, marriage); each of those present with both a date and a
//! location becomes its own [`Sacrament`] row when the record is written.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  sacrament::{NewSacrament, Sacrament, SacramentType},
  validate::{ValidationErrors, clean},
};

// ─── Validated details ───────────────────────────────────────────────────────

/// Everything a clerk enters for a baptism, after validation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaptismDetails {
  pub member_id:                    i64,
  pub father_name:                  String,
  pub mother_name:                  String,
  pub tribe:                        String,
  pub birth_village:                String,
  pub county:                       String,
  pub birth_date:                   NaiveDate,
  pub residence:                    String,
  pub baptism_location:             String,
  pub baptism_date:                 NaiveDate,
  pub baptized_by:                  String,
  pub sponsor:                      String,
  pub certificate_number:           Option<String>,
  pub book_number:                  Option<String>,
  pub page_number:                  Option<String>,
  pub notes:                        Option<String>,
  // follow-ups
  pub eucharist_location:           Option<String>,
  pub eucharist_date:               Option<NaiveDate>,
  pub confirmation_location:        Option<String>,
  pub confirmation_date:            Option<NaiveDate>,
  pub confirmation_register_number: Option<String>,
  pub confirmation_number:          Option<String>,
  pub marriage_spouse:              Option<String>,
  pub marriage_location:            Option<String>,
  pub marriage_date:                Option<NaiveDate>,
}

impl BaptismDetails {
  /// The mandatory `baptism` fact.
  pub fn baptism_sacrament(&self) -> NewSacrament {
    NewSacrament {
      location: Some(self.baptism_location.clone()),
      celebrant: Some(self.baptized_by.clone()),
      witness_1: Some(self.sponsor.clone()),
      certificate_number: self.certificate_number.clone(),
      book_number: self.book_number.clone(),
      page_number: self.page_number.clone(),
      notes: self.notes.clone(),
      ..NewSacrament::new(Some(self.member_id), SacramentType::Baptism, self.baptism_date)
    }
  }

  pub fn eucharist_sacrament(&self) -> Option<NewSacrament> {
    let (date, location) = both(self.eucharist_date, &self.eucharist_location)?;
    Some(NewSacrament {
      location: Some(location),
      ..NewSacrament::new(Some(self.member_id), SacramentType::Eucharist, date)
    })
  }

  pub fn confirmation_sacrament(&self) -> Option<NewSacrament> {
    let (date, location) = both(self.confirmation_date, &self.confirmation_location)?;
    Some(NewSacrament {
      location: Some(location),
      certificate_number: self.confirmation_number.clone(),
      book_number: self.confirmation_register_number.clone(),
      ..NewSacrament::new(Some(self.member_id), SacramentType::Confirmation, date)
    })
  }

  /// The spouse's name is stored as `witness_1`; the register has no
  /// spouse column on sacrament rows.
  pub fn marriage_sacrament(&self) -> Option<NewSacrament> {
    let (date, location) = both(self.marriage_date, &self.marriage_location)?;
    Some(NewSacrament {
      location: Some(location),
      witness_1: self.marriage_spouse.clone(),
      ..NewSacrament::new(Some(self.member_id), SacramentType::Marriage, date)
    })
  }
}

fn both(date: Option<NaiveDate>, location: &Option<String>) -> Option<(NaiveDate, String)> {
  Some((date?, location.clone()?))
}

// ─── Raw form ────────────────────────────────────────────────────────────────

/// Request body for `POST /sacramental-records/baptism`. Every field is
/// optional here so that validation can report all problems at once.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct BaptismForm {
  pub member_id:                    Option<i64>,
  pub father_name:                  Option<String>,
  pub mother_name:                  Option<String>,
  pub tribe:                        Option<String>,
  pub birth_village:                Option<String>,
  pub county:                       Option<String>,
  pub birth_date:                   Option<String>,
  pub residence:                    Option<String>,
  pub baptism_location:             Option<String>,
  pub baptism_date:                 Option<String>,
  pub baptized_by:                  Option<String>,
  pub sponsor:                      Option<String>,
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
}

impl TryFrom<BaptismForm> for BaptismDetails {
  type Error = ValidationErrors;

  fn try_from(form: BaptismForm) -> Result<Self, ValidationErrors> {
    let mut e = ValidationErrors::new();

    let member_id = e.required_id("member_id", form.member_id);
    let father_name = e.required("father_name", form.father_name);
    let mother_name = e.required("mother_name", form.mother_name);
    let tribe = e.required("tribe", form.tribe);
    let birth_village = e.required("birth_village", form.birth_village);
    let county = e.required("county", form.county);
    let birth_date = e.required_date("birth_date", form.birth_date);
    let residence = e.required("residence", form.residence);
    let baptism_location = e.required("baptism_location", form.baptism_location);
    let baptism_date = e.required_date("baptism_date", form.baptism_date);
    let baptized_by = e.required("baptized_by", form.baptized_by);
    let sponsor = e.required("sponsor", form.sponsor);
    let eucharist_date = e.optional_date("eucharist_date", form.eucharist_date);
    let confirmation_date = e.optional_date("confirmation_date", form.confirmation_date);
    let marriage_date = e.optional_date("marriage_date", form.marriage_date);

    if let (Some(born), Some(baptised)) = (birth_date, baptism_date)
      && baptised < born
    {
      e.add("baptism_date", "must not be before birth_date");
    }

    let (
      Some(member_id),
      Some(father_name),
      Some(mother_name),
      Some(tribe),
      Some(birth_village),
      Some(county),
      Some(birth_date),
      Some(residence),
      Some(baptism_location),
      Some(baptism_date),
      Some(baptized_by),
      Some(sponsor),
    ) = (
      member_id,
      father_name,
      mother_name,
      tribe,
      birth_village,
      county,
      birth_date,
      residence,
      baptism_location,
      baptism_date,
      baptized_by,
      sponsor,
    )
    else {
      return Err(e);
    };
    e.finish()?;

    Ok(Self {
      member_id,
      father_name,
      mother_name,
      tribe,
      birth_village,
      county,
      birth_date,
      residence,
      baptism_location,
      baptism_date,
      baptized_by,
      sponsor,
      certificate_number: clean(form.certificate_number),
      book_number: clean(form.book_number),
      page_number: clean(form.page_number),
      notes: clean(form.notes),
      eucharist_location: clean(form.eucharist_location),
      eucharist_date,
      confirmation_location: clean(form.confirmation_location),
      confirmation_date,
      confirmation_register_number: clean(form.confirmation_register_number),
      confirmation_number: clean(form.confirmation_number),
      marriage_spouse: clean(form.marriage_spouse),
      marriage_location: clean(form.marriage_location),
      marriage_date,
    })
  }
}

// ─── Persisted record ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct BaptismRecord {
  pub record_id:                 i64,
  pub record_number:             String,
  #[serde(flatten)]
  pub details:                   BaptismDetails,
  /// The baptism fact written together with this record.
  pub baptism_sacrament_id:      i64,
  pub eucharist_sacrament_id:    Option<i64>,
  pub confirmation_sacrament_id: Option<i64>,
  pub marriage_sacrament_id:     Option<i64>,
  pub recorded_by:               Option<i64>,
  pub created_at:                DateTime<Utc>,
  pub updated_at:                DateTime<Utc>,
}

/// A baptism record together with the sacrament rows it links to.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BaptismView {
  pub record:       BaptismRecord,
  pub baptism:      Option<Sacrament>,
  pub eucharist:    Option<Sacrament>,
  pub confirmation: Option<Sacrament>,
  pub marriage:     Option<Sacrament>,
}
