//! The marriage register.
//!
//! A [`MarriageRecord`] describes both spouses, the ceremony, banns,
//! dispensation and witnesses. Either spouse may be a registered member
//! (`husband_id` / `wife_id`); neither has to be.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

use crate::{
  member::{Gender, Member},
  sacrament::{NewSacrament, Sacrament, SacramentType},
  validate::{DATE_FORMAT, ValidationErrors, clean},
};

/// Stands in for the unknown spouse of a back-filled record.
pub const TO_BE_PROVIDED: &str = "To Be Provided";
/// Stands in for genealogical detail the member row does not carry.
pub const NOT_SPECIFIED: &str = "Not Specified";

// ─── Particulars ─────────────────────────────────────────────────────────────

/// Free-text register columns. Nothing here is validated; dates in this
/// block are kept exactly as written in the paper register.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct MarriageParticulars {
  pub husband_father_name:              Option<String>,
  pub husband_mother_name:              Option<String>,
  pub husband_tribe:                    Option<String>,
  pub husband_clan:                     Option<String>,
  pub husband_birth_place:              Option<String>,
  pub husband_domicile:                 Option<String>,
  pub husband_baptized_at:              Option<String>,
  pub husband_baptism_date:             Option<String>,
  pub husband_widower_of:               Option<String>,
  pub husband_parent_consent:           Option<String>,
  pub wife_father_name:                 Option<String>,
  pub wife_mother_name:                 Option<String>,
  pub wife_tribe:                       Option<String>,
  pub wife_clan:                        Option<String>,
  pub wife_birth_place:                 Option<String>,
  pub wife_domicile:                    Option<String>,
  pub wife_baptized_at:                 Option<String>,
  pub wife_baptism_date:                Option<String>,
  pub wife_widow_of:                    Option<String>,
  pub wife_parent_consent:              Option<String>,
  pub banns_number:                     Option<String>,
  pub banns_church:                     Option<String>,
  pub banns_dates:                      Option<String>,
  pub dispensation_from:                Option<String>,
  pub dispensation_given_by:            Option<String>,
  pub dispensation_impediment:          Option<String>,
  pub dispensation_date:                Option<String>,
  pub male_witness_full_name:           Option<String>,
  pub male_witness_father:              Option<String>,
  pub male_witness_clan:                Option<String>,
  pub female_witness_full_name:         Option<String>,
  pub female_witness_father:            Option<String>,
  pub female_witness_clan:              Option<String>,
  pub civil_marriage_certificate_number: Option<String>,
  pub other_documents:                  Option<String>,
  pub notes:                            Option<String>,
}

impl MarriageParticulars {
  /// Column names, in the order [`Self::values`] yields them.
  pub const COLUMNS: [&'static str; 36] = [
    "husband_father_name",
    "husband_mother_name",
    "husband_tribe",
    "husband_clan",
    "husband_birth_place",
    "husband_domicile",
    "husband_baptized_at",
    "husband_baptism_date",
    "husband_widower_of",
    "husband_parent_consent",
    "wife_father_name",
    "wife_mother_name",
    "wife_tribe",
    "wife_clan",
    "wife_birth_place",
    "wife_domicile",
    "wife_baptized_at",
    "wife_baptism_date",
    "wife_widow_of",
    "wife_parent_consent",
    "banns_number",
    "banns_church",
    "banns_dates",
    "dispensation_from",
    "dispensation_given_by",
    "dispensation_impediment",
    "dispensation_date",
    "male_witness_full_name",
    "male_witness_father",
    "male_witness_clan",
    "female_witness_full_name",
    "female_witness_father",
    "female_witness_clan",
    "civil_marriage_certificate_number",
    "other_documents",
    "notes",
  ];

  pub fn values(&self) -> [&Option<String>; 36] {
    [
      &self.husband_father_name,
      &self.husband_mother_name,
      &self.husband_tribe,
      &self.husband_clan,
      &self.husband_birth_place,
      &self.husband_domicile,
      &self.husband_baptized_at,
      &self.husband_baptism_date,
      &self.husband_widower_of,
      &self.husband_parent_consent,
      &self.wife_father_name,
      &self.wife_mother_name,
      &self.wife_tribe,
      &self.wife_clan,
      &self.wife_birth_place,
      &self.wife_domicile,
      &self.wife_baptized_at,
      &self.wife_baptism_date,
      &self.wife_widow_of,
      &self.wife_parent_consent,
      &self.banns_number,
      &self.banns_church,
      &self.banns_dates,
      &self.dispensation_from,
      &self.dispensation_given_by,
      &self.dispensation_impediment,
      &self.dispensation_date,
      &self.male_witness_full_name,
      &self.male_witness_father,
      &self.male_witness_clan,
      &self.female_witness_full_name,
      &self.female_witness_father,
      &self.female_witness_clan,
      &self.civil_marriage_certificate_number,
      &self.other_documents,
      &self.notes,
    ]
  }

  pub fn values_mut(&mut self) -> [&mut Option<String>; 36] {
    [
      &mut self.husband_father_name,
      &mut self.husband_mother_name,
      &mut self.husband_tribe,
      &mut self.husband_clan,
      &mut self.husband_birth_place,
      &mut self.husband_domicile,
      &mut self.husband_baptized_at,
      &mut self.husband_baptism_date,
      &mut self.husband_widower_of,
      &mut self.husband_parent_consent,
      &mut self.wife_father_name,
      &mut self.wife_mother_name,
      &mut self.wife_tribe,
      &mut self.wife_clan,
      &mut self.wife_birth_place,
      &mut self.wife_domicile,
      &mut self.wife_baptized_at,
      &mut self.wife_baptism_date,
      &mut self.wife_widow_of,
      &mut self.wife_parent_consent,
      &mut self.banns_number,
      &mut self.banns_church,
      &mut self.banns_dates,
      &mut self.dispensation_from,
      &mut self.dispensation_given_by,
      &mut self.dispensation_impediment,
      &mut self.dispensation_date,
      &mut self.male_witness_full_name,
      &mut self.male_witness_father,
      &mut self.male_witness_clan,
      &mut self.female_witness_full_name,
      &mut self.female_witness_father,
      &mut self.female_witness_clan,
      &mut self.civil_marriage_certificate_number,
      &mut self.other_documents,
      &mut self.notes,
    ]
  }

  /// Trim every value; blank becomes `None`.
  pub fn cleaned(mut self) -> Self {
    for slot in self.values_mut() {
      *slot = clean(slot.take());
    }
    self
  }
}

// ─── Validated details ───────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarriageDetails {
  pub husband_id:      Option<i64>,
  pub wife_id:         Option<i64>,
  pub husband_name:    Option<String>,
  pub wife_name:       Option<String>,
  pub marriage_date:   NaiveDate,
  pub marriage_church: String,
  pub district:        Option<String>,
  pub province:        Option<String>,
  /// The officiating priest.
  pub presence_of:     String,
  pub delegated_by:    Option<String>,
  pub delegation_date: Option<NaiveDate>,
  #[serde(flatten)]
  pub particulars:     MarriageParticulars,
}

impl MarriageDetails {
  /// Member the marriage fact is attributed to: the husband when he is a
  /// member, otherwise the wife, otherwise nobody.
  pub fn attributed_member(&self) -> Option<i64> { self.husband_id.or(self.wife_id) }

  pub fn marriage_sacrament(&self) -> NewSacrament {
    NewSacrament {
      location: Some(self.marriage_church.clone()),
      celebrant: Some(self.presence_of.clone()),
      witness_1: self.particulars.male_witness_full_name.clone(),
      witness_2: self.particulars.female_witness_full_name.clone(),
      notes: self.particulars.notes.clone(),
      ..NewSacrament::new(
        self.attributed_member(),
        SacramentType::Marriage,
        self.marriage_date,
      )
    }
  }

  /// Fill blank spouse names from the linked member rows.
  pub fn fill_names(&mut self, husband: Option<&Member>, wife: Option<&Member>) {
    if self.husband_name.is_none() {
      self.husband_name = husband.map(Member::full_name);
    }
    if self.wife_name.is_none() {
      self.wife_name = wife.map(Member::full_name);
    }
  }
}

/// Input to [`crate::store::RegistryStore::record_marriage`].
#[derive(Debug, Clone, PartialEq)]
pub struct NewMarriage {
  /// Explicit register number; generated when absent.
  pub record_number: Option<String>,
  pub details:       MarriageDetails,
}

/// Mutable view over one spouse's genealogical columns.
struct Side<'a> {
  father:       &'a mut Option<String>,
  mother:       &'a mut Option<String>,
  tribe:        &'a mut Option<String>,
  clan:         &'a mut Option<String>,
  domicile:     &'a mut Option<String>,
  baptized_at:  &'a mut Option<String>,
  baptism_date: &'a mut Option<String>,
}

impl MarriageParticulars {
  fn side(&mut self, wife: bool) -> Side<'_> {
    if wife {
      Side {
        father:       &mut self.wife_father_name,
        mother:       &mut self.wife_mother_name,
        tribe:        &mut self.wife_tribe,
        clan:         &mut self.wife_clan,
        domicile:     &mut self.wife_domicile,
        baptized_at:  &mut self.wife_baptized_at,
        baptism_date: &mut self.wife_baptism_date,
      }
    } else {
      Side {
        father:       &mut self.husband_father_name,
        mother:       &mut self.husband_mother_name,
        tribe:        &mut self.husband_tribe,
        clan:         &mut self.husband_clan,
        domicile:     &mut self.husband_domicile,
        baptized_at:  &mut self.husband_baptized_at,
        baptism_date: &mut self.husband_baptism_date,
      }
    }
  }
}

impl NewMarriage {
  /// Fabricate a minimal record for a member already flagged as married
  /// but with nothing in the marriage register.
  ///
  /// The member's gender picks the side (female: wife, otherwise husband).
  /// `sacrament` is the member's latest marriage fact, if any; it supplies
  /// the date, church and officiant.
  pub fn placeholder_for(
    member: &Member,
    sacrament: Option<&Sacrament>,
    today: NaiveDate,
  ) -> Self {
    let not_specified = || Some(NOT_SPECIFIED.to_owned());
    let or_not_specified = |v: &Option<String>| v.clone().or_else(not_specified);
    let is_wife = member.gender == Some(Gender::Female);

    let mut p = MarriageParticulars::default();

    let own = p.side(is_wife);
    *own.father = not_specified();
    *own.mother = not_specified();
    *own.tribe = or_not_specified(&member.tribe);
    *own.clan = or_not_specified(&member.clan);
    *own.domicile = or_not_specified(&member.residence);
    *own.baptized_at = not_specified();
    *own.baptism_date = member
      .baptism_date
      .map(|d| d.format(DATE_FORMAT).to_string())
      .or_else(not_specified);

    let other = p.side(!is_wife);
    for slot in [
      other.father,
      other.mother,
      other.tribe,
      other.clan,
      other.domicile,
      other.baptized_at,
      other.baptism_date,
    ] {
      *slot = not_specified();
    }

    p.notes = Some("Generated from the member record for certificate issue".into());

    let own_name = Some(member.full_name());
    let other_name = Some(TO_BE_PROVIDED.to_owned());
    let (husband_id, wife_id, husband_name, wife_name) = if is_wife {
      (None, Some(member.member_id), other_name, own_name)
    } else {
      (Some(member.member_id), None, own_name, other_name)
    };

    Self {
      record_number: None,
      details:       MarriageDetails {
        husband_id,
        wife_id,
        husband_name,
        wife_name,
        marriage_date: sacrament.map_or(today, |s| s.sacrament_date),
        marriage_church: sacrament
          .and_then(|s| s.location.clone())
          .unwrap_or_else(|| NOT_SPECIFIED.into()),
        district: None,
        province: None,
        presence_of: sacrament
          .and_then(|s| s.celebrant.clone())
          .unwrap_or_else(|| NOT_SPECIFIED.into()),
        delegated_by: None,
        delegation_date: None,
        particulars: p,
      },
    }
  }
}

// ─── Raw form ────────────────────────────────────────────────────────────────

/// Request body for `POST /sacramental-records/marriage`.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct MarriageForm {
  pub record_number:   Option<String>,
  pub husband_id:      Option<i64>,
  pub wife_id:         Option<i64>,
  pub husband_name:    Option<String>,
  pub wife_name:       Option<String>,
  pub marriage_date:   Option<String>,
  pub marriage_church: Option<String>,
  pub district:        Option<String>,
  pub province:        Option<String>,
  pub presence_of:     Option<String>,
  pub delegated_by:    Option<String>,
  pub delegation_date: Option<String>,
  #[serde(flatten)]
  pub particulars:     MarriageParticulars,
}

impl TryFrom<MarriageForm> for NewMarriage {
  type Error = ValidationErrors;

  fn try_from(form: MarriageForm) -> Result<Self, ValidationErrors> {
    let mut e = ValidationErrors::new();

    let husband_name = clean(form.husband_name);
    let wife_name = clean(form.wife_name);
    if husband_name.is_none() && form.husband_id.is_none() {
      e.add("husband_name", "is required when husband_id is absent");
    }
    if wife_name.is_none() && form.wife_id.is_none() {
      e.add("wife_name", "is required when wife_id is absent");
    }
    if let (Some(h), Some(w)) = (form.husband_id, form.wife_id)
      && h == w
    {
      e.add("wife_id", "must differ from husband_id");
    }

    let marriage_date = e.required_date("marriage_date", form.marriage_date);
    let marriage_church = e.required("marriage_church", form.marriage_church);
    let presence_of = e.required("presence_of", form.presence_of);
    let delegation_date = e.optional_date("delegation_date", form.delegation_date);

    let (Some(marriage_date), Some(marriage_church), Some(presence_of)) =
      (marriage_date, marriage_church, presence_of)
    else {
      return Err(e);
    };
    e.finish()?;

    Ok(Self {
      record_number: clean(form.record_number),
      details:       MarriageDetails {
        husband_id: form.husband_id,
        wife_id: form.wife_id,
        husband_name,
        wife_name,
        marriage_date,
        marriage_church,
        district: clean(form.district),
        province: clean(form.province),
        presence_of,
        delegated_by: clean(form.delegated_by),
        delegation_date,
        particulars: form.particulars.cleaned(),
      },
    })
  }
}

// ─── Persisted record ────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct MarriageRecord {
  pub record_id:        i64,
  pub record_number:    String,
  #[serde(flatten)]
  pub details:          MarriageDetails,
  /// The marriage fact paired with this record; absent only for
  /// back-filled records of members with no marriage fact.
  pub sacrament_id:     Option<i64>,
  /// The user who registered the marriage.
  pub parish_priest_id: Option<i64>,
  pub created_at:       DateTime<Utc>,
  pub updated_at:       DateTime<Utc>,
}
