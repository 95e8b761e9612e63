//! Members, the people the registry is about.
//!
//! A member row also carries denormalised sacrament summary fields
//! (`baptism_date`, `confirmation_date`, `matrimony_status`) that the
//! sacramental write paths fill in opportunistically.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};
use strum::{AsRefStr, Display, EnumString};

use crate::validate::ValidationErrors;

// ─── Categorical fields ──────────────────────────────────────────────────────

#[derive(
  Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, AsRefStr, Display, EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum Gender {
  Male,
  Female,
}

/// Standing of a member within the parish. Set by direct assignment; there
/// are no transition rules.
#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MembershipStatus {
  #[default]
  Active,
  Inactive,
  Transferred,
  Deceased,
}

#[derive(
  Debug,
  Clone,
  Copy,
  PartialEq,
  Eq,
  Default,
  Serialize,
  Deserialize,
  AsRefStr,
  Display,
  EnumString,
)]
#[serde(rename_all = "snake_case")]
#[strum(serialize_all = "snake_case")]
pub enum MatrimonyStatus {
  #[default]
  Single,
  Married,
  Widowed,
  Separated,
  Divorced,
}

// ─── Member ──────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Member {
  pub member_id:         i64,
  pub first_name:        String,
  pub middle_name:       Option<String>,
  pub last_name:         String,
  pub date_of_birth:     Option<NaiveDate>,
  pub gender:            Option<Gender>,
  pub tribe:             Option<String>,
  pub clan:              Option<String>,
  pub phone:             Option<String>,
  pub email:             Option<String>,
  pub residence:         Option<String>,
  pub membership_status: MembershipStatus,
  pub matrimony_status:  MatrimonyStatus,
  /// Summary copy of the earliest recorded baptism; only ever set when empty.
  pub baptism_date:      Option<NaiveDate>,
  /// Summary copy of the confirmation date; only ever set when empty.
  pub confirmation_date: Option<NaiveDate>,
  pub created_at:        DateTime<Utc>,
  pub updated_at:        DateTime<Utc>,
}

impl Member {
  /// "First Middle Last", skipping an absent middle name.
  pub fn full_name(&self) -> String {
    [
      Some(self.first_name.as_str()),
      self.middle_name.as_deref(),
      Some(self.last_name.as_str()),
    ]
    .into_iter()
    .flatten()
    .filter(|part| !part.is_empty())
    .collect::<Vec<_>>()
    .join(" ")
  }
}

// ─── Inputs ──────────────────────────────────────────────────────────────────

/// Input to [`crate::store::RegistryStore::add_member`].
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(default)]
pub struct NewMember {
  pub first_name:        String,
  pub middle_name:       Option<String>,
  pub last_name:         String,
  pub date_of_birth:     Option<NaiveDate>,
  pub gender:            Option<Gender>,
  pub tribe:             Option<String>,
  pub clan:              Option<String>,
  pub phone:             Option<String>,
  pub email:             Option<String>,
  pub residence:         Option<String>,
  pub membership_status: MembershipStatus,
  pub matrimony_status:  MatrimonyStatus,
}

impl NewMember {
  pub fn new(first_name: impl Into<String>, last_name: impl Into<String>) -> Self {
    Self {
      first_name: first_name.into(),
      last_name: last_name.into(),
      ..Self::default()
    }
  }

  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if self.first_name.trim().is_empty() {
      errors.add("first_name", "is required");
    }
    if self.last_name.trim().is_empty() {
      errors.add("last_name", "is required");
    }
    check_email(&mut errors, self.email.as_deref());
    errors.finish()
  }
}

/// Partial update; `None` leaves a field unchanged.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberPatch {
  pub first_name:        Option<String>,
  pub middle_name:       Option<String>,
  pub last_name:         Option<String>,
  pub date_of_birth:     Option<NaiveDate>,
  pub gender:            Option<Gender>,
  pub tribe:             Option<String>,
  pub clan:              Option<String>,
  pub phone:             Option<String>,
  pub email:             Option<String>,
  pub residence:         Option<String>,
  pub membership_status: Option<MembershipStatus>,
  pub matrimony_status:  Option<MatrimonyStatus>,
  pub baptism_date:      Option<NaiveDate>,
  pub confirmation_date: Option<NaiveDate>,
}

impl MemberPatch {
  pub fn validate(&self) -> Result<(), ValidationErrors> {
    let mut errors = ValidationErrors::new();
    if self.first_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
      errors.add("first_name", "must not be blank");
    }
    if self.last_name.as_deref().is_some_and(|n| n.trim().is_empty()) {
      errors.add("last_name", "must not be blank");
    }
    check_email(&mut errors, self.email.as_deref());
    errors.finish()
  }

  /// Apply the patch onto `member`. Statuses are assigned as given.
  pub fn apply(self, member: &mut Member) {
    fn set<T>(slot: &mut T, value: Option<T>) {
      if let Some(v) = value {
        *slot = v;
      }
    }
    fn set_opt<T>(slot: &mut Option<T>, value: Option<T>) {
      if value.is_some() {
        *slot = value;
      }
    }

    set(&mut member.first_name, self.first_name);
    set_opt(&mut member.middle_name, self.middle_name);
    set(&mut member.last_name, self.last_name);
    set_opt(&mut member.date_of_birth, self.date_of_birth);
    set_opt(&mut member.gender, self.gender);
    set_opt(&mut member.tribe, self.tribe);
    set_opt(&mut member.clan, self.clan);
    set_opt(&mut member.phone, self.phone);
    set_opt(&mut member.email, self.email);
    set_opt(&mut member.residence, self.residence);
    set(&mut member.membership_status, self.membership_status);
    set(&mut member.matrimony_status, self.matrimony_status);
    set_opt(&mut member.baptism_date, self.baptism_date);
    set_opt(&mut member.confirmation_date, self.confirmation_date);
  }
}

fn check_email(errors: &mut ValidationErrors, email: Option<&str>) {
  if let Some(email) = email
    && !email.trim().is_empty()
    && !email.contains('@')
  {
    errors.add("email", "must be an email address");
  }
}

// ─── Query ───────────────────────────────────────────────────────────────────

/// Parameters for [`crate::store::RegistryStore::list_members`].
#[derive(Debug, Clone, Default, Deserialize)]
pub struct MemberQuery {
  /// Case-insensitive substring over first, middle and last name.
  pub text:              Option<String>,
  pub membership_status: Option<MembershipStatus>,
  pub matrimony_status:  Option<MatrimonyStatus>,
  pub limit:             Option<usize>,
  pub offset:            Option<usize>,
}
