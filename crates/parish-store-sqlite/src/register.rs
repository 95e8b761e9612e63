//! Register operations on a single SQLite connection.
//!
//! Everything here is synchronous and runs on the `tokio_rusqlite` thread.
//! The multi-row writes (`record_baptism`, `record_marriage`,
//! `ensure_marriage`, the deletes) expect to be called on an open
//! transaction; [`crate::SqliteStore`] takes care of that.

use chrono::{DateTime, Datelike as _, NaiveDate, Utc};
use parish_core::{
  ValidationErrors,
  baptism::{BaptismDetails, BaptismRecord, BaptismView},
  marriage::{MarriageDetails, MarriageParticulars, MarriageRecord, NewMarriage},
  member::{MatrimonyStatus, Member, MemberPatch, MemberQuery, NewMember},
  record_number::{RecordKind, RecordNumber},
  sacrament::{DetailedRecord, NewSacrament, Sacrament, SacramentSummary, SacramentType},
};
use rusqlite::{Connection, OptionalExtension as _, ToSql, params};

use crate::{
  Error, Result,
  encode::{
    BAPTISM_COLUMNS, MARRIAGE_HEAD_COLUMNS, MEMBER_COLUMNS, RawBaptism, RawMarriage,
    RawMember, RawSacrament, SACRAMENT_COLUMNS, encode_date, encode_dt, encode_opt_date,
    marriage_columns,
  },
};

/// Page size of [`list_members`] when the query names none.
pub const DEFAULT_LIMIT: usize = 100;

// ─── Members ─────────────────────────────────────────────────────────────────

pub fn member(conn: &Connection, member_id: i64) -> Result<Option<Member>> {
  conn
    .query_row(
      &format!("SELECT {MEMBER_COLUMNS} FROM members WHERE member_id = ?1"),
      params![member_id],
      RawMember::from_row,
    )
    .optional()?
    .map(RawMember::into_member)
    .transpose()
}

fn require_member(conn: &Connection, member_id: i64) -> Result<Member> {
  member(conn, member_id)?.ok_or(Error::MemberNotFound(member_id))
}

pub fn insert_member(conn: &Connection, input: NewMember, now: DateTime<Utc>) -> Result<Member> {
  input.validate()?;
  let at = encode_dt(now);

  conn.execute(
    "INSERT INTO members (
       first_name, middle_name, last_name, date_of_birth, gender, tribe, clan,
       phone, email, residence, membership_status, matrimony_status,
       created_at, updated_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?13)",
    params![
      input.first_name.trim(),
      input.middle_name,
      input.last_name.trim(),
      encode_opt_date(input.date_of_birth),
      input.gender.map(|g| g.to_string()),
      input.tribe,
      input.clan,
      input.phone,
      input.email,
      input.residence,
      input.membership_status.as_ref(),
      input.matrimony_status.as_ref(),
      at,
    ],
  )?;

  require_member(conn, conn.last_insert_rowid())
}

pub fn list_members(conn: &Connection, query: &MemberQuery) -> Result<Vec<Member>> {
  let text = query
    .text
    .as_deref()
    .map(str::trim)
    .filter(|t| !t.is_empty())
    .map(|t| format!("%{}%", escape_like(&t.to_lowercase())));
  let limit = i64::try_from(query.limit.unwrap_or(DEFAULT_LIMIT)).unwrap_or(i64::MAX);
  let offset = i64::try_from(query.offset.unwrap_or(0)).unwrap_or(i64::MAX);

  let mut stmt = conn.prepare(&format!(
    "SELECT {MEMBER_COLUMNS} FROM members
     WHERE (?1 IS NULL
            OR lower(first_name || ' ' || COALESCE(middle_name, '') || ' ' || last_name)
               LIKE ?1 ESCAPE '\\')
       AND (?2 IS NULL OR membership_status = ?2)
       AND (?3 IS NULL OR matrimony_status = ?3)
     ORDER BY last_name, first_name, member_id
     LIMIT ?4 OFFSET ?5"
  ))?;

  let raws = stmt
    .query_map(
      params![
        text,
        query.membership_status.as_ref().map(AsRef::<str>::as_ref),
        query.matrimony_status.as_ref().map(AsRef::<str>::as_ref),
        limit,
        offset,
      ],
      RawMember::from_row,
    )?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  raws.into_iter().map(RawMember::into_member).collect()
}

/// Escape `LIKE` wildcards so user text matches literally under `ESCAPE '\'`.
fn escape_like(text: &str) -> String {
  let mut out = String::with_capacity(text.len());
  for c in text.chars() {
    if matches!(c, '%' | '_' | '\\') {
      out.push('\\');
    }
    out.push(c);
  }
  out
}

pub fn update_member(
  conn: &Connection,
  member_id: i64,
  patch: MemberPatch,
  now: DateTime<Utc>,
) -> Result<Member> {
  patch.validate()?;
  let mut m = require_member(conn, member_id)?;
  patch.apply(&mut m);
  m.updated_at = now;

  conn.execute(
    "UPDATE members SET
       first_name = ?2, middle_name = ?3, last_name = ?4, date_of_birth = ?5,
       gender = ?6, tribe = ?7, clan = ?8, phone = ?9, email = ?10,
       residence = ?11, membership_status = ?12, matrimony_status = ?13,
       baptism_date = ?14, confirmation_date = ?15, updated_at = ?16
     WHERE member_id = ?1",
    params![
      m.member_id,
      m.first_name.trim(),
      m.middle_name,
      m.last_name.trim(),
      encode_opt_date(m.date_of_birth),
      m.gender.map(|g| g.to_string()),
      m.tribe,
      m.clan,
      m.phone,
      m.email,
      m.residence,
      m.membership_status.as_ref(),
      m.matrimony_status.as_ref(),
      encode_opt_date(m.baptism_date),
      encode_opt_date(m.confirmation_date),
      encode_dt(now),
    ],
  )?;

  require_member(conn, member_id)
}

/// Copy sacrament dates onto the member's summary columns. Columns that
/// already hold a date are left alone.
fn fill_member_summary(
  conn: &Connection,
  member_id: i64,
  baptism_date: Option<NaiveDate>,
  confirmation_date: Option<NaiveDate>,
  now: DateTime<Utc>,
) -> Result<()> {
  conn.execute(
    "UPDATE members SET
       baptism_date      = COALESCE(baptism_date, ?2),
       confirmation_date = COALESCE(confirmation_date, ?3),
       updated_at        = ?4
     WHERE member_id = ?1",
    params![
      member_id,
      encode_opt_date(baptism_date),
      encode_opt_date(confirmation_date),
      encode_dt(now),
    ],
  )?;
  Ok(())
}

fn mark_married(conn: &Connection, member_id: i64, now: DateTime<Utc>) -> Result<()> {
  conn.execute(
    "UPDATE members SET matrimony_status = ?2, updated_at = ?3 WHERE member_id = ?1",
    params![member_id, MatrimonyStatus::Married.as_ref(), encode_dt(now)],
  )?;
  Ok(())
}

// ─── Sacraments ──────────────────────────────────────────────────────────────

fn insert_sacrament(
  conn: &Connection,
  s: &NewSacrament,
  recorded_by: i64,
  now: DateTime<Utc>,
) -> Result<i64> {
  conn.execute(
    "INSERT INTO sacraments (
       member_id, sacrament_type, sacrament_date, location, celebrant,
       witness_1, witness_2, certificate_number, book_number, page_number,
       notes, recorded_by, created_at
     ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
    params![
      s.member_id,
      s.sacrament_type.as_ref(),
      encode_date(s.sacrament_date),
      s.location,
      s.celebrant,
      s.witness_1,
      s.witness_2,
      s.certificate_number,
      s.book_number,
      s.page_number,
      s.notes,
      recorded_by,
      encode_dt(now),
    ],
  )?;
  Ok(conn.last_insert_rowid())
}

/// Point a sacrament fact at its detailed register record.
fn link_detail(conn: &Connection, sacrament_id: i64, detail: DetailedRecord) -> Result<()> {
  conn.execute(
    "UPDATE sacraments SET detailed_record_type = ?2, detailed_record_id = ?3
     WHERE sacrament_id = ?1",
    params![sacrament_id, detail.type_name(), detail.id()],
  )?;
  Ok(())
}

pub fn sacrament(conn: &Connection, sacrament_id: i64) -> Result<Option<Sacrament>> {
  conn
    .query_row(
      &format!("SELECT {SACRAMENT_COLUMNS} FROM sacraments WHERE sacrament_id = ?1"),
      params![sacrament_id],
      RawSacrament::from_row,
    )
    .optional()?
    .map(RawSacrament::into_sacrament)
    .transpose()
}

fn sacraments_where(
  conn: &Connection,
  clause: &str,
  args: impl rusqlite::Params,
) -> Result<Vec<Sacrament>> {
  let mut stmt = conn.prepare(&format!("SELECT {SACRAMENT_COLUMNS} FROM sacraments {clause}"))?;
  let raws = stmt
    .query_map(args, RawSacrament::from_row)?
    .collect::<rusqlite::Result<Vec<_>>>()?;
  raws.into_iter().map(RawSacrament::into_sacrament).collect()
}

pub fn sacraments_for(conn: &Connection, member_id: i64) -> Result<Vec<Sacrament>> {
  sacraments_where(
    conn,
    "WHERE member_id = ?1 ORDER BY sacrament_date, sacrament_id",
    params![member_id],
  )
}

fn latest_marriage_sacrament(conn: &Connection, member_id: i64) -> Result<Option<Sacrament>> {
  Ok(
    sacraments_where(
      conn,
      "WHERE member_id = ?1 AND sacrament_type = ?2
       ORDER BY sacrament_date DESC, sacrament_id DESC LIMIT 1",
      params![member_id, SacramentType::Marriage.as_ref()],
    )?
    .pop(),
  )
}

pub fn record_sacrament(
  conn: &Connection,
  input: &NewSacrament,
  recorded_by: i64,
  now: DateTime<Utc>,
) -> Result<Sacrament> {
  let Some(member_id) = input.member_id else {
    let mut errors = ValidationErrors::new();
    errors.add("member_id", "is required");
    return Err(errors.into());
  };
  require_member(conn, member_id)?;

  let id = insert_sacrament(conn, input, recorded_by, now)?;
  let date = Some(input.sacrament_date);
  match input.sacrament_type {
    SacramentType::Baptism => fill_member_summary(conn, member_id, date, None, now)?,
    SacramentType::Confirmation => fill_member_summary(conn, member_id, None, date, now)?,
    _ => {}
  }

  sacrament(conn, id)?.ok_or(Error::Sqlite(rusqlite::Error::QueryReturnedNoRows))
}

pub fn summary(conn: &Connection, member_id: i64) -> Result<Option<SacramentSummary>> {
  if member(conn, member_id)?.is_none() {
    return Ok(None);
  }
  let sacraments = sacraments_for(conn, member_id)?;
  Ok(Some(SacramentSummary::from_sacraments(member_id, &sacraments)))
}

// ─── Record numbers ──────────────────────────────────────────────────────────

fn next_record_number(
  conn: &Connection,
  table: &str,
  kind: RecordKind,
  year: i32,
) -> Result<String> {
  let mut stmt =
    conn.prepare(&format!("SELECT record_number FROM {table} WHERE record_number LIKE ?1"))?;
  let existing = stmt
    .query_map(params![RecordNumber::like_pattern(kind, year)], |r| r.get::<_, String>(0))?
    .collect::<rusqlite::Result<Vec<_>>>()?;

  Ok(RecordNumber::next_after(kind, year, existing.iter().map(String::as_str)).to_string())
}

// ─── Baptism register ────────────────────────────────────────────────────────

pub fn baptism_record(conn: &Connection, record_id: i64) -> Result<Option<BaptismRecord>> {
  conn
    .query_row(
      &format!("SELECT {BAPTISM_COLUMNS} FROM baptism_records WHERE record_id = ?1"),
      params![record_id],
      RawBaptism::from_row,
    )
    .optional()?
    .map(RawBaptism::into_record)
    .transpose()
}

pub fn record_baptism(
  conn: &Connection,
  d: &BaptismDetails,
  recorded_by: i64,
  now: DateTime<Utc>,
) -> Result<BaptismRecord> {
  require_member(conn, d.member_id)?;

  let baptism_id = insert_sacrament(conn, &d.baptism_sacrament(), recorded_by, now)?;
  let follow_up = |s: Option<NewSacrament>| {
    s.map(|s| insert_sacrament(conn, &s, recorded_by, now)).transpose()
  };
  let eucharist_id = follow_up(d.eucharist_sacrament())?;
  let confirmation_id = follow_up(d.confirmation_sacrament())?;
  let marriage_id = follow_up(d.marriage_sacrament())?;

  let number = next_record_number(conn, "baptism_records", RecordKind::Baptism, now.year())?;
  let at = encode_dt(now);

  conn.execute(
    "INSERT INTO baptism_records (
       record_number, member_id, father_name, mother_name, tribe,
       birth_village, county, birth_date, residence, baptism_location,
       baptism_date, baptized_by, sponsor, certificate_number, book_number,
       page_number, notes, eucharist_location, eucharist_date,
       confirmation_location, confirmation_date, confirmation_register_number,
       confirmation_number, marriage_spouse, marriage_location, marriage_date,
       baptism_sacrament_id, eucharist_sacrament_id, confirmation_sacrament_id,
       marriage_sacrament_id, recorded_by, created_at, updated_at
     ) VALUES (
       ?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13, ?14, ?15, ?16,
       ?17, ?18, ?19, ?20, ?21, ?22, ?23, ?24, ?25, ?26, ?27, ?28, ?29, ?30,
       ?31, ?32, ?32
     )",
    params![
      number,
      d.member_id,
      d.father_name,
      d.mother_name,
      d.tribe,
      d.birth_village,
      d.county,
      encode_date(d.birth_date),
      d.residence,
      d.baptism_location,
      encode_date(d.baptism_date),
      d.baptized_by,
      d.sponsor,
      d.certificate_number,
      d.book_number,
      d.page_number,
      d.notes,
      d.eucharist_location,
      encode_opt_date(d.eucharist_date),
      d.confirmation_location,
      encode_opt_date(d.confirmation_date),
      d.confirmation_register_number,
      d.confirmation_number,
      d.marriage_spouse,
      d.marriage_location,
      encode_opt_date(d.marriage_date),
      baptism_id,
      eucharist_id,
      confirmation_id,
      marriage_id,
      recorded_by,
      at,
    ],
  )?;
  let record_id = conn.last_insert_rowid();

  link_detail(conn, baptism_id, DetailedRecord::BaptismRecord(record_id))?;
  fill_member_summary(conn, d.member_id, Some(d.baptism_date), d.confirmation_date, now)?;

  baptism_record(conn, record_id)?.ok_or(Error::BaptismRecordNotFound(record_id))
}

pub fn baptism_view(conn: &Connection, member_id: i64) -> Result<Option<BaptismView>> {
  let raw = conn
    .query_row(
      &format!(
        "SELECT {BAPTISM_COLUMNS} FROM baptism_records
         WHERE member_id = ?1 ORDER BY record_id DESC LIMIT 1"
      ),
      params![member_id],
      RawBaptism::from_row,
    )
    .optional()?;
  let Some(record) = raw.map(RawBaptism::into_record).transpose()? else {
    return Ok(None);
  };

  let linked = |id: Option<i64>| id.map(|id| sacrament(conn, id)).transpose().map(Option::flatten);
  Ok(Some(BaptismView {
    baptism:      sacrament(conn, record.baptism_sacrament_id)?,
    eucharist:    linked(record.eucharist_sacrament_id)?,
    confirmation: linked(record.confirmation_sacrament_id)?,
    marriage:     linked(record.marriage_sacrament_id)?,
    record,
  }))
}

/// Remove a baptism record and its baptism fact. Follow-up facts stay.
pub fn delete_baptism(conn: &Connection, record_id: i64) -> Result<()> {
  let record = baptism_record(conn, record_id)?.ok_or(Error::BaptismRecordNotFound(record_id))?;

  conn.execute("DELETE FROM baptism_records WHERE record_id = ?1", params![record_id])?;
  conn.execute(
    "DELETE FROM sacraments WHERE sacrament_id = ?1",
    params![record.baptism_sacrament_id],
  )?;
  Ok(())
}

// ─── Marriage register ───────────────────────────────────────────────────────

pub fn marriage_record(conn: &Connection, record_id: i64) -> Result<Option<MarriageRecord>> {
  conn
    .query_row(
      &format!("SELECT {} FROM marriage_records WHERE record_id = ?1", marriage_columns()),
      params![record_id],
      RawMarriage::from_row,
    )
    .optional()?
    .map(RawMarriage::into_record)
    .transpose()
}

pub fn marriage_for(conn: &Connection, member_id: i64) -> Result<Option<MarriageRecord>> {
  conn
    .query_row(
      &format!(
        "SELECT {} FROM marriage_records
         WHERE husband_id = ?1 OR wife_id = ?1
         ORDER BY record_id DESC LIMIT 1",
        marriage_columns()
      ),
      params![member_id],
      RawMarriage::from_row,
    )
    .optional()?
    .map(RawMarriage::into_record)
    .transpose()
}

fn insert_marriage(
  conn: &Connection,
  record_number: &str,
  d: &MarriageDetails,
  sacrament_id: Option<i64>,
  parish_priest_id: i64,
  now: DateTime<Utc>,
) -> Result<i64> {
  let columns: Vec<&str> = ["record_number"]
    .into_iter()
    .chain(MARRIAGE_HEAD_COLUMNS)
    .chain(MarriageParticulars::COLUMNS)
    .chain(["sacrament_id", "parish_priest_id", "created_at", "updated_at"])
    .collect();
  let placeholders: Vec<String> = (1..=columns.len()).map(|i| format!("?{i}")).collect();

  let marriage_date = encode_date(d.marriage_date);
  let delegation_date = encode_opt_date(d.delegation_date);
  let at = encode_dt(now);

  let mut values: Vec<&dyn ToSql> = vec![
    &record_number as &dyn ToSql,
    &d.husband_id,
    &d.wife_id,
    &d.husband_name,
    &d.wife_name,
    &marriage_date,
    &d.marriage_church,
    &d.district,
    &d.province,
    &d.presence_of,
    &d.delegated_by,
    &delegation_date,
  ];
  values.extend(d.particulars.values().into_iter().map(|v| v as &dyn ToSql));
  values.extend([&sacrament_id as &dyn ToSql, &parish_priest_id, &at, &at]);

  conn.execute(
    &format!(
      "INSERT INTO marriage_records ({}) VALUES ({})",
      columns.join(", "),
      placeholders.join(", ")
    ),
    values.as_slice(),
  )?;
  Ok(conn.last_insert_rowid())
}

pub fn record_marriage(
  conn: &Connection,
  input: NewMarriage,
  recorded_by: i64,
  now: DateTime<Utc>,
) -> Result<MarriageRecord> {
  let NewMarriage { record_number, mut details } = input;

  let husband = details.husband_id.map(|id| require_member(conn, id)).transpose()?;
  let wife = details.wife_id.map(|id| require_member(conn, id)).transpose()?;
  details.fill_names(husband.as_ref(), wife.as_ref());

  let sacrament_id = insert_sacrament(conn, &details.marriage_sacrament(), recorded_by, now)?;
  let number = match record_number {
    Some(n) => n,
    None => next_record_number(conn, "marriage_records", RecordKind::Marriage, now.year())?,
  };
  let record_id =
    insert_marriage(conn, &number, &details, Some(sacrament_id), recorded_by, now)?;
  link_detail(conn, sacrament_id, DetailedRecord::MarriageRecord(record_id))?;

  for member_id in [details.husband_id, details.wife_id].into_iter().flatten() {
    mark_married(conn, member_id, now)?;
  }

  marriage_record(conn, record_id)?.ok_or(Error::MarriageRecordNotFound(record_id))
}

/// Return the member's marriage record, writing a placeholder one first if
/// the member is married but absent from the marriage register.
pub fn ensure_marriage(
  conn: &Connection,
  member_id: i64,
  recorded_by: i64,
  now: DateTime<Utc>,
) -> Result<MarriageRecord> {
  if let Some(existing) = marriage_for(conn, member_id)? {
    return Ok(existing);
  }

  let member = require_member(conn, member_id)?;
  if member.matrimony_status != MatrimonyStatus::Married {
    return Err(Error::NotMarried(member_id));
  }

  let fact = latest_marriage_sacrament(conn, member_id)?;
  let placeholder = NewMarriage::placeholder_for(&member, fact.as_ref(), now.date_naive());
  let unlinked = fact
    .filter(|s| s.detailed_record.is_none())
    .map(|s| s.sacrament_id);

  let number = next_record_number(conn, "marriage_records", RecordKind::Marriage, now.year())?;
  let record_id =
    insert_marriage(conn, &number, &placeholder.details, unlinked, recorded_by, now)?;
  if let Some(sacrament_id) = unlinked {
    link_detail(conn, sacrament_id, DetailedRecord::MarriageRecord(record_id))?;
  }

  tracing::info!(member_id, record_id, %number, "back-filled marriage record");
  marriage_record(conn, record_id)?.ok_or(Error::MarriageRecordNotFound(record_id))
}

/// Remove a marriage record and its marriage fact.
pub fn delete_marriage(conn: &Connection, record_id: i64) -> Result<()> {
  let record =
    marriage_record(conn, record_id)?.ok_or(Error::MarriageRecordNotFound(record_id))?;

  conn.execute("DELETE FROM marriage_records WHERE record_id = ?1", params![record_id])?;
  if let Some(sacrament_id) = record.sacrament_id {
    conn.execute("DELETE FROM sacraments WHERE sacrament_id = ?1", params![sacrament_id])?;
  }
  Ok(())
}
