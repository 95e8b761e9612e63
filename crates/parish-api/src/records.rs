//! Handlers for `/sacramental-records` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `POST`   | `/sacramental-records/baptism` | Body: [`BaptismForm`] |
//! | `GET`    | `/sacramental-records/baptism/{member_id}` | Latest record + linked facts |
//! | `GET`    | `/sacramental-records/baptism/{member_id}/certificate` | |
//! | `DELETE` | `/sacramental-records/baptism/records/{record_id}` | |
//! | `POST`   | `/sacramental-records/marriage` | Body: [`MarriageForm`] |
//! | `GET`    | `/sacramental-records/marriage?member_id=` | |
//! | `GET`    | `/sacramental-records/marriage/certificate?member_id=` | Back-fills a record if needed |
//! | `DELETE` | `/sacramental-records/marriage/records/{record_id}` | |
//!
//! Writes answer with the envelope `{"success", "message", "record"}`.

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
};
use chrono::Utc;
use parish_core::{
  baptism::{BaptismDetails, BaptismForm, BaptismRecord, BaptismView},
  certificate::{BaptismCertificate, MarriageCertificate},
  marriage::{MarriageForm, MarriageRecord, NewMarriage},
  store::RegistryStore,
};
use serde::{Deserialize, Serialize};

use crate::{ActingUser, ApiState, error::ApiError};

/// Success body of the write endpoints.
#[derive(Debug, Serialize)]
pub struct Envelope<T> {
  pub success: bool,
  pub message: String,
  #[serde(skip_serializing_if = "Option::is_none")]
  pub record:  Option<T>,
}

impl<T> Envelope<T> {
  fn ok(message: &str, record: Option<T>) -> Json<Self> {
    Json(Self { success: true, message: message.to_owned(), record })
  }
}

#[derive(Debug, Deserialize)]
pub struct MemberParam {
  pub member_id: i64,
}

// ─── Baptism ──────────────────────────────────────────────────────────────────

/// `POST /sacramental-records/baptism`
pub async fn create_baptism<S>(
  State(state): State<ApiState<S>>,
  user: ActingUser,
  body: Result<Json<BaptismForm>, JsonRejection>,
) -> Result<Json<Envelope<BaptismRecord>>, ApiError>
where
  S: RegistryStore + 'static,
{
  let Json(form) = body?;
  let details = BaptismDetails::try_from(form)?;

  let record = state
    .store
    .record_baptism(details, user.user_id)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(
    record_id = record.record_id,
    member_id = record.details.member_id,
    record_number = %record.record_number,
    "baptism recorded"
  );
  Ok(Envelope::ok("Baptism record created successfully", Some(record)))
}

/// `GET /sacramental-records/baptism/{member_id}`
pub async fn get_baptism<S>(
  State(state): State<ApiState<S>>,
  _user: ActingUser,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<BaptismView>, ApiError>
where
  S: RegistryStore + 'static,
{
  let Path(member_id) = path?;
  let view = state
    .store
    .baptism_for_member(member_id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| no_baptism(member_id))?;
  Ok(Json(view))
}

/// `GET /sacramental-records/baptism/{member_id}/certificate`
pub async fn baptism_certificate<S>(
  State(state): State<ApiState<S>>,
  _user: ActingUser,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<BaptismCertificate>, ApiError>
where
  S: RegistryStore + 'static,
{
  let Path(member_id) = path?;
  let member = state
    .store
    .get_member(member_id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("member {member_id} not found")))?;
  let view = state
    .store
    .baptism_for_member(member_id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| no_baptism(member_id))?;

  Ok(Json(BaptismCertificate::issue(
    &state.parish_name,
    &member,
    view.record,
    Utc::now().date_naive(),
  )))
}

/// `DELETE /sacramental-records/baptism/records/{record_id}`
pub async fn delete_baptism<S>(
  State(state): State<ApiState<S>>,
  user: ActingUser,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Envelope<()>>, ApiError>
where
  S: RegistryStore + 'static,
{
  let Path(record_id) = path?;
  state
    .store
    .delete_baptism(record_id)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(record_id, user = %user.username, "baptism record deleted");
  Ok(Envelope::ok("Baptism record deleted successfully", None))
}

fn no_baptism(member_id: i64) -> ApiError {
  ApiError::NotFound(format!("no baptism record for member {member_id}"))
}

// ─── Marriage ─────────────────────────────────────────────────────────────────

/// `POST /sacramental-records/marriage`
pub async fn create_marriage<S>(
  State(state): State<ApiState<S>>,
  user: ActingUser,
  body: Result<Json<MarriageForm>, JsonRejection>,
) -> Result<Json<Envelope<MarriageRecord>>, ApiError>
where
  S: RegistryStore + 'static,
{
  let Json(form) = body?;
  let input = NewMarriage::try_from(form)?;

  let record = state
    .store
    .record_marriage(input, user.user_id)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(
    record_id = record.record_id,
    husband_id = ?record.details.husband_id,
    wife_id = ?record.details.wife_id,
    record_number = %record.record_number,
    "marriage recorded"
  );
  Ok(Envelope::ok("Marriage record created successfully", Some(record)))
}

/// `GET /sacramental-records/marriage?member_id=`
pub async fn get_marriage<S>(
  State(state): State<ApiState<S>>,
  _user: ActingUser,
  query: Result<Query<MemberParam>, QueryRejection>,
) -> Result<Json<MarriageRecord>, ApiError>
where
  S: RegistryStore + 'static,
{
  let Query(MemberParam { member_id }) = query?;
  let record = state
    .store
    .marriage_for_member(member_id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("no marriage record for member {member_id}")))?;
  Ok(Json(record))
}

/// `GET /sacramental-records/marriage/certificate?member_id=`
///
/// A married member with nothing in the marriage register gets a
/// placeholder record written first.
pub async fn marriage_certificate<S>(
  State(state): State<ApiState<S>>,
  user: ActingUser,
  query: Result<Query<MemberParam>, QueryRejection>,
) -> Result<Json<MarriageCertificate>, ApiError>
where
  S: RegistryStore + 'static,
{
  let Query(MemberParam { member_id }) = query?;
  let record = state
    .store
    .ensure_marriage_record(member_id, user.user_id)
    .await
    .map_err(ApiError::from_store)?;

  Ok(Json(MarriageCertificate::issue(
    &state.parish_name,
    record,
    Utc::now().date_naive(),
  )))
}

/// `DELETE /sacramental-records/marriage/records/{record_id}`
pub async fn delete_marriage<S>(
  State(state): State<ApiState<S>>,
  user: ActingUser,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Envelope<()>>, ApiError>
where
  S: RegistryStore + 'static,
{
  let Path(record_id) = path?;
  state
    .store
    .delete_marriage(record_id)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(record_id, user = %user.username, "marriage record deleted");
  Ok(Envelope::ok("Marriage record deleted successfully", None))
}
