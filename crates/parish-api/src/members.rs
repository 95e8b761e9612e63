//! Handlers for `/members` endpoints.
//!
//! | Method  | Path | Notes |
//! |---------|------|-------|
//! | `GET`   | `/members` | Optional `?text`, `membership_status`, `matrimony_status`, `limit`, `offset` |
//! | `POST`  | `/members` | Body: [`NewMember`]; returns 201 + stored member |
//! | `GET`   | `/members/{id}` | 404 if not found |
//! | `PATCH` | `/members/{id}` | Body: [`MemberPatch`] |
//! | `GET`   | `/members/{id}/sacraments` | Oldest first |
//! | `GET`   | `/members/{id}/summary` | Derived from sacrament rows |

use axum::{
  Json,
  extract::{
    Path, Query, State,
    rejection::{JsonRejection, PathRejection, QueryRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use parish_core::{
  member::{Member, MemberPatch, MemberQuery, NewMember},
  sacrament::{Sacrament, SacramentSummary},
  store::RegistryStore,
};

use crate::{ActingUser, ApiState, error::ApiError};

fn member_not_found(id: i64) -> ApiError { ApiError::NotFound(format!("member {id} not found")) }

// ─── List ─────────────────────────────────────────────────────────────────────

/// `GET /members[?text=..][&membership_status=..][&matrimony_status=..]`
pub async fn list<S>(
  State(state): State<ApiState<S>>,
  _user: ActingUser,
  query: Result<Query<MemberQuery>, QueryRejection>,
) -> Result<Json<Vec<Member>>, ApiError>
where
  S: RegistryStore + 'static,
{
  let Query(query) = query?;
  let members = state
    .store
    .list_members(&query)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(members))
}

// ─── Create ───────────────────────────────────────────────────────────────────

/// `POST /members`
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  user: ActingUser,
  body: Result<Json<NewMember>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RegistryStore + 'static,
{
  let Json(input) = body?;
  let member = state
    .store
    .add_member(input)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(member_id = member.member_id, user = %user.username, "member added");
  Ok((StatusCode::CREATED, Json(member)))
}

// ─── Get one ──────────────────────────────────────────────────────────────────

/// `GET /members/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  _user: ActingUser,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Member>, ApiError>
where
  S: RegistryStore + 'static,
{
  let Path(id) = path?;
  let member = state
    .store
    .get_member(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| member_not_found(id))?;
  Ok(Json(member))
}

// ─── Update ───────────────────────────────────────────────────────────────────

/// `PATCH /members/{id}`
pub async fn update<S>(
  State(state): State<ApiState<S>>,
  user: ActingUser,
  path: Result<Path<i64>, PathRejection>,
  body: Result<Json<MemberPatch>, JsonRejection>,
) -> Result<Json<Member>, ApiError>
where
  S: RegistryStore + 'static,
{
  let Path(id) = path?;
  let Json(patch) = body?;
  let member = state
    .store
    .update_member(id, patch)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(member_id = id, user = %user.username, "member updated");
  Ok(Json(member))
}

// ─── Sacraments ───────────────────────────────────────────────────────────────

/// `GET /members/{id}/sacraments`
pub async fn sacraments<S>(
  State(state): State<ApiState<S>>,
  _user: ActingUser,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Vec<Sacrament>>, ApiError>
where
  S: RegistryStore + 'static,
{
  let Path(id) = path?;
  state
    .store
    .get_member(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| member_not_found(id))?;

  let sacraments = state
    .store
    .list_sacraments(id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(sacraments))
}

/// `GET /members/{id}/summary`
pub async fn summary<S>(
  State(state): State<ApiState<S>>,
  _user: ActingUser,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<SacramentSummary>, ApiError>
where
  S: RegistryStore + 'static,
{
  let Path(id) = path?;
  let summary = state
    .store
    .sacrament_summary(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| member_not_found(id))?;
  Ok(Json(summary))
}
