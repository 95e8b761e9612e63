//! Handlers for `/sacraments` endpoints: sacraments recorded without a
//! detailed register entry (first communion, holy orders, anointing, ...).

use axum::{
  Json,
  extract::{
    Path, State,
    rejection::{JsonRejection, PathRejection},
  },
  http::StatusCode,
  response::IntoResponse,
};
use parish_core::{
  sacrament::{NewSacrament, Sacrament, SacramentForm},
  store::RegistryStore,
};

use crate::{ActingUser, ApiState, error::ApiError};

/// `POST /sacraments`, body: [`SacramentForm`]; returns 201 + stored row.
pub async fn create<S>(
  State(state): State<ApiState<S>>,
  user: ActingUser,
  body: Result<Json<SacramentForm>, JsonRejection>,
) -> Result<impl IntoResponse, ApiError>
where
  S: RegistryStore + 'static,
{
  let Json(form) = body?;
  let input = NewSacrament::try_from(form)?;

  let sacrament = state
    .store
    .record_sacrament(input, user.user_id)
    .await
    .map_err(ApiError::from_store)?;

  tracing::info!(
    sacrament_id = sacrament.sacrament_id,
    member_id = ?sacrament.member_id,
    kind = %sacrament.sacrament_type,
    "sacrament recorded"
  );
  Ok((StatusCode::CREATED, Json(sacrament)))
}

/// `GET /sacraments/{id}`
pub async fn get_one<S>(
  State(state): State<ApiState<S>>,
  _user: ActingUser,
  path: Result<Path<i64>, PathRejection>,
) -> Result<Json<Sacrament>, ApiError>
where
  S: RegistryStore + 'static,
{
  let Path(id) = path?;
  let sacrament = state
    .store
    .get_sacrament(id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("sacrament {id} not found")))?;
  Ok(Json(sacrament))
}
