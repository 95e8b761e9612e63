//! JSON REST API for the parish registry.
//!
//! Exposes an axum [`Router`] backed by any
//! [`parish_core::store::RegistryStore`]. Every route requires HTTP Basic
//! auth; TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .merge(parish_api::api_router(state))
//! ```

pub mod auth;
pub mod error;
pub mod members;
pub mod records;
pub mod sacraments;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use parish_core::store::RegistryStore;

pub use auth::{ActingUser, AuthConfig, UserAccount};
pub use error::ApiError;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all API handlers.
pub struct ApiState<S> {
  pub store:       Arc<S>,
  pub auth:        Arc<AuthConfig>,
  /// Printed on certificates.
  pub parish_name: Arc<str>,
}

impl<S> Clone for ApiState<S> {
  fn clone(&self) -> Self {
    Self {
      store:       Arc::clone(&self.store),
      auth:        Arc::clone(&self.auth),
      parish_name: Arc::clone(&self.parish_name),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router.
///
/// The returned `Router<()>` can be merged into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: ApiState<S>) -> Router<()>
where
  S: RegistryStore + 'static,
{
  Router::new()
    // Sacramental records
    .route("/sacramental-records/baptism", post(records::create_baptism::<S>))
    .route("/sacramental-records/baptism/{member_id}", get(records::get_baptism::<S>))
    .route(
      "/sacramental-records/baptism/{member_id}/certificate",
      get(records::baptism_certificate::<S>),
    )
    .route(
      "/sacramental-records/baptism/records/{record_id}",
      delete(records::delete_baptism::<S>),
    )
    .route(
      "/sacramental-records/marriage",
      get(records::get_marriage::<S>).post(records::create_marriage::<S>),
    )
    .route(
      "/sacramental-records/marriage/certificate",
      get(records::marriage_certificate::<S>),
    )
    .route(
      "/sacramental-records/marriage/records/{record_id}",
      delete(records::delete_marriage::<S>),
    )
    // Members
    .route("/members", get(members::list::<S>).post(members::create::<S>))
    .route("/members/{id}", get(members::get_one::<S>).patch(members::update::<S>))
    .route("/members/{id}/sacraments", get(members::sacraments::<S>))
    .route("/members/{id}/summary", get(members::summary::<S>))
    // Standalone sacraments
    .route("/sacraments", post(sacraments::create::<S>))
    .route("/sacraments/{id}", get(sacraments::get_one::<S>))
    .with_state(state)
}
