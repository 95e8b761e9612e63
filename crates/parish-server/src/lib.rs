//! HTTP server assembly for the parish registry.
//!
//! Combines the JSON API from `parish-api` with an unauthenticated health
//! check and request tracing, and defines the on-disk configuration.

use std::{path::{Path, PathBuf}, sync::Arc};

use axum::{Router, routing::get};
use parish_api::{ApiState, AuthConfig, UserAccount, api_router};
use parish_core::store::RegistryStore;
use serde::Deserialize;
use tower_http::trace::TraceLayer;

// ─── Configuration ────────────────────────────────────────────────────────────

/// Runtime server configuration, deserialised from `config.toml` and
/// `PARISH__*` environment variables.
#[derive(Debug, Deserialize, Clone)]
pub struct ServerConfig {
  #[serde(default = "default_host")]
  pub host:        String,
  #[serde(default = "default_port")]
  pub port:        u16,
  pub store_path:  PathBuf,
  /// Printed on certificates.
  pub parish_name: String,
  #[serde(default)]
  pub users:       Vec<UserAccount>,
}

fn default_host() -> String { "127.0.0.1".to_string() }

fn default_port() -> u16 { 8080 }

impl ServerConfig {
  /// Read `path` (optional) layered under the environment.
  pub fn load(path: &Path) -> Result<Self, config::ConfigError> {
    config::Config::builder()
      .add_source(config::File::from(path).required(false))
      .add_source(config::Environment::with_prefix("PARISH").separator("__"))
      .build()?
      .try_deserialize()
  }

  /// Shared handler state for `store` under this configuration.
  pub fn api_state<S>(&self, store: S) -> ApiState<S> {
    ApiState {
      store:       Arc::new(store),
      auth:        Arc::new(AuthConfig { users: self.users.clone() }),
      parish_name: Arc::from(self.parish_name.as_str()),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build the complete application router.
pub fn app<S>(state: ApiState<S>) -> Router
where
  S: RegistryStore + 'static,
{
  Router::new()
    .route("/health", get(health))
    .merge(api_router(state))
    .layer(TraceLayer::new_for_http())
}

async fn health() -> &'static str { "ok" }
