//! HTTP Basic-auth extractor and standalone verifier.
//!
//! Accounts come from configuration; there is no user table. The account
//! that authenticated a request is the acting user recorded on sacraments
//! and as the parish priest of marriage records.

use argon2::{Argon2, PasswordHash, PasswordVerifier};
use axum::extract::FromRequestParts;
use axum::http::{HeaderMap, request::Parts};
use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as B64;
use parish_core::store::RegistryStore;
use serde::Deserialize;

use crate::{ApiState, error::ApiError};

/// One login, as written in the server configuration.
#[derive(Debug, Clone, Deserialize)]
pub struct UserAccount {
  /// Stored as `recorded_by` / `parish_priest_id`.
  pub user_id:       i64,
  pub username:      String,
  /// PHC string produced by argon2, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
}

/// Credentials accepted as valid for this server instance.
#[derive(Debug, Clone, Default)]
pub struct AuthConfig {
  pub users: Vec<UserAccount>,
}

/// The authenticated account of the current request.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ActingUser {
  pub user_id:  i64,
  pub username: String,
}

/// Verify credentials directly from headers.
pub fn verify_auth(headers: &HeaderMap, config: &AuthConfig) -> Result<ActingUser, ApiError> {
  let header_val = headers
    .get(axum::http::header::AUTHORIZATION)
    .and_then(|v| v.to_str().ok())
    .ok_or(ApiError::Unauthorized)?;

  let encoded = header_val
    .strip_prefix("Basic ")
    .ok_or(ApiError::Unauthorized)?;

  let decoded = B64.decode(encoded).map_err(|_| ApiError::Unauthorized)?;
  let creds   = std::str::from_utf8(&decoded).map_err(|_| ApiError::Unauthorized)?;

  let (username, password) = creds.split_once(':').ok_or(ApiError::Unauthorized)?;

  let account = config
    .users
    .iter()
    .find(|u| u.username == username)
    .ok_or(ApiError::Unauthorized)?;

  let parsed_hash = PasswordHash::new(&account.password_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Argon2::default()
    .verify_password(password.as_bytes(), &parsed_hash)
    .map_err(|_| ApiError::Unauthorized)?;

  Ok(ActingUser {
    user_id:  account.user_id,
    username: account.username.clone(),
  })
}

impl<S> FromRequestParts<ApiState<S>> for ActingUser
where
  S: RegistryStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &ApiState<S>,
  ) -> Result<Self, Self::Rejection> {
    verify_auth(&parts.headers, &state.auth)
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use argon2::{PasswordHasher, password_hash::SaltString};
  use axum::http::{HeaderValue, header};
  use rand_core::OsRng;

  fn config(password: &str) -> AuthConfig {
    let salt = SaltString::generate(&mut OsRng);
    let hash = Argon2::default()
      .hash_password(password.as_bytes(), &salt)
      .unwrap()
      .to_string();

    AuthConfig {
      users: vec![
        UserAccount {
          user_id:       1,
          username:      "clerk".to_string(),
          password_hash: hash.clone(),
        },
        UserAccount {
          user_id:       2,
          username:      "priest".to_string(),
          password_hash: hash,
        },
      ],
    }
  }

  fn headers(value: &str) -> HeaderMap {
    let mut h = HeaderMap::new();
    h.insert(header::AUTHORIZATION, HeaderValue::from_str(value).unwrap());
    h
  }

  fn basic(user: &str, pass: &str) -> String {
    let encoded = B64.encode(format!("{user}:{pass}"));
    format!("Basic {encoded}")
  }

  #[test]
  fn correct_credentials_name_the_account() {
    let config = config("secret");
    let user = verify_auth(&headers(&basic("priest", "secret")), &config).unwrap();
    assert_eq!(user, ActingUser { user_id: 2, username: "priest".into() });
  }

  #[test]
  fn wrong_password() {
    let config = config("secret");
    let result = verify_auth(&headers(&basic("clerk", "wrong")), &config);
    assert!(matches!(result, Err(ApiError::Unauthorized)));
  }

  #[test]
  fn unknown_user() {
    let config = config("secret");
    let result = verify_auth(&headers(&basic("sexton", "secret")), &config);
    assert!(matches!(result, Err(ApiError::Unauthorized)));
  }

  #[test]
  fn missing_header() {
    let config = config("secret");
    let result = verify_auth(&HeaderMap::new(), &config);
    assert!(matches!(result, Err(ApiError::Unauthorized)));
  }

  #[test]
  fn invalid_base64() {
    let config = config("secret");
    let result = verify_auth(&headers("Basic !!!not-base64!!!"), &config);
    assert!(matches!(result, Err(ApiError::Unauthorized)));
  }
}
