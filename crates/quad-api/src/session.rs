//! Bearer-token session registry and the [`Authed`] extractor.
//!
//! Login endpoints mint an opaque token bound to a [`Session`]; every
//! protected route resolves `Authorization: Bearer <token>` through the
//! registry. Tokens live in memory only and carry no expiry, so a restart
//! logs everyone out.

use std::collections::HashMap;

use axum::{
  extract::FromRequestParts,
  http::{HeaderMap, header, request::Parts},
};
use quad_core::{account::Account, session::Session, store::PortalStore};
use rand_core::{OsRng, RngCore as _};
use tokio::sync::RwLock;

use crate::{AppState, error::ApiError};

/// In-memory map from bearer token to live [`Session`].
#[derive(Default)]
pub struct SessionRegistry {
  sessions: RwLock<HashMap<String, Session>>,
}

impl SessionRegistry {
  pub fn new() -> Self { Self::default() }

  /// Bind `session` to a freshly minted token and return the token.
  pub async fn establish(&self, session: Session) -> String {
    let token = mint_token();
    self.sessions.write().await.insert(token.clone(), session);
    token
  }

  /// The session bound to `token`, if any.
  pub async fn resolve(&self, token: &str) -> Option<Session> {
    self.sessions.read().await.get(token).cloned()
  }

  /// Unbind `token`. Removing an unknown token is a silent no-op.
  pub async fn remove(&self, token: &str) -> Option<Session> {
    self.sessions.write().await.remove(token)
  }

  /// Refresh the account snapshot in every session belonging to
  /// `account`. Called after a profile update so live sessions see the new
  /// fields.
  pub async fn refresh(&self, account: &Account) {
    let mut sessions = self.sessions.write().await;
    for session in sessions.values_mut() {
      if session.account.account_id == account.account_id {
        session.account = account.clone();
      }
    }
  }
}

/// 32 random bytes from the OS, hex-encoded.
fn mint_token() -> String {
  let mut bytes = [0u8; 32];
  OsRng.fill_bytes(&mut bytes);
  hex::encode(bytes)
}

/// The `Bearer` token from an `Authorization` header, if present.
pub fn bearer_token(headers: &HeaderMap) -> Option<&str> {
  headers
    .get(header::AUTHORIZATION)?
    .to_str()
    .ok()?
    .strip_prefix("Bearer ")
}

// ─── Extractor ───────────────────────────────────────────────────────────────

/// Present in a handler's arguments means the request carried a token bound
/// to a live session.
pub struct Authed {
  pub token:   String,
  pub session: Session,
}

impl<S> FromRequestParts<AppState<S>> for Authed
where
  S: PortalStore + 'static,
{
  type Rejection = ApiError;

  async fn from_request_parts(
    parts: &mut Parts,
    state: &AppState<S>,
  ) -> Result<Self, Self::Rejection> {
    let token = bearer_token(&parts.headers)
      .ok_or(ApiError::Unauthorized)?
      .to_string();
    let session = state
      .sessions
      .resolve(&token)
      .await
      .ok_or(ApiError::Unauthorized)?;
    Ok(Authed { token, session })
  }
}
