//! Handlers for `/admin` oversight endpoints.

use axum::{Json, extract::State};
use quad_core::{
  audit::AuditEntry,
  store::{PortalStats, PortalStore},
};

use crate::{AppState, error::ApiError, session::Authed};

/// `GET /admin/logs` — the retained audit log, newest-first.
pub async fn logs<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
) -> Result<Json<Vec<AuditEntry>>, ApiError>
where
  S: PortalStore,
{
  Ok(Json(state.engine.audit_log(&authed.session).await?))
}

/// `GET /admin/stats` — aggregate counters for the overview page.
pub async fn stats<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
) -> Result<Json<PortalStats>, ApiError>
where
  S: PortalStore,
{
  Ok(Json(state.engine.stats(&authed.session).await?))
}
