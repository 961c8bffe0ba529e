//! Handlers for `/lecturers` and `/vendors` endpoints.
//!
//! Reads are open to any authenticated role — students need the lists to
//! pick a review target. Writes are admin-only.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use quad_core::{
  reference::{Lecturer, NewLecturer, NewVendor, Vendor},
  store::PortalStore,
};
use uuid::Uuid;

use crate::{AppState, error::ApiError, session::Authed};

// ─── Lecturers ────────────────────────────────────────────────────────────────

/// `GET /lecturers`
pub async fn list_lecturers<S>(
  State(state): State<AppState<S>>,
  _authed: Authed,
) -> Result<Json<Vec<Lecturer>>, ApiError>
where
  S: PortalStore,
{
  Ok(Json(state.engine.lecturers().await?))
}

/// `POST /lecturers` — admin; 201.
pub async fn create_lecturer<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
  Json(body): Json<NewLecturer>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore,
{
  let lecturer = state.engine.add_lecturer(&authed.session, body).await?;
  Ok((StatusCode::CREATED, Json(lecturer)))
}

/// `DELETE /lecturers/:id` — admin; 204.
pub async fn delete_lecturer<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PortalStore,
{
  state.engine.remove_lecturer(&authed.session, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

// ─── Vendors ──────────────────────────────────────────────────────────────────

/// `GET /vendors`
pub async fn list_vendors<S>(
  State(state): State<AppState<S>>,
  _authed: Authed,
) -> Result<Json<Vec<Vendor>>, ApiError>
where
  S: PortalStore,
{
  Ok(Json(state.engine.vendors().await?))
}

/// `POST /vendors` — admin; 201.
pub async fn create_vendor<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
  Json(body): Json<NewVendor>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore,
{
  let vendor = state.engine.add_vendor(&authed.session, body).await?;
  Ok((StatusCode::CREATED, Json(vendor)))
}

/// `DELETE /vendors/:id` — admin; 204.
pub async fn delete_vendor<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PortalStore,
{
  state.engine.remove_vendor(&authed.session, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
