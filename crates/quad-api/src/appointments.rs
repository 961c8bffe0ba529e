//! Handlers for `/appointments` endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/appointments` | Student books; 201 + appointment |
//! | `GET`  | `/appointments` | Staff; optional `?status=` |
//! | `GET`  | `/students/:id/appointments` | Owner or staff |
//! | `POST` | `/appointments/:id/resolve` | Doctor; body `{"resolution":"accepted"}` |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use quad_core::{
  appointment::{
    Appointment, AppointmentRequest, AppointmentStatus, Resolution,
  },
  store::PortalStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError, session::Authed};

/// `POST /appointments` — returns 201 + the pending appointment.
pub async fn book<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
  Json(body): Json<AppointmentRequest>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore,
{
  let appointment =
    state.engine.book_appointment(&authed.session, body).await?;
  Ok((StatusCode::CREATED, Json(appointment)))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub status: Option<AppointmentStatus>,
}

/// `GET /appointments[?status=pending]` — staff-wide view.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Appointment>>, ApiError>
where
  S: PortalStore,
{
  let appointments = state
    .engine
    .all_appointments(&authed.session, params.status)
    .await?;
  Ok(Json(appointments))
}

/// `GET /students/:id/appointments`
pub async fn for_student<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
  Path(student_id): Path<Uuid>,
) -> Result<Json<Vec<Appointment>>, ApiError>
where
  S: PortalStore,
{
  let appointments = state
    .engine
    .appointments_for(&authed.session, student_id)
    .await?;
  Ok(Json(appointments))
}

#[derive(Debug, Deserialize)]
pub struct ResolveBody {
  pub resolution: Resolution,
}

/// `POST /appointments/:id/resolve` — the one-way lifecycle transition.
pub async fn resolve<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
  Path(id): Path<Uuid>,
  Json(body): Json<ResolveBody>,
) -> Result<Json<Appointment>, ApiError>
where
  S: PortalStore,
{
  let appointment = state
    .engine
    .resolve_appointment(&authed.session, id, body.resolution)
    .await?;
  Ok(Json(appointment))
}
