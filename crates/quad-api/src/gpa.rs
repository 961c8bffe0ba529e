//! Handlers for `/gpa` endpoints.

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use quad_core::{
  grading::{Course, GpaRecord},
  store::PortalStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError, session::Authed};

#[derive(Debug, Deserialize)]
pub struct ComputeBody {
  /// Display label; a blank label becomes `Calculation N`.
  #[serde(default)]
  pub semester: String,
  pub courses:  Vec<Course>,
}

/// `POST /gpa` — compute and append to the calling student's history;
/// 201 + the stored record.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
  Json(body): Json<ComputeBody>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore,
{
  let record = state
    .engine
    .compute_and_save_gpa(&authed.session, body.semester, body.courses)
    .await?;
  Ok((StatusCode::CREATED, Json(record)))
}

/// `GET /students/:id/gpa` — owner or staff; newest-first.
pub async fn history<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
  Path(student_id): Path<Uuid>,
) -> Result<Json<Vec<GpaRecord>>, ApiError>
where
  S: PortalStore,
{
  let records =
    state.engine.gpa_history(&authed.session, student_id).await?;
  Ok(Json(records))
}

/// `GET /gpa` — admin: every record across all students.
pub async fn list_all<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
) -> Result<Json<Vec<GpaRecord>>, ApiError>
where
  S: PortalStore,
{
  let records = state.engine.all_gpa_records(&authed.session).await?;
  Ok(Json(records))
}
