//! Handlers for `/reviews` endpoints.

use axum::{
  Json,
  extract::{Path, Query, State},
  http::StatusCode,
  response::IntoResponse,
};
use quad_core::{
  review::{Review, ReviewSubmission, TargetKind},
  store::PortalStore,
};
use serde::Deserialize;
use uuid::Uuid;

use crate::{AppState, error::ApiError, session::Authed};

/// `POST /reviews` — student submits; 201 + the stored review.
pub async fn create<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
  Json(body): Json<ReviewSubmission>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore,
{
  let review = state.engine.submit_review(&authed.session, body).await?;
  Ok((StatusCode::CREATED, Json(review)))
}

#[derive(Debug, Deserialize)]
pub struct ListParams {
  pub target: Option<TargetKind>,
  pub limit:  Option<usize>,
}

/// `GET /reviews[?target=lecturer][&limit=5]` — newest-first.
pub async fn list<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
  Query(params): Query<ListParams>,
) -> Result<Json<Vec<Review>>, ApiError>
where
  S: PortalStore,
{
  let reviews = state
    .engine
    .recent_reviews(&authed.session, params.target, params.limit)
    .await?;
  Ok(Json(reviews))
}

/// `DELETE /reviews/:id` — admin only; 204.
pub async fn delete<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PortalStore,
{
  state.engine.delete_review(&authed.session, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
