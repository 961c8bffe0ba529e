//! Handlers for registration, login, session, and account administration.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/auth/register` | Body: [`Registration`]; 201 + account |
//! | `POST` | `/auth/login` | Unified login; `{token, account}` |
//! | `POST` | `/auth/login/student` | Matric + password |
//! | `POST` | `/auth/login/doctor` · `/admin` | Static staff credentials |
//! | `POST` | `/auth/logout` | Always 204; no-op without a session |
//! | `GET`  | `/auth/session` | Current account, or 401 |
//! | `GET`  | `/students` | Admin; optional `?search=` |
//! | `GET`  | `/accounts/:id` | Owner or staff |
//! | `PATCH` | `/accounts/:id` | Owner or admin |
//! | `POST` | `/accounts/:id/reset-password` | Admin; 204 |
//! | `DELETE` | `/accounts/:id` | Admin; 204 |

use axum::{
  Json,
  extract::{Path, Query, State},
  http::{HeaderMap, StatusCode},
  response::IntoResponse,
};
use quad_core::{
  account::{Account, ProfileUpdate, Registration},
  session::Session,
  store::{PortalStore, StudentFilter},
};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  AppState,
  error::ApiError,
  session::{Authed, bearer_token},
};

// ─── Register ─────────────────────────────────────────────────────────────────

/// `POST /auth/register`
pub async fn register<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<Registration>,
) -> Result<impl IntoResponse, ApiError>
where
  S: PortalStore,
{
  let account = state.manager.register(body).await?;
  Ok((StatusCode::CREATED, Json(account)))
}

// ─── Logins ───────────────────────────────────────────────────────────────────

/// `{token, account}` returned by every login endpoint.
#[derive(Debug, Serialize)]
pub struct LoginResponse {
  pub token:   String,
  pub account: Account,
}

async fn establish<S: PortalStore>(
  state: &AppState<S>,
  session: Session,
) -> Json<LoginResponse> {
  let account = session.account.clone();
  let token = state.sessions.establish(session).await;
  Json(LoginResponse { token, account })
}

#[derive(Debug, Deserialize)]
pub struct UnifiedLoginBody {
  pub identifier: String,
  pub password:   String,
}

/// `POST /auth/login` — doctor, then admin, then student-by-matric.
pub async fn login<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<UnifiedLoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: PortalStore,
{
  let session =
    state.manager.login(&body.identifier, &body.password).await?;
  Ok(establish(&state, session).await)
}

#[derive(Debug, Deserialize)]
pub struct StudentLoginBody {
  pub matric:   String,
  pub password: String,
}

/// `POST /auth/login/student`
pub async fn login_student<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<StudentLoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: PortalStore,
{
  let session =
    state.manager.login_student(&body.matric, &body.password).await?;
  Ok(establish(&state, session).await)
}

#[derive(Debug, Deserialize)]
pub struct StaffLoginBody {
  pub email:    String,
  pub password: String,
}

/// `POST /auth/login/doctor`
pub async fn login_doctor<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<StaffLoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: PortalStore,
{
  let session =
    state.manager.login_doctor(&body.email, &body.password).await?;
  Ok(establish(&state, session).await)
}

/// `POST /auth/login/admin`
pub async fn login_admin<S>(
  State(state): State<AppState<S>>,
  Json(body): Json<StaffLoginBody>,
) -> Result<Json<LoginResponse>, ApiError>
where
  S: PortalStore,
{
  let session =
    state.manager.login_admin(&body.email, &body.password).await?;
  Ok(establish(&state, session).await)
}

// ─── Session ──────────────────────────────────────────────────────────────────

/// `POST /auth/logout` — always 204. A missing or unknown token means there
/// is nothing to destroy and nothing is logged.
pub async fn logout<S>(
  State(state): State<AppState<S>>,
  headers: HeaderMap,
) -> Result<StatusCode, ApiError>
where
  S: PortalStore,
{
  if let Some(token) = bearer_token(&headers)
    && let Some(session) = state.sessions.remove(token).await
  {
    state.manager.logout(session).await?;
  }
  Ok(StatusCode::NO_CONTENT)
}

/// `GET /auth/session` — the authenticated account.
pub async fn current_session(authed: Authed) -> Json<Account> {
  Json(authed.session.account)
}

// ─── Administration ───────────────────────────────────────────────────────────

#[derive(Debug, Deserialize)]
pub struct StudentSearchParams {
  pub search: Option<String>,
}

/// `GET /students?search=` — admin only.
pub async fn list_students<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
  Query(params): Query<StudentSearchParams>,
) -> Result<Json<Vec<Account>>, ApiError>
where
  S: PortalStore,
{
  let filter = StudentFilter { text: params.search };
  let students =
    state.manager.list_students(&authed.session, &filter).await?;
  Ok(Json(students))
}

/// `GET /accounts/:id` — owner or staff.
pub async fn get_account<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
  Path(id): Path<Uuid>,
) -> Result<Json<Account>, ApiError>
where
  S: PortalStore,
{
  let account = state.manager.get_account(&authed.session, id).await?;
  Ok(Json(account))
}

/// `PATCH /accounts/:id` — owner or admin. Live session snapshots for the
/// account are refreshed afterwards.
pub async fn update_profile<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
  Path(id): Path<Uuid>,
  Json(update): Json<ProfileUpdate>,
) -> Result<Json<Account>, ApiError>
where
  S: PortalStore,
{
  let account =
    state.manager.update_profile(&authed.session, id, update).await?;
  state.sessions.refresh(&account).await;
  Ok(Json(account))
}

/// `POST /accounts/:id/reset-password` — admin only; 204.
pub async fn reset_password<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PortalStore,
{
  state.manager.reset_password(&authed.session, id).await?;
  Ok(StatusCode::NO_CONTENT)
}

/// `DELETE /accounts/:id` — admin only; 204.
pub async fn delete_account<S>(
  State(state): State<AppState<S>>,
  authed: Authed,
  Path(id): Path<Uuid>,
) -> Result<StatusCode, ApiError>
where
  S: PortalStore,
{
  state.manager.delete_account(&authed.session, id).await?;
  Ok(StatusCode::NO_CONTENT)
}
