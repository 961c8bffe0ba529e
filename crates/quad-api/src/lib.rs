//! JSON REST API for the Quad campus portal.
//!
//! Exposes an axum [`Router`] backed by any [`quad_core::store::PortalStore`].
//! Login endpoints mint bearer tokens bound to in-memory sessions; every
//! protected route resolves its token through the [`session::SessionRegistry`].
//! TLS and transport concerns are the caller's responsibility.

pub mod accounts;
pub mod admin;
pub mod appointments;
pub mod error;
pub mod gpa;
pub mod reference;
pub mod reviews;
pub mod session;

use std::sync::Arc;

use axum::{
  Router,
  routing::{delete, get, post},
};
use quad_core::{
  engine::RecordEngine,
  manager::{AccountManager, AuthConfig},
  store::PortalStore,
};
use tower_http::trace::TraceLayer;

pub use error::ApiError;
pub use session::SessionRegistry;

// ─── Application state ────────────────────────────────────────────────────────

/// Shared state threaded through all axum handlers.
pub struct AppState<S> {
  pub manager:  Arc<AccountManager<S>>,
  pub engine:   Arc<RecordEngine<S>>,
  pub sessions: Arc<SessionRegistry>,
}

impl<S: PortalStore> AppState<S> {
  pub fn new(store: Arc<S>, auth: AuthConfig) -> Self {
    Self {
      manager:  Arc::new(AccountManager::new(store.clone(), auth)),
      engine:   Arc::new(RecordEngine::new(store)),
      sessions: Arc::new(SessionRegistry::new()),
    }
  }
}

impl<S> Clone for AppState<S> {
  fn clone(&self) -> Self {
    Self {
      manager:  self.manager.clone(),
      engine:   self.engine.clone(),
      sessions: self.sessions.clone(),
    }
  }
}

// ─── Router ───────────────────────────────────────────────────────────────────

/// Build a fully-materialised API router for `state`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type.
pub fn api_router<S>(state: AppState<S>) -> Router<()>
where
  S: PortalStore + 'static,
{
  Router::new()
    // Auth & sessions
    .route("/auth/register", post(accounts::register::<S>))
    .route("/auth/login", post(accounts::login::<S>))
    .route("/auth/login/student", post(accounts::login_student::<S>))
    .route("/auth/login/doctor", post(accounts::login_doctor::<S>))
    .route("/auth/login/admin", post(accounts::login_admin::<S>))
    .route("/auth/logout", post(accounts::logout::<S>))
    .route("/auth/session", get(accounts::current_session))
    // Accounts
    .route("/students", get(accounts::list_students::<S>))
    .route(
      "/accounts/{id}",
      get(accounts::get_account::<S>)
        .patch(accounts::update_profile::<S>)
        .delete(accounts::delete_account::<S>),
    )
    .route(
      "/accounts/{id}/reset-password",
      post(accounts::reset_password::<S>),
    )
    // Appointments
    .route(
      "/appointments",
      post(appointments::book::<S>).get(appointments::list::<S>),
    )
    .route(
      "/appointments/{id}/resolve",
      post(appointments::resolve::<S>),
    )
    .route(
      "/students/{id}/appointments",
      get(appointments::for_student::<S>),
    )
    // Reviews
    .route("/reviews", post(reviews::create::<S>).get(reviews::list::<S>))
    .route("/reviews/{id}", delete(reviews::delete::<S>))
    // GPA
    .route("/gpa", post(gpa::create::<S>).get(gpa::list_all::<S>))
    .route("/students/{id}/gpa", get(gpa::history::<S>))
    // Reference data
    .route(
      "/lecturers",
      get(reference::list_lecturers::<S>)
        .post(reference::create_lecturer::<S>),
    )
    .route("/lecturers/{id}", delete(reference::delete_lecturer::<S>))
    .route(
      "/vendors",
      get(reference::list_vendors::<S>).post(reference::create_vendor::<S>),
    )
    .route("/vendors/{id}", delete(reference::delete_vendor::<S>))
    // Admin oversight
    .route("/admin/logs", get(admin::logs::<S>))
    .route("/admin/stats", get(admin::stats::<S>))
    .layer(TraceLayer::new_for_http())
    .with_state(state)
}

// ─── Tests ────────────────────────────────────────────────────────────────────

#[cfg(test)]
mod tests {
  use axum::{
    body::Body,
    http::{Request, StatusCode, header},
  };
  use quad_core::{credential::hash_password, manager::StaffCredentials};
  use quad_store_sqlite::SqliteStore;
  use serde_json::{Value, json};
  use tower::ServiceExt as _;

  use super::*;

  const DOCTOR_PASSWORD: &str = "stethoscope";
  const ADMIN_PASSWORD: &str = "override";

  async fn make_router() -> Router<()> {
    let store = Arc::new(
      SqliteStore::open_in_memory().await.expect("in-memory store"),
    );
    store.seed_reference_data().await.expect("seed");

    let auth = AuthConfig {
      doctor: StaffCredentials {
        email:         "doctor@quad.edu".to_string(),
        password_hash: hash_password(DOCTOR_PASSWORD).unwrap(),
        display_name:  "Dr. Amina Bello".to_string(),
      },
      admin:  StaffCredentials {
        email:         "admin@quad.edu".to_string(),
        password_hash: hash_password(ADMIN_PASSWORD).unwrap(),
        display_name:  "Portal Admin".to_string(),
      },
    };

    api_router(AppState::new(store, auth))
  }

  fn request(
    method: &str,
    path: &str,
    token: Option<&str>,
    body: Option<Value>,
  ) -> Request<Body> {
    let mut builder = Request::builder().method(method).uri(path);
    if let Some(token) = token {
      builder =
        builder.header(header::AUTHORIZATION, format!("Bearer {token}"));
    }
    match body {
      Some(v) => builder
        .header(header::CONTENT_TYPE, "application/json")
        .body(Body::from(v.to_string()))
        .unwrap(),
      None => builder.body(Body::empty()).unwrap(),
    }
  }

  async fn send(
    router: &Router<()>,
    req: Request<Body>,
  ) -> (StatusCode, Value) {
    let response = router.clone().oneshot(req).await.unwrap();
    let status = response.status();
    let bytes = axum::body::to_bytes(response.into_body(), usize::MAX)
      .await
      .unwrap();
    let value = if bytes.is_empty() {
      Value::Null
    } else {
      serde_json::from_slice(&bytes).unwrap()
    };
    (status, value)
  }

  fn registration() -> Value {
    json!({
      "full_name": "Jane Doe",
      "matric": "COSC/001",
      "email": "cosc001@quad.edu",
      "password": "secret"
    })
  }

  async fn register_and_login(router: &Router<()>) -> (String, String) {
    let (status, _) = send(
      router,
      request("POST", "/auth/register", None, Some(registration())),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);

    let (status, body) = send(
      router,
      request(
        "POST",
        "/auth/login/student",
        None,
        Some(json!({"matric": "COSC/001", "password": "secret"})),
      ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);

    let token = body["token"].as_str().unwrap().to_string();
    let account_id = body["account"]["account_id"].as_str().unwrap().into();
    (token, account_id)
  }

  async fn staff_token(router: &Router<()>, path: &str, email: &str, password: &str) -> String {
    let (status, body) = send(
      router,
      request(
        "POST",
        path,
        None,
        Some(json!({"email": email, "password": password})),
      ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    body["token"].as_str().unwrap().to_string()
  }

  async fn doctor_token(router: &Router<()>) -> String {
    staff_token(router, "/auth/login/doctor", "doctor@quad.edu", DOCTOR_PASSWORD)
      .await
  }

  async fn admin_token(router: &Router<()>) -> String {
    staff_token(router, "/auth/login/admin", "admin@quad.edu", ADMIN_PASSWORD)
      .await
  }

  #[tokio::test]
  async fn register_never_leaks_the_credential() {
    let router = make_router().await;
    let (status, body) = send(
      &router,
      request("POST", "/auth/register", None, Some(registration())),
    )
    .await;

    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(body["full_name"], "Jane Doe");
    assert_eq!(body["role"], "student");
    assert!(body.get("password").is_none());
    assert!(body.get("credential_hash").is_none());
  }

  #[tokio::test]
  async fn duplicate_registration_conflicts() {
    let router = make_router().await;
    send(&router, request("POST", "/auth/register", None, Some(registration())))
      .await;
    let (status, _) = send(
      &router,
      request("POST", "/auth/register", None, Some(registration())),
    )
    .await;
    assert_eq!(status, StatusCode::CONFLICT);
  }

  #[tokio::test]
  async fn protected_routes_reject_missing_and_unknown_tokens() {
    let router = make_router().await;

    let (status, _) = send(&router, request("GET", "/auth/session", None, None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);

    let (status, _) = send(
      &router,
      request("GET", "/auth/session", Some("deadbeef"), None),
    )
    .await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn session_endpoint_returns_the_logged_in_account() {
    let router = make_router().await;
    let (token, account_id) = register_and_login(&router).await;

    let (status, body) =
      send(&router, request("GET", "/auth/session", Some(&token), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account_id"], account_id.as_str());
  }

  #[tokio::test]
  async fn logout_is_always_no_content() {
    let router = make_router().await;
    let (token, _) = register_and_login(&router).await;

    let (status, _) =
      send(&router, request("POST", "/auth/logout", Some(&token), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    // The token is dead now; logging out again (or with no token) is a
    // silent no-op.
    let (status, _) =
      send(&router, request("POST", "/auth/logout", Some(&token), None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);
    let (status, _) =
      send(&router, request("POST", "/auth/logout", None, None)).await;
    assert_eq!(status, StatusCode::NO_CONTENT);

    let (status, _) =
      send(&router, request("GET", "/auth/session", Some(&token), None)).await;
    assert_eq!(status, StatusCode::UNAUTHORIZED);
  }

  #[tokio::test]
  async fn unified_login_resolves_staff_and_students() {
    let router = make_router().await;
    send(&router, request("POST", "/auth/register", None, Some(registration())))
      .await;

    let (status, body) = send(
      &router,
      request(
        "POST",
        "/auth/login",
        None,
        Some(json!({"identifier": "doctor@quad.edu", "password": DOCTOR_PASSWORD})),
      ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account"]["role"], "doctor");

    let (status, body) = send(
      &router,
      request(
        "POST",
        "/auth/login",
        None,
        Some(json!({"identifier": "COSC/001", "password": "doe"})),
      ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(body["account"]["role"], "student");
  }

  #[tokio::test]
  async fn appointment_lifecycle_over_http() {
    let router = make_router().await;
    let (student, _) = register_and_login(&router).await;

    let (status, appointment) = send(
      &router,
      request(
        "POST",
        "/appointments",
        Some(&student),
        Some(json!({
          "reason": "General Checkup",
          "date": "2025-03-14",
          "time": "10:30",
          "note": "Recurring headache"
        })),
      ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(appointment["status"], "pending");
    let id = appointment["appointment_id"].as_str().unwrap().to_string();

    // Students cannot resolve; the doctor can, exactly once.
    let resolve = |token: String, resolution: &str| {
      request(
        "POST",
        &format!("/appointments/{id}/resolve"),
        Some(&token),
        Some(json!({"resolution": resolution})),
      )
    };
    let (status, _) = send(&router, resolve(student.clone(), "accepted")).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let doctor = doctor_token(&router).await;
    let (status, resolved) =
      send(&router, resolve(doctor.clone(), "accepted")).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(resolved["status"], "accepted");

    let (status, _) = send(&router, resolve(doctor.clone(), "declined")).await;
    assert_eq!(status, StatusCode::CONFLICT);

    let (status, pending) = send(
      &router,
      request("GET", "/appointments?status=pending", Some(&doctor), None),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(pending.as_array().unwrap().len(), 0);
  }

  #[tokio::test]
  async fn unknown_visit_reason_is_unprocessable() {
    let router = make_router().await;
    let (student, _) = register_and_login(&router).await;

    let (status, _) = send(
      &router,
      request(
        "POST",
        "/appointments",
        Some(&student),
        Some(json!({
          "reason": "Toothache",
          "date": "2025-03-14",
          "time": "10:30"
        })),
      ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  }

  #[tokio::test]
  async fn out_of_range_rating_is_unprocessable() {
    let router = make_router().await;
    let (student, _) = register_and_login(&router).await;

    let (status, lecturers) =
      send(&router, request("GET", "/lecturers", Some(&student), None)).await;
    assert_eq!(status, StatusCode::OK);
    let lecturer = &lecturers.as_array().unwrap()[0];

    let (status, _) = send(
      &router,
      request(
        "POST",
        "/reviews",
        Some(&student),
        Some(json!({
          "target_kind": "lecturer",
          "target_id": lecturer["lecturer_id"],
          "target_name": lecturer["name"],
          "rating": 6,
          "comment": ""
        })),
      ),
    )
    .await;
    assert_eq!(status, StatusCode::UNPROCESSABLE_ENTITY);
  }

  #[tokio::test]
  async fn gpa_endpoint_computes_and_persists() {
    let router = make_router().await;
    let (student, account_id) = register_and_login(&router).await;

    let (status, record) = send(
      &router,
      request(
        "POST",
        "/gpa",
        Some(&student),
        Some(json!({
          "semester": "1st Semester",
          "courses": [
            {"code": "CSC101", "units": 3, "grade": "A"},
            {"code": "MTH101", "units": 2, "grade": "B"}
          ]
        })),
      ),
    )
    .await;
    assert_eq!(status, StatusCode::CREATED);
    assert_eq!(record["gpa"].as_f64().unwrap(), 4.6);

    let (status, history) = send(
      &router,
      request(
        "GET",
        &format!("/students/{account_id}/gpa"),
        Some(&student),
        None,
      ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(history.as_array().unwrap().len(), 1);
  }

  #[tokio::test]
  async fn admin_oversight_is_role_gated() {
    let router = make_router().await;
    let (student, _) = register_and_login(&router).await;

    let (status, _) =
      send(&router, request("GET", "/admin/stats", Some(&student), None)).await;
    assert_eq!(status, StatusCode::FORBIDDEN);

    let admin = admin_token(&router).await;
    let (status, stats) =
      send(&router, request("GET", "/admin/stats", Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(stats["students"], 1);

    let (status, logs) =
      send(&router, request("GET", "/admin/logs", Some(&admin), None)).await;
    assert_eq!(status, StatusCode::OK);
    assert!(!logs.as_array().unwrap().is_empty());
  }

  #[tokio::test]
  async fn profile_update_refreshes_the_live_session() {
    let router = make_router().await;
    let (token, account_id) = register_and_login(&router).await;

    let (status, updated) = send(
      &router,
      request(
        "PATCH",
        &format!("/accounts/{account_id}"),
        Some(&token),
        Some(json!({"phone": "0803-000-0000"})),
      ),
    )
    .await;
    assert_eq!(status, StatusCode::OK);
    assert_eq!(updated["phone"], "0803-000-0000");

    let (_, session) =
      send(&router, request("GET", "/auth/session", Some(&token), None)).await;
    assert_eq!(session["phone"], "0803-000-0000");
  }
}
