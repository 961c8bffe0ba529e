//! [`AccountManager`] — registration, login, and account administration.
//!
//! Students are stored accounts; the doctor and the admin are synthesised
//! from static credentials carried in [`AuthConfig`] and never touch the
//! store. Every login path hands back an explicit [`Session`] value.

use std::sync::Arc;

use chrono::Utc;
use uuid::{Uuid, uuid};

use crate::{
  Error, Result,
  account::{
    Account, DEFAULT_AVATAR_URL, NewAccount, ProfileUpdate, Registration,
    Role,
  },
  audit::{NewAuditEntry, Severity},
  credential::{check_student_password, hash_password, surname_token,
    verify_password},
  session::Session,
  store::{PortalStore, StudentFilter},
};

/// Fixed id of the synthesised doctor account, stable across restarts.
pub const DOCTOR_ACCOUNT_ID: Uuid =
  uuid!("9b2f8a54-1f6e-4c1d-9a7e-3d5c2b1a0e4f");

/// Fixed id of the synthesised admin account, stable across restarts.
pub const ADMIN_ACCOUNT_ID: Uuid =
  uuid!("4c7d1e83-6b2a-4f5e-8c9d-0a1b2c3d4e5f");

// ─── Static staff credentials ─────────────────────────────────────────────────

/// One static staff credential set, loaded from server configuration.
#[derive(Debug, Clone)]
pub struct StaffCredentials {
  pub email:         String,
  /// PHC string, e.g. `$argon2id$v=19$…`
  pub password_hash: String,
  pub display_name:  String,
}

impl StaffCredentials {
  fn matches(&self, email: &str, password: &str) -> bool {
    self.email == email && verify_password(password, &self.password_hash)
  }
}

/// The two fixed staff credential sets the manager authenticates against.
#[derive(Debug, Clone)]
pub struct AuthConfig {
  pub doctor: StaffCredentials,
  pub admin:  StaffCredentials,
}

// ─── Manager ──────────────────────────────────────────────────────────────────

/// Account and session operations over any [`PortalStore`].
pub struct AccountManager<S> {
  store: Arc<S>,
  auth:  AuthConfig,
}

impl<S: PortalStore> AccountManager<S> {
  pub fn new(store: Arc<S>, auth: AuthConfig) -> Self { Self { store, auth } }

  // ── Registration ──────────────────────────────────────────────────────

  /// Register a new student account. Fails with
  /// [`Error::DuplicateMatric`] if the matric number is taken, leaving the
  /// store unchanged. Does not establish a session.
  pub async fn register(&self, registration: Registration) -> Result<Account> {
    require_nonblank(&registration.full_name, "full name")?;
    require_nonblank(&registration.matric, "matric number")?;
    require_nonblank(&registration.email, "email")?;
    require_nonblank(&registration.password, "password")?;

    let credential_hash = hash_password(&registration.password)?;

    let account = self
      .store
      .add_account(NewAccount {
        full_name: registration.full_name,
        matric: registration.matric,
        email: registration.email,
        credential_hash,
        phone: registration.phone,
        avatar_url: registration
          .avatar_url
          .or_else(|| Some(DEFAULT_AVATAR_URL.to_string())),
        department: registration.department,
        faculty: registration.faculty,
      })
      .await?;

    self
      .audit(Severity::Info, "New student registered", &account.full_name)
      .await?;
    Ok(account)
  }

  // ── Logins ────────────────────────────────────────────────────────────

  /// Authenticate a student by matric number.
  ///
  /// The check passes on the stored hash or on the lowercase surname
  /// fallback (see [`crate::credential`]). Failures are not audit-logged;
  /// staff login failures are.
  pub async fn login_student(
    &self,
    matric: &str,
    password: &str,
  ) -> Result<Session> {
    let record = self
      .store
      .find_student_by_matric(matric)
      .await?
      .ok_or_else(|| Error::UnknownMatric(matric.to_string()))?;

    if !check_student_password(
      password,
      &record.credential_hash,
      &record.account.full_name,
    ) {
      return Err(Error::InvalidCredentials);
    }

    self
      .audit(Severity::Success, "Student login", &record.account.full_name)
      .await?;
    Ok(Session::new(record.account))
  }

  /// Authenticate against the static doctor credentials.
  pub async fn login_doctor(
    &self,
    email: &str,
    password: &str,
  ) -> Result<Session> {
    self.login_staff(Role::Doctor, email, password).await
  }

  /// Authenticate against the static admin credentials.
  pub async fn login_admin(
    &self,
    email: &str,
    password: &str,
  ) -> Result<Session> {
    self.login_staff(Role::Admin, email, password).await
  }

  async fn login_staff(
    &self,
    role: Role,
    email: &str,
    password: &str,
  ) -> Result<Session> {
    let credentials = match role {
      Role::Doctor => &self.auth.doctor,
      Role::Admin => &self.auth.admin,
      Role::Student => unreachable!("students authenticate via the store"),
    };

    if !credentials.matches(email, password) {
      self
        .audit(
          Severity::Warning,
          &format!("Failed {role} login attempt"),
          email,
        )
        .await?;
      return Err(Error::InvalidCredentials);
    }

    let account = staff_account(role, credentials);
    self
      .audit(Severity::Success, &format!("{role} login"), &account.full_name)
      .await
      .map(|()| Session::new(account))
  }

  /// Unified login: doctor, then admin, then student-by-matric. The staff
  /// credential sets are privileged, so an identifier matching a staff email
  /// never falls through to the student path.
  pub async fn login(
    &self,
    identifier: &str,
    password: &str,
  ) -> Result<Session> {
    if identifier == self.auth.doctor.email {
      self.login_doctor(identifier, password).await
    } else if identifier == self.auth.admin.email {
      self.login_admin(identifier, password).await
    } else {
      self
        .login_student(identifier, password)
        .await
        .map_err(|e| match e {
          Error::UnknownMatric(_) => Error::InvalidCredentials,
          other => other,
        })
    }
  }

  /// End a session. Consumes the value; "no session" is a caller-side
  /// no-op that never reaches the manager.
  pub async fn logout(&self, session: Session) -> Result<()> {
    self
      .audit(Severity::Info, "Logout", &session.account.full_name)
      .await
  }

  // ── Account maintenance ───────────────────────────────────────────────

  /// Apply a partial profile update. Only the account owner or the admin
  /// may call this; everything outside the four [`ProfileUpdate`] fields is
  /// untouchable by construction.
  pub async fn update_profile(
    &self,
    session: &Session,
    account_id: Uuid,
    update: ProfileUpdate,
  ) -> Result<Account> {
    session.require_self_or_admin(account_id)?;
    self
      .store
      .update_profile(account_id, update)
      .await?
      .ok_or(Error::AccountNotFound(account_id))
  }

  /// Look up an account; the owner or either staff role.
  pub async fn get_account(
    &self,
    session: &Session,
    account_id: Uuid,
  ) -> Result<Account> {
    session.require_self_or_staff(account_id)?;
    self
      .store
      .get_account(account_id)
      .await?
      .ok_or(Error::AccountNotFound(account_id))
  }

  /// Admin-only: reset a student's credential to their lowercase surname.
  pub async fn reset_password(
    &self,
    session: &Session,
    account_id: Uuid,
  ) -> Result<()> {
    session.require_role(Role::Admin)?;

    let account = self
      .store
      .get_account(account_id)
      .await?
      .ok_or(Error::AccountNotFound(account_id))?;

    let fallback = surname_token(&account.full_name)
      .ok_or(Error::BlankField("full name"))?;
    let hash = hash_password(&fallback)?;

    if !self.store.set_credential_hash(account_id, hash).await? {
      return Err(Error::AccountNotFound(account_id));
    }

    self
      .audit(
        Severity::Warning,
        "Password reset",
        &describe(&account),
      )
      .await
  }

  /// Admin-only: permanently remove an account. Appointments, reviews and
  /// GPA records the account owns survive via their denormalised fields.
  pub async fn delete_account(
    &self,
    session: &Session,
    account_id: Uuid,
  ) -> Result<()> {
    session.require_role(Role::Admin)?;

    let account = self
      .store
      .get_account(account_id)
      .await?
      .ok_or(Error::AccountNotFound(account_id))?;

    if !self.store.delete_account(account_id).await? {
      return Err(Error::AccountNotFound(account_id));
    }

    self
      .audit(
        Severity::Warning,
        "Account deleted",
        &describe(&account),
      )
      .await
  }

  /// Admin-only: list student accounts, optionally filtered by a substring
  /// over name, matric and email.
  pub async fn list_students(
    &self,
    session: &Session,
    filter: &StudentFilter,
  ) -> Result<Vec<Account>> {
    session.require_role(Role::Admin)?;
    self.store.list_students(filter).await
  }

  async fn audit(
    &self,
    severity: Severity,
    action: &str,
    actor: &str,
  ) -> Result<()> {
    self
      .store
      .append_audit(NewAuditEntry::new(severity, action, actor))
      .await
      .map(|_| ())
  }
}

/// Build the synthesised doctor/admin account for a fresh session.
fn staff_account(role: Role, credentials: &StaffCredentials) -> Account {
  Account {
    account_id: match role {
      Role::Doctor => DOCTOR_ACCOUNT_ID,
      _ => ADMIN_ACCOUNT_ID,
    },
    role,
    full_name: credentials.display_name.clone(),
    matric: None,
    email: credentials.email.clone(),
    phone: None,
    avatar_url: None,
    department: None,
    faculty: None,
    created_at: Utc::now(),
  }
}

/// Audit-log label for an account, e.g. `Jane Doe (CSC/2021/001)`.
fn describe(account: &Account) -> String {
  match &account.matric {
    Some(matric) => format!("{} ({matric})", account.full_name),
    None => account.full_name.clone(),
  }
}

fn require_nonblank(value: &str, field: &'static str) -> Result<()> {
  if value.trim().is_empty() {
    Err(Error::BlankField(field))
  } else {
    Ok(())
  }
}
