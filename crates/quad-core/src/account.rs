//! Account types — stored student accounts and the public projection shared
//! by the two synthesised staff identities.
//!
//! Only students live in the store. The doctor and admin accounts are fixed
//! singletons built from static credentials at login time (see
//! [`crate::manager`]). The credential hash never rides along with an
//! [`Account`]; it crosses the store boundary separately as part of an
//! [`AccountRecord`].

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Placeholder portrait applied at registration when none is supplied.
pub const DEFAULT_AVATAR_URL: &str = "https://picsum.photos/200/200";

// ─── Role ─────────────────────────────────────────────────────────────────────

/// The portal role carried by every account and session.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Role {
  Student,
  Doctor,
  Admin,
}

impl Role {
  pub fn is_staff(self) -> bool { matches!(self, Self::Doctor | Self::Admin) }
}

impl fmt::Display for Role {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Student => "student",
      Self::Doctor => "doctor",
      Self::Admin => "admin",
    })
  }
}

// ─── Account ──────────────────────────────────────────────────────────────────

/// The public projection of an account — everything a holder or an admin may
/// see. Never carries the credential hash.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Account {
  pub account_id: Uuid,
  pub role:       Role,
  pub full_name:  String,
  /// Matriculation number; unique among students, absent for staff.
  pub matric:     Option<String>,
  pub email:      String,
  pub phone:      Option<String>,
  pub avatar_url: Option<String>,
  pub department: Option<String>,
  pub faculty:    Option<String>,
  /// Server-assigned; never changes after creation.
  pub created_at: DateTime<Utc>,
}

/// An account paired with its argon2 credential hash, as persisted. Only the
/// store and the account manager ever handle this; every layer above them
/// gets the bare [`Account`].
#[derive(Debug, Clone)]
pub struct AccountRecord {
  pub account:         Account,
  /// PHC string, e.g. `$argon2id$v=19$…`
  pub credential_hash: String,
}

// ─── Inputs ───────────────────────────────────────────────────────────────────

/// Input to [`AccountManager::register`](crate::manager::AccountManager::register).
/// The plaintext password never reaches the store; the manager hashes it
/// first.
#[derive(Debug, Clone, Deserialize)]
pub struct Registration {
  pub full_name:  String,
  pub matric:     String,
  pub email:      String,
  pub password:   String,
  pub phone:      Option<String>,
  pub avatar_url: Option<String>,
  pub department: Option<String>,
  pub faculty:    Option<String>,
}

/// Input to [`PortalStore::add_account`](crate::store::PortalStore::add_account).
/// The account id and creation timestamp are assigned by the store.
#[derive(Debug, Clone)]
pub struct NewAccount {
  pub full_name:       String,
  pub matric:          String,
  pub email:           String,
  pub credential_hash: String,
  pub phone:           Option<String>,
  pub avatar_url:      Option<String>,
  pub department:      Option<String>,
  pub faculty:         Option<String>,
}

/// The profile fields a holder may change, each individually optional.
/// Matric, role, department, and faculty have no representation here, so a
/// request carrying them cannot even be expressed.
#[derive(Debug, Clone, Default, Deserialize)]
pub struct ProfileUpdate {
  pub full_name:  Option<String>,
  pub email:      Option<String>,
  pub phone:      Option<String>,
  pub avatar_url: Option<String>,
}

impl ProfileUpdate {
  pub fn is_empty(&self) -> bool {
    self.full_name.is_none()
      && self.email.is_none()
      && self.phone.is_none()
      && self.avatar_url.is_none()
  }
}
