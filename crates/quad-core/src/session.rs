//! Session values handed out by login operations.
//!
//! A session is explicit data, not ambient state: login mints one, every
//! operation that acts on behalf of a user takes one by reference, and
//! logout consumes it. "At most one live session per client" is the API
//! layer's job; this type only proves that *some* login succeeded.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{
  Error, Result,
  account::{Account, Role},
};

/// Proof of a successful login.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Session {
  pub session_id:     Uuid,
  /// Snapshot of the account at authentication time. The API layer refreshes
  /// it when the profile changes.
  pub account:        Account,
  pub established_at: DateTime<Utc>,
}

impl Session {
  pub fn new(account: Account) -> Self {
    Self {
      session_id: Uuid::new_v4(),
      account,
      established_at: Utc::now(),
    }
  }

  pub fn role(&self) -> Role { self.account.role }

  pub fn account_id(&self) -> Uuid { self.account.account_id }

  /// Fail with [`Error::Forbidden`] unless the session holds exactly
  /// `required`.
  pub fn require_role(&self, required: Role) -> Result<()> {
    if self.role() == required {
      Ok(())
    } else {
      Err(Error::Forbidden { required })
    }
  }

  /// Pass for either staff role.
  pub fn require_staff(&self) -> Result<()> {
    if self.role().is_staff() {
      Ok(())
    } else {
      Err(Error::Forbidden { required: Role::Doctor })
    }
  }

  /// Pass for the account owner and for either staff role.
  pub fn require_self_or_staff(&self, account_id: Uuid) -> Result<()> {
    if self.account_id() == account_id || self.role().is_staff() {
      Ok(())
    } else {
      Err(Error::Forbidden { required: Role::Doctor })
    }
  }

  /// Pass for the account owner and for admins.
  pub fn require_self_or_admin(&self, account_id: Uuid) -> Result<()> {
    if self.account_id() == account_id || self.role() == Role::Admin {
      Ok(())
    } else {
      Err(Error::Forbidden { required: Role::Admin })
    }
  }
}

#[cfg(test)]
mod tests {
  use super::*;
  use crate::account::DEFAULT_AVATAR_URL;

  fn account(role: Role) -> Account {
    Account {
      account_id: Uuid::new_v4(),
      role,
      full_name: "Jane Doe".into(),
      matric: (role == Role::Student).then(|| "CSC/2021/001".into()),
      email: "jane@example.edu".into(),
      phone: None,
      avatar_url: Some(DEFAULT_AVATAR_URL.into()),
      department: None,
      faculty: None,
      created_at: Utc::now(),
    }
  }

  #[test]
  fn exact_role_gate() {
    let s = Session::new(account(Role::Student));
    assert!(s.require_role(Role::Student).is_ok());
    assert!(matches!(
      s.require_role(Role::Admin),
      Err(Error::Forbidden { required: Role::Admin })
    ));
  }

  #[test]
  fn staff_gate_admits_both_staff_roles() {
    assert!(Session::new(account(Role::Doctor)).require_staff().is_ok());
    assert!(Session::new(account(Role::Admin)).require_staff().is_ok());
    assert!(Session::new(account(Role::Student)).require_staff().is_err());
  }

  #[test]
  fn self_or_staff_admits_owner() {
    let s = Session::new(account(Role::Student));
    assert!(s.require_self_or_staff(s.account_id()).is_ok());
    assert!(s.require_self_or_staff(Uuid::new_v4()).is_err());
  }

  #[test]
  fn self_or_admin_rejects_doctor_on_foreign_account() {
    let s = Session::new(account(Role::Doctor));
    assert!(s.require_self_or_admin(Uuid::new_v4()).is_err());
    assert!(s.require_self_or_staff(Uuid::new_v4()).is_ok());
  }
}
