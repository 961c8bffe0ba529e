//! The rolling audit log.
//!
//! Every notable action appends an entry; the store keeps only the newest
//! [`AUDIT_LOG_CAP`] entries and silently drops the oldest beyond that. The
//! log is an operational trace, not a ledger.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Maximum number of audit entries retained.
pub const AUDIT_LOG_CAP: usize = 100;

/// Severity of an audit entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Severity {
  Info,
  Success,
  Warning,
  Error,
}

impl Severity {
  pub fn as_str(self) -> &'static str {
    match self {
      Self::Info => "info",
      Self::Success => "success",
      Self::Warning => "warning",
      Self::Error => "error",
    }
  }
}

impl std::fmt::Display for Severity {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.write_str(self.as_str())
  }
}

/// One entry in the audit log.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AuditEntry {
  pub entry_id:    Uuid,
  pub severity:    Severity,
  pub action:      String,
  /// Free-form actor label, e.g. a student's full name or `"system"`.
  pub actor:       String,
  pub recorded_at: DateTime<Utc>,
}

/// Input to [`PortalStore::append_audit`](crate::store::PortalStore::append_audit).
#[derive(Debug, Clone)]
pub struct NewAuditEntry {
  pub severity: Severity,
  pub action:   String,
  pub actor:    String,
}

impl NewAuditEntry {
  pub fn new(
    severity: Severity,
    action: impl Into<String>,
    actor: impl Into<String>,
  ) -> Self {
    Self { severity, action: action.into(), actor: actor.into() }
  }
}
