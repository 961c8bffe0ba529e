//! Clinic appointment types and their lifecycle.
//!
//! An appointment starts [`AppointmentStatus::Pending`] and is moved exactly
//! once by a doctor to `Accepted` or `Declined`. Both are terminal: a second
//! resolution fails with [`Error::AlreadyResolved`](crate::Error::AlreadyResolved)
//! and leaves the stored status untouched.

use std::fmt;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Visit reason ─────────────────────────────────────────────────────────────

/// Why the student wants to be seen. A closed list; anything else belongs in
/// the free-text note.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum VisitReason {
  #[serde(rename = "General Checkup")]
  GeneralCheckup,
  #[serde(rename = "Fever / Headache")]
  FeverHeadache,
  #[serde(rename = "Stomach Pain")]
  StomachPain,
  #[serde(rename = "Injury / Wound")]
  InjuryWound,
  #[serde(rename = "Mental Health Support")]
  MentalHealthSupport,
  #[serde(rename = "Follow-up")]
  FollowUp,
  Other,
}

impl VisitReason {
  /// Every reason, in the order presented to students.
  pub const ALL: [VisitReason; 7] = [
    Self::GeneralCheckup,
    Self::FeverHeadache,
    Self::StomachPain,
    Self::InjuryWound,
    Self::MentalHealthSupport,
    Self::FollowUp,
    Self::Other,
  ];

  /// The human-readable label. Must match the serde renames above; it is
  /// also the database representation.
  pub fn label(self) -> &'static str {
    match self {
      Self::GeneralCheckup => "General Checkup",
      Self::FeverHeadache => "Fever / Headache",
      Self::StomachPain => "Stomach Pain",
      Self::InjuryWound => "Injury / Wound",
      Self::MentalHealthSupport => "Mental Health Support",
      Self::FollowUp => "Follow-up",
      Self::Other => "Other",
    }
  }

  pub fn from_label(s: &str) -> Option<Self> {
    Self::ALL.into_iter().find(|r| r.label() == s)
  }
}

// ─── Status ───────────────────────────────────────────────────────────────────

/// Lifecycle state. `Pending` is initial; the other two are terminal.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AppointmentStatus {
  Pending,
  Accepted,
  Declined,
}

impl AppointmentStatus {
  pub fn is_terminal(self) -> bool { !matches!(self, Self::Pending) }
}

impl fmt::Display for AppointmentStatus {
  fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
    f.write_str(match self {
      Self::Pending => "pending",
      Self::Accepted => "accepted",
      Self::Declined => "declined",
    })
  }
}

/// A doctor's decision on a pending appointment. Deliberately excludes
/// `Pending`, so a transition back to the initial state is unrepresentable.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Resolution {
  Accepted,
  Declined,
}

impl From<Resolution> for AppointmentStatus {
  fn from(r: Resolution) -> Self {
    match r {
      Resolution::Accepted => Self::Accepted,
      Resolution::Declined => Self::Declined,
    }
  }
}

// ─── Appointment ──────────────────────────────────────────────────────────────

/// A clinic visit request and its current state.
///
/// `student_name` and `student_matric` are denormalised from the account at
/// booking time, so the record stays renderable even after the account is
/// gone.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Appointment {
  pub appointment_id: Uuid,
  pub student_id:     Uuid,
  pub student_name:   String,
  pub student_matric: String,
  pub reason:         VisitReason,
  /// Requested calendar date; opaque to the engine.
  pub date:           String,
  /// Requested time of day; opaque to the engine.
  pub time:           String,
  pub note:           String,
  pub status:         AppointmentStatus,
  /// Server-assigned; listing order is most recent first.
  pub created_at:     DateTime<Utc>,
}

/// What a student supplies when booking. Identity comes from the session;
/// the id, initial status, and timestamp come from the store.
#[derive(Debug, Clone, Deserialize)]
pub struct AppointmentRequest {
  pub reason: VisitReason,
  pub date:   String,
  pub time:   String,
  #[serde(default)]
  pub note:   String,
}

/// Input to [`PortalStore::add_appointment`](crate::store::PortalStore::add_appointment).
#[derive(Debug, Clone)]
pub struct NewAppointment {
  pub student_id:     Uuid,
  pub student_name:   String,
  pub student_matric: String,
  pub reason:         VisitReason,
  pub date:           String,
  pub time:           String,
  pub note:           String,
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn labels_roundtrip_for_every_reason() {
    for reason in VisitReason::ALL {
      assert_eq!(VisitReason::from_label(reason.label()), Some(reason));
    }
    assert_eq!(VisitReason::from_label("Toothache"), None);
  }

  #[test]
  fn resolution_maps_to_terminal_status() {
    assert_eq!(
      AppointmentStatus::from(Resolution::Accepted),
      AppointmentStatus::Accepted
    );
    assert_eq!(
      AppointmentStatus::from(Resolution::Declined),
      AppointmentStatus::Declined
    );
    assert!(AppointmentStatus::Accepted.is_terminal());
    assert!(AppointmentStatus::Declined.is_terminal());
    assert!(!AppointmentStatus::Pending.is_terminal());
  }
}
