//! Encoding and decoding helpers between Rust domain types and the
//! plain-text representations stored in SQLite columns.
//!
//! All timestamps are stored as RFC 3339 strings, UUIDs as hyphenated
//! lowercase strings, enums as their lowercase names (visit reasons use
//! their display labels), and course lists as compact JSON.

use chrono::{DateTime, Utc};
use quad_core::{
  account::{Account, AccountRecord, Role},
  appointment::{Appointment, AppointmentStatus, VisitReason},
  audit::{AuditEntry, Severity},
  grading::{Course, GpaRecord},
  reference::{Lecturer, Vendor},
  review::{Review, TargetKind},
};
use uuid::Uuid;

use crate::{Error, Result};

// ─── Uuid ─────────────────────────────────────────────────────────────────────

pub fn encode_uuid(id: Uuid) -> String { id.hyphenated().to_string() }

pub fn decode_uuid(s: &str) -> Result<Uuid> { Ok(Uuid::parse_str(s)?) }

// ─── DateTime<Utc> ────────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── Status ───────────────────────────────────────────────────────────────────

pub fn encode_status(s: AppointmentStatus) -> &'static str {
  match s {
    AppointmentStatus::Pending => "pending",
    AppointmentStatus::Accepted => "accepted",
    AppointmentStatus::Declined => "declined",
  }
}

pub fn decode_status(s: &str) -> Result<AppointmentStatus> {
  match s {
    "pending" => Ok(AppointmentStatus::Pending),
    "accepted" => Ok(AppointmentStatus::Accepted),
    "declined" => Ok(AppointmentStatus::Declined),
    other => Err(Error::UnknownVariant {
      column: "status",
      value:  other.to_string(),
    }),
  }
}

// ─── VisitReason ──────────────────────────────────────────────────────────────

pub fn encode_reason(r: VisitReason) -> &'static str { r.label() }

pub fn decode_reason(s: &str) -> Result<VisitReason> {
  VisitReason::from_label(s).ok_or_else(|| Error::UnknownVariant {
    column: "reason",
    value:  s.to_string(),
  })
}

// ─── TargetKind ───────────────────────────────────────────────────────────────

pub fn encode_target_kind(k: TargetKind) -> &'static str {
  match k {
    TargetKind::Lecturer => "lecturer",
    TargetKind::Vendor => "vendor",
  }
}

pub fn decode_target_kind(s: &str) -> Result<TargetKind> {
  match s {
    "lecturer" => Ok(TargetKind::Lecturer),
    "vendor" => Ok(TargetKind::Vendor),
    other => Err(Error::UnknownVariant {
      column: "target_kind",
      value:  other.to_string(),
    }),
  }
}

// ─── Severity ─────────────────────────────────────────────────────────────────

pub fn encode_severity(s: Severity) -> &'static str { s.as_str() }

pub fn decode_severity(s: &str) -> Result<Severity> {
  match s {
    "info" => Ok(Severity::Info),
    "success" => Ok(Severity::Success),
    "warning" => Ok(Severity::Warning),
    "error" => Ok(Severity::Error),
    other => Err(Error::UnknownVariant {
      column: "severity",
      value:  other.to_string(),
    }),
  }
}

// ─── Courses ──────────────────────────────────────────────────────────────────

pub fn encode_courses(courses: &[Course]) -> Result<String> {
  Ok(serde_json::to_string(courses)?)
}

pub fn decode_courses(s: &str) -> Result<Vec<Course>> {
  Ok(serde_json::from_str(s)?)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Raw strings read directly from an `accounts` row, credential included.
pub struct RawAccount {
  pub account_id:      String,
  pub full_name:       String,
  pub matric:          String,
  pub email:           String,
  pub credential_hash: String,
  pub phone:           Option<String>,
  pub avatar_url:      Option<String>,
  pub department:      Option<String>,
  pub faculty:         Option<String>,
  pub created_at:      String,
}

impl RawAccount {
  /// The public projection; the credential hash is dropped here.
  pub fn into_account(self) -> Result<Account> {
    Ok(Account {
      account_id: decode_uuid(&self.account_id)?,
      role:       Role::Student,
      full_name:  self.full_name,
      matric:     Some(self.matric),
      email:      self.email,
      phone:      self.phone,
      avatar_url: self.avatar_url,
      department: self.department,
      faculty:    self.faculty,
      created_at: decode_dt(&self.created_at)?,
    })
  }

  pub fn into_record(self) -> Result<AccountRecord> {
    let credential_hash = self.credential_hash.clone();
    Ok(AccountRecord { account: self.into_account()?, credential_hash })
  }
}

/// Raw strings read directly from an `appointments` row.
pub struct RawAppointment {
  pub appointment_id: String,
  pub student_id:     String,
  pub student_name:   String,
  pub student_matric: String,
  pub reason:         String,
  pub date:           String,
  pub time:           String,
  pub note:           String,
  pub status:         String,
  pub created_at:     String,
}

impl RawAppointment {
  pub fn into_appointment(self) -> Result<Appointment> {
    Ok(Appointment {
      appointment_id: decode_uuid(&self.appointment_id)?,
      student_id:     decode_uuid(&self.student_id)?,
      student_name:   self.student_name,
      student_matric: self.student_matric,
      reason:         decode_reason(&self.reason)?,
      date:           self.date,
      time:           self.time,
      note:           self.note,
      status:         decode_status(&self.status)?,
      created_at:     decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `reviews` row.
pub struct RawReview {
  pub review_id:    String,
  pub student_id:   String,
  pub student_name: String,
  pub target_kind:  String,
  pub target_id:    String,
  pub target_name:  String,
  pub rating:       i64,
  pub comment:      String,
  pub created_at:   String,
}

impl RawReview {
  pub fn into_review(self) -> Result<Review> {
    Ok(Review {
      review_id:    decode_uuid(&self.review_id)?,
      student_id:   decode_uuid(&self.student_id)?,
      student_name: self.student_name,
      target_kind:  decode_target_kind(&self.target_kind)?,
      target_id:    decode_uuid(&self.target_id)?,
      target_name:  self.target_name,
      rating:       self.rating as u8,
      comment:      self.comment,
      created_at:   decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `gpa_records` row.
pub struct RawGpaRecord {
  pub record_id:    String,
  pub student_id:   String,
  pub semester:     String,
  pub courses_json: String,
  pub gpa:          f64,
  pub created_at:   String,
}

impl RawGpaRecord {
  pub fn into_gpa_record(self) -> Result<GpaRecord> {
    Ok(GpaRecord {
      record_id:  decode_uuid(&self.record_id)?,
      student_id: decode_uuid(&self.student_id)?,
      semester:   self.semester,
      courses:    decode_courses(&self.courses_json)?,
      gpa:        self.gpa,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `lecturers` row.
pub struct RawLecturer {
  pub lecturer_id: String,
  pub name:        String,
  pub department:  String,
  pub created_at:  String,
}

impl RawLecturer {
  pub fn into_lecturer(self) -> Result<Lecturer> {
    Ok(Lecturer {
      lecturer_id: decode_uuid(&self.lecturer_id)?,
      name:        self.name,
      department:  self.department,
      created_at:  decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from a `vendors` row.
pub struct RawVendor {
  pub vendor_id:  String,
  pub name:       String,
  pub location:   String,
  pub created_at: String,
}

impl RawVendor {
  pub fn into_vendor(self) -> Result<Vendor> {
    Ok(Vendor {
      vendor_id:  decode_uuid(&self.vendor_id)?,
      name:       self.name,
      location:   self.location,
      created_at: decode_dt(&self.created_at)?,
    })
  }
}

/// Raw strings read directly from an `audit_log` row.
pub struct RawAuditEntry {
  pub entry_id:    String,
  pub severity:    String,
  pub action:      String,
  pub actor:       String,
  pub recorded_at: String,
}

impl RawAuditEntry {
  pub fn into_entry(self) -> Result<AuditEntry> {
    Ok(AuditEntry {
      entry_id:    decode_uuid(&self.entry_id)?,
      severity:    decode_severity(&self.severity)?,
      action:      self.action,
      actor:       self.actor,
      recorded_at: decode_dt(&self.recorded_at)?,
    })
  }
}
