//! The `PortalStore` trait and supporting query types.
//!
//! The trait is implemented by storage backends (e.g. `quad-store-sqlite`).
//! Higher layers (`quad-api`, the server binary) depend on this abstraction,
//! not on any concrete backend.

use std::future::Future;

use uuid::Uuid;

use crate::{
  Result,
  account::{Account, AccountRecord, NewAccount, ProfileUpdate},
  appointment::{Appointment, AppointmentStatus, NewAppointment, Resolution},
  audit::{AuditEntry, NewAuditEntry},
  grading::{GpaRecord, NewGpaRecord},
  reference::{Lecturer, NewLecturer, NewVendor, Vendor},
  review::{NewReview, Review, TargetKind},
};

// ─── Query types ──────────────────────────────────────────────────────────────

/// Parameters for [`PortalStore::list_students`].
#[derive(Debug, Clone, Default)]
pub struct StudentFilter {
  /// Case-insensitive substring match over full name, matric number and
  /// email. `None` returns every student.
  pub text: Option<String>,
}

/// Aggregate counters for the admin overview.
#[derive(Debug, Clone, Copy, PartialEq, Eq, serde::Serialize)]
pub struct PortalStats {
  pub students:             u64,
  pub appointments:         u64,
  pub pending_appointments: u64,
  pub reviews:              u64,
  /// Percentage of appointments no longer pending, rounded to the nearest
  /// whole number. Zero when there are no appointments at all.
  pub completion_rate:      u8,
}

// ─── Trait ───────────────────────────────────────────────────────────────────

/// Abstraction over a portal storage backend.
///
/// GPA records and the audit log are append-only; the audit log additionally
/// drops its oldest entries past the retention cap. List methods order
/// newest-first, ties broken by insertion order.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`). Backends convert
/// their internal errors into [`crate::Error`], surfacing domain conditions
/// (duplicate matric, already-resolved appointment) as their dedicated
/// variants and everything infrastructural as [`crate::Error::Storage`].
pub trait PortalStore: Send + Sync {
  // ── Accounts ──────────────────────────────────────────────────────────

  /// Persist a new account. Fails with
  /// [`DuplicateMatric`](crate::Error::DuplicateMatric) if the matric number
  /// is already registered; the check and the insert happen atomically.
  fn add_account(
    &self,
    input: NewAccount,
  ) -> impl Future<Output = Result<Account>> + Send + '_;

  /// Retrieve an account by UUID. Returns `None` if not found.
  fn get_account(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<Option<Account>>> + Send + '_;

  /// Look up a student account (with its credential hash) by matric number.
  /// Staff accounts are never returned.
  fn find_student_by_matric<'a>(
    &'a self,
    matric: &'a str,
  ) -> impl Future<Output = Result<Option<AccountRecord>>> + Send + 'a;

  /// List student accounts matching `filter`, newest-first.
  fn list_students<'a>(
    &'a self,
    filter: &'a StudentFilter,
  ) -> impl Future<Output = Result<Vec<Account>>> + Send + 'a;

  /// Apply a partial profile update and return the updated account, or
  /// `None` if the account does not exist. Fields left `None` in `update`
  /// are unchanged.
  fn update_profile(
    &self,
    id: Uuid,
    update: ProfileUpdate,
  ) -> impl Future<Output = Result<Option<Account>>> + Send + '_;

  /// Replace an account's credential hash. Returns `false` if the account
  /// does not exist.
  fn set_credential_hash(
    &self,
    id: Uuid,
    hash: String,
  ) -> impl Future<Output = Result<bool>> + Send + '_;

  /// Delete an account. Returns `false` if the account does not exist.
  /// Appointments, reviews and GPA records referencing it are kept; they
  /// carry denormalised display fields for exactly this case.
  fn delete_account(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool>> + Send + '_;

  // ── Appointments ──────────────────────────────────────────────────────

  /// Persist a new appointment with `pending` status.
  fn add_appointment(
    &self,
    input: NewAppointment,
  ) -> impl Future<Output = Result<Appointment>> + Send + '_;

  /// Move a pending appointment to a terminal status and return it.
  ///
  /// Fails with [`AppointmentNotFound`](crate::Error::AppointmentNotFound)
  /// if no such appointment exists, and with
  /// [`AlreadyResolved`](crate::Error::AlreadyResolved) if it has already
  /// left `pending`. The guard and the write happen atomically.
  fn resolve_appointment(
    &self,
    id: Uuid,
    resolution: Resolution,
  ) -> impl Future<Output = Result<Appointment>> + Send + '_;

  /// All appointments booked by one student, newest-first.
  fn appointments_for(
    &self,
    student_id: Uuid,
  ) -> impl Future<Output = Result<Vec<Appointment>>> + Send + '_;

  /// All appointments, optionally restricted to one status, newest-first.
  fn list_appointments(
    &self,
    status: Option<AppointmentStatus>,
  ) -> impl Future<Output = Result<Vec<Appointment>>> + Send + '_;

  // ── Reviews ───────────────────────────────────────────────────────────

  /// Persist a new review. Rating bounds are validated by the caller.
  fn add_review(
    &self,
    input: NewReview,
  ) -> impl Future<Output = Result<Review>> + Send + '_;

  /// Reviews newest-first, optionally restricted to one target kind and
  /// capped at `limit` entries.
  fn recent_reviews(
    &self,
    target_kind: Option<TargetKind>,
    limit: Option<usize>,
  ) -> impl Future<Output = Result<Vec<Review>>> + Send + '_;

  /// Delete a review. Returns `false` if it does not exist.
  fn delete_review(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool>> + Send + '_;

  // ── GPA history ───────────────────────────────────────────────────────

  /// Append one GPA computation to a student's history. Records are never
  /// updated or deleted.
  fn add_gpa_record(
    &self,
    input: NewGpaRecord,
  ) -> impl Future<Output = Result<GpaRecord>> + Send + '_;

  /// One student's GPA history, newest-first.
  fn gpa_history(
    &self,
    student_id: Uuid,
  ) -> impl Future<Output = Result<Vec<GpaRecord>>> + Send + '_;

  /// Every GPA record across all students, newest-first.
  fn list_gpa_records(
    &self,
  ) -> impl Future<Output = Result<Vec<GpaRecord>>> + Send + '_;

  // ── Reference data ────────────────────────────────────────────────────

  fn add_lecturer(
    &self,
    input: NewLecturer,
  ) -> impl Future<Output = Result<Lecturer>> + Send + '_;

  fn list_lecturers(
    &self,
  ) -> impl Future<Output = Result<Vec<Lecturer>>> + Send + '_;

  /// Remove a lecturer. Returns `false` if it does not exist. Existing
  /// reviews of the lecturer are kept.
  fn remove_lecturer(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool>> + Send + '_;

  fn add_vendor(
    &self,
    input: NewVendor,
  ) -> impl Future<Output = Result<Vendor>> + Send + '_;

  fn list_vendors(&self)
  -> impl Future<Output = Result<Vec<Vendor>>> + Send + '_;

  /// Remove a vendor. Returns `false` if it does not exist.
  fn remove_vendor(
    &self,
    id: Uuid,
  ) -> impl Future<Output = Result<bool>> + Send + '_;

  // ── Audit log ─────────────────────────────────────────────────────────

  /// Append an audit entry and evict the oldest entries beyond
  /// [`AUDIT_LOG_CAP`](crate::audit::AUDIT_LOG_CAP), atomically.
  fn append_audit(
    &self,
    entry: NewAuditEntry,
  ) -> impl Future<Output = Result<AuditEntry>> + Send + '_;

  /// The retained audit log, newest-first.
  fn audit_log(&self)
  -> impl Future<Output = Result<Vec<AuditEntry>>> + Send + '_;

  // ── Statistics ────────────────────────────────────────────────────────

  /// Aggregate counters for the admin overview.
  fn stats(&self) -> impl Future<Output = Result<PortalStats>> + Send + '_;
}
