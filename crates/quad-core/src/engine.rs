//! [`RecordEngine`] — appointments, reviews, GPA history, reference data,
//! and the activity log.
//!
//! Every operation that acts on behalf of a user takes the caller's
//! [`Session`]; role gates live here, not in any UI layer.

use std::sync::Arc;

use uuid::Uuid;

use crate::{
  Error, Result,
  account::Role,
  appointment::{
    Appointment, AppointmentRequest, AppointmentStatus, NewAppointment,
    Resolution,
  },
  audit::{AuditEntry, NewAuditEntry, Severity},
  grading::{Course, GpaRecord, NewGpaRecord, compute_gpa},
  reference::{Lecturer, NewLecturer, NewVendor, Vendor},
  review::{NewReview, Review, ReviewSubmission, TargetKind},
  session::Session,
  store::{PortalStats, PortalStore},
};

/// Record operations over any [`PortalStore`].
pub struct RecordEngine<S> {
  store: Arc<S>,
}

impl<S: PortalStore> RecordEngine<S> {
  pub fn new(store: Arc<S>) -> Self { Self { store } }

  // ── Appointments ──────────────────────────────────────────────────────

  /// Book a clinic appointment for the calling student. The appointment
  /// starts [`AppointmentStatus::Pending`] and carries the student's name
  /// and matric as denormalised display fields.
  pub async fn book_appointment(
    &self,
    session: &Session,
    request: AppointmentRequest,
  ) -> Result<Appointment> {
    session.require_role(Role::Student)?;
    let account = &session.account;

    let appointment = self
      .store
      .add_appointment(NewAppointment {
        student_id:     account.account_id,
        student_name:   account.full_name.clone(),
        student_matric: account.matric.clone().unwrap_or_default(),
        reason:         request.reason,
        date:           request.date,
        time:           request.time,
        note:           request.note,
      })
      .await?;

    self
      .audit(
        Severity::Info,
        &format!("Appointment booked ({})", appointment.reason.label()),
        &account.full_name,
      )
      .await?;
    Ok(appointment)
  }

  /// Doctor-only: move a pending appointment to a terminal status.
  ///
  /// An unknown id fails [`Error::AppointmentNotFound`]; an appointment
  /// that has already left `pending` fails [`Error::AlreadyResolved`] and
  /// keeps its stored status.
  pub async fn resolve_appointment(
    &self,
    session: &Session,
    id: Uuid,
    resolution: Resolution,
  ) -> Result<Appointment> {
    session.require_role(Role::Doctor)?;

    let appointment = self.store.resolve_appointment(id, resolution).await?;

    let (severity, verb) = match resolution {
      Resolution::Accepted => (Severity::Success, "accepted"),
      Resolution::Declined => (Severity::Info, "declined"),
    };
    self
      .audit(
        severity,
        &format!("Appointment {verb}"),
        &appointment.student_name,
      )
      .await?;
    Ok(appointment)
  }

  /// One student's appointments, newest-first. The student themself or any
  /// staff role.
  pub async fn appointments_for(
    &self,
    session: &Session,
    student_id: Uuid,
  ) -> Result<Vec<Appointment>> {
    session.require_self_or_staff(student_id)?;
    self.store.appointments_for(student_id).await
  }

  /// Staff view over every appointment, optionally restricted to one
  /// status (the doctor dashboard splits pending requests from resolved
  /// history).
  pub async fn all_appointments(
    &self,
    session: &Session,
    status: Option<AppointmentStatus>,
  ) -> Result<Vec<Appointment>> {
    session.require_staff()?;
    self.store.list_appointments(status).await
  }

  // ── Reviews ───────────────────────────────────────────────────────────

  /// Submit a lecturer or vendor review. The rating is validated before
  /// anything touches the store.
  pub async fn submit_review(
    &self,
    session: &Session,
    submission: ReviewSubmission,
  ) -> Result<Review> {
    session.require_role(Role::Student)?;
    submission.validate()?;
    let account = &session.account;

    let review = self
      .store
      .add_review(NewReview {
        student_id:   account.account_id,
        student_name: account.full_name.clone(),
        target_kind:  submission.target_kind,
        target_id:    submission.target_id,
        target_name:  submission.target_name,
        rating:       submission.rating,
        comment:      submission.comment,
      })
      .await?;

    self
      .audit(
        Severity::Info,
        &format!("Review submitted for {}", review.target_name),
        &account.full_name,
      )
      .await?;
    Ok(review)
  }

  /// Recent reviews, newest-first; any authenticated role.
  pub async fn recent_reviews(
    &self,
    _session: &Session,
    target_kind: Option<TargetKind>,
    limit: Option<usize>,
  ) -> Result<Vec<Review>> {
    self.store.recent_reviews(target_kind, limit).await
  }

  /// Admin-only: permanently remove a review.
  pub async fn delete_review(
    &self,
    session: &Session,
    review_id: Uuid,
  ) -> Result<()> {
    session.require_role(Role::Admin)?;

    if !self.store.delete_review(review_id).await? {
      return Err(Error::ReviewNotFound(review_id));
    }
    self
      .audit(Severity::Warning, "Review deleted", &session.account.full_name)
      .await
  }

  // ── GPA ───────────────────────────────────────────────────────────────

  /// Compute a GPA over `courses` and append the result to the calling
  /// student's history. Rows with non-positive units contribute nothing to
  /// the GPA but stay in the stored record. A blank semester label becomes
  /// `Calculation N` from the student's history length.
  pub async fn compute_and_save_gpa(
    &self,
    session: &Session,
    semester: String,
    courses: Vec<Course>,
  ) -> Result<GpaRecord> {
    session.require_role(Role::Student)?;
    let account = &session.account;

    let semester = if semester.trim().is_empty() {
      let prior = self.store.gpa_history(account.account_id).await?;
      format!("Calculation {}", prior.len() + 1)
    } else {
      semester
    };

    let gpa = compute_gpa(&courses);
    let record = self
      .store
      .add_gpa_record(NewGpaRecord {
        student_id: account.account_id,
        semester,
        courses,
        gpa,
      })
      .await?;

    self
      .audit(
        Severity::Info,
        &format!("GPA calculated ({:.2})", record.gpa),
        &account.full_name,
      )
      .await?;
    Ok(record)
  }

  /// One student's GPA history, newest-first; self or staff.
  pub async fn gpa_history(
    &self,
    session: &Session,
    student_id: Uuid,
  ) -> Result<Vec<GpaRecord>> {
    session.require_self_or_staff(student_id)?;
    self.store.gpa_history(student_id).await
  }

  /// Admin-only: every GPA record across all students.
  pub async fn all_gpa_records(
    &self,
    session: &Session,
  ) -> Result<Vec<GpaRecord>> {
    session.require_role(Role::Admin)?;
    self.store.list_gpa_records().await
  }

  // ── Reference data ────────────────────────────────────────────────────

  /// Lecturers available as review targets; no session required.
  pub async fn lecturers(&self) -> Result<Vec<Lecturer>> {
    self.store.list_lecturers().await
  }

  /// Vendors available as review targets; no session required.
  pub async fn vendors(&self) -> Result<Vec<Vendor>> {
    self.store.list_vendors().await
  }

  /// Admin-only. Duplicate names are allowed; only blank names are
  /// rejected.
  pub async fn add_lecturer(
    &self,
    session: &Session,
    input: NewLecturer,
  ) -> Result<Lecturer> {
    session.require_role(Role::Admin)?;
    require_nonblank(&input.name, "lecturer name")?;

    let lecturer = self.store.add_lecturer(input).await?;
    self
      .audit(
        Severity::Info,
        &format!("Lecturer added: {}", lecturer.name),
        &session.account.full_name,
      )
      .await?;
    Ok(lecturer)
  }

  /// Admin-only. Reviews of the removed lecturer are kept.
  pub async fn remove_lecturer(
    &self,
    session: &Session,
    lecturer_id: Uuid,
  ) -> Result<()> {
    session.require_role(Role::Admin)?;

    if !self.store.remove_lecturer(lecturer_id).await? {
      return Err(Error::LecturerNotFound(lecturer_id));
    }
    self
      .audit(
        Severity::Warning,
        "Lecturer removed",
        &session.account.full_name,
      )
      .await
  }

  /// Admin-only. Duplicate names are allowed; only blank names are
  /// rejected.
  pub async fn add_vendor(
    &self,
    session: &Session,
    input: NewVendor,
  ) -> Result<Vendor> {
    session.require_role(Role::Admin)?;
    require_nonblank(&input.name, "vendor name")?;

    let vendor = self.store.add_vendor(input).await?;
    self
      .audit(
        Severity::Info,
        &format!("Vendor added: {}", vendor.name),
        &session.account.full_name,
      )
      .await?;
    Ok(vendor)
  }

  /// Admin-only. Reviews of the removed vendor are kept.
  pub async fn remove_vendor(
    &self,
    session: &Session,
    vendor_id: Uuid,
  ) -> Result<()> {
    session.require_role(Role::Admin)?;

    if !self.store.remove_vendor(vendor_id).await? {
      return Err(Error::VendorNotFound(vendor_id));
    }
    self
      .audit(Severity::Warning, "Vendor removed", &session.account.full_name)
      .await
  }

  // ── Audit & statistics ────────────────────────────────────────────────

  /// Append an entry to the activity log. The store prunes to the newest
  /// [`AUDIT_LOG_CAP`](crate::audit::AUDIT_LOG_CAP) entries.
  pub async fn log_activity(
    &self,
    severity: Severity,
    action: &str,
    actor: &str,
  ) -> Result<AuditEntry> {
    self
      .store
      .append_audit(NewAuditEntry::new(severity, action, actor))
      .await
  }

  /// Admin-only: the retained activity log, newest-first.
  pub async fn audit_log(&self, session: &Session) -> Result<Vec<AuditEntry>> {
    session.require_role(Role::Admin)?;
    self.store.audit_log().await
  }

  /// Admin-only: aggregate counters for the overview page.
  pub async fn stats(&self, session: &Session) -> Result<PortalStats> {
    session.require_role(Role::Admin)?;
    self.store.stats().await
  }

  async fn audit(
    &self,
    severity: Severity,
    action: &str,
    actor: &str,
  ) -> Result<()> {
    self.log_activity(severity, action, actor).await.map(|_| ())
  }
}

fn require_nonblank(value: &str, field: &'static str) -> Result<()> {
  if value.trim().is_empty() {
    Err(Error::BlankField(field))
  } else {
    Ok(())
  }
}
