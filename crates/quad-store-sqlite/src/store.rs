//! [`SqliteStore`] — the SQLite implementation of [`PortalStore`].

use std::path::Path;

use chrono::Utc;
use rusqlite::OptionalExtension as _;
use uuid::Uuid;

use quad_core::{
  Result as CoreResult,
  account::{Account, AccountRecord, NewAccount, ProfileUpdate, Role},
  appointment::{Appointment, AppointmentStatus, NewAppointment, Resolution},
  audit::{AUDIT_LOG_CAP, AuditEntry, NewAuditEntry},
  grading::{GpaRecord, NewGpaRecord},
  reference::{
    DEFAULT_LECTURERS, DEFAULT_VENDORS, Lecturer, NewLecturer, NewVendor,
    Vendor,
  },
  review::{NewReview, Review, TargetKind},
  store::{PortalStats, PortalStore, StudentFilter},
};

use crate::{
  Error, Result,
  encode::{
    RawAccount, RawAppointment, RawAuditEntry, RawGpaRecord, RawLecturer,
    RawReview, RawVendor, decode_status, encode_courses, encode_dt,
    encode_reason, encode_severity, encode_status, encode_target_kind,
    encode_uuid,
  },
  schema::SCHEMA,
};

// ─── Row mappers ─────────────────────────────────────────────────────────────

const ACCOUNT_COLUMNS: &str = "account_id, full_name, matric, email, \
                               credential_hash, phone, avatar_url, \
                               department, faculty, created_at";

fn account_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawAccount> {
  Ok(RawAccount {
    account_id:      row.get(0)?,
    full_name:       row.get(1)?,
    matric:          row.get(2)?,
    email:           row.get(3)?,
    credential_hash: row.get(4)?,
    phone:           row.get(5)?,
    avatar_url:      row.get(6)?,
    department:      row.get(7)?,
    faculty:         row.get(8)?,
    created_at:      row.get(9)?,
  })
}

const APPOINTMENT_COLUMNS: &str = "appointment_id, student_id, student_name, \
                                   student_matric, reason, date, time, note, \
                                   status, created_at";

fn appointment_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawAppointment> {
  Ok(RawAppointment {
    appointment_id: row.get(0)?,
    student_id:     row.get(1)?,
    student_name:   row.get(2)?,
    student_matric: row.get(3)?,
    reason:         row.get(4)?,
    date:           row.get(5)?,
    time:           row.get(6)?,
    note:           row.get(7)?,
    status:         row.get(8)?,
    created_at:     row.get(9)?,
  })
}

const REVIEW_COLUMNS: &str = "review_id, student_id, student_name, \
                              target_kind, target_id, target_name, rating, \
                              comment, created_at";

fn review_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawReview> {
  Ok(RawReview {
    review_id:    row.get(0)?,
    student_id:   row.get(1)?,
    student_name: row.get(2)?,
    target_kind:  row.get(3)?,
    target_id:    row.get(4)?,
    target_name:  row.get(5)?,
    rating:       row.get(6)?,
    comment:      row.get(7)?,
    created_at:   row.get(8)?,
  })
}

fn gpa_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<RawGpaRecord> {
  Ok(RawGpaRecord {
    record_id:    row.get(0)?,
    student_id:   row.get(1)?,
    semester:     row.get(2)?,
    courses_json: row.get(3)?,
    gpa:          row.get(4)?,
    created_at:   row.get(5)?,
  })
}

/// Outcome of the guarded status update inside one connection call.
enum ResolveRow {
  Missing,
  Already(String),
  Updated(RawAppointment),
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A Quad portal store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted. All
/// database work is serialised on the connection's dedicated thread, so an
/// operation either fully applies or fails without partial effects.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Insert the default lecturer and vendor lists, but only into a store
  /// whose reference tables are both empty.
  pub async fn seed_reference_data(&self) -> Result<()> {
    let lecturers: Vec<(String, String, String, String)> = DEFAULT_LECTURERS
      .iter()
      .map(|(name, department)| {
        (
          encode_uuid(Uuid::new_v4()),
          (*name).to_string(),
          (*department).to_string(),
          encode_dt(Utc::now()),
        )
      })
      .collect();
    let vendors: Vec<(String, String, String, String)> = DEFAULT_VENDORS
      .iter()
      .map(|(name, location)| {
        (
          encode_uuid(Uuid::new_v4()),
          (*name).to_string(),
          (*location).to_string(),
          encode_dt(Utc::now()),
        )
      })
      .collect();

    self
      .conn
      .call(move |conn| {
        let existing: i64 = conn.query_row(
          "SELECT (SELECT COUNT(*) FROM lecturers)
                + (SELECT COUNT(*) FROM vendors)",
          [],
          |r| r.get(0),
        )?;
        if existing > 0 {
          return Ok(());
        }

        for (id, name, department, at) in lecturers {
          conn.execute(
            "INSERT INTO lecturers (lecturer_id, name, department, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![id, name, department, at],
          )?;
        }
        for (id, name, location, at) in vendors {
          conn.execute(
            "INSERT INTO vendors (vendor_id, name, location, created_at)
             VALUES (?1, ?2, ?3, ?4)",
            rusqlite::params![id, name, location, at],
          )?;
        }
        Ok(())
      })
      .await?;
    Ok(())
  }
}

// ─── PortalStore impl ────────────────────────────────────────────────────────

impl PortalStore for SqliteStore {
  // ── Accounts ──────────────────────────────────────────────────────────────

  async fn add_account(&self, input: NewAccount) -> CoreResult<Account> {
    let account = Account {
      account_id: Uuid::new_v4(),
      role:       Role::Student,
      full_name:  input.full_name,
      matric:     Some(input.matric),
      email:      input.email,
      phone:      input.phone,
      avatar_url: input.avatar_url,
      department: input.department,
      faculty:    input.faculty,
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(account.account_id);
    let full_name = account.full_name.clone();
    let matric = account.matric.clone().unwrap_or_default();
    let email = account.email.clone();
    let hash = input.credential_hash;
    let phone = account.phone.clone();
    let avatar_url = account.avatar_url.clone();
    let department = account.department.clone();
    let faculty = account.faculty.clone();
    let at_str = encode_dt(account.created_at);

    let matric_check = matric.clone();
    let inserted: bool = self
      .conn
      .call(move |conn| {
        let taken: bool = conn
          .query_row(
            "SELECT 1 FROM accounts WHERE matric = ?1",
            rusqlite::params![matric_check],
            |_| Ok(true),
          )
          .optional()?
          .unwrap_or(false);
        if taken {
          return Ok(false);
        }

        conn.execute(
          "INSERT INTO accounts (
             account_id, full_name, matric, email, credential_hash,
             phone, avatar_url, department, faculty, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str, full_name, matric, email, hash, phone, avatar_url,
            department, faculty, at_str,
          ],
        )?;
        Ok(true)
      })
      .await
      .map_err(Error::Database)?;

    if !inserted {
      return Err(quad_core::Error::DuplicateMatric(
        account.matric.unwrap_or_default(),
      ));
    }
    Ok(account)
  }

  async fn get_account(&self, id: Uuid) -> CoreResult<Option<Account>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = ?1"
              ),
              rusqlite::params![id_str],
              account_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    Ok(raw.map(RawAccount::into_account).transpose()?)
  }

  async fn find_student_by_matric<'a>(
    &'a self,
    matric: &'a str,
  ) -> CoreResult<Option<AccountRecord>> {
    let matric = matric.to_string();

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE matric = ?1"
              ),
              rusqlite::params![matric],
              account_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    Ok(raw.map(RawAccount::into_record).transpose()?)
  }

  async fn list_students<'a>(
    &'a self,
    filter: &'a StudentFilter,
  ) -> CoreResult<Vec<Account>> {
    let pattern = filter
      .text
      .as_deref()
      .map(|t| format!("%{}%", t.to_lowercase()));

    let raws: Vec<RawAccount> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(p) = pattern {
          let mut stmt = conn.prepare(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts
             WHERE lower(full_name) LIKE ?1
                OR lower(matric)    LIKE ?1
                OR lower(email)     LIKE ?1
             ORDER BY created_at DESC, rowid DESC"
          ))?;
          stmt
            .query_map(rusqlite::params![p], account_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {ACCOUNT_COLUMNS} FROM accounts
             ORDER BY created_at DESC, rowid DESC"
          ))?;
          stmt
            .query_map([], account_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    Ok(
      raws
        .into_iter()
        .map(RawAccount::into_account)
        .collect::<Result<_>>()?,
    )
  }

  async fn update_profile(
    &self,
    id: Uuid,
    update: ProfileUpdate,
  ) -> CoreResult<Option<Account>> {
    let id_str = encode_uuid(id);

    let raw: Option<RawAccount> = self
      .conn
      .call(move |conn| {
        // COALESCE keeps the stored value for fields left None.
        let changed = conn.execute(
          "UPDATE accounts SET
             full_name  = COALESCE(?2, full_name),
             email      = COALESCE(?3, email),
             phone      = COALESCE(?4, phone),
             avatar_url = COALESCE(?5, avatar_url)
           WHERE account_id = ?1",
          rusqlite::params![
            id_str,
            update.full_name,
            update.email,
            update.phone,
            update.avatar_url,
          ],
        )?;
        if changed == 0 {
          return Ok(None);
        }

        Ok(
          conn
            .query_row(
              &format!(
                "SELECT {ACCOUNT_COLUMNS} FROM accounts WHERE account_id = ?1"
              ),
              rusqlite::params![id_str],
              account_row,
            )
            .optional()?,
        )
      })
      .await
      .map_err(Error::Database)?;

    Ok(raw.map(RawAccount::into_account).transpose()?)
  }

  async fn set_credential_hash(
    &self,
    id: Uuid,
    hash: String,
  ) -> CoreResult<bool> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "UPDATE accounts SET credential_hash = ?2 WHERE account_id = ?1",
          rusqlite::params![id_str, hash],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    Ok(changed > 0)
  }

  async fn delete_account(&self, id: Uuid) -> CoreResult<bool> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM accounts WHERE account_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    Ok(changed > 0)
  }

  // ── Appointments ──────────────────────────────────────────────────────────

  async fn add_appointment(
    &self,
    input: NewAppointment,
  ) -> CoreResult<Appointment> {
    let appointment = Appointment {
      appointment_id: Uuid::new_v4(),
      student_id:     input.student_id,
      student_name:   input.student_name,
      student_matric: input.student_matric,
      reason:         input.reason,
      date:           input.date,
      time:           input.time,
      note:           input.note,
      status:         AppointmentStatus::Pending,
      created_at:     Utc::now(),
    };

    let id_str = encode_uuid(appointment.appointment_id);
    let student_id_str = encode_uuid(appointment.student_id);
    let student_name = appointment.student_name.clone();
    let student_matric = appointment.student_matric.clone();
    let reason = encode_reason(appointment.reason).to_owned();
    let date = appointment.date.clone();
    let time = appointment.time.clone();
    let note = appointment.note.clone();
    let status = encode_status(appointment.status).to_owned();
    let at_str = encode_dt(appointment.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO appointments (
             appointment_id, student_id, student_name, student_matric,
             reason, date, time, note, status, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10)",
          rusqlite::params![
            id_str, student_id_str, student_name, student_matric, reason,
            date, time, note, status, at_str,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::Database)?;

    Ok(appointment)
  }

  async fn resolve_appointment(
    &self,
    id: Uuid,
    resolution: Resolution,
  ) -> CoreResult<Appointment> {
    let id_str = encode_uuid(id);
    let new_status =
      encode_status(AppointmentStatus::from(resolution)).to_owned();

    let outcome: ResolveRow = self
      .conn
      .call(move |conn| {
        // Guard and update run on the same serialised connection, so
        // the status cannot change between the two statements.
        let current: Option<String> = conn
          .query_row(
            "SELECT status FROM appointments WHERE appointment_id = ?1",
            rusqlite::params![id_str],
            |r| r.get(0),
          )
          .optional()?;

        let Some(current) = current else {
          return Ok(ResolveRow::Missing);
        };
        if current != "pending" {
          return Ok(ResolveRow::Already(current));
        }

        conn.execute(
          "UPDATE appointments SET status = ?2 WHERE appointment_id = ?1",
          rusqlite::params![id_str, new_status],
        )?;

        let raw = conn.query_row(
          &format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE appointment_id = ?1"
          ),
          rusqlite::params![id_str],
          appointment_row,
        )?;
        Ok(ResolveRow::Updated(raw))
      })
      .await
      .map_err(Error::Database)?;

    match outcome {
      ResolveRow::Missing => Err(quad_core::Error::AppointmentNotFound(id)),
      ResolveRow::Already(status) => Err(quad_core::Error::AlreadyResolved {
        id,
        status: decode_status(&status)?,
      }),
      ResolveRow::Updated(raw) => Ok(raw.into_appointment()?),
    }
  }

  async fn appointments_for(
    &self,
    student_id: Uuid,
  ) -> CoreResult<Vec<Appointment>> {
    let student_id_str = encode_uuid(student_id);

    let raws: Vec<RawAppointment> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {APPOINTMENT_COLUMNS} FROM appointments
           WHERE student_id = ?1
           ORDER BY created_at DESC, rowid DESC"
        ))?;
        let rows = stmt
          .query_map(rusqlite::params![student_id_str], appointment_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    Ok(
      raws
        .into_iter()
        .map(RawAppointment::into_appointment)
        .collect::<Result<_>>()?,
    )
  }

  async fn list_appointments(
    &self,
    status: Option<AppointmentStatus>,
  ) -> CoreResult<Vec<Appointment>> {
    let status_str = status.map(encode_status).map(str::to_owned);

    let raws: Vec<RawAppointment> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(s) = status_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             WHERE status = ?1
             ORDER BY created_at DESC, rowid DESC"
          ))?;
          stmt
            .query_map(rusqlite::params![s], appointment_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {APPOINTMENT_COLUMNS} FROM appointments
             ORDER BY created_at DESC, rowid DESC"
          ))?;
          stmt
            .query_map([], appointment_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    Ok(
      raws
        .into_iter()
        .map(RawAppointment::into_appointment)
        .collect::<Result<_>>()?,
    )
  }

  // ── Reviews ───────────────────────────────────────────────────────────────

  async fn add_review(&self, input: NewReview) -> CoreResult<Review> {
    let review = Review {
      review_id:    Uuid::new_v4(),
      student_id:   input.student_id,
      student_name: input.student_name,
      target_kind:  input.target_kind,
      target_id:    input.target_id,
      target_name:  input.target_name,
      rating:       input.rating,
      comment:      input.comment,
      created_at:   Utc::now(),
    };

    let id_str = encode_uuid(review.review_id);
    let student_id_str = encode_uuid(review.student_id);
    let student_name = review.student_name.clone();
    let kind = encode_target_kind(review.target_kind).to_owned();
    let target_id_str = encode_uuid(review.target_id);
    let target_name = review.target_name.clone();
    let rating = i64::from(review.rating);
    let comment = review.comment.clone();
    let at_str = encode_dt(review.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO reviews (
             review_id, student_id, student_name, target_kind, target_id,
             target_name, rating, comment, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9)",
          rusqlite::params![
            id_str, student_id_str, student_name, kind, target_id_str,
            target_name, rating, comment, at_str,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::Database)?;

    Ok(review)
  }

  async fn recent_reviews(
    &self,
    target_kind: Option<TargetKind>,
    limit: Option<usize>,
  ) -> CoreResult<Vec<Review>> {
    let kind_str = target_kind.map(encode_target_kind).map(str::to_owned);
    // SQLite treats a negative LIMIT as "no limit".
    let limit_val = limit.map(|l| l as i64).unwrap_or(-1);

    let raws: Vec<RawReview> = self
      .conn
      .call(move |conn| {
        let rows = if let Some(k) = kind_str {
          let mut stmt = conn.prepare(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews
             WHERE target_kind = ?1
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?2"
          ))?;
          stmt
            .query_map(rusqlite::params![k, limit_val], review_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        } else {
          let mut stmt = conn.prepare(&format!(
            "SELECT {REVIEW_COLUMNS} FROM reviews
             ORDER BY created_at DESC, rowid DESC
             LIMIT ?1"
          ))?;
          stmt
            .query_map(rusqlite::params![limit_val], review_row)?
            .collect::<rusqlite::Result<Vec<_>>>()?
        };
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    Ok(
      raws
        .into_iter()
        .map(RawReview::into_review)
        .collect::<Result<_>>()?,
    )
  }

  async fn delete_review(&self, id: Uuid) -> CoreResult<bool> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM reviews WHERE review_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    Ok(changed > 0)
  }

  // ── GPA history ───────────────────────────────────────────────────────────

  async fn add_gpa_record(
    &self,
    input: NewGpaRecord,
  ) -> CoreResult<GpaRecord> {
    let record = GpaRecord {
      record_id:  Uuid::new_v4(),
      student_id: input.student_id,
      semester:   input.semester,
      courses:    input.courses,
      gpa:        input.gpa,
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(record.record_id);
    let student_id_str = encode_uuid(record.student_id);
    let semester = record.semester.clone();
    let courses_json = encode_courses(&record.courses)?;
    let gpa = record.gpa;
    let at_str = encode_dt(record.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO gpa_records (
             record_id, student_id, semester, courses_json, gpa, created_at
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6)",
          rusqlite::params![
            id_str, student_id_str, semester, courses_json, gpa, at_str,
          ],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::Database)?;

    Ok(record)
  }

  async fn gpa_history(
    &self,
    student_id: Uuid,
  ) -> CoreResult<Vec<GpaRecord>> {
    let student_id_str = encode_uuid(student_id);

    let raws: Vec<RawGpaRecord> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT record_id, student_id, semester, courses_json, gpa,
                  created_at
           FROM gpa_records
           WHERE student_id = ?1
           ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![student_id_str], gpa_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    Ok(
      raws
        .into_iter()
        .map(RawGpaRecord::into_gpa_record)
        .collect::<Result<_>>()?,
    )
  }

  async fn list_gpa_records(&self) -> CoreResult<Vec<GpaRecord>> {
    let raws: Vec<RawGpaRecord> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT record_id, student_id, semester, courses_json, gpa,
                  created_at
           FROM gpa_records
           ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map([], gpa_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    Ok(
      raws
        .into_iter()
        .map(RawGpaRecord::into_gpa_record)
        .collect::<Result<_>>()?,
    )
  }

  // ── Reference data ────────────────────────────────────────────────────────

  async fn add_lecturer(&self, input: NewLecturer) -> CoreResult<Lecturer> {
    let lecturer = Lecturer {
      lecturer_id: Uuid::new_v4(),
      name:        input.name,
      department:  input.department,
      created_at:  Utc::now(),
    };

    let id_str = encode_uuid(lecturer.lecturer_id);
    let name = lecturer.name.clone();
    let department = lecturer.department.clone();
    let at_str = encode_dt(lecturer.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO lecturers (lecturer_id, name, department, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, department, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::Database)?;

    Ok(lecturer)
  }

  async fn list_lecturers(&self) -> CoreResult<Vec<Lecturer>> {
    let raws: Vec<RawLecturer> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT lecturer_id, name, department, created_at
           FROM lecturers
           ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawLecturer {
              lecturer_id: row.get(0)?,
              name:        row.get(1)?,
              department:  row.get(2)?,
              created_at:  row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    Ok(
      raws
        .into_iter()
        .map(RawLecturer::into_lecturer)
        .collect::<Result<_>>()?,
    )
  }

  async fn remove_lecturer(&self, id: Uuid) -> CoreResult<bool> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM lecturers WHERE lecturer_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    Ok(changed > 0)
  }

  async fn add_vendor(&self, input: NewVendor) -> CoreResult<Vendor> {
    let vendor = Vendor {
      vendor_id:  Uuid::new_v4(),
      name:       input.name,
      location:   input.location,
      created_at: Utc::now(),
    };

    let id_str = encode_uuid(vendor.vendor_id);
    let name = vendor.name.clone();
    let location = vendor.location.clone();
    let at_str = encode_dt(vendor.created_at);

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO vendors (vendor_id, name, location, created_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, location, at_str],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::Database)?;

    Ok(vendor)
  }

  async fn list_vendors(&self) -> CoreResult<Vec<Vendor>> {
    let raws: Vec<RawVendor> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT vendor_id, name, location, created_at
           FROM vendors
           ORDER BY created_at DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawVendor {
              vendor_id:  row.get(0)?,
              name:       row.get(1)?,
              location:   row.get(2)?,
              created_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    Ok(
      raws
        .into_iter()
        .map(RawVendor::into_vendor)
        .collect::<Result<_>>()?,
    )
  }

  async fn remove_vendor(&self, id: Uuid) -> CoreResult<bool> {
    let id_str = encode_uuid(id);

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          "DELETE FROM vendors WHERE vendor_id = ?1",
          rusqlite::params![id_str],
        )?)
      })
      .await
      .map_err(Error::Database)?;

    Ok(changed > 0)
  }

  // ── Audit log ─────────────────────────────────────────────────────────────

  async fn append_audit(
    &self,
    input: NewAuditEntry,
  ) -> CoreResult<AuditEntry> {
    let entry = AuditEntry {
      entry_id:    Uuid::new_v4(),
      severity:    input.severity,
      action:      input.action,
      actor:       input.actor,
      recorded_at: Utc::now(),
    };

    let id_str = encode_uuid(entry.entry_id);
    let severity = encode_severity(entry.severity).to_owned();
    let action = entry.action.clone();
    let actor = entry.actor.clone();
    let at_str = encode_dt(entry.recorded_at);
    let cap = AUDIT_LOG_CAP as i64;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO audit_log (entry_id, severity, action, actor, recorded_at)
           VALUES (?1, ?2, ?3, ?4, ?5)",
          rusqlite::params![id_str, severity, action, actor, at_str],
        )?;
        // Prune in the same call so the cap holds after every insert.
        conn.execute(
          "DELETE FROM audit_log WHERE entry_id NOT IN (
             SELECT entry_id FROM audit_log
             ORDER BY recorded_at DESC, rowid DESC
             LIMIT ?1
           )",
          rusqlite::params![cap],
        )?;
        Ok(())
      })
      .await
      .map_err(Error::Database)?;

    Ok(entry)
  }

  async fn audit_log(&self) -> CoreResult<Vec<AuditEntry>> {
    let raws: Vec<RawAuditEntry> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(
          "SELECT entry_id, severity, action, actor, recorded_at
           FROM audit_log
           ORDER BY recorded_at DESC, rowid DESC",
        )?;
        let rows = stmt
          .query_map([], |row| {
            Ok(RawAuditEntry {
              entry_id:    row.get(0)?,
              severity:    row.get(1)?,
              action:      row.get(2)?,
              actor:       row.get(3)?,
              recorded_at: row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await
      .map_err(Error::Database)?;

    Ok(
      raws
        .into_iter()
        .map(RawAuditEntry::into_entry)
        .collect::<Result<_>>()?,
    )
  }

  // ── Statistics ────────────────────────────────────────────────────────────

  async fn stats(&self) -> CoreResult<PortalStats> {
    let (students, appointments, pending, reviews): (i64, i64, i64, i64) =
      self
        .conn
        .call(|conn| {
          Ok(conn.query_row(
            "SELECT
               (SELECT COUNT(*) FROM accounts),
               (SELECT COUNT(*) FROM appointments),
               (SELECT COUNT(*) FROM appointments WHERE status = 'pending'),
               (SELECT COUNT(*) FROM reviews)",
            [],
            |r| Ok((r.get(0)?, r.get(1)?, r.get(2)?, r.get(3)?)),
          )?)
        })
        .await
        .map_err(Error::Database)?;

    let completion_rate = if appointments == 0 {
      0
    } else {
      let resolved = appointments - pending;
      ((resolved as f64 / appointments as f64) * 100.0).round() as u8
    };

    Ok(PortalStats {
      students: students as u64,
      appointments: appointments as u64,
      pending_appointments: pending as u64,
      reviews: reviews as u64,
      completion_rate,
    })
  }
}
