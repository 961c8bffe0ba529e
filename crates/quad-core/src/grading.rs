//! Grade points and GPA computation.
//!
//! The scale is the 5-point system: A=5 down to F=0. A GPA is the unit-
//! weighted mean of the grade points, rounded to two decimals. Rows with
//! non-positive units are excluded from the sums but kept in the stored
//! record, so a saved calculation shows exactly what the student entered.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

// ─── Grades ───────────────────────────────────────────────────────────────────

/// Letter grades on the 5-point scale.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum Grade {
  A,
  B,
  C,
  D,
  E,
  F,
}

impl Grade {
  pub fn points(self) -> u32 {
    match self {
      Self::A => 5,
      Self::B => 4,
      Self::C => 3,
      Self::D => 2,
      Self::E => 1,
      Self::F => 0,
    }
  }
}

/// One course row in a GPA computation.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Course {
  pub code:  String,
  /// Credit units. Non-positive values are retained in the record but
  /// contribute nothing to the GPA.
  pub units: i32,
  pub grade: Grade,
}

// ─── Computation ──────────────────────────────────────────────────────────────

/// Round to two decimals, half away from zero.
pub fn round2(x: f64) -> f64 { (x * 100.0).round() / 100.0 }

/// Unit-weighted GPA over `courses`. Returns `0.0` when no row has positive
/// units.
pub fn compute_gpa(courses: &[Course]) -> f64 {
  let mut total_points = 0_i64;
  let mut total_units = 0_i64;

  for course in courses {
    if course.units <= 0 {
      continue;
    }
    total_points += i64::from(course.grade.points()) * i64::from(course.units);
    total_units += i64::from(course.units);
  }

  if total_units == 0 {
    return 0.0;
  }
  round2(total_points as f64 / total_units as f64)
}

// ─── Records ──────────────────────────────────────────────────────────────────

/// The outcome of one GPA computation, kept as append-only history. Earlier
/// records are never revised.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GpaRecord {
  pub record_id:  Uuid,
  pub student_id: Uuid,
  /// Display label, e.g. `1st Semester 2023/2024` or the generated
  /// `Calculation N`.
  pub semester:   String,
  pub courses:    Vec<Course>,
  pub gpa:        f64,
  pub created_at: DateTime<Utc>,
}

/// Input to [`PortalStore::add_gpa_record`](crate::store::PortalStore::add_gpa_record).
#[derive(Debug, Clone)]
pub struct NewGpaRecord {
  pub student_id: Uuid,
  pub semester:   String,
  pub courses:    Vec<Course>,
  pub gpa:        f64,
}
