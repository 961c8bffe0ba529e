//! Reviewable reference entities: lecturers and food vendors.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Lecturers seeded into an empty store so the review pages are usable
/// before an admin has entered any.
pub const DEFAULT_LECTURERS: [(&str, &str); 4] = [
  ("Prof. A. Adeyemi", "Computer Science"),
  ("Dr. N. Okafor", "Mathematics"),
  ("Dr. F. Balogun", "Physics"),
  ("Mrs. H. Lawal", "English"),
];

/// Vendors seeded into an empty store.
pub const DEFAULT_VENDORS: [(&str, &str); 3] = [
  ("Mama Put Kitchen", "Cafeteria 1"),
  ("Campus Bites", "Student Union Building"),
  ("Fresh Juice Corner", "Faculty of Science"),
];

// ─── Entities ─────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Lecturer {
  pub lecturer_id: Uuid,
  pub name:        String,
  pub department:  String,
  pub created_at:  DateTime<Utc>,
}

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Vendor {
  pub vendor_id:  Uuid,
  pub name:       String,
  pub location:   String,
  pub created_at: DateTime<Utc>,
}

// ─── Inputs ───────────────────────────────────────────────────────────────────

#[derive(Debug, Clone, Deserialize)]
pub struct NewLecturer {
  pub name:       String,
  pub department: String,
}

#[derive(Debug, Clone, Deserialize)]
pub struct NewVendor {
  pub name:     String,
  pub location: String,
}
