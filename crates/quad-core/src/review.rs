//! Student reviews of lecturers and food vendors.
//!
//! Reviews are immutable once submitted; the only mutation is an admin
//! delete. The rating range is enforced before anything touches the store.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use uuid::Uuid;

use crate::{Error, Result};

pub const MIN_RATING: u8 = 1;
pub const MAX_RATING: u8 = 5;

/// What kind of entity a review is about.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum TargetKind {
  Lecturer,
  Vendor,
}

/// A submitted review. `student_name` and `target_name` are denormalised at
/// submission time.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Review {
  pub review_id:    Uuid,
  pub student_id:   Uuid,
  pub student_name: String,
  pub target_kind:  TargetKind,
  pub target_id:    Uuid,
  pub target_name:  String,
  /// Stars, `1..=5` inclusive.
  pub rating:       u8,
  pub comment:      String,
  pub created_at:   DateTime<Utc>,
}

/// What a student supplies when reviewing. Identity comes from the session.
#[derive(Debug, Clone, Deserialize)]
pub struct ReviewSubmission {
  pub target_kind: TargetKind,
  pub target_id:   Uuid,
  pub target_name: String,
  pub rating:      u8,
  #[serde(default)]
  pub comment:     String,
}

impl ReviewSubmission {
  /// Reject ratings outside `MIN_RATING..=MAX_RATING`.
  pub fn validate(&self) -> Result<()> {
    if (MIN_RATING..=MAX_RATING).contains(&self.rating) {
      Ok(())
    } else {
      Err(Error::InvalidRating(self.rating))
    }
  }
}

/// Input to [`PortalStore::add_review`](crate::store::PortalStore::add_review).
#[derive(Debug, Clone)]
pub struct NewReview {
  pub student_id:   Uuid,
  pub student_name: String,
  pub target_kind:  TargetKind,
  pub target_id:    Uuid,
  pub target_name:  String,
  pub rating:       u8,
  pub comment:      String,
}
