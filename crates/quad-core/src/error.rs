//! Error types for `quad-core`.

use thiserror::Error;
use uuid::Uuid;

use crate::{account::Role, appointment::AppointmentStatus};

#[derive(Debug, Error)]
pub enum Error {
  #[error("account not found: {0}")]
  AccountNotFound(Uuid),

  #[error("no student with matric number {0}")]
  UnknownMatric(String),

  #[error("matric number {0} is already registered")]
  DuplicateMatric(String),

  #[error("invalid credentials")]
  InvalidCredentials,

  #[error("operation requires the {required} role")]
  Forbidden { required: Role },

  #[error("appointment not found: {0}")]
  AppointmentNotFound(Uuid),

  #[error("appointment {id} is already {status}")]
  AlreadyResolved {
    id:     Uuid,
    status: AppointmentStatus,
  },

  #[error("review not found: {0}")]
  ReviewNotFound(Uuid),

  #[error("lecturer not found: {0}")]
  LecturerNotFound(Uuid),

  #[error("vendor not found: {0}")]
  VendorNotFound(Uuid),

  #[error("rating must be between 1 and 5, got {0}")]
  InvalidRating(u8),

  #[error("{0} must not be blank")]
  BlankField(&'static str),

  #[error("credential hashing failed: {0}")]
  Credential(String),

  #[error("storage error: {0}")]
  Storage(#[source] Box<dyn std::error::Error + Send + Sync>),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
