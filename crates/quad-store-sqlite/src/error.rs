//! Error type for `quad-store-sqlite`.
//!
//! Internal decode and database failures are fine-grained here and collapse
//! into [`quad_core::Error::Storage`] at the `PortalStore` boundary; domain
//! conditions (duplicate matric, already-resolved appointment) are raised as
//! their dedicated `quad_core` variants by `store.rs` and never pass through
//! this type.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("uuid parse error: {0}")]
  Uuid(#[from] uuid::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  /// A stored enum column held a value no codec recognises.
  #[error("unknown {column} value: {value:?}")]
  UnknownVariant { column: &'static str, value: String },
}

impl From<Error> for quad_core::Error {
  fn from(e: Error) -> Self { quad_core::Error::Storage(Box::new(e)) }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
