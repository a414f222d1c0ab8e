//! Error type for `muster-store-sqlite`.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  #[error("core error: {0}")]
  Core(#[from] muster_core::Error),

  #[error("database error: {0}")]
  Database(#[from] tokio_rusqlite::Error),

  #[error("json error: {0}")]
  Json(#[from] serde_json::Error),

  #[error("date/time parse error: {0}")]
  DateParse(String),

  #[error("event not found: {0}")]
  EventNotFound(String),

  /// The UNIQUE(event_id, name, department) constraint fired.
  #[error("already registered for this event")]
  DuplicateRegistration,
}

/// Collapse into the core taxonomy so the API layer can classify store
/// failures without depending on this crate.
impl From<Error> for muster_core::Error {
  fn from(e: Error) -> Self {
    match e {
      Error::Core(core) => core,
      Error::EventNotFound(id) => muster_core::Error::EventNotFound(id),
      Error::DuplicateRegistration => muster_core::Error::DuplicateRegistration,
      Error::Json(e) => muster_core::Error::Serialization(e),
      other => muster_core::Error::Persistence(other.to_string()),
    }
  }
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
