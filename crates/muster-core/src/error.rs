//! Error taxonomy for `muster-core`.
//!
//! Storage backends translate their own failures into these variants so
//! higher layers can map them to transport responses without inspecting
//! backend-specific error strings.

use thiserror::Error;

#[derive(Debug, Error)]
pub enum Error {
  /// A required field was missing or empty after trimming. Raised before
  /// any storage call.
  #[error("{0}")]
  Validation(String),

  /// The (event, name, department) triple already has a registration row.
  /// A recoverable user-facing condition, not a system fault.
  #[error("already registered for this event")]
  DuplicateRegistration,

  #[error("event not found: {0}")]
  EventNotFound(String),

  #[error("serialization error: {0}")]
  Serialization(#[from] serde_json::Error),

  /// Any storage-layer failure that is not one of the conditions above.
  #[error("persistence failure: {0}")]
  Persistence(String),
}

pub type Result<T, E = Error> = std::result::Result<T, E>;
