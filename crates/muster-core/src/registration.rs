//! Registration — a claimed attendance slot, identified by the declared
//! name and department. Rows are created by the ledger, never updated, and
//! removed only when their event is deleted.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Registration {
  pub id:            i64,
  pub event_id:      String,
  pub name:          String,
  pub department:    String,
  /// Server-assigned; orders the most-recent-first listing.
  pub registered_at: DateTime<Utc>,
}

/// Input to [`EventStore::register`](crate::store::EventStore::register).
#[derive(Debug, Clone, Deserialize)]
pub struct NewRegistration {
  pub name:       String,
  pub department: String,
}

impl NewRegistration {
  /// Trim both fields and reject the registration if either is empty.
  /// Runs before any storage call.
  pub fn validated(self) -> Result<Self> {
    let name = self.name.trim().to_owned();
    let department = self.department.trim().to_owned();
    if name.is_empty() {
      return Err(Error::Validation("name is required".into()));
    }
    if department.is_empty() {
      return Err(Error::Validation("department is required".into()));
    }
    Ok(Self { name, department })
  }
}
