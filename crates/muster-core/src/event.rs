//! Event — the listing record users register against.
//!
//! Only `id` and `registered_count` matter to the registration and survey
//! core; `survey_questions` is read by the aggregator for its option
//! counts. Everything else is display payload the server stores and
//! returns verbatim. Structured payload it never interprets is carried as
//! raw [`serde_json::Value`] rather than being given its own types.

use serde::{Deserialize, Serialize};
use serde_json::Value;

use crate::{Error, Result, survey::SurveyQuestion};

fn empty_array() -> Value { Value::Array(Vec::new()) }

/// A stored event. Wire format is camelCase to match the browser client.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Event {
  /// Opaque creation-ordered token assigned by the store.
  pub id:               String,
  pub title:            String,
  pub start_time:       String,
  pub end_time:         Option<String>,
  pub location:         String,
  pub signup_deadline:  String,
  #[serde(default)]
  pub highlights:       Vec<String>,
  #[serde(default = "empty_array")]
  pub prizes:           Value,
  /// Materialised count of registration rows for this event. Written only
  /// by the registration ledger, inside the registration transaction.
  pub registered_count: i64,
  pub max_participants: Option<i64>,
  pub banner_url:       Option<String>,
  pub description:      Option<String>,
  pub replay_url:       Option<String>,
  pub agenda:           Option<Value>,
  pub target_audience:  Option<Value>,
  pub requirements:     Option<Value>,
  pub speakers:         Option<Value>,
  pub organizer:        Option<Value>,
  pub tags:             Option<Value>,
  pub difficulty:       Option<String>,
  pub benefits:         Option<Value>,
  #[serde(default)]
  pub survey_questions: Vec<SurveyQuestion>,
}

// ─── Creation ────────────────────────────────────────────────────────────────

/// Input to [`EventStore::create_event`](crate::store::EventStore::create_event).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewEvent {
  pub title:            String,
  pub start_time:       String,
  pub location:         String,
  pub signup_deadline:  String,
  #[serde(default)]
  pub highlights:       Vec<String>,
  #[serde(default = "empty_array")]
  pub prizes:           Value,
  pub description:      Option<String>,
  pub max_participants: Option<i64>,
  pub replay_url:       Option<String>,
  pub banner_url:       Option<String>,
  #[serde(default)]
  pub survey_questions: Vec<SurveyQuestion>,
}

impl NewEvent {
  /// Reject events whose required text fields are empty after trimming.
  pub fn validate(&self) -> Result<()> {
    for (field, value) in [
      ("title", &self.title),
      ("startTime", &self.start_time),
      ("location", &self.location),
      ("signupDeadline", &self.signup_deadline),
    ] {
      if value.trim().is_empty() {
        return Err(Error::Validation(format!("{field} is required")));
      }
    }
    Ok(())
  }
}

// ─── Partial update ──────────────────────────────────────────────────────────

/// Partial update for an event.
///
/// Every updatable column appears as an `Option`; absent fields are left
/// untouched. `id` and `registeredCount` have no counterpart here, so a
/// request can never patch them — the field list is the allow-list.
#[derive(Debug, Clone, Default, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct EventPatch {
  pub title:            Option<String>,
  pub start_time:       Option<String>,
  pub end_time:         Option<String>,
  pub location:         Option<String>,
  pub signup_deadline:  Option<String>,
  pub highlights:       Option<Vec<String>>,
  pub prizes:           Option<Value>,
  pub max_participants: Option<i64>,
  pub banner_url:       Option<String>,
  pub description:      Option<String>,
  pub replay_url:       Option<String>,
  pub agenda:           Option<Value>,
  pub target_audience:  Option<Value>,
  pub requirements:     Option<Value>,
  pub speakers:         Option<Value>,
  pub organizer:        Option<Value>,
  pub tags:             Option<Value>,
  pub difficulty:       Option<String>,
  pub benefits:         Option<Value>,
  pub survey_questions: Option<Vec<SurveyQuestion>>,
}

impl EventPatch {
  /// `true` when no field is set — such a patch is a validation error.
  pub fn is_empty(&self) -> bool {
    self.title.is_none()
      && self.start_time.is_none()
      && self.end_time.is_none()
      && self.location.is_none()
      && self.signup_deadline.is_none()
      && self.highlights.is_none()
      && self.prizes.is_none()
      && self.max_participants.is_none()
      && self.banner_url.is_none()
      && self.description.is_none()
      && self.replay_url.is_none()
      && self.agenda.is_none()
      && self.target_audience.is_none()
      && self.requirements.is_none()
      && self.speakers.is_none()
      && self.organizer.is_none()
      && self.tags.is_none()
      && self.difficulty.is_none()
      && self.benefits.is_none()
      && self.survey_questions.is_none()
  }
}

#[cfg(test)]
mod tests {
  use super::*;

  #[test]
  fn new_event_requires_nonblank_fields() {
    let input: NewEvent = serde_json::from_value(serde_json::json!({
      "title":          "  ",
      "startTime":      "2026-09-01T10:00:00Z",
      "location":       "Room 4",
      "signupDeadline": "2026-08-30T00:00:00Z",
    }))
    .unwrap();
    assert!(matches!(input.validate(), Err(Error::Validation(_))));
  }

  #[test]
  fn patch_ignores_unknown_and_protected_keys() {
    // `registeredCount` and `id` are not fields of the patch, so they are
    // dropped at deserialisation instead of reaching the store.
    let patch: EventPatch = serde_json::from_value(serde_json::json!({
      "id":              "hijack",
      "registeredCount": 9000,
      "title":           "renamed",
    }))
    .unwrap();
    assert_eq!(patch.title.as_deref(), Some("renamed"));
    assert!(!patch.is_empty());
  }

  #[test]
  fn empty_patch_detected() {
    let patch: EventPatch = serde_json::from_value(serde_json::json!({})).unwrap();
    assert!(patch.is_empty());
  }
}
