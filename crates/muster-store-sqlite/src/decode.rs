//! Decoding helpers between SQLite rows and the core domain types.
//!
//! Timestamps are stored as RFC 3339 strings. List and structured columns
//! are stored as compact JSON text; opaque payload columns are parsed back
//! into [`serde_json::Value`] without interpretation.

use chrono::{DateTime, Utc};
use muster_core::{
  event::Event,
  registration::Registration,
  survey::SurveyResponse,
};
use serde_json::Value;

use crate::{Error, Result};

// ─── DateTime<Utc> ───────────────────────────────────────────────────────────

pub fn encode_dt(dt: DateTime<Utc>) -> String { dt.to_rfc3339() }

pub fn decode_dt(s: &str) -> Result<DateTime<Utc>> {
  DateTime::parse_from_rfc3339(s)
    .map(|dt| dt.with_timezone(&Utc))
    .map_err(|e| Error::DateParse(e.to_string()))
}

// ─── JSON columns ────────────────────────────────────────────────────────────

fn decode_opaque(s: Option<String>) -> Result<Option<Value>> {
  s.as_deref().map(serde_json::from_str).transpose().map_err(Error::Json)
}

// ─── Row types ───────────────────────────────────────────────────────────────

/// Column list matching [`RawEvent::from_row`]'s positional reads.
pub const EVENT_COLUMNS: &str = "event_id, title, start_time, end_time, \
   location, signup_deadline, highlights, prizes, registered_count, \
   max_participants, banner_url, description, replay_url, agenda, \
   target_audience, requirements, speakers, organizer, tags, difficulty, \
   benefits, survey_questions";

/// Raw strings read directly from an `events` row.
pub struct RawEvent {
  pub event_id:         String,
  pub title:            String,
  pub start_time:       String,
  pub end_time:         Option<String>,
  pub location:         String,
  pub signup_deadline:  String,
  pub highlights:       String,
  pub prizes:           String,
  pub registered_count: i64,
  pub max_participants: Option<i64>,
  pub banner_url:       Option<String>,
  pub description:      Option<String>,
  pub replay_url:       Option<String>,
  pub agenda:           Option<String>,
  pub target_audience:  Option<String>,
  pub requirements:     Option<String>,
  pub speakers:         Option<String>,
  pub organizer:        Option<String>,
  pub tags:             Option<String>,
  pub difficulty:       Option<String>,
  pub benefits:         Option<String>,
  pub survey_questions: String,
}

impl RawEvent {
  /// Positional read over [`EVENT_COLUMNS`].
  pub fn from_row(row: &rusqlite::Row<'_>) -> rusqlite::Result<Self> {
    Ok(Self {
      event_id:         row.get(0)?,
      title:            row.get(1)?,
      start_time:       row.get(2)?,
      end_time:         row.get(3)?,
      location:         row.get(4)?,
      signup_deadline:  row.get(5)?,
      highlights:       row.get(6)?,
      prizes:           row.get(7)?,
      registered_count: row.get(8)?,
      max_participants: row.get(9)?,
      banner_url:       row.get(10)?,
      description:      row.get(11)?,
      replay_url:       row.get(12)?,
      agenda:           row.get(13)?,
      target_audience:  row.get(14)?,
      requirements:     row.get(15)?,
      speakers:         row.get(16)?,
      organizer:        row.get(17)?,
      tags:             row.get(18)?,
      difficulty:       row.get(19)?,
      benefits:         row.get(20)?,
      survey_questions: row.get(21)?,
    })
  }

  pub fn into_event(self) -> Result<Event> {
    Ok(Event {
      id:               self.event_id,
      title:            self.title,
      start_time:       self.start_time,
      end_time:         self.end_time,
      location:         self.location,
      signup_deadline:  self.signup_deadline,
      highlights:       serde_json::from_str(&self.highlights)?,
      prizes:           serde_json::from_str(&self.prizes)?,
      registered_count: self.registered_count,
      max_participants: self.max_participants,
      banner_url:       self.banner_url,
      description:      self.description,
      replay_url:       self.replay_url,
      agenda:           decode_opaque(self.agenda)?,
      target_audience:  decode_opaque(self.target_audience)?,
      requirements:     decode_opaque(self.requirements)?,
      speakers:         decode_opaque(self.speakers)?,
      organizer:        decode_opaque(self.organizer)?,
      tags:             decode_opaque(self.tags)?,
      difficulty:       self.difficulty,
      benefits:         decode_opaque(self.benefits)?,
      survey_questions: serde_json::from_str(&self.survey_questions)?,
    })
  }
}

/// Raw strings read directly from a `registrations` row.
pub struct RawRegistration {
  pub registration_id: i64,
  pub event_id:        String,
  pub name:            String,
  pub department:      String,
  pub registered_at:   String,
}

impl RawRegistration {
  pub fn into_registration(self) -> Result<Registration> {
    Ok(Registration {
      id:            self.registration_id,
      event_id:      self.event_id,
      name:          self.name,
      department:    self.department,
      registered_at: decode_dt(&self.registered_at)?,
    })
  }
}

/// Raw strings read directly from a `survey_responses` row.
pub struct RawSurveyResponse {
  pub event_id:     String,
  pub user_id:      String,
  pub answers:      String,
  pub submitted_at: String,
}

impl RawSurveyResponse {
  pub fn into_response(self) -> Result<SurveyResponse> {
    Ok(SurveyResponse {
      event_id:     self.event_id,
      user_id:      self.user_id,
      answers:      serde_json::from_str(&self.answers)?,
      submitted_at: decode_dt(&self.submitted_at)?,
    })
  }
}
