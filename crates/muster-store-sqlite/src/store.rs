//! [`SqliteStore`] — the SQLite implementation of [`EventStore`].

use std::{
  path::Path,
  sync::atomic::{AtomicI64, Ordering},
};

use chrono::Utc;
use rusqlite::OptionalExtension as _;

use muster_core::{
  event::{Event, EventPatch, NewEvent},
  registration::{NewRegistration, Registration},
  store::EventStore,
  survey::{self, NewSurveyResponse, QuestionStats, SurveyQuestion},
};

use crate::{
  Error, Result,
  decode::{
    EVENT_COLUMNS, RawEvent, RawRegistration, RawSurveyResponse, encode_dt,
  },
  schema::SCHEMA,
};

static LAST_EVENT_ID: AtomicI64 = AtomicI64::new(0);

/// Creation-ordered opaque token: the current UNIX millisecond count,
/// bumped past the previous token when two creations share a millisecond.
fn next_event_id() -> String {
  loop {
    let now = Utc::now().timestamp_millis();
    let last = LAST_EVENT_ID.load(Ordering::Relaxed);
    let candidate = now.max(last + 1);
    if LAST_EVENT_ID
      .compare_exchange(last, candidate, Ordering::Relaxed, Ordering::Relaxed)
      .is_ok()
    {
      return candidate.to_string();
    }
  }
}

/// `true` when `err` is a UNIQUE-constraint violation. The unique triple on
/// `registrations` is the race guard against concurrent duplicate
/// registrations, not an in-memory check.
fn is_unique_violation(err: &tokio_rusqlite::Error) -> bool {
  matches!(
    err,
    tokio_rusqlite::Error::Rusqlite(rusqlite::Error::SqliteFailure(e, _))
      if e.extended_code == rusqlite::ffi::SQLITE_CONSTRAINT_UNIQUE
  )
}

// ─── Store ───────────────────────────────────────────────────────────────────

/// A muster event store backed by a single SQLite file.
///
/// Cloning is cheap — the inner connection is reference-counted.
#[derive(Clone)]
pub struct SqliteStore {
  conn: tokio_rusqlite::Connection,
}

impl SqliteStore {
  /// Open (or create) a store at `path` and run schema initialisation.
  pub async fn open(path: impl AsRef<Path>) -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open(path).await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  /// Open an in-memory store — useful for testing.
  pub async fn open_in_memory() -> Result<Self> {
    let conn = tokio_rusqlite::Connection::open_in_memory().await?;
    let store = Self { conn };
    store.init_schema().await?;
    Ok(store)
  }

  async fn init_schema(&self) -> Result<()> {
    self
      .conn
      .call(|conn| {
        conn.execute_batch(SCHEMA)?;
        Ok(())
      })
      .await?;
    Ok(())
  }

  /// Load an event's survey question list, or the not-found condition.
  async fn event_questions(&self, event_id: &str) -> Result<Vec<SurveyQuestion>> {
    let id = event_id.to_owned();

    let json: Option<String> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              "SELECT survey_questions FROM events WHERE event_id = ?1",
              rusqlite::params![id],
              |row| row.get(0),
            )
            .optional()?,
        )
      })
      .await?;

    let json = json.ok_or_else(|| Error::EventNotFound(event_id.to_owned()))?;
    Ok(serde_json::from_str(&json)?)
  }
}

// ─── EventStore impl ─────────────────────────────────────────────────────────

impl EventStore for SqliteStore {
  type Error = Error;

  // ── Events ──────────────────────────────────────────────────────────────

  async fn create_event(&self, input: NewEvent) -> Result<Event> {
    input.validate().map_err(Error::Core)?;

    let event = Event {
      id:               next_event_id(),
      title:            input.title,
      start_time:       input.start_time,
      end_time:         None,
      location:         input.location,
      signup_deadline:  input.signup_deadline,
      highlights:       input.highlights,
      prizes:           input.prizes,
      registered_count: 0,
      max_participants: input.max_participants,
      banner_url:       input.banner_url,
      description:      input.description,
      replay_url:       input.replay_url,
      agenda:           None,
      target_audience:  None,
      requirements:     None,
      speakers:         None,
      organizer:        None,
      tags:             None,
      difficulty:       None,
      benefits:         None,
      survey_questions: input.survey_questions,
    };

    let id_str           = event.id.clone();
    let title            = event.title.clone();
    let start_time       = event.start_time.clone();
    let location         = event.location.clone();
    let signup_deadline  = event.signup_deadline.clone();
    let highlights_json  = serde_json::to_string(&event.highlights)?;
    let prizes_json      = serde_json::to_string(&event.prizes)?;
    let max_participants = event.max_participants;
    let banner_url       = event.banner_url.clone();
    let description      = event.description.clone();
    let replay_url       = event.replay_url.clone();
    let questions_json   = serde_json::to_string(&event.survey_questions)?;

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO events (
             event_id, title, start_time, location, signup_deadline,
             highlights, prizes, registered_count, max_participants,
             banner_url, description, replay_url, survey_questions
           ) VALUES (?1, ?2, ?3, ?4, ?5, ?6, ?7, ?8, ?9, ?10, ?11, ?12, ?13)",
          rusqlite::params![
            id_str,
            title,
            start_time,
            location,
            signup_deadline,
            highlights_json,
            prizes_json,
            0i64,
            max_participants,
            banner_url,
            description,
            replay_url,
            questions_json,
          ],
        )?;
        Ok(())
      })
      .await?;

    Ok(event)
  }

  async fn get_event(&self, id: &str) -> Result<Option<Event>> {
    let id_str = id.to_owned();

    let raw: Option<RawEvent> = self
      .conn
      .call(move |conn| {
        Ok(
          conn
            .query_row(
              &format!("SELECT {EVENT_COLUMNS} FROM events WHERE event_id = ?1"),
              rusqlite::params![id_str],
              RawEvent::from_row,
            )
            .optional()?,
        )
      })
      .await?;

    raw.map(RawEvent::into_event).transpose()
  }

  async fn list_events(&self) -> Result<Vec<Event>> {
    let raws: Vec<RawEvent> = self
      .conn
      .call(|conn| {
        let mut stmt = conn.prepare(&format!(
          "SELECT {EVENT_COLUMNS} FROM events ORDER BY event_id DESC"
        ))?;
        let rows = stmt
          .query_map([], RawEvent::from_row)?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws.into_iter().map(RawEvent::into_event).collect()
  }

  async fn update_event(&self, id: &str, patch: EventPatch) -> Result<Event> {
    if patch.is_empty() {
      return Err(Error::Core(muster_core::Error::Validation(
        "no fields to update".into(),
      )));
    }

    // Assemble SET clauses from the patch's known columns only. Request
    // keys never reach the SQL text.
    let mut sets: Vec<&'static str> = Vec::new();
    let mut values: Vec<Box<dyn rusqlite::ToSql + Send>> = Vec::new();

    if let Some(v) = patch.title { sets.push("title = ?"); values.push(Box::new(v)); }
    if let Some(v) = patch.start_time { sets.push("start_time = ?"); values.push(Box::new(v)); }
    if let Some(v) = patch.end_time { sets.push("end_time = ?"); values.push(Box::new(v)); }
    if let Some(v) = patch.location { sets.push("location = ?"); values.push(Box::new(v)); }
    if let Some(v) = patch.signup_deadline { sets.push("signup_deadline = ?"); values.push(Box::new(v)); }
    if let Some(v) = patch.highlights { sets.push("highlights = ?"); values.push(Box::new(serde_json::to_string(&v)?)); }
    if let Some(v) = patch.prizes { sets.push("prizes = ?"); values.push(Box::new(serde_json::to_string(&v)?)); }
    if let Some(v) = patch.max_participants { sets.push("max_participants = ?"); values.push(Box::new(v)); }
    if let Some(v) = patch.banner_url { sets.push("banner_url = ?"); values.push(Box::new(v)); }
    if let Some(v) = patch.description { sets.push("description = ?"); values.push(Box::new(v)); }
    if let Some(v) = patch.replay_url { sets.push("replay_url = ?"); values.push(Box::new(v)); }
    if let Some(v) = patch.agenda { sets.push("agenda = ?"); values.push(Box::new(serde_json::to_string(&v)?)); }
    if let Some(v) = patch.target_audience { sets.push("target_audience = ?"); values.push(Box::new(serde_json::to_string(&v)?)); }
    if let Some(v) = patch.requirements { sets.push("requirements = ?"); values.push(Box::new(serde_json::to_string(&v)?)); }
    if let Some(v) = patch.speakers { sets.push("speakers = ?"); values.push(Box::new(serde_json::to_string(&v)?)); }
    if let Some(v) = patch.organizer { sets.push("organizer = ?"); values.push(Box::new(serde_json::to_string(&v)?)); }
    if let Some(v) = patch.tags { sets.push("tags = ?"); values.push(Box::new(serde_json::to_string(&v)?)); }
    if let Some(v) = patch.difficulty { sets.push("difficulty = ?"); values.push(Box::new(v)); }
    if let Some(v) = patch.benefits { sets.push("benefits = ?"); values.push(Box::new(serde_json::to_string(&v)?)); }
    if let Some(v) = patch.survey_questions { sets.push("survey_questions = ?"); values.push(Box::new(serde_json::to_string(&v)?)); }

    let sql = format!("UPDATE events SET {} WHERE event_id = ?", sets.join(", "));
    values.push(Box::new(id.to_owned()));

    let changed = self
      .conn
      .call(move |conn| {
        Ok(conn.execute(
          &sql,
          rusqlite::params_from_iter(values.iter().map(|v| v.as_ref())),
        )?)
      })
      .await?;

    if changed == 0 {
      return Err(Error::EventNotFound(id.to_owned()));
    }

    self
      .get_event(id)
      .await?
      .ok_or_else(|| Error::EventNotFound(id.to_owned()))
  }

  async fn delete_event(&self, id: &str) -> Result<()> {
    let id_str = id.to_owned();

    let deleted: usize = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "DELETE FROM registrations WHERE event_id = ?1",
          rusqlite::params![id_str],
        )?;
        tx.execute(
          "DELETE FROM survey_responses WHERE event_id = ?1",
          rusqlite::params![id_str],
        )?;
        let deleted = tx.execute(
          "DELETE FROM events WHERE event_id = ?1",
          rusqlite::params![id_str],
        )?;
        if deleted == 0 {
          // Dropping the transaction rolls the child deletes back.
          return Ok(0);
        }
        tx.commit()?;
        Ok(deleted)
      })
      .await?;

    if deleted == 0 {
      return Err(Error::EventNotFound(id.to_owned()));
    }
    Ok(())
  }

  // ── Registration ledger ─────────────────────────────────────────────────

  async fn register(&self, event_id: &str, input: NewRegistration) -> Result<i64> {
    let input = input.validated().map_err(Error::Core)?;

    let id_str        = event_id.to_owned();
    let name          = input.name;
    let department    = input.department;
    let registered_at = encode_dt(Utc::now());

    let count: i64 = self
      .conn
      .call(move |conn| {
        let tx = conn.transaction()?;
        tx.execute(
          "INSERT INTO registrations (event_id, name, department, registered_at)
           VALUES (?1, ?2, ?3, ?4)",
          rusqlite::params![id_str, name, department, registered_at],
        )?;
        tx.execute(
          "UPDATE events SET registered_count = registered_count + 1
           WHERE event_id = ?1",
          rusqlite::params![id_str],
        )?;
        let count: i64 = tx.query_row(
          "SELECT registered_count FROM events WHERE event_id = ?1",
          rusqlite::params![id_str],
          |row| row.get(0),
        )?;
        tx.commit()?;
        Ok(count)
      })
      .await
      .map_err(|e| {
        if is_unique_violation(&e) {
          Error::DuplicateRegistration
        } else {
          Error::Database(e)
        }
      })?;

    Ok(count)
  }

  async fn list_registrations(&self, event_id: &str) -> Result<Vec<Registration>> {
    let id_str = event_id.to_owned();

    let raws: Vec<RawRegistration> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT registration_id, event_id, name, department, registered_at
           FROM registrations
           WHERE event_id = ?1
           ORDER BY registered_at DESC, registration_id DESC",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawRegistration {
              registration_id: row.get(0)?,
              event_id:        row.get(1)?,
              name:            row.get(2)?,
              department:      row.get(3)?,
              registered_at:   row.get(4)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    raws
      .into_iter()
      .map(RawRegistration::into_registration)
      .collect()
  }

  // ── Survey ──────────────────────────────────────────────────────────────

  async fn submit_response(
    &self,
    event_id: &str,
    input: NewSurveyResponse,
  ) -> Result<()> {
    let questions = self.event_questions(event_id).await?;
    let input = input.validated(&questions).map_err(Error::Core)?;

    let id_str       = event_id.to_owned();
    let user_id      = input.user_id;
    let answers_json = serde_json::to_string(&input.answers)?;
    let submitted_at = encode_dt(Utc::now());

    self
      .conn
      .call(move |conn| {
        conn.execute(
          "INSERT INTO survey_responses (event_id, user_id, answers, submitted_at)
           VALUES (?1, ?2, ?3, ?4)
           ON CONFLICT (event_id, user_id) DO UPDATE
           SET answers = excluded.answers, submitted_at = excluded.submitted_at",
          rusqlite::params![id_str, user_id, answers_json, submitted_at],
        )?;
        Ok(())
      })
      .await?;

    Ok(())
  }

  async fn survey_stats(&self, event_id: &str) -> Result<Vec<QuestionStats>> {
    let questions = self.event_questions(event_id).await?;

    let id_str = event_id.to_owned();
    let raws: Vec<RawSurveyResponse> = self
      .conn
      .call(move |conn| {
        let mut stmt = conn.prepare(
          "SELECT event_id, user_id, answers, submitted_at
           FROM survey_responses
           WHERE event_id = ?1",
        )?;
        let rows = stmt
          .query_map(rusqlite::params![id_str], |row| {
            Ok(RawSurveyResponse {
              event_id:     row.get(0)?,
              user_id:      row.get(1)?,
              answers:      row.get(2)?,
              submitted_at: row.get(3)?,
            })
          })?
          .collect::<rusqlite::Result<Vec<_>>>()?;
        Ok(rows)
      })
      .await?;

    let responses = raws
      .into_iter()
      .map(RawSurveyResponse::into_response)
      .collect::<Result<Vec<_>>>()?;

    Ok(survey::compute_stats(&questions, &responses))
  }
}
