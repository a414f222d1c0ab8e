//! The `EventStore` trait — the seam between HTTP handlers and storage.
//!
//! The trait is implemented by storage backends (e.g.
//! `muster-store-sqlite`). The API layer depends on this abstraction, not
//! on any concrete backend.

use std::future::Future;

use crate::{
  event::{Event, EventPatch, NewEvent},
  registration::{NewRegistration, Registration},
  survey::{NewSurveyResponse, QuestionStats},
};

/// Abstraction over a muster storage backend.
///
/// Multi-step mutations (`register`, `delete_event`) are transactional:
/// either every step is visible afterwards or none is. Concurrent
/// registrations are serialised by the backend's uniqueness constraint and
/// transactional isolation, not by application-level locking.
///
/// All methods return `Send` futures so the trait can be used in
/// multi-threaded async runtimes (e.g. tokio with `axum`). Backend errors
/// must convert into the [`crate::Error`] taxonomy so callers can
/// distinguish the domain conditions from generic persistence failures.
pub trait EventStore: Send + Sync {
  type Error: std::error::Error + Into<crate::Error> + Send + Sync + 'static;

  // ── Events ────────────────────────────────────────────────────────────

  /// Validate and persist a new event with a server-assigned id and a
  /// registration count of zero.
  fn create_event(
    &self,
    input: NewEvent,
  ) -> impl Future<Output = Result<Event, Self::Error>> + Send + '_;

  /// Retrieve an event by id. Returns `None` if not found.
  fn get_event<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<Option<Event>, Self::Error>> + Send + 'a;

  /// List all events, most recently created first.
  fn list_events(
    &self,
  ) -> impl Future<Output = Result<Vec<Event>, Self::Error>> + Send + '_;

  /// Apply a partial update. Fails with the not-found condition if the
  /// event does not exist, and with a validation error if the patch is
  /// empty. Returns the updated event.
  fn update_event<'a>(
    &'a self,
    id: &'a str,
    patch: EventPatch,
  ) -> impl Future<Output = Result<Event, Self::Error>> + Send + 'a;

  /// Delete an event together with its registrations and survey responses,
  /// atomically. Fails with the not-found condition (and no mutation) if
  /// the event does not exist.
  fn delete_event<'a>(
    &'a self,
    id: &'a str,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  // ── Registration ledger ───────────────────────────────────────────────

  /// Atomically insert a registration row, increment the event's
  /// registration count, and read the updated count back. A duplicate
  /// (event, name, department) triple fails with the duplicate condition
  /// and leaves the counter untouched.
  fn register<'a>(
    &'a self,
    event_id: &'a str,
    input: NewRegistration,
  ) -> impl Future<Output = Result<i64, Self::Error>> + Send + 'a;

  /// All registrations for an event, most recent first. No side effects.
  fn list_registrations<'a>(
    &'a self,
    event_id: &'a str,
  ) -> impl Future<Output = Result<Vec<Registration>, Self::Error>> + Send + 'a;

  // ── Survey ────────────────────────────────────────────────────────────

  /// Persist a survey response keyed by (event, user). A second submission
  /// from the same user replaces the first.
  fn submit_response<'a>(
    &'a self,
    event_id: &'a str,
    input: NewSurveyResponse,
  ) -> impl Future<Output = Result<(), Self::Error>> + Send + 'a;

  /// Compute the per-question percentage distribution over all stored
  /// responses for an event. See [`crate::survey::compute_stats`].
  fn survey_stats<'a>(
    &'a self,
    event_id: &'a str,
  ) -> impl Future<Output = Result<Vec<QuestionStats>, Self::Error>> + Send + 'a;
}
