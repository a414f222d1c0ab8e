//! Integration tests for `SqliteStore` against an in-memory database.

use muster_core::{
  event::{EventPatch, NewEvent},
  registration::NewRegistration,
  store::EventStore,
  survey::{NewSurveyResponse, SurveyQuestion},
};
use serde_json::json;

use crate::{Error, SqliteStore};

async fn store() -> SqliteStore {
  SqliteStore::open_in_memory()
    .await
    .expect("in-memory store")
}

fn workshop() -> NewEvent {
  NewEvent {
    title:            "Rust Workshop".into(),
    start_time:       "2026-09-01T10:00:00Z".into(),
    location:         "Building A".into(),
    signup_deadline:  "2026-08-30T00:00:00Z".into(),
    highlights:       vec!["hands-on".into()],
    prizes:           json!([{ "rank": "gold", "text": "a rubber duck" }]),
    description:      Some("An afternoon of exercises".into()),
    max_participants: Some(100),
    replay_url:       None,
    banner_url:       None,
    survey_questions: vec![],
  }
}

fn two_question_survey() -> Vec<SurveyQuestion> {
  vec![
    SurveyQuestion {
      id:       1,
      question: "Was it useful?".into(),
      options:  vec!["yes".into(), "no".into()],
    },
    SurveyQuestion {
      id:       2,
      question: "Would you come again?".into(),
      options:  vec!["yes".into(), "no".into()],
    },
  ]
}

fn registration(name: &str) -> NewRegistration {
  NewRegistration {
    name:       name.into(),
    department: "Eng".into(),
  }
}

fn response(user: &str, answers: Vec<usize>) -> NewSurveyResponse {
  NewSurveyResponse {
    user_id: user.into(),
    answers,
  }
}

// ─── Events ──────────────────────────────────────────────────────────────────

#[tokio::test]
async fn create_and_get_event() {
  let s = store().await;

  let event = s.create_event(workshop()).await.unwrap();
  assert_eq!(event.registered_count, 0);

  let fetched = s.get_event(&event.id).await.unwrap().unwrap();
  assert_eq!(fetched.id, event.id);
  assert_eq!(fetched.title, "Rust Workshop");
  assert_eq!(fetched.highlights, vec!["hands-on".to_owned()]);
  assert_eq!(fetched.prizes, json!([{ "rank": "gold", "text": "a rubber duck" }]));
  assert_eq!(fetched.max_participants, Some(100));
  assert_eq!(fetched.registered_count, 0);
}

#[tokio::test]
async fn create_rejects_blank_required_field() {
  let s = store().await;

  let mut input = workshop();
  input.location = "   ".into();

  let err = s.create_event(input).await.unwrap_err();
  assert!(matches!(err, Error::Core(muster_core::Error::Validation(_))));
}

#[tokio::test]
async fn get_event_missing_returns_none() {
  let s = store().await;
  assert!(s.get_event("0").await.unwrap().is_none());
}

#[tokio::test]
async fn list_events_newest_first() {
  let s = store().await;

  let first = s.create_event(workshop()).await.unwrap();
  let second = s.create_event(workshop()).await.unwrap();
  let third = s.create_event(workshop()).await.unwrap();

  let ids: Vec<_> = s
    .list_events()
    .await
    .unwrap()
    .into_iter()
    .map(|e| e.id)
    .collect();
  assert_eq!(ids, vec![third.id, second.id, first.id]);
}

#[tokio::test]
async fn update_patches_only_given_fields() {
  let s = store().await;
  let event = s.create_event(workshop()).await.unwrap();

  let patch = EventPatch {
    title: Some("Rust Workshop, rescheduled".into()),
    end_time: Some("2026-09-01T17:00:00Z".into()),
    ..Default::default()
  };

  let updated = s.update_event(&event.id, patch).await.unwrap();
  assert_eq!(updated.title, "Rust Workshop, rescheduled");
  assert_eq!(updated.end_time.as_deref(), Some("2026-09-01T17:00:00Z"));
  // Untouched fields survive.
  assert_eq!(updated.location, "Building A");
  assert_eq!(updated.max_participants, Some(100));
}

#[tokio::test]
async fn update_empty_patch_rejected() {
  let s = store().await;
  let event = s.create_event(workshop()).await.unwrap();

  let err = s
    .update_event(&event.id, EventPatch::default())
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(muster_core::Error::Validation(_))));
}

#[tokio::test]
async fn update_missing_event_errors() {
  let s = store().await;
  let patch = EventPatch {
    title: Some("ghost".into()),
    ..Default::default()
  };
  let err = s.update_event("0", patch).await.unwrap_err();
  assert!(matches!(err, Error::EventNotFound(_)));
}

#[tokio::test]
async fn update_leaves_counter_alone() {
  let s = store().await;
  let event = s.create_event(workshop()).await.unwrap();
  s.register(&event.id, registration("Alice")).await.unwrap();

  let patch = EventPatch {
    title: Some("renamed".into()),
    ..Default::default()
  };
  let updated = s.update_event(&event.id, patch).await.unwrap();
  assert_eq!(updated.registered_count, 1);
}

// ─── Event deletion ──────────────────────────────────────────────────────────

#[tokio::test]
async fn delete_cascades_to_registrations_and_responses() {
  let s = store().await;

  let mut input = workshop();
  input.survey_questions = two_question_survey();
  let event = s.create_event(input).await.unwrap();

  s.register(&event.id, registration("Alice")).await.unwrap();
  s.register(&event.id, registration("Bob")).await.unwrap();
  s.submit_response(&event.id, response("u1", vec![0, 1]))
    .await
    .unwrap();

  s.delete_event(&event.id).await.unwrap();

  assert!(s.get_event(&event.id).await.unwrap().is_none());
  assert!(s.list_registrations(&event.id).await.unwrap().is_empty());
  assert!(matches!(
    s.survey_stats(&event.id).await.unwrap_err(),
    Error::EventNotFound(_)
  ));
}

#[tokio::test]
async fn delete_missing_event_errors_and_mutates_nothing() {
  let s = store().await;
  let event = s.create_event(workshop()).await.unwrap();
  s.register(&event.id, registration("Alice")).await.unwrap();

  let err = s.delete_event("0").await.unwrap_err();
  assert!(matches!(err, Error::EventNotFound(_)));

  // The unrelated event and its ledger are untouched.
  let stored = s.get_event(&event.id).await.unwrap().unwrap();
  assert_eq!(stored.registered_count, 1);
  assert_eq!(s.list_registrations(&event.id).await.unwrap().len(), 1);
}

// ─── Registration ledger ─────────────────────────────────────────────────────

#[tokio::test]
async fn register_returns_incremented_count() {
  let s = store().await;
  let event = s.create_event(workshop()).await.unwrap();

  assert_eq!(s.register(&event.id, registration("Alice")).await.unwrap(), 1);
  assert_eq!(s.register(&event.id, registration("Bob")).await.unwrap(), 2);
}

#[tokio::test]
async fn counter_matches_ledger_rows() {
  let s = store().await;
  let event = s.create_event(workshop()).await.unwrap();

  for name in ["Alice", "Bob", "Carol"] {
    s.register(&event.id, registration(name)).await.unwrap();
  }

  let stored = s.get_event(&event.id).await.unwrap().unwrap();
  let rows = s.list_registrations(&event.id).await.unwrap();
  assert_eq!(stored.registered_count, 3);
  assert_eq!(rows.len(), 3);
}

#[tokio::test]
async fn duplicate_registration_rejected_without_counting() {
  let s = store().await;
  let event = s.create_event(workshop()).await.unwrap();

  assert_eq!(s.register(&event.id, registration("Alice")).await.unwrap(), 1);

  let err = s
    .register(&event.id, registration("Alice"))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::DuplicateRegistration));

  // Neither the counter nor the ledger moved.
  let stored = s.get_event(&event.id).await.unwrap().unwrap();
  assert_eq!(stored.registered_count, 1);
  assert_eq!(s.list_registrations(&event.id).await.unwrap().len(), 1);
}

#[tokio::test]
async fn duplicate_detected_after_trimming() {
  let s = store().await;
  let event = s.create_event(workshop()).await.unwrap();

  s.register(&event.id, registration("Alice")).await.unwrap();

  let padded = NewRegistration {
    name:       "  Alice ".into(),
    department: " Eng ".into(),
  };
  let err = s.register(&event.id, padded).await.unwrap_err();
  assert!(matches!(err, Error::DuplicateRegistration));
}

#[tokio::test]
async fn register_unknown_event_is_a_persistence_failure() {
  let s = store().await;
  // The ledger leaves existence checks to the foreign-key relation.
  let err = s.register("0", registration("Alice")).await.unwrap_err();
  assert!(matches!(err, Error::Database(_)));
}

#[tokio::test]
async fn blank_name_rejected_before_storage() {
  let s = store().await;
  let event = s.create_event(workshop()).await.unwrap();

  let input = NewRegistration {
    name:       "  ".into(),
    department: "Eng".into(),
  };
  let err = s.register(&event.id, input).await.unwrap_err();
  assert!(matches!(err, Error::Core(muster_core::Error::Validation(_))));

  let stored = s.get_event(&event.id).await.unwrap().unwrap();
  assert_eq!(stored.registered_count, 0);
}

#[tokio::test]
async fn concurrent_registrations_all_counted() {
  let s = store().await;
  let event = s.create_event(workshop()).await.unwrap();

  let mut handles = Vec::new();
  for i in 0..8 {
    let s = s.clone();
    let id = event.id.clone();
    handles.push(tokio::spawn(async move {
      s.register(&id, registration(&format!("user-{i}"))).await
    }));
  }
  for handle in handles {
    handle.await.unwrap().unwrap();
  }

  let stored = s.get_event(&event.id).await.unwrap().unwrap();
  assert_eq!(stored.registered_count, 8);
  assert_eq!(s.list_registrations(&event.id).await.unwrap().len(), 8);
}

#[tokio::test]
async fn list_registrations_most_recent_first() {
  let s = store().await;
  let event = s.create_event(workshop()).await.unwrap();

  for name in ["Alice", "Bob", "Carol"] {
    s.register(&event.id, registration(name)).await.unwrap();
  }

  let names: Vec<_> = s
    .list_registrations(&event.id)
    .await
    .unwrap()
    .into_iter()
    .map(|r| r.name)
    .collect();
  assert_eq!(names, vec!["Carol", "Bob", "Alice"]);
}

// ─── Survey ──────────────────────────────────────────────────────────────────

async fn surveyed_event(s: &SqliteStore) -> String {
  let mut input = workshop();
  input.survey_questions = two_question_survey();
  s.create_event(input).await.unwrap().id
}

#[tokio::test]
async fn stats_over_three_responses() {
  let s = store().await;
  let id = surveyed_event(&s).await;

  s.submit_response(&id, response("u1", vec![0, 1])).await.unwrap();
  s.submit_response(&id, response("u2", vec![0, 0])).await.unwrap();
  s.submit_response(&id, response("u3", vec![1, 1])).await.unwrap();

  let stats = s.survey_stats(&id).await.unwrap();
  assert_eq!(stats.len(), 2);

  assert_eq!(stats[0].question_index, 0);
  assert_eq!(stats[0].total_responses, 3);
  assert_eq!(stats[0].stats, vec![67, 33]);

  assert_eq!(stats[1].question_index, 1);
  assert_eq!(stats[1].total_responses, 3);
  assert_eq!(stats[1].stats, vec![33, 67]);
}

#[tokio::test]
async fn stats_with_no_responses_are_all_zero() {
  let s = store().await;
  let id = surveyed_event(&s).await;

  let stats = s.survey_stats(&id).await.unwrap();
  assert_eq!(stats.len(), 2);
  for question in stats {
    assert_eq!(question.total_responses, 0);
    assert_eq!(question.stats, vec![0, 0]);
  }
}

#[tokio::test]
async fn resubmission_replaces_previous_response() {
  let s = store().await;
  let id = surveyed_event(&s).await;

  s.submit_response(&id, response("u1", vec![0, 0])).await.unwrap();
  s.submit_response(&id, response("u1", vec![1, 1])).await.unwrap();

  let stats = s.survey_stats(&id).await.unwrap();
  assert_eq!(stats[0].total_responses, 1);
  assert_eq!(stats[0].stats, vec![0, 100]);
  assert_eq!(stats[1].stats, vec![0, 100]);
}

#[tokio::test]
async fn short_response_skips_later_questions() {
  let s = store().await;
  let id = surveyed_event(&s).await;

  s.submit_response(&id, response("u1", vec![0])).await.unwrap();
  s.submit_response(&id, response("u2", vec![0, 1])).await.unwrap();

  let stats = s.survey_stats(&id).await.unwrap();
  assert_eq!(stats[0].total_responses, 2);
  assert_eq!(stats[1].total_responses, 1);
  assert_eq!(stats[1].stats, vec![0, 100]);
}

#[tokio::test]
async fn out_of_range_answer_rejected_at_submission() {
  let s = store().await;
  let id = surveyed_event(&s).await;

  let err = s
    .submit_response(&id, response("u1", vec![0, 5]))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::Core(muster_core::Error::Validation(_))));

  let stats = s.survey_stats(&id).await.unwrap();
  assert_eq!(stats[0].total_responses, 0);
}

#[tokio::test]
async fn submit_for_unknown_event_errors() {
  let s = store().await;
  let err = s
    .submit_response("0", response("u1", vec![0]))
    .await
    .unwrap_err();
  assert!(matches!(err, Error::EventNotFound(_)));
}

#[tokio::test]
async fn stats_for_unknown_event_errors() {
  let s = store().await;
  let err = s.survey_stats("0").await.unwrap_err();
  assert!(matches!(err, Error::EventNotFound(_)));
}

#[tokio::test]
async fn event_without_questions_accepts_and_reports_nothing() {
  let s = store().await;
  let event = s.create_event(workshop()).await.unwrap();

  s.submit_response(&event.id, response("u1", vec![2, 7]))
    .await
    .unwrap();
  assert!(s.survey_stats(&event.id).await.unwrap().is_empty());
}
