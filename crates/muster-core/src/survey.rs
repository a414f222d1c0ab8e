//! Survey responses and the derived per-question answer distribution.
//!
//! Responses are stored; the distribution is computed on demand and never
//! persisted. The percentage arithmetic lives here as a pure function so it
//! can be exercised without a database.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::{Error, Result};

/// One survey question attached to an event. The aggregator needs the
/// option list to size its percentage vectors; the rest is display data.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SurveyQuestion {
  pub id:       i64,
  pub question: String,
  pub options:  Vec<String>,
}

/// One user's answers to an event's survey, in question order.
/// `answers[i]` indexes into question `i`'s option list.
#[derive(Debug, Clone, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct SurveyResponse {
  pub event_id:     String,
  pub user_id:      String,
  pub answers:      Vec<usize>,
  pub submitted_at: DateTime<Utc>,
}

/// Input to [`EventStore::submit_response`](crate::store::EventStore::submit_response).
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct NewSurveyResponse {
  pub user_id: String,
  pub answers: Vec<usize>,
}

impl NewSurveyResponse {
  /// Trim the user id and check every answer index against the event's
  /// question list. An event with no declared questions accepts any answer
  /// vector; the stats computation tolerates what it finds.
  pub fn validated(self, questions: &[SurveyQuestion]) -> Result<Self> {
    let user_id = self.user_id.trim().to_owned();
    if user_id.is_empty() {
      return Err(Error::Validation("userId is required".into()));
    }

    if !questions.is_empty() {
      if self.answers.len() > questions.len() {
        return Err(Error::Validation(format!(
          "expected at most {} answers, got {}",
          questions.len(),
          self.answers.len()
        )));
      }
      for (i, (answer, question)) in self.answers.iter().zip(questions).enumerate() {
        if *answer >= question.options.len() {
          return Err(Error::Validation(format!(
            "answer {answer} is out of range for question {i}"
          )));
        }
      }
    }

    Ok(Self { user_id, answers: self.answers })
  }
}

// ─── Derived stats ───────────────────────────────────────────────────────────

/// Percentage distribution of answers for one question. Derived, never
/// stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct QuestionStats {
  pub question_index:  usize,
  /// Number of responses that answered this question.
  pub total_responses: usize,
  /// One rounded percentage per option, zero-selection options included.
  pub stats:           Vec<u32>,
}

/// Aggregate stored responses into per-question percentage vectors.
///
/// A response counts toward question `i` only if it has an answer at
/// position `i` — shorter responses did not answer that question and stay
/// out of its denominator. A question nobody answered yields all zeros
/// rather than a division error. Percentages are rounded per option
/// independently and need not sum to 100.
pub fn compute_stats(
  questions: &[SurveyQuestion],
  responses: &[SurveyResponse],
) -> Vec<QuestionStats> {
  questions
    .iter()
    .enumerate()
    .map(|(i, question)| {
      let answered: Vec<usize> = responses
        .iter()
        .filter_map(|r| r.answers.get(i).copied())
        .collect();

      let total = answered.len();
      let mut counts = vec![0usize; question.options.len()];
      for answer in answered {
        // Out-of-range indices stay in the denominator but select nothing.
        if let Some(slot) = counts.get_mut(answer) {
          *slot += 1;
        }
      }

      let stats = counts
        .into_iter()
        .map(|count| {
          if total == 0 {
            0
          } else {
            (100.0 * count as f64 / total as f64).round() as u32
          }
        })
        .collect();

      QuestionStats {
        question_index:  i,
        total_responses: total,
        stats,
      }
    })
    .collect()
}
