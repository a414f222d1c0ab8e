//! Handlers for the survey endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/events/:id/survey` | Body: `{"userId":..,"answers":[..]}` |
//! | `GET`  | `/events/:id/survey-stats` | Derived percentage distribution |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use muster_core::{
  store::EventStore,
  survey::{NewSurveyResponse, QuestionStats},
};
use serde::Serialize;

use crate::error::ApiError;

#[derive(Debug, Serialize)]
pub struct SubmitReply {
  pub success: bool,
}

/// `POST /events/:id/survey` — a repeat submission by the same user
/// replaces the stored response.
pub async fn submit<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(body): Json<NewSurveyResponse>,
) -> Result<Json<SubmitReply>, ApiError>
where
  S: EventStore,
{
  store
    .submit_response(&id, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(SubmitReply { success: true }))
}

#[derive(Debug, Serialize)]
pub struct StatsReply {
  pub stats: Vec<QuestionStats>,
}

/// `GET /events/:id/survey-stats`
pub async fn stats<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<StatsReply>, ApiError>
where
  S: EventStore,
{
  let stats = store
    .survey_stats(&id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(StatsReply { stats }))
}
