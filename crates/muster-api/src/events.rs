//! Handlers for `/events` endpoints.
//!
//! | Method   | Path | Notes |
//! |----------|------|-------|
//! | `GET`    | `/events` | All events, newest first |
//! | `POST`   | `/events` | Body: [`NewEvent`]; 201 + stored event |
//! | `GET`    | `/events/:id` | 404 if not found |
//! | `PUT`    | `/events/:id` | Body: [`EventPatch`]; allow-listed partial update |
//! | `DELETE` | `/events/:id` | 204; removes registrations and responses too |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
  http::StatusCode,
  response::IntoResponse,
};
use muster_core::{
  event::{Event, EventPatch, NewEvent},
  store::EventStore,
};

use crate::error::ApiError;

/// `GET /events`
pub async fn list<S>(
  State(store): State<Arc<S>>,
) -> Result<Json<Vec<Event>>, ApiError>
where
  S: EventStore,
{
  let events = store.list_events().await.map_err(ApiError::from_store)?;
  Ok(Json(events))
}

/// `POST /events` — returns 201 + the stored [`Event`].
pub async fn create<S>(
  State(store): State<Arc<S>>,
  Json(body): Json<NewEvent>,
) -> Result<impl IntoResponse, ApiError>
where
  S: EventStore,
{
  let event = store
    .create_event(body)
    .await
    .map_err(ApiError::from_store)?;
  Ok((StatusCode::CREATED, Json(event)))
}

/// `GET /events/:id`
pub async fn get_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Event>, ApiError>
where
  S: EventStore,
{
  let event = store
    .get_event(&id)
    .await
    .map_err(ApiError::from_store)?
    .ok_or_else(|| ApiError::NotFound(format!("event {id} not found")))?;
  Ok(Json(event))
}

/// `PUT /events/:id` — body is an [`EventPatch`]; unknown keys are dropped
/// at deserialisation, so only allow-listed columns can change.
pub async fn update_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(patch): Json<EventPatch>,
) -> Result<Json<Event>, ApiError>
where
  S: EventStore,
{
  let event = store
    .update_event(&id, patch)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(event))
}

/// `DELETE /events/:id`
pub async fn delete_one<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<StatusCode, ApiError>
where
  S: EventStore,
{
  store
    .delete_event(&id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(StatusCode::NO_CONTENT)
}
