//! Handlers for the registration ledger endpoints.
//!
//! | Method | Path | Notes |
//! |--------|------|-------|
//! | `POST` | `/events/:id/register` | Body: `{"name":..,"department":..}` |
//! | `GET`  | `/events/:id/registrations` | Most recent first |

use std::sync::Arc;

use axum::{
  Json,
  extract::{Path, State},
};
use muster_core::{
  registration::{NewRegistration, Registration},
  store::EventStore,
};
use serde::Serialize;

use crate::error::ApiError;

/// Reply to a successful registration.
#[derive(Debug, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct RegisterReply {
  pub success:          bool,
  pub registered_count: i64,
}

/// `POST /events/:id/register`
///
/// The duplicate condition comes back as a 400 with a user-facing message,
/// shaped by [`ApiError::AlreadyRegistered`].
pub async fn register<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
  Json(body): Json<NewRegistration>,
) -> Result<Json<RegisterReply>, ApiError>
where
  S: EventStore,
{
  let registered_count = store
    .register(&id, body)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(RegisterReply {
    success: true,
    registered_count,
  }))
}

/// `GET /events/:id/registrations`
pub async fn list<S>(
  State(store): State<Arc<S>>,
  Path(id): Path<String>,
) -> Result<Json<Vec<Registration>>, ApiError>
where
  S: EventStore,
{
  let rows = store
    .list_registrations(&id)
    .await
    .map_err(ApiError::from_store)?;
  Ok(Json(rows))
}
