//! JSON REST API for muster.
//!
//! Exposes an axum [`Router`] backed by any [`muster_core::store::EventStore`].
//! TLS and transport concerns are the caller's responsibility.
//!
//! # Mounting
//!
//! ```rust,ignore
//! .nest("/api", muster_api::api_router(store.clone()))
//! ```

pub mod error;
pub mod events;
pub mod registrations;
pub mod survey;

use std::sync::Arc;

use axum::{
  Router,
  routing::{get, post},
};
use muster_core::store::EventStore;
use tower_http::{cors::CorsLayer, trace::TraceLayer};

pub use error::ApiError;

/// Build a fully-materialised API router for `store`.
///
/// The returned `Router<()>` can be nested into any parent router regardless
/// of its own state type. CORS is permissive; the browser client is served
/// from a different origin.
pub fn api_router<S>(store: Arc<S>) -> Router<()>
where
  S: EventStore + 'static,
{
  Router::new()
    // Events
    .route("/events", get(events::list::<S>).post(events::create::<S>))
    .route(
      "/events/{id}",
      get(events::get_one::<S>)
        .put(events::update_one::<S>)
        .delete(events::delete_one::<S>),
    )
    // Registration ledger
    .route("/events/{id}/register", post(registrations::register::<S>))
    .route("/events/{id}/registrations", get(registrations::list::<S>))
    // Survey
    .route("/events/{id}/survey", post(survey::submit::<S>))
    .route("/events/{id}/survey-stats", get(survey::stats::<S>))
    .layer(TraceLayer::new_for_http())
    .layer(CorsLayer::permissive())
    .with_state(store)
}

// ─── Integration tests ───────────────────────────────────────────────────────
