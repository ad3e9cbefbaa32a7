//! API route modules
//!
//! # Structure
//!
//! - [`health`] - liveness and component health
//! - [`locations`] - location catalog (customer reads + staff management)
//! - [`services`] - service catalog
//! - [`slots`] - availability queries
//! - [`bookings`] - booking lifecycle (customer flow + staff console)
//!
//! Success bodies are the plain resource JSON; errors are the
//! `{ code, message, data }` envelope produced by [`shared::AppError`].

pub mod bookings;
pub mod health;
pub mod locations;
pub mod services;
pub mod slots;

use axum::Router;
use tower_http::cors::CorsLayer;
use tower_http::trace::TraceLayer;

use crate::core::ServerState;

/// Assemble the full application router.
pub fn router(state: ServerState) -> Router {
    Router::new()
        .merge(health::router())
        .merge(locations::router())
        .merge(services::router())
        .merge(slots::router())
        .merge(bookings::router())
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive())
        .with_state(state)
}
