//! Booking API module
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/bookings | GET | list bookings (customer history or console filters) |
//! | /api/bookings | POST | commit a booking |
//! | /api/bookings/{id} | GET | fetch one booking |
//! | /api/bookings/{id} | PUT | partial update (console) |
//! | /api/bookings/{id} | DELETE | cancel (idempotent) |

mod handler;

use axum::{
    Router,
    routing::{get, post},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new().nest("/api/bookings", booking_routes())
}

fn booking_routes() -> Router<ServerState> {
    Router::new()
        .route("/", get(handler::list).post(handler::create))
        .route(
            "/{id}",
            get(handler::get_by_id)
                .put(handler::update)
                .delete(handler::cancel),
        )
        .route("/{id}/cancel", post(handler::cancel_by_post))
}
