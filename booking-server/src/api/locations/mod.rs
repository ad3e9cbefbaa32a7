//! Location API module
//!
//! Reads serve the customer flow; create/update/delete are the staff
//! console's location management, proxied through to the provider.

mod handler;

use axum::{
    Router,
    routing::{get, put},
};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .nest("/api/locations", location_routes())
        // Alias the flow reads under the booking-* names.
        .route("/api/booking-locations", get(handler::list))
}

fn location_routes() -> Router<ServerState> {
    let read_routes = Router::new().route("/", get(handler::list));
    let manage_routes = Router::new()
        .route("/", axum::routing::post(handler::create))
        .route("/{id}", put(handler::update).delete(handler::delete));
    read_routes.merge(manage_routes)
}
