//! Availability API module
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/slots | GET | slots for a service/location/date |
//! | /api/slots/dates | GET | dates with at least one open slot |
//! | /api/booking-slots | GET | flow alias, takes `service`/`location`/`from`/`to` |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/slots", get(handler::list))
        .route("/api/slots/dates", get(handler::open_dates))
        .route("/api/booking-slots", get(handler::flow_list))
}
