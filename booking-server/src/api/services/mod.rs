//! Service catalog API module
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /api/services | GET | service catalog |
//! | /api/services | POST | create a service at the provider (staff) |
//! | /api/booking-services | GET | flow alias, takes `location` |

mod handler;

use axum::{Router, routing::get};

use crate::core::ServerState;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/api/services", get(handler::list).post(handler::create))
        .route("/api/booking-services", get(handler::flow_list))
}
