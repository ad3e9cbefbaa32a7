//! Booking Server - appointment scheduling engine
//!
//! # Architecture
//!
//! - **provider** (`provider`): client for the external scheduling
//!   provider, the system of record for real-world availability
//! - **db** (`db`): embedded SQLite storage for booking records
//! - **services** (`services`): lifecycle and conflict policy on top of
//!   the repository and the provider
//! - **api** (`api`): RESTful HTTP surface (customer flow + staff console)
//!
//! # Module structure
//!
//! ```text
//! booking-server/src/
//! ├── core/          # config, state, HTTP server, background tasks
//! ├── provider/      # scheduling provider client
//! ├── services/      # booking lifecycle, availability reads
//! ├── api/           # HTTP routes and handlers
//! ├── db/            # database layer
//! └── utils/         # logging, validation, time helpers
//! ```

pub mod api;
pub mod core;
pub mod db;
pub mod provider;
pub mod services;
pub mod utils;

// Re-export public types
pub use core::{Config, Server, ServerState};
pub use db::repository::BookingRepository;
pub use provider::{HttpProvider, SchedulingProvider};
pub use services::{AvailabilityService, BookingService};
pub use shared::{AppError, AppResult};

// Re-export logger functions
pub use utils::logger::{init_logger, init_logger_with_file};
