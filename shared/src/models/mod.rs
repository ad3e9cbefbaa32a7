//! Data models
//!
//! Shared between booking-server and booking-client (via API).
//! DB row types use `#[cfg_attr(feature = "db", derive(sqlx::FromRow))]`.
//! All instants are `chrono::DateTime<Utc>`, serialized as ISO-8601.

pub mod booking;
pub mod cart;
pub mod location;
pub mod service;
pub mod slot;

// Re-exports
pub use booking::*;
pub use cart::*;
pub use location::*;
pub use service::*;
pub use slot::*;
