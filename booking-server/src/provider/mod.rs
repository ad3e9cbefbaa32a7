//! Scheduling provider client
//!
//! The external provider is the system of record for real-world
//! availability and resource allocation. This module defines the
//! [`SchedulingProvider`] seam the rest of the server programs against,
//! plus the HTTP implementation.
//!
//! Reads are tolerant by convention: the service layer degrades provider
//! read failures to empty lists. Writes surface typed errors the flow can
//! branch on.

pub mod http;
pub mod types;

pub use http::HttpProvider;
pub use types::{Reservation, ReservationRequest};

use async_trait::async_trait;
use shared::AppError;
use shared::models::{
    Location, LocationCreate, LocationUpdate, Service, ServiceCreate, Slot, SlotQuery,
};
use thiserror::Error;

/// Provider error types
#[derive(Debug, Error)]
pub enum ProviderError {
    /// Credentials missing or malformed. Raised before any network I/O,
    /// so it is always distinguishable from provider downtime.
    #[error("Provider not configured: {0}")]
    Configuration(String),

    /// Network failure or timeout.
    #[error("Provider unreachable: {0}")]
    Unavailable(String),

    /// The provider refused the reservation because the window is taken.
    #[error("Slot no longer available")]
    SlotTaken,

    /// Any other non-success provider response.
    #[error("Provider rejected request ({status}): {message}")]
    Rejected {
        status: u16,
        message: String,
        /// Field-level validation detail, surfaced verbatim to staff.
        errors: Option<serde_json::Value>,
    },
}

impl From<ProviderError> for AppError {
    fn from(err: ProviderError) -> Self {
        match err {
            ProviderError::Configuration(msg) => AppError::configuration(msg),
            ProviderError::Unavailable(msg) => AppError::provider(msg),
            ProviderError::SlotTaken => {
                AppError::conflict("The selected time is no longer available")
            }
            ProviderError::Rejected {
                status,
                message,
                errors,
            } => {
                let mut app_err = match status {
                    404 => AppError::not_found(message),
                    409 | 422 => AppError::conflict(message),
                    _ => AppError::provider(message),
                };
                app_err = app_err.with_detail("provider_status", status);
                if let Some(errors) = errors {
                    app_err = app_err.with_detail("errors", errors);
                }
                app_err
            }
        }
    }
}

/// Result type for provider operations
pub type ProviderResult<T> = Result<T, ProviderError>;

/// Contract with the external scheduling provider.
///
/// Implemented over HTTP in production ([`HttpProvider`]) and by scripted
/// mocks in tests.
#[async_trait]
pub trait SchedulingProvider: Send + Sync {
    /// Enabled locations, as known to the provider.
    async fn list_locations(&self) -> ProviderResult<Vec<Location>>;

    /// Bookable services, optionally filtered by location.
    async fn list_services(&self, location_id: Option<&str>) -> ProviderResult<Vec<Service>>;

    /// Slots whose start time falls inside the query's date range.
    /// Availability reflects provider state at query time only.
    async fn list_slots(&self, query: &SlotQuery) -> ProviderResult<Vec<Slot>>;

    /// Reserve a window. The provider rejects double-reservations; that
    /// rejection is the system's mutual exclusion on slots.
    async fn create_reservation(&self, request: &ReservationRequest)
    -> ProviderResult<Reservation>;

    /// Release a previously created reservation. Unknown reservation ids
    /// are treated as already released.
    async fn cancel_reservation(&self, external_id: &str) -> ProviderResult<()>;

    /// Staff location management.
    async fn create_location(&self, data: &LocationCreate) -> ProviderResult<Location>;
    async fn update_location(&self, id: &str, data: &LocationUpdate) -> ProviderResult<Location>;
    async fn delete_location(&self, id: &str) -> ProviderResult<()>;

    /// Staff service management.
    async fn create_service(&self, data: &ServiceCreate) -> ProviderResult<Service>;

    /// Cheap connectivity probe with a short timeout.
    async fn health_check(&self) -> ProviderResult<()>;
}
