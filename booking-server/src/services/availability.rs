//! Availability reads
//!
//! Catalog and slot lookups against the scheduling provider. Read
//! failures never propagate to callers: a provider outage renders as
//! "nothing available" rather than an error page, and the failure is
//! logged for operators.

use std::sync::Arc;

use shared::models::{Location, Service, Slot, SlotQuery};
use tracing::warn;

use crate::provider::SchedulingProvider;

#[derive(Clone)]
pub struct AvailabilityService {
    provider: Arc<dyn SchedulingProvider>,
}

impl AvailabilityService {
    pub fn new(provider: Arc<dyn SchedulingProvider>) -> Self {
        Self { provider }
    }

    /// Enabled locations, empty on provider failure.
    pub async fn locations(&self) -> Vec<Location> {
        match self.provider.list_locations().await {
            Ok(locations) => locations,
            Err(err) => {
                warn!("Failed to fetch locations, degrading to empty: {err}");
                Vec::new()
            }
        }
    }

    /// Bookable services, optionally scoped to a location. Empty on
    /// provider failure.
    pub async fn services(&self, location_id: Option<&str>) -> Vec<Service> {
        match self.provider.list_services(location_id).await {
            Ok(services) => services,
            Err(err) => {
                warn!("Failed to fetch services, degrading to empty: {err}");
                Vec::new()
            }
        }
    }

    /// Slots inside the query window. Empty on provider failure.
    pub async fn slots(&self, query: &SlotQuery) -> Vec<Slot> {
        match self.provider.list_slots(query).await {
            Ok(slots) => slots,
            Err(err) => {
                warn!(
                    service_id = %query.service_id,
                    location_id = %query.location_id,
                    "Failed to fetch slots, degrading to empty: {err}"
                );
                Vec::new()
            }
        }
    }
}
