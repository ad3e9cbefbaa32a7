//! Provider wire types
//!
//! The provider API paginates list responses in a `{ data, meta }`
//! envelope and reports slots as bare start/end windows; these types
//! decode that shape and convert into the shared models.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};
use shared::models::{Location, ResourceSelectionStrategy, Service, Slot, SlotQuery};

/// Paginated provider response envelope.
#[derive(Debug, Deserialize)]
pub struct Paginated<T> {
    pub data: Vec<T>,
    #[serde(default)]
    pub meta: Option<PageMeta>,
}

#[derive(Debug, Default, Deserialize)]
pub struct PageMeta {
    #[serde(default)]
    pub current_page: Option<i64>,
    #[serde(default)]
    pub per_page: Option<i64>,
    #[serde(default)]
    pub total: Option<i64>,
    #[serde(default)]
    pub last_page: Option<i64>,
}

fn default_true() -> bool {
    true
}

/// Location as reported by the provider.
#[derive(Debug, Deserialize)]
pub struct ProviderLocation {
    pub id: String,
    pub name: String,
    pub time_zone: String,
    #[serde(default)]
    pub address: Option<String>,
    #[serde(default)]
    pub city: Option<String>,
    #[serde(default)]
    pub country: Option<String>,
    #[serde(default)]
    pub resource_selection_strategy: ResourceSelectionStrategy,
    #[serde(default = "default_true")]
    pub enabled: bool,
}

impl From<ProviderLocation> for Location {
    fn from(loc: ProviderLocation) -> Self {
        Location {
            id: loc.id,
            name: loc.name,
            address: loc.address,
            city: loc.city,
            country: loc.country,
            time_zone: loc.time_zone,
            resource_selection_strategy: loc.resource_selection_strategy,
            enabled: loc.enabled,
        }
    }
}

/// Service as reported by the provider.
#[derive(Debug, Deserialize)]
pub struct ProviderService {
    pub id: String,
    pub name: String,
    #[serde(default)]
    pub description: Option<String>,
    /// Minutes. Defaults to an hour when the provider omits it.
    #[serde(default)]
    pub duration: Option<i64>,
    #[serde(default)]
    pub price: Option<f64>,
    #[serde(default)]
    pub location_id: Option<String>,
}

impl From<ProviderService> for Service {
    fn from(svc: ProviderService) -> Self {
        Service {
            id: svc.id,
            name: svc.name,
            description: svc.description,
            duration: svc.duration.unwrap_or(60),
            price: svc.price,
            location_id: svc.location_id,
        }
    }
}

/// Slot as reported by the provider. The provider only returns bookable
/// windows, so absence of the flag means available.
#[derive(Debug, Deserialize)]
pub struct ProviderSlot {
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(default = "default_true")]
    pub available: bool,
}

impl ProviderSlot {
    /// Provider slots carry no id of their own; the window within its
    /// query is the identity.
    pub fn into_slot(self, query: &SlotQuery) -> Slot {
        Slot {
            id: format!("{}:{}", query.service_id, self.starts_at.timestamp()),
            start_time: self.starts_at,
            end_time: self.ends_at,
            available: self.available,
            service_id: Some(query.service_id.clone()),
            location_id: Some(query.location_id.clone()),
            duration: Some((self.ends_at - self.starts_at).num_minutes()),
        }
    }
}

/// Reservation request sent to the provider at commit time.
#[derive(Debug, Clone, Serialize)]
pub struct ReservationRequest {
    pub service_id: String,
    pub location_id: String,
    pub starts_at: DateTime<Utc>,
    pub ends_at: DateTime<Utc>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub metadata: Option<ReservationMetadata>,
}

#[derive(Debug, Clone, Serialize)]
pub struct ReservationMetadata {
    pub customer_name: String,
    pub customer_email: String,
}

/// Reservation as acknowledged by the provider.
#[derive(Debug, Clone, Deserialize)]
pub struct Reservation {
    pub id: String,
    /// Provider-side reservation state, e.g. "confirmed" or "tentative".
    #[serde(default)]
    pub state: Option<String>,
}

impl Reservation {
    pub fn is_confirmed(&self) -> bool {
        self.state.as_deref() == Some("confirmed")
    }
}

/// Error body shape for non-success provider responses.
#[derive(Debug, Default, Deserialize)]
pub struct ProviderErrorBody {
    #[serde(default)]
    pub message: Option<String>,
    #[serde(default)]
    pub errors: Option<serde_json::Value>,
}
