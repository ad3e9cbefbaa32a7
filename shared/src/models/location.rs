//! Location model
//!
//! A place where services are delivered. Created and edited by staff,
//! read-only to the booking flow. The provider is the system of record;
//! these records are never persisted locally.

use serde::{Deserialize, Serialize};

/// How the provider picks among interchangeable resources when multiple
/// can fulfil a slot.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
pub enum ResourceSelectionStrategy {
    #[default]
    Randomize,
    Prioritize,
    Equalize,
}

/// Location entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Location {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    /// IANA time zone name, e.g. "Europe/Madrid"
    pub time_zone: String,
    #[serde(default)]
    pub resource_selection_strategy: ResourceSelectionStrategy,
    pub enabled: bool,
}

/// Create location payload (staff surface)
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LocationCreate {
    pub name: String,
    pub time_zone: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_selection_strategy: Option<ResourceSelectionStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}

/// Update location payload (staff surface)
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LocationUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub time_zone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub address: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub city: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub country: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub resource_selection_strategy: Option<ResourceSelectionStrategy>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub enabled: Option<bool>,
}
