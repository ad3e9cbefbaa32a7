//! Service model
//!
//! A bookable offering. Mirrors a commerce product flagged with
//! `requires_booking=true`; linked to the product by id, not merged
//! with it.

use serde::{Deserialize, Serialize};

/// Bookable service entity
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Service {
    pub id: String,
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Appointment length in minutes
    pub duration: i64,
    /// Display price, in the store currency. Pricing itself is handled by
    /// the commerce platform.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    /// Optional location affinity
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}

/// Payload for creating a service at the provider (staff console).
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ServiceCreate {
    pub name: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub description: Option<String>,
    /// Appointment length in minutes
    pub duration: i64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub price: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
}
