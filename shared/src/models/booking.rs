//! Booking model
//!
//! The durable record of a reservation, independent of the ephemeral slot
//! that produced it. Lifecycle is monotonic: `pending → confirmed →
//! completed`, with `cancelled` reachable from `pending` or `confirmed`
//! only. Cancellation is a soft delete; rows are never removed.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

/// Booking lifecycle state.
#[derive(Debug, Clone, Copy, Serialize, Deserialize, PartialEq, Eq, Default)]
#[serde(rename_all = "lowercase")]
#[cfg_attr(feature = "db", derive(sqlx::Type))]
#[cfg_attr(feature = "db", sqlx(rename_all = "lowercase"))]
pub enum BookingStatus {
    #[default]
    Pending,
    Confirmed,
    Cancelled,
    Completed,
}

impl BookingStatus {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Pending => "pending",
            Self::Confirmed => "confirmed",
            Self::Cancelled => "cancelled",
            Self::Completed => "completed",
        }
    }

    /// No further transitions are possible out of a terminal state.
    pub fn is_terminal(&self) -> bool {
        matches!(self, Self::Cancelled | Self::Completed)
    }

    /// Whether the lifecycle state machine permits `self → next`.
    ///
    /// Same-state updates are permitted (no-op from the state machine's
    /// point of view) so partial updates that echo the current status back
    /// do not fail.
    pub fn can_transition_to(&self, next: BookingStatus) -> bool {
        use BookingStatus::*;
        match (self, next) {
            (a, b) if *a == b => true,
            (Pending, Confirmed) => true,
            (Pending, Cancelled) | (Confirmed, Cancelled) => true,
            (Confirmed, Completed) => true,
            _ => false,
        }
    }
}

impl std::str::FromStr for BookingStatus {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "pending" => Ok(Self::Pending),
            "confirmed" => Ok(Self::Confirmed),
            "cancelled" => Ok(Self::Cancelled),
            "completed" => Ok(Self::Completed),
            other => Err(format!("unknown booking status: {other}")),
        }
    }
}

/// Booking entity (wire shape and DB row).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[cfg_attr(feature = "db", derive(sqlx::FromRow))]
pub struct Booking {
    pub id: String,
    pub customer_id: String,
    /// Linked commerce product, when the booking came from a cart item.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
    pub service_id: String,
    pub location_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub status: BookingStatus,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    /// Provider-side booking id, for reconciliation.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub external_booking_id: Option<String>,
    pub created_at: DateTime<Utc>,
    pub updated_at: DateTime<Utc>,
}

impl Booking {
    /// Appointment length in minutes.
    pub fn duration_minutes(&self) -> i64 {
        (self.end_time - self.start_time).num_minutes()
    }
}

/// Create booking payload.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BookingCreate {
    pub customer_id: String,
    pub service_id: String,
    pub location_id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    pub customer_name: String,
    pub customer_email: String,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub product_id: Option<String>,
}

/// Partial update payload. Times are deliberately absent: rescheduling is
/// modeled as cancel + create so the original provider reservation is
/// never silently orphaned.
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct BookingUpdate {
    #[serde(skip_serializing_if = "Option::is_none")]
    pub status: Option<BookingStatus>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub notes: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_name: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_email: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customer_phone: Option<String>,
}
