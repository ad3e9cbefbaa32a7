//! Service layer
//!
//! - [`BookingService`] - booking lifecycle and conflict policy
//! - [`AvailabilityService`] - degrade-to-empty provider reads

pub mod availability;
pub mod booking;

pub use availability::AvailabilityService;
pub use booking::BookingService;
