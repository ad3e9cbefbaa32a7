//! Booking Client - customer-side booking flow
//!
//! # Architecture
//!
//! - **api** (`api`): typed client for the booking server's HTTP API
//! - **flow** (`flow`): the step-by-step booking flow state machine
//!   (location, service, date, time, details, confirm)
//! - **driver** (`driver`): async wrapper around the flow that refuses
//!   overlapping requests
//! - **checkout** (`checkout`): the gate that blocks checkout until every
//!   bookable cart item has its own booking

pub mod api;
pub mod checkout;
pub mod config;
pub mod driver;
pub mod error;
pub mod flow;

pub use api::{BookingApi, HttpBookingApi};
pub use checkout::CheckoutGate;
pub use config::ClientConfig;
pub use driver::BookingFlowDriver;
pub use error::{ClientError, ClientResult};
pub use flow::{BookingFlow, ConfirmOutcome, CustomerDetails, FlowStep};
