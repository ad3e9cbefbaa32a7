//! Availability handlers
//!
//! Both endpoints degrade to empty lists when the provider is down; the
//! flow renders "no availability" instead of an error page.

use axum::{
    Json,
    extract::{Query, State},
};
use chrono::{NaiveDate, Utc};
use serde::Deserialize;
use shared::AppResult;
use shared::models::{Slot, SlotQuery};

use crate::core::ServerState;
use crate::utils::time::parse_date;

#[derive(Debug, Deserialize)]
pub struct SlotListParams {
    pub service_id: String,
    pub location_id: String,
    /// YYYY-MM-DD
    pub date: String,
}

/// GET /api/slots - open slots for one day
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<SlotListParams>,
) -> AppResult<Json<Vec<Slot>>> {
    let date = parse_date(&params.date)?;
    let query = SlotQuery::single_day(params.service_id, params.location_id, date);
    Ok(Json(state.availability.slots(&query).await))
}

#[derive(Debug, Deserialize)]
pub struct FlowSlotParams {
    pub service: String,
    pub location: String,
    /// YYYY-MM-DD, inclusive
    pub from: String,
    /// YYYY-MM-DD, inclusive; defaults to `from`
    pub to: Option<String>,
}

/// GET /api/booking-slots - open slots over a date range, under the name
/// the flow uses
pub async fn flow_list(
    State(state): State<ServerState>,
    Query(params): Query<FlowSlotParams>,
) -> AppResult<Json<Vec<Slot>>> {
    let from = parse_date(&params.from)?;
    let to = match params.to {
        Some(ref date) => parse_date(date)?,
        None => from,
    };
    let query = SlotQuery {
        service_id: params.service,
        location_id: params.location,
        from,
        to,
    };
    Ok(Json(state.availability.slots(&query).await))
}

#[derive(Debug, Deserialize)]
pub struct OpenDatesParams {
    pub service_id: String,
    pub location_id: String,
    /// YYYY-MM-DD; defaults to today (UTC)
    pub from: Option<String>,
}

/// GET /api/slots/dates - dates inside the booking window with at least
/// one open slot
pub async fn open_dates(
    State(state): State<ServerState>,
    Query(params): Query<OpenDatesParams>,
) -> AppResult<Json<Vec<NaiveDate>>> {
    let from = match params.from {
        Some(ref date) => parse_date(date)?,
        None => Utc::now().date_naive(),
    };
    let query = SlotQuery::window(
        params.service_id,
        params.location_id,
        from,
        state.config.booking_window_days,
    );
    let slots = state.availability.slots(&query).await;
    Ok(Json(Slot::open_dates(&slots)))
}
