//! Booking API handlers

use axum::{
    Json,
    extract::{Path, Query, State},
};
use serde::Deserialize;
use shared::AppResult;
use shared::models::{Booking, BookingCreate, BookingStatus, BookingUpdate};

use crate::core::ServerState;
use crate::db::repository::BookingFilter;
use crate::utils::time::{day_end, day_start, parse_date};

#[derive(Debug, Default, Deserialize)]
pub struct BookingListParams {
    pub customer_id: Option<String>,
    pub status: Option<BookingStatus>,
    pub service_id: Option<String>,
    pub location_id: Option<String>,
    /// YYYY-MM-DD, inclusive
    pub from: Option<String>,
    /// YYYY-MM-DD, inclusive
    pub to: Option<String>,
}

impl BookingListParams {
    fn has_console_filters(&self) -> bool {
        self.status.is_some()
            || self.service_id.is_some()
            || self.location_id.is_some()
            || self.from.is_some()
            || self.to.is_some()
    }
}

/// GET /api/bookings - customer history (customer_id only) or console
/// listing (any other filter present)
///
/// The customer path degrades to an empty list on storage failure;
/// console queries surface errors.
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<BookingListParams>,
) -> AppResult<Json<Vec<Booking>>> {
    if let Some(ref customer_id) = params.customer_id
        && !params.has_console_filters()
    {
        return Ok(Json(state.bookings.list_by_customer(customer_id).await));
    }

    let filter = BookingFilter {
        customer_id: params.customer_id,
        status: params.status,
        service_id: params.service_id,
        location_id: params.location_id,
        from: params.from.as_deref().map(parse_date).transpose()?.map(day_start),
        to: params.to.as_deref().map(parse_date).transpose()?.map(day_end),
    };
    let bookings = state.bookings.list_filtered(&filter).await?;
    Ok(Json(bookings))
}

/// POST /api/bookings - commit a booking
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<BookingCreate>,
) -> AppResult<Json<Booking>> {
    let booking = state.bookings.create(data).await?;
    Ok(Json(booking))
}

/// GET /api/bookings/:id
pub async fn get_by_id(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let booking = state.bookings.get(&id).await?;
    Ok(Json(booking))
}

/// PUT /api/bookings/:id - partial update, lifecycle enforced
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(data): Json<BookingUpdate>,
) -> AppResult<Json<Booking>> {
    let booking = state.bookings.update(&id, data).await?;
    Ok(Json(booking))
}

/// DELETE /api/bookings/:id - cancel (idempotent)
pub async fn cancel(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let booking = state.bookings.cancel(&id).await?;
    Ok(Json(booking))
}

/// POST /api/bookings/:id/cancel - same as DELETE, for clients that
/// cannot send bodiless DELETEs through their proxies
pub async fn cancel_by_post(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<Booking>> {
    let booking = state.bookings.cancel(&id).await?;
    Ok(Json(booking))
}
