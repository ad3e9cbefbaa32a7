//! Service catalog handlers

use axum::{
    Json,
    extract::{Query, State},
};
use serde::Deserialize;
use shared::models::{Service, ServiceCreate};
use shared::{AppError, AppResult};

use crate::core::ServerState;
use crate::utils::validation::{
    MAX_NAME_LEN, MAX_NOTE_LEN, validate_optional_text, validate_required_text,
};

#[derive(Debug, Deserialize)]
pub struct ServiceListParams {
    /// Restrict to services offered at this location.
    pub location_id: Option<String>,
}

/// GET /api/services - bookable services, empty when the provider is
/// unreachable
pub async fn list(
    State(state): State<ServerState>,
    Query(params): Query<ServiceListParams>,
) -> Json<Vec<Service>> {
    Json(
        state
            .availability
            .services(params.location_id.as_deref())
            .await,
    )
}

#[derive(Debug, Deserialize)]
pub struct FlowServiceListParams {
    pub location: Option<String>,
}

/// GET /api/booking-services - same list under the name the flow uses
pub async fn flow_list(
    State(state): State<ServerState>,
    Query(params): Query<FlowServiceListParams>,
) -> Json<Vec<Service>> {
    Json(state.availability.services(params.location.as_deref()).await)
}

/// POST /api/services - create a service at the provider
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<ServiceCreate>,
) -> AppResult<Json<Service>> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_optional_text(&data.description, "description", MAX_NOTE_LEN)?;
    if data.duration <= 0 {
        return Err(
            AppError::validation("duration must be a positive number of minutes")
                .with_detail("field", "duration"),
        );
    }
    let service = state.provider.create_service(&data).await?;
    Ok(Json(service))
}
