//! Location API handlers

use axum::{
    Json,
    extract::{Path, State},
};
use shared::AppResult;
use shared::models::{Location, LocationCreate, LocationUpdate};

use crate::core::ServerState;
use crate::utils::validation::{MAX_NAME_LEN, validate_required_text};

/// GET /api/locations - enabled locations, empty when the provider is
/// unreachable
pub async fn list(State(state): State<ServerState>) -> Json<Vec<Location>> {
    Json(state.availability.locations().await)
}

/// POST /api/locations - create a location at the provider
pub async fn create(
    State(state): State<ServerState>,
    Json(data): Json<LocationCreate>,
) -> AppResult<Json<Location>> {
    validate_required_text(&data.name, "name", MAX_NAME_LEN)?;
    validate_required_text(&data.time_zone, "time_zone", MAX_NAME_LEN)?;
    let location = state.provider.create_location(&data).await?;
    Ok(Json(location))
}

/// PUT /api/locations/:id - update a location at the provider
pub async fn update(
    State(state): State<ServerState>,
    Path(id): Path<String>,
    Json(data): Json<LocationUpdate>,
) -> AppResult<Json<Location>> {
    if let Some(ref name) = data.name {
        validate_required_text(name, "name", MAX_NAME_LEN)?;
    }
    let location = state.provider.update_location(&id, &data).await?;
    Ok(Json(location))
}

/// DELETE /api/locations/:id - delete a location at the provider
pub async fn delete(
    State(state): State<ServerState>,
    Path(id): Path<String>,
) -> AppResult<Json<serde_json::Value>> {
    state.provider.delete_location(&id).await?;
    Ok(Json(serde_json::json!({ "deleted": id })))
}
