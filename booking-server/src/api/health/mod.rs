//! Health check routes
//!
//! # Routes
//!
//! | Path | Method | Description |
//! |------|--------|-------------|
//! | /health | GET | simple liveness check |
//! | /health/detailed | GET | per-component health (database, provider) |
//! | /health/provider | GET | provider probe only (short timeout) |

use axum::{Json, Router, extract::State, routing::get};
use serde::Serialize;

use crate::core::ServerState;
use crate::provider::ProviderError;

pub fn router() -> Router<ServerState> {
    Router::new()
        .route("/health", get(health))
        .route("/health/detailed", get(detailed_health))
        .route("/health/provider", get(provider_health))
}

#[derive(Serialize)]
pub struct HealthResponse {
    status: &'static str,
    version: &'static str,
}

#[derive(Serialize)]
pub struct DetailedHealthResponse {
    status: &'static str,
    version: &'static str,
    checks: HealthChecks,
}

#[derive(Serialize)]
pub struct HealthChecks {
    database: CheckResult,
    provider: CheckResult,
}

#[derive(Serialize)]
pub struct CheckResult {
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

impl CheckResult {
    fn ok(latency_ms: u64) -> Self {
        Self {
            status: "ok",
            latency_ms: Some(latency_ms),
            message: None,
        }
    }

    fn error(message: impl Into<String>) -> Self {
        Self {
            status: "error",
            latency_ms: None,
            message: Some(message.into()),
        }
    }
}

#[derive(Serialize)]
pub struct ProviderHealthResponse {
    /// "ok", "unconfigured" or "error". Missing credentials are reported
    /// separately from connectivity failures.
    status: &'static str,
    #[serde(skip_serializing_if = "Option::is_none")]
    latency_ms: Option<u64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    message: Option<String>,
}

pub async fn health() -> Json<HealthResponse> {
    Json(HealthResponse {
        status: "healthy",
        version: env!("CARGO_PKG_VERSION"),
    })
}

/// GET /health/provider - probe the provider alone, distinguishing
/// missing credentials from an unreachable provider.
pub async fn provider_health(State(state): State<ServerState>) -> Json<ProviderHealthResponse> {
    let start = std::time::Instant::now();
    let response = match state.provider.health_check().await {
        Ok(()) => ProviderHealthResponse {
            status: "ok",
            latency_ms: Some(start.elapsed().as_millis() as u64),
            message: None,
        },
        Err(ProviderError::Configuration(msg)) => ProviderHealthResponse {
            status: "unconfigured",
            latency_ms: None,
            message: Some(msg),
        },
        Err(e) => ProviderHealthResponse {
            status: "error",
            latency_ms: None,
            message: Some(e.to_string()),
        },
    };
    Json(response)
}

/// Per-component health. The provider probe uses the short health
/// timeout, so this endpoint answers within a few seconds even when the
/// provider is down.
pub async fn detailed_health(State(state): State<ServerState>) -> Json<DetailedHealthResponse> {
    let db_start = std::time::Instant::now();
    let db_check = match sqlx::query_scalar::<_, i64>("SELECT 1")
        .fetch_one(&state.db.pool)
        .await
    {
        Ok(_) => CheckResult::ok(db_start.elapsed().as_millis() as u64),
        Err(e) => CheckResult::error(format!("Database error: {e}")),
    };

    let provider_start = std::time::Instant::now();
    let provider_check = match state.provider.health_check().await {
        Ok(()) => CheckResult::ok(provider_start.elapsed().as_millis() as u64),
        Err(e) => CheckResult::error(e.to_string()),
    };

    let all_ok = db_check.status == "ok" && provider_check.status == "ok";

    Json(DetailedHealthResponse {
        status: if all_ok { "healthy" } else { "degraded" },
        version: env!("CARGO_PKG_VERSION"),
        checks: HealthChecks {
            database: db_check,
            provider: provider_check,
        },
    })
}
