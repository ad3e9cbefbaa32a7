//! HTTP implementation of the scheduling provider client
//!
//! Bearer-token authenticated reqwest client with bounded timeouts: 30s
//! for query/mutating calls, 10s for the health probe. No automatic
//! retries; the caller decides whether to re-query.

use async_trait::async_trait;
use reqwest::{Client, StatusCode};
use serde::de::DeserializeOwned;
use std::time::Duration;

use super::types::{
    Paginated, ProviderErrorBody, ProviderLocation, ProviderService, ProviderSlot, Reservation,
    ReservationRequest,
};
use super::{ProviderError, ProviderResult, SchedulingProvider};
use crate::core::Config;
use shared::models::{
    Location, LocationCreate, LocationUpdate, Service, ServiceCreate, Slot, SlotQuery,
};

pub struct HttpProvider {
    client: Client,
    health_client: Client,
    base_url: String,
    token: Option<String>,
}

impl HttpProvider {
    pub fn new(
        base_url: impl Into<String>,
        token: Option<String>,
        timeout: Duration,
        health_timeout: Duration,
    ) -> ProviderResult<Self> {
        let client = Client::builder()
            .timeout(timeout)
            .build()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        let health_client = Client::builder()
            .timeout(health_timeout)
            .build()
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        Ok(Self {
            client,
            health_client,
            base_url: base_url.into().trim_end_matches('/').to_string(),
            token,
        })
    }

    pub fn from_config(config: &Config) -> ProviderResult<Self> {
        Self::new(
            config.provider_api_url.clone(),
            config.provider_api_token.clone(),
            Duration::from_secs(config.provider_timeout_secs),
            Duration::from_secs(config.provider_health_timeout_secs),
        )
    }

    /// The bearer token, or a configuration error if none is set. Checked
    /// before any network I/O so a missing token never looks like
    /// provider downtime.
    fn token(&self) -> ProviderResult<&str> {
        self.token.as_deref().ok_or_else(|| {
            ProviderError::Configuration("PROVIDER_API_TOKEN is not set".to_string())
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn handle_response<T: DeserializeOwned>(
        &self,
        response: reqwest::Response,
    ) -> ProviderResult<T> {
        let status = response.status();
        if !status.is_success() {
            let body: ProviderErrorBody = response.json().await.unwrap_or_default();
            return Err(ProviderError::Rejected {
                status: status.as_u16(),
                message: body
                    .message
                    .unwrap_or_else(|| format!("unexpected status {status}")),
                errors: body.errors,
            });
        }
        response
            .json()
            .await
            .map_err(|e| ProviderError::Unavailable(format!("invalid provider response: {e}")))
    }

    async fn get_paginated<T: DeserializeOwned>(
        &self,
        path: &str,
        query: &[(&str, String)],
    ) -> ProviderResult<Vec<T>> {
        let token = self.token()?;
        let response = self
            .client
            .get(self.url(path))
            .bearer_auth(token)
            .query(query)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        let page: Paginated<T> = self.handle_response(response).await?;
        Ok(page.data)
    }
}

#[async_trait]
impl SchedulingProvider for HttpProvider {
    async fn list_locations(&self) -> ProviderResult<Vec<Location>> {
        let locations: Vec<ProviderLocation> = self
            .get_paginated("locations", &[("per_page", "100".to_string())])
            .await?;
        Ok(locations
            .into_iter()
            .map(Location::from)
            .filter(|l| l.enabled)
            .collect())
    }

    async fn list_services(&self, location_id: Option<&str>) -> ProviderResult<Vec<Service>> {
        let mut query = vec![("per_page", "100".to_string())];
        if let Some(location_id) = location_id {
            query.push(("location", location_id.to_string()));
        }
        let services: Vec<ProviderService> = self.get_paginated("services", &query).await?;
        Ok(services.into_iter().map(Service::from).collect())
    }

    async fn list_slots(&self, query: &SlotQuery) -> ProviderResult<Vec<Slot>> {
        let path = format!("services/{}/bookable-slots", query.service_id);
        let params = vec![
            ("location", query.location_id.clone()),
            ("from", query.from.to_string()),
            ("to", query.to.to_string()),
        ];
        let slots: Vec<ProviderSlot> = self.get_paginated(&path, &params).await?;
        Ok(slots.into_iter().map(|s| s.into_slot(query)).collect())
    }

    async fn create_reservation(
        &self,
        request: &ReservationRequest,
    ) -> ProviderResult<Reservation> {
        let token = self.token()?;
        let response = self
            .client
            .post(self.url("bookings"))
            .bearer_auth(token)
            .json(request)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        // A conflicting reservation comes back as 409 (or 422 from
        // providers that validate the window as a field error).
        if response.status() == StatusCode::CONFLICT
            || response.status() == StatusCode::UNPROCESSABLE_ENTITY
        {
            return Err(ProviderError::SlotTaken);
        }
        self.handle_response(response).await
    }

    async fn cancel_reservation(&self, external_id: &str) -> ProviderResult<()> {
        let token = self.token()?;
        let response = self
            .client
            .delete(self.url(&format!("bookings/{external_id}")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;

        // Already gone on the provider side is as released as it gets.
        if response.status() == StatusCode::NOT_FOUND || response.status().is_success() {
            return Ok(());
        }
        let status = response.status();
        let body: ProviderErrorBody = response.json().await.unwrap_or_default();
        Err(ProviderError::Rejected {
            status: status.as_u16(),
            message: body
                .message
                .unwrap_or_else(|| format!("unexpected status {status}")),
            errors: body.errors,
        })
    }

    async fn create_location(&self, data: &LocationCreate) -> ProviderResult<Location> {
        let token = self.token()?;
        let response = self
            .client
            .post(self.url("locations"))
            .bearer_auth(token)
            .json(data)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        let location: ProviderLocation = self.handle_response(response).await?;
        Ok(location.into())
    }

    async fn update_location(&self, id: &str, data: &LocationUpdate) -> ProviderResult<Location> {
        let token = self.token()?;
        let response = self
            .client
            .put(self.url(&format!("locations/{id}")))
            .bearer_auth(token)
            .json(data)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        let location: ProviderLocation = self.handle_response(response).await?;
        Ok(location.into())
    }

    async fn delete_location(&self, id: &str) -> ProviderResult<()> {
        let token = self.token()?;
        let response = self
            .client
            .delete(self.url(&format!("locations/{id}")))
            .bearer_auth(token)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        if response.status().is_success() {
            return Ok(());
        }
        let status = response.status();
        let body: ProviderErrorBody = response.json().await.unwrap_or_default();
        Err(ProviderError::Rejected {
            status: status.as_u16(),
            message: body
                .message
                .unwrap_or_else(|| format!("unexpected status {status}")),
            errors: body.errors,
        })
    }

    async fn create_service(&self, data: &ServiceCreate) -> ProviderResult<Service> {
        let token = self.token()?;
        let response = self
            .client
            .post(self.url("services"))
            .bearer_auth(token)
            .json(data)
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        let service: ProviderService = self.handle_response(response).await?;
        Ok(service.into())
    }

    async fn health_check(&self) -> ProviderResult<()> {
        let token = self.token()?;
        let response = self
            .health_client
            .get(self.url("locations"))
            .bearer_auth(token)
            .query(&[("per_page", "1")])
            .send()
            .await
            .map_err(|e| ProviderError::Unavailable(e.to_string()))?;
        if response.status().is_success() {
            Ok(())
        } else {
            Err(ProviderError::Unavailable(format!(
                "health probe returned {}",
                response.status()
            )))
        }
    }
}
