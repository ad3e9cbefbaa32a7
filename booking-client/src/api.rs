//! Typed client for the booking server's HTTP API
//!
//! Success bodies are plain resource JSON; failures carry the server's
//! `{ code, message, data }` envelope, decoded into [`ClientError::Api`]
//! so callers can branch on the error code.

use async_trait::async_trait;
use chrono::NaiveDate;
use reqwest::Client;
use serde::de::DeserializeOwned;
use shared::models::{Booking, BookingCreate, Location, Service, Slot, SlotQuery};
use shared::{ApiResponse, ErrorCode};

use crate::config::ClientConfig;
use crate::error::{ClientError, ClientResult};

/// The server operations the flow and the checkout gate depend on.
/// Tests script this; production uses [`HttpBookingApi`].
#[async_trait]
pub trait BookingApi: Send + Sync {
    async fn locations(&self) -> ClientResult<Vec<Location>>;
    async fn services(&self, location_id: &str) -> ClientResult<Vec<Service>>;
    async fn open_dates(&self, service_id: &str, location_id: &str)
    -> ClientResult<Vec<NaiveDate>>;
    async fn slots(&self, query: &SlotQuery) -> ClientResult<Vec<Slot>>;
    async fn create_booking(&self, data: &BookingCreate) -> ClientResult<Booking>;
    async fn booking(&self, id: &str) -> ClientResult<Booking>;
    async fn cancel_booking(&self, id: &str) -> ClientResult<Booking>;
    async fn bookings_for_customer(&self, customer_id: &str) -> ClientResult<Vec<Booking>>;
}

pub struct HttpBookingApi {
    client: Client,
    base_url: String,
}

impl HttpBookingApi {
    pub fn new(config: &ClientConfig) -> ClientResult<Self> {
        let client = Client::builder()
            .timeout(config.timeout)
            .build()
            .map_err(|e| ClientError::Http(e.to_string()))?;
        Ok(Self {
            client,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    fn url(&self, path: &str) -> String {
        format!("{}/{}", self.base_url, path.trim_start_matches('/'))
    }

    async fn decode<T: DeserializeOwned>(response: reqwest::Response) -> ClientResult<T> {
        let status = response.status();
        if status.is_success() {
            return response
                .json()
                .await
                .map_err(|e| ClientError::Decode(e.to_string()));
        }

        // Error bodies are the server's response envelope.
        let envelope: ApiResponse<serde_json::Value> = response
            .json()
            .await
            .map_err(|e| ClientError::Decode(format!("error body for status {status}: {e}")))?;
        Err(ClientError::Api {
            code: ErrorCode::from_code(&envelope.code).unwrap_or(ErrorCode::Internal),
            message: envelope.message,
        })
    }
}

#[async_trait]
impl BookingApi for HttpBookingApi {
    async fn locations(&self) -> ClientResult<Vec<Location>> {
        let response = self.client.get(self.url("api/locations")).send().await?;
        Self::decode(response).await
    }

    async fn services(&self, location_id: &str) -> ClientResult<Vec<Service>> {
        let response = self
            .client
            .get(self.url("api/services"))
            .query(&[("location_id", location_id)])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn open_dates(
        &self,
        service_id: &str,
        location_id: &str,
    ) -> ClientResult<Vec<NaiveDate>> {
        let response = self
            .client
            .get(self.url("api/slots/dates"))
            .query(&[("service_id", service_id), ("location_id", location_id)])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn slots(&self, query: &SlotQuery) -> ClientResult<Vec<Slot>> {
        let response = self
            .client
            .get(self.url("api/slots"))
            .query(&[
                ("service_id", query.service_id.as_str()),
                ("location_id", query.location_id.as_str()),
                ("date", &query.from.to_string()),
            ])
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn create_booking(&self, data: &BookingCreate) -> ClientResult<Booking> {
        let response = self
            .client
            .post(self.url("api/bookings"))
            .json(data)
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn booking(&self, id: &str) -> ClientResult<Booking> {
        let response = self
            .client
            .get(self.url(&format!("api/bookings/{id}")))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn cancel_booking(&self, id: &str) -> ClientResult<Booking> {
        let response = self
            .client
            .delete(self.url(&format!("api/bookings/{id}")))
            .send()
            .await?;
        Self::decode(response).await
    }

    async fn bookings_for_customer(&self, customer_id: &str) -> ClientResult<Vec<Booking>> {
        let response = self
            .client
            .get(self.url("api/bookings"))
            .query(&[("customer_id", customer_id)])
            .send()
            .await?;
        Self::decode(response).await
    }
}
