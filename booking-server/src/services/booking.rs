//! Booking lifecycle
//!
//! Commit path: validate, check the local window, re-validate the slot
//! against the provider, reserve, then persist. The provider's rejection
//! of a double-reservation is the authoritative mutual exclusion; the
//! local check and unique index keep this instance honest in between.

use std::sync::Arc;

use chrono::{Duration, Utc};
use shared::models::{Booking, BookingCreate, BookingStatus, BookingUpdate, SlotQuery};
use shared::{AppError, AppResult};
use tracing::{info, warn};
use uuid::Uuid;

use crate::db::repository::{BookingFilter, BookingRepository, RepoError};
use crate::provider::types::{ReservationMetadata, ReservationRequest};
use crate::provider::SchedulingProvider;
use crate::utils::validation::{
    validate_email, validate_optional_text, validate_required_text, MAX_NAME_LEN, MAX_NOTE_LEN,
    MAX_SHORT_TEXT_LEN,
};

#[derive(Clone)]
pub struct BookingService {
    repo: BookingRepository,
    provider: Arc<dyn SchedulingProvider>,
}

impl BookingService {
    pub fn new(repo: BookingRepository, provider: Arc<dyn SchedulingProvider>) -> Self {
        Self { repo, provider }
    }

    /// Commit a booking.
    ///
    /// Ordering matters: the provider reservation is created before the
    /// local row, so a row never exists without its external counterpart.
    /// If the local insert then fails, the reservation is released on a
    /// best-effort basis and the sweep picks up anything that slips
    /// through.
    pub async fn create(&self, input: BookingCreate) -> AppResult<Booking> {
        self.validate_create(&input)?;

        // Fast local rejection before any provider round-trip.
        let occupied = self
            .repo
            .find_active_in_window(&input.service_id, &input.location_id, input.start_time)
            .await?;
        if occupied.is_some() {
            return Err(AppError::conflict("The selected time is no longer available"));
        }

        // Snapshot availability was taken when the customer picked the
        // slot; it may be stale by now, so ask the provider again.
        let query = SlotQuery::single_day(
            &input.service_id,
            &input.location_id,
            input.start_time.date_naive(),
        );
        let slots = self.provider.list_slots(&query).await.map_err(AppError::from)?;
        let still_open = slots
            .iter()
            .any(|slot| slot.available && slot.start_time == input.start_time);
        if !still_open {
            return Err(AppError::conflict("The selected time is no longer available"));
        }

        self.check_duration(&input).await?;

        let request = ReservationRequest {
            service_id: input.service_id.clone(),
            location_id: input.location_id.clone(),
            starts_at: input.start_time,
            ends_at: input.end_time,
            metadata: Some(ReservationMetadata {
                customer_name: input.customer_name.clone(),
                customer_email: input.customer_email.clone(),
            }),
        };
        let reservation = self
            .provider
            .create_reservation(&request)
            .await
            .map_err(AppError::from)?;

        let status = if reservation.is_confirmed() {
            BookingStatus::Confirmed
        } else {
            BookingStatus::Pending
        };

        let now = Utc::now();
        let booking = Booking {
            id: Uuid::new_v4().to_string(),
            customer_id: input.customer_id,
            product_id: input.product_id,
            service_id: input.service_id,
            location_id: input.location_id,
            start_time: input.start_time,
            end_time: input.end_time,
            status,
            customer_name: input.customer_name,
            customer_email: input.customer_email,
            customer_phone: input.customer_phone,
            notes: input.notes,
            external_booking_id: Some(reservation.id.clone()),
            created_at: now,
            updated_at: now,
        };

        match self.repo.insert(&booking).await {
            Ok(booking) => {
                info!(
                    booking_id = %booking.id,
                    status = booking.status.as_str(),
                    "Booking created"
                );
                Ok(booking)
            }
            Err(err) => {
                self.release_reservation(&reservation.id).await;
                match err {
                    RepoError::Conflict(_) => {
                        Err(AppError::conflict("The selected time is no longer available"))
                    }
                    other => Err(other.into()),
                }
            }
        }
    }

    pub async fn get(&self, id: &str) -> AppResult<Booking> {
        self.repo
            .find_by_id(id)
            .await?
            .ok_or_else(|| AppError::not_found(format!("Booking {id}")))
    }

    /// Customer history, most recent first. Degrades to empty on storage
    /// failure so the account page always renders.
    pub async fn list_by_customer(&self, customer_id: &str) -> Vec<Booking> {
        match self.repo.list_by_customer(customer_id).await {
            Ok(bookings) => bookings,
            Err(err) => {
                warn!(customer_id, "Failed to list bookings, degrading to empty: {err}");
                Vec::new()
            }
        }
    }

    /// Filtered listing for the staff console. Console queries are
    /// diagnostic; a storage error here should be visible, not hidden.
    pub async fn list_filtered(&self, filter: &BookingFilter) -> AppResult<Vec<Booking>> {
        Ok(self.repo.list_filtered(filter).await?)
    }

    /// Apply a partial update, enforcing the lifecycle state machine.
    ///
    /// A status change to `cancelled` goes through the same release path
    /// as [`cancel`](Self::cancel) so the provider reservation is never
    /// orphaned by a console edit.
    pub async fn update(&self, id: &str, update: BookingUpdate) -> AppResult<Booking> {
        let mut booking = self.get(id).await?;

        if let Some(ref name) = update.customer_name {
            validate_required_text(name, "customer_name", MAX_NAME_LEN)?;
        }
        if let Some(ref email) = update.customer_email {
            validate_email(email, "customer_email")?;
        }
        validate_optional_text(&update.customer_phone, "customer_phone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&update.notes, "notes", MAX_NOTE_LEN)?;

        if let Some(next) = update.status {
            if !booking.status.can_transition_to(next) {
                return Err(AppError::validation(format!(
                    "Cannot transition booking from {} to {}",
                    booking.status.as_str(),
                    next.as_str()
                ))
                .with_detail("current_status", booking.status.as_str())
                .with_detail("requested_status", next.as_str()));
            }
            if next == BookingStatus::Cancelled && booking.status != BookingStatus::Cancelled {
                if let Some(ref external_id) = booking.external_booking_id {
                    self.provider
                        .cancel_reservation(external_id)
                        .await
                        .map_err(AppError::from)?;
                }
            }
            booking.status = next;
        }

        if let Some(name) = update.customer_name {
            booking.customer_name = name;
        }
        if let Some(email) = update.customer_email {
            booking.customer_email = email;
        }
        if update.customer_phone.is_some() {
            booking.customer_phone = update.customer_phone;
        }
        if update.notes.is_some() {
            booking.notes = update.notes;
        }
        booking.updated_at = Utc::now();

        Ok(self.repo.update(&booking).await?)
    }

    /// Cancel a booking, releasing the provider reservation first.
    ///
    /// Idempotent: cancelling an already-cancelled booking succeeds
    /// without touching the provider. Completed bookings cannot be
    /// cancelled. If the provider release fails the local row is left
    /// untouched so a retry can release it.
    pub async fn cancel(&self, id: &str) -> AppResult<Booking> {
        let mut booking = self.get(id).await?;

        if booking.status == BookingStatus::Cancelled {
            return Ok(booking);
        }
        if booking.status == BookingStatus::Completed {
            return Err(AppError::validation("A completed booking cannot be cancelled"));
        }

        if let Some(ref external_id) = booking.external_booking_id {
            self.provider
                .cancel_reservation(external_id)
                .await
                .map_err(AppError::from)?;
        }

        booking.status = BookingStatus::Cancelled;
        booking.updated_at = Utc::now();
        let booking = self.repo.update(&booking).await?;
        info!(booking_id = %booking.id, "Booking cancelled");
        Ok(booking)
    }

    /// Cancel pending bookings older than the TTL, releasing their
    /// reservations. Bookings whose release fails are skipped and retried
    /// on the next sweep. Returns the number cancelled.
    pub async fn sweep_stale_pending(&self, ttl: Duration) -> AppResult<usize> {
        let cutoff = Utc::now() - ttl;
        let stale = self.repo.list_stale_pending(cutoff).await?;
        let mut cancelled = 0;

        for mut booking in stale {
            if let Some(ref external_id) = booking.external_booking_id
                && let Err(err) = self.provider.cancel_reservation(external_id).await
            {
                warn!(
                    booking_id = %booking.id,
                    "Failed to release stale reservation, will retry: {err}"
                );
                continue;
            }
            booking.status = BookingStatus::Cancelled;
            booking.updated_at = Utc::now();
            match self.repo.update(&booking).await {
                Ok(_) => {
                    info!(booking_id = %booking.id, "Stale pending booking cancelled");
                    cancelled += 1;
                }
                Err(err) => {
                    warn!(booking_id = %booking.id, "Failed to cancel stale booking: {err}");
                }
            }
        }
        Ok(cancelled)
    }

    fn validate_create(&self, input: &BookingCreate) -> AppResult<()> {
        validate_required_text(&input.customer_id, "customer_id", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&input.service_id, "service_id", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&input.location_id, "location_id", MAX_SHORT_TEXT_LEN)?;
        validate_required_text(&input.customer_name, "customer_name", MAX_NAME_LEN)?;
        validate_email(&input.customer_email, "customer_email")?;
        validate_optional_text(&input.customer_phone, "customer_phone", MAX_SHORT_TEXT_LEN)?;
        validate_optional_text(&input.notes, "notes", MAX_NOTE_LEN)?;

        if input.start_time >= input.end_time {
            return Err(AppError::validation("start_time must be before end_time"));
        }
        Ok(())
    }

    /// Best-effort check that the requested window matches the service's
    /// advertised duration. Skipped when the catalog read fails; the slot
    /// re-validation above has already confirmed the window exists.
    async fn check_duration(&self, input: &BookingCreate) -> AppResult<()> {
        let Ok(services) = self.provider.list_services(Some(&input.location_id)).await else {
            return Ok(());
        };
        if let Some(service) = services.iter().find(|s| s.id == input.service_id) {
            let requested = (input.end_time - input.start_time).num_minutes();
            if requested != service.duration {
                return Err(AppError::validation(format!(
                    "Booking duration ({requested} min) does not match the service duration ({} min)",
                    service.duration
                ))
                .with_detail("service_duration", service.duration));
            }
        }
        Ok(())
    }

    async fn release_reservation(&self, external_id: &str) {
        if let Err(err) = self.provider.cancel_reservation(external_id).await {
            warn!(external_id, "Failed to release reservation after insert failure: {err}");
        }
    }
}
