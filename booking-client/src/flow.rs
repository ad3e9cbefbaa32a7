//! Booking flow state machine
//!
//! Drives the customer through location, service, date, time and contact
//! details before committing. Each selection invalidates everything
//! downstream of it, and availability responses are applied only when
//! they still match the current selection, so a slow response for an old
//! date can never overwrite a newer one.
//!
//! A conflict at confirm is not an error path: the flow drops back to the
//! time step with fresh slots and lets the customer pick again. The
//! contact draft survives the trip, so only the time has to be re-picked.

use chrono::NaiveDate;
use shared::models::{Booking, BookingCreate, Location, Service, Slot, SlotQuery};
use tracing::debug;

use crate::api::BookingApi;
use crate::error::{ClientError, ClientResult};

/// The steps of the booking flow, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FlowStep {
    Location,
    Service,
    Date,
    Time,
    Details,
    Confirm,
    /// A booking was committed; the flow is finished.
    Done,
}

/// Contact details collected at the details step.
#[derive(Debug, Clone)]
pub struct CustomerDetails {
    pub name: String,
    pub email: String,
    pub phone: Option<String>,
    pub notes: Option<String>,
}

/// What came out of a confirm attempt.
#[derive(Debug)]
pub enum ConfirmOutcome {
    Booked(Booking),
    /// The window was taken between selection and confirm. Carries the
    /// refreshed slot list; the flow is already back at the time step.
    SlotTaken(Vec<Slot>),
}

pub struct BookingFlow<A: BookingApi> {
    api: A,
    step: FlowStep,

    locations: Vec<Location>,
    services: Vec<Service>,
    open_dates: Vec<NaiveDate>,
    slots: Vec<Slot>,

    location: Option<Location>,
    service: Option<Service>,
    date: Option<NaiveDate>,
    slot: Option<Slot>,
    details: Option<CustomerDetails>,
    booking: Option<Booking>,

    /// Staleness key: slot responses are applied only while this still
    /// matches the query that produced them.
    current_query: Option<SlotQuery>,
}

impl<A: BookingApi> BookingFlow<A> {
    pub fn new(api: A) -> Self {
        Self {
            api,
            step: FlowStep::Location,
            locations: Vec::new(),
            services: Vec::new(),
            open_dates: Vec::new(),
            slots: Vec::new(),
            location: None,
            service: None,
            date: None,
            slot: None,
            details: None,
            booking: None,
            current_query: None,
        }
    }

    pub fn step(&self) -> FlowStep {
        self.step
    }

    pub fn locations(&self) -> &[Location] {
        &self.locations
    }

    pub fn services(&self) -> &[Service] {
        &self.services
    }

    pub fn open_dates(&self) -> &[NaiveDate] {
        &self.open_dates
    }

    pub fn slots(&self) -> &[Slot] {
        &self.slots
    }

    pub fn selected_slot(&self) -> Option<&Slot> {
        self.slot.as_ref()
    }

    /// The contact draft, kept across a conflict so the form can be
    /// prefilled.
    pub fn details(&self) -> Option<&CustomerDetails> {
        self.details.as_ref()
    }

    /// The query behind the current slot list, if any. Out-of-band
    /// availability fetches use this as the key for [`Self::apply_slots`].
    pub fn current_query(&self) -> Option<&SlotQuery> {
        self.current_query.as_ref()
    }

    /// The committed booking, once the flow is done.
    pub fn booking(&self) -> Option<&Booking> {
        self.booking.as_ref()
    }

    pub fn is_done(&self) -> bool {
        self.step == FlowStep::Done
    }

    /// Whether the selected service has any open date in the window.
    /// False means "no availability" should be shown instead of an empty
    /// date picker.
    pub fn has_availability(&self) -> bool {
        !self.open_dates.is_empty()
    }

    /// Load the location list and enter the flow. A single-location
    /// system skips straight to the service step.
    pub async fn start(&mut self) -> ClientResult<()> {
        self.locations = self.api.locations().await?;
        self.step = FlowStep::Location;
        if self.locations.len() == 1 {
            let id = self.locations[0].id.clone();
            self.select_location(&id).await?;
        }
        Ok(())
    }

    /// Pick a location and load its services.
    pub async fn select_location(&mut self, location_id: &str) -> ClientResult<()> {
        let location = self
            .locations
            .iter()
            .find(|l| l.id == location_id)
            .cloned()
            .ok_or_else(|| ClientError::Flow(format!("unknown location: {location_id}")))?;

        self.services = self.api.services(&location.id).await?;
        self.location = Some(location);
        self.clear_from(FlowStep::Service);
        self.step = FlowStep::Service;
        Ok(())
    }

    /// Pick a service and load the dates that have availability.
    pub async fn select_service(&mut self, service_id: &str) -> ClientResult<()> {
        let location = self.require_location()?.clone();
        let service = self
            .services
            .iter()
            .find(|s| s.id == service_id)
            .cloned()
            .ok_or_else(|| ClientError::Flow(format!("unknown service: {service_id}")))?;

        self.open_dates = self.api.open_dates(&service.id, &location.id).await?;
        self.service = Some(service);
        self.clear_from(FlowStep::Date);
        self.step = FlowStep::Date;
        Ok(())
    }

    /// Pick a date and load its slots.
    pub async fn select_date(&mut self, date: NaiveDate) -> ClientResult<()> {
        let location = self.require_location()?.clone();
        let service = self.require_service()?.clone();

        let query = SlotQuery::single_day(&service.id, &location.id, date);
        self.current_query = Some(query.clone());
        self.date = Some(date);
        self.clear_from(FlowStep::Time);

        let slots = self.api.slots(&query).await?;
        self.apply_slots(&query, slots);
        self.step = FlowStep::Time;
        Ok(())
    }

    /// Pick a time from the loaded slots.
    pub fn select_slot(&mut self, slot_id: &str) -> ClientResult<()> {
        if self.date.is_none() {
            return Err(ClientError::Flow("no date selected".into()));
        }
        let slot = self
            .slots
            .iter()
            .find(|s| s.id == slot_id)
            .cloned()
            .ok_or_else(|| ClientError::Flow(format!("unknown slot: {slot_id}")))?;
        if !slot.available {
            return Err(ClientError::Flow(format!("slot not available: {slot_id}")));
        }
        self.slot = Some(slot);
        // With a contact draft already on file (after a conflict) only the
        // time needed re-picking.
        self.step = if self.details.is_some() {
            FlowStep::Confirm
        } else {
            FlowStep::Details
        };
        Ok(())
    }

    /// Record contact details. Full validation is the server's job; this
    /// only rejects obviously empty input before a round-trip.
    pub fn set_details(&mut self, details: CustomerDetails) -> ClientResult<()> {
        if self.slot.is_none() {
            return Err(ClientError::Flow("no time selected".into()));
        }
        if details.name.trim().is_empty() {
            return Err(ClientError::Flow("name must not be empty".into()));
        }
        if details.email.trim().is_empty() {
            return Err(ClientError::Flow("email must not be empty".into()));
        }
        self.details = Some(details);
        self.step = FlowStep::Confirm;
        Ok(())
    }

    /// Commit the booking.
    ///
    /// On a conflict the flow re-queries availability for the selected
    /// date, drops back to the time step (keeping the contact draft) and
    /// reports [`ConfirmOutcome::SlotTaken`]; any other error propagates.
    pub async fn confirm(
        &mut self,
        customer_id: &str,
        product_id: Option<String>,
    ) -> ClientResult<ConfirmOutcome> {
        if self.step != FlowStep::Confirm {
            return Err(ClientError::Flow("flow is not ready to confirm".into()));
        }
        let service = self.require_service()?.clone();
        let location = self.require_location()?.clone();
        let slot = self
            .slot
            .clone()
            .ok_or_else(|| ClientError::Flow("no time selected".into()))?;
        let details = self
            .details
            .clone()
            .ok_or_else(|| ClientError::Flow("no contact details".into()))?;

        let data = BookingCreate {
            customer_id: customer_id.to_string(),
            service_id: service.id.clone(),
            location_id: location.id.clone(),
            start_time: slot.start_time,
            end_time: slot.end_time,
            customer_name: details.name,
            customer_email: details.email,
            customer_phone: details.phone,
            notes: details.notes,
            product_id,
        };

        match self.api.create_booking(&data).await {
            Ok(booking) => {
                self.booking = Some(booking.clone());
                self.step = FlowStep::Done;
                Ok(ConfirmOutcome::Booked(booking))
            }
            Err(err) if err.is_conflict() => {
                debug!("Slot taken at confirm, re-querying availability");
                let query = self
                    .current_query
                    .clone()
                    .ok_or_else(|| ClientError::Flow("no availability query".into()))?;
                let slots = self.api.slots(&query).await?;
                self.apply_slots(&query, slots);
                self.slot = None;
                self.step = FlowStep::Time;
                Ok(ConfirmOutcome::SlotTaken(self.slots.clone()))
            }
            Err(err) => Err(err),
        }
    }

    /// Step back one step, dropping the selection that step had made.
    pub fn back(&mut self) {
        self.step = match self.step {
            FlowStep::Location => FlowStep::Location,
            FlowStep::Service => {
                self.location = None;
                self.clear_from(FlowStep::Service);
                FlowStep::Location
            }
            FlowStep::Date => {
                self.service = None;
                self.clear_from(FlowStep::Date);
                FlowStep::Service
            }
            FlowStep::Time => {
                self.date = None;
                self.current_query = None;
                self.clear_from(FlowStep::Time);
                FlowStep::Date
            }
            FlowStep::Details => {
                self.slot = None;
                FlowStep::Time
            }
            FlowStep::Confirm => {
                self.details = None;
                FlowStep::Details
            }
            // A committed booking cannot be navigated away from.
            FlowStep::Done => FlowStep::Done,
        };
    }

    /// Apply a slot response if its query still matches the current
    /// selection; a stale response is dropped. UIs that fetch
    /// availability out of band route the result through here so a slow
    /// response for an abandoned date can never land.
    pub fn apply_slots(&mut self, query: &SlotQuery, slots: Vec<Slot>) {
        if self.current_query.as_ref() == Some(query) {
            self.slots = slots;
        } else {
            debug!("Dropping stale slot response");
        }
    }

    fn clear_from(&mut self, step: FlowStep) {
        // Clearing a step clears everything downstream of it too.
        if matches!(step, FlowStep::Service) {
            self.service = None;
            self.open_dates.clear();
        }
        if matches!(step, FlowStep::Service | FlowStep::Date) {
            self.date = None;
            self.slots.clear();
            self.current_query = None;
        }
        if matches!(step, FlowStep::Service | FlowStep::Date | FlowStep::Time) {
            self.slot = None;
            self.details = None;
        }
    }

    fn require_location(&self) -> ClientResult<&Location> {
        self.location
            .as_ref()
            .ok_or_else(|| ClientError::Flow("no location selected".into()))
    }

    fn require_service(&self) -> ClientResult<&Service> {
        self.service
            .as_ref()
            .ok_or_else(|| ClientError::Flow("no service selected".into()))
    }
}
