//! Booking flow tests against a scripted API

use std::collections::HashMap;
use std::sync::Arc;
use std::sync::Mutex;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use chrono::{DateTime, NaiveDate, Utc};
use shared::ErrorCode;
use shared::models::{
    Booking, BookingCreate, BookingStatus, CartLineItem, Location, ResourceSelectionStrategy,
    Service, Slot, SlotQuery,
};

use booking_client::{
    BookingApi, BookingFlow, BookingFlowDriver, CheckoutGate, ClientError, ClientResult,
    ConfirmOutcome, CustomerDetails, FlowStep,
};

const LOCATION_ID: &str = "loc-downtown";
const SERVICE_ID: &str = "svc-massage";

struct MockState {
    locations: Vec<Location>,
    services: Vec<Service>,
    open_dates: Mutex<Vec<NaiveDate>>,
    slots: Mutex<Vec<Slot>>,
    /// Confirm attempts that should be rejected as conflicts before one
    /// succeeds. Each rejection also removes the contested slot.
    conflicts_remaining: AtomicUsize,
    created: Mutex<Vec<BookingCreate>>,
    customer_bookings: Mutex<Vec<Booking>>,
}

#[derive(Clone)]
struct MockApi {
    state: Arc<MockState>,
}

fn location(id: &str, name: &str) -> Location {
    Location {
        id: id.into(),
        name: name.into(),
        address: None,
        city: None,
        country: None,
        time_zone: "Europe/Madrid".into(),
        resource_selection_strategy: ResourceSelectionStrategy::Randomize,
        enabled: true,
    }
}

impl MockApi {
    fn new() -> Self {
        Self::with_locations(vec![
            location(LOCATION_ID, "Downtown Spa"),
            location("loc-uptown", "Uptown Spa"),
        ])
    }

    fn with_locations(locations: Vec<Location>) -> Self {
        let date = test_date();
        Self {
            state: Arc::new(MockState {
                locations,
                services: vec![Service {
                    id: SERVICE_ID.into(),
                    name: "Deep Tissue Massage".into(),
                    description: None,
                    duration: 60,
                    price: Some(80.0),
                    location_id: Some(LOCATION_ID.into()),
                }],
                open_dates: Mutex::new(vec![date]),
                slots: Mutex::new(vec![slot_at(10), slot_at(11)]),
                conflicts_remaining: AtomicUsize::new(0),
                created: Mutex::new(Vec::new()),
                customer_bookings: Mutex::new(Vec::new()),
            }),
        }
    }

    fn set_conflicts(&self, n: usize) {
        self.state.conflicts_remaining.store(n, Ordering::SeqCst);
    }

    fn set_open_dates(&self, dates: Vec<NaiveDate>) {
        *self.state.open_dates.lock().unwrap() = dates;
    }

    fn created(&self) -> Vec<BookingCreate> {
        self.state.created.lock().unwrap().clone()
    }
}

fn test_date() -> NaiveDate {
    NaiveDate::from_ymd_opt(2099, 1, 15).unwrap()
}

fn slot_at(hour: u32) -> Slot {
    let start: DateTime<Utc> = format!("2099-01-15T{hour:02}:00:00Z").parse().unwrap();
    Slot {
        id: format!("{SERVICE_ID}:{}", start.timestamp()),
        start_time: start,
        end_time: start + chrono::Duration::minutes(60),
        available: true,
        service_id: Some(SERVICE_ID.into()),
        location_id: Some(LOCATION_ID.into()),
        duration: Some(60),
    }
}

#[async_trait]
impl BookingApi for MockApi {
    async fn locations(&self) -> ClientResult<Vec<Location>> {
        Ok(self.state.locations.clone())
    }

    async fn services(&self, _location_id: &str) -> ClientResult<Vec<Service>> {
        Ok(self.state.services.clone())
    }

    async fn open_dates(
        &self,
        _service_id: &str,
        _location_id: &str,
    ) -> ClientResult<Vec<NaiveDate>> {
        Ok(self.state.open_dates.lock().unwrap().clone())
    }

    async fn slots(&self, _query: &SlotQuery) -> ClientResult<Vec<Slot>> {
        Ok(self.state.slots.lock().unwrap().clone())
    }

    async fn create_booking(&self, data: &BookingCreate) -> ClientResult<Booking> {
        let remaining = self.state.conflicts_remaining.load(Ordering::SeqCst);
        if remaining > 0 {
            self.state
                .conflicts_remaining
                .store(remaining - 1, Ordering::SeqCst);
            // Someone else took the window.
            self.state
                .slots
                .lock()
                .unwrap()
                .retain(|s| s.start_time != data.start_time);
            return Err(ClientError::Api {
                code: ErrorCode::Conflict,
                message: "The selected time is no longer available".into(),
            });
        }

        self.state.created.lock().unwrap().push(data.clone());
        let now = Utc::now();
        Ok(Booking {
            id: format!("bk-{}", self.state.created.lock().unwrap().len()),
            customer_id: data.customer_id.clone(),
            product_id: data.product_id.clone(),
            service_id: data.service_id.clone(),
            location_id: data.location_id.clone(),
            start_time: data.start_time,
            end_time: data.end_time,
            status: BookingStatus::Confirmed,
            customer_name: data.customer_name.clone(),
            customer_email: data.customer_email.clone(),
            customer_phone: data.customer_phone.clone(),
            notes: data.notes.clone(),
            external_booking_id: Some("ext-1".into()),
            created_at: now,
            updated_at: now,
        })
    }

    async fn booking(&self, id: &str) -> ClientResult<Booking> {
        self.state
            .customer_bookings
            .lock()
            .unwrap()
            .iter()
            .find(|b| b.id == id)
            .cloned()
            .ok_or(ClientError::Api {
                code: ErrorCode::NotFound,
                message: format!("Booking {id} not found"),
            })
    }

    async fn cancel_booking(&self, id: &str) -> ClientResult<Booking> {
        let mut booking = self.booking(id).await?;
        booking.status = BookingStatus::Cancelled;
        Ok(booking)
    }

    async fn bookings_for_customer(&self, customer_id: &str) -> ClientResult<Vec<Booking>> {
        Ok(self
            .state
            .customer_bookings
            .lock()
            .unwrap()
            .iter()
            .filter(|b| b.customer_id == customer_id)
            .cloned()
            .collect())
    }
}

fn details() -> CustomerDetails {
    CustomerDetails {
        name: "Sarah Johnson".into(),
        email: "sarah@example.com".into(),
        phone: Some("+34 600 000 000".into()),
        notes: None,
    }
}

async fn advance_to_confirm(flow: &mut BookingFlow<MockApi>, slot_id: &str) {
    flow.start().await.unwrap();
    flow.select_location(LOCATION_ID).await.unwrap();
    flow.select_service(SERVICE_ID).await.unwrap();
    flow.select_date(test_date()).await.unwrap();
    flow.select_slot(slot_id).unwrap();
    flow.set_details(details()).unwrap();
}

#[tokio::test]
async fn happy_path_walks_every_step() {
    let api = MockApi::new();
    let mut flow = BookingFlow::new(api.clone());

    flow.start().await.unwrap();
    assert_eq!(flow.step(), FlowStep::Location);
    assert_eq!(flow.locations().len(), 2);

    flow.select_location(LOCATION_ID).await.unwrap();
    assert_eq!(flow.step(), FlowStep::Service);

    flow.select_service(SERVICE_ID).await.unwrap();
    assert_eq!(flow.step(), FlowStep::Date);
    assert_eq!(flow.open_dates(), &[test_date()]);

    flow.select_date(test_date()).await.unwrap();
    assert_eq!(flow.step(), FlowStep::Time);
    assert_eq!(flow.slots().len(), 2);

    let slot_id = flow.slots()[0].id.clone();
    flow.select_slot(&slot_id).unwrap();
    assert_eq!(flow.step(), FlowStep::Details);

    flow.set_details(details()).unwrap();
    assert_eq!(flow.step(), FlowStep::Confirm);

    let outcome = flow.confirm("cus_1", Some("prod_1".into())).await.unwrap();
    let booking = match outcome {
        ConfirmOutcome::Booked(b) => b,
        other => panic!("expected Booked, got {other:?}"),
    };
    assert_eq!(booking.status, BookingStatus::Confirmed);
    assert!(flow.is_done());
    assert_eq!(flow.booking().map(|b| b.id.as_str()), Some(booking.id.as_str()));

    let created = api.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].service_id, SERVICE_ID);
    assert_eq!(created[0].product_id.as_deref(), Some("prod_1"));
    assert_eq!(
        (created[0].end_time - created[0].start_time).num_minutes(),
        60
    );
}

#[tokio::test]
async fn conflict_at_confirm_returns_to_time_step() {
    let api = MockApi::new();
    api.set_conflicts(1);
    let mut flow = BookingFlow::new(api.clone());

    let contested = slot_at(10).id;
    advance_to_confirm(&mut flow, &contested).await;

    let outcome = flow.confirm("cus_1", None).await.unwrap();
    let refreshed = match outcome {
        ConfirmOutcome::SlotTaken(slots) => slots,
        other => panic!("expected SlotTaken, got {other:?}"),
    };

    // Back at the time step with the contested slot gone, contact draft
    // still on file.
    assert_eq!(flow.step(), FlowStep::Time);
    assert!(flow.selected_slot().is_none());
    assert!(refreshed.iter().all(|s| s.id != contested));
    assert!(flow.details().is_some());

    // Re-picking a time is all it takes; the retained details carry
    // straight through to confirm.
    let other_slot = refreshed[0].id.clone();
    flow.select_slot(&other_slot).unwrap();
    assert_eq!(flow.step(), FlowStep::Confirm);
    let outcome = flow.confirm("cus_1", None).await.unwrap();
    assert!(matches!(outcome, ConfirmOutcome::Booked(_)));

    let created = api.created();
    assert_eq!(created.len(), 1);
    assert_eq!(created[0].customer_name, "Sarah Johnson");
}

#[tokio::test]
async fn stale_slot_response_is_discarded() {
    let api = MockApi::new();
    let mut flow = BookingFlow::new(api);
    flow.start().await.unwrap();
    flow.select_location(LOCATION_ID).await.unwrap();
    flow.select_service(SERVICE_ID).await.unwrap();
    flow.select_date(test_date()).await.unwrap();
    assert_eq!(flow.slots().len(), 2);

    // A slow response for a date the customer already navigated away from
    // must not overwrite the current list.
    let abandoned = SlotQuery::single_day(SERVICE_ID, LOCATION_ID, test_date());
    flow.select_date(test_date().succ_opt().unwrap()).await.unwrap();
    flow.apply_slots(&abandoned, Vec::new());
    assert_eq!(flow.slots().len(), 2);

    // A response keyed to the current query applies.
    let current = flow.current_query().cloned().unwrap();
    flow.apply_slots(&current, vec![slot_at(9)]);
    assert_eq!(flow.slots().len(), 1);
}

#[tokio::test]
async fn driver_runs_the_flow_and_is_idle_between_calls() {
    let api = MockApi::new();
    api.set_conflicts(1);
    let mut driver = BookingFlowDriver::new(api.clone());

    driver.start().await.unwrap();
    driver.select_location(LOCATION_ID).await.unwrap();
    driver.select_service(SERVICE_ID).await.unwrap();
    driver.select_date(test_date()).await.unwrap();
    driver.select_slot(&slot_at(10).id).unwrap();
    driver.set_details(details()).unwrap();
    assert!(!driver.is_busy());

    // A failed submission must not leave the driver wedged.
    let outcome = driver.confirm("cus_1", None).await.unwrap();
    assert!(matches!(outcome, ConfirmOutcome::SlotTaken(_)));
    assert!(!driver.is_busy());

    let remaining = driver.flow().slots()[0].id.clone();
    driver.select_slot(&remaining).unwrap();
    let outcome = driver.confirm("cus_1", None).await.unwrap();
    assert!(matches!(outcome, ConfirmOutcome::Booked(_)));
    assert!(!driver.is_busy());
    assert_eq!(api.created().len(), 1);
}

#[tokio::test]
async fn single_location_skips_the_location_step() {
    let api = MockApi::with_locations(vec![location(LOCATION_ID, "Downtown Spa")]);
    let mut flow = BookingFlow::new(api);

    flow.start().await.unwrap();
    assert_eq!(flow.step(), FlowStep::Service);
    assert_eq!(flow.services().len(), 1);
}

#[tokio::test]
async fn empty_window_reports_no_availability() {
    let api = MockApi::new();
    api.set_open_dates(Vec::new());
    let mut flow = BookingFlow::new(api);

    flow.start().await.unwrap();
    flow.select_location(LOCATION_ID).await.unwrap();
    flow.select_service(SERVICE_ID).await.unwrap();

    assert_eq!(flow.step(), FlowStep::Date);
    assert!(!flow.has_availability());
}

#[tokio::test]
async fn steps_cannot_be_skipped() {
    let api = MockApi::new();
    let mut flow = BookingFlow::new(api);
    flow.start().await.unwrap();

    assert!(matches!(
        flow.select_service(SERVICE_ID).await,
        Err(ClientError::Flow(_))
    ));
    assert!(matches!(
        flow.select_date(test_date()).await,
        Err(ClientError::Flow(_))
    ));
    assert!(matches!(flow.select_slot("nope"), Err(ClientError::Flow(_))));
    assert!(matches!(
        flow.confirm("cus_1", None).await,
        Err(ClientError::Flow(_))
    ));
}

#[tokio::test]
async fn unknown_selections_are_rejected() {
    let api = MockApi::new();
    let mut flow = BookingFlow::new(api);
    flow.start().await.unwrap();

    assert!(matches!(
        flow.select_location("loc-unknown").await,
        Err(ClientError::Flow(_))
    ));

    flow.select_location(LOCATION_ID).await.unwrap();
    assert!(matches!(
        flow.select_service("svc-unknown").await,
        Err(ClientError::Flow(_))
    ));
}

#[tokio::test]
async fn going_back_clears_downstream_selection() {
    let api = MockApi::new();
    let mut flow = BookingFlow::new(api);
    let slot_id = slot_at(10).id;
    advance_to_confirm(&mut flow, &slot_id).await;

    // Confirm -> Details -> Time
    flow.back();
    assert_eq!(flow.step(), FlowStep::Details);
    flow.back();
    assert_eq!(flow.step(), FlowStep::Time);
    assert!(flow.selected_slot().is_none());

    // The slot list for the date is still loaded.
    assert_eq!(flow.slots().len(), 2);

    flow.back();
    assert_eq!(flow.step(), FlowStep::Date);
    assert!(flow.slots().is_empty());
}

#[tokio::test]
async fn empty_details_are_rejected_before_any_request() {
    let api = MockApi::new();
    let mut flow = BookingFlow::new(api.clone());
    flow.start().await.unwrap();
    flow.select_location(LOCATION_ID).await.unwrap();
    flow.select_service(SERVICE_ID).await.unwrap();
    flow.select_date(test_date()).await.unwrap();
    flow.select_slot(&slot_at(10).id).unwrap();

    let mut bad = details();
    bad.email = "  ".into();
    assert!(matches!(flow.set_details(bad), Err(ClientError::Flow(_))));
    assert!(api.created().is_empty());
}

#[tokio::test]
async fn checkout_gate_blocks_until_every_item_is_booked() {
    let api = MockApi::new();

    let cart = vec![CartLineItem {
        id: "item_1".into(),
        product_id: "prod_1".into(),
        title: "Deep Tissue Massage".into(),
        quantity: 1,
        metadata: HashMap::from([("requires_booking".to_string(), "true".to_string())]),
        tags: Vec::new(),
    }];

    let mut gate = CheckoutGate::new(&cart);
    assert!(!gate.is_complete());

    // Book the item through the flow and record the result against it.
    let mut flow = BookingFlow::new(api.clone());
    advance_to_confirm(&mut flow, &slot_at(10).id).await;
    let outcome = flow.confirm("cus_1", Some("prod_1".into())).await.unwrap();
    let booking = match outcome {
        ConfirmOutcome::Booked(b) => b,
        other => panic!("expected Booked, got {other:?}"),
    };
    gate.record_completed("item_1", &booking.id).unwrap();
    assert!(gate.is_complete());
    api.state.customer_bookings.lock().unwrap().push(booking);

    // A bookable item added after the fact blocks the gate again.
    let mut bigger_cart = cart.clone();
    bigger_cart.push(CartLineItem {
        id: "item_2".into(),
        product_id: "prod_2".into(),
        title: "Hot Stone Massage".into(),
        quantity: 1,
        metadata: HashMap::new(),
        tags: vec!["appointment".into()],
    });
    gate.sync_cart(&bigger_cart);
    assert!(!gate.is_complete());
    assert_eq!(gate.pending_items()[0].id, "item_2");
}

#[tokio::test]
async fn checkout_gate_resumes_from_server_bookings_per_item() {
    let api = MockApi::new();

    // Two line items for the same product: one live booking on the server
    // can satisfy only one of them.
    let item = |id: &str| CartLineItem {
        id: id.into(),
        product_id: "prod_1".into(),
        title: "Deep Tissue Massage".into(),
        quantity: 1,
        metadata: HashMap::from([("requires_booking".to_string(), "true".to_string())]),
        tags: Vec::new(),
    };
    let cart = vec![item("item_1"), item("item_2")];

    let mut flow = BookingFlow::new(api.clone());
    advance_to_confirm(&mut flow, &slot_at(10).id).await;
    let outcome = flow.confirm("cus_1", Some("prod_1".into())).await.unwrap();
    let booking = match outcome {
        ConfirmOutcome::Booked(b) => b,
        other => panic!("expected Booked, got {other:?}"),
    };
    api.state.customer_bookings.lock().unwrap().push(booking);

    let mut gate = CheckoutGate::new(&cart);
    gate.resume_from_server(&api, "cus_1").await.unwrap();
    assert!(!gate.is_complete());
    assert!(gate.booking_for("item_1").is_some());
    assert_eq!(gate.pending_items()[0].id, "item_2");
}
