//! Async driver around the booking flow
//!
//! UI layers tend to fire the same action twice (double taps, re-rendered
//! submit buttons). The driver owns the flow and refuses to start a
//! request while another one is still in flight, so a booking can never
//! be submitted twice. The latch is released when the call resolves, and
//! also when its future is dropped mid-flight.

use chrono::NaiveDate;
use std::sync::Arc;
use std::sync::atomic::{AtomicBool, Ordering};

use crate::api::BookingApi;
use crate::error::{ClientError, ClientResult};
use crate::flow::{BookingFlow, ConfirmOutcome, CustomerDetails};

pub struct BookingFlowDriver<A: BookingApi> {
    flow: BookingFlow<A>,
    in_flight: Arc<AtomicBool>,
}

/// Releases the latch on drop, so a cancelled request does not wedge the
/// driver.
struct InFlightGuard(Arc<AtomicBool>);

impl Drop for InFlightGuard {
    fn drop(&mut self) {
        self.0.store(false, Ordering::SeqCst);
    }
}

fn acquire(latch: &Arc<AtomicBool>) -> ClientResult<InFlightGuard> {
    if latch.swap(true, Ordering::SeqCst) {
        return Err(ClientError::Flow(
            "a request is already in flight".to_string(),
        ));
    }
    Ok(InFlightGuard(latch.clone()))
}

impl<A: BookingApi> BookingFlowDriver<A> {
    pub fn new(api: A) -> Self {
        Self {
            flow: BookingFlow::new(api),
            in_flight: Arc::new(AtomicBool::new(false)),
        }
    }

    /// Read access to the flow for rendering.
    pub fn flow(&self) -> &BookingFlow<A> {
        &self.flow
    }

    pub fn is_busy(&self) -> bool {
        self.in_flight.load(Ordering::SeqCst)
    }

    pub async fn start(&mut self) -> ClientResult<()> {
        let _guard = acquire(&self.in_flight)?;
        self.flow.start().await
    }

    pub async fn select_location(&mut self, location_id: &str) -> ClientResult<()> {
        let _guard = acquire(&self.in_flight)?;
        self.flow.select_location(location_id).await
    }

    pub async fn select_service(&mut self, service_id: &str) -> ClientResult<()> {
        let _guard = acquire(&self.in_flight)?;
        self.flow.select_service(service_id).await
    }

    pub async fn select_date(&mut self, date: NaiveDate) -> ClientResult<()> {
        let _guard = acquire(&self.in_flight)?;
        self.flow.select_date(date).await
    }

    pub fn select_slot(&mut self, slot_id: &str) -> ClientResult<()> {
        self.flow.select_slot(slot_id)
    }

    pub fn set_details(&mut self, details: CustomerDetails) -> ClientResult<()> {
        self.flow.set_details(details)
    }

    /// Submit the booking. A second submission while one is pending is
    /// refused instead of creating a duplicate.
    pub async fn confirm(
        &mut self,
        customer_id: &str,
        product_id: Option<String>,
    ) -> ClientResult<ConfirmOutcome> {
        let _guard = acquire(&self.in_flight)?;
        self.flow.confirm(customer_id, product_id).await
    }

    pub fn back(&mut self) {
        self.flow.back();
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn latch_refuses_overlap_and_releases_on_drop() {
        let latch = Arc::new(AtomicBool::new(false));

        let guard = acquire(&latch).unwrap();
        assert!(matches!(acquire(&latch), Err(ClientError::Flow(_))));

        drop(guard);
        assert!(acquire(&latch).is_ok());
    }
}
