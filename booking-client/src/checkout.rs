//! Checkout booking gate
//!
//! Checkout must not complete while any bookable cart line item is still
//! without its own booking. The gate tracks each line item separately: a
//! flow run books exactly one item, and the resulting booking id is
//! recorded against that item's id. Two line items for the same product
//! need two bookings; a single booking never satisfies both.

use std::collections::HashMap;

use shared::models::{Booking, BookingStatus, CartLineItem};

use crate::api::BookingApi;
use crate::error::{ClientError, ClientResult};

pub struct CheckoutGate {
    /// Bookable line items, in cart order.
    items: Vec<CartLineItem>,
    /// Booking id per completed line item id.
    completed: HashMap<String, String>,
}

impl CheckoutGate {
    pub fn new(cart: &[CartLineItem]) -> Self {
        Self {
            items: bookable(cart),
            completed: HashMap::new(),
        }
    }

    /// Bookable items that still need a booking, in cart order.
    pub fn pending_items(&self) -> Vec<&CartLineItem> {
        self.items
            .iter()
            .filter(|item| !self.completed.contains_key(&item.id))
            .collect()
    }

    /// True once every bookable item has a booking recorded against it.
    /// Vacuously true for a cart with no bookable items.
    pub fn is_complete(&self) -> bool {
        self.items
            .iter()
            .all(|item| self.completed.contains_key(&item.id))
    }

    /// The booking recorded for a line item, if any.
    pub fn booking_for(&self, item_id: &str) -> Option<&str> {
        self.completed.get(item_id).map(String::as_str)
    }

    /// Record the booking a flow run produced for one line item.
    pub fn record_completed(
        &mut self,
        item_id: &str,
        booking_id: impl Into<String>,
    ) -> ClientResult<()> {
        if !self.items.iter().any(|item| item.id == item_id) {
            return Err(ClientError::Flow(format!(
                "no bookable cart item: {item_id}"
            )));
        }
        self.completed.insert(item_id.to_string(), booking_id.into());
        Ok(())
    }

    /// Re-read the cart. Bookable items added since the last sync re-open
    /// the gate; completions for items no longer in the cart are dropped.
    pub fn sync_cart(&mut self, cart: &[CartLineItem]) {
        self.items = bookable(cart);
        self.completed
            .retain(|item_id, _| self.items.iter().any(|item| item.id == *item_id));
    }

    /// Claim existing live bookings for items that have none yet, matching
    /// by product id. Each booking is claimed by at most one item, so a
    /// cart with two items for the same product stays blocked until both
    /// are booked.
    pub fn resume(&mut self, bookings: &[Booking]) {
        let mut unclaimed: Vec<&Booking> = bookings
            .iter()
            .filter(|b| b.status != BookingStatus::Cancelled)
            .filter(|b| !self.completed.values().any(|id| *id == b.id))
            .collect();

        for item in &self.items {
            if self.completed.contains_key(&item.id) {
                continue;
            }
            if let Some(pos) = unclaimed
                .iter()
                .position(|b| b.product_id.as_deref() == Some(item.product_id.as_str()))
            {
                let booking = unclaimed.remove(pos);
                self.completed.insert(item.id.clone(), booking.id.clone());
            }
        }
    }

    /// Resume from the customer's bookings on the server.
    pub async fn resume_from_server<A: BookingApi>(
        &mut self,
        api: &A,
        customer_id: &str,
    ) -> ClientResult<()> {
        let bookings = api.bookings_for_customer(customer_id).await?;
        self.resume(&bookings);
        Ok(())
    }
}

fn bookable(cart: &[CartLineItem]) -> Vec<CartLineItem> {
    cart.iter()
        .filter(|item| item.requires_booking())
        .cloned()
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::{DateTime, Utc};
    use std::collections::HashMap;

    fn bookable_item(id: &str, product_id: &str) -> CartLineItem {
        CartLineItem {
            id: id.into(),
            product_id: product_id.into(),
            title: "Deep Tissue Massage".into(),
            quantity: 1,
            metadata: HashMap::from([("requires_booking".to_string(), "true".to_string())]),
            tags: Vec::new(),
        }
    }

    fn plain_item(id: &str, product_id: &str) -> CartLineItem {
        CartLineItem {
            id: id.into(),
            product_id: product_id.into(),
            title: "Massage Oil".into(),
            quantity: 1,
            metadata: HashMap::new(),
            tags: Vec::new(),
        }
    }

    fn booking(id: &str, product_id: &str, status: BookingStatus) -> Booking {
        let start: DateTime<Utc> = "2099-01-15T10:00:00Z".parse().unwrap();
        Booking {
            id: id.into(),
            customer_id: "cus_1".into(),
            product_id: Some(product_id.into()),
            service_id: "svc_1".into(),
            location_id: "loc_1".into(),
            start_time: start,
            end_time: start + chrono::Duration::minutes(60),
            status,
            customer_name: "Sarah Johnson".into(),
            customer_email: "sarah@example.com".into(),
            customer_phone: None,
            notes: None,
            external_booking_id: None,
            created_at: start,
            updated_at: start,
        }
    }

    #[test]
    fn cart_without_bookable_items_passes() {
        let gate = CheckoutGate::new(&[plain_item("item_1", "prod_1")]);
        assert!(gate.is_complete());
        assert!(gate.pending_items().is_empty());
    }

    #[test]
    fn unbooked_bookable_item_blocks_checkout() {
        let gate = CheckoutGate::new(&[
            bookable_item("item_1", "prod_1"),
            plain_item("item_2", "prod_2"),
        ]);
        assert!(!gate.is_complete());
        let pending = gate.pending_items();
        assert_eq!(pending.len(), 1);
        assert_eq!(pending[0].id, "item_1");
    }

    #[test]
    fn recording_a_booking_per_item_opens_the_gate() {
        let mut gate = CheckoutGate::new(&[bookable_item("item_1", "prod_1")]);
        gate.record_completed("item_1", "bk_1").unwrap();
        assert!(gate.is_complete());
        assert_eq!(gate.booking_for("item_1"), Some("bk_1"));

        assert!(matches!(
            gate.record_completed("item_9", "bk_2"),
            Err(ClientError::Flow(_))
        ));
    }

    #[test]
    fn two_items_for_the_same_product_need_two_bookings() {
        let mut gate = CheckoutGate::new(&[
            bookable_item("item_1", "prod_1"),
            bookable_item("item_2", "prod_1"),
        ]);

        gate.record_completed("item_1", "bk_1").unwrap();
        assert!(!gate.is_complete());
        assert_eq!(gate.pending_items()[0].id, "item_2");

        gate.record_completed("item_2", "bk_2").unwrap();
        assert!(gate.is_complete());
    }

    #[test]
    fn resume_claims_each_booking_for_at_most_one_item() {
        let mut gate = CheckoutGate::new(&[
            bookable_item("item_1", "prod_1"),
            bookable_item("item_2", "prod_1"),
        ]);

        gate.resume(&[booking("bk_1", "prod_1", BookingStatus::Confirmed)]);
        assert!(!gate.is_complete());
        assert_eq!(gate.booking_for("item_1"), Some("bk_1"));
        assert_eq!(gate.pending_items()[0].id, "item_2");

        gate.resume(&[
            booking("bk_1", "prod_1", BookingStatus::Confirmed),
            booking("bk_2", "prod_1", BookingStatus::Pending),
        ]);
        assert!(gate.is_complete());
        assert_eq!(gate.booking_for("item_2"), Some("bk_2"));
    }

    #[test]
    fn cancelled_booking_does_not_satisfy_the_gate() {
        let mut gate = CheckoutGate::new(&[bookable_item("item_1", "prod_1")]);
        gate.resume(&[booking("bk_1", "prod_1", BookingStatus::Cancelled)]);
        assert!(!gate.is_complete());
    }

    #[test]
    fn cart_sync_reopens_the_gate_for_new_items() {
        let cart = vec![bookable_item("item_1", "prod_1")];
        let mut gate = CheckoutGate::new(&cart);
        gate.record_completed("item_1", "bk_1").unwrap();
        assert!(gate.is_complete());

        let mut bigger = cart.clone();
        bigger.push(bookable_item("item_2", "prod_2"));
        gate.sync_cart(&bigger);
        assert!(!gate.is_complete());
        assert_eq!(gate.pending_items()[0].id, "item_2");
        // item_1's completion survives the sync.
        assert_eq!(gate.booking_for("item_1"), Some("bk_1"));

        // Removing an item drops its completion with it.
        gate.sync_cart(&[bookable_item("item_2", "prod_2")]);
        assert_eq!(gate.booking_for("item_1"), None);
    }
}
