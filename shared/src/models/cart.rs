//! Cart line item model
//!
//! The commerce platform owns the cart; the booking engine only reads
//! "does this line item require booking". Detection follows the product
//! metadata/tag convention: `requires_booking=true`, `type=service`, or a
//! tag of `service`/`booking`/`appointment`.

use serde::{Deserialize, Serialize};
use std::collections::HashMap;

/// Tags that mark a product as bookable.
const BOOKABLE_TAGS: [&str; 3] = ["service", "booking", "appointment"];

/// A cart line item as seen by the checkout booking gate.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct CartLineItem {
    pub id: String,
    pub product_id: String,
    pub title: String,
    pub quantity: i32,
    /// Commerce product metadata (string key/value pairs).
    #[serde(default)]
    pub metadata: HashMap<String, String>,
    /// Commerce product tag values.
    #[serde(default)]
    pub tags: Vec<String>,
}

impl CartLineItem {
    /// Whether this item needs an appointment before checkout can finish.
    pub fn requires_booking(&self) -> bool {
        if self.metadata.get("requires_booking").map(String::as_str) == Some("true") {
            return true;
        }
        if self.metadata.get("type").map(String::as_str) == Some("service") {
            return true;
        }
        self.tags
            .iter()
            .any(|tag| BOOKABLE_TAGS.contains(&tag.as_str()))
    }
}

/// The subset of a cart that requires booking.
pub fn bookable_items(items: &[CartLineItem]) -> Vec<CartLineItem> {
    items
        .iter()
        .filter(|item| item.requires_booking())
        .cloned()
        .collect()
}
