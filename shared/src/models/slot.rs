//! Slot model
//!
//! A candidate reservation window. Slots are ephemeral, provider-computed
//! facts: each one is valid only in the context of the query that produced
//! it and must be re-validated at commit time, because availability can
//! change between query and commit.

use chrono::{DateTime, NaiveDate, Utc};
use serde::{Deserialize, Serialize};

/// A provider-computed candidate time window. Never persisted.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Slot {
    pub id: String,
    pub start_time: DateTime<Utc>,
    pub end_time: DateTime<Utc>,
    /// Reflects provider state at query time only.
    pub available: bool,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub service_id: Option<String>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub location_id: Option<String>,
    /// Minutes, when the provider reports it.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub duration: Option<i64>,
}

impl Slot {
    /// Distinct calendar dates (UTC) that have at least one available slot.
    /// Used to disable empty dates in the date picker.
    pub fn open_dates(slots: &[Slot]) -> Vec<NaiveDate> {
        let mut dates: Vec<NaiveDate> = slots
            .iter()
            .filter(|s| s.available)
            .map(|s| s.start_time.date_naive())
            .collect();
        dates.sort_unstable();
        dates.dedup();
        dates
    }
}

/// The selection parameters that produce a slot list.
///
/// Doubles as the staleness key for in-flight availability queries: a
/// response is applied only if its query still matches the current
/// selection.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq, Hash)]
pub struct SlotQuery {
    pub service_id: String,
    pub location_id: String,
    /// Inclusive start date
    pub from: NaiveDate,
    /// Inclusive end date
    pub to: NaiveDate,
}

impl SlotQuery {
    /// Query for a single day (time-picker step).
    pub fn single_day(
        service_id: impl Into<String>,
        location_id: impl Into<String>,
        date: NaiveDate,
    ) -> Self {
        Self {
            service_id: service_id.into(),
            location_id: location_id.into(),
            from: date,
            to: date,
        }
    }

    /// Query spanning `days` days from `from` (date-picker step).
    pub fn window(
        service_id: impl Into<String>,
        location_id: impl Into<String>,
        from: NaiveDate,
        days: u32,
    ) -> Self {
        Self {
            service_id: service_id.into(),
            location_id: location_id.into(),
            from,
            to: from + chrono::Days::new(u64::from(days.saturating_sub(1))),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::TimeZone;

    fn slot(start: &str, available: bool) -> Slot {
        let start_time: DateTime<Utc> = start.parse().unwrap();
        Slot {
            id: format!("slot-{start}"),
            start_time,
            end_time: start_time + chrono::Duration::minutes(60),
            available,
            service_id: None,
            location_id: None,
            duration: Some(60),
        }
    }

    #[test]
    fn open_dates_dedups_and_skips_unavailable() {
        let slots = vec![
            slot("2024-01-15T10:00:00Z", true),
            slot("2024-01-15T11:00:00Z", true),
            slot("2024-01-16T10:00:00Z", false),
            slot("2024-01-17T09:00:00Z", true),
        ];
        let dates = Slot::open_dates(&slots);
        assert_eq!(
            dates,
            vec![
                NaiveDate::from_ymd_opt(2024, 1, 15).unwrap(),
                NaiveDate::from_ymd_opt(2024, 1, 17).unwrap(),
            ]
        );
    }

    #[test]
    fn window_query_spans_inclusive_range() {
        let from = NaiveDate::from_ymd_opt(2024, 1, 15).unwrap();
        let q = SlotQuery::window("svc", "loc", from, 90);
        assert_eq!(q.from, from);
        assert_eq!(q.to, NaiveDate::from_ymd_opt(2024, 4, 13).unwrap());

        let single = SlotQuery::single_day("svc", "loc", from);
        assert_eq!(single.from, single.to);
    }

    #[test]
    fn slot_serializes_instants_as_iso8601() {
        let s = slot("2024-01-15T10:00:00Z", true);
        let json = serde_json::to_value(&s).unwrap();
        assert_eq!(json["start_time"], "2024-01-15T10:00:00Z");
        assert_eq!(
            s.start_time,
            Utc.with_ymd_and_hms(2024, 1, 15, 10, 0, 0).unwrap()
        );
    }
}
