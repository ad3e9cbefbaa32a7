//! Booking repository

use super::{RepoError, RepoResult};
use chrono::{DateTime, Utc};
use shared::models::{Booking, BookingStatus};
use sqlx::{QueryBuilder, Sqlite, SqlitePool};

const ALL_COLUMNS: &str = "id, customer_id, product_id, service_id, location_id, \
     start_time, end_time, status, customer_name, customer_email, \
     customer_phone, notes, external_booking_id, created_at, updated_at";

/// Admin console filter. All fields optional; unset fields do not
/// constrain the result.
#[derive(Debug, Clone, Default)]
pub struct BookingFilter {
    pub customer_id: Option<String>,
    pub status: Option<BookingStatus>,
    pub service_id: Option<String>,
    pub location_id: Option<String>,
    /// Inclusive lower bound on start_time
    pub from: Option<DateTime<Utc>>,
    /// Exclusive upper bound on start_time
    pub to: Option<DateTime<Utc>>,
}

#[derive(Clone, Debug)]
pub struct BookingRepository {
    pool: SqlitePool,
}

impl BookingRepository {
    pub fn new(pool: SqlitePool) -> Self {
        Self { pool }
    }

    /// Insert a fully-formed booking row.
    ///
    /// A unique violation on the live-window index surfaces as
    /// [`RepoError::Conflict`]; it means another booking claimed the same
    /// service/location/start window first.
    pub async fn insert(&self, booking: &Booking) -> RepoResult<Booking> {
        sqlx::query(
            "INSERT INTO bookings (id, customer_id, product_id, service_id, location_id, \
             start_time, end_time, status, customer_name, customer_email, \
             customer_phone, notes, external_booking_id, created_at, updated_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&booking.id)
        .bind(&booking.customer_id)
        .bind(&booking.product_id)
        .bind(&booking.service_id)
        .bind(&booking.location_id)
        .bind(booking.start_time)
        .bind(booking.end_time)
        .bind(booking.status)
        .bind(&booking.customer_name)
        .bind(&booking.customer_email)
        .bind(&booking.customer_phone)
        .bind(&booking.notes)
        .bind(&booking.external_booking_id)
        .bind(booking.created_at)
        .bind(booking.updated_at)
        .execute(&self.pool)
        .await?;

        Ok(booking.clone())
    }

    pub async fn find_by_id(&self, id: &str) -> RepoResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {ALL_COLUMNS} FROM bookings WHERE id = ?"
        ))
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }

    /// Persist the mutable fields of an existing booking.
    pub async fn update(&self, booking: &Booking) -> RepoResult<Booking> {
        let result = sqlx::query(
            "UPDATE bookings SET status = ?, customer_name = ?, customer_email = ?, \
             customer_phone = ?, notes = ?, external_booking_id = ?, updated_at = ? \
             WHERE id = ?",
        )
        .bind(booking.status)
        .bind(&booking.customer_name)
        .bind(&booking.customer_email)
        .bind(&booking.customer_phone)
        .bind(&booking.notes)
        .bind(&booking.external_booking_id)
        .bind(booking.updated_at)
        .bind(&booking.id)
        .execute(&self.pool)
        .await?;

        if result.rows_affected() == 0 {
            return Err(RepoError::NotFound(format!("Booking {}", booking.id)));
        }
        Ok(booking.clone())
    }

    /// All bookings for a customer, most recent first.
    pub async fn list_by_customer(&self, customer_id: &str) -> RepoResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {ALL_COLUMNS} FROM bookings WHERE customer_id = ? ORDER BY created_at DESC"
        ))
        .bind(customer_id)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }

    /// Filtered listing for the staff console.
    pub async fn list_filtered(&self, filter: &BookingFilter) -> RepoResult<Vec<Booking>> {
        let mut query: QueryBuilder<Sqlite> =
            QueryBuilder::new(format!("SELECT {ALL_COLUMNS} FROM bookings WHERE 1 = 1"));

        if let Some(ref customer_id) = filter.customer_id {
            query.push(" AND customer_id = ").push_bind(customer_id);
        }
        if let Some(status) = filter.status {
            query.push(" AND status = ").push_bind(status);
        }
        if let Some(ref service_id) = filter.service_id {
            query.push(" AND service_id = ").push_bind(service_id);
        }
        if let Some(ref location_id) = filter.location_id {
            query.push(" AND location_id = ").push_bind(location_id);
        }
        if let Some(from) = filter.from {
            query.push(" AND start_time >= ").push_bind(from);
        }
        if let Some(to) = filter.to {
            query.push(" AND start_time < ").push_bind(to);
        }
        query.push(" ORDER BY created_at DESC");

        let bookings = query
            .build_query_as::<Booking>()
            .fetch_all(&self.pool)
            .await?;
        Ok(bookings)
    }

    /// The live (non-cancelled) booking occupying a window, if any.
    ///
    /// This is the local compare-and-swap read backing the conflict
    /// policy; the unique index enforces the same rule at write time.
    pub async fn find_active_in_window(
        &self,
        service_id: &str,
        location_id: &str,
        start_time: DateTime<Utc>,
    ) -> RepoResult<Option<Booking>> {
        let booking = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {ALL_COLUMNS} FROM bookings \
             WHERE service_id = ? AND location_id = ? AND start_time = ? \
             AND status != 'cancelled'"
        ))
        .bind(service_id)
        .bind(location_id)
        .bind(start_time)
        .fetch_optional(&self.pool)
        .await?;
        Ok(booking)
    }

    /// Pending bookings created before the cutoff, oldest first.
    pub async fn list_stale_pending(&self, cutoff: DateTime<Utc>) -> RepoResult<Vec<Booking>> {
        let bookings = sqlx::query_as::<_, Booking>(&format!(
            "SELECT {ALL_COLUMNS} FROM bookings \
             WHERE status = 'pending' AND created_at < ? ORDER BY created_at"
        ))
        .bind(cutoff)
        .fetch_all(&self.pool)
        .await?;
        Ok(bookings)
    }
}
