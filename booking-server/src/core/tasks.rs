//! Background tasks
//!
//! A pending booking is a held slot. If checkout abandons it the slot
//! would stay blocked forever, so a periodic sweep cancels pending
//! bookings older than the configured TTL and releases their provider
//! reservations.

use std::time::Duration;

use tracing::{debug, warn};

use crate::core::ServerState;

/// How often the stale-pending sweep runs.
const SWEEP_INTERVAL: Duration = Duration::from_secs(60);

/// Spawn the long-running background tasks for this server instance.
pub fn start_background_tasks(state: &ServerState) {
    spawn_pending_sweep(state.clone());
}

fn spawn_pending_sweep(state: ServerState) {
    tokio::spawn(async move {
        let ttl = chrono::Duration::minutes(state.config.pending_ttl_minutes as i64);
        let mut interval = tokio::time::interval(SWEEP_INTERVAL);
        // The first tick fires immediately; skip it so startup is quiet.
        interval.tick().await;
        loop {
            interval.tick().await;
            match state.bookings.sweep_stale_pending(ttl).await {
                Ok(0) => debug!("Stale pending sweep: nothing to do"),
                Ok(n) => tracing::info!("Stale pending sweep cancelled {n} booking(s)"),
                Err(err) => warn!("Stale pending sweep failed: {err}"),
            }
        }
    });
}
