//! Shared server state
//!
//! Cloned into every handler; everything inside is cheap to clone
//! (Arcs and pool handles).

use std::sync::Arc;

use shared::AppResult;

use crate::core::config::Config;
use crate::db::DbService;
use crate::db::repository::BookingRepository;
use crate::provider::{HttpProvider, SchedulingProvider};
use crate::services::{AvailabilityService, BookingService};

#[derive(Clone)]
pub struct ServerState {
    pub config: Arc<Config>,
    pub db: DbService,
    pub provider: Arc<dyn SchedulingProvider>,
    pub availability: AvailabilityService,
    pub bookings: BookingService,
}

impl ServerState {
    /// Wire up the production state: open the database, apply migrations
    /// and build the HTTP provider client.
    pub async fn initialize(config: &Config) -> AppResult<Self> {
        let db = DbService::new(&config.database_url).await?;
        let provider: Arc<dyn SchedulingProvider> = Arc::new(HttpProvider::from_config(config)?);
        Ok(Self::assemble(config.clone(), db, provider))
    }

    /// Build state around an already-opened database and an arbitrary
    /// provider implementation. Tests use this to script the provider.
    pub fn with_provider(config: Config, db: DbService, provider: Arc<dyn SchedulingProvider>) -> Self {
        Self::assemble(config, db, provider)
    }

    fn assemble(config: Config, db: DbService, provider: Arc<dyn SchedulingProvider>) -> Self {
        let repo = BookingRepository::new(db.pool.clone());
        let availability = AvailabilityService::new(provider.clone());
        let bookings = BookingService::new(repo, provider.clone());
        Self {
            config: Arc::new(config),
            db,
            provider,
            availability,
            bookings,
        }
    }
}
