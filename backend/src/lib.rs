//! # Chore Tracker Backend
//!
//! Points ledger, services and file storage for a household chore chart.
//! Children earn points by checking off tasks and spend them on rewards.
//!
//! Everything is synchronous. Frontends construct a [`Backend`] and call the
//! services on it directly.

use anyhow::Result;
use std::sync::Arc;

pub mod config;
pub mod domain;
pub mod storage;

pub use config::TrackerConfig;
pub use storage::csv::CsvConnection;

use domain::{CatalogService, ChildService, ChoreService, Clock, RedemptionService, SystemClock};
use storage::traits::Connection;

/// All services wired to one storage connection and clock
#[derive(Clone)]
pub struct Backend<C: Connection> {
    pub connection: C,
    pub child_service: ChildService<C>,
    pub catalog_service: CatalogService<C>,
    pub chore_service: ChoreService<C>,
    pub redemption_service: RedemptionService<C>,
}

impl<C: Connection> Backend<C> {
    pub fn new(connection: C, clock: Arc<dyn Clock>, recent_redemptions_limit: usize) -> Self {
        Self {
            child_service: ChildService::new(&connection),
            catalog_service: CatalogService::new(&connection),
            chore_service: ChoreService::new(&connection, clock.clone()),
            redemption_service: RedemptionService::new(&connection, clock)
                .with_recent_limit(recent_redemptions_limit),
            connection,
        }
    }
}

impl Backend<CsvConnection> {
    /// Open file storage as configured, seeding empty catalogs when enabled
    pub fn open(config: &TrackerConfig) -> Result<Self> {
        let connection = CsvConnection::new(config.storage.clone())?;
        if config.seed_on_first_run {
            domain::seed_data(&connection)?;
        }
        Ok(Self::new(
            connection,
            Arc::new(SystemClock),
            config.recent_redemptions_limit,
        ))
    }
}
