//! # Domain Module
//!
//! Business logic for the chore tracker. [`points`] and [`calendar`] are pure;
//! the services load state through the storage traits, hand it to the pure
//! core and persist what comes back.

pub mod calendar;
pub mod catalog_service;
pub mod child_service;
pub mod chore_service;
pub mod commands;
pub mod points;
pub mod redemption_service;
pub mod seed;

pub use calendar::{Clock, FixedClock, SystemClock};
pub use catalog_service::{CatalogService, CatalogValidationError};
pub use child_service::{ChildService, ChildValidationError};
pub use chore_service::{ChoreError, ChoreService};
pub use points::PointsError;
pub use redemption_service::{RedemptionError, RedemptionService};
pub use seed::{seed_data, SeedSummary};
