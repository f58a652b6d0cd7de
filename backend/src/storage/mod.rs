//! # Storage Module
//!
//! Handles all data persistence for the chore tracker.
//!
//! The domain layer only talks to the traits in [`traits`]; the CSV/YAML
//! implementation in [`csv`] is one backend behind them. A connection owns
//! its resolved data directory and [`Connectivity`] state, so switching to
//! the local fallback never touches global state.

pub mod connectivity;
pub mod csv;
pub mod traits;

pub use self::connectivity::{Connectivity, StorageConfig};
pub use self::csv::CsvConnection;
pub use self::traits::{
    ChildStorage, CompletionStorage, Connection, RedemptionStorage, RewardStorage, TaskStorage,
};
