//! # CSV Storage Module
//!
//! File-based storage for the chore tracker. Catalog-style records that are
//! rewritten as a whole live in YAML; append-style history lives in CSV.
//!
//! ## File Structure
//!
//! ```text
//! data/
//! ├── children.yaml
//! ├── tasks.yaml
//! ├── rewards.yaml
//! ├── redemptions.csv    id,kid_id,reward_id,label,cost,at
//! └── completions.csv    date,kid_id,task_id,completed
//! ```
//!
//! Every write goes to a temp file first and is renamed into place. Missing
//! files read as empty.

pub mod connection;
pub mod child_repository;
pub mod task_repository;
pub mod reward_repository;
pub mod redemption_repository;
pub mod completion_repository;

#[cfg(test)]
pub mod test_utils;

pub use connection::CsvConnection;
pub use child_repository::ChildRepository;
pub use task_repository::TaskRepository;
pub use reward_repository::RewardRepository;
pub use redemption_repository::RedemptionRepository;
pub use completion_repository::CompletionRepository;
