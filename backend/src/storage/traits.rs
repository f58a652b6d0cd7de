//! # Storage Traits
//!
//! This module defines the storage abstraction traits that allow different
//! storage backends to be used interchangeably in the domain layer.
//!
//! All operations are synchronous. The domain assumes a single active
//! mutator, so a save must complete (or fail) before the next load.

use anyhow::Result;
use chrono::NaiveDate;
use shared::{Child, CompletionLedger, Redemption, Reward, Task};

/// Trait defining the interface for child storage operations
pub trait ChildStorage: Send + Sync {
    /// Insert or replace a child by ID
    fn store_child(&self, child: &Child) -> Result<()>;

    /// Retrieve a specific child by ID
    fn get_child(&self, child_id: &str) -> Result<Option<Child>>;

    /// List all children ordered by name
    fn list_children(&self) -> Result<Vec<Child>>;

    /// Delete a child by ID
    /// Returns true if the child was found and deleted
    fn delete_child(&self, child_id: &str) -> Result<bool>;
}

/// Trait defining the interface for the task catalog
pub trait TaskStorage: Send + Sync {
    /// Insert or replace a task by ID
    fn store_task(&self, task: &Task) -> Result<()>;

    fn get_task(&self, task_id: &str) -> Result<Option<Task>>;

    /// List all tasks ordered by title
    fn list_tasks(&self) -> Result<Vec<Task>>;

    fn delete_task(&self, task_id: &str) -> Result<bool>;
}

/// Trait defining the interface for the reward catalog
pub trait RewardStorage: Send + Sync {
    /// Insert or replace a reward by ID
    fn store_reward(&self, reward: &Reward) -> Result<()>;

    fn get_reward(&self, reward_id: &str) -> Result<Option<Reward>>;

    /// List all rewards ordered by label
    fn list_rewards(&self) -> Result<Vec<Reward>>;

    fn delete_reward(&self, reward_id: &str) -> Result<bool>;
}

/// Trait defining the interface for redemption history
pub trait RedemptionStorage: Send + Sync {
    /// Append a redemption record
    fn store_redemption(&self, redemption: &Redemption) -> Result<()>;

    fn get_redemption(&self, redemption_id: &str) -> Result<Option<Redemption>>;

    /// List redemptions, optionally for a single child, in stored order
    fn list_redemptions(&self, kid_id: Option<&str>) -> Result<Vec<Redemption>>;

    /// Delete a redemption record
    /// Returns true if the redemption was found and deleted
    fn delete_redemption(&self, redemption_id: &str) -> Result<bool>;
}

/// Trait defining the interface for the completion ledger
pub trait CompletionStorage: Send + Sync {
    /// Load the full ledger, empty if nothing has been saved yet
    fn load_completion_ledger(&self) -> Result<CompletionLedger>;

    /// Replace the stored ledger with this snapshot
    fn save_completion_ledger(&self, ledger: &CompletionLedger) -> Result<()>;

    /// Write a single completion flag
    fn set_completion(&self, date: NaiveDate, kid_id: &str, task_id: &str, completed: bool) -> Result<()>;
}

/// Trait defining the interface for storage connections
///
/// This trait abstracts away the specific connection type and provides
/// factory methods for creating repositories. This allows the domain layer
/// to work with any storage backend without knowing the implementation
/// details.
pub trait Connection: Send + Sync + Clone {
    type ChildRepository: ChildStorage + Clone;
    type TaskRepository: TaskStorage + Clone;
    type RewardRepository: RewardStorage + Clone;
    type RedemptionRepository: RedemptionStorage + Clone;
    type CompletionRepository: CompletionStorage + Clone;

    fn create_child_repository(&self) -> Self::ChildRepository;
    fn create_task_repository(&self) -> Self::TaskRepository;
    fn create_reward_repository(&self) -> Self::RewardRepository;
    fn create_redemption_repository(&self) -> Self::RedemptionRepository;
    fn create_completion_repository(&self) -> Self::CompletionRepository;
}
