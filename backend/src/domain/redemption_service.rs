use std::sync::Arc;

use anyhow::Result;
use chrono::DateTime;
use log::{info, warn};
use shared::{Child, Redemption};

use crate::domain::calendar::Clock;
use crate::domain::commands::redemption::{
    CancelRedemptionResult, RedeemRewardCommand, RedeemRewardResult,
};
use crate::domain::points;
use crate::storage::traits::{ChildStorage, Connection, RedemptionStorage, RewardStorage};

/// Number of redemptions shown in a child's history by default
pub const DEFAULT_RECENT_LIMIT: usize = 5;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum RedemptionError {
    #[error("Child not found: {0}")]
    ChildNotFound(String),
    #[error("Reward not found: {0}")]
    RewardNotFound(String),
    #[error("Redemption not found: {0}")]
    RedemptionNotFound(String),
}

/// Service for spending points on rewards
#[derive(Clone)]
pub struct RedemptionService<C: Connection> {
    child_repository: C::ChildRepository,
    reward_repository: C::RewardRepository,
    redemption_repository: C::RedemptionRepository,
    clock: Arc<dyn Clock>,
    recent_limit: usize,
}

impl<C: Connection> RedemptionService<C> {
    pub fn new(connection: &C, clock: Arc<dyn Clock>) -> Self {
        Self {
            child_repository: connection.create_child_repository(),
            reward_repository: connection.create_reward_repository(),
            redemption_repository: connection.create_redemption_repository(),
            clock,
            recent_limit: DEFAULT_RECENT_LIMIT,
        }
    }

    pub fn with_recent_limit(mut self, recent_limit: usize) -> Self {
        self.recent_limit = recent_limit;
        self
    }

    /// Spend a child's points on a reward.
    ///
    /// The redemption keeps a snapshot of the reward's label and cost, so
    /// later catalog edits don't rewrite history. Nothing is recorded when
    /// the balance is short.
    pub fn redeem(&self, command: RedeemRewardCommand) -> Result<RedeemRewardResult> {
        let child = self.require_child(&command.kid_id)?;
        let reward = self
            .reward_repository
            .get_reward(&command.reward_id)?
            .ok_or_else(|| RedemptionError::RewardNotFound(command.reward_id.clone()))?;

        let child = points::redeem(&child, reward.cost).map_err(|e| {
            warn!("{} cannot redeem '{}': {}", child.name, reward.label, e);
            e
        })?;

        let redemption = Redemption {
            id: Redemption::generate_id(),
            kid_id: child.id.clone(),
            reward_id: reward.id.clone(),
            label: reward.label.clone(),
            cost: reward.cost,
            at: self.clock.now().to_rfc3339(),
        };

        // Every charge must have a record to cancel
        self.redemption_repository.store_redemption(&redemption)?;
        if let Err(e) = self.child_repository.store_child(&child) {
            warn!("Failed to charge {}, removing redemption {}", child.name, redemption.id);
            self.redemption_repository.delete_redemption(&redemption.id)?;
            return Err(e);
        }

        info!(
            "{} redeemed '{}' for {} points (balance {})",
            child.name, redemption.label, redemption.cost, child.points
        );
        Ok(RedeemRewardResult { child, redemption })
    }

    /// Undo a redemption, refunding the cost that was paid at the time
    pub fn cancel_redemption(&self, redemption_id: &str) -> Result<CancelRedemptionResult> {
        let redemption = self
            .redemption_repository
            .get_redemption(redemption_id)?
            .ok_or_else(|| RedemptionError::RedemptionNotFound(redemption_id.to_string()))?;
        let child = self.require_child(&redemption.kid_id)?;

        let child = Child {
            points: child.points + i64::from(redemption.cost),
            ..child
        };

        self.redemption_repository.delete_redemption(redemption_id)?;
        if let Err(e) = self.child_repository.store_child(&child) {
            warn!("Failed to refund {}, restoring redemption {}", child.name, redemption.id);
            self.redemption_repository.store_redemption(&redemption)?;
            return Err(e);
        }

        info!(
            "Cancelled '{}' for {}, refunded {} points (balance {})",
            redemption.label, child.name, redemption.cost, child.points
        );
        Ok(CancelRedemptionResult { child, redemption })
    }

    /// A child's latest redemptions, newest first
    pub fn recent_redemptions(&self, kid_id: &str) -> Result<Vec<Redemption>> {
        let mut redemptions = self.redemption_repository.list_redemptions(Some(kid_id))?;

        // Unparseable timestamps sort last
        redemptions.sort_by_key(|r| std::cmp::Reverse(DateTime::parse_from_rfc3339(&r.at).ok()));
        redemptions.truncate(self.recent_limit);

        Ok(redemptions)
    }

    fn require_child(&self, kid_id: &str) -> Result<Child> {
        self.child_repository
            .get_child(kid_id)?
            .ok_or_else(|| RedemptionError::ChildNotFound(kid_id.to_string()).into())
    }
}
