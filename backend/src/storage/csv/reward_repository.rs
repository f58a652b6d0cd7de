use anyhow::Result;
use log::{debug, info};
use shared::Reward;

use super::connection::{CsvConnection, REWARDS_FILE};
use crate::storage::traits::RewardStorage;

/// YAML-backed reward catalog (`rewards.yaml`)
#[derive(Clone)]
pub struct RewardRepository {
    connection: CsvConnection,
}

impl RewardRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_rewards(&self) -> Result<Vec<Reward>> {
        self.connection.read_yaml_list(REWARDS_FILE)
    }

    fn write_rewards(&self, rewards: &[Reward]) -> Result<()> {
        self.connection.write_yaml_list(REWARDS_FILE, rewards)
    }
}

impl RewardStorage for RewardRepository {
    fn store_reward(&self, reward: &Reward) -> Result<()> {
        let mut rewards = self.read_rewards()?;
        match rewards.iter().position(|r| r.id == reward.id) {
            Some(pos) => rewards[pos] = reward.clone(),
            None => rewards.push(reward.clone()),
        }
        self.write_rewards(&rewards)?;

        debug!("Stored reward '{}' ({})", reward.label, reward.id);
        Ok(())
    }

    fn get_reward(&self, reward_id: &str) -> Result<Option<Reward>> {
        Ok(self.read_rewards()?.into_iter().find(|r| r.id == reward_id))
    }

    fn list_rewards(&self) -> Result<Vec<Reward>> {
        let mut rewards = self.read_rewards()?;
        rewards.sort_by(|a, b| a.label.cmp(&b.label));
        Ok(rewards)
    }

    fn delete_reward(&self, reward_id: &str) -> Result<bool> {
        let mut rewards = self.read_rewards()?;
        let before = rewards.len();
        rewards.retain(|r| r.id != reward_id);

        if rewards.len() == before {
            return Ok(false);
        }

        self.write_rewards(&rewards)?;
        info!("Deleted reward {}", reward_id);
        Ok(true)
    }
}
