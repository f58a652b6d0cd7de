//! Default household data for a first run.

use anyhow::Result;
use log::info;
use shared::{Child, Reward, Task};

use crate::storage::traits::{ChildStorage, Connection, RewardStorage, TaskStorage};

const CHILDREN: &[(&str, &str, i64)] = &[("Eli", "🦖", 50), ("Ethan", "🚀", 35), ("Eleanor", "🦄", 60)];

const TASKS: &[(&str, u32)] = &[
    ("Do math workbook", 10),
    ("Clean room", 8),
    ("Put clothes in hamper", 5),
    ("Put away dishes", 7),
];

const REWARDS: &[(&str, u32)] = &[
    ("15 min YouTube Kids", 20),
    ("30 min Game Time", 30),
    ("Pick a dessert", 25),
];

/// What [`seed_data`] inserted
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct SeedSummary {
    pub children: usize,
    pub tasks: usize,
    pub rewards: usize,
}

impl SeedSummary {
    pub fn is_empty(&self) -> bool {
        self.children == 0 && self.tasks == 0 && self.rewards == 0
    }
}

/// Fill any empty catalog with the defaults. Catalogs that already have
/// entries are left alone, so running this twice inserts nothing new.
pub fn seed_data<C: Connection>(connection: &C) -> Result<SeedSummary> {
    let mut summary = SeedSummary::default();

    let children = connection.create_child_repository();
    if children.list_children()?.is_empty() {
        for (name, avatar, points) in CHILDREN {
            children.store_child(&Child {
                id: Child::generate_id(),
                name: name.to_string(),
                avatar: Some(avatar.to_string()),
                points: *points,
            })?;
            summary.children += 1;
        }
    }

    let tasks = connection.create_task_repository();
    if tasks.list_tasks()?.is_empty() {
        for (title, points) in TASKS {
            tasks.store_task(&Task {
                id: Task::generate_id(),
                title: title.to_string(),
                points: *points,
                active: true,
                assigned_kids: Vec::new(),
            })?;
            summary.tasks += 1;
        }
    }

    let rewards = connection.create_reward_repository();
    if rewards.list_rewards()?.is_empty() {
        for (label, cost) in REWARDS {
            rewards.store_reward(&Reward {
                id: Reward::generate_id(),
                label: label.to_string(),
                cost: *cost,
            })?;
            summary.rewards += 1;
        }
    }

    if !summary.is_empty() {
        info!(
            "Seeded {} children, {} tasks and {} rewards",
            summary.children, summary.tasks, summary.rewards
        );
    }
    Ok(summary)
}
