//! Task and reward catalogs.
//!
//! Guardians maintain these; the points ledger only ever reads them. Deleting
//! a task leaves its historical completions in the ledger, where
//! recalculation ignores them.

use anyhow::Result;
use log::info;
use shared::{Reward, Task};

use crate::domain::commands::catalog::{
    CreateRewardCommand, CreateTaskCommand, UpdateRewardCommand, UpdateTaskCommand,
};
use crate::storage::traits::{Connection, RewardStorage, TaskStorage};

const MAX_TITLE_LENGTH: usize = 100;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum CatalogValidationError {
    #[error("Task title cannot be empty")]
    EmptyTitle,
    #[error("Reward label cannot be empty")]
    EmptyLabel,
    #[error("Title or label cannot exceed 100 characters")]
    TooLong,
    #[error("Task points must be positive")]
    NonPositivePoints,
    #[error("Reward cost must be positive")]
    NonPositiveCost,
    #[error("Task not found: {0}")]
    TaskNotFound(String),
    #[error("Reward not found: {0}")]
    RewardNotFound(String),
}

#[derive(Clone)]
pub struct CatalogService<C: Connection> {
    task_repository: C::TaskRepository,
    reward_repository: C::RewardRepository,
}

impl<C: Connection> CatalogService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            task_repository: connection.create_task_repository(),
            reward_repository: connection.create_reward_repository(),
        }
    }

    // Tasks

    pub fn create_task(&self, command: CreateTaskCommand) -> Result<Task> {
        let title = validate_text(&command.title, CatalogValidationError::EmptyTitle)?;
        if command.points == 0 {
            return Err(CatalogValidationError::NonPositivePoints.into());
        }

        let task = Task {
            id: Task::generate_id(),
            title,
            points: command.points,
            active: true,
            assigned_kids: command.assigned_kids,
        };
        self.task_repository.store_task(&task)?;

        info!("Created task '{}' worth {} points ({})", task.title, task.points, task.id);
        Ok(task)
    }

    pub fn update_task(&self, command: UpdateTaskCommand) -> Result<Task> {
        let mut task = self.require_task(&command.task_id)?;

        if let Some(title) = command.title {
            task.title = validate_text(&title, CatalogValidationError::EmptyTitle)?;
        }
        if let Some(points) = command.points {
            if points == 0 {
                return Err(CatalogValidationError::NonPositivePoints.into());
            }
            task.points = points;
        }

        self.task_repository.store_task(&task)?;
        info!("Updated task '{}' ({})", task.title, task.id);
        Ok(task)
    }

    /// Show or hide a task on the children's lists
    pub fn set_task_active(&self, task_id: &str, active: bool) -> Result<Task> {
        let mut task = self.require_task(task_id)?;
        task.active = active;
        self.task_repository.store_task(&task)?;

        info!("Task '{}' is now {}", task.title, if active { "active" } else { "inactive" });
        Ok(task)
    }

    /// Add the child to the task's assignment list, or remove them if present.
    /// Removing the last child makes the task apply to everyone again.
    pub fn toggle_task_assignment(&self, task_id: &str, kid_id: &str) -> Result<Task> {
        let mut task = self.require_task(task_id)?;

        if let Some(pos) = task.assigned_kids.iter().position(|id| id == kid_id) {
            task.assigned_kids.remove(pos);
        } else {
            task.assigned_kids.push(kid_id.to_string());
        }

        self.task_repository.store_task(&task)?;
        info!("Task '{}' assigned to {:?}", task.title, task.assigned_kids);
        Ok(task)
    }

    pub fn delete_task(&self, task_id: &str) -> Result<()> {
        if !self.task_repository.delete_task(task_id)? {
            return Err(CatalogValidationError::TaskNotFound(task_id.to_string()).into());
        }
        Ok(())
    }

    /// All tasks, active or not, ordered by title
    pub fn list_tasks(&self) -> Result<Vec<Task>> {
        self.task_repository.list_tasks()
    }

    fn require_task(&self, task_id: &str) -> Result<Task> {
        self.task_repository
            .get_task(task_id)?
            .ok_or_else(|| CatalogValidationError::TaskNotFound(task_id.to_string()).into())
    }

    // Rewards

    pub fn create_reward(&self, command: CreateRewardCommand) -> Result<Reward> {
        let label = validate_text(&command.label, CatalogValidationError::EmptyLabel)?;
        if command.cost == 0 {
            return Err(CatalogValidationError::NonPositiveCost.into());
        }

        let reward = Reward {
            id: Reward::generate_id(),
            label,
            cost: command.cost,
        };
        self.reward_repository.store_reward(&reward)?;

        info!("Created reward '{}' costing {} points ({})", reward.label, reward.cost, reward.id);
        Ok(reward)
    }

    /// Edit a reward. Past redemptions keep the label and cost they were made at.
    pub fn update_reward(&self, command: UpdateRewardCommand) -> Result<Reward> {
        let mut reward = self
            .reward_repository
            .get_reward(&command.reward_id)?
            .ok_or_else(|| CatalogValidationError::RewardNotFound(command.reward_id.clone()))?;

        if let Some(label) = command.label {
            reward.label = validate_text(&label, CatalogValidationError::EmptyLabel)?;
        }
        if let Some(cost) = command.cost {
            if cost == 0 {
                return Err(CatalogValidationError::NonPositiveCost.into());
            }
            reward.cost = cost;
        }

        self.reward_repository.store_reward(&reward)?;
        info!("Updated reward '{}' ({})", reward.label, reward.id);
        Ok(reward)
    }

    pub fn delete_reward(&self, reward_id: &str) -> Result<()> {
        if !self.reward_repository.delete_reward(reward_id)? {
            return Err(CatalogValidationError::RewardNotFound(reward_id.to_string()).into());
        }
        Ok(())
    }

    pub fn list_rewards(&self) -> Result<Vec<Reward>> {
        self.reward_repository.list_rewards()
    }
}

fn validate_text(text: &str, empty_error: CatalogValidationError) -> Result<String, CatalogValidationError> {
    let trimmed = text.trim();
    if trimmed.is_empty() {
        return Err(empty_error);
    }
    if trimmed.chars().count() > MAX_TITLE_LENGTH {
        return Err(CatalogValidationError::TooLong);
    }
    Ok(trimmed.to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;
    use crate::storage::CsvConnection;

    fn create_test_service() -> (CatalogService<CsvConnection>, TestEnvironment) {
        let env = TestEnvironment::new().unwrap();
        (CatalogService::new(&env.connection), env)
    }

    fn create_task(service: &CatalogService<CsvConnection>, title: &str, points: u32) -> Task {
        service
            .create_task(CreateTaskCommand {
                title: title.to_string(),
                points,
                assigned_kids: Vec::new(),
            })
            .unwrap()
    }

    #[test]
    fn test_create_task_defaults_to_active() {
        let (service, _env) = create_test_service();

        let task = create_task(&service, "Clean room", 8);

        assert!(task.id.starts_with("task::"));
        assert!(task.active);
        assert_eq!(service.list_tasks().unwrap(), vec![task]);
    }

    #[test]
    fn test_task_validation() {
        let (service, _env) = create_test_service();

        let zero = service.create_task(CreateTaskCommand {
            title: "Nothing".to_string(),
            points: 0,
            assigned_kids: Vec::new(),
        });
        assert_eq!(
            zero.unwrap_err().downcast_ref::<CatalogValidationError>(),
            Some(&CatalogValidationError::NonPositivePoints)
        );

        let blank = service.create_task(CreateTaskCommand {
            title: " ".to_string(),
            points: 3,
            assigned_kids: Vec::new(),
        });
        assert_eq!(
            blank.unwrap_err().downcast_ref::<CatalogValidationError>(),
            Some(&CatalogValidationError::EmptyTitle)
        );
    }

    #[test]
    fn test_update_and_deactivate_task() {
        let (service, _env) = create_test_service();
        let task = create_task(&service, "Clean room", 8);

        let updated = service
            .update_task(UpdateTaskCommand {
                task_id: task.id.clone(),
                points: Some(10),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.points, 10);
        assert_eq!(updated.title, "Clean room");

        let inactive = service.set_task_active(&task.id, false).unwrap();
        assert!(!inactive.active);
        assert!(!service.list_tasks().unwrap()[0].active);
    }

    #[test]
    fn test_toggle_task_assignment() {
        let (service, _env) = create_test_service();
        let task = create_task(&service, "Feed the cat", 3);

        let assigned = service.toggle_task_assignment(&task.id, "child::1").unwrap();
        assert_eq!(assigned.assigned_kids, vec!["child::1"]);
        assert!(!assigned.is_assigned_to("child::2"));

        let unassigned = service.toggle_task_assignment(&task.id, "child::1").unwrap();
        assert!(unassigned.assigned_kids.is_empty());
        assert!(unassigned.is_assigned_to("child::2"));
    }

    #[test]
    fn test_delete_missing_task_fails() {
        let (service, _env) = create_test_service();
        let task = create_task(&service, "Clean room", 8);

        service.delete_task(&task.id).unwrap();
        assert!(service.delete_task(&task.id).is_err());
    }

    #[test]
    fn test_reward_lifecycle() {
        let (service, _env) = create_test_service();

        let reward = service
            .create_reward(CreateRewardCommand {
                label: "Pick a dessert".to_string(),
                cost: 25,
            })
            .unwrap();
        assert!(reward.id.starts_with("reward::"));

        let updated = service
            .update_reward(UpdateRewardCommand {
                reward_id: reward.id.clone(),
                cost: Some(30),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(updated.cost, 30);
        assert_eq!(updated.label, "Pick a dessert");

        let free = service.update_reward(UpdateRewardCommand {
            reward_id: reward.id.clone(),
            cost: Some(0),
            ..Default::default()
        });
        assert!(free.is_err());

        service.delete_reward(&reward.id).unwrap();
        assert!(service.list_rewards().unwrap().is_empty());
    }
}
