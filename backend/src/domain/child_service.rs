use anyhow::Result;
use log::{info, warn};
use shared::Child;

use crate::domain::commands::child::{AdjustPointsCommand, CreateChildCommand, UpdateChildCommand};
use crate::storage::traits::{ChildStorage, CompletionStorage, Connection, RedemptionStorage};

const MAX_NAME_LENGTH: usize = 50;

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChildValidationError {
    #[error("Child name cannot be empty")]
    EmptyName,
    #[error("Child name cannot exceed 50 characters")]
    NameTooLong,
    #[error("Starting points cannot be negative")]
    NegativePoints,
    #[error("Child not found: {0}")]
    ChildNotFound(String),
}

/// Service for managing the children on the chart
#[derive(Clone)]
pub struct ChildService<C: Connection> {
    child_repository: C::ChildRepository,
    completion_repository: C::CompletionRepository,
    redemption_repository: C::RedemptionRepository,
}

impl<C: Connection> ChildService<C> {
    pub fn new(connection: &C) -> Self {
        Self {
            child_repository: connection.create_child_repository(),
            completion_repository: connection.create_completion_repository(),
            redemption_repository: connection.create_redemption_repository(),
        }
    }

    /// Add a child to the chart
    pub fn create_child(&self, command: CreateChildCommand) -> Result<Child> {
        info!("Creating child: name={}, points={}", command.name, command.points);

        validate_name(&command.name)?;
        if command.points < 0 {
            return Err(ChildValidationError::NegativePoints.into());
        }

        let child = Child {
            id: Child::generate_id(),
            name: command.name.trim().to_string(),
            avatar: normalize_avatar(command.avatar),
            points: command.points,
        };

        self.child_repository.store_child(&child)?;

        info!("Created child: {} with ID: {}", child.name, child.id);
        Ok(child)
    }

    pub fn get_child(&self, child_id: &str) -> Result<Option<Child>> {
        let child = self.child_repository.get_child(child_id)?;
        if child.is_none() {
            warn!("Child not found: {}", child_id);
        }
        Ok(child)
    }

    /// All children ordered by name
    pub fn list_children(&self) -> Result<Vec<Child>> {
        self.child_repository.list_children()
    }

    /// Rename a child or change their avatar. Points are never edited here.
    pub fn update_child(&self, command: UpdateChildCommand) -> Result<Child> {
        info!("Updating child: {}", command.child_id);

        let mut child = self
            .child_repository
            .get_child(&command.child_id)?
            .ok_or_else(|| ChildValidationError::ChildNotFound(command.child_id.clone()))?;

        if let Some(name) = command.name {
            validate_name(&name)?;
            child.name = name.trim().to_string();
        }
        if let Some(avatar) = command.avatar {
            child.avatar = normalize_avatar(Some(avatar));
        }

        self.child_repository.store_child(&child)?;

        info!("Updated child: {} with ID: {}", child.name, child.id);
        Ok(child)
    }

    /// Add or take away points by hand. The balance never drops below 0.
    pub fn adjust_points(&self, command: AdjustPointsCommand) -> Result<Child> {
        let mut child = self
            .child_repository
            .get_child(&command.child_id)?
            .ok_or_else(|| ChildValidationError::ChildNotFound(command.child_id.clone()))?;

        let previous = child.points;
        child.points = (child.points + command.delta).max(0);
        self.child_repository.store_child(&child)?;

        info!(
            "Adjusted points for {} by {:+}: {} -> {}",
            child.name, command.delta, previous, child.points
        );
        Ok(child)
    }

    /// Remove a child along with their completions and redemption history
    pub fn delete_child(&self, child_id: &str) -> Result<Child> {
        info!("Deleting child: {}", child_id);

        let child = self
            .child_repository
            .get_child(child_id)?
            .ok_or_else(|| ChildValidationError::ChildNotFound(child_id.to_string()))?;

        let mut ledger = self.completion_repository.load_completion_ledger()?;
        ledger.remove_child(child_id);
        self.completion_repository.save_completion_ledger(&ledger)?;

        for redemption in self.redemption_repository.list_redemptions(Some(child_id))? {
            self.redemption_repository.delete_redemption(&redemption.id)?;
        }

        self.child_repository.delete_child(child_id)?;

        info!("Deleted child: {} with ID: {}", child.name, child.id);
        Ok(child)
    }
}

fn validate_name(name: &str) -> Result<(), ChildValidationError> {
    let trimmed = name.trim();
    if trimmed.is_empty() {
        return Err(ChildValidationError::EmptyName);
    }
    if trimmed.chars().count() > MAX_NAME_LENGTH {
        return Err(ChildValidationError::NameTooLong);
    }
    Ok(())
}

fn normalize_avatar(avatar: Option<String>) -> Option<String> {
    avatar
        .map(|a| a.trim().to_string())
        .filter(|a| !a.is_empty())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::calendar::parse_date_key;
    use crate::storage::csv::test_utils::TestEnvironment;
    use crate::storage::CsvConnection;
    use shared::Redemption;

    fn create_test_service() -> (ChildService<CsvConnection>, TestEnvironment) {
        let env = TestEnvironment::new().unwrap();
        (ChildService::new(&env.connection), env)
    }

    fn create(service: &ChildService<CsvConnection>, name: &str, points: i64) -> Child {
        service
            .create_child(CreateChildCommand {
                name: name.to_string(),
                avatar: None,
                points,
            })
            .unwrap()
    }

    #[test]
    fn test_create_child() {
        let (service, _env) = create_test_service();

        let child = service
            .create_child(CreateChildCommand {
                name: "  Eli ".to_string(),
                avatar: Some("🦖".to_string()),
                points: 50,
            })
            .unwrap();

        assert!(child.id.starts_with("child::"));
        assert_eq!(child.name, "Eli");
        assert_eq!(child.avatar.as_deref(), Some("🦖"));
        assert_eq!(service.get_child(&child.id).unwrap(), Some(child));
    }

    #[test]
    fn test_create_child_validation() {
        let (service, _env) = create_test_service();

        let empty = service.create_child(CreateChildCommand {
            name: "   ".to_string(),
            avatar: None,
            points: 0,
        });
        assert_eq!(
            empty.unwrap_err().downcast_ref::<ChildValidationError>(),
            Some(&ChildValidationError::EmptyName)
        );

        let long = service.create_child(CreateChildCommand {
            name: "x".repeat(51),
            avatar: None,
            points: 0,
        });
        assert_eq!(
            long.unwrap_err().downcast_ref::<ChildValidationError>(),
            Some(&ChildValidationError::NameTooLong)
        );

        let negative = service.create_child(CreateChildCommand {
            name: "Eli".to_string(),
            avatar: None,
            points: -5,
        });
        assert!(negative.is_err());
        assert!(service.list_children().unwrap().is_empty());
    }

    #[test]
    fn test_update_child_keeps_points() {
        let (service, _env) = create_test_service();
        let child = create(&service, "Eli", 50);

        let updated = service
            .update_child(UpdateChildCommand {
                child_id: child.id.clone(),
                name: Some("Elijah".to_string()),
                avatar: Some("🚀".to_string()),
            })
            .unwrap();
        assert_eq!(updated.name, "Elijah");
        assert_eq!(updated.points, 50);

        let cleared = service
            .update_child(UpdateChildCommand {
                child_id: child.id.clone(),
                avatar: Some(String::new()),
                ..Default::default()
            })
            .unwrap();
        assert_eq!(cleared.avatar, None);
        assert_eq!(cleared.name, "Elijah");
    }

    #[test]
    fn test_update_missing_child_fails() {
        let (service, _env) = create_test_service();

        let result = service.update_child(UpdateChildCommand {
            child_id: "child::missing".to_string(),
            name: Some("Ghost".to_string()),
            avatar: None,
        });
        assert!(result.is_err());
    }

    fn adjust(service: &ChildService<CsvConnection>, child_id: &str, delta: i64) -> Result<Child> {
        service.adjust_points(AdjustPointsCommand {
            child_id: child_id.to_string(),
            delta,
        })
    }

    #[test]
    fn test_adjust_points_adds_and_persists() {
        let (service, _env) = create_test_service();
        let child = create(&service, "Eli", 50);

        let adjusted = adjust(&service, &child.id, 5).unwrap();
        assert_eq!(adjusted.points, 55);
        assert_eq!(service.get_child(&child.id).unwrap().unwrap().points, 55);

        assert_eq!(adjust(&service, &child.id, -5).unwrap().points, 50);
    }

    #[test]
    fn test_adjust_points_clamps_at_zero() {
        let (service, _env) = create_test_service();
        let child = create(&service, "Ethan", 3);

        let adjusted = adjust(&service, &child.id, -5).unwrap();
        assert_eq!(adjusted.points, 0);
        assert_eq!(service.get_child(&child.id).unwrap().unwrap().points, 0);
    }

    #[test]
    fn test_adjust_points_unknown_child() {
        let (service, _env) = create_test_service();

        let err = adjust(&service, "child::missing", 5).unwrap_err();
        assert_eq!(
            err.downcast_ref::<ChildValidationError>(),
            Some(&ChildValidationError::ChildNotFound("child::missing".to_string()))
        );
    }

    #[test]
    fn test_delete_child_removes_history() {
        let (service, env) = create_test_service();
        let eli = create(&service, "Eli", 50);
        let ethan = create(&service, "Ethan", 35);

        let completions = env.connection.create_completion_repository();
        let day = parse_date_key("2024-01-01").unwrap();
        completions.set_completion(day, &eli.id, "task::1", true).unwrap();
        completions.set_completion(day, &ethan.id, "task::1", true).unwrap();

        let redemptions = env.connection.create_redemption_repository();
        redemptions
            .store_redemption(&Redemption {
                id: "redemption::1".to_string(),
                kid_id: eli.id.clone(),
                reward_id: "reward::1".to_string(),
                label: "Pick a dessert".to_string(),
                cost: 25,
                at: "2024-01-01T18:00:00Z".to_string(),
            })
            .unwrap();

        service.delete_child(&eli.id).unwrap();

        let children = service.list_children().unwrap();
        assert_eq!(children, vec![ethan.clone()]);

        let ledger = completions.load_completion_ledger().unwrap();
        assert!(ledger.child_day(day, &eli.id).is_none());
        assert!(ledger.is_completed(day, &ethan.id, "task::1"));
        assert!(redemptions.list_redemptions(None).unwrap().is_empty());

        assert!(service.delete_child(&eli.id).is_err());
    }
}
