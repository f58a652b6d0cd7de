use anyhow::Result;
use log::{debug, info};
use shared::Task;

use super::connection::{CsvConnection, TASKS_FILE};
use crate::storage::traits::TaskStorage;

/// YAML-backed task catalog (`tasks.yaml`)
#[derive(Clone)]
pub struct TaskRepository {
    connection: CsvConnection,
}

impl TaskRepository {
    pub fn new(connection: CsvConnection) -> Self {
        Self { connection }
    }

    fn read_tasks(&self) -> Result<Vec<Task>> {
        self.connection.read_yaml_list(TASKS_FILE)
    }

    fn write_tasks(&self, tasks: &[Task]) -> Result<()> {
        self.connection.write_yaml_list(TASKS_FILE, tasks)
    }
}

impl TaskStorage for TaskRepository {
    fn store_task(&self, task: &Task) -> Result<()> {
        let mut tasks = self.read_tasks()?;
        match tasks.iter().position(|t| t.id == task.id) {
            Some(pos) => tasks[pos] = task.clone(),
            None => tasks.push(task.clone()),
        }
        self.write_tasks(&tasks)?;

        debug!("Stored task '{}' ({})", task.title, task.id);
        Ok(())
    }

    fn get_task(&self, task_id: &str) -> Result<Option<Task>> {
        Ok(self.read_tasks()?.into_iter().find(|t| t.id == task_id))
    }

    fn list_tasks(&self) -> Result<Vec<Task>> {
        let mut tasks = self.read_tasks()?;
        tasks.sort_by(|a, b| a.title.cmp(&b.title));
        Ok(tasks)
    }

    fn delete_task(&self, task_id: &str) -> Result<bool> {
        let mut tasks = self.read_tasks()?;
        let before = tasks.len();
        tasks.retain(|t| t.id != task_id);

        if tasks.len() == before {
            return Ok(false);
        }

        self.write_tasks(&tasks)?;
        info!("Deleted task {}", task_id);
        Ok(true)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::storage::csv::test_utils::TestEnvironment;

    fn task(id: &str, title: &str, points: u32) -> Task {
        Task {
            id: id.to_string(),
            title: title.to_string(),
            points,
            active: true,
            assigned_kids: Vec::new(),
        }
    }

    #[test]
    fn test_store_and_list_tasks_sorted_by_title() {
        let env = TestEnvironment::new().unwrap();
        let repo = TaskRepository::new(env.connection.clone());

        repo.store_task(&task("task::1", "Put away dishes", 7)).unwrap();
        repo.store_task(&task("task::2", "Clean room", 8)).unwrap();

        let titles: Vec<String> = repo.list_tasks().unwrap().into_iter().map(|t| t.title).collect();
        assert_eq!(titles, vec!["Clean room", "Put away dishes"]);
    }

    #[test]
    fn test_assigned_kids_round_trip() {
        let env = TestEnvironment::new().unwrap();
        let repo = TaskRepository::new(env.connection.clone());

        let mut assigned = task("task::1", "Feed the cat", 3);
        assigned.assigned_kids = vec!["child::1".to_string(), "child::2".to_string()];
        assigned.active = false;
        repo.store_task(&assigned).unwrap();

        assert_eq!(repo.get_task("task::1").unwrap(), Some(assigned));
    }

    #[test]
    fn test_update_and_delete_task() {
        let env = TestEnvironment::new().unwrap();
        let repo = TaskRepository::new(env.connection.clone());

        repo.store_task(&task("task::1", "Clean room", 8)).unwrap();
        repo.store_task(&task("task::1", "Clean bedroom", 9)).unwrap();

        let tasks = repo.list_tasks().unwrap();
        assert_eq!(tasks.len(), 1);
        assert_eq!(tasks[0].points, 9);

        assert!(repo.delete_task("task::1").unwrap());
        assert!(!repo.delete_task("task::1").unwrap());
    }
}
