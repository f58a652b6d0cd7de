//! Daily chore checklist operations.
//!
//! Loads the child, catalog and ledger, runs them through [`points`], clamps
//! the resulting balance at zero and writes everything back. Only today's
//! entries can be edited; any other date is a read-only view.

use std::sync::Arc;

use anyhow::Result;
use chrono::NaiveDate;
use log::{debug, info, warn};
use shared::{Child, DayTask, DayView, WeeklyStat};

use crate::domain::calendar::{week_range, Clock};
use crate::domain::commands::chores::{ClearTodayResult, ToggleTaskCommand, ToggleTaskResult};
use crate::domain::points;
use crate::storage::traits::{ChildStorage, CompletionStorage, Connection, TaskStorage};

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum ChoreError {
    #[error("Cannot change completions for {date}; only today ({today}) is editable")]
    DateNotEditable { date: NaiveDate, today: NaiveDate },
    #[error("Child not found: {0}")]
    ChildNotFound(String),
    #[error("Task not found: {0}")]
    TaskNotFound(String),
}

#[derive(Clone)]
pub struct ChoreService<C: Connection> {
    child_repository: C::ChildRepository,
    task_repository: C::TaskRepository,
    completion_repository: C::CompletionRepository,
    clock: Arc<dyn Clock>,
}

impl<C: Connection> ChoreService<C> {
    pub fn new(connection: &C, clock: Arc<dyn Clock>) -> Self {
        Self {
            child_repository: connection.create_child_repository(),
            task_repository: connection.create_task_repository(),
            completion_repository: connection.create_completion_repository(),
            clock,
        }
    }

    pub fn today(&self) -> NaiveDate {
        self.clock.today()
    }

    /// Check or uncheck a task for a child on the displayed date
    pub fn toggle_task(&self, command: ToggleTaskCommand) -> Result<ToggleTaskResult> {
        let today = self.clock.today();
        if command.date != today {
            warn!(
                "Rejected toggle of {} for {} on {} (today is {})",
                command.task_id, command.kid_id, command.date, today
            );
            return Err(ChoreError::DateNotEditable { date: command.date, today }.into());
        }

        let child = self.require_child(&command.kid_id)?;
        let task = self
            .task_repository
            .get_task(&command.task_id)?
            .ok_or_else(|| ChoreError::TaskNotFound(command.task_id.clone()))?;
        let ledger = self.completion_repository.load_completion_ledger()?;

        let outcome = points::apply_toggle(&child, &task, command.completed, &ledger, today);
        let child = clamp_balance(outcome.child);

        self.child_repository.store_child(&child)?;
        self.completion_repository.save_completion_ledger(&outcome.ledger)?;

        info!(
            "{} {} '{}' ({:+} points, balance {})",
            child.name,
            if command.completed { "completed" } else { "unchecked" },
            task.title,
            outcome.delta,
            child.points
        );

        Ok(ToggleTaskResult {
            child,
            task,
            delta: outcome.delta,
        })
    }

    /// Uncheck everything the child did today and take those points back.
    ///
    /// The balance drops by the difference between the recalculated totals
    /// before and after clearing, so redemptions and opening balances stay
    /// reflected in it.
    pub fn clear_today(&self, kid_id: &str) -> Result<ClearTodayResult> {
        let today = self.clock.today();
        let child = self.require_child(kid_id)?;
        let tasks = self.task_repository.list_tasks()?;
        let ledger = self.completion_repository.load_completion_ledger()?;

        let cleared = points::clear_today(kid_id, &ledger, today);
        let points_removed =
            points::recalc(&child, &tasks, &ledger) - points::recalc(&child, &tasks, &cleared);

        let child = clamp_balance(Child {
            points: child.points - points_removed,
            ..child
        });

        self.completion_repository.save_completion_ledger(&cleared)?;
        self.child_repository.store_child(&child)?;

        info!(
            "Cleared today's tasks for {} (-{} points, balance {})",
            child.name, points_removed, child.points
        );
        Ok(ClearTodayResult { child, points_removed })
    }

    /// Start a new week: every completion is dropped, balances are kept
    pub fn new_week(&self) -> Result<()> {
        let ledger = self.completion_repository.load_completion_ledger()?;
        self.completion_repository.save_completion_ledger(&points::clear_all())?;
        info!("Started a new week, cleared {} days of completions", ledger.len());
        Ok(())
    }

    /// Points each child earned in the current Monday-to-Sunday week
    pub fn weekly_stats(&self) -> Result<Vec<WeeklyStat>> {
        let week = week_range(self.clock.today());
        let tasks = self.task_repository.list_tasks()?;
        let ledger = self.completion_repository.load_completion_ledger()?;

        let stats = self
            .child_repository
            .list_children()?
            .into_iter()
            .map(|child| WeeklyStat {
                week_points: points::weekly_points(&child.id, &tasks, &ledger, week),
                kid_id: child.id,
                name: child.name,
            })
            .collect::<Vec<_>>();

        debug!("Weekly stats for {} to {}: {:?}", week.start, week.end, stats);
        Ok(stats)
    }

    /// A child's task list as it stood on `date`
    pub fn day_view(&self, kid_id: &str, date: NaiveDate) -> Result<DayView> {
        self.require_child(kid_id)?;
        let tasks = self.task_repository.list_tasks()?;
        let ledger = self.completion_repository.load_completion_ledger()?;
        let completions = points::completions_on(kid_id, &ledger, date);

        let tasks: Vec<DayTask> = points::tasks_for_child(&tasks, kid_id)
            .into_iter()
            .map(|task| DayTask {
                completed: completions.get(&task.id).copied().unwrap_or(false),
                task: task.clone(),
            })
            .collect();

        Ok(DayView {
            kid_id: kid_id.to_string(),
            date,
            editable: date == self.clock.today(),
            tasks,
        })
    }

    fn require_child(&self, kid_id: &str) -> Result<Child> {
        self.child_repository
            .get_child(kid_id)?
            .ok_or_else(|| ChoreError::ChildNotFound(kid_id.to_string()).into())
    }
}

fn clamp_balance(child: Child) -> Child {
    if child.points < 0 {
        warn!("Balance for {} went negative ({}), clamping to 0", child.name, child.points);
        return Child { points: 0, ..child };
    }
    child
}
