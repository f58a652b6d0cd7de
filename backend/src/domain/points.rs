//! Points ledger for the chore tracker.
//!
//! Pure functions that reconcile task-completion toggles, reward redemptions
//! and bulk recomputation against a child's running point balance. Nothing in
//! here performs I/O or reads the clock: callers pass today's date in and
//! persist whatever comes back.
//!
//! Two paths produce a child's total, and they must always agree:
//! - **Incremental**: [`apply_toggle`] adjusts the balance by `±task.points`
//!   on each state transition.
//! - **Recomputed**: [`recalc`] folds the whole ledger against the task
//!   catalog.

use chrono::NaiveDate;
use shared::{Child, CompletionLedger, Task, TaskCompletions, WeekRange};

/// Errors raised by the balance mutator
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum PointsError {
    #[error("Insufficient points: {available} available, {cost} required")]
    InsufficientFunds { available: i64, cost: u32 },
}

/// Result of applying a completion toggle
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ToggleOutcome {
    pub child: Child,
    pub ledger: CompletionLedger,
    /// Points applied to the balance by this toggle (0 for a repeat)
    pub delta: i64,
}

/// Check or uncheck `task` for `child` on `today`.
///
/// Only ever writes today's key; callers must refuse toggles for any other
/// displayed date. Repeating the current state is a no-op on the balance.
/// The task's `active` flag is not consulted.
pub fn apply_toggle(
    child: &Child,
    task: &Task,
    completed: bool,
    ledger: &CompletionLedger,
    today: NaiveDate,
) -> ToggleOutcome {
    let was_completed = ledger.is_completed(today, &child.id, &task.id);

    let delta = match (was_completed, completed) {
        (false, true) => i64::from(task.points),
        (true, false) => -i64::from(task.points),
        _ => 0,
    };

    let mut ledger = ledger.clone();
    ledger.set(today, &child.id, &task.id, completed);

    ToggleOutcome {
        child: Child {
            points: child.points + delta,
            ..child.clone()
        },
        ledger,
        delta,
    }
}

/// Spend `cost` points from `child`'s balance.
///
/// Fails without touching anything when the balance is short; the caller
/// must not record a redemption in that case.
pub fn redeem(child: &Child, cost: u32) -> Result<Child, PointsError> {
    if child.points < i64::from(cost) {
        return Err(PointsError::InsufficientFunds {
            available: child.points,
            cost,
        });
    }

    Ok(Child {
        points: child.points - i64::from(cost),
        ..child.clone()
    })
}

/// Derive a child's total points from the ledger alone, ignoring the stored
/// balance.
///
/// Completions of tasks that are no longer in the catalog contribute
/// nothing: there is no point value left to attribute.
pub fn recalc(child: &Child, tasks: &[Task], ledger: &CompletionLedger) -> i64 {
    points_where(&child.id, tasks, ledger, |_| true)
}

/// Points earned from completions dated inside `week`
pub fn weekly_points(kid_id: &str, tasks: &[Task], ledger: &CompletionLedger, week: WeekRange) -> i64 {
    points_where(kid_id, tasks, ledger, |date| week.contains(date))
}

fn points_where<F>(kid_id: &str, tasks: &[Task], ledger: &CompletionLedger, include: F) -> i64
where
    F: Fn(NaiveDate) -> bool,
{
    ledger
        .iter()
        .filter(|(date, _)| include(**date))
        .filter_map(|(_, day)| day.get(kid_id))
        .flat_map(|completions| completions.iter())
        .filter(|(_, completed)| **completed)
        .filter_map(|(task_id, _)| tasks.iter().find(|t| &t.id == task_id))
        .map(|task| i64::from(task.points))
        .sum()
}

/// A child's completion flags for today, empty when nothing was toggled
pub fn today_completions(kid_id: &str, ledger: &CompletionLedger, today: NaiveDate) -> TaskCompletions {
    completions_on(kid_id, ledger, today)
}

/// A child's completion flags for any displayed date
pub fn completions_on(kid_id: &str, ledger: &CompletionLedger, date: NaiveDate) -> TaskCompletions {
    ledger.child_day(date, kid_id).cloned().unwrap_or_default()
}

/// Drop one child's completions for today, leaving every other child and
/// every other date untouched
pub fn clear_today(kid_id: &str, ledger: &CompletionLedger, today: NaiveDate) -> CompletionLedger {
    let mut ledger = ledger.clone();
    ledger.remove_child_day(today, kid_id);
    ledger
}

/// Fresh empty ledger for a new week. Balances are deliberately left alone.
pub fn clear_all() -> CompletionLedger {
    CompletionLedger::new()
}

/// Active tasks shown on a child's list
pub fn tasks_for_child<'a>(tasks: &'a [Task], kid_id: &str) -> Vec<&'a Task> {
    tasks
        .iter()
        .filter(|task| task.active && task.is_assigned_to(kid_id))
        .collect()
}
