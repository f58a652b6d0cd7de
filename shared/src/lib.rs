use chrono::NaiveDate;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use uuid::Uuid;

/// A child taking part in the chore chart
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Child {
    /// Opaque identifier in format "child::<uuid>"
    pub id: String,
    pub name: String,
    /// Optional avatar glyph (usually a single emoji)
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub avatar: Option<String>,
    /// Current point balance. Non-negative by convention, but only the
    /// persistence path clamps it.
    pub points: i64,
}

impl Child {
    pub fn generate_id() -> String {
        format!("child::{}", Uuid::new_v4())
    }
}

/// A chore a guardian has defined
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Task {
    /// Task ID in format "task::<uuid>"
    pub id: String,
    pub title: String,
    /// Points earned for completing the task (positive)
    pub points: u32,
    /// Inactive tasks stay in the catalog but are not offered for toggling
    pub active: bool,
    /// Child IDs this task is assigned to. Empty means every child.
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub assigned_kids: Vec<String>,
}

impl Task {
    pub fn generate_id() -> String {
        format!("task::{}", Uuid::new_v4())
    }

    /// Whether this task shows up on the given child's list
    pub fn is_assigned_to(&self, kid_id: &str) -> bool {
        self.assigned_kids.is_empty() || self.assigned_kids.iter().any(|id| id == kid_id)
    }
}

/// Something a child can spend points on
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Reward {
    /// Reward ID in format "reward::<uuid>"
    pub id: String,
    pub label: String,
    /// Point cost (positive)
    pub cost: u32,
}

impl Reward {
    pub fn generate_id() -> String {
        format!("reward::{}", Uuid::new_v4())
    }
}

/// A reward that was exchanged for points.
///
/// Label and cost are copied from the reward at redemption time so the
/// history stays meaningful after the reward is edited or deleted.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Redemption {
    /// Redemption ID in format "redemption::<uuid>"
    pub id: String,
    pub kid_id: String,
    pub reward_id: String,
    pub label: String,
    pub cost: u32,
    /// Human-readable timestamp with timezone (RFC 3339)
    pub at: String,
}

impl Redemption {
    pub fn generate_id() -> String {
        format!("redemption::{}", Uuid::new_v4())
    }
}

/// Task ID -> completed flag for one child on one day
pub type TaskCompletions = BTreeMap<String, bool>;

/// Child ID -> that child's completions for one day
pub type DayCompletions = BTreeMap<String, TaskCompletions>;

/// Record of which tasks each child checked off on each calendar day.
///
/// Serializes to the nested shape `{"YYYY-MM-DD": {kid_id: {task_id: bool}}}`.
/// The ledger carries no totals; balances are maintained incrementally by
/// toggles or recomputed from this record.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(transparent)]
pub struct CompletionLedger(BTreeMap<NaiveDate, DayCompletions>);

impl CompletionLedger {
    pub fn new() -> Self {
        Self::default()
    }

    /// Build a ledger from flat `(date, kid, task, completed)` rows
    pub fn from_entries<I>(entries: I) -> Self
    where
        I: IntoIterator<Item = (NaiveDate, String, String, bool)>,
    {
        let mut ledger = Self::new();
        for (date, kid_id, task_id, completed) in entries {
            ledger.set(date, &kid_id, &task_id, completed);
        }
        ledger
    }

    /// Completed flag for a single entry, `false` when absent
    pub fn is_completed(&self, date: NaiveDate, kid_id: &str, task_id: &str) -> bool {
        self.child_day(date, kid_id)
            .and_then(|tasks| tasks.get(task_id))
            .copied()
            .unwrap_or(false)
    }

    /// Write a single entry, creating the date and child maps as needed
    pub fn set(&mut self, date: NaiveDate, kid_id: &str, task_id: &str, completed: bool) {
        self.0
            .entry(date)
            .or_default()
            .entry(kid_id.to_string())
            .or_default()
            .insert(task_id.to_string(), completed);
    }

    pub fn day(&self, date: NaiveDate) -> Option<&DayCompletions> {
        self.0.get(&date)
    }

    pub fn child_day(&self, date: NaiveDate, kid_id: &str) -> Option<&TaskCompletions> {
        self.0.get(&date).and_then(|day| day.get(kid_id))
    }

    /// Remove one child's entries for one day. The date key is dropped when
    /// no other child has entries left on it.
    pub fn remove_child_day(&mut self, date: NaiveDate, kid_id: &str) -> Option<TaskCompletions> {
        let day = self.0.get_mut(&date)?;
        let removed = day.remove(kid_id);
        if day.is_empty() {
            self.0.remove(&date);
        }
        removed
    }

    /// Remove every entry for a child across all dates
    pub fn remove_child(&mut self, kid_id: &str) {
        self.0.retain(|_, day| {
            day.remove(kid_id);
            !day.is_empty()
        });
    }

    pub fn iter(&self) -> impl Iterator<Item = (&NaiveDate, &DayCompletions)> {
        self.0.iter()
    }

    /// Flatten into `(date, kid, task, completed)` rows, ordered by date
    pub fn entries(&self) -> impl Iterator<Item = (NaiveDate, &str, &str, bool)> + '_ {
        self.0.iter().flat_map(|(date, day)| {
            day.iter().flat_map(move |(kid_id, tasks)| {
                tasks
                    .iter()
                    .map(move |(task_id, completed)| (*date, kid_id.as_str(), task_id.as_str(), *completed))
            })
        })
    }

    /// Number of dates with at least one entry
    pub fn len(&self) -> usize {
        self.0.len()
    }

    pub fn is_empty(&self) -> bool {
        self.0.is_empty()
    }
}

/// Inclusive Monday-to-Sunday date range
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeekRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl WeekRange {
    pub fn contains(&self, date: NaiveDate) -> bool {
        date >= self.start && date <= self.end
    }
}

/// Points a child earned from completions within one week
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WeeklyStat {
    pub kid_id: String,
    pub name: String,
    pub week_points: i64,
}

/// One task as shown on a child's day list
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayTask {
    pub task: Task,
    pub completed: bool,
}

/// A child's task list for a displayed date
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct DayView {
    pub kid_id: String,
    pub date: NaiveDate,
    /// Only today's list accepts toggles
    pub editable: bool,
    pub tasks: Vec<DayTask>,
}
