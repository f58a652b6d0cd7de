//! Domain-level command and result types.
//! Services take these as input so call sites read as a list of named
//! fields rather than a row of positional strings and integers.

pub mod child {
    /// Input for adding a child to the chart.
    #[derive(Debug, Clone)]
    pub struct CreateChildCommand {
        pub name: String,
        pub avatar: Option<String>,
        /// Opening balance, usually 0
        pub points: i64,
    }

    /// Input for renaming a child or changing their avatar.
    /// An empty avatar string removes the avatar.
    #[derive(Debug, Clone, Default)]
    pub struct UpdateChildCommand {
        pub child_id: String,
        pub name: Option<String>,
        pub avatar: Option<String>,
    }

    /// Guardian correction to a balance, outside of toggles and redemptions
    #[derive(Debug, Clone)]
    pub struct AdjustPointsCommand {
        pub child_id: String,
        pub delta: i64,
    }
}

pub mod catalog {
    #[derive(Debug, Clone)]
    pub struct CreateTaskCommand {
        pub title: String,
        pub points: u32,
        /// Empty means the task is assigned to every child
        pub assigned_kids: Vec<String>,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateTaskCommand {
        pub task_id: String,
        pub title: Option<String>,
        pub points: Option<u32>,
    }

    #[derive(Debug, Clone)]
    pub struct CreateRewardCommand {
        pub label: String,
        pub cost: u32,
    }

    #[derive(Debug, Clone, Default)]
    pub struct UpdateRewardCommand {
        pub reward_id: String,
        pub label: Option<String>,
        pub cost: Option<u32>,
    }
}

pub mod chores {
    use chrono::NaiveDate;
    use shared::{Child, Task};

    /// Check or uncheck a task on the date the UI is displaying.
    #[derive(Debug, Clone)]
    pub struct ToggleTaskCommand {
        pub kid_id: String,
        pub task_id: String,
        /// Date currently displayed; must be today
        pub date: NaiveDate,
        pub completed: bool,
    }

    #[derive(Debug, Clone)]
    pub struct ToggleTaskResult {
        pub child: Child,
        pub task: Task,
        /// Points applied to the balance before clamping
        pub delta: i64,
    }

    #[derive(Debug, Clone)]
    pub struct ClearTodayResult {
        pub child: Child,
        /// Points taken back from the balance
        pub points_removed: i64,
    }
}

pub mod redemption {
    use shared::{Child, Redemption};

    #[derive(Debug, Clone)]
    pub struct RedeemRewardCommand {
        pub kid_id: String,
        pub reward_id: String,
    }

    #[derive(Debug, Clone)]
    pub struct RedeemRewardResult {
        pub child: Child,
        pub redemption: Redemption,
    }

    #[derive(Debug, Clone)]
    pub struct CancelRedemptionResult {
        pub child: Child,
        pub redemption: Redemption,
    }
}
