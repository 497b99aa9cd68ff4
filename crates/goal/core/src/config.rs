/// Which side of a goal pair decides whether the two may run together.
#[derive(
    Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display, strum::EnumString,
)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case", ascii_case_insensitive)]
pub enum ConcurrencyPolicy {
    /// Only the higher-precedence goal of the pair is asked.
    #[default]
    HigherPrecedence,
    /// Both goals are asked and both must agree.
    Symmetric,
}

/// Executor configuration constants and tunable parameters.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(default)
)]
pub struct ExecutorConfig {
    /// How `can_run_concurrently_with` is evaluated between a candidate and
    /// an active goal.
    pub concurrency: ConcurrencyPolicy,
    /// Maximum number of goals one executor accepts.
    pub max_goals: usize,
    /// Upper bound on goals one lifecycle call may add through its
    /// [`GoalCommands`](crate::GoalCommands), including adds issued by the
    /// resets its removals trigger. Further adds fail with
    /// [`ExecutorError::CommandLimit`](crate::ExecutorError::CommandLimit).
    pub max_commands_per_call: usize,
}

impl ExecutorConfig {
    // ===== runtime-tunable defaults =====
    pub const DEFAULT_MAX_GOALS: usize = 64;
    pub const DEFAULT_MAX_COMMANDS_PER_CALL: usize = 32;

    pub fn new() -> Self {
        Self {
            concurrency: ConcurrencyPolicy::default(),
            max_goals: Self::DEFAULT_MAX_GOALS,
            max_commands_per_call: Self::DEFAULT_MAX_COMMANDS_PER_CALL,
        }
    }

    #[must_use]
    pub fn with_concurrency(mut self, concurrency: ConcurrencyPolicy) -> Self {
        self.concurrency = concurrency;
        self
    }

    #[must_use]
    pub fn with_max_goals(mut self, max_goals: usize) -> Self {
        self.max_goals = max_goals;
        self
    }

    #[must_use]
    pub fn with_max_commands_per_call(mut self, limit: usize) -> Self {
        self.max_commands_per_call = limit;
        self
    }
}

impl Default for ExecutorConfig {
    fn default() -> Self {
        Self::new()
    }
}
