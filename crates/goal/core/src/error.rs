//! Error types for the goal scheduler.
//!
//! Three kinds of failure are kept apart:
//!
//! - [`ExecutorError`]: configuration rejected at the call site (`add`) and
//!   executor corruption detected after a tick.
//! - [`GoalError`]: a fault raised by a goal implementation. The executor
//!   isolates it to the goal that raised it and never propagates it.
//! - [`CatalogError`] / [`LoadoutError`]: building catalogs and applying
//!   behavior assignments.
//!
//! Voluntary yielding (`should_start`/`should_continue` returning `false`) is
//! not an error.

use crate::category::{ExecutorCategory, GoalCategory, OwnerId};

/// Severity level of an error, used for categorization and recovery strategies.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum ErrorSeverity {
    /// May succeed later without changes (e.g. capacity freed up).
    Recoverable,

    /// Invalid input that should not be retried without changes.
    Validation,

    /// Unexpected inconsistency inside a goal implementation.
    Internal,

    /// Executor state can no longer be trusted.
    Fatal,
}

impl ErrorSeverity {
    /// Returns a human-readable description of this severity level.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Recoverable => "recoverable",
            Self::Validation => "validation",
            Self::Internal => "internal",
            Self::Fatal => "fatal",
        }
    }

    /// Returns true if this error is potentially recoverable.
    pub const fn is_recoverable(&self) -> bool {
        matches!(self, Self::Recoverable)
    }

    /// Returns true if this error indicates a bug.
    pub const fn is_internal(&self) -> bool {
        matches!(self, Self::Internal | Self::Fatal)
    }
}

/// Common classification interface for scheduler errors.
pub trait SchedulerError: core::fmt::Display + core::fmt::Debug {
    /// Returns the severity level of this error.
    fn severity(&self) -> ErrorSeverity;

    /// Returns a static identifier for this error variant (for logs and tests).
    fn error_code(&self) -> &'static str;
}

/// Result type returned by goal lifecycle methods.
pub type GoalResult<T> = Result<T, GoalError>;

/// A fault raised by a goal implementation.
///
/// Returning one of these from a lifecycle method is fatal to that goal
/// instance for the current tick only: the executor logs it, forces `reset`
/// if the goal was active and keeps it out of admission until the next tick.
#[derive(Debug, thiserror::Error)]
pub enum GoalError {
    #[error("{0}")]
    Failed(String),

    #[error("goal invariant violated: {0}")]
    Invariant(&'static str),

    /// A command issued through [`GoalCommands`](crate::GoalCommands) was refused.
    #[error("command rejected: {0}")]
    Command(#[from] ExecutorError),

    #[error(transparent)]
    Source(Box<dyn std::error::Error + Send + Sync>),
}

impl GoalError {
    /// Creates a fault from a message.
    pub fn failed(message: impl Into<String>) -> Self {
        Self::Failed(message.into())
    }

    /// Wraps an underlying error.
    pub fn source(error: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Source(Box::new(error))
    }
}

impl SchedulerError for GoalError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Internal
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::Failed(_) => "GOAL_FAILED",
            Self::Invariant(_) => "GOAL_INVARIANT",
            Self::Command(_) => "GOAL_COMMAND_REJECTED",
            Self::Source(_) => "GOAL_SOURCE",
        }
    }
}

/// Errors surfaced by [`GoalExecutor`](crate::GoalExecutor) operations.
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum ExecutorError {
    #[error("goal category `{category}` is not registered in the catalog")]
    UnknownCategory { category: GoalCategory },

    #[error("goal category `{category}` belongs to the {expected} executor, not {actual}")]
    WrongExecutor {
        category: GoalCategory,
        expected: ExecutorCategory,
        actual: ExecutorCategory,
    },

    #[error("{executor} executor of {owner} is at capacity ({capacity} goals)")]
    CapacityExceeded {
        owner: OwnerId,
        executor: ExecutorCategory,
        capacity: usize,
    },

    #[error("{executor} executor of {owner} accepts at most {limit} goals per lifecycle call")]
    CommandLimit {
        owner: OwnerId,
        executor: ExecutorCategory,
        limit: usize,
    },

    #[error("{executor} executor of {owner} is corrupted: {reason}")]
    Corrupted {
        owner: OwnerId,
        executor: ExecutorCategory,
        reason: &'static str,
    },
}

impl SchedulerError for ExecutorError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::UnknownCategory { .. } | Self::WrongExecutor { .. } => ErrorSeverity::Validation,
            Self::CapacityExceeded { .. } | Self::CommandLimit { .. } => {
                ErrorSeverity::Recoverable
            }
            Self::Corrupted { .. } => ErrorSeverity::Fatal,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownCategory { .. } => "EXECUTOR_UNKNOWN_CATEGORY",
            Self::WrongExecutor { .. } => "EXECUTOR_WRONG_EXECUTOR",
            Self::CapacityExceeded { .. } => "EXECUTOR_CAPACITY_EXCEEDED",
            Self::CommandLimit { .. } => "EXECUTOR_COMMAND_LIMIT",
            Self::Corrupted { .. } => "EXECUTOR_CORRUPTED",
        }
    }
}

/// Errors raised while building a [`GoalCatalog`](crate::GoalCatalog).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum CatalogError {
    #[error("goal type `{0}` is already registered")]
    Duplicate(GoalCategory),
}

impl SchedulerError for CatalogError {
    fn severity(&self) -> ErrorSeverity {
        ErrorSeverity::Validation
    }

    fn error_code(&self) -> &'static str {
        "CATALOG_DUPLICATE"
    }
}

/// Errors raised while applying a [`Loadout`](crate::Loadout).
#[derive(Clone, Debug, PartialEq, Eq, thiserror::Error)]
pub enum LoadoutError {
    #[error("goal type `{0}` is not in the catalog")]
    UnknownGoalType(GoalCategory),

    #[error("goal type `{0}` has no priority in the loadout or the catalog")]
    MissingPriority(GoalCategory),

    #[error("no goal implementation available for `{0}`")]
    NoImplementation(GoalCategory),

    #[error(transparent)]
    Executor(#[from] ExecutorError),
}

impl SchedulerError for LoadoutError {
    fn severity(&self) -> ErrorSeverity {
        match self {
            Self::Executor(inner) => inner.severity(),
            _ => ErrorSeverity::Validation,
        }
    }

    fn error_code(&self) -> &'static str {
        match self {
            Self::UnknownGoalType(_) => "LOADOUT_UNKNOWN_GOAL_TYPE",
            Self::MissingPriority(_) => "LOADOUT_MISSING_PRIORITY",
            Self::NoImplementation(_) => "LOADOUT_NO_IMPLEMENTATION",
            Self::Executor(inner) => inner.error_code(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn corruption_is_fatal_and_config_errors_are_validation() {
        let corrupted = ExecutorError::Corrupted {
            owner: OwnerId(3),
            executor: ExecutorCategory::Normal,
            reason: "entries out of precedence order",
        };
        assert_eq!(corrupted.severity(), ErrorSeverity::Fatal);
        assert!(corrupted.severity().is_internal());

        let unknown = ExecutorError::UnknownCategory {
            category: GoalCategory::from_static("fly"),
        };
        assert_eq!(unknown.severity(), ErrorSeverity::Validation);
        assert_eq!(unknown.error_code(), "EXECUTOR_UNKNOWN_CATEGORY");
    }

    #[test]
    fn wrong_executor_message_names_both_sides() {
        let err = ExecutorError::WrongExecutor {
            category: GoalCategory::from_static("revenge"),
            expected: ExecutorCategory::Target,
            actual: ExecutorCategory::Normal,
        };
        assert_eq!(
            err.to_string(),
            "goal category `revenge` belongs to the target executor, not normal"
        );
    }

    #[test]
    fn loadout_error_delegates_to_executor_error() {
        let err = LoadoutError::from(ExecutorError::CapacityExceeded {
            owner: OwnerId(1),
            executor: ExecutorCategory::Normal,
            capacity: 2,
        });
        assert!(err.severity().is_recoverable());
        assert_eq!(err.error_code(), "EXECUTOR_CAPACITY_EXCEEDED");
    }
}
