//! Lifecycle state and handles of registered goals.

use std::fmt;

/// Lifecycle state of a registered goal.
///
/// Goals start `Idle`, become `Active` when admitted, and return to `Idle`
/// when reset. There is no terminal state: a goal can be admitted again on
/// any later tick.
#[derive(Clone, Copy, Debug, Default, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case")]
pub enum GoalState {
    /// Registered but not running.
    #[default]
    Idle,
    /// Admitted and updated every tick until it stops or is interrupted.
    Active,
}

impl GoalState {
    #[inline]
    pub fn is_active(self) -> bool {
        matches!(self, GoalState::Active)
    }

    #[inline]
    pub fn is_idle(self) -> bool {
        matches!(self, GoalState::Idle)
    }
}

/// Handle of a goal registered with an executor.
///
/// Ids are allocated in insertion order and are never reused by the same
/// executor, so they double as the stable tie-break between equal priorities.
#[derive(Clone, Copy, Debug, PartialEq, Eq, PartialOrd, Ord, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GoalId(pub(crate) u64);

impl GoalId {
    /// Returns the raw sequence number.
    #[inline]
    pub const fn get(self) -> u64 {
        self.0
    }
}

impl fmt::Display for GoalId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "goal#{}", self.0)
    }
}
