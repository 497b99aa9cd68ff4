//! Core goal trait and registration types.
//!
//! This module defines the [`Goal`] trait, the lifecycle contract every
//! schedulable behavior implements. The trait is generic over the actor type
//! `A` the goal drives; the executor hands the actor into every call rather
//! than goals holding a reference to it.

use crate::catalog::GoalType;
use crate::category::{GoalCategory, OwnerId};
use crate::commands::GoalCommands;
use crate::controls::Controls;
use crate::error::GoalResult;
use crate::state::{GoalId, GoalState};

/// A behavior that competes for admission in a [`GoalExecutor`](crate::GoalExecutor).
///
/// # Lifecycle
///
/// Every method is called by the owning executor only:
///
/// 1. `should_start` while the goal is idle; `true` makes it a candidate.
/// 2. `start` exactly once when it is admitted.
/// 3. `should_continue` then `update`, once each per tick while active.
/// 4. `reset` exactly once when it stops, is interrupted, or is removed.
///
/// Queries take `&self` and must not have side effects. Returning `Err` from
/// any method is treated as a fault of this goal alone.
pub trait Goal<A>: Send {
    /// Whether the goal wants to run this tick.
    fn should_start(&self, actor: &A) -> GoalResult<bool>;

    /// Called once right after admission, before the first `update`.
    fn start(&mut self, _ctx: &mut GoalContext<'_, A>) -> GoalResult<()> {
        Ok(())
    }

    /// Whether an active goal keeps running. Defaults to `should_start`.
    fn should_continue(&self, actor: &A) -> GoalResult<bool> {
        self.should_start(actor)
    }

    /// Advances the behavior by one tick.
    fn update(&mut self, ctx: &mut GoalContext<'_, A>) -> GoalResult<()>;

    /// Releases whatever `start` claimed.
    fn reset(&mut self, _ctx: &mut GoalContext<'_, A>) -> GoalResult<()> {
        Ok(())
    }

    /// Control channels this goal needs exclusively while active.
    fn controls(&self) -> Controls {
        Controls::empty()
    }

    /// Whether this goal may be active at the same time as `other`.
    ///
    /// With the default [`ConcurrencyPolicy`](crate::ConcurrencyPolicy) only
    /// the higher-precedence goal of a pair is asked.
    fn can_run_concurrently_with(&self, other: &dyn Goal<A>) -> bool {
        !self.controls().conflicts_with(other.controls())
    }

    /// Name used in logs and snapshots.
    fn name(&self) -> &'static str {
        std::any::type_name::<Self>()
    }
}

/// Access a goal gets while it runs `start`, `update` or `reset`.
pub struct GoalContext<'a, A> {
    /// The actor this goal drives.
    pub actor: &'a mut A,
    /// Deferred mutations of the goal's own executor.
    pub commands: &'a mut GoalCommands<A>,
    id: GoalId,
    owner: OwnerId,
    tick: u64,
}

impl<'a, A> GoalContext<'a, A> {
    pub(crate) fn new(
        actor: &'a mut A,
        commands: &'a mut GoalCommands<A>,
        id: GoalId,
        owner: OwnerId,
        tick: u64,
    ) -> Self {
        Self {
            actor,
            commands,
            id,
            owner,
            tick,
        }
    }

    /// Handle of the goal being called.
    pub fn id(&self) -> GoalId {
        self.id
    }

    /// Owner of the executor.
    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    /// Index of the executor tick in progress (or of the next one, for calls
    /// made outside a tick such as `remove`).
    pub fn tick(&self) -> u64 {
        self.tick
    }
}

/// Registration parameters of a goal.
///
/// Fixed for the lifetime of the registration; re-register (`take` + `add`)
/// to change them.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GoalSpec {
    pub category: GoalCategory,
    /// Lower value means higher precedence.
    pub priority: i32,
    /// Whether a higher-precedence goal may displace this one while active.
    pub interruptible: bool,
}

impl GoalSpec {
    /// Creates an interruptible spec.
    pub fn new(category: impl Into<GoalCategory>, priority: i32) -> Self {
        Self {
            category: category.into(),
            priority,
            interruptible: true,
        }
    }

    /// Builds a spec from catalog metadata, overriding the default priority.
    pub fn from_type(goal_type: &GoalType, priority: i32) -> Self {
        Self {
            category: goal_type.category.clone(),
            priority,
            interruptible: goal_type.interruptible,
        }
    }

    #[must_use]
    pub fn with_interruptible(mut self, interruptible: bool) -> Self {
        self.interruptible = interruptible;
        self
    }

    #[must_use]
    pub fn uninterruptible(self) -> Self {
        self.with_interruptible(false)
    }
}

/// Lifecycle method a fault was raised from.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, strum::Display)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(rename_all = "snake_case")
)]
#[strum(serialize_all = "snake_case")]
pub enum GoalPhase {
    ShouldStart,
    Start,
    ShouldContinue,
    Update,
    Reset,
}

/// Read-only snapshot of a registered goal.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct GoalInfo {
    pub id: GoalId,
    pub name: &'static str,
    pub category: GoalCategory,
    pub priority: i32,
    pub interruptible: bool,
    pub state: GoalState,
}
