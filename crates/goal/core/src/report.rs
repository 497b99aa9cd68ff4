//! Per-tick record of what an executor did.

use crate::category::{ExecutorCategory, GoalCategory, OwnerId};
use crate::goal::GoalPhase;
use crate::state::GoalId;

/// A lifecycle transition or fault observed during a tick.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize),
    serde(tag = "event", rename_all = "snake_case")
)]
pub enum GoalEvent {
    /// Admitted and `start` returned.
    Started { id: GoalId, category: GoalCategory },
    /// `should_continue` returned false and the goal was reset.
    Stopped { id: GoalId, category: GoalCategory },
    /// Displaced by a higher-precedence goal.
    Interrupted {
        id: GoalId,
        category: GoalCategory,
        by: GoalId,
    },
    /// A lifecycle method returned an error.
    Faulted {
        id: GoalId,
        category: GoalCategory,
        phase: GoalPhase,
        error: String,
    },
    /// Registered by another goal during the tick.
    Added { id: GoalId, category: GoalCategory },
    /// Unregistered during the tick.
    Removed {
        id: GoalId,
        category: GoalCategory,
        was_active: bool,
    },
}

impl GoalEvent {
    /// The goal the event is about.
    pub fn id(&self) -> GoalId {
        match self {
            Self::Started { id, .. }
            | Self::Stopped { id, .. }
            | Self::Interrupted { id, .. }
            | Self::Faulted { id, .. }
            | Self::Added { id, .. }
            | Self::Removed { id, .. } => *id,
        }
    }
}

/// Everything one executor tick did, in the order it happened.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct TickReport {
    pub owner: OwnerId,
    pub executor: ExecutorCategory,
    pub tick: u64,
    pub events: Vec<GoalEvent>,
    /// Goals whose `update` ran, in call order.
    pub updated: Vec<GoalId>,
}

impl TickReport {
    /// Goals admitted this tick.
    pub fn started(&self) -> impl Iterator<Item = GoalId> + '_ {
        self.events.iter().filter_map(|e| match e {
            GoalEvent::Started { id, .. } => Some(*id),
            _ => None,
        })
    }

    /// Goals that stopped voluntarily this tick.
    pub fn stopped(&self) -> impl Iterator<Item = GoalId> + '_ {
        self.events.iter().filter_map(|e| match e {
            GoalEvent::Stopped { id, .. } => Some(*id),
            _ => None,
        })
    }

    /// `(interrupted, by)` pairs.
    pub fn interrupted(&self) -> impl Iterator<Item = (GoalId, GoalId)> + '_ {
        self.events.iter().filter_map(|e| match e {
            GoalEvent::Interrupted { id, by, .. } => Some((*id, *by)),
            _ => None,
        })
    }

    /// Faulted goals with the phase they faulted in.
    pub fn faults(&self) -> impl Iterator<Item = (GoalId, GoalPhase)> + '_ {
        self.events.iter().filter_map(|e| match e {
            GoalEvent::Faulted { id, phase, .. } => Some((*id, *phase)),
            _ => None,
        })
    }

    /// True if no goal changed state and nothing was updated.
    pub fn is_quiet(&self) -> bool {
        self.events.is_empty() && self.updated.is_empty()
    }
}
