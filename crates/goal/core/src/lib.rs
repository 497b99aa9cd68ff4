//! Priority-arbitrated goal scheduler for autonomous actors.
//!
//! Each actor owns one [`GoalExecutor`] per [`ExecutorCategory`]. Once per
//! tick an executor decides which of its registered goals are active:
//!
//! - **Deterministic**: goals are visited in `(priority, insertion order)`;
//!   lower priority values win.
//! - **Non-preemptive by default**: an active goal is only displaced by a
//!   strictly higher-precedence goal, and only if it is interruptible.
//! - **Fault-isolated**: a goal returning an error is reset and skipped for
//!   the rest of the tick without affecting its siblings.
//!
//! # Architecture
//!
//! - [`Goal`]: lifecycle contract implemented by behaviors
//! - [`GoalExecutor`]: per-actor arbitration and lifecycle driver
//! - [`GoalCommands`]: deferred mutations issued from inside lifecycle calls
//! - [`ControlledActor`]: an actor body plus its executors
//! - [`GoalCatalog`] / [`Loadout`]: data-driven goal types and assignments

pub mod agent;
pub mod catalog;
pub mod category;
pub mod commands;
pub mod config;
pub mod controls;
pub mod error;
pub mod executor;
pub mod goal;
pub mod loadout;
pub mod report;
pub mod state;

pub use agent::{ActorTickReport, ControlledActor};
pub use catalog::{GoalCatalog, GoalType};
pub use category::{ExecutorCategory, GoalCategory, OwnerId};
pub use commands::GoalCommands;
pub use config::{ConcurrencyPolicy, ExecutorConfig};
pub use controls::Controls;
pub use error::{
    CatalogError, ErrorSeverity, ExecutorError, GoalError, GoalResult, LoadoutError,
    SchedulerError,
};
pub use executor::GoalExecutor;
pub use goal::{Goal, GoalContext, GoalInfo, GoalPhase, GoalSpec};
pub use loadout::{GoalFactory, Loadout, LoadoutEntry};
pub use report::{GoalEvent, TickReport};
pub use state::{GoalId, GoalState};
