//! Deferred executor mutations issued by goals.
//!
//! A goal cannot borrow its own executor while the executor is calling it,
//! so `start`, `update` and `reset` receive a [`GoalCommands`] buffer
//! instead. The executor applies the buffer as soon as the call returns:
//!
//! - removals take effect before the next goal is visited, so a removed goal
//!   is never visited again in the same tick;
//! - goals added during a tick become admissible on the following tick.
//!
//! Additions are checked against the executor's capacity and its per-call
//! limit when they are issued, so a refused add is an error at the call
//! site. Removals are never refused.

use std::collections::VecDeque;
use std::sync::Arc;

use crate::catalog::GoalCatalog;
use crate::category::{ExecutorCategory, GoalCategory, OwnerId};
use crate::error::ExecutorError;
use crate::goal::{Goal, GoalSpec};
use crate::state::GoalId;

pub(crate) enum GoalCommand<A> {
    Add {
        id: GoalId,
        spec: GoalSpec,
        goal: Box<dyn Goal<A>>,
    },
    Remove(GoalId),
    RemoveCategory(GoalCategory),
    Clear,
}

/// Queue of mutations a goal requests on its own executor.
pub struct GoalCommands<A> {
    queue: VecDeque<GoalCommand<A>>,
    next_id: u64,
    catalog: Option<Arc<GoalCatalog>>,
    owner: OwnerId,
    executor: ExecutorCategory,
    capacity: usize,
    /// Goals the executor can still take, less the adds queued so far.
    room: usize,
    limit: usize,
    adds: usize,
}

/// Executor-side limits a [`GoalCommands`] buffer enforces at issue time.
pub(crate) struct CommandBounds {
    pub owner: OwnerId,
    pub executor: ExecutorCategory,
    pub capacity: usize,
    pub len: usize,
    pub limit: usize,
}

impl<A> GoalCommands<A> {
    pub(crate) fn new(
        next_id: u64,
        catalog: Option<Arc<GoalCatalog>>,
        bounds: CommandBounds,
    ) -> Self {
        Self {
            queue: VecDeque::new(),
            next_id,
            catalog,
            owner: bounds.owner,
            executor: bounds.executor,
            capacity: bounds.capacity,
            room: bounds.capacity.saturating_sub(bounds.len),
            limit: bounds.limit,
            adds: 0,
        }
    }

    /// Requests registration of a new goal.
    ///
    /// The category is validated against the executor's catalog right away;
    /// the id is reserved now so the caller can refer to the goal later.
    ///
    /// Fails with [`ExecutorError::CapacityExceeded`] if the executor would
    /// overflow, counting goals it holds when the call began, and with
    /// [`ExecutorError::CommandLimit`] once this call has queued
    /// `max_commands_per_call` adds.
    pub fn add<G>(&mut self, spec: GoalSpec, goal: G) -> Result<GoalId, ExecutorError>
    where
        G: Goal<A> + 'static,
    {
        self.add_boxed(spec, Box::new(goal))
    }

    /// Same as [`add`](Self::add) for an already boxed goal.
    pub fn add_boxed(
        &mut self,
        spec: GoalSpec,
        goal: Box<dyn Goal<A>>,
    ) -> Result<GoalId, ExecutorError> {
        if let Some(catalog) = &self.catalog {
            catalog.validate(&spec, self.executor)?;
        }
        if self.adds >= self.limit {
            return Err(ExecutorError::CommandLimit {
                owner: self.owner,
                executor: self.executor,
                limit: self.limit,
            });
        }
        if self.room == 0 {
            return Err(ExecutorError::CapacityExceeded {
                owner: self.owner,
                executor: self.executor,
                capacity: self.capacity,
            });
        }

        let id = GoalId(self.next_id);
        self.next_id += 1;
        self.adds += 1;
        self.room -= 1;
        self.queue.push_back(GoalCommand::Add { id, spec, goal });
        Ok(id)
    }

    /// Requests removal of a goal (reset first if it is active).
    pub fn remove(&mut self, id: GoalId) {
        self.queue.push_back(GoalCommand::Remove(id));
    }

    /// Requests removal of every goal of `category`.
    pub fn remove_by_category(&mut self, category: GoalCategory) {
        self.queue.push_back(GoalCommand::RemoveCategory(category));
    }

    /// Requests removal of every goal.
    pub fn clear(&mut self) {
        self.queue.push_back(GoalCommand::Clear);
    }

    pub fn len(&self) -> usize {
        self.queue.len()
    }

    pub fn is_empty(&self) -> bool {
        self.queue.is_empty()
    }

    pub(crate) fn pop(&mut self) -> Option<GoalCommand<A>> {
        self.queue.pop_front()
    }

    pub(crate) fn next_id(&self) -> u64 {
        self.next_id
    }
}
