//! Per-actor goal executor.
//!
//! A [`GoalExecutor`] owns the goals of one actor for one
//! [`ExecutorCategory`] and arbitrates between them once per tick.
//!
//! # Tick
//!
//! Each call to [`GoalExecutor::tick`] runs three passes, each visiting goals
//! in ascending precedence (priority, then insertion order):
//!
//! 1. **Continuation**: every goal active at the start of the tick is asked
//!    `should_continue`; those answering `false` are reset.
//! 2. **Admission**: every admissible idle goal answering `should_start` is
//!    checked against the active goals. It is admitted if nothing blocks it,
//!    or if every blocker is interruptible and has a strictly larger priority
//!    value, in which case the blockers are reset first.
//! 3. **Update**: every active goal gets `update`.
//!
//! A goal that returns an error from any lifecycle method is reset (if
//! active), reported, and kept out of admission for the rest of the tick.
//! The other goals are unaffected.

use std::collections::HashSet;
use std::fmt;
use std::sync::Arc;

use tracing::{debug, error, trace, warn};

use crate::catalog::GoalCatalog;
use crate::category::{ExecutorCategory, GoalCategory, OwnerId};
use crate::commands::{CommandBounds, GoalCommand, GoalCommands};
use crate::config::{ConcurrencyPolicy, ExecutorConfig};
use crate::error::{ExecutorError, GoalError, GoalResult};
use crate::goal::{Goal, GoalContext, GoalInfo, GoalPhase, GoalSpec};
use crate::report::{GoalEvent, TickReport};
use crate::state::{GoalId, GoalState};

/// Precedence key: lower sorts first.
type Precedence = (i32, GoalId);

struct GoalEntry<A> {
    id: GoalId,
    spec: GoalSpec,
    state: GoalState,
    /// First tick index on which the goal may be admitted.
    admissible_from: u64,
    goal: Box<dyn Goal<A>>,
}

impl<A> GoalEntry<A> {
    fn key(&self) -> Precedence {
        (self.spec.priority, self.id)
    }

    fn info(&self) -> GoalInfo {
        GoalInfo {
            id: self.id,
            name: self.goal.name(),
            category: self.spec.category.clone(),
            priority: self.spec.priority,
            interruptible: self.spec.interruptible,
            state: self.state,
        }
    }
}

enum Stop {
    Finished,
    Interrupted { by: GoalId },
}

/// Bookkeeping for one tick, or for a mutation made between ticks.
struct Journal {
    tick: u64,
    in_tick: bool,
    events: Vec<GoalEvent>,
    updated: Vec<GoalId>,
    /// Goals that faulted this tick and may not be admitted again until the next.
    excluded: HashSet<GoalId>,
}

impl Journal {
    fn tick(tick: u64) -> Self {
        Self {
            tick,
            in_tick: true,
            events: Vec::new(),
            updated: Vec::new(),
            excluded: HashSet::new(),
        }
    }

    fn detached(next_tick: u64) -> Self {
        Self {
            in_tick: false,
            ..Self::tick(next_tick)
        }
    }

    fn push(&mut self, event: GoalEvent) {
        self.events.push(event);
    }
}

/// Priority-arbitrated scheduler for the goals of one actor.
///
/// The executor never holds the actor itself; every operation that may call
/// into a goal takes the actor by mutable reference.
pub struct GoalExecutor<A> {
    owner: OwnerId,
    category: ExecutorCategory,
    config: ExecutorConfig,
    catalog: Option<Arc<GoalCatalog>>,
    /// Sorted by precedence.
    entries: Vec<GoalEntry<A>>,
    next_id: u64,
    next_tick: u64,
}

impl<A> GoalExecutor<A> {
    pub fn new(owner: OwnerId, category: ExecutorCategory) -> Self {
        Self {
            owner,
            category,
            config: ExecutorConfig::default(),
            catalog: None,
            entries: Vec::new(),
            next_id: 0,
            next_tick: 0,
        }
    }

    #[must_use]
    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Restricts registrations to the categories listed in `catalog` for
    /// this executor's category.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<GoalCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn owner(&self) -> OwnerId {
        self.owner
    }

    pub fn category(&self) -> ExecutorCategory {
        self.category
    }

    pub fn config(&self) -> &ExecutorConfig {
        &self.config
    }

    pub fn catalog(&self) -> Option<&GoalCatalog> {
        self.catalog.as_deref()
    }

    /// Number of ticks run so far.
    pub fn ticks(&self) -> u64 {
        self.next_tick
    }

    // ========================================================================
    // Registration
    // ========================================================================

    /// Registers a goal. It stays idle until the next admission pass.
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
            catalog.validate(&spec, self.category)?;
        }

        let id = GoalId(self.next_id);
        self.insert(id, spec, goal, self.next_tick)?;
        self.next_id += 1;
        Ok(id)
    }

    /// Unregisters a goal, resetting it first if it is active.
    ///
    /// Returns `false` if the goal is not registered.
    pub fn remove(&mut self, actor: &mut A, id: GoalId) -> bool {
        self.take(actor, id).is_some()
    }

    /// Like [`remove`](Self::remove) but hands the goal back, e.g. to
    /// register it again under a different priority.
    pub fn take(&mut self, actor: &mut A, id: GoalId) -> Option<Box<dyn Goal<A>>> {
        let idx = self.index_of(id)?;
        let mut journal = Journal::detached(self.next_tick);
        let mut commands = self.buffer();
        let entry = self.detach(actor, idx, &mut commands, &mut journal);
        self.apply(actor, commands, &mut journal);
        Some(entry.goal)
    }

    /// Unregisters every goal of `category`, resetting active ones first.
    pub fn remove_by_category(&mut self, actor: &mut A, category: &GoalCategory) -> &mut Self {
        let ids = self.ids_where(|e| &e.spec.category == category);
        self.detach_all(actor, ids);
        self
    }

    /// Unregisters every goal, resetting active ones first.
    pub fn clear(&mut self, actor: &mut A) {
        let ids = self.ids_where(|_| true);
        self.detach_all(actor, ids);
    }

    // ========================================================================
    // Snapshots
    // ========================================================================

    /// All registered goals in precedence order.
    pub fn list(&self) -> Vec<GoalInfo> {
        self.entries.iter().map(GoalEntry::info).collect()
    }

    /// Registered goals of one category in precedence order.
    pub fn list_by_category(&self, category: &GoalCategory) -> Vec<GoalInfo> {
        self.entries
            .iter()
            .filter(|e| &e.spec.category == category)
            .map(GoalEntry::info)
            .collect()
    }

    /// Active goals in precedence order.
    pub fn active(&self) -> Vec<GoalId> {
        self.ids_where(|e| e.state.is_active())
    }

    pub fn state(&self, id: GoalId) -> Option<GoalState> {
        self.entries.iter().find(|e| e.id == id).map(|e| e.state)
    }

    pub fn goal(&self, id: GoalId) -> Option<&dyn Goal<A>> {
        self.entries
            .iter()
            .find(|e| e.id == id)
            .map(|e| &*e.goal as &dyn Goal<A>)
    }

    pub fn contains(&self, id: GoalId) -> bool {
        self.index_of(id).is_some()
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    // ========================================================================
    // Tick
    // ========================================================================

    /// Runs continuation, admission and update once.
    ///
    /// Goal faults never make this fail. An error means the executor found
    /// its own bookkeeping inconsistent; it resets every goal to idle before
    /// returning so the next tick starts from a clean state.
    pub fn tick(&mut self, actor: &mut A) -> Result<TickReport, ExecutorError> {
        let tick = self.next_tick;
        let _span = tracing::trace_span!(
            target: "goal_core::executor",
            "tick",
            owner = %self.owner,
            executor = %self.category,
            tick
        )
        .entered();

        let mut journal = Journal::tick(tick);
        self.continuation_pass(actor, &mut journal);
        self.admission_pass(actor, &mut journal);
        self.update_pass(actor, &mut journal);
        self.next_tick += 1;

        if let Err(reason) = self.verify() {
            error!(
                target: "goal_core::executor",
                owner = %self.owner,
                executor = %self.category,
                tick,
                reason,
                "Executor invariant violated, resetting all goals"
            );
            self.recover(actor);
            return Err(ExecutorError::Corrupted {
                owner: self.owner,
                executor: self.category,
                reason,
            });
        }

        Ok(TickReport {
            owner: self.owner,
            executor: self.category,
            tick,
            events: journal.events,
            updated: journal.updated,
        })
    }

    fn continuation_pass(&mut self, actor: &mut A, journal: &mut Journal) {
        for key in self.keys_in(GoalState::Active) {
            let Some(idx) = self.find(key) else {
                continue;
            };
            if !self.entries[idx].state.is_active() {
                continue;
            }

            match self.entries[idx].goal.should_continue(actor) {
                Ok(true) => {}
                Ok(false) => self.stop(actor, idx, Stop::Finished, journal),
                Err(err) => self.fault(actor, idx, GoalPhase::ShouldContinue, err, journal),
            }
        }
    }

    fn admission_pass(&mut self, actor: &mut A, journal: &mut Journal) {
        let candidates: Vec<Precedence> = self
            .entries
            .iter()
            .filter(|e| e.state.is_idle() && e.admissible_from <= journal.tick)
            .map(GoalEntry::key)
            .collect();

        for key in candidates {
            let Some(idx) = self.find(key) else {
                continue;
            };
            let entry = &self.entries[idx];
            if !entry.state.is_idle() || journal.excluded.contains(&entry.id) {
                continue;
            }

            match entry.goal.should_start(actor) {
                Ok(true) => {}
                Ok(false) => continue,
                Err(err) => {
                    self.fault(actor, idx, GoalPhase::ShouldStart, err, journal);
                    continue;
                }
            }

            let blockers = self.blockers(idx);
            if !blockers.is_empty() {
                let candidate = &self.entries[idx];
                let holdout = blockers
                    .iter()
                    .filter_map(|&b| self.find(b))
                    .find(|&b| !Self::displaceable(candidate, &self.entries[b]));

                if let Some(b) = holdout {
                    trace!(
                        target: "goal_core::executor",
                        owner = %self.owner,
                        goal = %candidate.id,
                        blocked_by = %self.entries[b].id,
                        "Admission blocked"
                    );
                    continue;
                }

                let by = candidate.id;
                for blocker in blockers {
                    if let Some(b) = self.find(blocker)
                        && self.entries[b].state.is_active()
                    {
                        self.stop(actor, b, Stop::Interrupted { by }, journal);
                    }
                }
            }

            // Resets above may have applied commands that moved the candidate.
            let Some(idx) = self.find(key) else {
                continue;
            };
            if self.entries[idx].state.is_idle() {
                self.admit(actor, idx, journal);
            }
        }
    }

    fn update_pass(&mut self, actor: &mut A, journal: &mut Journal) {
        for key in self.keys_in(GoalState::Active) {
            let Some(idx) = self.find(key) else {
                continue;
            };
            if !self.entries[idx].state.is_active() {
                continue;
            }

            let mut commands = self.buffer();
            match self.call(actor, idx, &mut commands, journal.tick, |goal, ctx| {
                goal.update(ctx)
            }) {
                Ok(()) => journal.updated.push(self.entries[idx].id),
                Err(err) => {
                    self.report_fault(idx, GoalPhase::Update, &err, journal);
                    self.force_reset(actor, idx, &mut commands, journal);
                }
            }
            self.apply(actor, commands, journal);
        }
    }

    // ========================================================================
    // Arbitration helpers
    // ========================================================================

    /// Active goals the candidate cannot run alongside.
    fn blockers(&self, candidate: usize) -> Vec<Precedence> {
        self.entries
            .iter()
            .enumerate()
            .filter(|&(i, e)| i != candidate && e.state.is_active())
            .filter(|&(i, _)| !self.compatible(candidate, i))
            .map(|(_, e)| e.key())
            .collect()
    }

    fn compatible(&self, a: usize, b: usize) -> bool {
        let (a, b) = (&self.entries[a], &self.entries[b]);
        match self.config.concurrency {
            ConcurrencyPolicy::HigherPrecedence => {
                let (high, low) = if a.key() < b.key() { (a, b) } else { (b, a) };
                high.goal.can_run_concurrently_with(&*low.goal)
            }
            ConcurrencyPolicy::Symmetric => {
                a.goal.can_run_concurrently_with(&*b.goal)
                    && b.goal.can_run_concurrently_with(&*a.goal)
            }
        }
    }

    /// Equal priority never displaces.
    fn displaceable(candidate: &GoalEntry<A>, active: &GoalEntry<A>) -> bool {
        active.spec.interruptible && candidate.spec.priority < active.spec.priority
    }

    fn admit(&mut self, actor: &mut A, idx: usize, journal: &mut Journal) {
        let mut commands = self.buffer();
        self.entries[idx].state = GoalState::Active;

        match self.call(actor, idx, &mut commands, journal.tick, |goal, ctx| goal.start(ctx)) {
            Ok(()) => {
                let entry = &self.entries[idx];
                debug!(
                    target: "goal_core::executor",
                    owner = %self.owner,
                    executor = %self.category,
                    goal = %entry.id,
                    category = %entry.spec.category,
                    priority = entry.spec.priority,
                    "Goal started"
                );
                journal.push(GoalEvent::Started {
                    id: entry.id,
                    category: entry.spec.category.clone(),
                });
            }
            Err(err) => {
                self.report_fault(idx, GoalPhase::Start, &err, journal);
                self.force_reset(actor, idx, &mut commands, journal);
            }
        }

        self.apply(actor, commands, journal);
    }

    fn stop(&mut self, actor: &mut A, idx: usize, reason: Stop, journal: &mut Journal) {
        let id = self.entries[idx].id;
        let category = self.entries[idx].spec.category.clone();

        match reason {
            Stop::Finished => {
                debug!(
                    target: "goal_core::executor",
                    owner = %self.owner,
                    executor = %self.category,
                    goal = %id,
                    category = %category,
                    "Goal stopped"
                );
                journal.push(GoalEvent::Stopped { id, category });
            }
            Stop::Interrupted { by } => {
                debug!(
                    target: "goal_core::executor",
                    owner = %self.owner,
                    executor = %self.category,
                    goal = %id,
                    category = %category,
                    by = %by,
                    "Goal interrupted"
                );
                journal.push(GoalEvent::Interrupted { id, category, by });
            }
        }

        let mut commands = self.buffer();
        self.force_reset(actor, idx, &mut commands, journal);
        self.apply(actor, commands, journal);
    }

    fn fault(
        &mut self,
        actor: &mut A,
        idx: usize,
        phase: GoalPhase,
        err: GoalError,
        journal: &mut Journal,
    ) {
        self.report_fault(idx, phase, &err, journal);

        if self.entries[idx].state.is_active() {
            let mut commands = self.buffer();
            self.force_reset(actor, idx, &mut commands, journal);
            self.apply(actor, commands, journal);
        }
    }

    fn report_fault(&self, idx: usize, phase: GoalPhase, err: &GoalError, journal: &mut Journal) {
        let entry = &self.entries[idx];
        error!(
            target: "goal_core::executor",
            owner = %self.owner,
            executor = %self.category,
            goal = %entry.id,
            name = entry.goal.name(),
            category = %entry.spec.category,
            phase = %phase,
            error = %err,
            "Goal faulted, isolating it for the rest of the tick"
        );
        journal.excluded.insert(entry.id);
        journal.push(GoalEvent::Faulted {
            id: entry.id,
            category: entry.spec.category.clone(),
            phase,
            error: err.to_string(),
        });
    }

    /// Calls `reset` and marks the goal idle whatever the outcome.
    fn force_reset(
        &mut self,
        actor: &mut A,
        idx: usize,
        commands: &mut GoalCommands<A>,
        journal: &mut Journal,
    ) {
        let result = self.call(actor, idx, commands, journal.tick, |goal, ctx| goal.reset(ctx));
        self.entries[idx].state = GoalState::Idle;

        if let Err(err) = result {
            self.report_fault(idx, GoalPhase::Reset, &err, journal);
        }
    }

    fn call<R>(
        &mut self,
        actor: &mut A,
        idx: usize,
        commands: &mut GoalCommands<A>,
        tick: u64,
        f: impl FnOnce(&mut Box<dyn Goal<A>>, &mut GoalContext<'_, A>) -> GoalResult<R>,
    ) -> GoalResult<R> {
        let owner = self.owner;
        let entry = &mut self.entries[idx];
        let mut ctx = GoalContext::new(actor, commands, entry.id, owner, tick);
        f(&mut entry.goal, &mut ctx)
    }

    // ========================================================================
    // Mutation
    // ========================================================================

    fn buffer(&self) -> GoalCommands<A> {
        GoalCommands::new(
            self.next_id,
            self.catalog.clone(),
            CommandBounds {
                owner: self.owner,
                executor: self.category,
                capacity: self.config.max_goals,
                len: self.entries.len(),
                limit: self.config.max_commands_per_call,
            },
        )
    }

    fn insert(
        &mut self,
        id: GoalId,
        spec: GoalSpec,
        goal: Box<dyn Goal<A>>,
        admissible_from: u64,
    ) -> Result<(), ExecutorError> {
        if self.entries.len() >= self.config.max_goals {
            return Err(ExecutorError::CapacityExceeded {
                owner: self.owner,
                executor: self.category,
                capacity: self.config.max_goals,
            });
        }

        debug!(
            target: "goal_core::executor",
            owner = %self.owner,
            executor = %self.category,
            goal = %id,
            category = %spec.category,
            priority = spec.priority,
            interruptible = spec.interruptible,
            "Goal registered"
        );

        let key = (spec.priority, id);
        let at = self.entries.partition_point(|e| e.key() < key);
        self.entries.insert(
            at,
            GoalEntry {
                id,
                spec,
                state: GoalState::Idle,
                admissible_from,
                goal,
            },
        );
        Ok(())
    }

    fn detach(
        &mut self,
        actor: &mut A,
        idx: usize,
        commands: &mut GoalCommands<A>,
        journal: &mut Journal,
    ) -> GoalEntry<A> {
        let was_active = self.entries[idx].state.is_active();
        if was_active {
            self.force_reset(actor, idx, commands, journal);
        }

        let entry = self.entries.remove(idx);
        debug!(
            target: "goal_core::executor",
            owner = %self.owner,
            executor = %self.category,
            goal = %entry.id,
            category = %entry.spec.category,
            was_active,
            "Goal removed"
        );
        journal.push(GoalEvent::Removed {
            id: entry.id,
            category: entry.spec.category.clone(),
            was_active,
        });
        entry
    }

    fn detach_all(&mut self, actor: &mut A, ids: Vec<GoalId>) {
        let mut journal = Journal::detached(self.next_tick);
        let mut commands = self.buffer();
        for id in ids {
            if let Some(idx) = self.index_of(id) {
                self.detach(actor, idx, &mut commands, &mut journal);
            }
        }
        self.apply(actor, commands, &mut journal);
    }

    /// Applies commands issued by the call that just returned, including any
    /// issued by the resets those commands trigger.
    ///
    /// The buffer bounds the adds it accepts, so the queue always drains.
    fn apply(&mut self, actor: &mut A, mut commands: GoalCommands<A>, journal: &mut Journal) {
        while let Some(command) = commands.pop() {
            match command {
                GoalCommand::Add { id, spec, goal } => {
                    let admissible_from = if journal.in_tick {
                        journal.tick + 1
                    } else {
                        self.next_tick
                    };
                    let category = spec.category.clone();
                    match self.insert(id, spec, goal, admissible_from) {
                        Ok(()) => journal.push(GoalEvent::Added { id, category }),
                        Err(err) => warn!(
                            target: "goal_core::executor",
                            owner = %self.owner,
                            executor = %self.category,
                            goal = %id,
                            category = %category,
                            error = %err,
                            "Goal added by command rejected"
                        ),
                    }
                }
                GoalCommand::Remove(id) => {
                    if let Some(idx) = self.index_of(id) {
                        self.detach(actor, idx, &mut commands, journal);
                    }
                }
                GoalCommand::RemoveCategory(category) => {
                    for id in self.ids_where(|e| e.spec.category == category) {
                        if let Some(idx) = self.index_of(id) {
                            self.detach(actor, idx, &mut commands, journal);
                        }
                    }
                }
                GoalCommand::Clear => {
                    for id in self.ids_where(|_| true) {
                        if let Some(idx) = self.index_of(id) {
                            self.detach(actor, idx, &mut commands, journal);
                        }
                    }
                }
            }
        }

        self.next_id = self.next_id.max(commands.next_id());
    }

    // ========================================================================
    // Lookup & invariants
    // ========================================================================

    fn find(&self, key: Precedence) -> Option<usize> {
        self.entries.binary_search_by(|e| e.key().cmp(&key)).ok()
    }

    fn index_of(&self, id: GoalId) -> Option<usize> {
        self.entries.iter().position(|e| e.id == id)
    }

    fn keys_in(&self, state: GoalState) -> Vec<Precedence> {
        self.entries
            .iter()
            .filter(|e| e.state == state)
            .map(GoalEntry::key)
            .collect()
    }

    fn ids_where(&self, pred: impl Fn(&GoalEntry<A>) -> bool) -> Vec<GoalId> {
        self.entries.iter().filter(|e| pred(e)).map(|e| e.id).collect()
    }

    fn verify(&self) -> Result<(), &'static str> {
        if !self.entries.windows(2).all(|w| w[0].key() < w[1].key()) {
            return Err("entries out of precedence order");
        }

        let mut seen = HashSet::with_capacity(self.entries.len());
        if !self.entries.iter().all(|e| seen.insert(e.id)) {
            return Err("goal registered twice");
        }

        if self.entries.iter().any(|e| e.id.0 >= self.next_id) {
            return Err("goal id ahead of allocator");
        }

        Ok(())
    }

    /// Resets every active goal and restores ordering after a failed check.
    /// Commands issued by those resets are discarded.
    fn recover(&mut self, actor: &mut A) {
        let mut journal = Journal::detached(self.next_tick);
        for idx in 0..self.entries.len() {
            if !self.entries[idx].state.is_active() {
                continue;
            }
            let mut commands = self.buffer();
            self.force_reset(actor, idx, &mut commands, &mut journal);
            if !commands.is_empty() {
                warn!(
                    target: "goal_core::executor",
                    owner = %self.owner,
                    executor = %self.category,
                    dropped = commands.len(),
                    "Discarding commands issued during recovery"
                );
            }
        }

        self.entries.sort_by_key(GoalEntry::key);
        self.entries.dedup_by_key(|e| e.id);
        if let Some(max) = self.entries.iter().map(|e| e.id.0).max() {
            self.next_id = self.next_id.max(max + 1);
        }
    }
}

impl<A> fmt::Debug for GoalExecutor<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("GoalExecutor")
            .field("owner", &self.owner)
            .field("category", &self.category)
            .field("ticks", &self.next_tick)
            .field("goals", &self.list())
            .finish()
    }
}
