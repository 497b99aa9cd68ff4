//! Actors driven by one executor per [`ExecutorCategory`].

use std::collections::BTreeMap;
use std::fmt;
use std::sync::Arc;

use tracing::error;

use crate::catalog::GoalCatalog;
use crate::category::{ExecutorCategory, OwnerId};
use crate::config::ExecutorConfig;
use crate::error::ExecutorError;
use crate::executor::GoalExecutor;
use crate::goal::{Goal, GoalSpec};
use crate::report::TickReport;
use crate::state::GoalId;

/// An actor body together with the goal executors that drive it.
///
/// Executors are created on first use and ticked in [`ExecutorCategory`]
/// order, so target selection runs before the normal goals that act on it.
pub struct ControlledActor<A> {
    id: OwnerId,
    body: A,
    executors: BTreeMap<ExecutorCategory, GoalExecutor<A>>,
    config: ExecutorConfig,
    catalog: Option<Arc<GoalCatalog>>,
}

impl<A> ControlledActor<A> {
    pub fn new(id: OwnerId, body: A) -> Self {
        Self {
            id,
            body,
            executors: BTreeMap::new(),
            config: ExecutorConfig::default(),
            catalog: None,
        }
    }

    /// Configuration for executors created from now on.
    #[must_use]
    pub fn with_config(mut self, config: ExecutorConfig) -> Self {
        self.config = config;
        self
    }

    /// Catalog attached to executors created from now on.
    #[must_use]
    pub fn with_catalog(mut self, catalog: Arc<GoalCatalog>) -> Self {
        self.catalog = Some(catalog);
        self
    }

    pub fn id(&self) -> OwnerId {
        self.id
    }

    pub fn body(&self) -> &A {
        &self.body
    }

    pub fn body_mut(&mut self) -> &mut A {
        &mut self.body
    }

    pub fn into_body(self) -> A {
        self.body
    }

    pub fn catalog(&self) -> Option<&GoalCatalog> {
        self.catalog.as_deref()
    }

    /// Returns the executor of `category` if it has been created.
    pub fn executor(&self, category: ExecutorCategory) -> Option<&GoalExecutor<A>> {
        self.executors.get(&category)
    }

    /// Returns the executor of `category`, creating it if needed.
    pub fn executor_mut(&mut self, category: ExecutorCategory) -> &mut GoalExecutor<A> {
        self.with_executor(category, |executor, _| executor)
    }

    /// Runs `f` with an executor and the body it drives, for operations such
    /// as `remove` that need both. Creates the executor if needed.
    pub fn with_executor<'s, R>(
        &'s mut self,
        category: ExecutorCategory,
        f: impl FnOnce(&'s mut GoalExecutor<A>, &'s mut A) -> R,
    ) -> R {
        let Self {
            id,
            body,
            executors,
            config,
            catalog,
        } = self;

        let executor = executors.entry(category).or_insert_with(|| {
            let executor = GoalExecutor::new(*id, category).with_config(config.clone());
            match catalog {
                Some(catalog) => executor.with_catalog(Arc::clone(catalog)),
                None => executor,
            }
        });
        f(executor, body)
    }

    pub fn add<G>(
        &mut self,
        category: ExecutorCategory,
        spec: GoalSpec,
        goal: G,
    ) -> Result<GoalId, ExecutorError>
    where
        G: Goal<A> + 'static,
    {
        self.executor_mut(category).add(spec, goal)
    }

    pub fn add_boxed(
        &mut self,
        category: ExecutorCategory,
        spec: GoalSpec,
        goal: Box<dyn Goal<A>>,
    ) -> Result<GoalId, ExecutorError> {
        self.executor_mut(category).add_boxed(spec, goal)
    }

    pub fn remove(&mut self, category: ExecutorCategory, id: GoalId) -> bool {
        let Self {
            executors, body, ..
        } = self;
        executors
            .get_mut(&category)
            .is_some_and(|executor| executor.remove(body, id))
    }

    /// Ticks every executor once.
    ///
    /// A corrupted executor is reported in the result and does not stop the
    /// remaining executors from ticking.
    pub fn tick(&mut self) -> ActorTickReport {
        let mut report = ActorTickReport {
            owner: self.id,
            reports: Vec::with_capacity(self.executors.len()),
            failures: Vec::new(),
        };

        for (category, executor) in &mut self.executors {
            match executor.tick(&mut self.body) {
                Ok(tick) => report.reports.push(tick),
                Err(err) => {
                    error!(
                        target: "goal_core::agent",
                        owner = %self.id,
                        executor = %category,
                        error = %err,
                        "Executor tick failed"
                    );
                    report.failures.push(err);
                }
            }
        }

        report
    }
}

impl<A> fmt::Debug for ControlledActor<A> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("ControlledActor")
            .field("id", &self.id)
            .field("executors", &self.executors)
            .finish_non_exhaustive()
    }
}

/// Result of [`ControlledActor::tick`].
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize))]
pub struct ActorTickReport {
    pub owner: OwnerId,
    /// One report per executor that ticked cleanly, in tick order.
    pub reports: Vec<TickReport>,
    #[cfg_attr(feature = "serde", serde(skip))]
    pub failures: Vec<ExecutorError>,
}

impl ActorTickReport {
    pub fn is_healthy(&self) -> bool {
        self.failures.is_empty()
    }

    pub fn report(&self, category: ExecutorCategory) -> Option<&TickReport> {
        self.reports.iter().find(|r| r.executor == category)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::controls::Controls;
    use crate::error::GoalResult;
    use crate::goal::GoalContext;

    #[derive(Default)]
    struct Body {
        log: Vec<&'static str>,
    }

    struct Note(&'static str, Controls);

    impl Goal<Body> for Note {
        fn should_start(&self, _actor: &Body) -> GoalResult<bool> {
            Ok(true)
        }

        fn update(&mut self, ctx: &mut GoalContext<'_, Body>) -> GoalResult<()> {
            ctx.actor.log.push(self.0);
            Ok(())
        }

        fn controls(&self) -> Controls {
            self.1
        }
    }

    #[test]
    fn target_executor_ticks_before_normal() {
        let mut actor = ControlledActor::new(OwnerId(7), Body::default());
        actor
            .add(
                ExecutorCategory::Normal,
                GoalSpec::new("wander", 5),
                Note("wander", Controls::MOVE),
            )
            .unwrap();
        actor
            .add(
                ExecutorCategory::Target,
                GoalSpec::new("revenge", 1),
                Note("revenge", Controls::TARGET),
            )
            .unwrap();

        let report = actor.tick();

        assert!(report.is_healthy());
        assert_eq!(actor.body().log, vec!["revenge", "wander"]);
        assert_eq!(report.reports[0].executor, ExecutorCategory::Target);
        assert!(report.report(ExecutorCategory::Normal).is_some());
    }

    #[test]
    fn executors_are_independent() {
        let mut actor = ControlledActor::new(OwnerId(1), Body::default());
        actor
            .add(ExecutorCategory::Normal, GoalSpec::new("a", 1), Note("a", Controls::MOVE))
            .unwrap();
        // Same controls, different executor: no arbitration between them.
        actor
            .add(ExecutorCategory::Target, GoalSpec::new("b", 9), Note("b", Controls::MOVE))
            .unwrap();

        actor.tick();
        assert_eq!(actor.body().log, vec!["b", "a"]);
    }

    #[test]
    fn debug_shows_executors_without_the_body() {
        let mut actor = ControlledActor::new(OwnerId(3), Body::default());
        actor
            .add(
                ExecutorCategory::Normal,
                GoalSpec::new("wander", 5),
                Note("wander", Controls::MOVE),
            )
            .unwrap();

        let debug = format!("{actor:?}");
        assert!(debug.starts_with("ControlledActor"), "{debug}");
        assert!(debug.contains("wander"), "{debug}");
    }

    #[test]
    fn remove_through_actor_reaches_the_executor() {
        let mut actor = ControlledActor::new(OwnerId(1), Body::default());
        let id = actor
            .add(ExecutorCategory::Normal, GoalSpec::new("a", 1), Note("a", Controls::MOVE))
            .unwrap();

        assert!(actor.remove(ExecutorCategory::Normal, id));
        assert!(!actor.remove(ExecutorCategory::Normal, id));
        assert!(!actor.remove(ExecutorCategory::Target, id));
    }
}
