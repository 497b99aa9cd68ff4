//! Behavior assignments: which goals an actor gets, at what priority.

use crate::agent::ControlledActor;
use crate::catalog::{GoalCatalog, GoalType};
use crate::category::{ExecutorCategory, GoalCategory};
use crate::error::LoadoutError;
use crate::goal::{Goal, GoalSpec};
use crate::state::GoalId;

/// Creates goal instances for catalog entries.
///
/// Implemented for any `Fn(&GoalType) -> Option<Box<dyn Goal<A>>>`.
pub trait GoalFactory<A> {
    /// Returns `None` if this factory has no implementation for `goal_type`.
    fn create(&self, goal_type: &GoalType) -> Option<Box<dyn Goal<A>>>;
}

impl<A, F> GoalFactory<A> for F
where
    F: Fn(&GoalType) -> Option<Box<dyn Goal<A>>>,
{
    fn create(&self, goal_type: &GoalType) -> Option<Box<dyn Goal<A>>> {
        self(goal_type)
    }
}

/// One goal assignment.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct LoadoutEntry {
    pub goal_type: GoalCategory,
    /// Overrides the catalog's default priority.
    #[cfg_attr(feature = "serde", serde(default))]
    pub priority: Option<i32>,
    /// Overrides the catalog's interruptibility.
    #[cfg_attr(feature = "serde", serde(default))]
    pub interruptible: Option<bool>,
}

impl LoadoutEntry {
    pub fn new(goal_type: impl Into<GoalCategory>) -> Self {
        Self {
            goal_type: goal_type.into(),
            priority: None,
            interruptible: None,
        }
    }

    #[must_use]
    pub fn with_priority(mut self, priority: i32) -> Self {
        self.priority = Some(priority);
        self
    }

    #[must_use]
    pub fn with_interruptible(mut self, interruptible: bool) -> Self {
        self.interruptible = Some(interruptible);
        self
    }
}

/// An ordered list of goal assignments, applied to an actor as a unit.
#[derive(Clone, Debug, Default, PartialEq, Eq)]
#[cfg_attr(
    feature = "serde",
    derive(serde::Serialize, serde::Deserialize),
    serde(transparent)
)]
pub struct Loadout {
    pub entries: Vec<LoadoutEntry>,
}

impl Loadout {
    pub fn new() -> Self {
        Self::default()
    }

    #[must_use]
    pub fn with(mut self, entry: LoadoutEntry) -> Self {
        self.entries.push(entry);
        self
    }

    pub fn len(&self) -> usize {
        self.entries.len()
    }

    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Registers every entry with the matching executor of `actor`.
    ///
    /// All entries are resolved before anything is registered. If a
    /// registration is refused, goals already registered by this call are
    /// removed again.
    pub fn apply<A>(
        &self,
        actor: &mut ControlledActor<A>,
        catalog: &GoalCatalog,
        factory: &dyn GoalFactory<A>,
    ) -> Result<Vec<GoalId>, LoadoutError> {
        let resolved = self.resolve(catalog, factory)?;

        let mut added: Vec<(ExecutorCategory, GoalId)> = Vec::with_capacity(resolved.len());
        for (executor, spec, goal) in resolved {
            match actor.add_boxed(executor, spec, goal) {
                Ok(id) => added.push((executor, id)),
                Err(err) => {
                    for (executor, id) in added {
                        actor.remove(executor, id);
                    }
                    return Err(err.into());
                }
            }
        }

        Ok(added.into_iter().map(|(_, id)| id).collect())
    }

    fn resolve<A>(
        &self,
        catalog: &GoalCatalog,
        factory: &dyn GoalFactory<A>,
    ) -> Result<Vec<(ExecutorCategory, GoalSpec, Box<dyn Goal<A>>)>, LoadoutError> {
        self.entries
            .iter()
            .map(|entry| {
                let goal_type = catalog
                    .get(&entry.goal_type)
                    .ok_or_else(|| LoadoutError::UnknownGoalType(entry.goal_type.clone()))?;

                let priority = entry
                    .priority
                    .or(goal_type.default_priority)
                    .ok_or_else(|| LoadoutError::MissingPriority(entry.goal_type.clone()))?;

                let goal = factory
                    .create(goal_type)
                    .ok_or_else(|| LoadoutError::NoImplementation(entry.goal_type.clone()))?;

                let mut spec = GoalSpec::from_type(goal_type, priority);
                if let Some(interruptible) = entry.interruptible {
                    spec.interruptible = interruptible;
                }

                Ok((goal_type.executor, spec, goal))
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::Arc;

    use super::*;
    use crate::category::OwnerId;
    use crate::config::ExecutorConfig;
    use crate::controls::Controls;
    use crate::error::{ExecutorError, GoalResult};
    use crate::goal::GoalContext;

    struct Idle;

    impl Goal<()> for Idle {
        fn should_start(&self, _actor: &()) -> GoalResult<bool> {
            Ok(false)
        }

        fn update(&mut self, _ctx: &mut GoalContext<'_, ()>) -> GoalResult<()> {
            Ok(())
        }
    }

    fn catalog() -> GoalCatalog {
        GoalCatalog::from_types([
            GoalType::new("swimming").with_default_priority(0),
            GoalType::new("wander").with_controls(Controls::MOVE),
            GoalType::new("revenge")
                .with_executor(ExecutorCategory::Target)
                .with_default_priority(1),
            GoalType::new("sit").with_interruptible(false).with_default_priority(2),
        ])
        .unwrap()
    }

    fn factory(_goal_type: &GoalType) -> Option<Box<dyn Goal<()>>> {
        Some(Box::new(Idle))
    }

    #[test]
    fn apply_routes_goals_to_their_executor() {
        let catalog = catalog();
        let mut actor =
            ControlledActor::new(OwnerId(1), ()).with_catalog(Arc::new(catalog.clone()));
        let loadout = Loadout::new()
            .with(LoadoutEntry::new("swimming"))
            .with(LoadoutEntry::new("wander").with_priority(5))
            .with(LoadoutEntry::new("revenge"))
            .with(LoadoutEntry::new("sit"));

        let ids = loadout.apply(&mut actor, &catalog, &factory).unwrap();
        assert_eq!(ids.len(), 4);

        let normal = actor.executor(ExecutorCategory::Normal).unwrap().list();
        let priorities: Vec<_> = normal.iter().map(|g| (g.category.as_str(), g.priority)).collect();
        assert_eq!(priorities, vec![("swimming", 0), ("sit", 2), ("wander", 5)]);
        assert!(!normal[1].interruptible);

        assert_eq!(actor.executor(ExecutorCategory::Target).unwrap().len(), 1);
    }

    #[test]
    fn missing_priority_registers_nothing() {
        let catalog = catalog();
        let mut actor = ControlledActor::new(OwnerId(1), ());
        let loadout = Loadout::new()
            .with(LoadoutEntry::new("swimming"))
            .with(LoadoutEntry::new("wander"));

        let err = loadout.apply(&mut actor, &catalog, &factory).unwrap_err();
        assert_eq!(err, LoadoutError::MissingPriority(GoalCategory::from_static("wander")));
        assert!(actor.executor(ExecutorCategory::Normal).is_none());
    }

    #[test]
    fn unknown_type_and_missing_implementation_are_reported() {
        let catalog = catalog();
        let mut actor = ControlledActor::new(OwnerId(1), ());

        let err = Loadout::new()
            .with(LoadoutEntry::new("fly").with_priority(1))
            .apply(&mut actor, &catalog, &factory)
            .unwrap_err();
        assert!(matches!(err, LoadoutError::UnknownGoalType(_)));

        let none = |_: &GoalType| -> Option<Box<dyn Goal<()>>> { None };
        let err = Loadout::new()
            .with(LoadoutEntry::new("swimming"))
            .apply(&mut actor, &catalog, &none)
            .unwrap_err();
        assert!(matches!(err, LoadoutError::NoImplementation(_)));
    }

    #[test]
    fn refused_registration_rolls_back() {
        let catalog = catalog();
        let mut actor = ControlledActor::new(OwnerId(1), ())
            .with_config(ExecutorConfig::new().with_max_goals(1));
        let loadout = Loadout::new()
            .with(LoadoutEntry::new("swimming"))
            .with(LoadoutEntry::new("sit"));

        let err = loadout.apply(&mut actor, &catalog, &factory).unwrap_err();
        assert!(matches!(
            err,
            LoadoutError::Executor(ExecutorError::CapacityExceeded { .. })
        ));
        assert!(actor.executor(ExecutorCategory::Normal).unwrap().is_empty());
    }
}
