//! Explicit catalog of goal types.
//!
//! A catalog maps stable category keys to metadata. It is built once at
//! startup (in code or from a data file) and shared by reference; executors
//! that are given one refuse goals whose category it does not list.

use std::collections::BTreeMap;

use crate::category::{ExecutorCategory, GoalCategory};
use crate::controls::Controls;
use crate::error::{CatalogError, ExecutorError};
use crate::goal::GoalSpec;

/// Metadata describing one kind of goal.
#[derive(Clone, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct GoalType {
    pub category: GoalCategory,
    #[cfg_attr(feature = "serde", serde(default))]
    pub description: String,
    /// Executor this kind of goal is registered with.
    #[cfg_attr(feature = "serde", serde(default))]
    pub executor: ExecutorCategory,
    /// Control channels implementations of this type usually claim.
    #[cfg_attr(feature = "serde", serde(default))]
    pub controls: Controls,
    #[cfg_attr(feature = "serde", serde(default = "default_interruptible"))]
    pub interruptible: bool,
    /// Priority used when a loadout does not give one.
    #[cfg_attr(feature = "serde", serde(default))]
    pub default_priority: Option<i32>,
}

#[cfg(feature = "serde")]
fn default_interruptible() -> bool {
    true
}

impl GoalType {
    /// Creates an interruptible goal type for the normal executor.
    pub fn new(category: impl Into<GoalCategory>) -> Self {
        Self {
            category: category.into(),
            description: String::new(),
            executor: ExecutorCategory::Normal,
            controls: Controls::empty(),
            interruptible: true,
            default_priority: None,
        }
    }

    #[must_use]
    pub fn with_executor(mut self, executor: ExecutorCategory) -> Self {
        self.executor = executor;
        self
    }

    #[must_use]
    pub fn with_controls(mut self, controls: Controls) -> Self {
        self.controls = controls;
        self
    }

    #[must_use]
    pub fn with_interruptible(mut self, interruptible: bool) -> Self {
        self.interruptible = interruptible;
        self
    }

    #[must_use]
    pub fn with_default_priority(mut self, priority: i32) -> Self {
        self.default_priority = Some(priority);
        self
    }

    #[must_use]
    pub fn with_description(mut self, description: impl Into<String>) -> Self {
        self.description = description.into();
        self
    }
}

/// Mapping from goal category to [`GoalType`].
#[derive(Clone, Debug, Default, PartialEq, Eq)]
pub struct GoalCatalog {
    types: BTreeMap<GoalCategory, GoalType>,
}

impl GoalCatalog {
    pub fn new() -> Self {
        Self::default()
    }

    /// Builds a catalog, rejecting duplicate categories.
    pub fn from_types(types: impl IntoIterator<Item = GoalType>) -> Result<Self, CatalogError> {
        let mut catalog = Self::new();
        for goal_type in types {
            catalog.register(goal_type)?;
        }
        Ok(catalog)
    }

    /// Adds a goal type.
    pub fn register(&mut self, goal_type: GoalType) -> Result<(), CatalogError> {
        if self.types.contains_key(&goal_type.category) {
            return Err(CatalogError::Duplicate(goal_type.category));
        }
        self.types.insert(goal_type.category.clone(), goal_type);
        Ok(())
    }

    pub fn get(&self, category: &GoalCategory) -> Option<&GoalType> {
        self.types.get(category)
    }

    pub fn contains(&self, category: &GoalCategory) -> bool {
        self.types.contains_key(category)
    }

    /// Iterates goal types ordered by category key.
    pub fn iter(&self) -> impl Iterator<Item = &GoalType> + '_ {
        self.types.values()
    }

    /// Iterates the goal types that belong to one executor category.
    pub fn for_executor(&self, executor: ExecutorCategory) -> impl Iterator<Item = &GoalType> + '_ {
        self.types.values().filter(move |t| t.executor == executor)
    }

    pub fn len(&self) -> usize {
        self.types.len()
    }

    pub fn is_empty(&self) -> bool {
        self.types.is_empty()
    }

    /// Checks that `spec` may be registered with an executor of `executor`.
    pub fn validate(
        &self,
        spec: &GoalSpec,
        executor: ExecutorCategory,
    ) -> Result<(), ExecutorError> {
        let goal_type = self
            .get(&spec.category)
            .ok_or_else(|| ExecutorError::UnknownCategory {
                category: spec.category.clone(),
            })?;

        if goal_type.executor != executor {
            return Err(ExecutorError::WrongExecutor {
                category: spec.category.clone(),
                expected: goal_type.executor,
                actual: executor,
            });
        }

        Ok(())
    }
}
