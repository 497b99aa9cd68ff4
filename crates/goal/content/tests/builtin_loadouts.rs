use std::collections::HashSet;
use std::sync::Arc;

use goal_content::{LoadoutLoader, builtin_catalog};
use goal_core::{
    Controls, ControlledActor, ExecutorCategory, Goal, GoalCategory, GoalContext, GoalExecutor,
    GoalResult, GoalType, OwnerId,
};

const LOADOUTS: &str = include_str!("../data/loadouts.ron");

#[derive(Default)]
struct Body {
    /// Goal types that want to run this tick.
    wants: HashSet<&'static str>,
}

/// Stand-in implementation that claims the controls its catalog entry lists.
struct CatalogGoal {
    key: GoalCategory,
    controls: Controls,
}

impl Goal<Body> for CatalogGoal {
    fn should_start(&self, body: &Body) -> GoalResult<bool> {
        Ok(body.wants.contains(self.key.as_str()))
    }

    fn update(&mut self, _ctx: &mut GoalContext<'_, Body>) -> GoalResult<()> {
        Ok(())
    }

    fn controls(&self) -> Controls {
        self.controls
    }
}

fn factory(goal_type: &GoalType) -> Option<Box<dyn Goal<Body>>> {
    Some(Box::new(CatalogGoal {
        key: goal_type.category.clone(),
        controls: goal_type.controls,
    }))
}

fn active_categories(executor: &GoalExecutor<Body>) -> Vec<String> {
    executor
        .list()
        .into_iter()
        .filter(|g| g.state.is_active())
        .map(|g| g.category.to_string())
        .collect()
}

#[test]
fn sample_loadouts_apply_to_the_builtin_catalog() {
    let catalog = builtin_catalog().unwrap();
    let table = LoadoutLoader::parse(LOADOUTS).unwrap();
    LoadoutLoader::validate(&table, &catalog).unwrap();

    for (kind, loadout) in &table {
        let mut actor = ControlledActor::new(OwnerId(1), Body::default())
            .with_catalog(Arc::new(catalog.clone()));
        let ids = loadout.apply(&mut actor, &catalog, &factory).unwrap();
        assert_eq!(ids.len(), loadout.len(), "{kind}");
    }
}

#[test]
fn zombie_targets_then_chases() {
    let catalog = builtin_catalog().unwrap();
    let table = LoadoutLoader::parse(LOADOUTS).unwrap();
    let mut actor = ControlledActor::new(OwnerId(9), Body::default())
        .with_catalog(Arc::new(catalog.clone()));
    table["zombie"].apply(&mut actor, &catalog, &factory).unwrap();

    actor.body_mut().wants.extend(["wander", "look_idle", "watch_closest"]);
    let report = actor.tick();
    assert!(report.is_healthy());

    // wander (MOVE) and watch_closest (LOOK) fit together; look_idle claims both.
    let normal = actor.executor(ExecutorCategory::Normal).unwrap();
    assert_eq!(active_categories(normal), vec!["wander", "watch_closest"]);

    // A target shows up: revenge is picked by the target executor and the
    // melee attack displaces wandering.
    actor.body_mut().wants.extend(["revenge", "attack_living"]);
    let report = actor.tick();
    assert!(report.is_healthy());

    let target = actor.executor(ExecutorCategory::Target).unwrap();
    assert_eq!(active_categories(target), vec!["revenge"]);

    let normal = actor.executor(ExecutorCategory::Normal).unwrap();
    assert_eq!(active_categories(normal), vec!["attack_living"]);
    let interrupted = report
        .report(ExecutorCategory::Normal)
        .unwrap()
        .interrupted()
        .count();
    assert_eq!(interrupted, 2);
}
