//! Loadout loader.

use std::collections::BTreeMap;
use std::path::Path;

use anyhow::Context;
use goal_core::{GoalCatalog, Loadout};
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

/// Loadouts keyed by actor kind.
pub type LoadoutTable = BTreeMap<String, Loadout>;

/// Loader for behavior loadouts from RON files.
///
/// ```ron
/// {
///     "zombie": [
///         (goal_type: "swimming"),
///         (goal_type: "attack_living", priority: Some(2)),
///         (goal_type: "wander", priority: Some(7)),
///     ],
/// }
/// ```
pub struct LoadoutLoader;

impl LoadoutLoader {
    /// Load loadouts from a RON file.
    pub fn load(path: &Path) -> LoadResult<LoadoutTable> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("Invalid loadouts {}", path.display()))
    }

    /// Parse loadouts from RON source.
    pub fn parse(source: &str) -> LoadResult<LoadoutTable> {
        let table: LoadoutTable = ron::from_str(source)
            .map_err(|e| anyhow::anyhow!("Failed to parse loadouts RON: {}", e))?;

        debug!(
            target: "goal_content::loaders",
            kinds = table.len(),
            "Loaded loadouts"
        );
        Ok(table)
    }

    /// Checks that every entry names a catalog type and resolves a priority.
    pub fn validate(table: &LoadoutTable, catalog: &GoalCatalog) -> LoadResult<()> {
        for (kind, loadout) in table {
            for entry in &loadout.entries {
                let goal_type = catalog.get(&entry.goal_type).with_context(|| {
                    format!("loadout `{kind}`: unknown goal type `{}`", entry.goal_type)
                })?;

                if entry.priority.or(goal_type.default_priority).is_none() {
                    anyhow::bail!(
                        "loadout `{kind}`: goal type `{}` needs a priority",
                        entry.goal_type
                    );
                }
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use goal_core::{GoalCategory, GoalType};

    use super::*;

    const SOURCE: &str = r#"{
        "zombie": [
            (goal_type: "swimming"),
            (goal_type: "wander", priority: Some(7)),
        ],
        "sheep": [
            (goal_type: "wander", priority: Some(6), interruptible: Some(false)),
        ],
    }"#;

    fn catalog() -> GoalCatalog {
        GoalCatalog::from_types([
            GoalType::new("swimming").with_default_priority(0),
            GoalType::new("wander"),
        ])
        .unwrap()
    }

    #[test]
    fn parse_keys_loadouts_by_kind() {
        let table = LoadoutLoader::parse(SOURCE).unwrap();

        assert_eq!(table.keys().collect::<Vec<_>>(), vec!["sheep", "zombie"]);
        let zombie = &table["zombie"];
        assert_eq!(zombie.len(), 2);
        assert_eq!(zombie.entries[0].goal_type, GoalCategory::from_static("swimming"));
        assert_eq!(zombie.entries[0].priority, None);
        assert_eq!(table["sheep"].entries[0].interruptible, Some(false));

        LoadoutLoader::validate(&table, &catalog()).unwrap();
    }

    #[test]
    fn validate_reports_the_offending_kind() {
        let table = LoadoutLoader::parse(r#"{"cow": [(goal_type: "wander")]}"#).unwrap();
        let err = LoadoutLoader::validate(&table, &catalog()).unwrap_err();
        assert!(err.to_string().contains("`cow`"), "{err}");

        let table = LoadoutLoader::parse(r#"{"cow": [(goal_type: "fly", priority: Some(1))]}"#)
            .unwrap();
        let err = LoadoutLoader::validate(&table, &catalog()).unwrap_err();
        assert!(err.to_string().contains("fly"), "{err}");
    }
}
