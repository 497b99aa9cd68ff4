//! Content factory for loading goal content from a data directory.

use std::path::{Path, PathBuf};

use goal_core::{ExecutorConfig, GoalCatalog};
use tracing::debug;

use crate::loaders::loadout::LoadoutTable;
use crate::loaders::{CatalogLoader, ConfigLoader, LoadResult, LoadoutLoader, builtin_catalog};

/// Content factory that loads goal content from a data directory.
///
/// # Directory Structure
///
/// ```text
/// data_dir/
/// ├── goal_types.ron   (optional, builtin catalog otherwise)
/// ├── executor.toml    (optional, default config otherwise)
/// └── loadouts.ron
/// ```
pub struct ContentFactory {
    data_dir: PathBuf,
}

impl ContentFactory {
    /// Creates a new content factory pointing to a data directory.
    pub fn new(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            data_dir: data_dir.into(),
        }
    }

    /// Load the goal catalog from `goal_types.ron`, falling back to the
    /// builtin catalog when the file does not exist.
    pub fn load_catalog(&self) -> LoadResult<GoalCatalog> {
        let path = self.data_dir.join("goal_types.ron");
        if path.exists() {
            CatalogLoader::load(&path)
        } else {
            debug!(
                target: "goal_content::loaders",
                path = %path.display(),
                "No catalog file, using builtin catalog"
            );
            builtin_catalog()
        }
    }

    /// Load executor configuration from `executor.toml`, falling back to
    /// defaults when the file does not exist.
    pub fn load_config(&self) -> LoadResult<ExecutorConfig> {
        let path = self.data_dir.join("executor.toml");
        if path.exists() {
            ConfigLoader::load(&path)
        } else {
            Ok(ExecutorConfig::default())
        }
    }

    /// Load loadouts from `loadouts.ron` and check them against `catalog`.
    pub fn load_loadouts(&self, catalog: &GoalCatalog) -> LoadResult<LoadoutTable> {
        let path = self.data_dir.join("loadouts.ron");
        let table = LoadoutLoader::load(&path)?;
        LoadoutLoader::validate(&table, catalog)?;
        Ok(table)
    }

    /// Returns the data directory path.
    pub fn data_dir(&self) -> &Path {
        &self.data_dir
    }
}

#[cfg(test)]
mod tests {
    use std::fs;

    use goal_core::ConcurrencyPolicy;

    use super::*;
    use crate::types;

    #[test]
    fn missing_optional_files_fall_back_to_defaults() {
        let dir = tempfile::tempdir().unwrap();
        let factory = ContentFactory::new(dir.path());

        let catalog = factory.load_catalog().unwrap();
        assert!(catalog.contains(&types::WANDER));
        assert_eq!(factory.load_config().unwrap(), ExecutorConfig::default());
        assert!(factory.load_loadouts(&catalog).is_err());
    }

    #[test]
    fn loads_every_file_from_the_data_dir() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("goal_types.ron"),
            r#"[(category: "graze", controls: "MOVE", default_priority: Some(4))]"#,
        )
        .unwrap();
        fs::write(
            dir.path().join("executor.toml"),
            "[executor]\nconcurrency = \"symmetric\"\n",
        )
        .unwrap();
        fs::write(
            dir.path().join("loadouts.ron"),
            r#"{"sheep": [(goal_type: "graze")]}"#,
        )
        .unwrap();

        let factory = ContentFactory::new(dir.path());
        let catalog = factory.load_catalog().unwrap();
        assert_eq!(catalog.len(), 1);
        assert_eq!(
            factory.load_config().unwrap().concurrency,
            ConcurrencyPolicy::Symmetric
        );
        assert_eq!(factory.load_loadouts(&catalog).unwrap()["sheep"].len(), 1);
    }

    #[test]
    fn loadouts_are_checked_against_the_catalog() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(
            dir.path().join("loadouts.ron"),
            r#"{"sheep": [(goal_type: "graze", priority: Some(1))]}"#,
        )
        .unwrap();

        let factory = ContentFactory::new(dir.path());
        let catalog = factory.load_catalog().unwrap();
        assert!(factory.load_loadouts(&catalog).is_err());
    }
}
