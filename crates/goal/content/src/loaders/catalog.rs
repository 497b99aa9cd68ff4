//! Goal type catalog loader.

use std::path::Path;

use anyhow::Context;
use goal_core::{GoalCatalog, GoalType};
use tracing::debug;

use crate::loaders::{LoadResult, read_file};

const BUILTIN: &str = include_str!("../../data/goal_types.ron");

/// Loader for goal type catalogs from RON files.
///
/// A catalog file is a list of [`GoalType`] records:
///
/// ```ron
/// [
///     (category: "wander", executor: normal, controls: "MOVE", default_priority: Some(5)),
///     (category: "revenge", executor: target, controls: "TARGET"),
/// ]
/// ```
pub struct CatalogLoader;

impl CatalogLoader {
    /// Load a catalog from a RON file.
    pub fn load(path: &Path) -> LoadResult<GoalCatalog> {
        let content = read_file(path)?;
        Self::parse(&content).with_context(|| format!("Invalid catalog {}", path.display()))
    }

    /// Parse a catalog from RON source. Duplicate categories are rejected.
    pub fn parse(source: &str) -> LoadResult<GoalCatalog> {
        let types: Vec<GoalType> = ron::from_str(source)
            .map_err(|e| anyhow::anyhow!("Failed to parse catalog RON: {}", e))?;
        let catalog = GoalCatalog::from_types(types)?;

        debug!(
            target: "goal_content::loaders",
            types = catalog.len(),
            "Loaded goal catalog"
        );
        Ok(catalog)
    }
}

/// Parses the catalog embedded in this crate.
///
/// It lists every key in [`crate::types`].
pub fn builtin_catalog() -> LoadResult<GoalCatalog> {
    CatalogLoader::parse(BUILTIN).context("Builtin goal catalog is invalid")
}
