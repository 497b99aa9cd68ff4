//! Executor configuration loader.

use std::path::Path;

use goal_core::ExecutorConfig;
use serde::Deserialize;

use crate::loaders::{LoadResult, read_file};

#[derive(Debug, Default, Deserialize)]
#[serde(default, deny_unknown_fields)]
struct ConfigFile {
    executor: ExecutorConfig,
}

/// Loader for executor configuration from TOML files.
///
/// ```toml
/// [executor]
/// concurrency = "symmetric"
/// max_goals = 32
/// max_commands_per_call = 16
/// ```
///
/// Missing keys keep their defaults.
pub struct ConfigLoader;

impl ConfigLoader {
    /// Load config data from a TOML file.
    pub fn load(path: &Path) -> LoadResult<ExecutorConfig> {
        let content = read_file(path)?;
        Self::parse(&content)
    }

    /// Parse config data from TOML source.
    pub fn parse(source: &str) -> LoadResult<ExecutorConfig> {
        let file: ConfigFile = toml::from_str(source)
            .map_err(|e| anyhow::anyhow!("Failed to parse config TOML: {}", e))?;

        if file.executor.max_goals == 0 {
            anyhow::bail!("executor.max_goals must be at least 1");
        }

        Ok(file.executor)
    }
}

#[cfg(test)]
mod tests {
    use goal_core::ConcurrencyPolicy;

    use super::*;

    #[test]
    fn partial_config_keeps_defaults() {
        let config = ConfigLoader::parse("[executor]\nconcurrency = \"symmetric\"\n").unwrap();

        assert_eq!(config.concurrency, ConcurrencyPolicy::Symmetric);
        assert_eq!(config.max_goals, ExecutorConfig::DEFAULT_MAX_GOALS);
        assert_eq!(
            config.max_commands_per_call,
            ExecutorConfig::DEFAULT_MAX_COMMANDS_PER_CALL
        );
    }

    #[test]
    fn empty_file_is_default_config() {
        assert_eq!(ConfigLoader::parse("").unwrap(), ExecutorConfig::default());
    }

    #[test]
    fn invalid_values_are_rejected() {
        assert!(ConfigLoader::parse("[executor]\nmax_goals = 0\n").is_err());
        assert!(ConfigLoader::parse("[executor]\nconcurrency = \"both\"\n").is_err());
        assert!(ConfigLoader::parse("[scheduler]\nmax_goals = 3\n").is_err());
    }
}
