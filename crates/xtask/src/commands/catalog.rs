//! List goal types from the builtin catalog or a catalog file

use std::path::PathBuf;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;

use goal_content::{CatalogLoader, builtin_catalog};
use goal_core::{ExecutorCategory, GoalType};

use super::OutputFormat;

/// List goal types
#[derive(Parser)]
pub struct Catalog {
    /// Catalog file (RON); defaults to the builtin catalog
    #[arg(long, value_name = "FILE")]
    file: Option<PathBuf>,

    /// Only show goal types of one executor category (normal, target)
    #[arg(short, long, value_name = "CATEGORY")]
    executor: Option<ExecutorCategory>,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl Catalog {
    pub fn execute(self) -> Result<()> {
        let catalog = match &self.file {
            Some(path) => CatalogLoader::load(path)?,
            None => builtin_catalog()?,
        };

        let types: Vec<&GoalType> = match self.executor {
            Some(executor) => catalog.for_executor(executor).collect(),
            None => catalog.iter().collect(),
        };

        match self.format {
            OutputFormat::Text => print_text(&types, self.file.is_none()),
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&types)
                    .context("Failed to serialize catalog to JSON")?;
                println!("{}", json);
            }
        }

        Ok(())
    }
}

fn print_text(types: &[&GoalType], builtin: bool) {
    let source = if builtin { "builtin" } else { "file" };
    println!(
        "{} {} goal types ({})",
        style("Catalog:").bold().cyan(),
        types.len(),
        source
    );
    println!();

    for goal_type in types {
        let executor = match goal_type.executor {
            ExecutorCategory::Target => style(goal_type.executor.to_string()).magenta(),
            ExecutorCategory::Normal => style(goal_type.executor.to_string()).green(),
        };
        let priority = goal_type
            .default_priority
            .map_or_else(|| "-".to_string(), |p| p.to_string());
        let lock = if goal_type.interruptible { "" } else { " [uninterruptible]" };

        println!(
            "  {:<36} {:<7} prio {:>2}  {}{}",
            style(goal_type.category.as_str()).bold(),
            executor,
            priority,
            goal_type.controls,
            style(lock).yellow()
        );
        if !goal_type.description.is_empty() {
            println!("  {}", style(&goal_type.description).dim());
        }
    }
}
