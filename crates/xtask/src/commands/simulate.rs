//! Run a scripted scenario and print the arbitration timeline

use std::path::PathBuf;
use std::sync::Arc;

use anyhow::{Context, Result};
use clap::Parser;
use console::style;
use tracing::debug;

use goal_content::{ConfigLoader, builtin_catalog};
use goal_core::GoalEvent;

use super::OutputFormat;
use crate::scenario::{self, Scenario, TickFrame};

/// Run a scripted scenario
#[derive(Parser)]
pub struct Simulate {
    /// Scenario file (RON)
    #[arg(value_name = "SCENARIO")]
    scenario: PathBuf,

    /// Number of ticks to run (defaults to the scenario's `ticks`)
    #[arg(short, long)]
    ticks: Option<u64>,

    /// Executor configuration (TOML); replaces the scenario's `config`
    #[arg(short, long, value_name = "FILE")]
    config: Option<PathBuf>,

    /// Only accept goal categories of the builtin catalog
    #[arg(long)]
    strict: bool,

    /// Output format
    #[arg(short, long, value_enum, default_value = "text")]
    format: OutputFormat,
}

impl Simulate {
    pub fn execute(self) -> Result<()> {
        let source = std::fs::read_to_string(&self.scenario)
            .with_context(|| format!("Failed to read scenario: {}", self.scenario.display()))?;
        let scenario = Scenario::parse(&source)
            .with_context(|| format!("Invalid scenario: {}", self.scenario.display()))?;

        let config = match &self.config {
            Some(path) => ConfigLoader::load(path)?,
            None => scenario.config.clone(),
        };
        let catalog = if self.strict {
            Some(Arc::new(builtin_catalog()?))
        } else {
            None
        };

        let ticks = self.ticks.unwrap_or(scenario.ticks);
        debug!(
            target: "xtask::simulate",
            goals = scenario.goals.len(),
            ticks,
            strict = self.strict,
            "Running scenario"
        );
        let mut actor = scenario.build(config, catalog)?;
        let frames = scenario::run(&mut actor, ticks);

        match self.format {
            OutputFormat::Text => {
                println!(
                    "{} {}",
                    style("Scenario:").bold().cyan(),
                    self.scenario.display()
                );
                println!();
                for frame in &frames {
                    print_frame(frame);
                }
                println!(
                    "{} {}",
                    style("Successful updates:").bold().cyan(),
                    actor.body().updates
                );
            }
            OutputFormat::Json => {
                let json = serde_json::to_string_pretty(&frames)
                    .context("Failed to serialize timeline to JSON")?;
                println!("{}", json);
            }
        }

        Ok(())
    }
}

fn print_frame(frame: &TickFrame) {
    println!("{}", style(format!("tick {}", frame.tick)).bold().yellow());

    for report in &frame.report.reports {
        for event in &report.events {
            let line = match event {
                GoalEvent::Started { id, category } => {
                    format!("{} {category} ({id})", style("+").green())
                }
                GoalEvent::Stopped { id, category } => {
                    format!("{} {category} ({id})", style("-").dim())
                }
                GoalEvent::Interrupted { id, category, by } => {
                    format!("{} {category} ({id}) interrupted by {by}", style("~").magenta())
                }
                GoalEvent::Faulted {
                    id,
                    category,
                    phase,
                    error,
                } => format!(
                    "{} {category} ({id}) faulted in {phase}: {error}",
                    style("!").red().bold()
                ),
                GoalEvent::Added { id, category } => {
                    format!("{} {category} ({id}) added", style("*").cyan())
                }
                GoalEvent::Removed { id, category, .. } => {
                    format!("{} {category} ({id}) removed", style("x").dim())
                }
            };
            println!("  {:<7} {}", report.executor, line);
        }
    }

    for failure in &frame.report.failures {
        println!("  {} {}", style("executor failure:").red().bold(), failure);
    }

    let active: Vec<String> = frame
        .active
        .iter()
        .map(|(executor, goals)| {
            let names: Vec<_> = goals.iter().map(|g| g.as_str()).collect();
            format!("{executor}[{}]", names.join(", "))
        })
        .collect();
    println!("  {} {}", style("active:").dim(), active.join(" "));
}
