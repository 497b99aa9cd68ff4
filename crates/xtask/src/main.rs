//! Development tasks for the goal scheduler
//!
//! This binary provides development utilities using the cargo-xtask pattern.
//! Run with: `cargo xtask <command>`

mod commands;
mod scenario;

use anyhow::Result;
use clap::Parser;
use commands::{Catalog, Simulate};
use tracing_subscriber::EnvFilter;

/// Development tasks for the goal scheduler
#[derive(Parser)]
#[command(name = "xtask")]
#[command(about = "Development tools for goal-core", long_about = None)]
#[command(version)]
struct Cli {
    #[command(subcommand)]
    command: Command,
}

#[derive(Parser)]
enum Command {
    /// List goal types of the builtin catalog or a catalog file
    Catalog(Catalog),

    /// Run a scripted scenario and print the per-tick timeline
    Simulate(Simulate),
}

fn main() -> Result<()> {
    tracing_subscriber::fmt()
        .with_env_filter(log_filter(std::env::var(EnvFilter::DEFAULT_ENV).ok().as_deref()))
        .with_writer(std::io::stderr)
        .init();

    let cli = Cli::parse();

    match cli.command {
        Command::Catalog(cmd) => cmd.execute(),
        Command::Simulate(cmd) => cmd.execute(),
    }
}

/// `RUST_LOG` directives if set and valid, warnings and above otherwise.
fn log_filter(directives: Option<&str>) -> EnvFilter {
    directives
        .and_then(|d| EnvFilter::try_new(d).ok())
        .unwrap_or_else(|| EnvFilter::new("warn"))
}

#[cfg(test)]
mod tests {
    use tracing::level_filters::LevelFilter;

    use super::*;

    #[test]
    fn rust_log_level_is_honored() {
        assert_eq!(log_filter(Some("debug")).max_level_hint(), Some(LevelFilter::DEBUG));
        assert_eq!(
            log_filter(Some("goal_core=trace")).max_level_hint(),
            Some(LevelFilter::TRACE)
        );
    }

    #[test]
    fn missing_or_invalid_rust_log_falls_back_to_warn() {
        assert_eq!(log_filter(None).max_level_hint(), Some(LevelFilter::WARN));
        assert_eq!(log_filter(Some("goal_core=loud")).max_level_hint(), Some(LevelFilter::WARN));
    }
}
