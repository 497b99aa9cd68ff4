//! Command implementations for xtask
//!
//! Each command is a separate module that implements its own CLI args and execution logic.

mod catalog;
mod simulate;

pub use catalog::Catalog;
pub use simulate::Simulate;

/// Output format shared by commands.
#[derive(Clone, Copy, clap::ValueEnum)]
pub enum OutputFormat {
    /// Human-readable colored text
    Text,
    /// Pretty-printed JSON
    Json,
}
