//! CLI module for combo-batch
//!
//! This module handles command-line argument parsing and command execution.

use std::path::PathBuf;

use clap::{Parser, Subcommand};

pub mod args;
pub mod commands;

/// combo-batch
///
/// Renders every hook/body/cta combination of up to three clips per slot,
/// using a lossless stream copy where possible and re-encoding otherwise.
#[derive(Parser, Debug)]
#[command(name = "combo-batch")]
#[command(about = "Batch-render every hook/body/cta clip combination")]
#[command(version)]
#[command(long_about = None)]
pub struct Cli {
    /// Logging level (trace, debug, info, warn, error)
    #[arg(long, global = true)]
    pub log_level: Option<String>,

    /// Configuration file (defaults to ./combo-batch.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// The command to execute
    #[command(subcommand)]
    pub command: Commands,
}

/// Available commands
#[derive(Subcommand, Debug)]
pub enum Commands {
    /// Render all combinations and write the results
    Generate(args::GenerateArgs),
    /// List the combinations that would be rendered, in order
    Plan(args::PlanArgs),
}
