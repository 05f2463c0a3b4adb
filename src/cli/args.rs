//! Command-line argument definitions

use std::path::PathBuf;

use clap::Args;

/// Clip files for the three slots
#[derive(Args, Debug, Clone)]
pub struct ClipSources {
    /// Hook clips (up to 3; extras are ignored)
    #[arg(long = "hook", required = true, num_args = 1..)]
    pub hook: Vec<PathBuf>,

    /// Body clips (up to 3; extras are ignored)
    #[arg(long = "body", required = true, num_args = 1..)]
    pub body: Vec<PathBuf>,

    /// Call-to-action clips (up to 3; extras are ignored)
    #[arg(long = "cta", required = true, num_args = 1..)]
    pub cta: Vec<PathBuf>,
}

/// Arguments for the generate command
#[derive(Args, Debug)]
pub struct GenerateArgs {
    #[command(flatten)]
    pub sources: ClipSources,

    /// Output directory (default: from config, else current directory)
    #[arg(short, long)]
    pub out: Option<PathBuf>,

    /// ffmpeg binary name or path
    #[arg(long)]
    pub ffmpeg: Option<String>,

    /// Print the run summary as JSON
    #[arg(long)]
    pub json: bool,
}

/// Arguments for the plan command
#[derive(Args, Debug)]
pub struct PlanArgs {
    #[command(flatten)]
    pub sources: ClipSources,

    /// Output in JSON format
    #[arg(long)]
    pub json: bool,
}
