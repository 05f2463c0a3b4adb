//! combo-batch
//!
//! Renders every hook/body/cta combination of the given clips into finished
//! videos, stream-copying where the inputs allow it and re-encoding otherwise.
//!
//! # Usage
//!
//! ```bash
//! combo-batch generate --hook h1.mp4 h2.mp4 --body b1.mp4 --cta c1.mp4 --out renders/
//! combo-batch plan --hook h1.mp4 h2.mp4 --body b1.mp4 --cta c1.mp4
//! ```

use anyhow::Result;
use clap::Parser;
use tracing::{error, info};

use combo_batch::cli::{commands, Cli, Commands};
use combo_batch::config_initialization::initialize_settings;
use combo_batch::utils::init_logging;
use combo_batch::RunState;

/// Main entry point for the combo-batch CLI
#[tokio::main]
async fn main() -> Result<()> {
    // Parse command line arguments
    let cli = Cli::parse();

    let initialized = initialize_settings(&cli)?;
    init_logging(&initialized.settings.logging);
    initialized.log_summary();
    let settings = initialized.settings;

    info!("Starting combo-batch");

    match cli.command {
        Commands::Generate(args) => {
            info!("Executing generate command");
            let state = commands::generate(args, &settings).await?;
            if state != RunState::Completed {
                error!("Batch run ended in state {:?}", state);
                anyhow::bail!("batch run did not complete; see log above");
            }
        }
        Commands::Plan(args) => {
            info!("Executing plan command");
            commands::plan(args)?;
        }
    }

    info!("combo-batch completed successfully");
    Ok(())
}
