//! Command implementations

use std::path::{Path, PathBuf};
use std::sync::Arc;

use anyhow::{Context, Result};
use serde::Serialize;
use tracing::{info, warn};

use crate::adapters::Settings;
use crate::app::{AppContainer, DefaultAppContainer, DownloadPlan, Session};
use crate::cli::args::{ClipSources, GenerateArgs, PlanArgs};
use crate::domain::model::*;
use crate::engine::TracingProgress;
use crate::output::writer::DownloadWriter;
use crate::planner;

/// Summary printed after a generate run
#[derive(Debug, Serialize)]
pub struct RunSummary<'a> {
    pub state: RunState,
    pub total: usize,
    pub progress: u8,
    pub artifacts: &'a [Artifact],
    pub download: &'a DownloadPlan,
    pub written: Vec<PathBuf>,
    pub log: &'a [String],
}

/// Execute the generate command
pub async fn generate(args: GenerateArgs, settings: &Settings) -> Result<RunState> {
    let container = DefaultAppContainer::new(settings)
        .map_err(|e| anyhow::anyhow!("Failed to set up engine: {}", e))?;
    let mut session = container.session(Some(Arc::new(TracingProgress)));
    if !session.load_engine().await {
        warn!(
            "ffmpeg '{}' was not found; generate will be rejected",
            settings.engine.ffmpeg_path
        );
    }

    load_into_session(&mut session, &args.sources).await?;

    let state = session
        .generate()
        .await
        .context("Generate request rejected")?;
    info!("Run finished in state {:?}", state);

    let plan = session.download_all().await;
    let written = DownloadWriter::new(&settings.output.directory)
        .write_plan(&plan, session.registry())
        .context("Failed to write results")?;

    let run = session.run();
    let summary = RunSummary {
        state: run.state,
        total: run.total,
        progress: run.progress,
        artifacts: &run.artifacts,
        download: &plan,
        written,
        log: &run.log,
    };

    if args.json {
        println!("{}", serde_json::to_string_pretty(&summary)?);
    } else {
        print_summary(&summary);
    }

    Ok(state)
}

/// Execute the plan command
pub fn plan(args: PlanArgs) -> Result<()> {
    let mut pools = SegmentPools::new();
    for (kind, paths) in slot_sources(&args.sources) {
        let clips = paths
            .iter()
            .map(|path| Clip::new(display_name(path), Vec::<u8>::new()))
            .collect();
        let accepted = pools.add_clips(kind, clips);
        warn_truncated(kind, paths.len(), accepted);
    }

    let names = planner::output_names(&pools);
    if args.json {
        println!("{}", serde_json::to_string_pretty(&names)?);
    } else {
        println!("{} combinations:", names.len());
        for (i, combo) in planner::enumerate(&pools).enumerate() {
            println!(
                "  {:>2}. {}  <- {} + {} + {}",
                i + 1,
                combo.output_name(),
                combo.hook.clip_name,
                combo.body.clip_name,
                combo.cta.clip_name
            );
        }
    }
    Ok(())
}

/// Read every clip file and place it in its slot
async fn load_into_session(session: &mut Session, sources: &ClipSources) -> Result<()> {
    for (kind, paths) in slot_sources(sources) {
        let mut clips = Vec::with_capacity(paths.len().min(MAX_CLIPS_PER_SLOT));
        for path in paths.iter().take(MAX_CLIPS_PER_SLOT) {
            let data = tokio::fs::read(path)
                .await
                .with_context(|| format!("Failed to read {} clip {}", kind, path.display()))?;
            clips.push(Clip::new(display_name(path), data));
        }

        let accepted = session.add_clips(kind, clips);
        warn_truncated(kind, paths.len(), accepted);
    }
    Ok(())
}

fn warn_truncated(kind: SlotKind, given: usize, accepted: usize) {
    if accepted < given {
        warn!(
            "{} clips given for {}, only the first {} are used",
            given, kind, accepted
        );
    }
}

fn slot_sources(sources: &ClipSources) -> [(SlotKind, &[PathBuf]); 3] {
    [
        (SlotKind::Hook, sources.hook.as_slice()),
        (SlotKind::Body, sources.body.as_slice()),
        (SlotKind::Cta, sources.cta.as_slice()),
    ]
}

fn display_name(path: &Path) -> String {
    path.file_name()
        .map(|name| name.to_string_lossy().into_owned())
        .unwrap_or_else(|| path.display().to_string())
}

fn print_summary(summary: &RunSummary<'_>) {
    for line in summary.log {
        println!("{}", line);
    }
    println!();
    println!(
        "State: {:?} ({} of {} combinations rendered)",
        summary.state,
        summary.artifacts.len(),
        summary.total
    );
    for artifact in summary.artifacts {
        println!(
            "  {}  {} + {} + {}  [{:?}, {} bytes]",
            artifact.file_name(),
            artifact.hook_name,
            artifact.body_name,
            artifact.cta_name,
            artifact.tier,
            artifact.size
        );
    }
    for path in &summary.written {
        println!("Wrote {}", path.display());
    }
}
