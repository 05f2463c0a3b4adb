// Batch interactor - Orchestrates one generate run over all combinations

use std::sync::Arc;

use tracing::{debug, error, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::progress_before_item;
use crate::engine::copy::PLAYLIST_NAME;
use crate::engine::{ConcatEngine, ProgressReporter};
use crate::output::ArtifactRegistry;
use crate::planner;
use crate::ports::*;

/// Interactor driving staging, sequential rendering and result collection
pub struct BatchInteractor {
    engine: Arc<dyn EnginePort>,
    concat: ConcatEngine,
    reporter: ProgressReporter,
}

impl BatchInteractor {
    /// Create new batch interactor with injected engine port
    pub fn new(engine: Arc<dyn EnginePort>, reporter: ProgressReporter) -> Self {
        Self {
            concat: ConcatEngine::new(Arc::clone(&engine)),
            engine,
            reporter,
        }
    }

    /// Run every combination of `pools`, writing state into `run`.
    ///
    /// Preconditions are checked by the caller, and so is revoking handles of
    /// the previous run. `run` ends in `Completed` or `Errored`; artifacts
    /// produced before an error are kept.
    pub async fn execute(
        &self,
        pools: &SegmentPools,
        run: &mut BatchRun,
        registry: &mut ArtifactRegistry,
    ) -> RunState {
        let total = planner::combination_count(pools);
        *run = BatchRun::begin(total);
        self.reporter
            .log(run, format!("Generating {} video combinations...", total));
        info!("Starting batch run with {} combinations", total);

        let mut staged = Vec::new();
        if let Err(e) = self.stage(pools, &mut staged).await {
            return self.fail(run, &staged, e).await;
        }

        run.state = RunState::Processing;
        for (i, combo) in planner::enumerate(pools).enumerate() {
            let name = combo.output_name();
            run.current = i;
            run.statuses[i] = ComboStatus::Processing;
            self.reporter.update(
                run,
                progress_before_item(i, total),
                format!("Processing {} ({}/{})", name, i + 1, total),
            );

            let reporter = &self.reporter;
            let file_name = combo.output_file_name();
            let rendered = self
                .concat
                .render(&combo, |_| {
                    reporter.log(&mut *run, format!("Re-encoding {}...", file_name))
                })
                .await;

            match rendered {
                Ok(output) => {
                    let size = output.bytes.len();
                    let handle = registry.register(output.bytes);
                    run.artifacts.push(Artifact {
                        name,
                        handle,
                        size,
                        hook_name: combo.hook.clip_name.clone(),
                        body_name: combo.body.clip_name.clone(),
                        cta_name: combo.cta.clip_name.clone(),
                        tier: output.tier,
                    });
                    run.statuses[i] = ComboStatus::Succeeded;
                }
                Err(e) => {
                    run.statuses[i] = ComboStatus::Failed;
                    return self.fail(run, &staged, e).await;
                }
            }
        }

        self.reporter.log(
            run,
            format!("Done! Generated {} videos.", run.artifacts.len()),
        );
        self.reporter.update(run, 100, "");
        self.release_inputs(&staged).await;
        run.finish(RunState::Completed);
        info!(
            "Batch run completed with {} artifacts ({} bytes held)",
            run.artifacts.len(),
            registry.total_bytes()
        );
        run.state
    }

    /// Write every clip into engine storage once, recording what was written
    async fn stage(
        &self,
        pools: &SegmentPools,
        staged: &mut Vec<String>,
    ) -> Result<(), DomainError> {
        for kind in SlotKind::ALL {
            for clip in pools.slot(kind).clips() {
                let name = kind.storage_name(clip.index);
                self.engine
                    .write_buffer(&name, &clip.data)
                    .await
                    .map_err(|e| {
                        DomainError::StagingWriteFailed(format!("{} ({}): {}", name, clip.name, e))
                    })?;
                debug!("Staged {} as {}", clip.name, name);
                staged.push(name);
            }
        }
        Ok(())
    }

    async fn fail(&self, run: &mut BatchRun, staged: &[String], err: DomainError) -> RunState {
        error!("Batch run failed: {}", err);
        self.reporter
            .log(run, format!("Error during processing: {}", err));
        self.release_inputs(staged).await;
        run.finish(RunState::Errored);
        run.state
    }

    /// Delete staged clips and the playlist from engine storage
    async fn release_inputs(&self, staged: &[String]) {
        for name in staged.iter().map(String::as_str).chain([PLAYLIST_NAME]) {
            if let Err(e) = self.engine.delete_buffer(name).await {
                warn!("Failed to release {} from engine storage: {}", name, e);
            }
        }
    }
}
