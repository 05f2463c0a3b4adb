//! Caller-facing surface: pools, generate, download-all and reset

use std::sync::Arc;
use std::time::Duration;

use tracing::{info, warn};

use crate::app::batch_interactor::BatchInteractor;
use crate::app::package_interactor::{DownloadPlan, PackageInteractor};
use crate::domain::errors::DomainError;
use crate::domain::model::*;
use crate::domain::rules::GenerateGuard;
use crate::engine::{ProgressCallback, ProgressReporter};
use crate::output::ArtifactRegistry;
use crate::ports::{ArchivePort, EnginePort};

/// Optional knobs for a session
#[derive(Clone, Default)]
pub struct SessionOptions {
    /// Delay between individual downloads when archiving fails
    pub stagger: Duration,
    /// Observer for progress and log lines
    pub callback: Option<Arc<dyn ProgressCallback>>,
}

/// Owns the segment pools, the latest batch run and every retrieval handle.
///
/// The artifacts visible through a session always belong to its most recent
/// run; a new run or a reset revokes the handles of the previous one first.
pub struct Session {
    engine: Arc<dyn EnginePort>,
    pools: SegmentPools,
    run: BatchRun,
    registry: ArtifactRegistry,
    batch: BatchInteractor,
    packager: PackageInteractor,
    reporter: ProgressReporter,
}

impl Session {
    pub fn new(
        engine: Arc<dyn EnginePort>,
        archive: Arc<dyn ArchivePort>,
        options: SessionOptions,
    ) -> Self {
        let reporter = match options.callback {
            Some(callback) => ProgressReporter::with_callback(callback),
            None => ProgressReporter::new(),
        };

        Self {
            batch: BatchInteractor::new(Arc::clone(&engine), reporter.clone()),
            packager: PackageInteractor::new(archive, reporter.clone(), options.stagger),
            reporter,
            engine,
            pools: SegmentPools::new(),
            run: BatchRun::new(),
            registry: ArtifactRegistry::new(),
        }
    }

    pub fn pools(&self) -> &SegmentPools {
        &self.pools
    }

    /// State of the latest run
    pub fn run(&self) -> &BatchRun {
        &self.run
    }

    pub fn artifacts(&self) -> &[Artifact] {
        &self.run.artifacts
    }

    pub fn registry(&self) -> &ArtifactRegistry {
        &self.registry
    }

    /// Append clips to a slot; anything past the third clip is dropped
    pub fn add_clips(&mut self, slot: SlotKind, clips: Vec<Clip>) -> usize {
        self.pools.add_clips(slot, clips)
    }

    /// Replace a slot's clips with a fresh selection
    pub fn replace_clips(&mut self, slot: SlotKind, clips: Vec<Clip>) -> usize {
        self.pools.replace_clips(slot, clips)
    }

    /// Remove a clip; out-of-range indices are ignored
    pub fn remove_clip(&mut self, slot: SlotKind, index: usize) -> Option<Clip> {
        self.pools.remove_clip(slot, index)
    }

    /// Report whether the engine came up, as the first line of the visible log.
    ///
    /// The line only lives until the next accepted generate resets the log.
    pub async fn load_engine(&mut self) -> bool {
        let ready = self.engine.is_ready().await;
        if ready {
            self.reporter.log(&mut self.run, "FFmpeg loaded.");
        } else {
            warn!("Encoding engine is not available");
            self.reporter.log(&mut self.run, "Failed to load FFmpeg core.");
        }
        ready
    }

    /// Whether generate would currently be accepted
    pub async fn can_generate(&self) -> bool {
        GenerateGuard::can_generate(&self.pools, self.engine.is_ready().await, self.run.state)
    }

    /// Process every combination.
    ///
    /// Rejected requests leave the session untouched. Once accepted, failures
    /// inside the run are reported through the run state and log rather than
    /// as an `Err`.
    pub async fn generate(&mut self) -> Result<RunState, DomainError> {
        let ready = self.engine.is_ready().await;
        GenerateGuard::check(&self.pools, ready, self.run.state)?;

        self.registry.invalidate_all();
        Ok(self
            .batch
            .execute(&self.pools, &mut self.run, &mut self.registry)
            .await)
    }

    /// Expose the latest run's artifacts: directly, archived, or one by one
    pub async fn download_all(&mut self) -> DownloadPlan {
        self.packager
            .download_all(&mut self.run, &mut self.registry)
            .await
    }

    /// Dereference a retrieval handle
    pub fn resolve(&self, handle: ArtifactHandle) -> Option<Arc<[u8]>> {
        self.registry.resolve(handle)
    }

    /// Revoke every handle, empty the pools and return to idle
    pub fn reset(&mut self) {
        let released = self.registry.invalidate_all();
        self.pools.clear();
        self.run = BatchRun::new();
        info!("Session reset, released {} buffers", released);
    }
}
