// Package interactor - Turns a run's artifacts into something downloadable

use std::sync::{Arc, Mutex};
use std::time::Duration;

use serde::Serialize;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::domain::model::*;
use crate::domain::rules::archive_name;
use crate::engine::ProgressReporter;
use crate::output::ArtifactRegistry;
use crate::ports::*;

/// One artifact exposed on its own, `delay` after the first one
#[derive(Debug, Clone, Serialize)]
pub struct StaggeredDownload {
    pub artifact: Artifact,
    pub delay: Duration,
}

/// What `download_all` exposes to the caller
#[derive(Debug, Clone, Serialize)]
#[serde(tag = "kind", rename_all = "snake_case")]
pub enum DownloadPlan {
    /// No artifacts to offer
    Nothing,
    /// A single artifact, offered as-is
    Direct(Artifact),
    /// All artifacts bundled into one archive
    Archive {
        name: String,
        handle: ArtifactHandle,
        size: usize,
        entries: usize,
    },
    /// Archiving failed; artifacts offered one by one
    Individual { downloads: Vec<StaggeredDownload> },
}

/// Interactor for the download-all use case
pub struct PackageInteractor {
    archive: Arc<dyn ArchivePort>,
    reporter: ProgressReporter,
    stagger: Duration,
}

impl PackageInteractor {
    /// Create new package interactor with injected archive port
    pub fn new(archive: Arc<dyn ArchivePort>, reporter: ProgressReporter, stagger: Duration) -> Self {
        Self {
            archive,
            reporter,
            stagger,
        }
    }

    /// Expose the artifacts of `run`.
    ///
    /// Archive bytes are registered in `registry`, so they live exactly as long
    /// as the run's own artifacts; building a new archive revokes the previous
    /// one. Packaging failures never change the run state.
    pub async fn download_all(
        &self,
        run: &mut BatchRun,
        registry: &mut ArtifactRegistry,
    ) -> DownloadPlan {
        match run.artifacts.len() {
            0 => DownloadPlan::Nothing,
            1 => DownloadPlan::Direct(run.artifacts[0].clone()),
            count => match self.build_archive(run, registry).await {
                Ok(plan) => {
                    self.reporter.update(run, 100, "");
                    self.reporter.log(run, "ZIP ready.");
                    plan
                }
                Err(e) => {
                    warn!("Archive of {} artifacts failed: {}", count, e);
                    let progress = run.progress;
                    self.reporter.update(run, progress, "");
                    self.reporter
                        .log(run, "Failed to zip. Falling back to individual downloads.");
                    self.reporter.log(run, e.to_string());
                    DownloadPlan::Individual {
                        downloads: self.staggered(&run.artifacts),
                    }
                }
            },
        }
    }

    async fn build_archive(
        &self,
        run: &mut BatchRun,
        registry: &mut ArtifactRegistry,
    ) -> Result<DownloadPlan, DomainError> {
        let count = run.artifacts.len();
        self.reporter
            .log(run, format!("Zipping {} videos...", count));
        self.reporter.update(run, 0, "Zipping… 0%");

        if let Some(previous) = run.archive.take() {
            if registry.revoke(previous) {
                debug!("Revoked previous archive {}", previous);
            }
        }

        let mut builder = self.archive.new_archive();
        for artifact in &run.artifacts {
            let bytes = registry.resolve(artifact.handle).ok_or_else(|| {
                DomainError::PackagingFailed(format!(
                    "{} is no longer available",
                    artifact.file_name()
                ))
            })?;
            builder.add_entry(&artifact.file_name(), &bytes);
        }

        let options = ArchiveOptions {
            compression: CompressionMode::Store,
        };
        let bytes = {
            let reporter = &self.reporter;
            let shared_run = Mutex::new(&mut *run);
            let on_progress = |fraction: f64| {
                let percent = fraction.round().clamp(0.0, 100.0) as u8;
                let status = format!("Zipping… {}%", percent);
                if let Ok(mut run) = shared_run.lock() {
                    if run.progress != percent || run.status_text != status {
                        reporter.update(&mut **run, percent, status);
                    }
                }
            };
            builder.build(options, Some(&on_progress)).await?
        };

        let name = archive_name(count);
        let size = bytes.len();
        let handle = registry.register(bytes);
        run.archive = Some(handle);
        info!("Archive {} ready ({} bytes)", name, size);

        Ok(DownloadPlan::Archive {
            name,
            handle,
            size,
            entries: count,
        })
    }

    fn staggered(&self, artifacts: &[Artifact]) -> Vec<StaggeredDownload> {
        artifacts
            .iter()
            .enumerate()
            .map(|(i, artifact)| StaggeredDownload {
                artifact: artifact.clone(),
                delay: self.stagger * i as u32,
            })
            .collect()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::Value;

    fn artifact(name: &str, id: u64) -> Artifact {
        Artifact {
            name: name.to_string(),
            handle: ArtifactHandle(id),
            size: 3,
            hook_name: "h.mp4".to_string(),
            body_name: "b.mp4".to_string(),
            cta_name: "c.mp4".to_string(),
            tier: ConcatTier::StreamCopy,
        }
    }

    #[test]
    fn test_every_plan_serializes() {
        let plans = [
            DownloadPlan::Nothing,
            DownloadPlan::Direct(artifact("output_h1_b1_c1", 1)),
            DownloadPlan::Archive {
                name: "videos_2.zip".to_string(),
                handle: ArtifactHandle(3),
                size: 512,
                entries: 2,
            },
            DownloadPlan::Individual {
                downloads: vec![
                    StaggeredDownload {
                        artifact: artifact("output_h1_b1_c1", 1),
                        delay: Duration::ZERO,
                    },
                    StaggeredDownload {
                        artifact: artifact("output_h1_b2_c1", 2),
                        delay: Duration::from_millis(200),
                    },
                ],
            },
        ];

        let kinds: Vec<String> = plans
            .iter()
            .map(|plan| {
                let value = serde_json::to_value(plan).unwrap();
                value["kind"].as_str().unwrap().to_string()
            })
            .collect();
        assert_eq!(kinds, ["nothing", "direct", "archive", "individual"]);

        let individual = serde_json::to_value(&plans[3]).unwrap();
        let downloads = individual["downloads"].as_array().unwrap();
        assert_eq!(downloads.len(), 2);
        assert_eq!(downloads[1]["artifact"]["name"], Value::from("output_h1_b2_c1"));
    }
}
