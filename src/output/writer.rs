//! Output file writer implementation

use std::io::Write;
use std::path::{Path, PathBuf};

use tracing::info;

use crate::app::package_interactor::DownloadPlan;
use crate::domain::model::ArtifactHandle;
use crate::error::{ComboError, ComboResult};
use crate::output::ArtifactRegistry;

/// Materialises a download plan as files in a directory
pub struct DownloadWriter {
    directory: PathBuf,
}

impl DownloadWriter {
    pub fn new(directory: impl Into<PathBuf>) -> Self {
        Self {
            directory: directory.into(),
        }
    }

    /// Write every file the plan exposes; returns the paths in plan order
    pub fn write_plan(
        &self,
        plan: &DownloadPlan,
        registry: &ArtifactRegistry,
    ) -> ComboResult<Vec<PathBuf>> {
        std::fs::create_dir_all(&self.directory)?;

        let mut written = Vec::new();
        match plan {
            DownloadPlan::Nothing => {}
            DownloadPlan::Direct(artifact) => {
                written.push(self.write_handle(registry, artifact.handle, &artifact.file_name())?);
            }
            DownloadPlan::Archive { name, handle, .. } => {
                written.push(self.write_handle(registry, *handle, name)?);
            }
            DownloadPlan::Individual { downloads } => {
                // Delays only matter for browser-style consumers
                for download in downloads {
                    let artifact = &download.artifact;
                    written.push(self.write_handle(
                        registry,
                        artifact.handle,
                        &artifact.file_name(),
                    )?);
                }
            }
        }
        Ok(written)
    }

    fn write_handle(
        &self,
        registry: &ArtifactRegistry,
        handle: ArtifactHandle,
        file_name: &str,
    ) -> ComboResult<PathBuf> {
        let bytes = registry.resolve(handle).ok_or_else(|| ComboError::OutputError {
            message: format!("{} ({}) is no longer available", file_name, handle),
        })?;
        let path = self.directory.join(file_name);
        Self::write_atomic(&path, &bytes)?;
        info!("Wrote {} ({} bytes)", path.display(), bytes.len());
        Ok(path)
    }

    /// Write through a temporary file in the target directory, then rename
    fn write_atomic(path: &Path, bytes: &[u8]) -> ComboResult<()> {
        let dir = path.parent().unwrap_or_else(|| Path::new("."));
        let mut temp = tempfile::NamedTempFile::new_in(dir)?;
        temp.write_all(bytes)?;
        temp.flush()?;
        temp.persist(path).map_err(|e| ComboError::OutputError {
            message: format!("Failed to rename temporary file to {}: {}", path.display(), e),
        })?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::app::package_interactor::StaggeredDownload;
    use crate::domain::model::{Artifact, ConcatTier};
    use std::time::Duration;

    fn artifact(registry: &mut ArtifactRegistry, name: &str, bytes: &[u8]) -> Artifact {
        Artifact {
            name: name.to_string(),
            handle: registry.register(bytes.to_vec()),
            size: bytes.len(),
            hook_name: "h.mp4".to_string(),
            body_name: "b.mp4".to_string(),
            cta_name: "c.mp4".to_string(),
            tier: ConcatTier::StreamCopy,
        }
    }

    #[test]
    fn test_write_direct() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = ArtifactRegistry::new();
        let plan = DownloadPlan::Direct(artifact(&mut registry, "output_h1_b1_c1", b"video"));

        let paths = DownloadWriter::new(dir.path()).write_plan(&plan, &registry).unwrap();
        assert_eq!(paths, vec![dir.path().join("output_h1_b1_c1.mp4")]);
        assert_eq!(std::fs::read(&paths[0]).unwrap(), b"video");
    }

    #[test]
    fn test_write_individual_fallback() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = ArtifactRegistry::new();
        let downloads = vec![
            StaggeredDownload {
                artifact: artifact(&mut registry, "output_h1_b1_c1", b"one"),
                delay: Duration::ZERO,
            },
            StaggeredDownload {
                artifact: artifact(&mut registry, "output_h1_b2_c1", b"two"),
                delay: Duration::from_millis(200),
            },
        ];

        let paths = DownloadWriter::new(dir.path())
            .write_plan(&DownloadPlan::Individual { downloads }, &registry)
            .unwrap();
        assert_eq!(paths.len(), 2);
        assert_eq!(std::fs::read(&paths[1]).unwrap(), b"two");
    }

    #[test]
    fn test_revoked_handle_is_an_error() {
        let dir = tempfile::tempdir().unwrap();
        let mut registry = ArtifactRegistry::new();
        let plan = DownloadPlan::Direct(artifact(&mut registry, "output_h1_b1_c1", b"video"));
        registry.invalidate_all();

        let result = DownloadWriter::new(dir.path()).write_plan(&plan, &registry);
        assert!(matches!(result, Err(ComboError::OutputError { .. })));
    }

    #[test]
    fn test_nothing_writes_nothing() {
        let dir = tempfile::tempdir().unwrap();
        let registry = ArtifactRegistry::new();
        let paths = DownloadWriter::new(dir.path())
            .write_plan(&DownloadPlan::Nothing, &registry)
            .unwrap();
        assert!(paths.is_empty());
    }
}
