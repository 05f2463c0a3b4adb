//! FFmpeg execution adapter
//!
//! Runs the `ffmpeg` binary as a subprocess. The engine's addressable storage
//! is a private temporary directory; every command runs with that directory as
//! its working directory so buffer names double as relative file names.

use std::path::{Path, PathBuf};
use std::process::Stdio;

use async_trait::async_trait;
use tempfile::TempDir;
use tokio::process::Command;
use tracing::{debug, info, warn};

use crate::domain::errors::*;
use crate::ports::*;

/// Number of stderr lines kept in processing errors
const STDERR_TAIL_LINES: usize = 8;

/// FFmpeg subprocess adapter with temp-dir backed storage
pub struct FFmpegAdapter {
    binary: Option<PathBuf>,
    storage: TempDir,
}

impl FFmpegAdapter {
    /// Create new FFmpeg adapter; `ffmpeg_path` is a bare name looked up on PATH or a full path
    pub fn new(ffmpeg_path: &str) -> Result<Self, DomainError> {
        let binary = match which::which(ffmpeg_path) {
            Ok(path) => {
                info!("Using ffmpeg at {}", path.display());
                Some(path)
            }
            Err(e) => {
                warn!("ffmpeg binary '{}' not found: {}", ffmpeg_path, e);
                None
            }
        };

        let storage = tempfile::Builder::new()
            .prefix("combo-batch-")
            .tempdir()
            .map_err(|e| {
                DomainError::ResourceUnavailable(format!("Failed to create engine storage: {}", e))
            })?;
        debug!("Engine storage at {}", storage.path().display());

        Ok(Self { binary, storage })
    }

    /// Directory holding the engine's buffers
    pub fn storage_dir(&self) -> &Path {
        self.storage.path()
    }

    /// Map a buffer name to its file, rejecting anything that is not a plain file name
    fn buffer_path(&self, name: &str) -> Result<PathBuf, DomainError> {
        let valid = !name.is_empty()
            && name != "."
            && name != ".."
            && !name.contains(['/', '\\'])
            && !name.contains('\0');
        if !valid {
            return Err(DomainError::BadArgs(format!("Invalid buffer name: {:?}", name)));
        }
        Ok(self.storage.path().join(name))
    }

    /// Non-blank lines of the engine's log output
    fn log_lines(stderr: &[u8]) -> Vec<String> {
        String::from_utf8_lossy(stderr)
            .lines()
            .map(str::trim_end)
            .filter(|line| !line.trim().is_empty())
            .map(str::to_string)
            .collect()
    }

    fn stderr_tail(lines: &[String]) -> String {
        let start = lines.len().saturating_sub(STDERR_TAIL_LINES);
        lines[start..].join("\n")
    }
}

#[async_trait]
impl EnginePort for FFmpegAdapter {
    async fn is_ready(&self) -> bool {
        self.binary.is_some()
    }

    async fn write_buffer(&self, name: &str, bytes: &[u8]) -> Result<(), DomainError> {
        let path = self.buffer_path(name)?;
        tokio::fs::write(&path, bytes)
            .await
            .map_err(|e| DomainError::StorageError(format!("Failed to write {}: {}", name, e)))?;
        debug!("Wrote buffer {} ({} bytes)", name, bytes.len());
        Ok(())
    }

    async fn execute(&self, argv: &[String]) -> Result<(), DomainError> {
        let binary = self.binary.as_ref().ok_or_else(|| {
            DomainError::ResourceUnavailable("ffmpeg binary is not available".to_string())
        })?;

        debug!("Running ffmpeg {:?}", argv);
        let output = Command::new(binary)
            .args(["-hide_banner", "-nostdin", "-y"])
            .args(argv)
            .current_dir(self.storage.path())
            .stdin(Stdio::null())
            .stdout(Stdio::null())
            .stderr(Stdio::piped())
            .kill_on_drop(true)
            .output()
            .await
            .map_err(|e| DomainError::ProcessingError(format!("Failed to spawn ffmpeg: {}", e)))?;

        let lines = Self::log_lines(&output.stderr);
        for line in &lines {
            debug!("ffmpeg: {}", line);
        }

        if !output.status.success() {
            return Err(DomainError::ProcessingError(format!(
                "ffmpeg exited with {}: {}",
                output.status,
                Self::stderr_tail(&lines)
            )));
        }

        Ok(())
    }

    async fn read_buffer(&self, name: &str) -> Result<Vec<u8>, DomainError> {
        let path = self.buffer_path(name)?;
        tokio::fs::read(&path)
            .await
            .map_err(|e| DomainError::StorageError(format!("Failed to read {}: {}", name, e)))
    }

    async fn delete_buffer(&self, name: &str) -> Result<(), DomainError> {
        let path = self.buffer_path(name)?;
        match tokio::fs::remove_file(&path).await {
            Ok(()) => Ok(()),
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => Ok(()),
            Err(e) => Err(DomainError::StorageError(format!(
                "Failed to delete {}: {}",
                name, e
            ))),
        }
    }
}
