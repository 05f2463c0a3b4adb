//! Two-tier concatenation: stream copy first, re-encode on failure

use std::sync::Arc;

use tracing::{debug, info, warn};

use crate::domain::errors::DomainError;
use crate::domain::model::{Combination, ConcatTier};
use crate::engine::copy::{StreamCopyConcat, PLAYLIST_NAME};
use crate::engine::reencode::ReencodeConcat;
use crate::ports::EnginePort;

/// Bytes of one rendered combination
#[derive(Debug, Clone)]
pub struct RenderedOutput {
    pub bytes: Vec<u8>,
    pub tier: ConcatTier,
}

/// Renders combinations through the shared engine instance.
///
/// The engine keeps one playlist and one output buffer alive at a time, so
/// `render` must be awaited to completion before the next combination starts.
pub struct ConcatEngine {
    engine: Arc<dyn EnginePort>,
    copy: StreamCopyConcat,
    reencode: ReencodeConcat,
}

impl ConcatEngine {
    pub fn new(engine: Arc<dyn EnginePort>) -> Self {
        Self {
            engine,
            copy: StreamCopyConcat::new(),
            reencode: ReencodeConcat::new(),
        }
    }

    /// Render one combination.
    ///
    /// `on_fallback` runs once, after the stream copy failed and before the
    /// re-encode starts. On success the output buffer has already been removed
    /// from engine storage.
    pub async fn render<F>(
        &self,
        combo: &Combination,
        on_fallback: F,
    ) -> Result<RenderedOutput, DomainError>
    where
        F: FnOnce(&DomainError) + Send,
    {
        let output = combo.output_file_name();

        let tier = match self.try_stream_copy(combo, &output).await? {
            Ok(()) => ConcatTier::StreamCopy,
            Err(copy_err) => {
                info!("Stream copy rejected for {}, re-encoding: {}", output, copy_err);
                on_fallback(&copy_err);

                if let Err(e) = self.run_reencode(combo, &output).await {
                    self.discard_output(&output).await;
                    return Err(DomainError::ReencodeFailed(format!("{}: {}", output, e)));
                }
                ConcatTier::Reencode
            }
        };

        let bytes = self.collect_output(&output).await?;
        debug!("Rendered {} ({} bytes, {:?})", output, bytes.len(), tier);
        Ok(RenderedOutput { bytes, tier })
    }

    /// Tier 1. The outer error is fatal (playlist could not be stored), the
    /// inner one is the engine rejecting the stream copy.
    async fn try_stream_copy(
        &self,
        combo: &Combination,
        output: &str,
    ) -> Result<Result<(), DomainError>, DomainError> {
        let playlist = self.copy.playlist(combo);
        self.engine
            .write_buffer(PLAYLIST_NAME, playlist.as_bytes())
            .await
            .map_err(|e| DomainError::StorageError(format!("writing {}: {}", PLAYLIST_NAME, e)))?;

        let argv = self.copy.argv(output);
        debug!("Stream copy argv: {:?}", argv);
        Ok(self.engine.execute(&argv).await)
    }

    /// Tier 2; there is no further fallback
    async fn run_reencode(&self, combo: &Combination, output: &str) -> Result<(), DomainError> {
        let argv = self.reencode.argv(combo, output);
        debug!("Re-encode argv: {:?}", argv);
        self.engine.execute(&argv).await
    }

    /// Read the output back and delete it from engine storage
    async fn collect_output(&self, output: &str) -> Result<Vec<u8>, DomainError> {
        let read = self.engine.read_buffer(output).await;
        let deleted = self.engine.delete_buffer(output).await;

        let bytes = read.map_err(|e| DomainError::StorageError(format!("reading {}: {}", output, e)))?;
        deleted.map_err(|e| DomainError::StorageError(format!("deleting {}: {}", output, e)))?;
        Ok(bytes)
    }

    /// Drop whatever partial output a failed command left behind
    async fn discard_output(&self, output: &str) {
        if let Err(e) = self.engine.delete_buffer(output).await {
            warn!("Could not discard partial output {}: {}", output, e);
        }
    }
}
