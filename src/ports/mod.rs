// Ports - Interface definitions (contracts)

use crate::domain::errors::*;
use async_trait::async_trait;

/// Port for the encoding engine.
///
/// The engine is a single stateful instance with its own addressable storage:
/// callers feed named input buffers, run a command, read named outputs back and
/// delete what they no longer need. It is not reentrant; callers must not
/// overlap calls from different combinations.
#[async_trait]
pub trait EnginePort: Send + Sync {
    /// Whether the engine is loaded and able to run commands
    async fn is_ready(&self) -> bool;

    /// Store `bytes` under `name` in engine storage, replacing any previous buffer
    async fn write_buffer(&self, name: &str, bytes: &[u8]) -> Result<(), DomainError>;

    /// Run one engine command
    async fn execute(&self, argv: &[String]) -> Result<(), DomainError>;

    /// Fetch a named buffer from engine storage
    async fn read_buffer(&self, name: &str) -> Result<Vec<u8>, DomainError>;

    /// Release a named buffer from engine storage
    async fn delete_buffer(&self, name: &str) -> Result<(), DomainError>;
}

/// Archive compression mode
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CompressionMode {
    /// No compression (payloads are already compressed video)
    Store,
    Deflate,
}

/// Options passed to `ArchiveBuilder::build`
#[derive(Debug, Clone, Copy)]
pub struct ArchiveOptions {
    pub compression: CompressionMode,
}

impl Default for ArchiveOptions {
    fn default() -> Self {
        Self {
            compression: CompressionMode::Store,
        }
    }
}

/// Callback receiving archive completion in percent (0.0 - 100.0)
pub type ArchiveProgressFn<'a> = &'a (dyn Fn(f64) + Send + Sync);

/// One archive under construction
#[async_trait]
pub trait ArchiveBuilder: Send {
    /// Queue an entry; entries are written in insertion order
    fn add_entry(&mut self, name: &str, bytes: &[u8]);

    /// Assemble the archive into one buffer
    async fn build(
        &mut self,
        options: ArchiveOptions,
        progress: Option<ArchiveProgressFn<'_>>,
    ) -> Result<Vec<u8>, DomainError>;
}

/// Port for the archive packaging component
pub trait ArchivePort: Send + Sync {
    /// Start a new, empty archive
    fn new_archive(&self) -> Box<dyn ArchiveBuilder>;
}
