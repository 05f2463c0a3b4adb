//! combo-batch library
//!
//! Batch-renders every ordered hook/body/cta combination of up to three clips
//! per slot. Each combination is first concatenated with a lossless stream
//! copy; when the engine rejects that, it is re-encoded through a filter graph.
//! Results are exposed directly, as one store-only zip, or one by one when
//! archiving fails.

pub mod adapters;
pub mod app;
pub mod cli;
pub mod config_initialization;
pub mod domain;
pub mod engine;
pub mod error;
pub mod output;
pub mod planner;
pub mod ports;
pub mod utils;

// Re-export commonly used types
pub use app::{DownloadPlan, Session, SessionOptions};
pub use domain::errors::DomainError;
pub use domain::model::{
    Artifact, ArtifactHandle, BatchRun, Clip, ComboStatus, Combination, ConcatTier, RunState,
    SegmentPools, SlotKind,
};
pub use error::{ComboError, ComboResult};
pub use ports::{ArchiveBuilder, ArchivePort, EnginePort};
