use std::sync::Arc;
use std::time::Duration;

use crate::adapters::{FFmpegAdapter, Settings, ZipArchiveAdapter};
use crate::app::session::{Session, SessionOptions};
use crate::domain::errors::DomainError;
use crate::engine::ProgressCallback;
use crate::ports::{ArchivePort, EnginePort};

pub trait AppContainer: Send + Sync {
    fn engine(&self) -> Arc<dyn EnginePort>;
    fn archive(&self) -> Arc<dyn ArchivePort>;
    fn session(&self, callback: Option<Arc<dyn ProgressCallback>>) -> Session;
}

pub struct DefaultAppContainer {
    engine: Arc<dyn EnginePort>,
    archive: Arc<dyn ArchivePort>,
    stagger: Duration,
}

impl DefaultAppContainer {
    pub fn new(settings: &Settings) -> Result<Self, DomainError> {
        let engine = Arc::new(FFmpegAdapter::new(&settings.engine.ffmpeg_path)?);
        let archive = Arc::new(ZipArchiveAdapter::new());

        Ok(Self {
            engine: engine as Arc<dyn EnginePort>,
            archive: archive as Arc<dyn ArchivePort>,
            stagger: Duration::from_millis(settings.packaging.stagger_ms),
        })
    }
}

impl AppContainer for DefaultAppContainer {
    fn engine(&self) -> Arc<dyn EnginePort> {
        Arc::clone(&self.engine)
    }

    fn archive(&self) -> Arc<dyn ArchivePort> {
        Arc::clone(&self.archive)
    }

    fn session(&self, callback: Option<Arc<dyn ProgressCallback>>) -> Session {
        Session::new(
            self.engine(),
            self.archive(),
            SessionOptions {
                stagger: self.stagger,
                callback,
            },
        )
    }
}
