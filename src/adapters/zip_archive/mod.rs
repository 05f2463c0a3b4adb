// Zip archive adapter - In-memory archive packaging using the zip crate

use std::io::{Cursor, Write};

use async_trait::async_trait;
use tracing::debug;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use crate::domain::errors::*;
use crate::ports::*;

/// Archive port producing zip files in memory
#[derive(Debug, Clone, Default)]
pub struct ZipArchiveAdapter;

impl ZipArchiveAdapter {
    pub fn new() -> Self {
        Self
    }
}

impl ArchivePort for ZipArchiveAdapter {
    fn new_archive(&self) -> Box<dyn ArchiveBuilder> {
        Box::new(ZipArchiveBuilder::default())
    }
}

/// One zip archive under construction
#[derive(Debug, Default)]
pub struct ZipArchiveBuilder {
    entries: Vec<(String, Vec<u8>)>,
}

impl ZipArchiveBuilder {
    fn file_options(compression: CompressionMode, large: bool) -> SimpleFileOptions {
        let method = match compression {
            CompressionMode::Store => CompressionMethod::Stored,
            CompressionMode::Deflate => CompressionMethod::Deflated,
        };
        SimpleFileOptions::default()
            .compression_method(method)
            .large_file(large)
    }
}

fn zip_err(e: impl std::fmt::Display) -> DomainError {
    DomainError::PackagingFailed(e.to_string())
}

#[async_trait]
impl ArchiveBuilder for ZipArchiveBuilder {
    fn add_entry(&mut self, name: &str, bytes: &[u8]) {
        self.entries.push((name.to_string(), bytes.to_vec()));
    }

    async fn build(
        &mut self,
        options: ArchiveOptions,
        progress: Option<ArchiveProgressFn<'_>>,
    ) -> Result<Vec<u8>, DomainError> {
        let total: usize = self.entries.iter().map(|(_, bytes)| bytes.len()).sum();
        let mut writer = ZipWriter::new(Cursor::new(Vec::with_capacity(total + 1024)));
        let mut written = 0usize;

        if let Some(report) = progress {
            report(0.0);
        }

        for (name, bytes) in &self.entries {
            let large = bytes.len() as u64 >= u32::MAX as u64;
            writer
                .start_file(name.as_str(), Self::file_options(options.compression, large))
                .map_err(zip_err)?;
            writer.write_all(bytes).map_err(zip_err)?;

            written += bytes.len();
            if let Some(report) = progress {
                let percent = if total == 0 {
                    100.0
                } else {
                    written as f64 / total as f64 * 100.0
                };
                report(percent);
            }
            tokio::task::yield_now().await;
        }

        let archive = writer.finish().map_err(zip_err)?.into_inner();
        debug!(
            "Built archive with {} entries ({} bytes)",
            self.entries.len(),
            archive.len()
        );
        Ok(archive)
    }
}
