//! Shared fakes for integration tests

#![allow(dead_code)]

use std::collections::{HashMap, HashSet};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use combo_batch::adapters::ZipArchiveAdapter;
use combo_batch::engine::ProgressCallback;
use combo_batch::ports::{ArchiveBuilder, ArchiveOptions, ArchivePort, ArchiveProgressFn};
use combo_batch::{Clip, DomainError, EnginePort};

/// One recorded engine call
#[derive(Debug, Clone, PartialEq)]
pub enum Call {
    Write(String),
    Execute(Vec<String>),
    Read(String),
    Delete(String),
}

#[derive(Default)]
struct EngineState {
    storage: HashMap<String, Vec<u8>>,
    calls: Vec<Call>,
    max_live_outputs: usize,
}

/// In-memory engine that concatenates buffers instead of video streams.
///
/// Stream copy output is the plain concatenation of the playlist entries;
/// re-encode output is the same bytes prefixed with `RE:`.
#[derive(Default)]
pub struct ScriptedEngine {
    not_ready: bool,
    copy_failures: HashSet<String>,
    reencode_failures: HashSet<String>,
    write_failures: HashSet<String>,
    state: Mutex<EngineState>,
}

impl ScriptedEngine {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn not_ready(mut self) -> Self {
        self.not_ready = true;
        self
    }

    /// Make the stream copy of `output` (e.g. `output_h1_b2_c1.mp4`) fail
    pub fn fail_copy(mut self, output: &str) -> Self {
        self.copy_failures.insert(output.to_string());
        self
    }

    /// Make the re-encode of `output` fail
    pub fn fail_reencode(mut self, output: &str) -> Self {
        self.reencode_failures.insert(output.to_string());
        self
    }

    /// Make writing the buffer `name` fail
    pub fn fail_write(mut self, name: &str) -> Self {
        self.write_failures.insert(name.to_string());
        self
    }

    pub fn calls(&self) -> Vec<Call> {
        self.state.lock().unwrap().calls.clone()
    }

    pub fn executes(&self) -> Vec<Vec<String>> {
        self.calls()
            .into_iter()
            .filter_map(|call| match call {
                Call::Execute(argv) => Some(argv),
                _ => None,
            })
            .collect()
    }

    pub fn writes_of(&self, name: &str) -> usize {
        self.calls()
            .iter()
            .filter(|call| **call == Call::Write(name.to_string()))
            .count()
    }

    /// Names currently held in engine storage
    pub fn live_buffers(&self) -> Vec<String> {
        let mut names: Vec<String> = self.state.lock().unwrap().storage.keys().cloned().collect();
        names.sort();
        names
    }

    /// Highest number of rendered outputs ever held at once
    pub fn max_live_outputs(&self) -> usize {
        self.state.lock().unwrap().max_live_outputs
    }

    fn concat_inputs(storage: &HashMap<String, Vec<u8>>, inputs: &[String]) -> Result<Vec<u8>, DomainError> {
        let mut out = Vec::new();
        for input in inputs {
            let bytes = storage.get(input).ok_or_else(|| {
                DomainError::ProcessingError(format!("{}: No such file or directory", input))
            })?;
            out.extend_from_slice(bytes);
        }
        Ok(out)
    }
}

#[async_trait]
impl EnginePort for ScriptedEngine {
    async fn is_ready(&self) -> bool {
        !self.not_ready
    }

    async fn write_buffer(&self, name: &str, bytes: &[u8]) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Write(name.to_string()));
        if self.write_failures.contains(name) {
            return Err(DomainError::StorageError(format!("disk full writing {}", name)));
        }
        state.storage.insert(name.to_string(), bytes.to_vec());
        Ok(())
    }

    async fn execute(&self, argv: &[String]) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Execute(argv.to_vec()));

        let output = argv.last().cloned().unwrap_or_default();
        let is_copy = argv.first().map(String::as_str) == Some("-f");

        let bytes = if is_copy {
            if self.copy_failures.contains(&output) {
                return Err(DomainError::ProcessingError(
                    "Non-monotonic DTS in output stream".to_string(),
                ));
            }
            let playlist = state
                .storage
                .get("list.txt")
                .map(|b| String::from_utf8_lossy(b).into_owned())
                .unwrap_or_default();
            let inputs: Vec<String> = playlist
                .lines()
                .filter_map(|line| line.strip_prefix("file '"))
                .filter_map(|rest| rest.strip_suffix('\''))
                .map(str::to_string)
                .collect();
            Self::concat_inputs(&state.storage, &inputs)?
        } else {
            if self.reencode_failures.contains(&output) {
                return Err(DomainError::ProcessingError(
                    "Error while filtering: Invalid argument".to_string(),
                ));
            }
            let inputs: Vec<String> = argv
                .windows(2)
                .filter(|pair| pair[0] == "-i")
                .map(|pair| pair[1].clone())
                .collect();
            let mut bytes = b"RE:".to_vec();
            bytes.extend(Self::concat_inputs(&state.storage, &inputs)?);
            bytes
        };

        state.storage.insert(output, bytes);
        let live = state.storage.keys().filter(|k| k.starts_with("output_")).count();
        state.max_live_outputs = state.max_live_outputs.max(live);
        Ok(())
    }

    async fn read_buffer(&self, name: &str) -> Result<Vec<u8>, DomainError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Read(name.to_string()));
        state
            .storage
            .get(name)
            .cloned()
            .ok_or_else(|| DomainError::StorageError(format!("{} not found", name)))
    }

    async fn delete_buffer(&self, name: &str) -> Result<(), DomainError> {
        let mut state = self.state.lock().unwrap();
        state.calls.push(Call::Delete(name.to_string()));
        state.storage.remove(name);
        Ok(())
    }
}

/// Zip archive port that counts how many archives were started
#[derive(Default)]
pub struct CountingArchive {
    inner: ZipArchiveAdapter,
    created: AtomicUsize,
}

impl CountingArchive {
    pub fn created(&self) -> usize {
        self.created.load(Ordering::SeqCst)
    }
}

impl ArchivePort for CountingArchive {
    fn new_archive(&self) -> Box<dyn ArchiveBuilder> {
        self.created.fetch_add(1, Ordering::SeqCst);
        self.inner.new_archive()
    }
}

/// Archive port whose builds always fail
#[derive(Default)]
pub struct FailingArchive;

struct FailingBuilder;

#[async_trait]
impl ArchiveBuilder for FailingBuilder {
    fn add_entry(&mut self, _name: &str, _bytes: &[u8]) {}

    async fn build(
        &mut self,
        _options: ArchiveOptions,
        progress: Option<ArchiveProgressFn<'_>>,
    ) -> Result<Vec<u8>, DomainError> {
        if let Some(report) = progress {
            report(10.0);
        }
        Err(DomainError::PackagingFailed("out of memory".to_string()))
    }
}

impl ArchivePort for FailingArchive {
    fn new_archive(&self) -> Box<dyn ArchiveBuilder> {
        Box::new(FailingBuilder)
    }
}

/// Progress observer recording everything it sees
#[derive(Default)]
pub struct RecordingProgress {
    pub updates: Mutex<Vec<(u8, String)>>,
    pub lines: Mutex<Vec<String>>,
}

impl ProgressCallback for RecordingProgress {
    fn on_progress(&self, percent: u8, status: &str) {
        self.updates.lock().unwrap().push((percent, status.to_string()));
    }

    fn on_log(&self, line: &str) {
        self.lines.lock().unwrap().push(line.to_string());
    }
}

pub fn clip(name: &str, bytes: &[u8]) -> Clip {
    Clip::new(name, bytes.to_vec())
}

pub fn shared<T>(value: T) -> Arc<T> {
    Arc::new(value)
}
