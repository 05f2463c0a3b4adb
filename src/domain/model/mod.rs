// Domain models - Core types and data structures

use std::fmt;
use std::sync::Arc;

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::domain::errors::DomainError;


/// Maximum number of clips a single slot may hold
pub const MAX_CLIPS_PER_SLOT: usize = 3;

/// One of the three clip categories that make up a finished video
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SlotKind {
    Hook,
    Body,
    Cta,
}

impl SlotKind {
    /// All slots in concatenation order
    pub const ALL: [SlotKind; 3] = [SlotKind::Hook, SlotKind::Body, SlotKind::Cta];

    /// Lower-case name, also used as the engine storage prefix
    pub fn as_str(&self) -> &'static str {
        match self {
            SlotKind::Hook => "hook",
            SlotKind::Body => "body",
            SlotKind::Cta => "cta",
        }
    }

    /// Parse slot name from string
    pub fn parse(slot_str: &str) -> Result<Self, DomainError> {
        match slot_str.trim().to_lowercase().as_str() {
            "hook" => Ok(SlotKind::Hook),
            "body" => Ok(SlotKind::Body),
            "cta" => Ok(SlotKind::Cta),
            _ => Err(DomainError::BadArgs(format!(
                "Invalid slot: {}. Valid slots: hook, body, cta",
                slot_str
            ))),
        }
    }

    /// Engine storage name of the clip at `index` in this slot
    pub fn storage_name(&self, index: usize) -> String {
        format!("{}_{}.mp4", self.as_str(), index)
    }
}

impl fmt::Display for SlotKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An immutable video payload owned by a slot
#[derive(Debug, Clone)]
pub struct Clip {
    /// Display name (usually the source file name)
    pub name: String,
    /// Zero-based position within the owning slot
    pub index: usize,
    /// Raw video bytes
    pub data: Arc<[u8]>,
}

impl Clip {
    /// Create a clip that has not been placed in a slot yet
    pub fn new(name: impl Into<String>, data: impl Into<Arc<[u8]>>) -> Self {
        Self {
            name: name.into(),
            index: 0,
            data: data.into(),
        }
    }

    /// Payload size in bytes
    pub fn len(&self) -> usize {
        self.data.len()
    }

    pub fn is_empty(&self) -> bool {
        self.data.is_empty()
    }
}

/// Ordered, capped list of clips for one slot
#[derive(Debug, Clone)]
pub struct Slot {
    kind: SlotKind,
    clips: Vec<Clip>,
}

impl Slot {
    pub fn new(kind: SlotKind) -> Self {
        Self {
            kind,
            clips: Vec::with_capacity(MAX_CLIPS_PER_SLOT),
        }
    }

    pub fn kind(&self) -> SlotKind {
        self.kind
    }

    pub fn clips(&self) -> &[Clip] {
        &self.clips
    }

    pub fn len(&self) -> usize {
        self.clips.len()
    }

    pub fn is_empty(&self) -> bool {
        self.clips.is_empty()
    }

    /// Append clips until the slot is full; the rest are dropped.
    /// Returns how many clips were accepted.
    pub fn add(&mut self, incoming: impl IntoIterator<Item = Clip>) -> usize {
        let room = MAX_CLIPS_PER_SLOT - self.clips.len();
        let before = self.clips.len();
        for mut clip in incoming.into_iter().take(room) {
            clip.index = self.clips.len();
            self.clips.push(clip);
        }
        self.clips.len() - before
    }

    /// Replace the slot content with the first clips of `incoming`
    pub fn replace(&mut self, incoming: impl IntoIterator<Item = Clip>) -> usize {
        self.clips.clear();
        self.add(incoming)
    }

    /// Remove the clip at `index`, shifting followers down. Out of range is a no-op.
    pub fn remove(&mut self, index: usize) -> Option<Clip> {
        if index >= self.clips.len() {
            return None;
        }
        let removed = self.clips.remove(index);
        for (position, clip) in self.clips.iter_mut().enumerate().skip(index) {
            clip.index = position;
        }
        Some(removed)
    }

    pub fn clear(&mut self) {
        self.clips.clear();
    }
}

/// The three clip pools a batch draws from
#[derive(Debug, Clone)]
pub struct SegmentPools {
    pub hook: Slot,
    pub body: Slot,
    pub cta: Slot,
}

impl Default for SegmentPools {
    fn default() -> Self {
        Self {
            hook: Slot::new(SlotKind::Hook),
            body: Slot::new(SlotKind::Body),
            cta: Slot::new(SlotKind::Cta),
        }
    }
}

impl SegmentPools {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn slot(&self, kind: SlotKind) -> &Slot {
        match kind {
            SlotKind::Hook => &self.hook,
            SlotKind::Body => &self.body,
            SlotKind::Cta => &self.cta,
        }
    }

    pub fn slot_mut(&mut self, kind: SlotKind) -> &mut Slot {
        match kind {
            SlotKind::Hook => &mut self.hook,
            SlotKind::Body => &mut self.body,
            SlotKind::Cta => &mut self.cta,
        }
    }

    /// Append clips to a slot, truncating at the slot cap
    pub fn add_clips(&mut self, kind: SlotKind, clips: Vec<Clip>) -> usize {
        self.slot_mut(kind).add(clips)
    }

    /// Replace a slot's clips, as picking a fresh selection of files does
    pub fn replace_clips(&mut self, kind: SlotKind, clips: Vec<Clip>) -> usize {
        self.slot_mut(kind).replace(clips)
    }

    pub fn remove_clip(&mut self, kind: SlotKind, index: usize) -> Option<Clip> {
        self.slot_mut(kind).remove(index)
    }

    /// True when every slot holds at least one clip
    pub fn is_complete(&self) -> bool {
        SlotKind::ALL.iter().all(|kind| !self.slot(*kind).is_empty())
    }

    /// Slots that still need clips
    pub fn empty_slots(&self) -> Vec<SlotKind> {
        SlotKind::ALL
            .into_iter()
            .filter(|kind| self.slot(*kind).is_empty())
            .collect()
    }

    pub fn clear(&mut self) {
        self.hook.clear();
        self.body.clear();
        self.cta.clear();
    }
}

/// One side of a combination: a clip and the slot position it came from
#[derive(Debug, Clone)]
pub struct ComboPart {
    pub slot: SlotKind,
    pub index: usize,
    pub clip_name: String,
}

impl ComboPart {
    fn from_clip(slot: SlotKind, clip: &Clip) -> Self {
        Self {
            slot,
            index: clip.index,
            clip_name: clip.name.clone(),
        }
    }

    /// Engine storage name of the staged clip
    pub fn storage_name(&self) -> String {
        self.slot.storage_name(self.index)
    }
}

/// An ordered hook/body/cta triple destined to become one video
#[derive(Debug, Clone)]
pub struct Combination {
    pub hook: ComboPart,
    pub body: ComboPart,
    pub cta: ComboPart,
}

impl Combination {
    pub fn new(hook: &Clip, body: &Clip, cta: &Clip) -> Self {
        Self {
            hook: ComboPart::from_clip(SlotKind::Hook, hook),
            body: ComboPart::from_clip(SlotKind::Body, body),
            cta: ComboPart::from_clip(SlotKind::Cta, cta),
        }
    }

    /// Canonical name, 1-based: `output_h{h}_b{b}_c{c}`
    pub fn output_name(&self) -> String {
        format!(
            "output_h{}_b{}_c{}",
            self.hook.index + 1,
            self.body.index + 1,
            self.cta.index + 1
        )
    }

    /// Container file name for the rendered output
    pub fn output_file_name(&self) -> String {
        format!("{}.mp4", self.output_name())
    }

    /// Parts in concatenation order
    pub fn parts(&self) -> [&ComboPart; 3] {
        [&self.hook, &self.body, &self.cta]
    }
}

/// Which concatenation tier produced an output
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum ConcatTier {
    /// Lossless concat demuxer with stream copy
    StreamCopy,
    /// Filter-graph concat with re-encoding
    Reencode,
}

/// Opaque retrieval reference for a produced buffer
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ArtifactHandle(pub u64);

impl fmt::Display for ArtifactHandle {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "artifact#{}", self.0)
    }
}

/// A finished video exposed for retrieval
#[derive(Debug, Clone, Serialize)]
pub struct Artifact {
    /// Canonical output name without extension
    pub name: String,
    pub handle: ArtifactHandle,
    pub size: usize,
    pub hook_name: String,
    pub body_name: String,
    pub cta_name: String,
    pub tier: ConcatTier,
}

impl Artifact {
    /// Download file name
    pub fn file_name(&self) -> String {
        format!("{}.mp4", self.name)
    }
}

/// Lifecycle of a batch run
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize, Default)]
#[serde(rename_all = "lowercase")]
pub enum RunState {
    #[default]
    Idle,
    Staging,
    Processing,
    Completed,
    Errored,
}

impl RunState {
    /// True while a run owns the engine
    pub fn is_active(&self) -> bool {
        matches!(self, RunState::Staging | RunState::Processing)
    }
}

/// Per-combination processing status
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ComboStatus {
    Pending,
    Processing,
    Succeeded,
    Failed,
}

/// Observable state of one generate invocation
#[derive(Debug, Clone, Default, Serialize)]
pub struct BatchRun {
    pub state: RunState,
    /// Number of combinations in this run
    pub total: usize,
    /// Zero-based position of the combination being processed
    pub current: usize,
    pub statuses: Vec<ComboStatus>,
    /// Progress percentage (0-100)
    pub progress: u8,
    /// Human-readable description of the current step
    pub status_text: String,
    /// Append-only human-readable log
    pub log: Vec<String>,
    pub artifacts: Vec<Artifact>,
    /// Handle of the most recent archive built from `artifacts`
    pub archive: Option<ArtifactHandle>,
    pub started_at: Option<DateTime<Utc>>,
    pub finished_at: Option<DateTime<Utc>>,
}

impl BatchRun {
    pub fn new() -> Self {
        Self::default()
    }

    /// Fresh run state for `total` combinations
    pub fn begin(total: usize) -> Self {
        Self {
            state: RunState::Staging,
            total,
            statuses: vec![ComboStatus::Pending; total],
            started_at: Some(Utc::now()),
            ..Self::default()
        }
    }

    pub fn push_log(&mut self, line: impl Into<String>) {
        self.log.push(line.into());
    }

    /// Enter a terminal state
    pub fn finish(&mut self, state: RunState) {
        self.state = state;
        self.finished_at = Some(Utc::now());
    }

    pub fn is_active(&self) -> bool {
        self.state.is_active()
    }

    /// Count of combinations with the given status
    pub fn count_status(&self, status: ComboStatus) -> usize {
        self.statuses.iter().filter(|s| **s == status).count()
    }
}
