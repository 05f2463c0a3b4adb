//! Artifact retrieval and output writing module

use std::collections::HashMap;
use std::sync::Arc;

use tracing::debug;

use crate::domain::model::ArtifactHandle;

pub mod writer;

/// Holds produced buffers behind retrieval handles.
///
/// Handle ids are never reused, so a handle invalidated by `invalidate_all`
/// can not accidentally resolve to a buffer registered later.
#[derive(Debug, Default)]
pub struct ArtifactRegistry {
    next_id: u64,
    buffers: HashMap<u64, Arc<[u8]>>,
}

impl ArtifactRegistry {
    pub fn new() -> Self {
        Self::default()
    }

    /// Take ownership of `bytes` and hand out a retrieval handle
    pub fn register(&mut self, bytes: Vec<u8>) -> ArtifactHandle {
        self.next_id += 1;
        let id = self.next_id;
        self.buffers.insert(id, Arc::from(bytes));
        ArtifactHandle(id)
    }

    /// Dereference a handle; `None` once it has been revoked
    pub fn resolve(&self, handle: ArtifactHandle) -> Option<Arc<[u8]>> {
        self.buffers.get(&handle.0).cloned()
    }

    /// Revoke a single handle and drop its buffer
    pub fn revoke(&mut self, handle: ArtifactHandle) -> bool {
        self.buffers.remove(&handle.0).is_some()
    }

    /// Revoke every live handle, releasing the buffers
    pub fn invalidate_all(&mut self) -> usize {
        let released = self.buffers.len();
        self.buffers.clear();
        self.buffers.shrink_to_fit();
        if released > 0 {
            debug!("Released {} artifact buffers", released);
        }
        released
    }

    /// Number of live handles
    pub fn len(&self) -> usize {
        self.buffers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buffers.is_empty()
    }

    /// Total bytes held by live handles
    pub fn total_bytes(&self) -> usize {
        self.buffers.values().map(|b| b.len()).sum()
    }
}
