//! Stream copy concatenation (tier 1)

use crate::domain::model::Combination;

/// Name of the concat playlist in engine storage. One playlist is reused for
/// every combination, which is one reason combinations never overlap.
pub const PLAYLIST_NAME: &str = "list.txt";

/// Lossless concatenation through the concat demuxer
#[derive(Debug, Clone, Default)]
pub struct StreamCopyConcat;

impl StreamCopyConcat {
    pub fn new() -> Self {
        Self
    }

    /// Concat playlist listing the staged clips in hook, body, cta order
    pub fn playlist(&self, combo: &Combination) -> String {
        combo
            .parts()
            .iter()
            .map(|part| format!("file '{}'\n", part.storage_name()))
            .collect()
    }

    /// Engine arguments for a stream copy into `output`
    pub fn argv(&self, output: &str) -> Vec<String> {
        [
            "-f",
            "concat",
            "-safe",
            "0",
            "-i",
            PLAYLIST_NAME,
            "-c",
            "copy",
            output,
        ]
        .iter()
        .map(|s| s.to_string())
        .collect()
    }
}
