//! Concatenation engine module
//!
//! Turns one combination into one rendered video using two tiers: a lossless
//! concat-demuxer stream copy, and a filter-graph re-encode used only when the
//! stream copy is rejected by the engine.

pub mod concat;
pub mod copy;
pub mod progress;
pub mod reencode;

pub use concat::{ConcatEngine, RenderedOutput};
pub use copy::StreamCopyConcat;
pub use progress::{ProgressCallback, ProgressReporter, TracingProgress};
pub use reencode::{ReencodeConcat, ReencodeProfile};
