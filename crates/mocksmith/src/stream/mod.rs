//! Incremental JSON streaming: a push-based value-builder plus the reducer
//! that turns its resolution events into progressive result snapshots.

mod parser;
mod reducer;

pub use parser::{JsonPath, JsonStreamBuilder, PathSeg};
pub use reducer::{Snapshot, StreamReducer};
