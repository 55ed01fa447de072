//! Streaming result reducer.
//!
//! Reconstructs the target shape `{ summary, <items_key>: [...] }` from raw
//! streaming fragments and notifies a progress callback once per resolved
//! value, in resolution order. Snapshots handed to the callback are owned
//! clones; caller-side mutation cannot corrupt reducer state.
//!
//! Lifecycle over one remote call: fragments are applied while the stream
//! is live (accumulating); once the transport signals completion the caller
//! parses the full response text, which supersedes anything assembled here —
//! partial snapshots are advisory, for progressive display only. A transport
//! or parse failure poisons the reducer: no further callbacks occur.

use serde_json::Value;

use crate::error::{MocksmithError, Result};

use super::parser::{JsonPath, JsonStreamBuilder, PathSeg};

/// In-progress reconstruction of a streamed result.
///
/// `summary` may still be growing; the last element of `items` may be a
/// partially-filled object. Items are never retracted, only appended.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct Snapshot {
    pub summary: String,
    pub items: Vec<Value>,
}

/// Incremental reducer over one streaming response.
pub struct StreamReducer {
    builder: JsonStreamBuilder,
    items_key: String,
    failed: bool,
}

impl StreamReducer {
    /// Create a reducer watching `summary` and every element under
    /// `items_key` (`data`, `requirementDefinitions`, ...).
    pub fn new(items_key: impl Into<String>) -> Self {
        Self {
            builder: JsonStreamBuilder::new(),
            items_key: items_key.into(),
            failed: false,
        }
    }

    /// Apply one fragment, invoking `on_progress` once per value resolved
    /// at a watched path. Partial string values are re-emitted as they grow.
    pub fn apply(
        &mut self,
        fragment: &str,
        on_progress: &mut dyn FnMut(Snapshot),
    ) -> Result<()> {
        if self.failed {
            return Err(MocksmithError::Stream(
                "reducer already failed; fragment dropped".to_string(),
            ));
        }
        let events = match self.builder.feed(fragment) {
            Ok(events) => events,
            Err(e) => {
                self.failed = true;
                return Err(e);
            }
        };
        for path in &events {
            if self.watches(path) {
                on_progress(self.current_snapshot());
            }
        }
        Ok(())
    }

    /// Current best-effort snapshot of the target shape.
    pub fn current_snapshot(&self) -> Snapshot {
        let doc = self.builder.snapshot();
        Snapshot {
            summary: doc
                .get("summary")
                .and_then(Value::as_str)
                .unwrap_or_default()
                .to_string(),
            items: doc
                .get(&self.items_key)
                .and_then(Value::as_array)
                .cloned()
                .unwrap_or_default(),
        }
    }

    /// True once the underlying document has fully closed.
    pub fn is_complete(&self) -> bool {
        self.builder.is_complete()
    }

    fn watches(&self, path: &JsonPath) -> bool {
        match path.first() {
            Some(PathSeg::Key(k)) if k == "summary" => path.len() == 1,
            Some(PathSeg::Key(k)) if *k == self.items_key => path.len() >= 2,
            _ => false,
        }
    }
}
