use std::collections::HashMap;

use serde::{Deserialize, Serialize};

use crate::decode::compositor::CompositedFrame;
use crate::foundation::error::{LoopcutError, LoopcutResult};

/// Per-frame keep/drop flags for one animation.
///
/// Pure state: toggling a mark never touches decoded bitmaps, and the flag
/// vector always has one entry per decoded frame.
#[derive(Clone, Debug, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct FrameMarks {
    deleted: Vec<bool>,
}

impl FrameMarks {
    /// All-kept marks for `frame_count` frames.
    pub fn new(frame_count: usize) -> Self {
        Self {
            deleted: vec![false; frame_count],
        }
    }

    /// Number of frames tracked.
    pub fn len(&self) -> usize {
        self.deleted.len()
    }

    /// Whether no frames are tracked.
    pub fn is_empty(&self) -> bool {
        self.deleted.is_empty()
    }

    /// Flip the deleted flag for `index`. Out-of-range indices are a no-op,
    /// tolerating stale caller state.
    pub fn toggle_deleted(&mut self, index: usize) {
        if let Some(flag) = self.deleted.get_mut(index) {
            *flag = !*flag;
        }
    }

    /// Whether `index` is marked deleted. Out-of-range indices read as kept.
    pub fn is_deleted(&self, index: usize) -> bool {
        self.deleted.get(index).copied().unwrap_or(false)
    }

    /// Number of frames not marked deleted.
    pub fn surviving_count(&self) -> usize {
        self.deleted.iter().filter(|&&d| !d).count()
    }
}

/// Walk frames in order and produce the surviving `(frame, effective delay)`
/// sequence for re-encoding.
///
/// A deleted frame's delay is merged into the nearest preceding survivor, so
/// the animation keeps its total duration; merged delays saturate at
/// `u16::MAX` centiseconds. Deleted frames before the first survivor have no
/// prior survivor to absorb their delay, which is therefore discarded.
///
/// Fails with [`LoopcutError::EmptySequence`] when every frame is deleted.
pub fn build_encode_sequence<'a>(
    frames: &'a [CompositedFrame],
    marks: &FrameMarks,
) -> LoopcutResult<Vec<(&'a CompositedFrame, u16)>> {
    let mut sequence: Vec<(&CompositedFrame, u16)> =
        Vec::with_capacity(marks.surviving_count());
    for (index, frame) in frames.iter().enumerate() {
        if marks.is_deleted(index) {
            // Leading deleted frames have no prior survivor; their delay is
            // discarded.
            if let Some(last) = sequence.last_mut() {
                last.1 = last.1.saturating_add(frame.delay_cs);
            }
        } else {
            sequence.push((frame, frame.delay_cs));
        }
    }
    if sequence.is_empty() {
        return Err(LoopcutError::EmptySequence);
    }
    Ok(sequence)
}

/// Source-file identity used to key persisted marks.
#[derive(Clone, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct MarkKey {
    /// Source file name.
    pub name: String,
    /// Source file size in bytes.
    pub size: u64,
}

/// Injected persistence collaborator for [`FrameMarks`].
///
/// The core never performs storage I/O itself; callers supply a store that
/// keys marks by source-file identity.
pub trait MarkStore {
    /// Load previously saved marks for `key`, if any.
    fn load(&self, key: &MarkKey) -> Option<FrameMarks>;
    /// Persist `marks` under `key`, replacing any previous value.
    fn save(&mut self, key: &MarkKey, marks: &FrameMarks);
}

/// In-memory store for tests and embedding without persistence.
#[derive(Debug, Default)]
pub struct MemoryMarkStore {
    entries: HashMap<MarkKey, FrameMarks>,
}

impl MemoryMarkStore {
    /// Create an empty store.
    pub fn new() -> Self {
        Self::default()
    }
}

impl MarkStore for MemoryMarkStore {
    fn load(&self, key: &MarkKey) -> Option<FrameMarks> {
        self.entries.get(key).cloned()
    }

    fn save(&mut self, key: &MarkKey, marks: &FrameMarks) {
        self.entries.insert(key.clone(), marks.clone());
    }
}

#[cfg(test)]
#[path = "../../tests/unit/edit/marks.rs"]
mod tests;
