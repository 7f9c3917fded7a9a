#![forbid(unsafe_code)]

//! Scroll position snapshots.
//!
//! A [`SavedState`] is one anchor point (the first visible item and where
//! it sat) and is enough to rebuild the window after the host tears the
//! engine down. It is captured on teardown, handed back through
//! [`TimetableLayout::restore_state`](crate::TimetableLayout::restore_state),
//! and consumed by exactly one layout pass.
//!
//! # Encoding
//!
//! [`SavedState::encode`] produces three little-endian `i32`s
//! (`item_index`, `left`, `top`), 12 bytes. With the `state-persistence`
//! feature the snapshot can also be written as JSON.

use std::fmt;

use timetable_core::geometry::Viewport;

use crate::pool::MaterializedSet;

// ─────────────────────────────────────────────────────────────────────────────
// Errors
// ─────────────────────────────────────────────────────────────────────────────

/// Failure to decode a persisted snapshot.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum StateError {
    /// Fewer than [`SavedState::ENCODED_LEN`] bytes were supplied.
    Truncated { len: usize },
    /// The encoded item index is negative.
    NegativeItemIndex(i32),
    /// JSON encode/decode failure.
    #[cfg(feature = "state-persistence")]
    Serialization(String),
}

impl fmt::Display for StateError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            StateError::Truncated { len } => write!(
                f,
                "saved state truncated: expected {} bytes, got {len}",
                SavedState::ENCODED_LEN
            ),
            StateError::NegativeItemIndex(v) => write!(f, "saved item index is negative: {v}"),
            #[cfg(feature = "state-persistence")]
            StateError::Serialization(msg) => write!(f, "serialization error: {msg}"),
        }
    }
}

impl std::error::Error for StateError {}

// ─────────────────────────────────────────────────────────────────────────────
// SavedState
// ─────────────────────────────────────────────────────────────────────────────

/// The first visible item and its laid-out offsets.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct SavedState {
    pub item_index: usize,
    /// Left edge of the item, in viewport pixels.
    pub left: i32,
    /// Top edge of the item, in viewport pixels.
    pub top: i32,
}

impl SavedState {
    /// Size of [`encode`](Self::encode)'s output.
    pub const ENCODED_LEN: usize = 12;

    #[must_use]
    pub const fn new(item_index: usize, left: i32, top: i32) -> Self {
        Self {
            item_index,
            left,
            top,
        }
    }

    /// Pick the first visible item of a window: among items whose left
    /// edge is at or before the padded left edge, the one with the smallest
    /// top. Ties go to the lower item index.
    pub(crate) fn capture<H>(items: &MaterializedSet<H>, viewport: &Viewport) -> Option<Self> {
        let parent_left = viewport.parent_left();
        items
            .iter()
            .filter(|item| item.rect.left() <= parent_left)
            .min_by_key(|item| (item.rect.top(), item.item_index))
            .map(|item| Self::new(item.item_index, item.rect.left(), item.rect.top()))
    }

    /// Fixed 12-byte little-endian form.
    ///
    /// Item indices beyond `i32::MAX` saturate; such a snapshot restores to
    /// an out-of-range index and falls back to an initial layout.
    #[must_use]
    pub fn encode(&self) -> [u8; Self::ENCODED_LEN] {
        let index = i32::try_from(self.item_index).unwrap_or(i32::MAX);
        let mut out = [0u8; Self::ENCODED_LEN];
        out[0..4].copy_from_slice(&index.to_le_bytes());
        out[4..8].copy_from_slice(&self.left.to_le_bytes());
        out[8..12].copy_from_slice(&self.top.to_le_bytes());
        out
    }

    /// Inverse of [`encode`](Self::encode). Trailing bytes are ignored.
    pub fn decode(bytes: &[u8]) -> Result<Self, StateError> {
        let Some(head) = bytes.get(..Self::ENCODED_LEN) else {
            return Err(StateError::Truncated { len: bytes.len() });
        };
        let read = |at: usize| {
            let mut word = [0u8; 4];
            word.copy_from_slice(&head[at..at + 4]);
            i32::from_le_bytes(word)
        };
        let index = read(0);
        let item_index =
            usize::try_from(index).map_err(|_| StateError::NegativeItemIndex(index))?;
        Ok(Self::new(item_index, read(4), read(8)))
    }

    #[cfg(feature = "state-persistence")]
    pub fn to_json(&self) -> Result<String, StateError> {
        serde_json::to_string(self)
            .map_err(|e| StateError::Serialization(format!("failed to serialize state: {e}")))
    }

    #[cfg(feature = "state-persistence")]
    pub fn from_json(json: &str) -> Result<Self, StateError> {
        serde_json::from_str(json)
            .map_err(|e| StateError::Serialization(format!("failed to parse state: {e}")))
    }
}

// ─────────────────────────────────────────────────────────────────────────────
// StateStore
// ─────────────────────────────────────────────────────────────────────────────

/// Single-slot holder for a snapshot waiting to be consumed.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct StateStore {
    pending: Option<SavedState>,
}

impl StateStore {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Replace any pending snapshot.
    pub fn stash(&mut self, state: SavedState) {
        if let Some(previous) = self.pending.replace(state) {
            tracing::debug!(?previous, "replacing unconsumed saved state");
        }
    }

    /// Consume the pending snapshot.
    pub fn take(&mut self) -> Option<SavedState> {
        self.pending.take()
    }

    #[inline]
    pub fn peek(&self) -> Option<&SavedState> {
        self.pending.as_ref()
    }

    pub fn discard(&mut self) {
        self.pending = None;
    }

    #[inline]
    pub fn is_pending(&self) -> bool {
        self.pending.is_some()
    }
}
