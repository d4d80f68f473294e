// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Sender side: split a document into budget-sized chunk frames.

use crate::wire::{escaped_width, Chunk};
use crate::SessionId;
use qrlogic_doc::LogicDocument;
use thiserror::Error;
use tracing::debug;

/// Default per-frame budget in bytes; keeps a QR code reliably scannable.
pub const DEFAULT_CHUNK_BUDGET: usize = 250;
/// Default lower bound on the data carried per chunk.
pub const DEFAULT_MIN_CHUNK_SIZE: usize = 50;
/// Upper bound on chunks per session (indices stay within three digits).
pub const MAX_CHUNKS: u32 = 999;

/// Width of the placeholder session id used to measure framing overhead.
const SAMPLE_SESSION_ID_LEN: usize = 36;
/// Placeholder checksum; real tokens are at most six base36 digits.
const SAMPLE_CHECKSUM: &str = "zzzzzzz";

/// Encoding failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum EncodeError {
    /// The document needs more chunks than one session can index.
    #[error("document needs {needed} chunks, at most {max} are supported")]
    TooManyChunks {
        /// Chunks the document would need at the current budget.
        needed: usize,
        /// [`MAX_CHUNKS`].
        max: u32,
    },
}

/// Output of one encode call: every chunk of a single session, in index order.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct EncodedTransfer {
    /// Session shared by all chunks.
    pub session_id: SessionId,
    /// Chunks ordered by `chunk_index` (1..=n).
    pub chunks: Vec<Chunk>,
}

impl EncodedTransfer {
    /// Wire strings, one per QR code, in index order.
    pub fn frames(&self) -> Vec<String> {
        self.chunks.iter().map(Chunk::to_wire).collect()
    }

    /// Number of chunks.
    pub fn len(&self) -> usize {
        self.chunks.len()
    }

    /// Always false; an encode call emits at least one chunk.
    pub fn is_empty(&self) -> bool {
        self.chunks.is_empty()
    }
}

/// How a slice's size is counted against the effective chunk size.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum Sizing {
    /// One unit per character of the serialized document, so
    /// `chunks = ceil(chars / effective_size)`. JSON escaping inside the
    /// `data` field is not counted.
    #[default]
    Characters,
    /// Bytes the slice occupies once escaped into the frame; a frame never
    /// exceeds the budget unless the minimum chunk size overrides it.
    WireBytes,
}

/// Splits documents into chunk frames sized against a fixed budget.
///
/// The framing overhead is measured, not estimated: a worst-case chunk
/// (36-character session id, three-digit index and total, seven-character
/// checksum, empty data) is serialized and its length subtracted from the
/// budget. Slices are always cut on `char` boundaries.
#[derive(Debug, Clone, Copy)]
pub struct ChunkEncoder {
    budget: usize,
    min_chunk_size: usize,
    sizing: Sizing,
}

impl Default for ChunkEncoder {
    fn default() -> Self {
        Self::new(DEFAULT_CHUNK_BUDGET)
    }
}

impl ChunkEncoder {
    /// Encoder with the given per-frame byte budget.
    ///
    /// Sizing defaults to [`Sizing::Characters`], which counts each
    /// character once. Quotes and backslashes in the document escape to two
    /// bytes inside the frame, so quote-heavy documents can produce frames
    /// longer than `budget`. Use [`Sizing::WireBytes`] when the budget is a
    /// hard limit.
    pub fn new(budget: usize) -> Self {
        Self {
            budget,
            min_chunk_size: DEFAULT_MIN_CHUNK_SIZE,
            sizing: Sizing::Characters,
        }
    }

    /// Choose how slice sizes are counted.
    pub fn with_sizing(mut self, sizing: Sizing) -> Self {
        self.sizing = sizing;
        self
    }

    /// Override the data floor used when the budget cannot cover the overhead.
    pub fn with_min_chunk_size(mut self, min_chunk_size: usize) -> Self {
        self.min_chunk_size = min_chunk_size.max(1);
        self
    }

    /// Per-frame byte budget.
    pub fn budget(&self) -> usize {
        self.budget
    }

    /// Measured framing overhead for frames of `session_id`.
    pub fn overhead(&self, session_id: &SessionId) -> usize {
        let id_len = session_id.as_str().len().max(SAMPLE_SESSION_ID_LEN);
        let sample = Chunk {
            session_id: SessionId::from("f".repeat(id_len)),
            chunk_index: MAX_CHUNKS,
            total_chunks: MAX_CHUNKS,
            data: String::new(),
            checksum: SAMPLE_CHECKSUM.to_owned(),
        };
        sample.to_wire().len()
    }

    /// Data units carried per chunk: `max(floor, budget - overhead)`.
    pub fn effective_chunk_size(&self, session_id: &SessionId) -> usize {
        self.budget
            .saturating_sub(self.overhead(session_id))
            .max(self.min_chunk_size)
    }

    /// Encode a document under a fresh session id.
    pub fn encode(&self, document: &LogicDocument) -> Result<EncodedTransfer, EncodeError> {
        self.encode_text(&document.to_canonical_json(), SessionId::generate())
    }

    /// Encode already-serialized text under the given session id.
    pub fn encode_text(
        &self,
        text: &str,
        session_id: SessionId,
    ) -> Result<EncodedTransfer, EncodeError> {
        let size = self.effective_chunk_size(&session_id);
        let slices = match self.sizing {
            Sizing::Characters => split_by(text, size, |_| 1),
            Sizing::WireBytes => split_by(text, size, escaped_width),
        };
        let total = u32::try_from(slices.len())
            .ok()
            .filter(|n| *n <= MAX_CHUNKS)
            .ok_or(EncodeError::TooManyChunks {
                needed: slices.len(),
                max: MAX_CHUNKS,
            })?;

        let chunks = (1..=total)
            .zip(slices)
            .map(|(index, data)| Chunk::new(session_id.clone(), index, total, data.to_owned()))
            .collect();
        debug!(
            session = %session_id,
            total,
            chunk_size = size,
            text_len = text.len(),
            "encoded transfer"
        );
        Ok(EncodedTransfer { session_id, chunks })
    }
}

/// Cut `text` into slices whose summed `width` stays within `size`.
/// Always yields at least one slice (empty text gives one empty slice).
fn split_by(text: &str, size: usize, width_of: impl Fn(char) -> usize) -> Vec<&str> {
    let mut out = Vec::new();
    let mut start = 0;
    let mut width = 0;
    for (i, c) in text.char_indices() {
        let w = width_of(c);
        if width + w > size && i > start {
            out.push(&text[start..i]);
            start = i;
            width = 0;
        }
        width += w;
    }
    out.push(&text[start..]);
    out
}
