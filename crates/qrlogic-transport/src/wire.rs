// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Chunk wire unit and its JSON framing.
//!
//! One chunk per QR code:
//!
//! ```text
//! {"sessionId":"<uuid-v4>","chunkIndex":1,"totalChunks":3,"data":"<slice>","checksum":"<base36>"}
//! ```
//!
//! * `chunkIndex` is 1-based and never exceeds `totalChunks`
//! * `checksum` covers `data` only (see [`crate::checksum`])
//! * single-chunk documents still use this framing (`1` of `1`)

use crate::checksum;
use crate::{SessionId, MAX_CHUNKS};
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Decoding failure for a scanned frame.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum WireError {
    /// The frame is not chunk-shaped JSON (it may still be a bare document).
    #[error("not a chunk: {0}")]
    NotAChunk(String),
    /// Chunk-shaped, but the index/total pair is impossible.
    #[error("chunk index {index} out of range 1..={total}")]
    IndexOutOfRange {
        /// Declared 1-based index.
        index: u32,
        /// Declared total.
        total: u32,
    },
    /// Declares more chunks than any encoder emits.
    #[error("chunk total {0} exceeds the supported maximum")]
    TotalOutOfRange(u32),
}

/// One transport unit: a slice of the serialized document plus integrity metadata.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct Chunk {
    /// Correlates every chunk of one encode call.
    pub session_id: SessionId,
    /// 1-based position of `data` in the document.
    pub chunk_index: u32,
    /// Number of chunks in the session.
    pub total_chunks: u32,
    /// Slice of the serialized document.
    pub data: String,
    /// Checksum of `data`.
    pub checksum: String,
}

impl Chunk {
    /// Build a chunk, computing its checksum.
    pub fn new(session_id: SessionId, chunk_index: u32, total_chunks: u32, data: String) -> Self {
        let checksum = checksum::checksum(&data);
        Self {
            session_id,
            chunk_index,
            total_chunks,
            data,
            checksum,
        }
    }

    /// True when `checksum` matches `data`.
    pub fn verify(&self) -> bool {
        checksum::verify(&self.data, &self.checksum)
    }

    /// Serialize to the string rendered into one QR code.
    pub fn to_wire(&self) -> String {
        // Plain strings and integers; serialization cannot fail.
        serde_json::to_string(self).unwrap_or_default()
    }

    /// Parse a scanned string. Does not verify the checksum.
    pub fn from_wire(raw: &str) -> Result<Self, WireError> {
        let chunk: Chunk =
            serde_json::from_str(raw).map_err(|e| WireError::NotAChunk(e.to_string()))?;
        if chunk.total_chunks > MAX_CHUNKS {
            return Err(WireError::TotalOutOfRange(chunk.total_chunks));
        }
        if chunk.chunk_index == 0 || chunk.chunk_index > chunk.total_chunks {
            return Err(WireError::IndexOutOfRange {
                index: chunk.chunk_index,
                total: chunk.total_chunks,
            });
        }
        Ok(chunk)
    }
}

/// Bytes `c` occupies once escaped inside a JSON string literal.
pub(crate) fn escaped_width(c: char) -> usize {
    match c {
        '"' | '\\' | '\u{08}' | '\u{0c}' | '\n' | '\r' | '\t' => 2,
        c if (c as u32) < 0x20 => 6,
        c => c.len_utf8(),
    }
}
