// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Chunked QR transport for logic documents.
//!
//! The sender splits a document's canonical JSON into checksummed chunks
//! ([`ChunkEncoder`]), one per QR code. The receiver feeds every decoded
//! frame into a [`ChunkDecoder`], in any order and as often as the camera
//! delivers it, until the document reassembles.
//!
//! Two independent integrity layers: per-chunk checksums catch misreads,
//! session ids keep two documents' chunks from mixing.

pub use qrlogic_doc::{DocumentError, LogicDocument};
use serde::{Deserialize, Serialize};
use std::fmt;

pub mod checksum;
mod decoder;
mod encoder;
pub mod wire;

#[cfg(test)]
mod integrity_tests;

pub use decoder::{
    AssemblyError, ChunkDecoder, DecoderState, FinishError, LoadOrigin, LoadedDocument,
    ScanOutcome, ScanRejection, TransferProgress, TransferSession, DEFAULT_SESSION_TIMEOUT,
};
pub use encoder::{
    ChunkEncoder, EncodeError, EncodedTransfer, Sizing, DEFAULT_CHUNK_BUDGET,
    DEFAULT_MIN_CHUNK_SIZE, MAX_CHUNKS,
};
pub use wire::{Chunk, WireError};

/// Opaque token correlating every chunk of one encode call.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(transparent)]
pub struct SessionId(String);

impl SessionId {
    /// Fresh random (UUID v4) session id.
    pub fn generate() -> Self {
        Self(uuid::Uuid::new_v4().to_string())
    }

    /// Borrow the raw token.
    pub fn as_str(&self) -> &str {
        &self.0
    }
}

impl fmt::Display for SessionId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.0)
    }
}

impl From<&str> for SessionId {
    fn from(s: &str) -> Self {
        Self(s.to_owned())
    }
}

impl From<String> for SessionId {
    fn from(s: String) -> Self {
        Self(s)
    }
}
