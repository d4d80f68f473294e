// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Helpers for producing, shuffling and damaging chunk frames.

use qrlogic_doc::LogicDocument;
use qrlogic_transport::{Chunk, ChunkEncoder, EncodeError, EncodedTransfer};
use rand::rngs::StdRng;
use rand::seq::SliceRandom;
use rand::SeedableRng;

/// Encode `document` at `budget` under a fresh session.
pub fn encode_frames(
    document: &LogicDocument,
    budget: usize,
) -> Result<EncodedTransfer, EncodeError> {
    ChunkEncoder::new(budget).encode(document)
}

/// `frames` in a seeded pseudo-random order.
pub fn permuted(frames: &[String], seed: u64) -> Vec<String> {
    let mut out = frames.to_vec();
    out.shuffle(&mut StdRng::seed_from_u64(seed));
    out
}

/// Re-serialize `frame` with the character at `position` of its data
/// replaced, keeping the original checksum. `None` if `frame` is not a
/// chunk or `position` is past the end of its data.
pub fn corrupt_frame(frame: &str, position: usize) -> Option<String> {
    let mut chunk = Chunk::from_wire(frame).ok()?;
    let (start, c) = chunk.data.char_indices().nth(position)?;
    let replacement = if c == '#' { "%" } else { "#" };
    chunk
        .data
        .replace_range(start..start + c.len_utf8(), replacement);
    Some(chunk.to_wire())
}
