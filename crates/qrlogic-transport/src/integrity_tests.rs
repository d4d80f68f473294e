// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Integrity drills for the chunk transport.

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use crate::*;
    use rand::prelude::*;
    use std::time::Instant;

    const DOC: &str = r##"{"name":"Greenhouse","triggers":[{"kind":"all","conditions":[{"sensor":"temperature","operator":">","value":28},{"sensor":"light","operator":">","value":600}]},{"sensor":"motion","operator":"=","value":true}],"actions":[{"type":"toggle","payload":{"device":"fan","state":"on"}},{"type":"flashBackground","payload":{"color":"#ff0000","message":"Intruder","duration":1500}}]}"##;

    fn transfer(budget: usize) -> EncodedTransfer {
        let doc = LogicDocument::from_json_str(DOC).unwrap();
        ChunkEncoder::new(budget).encode(&doc).unwrap()
    }

    /// DRILL: Single-character corruption
    ///
    /// Every position of every chunk's data, flipped, must be rejected.
    #[test]
    fn drill_every_single_char_flip_is_caught() {
        let encoded = transfer(170);
        assert!(encoded.len() > 1);
        let now = Instant::now();
        for chunk in &encoded.chunks {
            for (pos, c) in chunk.data.char_indices() {
                let mut bad = chunk.clone();
                let replacement = if c == 'x' { "y" } else { "x" };
                bad.data.replace_range(pos..pos + c.len_utf8(), replacement);
                let mut decoder = ChunkDecoder::new();
                assert!(
                    matches!(
                        decoder.scan(&bad.to_wire(), now),
                        ScanOutcome::Rejected(ScanRejection::ChecksumMismatch { .. })
                    ),
                    "flip at {pos} of chunk {} slipped through",
                    chunk.chunk_index
                );
                assert_eq!(decoder.state(), DecoderState::Idle);
            }
        }
    }

    /// DRILL: Interleaved sessions
    ///
    /// Two encodings of the same document: once one session is collecting,
    /// every frame of the other is refused, and the load that eventually
    /// happens is attributed to the first session only.
    #[test]
    fn drill_interleaved_sessions_never_merge() {
        let a = transfer(170);
        let b = transfer(170);
        assert_ne!(a.session_id, b.session_id);
        let (frames_a, frames_b) = (a.frames(), b.frames());
        let now = Instant::now();
        let mut decoder = ChunkDecoder::new();

        let ScanOutcome::Progress(progress) = decoder.scan(&frames_b[0], now) else {
            panic!("first frame of b should open a session");
        };
        for frame in &frames_a {
            assert_eq!(
                decoder.scan(frame, now),
                ScanOutcome::Rejected(ScanRejection::SessionMismatch {
                    active: b.session_id.clone(),
                    offered: a.session_id.clone(),
                    progress: progress.clone(),
                })
            );
        }
        let mut last = ScanOutcome::Ignored;
        for frame in &frames_b[1..] {
            last = decoder.scan(frame, now);
        }
        let ScanOutcome::Loaded(loaded) = last else {
            panic!("session b should complete");
        };
        assert_eq!(
            loaded.origin,
            LoadOrigin::Transfer {
                session_id: b.session_id.clone(),
                total_chunks: u32::try_from(b.len()).unwrap(),
            }
        );
    }

    /// DRILL: Decoder fuzzer
    ///
    /// Random strings, truncated frames, spliced frames and genuine frames
    /// in random order must never panic.
    #[test]
    fn drill_decoder_fuzzer() {
        let mut rng = StdRng::seed_from_u64(42);
        let encoded = transfer(170);
        let frames = encoded.frames();
        let now = Instant::now();
        let mut decoder = ChunkDecoder::new();

        for _ in 0..2000 {
            let frame = &frames[rng.gen_range(0..frames.len())];
            let input: String = match rng.gen_range(0..4) {
                0 => (0..rng.gen_range(0..64))
                    .map(|_| char::from(rng.gen_range(0x20u8..0x7f)))
                    .collect(),
                1 => {
                    let cut = rng.gen_range(0..frame.len());
                    frame.get(..cut).unwrap_or_default().to_owned()
                }
                2 => {
                    let other = &frames[rng.gen_range(0..frames.len())];
                    let cut = rng.gen_range(0..frame.len().min(other.len()));
                    format!(
                        "{}{}",
                        frame.get(..cut).unwrap_or_default(),
                        other.get(cut..).unwrap_or_default()
                    )
                }
                _ => frame.clone(),
            };
            let _ = decoder.scan(&input, now);
        }
    }
}
