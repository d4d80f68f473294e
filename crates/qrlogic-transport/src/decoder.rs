// SPDX-License-Identifier: Apache-2.0
// © James Ross Ω FLYING•ROBOTS <https://github.com/flyingrobots>
//! Receiver side: session-scoped reassembly of scanned frames.
//!
//! ```text
//! Idle ──chunk──▶ Collecting ──last chunk──▶ (reassemble) ──ok──▶ Loaded
//!   ▲                 │                            │
//!   └──── reset / timeout / assembly failure ◀─────┘
//! ```
//!
//! The camera delivers frames continuously, out of order and repeatedly, so
//! every input is handled idempotently: a duplicate chunk, a frame of the
//! transfer that already loaded, or an unreadable frame leaves the state
//! untouched. Expected failures come back as [`ScanOutcome`] values; the
//! decoder never errors out of a scan.

use crate::wire::{Chunk, WireError};
use crate::SessionId;
use qrlogic_doc::{DocumentError, LogicDocument};
use std::collections::BTreeMap;
use std::time::{Duration, Instant};
use thiserror::Error;
use tracing::{debug, info, warn};

/// A collecting session with no accepted chunk for this long is abandoned.
pub const DEFAULT_SESSION_TIMEOUT: Duration = Duration::from_secs(120);

/// How far a transfer has progressed.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TransferProgress {
    /// Session being collected.
    pub session_id: SessionId,
    /// Distinct chunks stored so far.
    pub received: u32,
    /// Chunks declared by the session.
    pub total: u32,
    /// 1-based indices still outstanding, ascending.
    pub missing: Vec<u32>,
}

impl TransferProgress {
    /// True when every index has arrived.
    pub fn is_complete(&self) -> bool {
        self.missing.is_empty()
    }
}

/// Where a loaded document came from.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum LoadOrigin {
    /// Reassembled from a chunked transfer.
    Transfer {
        /// Session that carried it.
        session_id: SessionId,
        /// Number of chunks.
        total_chunks: u32,
    },
    /// A bare document in a single frame.
    Standalone,
}

/// A document that passed reassembly and validation.
#[derive(Debug, Clone, PartialEq)]
pub struct LoadedDocument {
    /// Normalized document.
    pub document: LogicDocument,
    /// Transport path it arrived by.
    pub origin: LoadOrigin,
}

/// Recoverable per-frame rejection; the session is left as it was.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ScanRejection {
    /// The chunk's data does not match its checksum (camera misread).
    #[error("chunk {chunk_index} of session {session_id} failed its checksum; rescan it")]
    ChecksumMismatch {
        /// Session the frame claims.
        session_id: SessionId,
        /// Index the frame claims.
        chunk_index: u32,
        /// The transfer being collected, if any, so a caller can show what
        /// is still missing.
        progress: Option<TransferProgress>,
    },
    /// The frame belongs to a different transfer than the one in progress.
    #[error(
        "frame belongs to session {offered} while session {active} is in progress \
         ({} of {} chunks); reset to switch",
        .progress.received,
        .progress.total
    )]
    SessionMismatch {
        /// Session being collected.
        active: SessionId,
        /// Session of the rejected frame.
        offered: SessionId,
        /// The transfer being collected.
        progress: TransferProgress,
    },
    /// Same session, but a different chunk count than first declared.
    #[error("session {session_id} declared {expected} chunks, frame claims {offered}")]
    TotalMismatch {
        /// Session being collected.
        session_id: SessionId,
        /// Count fixed by the first chunk.
        expected: u32,
        /// Count claimed by the rejected frame.
        offered: u32,
    },
}

/// Every chunk arrived intact but the joined text is not a valid document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("session {session_id}: reassembled document is invalid: {source}")]
pub struct AssemblyError {
    /// Session that was discarded.
    pub session_id: SessionId,
    /// Parse or schema failure.
    #[source]
    pub source: DocumentError,
}

/// Result of feeding one frame to the decoder.
#[derive(Debug, Clone, PartialEq)]
pub enum ScanOutcome {
    /// A new chunk was stored.
    Progress(TransferProgress),
    /// The chunk was already stored; nothing changed.
    Duplicate(TransferProgress),
    /// A document completed (last chunk, or a standalone frame).
    Loaded(LoadedDocument),
    /// The frame belongs to the document already loaded; nothing changed.
    AlreadyLoaded,
    /// The frame was refused; see the rejection for what to do.
    Rejected(ScanRejection),
    /// Reassembly failed; the session was discarded and the decoder is idle.
    AssemblyFailed(AssemblyError),
    /// Not a chunk and not a document; keep scanning.
    Ignored,
}

/// Why [`ChunkDecoder::finish`] could not produce a document.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FinishError {
    /// Nothing has been scanned since the last reset.
    #[error("no transfer in progress")]
    NoSession,
    /// Some chunks are still outstanding.
    #[error("session {session_id} is missing chunks {missing:?}")]
    Incomplete {
        /// Session being collected.
        session_id: SessionId,
        /// Outstanding 1-based indices.
        missing: Vec<u32>,
    },
}

/// Observable decoder state, without timestamps, for comparisons.
#[derive(Debug, Clone, PartialEq)]
pub enum DecoderState {
    /// No session open.
    Idle,
    /// Chunks of one session are being collected.
    Collecting(TransferProgress),
    /// A document has been loaded.
    Loaded(LoadedDocument),
}

/// One in-progress multi-chunk transfer.
#[derive(Debug, Clone)]
pub struct TransferSession {
    session_id: SessionId,
    total_chunks: u32,
    received: BTreeMap<u32, String>,
    last_activity: Instant,
}

impl TransferSession {
    fn open(chunk: &Chunk, now: Instant) -> Self {
        Self {
            session_id: chunk.session_id.clone(),
            total_chunks: chunk.total_chunks,
            received: BTreeMap::new(),
            last_activity: now,
        }
    }

    /// Session being collected.
    pub fn session_id(&self) -> &SessionId {
        &self.session_id
    }

    /// Chunk count declared by the first chunk seen.
    pub fn total_chunks(&self) -> u32 {
        self.total_chunks
    }

    /// Indices stored so far, ascending.
    pub fn received_indices(&self) -> impl Iterator<Item = u32> + '_ {
        self.received.keys().copied()
    }

    /// Progress snapshot.
    pub fn progress(&self) -> TransferProgress {
        let missing: Vec<u32> = (1..=self.total_chunks)
            .filter(|i| !self.received.contains_key(i))
            .collect();
        TransferProgress {
            session_id: self.session_id.clone(),
            received: u32::try_from(self.received.len()).unwrap_or(u32::MAX),
            total: self.total_chunks,
            missing,
        }
    }

    fn is_complete(&self) -> bool {
        self.received.len() == self.total_chunks as usize
    }

    fn is_stale(&self, now: Instant, timeout: Duration) -> bool {
        now.saturating_duration_since(self.last_activity) >= timeout
    }

    /// Concatenate stored data in index order.
    fn joined(&self) -> String {
        self.received.values().map(String::as_str).collect()
    }
}

/// Identity of the last loaded document, for duplicate-frame suppression.
/// Standalone documents are keyed on their full text.
#[derive(Debug, Clone, PartialEq, Eq)]
enum LoadKey {
    Transfer(SessionId),
    Standalone(String),
}

#[derive(Debug, Clone)]
enum Phase {
    Idle,
    Collecting(TransferSession),
    Loaded { key: LoadKey, loaded: LoadedDocument },
}

/// Reassembles logic documents from scanned frames.
#[derive(Debug, Clone)]
pub struct ChunkDecoder {
    phase: Phase,
    session_timeout: Duration,
}

impl Default for ChunkDecoder {
    fn default() -> Self {
        Self::new()
    }
}

impl ChunkDecoder {
    /// Idle decoder with the default session timeout.
    pub fn new() -> Self {
        Self {
            phase: Phase::Idle,
            session_timeout: DEFAULT_SESSION_TIMEOUT,
        }
    }

    /// Override how long a collecting session may go without a new chunk.
    pub fn with_session_timeout(mut self, timeout: Duration) -> Self {
        self.session_timeout = timeout;
        self
    }

    /// Current state (timestamp-free view).
    pub fn state(&self) -> DecoderState {
        match &self.phase {
            Phase::Idle => DecoderState::Idle,
            Phase::Collecting(session) => DecoderState::Collecting(session.progress()),
            Phase::Loaded { loaded, .. } => DecoderState::Loaded(loaded.clone()),
        }
    }

    /// The session being collected, if any.
    pub fn session(&self) -> Option<&TransferSession> {
        match &self.phase {
            Phase::Collecting(session) => Some(session),
            Phase::Idle | Phase::Loaded { .. } => None,
        }
    }

    /// Progress of the session being collected, if any.
    pub fn progress(&self) -> Option<TransferProgress> {
        self.session().map(TransferSession::progress)
    }

    /// Feed one decoded frame.
    pub fn scan(&mut self, raw: &str, now: Instant) -> ScanOutcome {
        self.expire_stale(now);
        let raw = raw.trim();
        match Chunk::from_wire(raw) {
            Ok(chunk) => self.accept_chunk(chunk, now),
            Err(WireError::NotAChunk(_)) => self.accept_standalone(raw),
            Err(err) => {
                debug!(%err, "ignoring malformed chunk frame");
                ScanOutcome::Ignored
            }
        }
    }

    /// Discard any session or loaded document. Returns false if already idle.
    pub fn reset(&mut self) -> bool {
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Idle => false,
            Phase::Collecting(session) => {
                info!(session = %session.session_id, "transfer reset");
                true
            }
            Phase::Loaded { .. } => true,
        }
    }

    /// Abandon the collecting session if it has gone quiet for longer than
    /// the timeout. Returns the discarded session id.
    pub fn expire_stale(&mut self, now: Instant) -> Option<SessionId> {
        let stale = matches!(
            &self.phase,
            Phase::Collecting(session) if session.is_stale(now, self.session_timeout)
        );
        if !stale {
            return None;
        }
        match std::mem::replace(&mut self.phase, Phase::Idle) {
            Phase::Collecting(session) => {
                warn!(
                    session = %session.session_id,
                    received = session.received.len(),
                    total = session.total_chunks,
                    "transfer abandoned after timeout"
                );
                Some(session.session_id)
            }
            other => {
                self.phase = other;
                None
            }
        }
    }

    /// The loaded document, or what is still missing.
    pub fn finish(&self) -> Result<LoadedDocument, FinishError> {
        match &self.phase {
            Phase::Idle => Err(FinishError::NoSession),
            Phase::Collecting(session) => {
                let progress = session.progress();
                Err(FinishError::Incomplete {
                    session_id: progress.session_id,
                    missing: progress.missing,
                })
            }
            Phase::Loaded { loaded, .. } => Ok(loaded.clone()),
        }
    }

    fn accept_chunk(&mut self, chunk: Chunk, now: Instant) -> ScanOutcome {
        if !chunk.verify() {
            warn!(
                session = %chunk.session_id,
                index = chunk.chunk_index,
                "chunk checksum mismatch"
            );
            return ScanOutcome::Rejected(ScanRejection::ChecksumMismatch {
                session_id: chunk.session_id,
                chunk_index: chunk.chunk_index,
                progress: self.progress(),
            });
        }

        let opens_session = match &self.phase {
            Phase::Loaded {
                key: LoadKey::Transfer(done),
                ..
            } if *done == chunk.session_id => return ScanOutcome::AlreadyLoaded,
            Phase::Collecting(_) => false,
            Phase::Idle | Phase::Loaded { .. } => true,
        };
        if opens_session {
            info!(
                session = %chunk.session_id,
                total = chunk.total_chunks,
                "transfer started"
            );
            self.phase = Phase::Collecting(TransferSession::open(&chunk, now));
        }

        let Phase::Collecting(session) = &mut self.phase else {
            return ScanOutcome::Ignored;
        };

        if session.session_id != chunk.session_id {
            warn!(
                active = %session.session_id,
                offered = %chunk.session_id,
                "frame from another transfer"
            );
            return ScanOutcome::Rejected(ScanRejection::SessionMismatch {
                active: session.session_id.clone(),
                offered: chunk.session_id,
                progress: session.progress(),
            });
        }
        if session.total_chunks != chunk.total_chunks {
            warn!(
                session = %session.session_id,
                expected = session.total_chunks,
                offered = chunk.total_chunks,
                "chunk count changed mid-transfer"
            );
            return ScanOutcome::Rejected(ScanRejection::TotalMismatch {
                session_id: chunk.session_id,
                expected: session.total_chunks,
                offered: chunk.total_chunks,
            });
        }

        session.last_activity = now;
        if session.received.contains_key(&chunk.chunk_index) {
            return ScanOutcome::Duplicate(session.progress());
        }
        session.received.insert(chunk.chunk_index, chunk.data);
        debug!(
            session = %session.session_id,
            index = chunk.chunk_index,
            received = session.received.len(),
            total = session.total_chunks,
            "chunk stored"
        );
        if !session.is_complete() {
            return ScanOutcome::Progress(session.progress());
        }
        self.assemble()
    }

    fn assemble(&mut self) -> ScanOutcome {
        let Phase::Collecting(session) = std::mem::replace(&mut self.phase, Phase::Idle) else {
            return ScanOutcome::Ignored;
        };
        match LogicDocument::from_json_str(&session.joined()) {
            Ok(document) => {
                info!(
                    session = %session.session_id,
                    name = %document.name,
                    chunks = session.total_chunks,
                    "transfer complete"
                );
                let loaded = LoadedDocument {
                    document,
                    origin: LoadOrigin::Transfer {
                        session_id: session.session_id.clone(),
                        total_chunks: session.total_chunks,
                    },
                };
                self.phase = Phase::Loaded {
                    key: LoadKey::Transfer(session.session_id),
                    loaded: loaded.clone(),
                };
                ScanOutcome::Loaded(loaded)
            }
            Err(source) => {
                warn!(
                    session = %session.session_id,
                    error = %source,
                    "reassembled document rejected; rescan from scratch"
                );
                ScanOutcome::AssemblyFailed(AssemblyError {
                    session_id: session.session_id,
                    source,
                })
            }
        }
    }

    fn accept_standalone(&mut self, raw: &str) -> ScanOutcome {
        if matches!(
            &self.phase,
            Phase::Loaded { key: LoadKey::Standalone(text), .. } if text == raw
        ) {
            return ScanOutcome::AlreadyLoaded;
        }
        let document = match LogicDocument::from_json_str(raw) {
            Ok(document) => document,
            Err(err) => {
                debug!(%err, "ignoring unreadable frame");
                return ScanOutcome::Ignored;
            }
        };
        if let Phase::Collecting(session) = &self.phase {
            info!(
                session = %session.session_id,
                "standalone document replaces transfer in progress"
            );
        }
        info!(name = %document.name, "standalone document loaded");
        let loaded = LoadedDocument {
            document,
            origin: LoadOrigin::Standalone,
        };
        self.phase = Phase::Loaded {
            key: LoadKey::Standalone(raw.to_owned()),
            loaded: loaded.clone(),
        };
        ScanOutcome::Loaded(loaded)
    }
}

#[cfg(test)]
#[allow(clippy::expect_used, clippy::unwrap_used, clippy::panic)]
mod tests {
    use super::*;
    use crate::{checksum, ChunkEncoder};

    const HOT: &str = r#"{"name":"X","triggers":[{"sensor":"temperature","operator":">","value":30}],"actions":[{"type":"log","payload":{"message":"hot"}}]}"#;

    fn frames(budget: usize) -> (SessionId, Vec<String>) {
        let doc = LogicDocument::from_json_str(HOT).unwrap();
        let encoded = ChunkEncoder::new(budget).encode(&doc).unwrap();
        (encoded.session_id.clone(), encoded.frames())
    }

    #[test]
    fn single_chunk_loads_immediately() {
        let (sid, frames) = frames(250);
        assert_eq!(frames.len(), 1);
        let mut decoder = ChunkDecoder::new();
        let ScanOutcome::Loaded(loaded) = decoder.scan(&frames[0], Instant::now()) else {
            panic!("expected load");
        };
        assert_eq!(loaded.document.name, "X");
        assert_eq!(
            loaded.origin,
            LoadOrigin::Transfer {
                session_id: sid,
                total_chunks: 1
            }
        );
    }

    #[test]
    fn out_of_order_with_duplicates_reassembles() {
        let (sid, frames) = frames(50);
        assert_eq!(frames.len(), 3);
        let now = Instant::now();
        let mut decoder = ChunkDecoder::new();

        let ScanOutcome::Progress(p) = decoder.scan(&frames[1], now) else {
            panic!("expected progress");
        };
        assert_eq!(p.missing, vec![1, 3]);
        assert!(matches!(decoder.scan(&frames[0], now), ScanOutcome::Progress(_)));
        assert_eq!(
            decoder.scan(&frames[0], now),
            ScanOutcome::Duplicate(TransferProgress {
                session_id: sid,
                received: 2,
                total: 3,
                missing: vec![3],
            })
        );
        let ScanOutcome::Loaded(loaded) = decoder.scan(&frames[2], now) else {
            panic!("expected load");
        };
        assert_eq!(loaded.document.to_canonical_json(), HOT);
        assert_eq!(decoder.scan(&frames[0], now), ScanOutcome::AlreadyLoaded);
    }

    #[test]
    fn other_session_is_rejected_until_reset() {
        let (a, frames_a) = frames(50);
        let (b, frames_b) = frames(50);
        let now = Instant::now();
        let mut decoder = ChunkDecoder::new();
        decoder.scan(&frames_a[0], now);
        assert_eq!(
            decoder.scan(&frames_b[1], now),
            ScanOutcome::Rejected(ScanRejection::SessionMismatch {
                active: a.clone(),
                offered: b.clone(),
                progress: TransferProgress {
                    session_id: a,
                    received: 1,
                    total: 3,
                    missing: vec![2, 3],
                },
            })
        );
        assert!(decoder.reset());
        let ScanOutcome::Progress(p) = decoder.scan(&frames_b[1], now) else {
            panic!("expected progress");
        };
        assert_eq!(p.session_id, b);
    }

    #[test]
    fn corrupt_chunk_is_rejected_and_rescan_recovers() {
        let (sid, frames) = frames(50);
        let now = Instant::now();
        let mut chunk = Chunk::from_wire(&frames[0]).unwrap();
        chunk.data.replace_range(0..1, "[");
        let mut decoder = ChunkDecoder::new();
        assert_eq!(
            decoder.scan(&chunk.to_wire(), now),
            ScanOutcome::Rejected(ScanRejection::ChecksumMismatch {
                session_id: sid.clone(),
                chunk_index: 1,
                progress: None,
            })
        );
        assert_eq!(decoder.state(), DecoderState::Idle);
        assert!(matches!(decoder.scan(&frames[0], now), ScanOutcome::Progress(_)));

        // Once collecting, a rejection carries what is still missing.
        let mut chunk = Chunk::from_wire(&frames[2]).unwrap();
        chunk.data.replace_range(0..1, "[");
        let ScanOutcome::Rejected(rejection) = decoder.scan(&chunk.to_wire(), now) else {
            panic!("expected a rejection");
        };
        assert_eq!(
            rejection,
            ScanRejection::ChecksumMismatch {
                session_id: sid.clone(),
                chunk_index: 3,
                progress: Some(TransferProgress {
                    session_id: sid,
                    received: 1,
                    total: 3,
                    missing: vec![2, 3],
                }),
            }
        );
    }

    #[test]
    fn session_mismatch_message_reports_progress() {
        let (_, frames_a) = frames(50);
        let (_, frames_b) = frames(50);
        let now = Instant::now();
        let mut decoder = ChunkDecoder::new();
        decoder.scan(&frames_a[0], now);
        decoder.scan(&frames_a[2], now);
        let ScanOutcome::Rejected(rejection) = decoder.scan(&frames_b[0], now) else {
            panic!("expected a rejection");
        };
        assert!(rejection.to_string().contains("(2 of 3 chunks)"), "{rejection}");
    }

    #[test]
    fn total_is_fixed_by_first_chunk() {
        let sid = SessionId::from("s-1");
        let now = Instant::now();
        let mut decoder = ChunkDecoder::new();
        let first = Chunk::new(sid.clone(), 1, 3, "{".into());
        let liar = Chunk::new(sid.clone(), 2, 4, "}".into());
        decoder.scan(&first.to_wire(), now);
        assert_eq!(
            decoder.scan(&liar.to_wire(), now),
            ScanOutcome::Rejected(ScanRejection::TotalMismatch {
                session_id: sid,
                expected: 3,
                offered: 4,
            })
        );
    }

    #[test]
    fn invalid_assembly_resets_to_idle() {
        let sid = SessionId::from("s-2");
        let now = Instant::now();
        let mut decoder = ChunkDecoder::new();
        decoder.scan(&Chunk::new(sid.clone(), 1, 2, r#"{"name":"#.into()).to_wire(), now);
        let outcome = decoder.scan(&Chunk::new(sid.clone(), 2, 2, r#""x"}"#.into()).to_wire(), now);
        let ScanOutcome::AssemblyFailed(err) = outcome else {
            panic!("expected assembly failure");
        };
        assert_eq!(err.session_id, sid);
        assert_eq!(
            err.source,
            DocumentError::Missing {
                path: "triggers".into()
            }
        );
        assert_eq!(decoder.state(), DecoderState::Idle);
    }

    #[test]
    fn garbage_is_ignored_without_disturbing_the_session() {
        let (_, frames) = frames(50);
        let now = Instant::now();
        let mut decoder = ChunkDecoder::new();
        decoder.scan(&frames[0], now);
        let before = decoder.state();
        assert_eq!(decoder.scan("WIFI:S:home;;", now), ScanOutcome::Ignored);
        assert_eq!(decoder.scan("", now), ScanOutcome::Ignored);
        assert_eq!(
            decoder.scan(
                r#"{"sessionId":"z","chunkIndex":5,"totalChunks":2,"data":"","checksum":"0"}"#,
                now
            ),
            ScanOutcome::Ignored
        );
        assert_eq!(decoder.state(), before);
    }

    #[test]
    fn standalone_document_bypasses_chunking() {
        let now = Instant::now();
        let mut decoder = ChunkDecoder::new();
        let ScanOutcome::Loaded(loaded) = decoder.scan(HOT, now) else {
            panic!("expected load");
        };
        assert_eq!(loaded.origin, LoadOrigin::Standalone);
        assert_eq!(decoder.scan(HOT, now), ScanOutcome::AlreadyLoaded);
    }

    #[test]
    fn colliding_standalone_documents_both_load() {
        // "Aa" and "BB" share a 31-multiplier hash, so these texts share a checksum.
        let first = HOT.replace(r#""name":"X""#, r#""name":"Aa""#);
        let second = HOT.replace(r#""name":"X""#, r#""name":"BB""#);
        assert_eq!(checksum::checksum(&first), checksum::checksum(&second));

        let now = Instant::now();
        let mut decoder = ChunkDecoder::new();
        assert!(matches!(decoder.scan(&first, now), ScanOutcome::Loaded(_)));
        let ScanOutcome::Loaded(loaded) = decoder.scan(&second, now) else {
            panic!("a different document must load");
        };
        assert_eq!(loaded.document.name, "BB");
        assert_eq!(decoder.scan(&second, now), ScanOutcome::AlreadyLoaded);
    }

    #[test]
    fn finish_reports_missing_indices() {
        let (sid, frames) = frames(50);
        let now = Instant::now();
        let mut decoder = ChunkDecoder::new();
        assert_eq!(decoder.finish(), Err(FinishError::NoSession));
        decoder.scan(&frames[1], now);
        assert_eq!(
            decoder.finish(),
            Err(FinishError::Incomplete {
                session_id: sid,
                missing: vec![1, 3],
            })
        );
        decoder.scan(&frames[0], now);
        decoder.scan(&frames[2], now);
        assert_eq!(decoder.finish().unwrap().document.name, "X");
    }

    #[test]
    fn quiet_sessions_expire() {
        let (sid, frames) = frames(50);
        let start = Instant::now();
        let mut decoder = ChunkDecoder::new().with_session_timeout(Duration::from_secs(5));
        decoder.scan(&frames[0], start);
        assert_eq!(decoder.expire_stale(start + Duration::from_secs(4)), None);
        assert_eq!(
            decoder.expire_stale(start + Duration::from_secs(5)),
            Some(sid)
        );
        assert_eq!(decoder.state(), DecoderState::Idle);

        // A late frame after abandonment opens a fresh session.
        decoder.scan(&frames[0], start);
        let ScanOutcome::Progress(p) = decoder.scan(&frames[1], start + Duration::from_secs(60))
        else {
            panic!("expected progress");
        };
        assert_eq!(p.missing, vec![1, 3]);
    }

    #[test]
    fn reset_is_idempotent() {
        let mut decoder = ChunkDecoder::new();
        assert!(!decoder.reset());
        assert!(!decoder.reset());
        assert_eq!(decoder.state(), DecoderState::Idle);
    }
}
