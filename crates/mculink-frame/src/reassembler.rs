use bytes::{Buf, BytesMut};
use tracing::{debug, warn};

use crate::codec::{try_decode, Decoded, Frame};

/// Carry-buffer capacity: bytes not yet resolved into a frame are held
/// across reads, never more than this.
pub const BUFFER_CAPACITY: usize = 2048;

/// Counters for recoverable protocol events.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ReassemblerStats {
    /// Checksum-valid frames extracted.
    pub frames: u64,
    /// Well-formed headers whose payload failed the checksum.
    pub corrupt_frames: u64,
    /// Garbage bytes stepped over during resynchronization.
    pub resync_bytes: u64,
    /// Times the carry buffer was reset because an append would overflow it.
    pub overflow_resets: u64,
}

/// Converts arbitrarily-chunked, possibly garbled reads into whole frames.
///
/// Bytes left over after a scan (a frame split across reads) are carried to
/// the next [`push`](Reassembler::push). Garbage on the link is stepped over
/// one byte at a time until a valid header lines up again; no input, however
/// malformed, produces an error or unbounded growth.
pub struct Reassembler {
    buf: BytesMut,
    capacity: usize,
    stats: ReassemblerStats,
}

impl Default for Reassembler {
    fn default() -> Self {
        Self::new()
    }
}

impl Reassembler {
    /// Create a reassembler with the default carry-buffer capacity.
    pub fn new() -> Self {
        Self::with_capacity(BUFFER_CAPACITY)
    }

    /// Create a reassembler with an explicit carry-buffer capacity.
    pub fn with_capacity(capacity: usize) -> Self {
        Self {
            buf: BytesMut::with_capacity(capacity),
            capacity,
            stats: ReassemblerStats::default(),
        }
    }

    /// Feed one read's worth of bytes; returns the frames completed by it,
    /// in arrival order.
    pub fn push(&mut self, chunk: &[u8]) -> Vec<Frame> {
        if self.buf.len() + chunk.len() > self.capacity {
            // Bounded-memory policy: drop carried bytes and the incoming
            // chunk alike rather than grow without limit.
            warn!(
                buffered = self.buf.len(),
                incoming = chunk.len(),
                capacity = self.capacity,
                "carry buffer overflow, discarding buffered data"
            );
            self.buf.clear();
            self.stats.overflow_resets += 1;
            return Vec::new();
        }
        self.buf.extend_from_slice(chunk);

        let mut frames = Vec::new();
        let mut pos = 0usize;
        while pos < self.buf.len() {
            match try_decode(&self.buf[pos..]) {
                Decoded::Frame { frame, consumed } => {
                    debug!(id = frame.id, len = frame.payload.len(), "frame decoded");
                    self.stats.frames += 1;
                    frames.push(frame);
                    pos += consumed;
                }
                Decoded::Incomplete => break,
                Decoded::NotAFrame => {
                    self.stats.resync_bytes += 1;
                    pos += 1;
                }
                Decoded::Corrupt { skip } => {
                    warn!(skipped = skip, "frame checksum mismatch, unit dropped");
                    self.stats.corrupt_frames += 1;
                    pos += skip;
                }
            }
        }

        self.buf.advance(pos);
        frames
    }

    /// Bytes currently carried over awaiting more data.
    pub fn buffered(&self) -> usize {
        self.buf.len()
    }

    /// Event counters since construction.
    pub fn stats(&self) -> ReassemblerStats {
        self.stats
    }
}
