use bytes::{BufMut, Bytes, BytesMut};

use crate::error::{FrameError, Result};

/// Frame header: magic (4) + length (4) + id (1) + checksum (1) = 10 bytes.
pub const HEADER_SIZE: usize = 10;

/// Magic sentinel marking the start of a frame header.
///
/// The big-endian serialization of `0x55443322`. Pinned to network order
/// unconditionally so both ends interoperate regardless of host endianness.
pub const MAGIC: [u8; 4] = [0x55, 0x44, 0x33, 0x22];

/// Largest payload a frame may carry.
///
/// A frame must fit the reassembly carry buffer in one piece, so a declared
/// length above this can never complete and is treated as a false header.
pub const MAX_PAYLOAD: usize = crate::reassembler::BUFFER_CAPACITY - HEADER_SIZE;

/// A framed message routed to one capability.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Frame {
    /// The capability this message is addressed to.
    pub id: u8,
    /// The message payload, opaque to the framing layer.
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(id: u8, payload: impl Into<Bytes>) -> Self {
        Self {
            id,
            payload: payload.into(),
        }
    }

    /// The total wire size of this frame (header + payload).
    pub fn wire_size(&self) -> usize {
        HEADER_SIZE + self.payload.len()
    }
}

/// XOR-fold checksum over a payload.
///
/// The first byte seeds the fold; each subsequent byte is XORed in. The
/// empty payload folds to 0 by definition. Header fields are never covered.
pub fn checksum(payload: &[u8]) -> u8 {
    match payload.split_first() {
        Some((seed, rest)) => rest.iter().fold(*seed, |csum, b| csum ^ b),
        None => 0,
    }
}

/// Encode a frame into the wire format.
///
/// Wire format (all multi-byte fields big-endian):
/// ```text
/// ┌─────────────────────┬───────────┬─────────┬───────────┬──────────────────┐
/// │ Magic (4B)          │ Length    │ Id (1B) │ Csum (1B) │ Payload          │
/// │ 0x55 0x44 0x33 0x22 │ (4B BE)   │         │ XOR-fold  │ (Length bytes)   │
/// └─────────────────────┴───────────┴─────────┴───────────┴──────────────────┘
/// ```
pub fn encode_frame(id: u8, payload: &[u8], dst: &mut BytesMut) -> Result<()> {
    if payload.len() > MAX_PAYLOAD {
        return Err(FrameError::PayloadTooLarge {
            size: payload.len(),
            max: MAX_PAYLOAD,
        });
    }
    dst.reserve(HEADER_SIZE + payload.len());
    dst.put_slice(&MAGIC);
    dst.put_u32(payload.len() as u32);
    dst.put_u8(id);
    dst.put_u8(checksum(payload));
    dst.put_slice(payload);
    Ok(())
}

/// Verdict of one decode attempt at a scan offset.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Decoded {
    /// A whole, checksum-valid frame; `consumed` bytes were used.
    Frame { frame: Frame, consumed: usize },
    /// Possibly a frame, but not enough bytes yet; retain and wait for more.
    Incomplete,
    /// No frame starts here; the caller should resync one byte forward.
    NotAFrame,
    /// A well-formed header whose payload failed the checksum; `skip` bytes
    /// (header plus declared payload) cover the whole corrupt unit.
    Corrupt { skip: usize },
}

/// Attempt to parse one frame from the start of `buf`.
///
/// Never fails: every malformed input maps to a recovery verdict.
pub fn try_decode(buf: &[u8]) -> Decoded {
    if buf.len() < MAGIC.len() {
        return if MAGIC.starts_with(buf) {
            Decoded::Incomplete
        } else {
            Decoded::NotAFrame
        };
    }
    if buf[..MAGIC.len()] != MAGIC {
        return Decoded::NotAFrame;
    }
    if buf.len() < HEADER_SIZE {
        return Decoded::Incomplete;
    }

    // Header fields are fixed big-endian on the wire.
    let length = u32::from_be_bytes([buf[4], buf[5], buf[6], buf[7]]) as usize;
    let id = buf[8];
    let csum = buf[9];

    // A length that can never fit the carry buffer is a false header, not a
    // frame worth waiting for.
    if length > MAX_PAYLOAD {
        return Decoded::NotAFrame;
    }

    let total = HEADER_SIZE + length;
    if buf.len() < total {
        return Decoded::Incomplete;
    }

    let payload = &buf[HEADER_SIZE..total];
    if checksum(payload) != csum {
        return Decoded::Corrupt { skip: total };
    }

    Decoded::Frame {
        frame: Frame {
            id,
            payload: Bytes::copy_from_slice(payload),
        },
        consumed: total,
    }
}
