//! Serial frame codec and garbage-tolerant stream reassembly for mculink.
//!
//! The MCU↔host link is a raw byte stream with no delivery guarantees, so
//! every message is framed with:
//! - A 4-byte magic sentinel (`0x55 0x44 0x33 0x22`) for stream synchronization
//! - A 4-byte big-endian payload length
//! - A 1-byte capability ID for routing
//! - A 1-byte XOR-fold checksum over the payload
//!
//! The [`Reassembler`] turns arbitrarily-chunked, possibly garbled reads into
//! whole validated frames; the [`FrameWriter`] is the blocking send side.

pub mod caps;
pub mod codec;
pub mod error;
pub mod reassembler;
pub mod writer;

pub use caps::{ANTENNA, ANTENNA_SWITCH, AUDIO, HORIZON, SUSPEND};
pub use codec::{
    checksum, encode_frame, try_decode, Decoded, Frame, HEADER_SIZE, MAGIC, MAX_PAYLOAD,
};
pub use error::{FrameError, Result};
pub use reassembler::{Reassembler, ReassemblerStats, BUFFER_CAPACITY};
pub use writer::FrameWriter;
