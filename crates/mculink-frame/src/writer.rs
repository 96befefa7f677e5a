use std::io::{ErrorKind, Write};

use bytes::BytesMut;

use crate::codec::{encode_frame, Frame};
use crate::error::{FrameError, Result};

const INITIAL_BUFFER_CAPACITY: usize = 1024;

/// Writes complete frames to any `Write` channel.
///
/// One `send` is one whole frame on the wire; callers needing concurrent
/// senders wrap the writer in a mutex so encode+transmit stays atomic.
pub struct FrameWriter<T> {
    inner: T,
    buf: BytesMut,
}

impl<T: Write> FrameWriter<T> {
    /// Create a new frame writer.
    pub fn new(inner: T) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(INITIAL_BUFFER_CAPACITY),
        }
    }

    /// Write a complete frame (blocking).
    pub fn write_frame(&mut self, frame: &Frame) -> Result<()> {
        self.send(frame.id, frame.payload.as_ref())
    }

    /// Encode and send a payload to a capability.
    pub fn send(&mut self, id: u8, payload: &[u8]) -> Result<()> {
        self.buf.clear();
        encode_frame(id, payload, &mut self.buf)?;

        let mut offset = 0usize;
        while offset < self.buf.len() {
            match self.inner.write(&self.buf[offset..]) {
                Ok(0) => return Err(FrameError::ConnectionClosed),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }

        self.flush()
    }

    /// Flush the underlying channel.
    pub fn flush(&mut self) -> Result<()> {
        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) if err.kind() == ErrorKind::WouldBlock => continue,
                Err(err) => return Err(FrameError::Io(err)),
            }
        }
    }

    /// Borrow the underlying channel.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying channel.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the writer and return the inner channel.
    pub fn into_inner(self) -> T {
        self.inner
    }
}

#[cfg(test)]
mod tests {
    use std::io::Cursor;

    use super::*;
    use crate::codec::{try_decode, Decoded};

    fn decode_all(mut wire: &[u8]) -> Vec<Frame> {
        let mut frames = Vec::new();
        while !wire.is_empty() {
            match try_decode(wire) {
                Decoded::Frame { frame, consumed } => {
                    frames.push(frame);
                    wire = &wire[consumed..];
                }
                other => panic!("expected frame, got {other:?}"),
            }
        }
        frames
    }

    #[test]
    fn write_single_frame() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(1, b"hello").unwrap();

        let frames = decode_all(writer.into_inner().get_ref());
        assert_eq!(frames.len(), 1);
        assert_eq!(frames[0].id, 1);
        assert_eq!(frames[0].payload.as_ref(), b"hello");
    }

    #[test]
    fn write_multiple_frames_back_to_back() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.send(1, b"one").unwrap();
        writer.send(2, b"two").unwrap();
        writer.send(3, b"three").unwrap();

        let frames = decode_all(writer.into_inner().get_ref());
        assert_eq!(frames.len(), 3);
        assert_eq!((frames[0].id, frames[0].payload.as_ref()), (1, b"one".as_ref()));
        assert_eq!((frames[1].id, frames[1].payload.as_ref()), (2, b"two".as_ref()));
        assert_eq!((frames[2].id, frames[2].payload.as_ref()), (3, b"three".as_ref()));
    }

    #[test]
    fn write_frame_method() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        writer.write_frame(&Frame::new(2, "abc")).unwrap();

        let frames = decode_all(writer.into_inner().get_ref());
        assert_eq!(frames[0].id, 2);
        assert_eq!(frames[0].payload.as_ref(), b"abc");
    }

    #[test]
    fn oversized_payload_rejected() {
        let mut writer = FrameWriter::new(Cursor::new(Vec::<u8>::new()));
        let err = writer
            .send(1, &vec![0u8; crate::codec::MAX_PAYLOAD + 1])
            .unwrap_err();
        assert!(matches!(err, FrameError::PayloadTooLarge { .. }));
    }

    #[test]
    fn connection_closed_when_write_returns_zero() {
        struct ZeroWriter;
        impl Write for ZeroWriter {
            fn write(&mut self, _buf: &[u8]) -> std::io::Result<usize> {
                Ok(0)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = FrameWriter::new(ZeroWriter);
        let err = writer.send(1, b"x").unwrap_err();
        assert!(matches!(err, FrameError::ConnectionClosed));
    }

    #[test]
    fn interrupted_write_and_flush_retried() {
        struct InterruptedOnce {
            wrote: bool,
            flushed: bool,
            data: Vec<u8>,
        }
        impl Write for InterruptedOnce {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                if !self.wrote {
                    self.wrote = true;
                    return Err(std::io::Error::from(ErrorKind::Interrupted));
                }
                self.data.extend_from_slice(buf);
                Ok(buf.len())
            }
            fn flush(&mut self) -> std::io::Result<()> {
                if !self.flushed {
                    self.flushed = true;
                    return Err(std::io::Error::from(ErrorKind::Interrupted));
                }
                Ok(())
            }
        }

        let mut writer = FrameWriter::new(InterruptedOnce {
            wrote: false,
            flushed: false,
            data: Vec::new(),
        });
        writer.send(5, b"retry").unwrap();

        let frames = decode_all(&writer.into_inner().data);
        assert_eq!(frames[0].payload.as_ref(), b"retry");
    }

    #[test]
    fn short_writes_assemble_whole_frame() {
        struct OneBytePerWrite {
            data: Vec<u8>,
        }
        impl Write for OneBytePerWrite {
            fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
                if buf.is_empty() {
                    return Ok(0);
                }
                self.data.push(buf[0]);
                Ok(1)
            }
            fn flush(&mut self) -> std::io::Result<()> {
                Ok(())
            }
        }

        let mut writer = FrameWriter::new(OneBytePerWrite { data: Vec::new() });
        writer.send(4, &[0xAA, 0xBB]).unwrap();

        let frames = decode_all(&writer.into_inner().data);
        assert_eq!(frames[0].id, 4);
        assert_eq!(frames[0].payload.as_ref(), &[0xAA, 0xBB]);
    }
}
