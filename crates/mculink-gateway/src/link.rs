use std::io::Write;
use std::sync::{Arc, Mutex};

use mculink_frame::FrameWriter;

use crate::error::Result;

/// Cloneable write handle to the gateway's channel.
///
/// The gateway's read loop and any capability worker thread may hold one
/// concurrently. Each `send` holds the lock across encode and transmit, so
/// bytes from two frames are never interleaved on the wire.
#[derive(Clone)]
pub struct LinkHandle {
    writer: Arc<Mutex<FrameWriter<Box<dyn Write + Send>>>>,
}

impl LinkHandle {
    /// Wrap the write half of an externally-opened channel.
    pub fn new(writer: impl Write + Send + 'static) -> Self {
        Self {
            writer: Arc::new(Mutex::new(FrameWriter::new(Box::new(writer)))),
        }
    }

    /// Encode and send one frame. Exclusive for the duration of the write.
    pub fn send(&self, id: u8, payload: &[u8]) -> Result<()> {
        let mut writer = match self.writer.lock() {
            Ok(writer) => writer,
            // A panic mid-write leaves at most one torn frame; the receiver
            // resynchronizes past it, so the lock stays usable.
            Err(poisoned) => poisoned.into_inner(),
        };
        writer.send(id, payload)?;
        Ok(())
    }
}

impl std::fmt::Debug for LinkHandle {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("LinkHandle").finish_non_exhaustive()
    }
}

#[cfg(test)]
mod tests {
    use std::sync::{Arc, Mutex};
    use std::thread;

    use mculink_frame::{Decoded, Reassembler};

    use super::*;

    /// A Write sink shared across threads, recording everything sent.
    #[derive(Clone, Default)]
    struct SharedSink(Arc<Mutex<Vec<u8>>>);

    impl Write for SharedSink {
        fn write(&mut self, buf: &[u8]) -> std::io::Result<usize> {
            self.0.lock().unwrap().extend_from_slice(buf);
            Ok(buf.len())
        }
        fn flush(&mut self) -> std::io::Result<()> {
            Ok(())
        }
    }

    #[test]
    fn send_produces_decodable_frame() {
        let sink = SharedSink::default();
        let link = LinkHandle::new(sink.clone());

        link.send(3, b"response").unwrap();

        let wire = sink.0.lock().unwrap().clone();
        match mculink_frame::try_decode(&wire) {
            Decoded::Frame { frame, .. } => {
                assert_eq!(frame.id, 3);
                assert_eq!(frame.payload.as_ref(), b"response");
            }
            other => panic!("expected frame, got {other:?}"),
        }
    }

    #[test]
    fn concurrent_senders_never_interleave_frames() {
        let sink = SharedSink::default();
        let link = LinkHandle::new(sink.clone());

        let threads: Vec<_> = (0u8..4)
            .map(|id| {
                let link = link.clone();
                thread::spawn(move || {
                    for i in 0..32u8 {
                        let payload = vec![id ^ i; 48];
                        link.send(id, &payload).unwrap();
                    }
                })
            })
            .collect();
        for thread in threads {
            thread.join().unwrap();
        }

        // Every byte on the wire must parse back into whole, valid frames.
        let wire = sink.0.lock().unwrap().clone();
        let mut asm = Reassembler::new();
        let mut count = 0usize;
        for chunk in wire.chunks(100) {
            count += asm.push(chunk).len();
        }
        assert_eq!(count, 4 * 32);
        let stats = asm.stats();
        assert_eq!(stats.corrupt_frames, 0);
        assert_eq!(stats.resync_bytes, 0);
    }
}
