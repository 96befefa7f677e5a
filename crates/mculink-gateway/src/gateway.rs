use std::io::{ErrorKind, Read, Write};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;
use std::time::Duration;

use mculink_frame::Reassembler;
use tracing::{info, warn};

use crate::capability::Capability;
use crate::link::LinkHandle;
use crate::registry::Registry;

/// One bounded read per loop iteration; serial bursts are small relative
/// to this.
const READ_CHUNK_SIZE: usize = 1024;

/// Back-off after a failed read so a persistently failing descriptor does
/// not spin the loop.
const READ_ERROR_BACKOFF: Duration = Duration::from_millis(10);

/// Lifecycle states. Strictly linear, no re-entry.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum State {
    Starting,
    Running,
    Stopping,
    Stopped,
}

/// Cloneable trigger for the gateway's shutdown transition.
///
/// The binary wires this to its signal handler; the core only observes the
/// flag between read iterations.
#[derive(Debug, Clone)]
pub struct ShutdownHandle {
    flag: Arc<AtomicBool>,
}

impl ShutdownHandle {
    /// Request the Running → Stopping transition.
    pub fn shutdown(&self) {
        self.flag.store(true, Ordering::SeqCst);
    }

    /// Whether shutdown has been requested.
    pub fn is_shutdown(&self) -> bool {
        self.flag.load(Ordering::SeqCst)
    }
}

/// Assembles the capability set before the gateway starts.
///
/// Registration is explicit and ordered; there is no load-time
/// self-registration, so the assembling code fully controls dispatch order.
#[derive(Default)]
pub struct GatewayBuilder {
    registry: Registry,
}

impl GatewayBuilder {
    /// Register a capability under an ID. First registered wins on
    /// duplicate IDs.
    pub fn capability(mut self, id: u8, capability: Box<dyn Capability>) -> Self {
        self.registry.register(id, capability);
        self
    }

    /// Take ownership of the externally-opened channel halves and build the
    /// gateway.
    pub fn build<R: Read>(self, reader: R, writer: impl Write + Send + 'static) -> Gateway<R> {
        Gateway {
            reader,
            link: LinkHandle::new(writer),
            registry: self.registry,
            reassembler: Reassembler::new(),
            state: State::Starting,
            shutdown: Arc::new(AtomicBool::new(false)),
        }
    }
}

/// Owns the channel and drives registered capabilities through
/// init → read/dispatch loop → deinit.
pub struct Gateway<R> {
    reader: R,
    link: LinkHandle,
    registry: Registry,
    reassembler: Reassembler,
    state: State,
    shutdown: Arc<AtomicBool>,
}

impl Gateway<std::io::Empty> {
    /// Start assembling a gateway.
    pub fn builder() -> GatewayBuilder {
        GatewayBuilder::default()
    }
}

impl<R: Read> Gateway<R> {
    /// Current lifecycle state.
    pub fn state(&self) -> State {
        self.state
    }

    /// A write handle to the channel, cloneable into worker threads.
    pub fn link(&self) -> LinkHandle {
        self.link.clone()
    }

    /// A handle that requests the shutdown transition.
    pub fn shutdown_handle(&self) -> ShutdownHandle {
        ShutdownHandle {
            flag: Arc::clone(&self.shutdown),
        }
    }

    /// Drive the full lifecycle to completion.
    ///
    /// Blocks until the channel reaches end-of-stream or a
    /// [`ShutdownHandle`] trips. Read errors are logged and retried; no
    /// input byte sequence terminates the loop.
    pub fn run(&mut self) {
        info!(capabilities = self.registry.len(), "gateway starting");
        self.registry.init_all(&self.link);

        self.state = State::Running;
        info!("gateway running");

        let mut chunk = [0u8; READ_CHUNK_SIZE];
        while !self.shutdown.load(Ordering::SeqCst) {
            match self.reader.read(&mut chunk) {
                Ok(0) => {
                    info!("channel reached end of stream");
                    break;
                }
                Ok(n) => {
                    for frame in self.reassembler.push(&chunk[..n]) {
                        self.registry
                            .dispatch(&self.link, frame.id, frame.payload.as_ref());
                    }
                }
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                // A read timeout is how blocking channels surface the
                // shutdown flag; just poll again.
                Err(err)
                    if err.kind() == ErrorKind::WouldBlock
                        || err.kind() == ErrorKind::TimedOut =>
                {
                    continue;
                }
                Err(err) => {
                    warn!(%err, "channel read failed, retrying");
                    std::thread::sleep(READ_ERROR_BACKOFF);
                }
            }
        }

        self.state = State::Stopping;
        info!("gateway stopping");
        self.registry.deinit_all(&self.link);

        self.state = State::Stopped;
        info!(stats = ?self.reassembler.stats(), "gateway stopped");
    }

    /// Reassembly event counters.
    pub fn stats(&self) -> mculink_frame::ReassemblerStats {
        self.reassembler.stats()
    }
}
