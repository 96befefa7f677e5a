use crate::error::Result;
use crate::link::LinkHandle;

/// A registered peripheral feature, addressed by a numeric ID.
///
/// The gateway calls `init` once before entering the read loop, `handle`
/// once per frame addressed to this capability, and `deinit` once during
/// shutdown. `init` and `deinit` default to no-ops.
///
/// `handle` runs synchronously on the gateway's read thread; frames pile up
/// behind a slow handler. Capabilities doing extended work (continuous audio
/// capture, say) should clone the [`LinkHandle`] into their own worker
/// thread and return quickly.
pub trait Capability: Send {
    /// Short name used in log events.
    fn name(&self) -> &str;

    /// Called once before the gateway starts reading. A failure is logged
    /// and does not prevent other capabilities from initializing.
    fn init(&mut self, _link: &LinkHandle) -> Result<()> {
        Ok(())
    }

    /// Handle one frame payload addressed to this capability.
    ///
    /// The payload is an opaque sub-message; the gateway performs no
    /// interpretation beyond length and checksum.
    fn handle(&mut self, link: &LinkHandle, payload: &[u8]) -> Result<()>;

    /// Called once during shutdown. A failure is logged and does not skip
    /// remaining capabilities' deinit.
    fn deinit(&mut self, _link: &LinkHandle) -> Result<()> {
        Ok(())
    }
}
