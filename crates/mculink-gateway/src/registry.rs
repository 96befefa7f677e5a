use tracing::{debug, warn};

use crate::capability::Capability;
use crate::link::LinkHandle;

struct Entry {
    id: u8,
    capability: Box<dyn Capability>,
}

/// Ordered collection of capability descriptors.
///
/// Registration order is dispatch order: lookup is a first-match linear
/// scan, so if two entries share an ID only the first one is ever reached.
#[derive(Default)]
pub struct Registry {
    entries: Vec<Entry>,
}

impl Registry {
    /// Create an empty registry.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a capability under an ID. Duplicates are permitted; the first
    /// registered wins.
    pub fn register(&mut self, id: u8, capability: Box<dyn Capability>) {
        debug!(id, name = capability.name(), "capability registered");
        self.entries.push(Entry { id, capability });
    }

    /// Number of registered capabilities (duplicates included).
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether any capability is registered.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }

    /// Run every capability's `init` in registration order. Failures are
    /// logged and never block the remaining capabilities or startup.
    pub fn init_all(&mut self, link: &LinkHandle) {
        for entry in &mut self.entries {
            debug!(id = entry.id, name = entry.capability.name(), "capability init");
            if let Err(err) = entry.capability.init(link) {
                warn!(
                    id = entry.id,
                    name = entry.capability.name(),
                    %err,
                    "capability init failed, continuing"
                );
            }
        }
    }

    /// Run every capability's `deinit` in registration order. Failures are
    /// logged and never skip the remaining capabilities.
    pub fn deinit_all(&mut self, link: &LinkHandle) {
        for entry in &mut self.entries {
            debug!(id = entry.id, name = entry.capability.name(), "capability deinit");
            if let Err(err) = entry.capability.deinit(link) {
                warn!(
                    id = entry.id,
                    name = entry.capability.name(),
                    %err,
                    "capability deinit failed, continuing"
                );
            }
        }
    }

    /// Route one decoded frame to the first capability registered under its
    /// ID. An unknown ID or a failing handler is logged and the frame
    /// dropped; dispatch never aborts the read loop.
    pub fn dispatch(&mut self, link: &LinkHandle, id: u8, payload: &[u8]) {
        let Some(entry) = self.entries.iter_mut().find(|entry| entry.id == id) else {
            warn!(id, len = payload.len(), "frame for unregistered capability dropped");
            return;
        };

        debug!(id, name = entry.capability.name(), len = payload.len(), "dispatching frame");
        if let Err(err) = entry.capability.handle(link, payload) {
            warn!(id, name = entry.capability.name(), %err, "capability handler failed");
        }
    }
}

impl std::fmt::Debug for Registry {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let ids: Vec<u8> = self.entries.iter().map(|entry| entry.id).collect();
        f.debug_struct("Registry").field("ids", &ids).finish()
    }
}
