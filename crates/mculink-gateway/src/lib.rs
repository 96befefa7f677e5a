//! Capability registry, dispatcher and lifecycle for the mculink gateway.
//!
//! A [`Gateway`] owns one bidirectional byte channel (a serial line in the
//! reference deployment) and a set of registered [`Capability`] handlers.
//! It drives capability init at startup, the read→reassemble→dispatch loop
//! at steady state, and capability deinit at shutdown. Handlers respond
//! through a shared [`LinkHandle`], which serializes concurrent frame writes.

pub mod capability;
pub mod error;
pub mod gateway;
pub mod link;
pub mod registry;

pub use capability::Capability;
pub use error::{GatewayError, Result};
pub use gateway::{Gateway, GatewayBuilder, ShutdownHandle, State};
pub use link::LinkHandle;
pub use registry::Registry;
