/// Errors that can occur while encoding or transmitting frames.
///
/// The receive path has no error type: every malformed input maps to a
/// [`crate::codec::Decoded`] recovery verdict inside the reassembler.
#[derive(Debug, thiserror::Error)]
pub enum FrameError {
    /// The payload exceeds the maximum a single frame may carry.
    #[error("payload too large ({size} bytes, max {max})")]
    PayloadTooLarge { size: usize, max: usize },

    /// An I/O error occurred while writing to the channel.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The channel was closed before the frame was fully written.
    #[error("channel closed")]
    ConnectionClosed,
}

pub type Result<T> = std::result::Result<T, FrameError>;
