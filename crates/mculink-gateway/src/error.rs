/// Errors that can occur in gateway operations.
#[derive(Debug, thiserror::Error)]
pub enum GatewayError {
    /// Frame encoding or channel write failure.
    #[error("frame error: {0}")]
    Frame(#[from] mculink_frame::FrameError),

    /// Channel I/O error.
    #[error("channel I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// A capability handler reported a failure.
    #[error("capability error: {0}")]
    Capability(String),
}

impl GatewayError {
    /// Build a capability-level error from any displayable cause.
    pub fn capability(cause: impl std::fmt::Display) -> Self {
        Self::Capability(cause.to_string())
    }
}

pub type Result<T> = std::result::Result<T, GatewayError>;
