use pwmctl_frame::{MalformedFrame, ReadingKind};
use pwmctl_transport::TransportError;

use crate::stream::StreamState;

/// Errors that can occur while priming, filtering or streaming readings.
#[derive(Debug, thiserror::Error)]
pub enum StreamError {
    /// Transport-level error. Never retried.
    #[error("transport error: {0}")]
    Transport(#[from] TransportError),

    /// No frame decoded within the configured number of priming attempts.
    #[error("could not prime reading stream after {attempts} attempts")]
    PrimingTimeout { attempts: usize },

    /// A frame failed to decode after priming succeeded.
    #[error("decode error: {0}")]
    Decode(#[from] MalformedFrame),

    /// Tried to disable a reading kind that is not enabled.
    #[error("reading kind '{0}' is not enabled")]
    NotEnabled(ReadingKind),

    /// Readings were requested while the stream was not streaming.
    #[error("reading stream is {0}; call start() first")]
    NotStreaming(StreamState),
}

pub type Result<T> = std::result::Result<T, StreamError>;
