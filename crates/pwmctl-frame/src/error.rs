/// A frame the decoder could not turn into readings.
///
/// During priming this only means the reader is not yet aligned to frame
/// boundaries. After priming it is a hard decode failure.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("malformed frame ({len} bytes): {reason}")]
pub struct MalformedFrame {
    /// Length of the rejected frame.
    pub len: usize,
    /// Why the decoder rejected it.
    pub reason: String,
}

impl MalformedFrame {
    /// Create a rejection for a frame of `len` bytes.
    pub fn new(len: usize, reason: impl Into<String>) -> Self {
        Self {
            len,
            reason: reason.into(),
        }
    }
}

/// Readings could not be serialized into a frame.
#[derive(Debug, thiserror::Error)]
#[error("reading encoding failed: {0}")]
pub struct EncodeError(#[from] pub postcard::Error);

pub type Result<T> = std::result::Result<T, MalformedFrame>;
