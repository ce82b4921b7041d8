use pwmctl_transport::{Result, Transport};
use tracing::trace;

use crate::codec::{Frame, FRAME_DELIMITER};

/// Reads delimiter-terminated frames from a [`Transport`].
///
/// The reader keeps no buffer of its own; anything read past a delimiter is
/// retained by the transport. Transport errors are returned unchanged.
pub struct FrameReader<T> {
    inner: T,
}

impl<T: Transport> FrameReader<T> {
    /// Create a new frame reader.
    pub fn new(inner: T) -> Self {
        Self { inner }
    }

    /// Read the next frame (blocking), delimiter excluded.
    pub fn read(&mut self) -> Result<Frame> {
        let payload = self.inner.read_until(FRAME_DELIMITER)?;
        trace!(len = payload.len(), "read frame");
        Ok(Frame::from(payload))
    }

    /// Discard whatever input the transport has buffered.
    pub fn clear_input_buffer(&mut self) -> Result<()> {
        self.inner.clear_input_buffer()
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        &self.inner
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        &mut self.inner
    }

    /// Consume the reader and return the inner transport.
    pub fn into_inner(self) -> T {
        self.inner
    }
}
