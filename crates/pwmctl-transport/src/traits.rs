use std::io::{Read, Write};
use std::sync::Arc;

use bytes::Bytes;

use crate::error::Result;

/// A duplex byte channel to the firmware.
///
/// Reads block until the delimiter arrives or the link errors or closes.
/// Implementations impose no timeout of their own.
pub trait Transport {
    /// Write all of `bytes` to the link.
    fn write(&mut self, bytes: &[u8]) -> Result<()>;

    /// Block until `delimiter` is observed and return the bytes before it.
    ///
    /// The delimiter is consumed and not included in the returned bytes.
    fn read_until(&mut self, delimiter: u8) -> Result<Bytes>;

    /// Discard any input that was received but not yet read.
    fn clear_input_buffer(&mut self) -> Result<()>;

    /// A handle that closes this transport from another thread, waking a
    /// blocked `read_until` with [`TransportError::Closed`](crate::TransportError::Closed).
    ///
    /// `None` means the transport cannot be interrupted while it blocks.
    fn closer(&self) -> Option<PortCloser> {
        None
    }
}

impl<T: Transport + ?Sized> Transport for &mut T {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn read_until(&mut self, delimiter: u8) -> Result<Bytes> {
        (**self).read_until(delimiter)
    }

    fn clear_input_buffer(&mut self) -> Result<()> {
        (**self).clear_input_buffer()
    }

    fn closer(&self) -> Option<PortCloser> {
        (**self).closer()
    }
}

impl<T: Transport + ?Sized> Transport for Box<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        (**self).write(bytes)
    }

    fn read_until(&mut self, delimiter: u8) -> Result<Bytes> {
        (**self).read_until(delimiter)
    }

    fn clear_input_buffer(&mut self) -> Result<()> {
        (**self).clear_input_buffer()
    }

    fn closer(&self) -> Option<PortCloser> {
        (**self).closer()
    }
}

/// A raw `Read + Write` port that [`IoTransport`](crate::IoTransport) can drive.
///
/// `discard_input` drops bytes the operating system has buffered for the
/// port. The default does nothing, which suits sockets and pipes where there
/// is no separate driver-side input queue to flush.
pub trait Port: Read + Write {
    /// Flush the port's pending input queue.
    fn discard_input(&mut self) -> std::io::Result<()> {
        Ok(())
    }

    /// A handle that shuts the port down without `&mut` access.
    ///
    /// After it fires, a read blocked on the port returns end-of-file or a
    /// hang-up error, and later reads and writes fail the same way.
    fn closer(&self) -> Option<PortCloser> {
        None
    }
}

#[cfg(unix)]
impl Port for std::os::unix::net::UnixStream {
    fn closer(&self) -> Option<PortCloser> {
        match self.try_clone() {
            Ok(stream) => Some(PortCloser::new(move || {
                let _ = stream.shutdown(std::net::Shutdown::Both);
            })),
            Err(err) => {
                tracing::debug!(%err, "unix stream cannot be cloned; no closer");
                None
            }
        }
    }
}

impl<P: Port + ?Sized> Port for Box<P> {
    fn discard_input(&mut self) -> std::io::Result<()> {
        (**self).discard_input()
    }

    fn closer(&self) -> Option<PortCloser> {
        (**self).closer()
    }
}

/// Cloneable, thread-safe close action for a port or transport.
#[derive(Clone)]
pub struct PortCloser(Arc<dyn Fn() + Send + Sync>);

impl PortCloser {
    /// Wrap a close action. It may run more than once and from any thread.
    pub fn new(close: impl Fn() + Send + Sync + 'static) -> Self {
        Self(Arc::new(close))
    }

    /// Run the close action.
    pub fn close(&self) {
        (self.0)()
    }
}

impl std::fmt::Debug for PortCloser {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str("PortCloser")
    }
}
