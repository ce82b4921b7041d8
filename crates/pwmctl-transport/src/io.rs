use std::io::ErrorKind;

use bytes::{Buf, Bytes, BytesMut};
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::{Port, PortCloser, Transport};

/// Default number of bytes requested from the port per read call.
pub const DEFAULT_READ_CHUNK_SIZE: usize = 1024;

/// Configuration for [`IoTransport`].
#[derive(Debug, Clone)]
pub struct IoTransportConfig {
    /// Bytes requested from the port per read call. Default: 1 KiB.
    pub read_chunk_size: usize,
}

impl Default for IoTransportConfig {
    fn default() -> Self {
        Self {
            read_chunk_size: DEFAULT_READ_CHUNK_SIZE,
        }
    }
}

/// Drives the [`Transport`] protocol over any [`Port`].
///
/// Bytes read past a delimiter are retained for the next `read_until` call.
/// `clear_input_buffer` drops them together with the port's own input queue.
pub struct IoTransport<P> {
    inner: P,
    buf: BytesMut,
    config: IoTransportConfig,
    closed: bool,
}

impl<P: Port> IoTransport<P> {
    /// Create a transport with default configuration.
    pub fn new(inner: P) -> Self {
        Self::with_config(inner, IoTransportConfig::default())
    }

    /// Create a transport with explicit configuration.
    pub fn with_config(inner: P, config: IoTransportConfig) -> Self {
        Self {
            inner,
            buf: BytesMut::with_capacity(config.read_chunk_size.max(1)),
            config,
            closed: false,
        }
    }

    /// Mark the transport closed and shut the port down. Every later
    /// operation fails with [`TransportError::Closed`].
    ///
    /// This needs exclusive access. To interrupt a read that is already
    /// blocked on another thread, use [`Transport::closer`].
    pub fn close(&mut self) {
        if !self.closed {
            debug!("closing transport");
            if let Some(closer) = self.inner.closer() {
                closer.close();
            }
        }
        self.closed = true;
        self.buf.clear();
    }

    /// Whether the transport has been closed or hung up.
    pub fn is_closed(&self) -> bool {
        self.closed
    }

    /// Number of received bytes not yet returned by `read_until`.
    pub fn buffered_len(&self) -> usize {
        self.buf.len()
    }

    /// Borrow the underlying port.
    pub fn get_ref(&self) -> &P {
        &self.inner
    }

    /// Mutably borrow the underlying port.
    pub fn get_mut(&mut self) -> &mut P {
        &mut self.inner
    }

    /// Consume the transport and return the inner port.
    pub fn into_inner(self) -> P {
        self.inner
    }

    /// Current transport configuration.
    pub fn config(&self) -> &IoTransportConfig {
        &self.config
    }

    fn ensure_open(&self) -> Result<()> {
        if self.closed {
            return Err(TransportError::Closed);
        }
        Ok(())
    }

    fn fail(&mut self, err: TransportError) -> TransportError {
        if err.is_closed() {
            self.closed = true;
        }
        err
    }
}

impl<P: Port> Transport for IoTransport<P> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.ensure_open()?;

        let mut offset = 0usize;
        while offset < bytes.len() {
            match self.inner.write(&bytes[offset..]) {
                Ok(0) => return Err(self.fail(TransportError::Closed)),
                Ok(n) => offset += n,
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(self.fail(TransportError::from_io(err))),
            }
        }

        loop {
            match self.inner.flush() {
                Ok(()) => return Ok(()),
                Err(err) if err.kind() == ErrorKind::Interrupted => continue,
                Err(err) => return Err(self.fail(TransportError::from_io(err))),
            }
        }
    }

    fn read_until(&mut self, delimiter: u8) -> Result<Bytes> {
        self.ensure_open()?;

        let chunk_size = self.config.read_chunk_size.max(1);
        let mut scanned = 0usize;
        loop {
            if let Some(pos) = self.buf[scanned..].iter().position(|&b| b == delimiter) {
                let frame = self.buf.split_to(scanned + pos).freeze();
                self.buf.advance(1);
                return Ok(frame);
            }
            scanned = self.buf.len();

            let start = self.buf.len();
            self.buf.resize(start + chunk_size, 0);
            match self.inner.read(&mut self.buf[start..]) {
                Ok(0) => {
                    self.buf.truncate(start);
                    return Err(self.fail(TransportError::Closed));
                }
                Ok(n) => self.buf.truncate(start + n),
                Err(err) if err.kind() == ErrorKind::Interrupted => {
                    self.buf.truncate(start);
                    continue;
                }
                Err(err) => {
                    self.buf.truncate(start);
                    return Err(self.fail(TransportError::from_io(err)));
                }
            }
        }
    }

    fn clear_input_buffer(&mut self) -> Result<()> {
        self.ensure_open()?;

        let dropped = self.buf.len();
        self.buf.clear();
        self.inner
            .discard_input()
            .map_err(|err| self.fail(TransportError::from_io(err)))?;
        debug!(dropped, "cleared input buffer");
        Ok(())
    }

    fn closer(&self) -> Option<PortCloser> {
        self.inner.closer()
    }
}

impl<P> std::fmt::Debug for IoTransport<P> {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("IoTransport")
            .field("buffered", &self.buf.len())
            .field("closed", &self.closed)
            .finish()
    }
}
