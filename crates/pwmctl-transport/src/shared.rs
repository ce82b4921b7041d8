use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{Arc, Mutex, MutexGuard};

use bytes::Bytes;
use tracing::debug;

use crate::error::{Result, TransportError};
use crate::traits::{PortCloser, Transport};

/// A cloneable handle that serializes every operation on one transport.
///
/// The wire protocol has no multiplexing, so a command write must never land
/// in the middle of a delimiter scan. Each operation holds the lock for its
/// whole duration. A blocked `read_until` therefore also delays writers until
/// the next delimiter arrives, or until [`close`](Self::close) wakes it.
pub struct SharedTransport<T> {
    inner: Arc<Mutex<T>>,
    closed: Arc<AtomicBool>,
    port: Option<PortCloser>,
}

impl<T> Clone for SharedTransport<T> {
    fn clone(&self) -> Self {
        Self {
            inner: Arc::clone(&self.inner),
            closed: Arc::clone(&self.closed),
            port: self.port.clone(),
        }
    }
}

impl<T: Transport> SharedTransport<T> {
    /// Wrap a transport for shared use.
    pub fn new(transport: T) -> Self {
        let port = transport.closer();
        if port.is_none() {
            debug!("shared transport cannot interrupt blocked reads");
        }
        Self {
            inner: Arc::new(Mutex::new(transport)),
            closed: Arc::new(AtomicBool::new(false)),
            port,
        }
    }

    /// Close the link for every handle.
    ///
    /// Does not take the lock: a `read_until` blocked on another handle is
    /// woken and fails with [`TransportError::Closed`], and operations that
    /// start afterwards fail the same way.
    pub fn close(&self) {
        close_shared(&self.closed, self.port.as_ref());
    }

    /// Whether [`close`](Self::close) has been called on any handle.
    pub fn is_closed(&self) -> bool {
        self.closed.load(Ordering::SeqCst)
    }

    fn lock(&self) -> Result<MutexGuard<'_, T>> {
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        // A holder panicked mid-operation; the byte stream state is unknown.
        let guard = self.inner.lock().map_err(|_| TransportError::Closed)?;
        // Closed while this handle was waiting for the lock.
        if self.is_closed() {
            return Err(TransportError::Closed);
        }
        Ok(guard)
    }
}

impl<T: Transport> Transport for SharedTransport<T> {
    fn write(&mut self, bytes: &[u8]) -> Result<()> {
        self.lock()?.write(bytes)
    }

    fn read_until(&mut self, delimiter: u8) -> Result<Bytes> {
        self.lock()?.read_until(delimiter)
    }

    fn clear_input_buffer(&mut self) -> Result<()> {
        self.lock()?.clear_input_buffer()
    }

    fn closer(&self) -> Option<PortCloser> {
        let closed = Arc::clone(&self.closed);
        let port = self.port.clone();
        Some(PortCloser::new(move || close_shared(&closed, port.as_ref())))
    }
}

fn close_shared(closed: &AtomicBool, port: Option<&PortCloser>) {
    if !closed.swap(true, Ordering::SeqCst) {
        debug!("closing shared transport");
    }
    if let Some(port) = port {
        port.close();
    }
}
