/// Errors that can occur in transport operations.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// An I/O error occurred on the underlying port.
    #[error("transport I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// The transport has been closed, or the peer hung up.
    #[error("transport closed")]
    Closed,
}

impl TransportError {
    /// Classify an I/O error, folding hang-up conditions into [`TransportError::Closed`].
    pub fn from_io(err: std::io::Error) -> Self {
        use std::io::ErrorKind;

        match err.kind() {
            ErrorKind::UnexpectedEof
            | ErrorKind::BrokenPipe
            | ErrorKind::ConnectionReset
            | ErrorKind::ConnectionAborted
            | ErrorKind::NotConnected => TransportError::Closed,
            _ => TransportError::Io(err),
        }
    }

    /// Returns true if this error means the link is gone for good.
    pub fn is_closed(&self) -> bool {
        matches!(self, TransportError::Closed)
    }
}

pub type Result<T> = std::result::Result<T, TransportError>;

#[cfg(test)]
mod tests {
    use std::io::{Error, ErrorKind};

    use super::*;

    #[test]
    fn hangup_kinds_map_to_closed() {
        for kind in [
            ErrorKind::UnexpectedEof,
            ErrorKind::BrokenPipe,
            ErrorKind::ConnectionReset,
        ] {
            assert!(TransportError::from_io(Error::from(kind)).is_closed());
        }
    }

    #[test]
    fn other_kinds_stay_io() {
        let err = TransportError::from_io(Error::from(ErrorKind::PermissionDenied));
        assert!(matches!(err, TransportError::Io(e) if e.kind() == ErrorKind::PermissionDenied));
    }
}
