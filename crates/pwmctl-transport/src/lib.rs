//! Byte-stream transport abstraction for the pwm-control serial link.
//!
//! This is the lowest layer of pwmctl. The firmware link is a plain duplex
//! byte stream with no multiplexing, so the [`Transport`] trait only knows
//! three things:
//! - write a command's bytes
//! - read until a delimiter byte
//! - drop whatever input is already buffered
//!
//! [`IoTransport`] adapts any [`Port`] (a `Read + Write` type) to that trait,
//! and [`SharedTransport`] serializes access when commands and readings share
//! one link across threads.
//!
//! Closing is the only way to cancel a blocked read: a [`PortCloser`] fires
//! from any thread and the read returns [`TransportError::Closed`].

pub mod error;
pub mod io;
pub mod shared;
pub mod traits;

#[cfg(unix)]
pub mod tty;

pub use error::{Result, TransportError};
pub use io::{IoTransport, IoTransportConfig, DEFAULT_READ_CHUNK_SIZE};
pub use shared::SharedTransport;
pub use traits::{Port, PortCloser, Transport};

#[cfg(unix)]
pub use tty::TtyPort;
