//! Primed, filtered IMU reading streams over the pwm-control link.
//!
//! A host usually attaches to the firmware while it is already streaming, so
//! the first bytes read are likely the tail of a frame. [`ReadingStream`]
//! first runs the [`StreamSynchronizer`] priming protocol to find a frame
//! boundary, then decodes frames one by one and passes each reading through
//! a [`ReadingFilter`].

pub mod error;
pub mod filter;
pub mod stream;
pub mod sync;

#[cfg(test)]
mod testutil;

pub use error::{Result, StreamError};
pub use filter::{ReadingFilter, ReadingFilterSet};
pub use stream::{ReadingStream, Readings, StreamConfig, StreamState};
pub use sync::{StreamSynchronizer, SyncConfig, SyncState, DEFAULT_MAX_ATTEMPTS};
