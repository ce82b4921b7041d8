use pwmctl_frame::{FrameDecoder, FrameReader};
use pwmctl_transport::{Transport, TransportError};
use tracing::{debug, info, warn};

use crate::error::{Result, StreamError};

/// Default number of priming attempts before giving up.
pub const DEFAULT_MAX_ATTEMPTS: usize = 1000;

/// Configuration for [`StreamSynchronizer`].
#[derive(Debug, Clone)]
pub struct SyncConfig {
    /// Attempts (clear, read, decode) before failing with
    /// [`StreamError::PrimingTimeout`]. Default: 1000.
    pub max_attempts: usize,
}

impl Default for SyncConfig {
    fn default() -> Self {
        Self {
            max_attempts: DEFAULT_MAX_ATTEMPTS,
        }
    }
}

/// Where the priming protocol stands.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SyncState {
    /// Not aligned yet; `attempts` have been made so far.
    Unsynced { attempts: usize },
    /// A frame decoded on attempt number `attempts`.
    Synced { attempts: usize },
    /// Gave up after `attempts`, on timeout or transport error.
    Failed { attempts: usize },
}

/// Aligns a [`FrameReader`] to frame boundaries after attaching mid-stream.
///
/// Each attempt clears the transport's input buffer, reads one frame and
/// tries to decode it. A decode rejection means the read began mid-frame and
/// triggers another attempt; a decoded frame (even one with no readings)
/// means the reader is aligned. Transport errors abort immediately.
#[derive(Debug, Clone)]
pub struct StreamSynchronizer {
    config: SyncConfig,
    state: SyncState,
}

impl Default for StreamSynchronizer {
    fn default() -> Self {
        Self::new(SyncConfig::default())
    }
}

impl StreamSynchronizer {
    pub fn new(config: SyncConfig) -> Self {
        Self {
            config,
            state: SyncState::Unsynced { attempts: 0 },
        }
    }

    pub fn state(&self) -> SyncState {
        self.state
    }

    pub fn config(&self) -> &SyncConfig {
        &self.config
    }

    /// Run the priming protocol. Returns the number of attempts it took.
    ///
    /// The readings of the aligning frame are discarded.
    pub fn prime<T, D>(&mut self, reader: &mut FrameReader<T>, decoder: &D) -> Result<usize>
    where
        T: Transport,
        D: FrameDecoder + ?Sized,
    {
        self.state = SyncState::Unsynced { attempts: 0 };

        loop {
            match self.state {
                SyncState::Synced { attempts } => {
                    info!(attempts, "reading stream primed");
                    return Ok(attempts);
                }
                SyncState::Failed { attempts } => {
                    warn!(attempts, "could not prime reading stream");
                    return Err(StreamError::PrimingTimeout { attempts });
                }
                SyncState::Unsynced { attempts } if attempts >= self.config.max_attempts => {
                    self.state = SyncState::Failed { attempts };
                }
                SyncState::Unsynced { attempts } => {
                    let attempts = attempts + 1;
                    match attempt(reader, decoder) {
                        Ok(Ok(readings)) => {
                            debug!(attempts, readings, "frame decoded");
                            self.state = SyncState::Synced { attempts };
                        }
                        Ok(Err(rejection)) => {
                            debug!(attempts, %rejection, "frame rejected while priming");
                            self.state = SyncState::Unsynced { attempts };
                        }
                        Err(err) => {
                            warn!(attempts, %err, "transport failed while priming");
                            self.state = SyncState::Failed { attempts };
                            return Err(err.into());
                        }
                    }
                }
            }
        }
    }
}

/// One clear-read-decode cycle. The outer result carries transport errors,
/// the inner one the decode outcome (number of readings on success).
fn attempt<T, D>(
    reader: &mut FrameReader<T>,
    decoder: &D,
) -> std::result::Result<std::result::Result<usize, pwmctl_frame::MalformedFrame>, TransportError>
where
    T: Transport,
    D: FrameDecoder + ?Sized,
{
    reader.clear_input_buffer()?;
    let frame = reader.read()?;
    Ok(decoder.decode(&frame).map(|readings| readings.len()))
}
