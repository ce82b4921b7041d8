use std::collections::VecDeque;
use std::fmt;

use pwmctl_frame::{FrameDecoder, FrameReader, PostcardDecoder, Reading, ReadingKind};
use pwmctl_transport::Transport;
use tracing::{debug, info};

use crate::error::{Result, StreamError};
use crate::filter::ReadingFilter;
use crate::sync::{StreamSynchronizer, SyncConfig, SyncState};

/// Lifecycle of a [`ReadingStream`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StreamState {
    /// Not primed yet.
    Unstarted,
    /// Primed; readings are being produced.
    Streaming,
    /// Priming failed or a terminal error occurred. `start()` re-primes.
    Failed,
}

impl fmt::Display for StreamState {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(match self {
            StreamState::Unstarted => "unstarted",
            StreamState::Streaming => "streaming",
            StreamState::Failed => "failed",
        })
    }
}

/// Configuration for [`ReadingStream`].
#[derive(Debug, Clone, Default)]
pub struct StreamConfig {
    pub sync: SyncConfig,
}

/// An endless, filtered sequence of readings from one link.
///
/// Priming happens once, in [`start`](Self::start). After that a frame that
/// fails to decode is reported as [`StreamError::Decode`] and ends the
/// stream; it is never silently resynchronized.
pub struct ReadingStream<T, D = PostcardDecoder> {
    reader: FrameReader<T>,
    decoder: D,
    filter: ReadingFilter,
    synchronizer: StreamSynchronizer,
    state: StreamState,
    pending: VecDeque<Reading>,
}

impl<T: Transport> ReadingStream<T> {
    /// Stream readings encoded the way the firmware sends them.
    pub fn new(transport: T) -> Self {
        Self::with_decoder(transport, PostcardDecoder)
    }
}

impl<T: Transport, D: FrameDecoder> ReadingStream<T, D> {
    /// Stream readings using a custom frame decoder.
    pub fn with_decoder(transport: T, decoder: D) -> Self {
        Self::with_config(transport, decoder, StreamConfig::default())
    }

    /// Create a stream with explicit configuration.
    pub fn with_config(transport: T, decoder: D, config: StreamConfig) -> Self {
        Self {
            reader: FrameReader::new(transport),
            decoder,
            filter: ReadingFilter::default(),
            synchronizer: StreamSynchronizer::new(config.sync),
            state: StreamState::Unstarted,
            pending: VecDeque::new(),
        }
    }

    /// Prime the stream. On success the stream is [`StreamState::Streaming`];
    /// on any error it is [`StreamState::Failed`].
    pub fn start(&mut self) -> Result<()> {
        self.pending.clear();
        match self.synchronizer.prime(&mut self.reader, &self.decoder) {
            Ok(attempts) => {
                info!(attempts, "reading stream started");
                self.state = StreamState::Streaming;
                Ok(())
            }
            Err(err) => {
                self.state = StreamState::Failed;
                Err(err)
            }
        }
    }

    /// Block until the next reading that passes the filter.
    ///
    /// Frames that decode to no readings, or only to filtered-out readings,
    /// are skipped.
    pub fn next_reading(&mut self) -> Result<Reading> {
        if self.state != StreamState::Streaming {
            return Err(StreamError::NotStreaming(self.state));
        }

        loop {
            while let Some(reading) = self.pending.pop_front() {
                if self.filter.apply(&reading) {
                    return Ok(reading);
                }
            }

            let frame = match self.reader.read() {
                Ok(frame) => frame,
                Err(err) => return Err(self.fail(err.into())),
            };
            match self.decoder.decode(&frame) {
                Ok(readings) => self.pending.extend(readings),
                Err(rejection) => return Err(self.fail(rejection.into())),
            }
        }
    }

    /// Borrow the stream as an iterator of readings.
    ///
    /// The iterator yields the terminal error once, then ends.
    pub fn readings(&mut self) -> Readings<'_, T, D> {
        Readings {
            stream: self,
            done: false,
        }
    }

    /// [`start`](Self::start), then iterate.
    pub fn stream(&mut self) -> Result<Readings<'_, T, D>> {
        self.start()?;
        Ok(self.readings())
    }

    /// Let `kinds` through the filter.
    pub fn enable(&mut self, kinds: impl IntoIterator<Item = ReadingKind>) {
        self.filter.enable(kinds);
    }

    /// Stop `kinds` at the filter. Fails if any of them is not enabled.
    pub fn disable(&mut self, kinds: impl IntoIterator<Item = ReadingKind>) -> Result<()> {
        self.filter.disable(kinds)
    }

    pub fn filter(&self) -> &ReadingFilter {
        &self.filter
    }

    pub fn filter_mut(&mut self) -> &mut ReadingFilter {
        &mut self.filter
    }

    pub fn state(&self) -> StreamState {
        self.state
    }

    /// State of the last priming run.
    pub fn sync_state(&self) -> SyncState {
        self.synchronizer.state()
    }

    /// Borrow the underlying transport.
    pub fn get_ref(&self) -> &T {
        self.reader.get_ref()
    }

    /// Mutably borrow the underlying transport.
    pub fn get_mut(&mut self) -> &mut T {
        self.reader.get_mut()
    }

    /// Consume the stream and return the inner transport.
    pub fn into_inner(self) -> T {
        self.reader.into_inner()
    }

    fn fail(&mut self, err: StreamError) -> StreamError {
        debug!(%err, "reading stream failed");
        self.state = StreamState::Failed;
        self.pending.clear();
        err
    }
}

/// Iterator returned by [`ReadingStream::readings`].
pub struct Readings<'a, T, D> {
    stream: &'a mut ReadingStream<T, D>,
    done: bool,
}

impl<T: Transport, D: FrameDecoder> Iterator for Readings<'_, T, D> {
    type Item = Result<Reading>;

    fn next(&mut self) -> Option<Self::Item> {
        if self.done {
            return None;
        }
        match self.stream.next_reading() {
            Ok(reading) => Some(Ok(reading)),
            Err(err) => {
                self.done = true;
                Some(Err(err))
            }
        }
    }
}
