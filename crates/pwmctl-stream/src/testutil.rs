//! Scripted transport and decoder shared by the unit tests.

use std::collections::VecDeque;

use bytes::Bytes;
use pwmctl_frame::{Frame, MalformedFrame, Reading, ReadingKind};
use pwmctl_transport::{Result, Transport, TransportError};

/// Hands out scripted frames; counts reads and clears.
#[derive(Default)]
pub struct ScriptedLink {
    pub frames: VecDeque<Result<Bytes>>,
    /// Frame returned forever once `frames` runs out. `None` means Closed.
    pub repeat: Option<Bytes>,
    pub reads: usize,
    pub clears: usize,
    pub fail_clear_at: Option<usize>,
}

impl ScriptedLink {
    pub fn with_frames(frames: &[&'static [u8]]) -> Self {
        Self {
            frames: frames
                .iter()
                .map(|frame| Ok(Bytes::from_static(frame)))
                .collect(),
            ..Self::default()
        }
    }

    pub fn repeating(frame: &'static [u8]) -> Self {
        Self {
            repeat: Some(Bytes::from_static(frame)),
            ..Self::default()
        }
    }
}

impl Transport for ScriptedLink {
    fn write(&mut self, _bytes: &[u8]) -> Result<()> {
        Ok(())
    }

    fn read_until(&mut self, _delimiter: u8) -> Result<Bytes> {
        self.reads += 1;
        match self.frames.pop_front() {
            Some(frame) => frame,
            None => self.repeat.clone().ok_or(TransportError::Closed),
        }
    }

    fn clear_input_buffer(&mut self) -> Result<()> {
        self.clears += 1;
        if self.fail_clear_at == Some(self.clears) {
            return Err(TransportError::Io(std::io::Error::from(
                std::io::ErrorKind::PermissionDenied,
            )));
        }
        Ok(())
    }
}

/// `!`-prefixed frames are malformed; otherwise each byte is one reading:
/// `a` accelerometer, `g` gyroscope, `m` magnetometer, with `x` set to the
/// byte's index in the frame.
pub fn letter_decoder(frame: &Frame) -> std::result::Result<Vec<Reading>, MalformedFrame> {
    let bytes = frame.as_bytes();
    if bytes.first() == Some(&b'!') {
        return Err(MalformedFrame::new(bytes.len(), "scripted rejection"));
    }
    bytes
        .iter()
        .enumerate()
        .map(|(i, byte)| {
            let kind = match byte {
                b'a' => ReadingKind::Acc,
                b'g' => ReadingKind::Gyro,
                b'm' => ReadingKind::Mag,
                _ => return Err(MalformedFrame::new(bytes.len(), "unknown letter")),
            };
            Ok(Reading::new(kind, i as f32, 0.0, 0.0))
        })
        .collect()
}
