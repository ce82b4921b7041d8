use bytes::Bytes;
use serde::{Deserialize, Serialize};

use crate::error::{EncodeError, MalformedFrame, Result};
use crate::reading::{Reading, ReadingKind};

/// Byte that terminates every inbound frame.
pub const FRAME_DELIMITER: u8 = 0x00;

/// One delimiter-terminated chunk of inbound bytes, delimiter excluded.
///
/// Zero-length frames are legal at this layer; whether they decode is up to
/// the [`FrameDecoder`](crate::FrameDecoder).
#[derive(Debug, Clone, PartialEq, Eq, Default)]
pub struct Frame {
    pub payload: Bytes,
}

impl Frame {
    /// Create a new frame.
    pub fn new(payload: impl Into<Bytes>) -> Self {
        Self {
            payload: payload.into(),
        }
    }

    /// The frame bytes.
    pub fn as_bytes(&self) -> &[u8] {
        self.payload.as_ref()
    }

    pub fn len(&self) -> usize {
        self.payload.len()
    }

    pub fn is_empty(&self) -> bool {
        self.payload.is_empty()
    }

    /// The total wire size of this frame (payload + delimiter).
    pub fn wire_size(&self) -> usize {
        self.payload.len() + 1
    }
}

impl From<Bytes> for Frame {
    fn from(payload: Bytes) -> Self {
        Self { payload }
    }
}

#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
struct Triplet {
    x: f32,
    y: f32,
    z: f32,
}

// Variant order is the firmware's tag order.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
enum WireReading {
    Accelerometer(Triplet),
    Gyroscope(Triplet),
    Magnetometer(Triplet),
}

impl From<WireReading> for Reading {
    fn from(wire: WireReading) -> Self {
        let (kind, Triplet { x, y, z }) = match wire {
            WireReading::Accelerometer(t) => (ReadingKind::Acc, t),
            WireReading::Gyroscope(t) => (ReadingKind::Gyro, t),
            WireReading::Magnetometer(t) => (ReadingKind::Mag, t),
        };
        Reading { kind, x, y, z }
    }
}

impl From<Reading> for WireReading {
    fn from(reading: Reading) -> Self {
        let t = Triplet {
            x: reading.x,
            y: reading.y,
            z: reading.z,
        };
        match reading.kind {
            ReadingKind::Acc => WireReading::Accelerometer(t),
            ReadingKind::Gyro => WireReading::Gyroscope(t),
            ReadingKind::Mag => WireReading::Magnetometer(t),
        }
    }
}

/// Encode readings as one complete wire frame, delimiter included.
///
/// Wire format:
/// ```text
/// COBS( varint(count) { varint(tag) f32le(x) f32le(y) f32le(z) }* ) 0x00
///
/// tag: 0 = accelerometer, 1 = gyroscope, 2 = magnetometer
/// ```
pub fn encode_readings(readings: &[Reading]) -> std::result::Result<Vec<u8>, EncodeError> {
    let wire: Vec<WireReading> = readings.iter().copied().map(WireReading::from).collect();
    Ok(postcard::to_allocvec_cobs(&wire)?)
}

/// Decode the body of one frame (delimiter excluded) into readings.
///
/// Every byte of the frame must belong to the reading sequence; leftovers
/// are treated as misalignment.
pub fn decode_readings(body: &[u8]) -> Result<Vec<Reading>> {
    let mut buf = body.to_vec();
    let decoded_len = cobs::decode_in_place(&mut buf)
        .map_err(|_| MalformedFrame::new(body.len(), "invalid COBS encoding"))?;

    let (wire, rest) = postcard::take_from_bytes::<Vec<WireReading>>(&buf[..decoded_len])
        .map_err(|err| MalformedFrame::new(body.len(), err.to_string()))?;
    if !rest.is_empty() {
        return Err(MalformedFrame::new(
            body.len(),
            format!("{} trailing bytes after readings", rest.len()),
        ));
    }

    Ok(wire.into_iter().map(Reading::from).collect())
}
