//! Delimiter framing and IMU reading decoding for the pwm-control link.
//!
//! The firmware streams sensor readings as frames terminated by a single
//! `0x00` byte. There is no length prefix and no checksum, so the only way to
//! tell a whole frame from a fragment is to try to decode it.
//!
//! - [`FrameReader`] pulls one frame per call from a transport
//! - [`FrameDecoder`] turns a frame into [`Reading`]s, or rejects it
//! - [`PostcardDecoder`] is the decoder for the firmware's payload encoding

pub mod codec;
pub mod decoder;
pub mod error;
pub mod reader;
pub mod reading;

pub use codec::{decode_readings, encode_readings, Frame, FRAME_DELIMITER};
pub use decoder::{FrameDecoder, PostcardDecoder};
pub use error::{EncodeError, MalformedFrame, Result};
pub use reader::FrameReader;
pub use reading::{Reading, ReadingKind, UnknownReadingKind};
