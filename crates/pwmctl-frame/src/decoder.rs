use crate::codec::{decode_readings, Frame};
use crate::error::Result;
use crate::reading::Reading;

/// Turns one frame into zero or more readings, or rejects it.
///
/// A rejection is the only signal of misalignment the link offers: frames
/// carry no length prefix or checksum.
pub trait FrameDecoder {
    fn decode(&self, frame: &Frame) -> Result<Vec<Reading>>;
}

impl<F> FrameDecoder for F
where
    F: Fn(&Frame) -> Result<Vec<Reading>>,
{
    fn decode(&self, frame: &Frame) -> Result<Vec<Reading>> {
        self(frame)
    }
}

/// Decoder for the firmware's COBS-stuffed postcard reading sequences.
#[derive(Debug, Clone, Copy, Default)]
pub struct PostcardDecoder;

impl FrameDecoder for PostcardDecoder {
    fn decode(&self, frame: &Frame) -> Result<Vec<Reading>> {
        decode_readings(frame.as_bytes())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::codec::encode_readings;
    use crate::error::MalformedFrame;

    #[test]
    fn postcard_decoder_decodes_encoded_frame() {
        let mut wire = encode_readings(&[Reading::gyro(1.0, 2.0, 3.0)]).unwrap();
        wire.pop();

        let readings = PostcardDecoder.decode(&Frame::new(wire)).unwrap();
        assert_eq!(readings, vec![Reading::gyro(1.0, 2.0, 3.0)]);
    }

    #[test]
    fn postcard_decoder_rejects_garbage() {
        let err = PostcardDecoder
            .decode(&Frame::new(vec![0xff, 0x13, 0x37]))
            .unwrap_err();
        assert_eq!(err.len, 3);
    }

    #[test]
    fn closures_are_decoders() {
        let decoder = |frame: &Frame| -> Result<Vec<Reading>> {
            if frame.is_empty() {
                Err(MalformedFrame::new(0, "empty"))
            } else {
                Ok(vec![Reading::acc(frame.len() as f32, 0.0, 0.0)])
            }
        };

        assert!(decoder.decode(&Frame::default()).is_err());
        assert_eq!(
            decoder.decode(&Frame::new(vec![1, 2])).unwrap(),
            vec![Reading::acc(2.0, 0.0, 0.0)]
        );
    }
}
