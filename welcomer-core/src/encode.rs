// ABOUTME: Assembles composited frames into a single looping animated GIF
// ABOUTME: Produces an in-memory byte buffer, one allocation per invocation

use crate::error::WelcomerError;
use image::codecs::gif::{GifEncoder, Repeat};
use image::{Delay, Frame, RgbaImage};

// gif crate speed parameter, 1 (best) to 30 (fastest).
const ENCODE_SPEED: i32 = 10;

/// Encode `frames` in order into a GIF that shows each frame for
/// `frame_delay_ms` and loops forever. The caller owns the returned
/// buffer; dropping it is the only cleanup.
pub fn encode_gif(frames: &[RgbaImage], frame_delay_ms: u32) -> Result<Vec<u8>, WelcomerError> {
    if frames.is_empty() {
        return Err(WelcomerError::EmptySequence);
    }

    let mut bytes = Vec::new();
    let mut encoder = GifEncoder::new_with_speed(&mut bytes, ENCODE_SPEED);
    encoder
        .set_repeat(Repeat::Infinite)
        .map_err(|e| WelcomerError::Encode(e.to_string()))?;

    let delay = Delay::from_numer_denom_ms(frame_delay_ms, 1);
    for frame in frames {
        let frame = Frame::from_parts(frame.clone(), 0, 0, delay);
        encoder
            .encode_frame(frame)
            .map_err(|e| WelcomerError::Encode(e.to_string()))?;
    }

    drop(encoder);
    Ok(bytes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use image::codecs::gif::GifDecoder;
    use image::{AnimationDecoder, Rgba};
    use std::io::Cursor;

    fn solid_frames(count: usize) -> Vec<RgbaImage> {
        (0..count)
            .map(|i| RgbaImage::from_pixel(8, 8, Rgba([i as u8 * 40, 0, 0, 255])))
            .collect()
    }

    #[test]
    fn test_empty_sequence_is_an_error() {
        let err = encode_gif(&[], 53).unwrap_err();
        assert!(matches!(err, WelcomerError::EmptySequence));
        assert!(!err.is_degradable());
    }

    #[test]
    fn test_output_is_a_gif_with_all_frames() {
        let bytes = encode_gif(&solid_frames(3), 53).unwrap();

        assert!(bytes.starts_with(b"GIF89a"));

        let decoder = GifDecoder::new(Cursor::new(&bytes)).unwrap();
        let decoded = decoder.into_frames().collect_frames().unwrap();
        assert_eq!(decoded.len(), 3);
    }

    #[test]
    fn test_output_loops_forever() {
        let bytes = encode_gif(&solid_frames(2), 53).unwrap();
        // Infinite looping is signalled by the Netscape application
        // extension block.
        let marker = b"NETSCAPE2.0";
        let found = bytes.windows(marker.len()).any(|window| window == marker);
        assert!(found, "looping extension missing from GIF output");
    }

    #[test]
    fn test_encoding_is_deterministic() {
        let frames = solid_frames(2);
        let first = encode_gif(&frames, 53).unwrap();
        let second = encode_gif(&frames, 53).unwrap();
        assert_eq!(first, second);
    }
}
