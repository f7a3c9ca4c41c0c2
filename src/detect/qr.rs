//! QR detection and decoding backed by the rqrr crate.

use image::GrayImage;
use rqrr::PreparedImage;

use super::{CodeDetector, Point, Quad};
use crate::camera::Frame;

/// rqrr-backed [`CodeDetector`].
///
/// rqrr locates and decodes codes from the same prepared grayscale image, so
/// `detect_all` runs the full pass and caches the per-quad decode results for
/// that frame; `decode` answers from the cache. The cache is replaced on
/// every `detect_all` call.
#[derive(Default)]
pub struct QrDecoder {
    last_pass: Vec<(Quad, Option<String>)>,
}

impl QrDecoder {
    pub fn new() -> Self {
        Self::default()
    }
}

impl CodeDetector for QrDecoder {
    fn detect_all(&mut self, frame: &Frame) -> Vec<Quad> {
        self.last_pass.clear();

        let Some(gray) = to_gray_image(frame) else {
            log::warn!(
                "Frame buffer does not match {}x{} dimensions, skipping detection",
                frame.width,
                frame.height
            );
            return Vec::new();
        };

        let mut prepared = PreparedImage::prepare(gray);
        let grids = prepared.detect_grids();

        let mut quads = Vec::with_capacity(grids.len());
        for grid in grids {
            let bounds = grid.bounds;
            let quad = Quad::new([
                Point::new(bounds[0].x as i32, bounds[0].y as i32),
                Point::new(bounds[1].x as i32, bounds[1].y as i32),
                Point::new(bounds[2].x as i32, bounds[2].y as i32),
                Point::new(bounds[3].x as i32, bounds[3].y as i32),
            ]);

            let payload = match grid.decode() {
                Ok((_meta, content)) if !content.trim().is_empty() => Some(content),
                Ok(_) => None,
                Err(e) => {
                    log::debug!("Failed to decode QR code: {}", e);
                    None
                }
            };

            quads.push(quad);
            self.last_pass.push((quad, payload));
        }

        quads
    }

    fn decode(&mut self, _frame: &Frame, quad: &Quad) -> Option<String> {
        self.last_pass
            .iter()
            .find(|(q, _)| q == quad)
            .and_then(|(_, payload)| payload.clone())
    }
}

/// Convert an RGB frame to a grayscale image using the ITU-R BT.601
/// luminance formula (integer math, no floating point in the hot path).
fn to_gray_image(frame: &Frame) -> Option<GrayImage> {
    let pixel_count = (frame.width as usize).checked_mul(frame.height as usize)?;
    if frame.data.len() != pixel_count * frame.bytes_per_pixel() {
        return None;
    }

    let mut gray = Vec::with_capacity(pixel_count);
    // Coefficients scaled by 1000: 299 + 587 + 114 = 1000
    for rgb in frame.data.chunks_exact(3) {
        let r = rgb[0] as u32;
        let g = rgb[1] as u32;
        let b = rgb[2] as u32;
        let luminance = (299 * r + 587 * g + 114 * b) / 1000;
        gray.push(luminance as u8);
    }

    GrayImage::from_raw(frame.width, frame.height, gray)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::camera::FrameFormat;
    use std::time::Instant;

    fn rgb_frame(width: u32, height: u32, data: Vec<u8>) -> Frame {
        Frame {
            data,
            width,
            height,
            format: FrameFormat::Rgb,
            timestamp: Instant::now(),
        }
    }

    #[test]
    fn test_grayscale_conversion() {
        // Pure red, green, blue pixels
        let frame = rgb_frame(3, 1, vec![255, 0, 0, 0, 255, 0, 0, 0, 255]);
        let gray = to_gray_image(&frame).unwrap();
        assert_eq!(gray.get_pixel(0, 0).0[0], 76); // 299*255/1000
        assert_eq!(gray.get_pixel(1, 0).0[0], 149); // 587*255/1000
        assert_eq!(gray.get_pixel(2, 0).0[0], 29); // 114*255/1000
    }

    #[test]
    fn test_grayscale_rejects_corrupt_frame() {
        let frame = rgb_frame(2, 2, vec![0; 7]);
        assert!(to_gray_image(&frame).is_none());
    }

    #[test]
    fn test_blank_frame_has_no_codes() {
        let mut decoder = QrDecoder::new();
        let frame = rgb_frame(64, 64, vec![255; 64 * 64 * 3]);
        assert!(decoder.detect_all(&frame).is_empty());
    }

    #[test]
    fn test_decode_unknown_quad_is_none() {
        let mut decoder = QrDecoder::new();
        let frame = rgb_frame(16, 16, vec![0; 16 * 16 * 3]);
        decoder.detect_all(&frame);

        let quad = Quad::new([
            Point::new(0, 0),
            Point::new(1, 0),
            Point::new(1, 1),
            Point::new(0, 1),
        ]);
        assert!(decoder.decode(&frame, &quad).is_none());
    }
}
