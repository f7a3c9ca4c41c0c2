//! Detection overlay drawing on raw RGB frames.
//!
//! Each detected quad gets its four edges drawn onto the frame before the
//! frame is converted for display. Drawing is independent of whether the
//! region decoded - regions that fail to decode are still marked, which makes
//! weak detections visible.

use crate::camera::Frame;
use crate::detect::{Point, Quad};

/// RGB color of the detection border.
pub const BORDER_COLOR: [u8; 3] = [255, 0, 0];

/// Draw the four edges of a quad onto the frame.
pub fn draw_quad(frame: &mut Frame, quad: &Quad, color: [u8; 3]) {
    for (a, b) in quad.edges() {
        draw_line(frame, a, b, color);
    }
}

/// Draw a line segment using Bresenham's algorithm.
///
/// Segments may run partially or fully outside the frame; out-of-bounds
/// pixels are clipped per pixel.
fn draw_line(frame: &mut Frame, from: Point, to: Point, color: [u8; 3]) {
    let dx = (to.x - from.x).abs();
    let dy = -(to.y - from.y).abs();
    let sx = if from.x < to.x { 1 } else { -1 };
    let sy = if from.y < to.y { 1 } else { -1 };
    let mut err = dx + dy;

    let mut x = from.x;
    let mut y = from.y;

    loop {
        put_pixel(frame, x, y, color);
        if x == to.x && y == to.y {
            break;
        }
        let e2 = 2 * err;
        if e2 >= dy {
            err += dy;
            x += sx;
        }
        if e2 <= dx {
            err += dx;
            y += sy;
        }
    }
}

fn put_pixel(frame: &mut Frame, x: i32, y: i32, color: [u8; 3]) {
    if x < 0 || y < 0 || x >= frame.width as i32 || y >= frame.height as i32 {
        return;
    }
    let bpp = frame.bytes_per_pixel();
    let offset = (y as usize * frame.width as usize + x as usize) * bpp;
    // The buffer may be shorter than the declared dimensions imply; a
    // corrupt frame is dropped later, not panicked on here
    if let Some(dest) = frame.data.get_mut(offset..offset + 3) {
        dest.copy_from_slice(&color);
    }
}
