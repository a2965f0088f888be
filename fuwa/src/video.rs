//! Camera frame overlay
//!
//! Frame acquisition itself is external: a producer publishes whole decoded
//! frames into a [`SharedFrame`] cell and the renderer reads whatever is
//! latest at draw time.  Only full-frame reads and writes occur, so no
//! tearing protection is needed.  What lives here is the pixelation mapping
//! that turns the latest frame into a grid of flat luminance-tinted blocks.

use crate::geometry::{Color, Primitive};
use std::sync::Arc;

/// One decoded video frame, row-major RGBA8
#[derive(Debug, Clone, PartialEq)]
pub struct VideoFrame {
    pub width: usize,
    pub height: usize,
    pub rgba: Vec<u8>,
}

impl VideoFrame {
    fn pixel(&self, x: usize, y: usize) -> (u8, u8, u8) {
        let i = (y * self.width + x) * 4;
        (self.rgba[i], self.rgba[i + 1], self.rgba[i + 2])
    }
}

/// Latest-frame cell shared between the capture side and the renderer
#[derive(Debug, Clone, Default)]
pub struct SharedFrame(Arc<parking_lot::Mutex<Option<VideoFrame>>>);

impl SharedFrame {
    pub fn new() -> SharedFrame {
        Default::default()
    }

    /// Replace the latest frame.  Called by the external producer.
    ///
    /// A frame whose buffer does not match its dimensions is dropped; the
    /// renderer indexes by `width`/`height` and must never read past the
    /// buffer.
    pub fn publish(&self, frame: VideoFrame) {
        if frame.rgba.len() != frame.width * frame.height * 4 {
            log::error!(
                "dropping malformed video frame: {}x{} with {} bytes",
                frame.width,
                frame.height,
                frame.rgba.len()
            );
            return;
        }
        *self.0.lock() = Some(frame);
    }

    /// Clone out the latest frame, if any
    pub fn snapshot(&self) -> Option<VideoFrame> {
        self.0.lock().clone()
    }
}

/// Rec. 601 luma
fn luminance(r: u8, g: u8, b: u8) -> f32 {
    (0.299 * r as f32 + 0.587 * g as f32 + 0.114 * b as f32) / 255.0
}

/// Reduce `frame` to a grid of flat blocks covering `out_w` x `out_h`
///
/// The frame is sampled on a grid of stride `dot`, each block becomes a flat
/// gray from the sampled pixel's luminance.  With `mirror` the horizontal
/// axis is flipped to match the usual self-view convention.
pub fn pixelate(
    frame: &VideoFrame,
    out_w: f32,
    out_h: f32,
    dot: f32,
    mirror: bool,
) -> Vec<Primitive> {
    if frame.width == 0 || frame.height == 0 || dot <= 0.0 {
        return Vec::new();
    }

    let mut out = Vec::new();

    let mut y = 0.0;
    while y < out_h {
        let mut x = 0.0;
        while x < out_w {
            let mut u = (x + dot / 2.0) / out_w;
            let v = (y + dot / 2.0) / out_h;
            if mirror {
                u = 1.0 - u;
            }

            let sx = ((u * frame.width as f32) as usize).min(frame.width - 1);
            let sy = ((v * frame.height as f32) as usize).min(frame.height - 1);

            let (r, g, b) = frame.pixel(sx, sy);
            let l = luminance(r, g, b);

            out.push(Primitive::Rect {
                x,
                y,
                w: dot,
                h: dot,
                color: Color::Rgb {
                    r: l,
                    g: l,
                    b: l,
                    a: 1.0,
                },
            });

            x += dot;
        }
        y += dot;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;

    /// 2x1 frame: left pixel white, right pixel black
    fn two_pixel_frame() -> VideoFrame {
        VideoFrame {
            width: 2,
            height: 1,
            rgba: vec![255, 255, 255, 255, 0, 0, 0, 255],
        }
    }

    fn block_luma(p: &Primitive) -> f32 {
        match p {
            Primitive::Rect {
                color: Color::Rgb { r, .. },
                ..
            } => *r,
            _ => panic!("pixelation should produce rects"),
        }
    }

    #[test]
    fn test_grid_covers_output() {
        let frame = two_pixel_frame();
        let blocks = pixelate(&frame, 96.0, 48.0, 24.0, false);

        // ceil(96/24) * ceil(48/24)
        assert_eq!(blocks.len(), 4 * 2);
    }

    #[test]
    fn test_luminance_is_flat_gray() {
        let frame = VideoFrame {
            width: 1,
            height: 1,
            rgba: vec![255, 0, 0, 255],
        };
        let blocks = pixelate(&frame, 24.0, 24.0, 24.0, false);

        assert!((block_luma(&blocks[0]) - 0.299).abs() < 1e-4);
    }

    #[test]
    fn test_mirror_flips_sampling() {
        let frame = two_pixel_frame();

        let plain = pixelate(&frame, 48.0, 24.0, 24.0, false);
        let mirrored = pixelate(&frame, 48.0, 24.0, 24.0, true);

        assert_eq!(block_luma(&plain[0]), 1.0);
        assert_eq!(block_luma(&plain[1]), 0.0);
        assert_eq!(block_luma(&mirrored[0]), 0.0);
        assert_eq!(block_luma(&mirrored[1]), 1.0);
    }

    #[test]
    fn test_shared_frame_roundtrip() {
        let cell = SharedFrame::new();
        assert!(cell.snapshot().is_none());

        cell.publish(two_pixel_frame());
        assert_eq!(cell.snapshot(), Some(two_pixel_frame()));
    }

    #[test]
    fn test_undersized_frame_is_dropped() {
        let cell = SharedFrame::new();
        cell.publish(two_pixel_frame());

        // Claims 2x2 but only carries one pixel of data
        cell.publish(VideoFrame {
            width: 2,
            height: 2,
            rgba: vec![255, 0, 0, 255],
        });

        // The good frame stays current and sampling it stays in bounds
        let latest = cell.snapshot().unwrap();
        assert_eq!(latest, two_pixel_frame());
        assert_eq!(pixelate(&latest, 48.0, 24.0, 24.0, false).len(), 2);
    }
}
