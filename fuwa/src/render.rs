//! Frame rendering
//!
//! Drives the per-frame draw cycle: background (solid black or the pixelated
//! camera frame), then the animator's primitives, then the optional extras.
//! The scene is composed in screen coordinates as plain data so the actual
//! rasterization stays a thin loop over primitives.

use crate::conditioner::ConditionedSignal;
use crate::geometry::{self, Color, Primitive};
use crate::style::Style;
use crate::video::{self, VideoFrame};
use fuwa_core::analyzer::Spectrum;

/// Dimensions of the linear spectrum strip panel
const STRIP_W: f32 = 600.0;
const STRIP_H: f32 = 120.0;

/// Session state machine.  `Loading` blocks all drawing; `Running` repeats at
/// the host's refresh cadence until stopped.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RenderState {
    Idle,
    Loading,
    Ready,
    Running,
    Stopped,
}

#[derive(Debug, thiserror::Error)]
#[error("invalid renderer transition: {from:?} -> {to:?}")]
pub struct InvalidTransition {
    pub from: RenderState,
    pub to: RenderState,
}

impl RenderState {
    fn can_advance_to(self, next: RenderState) -> bool {
        use RenderState::*;

        matches!(
            (self, next),
            (Idle, Loading) | (Loading, Ready) | (Ready, Running) | (Running, Stopped)
        )
    }
}

#[derive(Debug)]
pub struct FrameRenderer {
    state: RenderState,
    style: Style,
}

impl FrameRenderer {
    pub fn new(style: Style) -> FrameRenderer {
        FrameRenderer {
            state: RenderState::Idle,
            style,
        }
    }

    pub fn state(&self) -> RenderState {
        self.state
    }

    pub fn is_running(&self) -> bool {
        self.state == RenderState::Running
    }

    pub fn advance(&mut self, next: RenderState) -> Result<(), InvalidTransition> {
        if !self.state.can_advance_to(next) {
            return Err(InvalidTransition {
                from: self.state,
                to: next,
            });
        }

        log::debug!("FrameRenderer: {:?} -> {:?}", self.state, next);
        self.state = next;
        Ok(())
    }

    /// Compose one frame's scene in screen coordinates
    ///
    /// The viewport size is passed in fresh every tick, so a resized surface
    /// is reflected on the next drawn frame.
    pub fn compose(
        &self,
        frame: usize,
        sig: &ConditionedSignal,
        camera: Option<&VideoFrame>,
        spectrum: &Spectrum<Vec<f32>>,
        width: f32,
        height: f32,
    ) -> Vec<Primitive> {
        if !self.is_running() {
            return Vec::new();
        }

        let mut scene = Vec::new();

        if self.style.camera_overlay {
            if let Some(frame) = camera {
                scene.extend(video::pixelate(
                    frame,
                    width,
                    height,
                    self.style.camera_dot_size,
                    self.style.camera_mirror,
                ));
            }
        }

        let cx = width / 2.0;
        let cy = height / 2.0;
        scene.extend(
            geometry::animate(frame, sig, &self.style)
                .into_iter()
                .map(|p| translate(p, cx, cy)),
        );

        if self.style.linear_strip {
            let x0 = (width - STRIP_W) / 2.0;
            let y0 = height - STRIP_H - 16.0;
            scene.extend(
                geometry::linear_strip(&spectrum.as_ref(), STRIP_W, STRIP_H)
                    .into_iter()
                    .map(|p| translate(p, x0, y0)),
            );
        }

        scene
    }

    /// Rasterize a composed scene onto the macroquad surface
    pub fn draw(&self, scene: &[Primitive]) {
        for p in scene {
            match *p {
                Primitive::Line {
                    x1,
                    y1,
                    x2,
                    y2,
                    width,
                    color,
                } => macroquad::shapes::draw_line(x1, y1, x2, y2, width, to_surface(color)),
                Primitive::Dot {
                    x,
                    y,
                    diameter,
                    color,
                } => macroquad::shapes::draw_circle(x, y, diameter / 2.0, to_surface(color)),
                Primitive::Wedge {
                    x1,
                    y1,
                    x2,
                    y2,
                    x3,
                    y3,
                    color,
                } => macroquad::shapes::draw_triangle(
                    macroquad::math::vec2(x1, y1),
                    macroquad::math::vec2(x2, y2),
                    macroquad::math::vec2(x3, y3),
                    to_surface(color),
                ),
                Primitive::Rect { x, y, w, h, color } => {
                    macroquad::shapes::draw_rectangle(x, y, w, h, to_surface(color))
                }
            }
        }
    }
}

fn translate(p: Primitive, dx: f32, dy: f32) -> Primitive {
    match p {
        Primitive::Line {
            x1,
            y1,
            x2,
            y2,
            width,
            color,
        } => Primitive::Line {
            x1: x1 + dx,
            y1: y1 + dy,
            x2: x2 + dx,
            y2: y2 + dy,
            width,
            color,
        },
        Primitive::Dot {
            x,
            y,
            diameter,
            color,
        } => Primitive::Dot {
            x: x + dx,
            y: y + dy,
            diameter,
            color,
        },
        Primitive::Wedge {
            x1,
            y1,
            x2,
            y2,
            x3,
            y3,
            color,
        } => Primitive::Wedge {
            x1: x1 + dx,
            y1: y1 + dy,
            x2: x2 + dx,
            y2: y2 + dy,
            x3: x3 + dx,
            y3: y3 + dy,
            color,
        },
        Primitive::Rect { x, y, w, h, color } => Primitive::Rect {
            x: x + dx,
            y: y + dy,
            w,
            h,
            color,
        },
    }
}

/// Convert to the surface's RGBA color type
fn to_surface(color: Color) -> macroquad::color::Color {
    let (r, g, b, a) = match color {
        Color::Rgb { r, g, b, a } => (r, g, b, a),
        Color::Hsl { h, s, l, a } => {
            let (r, g, b) = hsl_to_rgb(h, s, l);
            (r, g, b, a)
        }
    };
    macroquad::color::Color::new(r, g, b, a)
}

/// Hue 0-360, saturation/lightness 0-1
fn hsl_to_rgb(h: f32, s: f32, l: f32) -> (f32, f32, f32) {
    let h = ((h % 360.0) + 360.0) % 360.0;
    let c = (1.0 - (2.0 * l - 1.0).abs()) * s;
    let x = c * (1.0 - ((h / 60.0) % 2.0 - 1.0).abs());
    let m = l - c / 2.0;

    let (r, g, b) = match (h / 60.0) as usize {
        0 => (c, x, 0.0),
        1 => (x, c, 0.0),
        2 => (0.0, c, x),
        3 => (0.0, x, c),
        4 => (x, 0.0, c),
        _ => (c, 0.0, x),
    };

    (r + m, g + m, b + m)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditioner::condition;

    fn running_renderer(style: Style) -> FrameRenderer {
        let mut renderer = FrameRenderer::new(style);
        renderer.advance(RenderState::Loading).unwrap();
        renderer.advance(RenderState::Ready).unwrap();
        renderer.advance(RenderState::Running).unwrap();
        renderer
    }

    fn silence() -> (ConditionedSignal, Spectrum<Vec<f32>>) {
        let spectrum = Spectrum::new(vec![0.0; 64], 0.0, 4000.0);
        let sig = condition(0.0, &spectrum, &Style::default());
        (sig, spectrum)
    }

    #[test]
    fn test_state_machine_order() {
        let mut renderer = FrameRenderer::new(Style::default());
        assert_eq!(renderer.state(), RenderState::Idle);

        assert!(renderer.advance(RenderState::Running).is_err());
        renderer.advance(RenderState::Loading).unwrap();
        assert!(renderer.advance(RenderState::Stopped).is_err());
        renderer.advance(RenderState::Ready).unwrap();
        renderer.advance(RenderState::Running).unwrap();
        renderer.advance(RenderState::Stopped).unwrap();

        // Stopped is terminal
        assert!(renderer.advance(RenderState::Running).is_err());
    }

    #[test]
    fn test_loading_draws_nothing() {
        let mut renderer = FrameRenderer::new(Style::default());
        renderer.advance(RenderState::Loading).unwrap();

        let (sig, spectrum) = silence();
        let scene = renderer.compose(0, &sig, None, &spectrum, 800.0, 600.0);

        assert!(scene.is_empty());
    }

    #[test]
    fn test_scene_centered_on_viewport() {
        let renderer = running_renderer(Style::default());
        let (sig, spectrum) = silence();

        let scene = renderer.compose(0, &sig, None, &spectrum, 800.0, 600.0);

        // First outline point sits at angle 0, base radius from center
        if let Primitive::Line { x1, y1, .. } = scene[0] {
            assert!((x1 - (400.0 + 50.0)).abs() < 1e-3);
            assert!((y1 - 300.0).abs() < 1e-3);
        } else {
            panic!("scene should start with the outline");
        }
    }

    #[test]
    fn test_resize_moves_center_next_frame() {
        let renderer = running_renderer(Style::default());
        let (sig, spectrum) = silence();

        let before = renderer.compose(0, &sig, None, &spectrum, 800.0, 600.0);
        let after = renderer.compose(1, &sig, None, &spectrum, 1024.0, 768.0);

        match (&before[0], &after[0]) {
            (Primitive::Line { x1: a, .. }, Primitive::Line { x1: b, .. }) => {
                assert!((a - 450.0).abs() < 1e-3);
                assert!((b - 562.0).abs() < 1e-3);
            }
            _ => panic!("scene should start with the outline"),
        }
    }

    #[test]
    fn test_camera_background_comes_first() {
        let mut style = Style::default();
        style.camera_overlay = true;
        let renderer = running_renderer(style);
        let (sig, spectrum) = silence();

        let frame = VideoFrame {
            width: 2,
            height: 2,
            rgba: vec![128; 16],
        };
        let scene = renderer.compose(0, &sig, Some(&frame), &spectrum, 96.0, 48.0);

        assert!(matches!(scene[0], Primitive::Rect { .. }));
        assert!(scene.iter().any(|p| matches!(p, Primitive::Line { .. })));
    }

    #[test]
    fn test_hsl_primaries() {
        assert_eq!(hsl_to_rgb(0.0, 1.0, 0.5), (1.0, 0.0, 0.0));
        assert_eq!(hsl_to_rgb(120.0, 1.0, 0.5), (0.0, 1.0, 0.0));
        assert_eq!(hsl_to_rgb(240.0, 1.0, 0.5), (0.0, 0.0, 1.0));

        // The hue seam wraps to the same color
        assert_eq!(hsl_to_rgb(360.0, 1.0, 0.5), hsl_to_rgb(0.0, 1.0, 0.5));
    }
}
