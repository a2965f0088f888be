//! Geometry animation
//!
//! The deterministic math that turns a conditioned signal plus the frame
//! counter into drawable primitives.  Everything here is a pure function of
//! `(frame, signal, style)`; the renderer translates the origin-centered
//! coordinates to the canvas center and rasterizes.

use crate::conditioner::ConditionedSignal;
use crate::style::{DiscStyle, Style};
use std::f32::consts::TAU;

/// Color in either space the drawing surface supports
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Color {
    /// Hue 0-360, saturation and lightness 0-1, alpha 0-1
    Hsl { h: f32, s: f32, l: f32, a: f32 },
    /// Components 0-1
    Rgb { r: f32, g: f32, b: f32, a: f32 },
}

impl Color {
    pub fn hsl(h: f32, s: f32, l: f32) -> Color {
        Color::Hsl { h, s, l, a: 1.0 }
    }

    pub fn hsla(h: f32, s: f32, l: f32, a: f32) -> Color {
        Color::Hsl { h, s, l, a }
    }
}

/// One drawable primitive of a frame's geometry snapshot
#[derive(Debug, Clone, PartialEq)]
pub enum Primitive {
    Line {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        width: f32,
        color: Color,
    },
    Dot {
        x: f32,
        y: f32,
        diameter: f32,
        color: Color,
    },
    Wedge {
        x1: f32,
        y1: f32,
        x2: f32,
        y2: f32,
        x3: f32,
        y3: f32,
        color: Color,
    },
    Rect {
        x: f32,
        y: f32,
        w: f32,
        h: f32,
        color: Color,
    },
}

/// Wave displacement of the outline at `angle`
///
/// The secondary ripple is phase-decorrelated per segment through `seed`.
/// Exactly zero while the activity gate is closed.
pub fn wave_val(angle: f32, frame: usize, seed: f32, sig: &ConditionedSignal, style: &Style) -> f32 {
    if !sig.active {
        return 0.0;
    }

    let t = frame as f32;
    (angle * style.wave_freq + t * style.wave_speed).sin() * sig.wave_amplitude
        + (angle * style.ripple_freq + t * style.ripple_speed + seed).sin() * style.ripple_amp
}

/// Hue of the outline at fractional position `t` along edge `edge`
///
/// One full rainbow sweep per polygon traversal, continuous across edges and
/// wrapping exactly at the seam.
pub fn hex_hue(edge: usize, t: f32, sides: usize) -> f32 {
    (edge as f32 + t) / sides as f32 * 360.0
}

fn segment_seed(index: usize) -> f32 {
    100.0 + index as f32 * 13.0
}

/// Compute one frame's worth of primitives, centered at the origin
pub fn animate(frame: usize, sig: &ConditionedSignal, style: &Style) -> Vec<Primitive> {
    let mut out = Vec::with_capacity(style.sides * style.steps_hex * 2 + 256);

    // Glow pass first, thin pass on top
    outline_pass(&mut out, frame, sig, style, style.glow_width, style.glow_alpha);
    outline_pass(&mut out, frame, sig, style, style.line_width, 1.0);

    bars(&mut out, sig, style);
    disc(&mut out, sig, style);

    out
}

/// One stroke pass over the wavy hex outline
///
/// Each edge is subdivided into `steps_hex` segments for rendering only; the
/// last segment ends at a full turn, closing the shape.
fn outline_pass(
    out: &mut Vec<Primitive>,
    frame: usize,
    sig: &ConditionedSignal,
    style: &Style,
    width: f32,
    alpha: f32,
) {
    let angle_step = TAU / style.sides as f32;

    for i in 0..style.sides {
        for j in 0..style.steps_hex {
            let t1 = j as f32 / style.steps_hex as f32;
            let t2 = (j + 1) as f32 / style.steps_hex as f32;
            let angle1 = angle_step * (i as f32 + t1);
            let angle2 = angle_step * (i as f32 + t2);

            let index = i * style.steps_hex + j;
            let wave1 = wave_val(angle1, frame, segment_seed(index), sig, style);
            let wave2 = wave_val(angle2, frame, segment_seed(index + 1), sig, style);

            let r1 = style.base_radius + wave1;
            let r2 = style.base_radius + wave2;

            out.push(Primitive::Line {
                x1: angle1.cos() * r1,
                y1: angle1.sin() * r1,
                x2: angle2.cos() * r2,
                y2: angle2.sin() * r2,
                width,
                color: Color::hsla(hex_hue(i, t1, style.sides), 1.0, 0.6, alpha),
            });
        }
    }
}

/// Radial dot-bars: a quantized VU meter, dots stepping inward
fn bars(out: &mut Vec<Primitive>, sig: &ConditionedSignal, style: &Style) {
    let bar_radius = style.base_radius - style.bar_inset;

    for (i, amp) in sig.bar_amplitudes.iter().enumerate() {
        let dot_count = (amp / style.bar_step) as usize;
        if dot_count == 0 {
            continue;
        }

        let angle = TAU / style.bar_count as f32 * i as f32;
        let hue = i as f32 / style.bar_count as f32 * 360.0;

        for d in 0..dot_count {
            let r = bar_radius - d as f32 * style.bar_step;
            out.push(Primitive::Dot {
                x: angle.cos() * r,
                y: angle.sin() * r,
                diameter: style.dot_size,
                color: Color::hsl(hue, 1.0, 0.6),
            });
        }
    }
}

/// Center "fuwa" disc, radius driven directly by the raw level (no gating)
fn disc(out: &mut Vec<Primitive>, sig: &ConditionedSignal, style: &Style) {
    let radius = style.disc_floor + sig.level * style.disc_gain;
    let step = TAU / style.disc_segments as f32;

    match style.disc_style {
        DiscStyle::StrokeGlow => {
            // Halo rings, outermost faintest
            for g in (1..=style.disc_glow_layers).rev() {
                let alpha = 0.08 * g as f32 / style.disc_glow_layers as f32;
                let r = radius + g as f32 * 3.0;
                ring(out, r, step, style, 3.0, alpha);
            }
            ring(out, radius, step, style, 1.2, 1.0);
        }
        DiscStyle::FilledWedge => {
            for i in 0..style.disc_segments {
                let a1 = step * i as f32;
                let a2 = a1 + step;
                out.push(Primitive::Wedge {
                    x1: 0.0,
                    y1: 0.0,
                    x2: a1.cos() * radius,
                    y2: a1.sin() * radius,
                    x3: a2.cos() * radius,
                    y3: a2.sin() * radius,
                    color: Color::hsl(i as f32 / style.disc_segments as f32 * 360.0, 1.0, 0.6),
                });
            }
        }
    }
}

fn ring(out: &mut Vec<Primitive>, radius: f32, step: f32, style: &Style, width: f32, alpha: f32) {
    for i in 0..style.disc_segments {
        let a1 = step * i as f32;
        let a2 = a1 + step;
        out.push(Primitive::Line {
            x1: a1.cos() * radius,
            y1: a1.sin() * radius,
            x2: a2.cos() * radius,
            y2: a2.sin() * radius,
            width,
            color: Color::hsla(
                i as f32 / style.disc_segments as f32 * 360.0,
                1.0,
                0.6,
                alpha,
            ),
        });
    }
}

/// Horizontal spectrum strip, drawn in its own `strip_w` x `strip_h` panel
///
/// Bars read the low half of the spectrum (expand ratio 0.5) and are zeroed
/// below a fixed fraction of full scale.
pub fn linear_strip<S: fuwa_core::analyzer::spectrum::Storage>(
    spectrum: &fuwa_core::analyzer::Spectrum<S>,
    strip_w: f32,
    strip_h: f32,
) -> Vec<Primitive> {
    const EXPAND_RATIO: f32 = 0.5;
    const THRESHOLD: f32 = 200.0 / 255.0;

    let n = spectrum.len().max(1);
    let bar_w = strip_w / n as f32 * 1.5;
    let mut out = Vec::new();
    let mut x = 0.0;

    for i in 0..n {
        let mapped = (i as f32 * EXPAND_RATIO) as usize;
        let value = spectrum.bin(mapped);
        let bar_h = if value < THRESHOLD { 0.0 } else { value * strip_h };

        if bar_h > 0.0 {
            out.push(Primitive::Rect {
                x,
                y: strip_h - bar_h,
                w: bar_w,
                h: bar_h,
                color: Color::Rgb {
                    r: ((50.0 + bar_h * 2.0) / 255.0).min(1.0),
                    g: 150.0 / 255.0,
                    b: 1.0,
                    a: 1.0,
                },
            });
        }
        x += bar_w + 1.0;
    }

    out
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::conditioner::condition;
    use fuwa_core::analyzer::Spectrum;

    fn silent_signal(style: &Style) -> ConditionedSignal {
        condition(0.0, &Spectrum::new(vec![0.0; 64], 0.0, 4000.0), style)
    }

    fn active_signal(level: f32, style: &Style) -> ConditionedSignal {
        condition(level, &Spectrum::new(vec![0.0; 64], 0.0, 4000.0), style)
    }

    fn outline_lines(primitives: &[Primitive]) -> Vec<&Primitive> {
        primitives
            .iter()
            .take(6 * 40) // glow pass of the outline comes first
            .collect()
    }

    #[test]
    fn test_gate_closed_gives_regular_polygon() {
        let style = Style::default();
        let sig = silent_signal(&style);

        let prims = animate(123, &sig, &style);

        for p in outline_lines(&prims) {
            if let Primitive::Line { x1, y1, x2, y2, .. } = p {
                let r1 = (x1 * x1 + y1 * y1).sqrt();
                let r2 = (x2 * x2 + y2 * y2).sqrt();
                assert!((r1 - style.base_radius).abs() < 1e-3, "r1 = {}", r1);
                assert!((r2 - style.base_radius).abs() < 1e-3, "r2 = {}", r2);
            } else {
                panic!("outline pass should be lines");
            }
        }
    }

    #[test]
    fn test_wave_val_matches_formula() {
        let style = Style::default();
        // level 0.05: active, wave amplitude clamp(3, 2, 18) = 3
        let sig = active_signal(0.05, &style);
        assert_eq!(sig.wave_amplitude, 3.0);

        // frame 0, angle 0, first segment seed 100
        let expected = (100.0f32).sin() * 2.0;
        let got = wave_val(0.0, 0, 100.0, &sig, &style);
        assert!((got - expected).abs() < 1e-6, "{} vs {}", got, expected);
    }

    #[test]
    fn test_outline_radius_at_first_vertex() {
        let style = Style::default();
        let sig = active_signal(0.05, &style);

        let prims = animate(0, &sig, &style);
        if let Primitive::Line { x1, y1, .. } = &prims[0] {
            let r = (x1 * x1 + y1 * y1).sqrt();
            let expected = style.base_radius + (100.0f32).sin() * 2.0;
            assert!((r - expected).abs() < 1e-3, "{} vs {}", r, expected);
        } else {
            panic!("first primitive should be an outline line");
        }
    }

    #[test]
    fn test_hue_monotonic_and_wrapping() {
        let style = Style::default();
        let mut last = -1.0;

        for i in 0..style.sides {
            for j in 0..style.steps_hex {
                let hue = hex_hue(i, j as f32 / style.steps_hex as f32, style.sides);
                assert!(hue > last, "hue not increasing at ({}, {})", i, j);
                last = hue;
            }
        }

        assert_eq!(hex_hue(0, 0.0, style.sides), 0.0);
        // The seam wraps exactly: 360 is the same color as 0
        assert_eq!(hex_hue(style.sides, 0.0, style.sides), 360.0);
    }

    #[test]
    fn test_outline_closes() {
        let style = Style::default();
        let sig = silent_signal(&style);

        let prims = animate(0, &sig, &style);
        let lines = outline_lines(&prims);

        let (first, last) = (lines[0], lines[lines.len() - 1]);
        match (first, last) {
            (Primitive::Line { x1, y1, .. }, Primitive::Line { x2, y2, .. }) => {
                assert!((x1 - x2).abs() < 1e-3);
                assert!((y1 - y2).abs() < 1e-3);
            }
            _ => panic!("outline pass should be lines"),
        }
    }

    #[test]
    fn test_two_outline_passes() {
        let style = Style::default();
        let sig = silent_signal(&style);

        let prims = animate(0, &sig, &style);
        let widths: Vec<f32> = prims
            .iter()
            .filter_map(|p| match p {
                Primitive::Line { width, .. } => Some(*width),
                _ => None,
            })
            .collect();

        let glow = widths.iter().filter(|w| **w == style.glow_width).count();
        let thin = widths.iter().filter(|w| **w == style.line_width).count();
        assert_eq!(glow, 6 * 40);
        // thin outline pass + disc rings also use distinct widths
        assert_eq!(thin, 6 * 40);
    }

    #[test]
    fn test_bar_dot_quantization() {
        let style = Style::default();
        let mut sig = silent_signal(&style);
        sig.bar_amplitudes[0] = 12.0;
        sig.bar_amplitudes[3] = 0.0;

        let prims = animate(0, &sig, &style);
        let dots = prims
            .iter()
            .filter(|p| matches!(p, Primitive::Dot { .. }))
            .count();

        // floor(12 / 3) dots for the one lit bar, nothing anywhere else
        assert_eq!(dots, 4);
    }

    #[test]
    fn test_silence_draws_no_dots_and_floor_disc() {
        let style = Style::default();
        let sig = silent_signal(&style);

        let prims = animate(0, &sig, &style);

        assert!(prims.iter().all(|p| !matches!(p, Primitive::Dot { .. })));

        // Innermost disc ring sits at the floor radius
        let min_disc_radius = prims
            .iter()
            .filter_map(|p| match p {
                Primitive::Line { x1, y1, width, .. } if *width == 1.2 => {
                    Some((x1 * x1 + y1 * y1).sqrt())
                }
                _ => None,
            })
            .fold(f32::INFINITY, f32::min);
        assert!((min_disc_radius - style.disc_floor).abs() < 1e-3);
    }

    #[test]
    fn test_disc_styles_never_mix() {
        let mut style = Style::default();
        let sig = active_signal(0.05, &style);

        let stroke = animate(0, &sig, &style);
        assert!(stroke.iter().all(|p| !matches!(p, Primitive::Wedge { .. })));

        style.disc_style = DiscStyle::FilledWedge;
        let wedge = animate(0, &sig, &style);
        let wedges = wedge
            .iter()
            .filter(|p| matches!(p, Primitive::Wedge { .. }))
            .count();
        assert_eq!(wedges, style.disc_segments);
    }

    #[test]
    fn test_disc_radius_follows_level_without_gate() {
        let mut style = Style::default();
        style.disc_style = DiscStyle::FilledWedge;
        // Below the activity gate, the disc still reacts
        let sig = active_signal(0.005, &style);
        assert!(!sig.active);

        let prims = animate(0, &sig, &style);
        let radius = prims
            .iter()
            .filter_map(|p| match p {
                Primitive::Wedge { x2, y2, .. } => Some((x2 * x2 + y2 * y2).sqrt()),
                _ => None,
            })
            .fold(0.0, f32::max);

        assert!((radius - (3.0 + 0.005 * style.disc_gain)).abs() < 1e-4);
    }

    #[test]
    fn test_linear_strip_threshold_and_color() {
        let mut bins = vec![0.0; 16];
        bins[0] = 1.0; // read by bars 0 and 1
        bins[2] = 0.5; // below the 200/255 cutoff
        let spectrum = Spectrum::new(bins, 0.0, 4000.0);

        let prims = linear_strip(&spectrum, 600.0, 120.0);

        assert_eq!(prims.len(), 2);
        if let Primitive::Rect { h, color, .. } = &prims[0] {
            assert_eq!(*h, 120.0);
            // A full-height bar would push red past full scale; it clamps
            assert_eq!(
                *color,
                Color::Rgb {
                    r: 1.0,
                    g: 150.0 / 255.0,
                    b: 1.0,
                    a: 1.0,
                }
            );
        } else {
            panic!("strip should be rects");
        }
    }

    #[test]
    fn test_linear_strip_red_channel_stays_in_range() {
        let mut bins = vec![0.0; 16];
        bins[0] = 200.0 / 255.0; // exactly at the cutoff, short of full scale
        let spectrum = Spectrum::new(bins, 0.0, 4000.0);

        let prims = linear_strip(&spectrum, 600.0, 120.0);

        if let Primitive::Rect { h, color, .. } = &prims[0] {
            let expected = (50.0 + h * 2.0) / 255.0;
            assert!(expected < 1.0);
            assert_eq!(
                *color,
                Color::Rgb {
                    r: expected,
                    g: 150.0 / 255.0,
                    b: 1.0,
                    a: 1.0,
                }
            );
        } else {
            panic!("strip should be rects");
        }
    }
}
