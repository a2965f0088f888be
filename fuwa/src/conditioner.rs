//! Signal conditioning
//!
//! Turns the raw per-tick readings (level + spectrum) into the bounded,
//! gated values the animator consumes.  Pure and deterministic given its
//! inputs; missing or undersized spectrum data reads as zero-valued bins.

use crate::style::Style;
use fuwa_core::analyzer::{spectrum::Storage, Spectrum};

#[derive(Debug, Clone, PartialEq)]
pub struct ConditionedSignal {
    /// Raw amplitude level, passed through for the (ungated) center disc
    pub level: f32,
    /// Level above the activity threshold.  Hard gate: all wave and bar
    /// motion is fully suppressed when false.
    pub active: bool,
    /// Outline wave amplitude, clamped to `[min_amp, max_amp]` while active
    pub wave_amplitude: f32,
    /// One amplitude per visual bar; suppressed bars are exactly zero
    pub bar_amplitudes: Vec<f32>,
}

pub fn condition<S: Storage>(
    level: f32,
    spectrum: &Spectrum<S>,
    style: &Style,
) -> ConditionedSignal {
    let active = level > style.threshold;

    let wave_amplitude = if active {
        (level * style.gain).clamp(style.min_amp, style.max_amp)
    } else {
        0.0
    };

    let n = spectrum.len();
    let bar_amplitudes = (0..style.bar_count)
        .map(|i| {
            // Compress the mapping into the low-frequency part of the spectrum
            let mapped =
                (i as f32 * style.expand_ratio * n as f32 / style.bar_count as f32) as usize;
            let mut amp = spectrum.bin(mapped) * style.bar_length;

            // Naturally quieter treble gets an extra push
            if mapped as f32 > n as f32 * style.treble_cutoff {
                amp *= style.treble_boost;
            }

            if amp < style.bar_threshold {
                0.0
            } else {
                amp
            }
        })
        .collect();

    ConditionedSignal {
        level,
        active,
        wave_amplitude,
        bar_amplitudes,
    }
}
