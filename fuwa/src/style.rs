//! Style configuration
//!
//! All layer constants live here instead of being forked across near-identical
//! draw paths: the calm and the dramatic center-disc variants are the same
//! animator with a different `Style`.

/// How the center disc is rendered.  One style per deployment; never mixed.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum DiscStyle {
    /// 60 thin stroke segments plus decreasing-alpha halo rings
    StrokeGlow,
    /// 60 filled triangular wedges, solid fill
    FilledWedge,
}

impl DiscStyle {
    pub fn from_str(name: &str) -> Option<DiscStyle> {
        match name {
            "stroke-glow" => Some(DiscStyle::StrokeGlow),
            "filled-wedge" => Some(DiscStyle::FilledWedge),
            _ => None,
        }
    }
}

#[derive(Debug, Clone)]
pub struct Style {
    // Activity gate
    pub threshold: f32,

    // Hex outline
    pub sides: usize,
    pub steps_hex: usize,
    pub base_radius: f32,
    pub gain: f32,
    pub min_amp: f32,
    pub max_amp: f32,
    pub wave_freq: f32,
    pub wave_speed: f32,
    pub ripple_freq: f32,
    pub ripple_speed: f32,
    pub ripple_amp: f32,
    pub glow_width: f32,
    pub glow_alpha: f32,
    pub line_width: f32,

    // Radial dot-bars
    pub bar_count: usize,
    pub bar_length: f32,
    pub bar_threshold: f32,
    pub bar_inset: f32,
    pub bar_step: f32,
    pub dot_size: f32,
    pub expand_ratio: f32,
    pub treble_boost: f32,
    pub treble_cutoff: f32,

    // Center disc
    pub disc_style: DiscStyle,
    pub disc_floor: f32,
    pub disc_gain: f32,
    pub disc_segments: usize,
    pub disc_glow_layers: usize,

    // Background / extras
    pub camera_overlay: bool,
    pub camera_mirror: bool,
    pub camera_dot_size: f32,
    pub linear_strip: bool,
}

impl Default for Style {
    fn default() -> Style {
        Style {
            threshold: 0.01,

            sides: 6,
            steps_hex: 40,
            base_radius: 50.0,
            gain: 60.0,
            min_amp: 2.0,
            max_amp: 18.0,
            wave_freq: 8.0,
            wave_speed: 0.25,
            ripple_freq: 2.0,
            ripple_speed: 0.07,
            ripple_amp: 2.0,
            glow_width: 2.0,
            glow_alpha: 0.5,
            line_width: 0.1,

            bar_count: 32,
            bar_length: 32.0,
            bar_threshold: 12.0,
            bar_inset: 6.0,
            bar_step: 3.0,
            dot_size: 3.0,
            expand_ratio: 0.3,
            treble_boost: 2.5,
            treble_cutoff: 0.05,

            disc_style: DiscStyle::StrokeGlow,
            disc_floor: 3.0,
            disc_gain: 10.0,
            disc_segments: 60,
            disc_glow_layers: 8,

            camera_overlay: false,
            camera_mirror: true,
            camera_dot_size: 24.0,
            linear_strip: false,
        }
    }
}

impl Style {
    /// Load the style from config, falling back to the defaults above
    pub fn from_config() -> Style {
        let defaults = Style::default();

        let disc_style_name =
            fuwa_core::CONFIG.get_or("fuwa.disc.style", "stroke-glow".to_string());
        let disc_style =
            DiscStyle::from_str(&disc_style_name).expect("Selected disc style not found!");

        Style {
            threshold: fuwa_core::CONFIG.get_or("fuwa.threshold", defaults.threshold),

            base_radius: fuwa_core::CONFIG.get_or("fuwa.hex.radius", defaults.base_radius),
            gain: fuwa_core::CONFIG.get_or("fuwa.hex.gain", defaults.gain),
            min_amp: fuwa_core::CONFIG.get_or("fuwa.hex.min_amp", defaults.min_amp),
            max_amp: fuwa_core::CONFIG.get_or("fuwa.hex.max_amp", defaults.max_amp),

            bar_count: fuwa_core::CONFIG.get_or("fuwa.bars.count", defaults.bar_count),
            bar_threshold: fuwa_core::CONFIG.get_or("fuwa.bars.threshold", defaults.bar_threshold),
            expand_ratio: fuwa_core::CONFIG.get_or("fuwa.bars.expand_ratio", defaults.expand_ratio),

            disc_style,
            disc_gain: fuwa_core::CONFIG.get_or("fuwa.disc.gain", defaults.disc_gain),

            camera_overlay: fuwa_core::CONFIG.get_or("fuwa.camera.overlay", defaults.camera_overlay),
            camera_mirror: fuwa_core::CONFIG.get_or("fuwa.camera.mirror", defaults.camera_mirror),
            camera_dot_size: fuwa_core::CONFIG
                .get_or("fuwa.camera.dot_size", defaults.camera_dot_size),
            linear_strip: fuwa_core::CONFIG.get_or("fuwa.strip.enabled", defaults.linear_strip),

            ..defaults
        }
    }
}
