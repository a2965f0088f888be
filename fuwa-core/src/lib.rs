//! Capture and analysis framework for the fuwa-fuwa audio visualizer.
//!
//! The pipeline is: a recorder thread fills a [`SampleBuffer`](analyzer::SampleBuffer)
//! ring with microphone samples, an analyzer closure derives per-frame readings
//! (amplitude level, smoothed spectrum) from it, and the [`Frames`] loop hands
//! those readings to the renderer once per drawn frame through a triple buffer.
//!
//! # Example
//! ```no_run
//! #[derive(Debug, Clone)]
//! pub struct Readings {
//!     spectrum: fuwa_core::analyzer::Spectrum<Vec<f32>>,
//!     level: f32,
//! }
//!
//! fn main() -> Result<(), fuwa_core::AudioError> {
//!     fuwa_core::default_log();
//!     fuwa_core::default_config();
//!
//!     let mut analyzer = fuwa_core::analyzer::FourierBuilder::new()
//!         .length(128)
//!         .window(fuwa_core::analyzer::window::hanning)
//!         .plan();
//!
//!     let spectrum = fuwa_core::analyzer::Spectrum::new(
//!         vec![0.0; analyzer.buckets()],
//!         analyzer.lowest(),
//!         analyzer.highest(),
//!     );
//!
//!     let mut frames = fuwa_core::Visualizer::new(
//!         Readings {
//!             spectrum,
//!             level: 0.0,
//!         },
//!         move |readings, samples| {
//!             readings.spectrum.fill_from(&analyzer.analyze(samples));
//!             readings.level = samples.volume(0.1);
//!             readings
//!         },
//!     )
//!     .frames()?;
//!
//!     loop {
//!         let frame = frames.tick();
//!         frame.lock_info(|readings| {
//!             for _ in 0..(readings.level * 100.0) as usize {
//!                 print!("#");
//!             }
//!             println!();
//!         });
//!         std::thread::sleep(std::time::Duration::from_millis(30));
//!     }
//! }
//! ```
pub mod analyzer;
pub mod error;
pub mod frames;
pub mod helpers;
pub mod recorder;
pub mod visualizer;

#[doc(inline)]
pub use crate::error::AudioError;
#[doc(inline)]
pub use crate::frames::Frames;
#[doc(inline)]
pub use crate::visualizer::Visualizer;

/// `ezconf` configuration
///
/// Usually populated by calling [`default_config`](fn.default_config.html) once at
/// startup, but custom sources can be supplied instead.
///
/// # Example
/// ```rust
/// # fuwa_core::default_config();
/// let bar_count = fuwa_core::CONFIG.get_or("fuwa.bars.count", 32);
/// ```
pub static CONFIG: ezconf::Config = ezconf::INIT;

/// Initialize config from default sources
///
/// The default sources are:
/// * `./fuwa.toml`
/// * `./config/fuwa.toml`
/// * Defaults from code
pub fn default_config() {
    CONFIG
        .init([ezconf::Source::File("fuwa.toml"), ezconf::Source::File("config/fuwa.toml")].iter())
        .expect("Can't load config");
}

/// Initialize logger
///
/// By default, enable debug output in debug-builds.
pub fn default_log() {
    #[cfg(not(debug_assertions))]
    env_logger::init();

    #[cfg(debug_assertions)]
    env_logger::Builder::from_default_env()
        .filter_level(log::LevelFilter::Debug)
        .init();

    color_backtrace::install();
}
