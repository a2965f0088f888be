//! Audio session wiring
//!
//! A [`Session`] owns one microphone capture plus the analyzer closure that
//! turns samples into [`AudioFeatures`] every tick.  [`Lifecycle`] sits above
//! it and makes starting idempotent: the latch is taken before any fallible
//! acquisition work, so overlapping start requests collapse into one.

use crate::style::Style;
use fuwa_core::analyzer::{FourierBuilder, SampleBuffer, Spectrum};
use fuwa_core::recorder::{Recorder, RecorderBuilder};
use fuwa_core::{AudioError, Frames, Visualizer};
use std::sync::atomic::{AtomicBool, Ordering};

/// Everything the conditioner needs from one analysis pass
#[derive(Debug, Clone)]
pub struct AudioFeatures {
    /// RMS amplitude over the last 100ms
    pub level: f32,
    /// Smoothed magnitude spectrum
    pub spectrum: Spectrum<Vec<f32>>,
}

pub type Analyzer =
    Box<dyn for<'r> FnMut(&'r mut AudioFeatures, &SampleBuffer) -> &'r mut AudioFeatures + Send>;

fn boxed_analyzer<F>(f: F) -> Analyzer
where
    F: for<'r> FnMut(&'r mut AudioFeatures, &SampleBuffer) -> &'r mut AudioFeatures
        + Send
        + 'static,
{
    Box::new(f)
}

pub struct Session {
    pub frames: Frames<AudioFeatures, Analyzer>,
}

impl Session {
    /// Acquire the default microphone and start analyzing
    pub fn open(style: &Style) -> Result<Session, AudioError> {
        let recorder = RecorderBuilder::new().build()?;
        Session::with_recorder(style, recorder)
    }

    /// Like [`open`](Session::open), with capture supplied by the caller
    pub fn with_recorder(
        style: &Style,
        recorder: Box<dyn Recorder>,
    ) -> Result<Session, AudioError> {
        // Twice the bar count in buckets, matching the circular bar mapping
        let mut fourier = FourierBuilder::new()
            .rate(recorder.sample_buffer().rate())
            .length(style.bar_count * 4)
            .plan();

        let initial = AudioFeatures {
            level: 0.0,
            spectrum: Spectrum::new(
                vec![0.0; fourier.buckets()],
                fourier.lowest(),
                fourier.highest(),
            ),
        };

        let analyzer = boxed_analyzer(move |features, samples| {
            features.level = samples.volume(0.1);
            features.spectrum.fill_from(&fourier.analyze(samples));
            features
        });

        let frames = Visualizer::new(initial, analyzer)
            .recorder(recorder)
            .frames()?;

        Ok(Session { frames })
    }
}

/// Start/stop latch around an optional [`Session`]
#[derive(Default)]
pub struct Lifecycle {
    latch: AtomicBool,
    session: Option<Session>,
}

impl Lifecycle {
    pub fn new() -> Lifecycle {
        Default::default()
    }

    pub fn is_started(&self) -> bool {
        self.latch.load(Ordering::SeqCst)
    }

    pub fn session_mut(&mut self) -> Option<&mut Session> {
        self.session.as_mut()
    }

    /// Build and install a session unless one is already up
    ///
    /// Returns `Ok(false)` without touching anything when the latch is
    /// already taken.  On a failed build the latch is released again so a
    /// later attempt can retry.
    pub fn start<F>(&mut self, build: F) -> Result<bool, AudioError>
    where
        F: FnOnce() -> Result<Session, AudioError>,
    {
        if self.latch.swap(true, Ordering::SeqCst) {
            return Ok(false);
        }

        // Dispose of any stale session before acquiring anew
        self.session = None;

        match build() {
            Ok(session) => {
                self.session = Some(session);
                Ok(true)
            }
            Err(e) => {
                self.latch.store(false, Ordering::SeqCst);
                Err(e)
            }
        }
    }

    /// Tear the session down.  Safe to call when nothing is running.
    pub fn stop(&mut self) {
        self.session = None;
        self.latch.store(false, Ordering::SeqCst);
    }
}
