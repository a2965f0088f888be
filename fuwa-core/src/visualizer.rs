use crate::analyzer;
use crate::error::AudioError;
use crate::recorder;

/// Entry point for building a frame loop
///
/// Holds the initial analyzer result, the analyzer closure and an optional
/// recorder override.  Without an override, [`frames`](Visualizer::frames)
/// builds the configured default recorder, which is where microphone
/// acquisition can fail.
#[derive(Debug)]
pub struct Visualizer<R, A>
where
    R: Clone + Send + 'static,
    for<'r> A: FnMut(&'r mut R, &analyzer::SampleBuffer) -> &'r mut R + Send + 'static,
{
    pub initial: R,
    pub analyzer: A,
    pub recorder: Option<Box<dyn recorder::Recorder>>,
}

impl<R, A> Visualizer<R, A>
where
    R: Clone + Send + 'static,
    for<'r> A: FnMut(&'r mut R, &analyzer::SampleBuffer) -> &'r mut R + Send + 'static,
{
    pub fn new(initial: R, analyzer: A) -> Visualizer<R, A> {
        Visualizer {
            initial,
            analyzer,
            recorder: None,
        }
    }

    pub fn recorder(mut self, r: Box<dyn recorder::Recorder>) -> Visualizer<R, A> {
        self.recorder = Some(r);
        self
    }

    pub fn frames(self) -> Result<crate::Frames<R, A>, AudioError> {
        crate::Frames::from_vis(self)
    }
}
