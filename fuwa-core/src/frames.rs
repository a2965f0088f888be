//! Per-frame loop
//!
//! [`Frames`] owns the recorder and the analyzer closure.  Every call to
//! [`tick`](Frames::tick) runs the analyzer over the freshest samples,
//! publishes the result through a triple buffer and hands out a [`Frame`]
//! carrying the monotonically increasing frame counter that phases all
//! periodic animation.
use crate::{analyzer, error::AudioError, recorder};
use std::{cell, rc, time};

#[derive(Debug)]
pub struct Frame<R: Send> {
    /// Seconds since the frame loop was built
    pub time: f32,
    /// Frame counter, incremented exactly once per tick
    pub frame: usize,
    info: rc::Rc<cell::RefCell<triple_buffer::Output<R>>>,
}

impl<R: Send> Frame<R> {
    pub fn lock_info<F, O>(&self, f: F) -> O
    where
        F: FnOnce(&R) -> O,
    {
        f(self.info.borrow_mut().read())
    }
}

#[derive(Debug)]
pub struct Frames<R, A>
where
    R: Clone + Send + 'static,
    for<'r> A: FnMut(&'r mut R, &analyzer::SampleBuffer) -> &'r mut R + Send + 'static,
{
    info: rc::Rc<cell::RefCell<triple_buffer::Output<R>>>,
    analyzer: (A, triple_buffer::Input<R>),
    recorder: Box<dyn recorder::Recorder>,
    start_time: time::Instant,
    frame: usize,
}

impl<R, A> Frames<R, A>
where
    R: Clone + Send + 'static,
    for<'r> A: FnMut(&'r mut R, &analyzer::SampleBuffer) -> &'r mut R + Send + 'static,
{
    pub fn from_vis(vis: crate::Visualizer<R, A>) -> Result<Frames<R, A>, AudioError> {
        let (inp, outp) = triple_buffer::TripleBuffer::new(vis.initial).split();

        let recorder = match vis.recorder {
            Some(r) => r,
            None => recorder::RecorderBuilder::new().build()?,
        };

        Ok(Frames {
            info: rc::Rc::new(cell::RefCell::new(outp)),
            analyzer: (vis.analyzer, inp),
            recorder,
            start_time: time::Instant::now(),
            frame: 0,
        })
    }

    /// The sample buffer the recorder captures into
    pub fn sample_buffer(&self) -> &analyzer::SampleBuffer {
        self.recorder.sample_buffer()
    }

    /// Run the analyzer once and return the next frame
    pub fn tick(&mut self) -> Frame<R> {
        let (ref mut analyzer, ref mut info) = self.analyzer;
        analyzer(info.raw_input_buffer(), self.recorder.sample_buffer());
        info.raw_publish();

        let frame = self.frame;
        self.frame += 1;

        Frame {
            time: crate::helpers::time(self.start_time),
            frame,
            info: self.info.clone(),
        }
    }

    pub fn iter<'a>(&'a mut self) -> FramesIter<'a, R, A> {
        FramesIter { frames: self }
    }
}

#[derive(Debug)]
pub struct FramesIter<'a, R, A>
where
    R: Clone + Send + 'static,
    for<'r> A: FnMut(&'r mut R, &analyzer::SampleBuffer) -> &'r mut R + Send + 'static,
{
    frames: &'a mut Frames<R, A>,
}

impl<'a, R, A> Iterator for FramesIter<'a, R, A>
where
    R: Clone + Send + 'static,
    for<'r> A: FnMut(&'r mut R, &analyzer::SampleBuffer) -> &'r mut R + Send + 'static,
{
    type Item = Frame<R>;

    fn next(&mut self) -> Option<Self::Item> {
        Some(self.frames.tick())
    }
}

#[cfg(test)]
mod tests {
    use crate::analyzer;
    use crate::recorder::Recorder;

    #[derive(Debug)]
    struct SilentRecorder(analyzer::SampleBuffer);

    impl Recorder for SilentRecorder {
        fn sample_buffer<'a>(&'a self) -> &'a analyzer::SampleBuffer {
            &self.0
        }
    }

    fn frames() -> crate::Frames<f32, impl for<'r> FnMut(&'r mut f32, &analyzer::SampleBuffer) -> &'r mut f32 + Send>
    {
        crate::Visualizer::new(0.0f32, |info: &mut f32, samples: &analyzer::SampleBuffer| {
            *info = samples.volume(0.1);
            info
        })
        .recorder(Box::new(SilentRecorder(analyzer::SampleBuffer::new(
            1024, 8000,
        ))))
        .frames()
        .unwrap()
    }

    #[test]
    fn test_counter_increments_once_per_tick() {
        let mut frames = frames();

        assert_eq!(frames.tick().frame, 0);
        assert_eq!(frames.tick().frame, 1);
        assert_eq!(frames.tick().frame, 2);
    }

    #[test]
    fn test_analyzer_result_reaches_frame() {
        let mut frames = frames();

        frames.sample_buffer().push(&[0.5; 1024]);

        let frame = frames.tick();
        let level = frame.lock_info(|info| *info);
        assert!((level - 0.5).abs() < 1e-4);
    }

    #[test]
    fn test_iter_matches_tick() {
        let mut frames = frames();
        frames.tick();

        let frame = frames.iter().next().unwrap();
        assert_eq!(frame.frame, 1);
    }
}
