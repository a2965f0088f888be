//! Sample Buffer
//!
//! A fixed-size ring of mono microphone samples shared between the capture
//! thread and the analyzer.  The newest samples sit at the back.
use std::collections;
use std::sync;

pub type Sample = f32;

type _SampleBuf = sync::Arc<parking_lot::Mutex<collections::VecDeque<Sample>>>;

#[derive(Debug, Clone)]
pub struct SampleBuffer {
    buf: _SampleBuf,
    rate: usize,
}

impl SampleBuffer {
    pub fn new(size: usize, rate: usize) -> SampleBuffer {
        let buf = collections::VecDeque::from(vec![0.0; size]);

        SampleBuffer {
            buf: sync::Arc::new(parking_lot::Mutex::new(buf)),
            rate,
        }
    }

    /// Samplerate the capture stream runs at
    #[inline]
    pub fn rate(&self) -> usize {
        self.rate
    }

    pub fn push(&self, new: &[Sample]) {
        let mut lock = self.buf.lock();

        #[cfg(debug_assertions)]
        let debug_size = lock.len();

        for sample in new.iter() {
            lock.pop_front().expect("Failed to pop sample!");
            lock.push_back(*sample);
        }

        #[cfg(debug_assertions)]
        assert_eq!(debug_size, lock.len(), "Sample buffer size differs!");
    }

    /// Iterate over the newest `size * downsample` samples, keeping every
    /// `downsample`th one
    pub fn iter<'a>(&'a self, size: usize, downsample: usize) -> SampleIterator<'a> {
        let lock = self.buf.lock();

        SampleIterator {
            index: lock.len().saturating_sub(size * downsample),
            buf: lock,
            downsample,
        }
    }

    /// Short-window RMS amplitude envelope over the last `length` seconds
    ///
    /// This is the scalar "level" reading, roughly in `[0, 1]` for full-scale
    /// input.
    pub fn volume(&self, length: f32) -> super::SignalStrength {
        use super::SignalStrength;

        let lock = self.buf.lock();
        let len = lock.len();

        let take = ((self.rate as f32 * length) as usize).max(1).min(len);

        (lock
            .iter()
            .skip(len - take)
            .map(|s| (s * s) as SignalStrength)
            .sum::<SignalStrength>()
            / take as SignalStrength)
            .sqrt()
    }
}

pub struct SampleIterator<'a> {
    buf: parking_lot::MutexGuard<'a, collections::VecDeque<Sample>>,
    index: usize,
    downsample: usize,
}

impl Iterator for SampleIterator<'_> {
    type Item = Sample;

    fn next(&mut self) -> Option<Self::Item> {
        let res = self.buf.get(self.index).cloned();
        self.index += self.downsample;
        res
    }
}
