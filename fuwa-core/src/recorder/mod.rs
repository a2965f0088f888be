pub mod cpal;

use crate::analyzer;
use crate::error::AudioError;

/// A source of microphone samples
///
/// Acquiring the device happens exactly once, when the recorder is built;
/// polling the sample buffer never re-requests permission.  Dropping the
/// recorder releases the capture stream.
pub trait Recorder: std::fmt::Debug {
    /// Return the sample buffer where this recorder pushes data into
    fn sample_buffer<'a>(&'a self) -> &'a analyzer::SampleBuffer;
}

#[derive(Debug, Clone, Default)]
pub struct RecorderBuilder {
    pub buffer_size: Option<usize>,
    pub recorder: Option<String>,
}

impl RecorderBuilder {
    pub fn new() -> RecorderBuilder {
        Default::default()
    }

    pub fn buffer_size(&mut self, buffer_size: usize) -> &mut RecorderBuilder {
        self.buffer_size = Some(buffer_size);
        self
    }

    pub fn recorder<S: Into<String>>(&mut self, rec: S) -> &mut RecorderBuilder {
        self.recorder = Some(rec.into());
        self
    }

    pub fn build(&mut self) -> Result<Box<dyn Recorder>, AudioError> {
        let buffer_size = self
            .buffer_size
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.buffer", 16000));
        let recorder = self
            .recorder
            .clone()
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.recorder", "cpal".to_string()));

        match &*recorder {
            "cpal" => self::cpal::CpalBuilder {
                buffer_size: Some(buffer_size),
            }
            .build(),

            other => Err(AudioError::Backend(format!(
                "recorder type {:?} does not exist",
                other
            ))),
        }
    }
}
