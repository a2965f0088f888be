//! Microphone capture via cpal
//!
//! The capture stream is not `Send`, so device acquisition and the stream
//! itself live on a dedicated thread.  The startup result is reported back
//! synchronously: a failed start is terminal and surfaced to the caller.
use crate::analyzer;
use crate::error::AudioError;
use cpal::traits::{DeviceTrait, HostTrait, StreamTrait};
use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::{mpsc, Arc};
use std::thread;

#[derive(Debug, Default)]
pub struct CpalBuilder {
    pub buffer_size: Option<usize>,
}

impl CpalBuilder {
    pub fn new() -> CpalBuilder {
        Default::default()
    }

    pub fn buffer_size(&mut self, buffer_size: usize) -> &mut CpalBuilder {
        self.buffer_size = Some(buffer_size);
        self
    }

    pub fn create(&mut self) -> Result<CpalRecorder, AudioError> {
        CpalRecorder::new(self.buffer_size.unwrap_or(16000))
    }

    pub fn build(&mut self) -> Result<Box<dyn super::Recorder>, AudioError> {
        Ok(Box::new(self.create()?))
    }
}

#[derive(Debug)]
pub struct CpalRecorder {
    buffer: analyzer::SampleBuffer,
    stop: Arc<AtomicBool>,
}

impl CpalRecorder {
    fn new(buffer_size: usize) -> Result<CpalRecorder, AudioError> {
        let stop = Arc::new(AtomicBool::new(false));
        let (ready_tx, ready_rx) = mpsc::channel();

        {
            let stop = stop.clone();

            thread::Builder::new()
                .name("fuwa-recorder".into())
                .spawn(move || {
                    let (stream, buf) = match open_stream(buffer_size) {
                        Ok(ok) => ok,
                        Err(e) => {
                            let _ = ready_tx.send(Err(e));
                            return;
                        }
                    };

                    let _ = ready_tx.send(Ok(buf));

                    while !stop.load(Ordering::Relaxed) {
                        thread::sleep(std::time::Duration::from_millis(50));
                    }

                    drop(stream);
                    log::debug!("CpalRecorder: capture stream released");
                })
                .map_err(|e| AudioError::Backend(e.to_string()))?;
        }

        let buffer = ready_rx
            .recv()
            .map_err(|_| AudioError::Backend("capture thread died during startup".into()))??;

        Ok(CpalRecorder { buffer, stop })
    }
}

impl Drop for CpalRecorder {
    fn drop(&mut self) {
        self.stop.store(true, Ordering::Relaxed);
    }
}

impl super::Recorder for CpalRecorder {
    fn sample_buffer<'a>(&'a self) -> &'a analyzer::SampleBuffer {
        &self.buffer
    }
}

/// Acquire the default input device and start a capture stream pushing mono
/// samples into a fresh ring buffer
fn open_stream(buffer_size: usize) -> Result<(cpal::Stream, analyzer::SampleBuffer), AudioError> {
    let host = cpal::default_host();
    let device = host
        .default_input_device()
        .ok_or(AudioError::DeviceUnavailable)?;

    let config = device.default_input_config().map_err(|e| match e {
        cpal::DefaultStreamConfigError::DeviceNotAvailable => AudioError::DeviceUnavailable,
        e => AudioError::Backend(e.to_string()),
    })?;

    let sample_format = config.sample_format();
    let channels = config.channels() as usize;
    let rate = config.sample_rate().0 as usize;
    let stream_config: cpal::StreamConfig = config.into();

    let buf = analyzer::SampleBuffer::new(buffer_size, rate);

    log::debug!("CpalRecorder:");
    log::debug!("    Device              = {:?}", device.name().ok());
    log::debug!("    Rate                = {:8}", rate);
    log::debug!("    Channels            = {:8}", channels);
    log::debug!("    Buffer Size         = {:8}", buffer_size);

    let stream = match sample_format {
        cpal::SampleFormat::F32 => build_typed::<f32>(&device, &stream_config, channels, &buf),
        cpal::SampleFormat::I16 => build_typed::<i16>(&device, &stream_config, channels, &buf),
        cpal::SampleFormat::U16 => build_typed::<u16>(&device, &stream_config, channels, &buf),
        cpal::SampleFormat::I32 => build_typed::<i32>(&device, &stream_config, channels, &buf),
        fmt => {
            return Err(AudioError::Backend(format!(
                "unsupported sample format: {:?}",
                fmt
            )))
        }
    }
    .map_err(|e| match e {
        cpal::BuildStreamError::DeviceNotAvailable => AudioError::DeviceUnavailable,
        cpal::BuildStreamError::BackendSpecific { err } => {
            AudioError::PermissionDenied(err.to_string())
        }
        e => AudioError::Backend(e.to_string()),
    })?;

    stream
        .play()
        .map_err(|e| AudioError::Backend(e.to_string()))?;

    Ok((stream, buf))
}

fn build_typed<T>(
    device: &cpal::Device,
    config: &cpal::StreamConfig,
    channels: usize,
    buf: &analyzer::SampleBuffer,
) -> Result<cpal::Stream, cpal::BuildStreamError>
where
    T: cpal::SizedSample,
    f32: cpal::FromSample<T>,
{
    use cpal::Sample;

    let buf = buf.clone();
    let mut mono = Vec::with_capacity(256);

    device.build_input_stream(
        config,
        move |data: &[T], _: &cpal::InputCallbackInfo| {
            mono.clear();
            for frame in data.chunks(channels.max(1)) {
                let sum: f32 = frame.iter().map(|s| f32::from_sample(*s)).sum();
                mono.push(sum / frame.len() as f32);
            }
            buf.push(&mono);
        },
        |err| log::error!("capture stream error: {}", err),
        None,
    )
}
