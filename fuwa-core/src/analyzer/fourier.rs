//! Fourier Analysis
use super::Sample;
use crate::analyzer;

/// Window functions
///
/// A window-function takes a size and returns a `Vec` of that length filled
/// with the precomputed window coefficients.
pub mod window {
    /// Blackman Window
    pub fn blackman(size: usize) -> Vec<f32> {
        apodize::blackman_iter(size).map(|f| f as f32).collect()
    }

    /// Hamming Window
    pub fn hamming(size: usize) -> Vec<f32> {
        apodize::hamming_iter(size).map(|f| f as f32).collect()
    }

    /// Hanning Window
    pub fn hanning(size: usize) -> Vec<f32> {
        apodize::hanning_iter(size).map(|f| f as f32).collect()
    }

    /// No window function / Rectangle window
    pub fn none(size: usize) -> Vec<f32> {
        vec![1.0; size]
    }

    /// Nuttall Window
    pub fn nuttall(size: usize) -> Vec<f32> {
        apodize::nuttall_iter(size).map(|f| f as f32).collect()
    }

    /// Sine Window
    pub fn sine(size: usize) -> Vec<f32> {
        (0..size)
            .map(|i| (i as f32 / (size - 1) as f32 * std::f32::consts::PI).sin())
            .collect()
    }

    /// Triangular Window
    pub fn triangular(size: usize) -> Vec<f32> {
        apodize::triangular_iter(size).map(|f| f as f32).collect()
    }

    /// Get the window function for the specified name
    pub fn from_str(name: &str) -> Option<fn(usize) -> Vec<f32>> {
        match name {
            "blackman" => Some(blackman),
            "hamming" => Some(hamming),
            "hanning" => Some(hanning),
            "none" => Some(none),
            "nuttall" => Some(nuttall),
            "sine" => Some(sine),
            "triangular" => Some(triangular),
            _ => None,
        }
    }
}

/// Builder for FourierAnalyzer
#[derive(Debug, Default)]
pub struct FourierBuilder {
    /// Length of the fourier transform
    ///
    /// Most efficient if this is a power of two.  With bar-driven visuals the
    /// default is sized so `bar_count * 2` buckets come out.
    ///
    /// Can also be set from config as `"audio.fourier.length"`.
    pub length: Option<usize>,

    /// Window Function
    ///
    /// A few window functions are defined in the [`window`](window/index.html) module.
    ///
    /// Can also be set from config as `"audio.fourier.window"`.
    pub window: Option<fn(usize) -> Vec<f32>>,

    /// Downsampling factor
    ///
    /// Can also be set from config as `"audio.fourier.downsample"`.
    pub downsample: Option<usize>,

    /// Rate of the captured data
    ///
    /// `FourierAnalyzer` will panic if the `SampleBuffer`'s rate does not match.
    ///
    /// Can also be set from config as `"audio.rate"`.
    pub rate: Option<usize>,

    /// Spectral smoothing coefficient in `[0, 1)`
    ///
    /// Each analyze call blends into the previous spectrum:
    /// `out = smoothing * previous + (1 - smoothing) * new`.
    ///
    /// Can also be set from config as `"audio.fourier.smoothing"`.
    pub smoothing: Option<f32>,
}

impl FourierBuilder {
    /// Create a new FourierBuilder
    pub fn new() -> FourierBuilder {
        Default::default()
    }

    /// Set the length of the transform buffer
    pub fn length(&mut self, length: usize) -> &mut FourierBuilder {
        self.length = Some(length);
        self
    }

    /// Set the window function
    pub fn window(&mut self, f: fn(usize) -> Vec<f32>) -> &mut FourierBuilder {
        self.window = Some(f);
        self
    }

    /// Set the downsampling factor
    pub fn downsample(&mut self, factor: usize) -> &mut FourierBuilder {
        self.downsample = Some(factor);
        self
    }

    /// Set the recording rate of the `SampleBuffer`
    pub fn rate(&mut self, rate: usize) -> &mut FourierBuilder {
        self.rate = Some(rate);
        self
    }

    /// Set the spectral smoothing coefficient
    pub fn smoothing(&mut self, smoothing: f32) -> &mut FourierBuilder {
        self.smoothing = Some(smoothing);
        self
    }

    /// Plan the fourier transform and prepare buffers
    pub fn plan(&mut self) -> FourierAnalyzer {
        let length = self
            .length
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.fourier.length", 128));
        let window = (self.window.unwrap_or_else(|| {
            window::from_str(&crate::CONFIG.get_or("audio.fourier.window", "hanning".to_string()))
                .expect("Selected window type not found!")
        }))(length);
        let downsample = self
            .downsample
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.fourier.downsample", 5));
        let rate = self
            .rate
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.rate", 8000));
        let smoothing = self
            .smoothing
            .unwrap_or_else(|| crate::CONFIG.get_or("audio.fourier.smoothing", 0.8));

        FourierAnalyzer::new(length, window, downsample, rate, smoothing)
    }
}

/// Fourier Analyzer
///
/// Transforms the newest window of mono samples into a magnitude spectrum,
/// normalized so a full-scale sine reads close to `1.0`, and exponentially
/// smoothed across calls.
///
/// # Example
/// ```
/// # use fuwa_core::analyzer::fourier::*;
/// let analyzer = FourierBuilder::new()
///     .length(128)
///     .window(window::hanning)
///     .downsample(5)
///     .rate(8000)
///     .smoothing(0.8)
///     .plan();
/// ```
#[derive(Clone)]
pub struct FourierAnalyzer {
    length: usize,
    buckets: usize,
    window: Vec<Sample>,
    downsample: usize,
    smoothing: f32,

    rate: usize,
    lowest: analyzer::Frequency,
    highest: analyzer::Frequency,

    fft: std::sync::Arc<dyn rustfft::Fft<Sample>>,

    input: Vec<rustfft::num_complex::Complex<Sample>>,

    spectrum: analyzer::Spectrum<Vec<analyzer::SignalStrength>>,
}

impl std::fmt::Debug for FourierAnalyzer {
    fn fmt(&self, f: &mut std::fmt::Formatter) -> std::fmt::Result {
        write!(
            f,
            "FourierAnalyzer {{ length: {:?}, downsample: {:?}, smoothing: {:?}, lowest: {:?}, highest: {:?} }}",
            self.length, self.downsample, self.smoothing, self.lowest, self.highest,
        )
    }
}

impl FourierAnalyzer {
    fn new(
        length: usize,
        window: Vec<f32>,
        downsample: usize,
        rate: usize,
        smoothing: f32,
    ) -> FourierAnalyzer {
        assert!((0.0..1.0).contains(&smoothing), "Smoothing out of range!");

        let fft = rustfft::FftPlanner::new().plan_fft_forward(length);
        let buckets = length / 2;

        let downsampled_rate = rate as f32 / downsample as f32;
        let lowest = downsampled_rate / length as f32;
        let highest = downsampled_rate / 2.0;

        let fa = FourierAnalyzer {
            length,
            buckets,
            window,
            downsample,
            smoothing,

            rate,
            lowest,
            highest,

            fft,

            input: Vec::with_capacity(length),

            spectrum: analyzer::Spectrum::new(vec![0.0; buckets], lowest, highest),
        };

        log::debug!("FourierAnalyzer({:p}):", &fa);
        log::debug!("    Fourier Length      = {:8}", length);
        log::debug!("    Buckets             = {:8}", buckets);
        log::debug!(
            "    Downsampled Rate    = {:8} ({} / {})",
            downsampled_rate,
            rate,
            downsample,
        );
        log::debug!("    Smoothing           = {:8.3}", smoothing);
        log::debug!("    Lowest  Frequency   = {:8.3} Hz", lowest);
        log::debug!("    Highest Frequency   = {:8.3} Hz", highest);

        fa
    }

    /// Return the number of buckets
    #[inline]
    pub fn buckets(&self) -> usize {
        self.buckets
    }

    /// Return the frequency of the lowest bucket
    #[inline]
    pub fn lowest(&self) -> analyzer::Frequency {
        self.lowest
    }

    /// Return the frequency of the highest bucket
    #[inline]
    pub fn highest(&self) -> analyzer::Frequency {
        self.highest
    }

    /// Analyze a `SampleBuffer`
    ///
    /// Returns the smoothed magnitude spectrum.
    pub fn analyze(
        &mut self,
        buf: &analyzer::SampleBuffer,
    ) -> analyzer::Spectrum<&[analyzer::SignalStrength]> {
        use rustfft::num_complex::Complex;

        log::trace!("FourierAnalyzer({:p}): Analyzing ...", &self);

        assert_eq!(buf.rate(), self.rate, "Samplerate of buffer does not match!");

        self.input.clear();
        for (s, window) in buf.iter(self.length, self.downsample).zip(self.window.iter()) {
            self.input.push(Complex::new(s * window, 0.0));
        }
        // A buffer shorter than one transform reads as silence
        self.input.resize(self.length, Complex::new(0.0, 0.0));

        self.fft.process(&mut self.input);

        // Amplitude normalization by the window's coherent gain
        let scale = 2.0 / self.window.iter().sum::<f32>();

        for (s, o) in self.spectrum.iter_mut().zip(self.input.iter()) {
            let magnitude = (o.norm() * scale).min(1.0);
            *s = self.smoothing * *s + (1.0 - self.smoothing) * magnitude;
        }

        self.spectrum.as_ref()
    }

    /// Get the spectral data from the last transform
    pub fn spectrum(&self) -> analyzer::Spectrum<&[analyzer::SignalStrength]> {
        self.spectrum.as_ref()
    }
}
