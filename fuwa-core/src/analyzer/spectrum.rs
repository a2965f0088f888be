//! Spectrum Storage Type

/// Type Alias for Frequencies
pub type Frequency = f32;

/// Type Alias for Signal Strengths
pub type SignalStrength = f32;

/// Trait for types that can be used as storage for a spectrum
pub trait Storage: std::ops::Deref<Target = [SignalStrength]> {}

/// Trait for types that can be used as mutable storage for a spectrum
pub trait StorageMut: std::ops::Deref<Target = [SignalStrength]> + std::ops::DerefMut {}

impl<T> Storage for T where T: std::ops::Deref<Target = [SignalStrength]> {}

impl<T> StorageMut for T where T: Storage + std::ops::DerefMut {}

/// An ordered sequence of magnitude bins spanning a frequency range
#[derive(Debug, Clone)]
pub struct Spectrum<S: Storage> {
    buckets: S,
    width: Frequency,
    lowest: Frequency,
    highest: Frequency,
}

impl<S: Storage> std::ops::Index<usize> for Spectrum<S> {
    type Output = SignalStrength;

    fn index(&self, index: usize) -> &Self::Output {
        &self.buckets[index]
    }
}

impl<S: StorageMut> std::ops::IndexMut<usize> for Spectrum<S> {
    fn index_mut(&mut self, index: usize) -> &mut Self::Output {
        &mut self.buckets[index]
    }
}

impl Default for Spectrum<Vec<SignalStrength>> {
    fn default() -> Self {
        Spectrum {
            buckets: vec![0.0],
            width: 1.0,
            lowest: 0.0,
            highest: 0.0,
        }
    }
}

impl<S: Storage> Spectrum<S> {
    /// Create a new spectrum
    ///
    /// Takes a storage buffer which is potentially prefilled with spectral data,
    /// the frequency associated with the lowest bucket and the frequency associated
    /// with the highest bucket.
    ///
    /// # Example
    /// ```
    /// # use fuwa_core::analyzer;
    /// const N: usize = 64;
    /// let spectrum = analyzer::Spectrum::new(vec![0.0; N], 440.0, 660.0);
    /// ```
    pub fn new(data: S, low: Frequency, high: Frequency) -> Spectrum<S> {
        Spectrum {
            width: (high - low) / (data.len() as Frequency - 1.0),
            lowest: low,
            highest: high,

            buckets: data,
        }
    }

    /// Return the frequency of the lowest bucket
    #[inline]
    pub fn lowest(&self) -> Frequency {
        self.lowest
    }

    /// Return the frequency of the highest bucket
    #[inline]
    pub fn highest(&self) -> Frequency {
        self.highest
    }

    /// Return the number of buckets in this spectrum
    pub fn len(&self) -> usize {
        self.buckets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buckets.is_empty()
    }

    /// Magnitude of bucket `i`, or `0.0` if the bucket does not exist
    ///
    /// Downstream consumers index with remapped positions; an undersized
    /// spectrum must read as silence instead of panicking the frame loop.
    pub fn bin(&self, i: usize) -> SignalStrength {
        self.buckets.get(i).cloned().unwrap_or(0.0)
    }

    /// Iterate over the buckets of this spectrum
    pub fn iter<'a>(&'a self) -> std::slice::Iter<'a, SignalStrength> {
        self.buckets.iter()
    }

    pub fn as_ref<'a>(&'a self) -> Spectrum<&'a [SignalStrength]> {
        Spectrum {
            buckets: &self.buckets,
            width: self.width,
            lowest: self.lowest,
            highest: self.highest,
        }
    }

    /// Return the highest signal strength in this spectrum
    pub fn max(&self) -> SignalStrength {
        self.buckets.iter().cloned().fold(0.0, SignalStrength::max)
    }

    /// Return the average signal strength in this spectrum
    pub fn mean(&self) -> SignalStrength {
        self.buckets.iter().sum::<SignalStrength>() / self.len() as SignalStrength
    }
}

impl<S: StorageMut> Spectrum<S> {
    /// Iterate over this spectrums buckets mutably
    pub fn iter_mut<'a>(&'a mut self) -> std::slice::IterMut<'a, SignalStrength> {
        self.buckets.iter_mut()
    }

    /// Fill this spectrum with values from another one
    pub fn fill_from<S2: Storage>(&mut self, other: &Spectrum<S2>) {
        assert_eq!(self.len(), other.len(), "Spectrums have different sizes!");

        self.width = other.width;
        self.lowest = other.lowest;
        self.highest = other.highest;

        for (s, o) in self.iter_mut().zip(other.iter()) {
            *s = *o;
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn check_integrity<S: Storage>(s: &Spectrum<S>) {
        assert_eq!(
            ((s.highest - s.lowest) / s.width).round() as usize,
            s.buckets.len() - 1
        );
    }

    #[test]
    fn test_default() {
        let def: Spectrum<_> = Default::default();

        check_integrity(&def);
    }

    #[test]
    fn test_new() {
        let spectrum = Spectrum::new((0..64).map(|x| x as f32).collect::<Vec<_>>(), 62.5, 4000.0);

        check_integrity(&spectrum);
        assert_eq!(spectrum.len(), 64);
        assert_eq!(spectrum[10], 10.0);
    }

    #[test]
    fn test_bin_out_of_range_is_silent() {
        let spectrum = Spectrum::new(vec![1.0; 8], 0.0, 100.0);

        assert_eq!(spectrum.bin(7), 1.0);
        assert_eq!(spectrum.bin(8), 0.0);
        assert_eq!(spectrum.bin(1000), 0.0);
    }

    #[test]
    fn test_max_mean() {
        let spectrum = Spectrum::new(vec![0.0, 2.0, 1.0, 1.0], 0.0, 100.0);

        assert_eq!(spectrum.max(), 2.0);
        assert_eq!(spectrum.mean(), 1.0);
    }

    #[test]
    fn test_fill_from() {
        let src = Spectrum::new(vec![1.0, 2.0, 3.0], 10.0, 30.0);
        let mut dst = Spectrum::new(vec![0.0; 3], 0.0, 1.0);

        dst.fill_from(&src.as_ref());

        assert_eq!(dst[2], 3.0);
        assert_eq!(dst.lowest(), 10.0);
        assert_eq!(dst.highest(), 30.0);
    }
}
