//! Spectrum frames and the stream collaborator seam
//!
//! The audio stream lives outside the core. All the core ever sees is a
//! fixed-length run of byte magnitudes, one per frequency bin, overwritten
//! in place once per tick.

/// Smallest spectrum the band analyzer can partition without degrading to zero
pub const MIN_ANALYSIS_BINS: usize = 200;

/// Source of per-bin byte magnitudes (the audio stream collaborator)
pub trait SpectrumSource {
    /// Number of bins this source produces per read
    fn bin_count(&self) -> usize;

    /// Overwrite `out` with the current magnitudes
    ///
    /// Implementations may write fewer than `out.len()` bins; the untouched
    /// tail keeps whatever the previous read left there.
    fn read_frequency_data(&mut self, out: &mut [u8]);
}

impl<T: SpectrumSource + ?Sized> SpectrumSource for Box<T> {
    fn bin_count(&self) -> usize {
        (**self).bin_count()
    }

    fn read_frequency_data(&mut self, out: &mut [u8]) {
        (**self).read_frequency_data(out)
    }
}

/// Reusable per-tick spectrum buffer
#[derive(Debug, Clone, Default)]
pub struct SpectrumFrame {
    bins: Vec<u8>,
}

impl SpectrumFrame {
    /// Create a zeroed frame with `bin_count` bins
    pub fn new(bin_count: usize) -> Self {
        Self {
            bins: vec![0; bin_count],
        }
    }

    /// Create a frame holding a copy of `bins`
    pub fn from_bins(bins: &[u8]) -> Self {
        Self {
            bins: bins.to_vec(),
        }
    }

    /// Pull the next magnitudes from `source` into this buffer
    ///
    /// The buffer is only reallocated when the source changes its bin count.
    pub fn refresh_from<S: SpectrumSource + ?Sized>(&mut self, source: &mut S) {
        let wanted = source.bin_count();
        if self.bins.len() != wanted {
            self.bins.resize(wanted, 0);
        }
        source.read_frequency_data(&mut self.bins);
    }

    /// The magnitudes of the current frame
    pub fn bins(&self) -> &[u8] {
        &self.bins
    }

    /// Number of bins
    pub fn len(&self) -> usize {
        self.bins.len()
    }

    /// Whether the frame holds no bins
    pub fn is_empty(&self) -> bool {
        self.bins.is_empty()
    }

    /// Unweighted mean magnitude across all bins (0 for an empty frame)
    pub fn mean(&self) -> f32 {
        mean(&self.bins)
    }
}

/// Unweighted mean of byte magnitudes (0 for an empty slice)
pub fn mean(bins: &[u8]) -> f32 {
    if bins.is_empty() {
        return 0.0;
    }
    let sum: u32 = bins.iter().map(|&b| b as u32).sum();
    sum as f32 / bins.len() as f32
}

/// A source that replays one fixed spectrum forever
///
/// Useful for headless hosts, benches and tests. The spectrum can be swapped
/// between ticks with [`StaticSpectrum::set_bins`].
#[derive(Debug, Clone, Default)]
pub struct StaticSpectrum {
    bins: Vec<u8>,
}

impl StaticSpectrum {
    /// Create a source that always reports `bins`
    pub fn new(bins: Vec<u8>) -> Self {
        Self { bins }
    }

    /// Create a source of `bin_count` bins all set to `value`
    pub fn uniform(bin_count: usize, value: u8) -> Self {
        Self {
            bins: vec![value; bin_count],
        }
    }

    /// Replace the replayed spectrum
    pub fn set_bins(&mut self, bins: Vec<u8>) {
        self.bins = bins;
    }
}

impl SpectrumSource for StaticSpectrum {
    fn bin_count(&self) -> usize {
        self.bins.len()
    }

    fn read_frequency_data(&mut self, out: &mut [u8]) {
        let n = out.len().min(self.bins.len());
        out[..n].copy_from_slice(&self.bins[..n]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_refresh_overwrites_in_place() {
        let mut source = StaticSpectrum::uniform(4, 10);
        let mut frame = SpectrumFrame::new(4);
        frame.refresh_from(&mut source);
        assert_eq!(frame.bins(), &[10, 10, 10, 10]);

        source.set_bins(vec![1, 2, 3, 4]);
        frame.refresh_from(&mut source);
        assert_eq!(frame.bins(), &[1, 2, 3, 4]);
    }

    #[test]
    fn test_refresh_follows_source_bin_count() {
        let mut source = StaticSpectrum::uniform(1024, 0);
        let mut frame = SpectrumFrame::default();
        assert!(frame.is_empty());
        frame.refresh_from(&mut source);
        assert_eq!(frame.len(), 1024);
    }

    #[test]
    fn test_mean() {
        assert_eq!(mean(&[]), 0.0);
        assert_eq!(mean(&[0, 255]), 127.5);
        assert_eq!(SpectrumFrame::from_bins(&[200; 16]).mean(), 200.0);
    }

    #[test]
    fn test_boxed_source() {
        let mut source: Box<dyn SpectrumSource> = Box::new(StaticSpectrum::uniform(3, 7));
        let mut frame = SpectrumFrame::new(0);
        frame.refresh_from(&mut source);
        assert_eq!(frame.bins(), &[7, 7, 7]);
    }
}
