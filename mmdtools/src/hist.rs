//! Histogram accumulation for measured time differences.

use crate::error::DetectorError;

/// Map a raw pipeout byte to its time bin.
///
/// The FPGA records `time_photon - time_rising_TTL`; reducing
/// `size_bins - b` modulo the TTL period recovers the
/// trigger-to-photon offset we want to histogram.
pub fn decode(b: u8, size_bins: usize) -> usize {
    (size_bins as i64 - b as i64).rem_euclid(size_bins as i64) as usize
}

/// Bin one pipeout buffer into a per-update delta histogram.
pub fn fold_bytes(bytes: &[u8], size_bins: usize) -> Vec<u64> {
    let mut delta = vec![0u64; size_bins];
    for &b in bytes {
        delta[decode(b, size_bins)] += 1;
    }
    return delta;
}

/// Bin edges in nanoseconds for a `size_bins`-bin histogram.
/// Returns `size_bins + 1` values; plot with step mode.
pub fn bin_edges(size_bins: usize, period_ns: f64) -> Vec<f64> {
    (0..=size_bins).map(|i| i as f64 * period_ns).collect()
}

/// Running histogram over one detection run.
///
/// Counts are not saturated: a run is expected to end well before any
/// bin approaches `u64::MAX`.
#[derive(Debug, Clone, PartialEq)]
pub struct Histogram {
    bins: Vec<u64>,
    total_photons: u64,
    elapsed_ms: u64,
}

impl Histogram {
    /// All-zero histogram with a bin per sampling clock cycle of the
    /// TTL period. The bin count is fixed for the life of the run.
    pub fn new(size_bins: usize) -> Self {
        assert!(size_bins >= 1, "histogram needs at least one bin");
        Histogram {
            bins: vec![0; size_bins],
            total_photons: 0,
            elapsed_ms: 0,
        }
    }

    pub fn size_bins(&self) -> usize {
        self.bins.len()
    }

    pub fn bins(&self) -> &[u64] {
        &self.bins
    }

    /// Photons detected so far, counted as bytes piped out.
    pub fn total_photons(&self) -> u64 {
        self.total_photons
    }

    /// Accumulated detection time in ms. This is the sum of configured
    /// update intervals, not measured wall clock.
    pub fn elapsed_ms(&self) -> u64 {
        self.elapsed_ms
    }

    /// Element-wise add of one update's delta.
    pub fn accumulate(&mut self, delta: &[u64]) -> Result<(), DetectorError> {
        if delta.len() != self.bins.len() {
            return Err(DetectorError::DimensionMismatch {
                expected: self.bins.len(),
                got: delta.len(),
            });
        }
        for (bin, d) in self.bins.iter_mut().zip(delta) {
            *bin += d;
        }
        Ok(())
    }

    pub fn add_photons(&mut self, n: u64) {
        self.total_photons += n;
    }

    pub fn add_elapsed(&mut self, ms: u64) {
        self.elapsed_ms += ms;
    }
}
