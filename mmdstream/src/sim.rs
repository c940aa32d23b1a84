//! Simulated photon source used when no hardware is attached.
//!
//! Draws from the distribution a trapped ion's micromotion would
//! produce: `sin(N_PERIOD * 2πk/n) + 1` across the bins.

use rand::distributions::WeightedIndex;
use rand::prelude::*;

/// One RF trigger TTL for every 5 RF drive sine waves.
pub const N_PERIOD: u32 = 5;

/// Samples drawn per update.
pub const SIZE_SAMP: usize = 1000;

#[derive(Debug)]
pub struct Simulator {
    dist: WeightedIndex<f64>,
    size_bins: usize,
    rng: StdRng,
}

impl Simulator {
    pub fn new(size_bins: usize) -> Self {
        let weights: Vec<f64> = (0..size_bins)
            .map(|k| {
                let x = N_PERIOD as f64 * 2.0 * std::f64::consts::PI * k as f64 / size_bins as f64;
                x.sin() + 1.0
            })
            .collect();
        Simulator {
            dist: WeightedIndex::new(&weights).expect("reference weights are non-negative"),
            size_bins,
            rng: StdRng::from_entropy(),
        }
    }

    /// Draw one update's worth of samples and bin them.
    pub fn sample_delta(&mut self) -> Vec<u64> {
        let mut delta = vec![0u64; self.size_bins];
        for _ in 0..SIZE_SAMP {
            delta[self.dist.sample(&mut self.rng)] += 1;
        }
        return delta;
    }
}
