//! Probes the RF trigger TTL and PMT signals before a run starts.

use std::thread;
use std::time::Duration;
use tracing::debug;

use mmdtools::error::DetectorError;
use mmdtools::{FIFO_OVERFLOW_GUARD, N_MAX_PROBE};

use crate::device::{DetectorPort, ProbeSample};

/// Outcome of one probing pass. The all-negative sentinel means the
/// prober timed out without two matching reads.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ProbeResult {
    /// Measured TTL trigger period in sampling clock units; becomes
    /// the bin count of the run's histogram.
    pub ttl_period: i64,
    /// Time differences recorded between the two matching reads.
    pub tdiff_delta: i64,
    /// Growth of the FIFO read count between the two matching reads;
    /// the starting point for the pipeout length.
    pub fifo_delta: i64,
}

impl ProbeResult {
    pub const NOT_FOUND: ProbeResult = ProbeResult {
        ttl_period: -1,
        tdiff_delta: -1,
        fifo_delta: -1,
    };

    /// Decide whether the detector is ready to arm.
    pub fn classify(&self) -> Result<(), DetectorError> {
        if self.ttl_period <= 0 || self.tdiff_delta <= 0 {
            Err(DetectorError::NoSignalDetected)
        } else if self.fifo_delta <= 0 && self.tdiff_delta >= FIFO_OVERFLOW_GUARD {
            // The write FIFO is 131072 deep: when the counters advance
            // that far in one interval but no new words become
            // readable, the FIFO filled up rather than sat idle.
            Err(DetectorError::TooManyPhotons)
        } else {
            Ok(())
        }
    }
}

/// Repeatedly read the status registers until two consecutive good
/// reads report the same TTL period.
///
/// A read is good when the time-difference count, TTL period, and
/// FIFO read count are all nonzero. A good read with a different
/// period replaces the stored anchor; a bad read leaves the anchor in
/// place so a transient dropout does not discard progress. Gives up
/// after `N_MAX_PROBE` reads and returns the sentinel.
pub fn probe_signals<D>(
    dev: &mut D,
    sample_interval: Duration,
) -> Result<ProbeResult, DetectorError>
where
    D: DetectorPort + ?Sized,
{
    dev.reset()?;
    let mut prev: Option<ProbeSample> = None;
    for n_probe in 0..N_MAX_PROBE {
        thread::sleep(sample_interval);
        let sample = dev.probe()?;
        debug!(n_probe, ?sample, "probe");
        if sample.tdiff_count > 0 && sample.ttl_period > 0 && sample.fifo_ready_count > 0 {
            if let Some(anchor) = prev {
                if anchor.ttl_period == sample.ttl_period {
                    return Ok(ProbeResult {
                        ttl_period: sample.ttl_period as i64,
                        tdiff_delta: sample.tdiff_count as i64 - anchor.tdiff_count as i64,
                        fifo_delta: sample.fifo_ready_count as i64
                            - anchor.fifo_ready_count as i64,
                    });
                }
            }
            prev = Some(sample);
        }
    }
    Ok(ProbeResult::NOT_FOUND)
}
