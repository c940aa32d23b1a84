use std::collections::VecDeque;

use mmdstream::device::{DetectorPort, ProbeSample};
use mmdtools::error::DetectorError;

/// Detector scripted with canned register reads and pipeout buffers.
/// Empty scripts fall back to all-zero registers and all-zero buffers
/// of the requested length.
#[derive(Default)]
pub struct ScriptedDetector {
    pub probes: VecDeque<ProbeSample>,
    pub fifo_counts: VecDeque<u32>,
    pub reads: VecDeque<Result<Vec<u8>, DetectorError>>,
    pub resets: usize,
}

impl ScriptedDetector {
    pub fn new() -> Self {
        ScriptedDetector::default()
    }
}

impl DetectorPort for ScriptedDetector {
    fn reset(&mut self) -> Result<(), DetectorError> {
        self.resets += 1;
        Ok(())
    }

    fn probe(&mut self) -> Result<ProbeSample, DetectorError> {
        Ok(self.probes.pop_front().unwrap_or_default())
    }

    fn fifo_ready_count(&mut self) -> Result<u32, DetectorError> {
        Ok(self.fifo_counts.pop_front().unwrap_or(0))
    }

    fn read_words(&mut self, len_words: u32) -> Result<Vec<u8>, DetectorError> {
        match self.reads.pop_front() {
            Some(read) => read,
            None => Ok(vec![0; (len_words * 4) as usize]),
        }
    }
}

/// A status read with signals present on every register.
#[allow(dead_code)]
pub fn good_sample(tdiff_count: u32, ttl_period: u32, fifo_ready_count: u32) -> ProbeSample {
    ProbeSample {
        photon_count: tdiff_count,
        tdiff_count,
        ttl_period,
        fifo_ready_count,
    }
}
