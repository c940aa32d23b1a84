//! Stop conditions for a detection run.

use serde::{Deserialize, Serialize};

#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq, Eq)]
pub enum Combine {
    Or,
    And,
}

/// Which limits end a run, and how they combine.
#[derive(Serialize, Deserialize, Clone, Copy, Debug, PartialEq)]
#[serde(default)]
pub struct StopPolicy {
    pub use_count_limit: bool,
    /// Photon count limit. Default covers 2 s at a 10k/s photon rate.
    pub count_limit: u64,
    pub use_time_limit: bool,
    pub time_limit_ms: u64,
    pub combine: Combine,
}

impl Default for StopPolicy {
    fn default() -> Self {
        StopPolicy {
            use_count_limit: false,
            count_limit: 20_000,
            use_time_limit: false,
            time_limit_ms: 3_000,
            combine: Combine::Or,
        }
    }
}

impl StopPolicy {
    /// Whether the run should stop, given photons detected so far and
    /// accumulated detection time.
    ///
    /// With no limit in use the run never stops on its own. Under
    /// `And`, an unused limit counts as already satisfied, so enabling
    /// a single limit behaves the same under either combiner.
    pub fn should_stop(&self, total_photons: u64, elapsed_ms: u64) -> bool {
        if !(self.use_count_limit || self.use_time_limit) {
            return false;
        }
        match self.combine {
            Combine::Or => {
                let cond1 = self.use_count_limit && total_photons > self.count_limit;
                let cond2 = self.use_time_limit && elapsed_ms > self.time_limit_ms;
                cond1 || cond2
            }
            Combine::And => {
                let cond1 = !self.use_count_limit || total_photons > self.count_limit;
                let cond2 = !self.use_time_limit || elapsed_ms > self.time_limit_ms;
                cond1 && cond2
            }
        }
    }
}
