//! Run configuration: declared in [TOML](https://toml.io), sanitized
//! before arming.

use serde::{Deserialize, Serialize};
use std::fs;
use std::path::Path;

use crate::error::ConfigError;
use crate::stop::StopPolicy;
use crate::{PIPEOUT_LEN_DEFAULT, SIZE_BINS_DEFAULT};

/// Settings for one detection run. All fields have defaults, so a
/// declaration file only needs to state what it changes.
///
/// `size_bins_hint` and `pipe_len_hint` only apply to simulated runs;
/// against hardware both are measured by the prober at start.
#[derive(Serialize, Deserialize, Debug, Clone, PartialEq)]
#[serde(default)]
pub struct RunConfig {
    /// Wall-clock period between histogram updates, in ms.
    pub update_interval_ms: u64,
    pub size_bins_hint: u32,
    pub pipe_len_hint: u32,
    pub stop: StopPolicy,
}

impl Default for RunConfig {
    fn default() -> Self {
        RunConfig {
            update_interval_ms: 200,
            size_bins_hint: SIZE_BINS_DEFAULT,
            pipe_len_hint: PIPEOUT_LEN_DEFAULT,
            stop: StopPolicy::default(),
        }
    }
}

impl RunConfig {
    /// Load a TOML run declaration.
    pub fn load(path: &Path) -> Result<Self, ConfigError> {
        let text = fs::read_to_string(path)?;
        let cfg = toml::de::from_str(&text)?;
        return Ok(cfg);
    }

    /// Replace out-of-range settings with the usual defaults: interval
    /// 100..=1000 ms, count limit at least 100 photons, time limit at
    /// least 50 ms.
    pub fn sanitize(&mut self) {
        if !(100..=1000).contains(&self.update_interval_ms) {
            self.update_interval_ms = 200;
        }
        if self.stop.count_limit < 100 {
            self.stop.count_limit = 20_000;
        }
        if self.stop.time_limit_ms < 50 {
            self.stop.time_limit_ms = 3_000;
        }
        if self.size_bins_hint == 0 {
            self.size_bins_hint = SIZE_BINS_DEFAULT;
        }
        if self.pipe_len_hint == 0 {
            self.pipe_len_hint = PIPEOUT_LEN_DEFAULT;
        }
    }
}
