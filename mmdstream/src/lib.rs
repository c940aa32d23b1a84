pub mod controller;
pub mod device;
pub mod display;
pub mod prober;
pub mod sim;
pub mod timer;

use argh::FromArgs;
use mmdtools::cfg::RunConfig;
use mmdtools::error::DetectorError;
use mmdtools::stop::Combine;

/// Time reserved per update for pipeout I/O and redraw, in ms. The
/// tick timer fires this much earlier than the configured interval.
pub const REDRAW_BUDGET_MS: u64 = 20;

#[derive(Debug, FromArgs, Clone)]
/// Controller for the micro-motion detector: histograms photon/TTL
/// time differences piped out of the FPGA
pub struct CliArgs {
    /// print version information
    #[argh(switch, short = 'v')]
    pub version: bool,
    /// draw from the simulated photon source instead of hardware
    #[argh(switch, short = 's')]
    pub simulate: bool,
    /// histogram update interval in ms
    #[argh(option)]
    pub interval: Option<u64>,
    /// stop once more than this many photons are detected
    #[argh(option)]
    pub count_limit: Option<u64>,
    /// stop once more than this much detection time accumulates, in ms
    #[argh(option)]
    pub time_limit: Option<u64>,
    /// stop only when every limit is exceeded (default: any one)
    #[argh(switch)]
    pub all_limits: bool,
    /// run declaration file path
    #[argh(option)]
    pub config: Option<String>,
}

impl CliArgs {
    /// Resolve the run configuration: the declaration file if given,
    /// with command-line overrides on top.
    pub fn run_config(&self) -> anyhow::Result<RunConfig> {
        let mut cfg = match &self.config {
            Some(path) => RunConfig::load(path.as_ref())?,
            None => RunConfig::default(),
        };
        if let Some(ms) = self.interval {
            cfg.update_interval_ms = ms;
        }
        if let Some(n) = self.count_limit {
            cfg.stop.use_count_limit = true;
            cfg.stop.count_limit = n;
        }
        if let Some(ms) = self.time_limit {
            cfg.stop.use_time_limit = true;
            cfg.stop.time_limit_ms = ms;
        }
        if self.all_limits {
            cfg.stop.combine = Combine::And;
        }
        Ok(cfg)
    }
}

/// Whether a run reads the FPGA or the simulated photon source.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RunMode {
    Hardware,
    Simulated,
}

pub enum Event {
    Tick,
    Configure(RunConfig),
    Start(StartImpl),
    Stop,
}

pub struct StartImpl {
    pub tx: flume::Sender<Result<(), DetectorError>>,
}
