//! Acquisition loop: owns the detector port and all run state.
//!
//! One thread runs [`main`], fed by a single flume channel. The tick
//! timer, the run control surface, and nothing else write to that
//! channel, so ticks never overlap and no state is shared across
//! threads.

use anyhow::Result;
use std::time::Duration;
use tracing::{debug, info, warn};

use mmdtools::cfg::RunConfig;
use mmdtools::error::DetectorError;
use mmdtools::hist::{self, Histogram};
use mmdtools::pipe;
use mmdtools::stop::StopPolicy;
use mmdtools::SAMPLING_PERIOD_NS;

use crate::device::DetectorPort;
use crate::display::DisplayFrame;
use crate::prober;
use crate::sim::{Simulator, SIZE_SAMP};
use crate::timer::{self, TimerHandle};
use crate::{Event, RunMode, StartImpl, REDRAW_BUDGET_MS};

pub const STATUS_PROBING: &str = "Probing ... ...";
pub const STATUS_DETECTING: &str = "IN DETECTING ... ...";
pub const STATUS_STOPPED: &str = "STOPPED ... ...";
pub const STATUS_LIMIT: &str = "STOPPED -- Enough Data or Time Out.";

/// What one update did to the run.
#[derive(Debug)]
pub struct TickReport {
    /// Photons folded in: bytes piped out, or samples drawn when
    /// simulating.
    pub photons: u64,
    /// The stop conditions were met; no further updates should fire.
    pub stopped: bool,
}

/// An armed detection run: the histogram plus everything the per-tick
/// update needs.
#[derive(Debug)]
pub struct ActiveRun {
    hist: Histogram,
    stop: StopPolicy,
    interval_ms: u64,
    pipe_len_words: u32,
    sim: Option<Simulator>,
    n_update: u64,
}

impl ActiveRun {
    /// Probe the signals (hardware mode) and set up the histogram and
    /// pipeout length for a new run. The bin count is fixed here and
    /// never changes mid-run; changing it means arming a fresh run.
    pub fn arm<D>(
        cfg: &RunConfig,
        mode: RunMode,
        dev: Option<&mut D>,
    ) -> Result<ActiveRun, DetectorError>
    where
        D: DetectorPort + ?Sized,
    {
        let mut cfg = cfg.clone();
        cfg.sanitize();
        let (size_bins, pipe_len_words, sim) = match mode {
            RunMode::Simulated => {
                let size_bins = cfg.size_bins_hint as usize;
                (size_bins, cfg.pipe_len_hint, Some(Simulator::new(size_bins)))
            }
            RunMode::Hardware => {
                let dev = dev.ok_or_else(|| {
                    DetectorError::DeviceIo("no Opal Kelly FPGA device".to_string())
                })?;
                info!("{}", STATUS_PROBING);
                let probe = prober::probe_signals(
                    dev,
                    Duration::from_millis(cfg.update_interval_ms),
                )?;
                debug!(?probe, "probe finished");
                probe.classify()?;
                dev.reset()?;
                (
                    probe.ttl_period as usize,
                    pipe::aligned_len_words(probe.fifo_delta as u32),
                    None,
                )
            }
        };
        Ok(ActiveRun {
            hist: Histogram::new(size_bins),
            stop: cfg.stop,
            interval_ms: cfg.update_interval_ms,
            pipe_len_words,
            sim,
            n_update: 0,
        })
    }

    /// Timer period: the configured interval less the fixed I/O and
    /// redraw budget.
    pub fn tick_period(&self) -> Duration {
        Duration::from_millis(self.interval_ms.saturating_sub(REDRAW_BUDGET_MS))
    }

    pub fn histogram(&self) -> &Histogram {
        &self.hist
    }

    /// One update: pipe out whatever the FIFO has ready, fold it into
    /// the histogram, and evaluate the stop conditions.
    ///
    /// Counters advance by the configured interval and by bytes piped
    /// out, not by wall clock or a verified photon count; an update
    /// that runs long is not compensated.
    pub fn tick<D>(&mut self, dev: Option<&mut D>) -> Result<TickReport, DetectorError>
    where
        D: DetectorPort + ?Sized,
    {
        self.n_update += 1;
        let photons = match (&mut self.sim, dev) {
            (Some(sim), _) => {
                let delta = sim.sample_delta();
                self.hist.accumulate(&delta)?;
                SIZE_SAMP as u64
            }
            (None, Some(dev)) => {
                let fifo_cnt = dev.fifo_ready_count()?;
                self.pipe_len_words = pipe::aligned_len_words(fifo_cnt);
                debug!(
                    n_update = self.n_update,
                    fifo_cnt,
                    pipe_len = self.pipe_len_words,
                    "pipeout"
                );
                let bytes = dev.read_words(self.pipe_len_words)?;
                let delta = hist::fold_bytes(&bytes, self.hist.size_bins());
                self.hist.accumulate(&delta)?;
                bytes.len() as u64
            }
            (None, None) => {
                return Err(DetectorError::DeviceIo(
                    "detector port went away mid-run".to_string(),
                ));
            }
        };
        self.hist.add_photons(photons);
        self.hist.add_elapsed(self.interval_ms);
        let stopped = self
            .stop
            .should_stop(self.hist.total_photons(), self.hist.elapsed_ms());
        Ok(TickReport { photons, stopped })
    }

    /// Snapshot for the display sink.
    pub fn frame(&self, status: &str, stopped: bool) -> DisplayFrame {
        DisplayFrame {
            bins: self.hist.bins().to_vec(),
            edges: hist::bin_edges(self.hist.size_bins(), SAMPLING_PERIOD_NS),
            status: status.to_string(),
            stopped,
        }
    }
}

/// Event loop over run control and timer ticks.
///
/// `tx_tick` is handed to each run's timer so ticks arrive on the same
/// channel as everything else. Dropping the timer handle stops the
/// timer; a tick already queued when a run stops is ignored.
pub fn main(
    mut dev: Option<Box<dyn DetectorPort + Send>>,
    rx: flume::Receiver<Event>,
    tx_tick: flume::Sender<Event>,
    tx_display: flume::Sender<DisplayFrame>,
) -> Result<()> {
    let mode = match dev {
        Some(_) => RunMode::Hardware,
        None => RunMode::Simulated,
    };
    let mut cfg = RunConfig::default();
    let mut run: Option<ActiveRun> = None;
    let mut ticker: Option<TimerHandle> = None;
    loop {
        match rx.recv() {
            Ok(Event::Tick) => {
                let active = match run.as_mut() {
                    Some(active) if ticker.is_some() => active,
                    _ => continue, // stale tick from a disarmed run
                };
                match active.tick(dev.as_deref_mut()) {
                    Ok(report) if report.stopped => {
                        info!("{}", STATUS_LIMIT);
                        ticker = None;
                        let _ = tx_display.send(active.frame(STATUS_LIMIT, true));
                    }
                    Ok(_) => {
                        let _ = tx_display.send(active.frame(STATUS_DETECTING, false));
                    }
                    Err(DetectorError::DeviceIo(e)) => {
                        // Skip this update and keep the run armed: an
                        // occasional read gap beats halting detection.
                        warn!(error = %e, "pipeout failed; skipping update");
                    }
                    Err(e) => return Err(e.into()),
                }
            }
            Ok(Event::Configure(new_cfg)) => {
                // Takes effect at the next start; an armed run keeps
                // the configuration it started with.
                cfg = new_cfg;
            }
            Ok(Event::Start(StartImpl { tx })) => {
                match ActiveRun::arm(&cfg, mode, dev.as_deref_mut()) {
                    Ok(active) => {
                        info!(size_bins = active.histogram().size_bins(), "{}", STATUS_DETECTING);
                        ticker = Some(timer::arm(active.tick_period(), tx_tick.clone()));
                        run = Some(active);
                        let _ = tx.send(Ok(()));
                    }
                    Err(e) => {
                        warn!(error = %e, "start rejected");
                        let _ = tx.send(Err(e));
                    }
                }
            }
            Ok(Event::Stop) => {
                ticker = None;
                info!("{}", STATUS_STOPPED);
                if let Some(active) = run.as_ref() {
                    let _ = tx_display.send(active.frame(STATUS_STOPPED, true));
                }
            }
            Err(_) => break,
        }
    }
    Ok(())
}
