use std::time::Duration;

use mmdstream::controller::ActiveRun;
use mmdstream::RunMode;
use mmdtools::cfg::RunConfig;
use mmdtools::error::DetectorError;
use mmdtools::stop::{Combine, StopPolicy};

mod common;
use common::{good_sample, ScriptedDetector};

fn fast_config() -> RunConfig {
    RunConfig {
        update_interval_ms: 100,
        ..Default::default()
    }
}

/// Detector ready to arm: probes settle on a 107-cycle TTL period.
fn armable_detector() -> ScriptedDetector {
    let mut dev = ScriptedDetector::new();
    dev.probes.push_back(good_sample(1000, 107, 32));
    dev.probes.push_back(good_sample(2000, 107, 96));
    dev
}

#[test]
fn hardware_run_accumulates_across_updates() {
    let mut dev = armable_detector();
    // three updates, each delivering one photon 50 bins after the trigger
    for fifo_cnt in [5, 6, 7] {
        dev.fifo_counts.push_back(fifo_cnt);
        dev.reads.push_back(Ok(vec![57])); // decode(57, 107) == 50
    }

    let mut run = ActiveRun::arm(&fast_config(), RunMode::Hardware, Some(&mut dev)).unwrap();
    assert_eq!(run.histogram().size_bins(), 107);

    for _ in 0..3 {
        let report = run.tick(Some(&mut dev)).unwrap();
        assert!(!report.stopped);
        assert_eq!(report.photons, 1);
    }

    let hist = run.histogram();
    assert_eq!(hist.bins()[50], 3);
    assert_eq!(hist.bins().iter().sum::<u64>(), 3);
    assert_eq!(hist.total_photons(), 3);
    assert_eq!(hist.elapsed_ms(), 300);
}

#[test]
fn sparse_fifo_yields_an_empty_update() {
    let mut dev = armable_detector();
    dev.fifo_counts.push_back(3); // below one alignment unit

    let mut run = ActiveRun::arm(&fast_config(), RunMode::Hardware, Some(&mut dev)).unwrap();
    let report = run.tick(Some(&mut dev)).unwrap();

    assert_eq!(report.photons, 0);
    assert_eq!(run.histogram().bins().iter().sum::<u64>(), 0);
    // elapsed time still advances by the configured interval
    assert_eq!(run.histogram().elapsed_ms(), 100);
}

#[test]
fn count_limit_stops_the_run() {
    let mut dev = armable_detector();
    dev.fifo_counts.push_back(128);
    dev.reads.push_back(Ok(vec![57; 101]));

    let mut cfg = fast_config();
    cfg.stop = StopPolicy {
        use_count_limit: true,
        count_limit: 100,
        use_time_limit: false,
        time_limit_ms: 3_000,
        combine: Combine::Or,
    };

    let mut run = ActiveRun::arm(&cfg, RunMode::Hardware, Some(&mut dev)).unwrap();
    let report = run.tick(Some(&mut dev)).unwrap();
    assert!(report.stopped);
    assert_eq!(run.histogram().total_photons(), 101);
}

#[test]
fn time_limit_stops_the_run_on_accumulated_intervals() {
    let mut dev = armable_detector();
    for _ in 0..3 {
        dev.fifo_counts.push_back(4);
        dev.reads.push_back(Ok(vec![0; 16]));
    }

    let mut cfg = fast_config();
    cfg.stop = StopPolicy {
        use_count_limit: false,
        count_limit: 20_000,
        use_time_limit: true,
        time_limit_ms: 250,
        combine: Combine::Or,
    };

    let mut run = ActiveRun::arm(&cfg, RunMode::Hardware, Some(&mut dev)).unwrap();
    assert!(!run.tick(Some(&mut dev)).unwrap().stopped); // 100 ms
    assert!(!run.tick(Some(&mut dev)).unwrap().stopped); // 200 ms
    assert!(run.tick(Some(&mut dev)).unwrap().stopped); // 300 ms > 250
}

#[test]
fn read_failure_surfaces_as_device_io() {
    let mut dev = armable_detector();
    dev.fifo_counts.push_back(64);
    dev.reads
        .push_back(Err(DetectorError::DeviceIo("pipeout timed out".to_string())));

    let mut run = ActiveRun::arm(&fast_config(), RunMode::Hardware, Some(&mut dev)).unwrap();
    let err = run.tick(Some(&mut dev)).unwrap_err();
    assert!(matches!(err, DetectorError::DeviceIo(_)));
}

#[test]
fn no_signal_rejects_arming() {
    let mut dev = ScriptedDetector::new(); // nothing on any register
    let mut cfg = fast_config();
    // keep the 20-probe timeout quick
    cfg.update_interval_ms = 100;
    let err = ActiveRun::arm(&cfg, RunMode::Hardware, Some(&mut dev)).unwrap_err();
    assert_eq!(err, DetectorError::NoSignalDetected);
}

#[test]
fn simulated_run_draws_a_fixed_sample() {
    let cfg = fast_config();
    let mut run =
        ActiveRun::arm(&cfg, RunMode::Simulated, None::<&mut ScriptedDetector>).unwrap();
    assert_eq!(run.histogram().size_bins(), 107);

    let report = run.tick(None::<&mut ScriptedDetector>).unwrap();
    assert!(!report.stopped);
    assert_eq!(report.photons, 1000);
    assert_eq!(run.histogram().bins().iter().sum::<u64>(), 1000);
    assert_eq!(run.histogram().total_photons(), 1000);

    let frame = run.frame("status", false);
    assert_eq!(frame.edges.len(), 108);
    assert_eq!(frame.bins.len(), 107);
}

#[test]
fn tick_period_reserves_the_redraw_budget() {
    let run = ActiveRun::arm(
        &fast_config(),
        RunMode::Simulated,
        None::<&mut ScriptedDetector>,
    )
    .unwrap();
    assert_eq!(run.tick_period(), Duration::from_millis(80));
}
