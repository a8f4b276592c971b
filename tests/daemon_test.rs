use anyhow::Result;
use serde_json::Value;
use ssa_noise_monitor::acquisition::SimulatedAnalyzer;
use ssa_noise_monitor::config::Config;
use ssa_noise_monitor::daemon::{Control, Daemon};
use ssa_noise_monitor::visualization::JsonLinesRenderer;
use std::fs;
use std::sync::Once;
use tempfile::tempdir;

static INIT: Once = Once::new();

// Setup logger for tests
fn setup() {
    INIT.call_once(|| {
        env_logger::builder()
            .filter_level(log::LevelFilter::Debug)
            .is_test(true)
            .init();
    });
}

fn simulated_config() -> Config {
    let mut config = Config::default();
    config.instrument.simulated = true;
    config.sampling.interval_s = 0.0;
    config.sampling.history_capacity = 4;
    config
}

#[tokio::test]
async fn test_daemon_runs_until_exit() -> Result<()> {
    setup();
    let temp_dir = tempdir()?;
    let output = temp_dir.path().join("series.jsonl");

    let daemon = Daemon::new();
    let controls = daemon.controls();
    controls.send(Control::Clear)?;
    controls.send(Control::Exit)?;

    let renderer = JsonLinesRenderer::create(&output)?;
    let stats = daemon
        .launch(&simulated_config(), SimulatedAnalyzer::with_seed(7), renderer)
        .await?;

    assert_eq!(stats.ticks, 2);
    assert_eq!(stats.acquisitions, 1);
    assert_eq!(stats.failures, 0);

    let contents = fs::read_to_string(&output)?;
    let snapshots: Vec<Value> = contents
        .lines()
        .map(serde_json::from_str)
        .collect::<std::result::Result<_, _>>()?;
    let series: Vec<&str> = snapshots
        .iter()
        .filter_map(|s| s["series"].as_str())
        .collect();
    assert_eq!(series, vec!["raw", "signal", "snr"]);
    assert_eq!(snapshots[0]["x"].as_array().map(Vec::len), Some(751));
    assert!(snapshots[1]["y"][3].is_number());
    assert!(snapshots[1]["y"][0].is_null());

    Ok(())
}

#[tokio::test]
async fn test_daemon_requires_address() -> Result<()> {
    setup();
    let mut config = simulated_config();
    config.instrument.simulated = false;

    let daemon = Daemon::new();
    let result = daemon
        .launch(&config, SimulatedAnalyzer::with_seed(1), Vec::<JsonLinesRenderer<Vec<u8>>>::new())
        .await;
    assert!(result.is_err());

    Ok(())
}

#[tokio::test]
async fn test_daemon_exits_when_producers_are_gone() -> Result<()> {
    setup();
    // No signal handlers, no console reader and no extra senders
    let daemon = Daemon::new();
    let stats = daemon
        .launch(
            &simulated_config(),
            SimulatedAnalyzer::with_seed(3),
            Vec::<JsonLinesRenderer<Vec<u8>>>::new(),
        )
        .await?;

    assert_eq!(stats.ticks, 1);
    assert_eq!(stats.acquisitions, 0);

    Ok(())
}
