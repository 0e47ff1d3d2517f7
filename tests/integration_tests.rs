use humtemp_logger::{
    CsvFileSink, LoggerConfig, LoggerError, Reading, ScriptedDriver, SensorFault, Supervisor,
};
use std::collections::HashMap;
use std::fs;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tokio::time::timeout;

/// Fresh directory for one test's log files.
fn scratch_dir() -> PathBuf {
    let dir = std::env::temp_dir().join(format!("humtemp_it_{}", uuid::Uuid::new_v4()));
    fs::create_dir_all(&dir).expect("Should create scratch directory");
    dir
}

fn config_in(dir: &Path, pins: &[&str]) -> LoggerConfig {
    LoggerConfig::default()
        .with_prefix(dir.join("hive").to_string_lossy())
        .with_pins(pins.iter().copied())
        .with_sample_interval_ms(0)
        .with_samples_per_cycle(3)
        .with_cycles(2)
}

fn fail() -> Result<Reading, SensorFault> {
    Err(SensorFault::Timeout { phase: "response" })
}

fn fields(line: &str) -> Vec<&str> {
    line.split(", ").collect()
}

#[tokio::test]
async fn test_end_to_end_two_cycles() {
    let dir = scratch_dir();
    let config = config_in(&dir, &["4"]);
    let script = vec![
        Ok(Reading::new(20.0, 50.0)),
        fail(),
        Ok(Reading::new(22.0, 55.0)),
        fail(),
        fail(),
        fail(),
    ];
    let mut scripts = Some(script);

    let assembly = Supervisor::from_config(
        &config,
        |_| Ok(ScriptedDriver::new(scripts.take().unwrap_or_default())),
        CsvFileSink::open,
    );
    assert!(assembly.skipped.is_empty());

    let summary = timeout(
        Duration::from_secs(5),
        assembly.supervisor.run_until(std::future::pending()),
    )
    .await
    .expect("Run should finish promptly");

    assert_eq!(summary.cycles_completed, 2);
    assert_eq!(summary.rows_written, 2);
    assert_eq!(summary.missed_samples, 4);

    let contents = fs::read_to_string(dir.join("hive_D4.csv")).expect("Log file should exist");
    assert!(contents.ends_with("\r\n"));
    let lines: Vec<&str> = contents.split("\r\n").filter(|l| !l.is_empty()).collect();
    assert_eq!(lines.len(), 3, "header plus exactly two rows");
    assert_eq!(
        lines[0],
        "Device ID, Date, Time, Temperature C, Temperature F, Humidity, Errors"
    );

    let first = fields(lines[1]);
    assert_eq!(first.len(), 6);
    assert_eq!(first[0], "D4");
    assert_eq!(first[1].len(), 8, "date should be MM/DD/YY");
    assert_eq!(first[2].len(), 8, "time should be HH:MM:SS");
    let temp_c: f64 = first[3].parse().unwrap();
    let temp_f: f64 = first[4].parse().unwrap();
    let humidity: f64 = first[5].trim_end_matches('%').parse().unwrap();
    assert!((temp_c - 21.0).abs() < 1e-9);
    assert!((temp_f - 69.8).abs() < 1e-9);
    assert!((humidity - 52.5).abs() < 1e-9);

    let second = fields(lines[2]);
    assert_eq!(&second[3..], &["nan", "nan", "nan%"]);

    fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_invalid_pin_does_not_stop_valid_sensor() {
    let dir = scratch_dir();
    let config = config_in(&dir, &["99", "4"]);
    let mut scripts: HashMap<u8, Vec<Result<Reading, SensorFault>>> = HashMap::new();
    scripts.insert(4, vec![Ok(Reading::new(18.5, 60.0)); 6]);

    let assembly = Supervisor::from_config(
        &config,
        |pin| Ok(ScriptedDriver::new(scripts.remove(&pin.bcm()).unwrap_or_default())),
        CsvFileSink::open,
    );

    assert_eq!(assembly.skipped.len(), 1);
    assert_eq!(assembly.skipped[0].argument, "99");
    assert!(matches!(
        assembly.skipped[0].error,
        LoggerError::InvalidPin { .. }
    ));
    assert_eq!(assembly.supervisor.len(), 1);

    let summary = assembly.supervisor.run_until(std::future::pending()).await;
    assert_eq!(summary.rows_written, 2);

    let contents = fs::read_to_string(dir.join("hive_D4.csv")).unwrap();
    assert_eq!(contents.lines().count(), 3);
    assert!(contents.contains(", 18.5, "));
    assert!(!dir.join("hive_D99.csv").exists());

    fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_zero_sensors_is_clean_noop() {
    let dir = scratch_dir();
    let config = config_in(&dir, &["99", "-1", "abc"]);

    let assembly = Supervisor::from_config(
        &config,
        |_| Ok(ScriptedDriver::new([])),
        CsvFileSink::open,
    );
    assert_eq!(assembly.skipped.len(), 3);
    assert!(assembly.supervisor.is_empty());

    let summary = assembly.supervisor.run_until(std::future::pending()).await;
    assert_eq!(summary.rows_written, 0);
    assert_eq!(summary.cycles_completed, 0);
    assert_eq!(fs::read_dir(&dir).unwrap().count(), 0);

    fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_unwritable_log_location_fails_construction() {
    let dir = scratch_dir();
    let config = config_in(&dir.join("missing"), &["4"]);

    let assembly = Supervisor::from_config(
        &config,
        |_| Ok(ScriptedDriver::new([])),
        CsvFileSink::open,
    );

    assert!(assembly.supervisor.is_empty());
    assert!(matches!(
        assembly.skipped[0].error,
        LoggerError::StorageOpen { .. }
    ));

    fs::remove_dir_all(&dir).unwrap();
}

#[tokio::test]
async fn test_rerun_appends_without_second_header() {
    let dir = scratch_dir();
    let config = config_in(&dir, &["17:attic"]).with_cycles(1);

    for _ in 0..2 {
        let assembly = Supervisor::from_config(
            &config,
            |_| Ok(ScriptedDriver::new(vec![Ok(Reading::new(25.0, 30.0)); 3])),
            CsvFileSink::open,
        );
        assembly.supervisor.run_until(std::future::pending()).await;
    }

    let contents = fs::read_to_string(dir.join("hive_attic.csv")).unwrap();
    let lines: Vec<&str> = contents.lines().collect();
    assert_eq!(lines.len(), 3);
    assert!(lines[0].starts_with("Device ID"));
    assert!(lines[1].starts_with("attic, "));
    assert!(lines[2].starts_with("attic, "));

    fs::remove_dir_all(&dir).unwrap();
}
