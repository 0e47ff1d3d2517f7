//! # humtemp_logger - DHT22 Temperature/Humidity Logger
//!
//! Periodically samples one or more DHT22 sensors wired to Raspberry Pi GPIO
//! pins, averages the readings over a fixed number of samples and appends one
//! timestamped CSV row per sensor per cycle.
//!
//! ## Features
//!
//! - **Failure tolerant sampling**: transient single-wire read errors simply
//!   leave a gap in the current window
//! - **Continuous time series**: a cycle with no good samples still logs a
//!   `nan` row
//! - **Durable output**: every row is flushed and synced before the next tick
//! - **GPIO driver**: real DHT22 access is feature-gated (`gpio`) so the crate
//!   builds and tests on any host
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use humtemp_logger::{CsvFileSink, DefaultSensorDriver, LoggerConfig, Supervisor};
//!
//! #[tokio::main]
//! async fn main() {
//!     let config = LoggerConfig::default().with_prefix("beehive_1");
//!     let assembly =
//!         Supervisor::from_config(&config, DefaultSensorDriver::connect, CsvFileSink::open);
//!
//!     for skipped in &assembly.skipped {
//!         println!("skipping pin #{}: {}", skipped.argument, skipped.error);
//!     }
//!
//!     let summary = assembly.supervisor.run().await;
//!     println!("wrote {} rows", summary.rows_written);
//! }
//! ```

pub mod config;
pub mod error;
pub mod sampling;
pub mod sensor;
pub mod storage;

// Re-export public API
pub use config::LoggerConfig;
pub use error::{LoggerError, Result};
pub use sampling::{
    aggregator::{Aggregator, AggregatorState, TickOutcome},
    data::{Averages, LogRow, Reading},
    supervisor::{Assembly, RunSummary, SkippedSensor, Supervisor},
    window::SampleWindow,
};
pub use sensor::{
    dht22::DefaultSensorDriver, pin::GpioPin, PinSpec, ScriptedDriver, SensorDriver, SensorFault,
    SensorHandle,
};
pub use storage::{CsvFileSink, LogSink, MemorySink};

/// Log file prefix used when none is given on the command line
pub const DEFAULT_LOG_PREFIX: &str = "humtemp";

/// GPIO pin used when no pins are given on the command line
pub const DEFAULT_PIN: u8 = 4;

/// Time between two ticks in milliseconds
pub const DEFAULT_SAMPLE_INTERVAL_MS: u64 = 1000;

/// Number of ticks averaged into one logged row
pub const DEFAULT_SAMPLES_PER_CYCLE: u32 = 10;

/// Number of rows logged per sensor before the run ends
pub const DEFAULT_CYCLES: u32 = 5;

/// Lowest usable GPIO pin number
pub const MIN_PIN: u8 = 0;

/// Highest usable GPIO pin number
pub const MAX_PIN: u8 = 27;
