//! Logger run configuration.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use std::time::Duration;

/// Configuration for one logging run.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LoggerConfig {
    /// Prefix of every log file name
    pub prefix: String,
    /// Raw pin arguments, `PIN` or `PIN:DEVICE_ID`
    pub pins: Vec<String>,
    /// Pause between two ticks in milliseconds
    pub sample_interval_ms: u64,
    /// Ticks averaged into one row
    pub samples_per_cycle: u32,
    /// Rows written per sensor before the run ends
    pub cycles: u32,
}

impl Default for LoggerConfig {
    fn default() -> Self {
        Self {
            prefix: crate::DEFAULT_LOG_PREFIX.to_string(),
            pins: Vec::new(),
            sample_interval_ms: crate::DEFAULT_SAMPLE_INTERVAL_MS,
            samples_per_cycle: crate::DEFAULT_SAMPLES_PER_CYCLE,
            cycles: crate::DEFAULT_CYCLES,
        }
    }
}

impl LoggerConfig {
    /// Create a configuration for the given prefix and pin arguments.
    pub fn new(prefix: impl Into<String>, pins: Vec<String>) -> Self {
        Self {
            prefix: prefix.into(),
            pins,
            ..Default::default()
        }
    }

    /// Set the log file prefix.
    pub fn with_prefix(mut self, prefix: impl Into<String>) -> Self {
        self.prefix = prefix.into();
        self
    }

    /// Set the pin arguments.
    pub fn with_pins<I, P>(mut self, pins: I) -> Self
    where
        I: IntoIterator<Item = P>,
        P: Into<String>,
    {
        self.pins = pins.into_iter().map(Into::into).collect();
        self
    }

    /// Set the pause between ticks.
    pub fn with_sample_interval_ms(mut self, interval_ms: u64) -> Self {
        self.sample_interval_ms = interval_ms;
        self
    }

    /// Set how many ticks make up one cycle.
    pub fn with_samples_per_cycle(mut self, samples: u32) -> Self {
        self.samples_per_cycle = samples;
        self
    }

    /// Set how many cycles the run lasts.
    pub fn with_cycles(mut self, cycles: u32) -> Self {
        self.cycles = cycles;
        self
    }

    /// Pause between two ticks.
    pub fn sample_interval(&self) -> Duration {
        Duration::from_millis(self.sample_interval_ms)
    }

    /// Whether the run falls back to the default pin.
    pub fn uses_default_pin(&self) -> bool {
        self.pins.is_empty()
    }

    /// Pin arguments to construct sensors from.
    ///
    /// An empty pin list is its own branch: the default pin is returned
    /// explicitly instead of relying on whatever was configured before.
    pub fn pin_arguments(&self) -> Vec<String> {
        if self.uses_default_pin() {
            vec![crate::DEFAULT_PIN.to_string()]
        } else {
            self.pins.clone()
        }
    }

    /// Log file for the given device, `{prefix}_{device_id}.csv`.
    pub fn log_path(&self, device_id: &str) -> PathBuf {
        PathBuf::from(format!("{}_{}.csv", self.prefix, device_id))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_defaults() {
        let config = LoggerConfig::default();
        assert_eq!(config.prefix, "humtemp");
        assert_eq!(config.sample_interval(), Duration::from_secs(1));
        assert_eq!(config.samples_per_cycle, 10);
        assert_eq!(config.cycles, 5);
        assert!(config.uses_default_pin());
    }

    #[test]
    fn test_default_pin_branch() {
        let config = LoggerConfig::default();
        assert_eq!(config.pin_arguments(), vec!["4".to_string()]);

        let config = config.with_pins(["17", "22:attic"]);
        assert_eq!(config.pin_arguments(), vec!["17", "22:attic"]);
    }

    #[test]
    fn test_log_path() {
        let config = LoggerConfig::new("beehive_1", vec![]);
        assert_eq!(config.log_path("D4"), PathBuf::from("beehive_1_D4.csv"));
    }
}
