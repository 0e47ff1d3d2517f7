//! Run-level timing loop over all aggregators.

use super::aggregator::{Aggregator, TickOutcome};
use super::window::SampleWindow;
use crate::config::LoggerConfig;
use crate::error::{LoggerError, Result};
use crate::sensor::{GpioPin, PinSpec, SensorDriver, SensorHandle};
use crate::storage::LogSink;
use serde::{Deserialize, Serialize};
use std::collections::HashSet;
use std::future::Future;
use std::path::{Path, PathBuf};
use std::time::Duration;
use tracing::{debug, error, info, warn};

/// A pin argument that did not produce an aggregator.
#[derive(Debug)]
pub struct SkippedSensor {
    /// The argument as given by the operator
    pub argument: String,
    /// Why it was skipped
    pub error: LoggerError,
}

/// Outcome of [`Supervisor::from_config`].
pub struct Assembly<D: SensorDriver, S: LogSink> {
    pub supervisor: Supervisor<D, S>,
    pub skipped: Vec<SkippedSensor>,
}

/// Totals reported at the end of a run.
#[derive(Debug, Clone, Default, PartialEq, Eq, Serialize, Deserialize)]
pub struct RunSummary {
    /// Aggregators that took part in the run
    pub sensors: usize,
    /// Cycles that ended in a flush
    pub cycles_completed: u32,
    /// Rows accepted by the sinks
    pub rows_written: u64,
    /// Rows the sinks rejected
    pub write_failures: u64,
    /// Poll attempts over all sensors
    pub ticks: u64,
    /// Poll attempts that produced no reading
    pub missed_samples: u64,
    /// Whether a shutdown signal ended the run early
    pub interrupted: bool,
}

/// Owns every aggregator and drives the tick/flush rhythm.
pub struct Supervisor<D: SensorDriver, S: LogSink> {
    aggregators: Vec<Aggregator<D, S>>,
    sample_interval: Duration,
    samples_per_cycle: u32,
    cycles: u32,
}

impl<D: SensorDriver, S: LogSink> Supervisor<D, S> {
    /// Create a supervisor over already constructed aggregators.
    pub fn new(aggregators: Vec<Aggregator<D, S>>, config: &LoggerConfig) -> Self {
        Self {
            aggregators,
            sample_interval: config.sample_interval(),
            samples_per_cycle: config.samples_per_cycle,
            cycles: config.cycles,
        }
    }

    /// Build one aggregator per pin argument.
    ///
    /// Each argument is handled on its own: a malformed, out-of-range or
    /// duplicate pin, a driver that cannot connect, or a log file that cannot
    /// be opened skips that sensor only.
    pub fn from_config<C, O>(config: &LoggerConfig, mut connect: C, mut open_sink: O) -> Assembly<D, S>
    where
        C: FnMut(GpioPin) -> Result<D>,
        O: FnMut(&Path) -> Result<S>,
    {
        let mut aggregators = Vec::new();
        let mut skipped = Vec::new();
        let mut pins = HashSet::new();
        let mut paths = HashSet::new();

        for argument in config.pin_arguments() {
            let built = Self::build_aggregator(
                config,
                &argument,
                &pins,
                &paths,
                &mut connect,
                &mut open_sink,
            );

            match built {
                Ok((pin, path, aggregator)) => {
                    info!(
                        "Logging sensor {} on pin {} to {}",
                        aggregator.device_id(),
                        pin,
                        path.display()
                    );
                    pins.insert(pin);
                    paths.insert(path);
                    aggregators.push(aggregator);
                }
                Err(error) => {
                    if error.is_configuration() {
                        warn!("Skipping pin '{}': {}", argument, error);
                    } else {
                        error!("Cannot start sensor on pin '{}': {}", argument, error);
                    }
                    skipped.push(SkippedSensor { argument, error });
                }
            }
        }

        Assembly {
            supervisor: Self::new(aggregators, config),
            skipped,
        }
    }

    fn build_aggregator<C, O>(
        config: &LoggerConfig,
        argument: &str,
        pins: &HashSet<GpioPin>,
        paths: &HashSet<PathBuf>,
        connect: &mut C,
        open_sink: &mut O,
    ) -> Result<(GpioPin, PathBuf, Aggregator<D, S>)>
    where
        C: FnMut(GpioPin) -> Result<D>,
        O: FnMut(&Path) -> Result<S>,
    {
        let spec: PinSpec = argument.parse()?;
        if pins.contains(&spec.pin) {
            return Err(LoggerError::DuplicatePin(spec.pin.bcm()));
        }

        let path = config.log_path(&spec.device_id());
        if paths.contains(&path) {
            return Err(LoggerError::config_error(format!(
                "log file {} is already used by another sensor",
                path.display()
            )));
        }

        let sensor = SensorHandle::connect(&spec, |pin| connect(pin))?;
        // On failure the handle is dropped here, which releases the pin.
        let sink = open_sink(path.as_path())?;
        let window = SampleWindow::with_capacity(config.samples_per_cycle as usize);

        Ok((spec.pin, path, Aggregator::with_window(sensor, sink, window)))
    }

    pub fn len(&self) -> usize {
        self.aggregators.len()
    }

    pub fn is_empty(&self) -> bool {
        self.aggregators.is_empty()
    }

    /// Run until all cycles complete or Ctrl-C/SIGTERM arrives.
    pub async fn run(self) -> RunSummary {
        self.run_until(shutdown_signal()).await
    }

    /// Run until all cycles complete or `shutdown` resolves.
    ///
    /// Every tick polls all sensors before the pause starts, and every cycle's
    /// flush finishes before the next cycle's first tick. A shutdown during a
    /// pause discards the unfinished cycle. Sensors are released and sinks
    /// closed on every exit path.
    pub async fn run_until<F>(mut self, shutdown: F) -> RunSummary
    where
        F: Future<Output = ()>,
    {
        let mut summary = RunSummary {
            sensors: self.aggregators.len(),
            ..Default::default()
        };

        if self.aggregators.is_empty() {
            warn!("No sensors could be started; nothing to log");
            return summary;
        }

        info!(
            "Sampling {} sensor(s): {} cycles of {} samples every {:?}",
            self.aggregators.len(),
            self.cycles,
            self.samples_per_cycle,
            self.sample_interval
        );

        tokio::pin!(shutdown);

        'run: for cycle in 1..=self.cycles {
            for sample in 1..=self.samples_per_cycle {
                self.tick_all();
                debug!(
                    "Cycle {}/{}, sample {}/{}",
                    cycle, self.cycles, sample, self.samples_per_cycle
                );

                tokio::select! {
                    biased;
                    _ = &mut shutdown => {
                        info!("Shutdown requested; discarding unfinished cycle {}", cycle);
                        summary.interrupted = true;
                        break 'run;
                    }
                    _ = tokio::time::sleep(self.sample_interval) => {}
                }
            }

            self.flush_all();
            summary.cycles_completed += 1;
        }

        self.shutdown_all();

        for aggregator in &self.aggregators {
            let stats = aggregator.stats();
            summary.ticks += stats.ticks;
            summary.missed_samples += stats.missed;
            summary.rows_written += stats.rows_written;
            summary.write_failures += stats.write_failures;
        }

        info!(
            "Run finished: {} cycles, {} rows written, {} write failures",
            summary.cycles_completed, summary.rows_written, summary.write_failures
        );

        summary
    }

    fn tick_all(&mut self) {
        for aggregator in &mut self.aggregators {
            if let TickOutcome::Missed(fault) = aggregator.tick() {
                debug!("No sample from {}: {}", aggregator.device_id(), fault);
            }
        }
    }

    fn flush_all(&mut self) {
        for aggregator in &mut self.aggregators {
            match aggregator.flush() {
                Ok(row) => info!("Logged: {}", row.to_csv_line()),
                Err(err) => error!("Could not log {}: {}", aggregator.device_id(), err),
            }
        }
    }

    fn shutdown_all(&mut self) {
        for aggregator in &mut self.aggregators {
            if let Err(err) = aggregator.shutdown() {
                error!("Could not close log for {}: {}", aggregator.device_id(), err);
            }
        }
    }
}

/// Resolves on Ctrl-C, or SIGTERM on Unix.
pub async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(err) = tokio::signal::ctrl_c().await {
            error!("Failed to listen for Ctrl-C: {}", err);
            std::future::pending::<()>().await;
        }
    };

    #[cfg(unix)]
    let terminate = async {
        use tokio::signal::unix::{signal, SignalKind};

        match signal(SignalKind::terminate()) {
            Ok(mut stream) => {
                stream.recv().await;
            }
            Err(err) => {
                error!("Failed to listen for SIGTERM: {}", err);
                std::future::pending::<()>().await;
            }
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {}
        _ = terminate => {}
    }
}
