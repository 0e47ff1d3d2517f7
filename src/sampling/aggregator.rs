//! Poll, accumulate and flush for a single sensor stream.

use super::data::{LogRow, Reading};
use super::window::SampleWindow;
use crate::error::Result;
use crate::sensor::{SensorDriver, SensorFault, SensorHandle};
use crate::storage::LogSink;
use chrono::{Local, NaiveDateTime};

/// Where an aggregator is in its accumulate/flush rhythm.
///
/// `Flushing` only lasts for the sink write inside [`Aggregator::flush_at`];
/// between calls an aggregator is always `Accumulating`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AggregatorState {
    /// Collecting readings from ticks
    Accumulating,
    /// Writing the window's averages; returns to `Accumulating`
    Flushing,
}

/// Result of one tick.
#[derive(Debug, Clone, PartialEq)]
pub enum TickOutcome {
    /// The reading was added to the window
    Sampled(Reading),
    /// The read failed; the window gets one fewer sample
    Missed(SensorFault),
}

/// Counters kept for diagnostics and the run summary.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct AggregatorStats {
    pub ticks: u64,
    pub missed: u64,
    pub rows_written: u64,
    pub write_failures: u64,
}

/// One sensor, its sample window and its log sink.
pub struct Aggregator<D: SensorDriver, S: LogSink> {
    sensor: SensorHandle<D>,
    window: SampleWindow,
    sink: S,
    state: AggregatorState,
    last_error: Option<SensorFault>,
    stats: AggregatorStats,
}

impl<D: SensorDriver, S: LogSink> Aggregator<D, S> {
    pub fn new(sensor: SensorHandle<D>, sink: S) -> Self {
        Self::with_window(sensor, sink, SampleWindow::new())
    }

    pub fn with_window(sensor: SensorHandle<D>, sink: S, window: SampleWindow) -> Self {
        Self {
            sensor,
            window,
            sink,
            state: AggregatorState::Accumulating,
            last_error: None,
            stats: AggregatorStats::default(),
        }
    }

    pub fn device_id(&self) -> &str {
        self.sensor.device_id()
    }

    pub fn state(&self) -> AggregatorState {
        self.state
    }

    pub fn window(&self) -> &SampleWindow {
        &self.window
    }

    pub fn stats(&self) -> AggregatorStats {
        self.stats
    }

    /// Most recent read fault, kept for diagnostics.
    pub fn last_error(&self) -> Option<&SensorFault> {
        self.last_error.as_ref()
    }

    /// Poll the sensor once. No retry: a failure just means one fewer sample.
    pub fn tick(&mut self) -> TickOutcome {
        self.stats.ticks += 1;

        match self.sensor.poll() {
            Ok(reading) => {
                self.window.append(reading);
                TickOutcome::Sampled(reading)
            }
            Err(fault) => {
                self.stats.missed += 1;
                self.last_error = self.sensor.take_error();
                TickOutcome::Missed(fault)
            }
        }
    }

    /// Write the window's averages stamped with the current local time.
    pub fn flush(&mut self) -> Result<LogRow> {
        self.flush_at(Local::now().naive_local())
    }

    /// Write the window's averages stamped with `timestamp`.
    ///
    /// A row is produced even for an empty window. The window is cleared only
    /// after the sink accepted the row; on a write failure the samples carry
    /// over into the next flush.
    pub fn flush_at(&mut self, timestamp: NaiveDateTime) -> Result<LogRow> {
        debug_assert_eq!(self.state, AggregatorState::Accumulating);
        self.state = AggregatorState::Flushing;

        let averages = self.window.average();
        let row = LogRow::new(self.sensor.device_id(), timestamp, averages);
        let written = self.sink.append(&row);

        self.state = AggregatorState::Accumulating;
        match written {
            Ok(()) => {
                self.window.clear();
                self.stats.rows_written += 1;
                Ok(row)
            }
            Err(err) => {
                self.stats.write_failures += 1;
                Err(err)
            }
        }
    }

    /// Release the sensor and close the sink.
    pub fn shutdown(&mut self) -> Result<()> {
        self.sensor.release();
        self.sink.close()
    }
}
