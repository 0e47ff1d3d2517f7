//! Data structures for readings and logged rows.

use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};

/// Header line written to a new log file.
pub const CSV_HEADER: &str = "Device ID, Date, Time, Temperature C, Temperature F, Humidity, Errors";

/// Line terminator of every log file line.
pub const LINE_ENDING: &str = "\r\n";

/// Convert Celsius to Fahrenheit.
pub fn celsius_to_fahrenheit(celsius: f64) -> f64 {
    celsius * 9.0 / 5.0 + 32.0
}

/// One successful sensor read.
#[derive(Debug, Clone, Copy, PartialEq, Serialize, Deserialize)]
pub struct Reading {
    /// Temperature in degrees Celsius
    pub temperature_celsius: f64,
    /// Relative humidity in percent
    pub humidity_percent: f64,
}

impl Reading {
    pub fn new(temperature_celsius: f64, humidity_percent: f64) -> Self {
        Self {
            temperature_celsius,
            humidity_percent,
        }
    }

    /// Temperature in Fahrenheit, always derived from the Celsius value.
    pub fn temperature_fahrenheit(&self) -> f64 {
        celsius_to_fahrenheit(self.temperature_celsius)
    }
}

/// Per-quantity means of one window. All fields are NaN for an empty window.
#[derive(Debug, Clone, Copy, Serialize, Deserialize)]
pub struct Averages {
    pub temperature_celsius: f64,
    pub temperature_fahrenheit: f64,
    pub humidity_percent: f64,
}

impl Averages {
    /// Averages for the given means; Fahrenheit is derived from Celsius.
    pub fn new(temperature_celsius: f64, humidity_percent: f64) -> Self {
        Self {
            temperature_celsius,
            temperature_fahrenheit: celsius_to_fahrenheit(temperature_celsius),
            humidity_percent,
        }
    }

    /// Averages of a window that received no samples.
    pub fn empty() -> Self {
        Self::new(f64::NAN, f64::NAN)
    }

    /// Whether the window had no samples.
    pub fn is_empty(&self) -> bool {
        self.temperature_celsius.is_nan() && self.humidity_percent.is_nan()
    }
}

/// One row of a sensor log file.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct LogRow {
    /// Device the row belongs to
    pub device_id: String,
    /// Local date, `MM/DD/YY`
    pub date: String,
    /// Local time, `HH:MM:SS`
    pub time: String,
    /// Average temperature in Celsius, NaN if no samples
    pub avg_temp_c: f64,
    /// Average temperature in Fahrenheit, NaN if no samples
    pub avg_temp_f: f64,
    /// Average relative humidity, NaN if no samples
    pub avg_humidity: f64,
}

impl LogRow {
    /// Build a row stamped with `timestamp` (local wall-clock time).
    pub fn new(device_id: impl Into<String>, timestamp: NaiveDateTime, averages: Averages) -> Self {
        Self {
            device_id: device_id.into(),
            date: timestamp.format("%m/%d/%y").to_string(),
            time: timestamp.format("%H:%M:%S").to_string(),
            avg_temp_c: averages.temperature_celsius,
            avg_temp_f: averages.temperature_fahrenheit,
            avg_humidity: averages.humidity_percent,
        }
    }

    /// The row as written to the log file, without the line ending.
    pub fn to_csv_line(&self) -> String {
        format!(
            "{}, {}, {}, {}, {}, {}%",
            self.device_id,
            self.date,
            self.time,
            format_value(self.avg_temp_c),
            format_value(self.avg_temp_f),
            format_value(self.avg_humidity)
        )
    }
}

/// Render a logged number: `nan` for missing data, otherwise the shortest
/// representation that keeps a decimal point (`21.0`, `69.8`).
pub fn format_value(value: f64) -> String {
    if value.is_nan() {
        "nan".to_string()
    } else if value.is_infinite() {
        let rendered = if value > 0.0 { "inf" } else { "-inf" };
        rendered.to_string()
    } else {
        format!("{:?}", value)
    }
}
