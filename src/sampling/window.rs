//! Accumulation of readings between two flushes.

use super::data::{Averages, Reading};

/// Readings collected since the last flush.
///
/// Both sequences always have the same length: a reading is appended to
/// both or neither.
#[derive(Debug, Clone, Default)]
pub struct SampleWindow {
    temps: Vec<f64>,
    humidities: Vec<f64>,
}

impl SampleWindow {
    pub fn new() -> Self {
        Self::default()
    }

    /// Window with room for `samples` readings, so a full cycle never reallocates.
    pub fn with_capacity(samples: usize) -> Self {
        Self {
            temps: Vec::with_capacity(samples),
            humidities: Vec::with_capacity(samples),
        }
    }

    /// Add one successful reading.
    pub fn append(&mut self, reading: Reading) {
        self.temps.push(reading.temperature_celsius);
        self.humidities.push(reading.humidity_percent);
    }

    /// Mean of each quantity, or all NaN if the window is empty.
    pub fn average(&self) -> Averages {
        if self.is_empty() {
            return Averages::empty();
        }

        Averages::new(mean(&self.temps), mean(&self.humidities))
    }

    /// Drop all readings, keeping the allocation.
    pub fn clear(&mut self) {
        self.temps.clear();
        self.humidities.clear();
    }

    pub fn len(&self) -> usize {
        self.temps.len()
    }

    pub fn is_empty(&self) -> bool {
        self.temps.is_empty()
    }
}

fn mean(values: &[f64]) -> f64 {
    values.iter().sum::<f64>() / values.len() as f64
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_empty_window_is_nan() {
        let window = SampleWindow::new();
        assert!(window.average().is_empty());
    }

    #[test]
    fn test_average_each_quantity_independently() {
        let mut window = SampleWindow::new();
        window.append(Reading::new(20.0, 50.0));
        window.append(Reading::new(22.0, 55.0));
        window.append(Reading::new(24.5, 41.0));

        let averages = window.average();
        assert_eq!(window.len(), 3);
        assert!((averages.temperature_celsius - 22.166_666_666_666_668).abs() < 1e-9);
        assert!((averages.humidity_percent - 48.666_666_666_666_664).abs() < 1e-9);
        assert_eq!(
            averages.temperature_fahrenheit,
            averages.temperature_celsius * 9.0 / 5.0 + 32.0
        );
    }

    #[test]
    fn test_zero_readings_are_not_missing() {
        let mut window = SampleWindow::new();
        window.append(Reading::new(0.0, 0.0));

        let averages = window.average();
        assert_eq!(averages.temperature_celsius, 0.0);
        assert_eq!(averages.temperature_fahrenheit, 32.0);
        assert_eq!(averages.humidity_percent, 0.0);
    }

    #[test]
    fn test_clear_resets_to_nan() {
        let mut window = SampleWindow::with_capacity(10);
        window.append(Reading::new(20.0, 50.0));
        window.clear();

        assert!(window.is_empty());
        assert!(window.average().is_empty());
    }
}
