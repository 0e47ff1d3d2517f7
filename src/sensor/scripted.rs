//! A driver that replays a fixed sequence of read outcomes.
//!
//! Used to exercise the sampling loop without hardware.

use super::traits::{SensorDriver, SensorFault};
use crate::sampling::data::Reading;
use std::collections::VecDeque;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

/// Replays scripted outcomes; reports [`SensorFault::Exhausted`] afterwards.
#[derive(Debug, Default)]
pub struct ScriptedDriver {
    outcomes: VecDeque<Result<Reading, SensorFault>>,
    reads: Arc<AtomicUsize>,
    released: Arc<AtomicBool>,
}

impl ScriptedDriver {
    pub fn new<I>(outcomes: I) -> Self
    where
        I: IntoIterator<Item = Result<Reading, SensorFault>>,
    {
        Self {
            outcomes: outcomes.into_iter().collect(),
            ..Default::default()
        }
    }

    /// Shared flag set once the driver has been released.
    pub fn release_flag(&self) -> Arc<AtomicBool> {
        Arc::clone(&self.released)
    }

    /// Shared counter of read attempts.
    pub fn read_counter(&self) -> Arc<AtomicUsize> {
        Arc::clone(&self.reads)
    }
}

impl SensorDriver for ScriptedDriver {
    fn read(&mut self) -> Result<Reading, SensorFault> {
        self.reads.fetch_add(1, Ordering::SeqCst);
        self.outcomes
            .pop_front()
            .unwrap_or(Err(SensorFault::Exhausted))
    }

    fn release(&mut self) {
        self.released.store(true, Ordering::SeqCst);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_replays_then_exhausts() {
        let mut driver = ScriptedDriver::new([Ok(Reading::new(20.0, 50.0))]);
        let reads = driver.read_counter();

        assert_eq!(driver.read(), Ok(Reading::new(20.0, 50.0)));
        assert_eq!(driver.read(), Err(SensorFault::Exhausted));
        assert_eq!(reads.load(Ordering::SeqCst), 2);
    }
}
