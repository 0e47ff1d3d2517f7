//! Traits for single-shot sensor access.

use crate::sampling::data::Reading;

/// Why a single sensor read produced no value.
///
/// Single-wire sensors fail routinely; a fault is expected, cheap to clone and
/// never escalated past the aggregator that observed it.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
pub enum SensorFault {
    /// The sensor stopped toggling the data line
    #[error("Timed out waiting for {phase}")]
    Timeout { phase: &'static str },

    /// The frame arrived but failed its checksum
    #[error("Checksum mismatch: expected {expected:#04x}, got {actual:#04x}")]
    Checksum { expected: u8, actual: u8 },

    /// The sensor cannot be reached on this system
    #[error("Sensor unavailable: {0}")]
    Unavailable(String),

    /// A scripted driver ran out of outcomes
    #[error("No more scripted readings")]
    Exhausted,
}

/// Trait for a sensor that performs one blocking read per call.
///
/// Implementations must return within a bounded time: either a reading or a
/// fault, never an indefinite wait.
pub trait SensorDriver {
    /// Perform a single read.
    fn read(&mut self) -> Result<Reading, SensorFault>;

    /// Give the underlying pin back to the system.
    fn release(&mut self) {}
}
