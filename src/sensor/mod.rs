//! Sensor access: pin resolution, drivers and the per-sensor handle.
//!
//! The sampling loop only sees [`SensorHandle`], which turns every driver
//! failure into a recorded [`SensorFault`] instead of an error that could
//! abort the run.

pub mod dht22;
pub mod handle;
pub mod pin;
pub mod scripted;
pub mod traits;

// Re-export commonly used items
pub use handle::SensorHandle;
pub use pin::{resolve_pin, GpioPin, PinSpec};
pub use scripted::ScriptedDriver;
pub use traits::{SensorDriver, SensorFault};
