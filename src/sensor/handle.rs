//! Ownership of one physical sensor.

use super::pin::{GpioPin, PinSpec};
use super::traits::{SensorDriver, SensorFault};
use crate::error::Result;
use crate::sampling::data::Reading;

/// One connected sensor with failure capture around its reads.
pub struct SensorHandle<D: SensorDriver> {
    device_id: String,
    pin: GpioPin,
    driver: D,
    last_error: Option<SensorFault>,
    released: bool,
}

impl<D: SensorDriver> SensorHandle<D> {
    /// Wrap an already connected driver.
    pub fn new(spec: &PinSpec, driver: D) -> Self {
        Self {
            device_id: spec.device_id(),
            pin: spec.pin,
            driver,
            last_error: None,
            released: false,
        }
    }

    /// Connect the driver for `spec`.
    ///
    /// Driver failures (pin busy, GPIO unavailable) are returned before any
    /// polling happens.
    pub fn connect<F>(spec: &PinSpec, connect: F) -> Result<Self>
    where
        F: FnOnce(GpioPin) -> Result<D>,
    {
        let driver = connect(spec.pin)?;
        tracing::debug!("Connected sensor {} on pin {}", spec.device_id(), spec.pin);
        Ok(Self::new(spec, driver))
    }

    pub fn device_id(&self) -> &str {
        &self.device_id
    }

    /// Read the sensor once.
    ///
    /// A fault is recorded for [`take_error`](Self::take_error) and returned;
    /// a successful read clears any previously recorded fault.
    pub fn poll(&mut self) -> std::result::Result<Reading, SensorFault> {
        match self.driver.read() {
            Ok(reading) => {
                self.last_error = None;
                Ok(reading)
            }
            Err(fault) => {
                tracing::debug!("Read failed on {}: {}", self.device_id, fault);
                self.last_error = Some(fault.clone());
                Err(fault)
            }
        }
    }

    /// Return and clear the last recorded fault.
    pub fn take_error(&mut self) -> Option<SensorFault> {
        self.last_error.take()
    }

    /// Release the sensor. Safe to call more than once.
    pub fn release(&mut self) {
        if !self.released {
            self.driver.release();
            self.released = true;
            tracing::debug!("Released sensor {} on pin {}", self.device_id, self.pin);
        }
    }
}

impl<D: SensorDriver> Drop for SensorHandle<D> {
    fn drop(&mut self) {
        self.release();
    }
}
