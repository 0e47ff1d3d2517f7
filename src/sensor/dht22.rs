//! DHT22 (AM2302) single-wire temperature/humidity sensor.
//!
//! Frame decoding is hardware independent. The bit-banged driver is
//! feature-gated (`gpio`) so the crate compiles on hosts without GPIO.

use super::traits::SensorFault;
use crate::sampling::data::Reading;
use std::time::Duration;

/// High pulses longer than this encode a `1` bit (nominal 26-28 us vs 70 us).
pub const ONE_BIT_THRESHOLD: Duration = Duration::from_micros(50);

/// The sensor refreshes its measurement at most this often.
pub const MIN_READ_INTERVAL: Duration = Duration::from_secs(2);

/// Number of data bits in one transmission.
pub const FRAME_BITS: usize = 40;

/// Pack 40 measured high-pulse widths into the five frame bytes, MSB first.
pub fn pulses_to_frame(pulses: &[Duration; FRAME_BITS]) -> [u8; 5] {
    let mut frame = [0u8; 5];
    for (index, pulse) in pulses.iter().enumerate() {
        if *pulse > ONE_BIT_THRESHOLD {
            frame[index / 8] |= 0x80 >> (index % 8);
        }
    }
    frame
}

/// Decode a five byte frame: humidity, temperature, checksum.
///
/// Humidity is unsigned tenths of a percent. Temperature is tenths of a degree
/// Celsius with the sign in the top bit.
pub fn decode_frame(frame: [u8; 5]) -> Result<Reading, SensorFault> {
    let expected = frame[..4]
        .iter()
        .fold(0u8, |sum, byte| sum.wrapping_add(*byte));
    if expected != frame[4] {
        return Err(SensorFault::Checksum {
            expected,
            actual: frame[4],
        });
    }

    let humidity = f64::from(u16::from_be_bytes([frame[0], frame[1]])) / 10.0;
    let magnitude = f64::from(u16::from_be_bytes([frame[2] & 0x7F, frame[3]])) / 10.0;
    let temperature = if frame[2] & 0x80 != 0 {
        -magnitude
    } else {
        magnitude
    };

    Ok(Reading::new(temperature, humidity))
}

#[cfg(feature = "gpio")]
mod raspberry_pi {
    use super::*;
    use crate::error::{LoggerError, Result};
    use crate::sensor::pin::GpioPin;
    use crate::sensor::traits::SensorDriver;
    use rppal::gpio::{Gpio, IoPin, Level, Mode, PullUpDown};
    use std::thread;
    use std::time::Instant;

    /// Host pulls the line low this long to request a transmission.
    const START_SIGNAL: Duration = Duration::from_micros(1_100);
    /// Upper bound on any single level change during a transmission.
    const EDGE_TIMEOUT: Duration = Duration::from_micros(200);

    /// DHT22 driver using rppal.
    pub struct Dht22 {
        pin: Option<IoPin>,
        bcm: u8,
        last_read: Option<Instant>,
        cached: Option<Reading>,
    }

    impl Dht22 {
        /// Claim `pin` and idle the data line high.
        pub fn connect(pin: GpioPin) -> Result<Self> {
            let gpio = Gpio::new().map_err(|e| {
                LoggerError::gpio_error(format!("Failed to initialize GPIO: {}", e))
            })?;

            let mut io = gpio
                .get(pin.bcm())
                .map_err(|e| {
                    LoggerError::gpio_error(format!("Failed to access pin {}: {}", pin, e))
                })?
                .into_io(Mode::Output);
            io.set_high();

            Ok(Self {
                pin: Some(io),
                bcm: pin.bcm(),
                last_read: None,
                cached: None,
            })
        }

        fn capture(io: &mut IoPin) -> std::result::Result<[u8; 5], SensorFault> {
            io.set_mode(Mode::Output);
            io.set_low();
            thread::sleep(START_SIGNAL);
            io.set_high();
            io.set_mode(Mode::Input);
            io.set_pullupdown(PullUpDown::PullUp);

            // Response: ~80 us low, ~80 us high, then the first bit's low lead-in.
            wait_for(io, Level::Low, "response")?;
            wait_for(io, Level::High, "response high")?;
            wait_for(io, Level::Low, "first bit")?;

            let mut pulses = [Duration::ZERO; FRAME_BITS];
            for pulse in pulses.iter_mut() {
                wait_for(io, Level::High, "bit start")?;
                *pulse = wait_for(io, Level::Low, "bit end")?;
            }

            Ok(pulses_to_frame(&pulses))
        }
    }

    /// Spin until the line reaches `level`, returning how long that took.
    fn wait_for(
        io: &IoPin,
        level: Level,
        phase: &'static str,
    ) -> std::result::Result<Duration, SensorFault> {
        let started = Instant::now();
        while io.read() != level {
            if started.elapsed() > EDGE_TIMEOUT {
                return Err(SensorFault::Timeout { phase });
            }
        }
        Ok(started.elapsed())
    }

    impl SensorDriver for Dht22 {
        fn read(&mut self) -> std::result::Result<Reading, SensorFault> {
            // Polling faster than the sensor refreshes returns the last good value.
            if let (Some(at), Some(reading)) = (self.last_read, self.cached) {
                if at.elapsed() < MIN_READ_INTERVAL {
                    return Ok(reading);
                }
            }

            let io = self.pin.as_mut().ok_or_else(|| {
                SensorFault::Unavailable(format!("pin {} has been released", self.bcm))
            })?;

            self.last_read = Some(Instant::now());
            let reading = decode_frame(Self::capture(io)?)?;
            self.cached = Some(reading);
            Ok(reading)
        }

        fn release(&mut self) {
            // Dropping the IoPin restores the pin's previous mode.
            self.pin = None;
            self.cached = None;
        }
    }
}

#[cfg(not(feature = "gpio"))]
mod mock {
    use super::*;
    use crate::error::Result;
    use crate::sensor::pin::GpioPin;
    use crate::sensor::traits::SensorDriver;

    /// Stand-in DHT22 for systems without GPIO support.
    pub struct MockDht22 {
        pin: GpioPin,
    }

    impl MockDht22 {
        pub fn connect(pin: GpioPin) -> Result<Self> {
            tracing::warn!(
                "GPIO support not compiled in; pin {} will log no readings",
                pin
            );
            Ok(Self { pin })
        }
    }

    impl SensorDriver for MockDht22 {
        fn read(&mut self) -> std::result::Result<Reading, SensorFault> {
            Err(SensorFault::Unavailable(format!(
                "GPIO not available on this system (attempted to read pin {})",
                self.pin
            )))
        }
    }
}

// Re-export the appropriate DHT22 driver
#[cfg(feature = "gpio")]
pub use raspberry_pi::Dht22 as DefaultSensorDriver;

#[cfg(not(feature = "gpio"))]
pub use mock::MockDht22 as DefaultSensorDriver;
