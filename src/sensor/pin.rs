//! GPIO pin resolution.
//!
//! Pin numbers are resolved through a fixed table of board names, so an
//! out-of-range or malformed argument is a plain error value.

use crate::error::{LoggerError, Result};
use serde::{Deserialize, Serialize};
use std::fmt;
use std::str::FromStr;

/// Board names of the usable GPIO pins, indexed by BCM number.
const BOARD_PINS: [&str; 28] = [
    "D0", "D1", "D2", "D3", "D4", "D5", "D6", "D7", "D8", "D9", "D10", "D11", "D12", "D13", "D14",
    "D15", "D16", "D17", "D18", "D19", "D20", "D21", "D22", "D23", "D24", "D25", "D26", "D27",
];

/// A validated GPIO pin (BCM numbering).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
pub struct GpioPin(u8);

impl GpioPin {
    /// BCM pin number, as used by the GPIO driver.
    pub fn bcm(self) -> u8 {
        self.0
    }

    /// Board name of the pin, e.g. `D4`.
    pub fn board_name(self) -> &'static str {
        BOARD_PINS[usize::from(self.0)]
    }
}

impl fmt::Display for GpioPin {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.board_name())
    }
}

/// Resolve a numeric pin identifier.
pub fn resolve_pin(id: i64) -> Result<GpioPin> {
    usize::try_from(id)
        .ok()
        .filter(|&index| index < BOARD_PINS.len())
        .map(|index| GpioPin(index as u8))
        .ok_or_else(|| LoggerError::invalid_pin(id.to_string()))
}

/// One sensor requested on the command line: `PIN` or `PIN:DEVICE_ID`.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PinSpec {
    pub pin: GpioPin,
    pub device_id: Option<String>,
}

impl PinSpec {
    /// A spec for `pin` with the default device id.
    pub fn new(pin: GpioPin) -> Self {
        Self {
            pin,
            device_id: None,
        }
    }

    /// Device id to log under; defaults to the pin's board name.
    pub fn device_id(&self) -> String {
        self.device_id
            .clone()
            .unwrap_or_else(|| self.pin.board_name().to_string())
    }
}

impl FromStr for PinSpec {
    type Err = LoggerError;

    fn from_str(arg: &str) -> Result<Self> {
        let (pin_text, device_id) = match arg.split_once(':') {
            Some((pin, id)) => {
                let id = id.trim();
                if id.is_empty() || id.contains(['/', '\\']) {
                    return Err(LoggerError::config_error(format!(
                        "invalid device id in '{}'",
                        arg
                    )));
                }
                (pin, Some(id.to_string()))
            }
            None => (arg, None),
        };

        let id: i64 = pin_text
            .trim()
            .parse()
            .map_err(|_| LoggerError::invalid_pin(pin_text.trim()))?;
        let pin = resolve_pin(id)?;

        Ok(Self { pin, device_id })
    }
}
