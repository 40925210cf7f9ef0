//! Paddle configuration parameters.
//!
//! Everything here is fixed for the lifetime of the process.  The defaults
//! reproduce the bench firmware; a JSON document embedded at build time via
//! `MORSEFORGE_CONFIG_JSON` can override any subset of fields.

use log::warn;
use serde::{Deserialize, Serialize};

use crate::app::protocol::ProtocolForm;
use crate::error::Error;
use crate::pins;

/// Longest advertised name that still fits a legacy advertising packet.
pub const MAX_DEVICE_NAME_LEN: usize = 24;

/// Device name as advertised over BLE.
pub type DeviceName = heapless::String<MAX_DEVICE_NAME_LEN>;

/// Core paddle configuration.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct PaddleConfig {
    // --- Contacts ---
    /// GPIO number of the DIT contact.
    pub dit_gpio: i32,
    /// GPIO number of the DAH contact.
    pub dah_gpio: i32,
    /// Debounce window (milliseconds), applied to each contact independently.
    pub debounce_ms: u32,

    // --- Timing ---
    /// Main loop tick interval (milliseconds).
    pub tick_ms: u32,
    /// Minimum spacing between two transport error reports (milliseconds).
    pub error_report_interval_ms: u32,

    // --- Link ---
    /// Advertised BLE device name.
    pub device_name: DeviceName,
    /// Relay events over the BLE UART link.
    pub link_enabled: bool,
    /// Outbound line format.
    pub protocol: ProtocolForm,

    // --- Indicator ---
    /// Drive the status pixel.
    pub indicator_enabled: bool,
}

impl Default for PaddleConfig {
    fn default() -> Self {
        let mut device_name = DeviceName::new();
        let _ = device_name.push_str("MorseForge");

        Self {
            dit_gpio: pins::DIT_GPIO,
            dah_gpio: pins::DAH_GPIO,
            debounce_ms: 10,

            tick_ms: 1,
            error_report_interval_ms: 2000,

            device_name,
            link_enabled: true,
            protocol: ProtocolForm::Verbose,

            indicator_enabled: true,
        }
    }
}

impl PaddleConfig {
    /// Parse a (partial) JSON override and validate it.
    pub fn from_json(json: &str) -> Result<Self, Error> {
        let config: Self =
            serde_json::from_str(json).map_err(|_| Error::Config("malformed JSON override"))?;
        config.validate()?;
        Ok(config)
    }

    /// Configuration for this build: the embedded override if present and
    /// valid, the defaults otherwise.
    pub fn from_build_env() -> Self {
        match option_env!("MORSEFORGE_CONFIG_JSON") {
            Some(json) => Self::from_json(json).unwrap_or_else(|e| {
                warn!("Config override rejected ({}), using defaults", e);
                Self::default()
            }),
            None => Self::default(),
        }
    }

    /// Reject values that would break the debounce or link contracts.
    pub fn validate(&self) -> Result<(), Error> {
        if self.debounce_ms == 0 {
            return Err(Error::Config("debounce_ms must be > 0"));
        }
        if self.tick_ms == 0 || self.tick_ms >= self.debounce_ms {
            return Err(Error::Config("tick_ms must be > 0 and below debounce_ms"));
        }
        if self.error_report_interval_ms == 0 {
            return Err(Error::Config("error_report_interval_ms must be > 0"));
        }
        if self.dit_gpio == self.dah_gpio {
            return Err(Error::Config("dit_gpio and dah_gpio must differ"));
        }
        if self.dit_gpio < 0 || self.dah_gpio < 0 {
            return Err(Error::Config("contact GPIO numbers must be non-negative"));
        }
        let reserved = [pins::PIXEL_GPIO, pins::PIXEL_POWER_GPIO];
        if reserved.contains(&self.dit_gpio) || reserved.contains(&self.dah_gpio) {
            return Err(Error::Config("contact GPIO collides with the status pixel"));
        }
        if self.device_name.is_empty() || !is_printable_ascii(&self.device_name) {
            return Err(Error::Config("device_name must be 1-24 printable ASCII bytes"));
        }
        Ok(())
    }
}

fn is_printable_ascii(s: &str) -> bool {
    s.bytes().all(|b| (0x20..=0x7E).contains(&b))
}
