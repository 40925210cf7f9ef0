//! Unified error types for the MorseForge firmware.
//!
//! All variants are `Copy` so they can be handed back from the link and
//! indicator paths on every tick without allocation.  None of them is fatal
//! once the main loop is running: peripherals degrade, the debounce core
//! keeps going.

use core::fmt;

// ---------------------------------------------------------------------------
// Startup errors
// ---------------------------------------------------------------------------

/// Failures raised while bringing peripherals up in `main`.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Error {
    /// The BLE stack could not be initialised (ESP-IDF error code).
    TransportUnavailable(i32),
    /// The status pixel is absent, disabled, or its driver failed to start.
    IndicatorUnavailable(&'static str),
    /// A contact input could not be configured.
    Gpio(&'static str),
    /// Configuration is invalid or could not be parsed.
    Config(&'static str),
}

impl fmt::Display for Error {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::TransportUnavailable(rc) => write!(f, "transport unavailable (rc={rc})"),
            Self::IndicatorUnavailable(why) => write!(f, "indicator unavailable: {why}"),
            Self::Gpio(msg) => write!(f, "gpio: {msg}"),
            Self::Config(msg) => write!(f, "config: {msg}"),
        }
    }
}

impl core::error::Error for Error {}

// ---------------------------------------------------------------------------
// Transport errors
// ---------------------------------------------------------------------------

/// Errors reported by a [`LinkTransport`](crate::app::ports::LinkTransport).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkError {
    /// The stack refused to start advertising.
    AdvertiseFailed(i32),
    /// A notification/write to the connected peer failed.
    WriteFailed(i32),
    /// The outbound line does not fit the transport frame.
    LineTooLong,
}

impl fmt::Display for LinkError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::AdvertiseFailed(rc) => write!(f, "advertising start failed (rc={rc})"),
            Self::WriteFailed(rc) => write!(f, "peer write failed (rc={rc})"),
            Self::LineTooLong => write!(f, "line exceeds transport frame"),
        }
    }
}

/// Outcome of [`LinkManager::send`](crate::app::link::LinkManager::send).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SendError {
    /// No peer attached (or transport unsupported). Expected and frequent.
    NotConnected,
    /// The peer is attached but the write failed.
    Transport(LinkError),
}

impl fmt::Display for SendError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::NotConnected => write!(f, "not connected"),
            Self::Transport(e) => write!(f, "transport error: {e}"),
        }
    }
}

impl From<LinkError> for SendError {
    fn from(e: LinkError) -> Self {
        Self::Transport(e)
    }
}

// ---------------------------------------------------------------------------
// Indicator errors
// ---------------------------------------------------------------------------

/// A single pixel write failed after the indicator started successfully.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum IndicatorError {
    /// RMT pulse encoding or transmission returned an ESP-IDF error code.
    WriteFailed(i32),
}

impl fmt::Display for IndicatorError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::WriteFailed(rc) => write!(f, "pixel write failed (rc={rc})"),
        }
    }
}

// ---------------------------------------------------------------------------
// Convenience Result alias
// ---------------------------------------------------------------------------

/// Firmware-wide `Result` alias for startup paths.
pub type Result<T> = core::result::Result<T, Error>;
