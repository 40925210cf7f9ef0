//! Port traits: the hexagonal boundary between domain logic and the board.
//!
//! ```text
//!   Adapter ──▶ Port trait ──▶ EventRouter / LinkManager (domain)
//! ```
//!
//! Driven adapters (paddle inputs, status pixel, BLE UART, event sinks)
//! implement these traits.  The core consumes them via generics, so it never
//! touches hardware directly and runs unchanged against the mocks in
//! `tests/integration`.

use crate::drivers::indicator::Rgb;
use crate::error::LinkError;

use super::events::{AppEvent, ContactId};

// ───────────────────────────────────────────────────────────────
// Capability (resolved once at startup)
// ───────────────────────────────────────────────────────────────

/// Whether an optional peripheral came up at boot.
///
/// `main` probes each optional peripheral exactly once and injects the
/// result; consumers match on it instead of probing again.
#[derive(Debug)]
pub enum Capability<T> {
    Supported(T),
    Unsupported,
}

impl<T> Capability<T> {
    /// Lift a startup probe result, logging why the peripheral is absent.
    pub fn from_probe<E: core::fmt::Display>(what: &str, probe: Result<T, E>) -> Self {
        match probe {
            Ok(inner) => Self::Supported(inner),
            Err(e) => {
                log::warn!("{} unavailable ({}), continuing without it", what, e);
                Self::Unsupported
            }
        }
    }

    pub fn is_supported(&self) -> bool {
        matches!(self, Self::Supported(_))
    }

    pub fn get_mut(&mut self) -> Option<&mut T> {
        match self {
            Self::Supported(inner) => Some(inner),
            Self::Unsupported => None,
        }
    }

    pub fn get(&self) -> Option<&T> {
        match self {
            Self::Supported(inner) => Some(inner),
            Self::Unsupported => None,
        }
    }
}

// ───────────────────────────────────────────────────────────────
// Sample source (driven adapter: contacts → domain)
// ───────────────────────────────────────────────────────────────

/// Read-side port: current raw level of a contact.
///
/// Active-low: `false` means the contact is closed (pressed).
pub trait SampleSource {
    fn read(&mut self, contact: ContactId) -> bool;
}

// ───────────────────────────────────────────────────────────────
// Indicator port (driven adapter: domain → status pixel)
// ───────────────────────────────────────────────────────────────

/// Write-side port: render a colour on the status indicator.
pub trait IndicatorPort {
    fn set_colour(&mut self, colour: Rgb);
}

// ───────────────────────────────────────────────────────────────
// Link transport (driven adapter: domain ↔ wireless serial)
// ───────────────────────────────────────────────────────────────

/// Raw wireless serial transport as seen by the
/// [`LinkManager`](super::link::LinkManager).
///
/// All methods must be non-blocking or bounded-latency; they run inside the
/// debounce tick.
pub trait LinkTransport {
    /// Ask the stack to start advertising.
    fn start_advertising(&mut self) -> Result<(), LinkError>;

    /// Advertising is active or has been requested and not yet refused.
    fn is_advertising(&self) -> bool;

    /// A peer is attached.
    fn is_connected(&self) -> bool;

    /// Queue `frame` (one newline-terminated line) to the peer.
    fn write(&mut self, frame: &[u8]) -> Result<(), LinkError>;
}

// ───────────────────────────────────────────────────────────────
// Event sink port (driven adapter: domain → logging)
// ───────────────────────────────────────────────────────────────

/// The domain emits structured [`AppEvent`]s through this port.
pub trait EventSink {
    fn emit(&mut self, event: &AppEvent);
}
