//! Hardware adapter: bridges real peripherals to domain port traits.
//!
//! Owns the paddle inputs and the status indicator, exposing them through
//! [`SampleSource`] and [`IndicatorPort`] as one value so the router can
//! borrow both at once.  On non-espidf targets, the underlying drivers use
//! cfg-gated simulation stubs.

use crate::app::events::ContactId;
use crate::app::ports::{IndicatorPort, SampleSource};
use crate::drivers::indicator::Rgb;
use crate::drivers::status_led::StatusLed;

/// Concrete adapter that combines all paddle hardware behind port traits.
pub struct HardwareAdapter<P> {
    paddle: P,
    led: StatusLed,
}

impl<P: SampleSource> HardwareAdapter<P> {
    pub fn new(paddle: P, led: StatusLed) -> Self {
        Self { paddle, led }
    }

    pub fn indicator_supported(&self) -> bool {
        self.led.is_supported()
    }
}

// ── SampleSource implementation ───────────────────────────────

impl<P: SampleSource> SampleSource for HardwareAdapter<P> {
    fn read(&mut self, contact: ContactId) -> bool {
        self.paddle.read(contact)
    }
}

// ── IndicatorPort implementation ──────────────────────────────

impl<P> IndicatorPort for HardwareAdapter<P> {
    fn set_colour(&mut self, colour: Rgb) {
        self.led.set_colour(colour);
    }
}
