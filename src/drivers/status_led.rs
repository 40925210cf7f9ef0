//! Status indicator driver.
//!
//! Wraps the optional [`NeoPixel`].  When the pixel did not come up at boot
//! every request is still tracked, so the router and diagnostics see the
//! same colour either way; nothing is written to hardware.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: forwards to the RMT-driven pixel.
//! On host/test: forwards to the in-memory pixel simulation.

use log::debug;

use crate::app::ports::{Capability, IndicatorPort};
use crate::drivers::indicator::Rgb;
use crate::drivers::neopixel::NeoPixel;

pub struct StatusLed {
    pixel: Capability<NeoPixel>,
    current: Rgb,
    write_errors: u32,
}

impl StatusLed {
    pub fn new(pixel: Capability<NeoPixel>) -> Self {
        Self {
            pixel,
            current: Rgb::OFF,
            write_errors: 0,
        }
    }

    pub fn is_supported(&self) -> bool {
        self.pixel.is_supported()
    }

    pub fn off(&mut self) {
        self.set_colour(Rgb::OFF);
    }

    pub fn current_colour(&self) -> Rgb {
        self.current
    }

    /// Failed pixel writes since boot.
    pub fn write_errors(&self) -> u32 {
        self.write_errors
    }

    pub fn pixel(&self) -> Option<&NeoPixel> {
        self.pixel.get()
    }
}

impl IndicatorPort for StatusLed {
    fn set_colour(&mut self, colour: Rgb) {
        self.current = colour;
        if let Some(pixel) = self.pixel.get_mut() {
            if let Err(e) = pixel.write(colour) {
                self.write_errors = self.write_errors.wrapping_add(1);
                debug!("pixel: {} (total {})", e, self.write_errors);
            }
        }
    }
}
