//! Paddle contact inputs.
//!
//! ## Hardware
//!
//! Two active-low contacts (DIT, DAH) on GPIOs with internal pull-ups.
//! Open reads high, closed reads low.  Callers configure the pins; this
//! driver only samples them through `embedded-hal` so it runs unchanged
//! against `PinDriver` on the board and plain mocks on the host.
//!
//! A failed read returns the previous level for that contact.  A glitching
//! pin therefore reads as "no change" and never fabricates an edge.

use embedded_hal::digital::InputPin;
use log::debug;

use crate::app::events::ContactId;
use crate::app::ports::SampleSource;

pub struct PaddleInputs<D, A> {
    dit: D,
    dah: A,
    last: [bool; 2],
    read_errors: u32,
}

impl<D: InputPin, A: InputPin> PaddleInputs<D, A> {
    pub fn new(dit: D, dah: A) -> Self {
        Self {
            dit,
            dah,
            // Released until the first successful read says otherwise.
            last: [true; 2],
            read_errors: 0,
        }
    }

    /// Failed pin reads since boot.
    pub fn read_errors(&self) -> u32 {
        self.read_errors
    }
}

impl<D: InputPin, A: InputPin> SampleSource for PaddleInputs<D, A> {
    fn read(&mut self, contact: ContactId) -> bool {
        let level = match contact {
            ContactId::Dit => self.dit.is_high().map_err(|e| debug!("DIT read: {:?}", e)),
            ContactId::Dah => self.dah.is_high().map_err(|e| debug!("DAH read: {:?}", e)),
        };
        let slot = &mut self.last[contact.index()];
        match level {
            Ok(high) => *slot = high,
            Err(()) => self.read_errors = self.read_errors.wrapping_add(1),
        }
        *slot
    }
}
