//! Contact, indicator and pixel drivers.

pub mod debounce;
pub mod indicator;
pub mod neopixel;
pub mod paddle_input;
pub mod status_led;
