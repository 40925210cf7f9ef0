//! GPIO assignments for the MorseForge paddle board (ESP32-C6 Feather).
//!
//! Single source of truth for defaults; [`PaddleConfig`](crate::config::PaddleConfig)
//! copies the contact pins so a build-time override can remap them.

// ---------------------------------------------------------------------------
// Paddle contacts (TRRS jack, active-low with internal pull-up)
// ---------------------------------------------------------------------------

/// DIT contact: TRRS ring, board label IO14.
pub const DIT_GPIO: i32 = 14;
/// DAH contact: TRRS tip, board label A3.
pub const DAH_GPIO: i32 = 6;

// ---------------------------------------------------------------------------
// Status pixel (WS2812, GRB)
// ---------------------------------------------------------------------------

/// On-board NeoPixel data line.
pub const PIXEL_GPIO: i32 = 9;

/// NEOPIXEL_I2C_POWER: switches the pixel and STEMMA QT supply rail.
pub const PIXEL_POWER_GPIO: i32 = 20;
