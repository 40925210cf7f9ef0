//! Adapters: concrete implementations of the hexagonal port traits.
//!
//! | Adapter    | Implements     | Connects to                  |
//! |------------|----------------|------------------------------|
//! | `ble_uart` | LinkTransport  | Bluedroid GATT server (NUS)  |
//! | `hardware` | SampleSource   | Paddle GPIOs                 |
//! |            | IndicatorPort  | WS2812 status pixel (RMT)    |
//! | `log_sink` | EventSink      | Serial log output            |
//! | `time`     | (clock)        | ESP32 system timer           |

pub mod ble_uart;
pub mod hardware;
pub mod log_sink;
pub mod time;
