//! Log-based event sink adapter.
//!
//! Implements [`EventSink`] by writing application events to the ESP-IDF
//! logger (UART / USB-CDC in production).  This is the diagnostic stream:
//! one banner at boot, one line per confirmed contact edge, one line per
//! link transition.

use log::info;

use crate::app::events::AppEvent;
use crate::app::ports::EventSink;

/// Adapter that logs every [`AppEvent`] to the serial console.
pub struct LogEventSink;

impl Default for LogEventSink {
    fn default() -> Self {
        Self::new()
    }
}

impl LogEventSink {
    pub fn new() -> Self {
        Self
    }
}

impl EventSink for LogEventSink {
    fn emit(&mut self, event: &AppEvent) {
        match event {
            AppEvent::Started(s) => {
                info!("=== MorseForge paddle v{} ===", env!("CARGO_PKG_VERSION"));
                info!("DIT pin: GPIO{}", s.dit_gpio);
                info!("DAH pin: GPIO{}", s.dah_gpio);
                info!("Debounce: {} ms", s.debounce_ms);
                if s.link_supported {
                    info!("Link: BLE UART as '{}' ({:?} lines)", s.device_name, s.protocol);
                } else {
                    info!("Link: unavailable, serial diagnostics only");
                }
                info!(
                    "Indicator: {}",
                    if s.indicator_supported { "on" } else { "absent" }
                );
                info!("Ready. Press paddles/key...");
            }
            AppEvent::Contact(ev) => {
                info!("{} {}", ev.timestamp_ms, ev.name());
            }
            AppEvent::LinkChanged { from, to } => {
                info!("LINK | {:?} -> {:?}", from, to);
            }
        }
    }
}
