//! Outbound line protocol.
//!
//! One event per line, UTF-8.  Two forms exist in the field:
//!
//! | Event     | Verbose    | Compact |
//! |-----------|------------|---------|
//! | Dit down  | `DIT_DOWN` | `K1:1`  |
//! | Dit up    | `DIT_UP`   | `K1:0`  |
//! | Dah down  | `DAH_DOWN` | `K2:1`  |
//! | Dah up    | `DAH_UP`   | `K2:0`  |
//!
//! The newline terminator is appended by the link, not stored here.

use core::fmt::Write;

use serde::{Deserialize, Serialize};

use super::events::{ContactEvent, ContactId, Edge};

/// Longest encoded line (without terminator).
pub const MAX_LINE_LEN: usize = 12;

/// An encoded event line, owned until handed to the link.
pub type OutboundMessage = heapless::String<MAX_LINE_LEN>;

/// Which text form outbound lines use.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ProtocolForm {
    /// `DIT_DOWN` / `DIT_UP` / `DAH_DOWN` / `DAH_UP`
    Verbose,
    /// `K1:1` / `K1:0` / `K2:1` / `K2:0`
    Compact,
}

impl ProtocolForm {
    /// Encode `event` as a protocol line.
    pub fn encode(self, event: &ContactEvent) -> OutboundMessage {
        let mut line = OutboundMessage::new();
        // Every encoding is at most 8 bytes, the push cannot overflow.
        let _ = match self {
            Self::Verbose => line.push_str(event.name()),
            Self::Compact => {
                let key = match event.contact {
                    ContactId::Dit => 1,
                    ContactId::Dah => 2,
                };
                let level = match event.edge {
                    Edge::Pressed => 1,
                    Edge::Released => 0,
                };
                write!(line, "K{key}:{level}").map_err(|_| ())
            }
        };
        line
    }
}
