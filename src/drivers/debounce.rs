//! Lockout debouncer for one paddle contact.
//!
//! ## Hardware
//!
//! Active-low contact with pull-up: the pin reads `false` while the paddle
//! is closed.  The main loop samples it every tick and hands the raw level
//! to [`Debouncer::poll`].
//!
//! ## Policy
//!
//! Each poll compares the raw level against the last *confirmed* level
//! only.  A differing level is accepted once at least `window_ms` has
//! passed since the previous confirmed change; anything earlier is dropped
//! without being remembered, so contact chatter inside the window never
//! accumulates into an event.
//!
//! | raw vs confirmed | elapsed ≥ window | result                    |
//! |------------------|------------------|---------------------------|
//! | equal            | any              | `None`                    |
//! | different        | no               | `None` (settling)         |
//! | different        | yes              | confirm, emit edge        |

use crate::app::events::{ContactEvent, ContactId, Edge};

/// Default debounce window used by the bench firmware.
pub const DEFAULT_WINDOW_MS: u32 = 10;

/// Debounce state for a single contact.
#[derive(Debug, Clone)]
pub struct Debouncer {
    contact: ContactId,
    window_ms: u64,
    confirmed_level: bool,
    last_change_ms: u64,
}

impl Debouncer {
    /// Seed from a real initial read taken at `now_ms`.
    pub fn new(contact: ContactId, window_ms: u32, initial_level: bool, now_ms: u64) -> Self {
        Self {
            contact,
            window_ms: window_ms as u64,
            confirmed_level: initial_level,
            last_change_ms: now_ms,
        }
    }

    pub fn contact(&self) -> ContactId {
        self.contact
    }

    /// Last confirmed raw level (`false` = pressed).
    pub fn confirmed_level(&self) -> bool {
        self.confirmed_level
    }

    pub fn is_pressed(&self) -> bool {
        !self.confirmed_level
    }

    /// Feed one raw sample.  Returns the confirmed edge, if any.
    pub fn poll(&mut self, raw: bool, now_ms: u64) -> Option<ContactEvent> {
        if raw == self.confirmed_level {
            return None;
        }
        if now_ms.saturating_sub(self.last_change_ms) < self.window_ms {
            return None;
        }

        self.confirmed_level = raw;
        self.last_change_ms = now_ms;
        Some(ContactEvent {
            contact: self.contact,
            edge: if raw { Edge::Released } else { Edge::Pressed },
            timestamp_ms: now_ms,
        })
    }
}
