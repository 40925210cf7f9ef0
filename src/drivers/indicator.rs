//! Indicator colour policy with priority-based layer selection.
//!
//! The router feeds contact edges and link transitions in; the policy
//! answers which colour the status pixel should show right now.
//!
//! ## Priority hierarchy (highest first)
//!
//! 1. **Held contact**: the most recently pressed contact that is still down
//! 2. **Link connected**: connected-idle colour
//! 3. **Link not connected**: disconnected-idle colour
//!
//! A release therefore falls back to whatever the remaining layers say,
//! which for a single contact is always the current link colour.

use crate::app::events::{ContactEvent, ContactId, Edge, LinkState};

/// Colour requested for the indicator, each channel 0–255.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Rgb {
    pub r: u8,
    pub g: u8,
    pub b: u8,
}

impl Rgb {
    pub const OFF: Rgb = Rgb::new(0, 0, 0);

    pub const fn new(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b }
    }
}

// ── Well-known colours (bench firmware palette) ──────────────

pub const COLOUR_IDLE_DISCONNECTED: Rgb = Rgb::new(0, 0, 12); // Dim blue
pub const COLOUR_IDLE_CONNECTED: Rgb = Rgb::new(0, 10, 10); // Dim cyan
pub const COLOUR_DIT_ACTIVE: Rgb = Rgb::new(0, 20, 0); // Green
pub const COLOUR_DAH_ACTIVE: Rgb = Rgb::new(0, 0, 20); // Brighter blue

/// Colour set used by the policy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Palette {
    pub idle_disconnected: Rgb,
    pub idle_connected: Rgb,
    pub dit_active: Rgb,
    pub dah_active: Rgb,
}

impl Default for Palette {
    fn default() -> Self {
        Self {
            idle_disconnected: COLOUR_IDLE_DISCONNECTED,
            idle_connected: COLOUR_IDLE_CONNECTED,
            dit_active: COLOUR_DIT_ACTIVE,
            dah_active: COLOUR_DAH_ACTIVE,
        }
    }
}

impl Palette {
    pub fn contact(&self, contact: ContactId) -> Rgb {
        match contact {
            ContactId::Dit => self.dit_active,
            ContactId::Dah => self.dah_active,
        }
    }

    pub fn link(&self, state: LinkState) -> Rgb {
        match state {
            LinkState::Connected => self.idle_connected,
            LinkState::Disconnected | LinkState::Advertising => self.idle_disconnected,
        }
    }
}

/// Layered colour selection.  Stack-allocated, no heap.
pub struct IndicatorPolicy {
    palette: Palette,
    link: LinkState,
    /// Press timestamp per contact while held.
    held_since: [Option<u64>; 2],
}

impl IndicatorPolicy {
    pub fn new(palette: Palette) -> Self {
        Self {
            palette,
            link: LinkState::Disconnected,
            held_since: [None; 2],
        }
    }

    /// Record a link transition and return the resulting colour.
    pub fn on_link(&mut self, state: LinkState) -> Rgb {
        self.link = state;
        self.current()
    }

    /// Record a confirmed contact edge and return the resulting colour.
    pub fn on_contact(&mut self, event: &ContactEvent) -> Rgb {
        self.held_since[event.contact.index()] = match event.edge {
            Edge::Pressed => Some(event.timestamp_ms),
            Edge::Released => None,
        };
        self.current()
    }

    /// Whether any contact is currently held.
    pub fn any_held(&self) -> bool {
        self.held_since.iter().any(Option::is_some)
    }

    /// Colour for the current layer stack.
    pub fn current(&self) -> Rgb {
        self.held_contact()
            .map_or_else(|| self.palette.link(self.link), |c| self.palette.contact(c))
    }

    /// Most recently pressed held contact; on a same-millisecond tie the
    /// contact evaluated later in the tick (DAH) wins.
    fn held_contact(&self) -> Option<ContactId> {
        let mut best: Option<(ContactId, u64)> = None;
        for contact in ContactId::ALL {
            if let Some(since) = self.held_since[contact.index()] {
                if best.is_none_or(|(_, t)| since >= t) {
                    best = Some((contact, since));
                }
            }
        }
        best.map(|(c, _)| c)
    }
}
