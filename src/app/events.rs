//! Domain events.
//!
//! [`ContactEvent`]s come out of the debouncers; [`AppEvent`]s are what the
//! [`EventRouter`](super::router::EventRouter) emits through the
//! [`EventSink`](super::ports::EventSink) port for diagnostics.

use crate::config::DeviceName;

use super::protocol::ProtocolForm;

/// One of the two monitored paddle contacts.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ContactId {
    Dit,
    Dah,
}

impl ContactId {
    /// Every contact, in per-tick evaluation order.
    pub const ALL: [ContactId; 2] = [ContactId::Dit, ContactId::Dah];

    /// Dense index for per-contact arrays.
    pub const fn index(self) -> usize {
        match self {
            Self::Dit => 0,
            Self::Dah => 1,
        }
    }

    pub const fn name(self) -> &'static str {
        match self {
            Self::Dit => "DIT",
            Self::Dah => "DAH",
        }
    }
}

/// Direction of a confirmed transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Edge {
    Pressed,
    Released,
}

/// A confirmed, timestamped contact transition.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct ContactEvent {
    pub contact: ContactId,
    pub edge: Edge,
    /// Monotonic milliseconds since boot at which the edge was confirmed.
    pub timestamp_ms: u64,
}

impl ContactEvent {
    /// Human-readable name used in diagnostic lines, e.g. `DIT_DOWN`.
    pub const fn name(&self) -> &'static str {
        match (self.contact, self.edge) {
            (ContactId::Dit, Edge::Pressed) => "DIT_DOWN",
            (ContactId::Dit, Edge::Released) => "DIT_UP",
            (ContactId::Dah, Edge::Pressed) => "DAH_DOWN",
            (ContactId::Dah, Edge::Released) => "DAH_UP",
        }
    }
}

/// Connection state of the wireless link.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum LinkState {
    Disconnected,
    Advertising,
    Connected,
}

/// Startup summary carried by [`AppEvent::Started`].
#[derive(Debug, Clone)]
pub struct StartupInfo {
    pub dit_gpio: i32,
    pub dah_gpio: i32,
    pub debounce_ms: u32,
    pub protocol: ProtocolForm,
    pub device_name: DeviceName,
    pub link_supported: bool,
    pub indicator_supported: bool,
}

/// Structured events emitted by the application core.
#[derive(Debug, Clone)]
pub enum AppEvent {
    /// The router is seeded and the loop is about to start.
    Started(StartupInfo),

    /// A contact transition was confirmed.
    Contact(ContactEvent),

    /// The link moved between states.
    LinkChanged { from: LinkState, to: LinkState },
}
