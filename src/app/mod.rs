//! Application core: pure domain logic, zero I/O.
//!
//! Debounce classification, link lifecycle, indicator policy and the line
//! protocol.  All interaction with the board happens through the **port
//! traits** in [`ports`], keeping this layer testable without hardware.

pub mod events;
pub mod link;
pub mod ports;
pub mod protocol;
pub mod router;
