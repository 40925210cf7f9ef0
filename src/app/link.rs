//! Link manager: advertising/connection lifecycle and best-effort relay.
//!
//! ```text
//!   Disconnected ──start()──▶ Advertising ──peer──▶ Connected
//!        ▲                                              │
//!        └──────────────── peer dropped ◀───────────────┘
//! ```
//!
//! ## Recovery policy
//!
//! Once [`LinkManager::start`] has been called, every [`poll_state`]
//! that observes `Disconnected` restarts advertising.  This is checked on
//! every tick, not only on the disconnect edge: some stacks stop advertising
//! without telling anyone.
//!
//! ## Error reporting
//!
//! Transport write failures while connected are returned to the caller and
//! logged at most once per `error_report_interval_ms` window.  Nothing is
//! retried or buffered.  A restart is announced once; restarts that are
//! refused, or accepted but gone by the next tick, share a second throttle.
//!
//! [`poll_state`]: LinkManager::poll_state

use core::cell::Cell;
use core::time::Duration;
use std::rc::Rc;

use burster::{FixedWindow, Limiter};
use log::{info, warn};

use crate::config::PaddleConfig;
use crate::error::{LinkError, SendError};

use super::events::LinkState;
use super::ports::{Capability, LinkTransport};

/// Transport frame: the longest protocol line plus its terminator.
const MAX_FRAME_LEN: usize = super::protocol::MAX_LINE_LEN + 1;

// ── Report throttle ──────────────────────────────────────────

/// Tick time in ms, written by [`LinkManager::poll_state`] and read by
/// every throttle built on it.
pub type TickClock = Rc<Cell<u64>>;

type TimeProvider = Box<dyn Fn() -> Duration>;

/// One report per fixed `interval_ms` window, counting what it swallowed.
pub struct ReportThrottle {
    window: FixedWindow<TimeProvider>,
    suppressed: u32,
}

impl ReportThrottle {
    /// Windows are aligned to the clock value at construction.
    pub fn new(interval_ms: u64, clock: &TickClock) -> Self {
        let clock = Rc::clone(clock);
        let now: TimeProvider = Box::new(move || Duration::from_millis(clock.get()));
        Self {
            window: FixedWindow::new_with_time_provider(1, interval_ms.max(1), now),
            suppressed: 0,
        }
    }

    /// Returns `Some(suppressed_since_last_report)` if this occurrence may
    /// be reported, `None` if it should stay silent.
    pub fn check(&mut self) -> Option<u32> {
        match self.window.try_consume_one() {
            Ok(()) => Some(core::mem::take(&mut self.suppressed)),
            Err(_) => {
                self.suppressed = self.suppressed.saturating_add(1);
                None
            }
        }
    }
}

// ── Link manager ─────────────────────────────────────────────

/// Owns the wireless link and gates outbound traffic on its state.
pub struct LinkManager<T: LinkTransport> {
    transport: Capability<T>,
    state: LinkState,
    /// Set by `start()`; enables automatic re-advertising.
    enabled: bool,
    /// Tick time recorded by the last `poll_state`.
    clock: TickClock,
    /// An accepted advertising start has not yet been seen to hold for a
    /// full tick.
    restarting: bool,
    write_errors: ReportThrottle,
    advertise_errors: ReportThrottle,
}

impl<T: LinkTransport> LinkManager<T> {
    pub fn new(transport: Capability<T>, config: &PaddleConfig) -> Self {
        let interval = u64::from(config.error_report_interval_ms);
        let clock = TickClock::default();
        Self {
            transport,
            state: LinkState::Disconnected,
            enabled: false,
            write_errors: ReportThrottle::new(interval, &clock),
            advertise_errors: ReportThrottle::new(interval, &clock),
            clock,
            restarting: false,
        }
    }

    /// Whether a transport was available at startup.
    pub fn is_supported(&self) -> bool {
        self.transport.is_supported()
    }

    /// State observed by the most recent [`poll_state`](Self::poll_state).
    pub fn state(&self) -> LinkState {
        self.state
    }

    pub fn transport(&self) -> Option<&T> {
        self.transport.get()
    }

    pub fn transport_mut(&mut self) -> Option<&mut T> {
        self.transport.get_mut()
    }

    /// Begin advertising.  No-op while advertising or connected, and in
    /// unsupported mode.
    pub fn start(&mut self) {
        if !self.transport.is_supported() {
            return;
        }
        self.enabled = true;
        if self.observe() == LinkState::Disconnected {
            self.restart_advertising();
        }
        self.state = self.observe();
    }

    /// Cheap per-tick state query.  Also records `now_ms` as the tick's
    /// time snapshot and re-arms advertising after a drop.
    pub fn poll_state(&mut self, now_ms: u64) -> LinkState {
        self.clock.set(now_ms);
        if !self.transport.is_supported() {
            return LinkState::Disconnected;
        }

        let mut observed = self.observe();
        if observed != LinkState::Disconnected {
            self.restarting = false;
        } else if self.enabled {
            self.restart_advertising();
            observed = self.observe();
        }
        self.state = observed;
        observed
    }

    /// Best-effort delivery of one line (terminator appended here).
    pub fn send(&mut self, line: &str) -> Result<(), SendError> {
        let Some(transport) = self.transport.get_mut() else {
            return Err(SendError::NotConnected);
        };
        if self.state != LinkState::Connected || !transport.is_connected() {
            return Err(SendError::NotConnected);
        }

        let result = Self::frame(line).and_then(|frame| transport.write(&frame));
        if let Err(e) = result {
            if let Some(suppressed) = self.write_errors.check() {
                warn!("LINK | send failed: {} ({} similar suppressed)", e, suppressed);
            }
            return Err(SendError::Transport(e));
        }
        Ok(())
    }

    fn frame(line: &str) -> Result<heapless::Vec<u8, MAX_FRAME_LEN>, LinkError> {
        let mut frame = heapless::Vec::new();
        frame
            .extend_from_slice(line.as_bytes())
            .map_err(|()| LinkError::LineTooLong)?;
        frame.push(b'\n').map_err(|_| LinkError::LineTooLong)?;
        Ok(frame)
    }

    fn observe(&self) -> LinkState {
        match self.transport.get() {
            Some(t) if t.is_connected() => LinkState::Connected,
            Some(t) if t.is_advertising() => LinkState::Advertising,
            _ => LinkState::Disconnected,
        }
    }

    fn restart_advertising(&mut self) {
        let Some(transport) = self.transport.get_mut() else {
            return;
        };
        match transport.start_advertising() {
            Ok(()) if !self.restarting => {
                info!("LINK | advertising");
                self.restarting = true;
            }
            Ok(()) => {
                if let Some(suppressed) = self.advertise_errors.check() {
                    warn!("LINK | advertising did not hold ({} restarts suppressed)", suppressed);
                }
            }
            Err(e) => {
                if let Some(suppressed) = self.advertise_errors.check() {
                    warn!("LINK | {} ({} retries suppressed)", e, suppressed);
                }
            }
        }
    }
}

// ── Tests ────────────────────────────────────────────────────
