//! Event router, the per-tick orchestrator.
//!
//! [`EventRouter`] owns both debouncers and the indicator policy.  The
//! board-facing pieces are injected at each [`tick`](EventRouter::tick):
//!
//! ```text
//!  SampleSource ──▶ ┌──────────────────────────┐ ──▶ EventSink
//!                   │       EventRouter        │
//! IndicatorPort ◀── │ Debouncer×2 · Indicator  │ ──▶ LinkManager
//!                   └──────────────────────────┘
//! ```
//!
//! One tick, in order: poll the link, sample and debounce DIT then DAH,
//! react to each confirmed edge (indicator, diagnostics, relay).

use crate::config::PaddleConfig;
use crate::drivers::debounce::Debouncer;
use crate::drivers::indicator::{IndicatorPolicy, Palette, Rgb};

use super::events::{AppEvent, ContactEvent, ContactId, LinkState, StartupInfo};
use super::link::LinkManager;
use super::ports::{EventSink, IndicatorPort, LinkTransport, SampleSource};
use super::protocol::ProtocolForm;

/// Orchestrates debounce, indicator and relay once per tick.
pub struct EventRouter {
    debouncers: [Debouncer; 2],
    policy: IndicatorPolicy,
    protocol: ProtocolForm,
    last_link: LinkState,
    /// Colour most recently written to the indicator.
    shown: Option<Rgb>,
    tick_count: u64,
}

impl EventRouter {
    /// Seed both debouncers from an initial read at `now_ms`.
    pub fn new(config: &PaddleConfig, hw: &mut impl SampleSource, now_ms: u64) -> Self {
        let debouncers = ContactId::ALL
            .map(|contact| Debouncer::new(contact, config.debounce_ms, hw.read(contact), now_ms));

        Self {
            debouncers,
            policy: IndicatorPolicy::new(Palette::default()),
            protocol: config.protocol,
            last_link: LinkState::Disconnected,
            shown: None,
            tick_count: 0,
        }
    }

    /// Paint the initial colour and announce the configuration.
    pub fn start(
        &mut self,
        config: &PaddleConfig,
        indicator_supported: bool,
        link_supported: bool,
        hw: &mut impl IndicatorPort,
        sink: &mut impl EventSink,
    ) {
        sink.emit(&AppEvent::Started(StartupInfo {
            dit_gpio: config.dit_gpio,
            dah_gpio: config.dah_gpio,
            debounce_ms: config.debounce_ms,
            protocol: config.protocol,
            device_name: config.device_name.clone(),
            link_supported,
            indicator_supported,
        }));
        let colour = self.policy.current();
        self.show(colour, hw);
    }

    /// Run one tick at time `now_ms`.
    ///
    /// The `hw` parameter satisfies **both** [`SampleSource`] and
    /// [`IndicatorPort`]. This avoids a double mutable borrow while
    /// keeping the port boundary explicit.
    pub fn tick<T: LinkTransport>(
        &mut self,
        now_ms: u64,
        hw: &mut (impl SampleSource + IndicatorPort),
        link: &mut LinkManager<T>,
        sink: &mut impl EventSink,
    ) {
        self.tick_count += 1;

        // 1. Link state
        let link_state = link.poll_state(now_ms);
        if link_state != self.last_link {
            sink.emit(&AppEvent::LinkChanged {
                from: self.last_link,
                to: link_state,
            });
            self.last_link = link_state;
            let colour = self.policy.on_link(link_state);
            self.show(colour, hw);
        }

        // 2. Sample + debounce, DIT before DAH
        let mut events: [Option<ContactEvent>; 2] = [None; 2];
        for (slot, debouncer) in events.iter_mut().zip(self.debouncers.iter_mut()) {
            let raw = hw.read(debouncer.contact());
            *slot = debouncer.poll(raw, now_ms);
        }

        // 3. React to each confirmed edge
        for event in events.into_iter().flatten() {
            self.dispatch(&event, hw, link, sink);
        }
    }

    fn dispatch<T: LinkTransport>(
        &mut self,
        event: &ContactEvent,
        hw: &mut impl IndicatorPort,
        link: &mut LinkManager<T>,
        sink: &mut impl EventSink,
    ) {
        sink.emit(&AppEvent::Contact(*event));

        let colour = self.policy.on_contact(event);
        self.show(colour, hw);

        let line = self.protocol.encode(event);
        // NotConnected is the normal case; transport failures are reported
        // (rate-limited) by the link.  The event is dropped either way.
        let _ = link.send(&line);
    }

    fn show(&mut self, colour: Rgb, hw: &mut impl IndicatorPort) {
        if self.shown != Some(colour) {
            hw.set_colour(colour);
            self.shown = Some(colour);
        }
    }

    // ── Queries ───────────────────────────────────────────────

    /// Colour currently requested from the indicator.
    pub fn indicator_colour(&self) -> Rgb {
        self.policy.current()
    }

    /// Whether `contact` is confirmed pressed.
    pub fn is_pressed(&self, contact: ContactId) -> bool {
        self.debouncers[contact.index()].is_pressed()
    }

    /// Link state seen on the last tick.
    pub fn link_state(&self) -> LinkState {
        self.last_link
    }

    /// Total ticks executed since startup.
    pub fn tick_count(&self) -> u64 {
        self.tick_count
    }
}
