//! End-to-end tests for the tick pipeline: mock contacts → debounce →
//! indicator + diagnostics + BLE relay.

use super::mock_hw::{MockHardware, MockLink, RecordingSink};

use morseforge::app::events::{ContactId, Edge, LinkState};
use morseforge::app::link::LinkManager;
use morseforge::app::ports::Capability;
use morseforge::app::protocol::ProtocolForm;
use morseforge::app::router::EventRouter;
use morseforge::config::PaddleConfig;
use morseforge::drivers::indicator::{
    COLOUR_DAH_ACTIVE, COLOUR_DIT_ACTIVE, COLOUR_IDLE_CONNECTED, COLOUR_IDLE_DISCONNECTED,
};

struct Harness {
    router: EventRouter,
    hw: MockHardware,
    link: LinkManager<MockLink>,
    sink: RecordingSink,
    now: u64,
}

impl Harness {
    fn with(config: PaddleConfig, transport: Capability<MockLink>, mut hw: MockHardware) -> Self {
        let mut sink = RecordingSink::new();
        let mut link = LinkManager::new(transport, &config);
        let mut router = EventRouter::new(&config, &mut hw, 0);
        router.start(&config, true, link.is_supported(), &mut hw, &mut sink);
        link.start();
        Self {
            router,
            hw,
            link,
            sink,
            now: 0,
        }
    }

    fn new(config: PaddleConfig) -> Self {
        Self::with(config, Capability::Supported(MockLink::new()), MockHardware::new())
    }

    fn connected(config: PaddleConfig) -> Self {
        let mut h = Self::new(config);
        h.mock_link().connect();
        h
    }

    fn mock_link(&mut self) -> &mut MockLink {
        self.link.transport_mut().unwrap()
    }

    /// Tick once per millisecond up to and including `until`.
    fn run_to(&mut self, until: u64) {
        while self.now < until {
            self.now += 1;
            self.router
                .tick(self.now, &mut self.hw, &mut self.link, &mut self.sink);
        }
    }

    fn sent(&self) -> &[String] {
        &self.link.transport().unwrap().sent
    }
}

fn compact() -> PaddleConfig {
    PaddleConfig {
        protocol: ProtocolForm::Compact,
        ..PaddleConfig::default()
    }
}

// ── Startup ──────────────────────────────────────────────────

#[test]
fn start_announces_and_paints_disconnected_idle() {
    let h = Harness::new(PaddleConfig::default());
    assert!(h.sink.started());
    assert_eq!(h.hw.colours, [COLOUR_IDLE_DISCONNECTED]);
    assert_eq!(h.link.transport().unwrap().advertise_calls, 1);
}

#[test]
fn first_tick_reports_advertising() {
    let mut h = Harness::new(PaddleConfig::default());
    h.run_to(1);
    assert_eq!(
        h.sink.link_changes(),
        [(LinkState::Disconnected, LinkState::Advertising)]
    );
    // Advertising shares the disconnected colour: no extra write.
    assert_eq!(h.hw.colours, [COLOUR_IDLE_DISCONNECTED]);
}

// ── Press / bounce / release through the compact protocol ───

#[test]
fn compact_press_with_bounce_then_release() {
    let mut h = Harness::connected(compact());
    h.run_to(49);
    assert_eq!(h.router.link_state(), LinkState::Connected);
    assert_eq!(h.hw.last_colour(), Some(COLOUR_IDLE_CONNECTED));

    h.hw.press(ContactId::Dit);
    h.run_to(50);
    // Bounce inside the window, then settle closed.
    h.hw.release(ContactId::Dit);
    h.run_to(54);
    h.hw.press(ContactId::Dit);
    h.run_to(79);
    assert_eq!(h.sent(), ["K1:1\n"]);
    assert_eq!(h.hw.last_colour(), Some(COLOUR_DIT_ACTIVE));

    h.hw.release(ContactId::Dit);
    h.run_to(100);

    let contacts = h.sink.contacts();
    assert_eq!(contacts.len(), 2);
    assert_eq!(contacts[0].edge, Edge::Pressed);
    assert_eq!(contacts[0].timestamp_ms, 50);
    assert_eq!(contacts[1].edge, Edge::Released);
    assert_eq!(contacts[1].timestamp_ms, 80);
    assert_eq!(h.sent(), ["K1:1\n", "K1:0\n"]);
    assert_eq!(h.hw.last_colour(), Some(COLOUR_IDLE_CONNECTED));
}

#[test]
fn verbose_is_default_form() {
    let mut h = Harness::connected(PaddleConfig::default());
    h.run_to(20);
    h.hw.press(ContactId::Dah);
    h.run_to(40);
    h.hw.release(ContactId::Dah);
    h.run_to(60);
    assert_eq!(h.sent(), ["DAH_DOWN\n", "DAH_UP\n"]);
    assert_eq!(h.sink.contact_names(), ["DAH_DOWN", "DAH_UP"]);
}

#[test]
fn release_without_link_returns_to_disconnected_colour() {
    let mut h = Harness::new(PaddleConfig::default());
    h.run_to(20);
    h.hw.press(ContactId::Dit);
    h.run_to(40);
    h.hw.release(ContactId::Dit);
    h.run_to(60);
    assert_eq!(
        h.hw.colours,
        [COLOUR_IDLE_DISCONNECTED, COLOUR_DIT_ACTIVE, COLOUR_IDLE_DISCONNECTED]
    );
}

// ── Delivery failures never disturb local behaviour ──────────

#[test]
fn not_connected_events_are_silently_dropped() {
    let mut h = Harness::new(PaddleConfig::default());
    h.run_to(20);
    h.hw.press(ContactId::Dit);
    h.run_to(40);
    h.hw.release(ContactId::Dit);
    h.run_to(60);

    assert_eq!(h.sink.contact_names(), ["DIT_DOWN", "DIT_UP"]);
    assert_eq!(h.link.transport().unwrap().write_calls, 0);
    assert!(h.sent().is_empty());
}

#[test]
fn transport_errors_do_not_stop_the_loop() {
    let mut h = Harness::connected(PaddleConfig::default());
    h.mock_link().fail_writes = true;
    for cycle in 0..5u64 {
        let base = 20 + cycle * 40;
        h.run_to(base);
        h.hw.press(ContactId::Dit);
        h.run_to(base + 20);
        h.hw.release(ContactId::Dit);
    }
    h.run_to(300);

    assert_eq!(h.sink.contacts().len(), 10);
    assert_eq!(h.link.transport().unwrap().write_calls, 10);
    assert!(h.sent().is_empty());
    assert_eq!(h.hw.last_colour(), Some(COLOUR_IDLE_CONNECTED));
}

#[test]
fn unsupported_link_runs_locally() {
    let mut h = Harness::with(
        PaddleConfig::default(),
        Capability::Unsupported,
        MockHardware::new(),
    );
    h.run_to(20);
    h.hw.press(ContactId::Dah);
    h.run_to(40);
    h.hw.release(ContactId::Dah);
    h.run_to(60);

    assert!(!h.link.is_supported());
    assert_eq!(h.router.link_state(), LinkState::Disconnected);
    assert!(h.sink.link_changes().is_empty());
    assert_eq!(h.sink.contact_names(), ["DAH_DOWN", "DAH_UP"]);
    assert_eq!(
        h.hw.colours,
        [COLOUR_IDLE_DISCONNECTED, COLOUR_DAH_ACTIVE, COLOUR_IDLE_DISCONNECTED]
    );
}

// ── Two contacts ─────────────────────────────────────────────

#[test]
fn contacts_debounce_independently() {
    let mut h = Harness::connected(compact());
    h.run_to(49);
    h.hw.press(ContactId::Dit);
    h.run_to(51);
    // DAH changes inside DIT's window and is still accepted.
    h.hw.press(ContactId::Dah);
    h.run_to(60);

    let contacts = h.sink.contacts();
    assert_eq!(contacts.len(), 2);
    assert_eq!((contacts[0].contact, contacts[0].timestamp_ms), (ContactId::Dit, 50));
    assert_eq!((contacts[1].contact, contacts[1].timestamp_ms), (ContactId::Dah, 52));
    assert!(h.router.is_pressed(ContactId::Dit));
    assert!(h.router.is_pressed(ContactId::Dah));
    assert_eq!(h.sent(), ["K1:1\n", "K2:1\n"]);
}

#[test]
fn same_tick_edges_dit_first_dah_shown() {
    let mut h = Harness::connected(PaddleConfig::default());
    h.run_to(49);
    h.hw.press(ContactId::Dit);
    h.hw.press(ContactId::Dah);
    h.run_to(50);

    assert_eq!(h.sink.contact_names(), ["DIT_DOWN", "DAH_DOWN"]);
    assert_eq!(h.sent(), ["DIT_DOWN\n", "DAH_DOWN\n"]);
    assert_eq!(h.router.indicator_colour(), COLOUR_DAH_ACTIVE);

    // Releasing DAH hands the pixel back to the still-held DIT.
    h.hw.release(ContactId::Dah);
    h.run_to(70);
    assert_eq!(h.router.indicator_colour(), COLOUR_DIT_ACTIVE);
}

#[test]
fn contact_held_at_boot_reports_only_release() {
    let mut hw = MockHardware::new();
    hw.press(ContactId::Dit);
    let mut h = Harness::with(
        PaddleConfig::default(),
        Capability::Supported(MockLink::new()),
        hw,
    );
    h.run_to(30);
    assert!(h.sink.contacts().is_empty());
    assert!(h.router.is_pressed(ContactId::Dit));

    h.hw.release(ContactId::Dit);
    h.run_to(40);
    assert_eq!(h.sink.contact_names(), ["DIT_UP"]);
}

// ── Link recovery ────────────────────────────────────────────

#[test]
fn disconnect_resumes_advertising_on_next_tick() {
    let mut h = Harness::connected(PaddleConfig::default());
    h.run_to(10);
    assert_eq!(h.hw.last_colour(), Some(COLOUR_IDLE_CONNECTED));

    h.mock_link().disconnect();
    h.run_to(11);

    assert_eq!(h.link.transport().unwrap().advertise_calls, 2);
    assert_eq!(h.router.link_state(), LinkState::Advertising);
    assert_eq!(
        h.sink.link_changes().last(),
        Some(&(LinkState::Connected, LinkState::Advertising))
    );
    assert_eq!(h.hw.last_colour(), Some(COLOUR_IDLE_DISCONNECTED));
}

#[test]
fn silent_advertising_drop_is_recovered() {
    let mut h = Harness::new(PaddleConfig::default());
    h.run_to(10);
    h.mock_link().drop_advertising();
    h.run_to(11);
    assert_eq!(h.link.transport().unwrap().advertise_calls, 2);
    assert_eq!(h.router.link_state(), LinkState::Advertising);
    // No visible transition: the link was re-armed within the tick.
    assert_eq!(h.sink.link_changes().len(), 1);
}

#[test]
fn indicator_writes_only_on_change() {
    let mut h = Harness::connected(PaddleConfig::default());
    h.run_to(500);
    assert_eq!(h.hw.colours, [COLOUR_IDLE_DISCONNECTED, COLOUR_IDLE_CONNECTED]);
    assert_eq!(h.router.tick_count(), 500);
}
