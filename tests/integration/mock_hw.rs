//! Mock adapters for integration tests.
//!
//! Records every indicator write, outbound frame and emitted event so tests
//! can assert on the full history without touching real GPIO or radio.

use morseforge::app::events::{AppEvent, ContactEvent, ContactId, LinkState};
use morseforge::app::ports::{EventSink, IndicatorPort, LinkTransport, SampleSource};
use morseforge::drivers::indicator::Rgb;
use morseforge::error::LinkError;

// ── MockHardware ──────────────────────────────────────────────

/// Paddle contacts plus status pixel.  Levels are active-low.
pub struct MockHardware {
    levels: [bool; 2],
    pub colours: Vec<Rgb>,
}

#[allow(dead_code)]
impl MockHardware {
    pub fn new() -> Self {
        Self {
            levels: [true; 2],
            colours: Vec::new(),
        }
    }

    pub fn press(&mut self, contact: ContactId) {
        self.levels[contact.index()] = false;
    }

    pub fn release(&mut self, contact: ContactId) {
        self.levels[contact.index()] = true;
    }

    pub fn last_colour(&self) -> Option<Rgb> {
        self.colours.last().copied()
    }
}

impl Default for MockHardware {
    fn default() -> Self {
        Self::new()
    }
}

impl SampleSource for MockHardware {
    fn read(&mut self, contact: ContactId) -> bool {
        self.levels[contact.index()]
    }
}

impl IndicatorPort for MockHardware {
    fn set_colour(&mut self, colour: Rgb) {
        self.colours.push(colour);
    }
}

// ── MockLink ──────────────────────────────────────────────────

/// Scriptable wireless serial transport.
#[derive(Default)]
pub struct MockLink {
    connected: bool,
    advertising: bool,
    pub refuse_advertising: bool,
    pub fail_writes: bool,
    pub advertise_calls: u32,
    pub write_calls: u32,
    pub sent: Vec<String>,
}

#[allow(dead_code)]
impl MockLink {
    pub fn new() -> Self {
        Self::default()
    }

    /// A central attaches; advertising stops.
    pub fn connect(&mut self) {
        self.connected = true;
        self.advertising = false;
    }

    /// The central leaves; advertising is not resumed by the transport.
    pub fn disconnect(&mut self) {
        self.connected = false;
        self.advertising = false;
    }

    /// Advertising stops on its own.
    pub fn drop_advertising(&mut self) {
        self.advertising = false;
    }
}

impl LinkTransport for MockLink {
    fn start_advertising(&mut self) -> Result<(), LinkError> {
        self.advertise_calls += 1;
        if self.refuse_advertising {
            return Err(LinkError::AdvertiseFailed(-1));
        }
        self.advertising = true;
        Ok(())
    }

    fn is_advertising(&self) -> bool {
        self.advertising
    }

    fn is_connected(&self) -> bool {
        self.connected
    }

    fn write(&mut self, frame: &[u8]) -> Result<(), LinkError> {
        self.write_calls += 1;
        if self.fail_writes {
            return Err(LinkError::WriteFailed(-1));
        }
        self.sent.push(String::from_utf8_lossy(frame).into_owned());
        Ok(())
    }
}

// ── RecordingSink ─────────────────────────────────────────────

/// Event sink that keeps everything it was given.
#[derive(Default)]
pub struct RecordingSink {
    pub events: Vec<AppEvent>,
}

#[allow(dead_code)]
impl RecordingSink {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn contacts(&self) -> Vec<ContactEvent> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::Contact(c) => Some(*c),
                _ => None,
            })
            .collect()
    }

    pub fn contact_names(&self) -> Vec<&'static str> {
        self.contacts().iter().map(ContactEvent::name).collect()
    }

    pub fn link_changes(&self) -> Vec<(LinkState, LinkState)> {
        self.events
            .iter()
            .filter_map(|e| match e {
                AppEvent::LinkChanged { from, to } => Some((*from, *to)),
                _ => None,
            })
            .collect()
    }

    pub fn started(&self) -> bool {
        matches!(self.events.first(), Some(AppEvent::Started(_)))
    }
}

impl EventSink for RecordingSink {
    fn emit(&mut self, event: &AppEvent) {
        self.events.push(event.clone());
    }
}
