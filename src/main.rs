//! MorseForge Firmware: Main Entry Point
//!
//! Hexagonal architecture with a fixed 1 ms polling tick.
//!
//! ```text
//! ┌────────────────────────────────────────────────────────────────┐
//! │                      Adapters (outer ring)                     │
//! │                                                                │
//! │  HardwareAdapter        BleUart          LogEventSink          │
//! │  (Sample+Indicator)     (LinkTransport)  (EventSink)           │
//! │                                                                │
//! │  ──────────────── Port Trait Boundary ───────────────────      │
//! │                                                                │
//! │  ┌────────────────────────────────────────────────────────┐    │
//! │  │            EventRouter (pure logic)                    │    │
//! │  │  Debouncer×2 · IndicatorPolicy · LinkManager           │    │
//! │  └────────────────────────────────────────────────────────┘    │
//! └────────────────────────────────────────────────────────────────┘
//! ```
#![deny(unused_must_use)]

use anyhow::Result;
use log::info;

use esp_idf_svc::hal::gpio::{AnyIOPin, PinDriver, Pull};
use esp_idf_svc::hal::peripherals::Peripherals;

use morseforge::adapters::ble_uart::BleUart;
use morseforge::adapters::hardware::HardwareAdapter;
use morseforge::adapters::log_sink::LogEventSink;
use morseforge::adapters::time::Esp32TimeAdapter;
use morseforge::app::link::LinkManager;
use morseforge::app::ports::Capability;
use morseforge::app::router::EventRouter;
use morseforge::config::PaddleConfig;
use morseforge::drivers::neopixel::NeoPixel;
use morseforge::drivers::paddle_input::PaddleInputs;
use morseforge::drivers::status_led::StatusLed;
use morseforge::error::Error;

fn main() -> Result<()> {
    // ── 1. ESP-IDF bootstrap ──────────────────────────────────
    esp_idf_svc::sys::link_patches();
    esp_idf_logger::init()?;

    // ── 2. Configuration (build-time override or defaults) ────
    let config = PaddleConfig::from_build_env();
    let peripherals = Peripherals::take()?;

    // ── 3. Paddle contacts (mandatory) ────────────────────────
    // SAFETY: validated config places both contacts on distinct GPIOs
    // not claimed by any other driver below.
    let mut dit = PinDriver::input(unsafe { AnyIOPin::new(config.dit_gpio) })
        .map_err(|_| Error::Gpio("DIT input"))?;
    dit.set_pull(Pull::Up).map_err(|_| Error::Gpio("DIT pull-up"))?;
    let mut dah = PinDriver::input(unsafe { AnyIOPin::new(config.dah_gpio) })
        .map_err(|_| Error::Gpio("DAH input"))?;
    dah.set_pull(Pull::Up).map_err(|_| Error::Gpio("DAH pull-up"))?;

    // ── 4. Optional peripherals, probed once ──────────────────
    // The pixel is unpowered until NEOPIXEL_I2C_POWER is driven high.  The
    // driver is held for the life of the loop; dropping it resets the pin.
    let _pixel_power = if config.indicator_enabled {
        let mut power = PinDriver::output(peripherals.pins.gpio20)
            .map_err(|_| Error::Gpio("pixel power"))?;
        power.set_high().map_err(|_| Error::Gpio("pixel power"))?;
        Some(power)
    } else {
        None
    };

    let pixel = if config.indicator_enabled {
        Capability::from_probe(
            "Status pixel",
            NeoPixel::new(peripherals.rmt.channel0, peripherals.pins.gpio9),
        )
    } else {
        info!("Status pixel disabled by config");
        Capability::Unsupported
    };

    let uart = if config.link_enabled {
        Capability::from_probe(
            "BLE UART",
            BleUart::init(peripherals.modem, &config.device_name),
        )
    } else {
        info!("BLE link disabled by config");
        Capability::Unsupported
    };

    // ── 5. Wire the core ──────────────────────────────────────
    let clock = Esp32TimeAdapter::new();
    let mut hw = HardwareAdapter::new(PaddleInputs::new(dit, dah), StatusLed::new(pixel));
    let mut link = LinkManager::new(uart, &config);
    let mut sink = LogEventSink::new();

    let mut router = EventRouter::new(&config, &mut hw, clock.uptime_ms());
    router.start(
        &config,
        hw.indicator_supported(),
        link.is_supported(),
        &mut hw,
        &mut sink,
    );
    link.start();

    // ── 6. Tick loop (FreeRTOS tick = 1 ms) ───────────────────
    let tick = std::time::Duration::from_millis(u64::from(config.tick_ms));
    loop {
        router.tick(clock.uptime_ms(), &mut hw, &mut link, &mut sink);
        std::thread::sleep(tick);
    }
}
