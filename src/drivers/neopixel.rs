//! Single WS2812 ("NeoPixel") status pixel.
//!
//! ## Dual-target design
//!
//! On ESP-IDF: RMT channel 0 clocks out 24 bits per frame, GRB order,
//! MSB first.  One frame is ~30 µs, well inside a 1 ms tick.
//! On host/test: records frames in-memory only.

use crate::drivers::indicator::Rgb;

/// WS2812 wire order is green, red, blue.
pub const fn grb_frame(colour: Rgb) -> [u8; 3] {
    [colour.g, colour.r, colour.b]
}

/// Bits of `frame` in transmission order.
pub fn frame_bits(frame: [u8; 3]) -> impl Iterator<Item = bool> {
    frame
        .into_iter()
        .flat_map(|byte| (0..8).rev().map(move |bit| byte & (1 << bit) != 0))
}

// ── ESP-IDF (RMT) ────────────────────────────────────────────

#[cfg(target_os = "espidf")]
mod platform {
    use core::time::Duration;

    use esp_idf_svc::hal::gpio::OutputPin;
    use esp_idf_svc::hal::peripheral::Peripheral;
    use esp_idf_svc::hal::rmt::config::TransmitConfig;
    use esp_idf_svc::hal::rmt::{FixedLengthSignal, PinState, Pulse, RmtChannel, TxRmtDriver};
    use esp_idf_svc::sys::EspError;

    use super::{frame_bits, grb_frame};
    use crate::drivers::indicator::Rgb;
    use crate::error::{Error, IndicatorError};

    // WS2812 bit timings (ns): T0H, T0L, T1H, T1L
    const T0H_NS: u64 = 350;
    const T0L_NS: u64 = 800;
    const T1H_NS: u64 = 700;
    const T1L_NS: u64 = 600;

    pub struct NeoPixel {
        tx: TxRmtDriver<'static>,
        zero: (Pulse, Pulse),
        one: (Pulse, Pulse),
    }

    impl NeoPixel {
        pub fn new<C: RmtChannel>(
            channel: impl Peripheral<P = C> + 'static,
            pin: impl Peripheral<P = impl OutputPin> + 'static,
        ) -> Result<Self, Error> {
            let config = TransmitConfig::new().clock_divider(1);
            let tx = TxRmtDriver::new(channel, pin, &config)
                .map_err(|_| Error::IndicatorUnavailable("RMT driver init failed"))?;
            let (zero, one) = Self::pulses(&tx)
                .map_err(|_| Error::IndicatorUnavailable("RMT clock query failed"))?;
            log::info!("pixel: RMT driver ready");
            Ok(Self { tx, zero, one })
        }

        fn pulses(tx: &TxRmtDriver<'static>) -> Result<((Pulse, Pulse), (Pulse, Pulse)), EspError> {
            let hz = tx.counter_clock()?;
            let pulse = |state, ns| Pulse::new_with_duration(hz, state, &Duration::from_nanos(ns));
            Ok((
                (pulse(PinState::High, T0H_NS)?, pulse(PinState::Low, T0L_NS)?),
                (pulse(PinState::High, T1H_NS)?, pulse(PinState::Low, T1L_NS)?),
            ))
        }

        pub fn write(&mut self, colour: Rgb) -> Result<(), IndicatorError> {
            let fail = |e: EspError| IndicatorError::WriteFailed(e.code());
            let mut signal = FixedLengthSignal::<24>::new();
            for (i, bit) in frame_bits(grb_frame(colour)).enumerate() {
                let pair = if bit { &self.one } else { &self.zero };
                signal.set(i, pair).map_err(fail)?;
            }
            self.tx.start_blocking(&signal).map_err(fail)
        }
    }
}

// ── Host simulation ──────────────────────────────────────────

#[cfg(not(target_os = "espidf"))]
mod platform {
    use super::grb_frame;
    use crate::drivers::indicator::Rgb;
    use crate::error::IndicatorError;

    #[derive(Debug, Default)]
    pub struct NeoPixel {
        frames: u32,
        last_frame: Option<[u8; 3]>,
    }

    impl NeoPixel {
        pub fn sim() -> Self {
            Self::default()
        }

        pub fn write(&mut self, colour: Rgb) -> Result<(), IndicatorError> {
            self.frames += 1;
            self.last_frame = Some(grb_frame(colour));
            Ok(())
        }

        /// Frames written so far.
        pub fn sim_frames(&self) -> u32 {
            self.frames
        }

        /// Bytes of the last frame as they would go on the wire.
        pub fn sim_last_frame(&self) -> Option<[u8; 3]> {
            self.last_frame
        }
    }
}

pub use platform::NeoPixel;
