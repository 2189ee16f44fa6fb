//! Захват длительности импульсов на GPIO

use embassy_rp::gpio::Input;
use embassy_time::Instant;

use crate::config::hardware::CapturePolarity;

/// Измеритель ширины активного уровня.
///
/// Ждет начала активного уровня, запоминает время и ждет его конца.
/// Разрешение - тик embassy-time (1 мкс на RP2040).
pub struct PulseCapture {
    input: Input<'static>,
    polarity: CapturePolarity,
}

impl PulseCapture {
    pub fn new(input: Input<'static>, polarity: CapturePolarity) -> Self {
        Self { input, polarity }
    }

    /// Следующий импульс, мкс. Длинные паузы приходят как большие значения
    /// и работают как синхропауза PPM.
    pub async fn next_width_us(&mut self) -> u32 {
        match self.polarity {
            CapturePolarity::ActiveHigh => {
                self.input.wait_for_rising_edge().await;
                let start = Instant::now();
                self.input.wait_for_falling_edge().await;
                Self::width_since(start)
            }
            CapturePolarity::ActiveLow => {
                self.input.wait_for_falling_edge().await;
                let start = Instant::now();
                self.input.wait_for_rising_edge().await;
                Self::width_since(start)
            }
        }
    }

    fn width_since(start: Instant) -> u32 {
        let us = start.elapsed().as_micros();
        u32::try_from(us).unwrap_or(u32::MAX)
    }
}
