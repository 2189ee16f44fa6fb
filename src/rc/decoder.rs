//! Декодер PPM/PWM потока: ширина импульса -> кадр каналов

use crate::config::rc::pulse::{MAX_PULSE_US, MIN_PULSE_US};
use crate::data::ChannelFrame;

/// Результат обработки одного фронта
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum EdgeOutcome {
    /// Значение записано в канал с этим индексом
    Stored(usize),
    /// Импульс вне полосы: синхропауза или помеха, курсор сброшен
    Resync,
}

/// Декодер импульсов
///
/// Курсор указывает, куда ляжет следующее значение. Любой импульс вне
/// полосы [`MIN_PULSE_US`, `MAX_PULSE_US`] сбрасывает курсор в 0 и не
/// трогает кадр.
#[derive(Clone, Debug)]
pub struct PulseDecoder<const N: usize> {
    frame: ChannelFrame<N>,
    cursor: usize,
    framing_errors: u32,
}

impl<const N: usize> PulseDecoder<N> {
    pub const fn new() -> Self {
        Self {
            frame: ChannelFrame::zeroed(),
            cursor: 0,
            framing_errors: 0,
        }
    }

    /// Проверка попадания в полосу
    #[inline(always)]
    pub const fn in_band(width_us: u32) -> bool {
        width_us >= MIN_PULSE_US as u32 && width_us <= MAX_PULSE_US as u32
    }

    /// Обработка измеренной ширины импульса. Ошибок не возвращает.
    pub fn on_edge(&mut self, width_us: u32) -> EdgeOutcome {
        if !Self::in_band(width_us) {
            self.cursor = 0;
            self.framing_errors = self.framing_errors.wrapping_add(1);
            return EdgeOutcome::Resync;
        }

        let index = self.cursor;
        // в полосе значение гарантированно влезает в u16
        self.frame.set(index, width_us as u16);

        self.cursor += 1;
        if self.cursor >= N {
            self.cursor = 0;
        }

        EdgeOutcome::Stored(index)
    }

    /// Снимок текущего кадра
    pub fn frame(&self) -> ChannelFrame<N> {
        self.frame
    }

    pub fn frame_ref(&self) -> &ChannelFrame<N> {
        &self.frame
    }

    pub fn cursor(&self) -> usize {
        self.cursor
    }

    /// Счетчик импульсов вне полосы (для диагностики, с переполнением)
    pub fn framing_errors(&self) -> u32 {
        self.framing_errors
    }
}

impl<const N: usize> Default for PulseDecoder<N> {
    fn default() -> Self {
        Self::new()
    }
}
