//! Драйвер группы из четырех PWM выходов (один логический таймер)

use crate::config::hardware::pwm::{CLOCK_DIVIDER, PWM_PERIOD_US};
use crate::config::rc::pulse::{MAX_PULSE_US, MIN_PULSE_US};
use crate::config::rc::SLOTS_PER_UNIT;
use crate::rc::mixer::PwmSink;
use embassy_rp::pwm::{Config as PwmConfig, Pwm};

/// Ошибки работы с выходами
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ServoError {
    /// Слот вне диапазона таймера
    InvalidSlot,
    /// Неверная длительность импульса
    InvalidPulse,
}

impl defmt::Format for ServoError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            ServoError::InvalidSlot => defmt::write!(fmt, "Servo: Invalid slot"),
            ServoError::InvalidPulse => defmt::write!(fmt, "Servo: Invalid pulse width"),
        }
    }
}

/// Четыре выхода на двух слайсах RP2040: слоты 0,1 - каналы A,B первого
/// слайса, слоты 2,3 - каналы A,B второго.
pub struct ServoBank {
    slices: [Pwm<'static>; 2],
    configs: [PwmConfig; 2],
}

impl ServoBank {
    /// Конфигурация слайса: 1 МГц счетчик, период 20 мс, выходы выключены
    pub fn pwm_config() -> PwmConfig {
        let mut config = PwmConfig::default();
        config.divider = CLOCK_DIVIDER.into();
        config.top = PWM_PERIOD_US;
        config.compare_a = 0;
        config.compare_b = 0;
        config
    }

    /// Слайсы должны быть созданы с [`ServoBank::pwm_config`]
    pub fn new(first: Pwm<'static>, second: Pwm<'static>) -> Self {
        Self {
            slices: [first, second],
            configs: [Self::pwm_config(), Self::pwm_config()],
        }
    }

    /// Выставить на все слоты одно значение (безопасный старт)
    pub fn init(&mut self, pulse_us: u16) -> Result<(), ServoError> {
        for slot in 0..SLOTS_PER_UNIT as u8 {
            self.try_set_pulse_width(slot, pulse_us)?;
        }
        Ok(())
    }

    /// Установка длительности импульса напрямую (в микросекундах).
    /// При тике 1 мкс значение сравнения равно длительности импульса.
    pub fn try_set_pulse_width(&mut self, slot: u8, pulse_us: u16) -> Result<(), ServoError> {
        if pulse_us < MIN_PULSE_US || pulse_us > MAX_PULSE_US {
            return Err(ServoError::InvalidPulse);
        }

        let index = slot as usize / 2;
        let (pwm, config) = match (self.slices.get_mut(index), self.configs.get_mut(index)) {
            (Some(pwm), Some(config)) => (pwm, config),
            _ => return Err(ServoError::InvalidSlot),
        };

        if slot % 2 == 0 {
            config.compare_a = pulse_us;
        } else {
            config.compare_b = pulse_us;
        }
        pwm.set_config(config);

        Ok(())
    }

    /// Отключение выходов (снятие управляющего сигнала)
    pub fn disable(&mut self) {
        for (pwm, config) in self.slices.iter_mut().zip(self.configs.iter_mut()) {
            config.compare_a = 0;
            config.compare_b = 0;
            pwm.set_config(config);
        }
    }
}

impl PwmSink for ServoBank {
    fn set_pulse_width(&mut self, slot: u8, pulse_us: u16) {
        // значения уже ограничены микшером; ошибку из прерывания некуда отдать
        let _ = self.try_set_pulse_width(slot, pulse_us);
    }
}
