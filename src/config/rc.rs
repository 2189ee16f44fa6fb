//! Параметры RC тракта: декодер, failsafe, раскладка выходов

use crate::data::ChannelFrame;
use crate::rc::mixer::{OutputChannelMap, PhysicalSlot, TimerUnit};

/// Количество каналов, которые выдает декодер (C)
pub const RC_CHANNELS: usize = 8;

/// Количество физических PWM выходов (3 таймера по 4 слота)
pub const OUTPUT_CHANNELS: usize = 12;

/// Слотов на один таймер
pub const SLOTS_PER_UNIT: usize = 4;

/// Допустимая полоса длительности импульса (мкс)
pub mod pulse {
    /// Минимальная длительность импульса канала
    pub const MIN_PULSE_US: u16 = 500;
    /// Максимальная длительность импульса канала
    pub const MAX_PULSE_US: u16 = 2500;
}

/// Периоды задач
pub mod timing {
    /// Частота обновления PWM выходов (Гц)
    pub const OUTPUT_FRAME_HZ: u64 = 50;
    /// Период публикации декодированного кадра (мс)
    pub const PUBLISH_PERIOD_MS: u64 = 20;
    /// Период супервизора failsafe (мс)
    pub const SUPERVISOR_PERIOD_MS: u64 = 100;
    /// Период отладочного вывода кадра (мс)
    pub const DEBUG_DUMP_PERIOD_MS: u64 = 500;
}

/// Источник значений для выходов в режиме LIVE
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "rp2040", derive(defmt::Format))]
pub enum OutputSource {
    /// Команды, пришедшие по каналу управления
    Commanded,
    /// Декодированный кадр приемника напрямую (стендовый режим)
    Decoded,
}

/// Профиль развертывания
#[cfg(not(feature = "ppm-loopback"))]
pub mod profile {
    use super::OutputSource;

    /// Таймаут потери связи (мс)
    pub const FAILSAFE_TIMEOUT_MS: u32 = 500;
    /// Безопасное значение для всех выходов (мкс)
    pub const FAILSAFE_PULSE_US: u16 = 1000;
    pub const OUTPUT_SOURCE: OutputSource = OutputSource::Commanded;
}

/// Профиль стенда: выходы повторяют приемник
#[cfg(feature = "ppm-loopback")]
pub mod profile {
    use super::OutputSource;

    /// Таймаут потери связи (мс)
    pub const FAILSAFE_TIMEOUT_MS: u32 = 100;
    /// Безопасное значение для всех выходов (мкс)
    pub const FAILSAFE_PULSE_US: u16 = 1500;
    pub const OUTPUT_SOURCE: OutputSource = OutputSource::Decoded;
}

pub use profile::{FAILSAFE_PULSE_US, FAILSAFE_TIMEOUT_MS, OUTPUT_SOURCE};

/// Значения выходов при потере связи
pub static FAILSAFE_DEFAULTS: ChannelFrame<OUTPUT_CHANNELS> =
    ChannelFrame::filled(FAILSAFE_PULSE_US);

/// Разводка логических каналов по таймерам.
/// Индекс - логический канал, значение - (таймер, слот).
/// Таблица повторяет физическую разводку платы.
const OUTPUT_TABLE: [PhysicalSlot; OUTPUT_CHANNELS] = [
    PhysicalSlot::new(TimerUnit::C, 0), // 0
    PhysicalSlot::new(TimerUnit::C, 1), // 1
    PhysicalSlot::new(TimerUnit::C, 2), // 2
    PhysicalSlot::new(TimerUnit::C, 3), // 3
    PhysicalSlot::new(TimerUnit::A, 3), // 4
    PhysicalSlot::new(TimerUnit::A, 2), // 5
    PhysicalSlot::new(TimerUnit::A, 0), // 6
    PhysicalSlot::new(TimerUnit::A, 1), // 7
    PhysicalSlot::new(TimerUnit::B, 0), // 8
    PhysicalSlot::new(TimerUnit::B, 1), // 9
    PhysicalSlot::new(TimerUnit::B, 2), // 10
    PhysicalSlot::new(TimerUnit::B, 3), // 11
];

/// Проверенная таблица выходов; ошибка в таблице ломает сборку
pub static OUTPUT_MAP: OutputChannelMap<OUTPUT_CHANNELS> = match OutputChannelMap::new(OUTPUT_TABLE) {
    Ok(map) => map,
    Err(_) => panic!("OUTPUT_TABLE is not a bijection"),
};
