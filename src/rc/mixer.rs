//! Раскладка логических каналов по физическим PWM выходам

use heapless::Vec;

use crate::config::rc::pulse::{MAX_PULSE_US, MIN_PULSE_US};
use crate::config::rc::SLOTS_PER_UNIT;
use crate::data::ChannelFrame;
use crate::rc::failsafe::LinkState;
use crate::rc::link::{OutputView, RcLink};

/// Аппаратный таймер, владеющий четырьмя PWM слотами
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "rp2040", derive(defmt::Format))]
pub enum TimerUnit {
    A,
    B,
    C,
}

impl TimerUnit {
    pub const COUNT: usize = 3;
    pub const ALL: [TimerUnit; Self::COUNT] = [TimerUnit::A, TimerUnit::B, TimerUnit::C];

    pub const fn index(self) -> usize {
        self as usize
    }
}

/// Физический выход: (таймер, слот)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "rp2040", derive(defmt::Format))]
pub struct PhysicalSlot {
    pub unit: TimerUnit,
    pub slot: u8,
}

impl PhysicalSlot {
    pub const fn new(unit: TimerUnit, slot: u8) -> Self {
        Self { unit, slot }
    }

    const fn same_as(&self, other: &PhysicalSlot) -> bool {
        self.unit as u8 == other.unit as u8 && self.slot == other.slot
    }
}

/// Ошибки таблицы выходов
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum MapError {
    /// Число логических каналов не совпадает с числом физических слотов
    SizeMismatch,
    /// Номер слота больше, чем слотов у таймера
    SlotOutOfRange { logical: usize },
    /// Два логических канала указывают на один слот
    DuplicateSlot { first: usize, second: usize },
}

#[cfg(feature = "rp2040")]
impl defmt::Format for MapError {
    fn format(&self, fmt: defmt::Formatter) {
        match self {
            MapError::SizeMismatch => defmt::write!(fmt, "Map: size mismatch"),
            MapError::SlotOutOfRange { logical } => {
                defmt::write!(fmt, "Map: slot out of range for channel {}", logical)
            }
            MapError::DuplicateSlot { first, second } => {
                defmt::write!(fmt, "Map: channels {} and {} share a slot", first, second)
            }
        }
    }
}

/// Назначение одного слота таймера
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct Assignment {
    pub slot: u8,
    pub logical: usize,
}

/// Неизменяемая таблица: логический канал -> физический слот.
/// Взаимно однозначна, проверяется при построении.
#[derive(Clone, Debug)]
pub struct OutputChannelMap<const N: usize> {
    table: [PhysicalSlot; N],
}

impl<const N: usize> OutputChannelMap<N> {
    pub const fn new(table: [PhysicalSlot; N]) -> Result<Self, MapError> {
        if N != TimerUnit::COUNT * SLOTS_PER_UNIT {
            return Err(MapError::SizeMismatch);
        }

        let mut i = 0;
        while i < N {
            if table[i].slot as usize >= SLOTS_PER_UNIT {
                return Err(MapError::SlotOutOfRange { logical: i });
            }
            let mut j = i + 1;
            while j < N {
                if table[i].same_as(&table[j]) {
                    return Err(MapError::DuplicateSlot { first: i, second: j });
                }
                j += 1;
            }
            i += 1;
        }

        Ok(Self { table })
    }

    /// Куда выведен логический канал
    pub fn physical(&self, logical: usize) -> Option<PhysicalSlot> {
        self.table.get(logical).copied()
    }

    /// Обратный поиск: какие логические каналы висят на слотах таймера,
    /// в порядке номеров слотов
    pub fn unit_slots(&self, unit: TimerUnit) -> Vec<Assignment, SLOTS_PER_UNIT> {
        let mut out = Vec::new();
        for slot in 0..SLOTS_PER_UNIT as u8 {
            let target = PhysicalSlot::new(unit, slot);
            if let Some(logical) = self.table.iter().position(|p| *p == target) {
                // емкость равна числу слотов, переполнение невозможно
                let _ = out.push(Assignment { slot, logical });
            }
        }
        out
    }
}

/// Приемник значений PWM одного таймера. Вызывается из прерывания:
/// реализация не должна блокироваться или выделять память.
pub trait PwmSink {
    /// Установить длительность импульса (мкс) на слоте таймера
    fn set_pulse_width(&mut self, slot: u8, pulse_us: u16);
}

/// Выбор значений для выходов и запись их в таймеры
pub struct OutputMixer<'a, const N: usize> {
    link: &'a RcLink,
    map: &'a OutputChannelMap<N>,
    defaults: &'a ChannelFrame<N>,
}

impl<'a, const N: usize> OutputMixer<'a, N> {
    pub fn new(
        link: &'a RcLink,
        map: &'a OutputChannelMap<N>,
        defaults: &'a ChannelFrame<N>,
    ) -> Self {
        Self { link, map, defaults }
    }

    /// Кадр PWM для одного таймера.
    ///
    /// Решение LIVE/FAILSAFE и запись всех слотов таймера выполняются под
    /// одной критической секцией: в пределах таймера значения никогда не
    /// смешивают живые данные и безопасные.
    pub fn on_frame<S: PwmSink>(&self, unit: TimerUnit, sink: &mut S, now: u32) -> LinkState {
        let assignments = self.map.unit_slots(unit);

        self.link.with_outputs(now, |view| {
            for a in assignments.iter() {
                sink.set_pulse_width(a.slot, self.resolve(&view, a.logical));
            }
            view.state
        })
    }

    /// Значение логического канала для текущего решения
    pub fn resolve(&self, view: &OutputView<'_>, logical: usize) -> u16 {
        // карта и значения по умолчанию построены для одного N: индекс всегда в кадре
        let fallback = self.defaults.as_array()[logical];

        match view.state {
            LinkState::Failsafe => fallback,
            LinkState::Live => match view.live.get(logical) {
                // канал вне кадра или ни разу не заполнен
                None | Some(0) => fallback,
                Some(pulse) => pulse.clamp(MIN_PULSE_US, MAX_PULSE_US),
            },
        }
    }
}
