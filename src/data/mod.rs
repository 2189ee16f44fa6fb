// src/data/mod.rs
use core::sync::atomic::AtomicBool;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::channel::Channel;

use crate::config::rc::{FAILSAFE_TIMEOUT_MS, OUTPUT_SOURCE, RC_CHANNELS};
use crate::rc::link::{LinkConfig, RcLink};

/// Размеры буферов каналов
const RCIN_CHANNEL_SIZE: usize = 4;
const RCOUT_CHANNEL_SIZE: usize = 5;

/// Кадр RC: длительности импульсов по каналам (мкс)
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub struct ChannelFrame<const N: usize> {
    pulse: [u16; N],
}

impl<const N: usize> ChannelFrame<N> {
    /// Кадр из нулей (состояние после старта)
    pub const fn zeroed() -> Self {
        Self { pulse: [0; N] }
    }

    /// Кадр с одинаковым значением во всех каналах
    pub const fn filled(pulse_us: u16) -> Self {
        Self { pulse: [pulse_us; N] }
    }

    pub const fn from_array(pulse: [u16; N]) -> Self {
        Self { pulse }
    }

    /// Количество каналов
    pub const fn len(&self) -> usize {
        N
    }

    pub const fn is_empty(&self) -> bool {
        N == 0
    }

    /// Значение канала, `None` за пределами кадра
    pub fn get(&self, index: usize) -> Option<u16> {
        self.pulse.get(index).copied()
    }

    /// Запись значения канала; индексы за пределами кадра игнорируются
    pub fn set(&mut self, index: usize, pulse_us: u16) {
        if let Some(slot) = self.pulse.get_mut(index) {
            *slot = pulse_us;
        }
    }

    pub fn as_array(&self) -> &[u16; N] {
        &self.pulse
    }
}

impl<const N: usize> Default for ChannelFrame<N> {
    fn default() -> Self {
        Self::zeroed()
    }
}

/// Сообщение с кадром каналов: входящие команды и исходящий декодированный кадр
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "rp2040", derive(defmt::Format))]
pub struct ServoMsg {
    pub pulse: [u16; RC_CHANNELS],
}

impl ServoMsg {
    pub fn frame(&self) -> ChannelFrame<RC_CHANNELS> {
        ChannelFrame::from_array(self.pulse)
    }
}

impl From<ChannelFrame<RC_CHANNELS>> for ServoMsg {
    fn from(frame: ChannelFrame<RC_CHANNELS>) -> Self {
        Self { pulse: *frame.as_array() }
    }
}

/// Каналы для обмена с внешним транспортом
pub struct DataChannels {
    /// Декодированные кадры приемника наружу
    pub rcin: Channel<CriticalSectionRawMutex, ServoMsg, RCIN_CHANNEL_SIZE>,
    /// Команды на выходы снаружи
    pub rcout: Channel<CriticalSectionRawMutex, ServoMsg, RCOUT_CHANNEL_SIZE>,
}

impl DataChannels {
    pub const fn new() -> Self {
        Self {
            rcin: Channel::new(),
            rcout: Channel::new(),
        }
    }
}

impl Default for DataChannels {
    fn default() -> Self {
        Self::new()
    }
}

// Статические экземпляры для глобального доступа
pub static CHANNELS: DataChannels = DataChannels::new();
pub static RC_LINK: RcLink = RcLink::new(LinkConfig {
    timeout_ms: FAILSAFE_TIMEOUT_MS,
    source: OUTPUT_SOURCE,
});

/// Индикатор связи для внешнего светодиода/статуса. Обновляет супервизор.
pub static LINK_LIVE: AtomicBool = AtomicBool::new(false);

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_frame_set_out_of_range_is_ignored() {
        let mut frame = ChannelFrame::<4>::filled(1500);
        frame.set(2, 1100);
        frame.set(4, 1900);
        assert_eq!(*frame.as_array(), [1500, 1500, 1100, 1500]);
        assert_eq!(frame.get(4), None);
        assert_eq!(frame.len(), 4);
    }

    #[test]
    fn test_servo_msg_round_trip_through_frame() {
        let frame = ChannelFrame::from_array([1000, 1100, 1200, 1300, 1400, 1500, 1600, 1700]);
        let msg = ServoMsg::from(frame);
        assert_eq!(msg.pulse[7], 1700);
        assert_eq!(msg.frame(), frame);
    }

    #[test]
    fn test_publish_is_best_effort() {
        let channels = DataChannels::new();
        let sender = channels.rcin.sender();
        let msg = ServoMsg { pulse: [1500; RC_CHANNELS] };

        for _ in 0..RCIN_CHANNEL_SIZE {
            assert!(sender.try_send(msg).is_ok());
        }
        // буфер полон: кадр отбрасывается, ничего не блокируется
        assert!(sender.try_send(msg).is_err());

        assert_eq!(channels.rcin.try_receive().ok(), Some(msg));
        assert!(sender.try_send(msg).is_ok());
    }

    #[test]
    fn test_static_link_boots_in_failsafe() {
        use crate::rc::failsafe::LinkState;
        assert_eq!(RC_LINK.evaluate(0), LinkState::Failsafe);
        assert!(!LINK_LIVE.load(core::sync::atomic::Ordering::Relaxed));
    }
}
