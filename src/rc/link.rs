//! Общее состояние RC тракта между прерыванием захвата, задачами и таймерами PWM

use core::cell::RefCell;
use embassy_sync::blocking_mutex::raw::CriticalSectionRawMutex;
use embassy_sync::blocking_mutex::Mutex;

use crate::config::rc::{OutputSource, RC_CHANNELS};
use crate::data::{ChannelFrame, ServoMsg};
use crate::rc::decoder::{EdgeOutcome, PulseDecoder};
use crate::rc::failsafe::{self, LinkState};

/// Возраст отметки больше половины круга счетчика означает, что отметка
/// новее `now`
const FUTURE_AGE_MS: u32 = u32::MAX / 2;

/// Неизменяемые параметры связи
#[derive(Clone, Copy, Debug)]
pub struct LinkConfig {
    /// Таймаут потери входных данных (мс)
    pub timeout_ms: u32,
    /// Что выводить на выходы в режиме LIVE
    pub source: OutputSource,
}

struct LinkInner {
    decoder: PulseDecoder<RC_CHANNELS>,
    commanded: ChannelFrame<RC_CHANNELS>,
    /// Последний принятый фронт или команда; `None` после старта и после таймаута
    last_update: Option<u32>,
}

/// Снимок для выходов, действителен только внутри критической секции
pub struct OutputView<'a> {
    pub state: LinkState,
    pub live: &'a ChannelFrame<RC_CHANNELS>,
}

/// Контекст RC тракта.
///
/// Все обращения идут через короткую критическую секцию, поэтому методы
/// можно вызывать и из прерывания, и из задач. Ничего не блокирует.
/// Начальное состояние: FAILSAFE, кадры из нулей.
pub struct RcLink {
    config: LinkConfig,
    inner: Mutex<CriticalSectionRawMutex, RefCell<LinkInner>>,
}

impl RcLink {
    pub const fn new(config: LinkConfig) -> Self {
        Self {
            config,
            inner: Mutex::new(RefCell::new(LinkInner {
                decoder: PulseDecoder::new(),
                commanded: ChannelFrame::zeroed(),
                last_update: None,
            })),
        }
    }

    /// Измеренный импульс от захвата. Любой фронт, даже синхропауза,
    /// обновляет отметку времени.
    pub fn on_edge(&self, width_us: u32, now: u32) -> EdgeOutcome {
        self.inner.lock(|cell| {
            let mut inner = cell.borrow_mut();
            inner.last_update = Some(now);
            inner.decoder.on_edge(width_us)
        })
    }

    /// Входящая команда: перезаписывает командный кадр целиком
    pub fn on_command(&self, msg: &ServoMsg, now: u32) {
        self.inner.lock(|cell| {
            let mut inner = cell.borrow_mut();
            inner.commanded = msg.frame();
            inner.last_update = Some(now);
        })
    }

    /// Решение LIVE/FAILSAFE на момент `now`.
    /// Устаревшая отметка сбрасывается, чтобы переполнение счетчика
    /// не оживило старые данные.
    pub fn evaluate(&self, now: u32) -> LinkState {
        self.inner.lock(|cell| Self::decide(&mut cell.borrow_mut(), now, self.config.timeout_ms))
    }

    /// Решение и доступ к активному кадру под одной критической секцией
    pub fn with_outputs<R>(&self, now: u32, f: impl FnOnce(OutputView<'_>) -> R) -> R {
        self.inner.lock(|cell| {
            let mut inner = cell.borrow_mut();
            let state = Self::decide(&mut inner, now, self.config.timeout_ms);
            let live = match self.config.source {
                OutputSource::Commanded => &inner.commanded,
                OutputSource::Decoded => inner.decoder.frame_ref(),
            };
            f(OutputView { state, live })
        })
    }

    /// Снимок декодированного кадра (для публикации наружу)
    pub fn decoded(&self) -> ChannelFrame<RC_CHANNELS> {
        self.inner.lock(|cell| cell.borrow().decoder.frame())
    }

    /// Снимок командного кадра
    pub fn commanded(&self) -> ChannelFrame<RC_CHANNELS> {
        self.inner.lock(|cell| cell.borrow().commanded)
    }

    pub fn framing_errors(&self) -> u32 {
        self.inner.lock(|cell| cell.borrow().decoder.framing_errors())
    }

    fn decide(inner: &mut LinkInner, now: u32, timeout: u32) -> LinkState {
        // Отметка могла лечь после чтения часов вызывающим (его вытеснил
        // захват): возраст "из будущего" считается нулевым
        if let Some(last) = inner.last_update {
            if now.wrapping_sub(last) > FUTURE_AGE_MS {
                return LinkState::Live;
            }
        }

        let state = failsafe::evaluate(now, inner.last_update, timeout);
        if state == LinkState::Failsafe {
            inner.last_update = None;
        }
        state
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn link(source: OutputSource) -> RcLink {
        RcLink::new(LinkConfig { timeout_ms: 100, source })
    }

    #[test]
    fn test_starts_in_failsafe() {
        let link = link(OutputSource::Commanded);
        assert_eq!(link.evaluate(0), LinkState::Failsafe);
        assert_eq!(link.decoded(), ChannelFrame::zeroed());
        assert_eq!(link.commanded(), ChannelFrame::zeroed());
    }

    #[test]
    fn test_sync_pulse_refreshes_liveness() {
        let link = link(OutputSource::Decoded);
        for w in [1000, 1100, 1200] {
            link.on_edge(w, 10);
        }
        assert_eq!(link.on_edge(3000, 500), EdgeOutcome::Resync);

        assert_eq!(link.evaluate(550), LinkState::Live);
        let frame = link.decoded();
        assert_eq!(&frame.as_array()[..3], &[1000, 1100, 1200]);
        assert_eq!(link.framing_errors(), 1);
        // следующий импульс ляжет в канал 0
        assert_eq!(link.on_edge(1900, 560), EdgeOutcome::Stored(0));
    }

    #[test]
    fn test_command_overwrites_and_refreshes() {
        let link = link(OutputSource::Commanded);
        let msg = ServoMsg { pulse: [1500; RC_CHANNELS] };
        link.on_command(&msg, 1_000);

        assert_eq!(link.commanded(), ChannelFrame::filled(1500));
        assert_eq!(link.evaluate(1_100), LinkState::Live);
        assert_eq!(link.evaluate(1_101), LinkState::Failsafe);
        // отметка сброшена: обратный ход времени не возвращает LIVE
        assert_eq!(link.evaluate(1_050), LinkState::Failsafe);
    }

    #[test]
    fn test_live_across_clock_rollover() {
        let link = link(OutputSource::Decoded);
        link.on_edge(1500, u32::MAX - 20);
        assert_eq!(link.evaluate(30), LinkState::Live);
        assert_eq!(link.evaluate((u32::MAX - 20).wrapping_add(100)), LinkState::Live);
        assert_eq!(link.evaluate(200), LinkState::Failsafe);
    }

    #[test]
    fn test_edge_recorded_after_clock_read_stays_live() {
        let link = link(OutputSource::Decoded);
        // захват вытеснил супервизор между чтением часов и блокировкой
        link.on_edge(1500, 1_001);
        assert_eq!(link.evaluate(1_000), LinkState::Live);
        // отметка не сброшена
        assert_eq!(link.evaluate(1_002), LinkState::Live);
        assert_eq!(link.evaluate(1_101), LinkState::Live);
        assert_eq!(link.evaluate(1_102), LinkState::Failsafe);
    }

    #[test]
    fn test_edge_ahead_of_clock_across_rollover() {
        let link = link(OutputSource::Commanded);
        link.on_command(&ServoMsg { pulse: [1500; RC_CHANNELS] }, 2);
        assert_eq!(link.evaluate(u32::MAX - 1), LinkState::Live);
        link.with_outputs(u32::MAX, |view| {
            assert_eq!(view.state, LinkState::Live);
            assert_eq!(view.live.get(0), Some(1500));
        });
        assert_eq!(link.evaluate(50), LinkState::Live);
    }

    #[test]
    fn test_view_follows_source() {
        let link = link(OutputSource::Commanded);
        link.on_edge(1234, 0);
        link.with_outputs(1, |view| {
            assert_eq!(view.state, LinkState::Live);
            assert_eq!(view.live.get(0), Some(0));
        });

        let link = RcLink::new(LinkConfig { timeout_ms: 100, source: OutputSource::Decoded });
        link.on_edge(1234, 0);
        link.with_outputs(1, |view| assert_eq!(view.live.get(0), Some(1234)));
    }
}
