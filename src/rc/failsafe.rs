//! Решение LIVE/FAILSAFE по свежести входных данных

/// Состояние связи
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "rp2040", derive(defmt::Format))]
pub enum LinkState {
    /// Данные свежие, выходы повторяют вход
    Live,
    /// Данных нет дольше таймаута, на выходах безопасные значения
    Failsafe,
}

impl LinkState {
    pub fn is_live(self) -> bool {
        self == LinkState::Live
    }
}

/// Свежесть данных: `now - last_update <= timeout`.
///
/// Время - миллисекундный счетчик с переполнением, разность считается
/// по модулю 2^32, поэтому переход счетчика через ноль не меняет результат.
#[inline]
pub fn is_live(now: u32, last_update: u32, timeout: u32) -> bool {
    now.wrapping_sub(last_update) <= timeout
}

/// То же, что [`is_live`], но для отметки, которой может не быть
/// (после старта или после истечения таймаута).
#[inline]
pub fn evaluate(now: u32, last_update: Option<u32>, timeout: u32) -> LinkState {
    match last_update {
        Some(last) if is_live(now, last, timeout) => LinkState::Live,
        _ => LinkState::Failsafe,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_boundary() {
        assert!(is_live(1500, 1000, 500));
        assert!(!is_live(1501, 1000, 500));
        assert!(is_live(1000, 1000, 500));
        assert!(is_live(1000, 1000, 0));
        assert!(!is_live(1001, 1000, 0));
    }

    #[test]
    fn test_across_wraparound() {
        let last = u32::MAX - 99;
        assert!(is_live(last.wrapping_add(100), last, 100));
        assert!(is_live(50, last, 150));
        assert!(!is_live(50, last, 149));
        assert!(!is_live(1000, last, 500));
    }

    #[test]
    fn test_matches_reference_over_shifted_clock() {
        // Один и тот же сценарий, сдвинутый так, чтобы пересечь ноль
        for base in [0u32, 1_000, u32::MAX - 300, u32::MAX] {
            for elapsed in [0u32, 99, 100, 101, 250, 10_000] {
                let last = base;
                let now = base.wrapping_add(elapsed);
                assert_eq!(is_live(now, last, 100), elapsed <= 100);
            }
        }
    }

    #[test]
    fn test_evaluate_without_timestamp() {
        assert_eq!(evaluate(0, None, 500), LinkState::Failsafe);
        assert_eq!(evaluate(0, Some(0), 500), LinkState::Live);
        assert_eq!(evaluate(600, Some(0), 500), LinkState::Failsafe);
        assert!(!LinkState::Failsafe.is_live());
    }
}
