//! Информация о системе и тактировании

use embassy_rp::clocks;

use crate::config::hardware::capture::CAPTURE_CLOCK_HZ;
use crate::config::hardware::pwm::CLOCK_DIVIDER;

/// Частота счетчика PWM, на которую рассчитана конфигурация (1 тик = 1 мкс)
const PWM_TICK_HZ: u32 = 1_000_000;

/// Структура с информацией о частотах системы
#[derive(Debug, Clone, Copy)]
pub struct SystemClocks {
    pub sys_freq: u32,
    pub peri_freq: u32,
    pub ref_freq: u32,
}

/// Получить текущие частоты системы
pub fn get_system_clocks() -> SystemClocks {
    SystemClocks {
        sys_freq: clocks::clk_sys_freq(),
        peri_freq: clocks::clk_peri_freq(),
        ref_freq: clocks::clk_ref_freq(),
    }
}

/// Вывести информацию о частотах в лог
pub fn print_clock_info() {
    let clocks = get_system_clocks();

    defmt::info!("=== Конфигурация тактирования ===");
    defmt::info!("Системная частота: {} МГц", clocks.sys_freq / 1_000_000);
    defmt::info!("Периферийная частота: {} МГц", clocks.peri_freq / 1_000_000);
    defmt::info!("Опорная частота: {} МГц", clocks.ref_freq / 1_000_000);
}

/// Проверить, что делитель PWM дает тик 1 мкс: длительность импульса
/// пишется в регистр сравнения без пересчета. Захват меряет ширину по
/// `embassy_time::Instant`, его тик тоже должен совпадать с расчетным.
pub fn validate_clocks() -> Result<(), &'static str> {
    let clocks = get_system_clocks();

    if clocks.sys_freq / CLOCK_DIVIDER as u32 != PWM_TICK_HZ {
        return Err("Системная частота не дает 1 МГц тик PWM");
    }

    if embassy_time::TICK_HZ != CAPTURE_CLOCK_HZ {
        return Err("Тик embassy-time не совпадает с частотой захвата");
    }

    Ok(())
}
