//! Конфигурация аппаратного обеспечения платы

/// Helper macro to create interrupt executors.
#[macro_export]
macro_rules! interrupt_executor {
    ($interrupt:ident, $prio:ident) => {{
        use embassy_executor::InterruptExecutor;
        use embassy_rp::interrupt;
        use embassy_rp::interrupt::{InterruptExt, Priority};

        interrupt::$interrupt.set_priority(Priority::$prio);
        static EXECUTOR: InterruptExecutor = InterruptExecutor::new();
        let spawner = EXECUTOR.start(interrupt::$interrupt);

        #[interrupt]
        #[allow(non_snake_case)]
        unsafe fn $interrupt() {
            EXECUTOR.on_interrupt()
        }

        spawner
    }};
}

/// Конфигурация пинов GPIO
pub mod pins {
    /// Вход PPM от приемника
    pub mod capture {
        /// Пин захвата импульсов
        pub const PPM_PIN: u8 = 16; // GPIO16
    }

    /// PWM выходы: каждый таймер собран из двух слайсов RP2040
    pub mod outputs {
        /// Таймер A: слайсы 2 и 3
        pub const UNIT_A_PINS: [u8; 4] = [4, 5, 6, 7];
        /// Таймер B: слайсы 4 и 5
        pub const UNIT_B_PINS: [u8; 4] = [8, 9, 10, 11];
        /// Таймер C: слайсы 0 и 1
        pub const UNIT_C_PINS: [u8; 4] = [0, 1, 2, 3];
    }

    /// Дополнительные пины
    pub mod misc {
        /// Встроенный светодиод на Pico, индикатор связи
        pub const LED_PIN: u8 = 25; // GPIO25
    }
}

/// Полярность активного импульса на входе захвата
#[derive(Debug, Clone, Copy, PartialEq, Eq, defmt::Format)]
pub enum CapturePolarity {
    ActiveHigh,
    ActiveLow,
}

/// Конфигурация захвата
pub mod capture {
    use super::CapturePolarity;

    /// Частота счетчика захвата (Гц), 1 тик = 1 мкс
    pub const CAPTURE_CLOCK_HZ: u64 = 1_000_000;

    /// Измеряется длительность высокого уровня
    pub const POLARITY: CapturePolarity = CapturePolarity::ActiveHigh;
}

/// Конфигурация PWM для выходов
pub mod pwm {
    /// Делитель системной частоты: 125MHz / 125 = 1MHz, 1 тик = 1 мкс
    pub const CLOCK_DIVIDER: u8 = 125;

    /// Период PWM сигнала в тиках (мкс)
    pub const PWM_PERIOD_US: u16 = 20_000; // 20ms = 50Hz
}
