#![no_std]
#![no_main]

use embassy_executor::Spawner;
use embassy_rp::gpio::{Input, Level, Output, Pull};
use embassy_rp::pwm::Pwm;
use embassy_time::{Duration, Timer};
use {defmt_rtt as _, panic_probe as _};

use rc_servo_bridge::config::hardware::capture::POLARITY;
use rc_servo_bridge::config::hardware::pins;
use rc_servo_bridge::config::rc::{FAILSAFE_PULSE_US, FAILSAFE_TIMEOUT_MS, OUTPUT_SOURCE};
use rc_servo_bridge::drivers::actuators::servo::ServoBank;
use rc_servo_bridge::drivers::capture::PulseCapture;
use rc_servo_bridge::tasks::{actuator_task, capture_task, rcin_task, rcout_task, supervisor};
use rc_servo_bridge::utils::system_info;

/// Точка входа в программу
#[embassy_executor::main]
async fn main(spawner: Spawner) {
    // Инициализация HAL Raspberry Pi Pico
    let p = embassy_rp::init(Default::default());

    defmt::info!("=== RC мост v0.1.0 ===");
    defmt::info!("Инициализация системы...");
    system_info::print_clock_info();

    if let Err(e) = system_info::validate_clocks() {
        // Неверная частота исказит все выходы: лучше не стартовать
        defmt::error!("Ошибка конфигурации частот: {}", e);
        panic!("Invalid clock configuration");
    }

    defmt::info!(
        "Источник выходов: {}, таймаут {} мс, failsafe {} мкс",
        OUTPUT_SOURCE,
        FAILSAFE_TIMEOUT_MS,
        FAILSAFE_PULSE_US
    );

    // Светодиод - индикатор связи
    let mut led = Output::new(p.PIN_25, Level::Low);
    defmt::info!("Индикатор связи: GPIO{}", pins::misc::LED_PIN);
    for _ in 0..3 {
        led.set_high();
        Timer::after(Duration::from_millis(100)).await;
        led.set_low();
        Timer::after(Duration::from_millis(100)).await;
    }

    // Инициализация PWM выходов: таймер = два слайса по два канала
    let banks = {
        let cfg = ServoBank::pwm_config();

        let unit_a = ServoBank::new(
            Pwm::new_output_ab(p.PWM_SLICE2, p.PIN_4, p.PIN_5, cfg.clone()),
            Pwm::new_output_ab(p.PWM_SLICE3, p.PIN_6, p.PIN_7, cfg.clone()),
        );
        let unit_b = ServoBank::new(
            Pwm::new_output_ab(p.PWM_SLICE4, p.PIN_8, p.PIN_9, cfg.clone()),
            Pwm::new_output_ab(p.PWM_SLICE5, p.PIN_10, p.PIN_11, cfg.clone()),
        );
        let unit_c = ServoBank::new(
            Pwm::new_output_ab(p.PWM_SLICE0, p.PIN_0, p.PIN_1, cfg.clone()),
            Pwm::new_output_ab(p.PWM_SLICE1, p.PIN_2, p.PIN_3, cfg),
        );

        // порядок как в TimerUnit::ALL
        let mut banks = [unit_a, unit_b, unit_c];
        for bank in banks.iter_mut() {
            if let Err(e) = bank.init(FAILSAFE_PULSE_US) {
                defmt::error!("Ошибка инициализации выходов: {}", e);
                bank.disable();
            }
        }
        banks
    };
    defmt::info!(
        "PWM выходы: A={} B={} C={}",
        pins::outputs::UNIT_A_PINS,
        pins::outputs::UNIT_B_PINS,
        pins::outputs::UNIT_C_PINS
    );

    // Вход PPM
    let capture = PulseCapture::new(Input::new(p.PIN_16, Pull::Down), POLARITY);
    defmt::info!("PPM вход: GPIO{}", pins::capture::PPM_PIN);

    defmt::info!("Запуск задач...");

    // Захват фронтов - самый высокий приоритет: вытесняет обновление выходов
    let capture_spawner = rc_servo_bridge::interrupt_executor!(SWI_IRQ_0, P0);
    capture_spawner.spawn(capture_task::task(capture)).unwrap();

    // Выходы - свой исполнитель ниже захвата, но выше фоновых задач
    let output_spawner = rc_servo_bridge::interrupt_executor!(SWI_IRQ_1, P1);
    output_spawner.spawn(actuator_task::task(banks)).unwrap();

    // Обмен с внешним транспортом
    spawner.spawn(rcin_task::task()).unwrap();
    spawner.spawn(rcout_task::task()).unwrap();

    defmt::info!("Система инициализирована. Старт в режиме FAILSAFE");

    // Основной цикл: проверка связи и индикатор
    supervisor::run(led).await
}
