use embassy_time::{Duration, Ticker};

use crate::config::rc::timing::OUTPUT_FRAME_HZ;
use crate::config::rc::{FAILSAFE_DEFAULTS, OUTPUT_MAP};
use crate::data::RC_LINK;
use crate::drivers::actuators::servo::ServoBank;
use crate::rc::mixer::{OutputMixer, TimerUnit};
use crate::tasks::now_ms;

/// Обновление PWM выходов с частотой кадра (50 Гц).
///
/// `banks` идут в порядке [`TimerUnit::ALL`]. Задача работает на
/// исполнителе прерывания и между тиками ничего не ждет.
#[embassy_executor::task]
pub async fn task(mut banks: [ServoBank; TimerUnit::COUNT]) {
    defmt::info!("Запуск задачи управления выходами");

    let mixer = OutputMixer::new(&RC_LINK, &OUTPUT_MAP, &FAILSAFE_DEFAULTS);
    let mut ticker = Ticker::every(Duration::from_hz(OUTPUT_FRAME_HZ));

    loop {
        ticker.next().await;

        // Каждый таймер решает LIVE/FAILSAFE сам, под своей критической секцией
        for (unit, bank) in TimerUnit::ALL.into_iter().zip(banks.iter_mut()) {
            mixer.on_frame(unit, bank, now_ms());
        }
    }
}
