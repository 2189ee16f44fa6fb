//! Периодическая проверка связи и индикатор состояния

use core::sync::atomic::Ordering;
use embassy_rp::gpio::Output;
use embassy_time::{Duration, Ticker};

use crate::config::rc::timing::SUPERVISOR_PERIOD_MS;
use crate::data::{LINK_LIVE, RC_LINK};
use crate::rc::failsafe::LinkState;
use crate::tasks::now_ms;

/// Цикл супервизора. Внутри решения не ждет, спит только между итерациями.
pub async fn run(mut led: Output<'static>) -> ! {
    let mut previous = LinkState::Failsafe;
    let mut ticker = Ticker::every(Duration::from_millis(SUPERVISOR_PERIOD_MS));

    loop {
        let state = RC_LINK.evaluate(now_ms());
        LINK_LIVE.store(state.is_live(), Ordering::Relaxed);

        match (previous, state) {
            (LinkState::Failsafe, LinkState::Live) => {
                defmt::info!("Связь восстановлена");
            }
            (LinkState::Live, LinkState::Failsafe) => {
                defmt::warn!("Потеря связи! Выходы переведены в безопасные значения");
            }
            _ => {}
        }
        previous = state;

        if state.is_live() {
            led.set_high();
        } else {
            led.set_low();
        }

        ticker.next().await;
    }
}
