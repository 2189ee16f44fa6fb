// src/tasks/rcin_task.rs
use embassy_time::{Duration, Ticker};

use crate::config::rc::timing::PUBLISH_PERIOD_MS;
use crate::data::{ServoMsg, CHANNELS, RC_LINK};

/// Публикация декодированного кадра наружу каждые 20 мс.
/// Публикуется сырой выход декодера, независимо от failsafe.
#[embassy_executor::task]
pub async fn task() {
    defmt::info!("Запуск задачи публикации RC входа");

    let sender = CHANNELS.rcin.sender();
    let mut ticker = Ticker::every(Duration::from_millis(PUBLISH_PERIOD_MS));

    #[cfg(feature = "debug-rc")]
    let mut dump_counter: u64 = 0;

    loop {
        ticker.next().await;

        let frame = RC_LINK.decoded();

        // Нет места в буфере - пропускаем цикл, следующий попробует снова
        if sender.try_send(ServoMsg::from(frame)).is_err() {
            defmt::trace!("Буфер rcin переполнен, кадр пропущен");
        }

        #[cfg(feature = "debug-rc")]
        {
            use crate::config::rc::timing::DEBUG_DUMP_PERIOD_MS;

            dump_counter += 1;
            if dump_counter >= DEBUG_DUMP_PERIOD_MS / PUBLISH_PERIOD_MS {
                dump_counter = 0;
                defmt::debug!(
                    "PPM {} ошибок синхронизации: {}",
                    frame.as_array(),
                    RC_LINK.framing_errors()
                );
            }
        }
    }
}
