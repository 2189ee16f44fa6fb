// src/tasks/rcout_task.rs
use crate::data::{CHANNELS, RC_LINK};
use crate::tasks::now_ms;

/// Прием команд на выходы. Каждая команда целиком заменяет командный
/// кадр и подтверждает, что связь жива.
#[embassy_executor::task]
pub async fn task() {
    defmt::info!("Запуск задачи приема команд");

    let receiver = CHANNELS.rcout.receiver();

    loop {
        let msg = receiver.receive().await;
        RC_LINK.on_command(&msg, now_ms());

        #[cfg(feature = "debug-rc")]
        defmt::debug!("Команда: {}", msg.pulse);
    }
}
