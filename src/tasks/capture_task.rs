// src/tasks/capture_task.rs
use crate::data::RC_LINK;
use crate::drivers::capture::PulseCapture;
use crate::tasks::now_ms;

/// Захват PPM. Запускается на исполнителе прерывания с высоким приоритетом,
/// вытесняет все остальные задачи.
#[embassy_executor::task]
pub async fn task(mut capture: PulseCapture) {
    defmt::info!("Запуск задачи захвата PPM");

    loop {
        let width_us = capture.next_width_us().await;
        RC_LINK.on_edge(width_us, now_ms());
    }
}
