use embassy_time::Instant;

pub mod actuator_task;
pub mod capture_task;
pub mod rcin_task;
pub mod rcout_task;
pub mod supervisor;

/// Миллисекунды монотонных часов, усеченные до u32 (с переполнением)
#[inline]
pub fn now_ms() -> u32 {
    Instant::now().as_millis() as u32
}
