//! Сигнальный тракт RC платы: захват PPM, failsafe, раскладка на PWM выходы.
//!
//! Ядро (`config`, `data`, `rc`) не зависит от железа и тестируется на хосте.
//! Драйверы и задачи для RP2040 собираются с фичей `rp2040`.
#![cfg_attr(not(test), no_std)]

pub mod config;
pub mod data;
pub mod rc;

#[cfg(feature = "rp2040")]
pub mod drivers;
#[cfg(feature = "rp2040")]
pub mod tasks;
#[cfg(feature = "rp2040")]
pub mod utils;
