//! Конфигурация платы и RC тракта

#[cfg(feature = "rp2040")]
pub mod hardware;
pub mod rc;
