//! Ядро RC тракта: декодер, failsafe, раскладка выходов

pub mod decoder;
pub mod failsafe;
pub mod link;
pub mod mixer;
