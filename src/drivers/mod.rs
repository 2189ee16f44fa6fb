pub mod actuators;
pub mod capture;
