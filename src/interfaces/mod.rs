pub mod http;
pub mod keypad;
