//! Domain layer: the keypad amount, checkout options and orders, and the port
//! through which orders are created.

pub mod amount;
pub mod options;
pub mod order;
pub mod ports;
