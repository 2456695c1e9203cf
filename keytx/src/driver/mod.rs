//! Pin level drivers used by the scanner, the LED bank and the serial transmitter.

pub mod gpio;
pub mod soft_uart;
