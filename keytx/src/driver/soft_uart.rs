//! Bit-banging serial transmitter
//!
//! This module provides a software UART transmitter using GPIO bit-banging.
//! Each byte is framed as 8N1: one start bit (low), 8 data bits LSB first, one stop bit (high).
//! The line idles high, so the stop bit of a byte also provides the gap before the next start bit.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::OutputPin;

use crate::config::SerialConfig;

/// Number of data bits per frame
pub const DATA_BITS: u8 = 8;

/// Bit-banging serial transmitter
///
/// Every line phase is held for exactly one unit interval with the given delay, nothing else runs while a byte is
/// being sent.
///
/// # Type Parameters
/// - `TX`: serial output line
/// - `D`: busy-wait delay providing the unit interval
pub struct SoftUartTx<TX, D>
where
    TX: OutputPin,
    D: DelayNs,
{
    tx: TX,
    delay: D,
    bit_period_ns: u32,
}

impl<TX, D> SoftUartTx<TX, D>
where
    TX: OutputPin,
    D: DelayNs,
{
    /// Create a new transmitter, the line is driven to idle (high)
    pub fn new(mut tx: TX, delay: D, config: SerialConfig) -> Self {
        let _ = tx.set_high();
        Self {
            tx,
            delay,
            bit_period_ns: config.bit_period_ns(),
        }
    }

    /// Duration of one unit interval in nanoseconds
    pub fn bit_period_ns(&self) -> u32 {
        self.bit_period_ns
    }

    /// Hold for `units` unit intervals without touching the line
    pub fn delay_units(&mut self, units: u32) {
        for _ in 0..units {
            self.delay.delay_ns(self.bit_period_ns);
        }
    }

    #[inline(always)]
    fn write_bit(&mut self, high: bool) {
        if high {
            let _ = self.tx.set_high();
        } else {
            let _ = self.tx.set_low();
        }
        self.delay.delay_ns(self.bit_period_ns);
    }

    /// Send one byte, blocking for 10 unit intervals
    pub fn transmit(&mut self, byte: u8) {
        // Start bit
        self.write_bit(false);

        for i in 0..DATA_BITS {
            self.write_bit((byte >> i) & 1 == 1);
        }

        // Stop bit
        self.write_bit(true);
    }

    /// Send all bytes in order
    pub fn transmit_all(&mut self, bytes: &[u8]) {
        for &byte in bytes {
            self.transmit(byte);
        }
    }
}
