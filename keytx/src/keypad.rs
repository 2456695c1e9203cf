//! The keypad controller.
//!
//! A scan cycle walks every row once. For each row:
//!
//! 1. the matrix reports at most one newly pressed column
//! 2. the key code at that position is dispatched: appended to the buffer, flush or clear
//! 3. a full buffer is flushed right away
//! 4. a detected key is followed by a settle hold, with the column's LED pattern shown
//! 5. the LED state from before the row is restored
//!
//! After the last row the LEDs are turned off, every row is deselected and the cycle debounce hold runs.

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::{FramingConfig, KeypadConfig, TimingConfig, as_micros_u32};
use crate::driver::soft_uart::SoftUartTx;
use crate::key_buffer::KeyBuffer;
use crate::keymap::{KeyAction, Keymap};
use crate::light::LedBank;
use crate::matrix::Matrix;

/// What happened to the key code detected in a row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum Dispatch {
    /// No key detected
    Idle,
    /// The key code is appended to the buffer
    Appended,
    /// The buffer was full, the key code is dropped
    Dropped,
    /// The flush key was pressed, the data carries the number of key codes sent
    Flushed(usize),
    /// The clear key was pressed
    Cleared,
}

/// Result of processing one row
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct RowOutcome {
    /// Key code detected in this row
    pub key: Option<u8>,
    pub dispatch: Dispatch,
    /// The buffer was full after dispatch and got flushed
    pub forced_flush: bool,
}

/// Keypad ties the matrix, the key buffer, the LEDs and the serial transmitter together.
pub struct Keypad<
    In: InputPin,
    Out: OutputPin,
    Led: OutputPin,
    Tx: OutputPin,
    D: DelayNs,
    const ROW: usize,
    const COL: usize,
> {
    matrix: Matrix<In, Out, D, ROW, COL>,
    leds: LedBank<Led, COL>,
    tx: SoftUartTx<Tx, D>,
    /// Delay for the power-up and cycle debounce holds
    delay: D,
    keymap: Keymap<ROW, COL>,
    buffer: KeyBuffer,
    led_patterns: [u8; COL],
    timing: TimingConfig,
    framing: FramingConfig,
}

impl<In: InputPin, Out: OutputPin, Led: OutputPin, Tx: OutputPin, D: DelayNs, const ROW: usize, const COL: usize>
    Keypad<In, Out, Led, Tx, D, ROW, COL>
{
    pub fn new(
        matrix: Matrix<In, Out, D, ROW, COL>,
        leds: LedBank<Led, COL>,
        tx: SoftUartTx<Tx, D>,
        delay: D,
        keymap: Keymap<ROW, COL>,
        config: KeypadConfig<COL>,
    ) -> Self {
        Self {
            matrix,
            leds,
            tx,
            delay,
            keymap,
            buffer: KeyBuffer::new(),
            led_patterns: config.light.patterns,
            timing: config.timing,
            framing: config.framing,
        }
    }

    /// Wait for the power to settle, then send the identification banner
    pub fn startup(&mut self) {
        self.delay.delay_us(as_micros_u32(self.timing.power_up));
        info!("Keypad start, sending banner");
        self.tx.transmit_all(self.framing.banner);
    }

    /// Start the keypad, never returns
    pub fn run(&mut self) -> ! {
        self.startup();
        loop {
            self.scan_cycle();
        }
    }

    /// Process every row once, then turn the LEDs off, deselect all rows and hold the cycle debounce
    pub fn scan_cycle(&mut self) {
        for row in 0..ROW {
            self.process_row(row);
        }
        self.leds.clear();
        self.matrix.deactivate_all();
        self.delay.delay_us(as_micros_u32(self.timing.cycle_debounce));
    }

    /// Scan a single row and handle the key detected in it
    pub fn process_row(&mut self, row: usize) -> RowOutcome {
        let col = self.matrix.scan_row(row);

        let saved_leds = self.leds.state();
        let key = col.and_then(|col| {
            self.leds.set(self.led_patterns[col]);
            self.keymap.get(row, col)
        });

        let dispatch = match key {
            None => Dispatch::Idle,
            Some(code) => {
                let ch = code as char;
                info!("Key {} pressed at ({}, {})", ch, row, col.unwrap_or_default());
                self.dispatch(code)
            }
        };

        let forced_flush = self.buffer.is_full();
        if forced_flush {
            debug!("Key buffer is full, flushing");
            self.flush();
        }

        if key.is_some() {
            self.tx.delay_units(self.timing.key_settle_units);
        }

        self.leds.set(saved_leds);

        RowOutcome {
            key,
            dispatch,
            forced_flush,
        }
    }

    fn dispatch(&mut self, code: u8) -> Dispatch {
        match KeyAction::from_code(code, &self.framing) {
            KeyAction::Flush => Dispatch::Flushed(self.flush()),
            KeyAction::Clear => {
                debug!("Clear {} buffered key codes", self.buffer.len());
                self.buffer.clear();
                Dispatch::Cleared
            }
            KeyAction::Data(code) => {
                if self.buffer.push(code) {
                    Dispatch::Appended
                } else {
                    Dispatch::Dropped
                }
            }
        }
    }

    /// Send the buffered key codes followed by the end marker, then empty the buffer.
    ///
    /// Returns the number of key codes sent. Nothing at all is sent when the buffer is empty.
    pub fn flush(&mut self) -> usize {
        let len = self.buffer.len();
        if len == 0 {
            return 0;
        }
        info!("Flush {} key codes", len);
        self.tx.transmit_all(self.buffer.as_slice());
        self.tx.transmit(self.framing.end_marker);
        self.buffer.clear();
        len
    }

    /// Key codes waiting to be flushed
    pub fn buffered(&self) -> &[u8] {
        self.buffer.as_slice()
    }

    pub fn leds(&self) -> &LedBank<Led, COL> {
        &self.leds
    }
}
