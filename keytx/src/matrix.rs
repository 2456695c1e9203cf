use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{InputPin, OutputPin};

use crate::config::{MatrixConfig, TimingConfig, as_micros_u32};
use crate::driver::gpio::OutputController;

/// Matrix is the physical pcb layout of the key matrix.
///
/// Rows are driven one at a time, columns are sampled while a row is selected. The only state kept between scans
/// is the raw column sample of every row, which is what rising edges are detected against.
pub struct Matrix<In: InputPin, Out: OutputPin, D: DelayNs, const ROW: usize, const COL: usize> {
    /// Column lines, sensed
    input_pins: [In; COL],
    /// Row select lines, driven
    output_pins: [OutputController<Out>; ROW],
    /// Busy-wait delay for the row settle time
    delay: D,
    /// Last column sample of each row, bit `c` is column `c`
    snapshots: [u8; ROW],
    col_active_low: bool,
    row_settle_us: u32,
}

impl<In: InputPin, Out: OutputPin, D: DelayNs, const ROW: usize, const COL: usize> Matrix<In, Out, D, ROW, COL> {
    /// Create a matrix from input and output pins, all rows start deselected.
    pub fn new(
        input_pins: [In; COL],
        output_pins: [Out; ROW],
        delay: D,
        config: MatrixConfig,
        timing: &TimingConfig,
    ) -> Self {
        const { assert!(COL <= 8, "Matrix supports at most 8 columns") };
        let mut matrix = Matrix {
            input_pins,
            output_pins: output_pins.map(|pin| OutputController::new(pin, config.row_active_low)),
            delay,
            snapshots: [0; ROW],
            col_active_low: config.col_active_low,
            row_settle_us: as_micros_u32(timing.row_settle),
        };
        matrix.deactivate_all();
        matrix
    }

    /// Select `row`, sample the columns, and report the first column that became active since the last scan of
    /// this row.
    ///
    /// The stored sample of the row is replaced whether or not an edge is found, so a second column rising in the
    /// same sample is absorbed and never reported.
    pub fn scan_row(&mut self, row: usize) -> Option<usize> {
        if row >= ROW {
            warn!("Row {} is out of the matrix", row);
            return None;
        }

        for (out_idx, out_pin) in self.output_pins.iter_mut().enumerate() {
            out_pin.set(out_idx == row);
        }
        self.delay.delay_us(self.row_settle_us);

        let sample = self.sample_columns();
        let rising = sample & !self.snapshots[row];
        self.snapshots[row] = sample;

        if rising == 0 {
            None
        } else {
            let col = rising.trailing_zeros() as usize;
            debug!("Rising edge at row {}, col {}, sample {:b}", row, col, sample);
            Some(col)
        }
    }

    fn sample_columns(&mut self) -> u8 {
        let active_low = self.col_active_low;
        self.input_pins
            .iter_mut()
            .enumerate()
            .fold(0u8, |sample, (in_idx, in_pin)| {
                // A failed read counts as inactive
                let active = in_pin.is_high().map(|high| high != active_low).unwrap_or(false);
                if active { sample | (1 << in_idx) } else { sample }
            })
    }

    /// Return all row select lines to idle
    pub fn deactivate_all(&mut self) {
        for out_pin in self.output_pins.iter_mut() {
            out_pin.deactivate();
        }
    }

    /// Column sample stored for `row` by the last scan
    pub fn snapshot(&self, row: usize) -> Option<u8> {
        self.snapshots.get(row).copied()
    }
}
