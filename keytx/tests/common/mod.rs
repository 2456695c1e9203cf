//! Fake board for keypad tests.
//!
//! Every pin and delay shares one `Board`: row pins select rows, column pins read the switches of the selected
//! row, and every line write or delay is appended to a single timeline, so the serial output and its timing can be
//! checked after a run.
#![allow(dead_code)]

use std::cell::RefCell;
use std::convert::Infallible;
use std::rc::Rc;

use embedded_hal::delay::DelayNs;
use embedded_hal::digital::{ErrorType, InputPin, OutputPin};
use keytx::config::KeypadConfig;
use keytx::{DEFAULT_KEYMAP, Keypad, LedBank, Matrix, SoftUartTx};

pub const ROW: usize = 5;
pub const COL: usize = 4;

// Init logger for tests
#[ctor::ctor]
pub fn init_log() {
    let _ = env_logger::builder()
        .filter_level(log::LevelFilter::Debug)
        .is_test(true)
        .try_init();
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Line {
    Row(usize),
    Led(usize),
    Tx,
}

#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum Op {
    Write { line: Line, high: bool },
    Delay { ns: u64 },
}

pub struct BoardState {
    /// Output level of each row select line
    pub rows: [bool; ROW],
    /// Output level of each LED line
    pub leds: [bool; COL],
    /// Closed switches
    pub switches: [[bool; COL]; ROW],
    pub timeline: Vec<Op>,
}

#[derive(Clone)]
pub struct Board(pub Rc<RefCell<BoardState>>);

impl Board {
    pub fn new() -> Self {
        Self(Rc::new(RefCell::new(BoardState {
            rows: [true; ROW],
            leds: [true; COL],
            switches: [[false; COL]; ROW],
            timeline: Vec::new(),
        })))
    }

    pub fn press(&self, row: usize, col: usize) {
        self.0.borrow_mut().switches[row][col] = true;
    }

    pub fn release(&self, row: usize, col: usize) {
        self.0.borrow_mut().switches[row][col] = false;
    }

    pub fn release_all(&self) {
        self.0.borrow_mut().switches = [[false; COL]; ROW];
    }

    pub fn timeline(&self) -> Vec<Op> {
        self.0.borrow().timeline.clone()
    }

    pub fn clear_timeline(&self) {
        self.0.borrow_mut().timeline.clear();
    }

    pub fn rows(&self) -> [bool; ROW] {
        self.0.borrow().rows
    }

    pub fn leds(&self) -> [bool; COL] {
        self.0.borrow().leds
    }

    /// Total time spent in delays since the timeline was last cleared
    pub fn elapsed_ns(&self) -> u64 {
        self.0
            .borrow()
            .timeline
            .iter()
            .map(|op| match op {
                Op::Delay { ns } => *ns,
                Op::Write { .. } => 0,
            })
            .sum()
    }

    /// Decode every byte sent on the serial line since the timeline was last cleared
    pub fn serial_bytes(&self, bit_period_ns: u32) -> Vec<u8> {
        decode_serial(&self.timeline(), bit_period_ns)
    }

    pub fn output(&self, line: Line) -> FakeOutput {
        FakeOutput { board: self.clone(), line }
    }

    pub fn column(&self, col: usize) -> FakeColumn {
        FakeColumn { board: self.clone(), col }
    }

    pub fn delay(&self) -> FakeDelay {
        FakeDelay { board: self.clone() }
    }
}

pub struct FakeOutput {
    board: Board,
    line: Line,
}

impl ErrorType for FakeOutput {
    type Error = Infallible;
}

impl FakeOutput {
    fn write(&mut self, high: bool) {
        let mut state = self.board.0.borrow_mut();
        match self.line {
            Line::Row(row) => state.rows[row] = high,
            Line::Led(led) => state.leds[led] = high,
            Line::Tx => {}
        }
        state.timeline.push(Op::Write { line: self.line, high });
    }
}

impl OutputPin for FakeOutput {
    fn set_low(&mut self) -> Result<(), Self::Error> {
        self.write(false);
        Ok(())
    }

    fn set_high(&mut self) -> Result<(), Self::Error> {
        self.write(true);
        Ok(())
    }
}

/// Column input, reads high while a closed switch connects it to a selected (low) row
pub struct FakeColumn {
    board: Board,
    col: usize,
}

impl ErrorType for FakeColumn {
    type Error = Infallible;
}

impl InputPin for FakeColumn {
    fn is_high(&mut self) -> Result<bool, Self::Error> {
        let state = self.board.0.borrow();
        Ok((0..ROW).any(|row| !state.rows[row] && state.switches[row][self.col]))
    }

    fn is_low(&mut self) -> Result<bool, Self::Error> {
        self.is_high().map(|high| !high)
    }
}

#[derive(Clone)]
pub struct FakeDelay {
    board: Board,
}

impl DelayNs for FakeDelay {
    fn delay_ns(&mut self, ns: u32) {
        self.board.0.borrow_mut().timeline.push(Op::Delay { ns: ns as u64 });
    }

    fn delay_us(&mut self, us: u32) {
        self.board
            .0
            .borrow_mut()
            .timeline
            .push(Op::Delay { ns: us as u64 * 1_000 });
    }

    fn delay_ms(&mut self, ms: u32) {
        self.board
            .0
            .borrow_mut()
            .timeline
            .push(Op::Delay { ns: ms as u64 * 1_000_000 });
    }
}

/// Decode 8N1 frames from the serial line writes in `timeline`.
///
/// Every write to the line must be followed by exactly one unit interval hold, and every frame must be a low start
/// bit, 8 data bits and a high stop bit.
pub fn decode_serial(timeline: &[Op], bit_period_ns: u32) -> Vec<u8> {
    let mut phases = Vec::new();
    let mut iter = timeline.iter().peekable();
    while let Some(op) = iter.next() {
        if let Op::Write { line: Line::Tx, high } = op {
            match iter.peek() {
                Some(Op::Delay { ns }) => {
                    assert_eq!(*ns, bit_period_ns as u64, "serial phase not held for one unit interval")
                }
                other => panic!("serial phase not held, next op: {:?}", other),
            }
            phases.push(*high);
        }
    }

    assert_eq!(phases.len() % 10, 0, "incomplete serial frame: {:?}", phases);
    phases
        .chunks(10)
        .map(|frame| {
            assert!(!frame[0], "missing start bit");
            assert!(frame[9], "missing stop bit");
            frame[1..9]
                .iter()
                .enumerate()
                .fold(0u8, |byte, (i, &bit)| if bit { byte | (1 << i) } else { byte })
        })
        .collect()
}

pub type TestKeypad = Keypad<FakeColumn, FakeOutput, FakeOutput, FakeOutput, FakeDelay, ROW, COL>;

/// Build the reference keypad on a fake board
pub fn create_test_keypad(board: &Board) -> TestKeypad {
    create_test_keypad_with_config(board, KeypadConfig::default())
}

pub fn create_test_keypad_with_config(board: &Board, config: KeypadConfig) -> TestKeypad {
    let matrix = create_test_matrix(board, &config);
    let leds = LedBank::new(core::array::from_fn(|i| board.output(Line::Led(i))), config.light.low_active);
    let tx = SoftUartTx::new(board.output(Line::Tx), board.delay(), config.serial);
    let keypad = Keypad::new(matrix, leds, tx, board.delay(), DEFAULT_KEYMAP, config);
    // Drop the idle levels written while the pins were set up
    board.clear_timeline();
    keypad
}

pub fn create_test_matrix(board: &Board, config: &KeypadConfig) -> Matrix<FakeColumn, FakeOutput, FakeDelay, ROW, COL> {
    Matrix::new(
        core::array::from_fn(|c| board.column(c)),
        core::array::from_fn(|r| board.output(Line::Row(r))),
        board.delay(),
        config.matrix,
        &config.timing,
    )
}

/// Press the key at `(row, col)`, run one scan cycle, then release it and run another one
pub fn tap(keypad: &mut TestKeypad, board: &Board, row: usize, col: usize) {
    board.press(row, col);
    keypad.scan_cycle();
    board.release(row, col);
    keypad.scan_cycle();
}

/// Position of a key code in the reference keymap
pub fn position_of(code: u8) -> (usize, usize) {
    let idx = keytx::keymap::DEFAULT_ALPHABET
        .bytes()
        .position(|c| c == code)
        .expect("key code not in the keymap");
    (idx / COL, idx % COL)
}
