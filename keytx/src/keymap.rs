use crate::config::FramingConfig;

/// Key alphabet of the reference keypad, row-major with 4 keys per row.
pub const DEFAULT_ALPHABET: &str = "P123T456M789BC0EOSLA";

/// Keymap of the reference 5x4 keypad.
pub const DEFAULT_KEYMAP: Keymap<5, 4> = Keymap::from_row_major(DEFAULT_ALPHABET.as_bytes());

/// Fixed table of key codes, indexed by matrix position.
///
/// Indexing is row-major: the key at `(row, col)` is the `row * COL + col`-th code of the alphabet it was built from.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct Keymap<const ROW: usize, const COL: usize> {
    codes: [[u8; COL]; ROW],
}

impl<const ROW: usize, const COL: usize> Keymap<ROW, COL> {
    pub const fn new(codes: [[u8; COL]; ROW]) -> Self {
        Self { codes }
    }

    /// Build the table from `ROW * COL` codes laid out row after row.
    ///
    /// Panics at compile time when used in a const context with a slice of the wrong length.
    pub const fn from_row_major(codes: &[u8]) -> Self {
        assert!(codes.len() == ROW * COL, "keymap size mismatch");
        let mut table = [[0u8; COL]; ROW];
        let mut row = 0;
        while row < ROW {
            let mut col = 0;
            while col < COL {
                table[row][col] = codes[row * COL + col];
                col += 1;
            }
            row += 1;
        }
        Self { codes: table }
    }

    /// Key code at the given position, `None` if it's out of the matrix
    pub fn get(&self, row: usize, col: usize) -> Option<u8> {
        self.codes.get(row).and_then(|r| r.get(col)).copied()
    }
}

/// What a key code does once it's detected
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub enum KeyAction {
    /// Send the buffer followed by the end marker
    Flush,
    /// Drop the buffer content
    Clear,
    /// Literal character, appended to the buffer
    Data(u8),
}

impl KeyAction {
    pub fn from_code(code: u8, framing: &FramingConfig) -> Self {
        if code == framing.flush_key {
            KeyAction::Flush
        } else if code == framing.clear_key {
            KeyAction::Clear
        } else {
            KeyAction::Data(code)
        }
    }
}
