use embassy_time::Duration;

/// The config struct for the keypad.
///
/// There are 4 groups of configs:
/// 1. `SerialConfig`: symbol rate of the bit-banged serial line.
/// 2. `MatrixConfig`: electrical polarity of the row select and column lines.
/// 3. `LightConfig`: polarity of the feedback LEDs and the per-column indicator patterns.
/// 4. `TimingConfig`: settle and debounce holds of the scan cycle.
///
/// `FramingConfig` sets the control keys and the bytes framing every session on the serial line.
#[derive(Clone, Copy, Debug)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeypadConfig<const COL: usize = 4> {
    pub serial: SerialConfig,
    pub matrix: MatrixConfig,
    pub light: LightConfig<COL>,
    pub timing: TimingConfig,
    pub framing: FramingConfig,
}

impl Default for KeypadConfig<4> {
    fn default() -> Self {
        Self {
            serial: SerialConfig::default(),
            matrix: MatrixConfig::default(),
            light: LightConfig::default(),
            timing: TimingConfig::default(),
            framing: FramingConfig::default(),
        }
    }
}

/// Config of the software serial transmitter
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct SerialConfig {
    /// Symbol rate in bits per second
    pub baud_rate: u32,
}

impl Default for SerialConfig {
    fn default() -> Self {
        Self { baud_rate: 9600 }
    }
}

impl SerialConfig {
    /// Duration of one unit interval (one bit on the line) in nanoseconds.
    ///
    /// A baud rate of 0 is treated as 1.
    pub const fn bit_period_ns(&self) -> u32 {
        let baud = if self.baud_rate == 0 { 1 } else { self.baud_rate };
        1_000_000_000 / baud
    }
}

/// Electrical polarity of the key matrix
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct MatrixConfig {
    /// The selected row is driven low, idle rows are driven high
    pub row_active_low: bool,
    /// A column reads as active when its line is low
    pub col_active_low: bool,
}

impl Default for MatrixConfig {
    fn default() -> Self {
        Self {
            row_active_low: true,
            col_active_low: false,
        }
    }
}

/// Config of the column feedback LEDs
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct LightConfig<const COL: usize = 4> {
    /// LEDs are lit when their pin is driven low
    pub low_active: bool,
    /// LED mask shown while a key in column `i` is being handled, bit `n` lights LED `n`
    pub patterns: [u8; COL],
}

impl Default for LightConfig<4> {
    fn default() -> Self {
        Self {
            low_active: true,
            patterns: [0b0001, 0b0010, 0b0100, 0b1000],
        }
    }
}

/// Holds of the scan cycle
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct TimingConfig {
    /// Hold between selecting a row and sampling the columns
    pub row_settle: Duration,
    /// Hold after a detected key, in serial unit intervals
    pub key_settle_units: u32,
    /// Hold between two full scan cycles
    pub cycle_debounce: Duration,
    /// Hold before the identification banner is sent
    pub power_up: Duration,
}

impl Default for TimingConfig {
    fn default() -> Self {
        Self {
            row_settle: Duration::from_micros(100),
            key_settle_units: 8,
            cycle_debounce: Duration::from_millis(40),
            power_up: Duration::from_millis(500),
        }
    }
}

/// Control keys and session framing on the serial line
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct FramingConfig {
    /// Key code that flushes the buffer
    pub flush_key: u8,
    /// Key code that clears the buffer
    pub clear_key: u8,
    /// Byte sent after the buffered key codes of a non-empty flush
    pub end_marker: u8,
    /// Identification sequence sent once after power-up
    pub banner: &'static [u8],
}

impl Default for FramingConfig {
    fn default() -> Self {
        Self {
            flush_key: b'E',
            clear_key: b'C',
            end_marker: b'E',
            banner: b"INITE",
        }
    }
}

/// Duration in microseconds, saturated to what `DelayNs::delay_us` takes
pub(crate) fn as_micros_u32(duration: Duration) -> u32 {
    duration.as_micros().min(u32::MAX as u64) as u32
}
