use embedded_hal::digital::OutputPin;

use crate::driver::gpio::OutputController;

/// Column feedback LEDs.
///
/// The state is a mask of lit LEDs, bit `n` is LED `n`. The last written mask is kept so that it can be saved and
/// restored around a key's handling.
pub struct LedBank<P: OutputPin, const N: usize> {
    leds: [OutputController<P>; N],
    state: u8,
}

impl<P: OutputPin, const N: usize> LedBank<P, N> {
    /// Create the LED bank, all LEDs start off
    pub fn new(pins: [P; N], low_active: bool) -> Self {
        const { assert!(N <= 8, "LedBank supports at most 8 LEDs") };
        let mut bank = Self {
            leds: pins.map(|pin| OutputController::new(pin, low_active)),
            state: 0,
        };
        bank.set(0);
        bank
    }

    /// Current LED mask
    pub fn state(&self) -> u8 {
        self.state
    }

    /// Drive every LED according to `mask`
    pub fn set(&mut self, mask: u8) {
        for (idx, led) in self.leds.iter_mut().enumerate() {
            led.set(mask & (1 << idx) != 0);
        }
        self.state = mask;
    }

    /// Turn all LEDs off
    pub fn clear(&mut self) {
        self.set(0);
    }
}
