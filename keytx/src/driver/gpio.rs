use embedded_hal::digital::OutputPin;

/// The gpio driver is a wrapper for the embedded-hal digital output pin trait.
/// It wraps the low-active and high-active pins, so row select lines and LEDs are driven by their logical state.
pub(crate) struct OutputController<P: OutputPin> {
    pin: P,
    low_active: bool,
}

impl<P: OutputPin> OutputController<P> {
    /// Create a new OutputController instance
    pub fn new(pin: P, low_active: bool) -> Self {
        Self { pin, low_active }
    }

    /// Activate the GPIO pin
    pub fn activate(&mut self) {
        self.set(true);
    }

    /// Deactivate the GPIO pin
    pub fn deactivate(&mut self) {
        self.set(false);
    }

    /// Drive the pin to the level of the given logical state
    pub fn set(&mut self, active: bool) {
        if active != self.low_active {
            self.pin.set_high().ok();
        } else {
            self.pin.set_low().ok();
        }
    }

    #[cfg(test)]
    pub(crate) fn inner(&mut self) -> &mut P {
        &mut self.pin
    }
}
