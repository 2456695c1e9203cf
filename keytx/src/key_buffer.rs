/// Capacity of the key buffer
pub const BUFFER_SIZE: usize = 8;

/// The buffer of key codes waiting to be flushed.
///
/// It's a bounded FIFO: codes are only appended, and leave the buffer all at once on flush or clear.
#[derive(Debug, Default, Clone)]
#[cfg_attr(feature = "defmt", derive(defmt::Format))]
pub struct KeyBuffer {
    codes: heapless::Vec<u8, BUFFER_SIZE>,
}

impl KeyBuffer {
    /// Create an empty key buffer
    pub fn new() -> Self {
        Self {
            codes: heapless::Vec::new(),
        }
    }

    /// Append a key code, returns false if the buffer is full and the code is dropped
    pub fn push(&mut self, code: u8) -> bool {
        if let Err(code) = self.codes.push(code) {
            warn!("Key buffer is full, dropping key code {}", code);
            return false;
        }
        true
    }

    pub fn clear(&mut self) {
        self.codes.clear();
    }

    pub fn len(&self) -> usize {
        self.codes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.codes.is_empty()
    }

    pub fn is_full(&self) -> bool {
        self.codes.is_full()
    }

    /// Buffered codes, in the order they were appended
    pub fn as_slice(&self) -> &[u8] {
        &self.codes
    }
}
