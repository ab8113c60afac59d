//! Cursor state of a bit stream
//!
//! `StreamPosition` holds the three counters the stream advances as it
//! writes or reads. It is `Copy`, so callers can snapshot it before an
//! operation and compare afterwards.

/// Bits per byte of the backing buffer
pub const BITS_PER_BYTE: u8 = 8;

/// Cursor position within a bit stream
///
/// Invariant: while `byte_index < len`,
/// `bits_remaining == 8 * len - (8 * byte_index + (8 - bits_free_in_byte))`;
/// once `bits_remaining == 0`, `byte_index == len`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
#[cfg_attr(feature = "serde", derive(serde::Serialize, serde::Deserialize))]
pub struct StreamPosition {
    bits_remaining: usize,
    byte_index: usize,
    bits_free_in_byte: u8,
}

impl StreamPosition {
    /// Position at the start of a buffer of `len` bytes
    pub fn start(len: usize) -> Self {
        Self {
            bits_remaining: len * BITS_PER_BYTE as usize,
            byte_index: 0,
            bits_free_in_byte: BITS_PER_BYTE,
        }
    }

    /// Unconsumed bits between the cursor and the end of the buffer
    #[inline]
    pub fn bits_remaining(&self) -> usize {
        self.bits_remaining
    }

    /// Index of the byte currently being filled or read
    #[inline]
    pub fn byte_index(&self) -> usize {
        self.byte_index
    }

    /// Unused bits in the current byte, counted from the MSB end
    #[inline]
    pub fn bits_free_in_byte(&self) -> u8 {
        self.bits_free_in_byte
    }

    /// Total bits consumed since the start of the buffer
    #[inline]
    pub fn bits_consumed(&self) -> usize {
        self.byte_index * BITS_PER_BYTE as usize
            + (BITS_PER_BYTE - self.bits_free_in_byte) as usize
    }

    /// True when the current byte has not been touched yet
    #[inline]
    pub(crate) fn at_byte_start(&self) -> bool {
        self.bits_free_in_byte == BITS_PER_BYTE
    }

    /// Advance by `width` bits within the current byte
    ///
    /// `width` never exceeds `bits_free_in_byte` or `bits_remaining`; callers
    /// check capacity first.
    #[inline]
    pub(crate) fn step(&mut self, width: u8) {
        debug_assert!(width <= self.bits_free_in_byte, "Chunk crosses a byte boundary");
        debug_assert!(width as usize <= self.bits_remaining, "Step past end of buffer");

        self.bits_free_in_byte -= width;
        if self.bits_free_in_byte == 0 {
            self.byte_index += 1;
            self.bits_free_in_byte = BITS_PER_BYTE;
        }

        self.bits_remaining -= width as usize;
    }
}

impl Default for StreamPosition {
    /// Position of an unbound (zero-length) stream
    fn default() -> Self {
        Self::start(0)
    }
}
