//! Bit-granular encoder/decoder over a borrowed byte buffer
//!
//! `BitStream` packs booleans, integer fields of any width up to their type
//! size, and IEEE floats into a fixed buffer it does not own. Data is always
//! stored in network order:
//! - Bits within a byte are filled most-significant first
//! - Multi-byte values are written most-significant byte first, whatever the
//!   host byte order
//! - Fields narrower than their type are stored as a contiguous run of bits,
//!   not padded to a byte boundary
//!
//! A single cursor is shared by writes and reads. The usual pattern is to
//! write a record, call [`BitStream::restart`], then read it back in the same
//! order with the same widths.
//!
//! # Example
//!
//! ```rust
//! use voltage_bitstream::BitStream;
//!
//! let mut storage = [0u8; 4];
//! let mut stream = BitStream::new(&mut storage);
//!
//! stream.put_bit(true).unwrap();
//! stream.put_signed_bits(-11i8, 5).unwrap();
//! stream.put_unsigned_bits(0x2A5u16, 10).unwrap();
//!
//! stream.restart();
//! assert!(stream.get_bit().unwrap());
//! assert_eq!(stream.get_signed_bits::<i8>(5).unwrap(), -11);
//! assert_eq!(stream.get_unsigned_bits::<u16>(10).unwrap(), 0x2A5);
//! ```

use tracing::{debug, trace, warn};

use crate::error::{BitStreamError, Result};
use crate::field::{low_mask, sign_extend, SignedField, UnsignedField};
use crate::position::{StreamPosition, BITS_PER_BYTE};

/// Bit stream over a caller-owned byte buffer
///
/// The stream starts unbound when built with [`BitStream::unbound`] or
/// `Default`; every put/get then fails with [`BitStreamError::Unbound`] until
/// a buffer is attached with [`BitStream::set_stream`].
#[derive(Debug, Default)]
pub struct BitStream<'a> {
    buffer: Option<&'a mut [u8]>,
    position: StreamPosition,
}

impl<'a> BitStream<'a> {
    /// Create a stream over an unsigned byte buffer, cursor at the start
    pub fn new(buffer: &'a mut [u8]) -> Self {
        let mut stream = Self::unbound();
        stream.set_stream(buffer);
        stream
    }

    /// Create a stream over a signed byte buffer, cursor at the start
    pub fn from_signed(buffer: &'a mut [i8]) -> Self {
        Self::new(as_unsigned(buffer))
    }

    /// Create a stream with no buffer attached
    pub fn unbound() -> Self {
        Self::default()
    }

    /// Attach a new buffer and restart the cursor
    ///
    /// Any previously bound buffer is released untouched.
    pub fn set_stream(&mut self, buffer: &'a mut [u8]) {
        debug!(len = buffer.len(), "Bit stream bound");
        self.buffer = Some(buffer);
        self.restart();
    }

    /// Attach a signed byte buffer and restart the cursor
    pub fn set_stream_signed(&mut self, buffer: &'a mut [i8]) {
        self.set_stream(as_unsigned(buffer));
    }

    /// Detach and return the bound buffer, leaving the stream unbound
    pub fn release(&mut self) -> Option<&'a mut [u8]> {
        let buffer = self.buffer.take();
        self.restart();
        buffer
    }

    /// Reset the cursor to the start of the buffer without touching its contents
    pub fn restart(&mut self) {
        self.position = StreamPosition::start(self.buffer_len());
    }

    /// Reset the cursor and zero every byte of the buffer
    pub fn clear(&mut self) {
        self.restart();
        if let Some(buffer) = self.buffer.as_deref_mut() {
            buffer.fill(0);
            debug!(len = buffer.len(), "Bit stream cleared");
        }
    }

    /// True when no bits remain between the cursor and the end of the buffer
    #[inline]
    pub fn empty(&self) -> bool {
        self.position.bits_remaining() == 0
    }

    #[inline]
    pub fn is_bound(&self) -> bool {
        self.buffer.is_some()
    }

    /// Length of the bound buffer in bytes (0 when unbound)
    #[inline]
    pub fn buffer_len(&self) -> usize {
        self.buffer.as_deref().map_or(0, <[u8]>::len)
    }

    /// Read-only view of the bound buffer (empty when unbound)
    pub fn as_bytes(&self) -> &[u8] {
        self.buffer.as_deref().unwrap_or(&[])
    }

    #[inline]
    pub fn bits_remaining(&self) -> usize {
        self.position.bits_remaining()
    }

    #[inline]
    pub fn byte_index(&self) -> usize {
        self.position.byte_index()
    }

    #[inline]
    pub fn bits_free_in_byte(&self) -> u8 {
        self.position.bits_free_in_byte()
    }

    /// Snapshot of the cursor
    #[inline]
    pub fn position(&self) -> StreamPosition {
        self.position
    }

    // ========================================================================
    // Writing
    // ========================================================================

    /// Write a single bit
    pub fn put_bit(&mut self, value: bool) -> Result<()> {
        self.put_raw(u64::from(value), 1)
    }

    /// Write an unsigned integer at its natural width
    pub fn put_unsigned<T: UnsignedField>(&mut self, value: T) -> Result<()> {
        self.put_unsigned_bits(value, T::BITS as u8)
    }

    /// Write the low `width` bits of an unsigned integer
    ///
    /// Atomic: on error nothing is written and the cursor does not move.
    /// A `width` of 0 writes nothing and succeeds.
    pub fn put_unsigned_bits<T: UnsignedField>(&mut self, value: T, width: u8) -> Result<()> {
        ensure_width(width, T::BITS)?;
        self.put_raw(value.to_raw(), width)
    }

    /// Write a signed integer at its natural width
    pub fn put_signed<T: SignedField>(&mut self, value: T) -> Result<()> {
        self.put_signed_bits(value, T::BITS as u8)
    }

    /// Write the low `width` bits of a signed integer's two's-complement form
    ///
    /// Values outside the `width`-bit range are truncated; reading the field
    /// back with [`BitStream::get_signed_bits`] sign-extends from bit
    /// `width - 1`. Atomic like [`BitStream::put_unsigned_bits`].
    pub fn put_signed_bits<T: SignedField>(&mut self, value: T, width: u8) -> Result<()> {
        ensure_width(width, T::BITS)?;
        self.put_raw(value.to_raw(), width)
    }

    /// Write a 32-bit float as four big-endian bytes
    ///
    /// Not atomic across the value: if the stream runs out part way, the
    /// leading bytes stay written and the cursor stays advanced past them.
    pub fn put_f32(&mut self, value: f32) -> Result<()> {
        // to_be_bytes reverses the host representation on little-endian targets
        self.put_bytes(&value.to_be_bytes())
    }

    /// Write a 64-bit float as eight big-endian bytes
    ///
    /// Same partial-write behaviour as [`BitStream::put_f32`].
    pub fn put_f64(&mut self, value: f64) -> Result<()> {
        self.put_bytes(&value.to_be_bytes())
    }

    /// Write each byte as an 8-bit field, in order
    ///
    /// Each byte is atomic; the sequence is not. On error, the bytes before
    /// the failing one remain in the buffer. Wider payloads with no Rust
    /// primitive (80-bit extended floats, for instance) go through here in
    /// their network byte order.
    pub fn put_bytes(&mut self, bytes: &[u8]) -> Result<()> {
        for (index, &byte) in bytes.iter().enumerate() {
            if let Err(err) = self.put_raw(u64::from(byte), BITS_PER_BYTE) {
                if index > 0 {
                    warn!(
                        written = index,
                        total = bytes.len(),
                        "Partial multi-byte value left in bit stream"
                    );
                }
                return Err(err);
            }
        }
        Ok(())
    }

    // ========================================================================
    // Reading
    // ========================================================================

    /// Read a single bit
    pub fn get_bit(&mut self) -> Result<bool> {
        self.get_raw(1).map(|raw| raw != 0)
    }

    /// Read an unsigned integer at its natural width
    pub fn get_unsigned<T: UnsignedField>(&mut self) -> Result<T> {
        self.get_unsigned_bits(T::BITS as u8)
    }

    /// Read a `width`-bit field into the low bits of an unsigned integer
    ///
    /// Atomic: on error the cursor does not move.
    pub fn get_unsigned_bits<T: UnsignedField>(&mut self, width: u8) -> Result<T> {
        ensure_width(width, T::BITS)?;
        self.get_raw(width).map(T::from_raw)
    }

    /// Read a signed integer at its natural width
    pub fn get_signed<T: SignedField>(&mut self) -> Result<T> {
        self.get_signed_bits(T::BITS as u8)
    }

    /// Read a `width`-bit two's-complement field, sign-extended to `T`
    pub fn get_signed_bits<T: SignedField>(&mut self, width: u8) -> Result<T> {
        ensure_width(width, T::BITS)?;
        let raw = self.get_raw(width)?;

        if u32::from(width) < T::BITS {
            Ok(T::from_raw(sign_extend(raw, u32::from(width))))
        } else {
            Ok(T::from_raw(raw))
        }
    }

    /// Read a 32-bit float stored as four big-endian bytes
    ///
    /// Fails without moving the cursor if fewer than 32 bits remain.
    pub fn get_f32(&mut self) -> Result<f32> {
        let mut bytes = [0u8; 4];
        self.get_bytes(&mut bytes)?;
        Ok(f32::from_be_bytes(bytes))
    }

    /// Read a 64-bit float stored as eight big-endian bytes
    ///
    /// Fails without moving the cursor if fewer than 64 bits remain.
    pub fn get_f64(&mut self) -> Result<f64> {
        let mut bytes = [0u8; 8];
        self.get_bytes(&mut bytes)?;
        Ok(f64::from_be_bytes(bytes))
    }

    /// Fill `out` with successive 8-bit fields
    ///
    /// Capacity for the whole slice is checked up front.
    pub fn get_bytes(&mut self, out: &mut [u8]) -> Result<()> {
        if self.buffer.is_none() {
            return Err(unbound_error());
        }
        ensure_capacity(&self.position, out.len() * BITS_PER_BYTE as usize)?;

        for slot in out.iter_mut() {
            *slot = self.get_raw(BITS_PER_BYTE)? as u8;
        }
        Ok(())
    }

    // ========================================================================
    // Bit-packing core
    // ========================================================================

    /// Write the low `width` bits of `value`, MSB first, in byte-bounded chunks
    fn put_raw(&mut self, value: u64, width: u8) -> Result<()> {
        let Some(buffer) = self.buffer.as_deref_mut() else {
            return Err(unbound_error());
        };
        ensure_capacity(&self.position, width as usize)?;

        let mut width = width;
        while width > 0 {
            let chunk_width = width.min(self.position.bits_free_in_byte());
            width -= chunk_width;

            let chunk = ((value >> width) & low_mask(u32::from(chunk_width))) as u8;
            put_chunk(buffer, &mut self.position, chunk, chunk_width);
        }

        Ok(())
    }

    /// Read `width` bits MSB first into the low bits of the result
    fn get_raw(&mut self, width: u8) -> Result<u64> {
        let Some(buffer) = self.buffer.as_deref() else {
            return Err(unbound_error());
        };
        ensure_capacity(&self.position, width as usize)?;

        let mut value = 0u64;
        let mut width = width;
        while width > 0 {
            let chunk_width = width.min(self.position.bits_free_in_byte());
            width -= chunk_width;

            let chunk = get_chunk(buffer, &mut self.position, chunk_width);
            value |= u64::from(chunk) << width;
        }

        Ok(value)
    }
}

/// OR a chunk into the free bits of the current byte, then step past it
///
/// A byte is zeroed the first time it is written to, so stale buffer
/// contents never leak into the packed output.
#[inline]
fn put_chunk(buffer: &mut [u8], position: &mut StreamPosition, chunk: u8, width: u8) {
    let byte = &mut buffer[position.byte_index()];
    if position.at_byte_start() {
        *byte = 0;
    }

    *byte |= chunk << (position.bits_free_in_byte() - width);
    position.step(width);
}

/// Extract the next `width` bits of the current byte, then step past them
#[inline]
fn get_chunk(buffer: &[u8], position: &mut StreamPosition, width: u8) -> u8 {
    let byte = buffer[position.byte_index()];
    let chunk = (byte >> (position.bits_free_in_byte() - width)) & low_mask(u32::from(width)) as u8;

    position.step(width);
    chunk
}

fn ensure_capacity(position: &StreamPosition, requested: usize) -> Result<()> {
    let remaining = position.bits_remaining();
    if remaining < requested {
        trace!(requested, remaining, "Bit stream capacity exceeded");
        return Err(BitStreamError::insufficient(requested, remaining));
    }
    Ok(())
}

fn ensure_width(width: u8, max: u32) -> Result<()> {
    if u32::from(width) > max {
        trace!(width, max, "Bit field wider than its type");
        return Err(BitStreamError::invalid_width(width, max));
    }
    Ok(())
}

fn unbound_error() -> BitStreamError {
    trace!("Bit stream access without a buffer");
    BitStreamError::Unbound
}

fn as_unsigned(buffer: &mut [i8]) -> &mut [u8] {
    let len = buffer.len();
    // SAFETY: i8 and u8 share size and alignment and every bit pattern is
    // valid for both; the returned slice takes over the exclusive borrow.
    unsafe { std::slice::from_raw_parts_mut(buffer.as_mut_ptr().cast::<u8>(), len) }
}
