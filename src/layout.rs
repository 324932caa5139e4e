//! Byte layout and codecs for the shared ring region
//!
//! A ring region is a single contiguous byte array:
//!
//! ```text
//! offset 0 .. data_size-1          length slots of item_size bytes each,
//!                                  one big-endian unsigned integer per slot
//! offset data_size .. region_size  write pointer, big-endian unsigned,
//!                                  minimal width for the value data_size
//! ```
//!
//! where `data_size = item_size * length`. The stored write pointer is the
//! byte offset of the next slot boundary to be written, always a multiple of
//! `item_size`. The value `data_size` is representable by construction and
//! is the alias of 0 at the wraparound boundary: a pointer of 0 addresses
//! the slot ending at `data_size`.
//!
//! This layout is the interoperability contract. All instances attached to
//! one region must agree on `item_size` and `length`; nothing in the region
//! records them, and mismatched parameters decode garbage.

use crate::error::{Result, ShmRingError};

/// Minimal number of bytes needed to represent `n` (1 for n = 0).
fn bytes_needed(n: usize) -> usize {
    if n == 0 {
        1
    } else {
        ((usize::BITS - n.leading_zeros() + 7) / 8) as usize
    }
}

/// Immutable geometry of one ring region.
///
/// Rings with `data_size <= 255` store their pointer in a single byte; the
/// variable width generalizes the same scheme to arbitrary slot counts.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct RingLayout {
    item_size: usize,
    length: usize,
    pointer_width: usize,
}

impl RingLayout {
    /// Validate the geometry parameters and derive the pointer width.
    pub fn new(item_size: usize, length: usize) -> Result<Self> {
        if item_size < 1 {
            return Err(ShmRingError::invalid_configuration(
                "item_size",
                "item size must be at least 1 byte",
            ));
        }
        if length < 2 {
            return Err(ShmRingError::invalid_configuration(
                "length",
                "buffer length must be greater than 1",
            ));
        }
        let data_size = item_size.checked_mul(length).ok_or_else(|| {
            ShmRingError::invalid_configuration(
                "item_size",
                "item_size * length overflows the address space",
            )
        })?;

        Ok(Self {
            item_size,
            length,
            pointer_width: bytes_needed(data_size),
        })
    }

    /// Bytes per slot
    pub fn item_size(&self) -> usize {
        self.item_size
    }

    /// Number of slots
    pub fn length(&self) -> usize {
        self.length
    }

    /// Width of the stored write pointer in bytes
    pub fn pointer_width(&self) -> usize {
        self.pointer_width
    }

    /// Size of the data ring in bytes (`item_size * length`)
    pub fn data_size(&self) -> usize {
        self.item_size * self.length
    }

    /// Byte offset of the stored write pointer within the region
    pub fn pointer_offset(&self) -> usize {
        self.data_size()
    }

    /// Total region size: data ring plus the inline write pointer
    pub fn region_size(&self) -> usize {
        self.data_size() + self.pointer_width
    }

    /// Advance a pointer by one slot, wrapping at the end of the data ring.
    pub fn advance(&self, offset: usize) -> usize {
        (offset + self.item_size) % self.data_size()
    }

    /// End offset of the slot a pointer value addresses.
    ///
    /// A pointer of 0 means the slot ending at `data_size` (the alias rule
    /// at the wraparound boundary).
    pub fn slot_end(&self, offset: usize) -> usize {
        if offset == 0 {
            self.data_size()
        } else {
            offset
        }
    }

    /// Check that `value` fits in one slot.
    pub fn check_item(&self, value: u64) -> Result<()> {
        if self.item_size < 8 && value >> (8 * self.item_size as u32) != 0 {
            return Err(ShmRingError::value_out_of_range(value, self.item_size));
        }
        Ok(())
    }

    /// Encode `value` big-endian into one slot.
    ///
    /// Callers check the value range first; slots wider than 8 bytes are
    /// zero-padded on the left.
    pub fn encode_item(&self, value: u64, slot: &mut [u8]) {
        debug_assert_eq!(slot.len(), self.item_size);
        let be = value.to_be_bytes();
        if self.item_size >= 8 {
            let pad = self.item_size - 8;
            slot[..pad].fill(0);
            slot[pad..].copy_from_slice(&be);
        } else {
            slot.copy_from_slice(&be[8 - self.item_size..]);
        }
    }

    /// Decode one big-endian slot.
    ///
    /// Slots wider than 8 bytes decode their trailing 8 bytes; the leading
    /// bytes are zero by construction of `encode_item`.
    pub fn decode_item(&self, slot: &[u8]) -> u64 {
        debug_assert_eq!(slot.len(), self.item_size);
        slot[self.item_size.saturating_sub(8)..]
            .iter()
            .fold(0u64, |acc, &b| (acc << 8) | u64::from(b))
    }

    /// Read the stored write pointer from the region bytes.
    pub fn load_write_pointer(&self, region: &[u8]) -> usize {
        let field = &region[self.pointer_offset()..self.region_size()];
        field[self.pointer_width.saturating_sub(8)..]
            .iter()
            .fold(0usize, |acc, &b| (acc << 8) | usize::from(b))
    }

    /// Persist a write pointer value into the region bytes, big-endian.
    pub fn store_write_pointer(&self, region: &mut [u8], value: usize) {
        debug_assert!(value <= self.data_size());
        let field = &mut region[self.pointer_offset()..self.region_size()];
        let be = (value as u64).to_be_bytes();
        if self.pointer_width >= 8 {
            let pad = self.pointer_width - 8;
            field[..pad].fill(0);
            field[pad..].copy_from_slice(&be);
        } else {
            field.copy_from_slice(&be[8 - self.pointer_width..]);
        }
    }
}
