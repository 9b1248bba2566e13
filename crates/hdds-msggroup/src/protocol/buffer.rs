// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Bounded, reusable byte buffer for RTPS message encoding.
//!
//! A `MessageBuffer` owns a growable `Vec<u8>` but refuses to grow past its
//! `max_size`: every write is bounds-checked and fails with
//! `EncodeError::BufferTooSmall` instead of producing an oversized message.
//! Resetting keeps the allocation, so one buffer serves many messages.

use std::fmt;

/// Result type for RTPS encoding operations.
pub type EncodeResult<T> = Result<T, EncodeError>;

/// Errors that can occur during RTPS encoding.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum EncodeError {
    /// Write would exceed the buffer's maximum size.
    BufferTooSmall { needed: usize, max_size: usize },
    /// Submessage body does not fit the 16-bit octetsToNextHeader field.
    SubmessageTooLarge(usize),
    /// Invalid parameter provided.
    InvalidParameter(&'static str),
}

impl fmt::Display for EncodeError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::BufferTooSmall { needed, max_size } => write!(
                f,
                "buffer too small for RTPS encoding ({} bytes needed, max {})",
                needed, max_size
            ),
            Self::SubmessageTooLarge(len) => {
                write!(f, "submessage body of {} bytes exceeds u16 length", len)
            }
            Self::InvalidParameter(msg) => write!(f, "invalid parameter: {}", msg),
        }
    }
}

impl std::error::Error for EncodeError {}

/// Generate little-endian write methods for primitive types.
macro_rules! impl_write_le {
    ($name:ident, $type:ty) => {
        pub fn $name(&mut self, value: $type) -> EncodeResult<()> {
            self.write_bytes(&value.to_le_bytes())
        }
    };
}

/// Bounded byte buffer (header, submessage scratch or assembled message).
#[derive(Debug, Clone)]
pub struct MessageBuffer {
    buf: Vec<u8>,
    max_size: usize,
}

impl MessageBuffer {
    /// Create an empty buffer that never grows past `max_size` bytes.
    #[must_use]
    pub fn with_max_size(max_size: usize) -> Self {
        Self {
            buf: Vec::with_capacity(max_size.min(64 * 1024)),
            max_size,
        }
    }

    /// Clear content, keep allocation.
    pub fn reset(&mut self) {
        self.buf.clear();
    }

    pub fn len(&self) -> usize {
        self.buf.len()
    }

    pub fn is_empty(&self) -> bool {
        self.buf.is_empty()
    }

    pub fn max_size(&self) -> usize {
        self.max_size
    }

    pub fn remaining(&self) -> usize {
        self.max_size.saturating_sub(self.buf.len())
    }

    pub fn as_slice(&self) -> &[u8] {
        &self.buf
    }

    /// Whether `additional` more bytes would still fit.
    pub fn fits(&self, additional: usize) -> bool {
        additional <= self.remaining()
    }

    /// Append the content of another buffer.
    pub fn append(&mut self, other: &MessageBuffer) -> EncodeResult<()> {
        self.write_bytes(other.as_slice())
    }

    pub fn write_bytes(&mut self, data: &[u8]) -> EncodeResult<()> {
        if !self.fits(data.len()) {
            return Err(EncodeError::BufferTooSmall {
                needed: self.buf.len() + data.len(),
                max_size: self.max_size,
            });
        }
        self.buf.extend_from_slice(data);
        Ok(())
    }

    impl_write_le!(write_u16_le, u16);
    impl_write_le!(write_u32_le, u32);
    impl_write_le!(write_i32_le, i32);

    pub fn write_u8(&mut self, value: u8) -> EncodeResult<()> {
        self.write_bytes(&[value])
    }

    /// Zero-pad up to the next multiple of `alignment` (relative to buffer start).
    pub fn align(&mut self, alignment: usize) -> EncodeResult<()> {
        if alignment <= 1 {
            return Ok(());
        }
        let padding = (alignment - self.buf.len() % alignment) % alignment;
        if padding == 0 {
            return Ok(());
        }
        self.write_bytes(&[0u8; 8][..padding.min(8)])
    }

    /// Overwrite two bytes already written at `offset` (little-endian).
    ///
    /// Used to back-patch `octetsToNextHeader` once a submessage body is known.
    pub fn patch_u16_le(&mut self, offset: usize, value: u16) -> EncodeResult<()> {
        match self.buf.get_mut(offset..offset + 2) {
            Some(slot) => {
                slot.copy_from_slice(&value.to_le_bytes());
                Ok(())
            }
            None => Err(EncodeError::InvalidParameter("patch offset out of range")),
        }
    }
}

impl AsRef<[u8]> for MessageBuffer {
    fn as_ref(&self) -> &[u8] {
        &self.buf
    }
}
