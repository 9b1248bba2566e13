// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Walk the submessages of an assembled RTPS message.

use super::constants::{FLAG_ENDIANNESS, RTPS_HEADER_SIZE, RTPS_MAGIC, RTPS_SUBMSG_HEADER_SIZE};
use super::types::GuidPrefix;

/// One submessage view: id, flags and body (header stripped).
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct SubmessageView<'a> {
    pub id: u8,
    pub flags: u8,
    pub body: &'a [u8],
}

/// Iterator over the submessages following the RTPS header.
///
/// Stops at the first truncated submessage. Only little-endian lengths are
/// decoded (the only form the encoder writes); big-endian submessages end
/// the walk.
#[derive(Debug, Clone)]
pub struct SubmessageIter<'a> {
    buf: &'a [u8],
    offset: usize,
}

impl<'a> SubmessageIter<'a> {
    /// Returns `None` if `message` does not start with an RTPS header.
    #[must_use]
    pub fn new(message: &'a [u8]) -> Option<Self> {
        if message.len() < RTPS_HEADER_SIZE || &message[0..4] != RTPS_MAGIC {
            return None;
        }
        Some(Self {
            buf: message,
            offset: RTPS_HEADER_SIZE,
        })
    }

    /// GUID prefix from the message header.
    pub fn guid_prefix(&self) -> GuidPrefix {
        let mut prefix = [0u8; 12];
        prefix.copy_from_slice(&self.buf[8..RTPS_HEADER_SIZE]);
        prefix
    }
}

impl<'a> Iterator for SubmessageIter<'a> {
    type Item = SubmessageView<'a>;

    fn next(&mut self) -> Option<Self::Item> {
        let header = self
            .buf
            .get(self.offset..self.offset + RTPS_SUBMSG_HEADER_SIZE)?;
        let (id, flags) = (header[0], header[1]);
        if flags & FLAG_ENDIANNESS == 0 {
            return None;
        }
        let len = usize::from(u16::from_le_bytes([header[2], header[3]]));

        let body_start = self.offset + RTPS_SUBMSG_HEADER_SIZE;
        let body = self.buf.get(body_start..body_start + len)?;
        self.offset = body_start + len;
        Some(SubmessageView { id, flags, body })
    }
}
