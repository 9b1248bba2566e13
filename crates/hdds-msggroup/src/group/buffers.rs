// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message buffer triple used by one assembly session.
//!
//! ```text
//! header      [RTPS hdr]                        encoded once per call
//! submessage  [one GAP or DATA]                 scratch, reset per item
//! message     [RTPS hdr][INFO_TS?][sub][sub]..  bounded by max_message_size
//! ```
//!
//! The scratch buffer is sized for the largest submessage the wire format
//! allows, not for the message budget, so an item that can never fit is
//! detected as oversize instead of failing mid-encode.

use crate::config::GroupConfig;
use crate::protocol::buffer::{EncodeResult, MessageBuffer};
use crate::protocol::constants::{RTPS_HEADER_SIZE, RTPS_SUBMSG_HEADER_SIZE, RTPS_SUBMSG_MAX_BODY};
use crate::protocol::encoder::SubmessageEncoder;
use crate::protocol::types::GuidPrefix;

/// Header / submessage scratch / assembled message.
///
/// Owned by the caller and lent to one packing call at a time
/// (`&mut MessageBuffers`); every call resets what it uses.
#[derive(Debug, Clone)]
pub struct MessageBuffers {
    header: MessageBuffer,
    submessage: MessageBuffer,
    message: MessageBuffer,
}

impl MessageBuffers {
    /// Buffers for messages of at most `max_message_size` bytes.
    #[must_use]
    pub fn new(max_message_size: usize) -> Self {
        Self {
            header: MessageBuffer::with_max_size(RTPS_HEADER_SIZE.max(max_message_size)),
            submessage: MessageBuffer::with_max_size(
                RTPS_SUBMSG_HEADER_SIZE + RTPS_SUBMSG_MAX_BODY,
            ),
            message: MessageBuffer::with_max_size(max_message_size),
        }
    }

    #[must_use]
    pub fn from_config(config: &GroupConfig) -> Self {
        Self::new(config.max_message_size)
    }

    pub fn max_message_size(&self) -> usize {
        self.message.max_size()
    }

    /// Encode the RTPS header for `prefix` into the header buffer.
    pub fn prepare_header<E: SubmessageEncoder + ?Sized>(
        &mut self,
        encoder: &E,
        prefix: &GuidPrefix,
    ) -> EncodeResult<()> {
        self.header.reset();
        encoder.encode_header(prefix, &mut self.header)
    }

    pub fn header(&self) -> &MessageBuffer {
        &self.header
    }

    pub fn submessage(&self) -> &MessageBuffer {
        &self.submessage
    }

    /// Reset the scratch buffer and lend it to the encoder.
    pub fn clear_submessage(&mut self) -> &mut MessageBuffer {
        self.submessage.reset();
        &mut self.submessage
    }

    pub fn message(&self) -> &MessageBuffer {
        &self.message
    }

    /// Direct access to the assembled message (used to write the INFO_TS prefix).
    pub fn message_mut(&mut self) -> &mut MessageBuffer {
        &mut self.message
    }

    /// Start a new message with the prepared header.
    pub fn begin_message(&mut self) -> EncodeResult<()> {
        self.message.reset();
        self.message.append(&self.header)
    }

    /// Whether the scratch submessage fits into the assembled message.
    pub fn submessage_fits(&self) -> bool {
        self.message.fits(self.submessage.len())
    }

    /// Append the scratch submessage to the assembled message.
    pub fn append_submessage(&mut self) -> EncodeResult<()> {
        self.message.append(&self.submessage)
    }
}
