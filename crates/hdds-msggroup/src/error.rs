// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Error types returned by the message group.

use std::fmt;

use thiserror::Error;

use crate::config::ConfigError;
use crate::group::packer::SendFailure;
use crate::protocol::buffer::EncodeError;
use crate::protocol::types::SequenceNumber;

/// Result alias for message group operations.
pub type Result<T> = std::result::Result<T, GroupError>;

/// Which packer produced a submessage.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SubmessageKind {
    Gap,
    Data,
}

impl fmt::Display for SubmessageKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            SubmessageKind::Gap => write!(f, "GAP"),
            SubmessageKind::Data => write!(f, "DATA"),
        }
    }
}

/// Errors returned by the packers and the group writer.
#[derive(Debug, Error)]
pub enum GroupError {
    /// One submessage plus the message prefix exceeds the message budget.
    #[error(
        "{kind} submessage for sn={sequence_number} needs {submessage_len} bytes \
         + {prefix_len} prefix, max message size is {max_message_size}"
    )]
    OversizeSubmessage {
        kind: SubmessageKind,
        sequence_number: SequenceNumber,
        submessage_len: usize,
        prefix_len: usize,
        max_message_size: usize,
    },

    /// Sequence number above `SequenceNumber::MAX`; it has no wire form.
    #[error("sequence number {0} is outside the RTPS range")]
    InvalidSequenceNumber(SequenceNumber),

    #[error("encoding failed: {0}")]
    Encode(#[from] EncodeError),

    /// Returned by `SendReport::ensure_delivered`.
    #[error("{} of the transmissions failed", failures.len())]
    Delivery { failures: Vec<SendFailure> },

    #[error("configuration error: {0}")]
    Config(#[from] ConfigError),
}
