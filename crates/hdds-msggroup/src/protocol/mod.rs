// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! RTPS protocol layer used by the message group
//!
//! This module contains the wire-level components:
//! - Constants: submessage IDs, flags, PIDs
//! - Value types: sequence numbers, GUIDs, change records, timestamps
//! - SequenceNumberSet / GapDescriptor
//! - Bounded message buffers and the submessage encoder
//! - A walker over assembled messages

pub mod buffer;
pub mod constants;
pub mod encoder;
pub mod locator;
pub mod parameter;
pub mod seqset;
pub mod types;
pub mod walk;

// Re-export commonly used items
pub use buffer::{EncodeError, EncodeResult, MessageBuffer};
pub use encoder::{DataSubmessage, GapSubmessage, RtpsEncoder, SubmessageEncoder};
pub use locator::{Locator, LocatorKind};
pub use parameter::{Parameter, ParameterList};
pub use seqset::{GapDescriptor, SequenceNumberSet};
pub use types::{
    ChangeKind, ChangeRecord, EntityId, Guid, GuidPrefix, SequenceNumber, Timestamp, TopicKind,
};
pub use walk::{SubmessageIter, SubmessageView};
