// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! # hdds-msggroup - RTPS message assembly
//!
//! Turns a writer's pending changes into size-bounded RTPS messages and
//! sends each one to the writer's destinations.
//!
//! ## Quick Start
//!
//! ```rust,no_run
//! use hdds_msggroup::{
//!     ChangeRecord, GroupConfig, GroupWriter, Guid, Locator, RtpsEncoder, TopicKind,
//!     UdpTransport, WriterContext, ENTITYID_UNKNOWN,
//! };
//!
//! fn main() -> Result<(), Box<dyn std::error::Error>> {
//!     let config = GroupConfig::default().with_max_message_size(1400);
//!     let transport = UdpTransport::new(&config.transport)?;
//!     let context = WriterContext::new(Guid::new([1; 12], [0, 0, 1, 2]), TopicKind::NoKey);
//!     let writer = GroupWriter::new(context, RtpsEncoder, transport, &config)?;
//!
//!     let reader = [Locator::udp_v4([127, 0, 0, 1], 7411)];
//!     let changes = vec![ChangeRecord::alive(1u64, vec![0x00, 0x01, 0x00, 0x00])];
//!     writer
//!         .send_changes_as_data(&changes, &reader, &[], false, ENTITYID_UNKNOWN)?
//!         .ensure_delivered()?;
//!
//!     // Sequence numbers 2..=4 will never be sent
//!     let irrelevant = [2u64.into(), 3u64.into(), 4u64.into()];
//!     writer.send_changes_as_gap(&irrelevant, ENTITYID_UNKNOWN, &reader, &[])?;
//!     Ok(())
//! }
//! ```
//!
//! ## Architecture
//!
//! ```text
//! +---------------------------------------------------------------------+
//! |  GroupWriter (one guarded MessageBuffers per writer)                |
//! +---------------------------------------------------------------------+
//! |  MessageGroup:  send_changes_as_gap | send_changes_as_data(_to_loc) |
//! |        compactor -> GapDescriptor        ChangeRecord               |
//! |                  \                      /                           |
//! |                   packer (size-bounded loop, fan-out, SendReport)   |
//! +---------------------------------------------------------------------+
//! |  SubmessageEncoder (RtpsEncoder)  |  Transport (UdpTransport)       |
//! +---------------------------------------------------------------------+
//! ```
//!
//! Every message is `[RTPS header][INFO_TS (DATA only)][GAP|DATA]...` and
//! never exceeds the configured maximum message size. A submessage that can
//! not fit on its own is reported as `GroupError::OversizeSubmessage`; there
//! is no fragmentation.

pub mod config;
pub mod error;
pub mod group;
pub mod protocol;
pub mod transport;
pub mod writer;

pub use config::{ConfigError, GroupConfig, TransportConfig};
pub use error::{GroupError, Result, SubmessageKind};
pub use group::{
    compact_sequence_numbers, Destinations, MessageBuffers, MessageGroup, SendFailure, SendReport,
    WriterContext,
};
pub use protocol::constants::ENTITYID_UNKNOWN;
pub use protocol::{
    ChangeKind, ChangeRecord, EncodeError, EntityId, GapDescriptor, Guid, GuidPrefix, Locator,
    LocatorKind, Parameter, ParameterList, RtpsEncoder, SequenceNumber, SequenceNumberSet,
    SubmessageEncoder, SubmessageIter, Timestamp, TopicKind,
};
pub use transport::{Transport, TransportError, UdpTransport};
pub use writer::GroupWriter;
