// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Message assembly core
//!
//! - `compactor`: sequence numbers -> GAP descriptors
//! - `buffers`: header / scratch / message triple
//! - `packer`: size-bounded packing loop and send reporting
//! - `gap`, `data`: the two packers, exposed as `MessageGroup` methods
//!
//! A `MessageGroup` borrows the encoder, the transport and the writer's
//! context for the duration of one or more packing calls; the caller lends
//! its `MessageBuffers` to each call.

pub mod buffers;
pub mod compactor;
mod data;
pub mod destination;
mod gap;
pub mod packer;

pub use buffers::MessageBuffers;
pub use compactor::compact_sequence_numbers;
pub use destination::Destinations;
pub use packer::{SendFailure, SendReport};

use crate::protocol::parameter::ParameterList;
use crate::protocol::types::{Guid, TopicKind};

/// What the packers need to know about the sending writer.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct WriterContext {
    pub guid: Guid,
    pub topic_kind: TopicKind,
    /// Inline QoS offered to readers that expect it.
    pub inline_qos: ParameterList,
}

impl WriterContext {
    #[must_use]
    pub fn new(guid: Guid, topic_kind: TopicKind) -> Self {
        Self {
            guid,
            topic_kind,
            inline_qos: ParameterList::new(),
        }
    }

    #[must_use]
    pub fn with_inline_qos(mut self, inline_qos: ParameterList) -> Self {
        self.inline_qos = inline_qos;
        self
    }
}

/// Packs one writer's changes into messages and sends them.
pub struct MessageGroup<'a, E: ?Sized, T: ?Sized> {
    encoder: &'a E,
    transport: &'a T,
    writer: &'a WriterContext,
}

impl<'a, E: ?Sized, T: ?Sized> MessageGroup<'a, E, T> {
    #[must_use]
    pub fn new(encoder: &'a E, transport: &'a T, writer: &'a WriterContext) -> Self {
        Self {
            encoder,
            transport,
            writer,
        }
    }

    pub fn writer(&self) -> &WriterContext {
        self.writer
    }
}
