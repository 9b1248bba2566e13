// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Thread-safe per-writer front end.
//!
//! `GroupWriter` owns one `MessageBuffers` triple behind a mutex, so several
//! threads (user writes, heartbeat/NACK responses) can send on behalf of the
//! same writer; packing calls for one writer are serialized.

use std::borrow::Borrow;

use parking_lot::Mutex;

use crate::config::GroupConfig;
use crate::error::Result;
use crate::group::{Destinations, MessageBuffers, MessageGroup, SendReport, WriterContext};
use crate::protocol::encoder::SubmessageEncoder;
use crate::protocol::locator::Locator;
use crate::protocol::seqset::GapDescriptor;
use crate::protocol::types::{ChangeRecord, EntityId, SequenceNumber};
use crate::transport::Transport;

/// Message group bound to one writer.
pub struct GroupWriter<E, T> {
    context: WriterContext,
    encoder: E,
    transport: T,
    buffers: Mutex<MessageBuffers>,
}

impl<E, T> GroupWriter<E, T>
where
    E: SubmessageEncoder,
    T: Transport,
{
    /// Build a writer front end; `config` is validated first.
    pub fn new(
        context: WriterContext,
        encoder: E,
        transport: T,
        config: &GroupConfig,
    ) -> Result<Self> {
        config.validate()?;
        log::debug!(
            "[msggroup] writer {} ready (max_message_size={})",
            context.guid,
            config.max_message_size
        );
        Ok(Self {
            context,
            encoder,
            transport,
            buffers: Mutex::new(MessageBuffers::from_config(config)),
        })
    }

    pub fn context(&self) -> &WriterContext {
        &self.context
    }

    pub fn transport(&self) -> &T {
        &self.transport
    }

    pub fn max_message_size(&self) -> usize {
        self.buffers.lock().max_message_size()
    }

    fn with_group<R>(
        &self,
        f: impl FnOnce(&MessageGroup<'_, E, T>, &mut MessageBuffers) -> R,
    ) -> R {
        let group = MessageGroup::new(&self.encoder, &self.transport, &self.context);
        let mut buffers = self.buffers.lock();
        f(&group, &mut *buffers)
    }

    /// See [`MessageGroup::send_changes_as_gap`].
    pub fn send_changes_as_gap(
        &self,
        sequences: &[SequenceNumber],
        reader_id: EntityId,
        unicast: &[Locator],
        multicast: &[Locator],
    ) -> Result<SendReport> {
        self.with_group(|group, buffers| {
            group.send_changes_as_gap(buffers, sequences, reader_id, unicast, multicast)
        })
    }

    /// See [`MessageGroup::send_gap_descriptors`].
    pub fn send_gap_descriptors(
        &self,
        descriptors: &[GapDescriptor],
        reader_id: EntityId,
        destinations: Destinations<'_>,
    ) -> Result<SendReport> {
        self.with_group(|group, buffers| {
            group.send_gap_descriptors(buffers, descriptors, reader_id, destinations)
        })
    }

    /// See [`MessageGroup::send_changes_as_data`].
    pub fn send_changes_as_data<C: Borrow<ChangeRecord>>(
        &self,
        changes: &[C],
        unicast: &[Locator],
        multicast: &[Locator],
        expects_inline_qos: bool,
        reader_id: EntityId,
    ) -> Result<SendReport> {
        self.with_group(|group, buffers| {
            group.send_changes_as_data(
                buffers,
                changes,
                unicast,
                multicast,
                expects_inline_qos,
                reader_id,
            )
        })
    }

    /// See [`MessageGroup::send_changes_as_data_to_locator`].
    pub fn send_changes_as_data_to_locator<C: Borrow<ChangeRecord>>(
        &self,
        changes: &[C],
        locator: &Locator,
        expects_inline_qos: bool,
        reader_id: EntityId,
    ) -> Result<SendReport> {
        self.with_group(|group, buffers| {
            group.send_changes_as_data_to_locator(
                buffers,
                changes,
                locator,
                expects_inline_qos,
                reader_id,
            )
        })
    }
}
