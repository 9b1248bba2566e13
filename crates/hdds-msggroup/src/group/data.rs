// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! DATA packer: change records -> `[header][INFO_TS][DATA]..` messages.

use std::borrow::Borrow;

use crate::error::{GroupError, Result, SubmessageKind};
use crate::protocol::buffer::{EncodeResult, MessageBuffer};
use crate::protocol::constants::RTPS_INFO_TS_SIZE;
use crate::protocol::encoder::{DataSubmessage, SubmessageEncoder};
use crate::protocol::locator::Locator;
use crate::protocol::parameter::ParameterList;
use crate::protocol::types::{ChangeRecord, EntityId, SequenceNumber, Timestamp, TopicKind};
use crate::transport::Transport;

use super::buffers::MessageBuffers;
use super::destination::Destinations;
use super::packer::{self, SendReport, SubmessageSource};
use super::MessageGroup;

struct DataSource<'a, E: ?Sized, C> {
    encoder: &'a E,
    reader_id: EntityId,
    writer_id: EntityId,
    topic_kind: TopicKind,
    inline_qos: Option<&'a ParameterList>,
    changes: &'a [C],
}

impl<E, C> SubmessageSource for DataSource<'_, E, C>
where
    E: SubmessageEncoder + ?Sized,
    C: Borrow<ChangeRecord>,
{
    const KIND: SubmessageKind = SubmessageKind::Data;

    fn len(&self) -> usize {
        self.changes.len()
    }

    fn sequence_number(&self, index: usize) -> SequenceNumber {
        self.changes[index].borrow().sequence_number
    }

    fn encode(&self, index: usize, out: &mut MessageBuffer) -> EncodeResult<()> {
        let data = DataSubmessage {
            reader_id: self.reader_id,
            writer_id: self.writer_id,
            change: self.changes[index].borrow(),
            topic_kind: self.topic_kind,
            inline_qos: self.inline_qos,
        };
        self.encoder.encode_data(&data, out)
    }

    fn prefix_len(&self) -> usize {
        RTPS_INFO_TS_SIZE
    }

    fn encode_prefix(&self, out: &mut MessageBuffer) -> EncodeResult<()> {
        self.encoder.encode_info_ts(Timestamp::now(), out)
    }
}

impl<E, T> MessageGroup<'_, E, T>
where
    E: SubmessageEncoder + ?Sized,
    T: Transport + ?Sized,
{
    /// Send `changes` as DATA to every unicast, then every multicast locator.
    ///
    /// The writer's inline QoS is attached only when `expects_inline_qos` is
    /// set and the writer has any.
    pub fn send_changes_as_data<C: Borrow<ChangeRecord>>(
        &self,
        buffers: &mut MessageBuffers,
        changes: &[C],
        unicast: &[Locator],
        multicast: &[Locator],
        expects_inline_qos: bool,
        reader_id: EntityId,
    ) -> Result<SendReport> {
        self.send_data(
            buffers,
            changes,
            Destinations::lists(unicast, multicast),
            expects_inline_qos,
            reader_id,
        )
    }

    /// Send `changes` as DATA to a single locator.
    pub fn send_changes_as_data_to_locator<C: Borrow<ChangeRecord>>(
        &self,
        buffers: &mut MessageBuffers,
        changes: &[C],
        locator: &Locator,
        expects_inline_qos: bool,
        reader_id: EntityId,
    ) -> Result<SendReport> {
        self.send_data(
            buffers,
            changes,
            Destinations::single(locator),
            expects_inline_qos,
            reader_id,
        )
    }

    /// Shared implementation of both DATA call shapes.
    ///
    /// Changes numbered above `SequenceNumber::MAX` are rejected before
    /// anything is sent.
    pub fn send_data<C: Borrow<ChangeRecord>>(
        &self,
        buffers: &mut MessageBuffers,
        changes: &[C],
        destinations: Destinations<'_>,
        expects_inline_qos: bool,
        reader_id: EntityId,
    ) -> Result<SendReport> {
        if changes.is_empty() {
            return Ok(SendReport::default());
        }
        if let Some(invalid) = changes
            .iter()
            .map(|change| change.borrow().sequence_number)
            .find(|sn| !sn.is_valid())
        {
            return Err(GroupError::InvalidSequenceNumber(invalid));
        }

        let inline_qos = Some(&self.writer.inline_qos)
            .filter(|qos| expects_inline_qos && !qos.is_empty());

        buffers.prepare_header(self.encoder, &self.writer.guid.prefix)?;
        let source = DataSource {
            encoder: self.encoder,
            reader_id,
            writer_id: self.writer.guid.entity_id,
            topic_kind: self.writer.topic_kind,
            inline_qos,
            changes,
        };
        packer::run(&source, buffers, self.transport, destinations)
    }
}
