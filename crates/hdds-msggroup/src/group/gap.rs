// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! GAP packer: irrelevant sequence numbers -> GAP messages.

use crate::error::{GroupError, Result, SubmessageKind};
use crate::protocol::buffer::{EncodeResult, MessageBuffer};
use crate::protocol::encoder::{GapSubmessage, SubmessageEncoder};
use crate::protocol::locator::Locator;
use crate::protocol::seqset::GapDescriptor;
use crate::protocol::types::{EntityId, SequenceNumber};
use crate::transport::Transport;

use super::buffers::MessageBuffers;
use super::compactor::compact_sequence_numbers;
use super::destination::Destinations;
use super::packer::{self, SendReport, SubmessageSource};
use super::MessageGroup;

struct GapSource<'a, E: ?Sized> {
    encoder: &'a E,
    reader_id: EntityId,
    writer_id: EntityId,
    descriptors: &'a [GapDescriptor],
}

impl<E: SubmessageEncoder + ?Sized> SubmessageSource for GapSource<'_, E> {
    const KIND: SubmessageKind = SubmessageKind::Gap;

    fn len(&self) -> usize {
        self.descriptors.len()
    }

    fn sequence_number(&self, index: usize) -> SequenceNumber {
        self.descriptors[index].gap_start()
    }

    fn encode(&self, index: usize, out: &mut MessageBuffer) -> EncodeResult<()> {
        let gap = GapSubmessage {
            reader_id: self.reader_id,
            writer_id: self.writer_id,
            descriptor: &self.descriptors[index],
        };
        self.encoder.encode_gap(&gap, out)
    }

    fn prefix_len(&self) -> usize {
        0
    }

    fn encode_prefix(&self, _out: &mut MessageBuffer) -> EncodeResult<()> {
        Ok(())
    }
}

impl<E, T> MessageGroup<'_, E, T>
where
    E: SubmessageEncoder + ?Sized,
    T: Transport + ?Sized,
{
    /// Announce `sequences` as irrelevant to `reader_id`.
    ///
    /// The sequence numbers are compacted into GAP descriptors, packed into
    /// as few messages as the size budget allows, and each message is sent
    /// to every unicast then every multicast locator.
    pub fn send_changes_as_gap(
        &self,
        buffers: &mut MessageBuffers,
        sequences: &[SequenceNumber],
        reader_id: EntityId,
        unicast: &[Locator],
        multicast: &[Locator],
    ) -> Result<SendReport> {
        let descriptors = compact_sequence_numbers(sequences)?;
        self.send_gap_descriptors(
            buffers,
            &descriptors,
            reader_id,
            Destinations::lists(unicast, multicast),
        )
    }

    /// Pack already-built GAP descriptors, in order.
    ///
    /// A descriptor whose start or base lies above `SequenceNumber::MAX` is
    /// rejected before anything is sent.
    pub fn send_gap_descriptors(
        &self,
        buffers: &mut MessageBuffers,
        descriptors: &[GapDescriptor],
        reader_id: EntityId,
        destinations: Destinations<'_>,
    ) -> Result<SendReport> {
        if descriptors.is_empty() {
            return Ok(SendReport::default());
        }
        if let Some(invalid) = descriptors
            .iter()
            .flat_map(|gap| [gap.gap_start(), gap.base()])
            .find(|sn| !sn.is_valid())
        {
            return Err(GroupError::InvalidSequenceNumber(invalid));
        }

        buffers.prepare_header(self.encoder, &self.writer.guid.prefix)?;
        let source = GapSource {
            encoder: self.encoder,
            reader_id,
            writer_id: self.writer.guid.entity_id,
            descriptors,
        };
        packer::run(&source, buffers, self.transport, destinations)
    }
}
