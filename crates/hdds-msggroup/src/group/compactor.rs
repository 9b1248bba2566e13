// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Sequence-number compaction for GAP submessages.
//!
//! Turns an arbitrary set of irrelevant sequence numbers into the fewest
//! `GapDescriptor`s the GAP wire format allows:
//!
//! ```text
//! input : 5 6 7 . . 10 . . . . . . . 300
//! out   : [gap_start=5, base=7, bits{7,10}]  [gap_start=300, base=301]
//! ```
//!
//! Each descriptor opens with the longest contiguous run starting at its
//! first sequence number. When the run breaks, the bitmap is anchored on the
//! last run element so that it covers as much of the tail as possible; the
//! descriptor is closed once a sequence number falls outside the 256-bit
//! window, and a new one is opened at that sequence number.

use crate::error::{GroupError, Result};
use crate::protocol::seqset::{GapDescriptor, MAX_BITMAP_BITS};
use crate::protocol::types::SequenceNumber;

/// Compact `sequences` (any order, duplicates allowed) into GAP descriptors.
///
/// Every input sequence number is covered by exactly one descriptor, and
/// descriptors cover nothing outside the input. Empty input yields no
/// descriptors. Fails with [`GroupError::InvalidSequenceNumber`] if any
/// input lies above [`SequenceNumber::MAX`].
pub fn compact_sequence_numbers(sequences: &[SequenceNumber]) -> Result<Vec<GapDescriptor>> {
    if let Some(&invalid) = sequences.iter().find(|sn| !sn.is_valid()) {
        log::error!("[msggroup] cannot announce sn={} in a GAP", invalid);
        return Err(GroupError::InvalidSequenceNumber(invalid));
    }

    let mut sorted = sequences.to_vec();
    sorted.sort_unstable();
    sorted.dedup();

    let mut descriptors = Vec::new();
    let mut idx = 0usize;

    while idx < sorted.len() {
        let start = sorted[idx];
        let mut gap = GapDescriptor::single(start);
        let mut prev = start;
        idx += 1;

        // Contiguous prefix: [start, prev]
        while idx < sorted.len() && sorted[idx].offset_from(prev) == Some(1) {
            prev = sorted[idx];
            idx += 1;
        }

        let reachable = sorted.get(idx).is_some_and(|next| {
            next.offset_from(prev)
                .is_some_and(|distance| distance < u64::from(MAX_BITMAP_BITS))
        });
        // `prev + 1` past MAX has no wire form, so MAX is carried in the bitmap
        if reachable || prev == SequenceNumber::MAX {
            // Anchor the bitmap on `prev`; the prefix shrinks to [start, prev)
            let list = gap.gap_list_mut();
            list.rebase(prev);
            list.add(prev);
            while idx < sorted.len() && list.add(sorted[idx]) {
                idx += 1;
            }
        } else {
            gap.gap_list_mut().rebase(prev + 1);
        }

        log::trace!(
            "[msggroup] gap descriptor start={} base={} bits={}",
            gap.gap_start(),
            gap.base(),
            gap.gap_list().num_bits()
        );
        descriptors.push(gap);
    }

    Ok(descriptors)
}
