// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! SequenceNumberSet and GAP descriptors (RTPS 2.3 Sec.9.4.2.6 / 8.3.7.4)
//!
//! A `SequenceNumberSet` is a base plus a 256-bit bitmap: bit *i* set means
//! `base + i` belongs to the set. Bits are numbered MSB-first inside each
//! 32-bit word, as on the wire.
//!
//! A `GapDescriptor` is the payload of one GAP submessage:
//!
//! ```text
//! irrelevant = [gap_start, gap_list.base) U { n in gap_list }
//! ```

use super::types::SequenceNumber;

pub const MAX_BITMAP_BITS: u32 = 256;
pub const WORD_BITS: u32 = 32;
pub const BITMAP_WORDS: usize = 8;

/// SequenceNumberSet representation used by GAP submessages.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SequenceNumberSet {
    base: SequenceNumber,
    num_bits: u32,
    bitmap: [u32; BITMAP_WORDS],
}

impl SequenceNumberSet {
    /// Maximum number of bitmap bits (RTPS limit).
    pub const MAX_BITS: u32 = MAX_BITMAP_BITS;

    /// Create an empty set with the provided base sequence number.
    #[must_use]
    pub fn empty(base: SequenceNumber) -> Self {
        Self {
            base,
            num_bits: 0,
            bitmap: [0; BITMAP_WORDS],
        }
    }

    /// Add `seq` to the set.
    ///
    /// Returns `false` (set unchanged) when `seq` is below the base or
    /// beyond the bitmap capacity.
    pub fn add(&mut self, seq: SequenceNumber) -> bool {
        let offset = match seq.offset_from(self.base) {
            Some(offset) if offset < u64::from(MAX_BITMAP_BITS) => offset as u32,
            _ => return false,
        };

        let word = (offset / WORD_BITS) as usize;
        let bit = offset % WORD_BITS;
        self.bitmap[word] |= 1 << (31 - bit);
        self.num_bits = self.num_bits.max(offset + 1);
        true
    }

    /// Move the base of an empty set.
    ///
    /// Returns `false` if bits are already set (they would shift meaning).
    pub fn rebase(&mut self, base: SequenceNumber) -> bool {
        if self.num_bits != 0 {
            return false;
        }
        self.base = base;
        true
    }

    /// Base sequence number of the set.
    pub fn base(&self) -> SequenceNumber {
        self.base
    }

    /// Number of bitmap bits actually used (highest offset + 1).
    pub fn num_bits(&self) -> u32 {
        self.num_bits
    }

    /// Number of bitmap words that need to be transmitted.
    pub fn word_count(&self) -> usize {
        self.num_bits.div_ceil(WORD_BITS) as usize
    }

    /// Bitmap words to transmit (`word_count()` of them).
    pub fn words(&self) -> &[u32] {
        &self.bitmap[..self.word_count()]
    }

    pub fn is_empty(&self) -> bool {
        self.num_bits == 0
    }

    pub fn contains(&self, seq: SequenceNumber) -> bool {
        match seq.offset_from(self.base) {
            Some(offset) if offset < u64::from(self.num_bits) => {
                let offset = offset as u32;
                let mask = 1u32 << (31 - offset % WORD_BITS);
                self.bitmap[(offset / WORD_BITS) as usize] & mask != 0
            }
            _ => false,
        }
    }

    /// Iterate through all sequence numbers contained in the set.
    pub fn iter(&self) -> SequenceNumberIter<'_> {
        SequenceNumberIter {
            set: self,
            index: 0,
        }
    }
}

/// Iterator over sequences contained in a `SequenceNumberSet`.
#[derive(Clone)]
pub struct SequenceNumberIter<'a> {
    set: &'a SequenceNumberSet,
    index: u32,
}

impl Iterator for SequenceNumberIter<'_> {
    type Item = SequenceNumber;

    fn next(&mut self) -> Option<Self::Item> {
        while self.index < self.set.num_bits {
            let offset = self.index;
            self.index += 1;
            let mask = 1u32 << (31 - offset % WORD_BITS);
            if self.set.bitmap[(offset / WORD_BITS) as usize] & mask != 0 {
                return Some(self.set.base + u64::from(offset));
            }
        }
        None
    }
}

impl<'a> IntoIterator for &'a SequenceNumberSet {
    type Item = SequenceNumber;
    type IntoIter = SequenceNumberIter<'a>;

    fn into_iter(self) -> Self::IntoIter {
        self.iter()
    }
}

/// Payload of one GAP submessage: a contiguous prefix plus a bitmap.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct GapDescriptor {
    gap_start: SequenceNumber,
    gap_list: SequenceNumberSet,
}

impl GapDescriptor {
    /// Descriptor for the single sequence number `seq` (base = seq + 1).
    #[must_use]
    pub fn single(seq: SequenceNumber) -> Self {
        Self {
            gap_start: seq,
            gap_list: SequenceNumberSet::empty(seq + 1),
        }
    }

    #[must_use]
    pub fn new(gap_start: SequenceNumber, gap_list: SequenceNumberSet) -> Self {
        Self {
            gap_start,
            gap_list,
        }
    }

    /// First irrelevant sequence number (inclusive).
    pub fn gap_start(&self) -> SequenceNumber {
        self.gap_start
    }

    /// Bitmap of additional irrelevant sequences.
    pub fn gap_list(&self) -> &SequenceNumberSet {
        &self.gap_list
    }

    pub(crate) fn gap_list_mut(&mut self) -> &mut SequenceNumberSet {
        &mut self.gap_list
    }

    /// Shorthand for `gap_list().base()`.
    pub fn base(&self) -> SequenceNumber {
        self.gap_list.base
    }

    /// Expand into explicit sequence numbers, ascending.
    pub fn sequence_numbers(&self) -> Vec<SequenceNumber> {
        let prefix = (self.gap_start.value()..self.gap_list.base.value()).map(SequenceNumber::new);
        let mut seqs: Vec<SequenceNumber> = prefix.chain(self.gap_list.iter()).collect();
        seqs.sort_unstable();
        seqs.dedup();
        seqs
    }

    pub fn contains(&self, seq: SequenceNumber) -> bool {
        (seq >= self.gap_start && seq < self.gap_list.base) || self.gap_list.contains(seq)
    }
}
