// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Core RTPS value types consumed by the message group.
//!
//! - `SequenceNumber`: per-writer change identifier
//! - `Guid` / `GuidPrefix` / `EntityId`: endpoint identity
//! - `ChangeRecord`: one sample or erasure notice handed over by the writer
//! - `Timestamp`: INFO_TS time representation

use std::fmt;
use std::ops::{Add, Sub};
use std::time::{Duration, SystemTime, UNIX_EPOCH};

use super::constants::RTPS_GUID_PREFIX_SIZE;

/// RTPS Entity ID (4 bytes).
pub type EntityId = [u8; 4];

/// Participant GUID prefix type alias.
pub type GuidPrefix = [u8; RTPS_GUID_PREFIX_SIZE];

/// Full endpoint GUID (prefix + entity).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub struct Guid {
    pub prefix: GuidPrefix,
    pub entity_id: EntityId,
}

impl Guid {
    #[must_use]
    pub fn new(prefix: GuidPrefix, entity_id: EntityId) -> Self {
        Self { prefix, entity_id }
    }
}

impl fmt::Display for Guid {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        for b in &self.prefix {
            write!(f, "{:02x}", b)?;
        }
        write!(f, "|")?;
        for b in &self.entity_id {
            write!(f, "{:02x}", b)?;
        }
        Ok(())
    }
}

// ============================================================================
// SequenceNumber
// ============================================================================

/// RTPS sequence number (SequenceNumber_t, Sec.9.3.2).
///
/// Stored as `u64`; the wire form splits it into `high: i32` + `low: u32`,
/// so only values up to [`SequenceNumber::MAX`] can be transmitted.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct SequenceNumber(u64);

impl SequenceNumber {
    /// Largest sequence number with a wire form (`high` stays non-negative).
    pub const MAX: SequenceNumber = SequenceNumber(u64::MAX >> 1);

    #[must_use]
    pub const fn new(value: u64) -> Self {
        Self(value)
    }

    #[must_use]
    pub const fn value(self) -> u64 {
        self.0
    }

    /// High 32 bits as transmitted (`SequenceNumber_t.high`).
    #[must_use]
    pub fn high(self) -> i32 {
        (self.0 >> 32) as i32
    }

    /// Low 32 bits as transmitted (`SequenceNumber_t.low`).
    #[must_use]
    pub fn low(self) -> u32 {
        self.0 as u32
    }

    /// Rebuild from wire halves.
    #[must_use]
    pub fn from_parts(high: i32, low: u32) -> Self {
        Self(((high as i64) << 32 | low as i64) as u64)
    }

    /// True when the value fits `SequenceNumber_t` without a negative `high`.
    #[must_use]
    pub const fn is_valid(self) -> bool {
        self.0 <= Self::MAX.0
    }

    /// Distance from `base` to `self`, `None` when `self < base`.
    #[must_use]
    pub fn offset_from(self, base: SequenceNumber) -> Option<u64> {
        self.0.checked_sub(base.0)
    }
}

impl From<u64> for SequenceNumber {
    fn from(value: u64) -> Self {
        Self(value)
    }
}

impl From<SequenceNumber> for u64 {
    fn from(sn: SequenceNumber) -> Self {
        sn.0
    }
}

impl Add<u64> for SequenceNumber {
    type Output = SequenceNumber;

    fn add(self, rhs: u64) -> Self::Output {
        Self(self.0.saturating_add(rhs))
    }
}

impl Sub<u64> for SequenceNumber {
    type Output = SequenceNumber;

    fn sub(self, rhs: u64) -> Self::Output {
        Self(self.0.saturating_sub(rhs))
    }
}

impl fmt::Display for SequenceNumber {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}", self.0)
    }
}

// ============================================================================
// Topic / change kinds
// ============================================================================

/// Whether the topic type carries a key (Sec.8.2.1.2).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum TopicKind {
    #[default]
    NoKey,
    WithKey,
}

/// Kind of change stored in the writer history (Sec.8.2.1.2 ChangeKind_t).
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum ChangeKind {
    /// A new sample value.
    #[default]
    Alive,
    /// Instance disposed by the writer.
    NotAliveDisposed,
    /// Instance unregistered by the writer.
    NotAliveUnregistered,
    /// Instance both disposed and unregistered.
    NotAliveDisposedUnregistered,
}

impl ChangeKind {
    #[must_use]
    pub fn is_alive(self) -> bool {
        matches!(self, ChangeKind::Alive)
    }

    /// StatusInfo_t flags carried by PID_STATUS_INFO for NOT_ALIVE changes.
    #[must_use]
    pub fn status_info_flags(self) -> u8 {
        use super::constants::{STATUS_INFO_DISPOSED, STATUS_INFO_UNREGISTERED};
        match self {
            ChangeKind::Alive => 0,
            ChangeKind::NotAliveDisposed => STATUS_INFO_DISPOSED,
            ChangeKind::NotAliveUnregistered => STATUS_INFO_UNREGISTERED,
            ChangeKind::NotAliveDisposedUnregistered => {
                STATUS_INFO_DISPOSED | STATUS_INFO_UNREGISTERED
            }
        }
    }
}

// ============================================================================
// ChangeRecord
// ============================================================================

/// One change handed to the message group by a writer.
///
/// Immutable once built; the writer keeps ownership and the packers only
/// borrow it for the duration of a send call.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ChangeRecord {
    pub sequence_number: SequenceNumber,
    pub kind: ChangeKind,
    /// Instance key hash (all zeros for unkeyed topics).
    pub instance_handle: [u8; 16],
    /// Serialized payload including its encapsulation header.
    pub serialized_payload: Vec<u8>,
    /// Source timestamp at creation.
    pub source_timestamp: Timestamp,
}

impl ChangeRecord {
    /// ALIVE change carrying `payload`.
    #[must_use]
    pub fn alive(sequence_number: impl Into<SequenceNumber>, payload: Vec<u8>) -> Self {
        Self {
            sequence_number: sequence_number.into(),
            kind: ChangeKind::Alive,
            instance_handle: [0; 16],
            serialized_payload: payload,
            source_timestamp: Timestamp::now(),
        }
    }

    /// NOT_ALIVE change for the instance identified by `instance_handle`.
    #[must_use]
    pub fn not_alive(
        sequence_number: impl Into<SequenceNumber>,
        kind: ChangeKind,
        instance_handle: [u8; 16],
    ) -> Self {
        Self {
            sequence_number: sequence_number.into(),
            kind,
            instance_handle,
            serialized_payload: Vec::new(),
            source_timestamp: Timestamp::now(),
        }
    }

    #[must_use]
    pub fn with_instance_handle(mut self, instance_handle: [u8; 16]) -> Self {
        self.instance_handle = instance_handle;
        self
    }

    #[must_use]
    pub fn with_source_timestamp(mut self, source_timestamp: Timestamp) -> Self {
        self.source_timestamp = source_timestamp;
        self
    }
}

// ============================================================================
// Timestamp (Time_t)
// ============================================================================

/// Timestamp in nanoseconds since UNIX epoch, encoded as RTPS Time_t.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default)]
pub struct Timestamp {
    nanos: u64,
}

impl Timestamp {
    /// Current system time.
    pub fn now() -> Self {
        let duration = SystemTime::now()
            .duration_since(UNIX_EPOCH)
            .unwrap_or_else(|_| {
                log::debug!("[msggroup] system time before UNIX epoch, using timestamp 0");
                Duration::from_secs(0)
            });

        Self {
            nanos: u64::try_from(duration.as_nanos()).unwrap_or(u64::MAX),
        }
    }

    #[must_use]
    pub fn from_nanos(nanos: u64) -> Self {
        Self { nanos }
    }

    /// Create timestamp from RTPS format (seconds + fraction)
    #[must_use]
    pub fn from_rtps(seconds: i32, fraction: u32) -> Self {
        let nanos_from_secs = i64::from(seconds) * 1_000_000_000;
        let nanos_from_fraction = ((u64::from(fraction)) * 1_000_000_000) >> 32;

        Self {
            nanos: (nanos_from_secs + nanos_from_fraction as i64) as u64,
        }
    }

    #[must_use]
    pub fn as_nanos(&self) -> u64 {
        self.nanos
    }

    /// Convert to RTPS format (seconds, fraction of 2^-32 s)
    #[must_use]
    pub fn to_rtps(&self) -> (i32, u32) {
        let seconds_total = self.nanos / 1_000_000_000;
        let seconds = i32::try_from(seconds_total).unwrap_or_else(|_| {
            log::debug!(
                "[msggroup] timestamp {}ns exceeds RTPS seconds range; clamping",
                self.nanos
            );
            i32::MAX
        });

        // remainder < 1e9, so (remainder << 32) / 1e9 < 2^32
        let nanos_remainder = self.nanos % 1_000_000_000;
        let fraction = (nanos_remainder << 32) / 1_000_000_000;

        (seconds, fraction as u32)
    }
}
