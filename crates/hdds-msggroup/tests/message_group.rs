// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

#![allow(clippy::uninlined_format_args)] // Test/bench code readability over pedantic
#![allow(clippy::cast_possible_truncation)] // Test parameters
#![allow(clippy::cast_sign_loss)] // Test data conversions
#![allow(clippy::unreadable_literal)] // Large test constants
#![allow(clippy::too_many_lines)] // Example/test code
#![allow(clippy::items_after_statements)] // Test helpers

//! Message group end-to-end tests
//!
//! Drives the GAP and DATA packers against a recording transport and checks
//! the assembled messages on the wire: framing, size bound, completeness,
//! ordering and destination fan-out.

use hdds_msggroup::protocol::constants::{
    FLAG_DATA_INLINE_QOS, FLAG_DATA_KEY, FLAG_DATA_PAYLOAD, PID_KEY_HASH, PID_STATUS_INFO,
    RTPS_HEADER_SIZE, RTPS_SUBMSG_DATA, RTPS_SUBMSG_GAP, RTPS_SUBMSG_INFO_TS,
};
use hdds_msggroup::{
    ChangeKind, ChangeRecord, Destinations, GapDescriptor, GroupConfig, GroupError, GroupWriter,
    Guid, Locator, MessageBuffers, MessageGroup, Parameter, ParameterList, RtpsEncoder,
    SequenceNumber, SubmessageIter, SubmessageKind, TopicKind, Transport, TransportError,
    WriterContext, ENTITYID_UNKNOWN,
};
use parking_lot::Mutex;
use std::sync::Arc;

// ============================================================================
// Helpers
// ============================================================================

const WRITER_ID: [u8; 4] = [0x00, 0x00, 0x01, 0x02];
const PREFIX: [u8; 12] = [0x42; 12];

#[derive(Default)]
struct RecordingTransport {
    sent: Mutex<Vec<(Locator, Vec<u8>)>>,
    failing: Vec<Locator>,
}

impl RecordingTransport {
    fn failing_on(locators: &[Locator]) -> Self {
        Self {
            failing: locators.to_vec(),
            ..Self::default()
        }
    }

    fn messages(&self) -> Vec<Vec<u8>> {
        self.sent.lock().iter().map(|(_, m)| m.clone()).collect()
    }

    fn destinations(&self) -> Vec<Locator> {
        self.sent.lock().iter().map(|(l, _)| *l).collect()
    }
}

impl Transport for RecordingTransport {
    fn send_sync(&self, message: &[u8], locator: &Locator) -> Result<(), TransportError> {
        self.sent.lock().push((*locator, message.to_vec()));
        if self.failing.contains(locator) {
            return Err(TransportError::UnsupportedLocator(*locator));
        }
        Ok(())
    }
}

fn context(topic_kind: TopicKind) -> WriterContext {
    WriterContext::new(Guid::new(PREFIX, WRITER_ID), topic_kind)
}

fn loc(last: u8) -> Locator {
    Locator::udp_v4([10, 0, 0, last], 7411)
}

fn mc(last: u8) -> Locator {
    Locator::udp_v4([239, 255, 0, last], 7401)
}

fn sns(values: &[u64]) -> Vec<SequenceNumber> {
    values.iter().copied().map(SequenceNumber::new).collect()
}

fn read_u32_le(buf: &[u8], offset: usize) -> u32 {
    u32::from_le_bytes([buf[offset], buf[offset + 1], buf[offset + 2], buf[offset + 3]])
}

fn read_sn(buf: &[u8], offset: usize) -> u64 {
    (u64::from(read_u32_le(buf, offset)) << 32) | u64::from(read_u32_le(buf, offset + 4))
}

/// Submessage ids in order.
fn submessage_ids(message: &[u8]) -> Vec<u8> {
    SubmessageIter::new(message)
        .expect("rtps header")
        .map(|s| s.id)
        .collect()
}

/// Writer SNs of the DATA submessages of a message.
fn data_sequence_numbers(message: &[u8]) -> Vec<u64> {
    SubmessageIter::new(message)
        .expect("rtps header")
        .filter(|s| s.id == RTPS_SUBMSG_DATA)
        .map(|s| read_sn(s.body, 12))
        .collect()
}

/// (gapStart, base, numBits) of each GAP submessage of a message.
fn gap_fields(message: &[u8]) -> Vec<(u64, u64, u32)> {
    SubmessageIter::new(message)
        .expect("rtps header")
        .filter(|s| s.id == RTPS_SUBMSG_GAP)
        .map(|s| (read_sn(s.body, 8), read_sn(s.body, 16), read_u32_le(s.body, 24)))
        .collect()
}

/// Expand one GAP body into the sequence numbers it declares irrelevant.
fn gap_expand(body: &[u8]) -> Vec<u64> {
    let start = read_sn(body, 8);
    let base = read_sn(body, 16);
    let num_bits = read_u32_le(body, 24);
    let mut out: Vec<u64> = (start..base).collect();
    for bit in 0..num_bits {
        let word = read_u32_le(body, 28 + (bit / 32) as usize * 4);
        if word & (1 << (31 - bit % 32)) != 0 {
            out.push(base + u64::from(bit));
        }
    }
    out
}

/// Change whose DATA submessage is exactly `submessage_len` bytes (multiple of 4, >= 24).
fn change_with_submessage_len(sn: u64, submessage_len: usize) -> ChangeRecord {
    ChangeRecord::alive(sn, vec![0xCD; submessage_len - 24])
}

// ============================================================================
// GAP packing
// ============================================================================

#[test]
fn test_single_gap() {
    let transport = RecordingTransport::default();
    let ctx = context(TopicKind::NoKey);
    let group = MessageGroup::new(&RtpsEncoder, &transport, &ctx);
    let mut buffers = MessageBuffers::new(1400);

    let report = group
        .send_changes_as_gap(&mut buffers, &sns(&[5]), ENTITYID_UNKNOWN, &[loc(1)], &[])
        .expect("gap fits");

    assert_eq!(report.messages, 1);
    assert_eq!(report.submessages, 1);
    let messages = transport.messages();
    assert_eq!(&messages[0][..4], b"RTPS");
    assert_eq!(&messages[0][8..RTPS_HEADER_SIZE], &PREFIX);
    assert_eq!(submessage_ids(&messages[0]), vec![RTPS_SUBMSG_GAP]);
    assert_eq!(gap_fields(&messages[0]), vec![(5, 6, 0)]);
}

#[test]
fn test_contiguous_run_single_gap() {
    let transport = RecordingTransport::default();
    let ctx = context(TopicKind::NoKey);
    let group = MessageGroup::new(&RtpsEncoder, &transport, &ctx);
    let mut buffers = MessageBuffers::new(1400);

    group
        .send_changes_as_gap(
            &mut buffers,
            &sns(&[8, 6, 5, 7]),
            ENTITYID_UNKNOWN,
            &[loc(1)],
            &[],
        )
        .expect("gap fits");

    let messages = transport.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(gap_fields(&messages[0]), vec![(5, 9, 0)]);
}

#[test]
fn test_run_with_sparse_tail() {
    let transport = RecordingTransport::default();
    let ctx = context(TopicKind::NoKey);
    let group = MessageGroup::new(&RtpsEncoder, &transport, &ctx);
    let mut buffers = MessageBuffers::new(1400);

    group
        .send_changes_as_gap(
            &mut buffers,
            &sns(&[5, 6, 7, 10]),
            ENTITYID_UNKNOWN,
            &[loc(1)],
            &[],
        )
        .expect("gap fits");

    let messages = transport.messages();
    assert_eq!(gap_fields(&messages[0]), vec![(5, 7, 4)]);
    let body = SubmessageIter::new(&messages[0])
        .expect("rtps header")
        .next()
        .expect("one gap")
        .body;
    assert_eq!(gap_expand(body), vec![5, 6, 7, 10]);
}

#[test]
fn test_gap_reader_and_writer_ids() {
    let transport = RecordingTransport::default();
    let ctx = context(TopicKind::NoKey);
    let group = MessageGroup::new(&RtpsEncoder, &transport, &ctx);
    let mut buffers = MessageBuffers::new(1400);
    let reader_id = [0x00, 0x00, 0x01, 0x07];

    group
        .send_changes_as_gap(&mut buffers, &sns(&[1]), reader_id, &[loc(1)], &[])
        .expect("gap fits");

    let messages = transport.messages();
    let gap = SubmessageIter::new(&messages[0])
        .expect("rtps header")
        .next()
        .expect("one gap");
    assert_eq!(&gap.body[0..4], &reader_id);
    assert_eq!(&gap.body[4..8], &WRITER_ID);
}

#[test]
fn test_gap_descriptors_split_across_messages() {
    // Each GAP without bitmap is 32 bytes; 64-byte budget holds header + 1
    let transport = RecordingTransport::default();
    let ctx = context(TopicKind::NoKey);
    let group = MessageGroup::new(&RtpsEncoder, &transport, &ctx);
    let mut buffers = MessageBuffers::new(64);
    let descriptors: Vec<_> = [1u64, 1000, 2000]
        .iter()
        .map(|&sn| GapDescriptor::single(SequenceNumber::new(sn)))
        .collect();

    let target = loc(1);
    let report = group
        .send_gap_descriptors(
            &mut buffers,
            &descriptors,
            ENTITYID_UNKNOWN,
            Destinations::single(&target),
        )
        .expect("each gap fits");

    assert_eq!(report.messages, 3);
    let starts: Vec<u64> = transport
        .messages()
        .iter()
        .flat_map(|m| gap_fields(m))
        .map(|(start, _, _)| start)
        .collect();
    assert_eq!(starts, vec![1, 1000, 2000]);
    assert!(transport.messages().iter().all(|m| m.len() <= 64));
}

#[test]
fn test_empty_gap_is_noop() {
    let transport = RecordingTransport::default();
    let ctx = context(TopicKind::NoKey);
    let group = MessageGroup::new(&RtpsEncoder, &transport, &ctx);
    let mut buffers = MessageBuffers::new(1400);

    let report = group
        .send_changes_as_gap(&mut buffers, &[], ENTITYID_UNKNOWN, &[loc(1)], &[mc(1)])
        .expect("empty input");
    assert_eq!(report.messages, 0);
    assert_eq!(report.attempts, 0);
    assert!(transport.messages().is_empty());
}

#[test]
fn test_gap_at_top_of_sequence_range() {
    let transport = RecordingTransport::default();
    let ctx = context(TopicKind::NoKey);
    let group = MessageGroup::new(&RtpsEncoder, &transport, &ctx);
    let mut buffers = MessageBuffers::new(1400);
    let max = SequenceNumber::MAX.value();

    group
        .send_changes_as_gap(
            &mut buffers,
            &sns(&[max, max - 1]),
            ENTITYID_UNKNOWN,
            &[loc(1)],
            &[],
        )
        .expect("largest valid sequence numbers");

    let messages = transport.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(gap_fields(&messages[0]), vec![(max - 1, max, 1)]);
    let sub = SubmessageIter::new(&messages[0])
        .expect("rtps header")
        .next()
        .expect("gap submessage");
    assert_eq!(gap_expand(sub.body), vec![max - 1, max]);
}

#[test]
fn test_out_of_range_sequence_numbers_rejected() {
    let transport = RecordingTransport::default();
    let ctx = context(TopicKind::NoKey);
    let group = MessageGroup::new(&RtpsEncoder, &transport, &ctx);
    let mut buffers = MessageBuffers::new(1400);

    let err = group
        .send_changes_as_gap(
            &mut buffers,
            &sns(&[u64::MAX - 1, u64::MAX]),
            ENTITYID_UNKNOWN,
            &[loc(1)],
            &[],
        )
        .unwrap_err();
    assert!(matches!(err, GroupError::InvalidSequenceNumber(sn) if sn.value() >= u64::MAX - 1));

    let descriptor = GapDescriptor::single(SequenceNumber::MAX + 1);
    let err = group
        .send_gap_descriptors(
            &mut buffers,
            &[descriptor],
            ENTITYID_UNKNOWN,
            Destinations::single(&loc(1)),
        )
        .unwrap_err();
    assert!(matches!(err, GroupError::InvalidSequenceNumber(_)));

    let changes = vec![
        ChangeRecord::alive(1u64, vec![0; 8]),
        ChangeRecord::alive(u64::MAX, vec![0; 8]),
    ];
    let err = group
        .send_changes_as_data(&mut buffers, &changes, &[loc(1)], &[], false, ENTITYID_UNKNOWN)
        .unwrap_err();
    assert!(matches!(err, GroupError::InvalidSequenceNumber(sn) if sn.value() == u64::MAX));

    assert!(transport.messages().is_empty());
}

// ============================================================================
// DATA packing
// ============================================================================

#[test]
fn test_data_tight_budget() {
    let transport = RecordingTransport::default();
    let ctx = context(TopicKind::NoKey);
    let group = MessageGroup::new(&RtpsEncoder, &transport, &ctx);
    let mut buffers = MessageBuffers::new(250);
    let changes: Vec<_> = (1..=3).map(|sn| change_with_submessage_len(sn, 100)).collect();

    let report = group
        .send_changes_as_data(&mut buffers, &changes, &[loc(1)], &[], false, ENTITYID_UNKNOWN)
        .expect("all records fit");

    assert_eq!(report.messages, 2);
    assert_eq!(report.submessages, 3);
    let messages = transport.messages();
    assert_eq!(messages[0].len(), 20 + 12 + 100 + 100);
    assert_eq!(messages[1].len(), 20 + 12 + 100);
    assert_eq!(
        submessage_ids(&messages[0]),
        vec![RTPS_SUBMSG_INFO_TS, RTPS_SUBMSG_DATA, RTPS_SUBMSG_DATA]
    );
    assert_eq!(
        submessage_ids(&messages[1]),
        vec![RTPS_SUBMSG_INFO_TS, RTPS_SUBMSG_DATA]
    );
    assert_eq!(data_sequence_numbers(&messages[0]), vec![1, 2]);
    assert_eq!(data_sequence_numbers(&messages[1]), vec![3]);
}

#[test]
fn test_data_oversize_record() {
    let transport = RecordingTransport::default();
    let ctx = context(TopicKind::NoKey);
    let group = MessageGroup::new(&RtpsEncoder, &transport, &ctx);
    let mut buffers = MessageBuffers::new(250);
    let changes = vec![change_with_submessage_len(7, 240)];

    let err = group
        .send_changes_as_data(&mut buffers, &changes, &[loc(1)], &[mc(1)], false, ENTITYID_UNKNOWN)
        .unwrap_err();

    match err {
        GroupError::OversizeSubmessage {
            kind,
            sequence_number,
            submessage_len,
            prefix_len,
            max_message_size,
        } => {
            assert_eq!(kind, SubmessageKind::Data);
            assert_eq!(sequence_number, SequenceNumber::new(7));
            assert_eq!(submessage_len, 240);
            assert_eq!(prefix_len, 32);
            assert_eq!(max_message_size, 250);
        }
        other => panic!("expected oversize error, got {other}"),
    }
    assert!(transport.messages().is_empty());
}

#[test]
fn test_data_oversize_after_sent_records() {
    let transport = RecordingTransport::default();
    let ctx = context(TopicKind::NoKey);
    let group = MessageGroup::new(&RtpsEncoder, &transport, &ctx);
    let mut buffers = MessageBuffers::new(250);
    let changes = vec![
        change_with_submessage_len(1, 40),
        change_with_submessage_len(2, 400),
        change_with_submessage_len(3, 40),
    ];

    let err = group
        .send_changes_as_data(&mut buffers, &changes, &[loc(1)], &[], false, ENTITYID_UNKNOWN)
        .unwrap_err();

    assert!(matches!(
        err,
        GroupError::OversizeSubmessage { sequence_number, .. } if sequence_number.value() == 2
    ));
    let messages = transport.messages();
    assert_eq!(messages.len(), 1);
    assert_eq!(data_sequence_numbers(&messages[0]), vec![1]);
}

#[test]
fn test_data_single_locator_mode() {
    let transport = RecordingTransport::default();
    let ctx = context(TopicKind::NoKey);
    let group = MessageGroup::new(&RtpsEncoder, &transport, &ctx);
    let mut buffers = MessageBuffers::new(250);
    let changes: Vec<_> = (1..=5).map(|sn| change_with_submessage_len(sn, 100)).collect();
    let target = loc(9);

    let report = group
        .send_changes_as_data_to_locator(&mut buffers, &changes, &target, false, ENTITYID_UNKNOWN)
        .expect("all records fit");

    assert_eq!(report.messages, 3);
    assert_eq!(report.attempts, 3);
    assert!(transport.destinations().iter().all(|l| *l == target));
    let all: Vec<u64> = transport
        .messages()
        .iter()
        .flat_map(|m| data_sequence_numbers(m))
        .collect();
    assert_eq!(all, vec![1, 2, 3, 4, 5]);
}

#[test]
fn test_data_fan_out_order() {
    let transport = RecordingTransport::default();
    let ctx = context(TopicKind::NoKey);
    let group = MessageGroup::new(&RtpsEncoder, &transport, &ctx);
    let mut buffers = MessageBuffers::new(250);
    let changes: Vec<_> = (1..=3).map(|sn| change_with_submessage_len(sn, 100)).collect();
    let unicast = [loc(1), loc(2)];
    let multicast = [mc(1)];

    let report = group
        .send_changes_as_data(
            &mut buffers,
            &changes,
            &unicast,
            &multicast,
            false,
            ENTITYID_UNKNOWN,
        )
        .expect("all records fit");

    // 2 messages x (2 unicast + 1 multicast)
    assert_eq!(report.attempts, 6);
    assert_eq!(
        transport.destinations(),
        vec![loc(1), loc(2), mc(1), loc(1), loc(2), mc(1)]
    );
}

#[test]
fn test_transport_failure_reported() {
    let transport = RecordingTransport::failing_on(&[loc(2)]);
    let ctx = context(TopicKind::NoKey);
    let group = MessageGroup::new(&RtpsEncoder, &transport, &ctx);
    let mut buffers = MessageBuffers::new(250);
    let changes: Vec<_> = (1..=3).map(|sn| change_with_submessage_len(sn, 100)).collect();

    let report = group
        .send_changes_as_data(
            &mut buffers,
            &changes,
            &[loc(1), loc(2)],
            &[mc(1)],
            false,
            ENTITYID_UNKNOWN,
        )
        .expect("transport failures do not abort packing");

    assert_eq!(report.attempts, 6);
    assert_eq!(transport.destinations().len(), 6);
    let failed: Vec<_> = report.failures.iter().map(|f| (f.message_index, f.locator)).collect();
    assert_eq!(failed, vec![(0, loc(2)), (1, loc(2))]);
    assert!(matches!(
        report.ensure_delivered(),
        Err(GroupError::Delivery { failures }) if failures.len() == 2
    ));
}

#[test]
fn test_inline_qos_only_when_expected() {
    let mut qos = ParameterList::new();
    qos.push(Parameter::new(0x0005, b"tp\0\0".to_vec()))
        .expect("valid pid");
    let ctx = context(TopicKind::NoKey).with_inline_qos(qos);
    let changes = vec![ChangeRecord::alive(1u64, vec![0; 8])];

    let flags_for = |expects: bool, ctx: &WriterContext| {
        let transport = RecordingTransport::default();
        let group = MessageGroup::new(&RtpsEncoder, &transport, ctx);
        let mut buffers = MessageBuffers::new(1400);
        group
            .send_changes_as_data(&mut buffers, &changes, &[loc(1)], &[], expects, ENTITYID_UNKNOWN)
            .expect("fits");
        let message = transport.messages().remove(0);
        SubmessageIter::new(&message)
            .expect("rtps header")
            .find(|s| s.id == RTPS_SUBMSG_DATA)
            .map(|s| s.flags)
            .expect("one data")
    };

    assert_ne!(flags_for(true, &ctx) & FLAG_DATA_INLINE_QOS, 0);
    assert_eq!(flags_for(false, &ctx) & FLAG_DATA_INLINE_QOS, 0);
    // Requested but empty: nothing attached
    let empty = context(TopicKind::NoKey);
    assert_eq!(flags_for(true, &empty) & FLAG_DATA_INLINE_QOS, 0);
    assert_ne!(flags_for(true, &empty) & FLAG_DATA_PAYLOAD, 0);
}

#[test]
fn test_not_alive_keyed_change() {
    let transport = RecordingTransport::default();
    let ctx = context(TopicKind::WithKey);
    let group = MessageGroup::new(&RtpsEncoder, &transport, &ctx);
    let mut buffers = MessageBuffers::new(1400);
    let changes = vec![ChangeRecord::not_alive(
        4u64,
        ChangeKind::NotAliveDisposedUnregistered,
        [0x5A; 16],
    )];

    group
        .send_changes_as_data(&mut buffers, &changes, &[loc(1)], &[], false, ENTITYID_UNKNOWN)
        .expect("fits");

    let message = transport.messages().remove(0);
    let data = SubmessageIter::new(&message)
        .expect("rtps header")
        .find(|s| s.id == RTPS_SUBMSG_DATA)
        .expect("one data");
    assert_ne!(data.flags & FLAG_DATA_KEY, 0);
    assert_eq!(data.flags & FLAG_DATA_PAYLOAD, 0);
    assert_eq!(u16::from_le_bytes([data.body[20], data.body[21]]), PID_KEY_HASH);
    assert_eq!(&data.body[24..40], &[0x5A; 16]);
    assert_eq!(u16::from_le_bytes([data.body[40], data.body[41]]), PID_STATUS_INFO);
    assert_eq!(data.body[47], 0x03);
}

#[test]
fn test_buffers_reused_across_calls() {
    let transport = RecordingTransport::default();
    let ctx = context(TopicKind::NoKey);
    let group = MessageGroup::new(&RtpsEncoder, &transport, &ctx);
    let mut buffers = MessageBuffers::new(250);

    let big: Vec<_> = (1..=3).map(|sn| change_with_submessage_len(sn, 100)).collect();
    group
        .send_changes_as_data(&mut buffers, &big, &[loc(1)], &[], false, ENTITYID_UNKNOWN)
        .expect("fits");
    group
        .send_changes_as_gap(&mut buffers, &sns(&[10]), ENTITYID_UNKNOWN, &[loc(1)], &[])
        .expect("fits");

    let messages = transport.messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(submessage_ids(&messages[2]), vec![RTPS_SUBMSG_GAP]);
    assert_eq!(messages[2].len(), RTPS_HEADER_SIZE + 32);
}

// ============================================================================
// Randomized properties
// ============================================================================

#[test]
fn test_gap_packing_completeness_random() {
    let mut rng = fastrand::Rng::with_seed(0x5EED_0001);
    for _ in 0..50 {
        let count = rng.usize(1..300);
        let mut input: Vec<u64> = (0..count).map(|_| rng.u64(1..2_000)).collect();

        let transport = RecordingTransport::default();
        let ctx = context(TopicKind::NoKey);
        let group = MessageGroup::new(&RtpsEncoder, &transport, &ctx);
        let mut buffers = MessageBuffers::new(rng.usize(128..1400));

        group
            .send_changes_as_gap(&mut buffers, &sns(&input), ENTITYID_UNKNOWN, &[loc(1)], &[])
            .expect("gaps always fit");

        let max = buffers.max_message_size();
        let mut covered = Vec::new();
        for message in transport.messages() {
            assert!(message.len() <= max);
            for sub in SubmessageIter::new(&message).expect("rtps header") {
                covered.extend(gap_expand(sub.body));
            }
        }

        input.sort_unstable();
        input.dedup();
        covered.sort_unstable();
        assert_eq!(covered, input, "every sequence number announced exactly once");
    }
}

#[test]
fn test_data_packing_bound_and_order_random() {
    let mut rng = fastrand::Rng::with_seed(0x5EED_0002);
    for _ in 0..50 {
        let max = rng.usize(200..2000);
        let count = rng.usize(1..60);
        // Largest record that fits: max - header - INFO_TS
        let changes: Vec<_> = (1..=count as u64)
            .map(|sn| {
                let len = 24 + 4 * rng.usize(0..=(max - 32 - 24) / 4);
                change_with_submessage_len(sn, len)
            })
            .collect();
        let unicast: Vec<_> = (0..rng.u8(0..3)).map(loc).collect();
        let multicast: Vec<_> = (0..rng.u8(0..2)).map(mc).collect();

        let transport = RecordingTransport::default();
        let ctx = context(TopicKind::NoKey);
        let group = MessageGroup::new(&RtpsEncoder, &transport, &ctx);
        let mut buffers = MessageBuffers::new(max);

        let report = group
            .send_changes_as_data(
                &mut buffers,
                &changes,
                &unicast,
                &multicast,
                false,
                ENTITYID_UNKNOWN,
            )
            .expect("every record fits on its own");

        let fan_out = unicast.len() + multicast.len();
        assert_eq!(report.attempts, report.messages * fan_out);
        assert_eq!(report.submessages, count);

        let sent = transport.messages();
        assert_eq!(sent.len(), report.messages * fan_out);
        let mut seen = Vec::new();
        for message in sent.iter().step_by(fan_out.max(1)) {
            assert!(message.len() <= max);
            assert_eq!(submessage_ids(message)[0], RTPS_SUBMSG_INFO_TS);
            seen.extend(data_sequence_numbers(message));
        }
        if fan_out > 0 {
            assert_eq!(seen, (1..=count as u64).collect::<Vec<_>>());
        }
    }
}

// ============================================================================
// GroupWriter
// ============================================================================

#[test]
fn test_group_writer_concurrent_senders() {
    let transport = Arc::new(RecordingTransport::default());
    let config = GroupConfig::default().with_max_message_size(1400);
    let writer = Arc::new(
        GroupWriter::new(
            context(TopicKind::NoKey),
            RtpsEncoder,
            Arc::clone(&transport),
            &config,
        )
        .expect("valid config"),
    );

    let handles: Vec<_> = (0..4u64)
        .map(|t| {
            let writer = Arc::clone(&writer);
            std::thread::spawn(move || {
                for i in 0..25u64 {
                    let sn = t * 100 + i + 1;
                    let changes = [ChangeRecord::alive(sn, vec![t as u8; 16])];
                    writer
                        .send_changes_as_data(&changes, &[loc(1)], &[], false, ENTITYID_UNKNOWN)
                        .expect("fits");
                }
            })
        })
        .collect();
    for handle in handles {
        handle.join().expect("sender thread");
    }

    let messages = transport.messages();
    assert_eq!(messages.len(), 100);
    for message in &messages {
        // Each message is complete: INFO_TS + exactly one DATA
        assert_eq!(
            submessage_ids(message),
            vec![RTPS_SUBMSG_INFO_TS, RTPS_SUBMSG_DATA]
        );
    }
}

#[test]
fn test_group_writer_rejects_invalid_config() {
    let config = GroupConfig::default().with_max_message_size(16);
    let result = GroupWriter::new(
        context(TopicKind::NoKey),
        RtpsEncoder,
        RecordingTransport::default(),
        &config,
    );
    assert!(matches!(result, Err(GroupError::Config(_))));
}

#[test]
fn test_group_writer_gap_and_data() {
    let config = GroupConfig::default().with_max_message_size(250);
    let writer = GroupWriter::new(
        context(TopicKind::NoKey),
        RtpsEncoder,
        RecordingTransport::default(),
        &config,
    )
    .expect("valid config");
    assert_eq!(writer.max_message_size(), 250);

    let changes: Vec<_> = (1..=3).map(|sn| change_with_submessage_len(sn, 100)).collect();
    let target = loc(3);
    writer
        .send_changes_as_data_to_locator(&changes, &target, false, ENTITYID_UNKNOWN)
        .expect("fits");
    writer
        .send_changes_as_gap(&sns(&[4, 5]), ENTITYID_UNKNOWN, &[target], &[])
        .expect("fits");

    let messages = writer.transport().messages();
    assert_eq!(messages.len(), 3);
    assert_eq!(gap_fields(&messages[2]), vec![(4, 6, 0)]);
}
