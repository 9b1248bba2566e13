// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! Submessage encoder used by the message group.
//!
//! The packers never build bytes themselves: they hand a borrowed view of
//! what to send (`GapSubmessage`, `DataSubmessage`) to a `SubmessageEncoder`
//! which appends the wire form to a bounded `MessageBuffer`.
//!
//! ```text
//! +-------------------------------------------------------------+
//! |                   SubmessageEncoder trait                   |
//! +-------------------------------------------------------------+
//! | encode_header()  encode_info_ts()                           |
//! | encode_gap()     encode_data()                              |
//! +-------------------------------------------------------------+
//!                              |
//!                              v
//!                      +---------------+
//!                      |  RtpsEncoder  |
//!                      | (little-end.) |
//!                      +---------------+
//! ```
//!
//! All submessages are written little-endian (E flag set). The
//! `octetsToNextHeader` field is reserved first and back-patched once the
//! body length is known.

use super::buffer::{EncodeError, EncodeResult, MessageBuffer};
use super::constants::{
    DATA_OCTETS_TO_INLINE_QOS, FLAG_DATA_INLINE_QOS, FLAG_DATA_KEY, FLAG_DATA_PAYLOAD,
    FLAG_ENDIANNESS, HDDS_VENDOR_ID, PID_KEY_HASH, PID_SENTINEL, PID_STATUS_INFO, RTPS_MAGIC,
    RTPS_SUBMSG_DATA, RTPS_SUBMSG_GAP, RTPS_SUBMSG_HEADER_SIZE, RTPS_SUBMSG_INFO_TS,
    RTPS_SUBMSG_MAX_BODY, RTPS_VERSION_MAJOR, RTPS_VERSION_MINOR,
};
use super::parameter::{Parameter, ParameterList};
use super::seqset::GapDescriptor;
use super::types::{ChangeRecord, EntityId, GuidPrefix, SequenceNumber, Timestamp, TopicKind};

/// CDR little-endian encapsulation header prepended to a serialized key.
const CDR_LE_ENCAPSULATION: [u8; 4] = [0x00, 0x01, 0x00, 0x00];

/// One GAP submessage to encode.
#[derive(Debug, Clone, Copy)]
pub struct GapSubmessage<'a> {
    pub reader_id: EntityId,
    pub writer_id: EntityId,
    pub descriptor: &'a GapDescriptor,
}

/// One DATA submessage to encode.
#[derive(Debug, Clone, Copy)]
pub struct DataSubmessage<'a> {
    pub reader_id: EntityId,
    pub writer_id: EntityId,
    pub change: &'a ChangeRecord,
    pub topic_kind: TopicKind,
    /// Writer-supplied inline QoS, already filtered by the caller
    /// (`None` when the reader does not expect it or the list is empty).
    pub inline_qos: Option<&'a ParameterList>,
}

/// Appends RTPS header and submessages to a bounded buffer.
///
/// Implementations must leave `out` untouched past its previous length when
/// they return an error the caller may want to recover from; the packers
/// reset their scratch buffer before every call regardless.
pub trait SubmessageEncoder: Send + Sync {
    /// RTPS message header: magic, version, vendor, GUID prefix (20 bytes).
    fn encode_header(&self, prefix: &GuidPrefix, out: &mut MessageBuffer) -> EncodeResult<()>;

    /// INFO_TS submessage carrying `timestamp`.
    fn encode_info_ts(&self, timestamp: Timestamp, out: &mut MessageBuffer) -> EncodeResult<()>;

    /// GAP submessage describing one `GapDescriptor`.
    fn encode_gap(&self, gap: &GapSubmessage<'_>, out: &mut MessageBuffer) -> EncodeResult<()>;

    /// DATA submessage for one change record.
    fn encode_data(&self, data: &DataSubmessage<'_>, out: &mut MessageBuffer) -> EncodeResult<()>;
}

impl<E: SubmessageEncoder + ?Sized> SubmessageEncoder for &E {
    fn encode_header(&self, prefix: &GuidPrefix, out: &mut MessageBuffer) -> EncodeResult<()> {
        (**self).encode_header(prefix, out)
    }

    fn encode_info_ts(&self, timestamp: Timestamp, out: &mut MessageBuffer) -> EncodeResult<()> {
        (**self).encode_info_ts(timestamp, out)
    }

    fn encode_gap(&self, gap: &GapSubmessage<'_>, out: &mut MessageBuffer) -> EncodeResult<()> {
        (**self).encode_gap(gap, out)
    }

    fn encode_data(&self, data: &DataSubmessage<'_>, out: &mut MessageBuffer) -> EncodeResult<()> {
        (**self).encode_data(data, out)
    }
}

/// Standard RTPS 2.4 encoder with the HDDS vendor id.
#[derive(Debug, Clone, Copy, Default)]
pub struct RtpsEncoder;

impl RtpsEncoder {
    #[must_use]
    pub fn new() -> Self {
        Self
    }
}

fn write_sequence_number(out: &mut MessageBuffer, sn: SequenceNumber) -> EncodeResult<()> {
    out.write_i32_le(sn.high())?;
    out.write_u32_le(sn.low())
}

/// Write id + flags + placeholder length, return the submessage start offset.
fn begin_submessage(out: &mut MessageBuffer, id: u8, flags: u8) -> EncodeResult<usize> {
    let start = out.len();
    out.write_u8(id)?;
    out.write_u8(flags | FLAG_ENDIANNESS)?;
    out.write_u16_le(0)?;
    Ok(start)
}

/// Back-patch `octetsToNextHeader` for the submessage starting at `start`.
fn finish_submessage(out: &mut MessageBuffer, start: usize) -> EncodeResult<()> {
    let body_len = out.len() - start - RTPS_SUBMSG_HEADER_SIZE;
    let len = u16::try_from(body_len).map_err(|_| EncodeError::SubmessageTooLarge(body_len))?;
    out.patch_u16_le(start + 2, len)
}

/// Inline QoS actually written for a change: caller list, then key hash and
/// status info for NOT_ALIVE changes.
fn change_parameters(data: &DataSubmessage<'_>) -> Vec<Parameter> {
    let change = data.change;
    let mut params = Vec::new();
    if change.kind.is_alive() {
        return params;
    }
    if data.topic_kind == TopicKind::WithKey {
        params.push(Parameter::new(PID_KEY_HASH, change.instance_handle.to_vec()));
    }
    params.push(Parameter::new(
        PID_STATUS_INFO,
        vec![0, 0, 0, change.kind.status_info_flags()],
    ));
    params
}

impl SubmessageEncoder for RtpsEncoder {
    fn encode_header(&self, prefix: &GuidPrefix, out: &mut MessageBuffer) -> EncodeResult<()> {
        out.write_bytes(RTPS_MAGIC)?;
        out.write_u8(RTPS_VERSION_MAJOR)?;
        out.write_u8(RTPS_VERSION_MINOR)?;
        out.write_bytes(&HDDS_VENDOR_ID)?;
        out.write_bytes(prefix)
    }

    fn encode_info_ts(&self, timestamp: Timestamp, out: &mut MessageBuffer) -> EncodeResult<()> {
        let (seconds, fraction) = timestamp.to_rtps();
        let start = begin_submessage(out, RTPS_SUBMSG_INFO_TS, 0)?;
        out.write_i32_le(seconds)?;
        out.write_u32_le(fraction)?;
        finish_submessage(out, start)
    }

    fn encode_gap(&self, gap: &GapSubmessage<'_>, out: &mut MessageBuffer) -> EncodeResult<()> {
        let descriptor = gap.descriptor;
        let list = descriptor.gap_list();

        let start = begin_submessage(out, RTPS_SUBMSG_GAP, 0)?;
        out.write_bytes(&gap.reader_id)?;
        out.write_bytes(&gap.writer_id)?;
        write_sequence_number(out, descriptor.gap_start())?;
        write_sequence_number(out, list.base())?;
        out.write_u32_le(list.num_bits())?;
        for word in list.words() {
            out.write_u32_le(*word)?;
        }
        finish_submessage(out, start)
    }

    fn encode_data(&self, data: &DataSubmessage<'_>, out: &mut MessageBuffer) -> EncodeResult<()> {
        let change = data.change;
        let generated = change_parameters(data);
        let with_key = !change.kind.is_alive() && data.topic_kind == TopicKind::WithKey;

        let payload_len = if change.kind.is_alive() {
            change.serialized_payload.len()
        } else if with_key {
            CDR_LE_ENCAPSULATION.len() + change.instance_handle.len()
        } else {
            0
        };

        let user_qos_len = data.inline_qos.map_or(0, ParameterList::encoded_len);
        let generated_len: usize = generated.iter().map(Parameter::encoded_len).sum();
        let has_inline_qos = user_qos_len + generated_len > 0;
        let inline_qos_len = if has_inline_qos {
            user_qos_len + generated_len + 4
        } else {
            0
        };

        // extraFlags + octetsToInlineQos + readerId + writerId + writerSN
        let body_len = 20 + inline_qos_len + ((payload_len + 3) & !3);
        if body_len > RTPS_SUBMSG_MAX_BODY {
            return Err(EncodeError::SubmessageTooLarge(body_len));
        }

        let mut flags = 0;
        if has_inline_qos {
            flags |= FLAG_DATA_INLINE_QOS;
        }
        if change.kind.is_alive() && payload_len > 0 {
            flags |= FLAG_DATA_PAYLOAD;
        }
        if with_key {
            flags |= FLAG_DATA_KEY;
        }

        let start = begin_submessage(out, RTPS_SUBMSG_DATA, flags)?;
        out.write_u16_le(0)?; // extraFlags
        out.write_u16_le(DATA_OCTETS_TO_INLINE_QOS)?;
        out.write_bytes(&data.reader_id)?;
        out.write_bytes(&data.writer_id)?;
        write_sequence_number(out, change.sequence_number)?;

        if has_inline_qos {
            if let Some(qos) = data.inline_qos {
                qos.encode_params(out)?;
            }
            for param in &generated {
                param.encode(out)?;
            }
            out.write_u16_le(PID_SENTINEL)?;
            out.write_u16_le(0)?;
        }

        if change.kind.is_alive() {
            out.write_bytes(&change.serialized_payload)?;
        } else if with_key {
            out.write_bytes(&CDR_LE_ENCAPSULATION)?;
            out.write_bytes(&change.instance_handle)?;
        }
        // Submessages start 4-aligned, so aligning the buffer aligns the body
        out.align(4)?;

        finish_submessage(out, start)
    }
}
