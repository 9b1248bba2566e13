// SPDX-License-Identifier: Apache-2.0 OR MIT
// Copyright (c) 2025-2026 naskel.com

//! RTPS protocol constants used by the message group (DDS-RTPS v2.3 Sec.8.3 / v2.5)
//!
//! Centralizes the magic numbers, submessage IDs, flags and parameter IDs
//! that the encoder and the message walker share.

use super::types::EntityId;

/// RTPS protocol magic string: "RTPS" (Sec.8.3.3.1)
pub const RTPS_MAGIC: &[u8; 4] = b"RTPS";

/// RTPS protocol version: 2.4 (Sec.8.3.3.1)
pub const RTPS_VERSION_MAJOR: u8 = 0x02;
pub const RTPS_VERSION_MINOR: u8 = 0x04;

/// HDDS Vendor ID (EXPERIMENTAL - not registered with OMG).
pub const HDDS_VENDOR_ID: [u8; 2] = [0x01, 0xAA];

// ============================================================================
// Protocol sizes (Sec.8.3.3)
// ============================================================================

/// RTPS header size (magic + version + vendor + GUID prefix)
pub const RTPS_HEADER_SIZE: usize = 20;

/// GUID prefix size (12 bytes)
pub const RTPS_GUID_PREFIX_SIZE: usize = 12;

/// Submessage header size (id + flags + octetsToNextHeader)
pub const RTPS_SUBMSG_HEADER_SIZE: usize = 4;

/// INFO_TS submessage size on the wire (header + Time_t)
pub const RTPS_INFO_TS_SIZE: usize = RTPS_SUBMSG_HEADER_SIZE + 8;

/// Largest body a submessage can declare in its 16-bit length field.
pub const RTPS_SUBMSG_MAX_BODY: usize = u16::MAX as usize;

// ============================================================================
// Submessage IDs (RTPS v2.3 Table 8.13)
// ============================================================================

/// GAP submessage ID - Indicates irrelevant sequence numbers
pub const RTPS_SUBMSG_GAP: u8 = 0x08;

/// INFO_TS submessage ID - Timestamp information
pub const RTPS_SUBMSG_INFO_TS: u8 = 0x09;

/// DATA submessage ID - Complete user data
pub const RTPS_SUBMSG_DATA: u8 = 0x15;

// ============================================================================
// Submessage flags (Sec.9.4.5)
// ============================================================================

/// E flag: submessage body is little-endian
pub const FLAG_ENDIANNESS: u8 = 0x01;
/// DATA Q flag: inline QoS present
pub const FLAG_DATA_INLINE_QOS: u8 = 0x02;
/// DATA D flag: serialized payload present
pub const FLAG_DATA_PAYLOAD: u8 = 0x04;
/// DATA K flag: serialized key present
pub const FLAG_DATA_KEY: u8 = 0x08;

/// octetsToInlineQos for a DATA submessage without extra header fields
pub const DATA_OCTETS_TO_INLINE_QOS: u16 = 16;

// ============================================================================
// Entity IDs (Sec.8.2.4.3)
// ============================================================================

/// ENTITYID_UNKNOWN: wildcard reader, "every matched reader".
pub const ENTITYID_UNKNOWN: EntityId = [0x00, 0x00, 0x00, 0x00];

// ============================================================================
// Parameter IDs (Sec.9.6.2)
// ============================================================================

/// Parameter list terminator
pub const PID_SENTINEL: u16 = 0x0001;
/// Padding parameter (ignored by receivers)
pub const PID_PAD: u16 = 0x0000;
/// Instance key hash (16 bytes)
pub const PID_KEY_HASH: u16 = 0x0070;
/// Change status (disposed / unregistered bits)
pub const PID_STATUS_INFO: u16 = 0x0071;

/// StatusInfo_t flag: instance disposed
pub const STATUS_INFO_DISPOSED: u8 = 0x01;
/// StatusInfo_t flag: instance unregistered
pub const STATUS_INFO_UNREGISTERED: u8 = 0x02;
